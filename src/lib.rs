//! Rental Settlement Service
//!
//! Coordinates rental agreements, off-chain payment records and on-chain
//! payment verification.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │             SETTLEMENT SERVICE               │
//!                        │                                              │
//!    Client Request      │  ┌─────────┐      ┌────────────────────┐    │
//!    ────────────────────┼─▶│  http   │─────▶│     settlement     │    │
//!                        │  │ server  │      │    coordinator     │    │
//!                        │  └─────────┘      └─────────┬──────────┘    │
//!                        │                             │               │
//!                        │            ┌────────────────┼───────────┐   │
//!                        │            ▼                ▼           ▼   │
//!                        │     ┌────────────┐   ┌────────────┐  ┌───────────┐
//!                        │     │  rentals   │   │  payments  │  │   chain   │──▶ JSON-RPC
//!                        │     │  manager   │   │   ledger   │  │  reader   │    node
//!                        │     └────────────┘   └────────────┘  └───────────┘
//!                        │                                              │
//!                        │  ┌────────────────────────────────────────┐ │
//!                        │  │          Cross-Cutting Concerns         │ │
//!                        │  │  ┌────────┐ ┌───────────┐ ┌──────────┐ │ │
//!                        │  │  │ config │ │ directory │ │observa-  │ │ │
//!                        │  │  │        │ │ (props)   │ │ bility   │ │ │
//!                        │  │  └────────┘ └───────────┘ └──────────┘ │ │
//!                        │  └────────────────────────────────────────┘ │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! The coordinator is the only component that touches both the rental
//! manager and the payment ledger; each of those exclusively owns its
//! records. The chain reader only observes the chain (block height,
//! address balance); it never signs or submits transactions.

// Core subsystems
pub mod chain;
pub mod config;
pub mod http;
pub mod payments;
pub mod rentals;
pub mod settlement;

// Cross-cutting concerns
pub mod directory;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
