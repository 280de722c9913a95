//! Project and task lifecycle tracking.
//!
//! A project moves through `pending`, `active` and one of the terminal
//! statuses `cancelled` or `completed`; each of its tasks follows the same
//! lifecycle independently, subject to the rules the project enforces over
//! its tasks. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
