//! Project lifecycle: projects and their tasks, tracked through a shared
//! lifecycle with the consistency rules enforced by the project aggregate.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`project`]: Project aggregate, task entity, persistence and services
//! - [`config`]: Settings for the `PostgreSQL` adapter

pub mod config;
pub mod project;
