//! Unit tests for the project lifecycle module.
