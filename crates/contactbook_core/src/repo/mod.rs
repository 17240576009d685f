//! Persistence contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the snapshot store used by the contact service.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Loaded data passes the same validators as user input.

pub mod contact_store;
