//! Contact domain model.
//!
//! # Responsibility
//! - Define typed contact fields and their validation policies.
//! - Define the `Record` entity and the owning `Directory` collection.
//!
//! # Invariants
//! - Every stored value has passed the validator for its path.
//! - `Directory` is the only owner of `Record` values.

pub mod directory;
pub mod fields;
pub mod record;
