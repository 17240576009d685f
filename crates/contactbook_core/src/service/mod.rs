//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate directory mutations and snapshot persistence.
//! - Keep the REPL layer decoupled from storage details.

pub mod contact_service;
