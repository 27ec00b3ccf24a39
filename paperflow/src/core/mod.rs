//! Deterministic, pure logic shared by the paperflow entities and commands.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod eligibility;
pub mod invariants;
pub mod progression;
pub mod projection;
pub mod types;
pub mod workflow;
