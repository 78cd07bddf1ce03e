//! Domain model for notes and their owning users.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field-level validation rules shared by every write path.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` and a unique slug.
//! - Every note has exactly one author, fixed at creation.

pub mod note;
pub mod user;
