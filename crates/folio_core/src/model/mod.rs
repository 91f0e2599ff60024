//! Domain model for authored content.
//!
//! # Responsibility
//! - Define the canonical records shared by the lifecycle, ledger and
//!   pagination services.
//! - Normalize user-supplied primitives (tag CSV, author names) before they
//!   reach storage.
//!
//! # Invariants
//! - An item's `id`, `kind` and `author` never change after creation.
//! - `tags` is a set: sorted, deduplicated, no empty entries.

pub mod author;
pub mod comment;
pub mod item;
pub mod tags;
pub mod validation;
