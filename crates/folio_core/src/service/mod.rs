//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the author, lifecycle, ledger,
//!   pagination and counter use-cases.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - Services receive their repositories at construction. Nothing here keeps
//!   process-global state.
//! - Multi-step operations write the authoritative record first and the
//!   derived tag ledger second, so a partial failure leaves the ledger behind
//!   the items and never ahead of them.

pub mod author_service;
pub mod comment_service;
pub mod content_service;
pub mod counters;
pub mod error;
pub mod lifecycle;
pub mod paginator;
pub mod tag_ledger;
pub mod uid_generator;

use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
