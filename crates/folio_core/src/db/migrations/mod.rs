//! Embedded schema steps and the upgrade runner.
//!
//! # Invariants
//! - Steps are numbered `1..=n` without gaps, in application order.
//! - Each step bumps `PRAGMA user_version` inside the same transaction as
//!   its DDL, and all pending steps share one transaction.
//! - A database ahead of this build is refused, never downgraded.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;
use std::cmp::Ordering;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "content_items",
        sql: include_str!("0001_content_items.sql"),
    },
    SchemaStep {
        version: 2,
        name: "tag_accounts",
        sql: include_str!("0002_tag_accounts.sql"),
    },
    SchemaStep {
        version: 3,
        name: "comments",
        sql: include_str!("0003_comments.sql"),
    },
    SchemaStep {
        version: 4,
        name: "authors",
        sql: include_str!("0004_authors.sql"),
    },
];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Schema version currently recorded in `PRAGMA user_version`.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the schema up to [`latest_version`] and returns how many steps ran.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let found = current_version(conn)?;
    let supported = latest_version();

    match found.cmp(&supported) {
        Ordering::Greater => Err(DbError::SchemaTooNew { found, supported }),
        Ordering::Equal => Ok(0),
        Ordering::Less => {
            let tx = conn.transaction()?;
            let mut applied = 0;
            for step in SCHEMA_STEPS.iter().filter(|step| step.version > found) {
                tx.execute_batch(step.sql)
                    .map_err(|source| DbError::Migration {
                        version: step.version,
                        name: step.name,
                        source,
                    })?;
                tx.pragma_update(None, "user_version", step.version)?;
                debug!(
                    "event=db_migrate_step module=db status=ok version={} name={}",
                    step.version, step.name
                );
                applied += 1;
            }
            tx.commit()?;

            info!(
                "event=db_migrate module=db status=ok from_version={found} to_version={supported} steps={applied}"
            );
            Ok(applied)
        }
    }
}
