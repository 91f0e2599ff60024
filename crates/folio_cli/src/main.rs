//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `folio_core` linkage, configuration and database bootstrap from
//!   the same environment the server would run with.
//! - Keep output deterministic for quick local sanity checks.

use folio_core::db::migrations::{current_version, latest_version};
use folio_core::db::open_db;
use folio_core::{ContentKind, CoreConfig, SqliteContentService};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("folio_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    let logging_active = config.init_logging()?;

    println!("folio_core ping={}", folio_core::ping());
    println!("folio_core version={}", folio_core::core_version());
    println!("logging active={logging_active}");

    let conn = open_db(&config.db_path)?;
    println!("db path={}", config.db_path.display());
    println!(
        "db schema_version={} latest={}",
        current_version(&conn)?,
        latest_version()
    );

    // Fails fast when the file predates a required table.
    let service = SqliteContentService::open(&conn)?;
    if let Some(author) = std::env::args().nth(1) {
        let account = service.get_author(&author)?;
        println!(
            "author={author} blogname={} total_views={}",
            account.blogname, account.total_views
        );
        for kind in ContentKind::ALL {
            let context = service.paginate(&author, kind, 1, config.page_size)?;
            println!(
                "author={author} kind={} active={} pages={}",
                kind.as_str(),
                context.total,
                context.max_page
            );
        }
        let tags = service.list_tags(&author)?;
        println!("author={author} tags_in_use={}", tags.len());
    }

    info!("event=cli_probe module=cli status=ok");
    Ok(())
}
