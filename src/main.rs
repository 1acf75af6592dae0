mod cli;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rusqlite::Connection;

use roadmap::{db, ops, watch, DotGraph, JsonFile, RecordSource, RenderOptions, Roadmap, Style};

use cli::{Cli, Command};

/// Quiet period after a change before re-rendering.
const SETTLE: Duration = Duration::from_millis(200);

fn default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".roadmap").join("roadmap.db"))
}

fn resolve_db_path(cli_db: Option<String>) -> Result<String> {
    match cli_db {
        Some(p) => Ok(p),
        None => {
            let path = default_db_path()?;
            Ok(path
                .to_str()
                .context("default DB path is not valid UTF-8")?
                .to_string())
        }
    }
}

fn ensure_db_dir(db_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn open_db(cli_db: Option<String>) -> Result<(String, Connection)> {
    let db_path = resolve_db_path(cli_db)?;
    ensure_db_dir(&db_path)?;
    let conn = db::open(&db_path)?;
    db::init(&conn)?;
    Ok((db_path, conn))
}

fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("ROADMAP_LOG", "warn"))
        .target(env_logger::Target::Stderr)
        .format_timestamp_secs()
        .init();
}

fn render_once(source: &dyn RecordSource, goal: Option<&str>, options: &RenderOptions) -> Result<String> {
    let task_rows = source.task_rows(goal)?;
    let branch_rows = source.branch_rows()?;
    let roadmap = Roadmap::build(&task_rows, &branch_rows)?;
    Ok(roadmap.draw(DotGraph::new(), options))
}

fn emit(dot: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(dot.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn main() {
    setup_logging();
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init => {
            let (db_path, _conn) = open_db(cli.db)?;
            eprintln!("Initialized {db_path}");
        }

        Command::Add {
            id,
            title,
            bug,
            focused,
            branch_of,
        } => {
            let (_, conn) = open_db(cli.db)?;
            ops::add_task(&conn, &id, &title, bug, focused, branch_of.as_deref())?;
            match branch_of.as_deref() {
                Some(parent) => eprintln!("Added task '{id}' as a branch of '{parent}'"),
                None => eprintln!("Added task '{id}'"),
            }
        }

        Command::Block { blocker, blocked } => {
            let (_, conn) = open_db(cli.db)?;
            ops::add_block(&conn, &blocker, &blocked)?;
            eprintln!("'{blocker}' now blocks '{blocked}'");
        }

        Command::Render {
            input,
            goal,
            style,
            wrap_width,
            watch: keep_watching,
        } => {
            let options = RenderOptions {
                style: Style::parse(&style)?,
                wrap_width,
            };
            let (source, watched) = match input {
                Some(path) => (
                    Box::new(JsonFile::new(&path)) as Box<dyn RecordSource>,
                    PathBuf::from(path),
                ),
                None => {
                    let (db_path, conn) = open_db(cli.db)?;
                    (Box::new(conn) as Box<dyn RecordSource>, PathBuf::from(db_path))
                }
            };

            emit(&render_once(source.as_ref(), goal.as_deref(), &options)?)?;

            if keep_watching {
                let (_watcher, rx) = watch::watch_input(&watched)?;
                info!("watching {} for changes", watched.display());
                while watch::wait_for_change(&rx, SETTLE) {
                    match render_once(source.as_ref(), goal.as_deref(), &options) {
                        Ok(dot) => emit(&dot)?,
                        Err(e) => eprintln!("error: {e:#}"),
                    }
                }
            }
        }
    }

    Ok(())
}
