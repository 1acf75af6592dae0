use anyhow::Result;
use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id         TEXT PRIMARY KEY CHECK(length(id) > 0),
    title      TEXT NOT NULL,
    is_bug     INTEGER NOT NULL DEFAULT 0 CHECK(is_bug IN (0, 1)),
    is_focused INTEGER NOT NULL DEFAULT 0 CHECK(is_focused IN (0, 1))
);

CREATE TABLE IF NOT EXISTS task_deps (
    blocker TEXT NOT NULL REFERENCES tasks(id) ON UPDATE CASCADE ON DELETE CASCADE,
    blocked TEXT NOT NULL REFERENCES tasks(id) ON UPDATE CASCADE ON DELETE CASCADE,
    PRIMARY KEY (blocker, blocked),
    CHECK (blocker != blocked)
);

CREATE TABLE IF NOT EXISTS task_branches (
    position INTEGER PRIMARY KEY,
    branch   TEXT NOT NULL REFERENCES tasks(id) ON UPDATE CASCADE ON DELETE CASCADE,
    parent   TEXT NOT NULL REFERENCES tasks(id) ON UPDATE CASCADE ON DELETE CASCADE,
    UNIQUE (branch, parent),
    CHECK (branch != parent)
);
";

fn set_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

pub fn open(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    set_pragmas(&conn)?;
    Ok(conn)
}

pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    set_pragmas(&conn)?;
    init(&conn)?;
    Ok(conn)
}
