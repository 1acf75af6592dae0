use anyhow::{bail, Result};
use rusqlite::Connection;

use crate::model::{BranchRow, TaskRow};
use crate::validate::{detect_dep_cycle, validate_id};

/// One row per (task, blocked task, parent) combination.
const TASK_ROWS: &str = "
SELECT t.id, t.title, t.is_bug, t.is_focused, d.blocked, b.parent
FROM tasks t
LEFT JOIN task_deps d ON d.blocker = t.id
LEFT JOIN task_branches b ON b.branch = t.id
ORDER BY t.id";

/// Same rows restricted to the goal's upstream scope: the goal, whatever
/// blocks something in scope, and the branches and parents of scoped tasks.
const GOAL_TASK_ROWS: &str = "
WITH RECURSIVE scope(id) AS (
    SELECT ?1
    UNION
    SELECT d.blocker FROM task_deps d JOIN scope s ON d.blocked = s.id
    UNION
    SELECT b.branch FROM task_branches b JOIN scope s ON b.parent = s.id
    UNION
    SELECT b.parent FROM task_branches b JOIN scope s ON b.branch = s.id
)
SELECT t.id, t.title, t.is_bug, t.is_focused, d.blocked, b.parent
FROM tasks t
JOIN scope ON scope.id = t.id
LEFT JOIN task_deps d ON d.blocker = t.id
LEFT JOIN task_branches b ON b.branch = t.id
ORDER BY t.id";

const BRANCH_ROWS: &str = "
SELECT b.parent, b.branch, t.title
FROM task_branches b
JOIN tasks t ON t.id = b.branch
ORDER BY b.parent, b.position";

fn task_exists(conn: &Connection, id: &str) -> Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM tasks WHERE id = ?1", [id], |row| {
        row.get(0)
    })?;
    Ok(count > 0)
}

fn require_task(conn: &Connection, id: &str) -> Result<()> {
    if !task_exists(conn, id)? {
        bail!("task '{id}' not found");
    }
    Ok(())
}

pub fn add_task(
    conn: &Connection,
    id: &str,
    title: &str,
    is_bug: bool,
    is_focused: bool,
    branch_of: Option<&str>,
) -> Result<()> {
    validate_id(id)?;
    if task_exists(conn, id)? {
        bail!("task '{id}' already exists");
    }
    if let Some(parent) = branch_of {
        require_task(conn, parent)?;
    }
    conn.execute(
        "INSERT INTO tasks (id, title, is_bug, is_focused) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![id, title, is_bug, is_focused],
    )?;
    if let Some(parent) = branch_of {
        conn.execute(
            "INSERT INTO task_branches (branch, parent) VALUES (?1, ?2)",
            rusqlite::params![id, parent],
        )?;
    }
    Ok(())
}

pub fn add_block(conn: &Connection, blocker: &str, blocked: &str) -> Result<()> {
    require_task(conn, blocker)?;
    require_task(conn, blocked)?;
    if blocker == blocked {
        bail!("a task cannot block itself");
    }
    if detect_dep_cycle(conn, blocker, blocked)? {
        bail!("adding this dependency would create a cycle");
    }
    conn.execute(
        "INSERT OR IGNORE INTO task_deps (blocker, blocked) VALUES (?1, ?2)",
        rusqlite::params![blocker, blocked],
    )?;
    Ok(())
}

pub fn task_rows(conn: &Connection, goal: Option<&str>) -> Result<Vec<TaskRow>> {
    let read = |row: &rusqlite::Row<'_>| -> rusqlite::Result<TaskRow> {
        Ok(TaskRow {
            task: Some(row.get(0)?),
            title: Some(row.get(1)?),
            is_bug: row.get::<_, i64>(2)? != 0,
            is_focused: row.get::<_, i64>(3)? != 0,
            blocks: row.get(4)?,
            is_branch_of: row.get(5)?,
        })
    };

    let rows = match goal {
        Some(goal) => {
            require_task(conn, goal)?;
            let mut stmt = conn.prepare(GOAL_TASK_ROWS)?;
            let rows = stmt.query_map([goal], read)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
        None => {
            let mut stmt = conn.prepare(TASK_ROWS)?;
            let rows = stmt.query_map([], read)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
    };
    Ok(rows)
}

pub fn branch_rows(conn: &Connection) -> Result<Vec<BranchRow>> {
    let mut stmt = conn.prepare(BRANCH_ROWS)?;
    let rows = stmt.query_map([], |row| {
        Ok(BranchRow {
            task: Some(row.get(0)?),
            branch: Some(row.get(1)?),
            title: Some(row.get(2)?),
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Into::into)
}
