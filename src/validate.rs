use anyhow::{bail, Result};
use rusqlite::Connection;

/// Validate a task id: non-empty, no whitespace or double quotes.
/// `:` is allowed; it is replaced when the id becomes a graph id.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("task id must not be empty");
    }
    if id.chars().any(|c| c.is_whitespace() || c == '"') {
        bail!("task id '{id}' must not contain whitespace or quotes");
    }
    Ok(())
}

/// Detect if adding a blocker->blocked dependency would create a cycle in the dependency graph.
pub fn detect_dep_cycle(conn: &Connection, blocker: &str, blocked: &str) -> Result<bool> {
    if blocker == blocked {
        return Ok(true);
    }
    // Walk upstream from the blocker; reaching `blocked` closes a loop.
    let mut visited = std::collections::HashSet::new();
    let mut queue = std::collections::VecDeque::new();
    queue.push_back(blocker.to_string());
    visited.insert(blocker.to_string());

    while let Some(current) = queue.pop_front() {
        let mut stmt = conn.prepare_cached("SELECT blocker FROM task_deps WHERE blocked = ?1")?;
        let blockers = stmt.query_map([&current], |row| row.get::<_, String>(0))?;
        for b in blockers {
            let b = b?;
            if b == blocked {
                return Ok(true);
            }
            if visited.insert(b.clone()) {
                queue.push_back(b);
            }
        }
    }
    Ok(false)
}
