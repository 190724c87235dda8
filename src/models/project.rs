use serde::Serialize;

/// Top-level grouping of tasks, unique by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: i64,      // ⇔ projects.id
    pub name: String, // ⇔ projects.name (UNIQUE)
}
