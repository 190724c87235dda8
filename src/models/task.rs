use serde::Serialize;

/// Unit of trackable work; its name is unique within the owning project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,         // ⇔ tasks.id
    pub project_id: i64, // ⇔ tasks.project_id (FK projects.id)
    pub name: String,    // ⇔ tasks.name, UNIQUE(project_id, name)
}
