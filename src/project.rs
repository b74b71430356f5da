use serde::{Deserialize, Serialize};

/// Name shown when a task refers to a project we have not loaded.
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Resolve a project id to its display name.
pub fn project_name<'a>(projects: &'a [Project], project_id: &str) -> &'a str {
    projects
        .iter()
        .find(|p| p.id == project_id)
        .map(|p| p.name.as_str())
        .unwrap_or(UNKNOWN_PROJECT)
}
