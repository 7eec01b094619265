// ABOUTME: Todo type definitions
// ABOUTME: The persisted record plus the inputs accepted by create and update

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoCreateInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update. Empty or absent text fields keep the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub favorite: Option<bool>,
}
