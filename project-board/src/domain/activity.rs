use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProjectId;

/// A cost entry booked against a project.
///
/// Only `value` takes part in budget aggregation; the backend has already
/// narrowed the list down to one project and one window.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "projectId", default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub date: Value,
}

impl Activity {
    pub fn new(project_id: impl Into<ProjectId>, value: f64) -> Self {
        Self {
            project_id: Some(project_id.into()),
            value,
            ..Default::default()
        }
    }
}
