use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ProjectId;

/// Lifecycle status of a project. Only `Active` projects are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Inactive,
    #[serde(other)]
    Other,
}

/// Billing cycle of a project, decides which window its budget is summed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentCycle {
    Monthly,
    OneTime,
    #[default]
    #[serde(other)]
    Other,
}

/// A project as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub pinned: bool,
    #[serde(rename = "paymentCycle", default)]
    pub payment_cycle: PaymentCycle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max_monthly: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ProjectStatus::Active,
            pinned: false,
            payment_cycle: PaymentCycle::Monthly,
            budget_max_monthly: None,
            created_at: None,
            description: None,
            logo: None,
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn with_payment_cycle(mut self, payment_cycle: PaymentCycle) -> Self {
        self.payment_cycle = payment_cycle;
        self
    }

    pub fn with_budget(mut self, budget_max_monthly: f64) -> Self {
        self.budget_max_monthly = Some(budget_max_monthly);
        self
    }

    pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }

    /// Lowercased name, the key used for both search and ordering.
    pub fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Payload for creating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ProjectStatus::Active,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a project. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl ProjectPatch {
    pub fn pinned(pinned: bool) -> Self {
        Self {
            pinned: Some(pinned),
        }
    }
}
