use async_trait::async_trait;

use crate::{
    domain::{Activity, BudgetWindow, NewProject, Project, ProjectId, ProjectPatch},
    BoardError,
};

/// Outbound port to the project backend.
///
/// Every collaborator call of the board goes through this trait, so the
/// store and the budget aggregation never see a concrete transport.
#[async_trait]
pub trait ProjectApi: Send + Sync + 'static {
    /// Get the full project collection.
    async fn fetch_projects(&self) -> Result<Vec<Project>, BoardError>;

    /// Get the activities booked against a project inside a budget window.
    async fn fetch_activities(
        &self,
        project_id: &ProjectId,
        window: &BudgetWindow,
    ) -> Result<Vec<Activity>, BoardError>;

    /// Partially update a project.
    async fn update_project(&self, id: &ProjectId, patch: &ProjectPatch)
        -> Result<(), BoardError>;

    /// Create a project and return the stored record.
    async fn create_project(&self, project: &NewProject) -> Result<Project, BoardError>;
}
