//! In-process project backend for tests and offline runs.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use time::{Duration, OffsetDateTime};

use crate::{
    domain::{
        Activity, BudgetWindow, NewProject, PaymentCycle, Project, ProjectId, ProjectPatch,
        ProjectStatus,
    },
    ports::ProjectApi,
    BoardError,
};

#[derive(Debug, Clone)]
struct StoredActivity {
    project_id: ProjectId,
    date: OffsetDateTime,
    value: f64,
}

#[derive(Debug, Default)]
struct Backend {
    projects: Vec<Project>,
    activities: Vec<StoredActivity>,
    updates: Vec<(ProjectId, ProjectPatch)>,
    created: Vec<NewProject>,
    fail_fetches: bool,
    fail_updates: bool,
    fail_creates: bool,
}

/// `ProjectApi` backed by shared in-memory state.
///
/// Activities are selected from the start of the requested window onwards,
/// whether or not the window carries the inclusive marker.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectApi {
    backend: Arc<RwLock<Backend>>,
}

impl InMemoryProjectApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add projects to the backend.
    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        self.write().projects.extend(projects);
        self
    }

    /// Book an activity against a project at the given date.
    pub fn with_activity(
        self,
        project_id: impl Into<ProjectId>,
        date: OffsetDateTime,
        value: f64,
    ) -> Self {
        self.write().activities.push(StoredActivity {
            project_id: project_id.into(),
            date,
            value,
        });
        self
    }

    /// A small board covering every payment cycle, anchored on `now`.
    pub fn seeded(now: OffsetDateTime) -> Self {
        let this_month = BudgetWindow::month_of(now, false).start;
        let last_month = BudgetWindow::month_of(this_month - Duration::days(1), false).start;

        Self::new()
            .with_projects(vec![
                Project::new("proj_1", "Nordic Crisis Manager")
                    .with_pinned(true)
                    .with_budget(5000.0)
                    .with_description("Incident tooling for the Nordic region"),
                Project::new("proj_2", "azure devops integration").with_budget(1200.0),
                Project::new("proj_3", "TUI Development")
                    .with_payment_cycle(PaymentCycle::OneTime)
                    .with_created_at(last_month + Duration::days(9)),
                Project::new("proj_4", "Legacy Billing").with_status(ProjectStatus::Inactive),
                Project::new("proj_5", "Brand Refresh").with_payment_cycle(PaymentCycle::Other),
            ])
            .with_activity("proj_1", this_month, 1250.0)
            .with_activity("proj_1", last_month, 4100.0)
            .with_activity("proj_2", this_month, 1340.5)
            .with_activity("proj_3", last_month, 310.25)
            .with_activity("proj_3", this_month, 89.75)
            .with_activity("proj_5", this_month, 42.5)
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.write().fail_fetches = fail;
    }

    pub fn fail_updates(&self, fail: bool) {
        self.write().fail_updates = fail;
    }

    pub fn fail_creates(&self, fail: bool) {
        self.write().fail_creates = fail;
    }

    /// Every partial update received, in order.
    pub fn updates(&self) -> Vec<(ProjectId, ProjectPatch)> {
        self.read().updates.clone()
    }

    /// Every creation payload received, in order.
    pub fn created(&self) -> Vec<NewProject> {
        self.read().created.clone()
    }

    pub fn project(&self, id: &ProjectId) -> Option<Project> {
        self.read().projects.iter().find(|p| &p.id == id).cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Backend> {
        self.backend.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Backend> {
        self.backend.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProjectApi for InMemoryProjectApi {
    async fn fetch_projects(&self) -> Result<Vec<Project>, BoardError> {
        let backend = self.read();
        if backend.fail_fetches {
            return Err(BoardError::network("GET /project: connection refused"));
        }

        Ok(backend.projects.clone())
    }

    async fn fetch_activities(
        &self,
        project_id: &ProjectId,
        window: &BudgetWindow,
    ) -> Result<Vec<Activity>, BoardError> {
        let backend = self.read();
        if backend.fail_fetches {
            return Err(BoardError::network("GET /activity: connection refused"));
        }

        Ok(backend
            .activities
            .iter()
            .filter(|activity| &activity.project_id == project_id)
            .filter(|activity| activity.date >= window.start)
            .map(|activity| Activity {
                id: None,
                project_id: Some(activity.project_id.clone()),
                value: activity.value,
                date: Value::from(
                    i64::try_from(activity.date.unix_timestamp_nanos() / 1_000_000)
                        .unwrap_or_default(),
                ),
            })
            .collect())
    }

    async fn update_project(
        &self,
        id: &ProjectId,
        patch: &ProjectPatch,
    ) -> Result<(), BoardError> {
        let mut backend = self.write();
        if backend.fail_updates {
            return Err(BoardError::network("PUT /project/:id: connection reset"));
        }

        let project = backend
            .projects
            .iter_mut()
            .find(|project| &project.id == id)
            .ok_or_else(|| BoardError::network(format!("PUT /project/{id} returned 404")))?;
        if let Some(pinned) = patch.pinned {
            project.pinned = pinned;
        }

        backend.updates.push((id.clone(), patch.clone()));
        Ok(())
    }

    async fn create_project(&self, new_project: &NewProject) -> Result<Project, BoardError> {
        let mut backend = self.write();
        if backend.fail_creates {
            return Err(BoardError::network("POST /project: connection reset"));
        }
        if new_project.name.trim().is_empty() {
            return Err(BoardError::validation("name is required"));
        }

        let project = Project {
            status: new_project.status,
            description: new_project.description.clone(),
            ..Project::new(
                format!("dev-{}", backend.projects.len() + 1),
                new_project.name.clone(),
            )
        };

        backend.projects.push(project.clone());
        backend.created.push(new_project.clone());
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[tokio::test]
    async fn windows_are_open_ended() {
        let api = InMemoryProjectApi::new()
            .with_activity("p1", datetime!(2024-02-29 23:59:59 UTC), 5.0)
            .with_activity("p1", datetime!(2024-03-01 00:00:00 UTC), 7.0)
            .with_activity("p1", datetime!(2024-03-15 09:30:00 UTC), 11.0)
            .with_activity("p2", datetime!(2024-03-01 00:00:00 UTC), 100.0);
        let id = ProjectId::new("p1");
        let march = datetime!(2024-03-20 00:00:00 UTC);

        for inclusive_from in [false, true] {
            let activities = api
                .fetch_activities(&id, &BudgetWindow::month_of(march, inclusive_from))
                .await
                .unwrap();

            assert_eq!(
                activities.iter().map(|a| a.value).collect::<Vec<_>>(),
                vec![7.0, 11.0]
            );
            assert_eq!(activities[0].date, Value::from(1709251200000_i64));
        }
    }

    #[tokio::test]
    async fn update_applies_patch_and_records_it() {
        let api = InMemoryProjectApi::new().with_projects(vec![Project::new("p1", "Kite")]);
        let id = ProjectId::new("p1");

        api.update_project(&id, &ProjectPatch::pinned(true))
            .await
            .unwrap();

        assert!(api.project(&id).unwrap().pinned);
        assert_eq!(api.updates(), vec![(id, ProjectPatch::pinned(true))]);
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let api = InMemoryProjectApi::new();

        let result = api.create_project(&NewProject::new("  ")).await;

        assert_eq!(result, Err(BoardError::validation("name is required")));
        assert!(api.created().is_empty());
    }

    #[tokio::test]
    async fn seeded_board_lists_every_project() {
        let api = InMemoryProjectApi::seeded(datetime!(2024-06-15 12:00:00 UTC));

        let projects = api.fetch_projects().await.unwrap();

        assert_eq!(projects.len(), 5);
        assert!(projects.iter().any(|p| p.pinned));
    }
}
