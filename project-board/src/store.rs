use std::{collections::BTreeSet, sync::Arc};

use futures::future::join_all;
use time::OffsetDateTime;

use crate::{
    budget::{fetch_budget, BudgetUsage},
    domain::{NewProject, Project, ProjectId, ProjectPatch, ProjectStatus},
    ordering,
    ports::ProjectApi,
    settings::PinFailurePolicy,
    BoardError,
};

/// How a pin toggle ended up relative to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PinSync {
    Persisted,
    /// The local flag was kept and the project awaits `retry_pending_pins`.
    Pending(BoardError),
    /// The local toggle was undone.
    RolledBack(BoardError),
}

/// The working list of projects and the search-filtered view over it.
///
/// The store is owned by a single view and mutated through `&mut self`;
/// pin changes are applied locally first and persisted afterwards.
pub struct ProjectStore<A> {
    api: Arc<A>,
    pin_failure_policy: PinFailurePolicy,
    projects: Vec<Project>,
    displayed: Vec<Project>,
    search: String,
    pending_pins: BTreeSet<ProjectId>,
}

impl<A: ProjectApi> ProjectStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            pin_failure_policy: PinFailurePolicy::default(),
            projects: Vec::new(),
            displayed: Vec::new(),
            search: String::new(),
            pending_pins: BTreeSet::new(),
        }
    }

    pub fn with_pin_failure_policy(mut self, policy: PinFailurePolicy) -> Self {
        self.pin_failure_policy = policy;
        self
    }

    /// Replaces the working list with the backend's collection.
    ///
    /// On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<(), BoardError> {
        let fetched = self.api.fetch_projects().await?;

        let (mut projects, dropped) = ordering::dedupe_by_id(fetched);
        if dropped > 0 {
            tracing::warn!("dropped {} projects with duplicate ids", dropped);
        }
        ordering::sort_projects(&mut projects);

        tracing::debug!("loaded {} projects", projects.len());
        self.projects = projects;
        self.pending_pins.clear();
        self.refresh_displayed();
        Ok(())
    }

    pub fn set_search(&mut self, term: &str) -> &[Project] {
        self.search = term.to_string();
        self.refresh_displayed();
        &self.displayed
    }

    /// Flips the pin of a project, reorders the list and persists the new flag.
    ///
    /// Only a missing project is an error; a failed persistence is reported
    /// through the returned `PinSync` and handled per the store's policy.
    pub async fn toggle_pin(&mut self, id: &ProjectId) -> Result<PinSync, BoardError> {
        let reordered = ordering::toggle_pin(&self.projects, id)?;
        let pinned = reordered
            .iter()
            .find(|project| &project.id == id)
            .map(|project| project.pinned)
            .ok_or_else(|| BoardError::ProjectNotFound(id.clone()))?;

        self.projects = reordered;
        self.refresh_displayed();

        match self
            .api
            .update_project(id, &ProjectPatch::pinned(pinned))
            .await
        {
            Ok(()) => {
                self.pending_pins.remove(id);
                Ok(PinSync::Persisted)
            }
            Err(e) => {
                tracing::warn!("failed to persist pin of project {}: {}", id, e);
                match self.pin_failure_policy {
                    PinFailurePolicy::MarkDirty => {
                        self.pending_pins.insert(id.clone());
                        Ok(PinSync::Pending(e))
                    }
                    PinFailurePolicy::Revert => {
                        self.projects = ordering::toggle_pin(&self.projects, id)?;
                        self.refresh_displayed();
                        Ok(PinSync::RolledBack(e))
                    }
                }
            }
        }
    }

    /// Re-sends the current pin flag of every pending project.
    ///
    /// Returns the projects that still failed.
    pub async fn retry_pending_pins(&mut self) -> Vec<(ProjectId, BoardError)> {
        let mut failures = Vec::new();
        let pending: Vec<ProjectId> = self.pending_pins.iter().cloned().collect();

        for id in pending {
            let Some(pinned) = self
                .projects
                .iter()
                .find(|project| project.id == id)
                .map(|project| project.pinned)
            else {
                self.pending_pins.remove(&id);
                continue;
            };

            match self
                .api
                .update_project(&id, &ProjectPatch::pinned(pinned))
                .await
            {
                Ok(()) => {
                    self.pending_pins.remove(&id);
                }
                Err(e) => {
                    tracing::warn!("retry of pin for project {} failed: {}", id, e);
                    failures.push((id, e));
                }
            }
        }

        failures
    }

    /// Submits a new active project.
    ///
    /// The working list only picks it up on the next `load`.
    pub async fn create_project(&self, mut project: NewProject) -> Result<Project, BoardError> {
        project.status = ProjectStatus::Active;

        self.api.create_project(&project).await.map_err(|e| {
            tracing::error!("failed to create project {:?}: {}", project.name, e);
            e
        })
    }

    /// Budget usage of every displayed project, fetched concurrently.
    pub async fn displayed_budgets(
        &self,
        now: OffsetDateTime,
    ) -> Vec<(ProjectId, Result<BudgetUsage, BoardError>)> {
        let api = self.api.as_ref();

        join_all(self.displayed.iter().map(|project| async move {
            (project.id.clone(), fetch_budget(api, project, now).await)
        }))
        .await
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn displayed(&self) -> &[Project] {
        &self.displayed
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn pending_pins(&self) -> impl Iterator<Item = &ProjectId> {
        self.pending_pins.iter()
    }

    pub fn is_pending(&self, id: &ProjectId) -> bool {
        self.pending_pins.contains(id)
    }

    fn refresh_displayed(&mut self) {
        self.displayed = ordering::filter_displayed(&self.projects, &self.search);
    }
}
