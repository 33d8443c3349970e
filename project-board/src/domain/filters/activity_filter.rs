use crate::domain::{BudgetWindow, ProjectId};

use super::QueryFilter;

/// Selects the activities of one project inside a budget window.
pub struct ActivityFilter<'a> {
    project_id: &'a ProjectId,
    window: &'a BudgetWindow,
}

impl<'a> ActivityFilter<'a> {
    pub fn new(project_id: &'a ProjectId, window: &'a BudgetWindow) -> Self {
        Self { project_id, window }
    }
}

impl QueryFilter for ActivityFilter<'_> {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("projectId", self.project_id.to_string()),
            ("date", self.window.as_query_value()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn pairs_project_and_window() {
        let id = ProjectId::new("p 1");
        let window = BudgetWindow::month_of(datetime!(2024-03-15 00:00:00 UTC), true);

        let pairs = ActivityFilter::new(&id, &window).query_pairs();

        assert_eq!(
            pairs,
            vec![
                ("projectId", "p 1".to_string()),
                ("date", "gte:1709251200000".to_string()),
            ]
        );
    }
}
