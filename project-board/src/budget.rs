use std::fmt;

use time::OffsetDateTime;

use crate::{
    domain::{Activity, BudgetWindow, PaymentCycle, Project},
    ports::ProjectApi,
    BoardError,
};

/// Consumed budget of a project over its current window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetUsage {
    pub consumed_total: f64,
    pub budget_max_monthly: Option<f64>,
    /// `None` when the project has no cap.
    pub percentage: Option<f64>,
}

impl fmt::Display for BudgetUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.budget_max_monthly, self.percentage) {
            (Some(max), Some(percentage)) => write!(
                f,
                "{:.2} / {:.2} ({:.0}%)",
                self.consumed_total, max, percentage
            ),
            _ => write!(f, "{:.2}", self.consumed_total),
        }
    }
}

pub struct BudgetAggregator;

impl BudgetAggregator {
    /// Start of the billing period a project's activities are summed from.
    pub fn window(project: &Project, now: OffsetDateTime) -> BudgetWindow {
        match project.payment_cycle {
            PaymentCycle::OneTime => match project.created_at {
                Some(created_at) => BudgetWindow::month_of(created_at, true),
                None => {
                    tracing::warn!(
                        "one-time project {} has no creation date, using the current month",
                        project.id
                    );
                    BudgetWindow::month_of(now, true)
                }
            },
            // Unknown cycles fall back to the monthly window
            PaymentCycle::Monthly | PaymentCycle::Other => BudgetWindow::month_of(now, false),
        }
    }

    /// Sums the activity values and relates them to the monthly cap.
    ///
    /// A missing or zero cap means the project is uncapped.
    pub fn compute(project: &Project, activities: &[Activity]) -> BudgetUsage {
        let consumed_total = activities
            .iter()
            .fold(0.0, |total, activity| total + activity.value);
        let cap = project
            .budget_max_monthly
            .filter(|max| *max != 0.0 && !max.is_nan());

        BudgetUsage {
            consumed_total,
            budget_max_monthly: cap,
            percentage: cap.map(|max| consumed_total / max * 100.0),
        }
    }

    pub fn heading(project: &Project) -> &'static str {
        match project.payment_cycle {
            PaymentCycle::Monthly => "Budget consumed this month",
            _ => "Budget consumed",
        }
    }
}

/// Fetches the activities of the project's current window and aggregates them.
pub async fn fetch_budget<A: ProjectApi + ?Sized>(
    api: &A,
    project: &Project,
    now: OffsetDateTime,
) -> Result<BudgetUsage, BoardError> {
    let window = BudgetAggregator::window(project, now);
    let activities = api.fetch_activities(&project.id, &window).await?;

    tracing::debug!(
        "aggregating {} activities for project {} since {}",
        activities.len(),
        project.id,
        window.start
    );

    Ok(BudgetAggregator::compute(project, &activities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn activities(values: &[f64]) -> Vec<Activity> {
        values.iter().map(|v| Activity::new("p1", *v)).collect()
    }

    #[test]
    fn percentage_of_monthly_cap() {
        let project = Project::new("p1", "Falcon").with_budget(100.0);

        let usage = BudgetAggregator::compute(&project, &activities(&[10.0, 29.0, 18.0, 12.0]));

        assert_eq!(usage.consumed_total, 69.0);
        assert_eq!(usage.percentage, Some(69.0));
        assert_eq!(usage.to_string(), "69.00 / 100.00 (69%)");
    }

    #[test]
    fn zero_cap_shows_raw_total() {
        let project = Project::new("p1", "Falcon").with_budget(0.0);

        let usage = BudgetAggregator::compute(&project, &activities(&[40.0, 2.5]));

        assert_eq!(usage.percentage, None);
        assert_eq!(usage.to_string(), "42.50");
    }

    #[test]
    fn missing_cap_shows_raw_total() {
        let project = Project::new("p1", "Falcon");

        let usage = BudgetAggregator::compute(&project, &[]);

        assert_eq!(usage.consumed_total, 0.0);
        assert_eq!(usage.percentage, None);
        assert_eq!(usage.to_string(), "0.00");
    }

    #[test]
    fn capped_project_without_activity_shows_zero() {
        let project = Project::new("p1", "Falcon").with_budget(100.0);

        let usage = BudgetAggregator::compute(&project, &[]);

        assert!(usage.consumed_total.is_sign_positive());
        assert_eq!(usage.to_string(), "0.00 / 100.00 (0%)");
    }

    #[test]
    fn over_budget_is_not_clamped() {
        let project = Project::new("p1", "Falcon").with_budget(50.0);

        let usage = BudgetAggregator::compute(&project, &activities(&[75.0]));

        assert_eq!(usage.percentage, Some(150.0));
    }

    #[test]
    fn one_time_window_starts_at_creation_month() {
        let project = Project::new("p1", "Falcon")
            .with_payment_cycle(PaymentCycle::OneTime)
            .with_created_at(datetime!(2024-03-15 09:00:00 UTC));

        let window = BudgetAggregator::window(&project, datetime!(2024-07-02 12:00:00 UTC));

        assert_eq!(window.start, datetime!(2024-03-01 00:00:00 UTC));
        assert!(window.inclusive_from);
    }

    #[test]
    fn monthly_window_starts_at_current_month() {
        let project = Project::new("p1", "Falcon")
            .with_payment_cycle(PaymentCycle::Monthly)
            .with_created_at(datetime!(2024-03-15 09:00:00 UTC));

        let window = BudgetAggregator::window(&project, datetime!(2024-07-02 12:00:00 UTC));

        assert_eq!(window.start, datetime!(2024-07-01 00:00:00 UTC));
        assert!(!window.inclusive_from);
    }

    #[test]
    fn other_cycles_reuse_monthly_window_without_marker() {
        let project = Project::new("p1", "Falcon").with_payment_cycle(PaymentCycle::Other);

        let window = BudgetAggregator::window(&project, datetime!(2024-12-31 23:59:59 UTC));

        assert_eq!(window.start, datetime!(2024-12-01 00:00:00 UTC));
        assert!(!window.inclusive_from);
    }

    #[test]
    fn one_time_without_creation_date_uses_current_month() {
        let project = Project::new("p1", "Falcon").with_payment_cycle(PaymentCycle::OneTime);

        let window = BudgetAggregator::window(&project, datetime!(2024-05-20 08:00:00 UTC));

        assert_eq!(window.start, datetime!(2024-05-01 00:00:00 UTC));
        assert!(window.inclusive_from);
    }

    #[test]
    fn heading_mentions_month_only_for_monthly_projects() {
        let monthly = Project::new("p1", "Falcon");
        let one_time = Project::new("p2", "Heron").with_payment_cycle(PaymentCycle::OneTime);

        assert_eq!(BudgetAggregator::heading(&monthly), "Budget consumed this month");
        assert_eq!(BudgetAggregator::heading(&one_time), "Budget consumed");
    }
}
