use project_board::{BudgetAggregator, InMemoryProjectApi, ProjectStore};
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let now = time::OffsetDateTime::now_utc();
    let api = Arc::new(InMemoryProjectApi::seeded(now));

    let mut store = ProjectStore::new(api);
    store.load().await?;

    let budgets = store.displayed_budgets(now).await;

    println!("Budget report for {}:", now.date());
    for (project, (_, usage)) in store.displayed().iter().zip(budgets) {
        let usage = match usage {
            Ok(usage) => usage.to_string(),
            Err(e) => format!("unavailable ({e})"),
        };
        println!(
            "{}{} | {}: {}",
            if project.pinned { "* " } else { "  " },
            project.name,
            BudgetAggregator::heading(project),
            usage
        );
    }

    Ok(())
}
