use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use project_board::{
    domain::{NewProject, Project, ProjectId},
    read_settings, BudgetAggregator, BudgetUsage, BoardError, HttpProjectApi,
    InMemoryProjectApi, PinSync, ProjectApi, ProjectStore, Settings,
};

#[derive(Parser)]
#[command(name = "board-cli", about = "Browse, pin and create projects")]
struct Opts {
    /// Use an in-memory board instead of the configured backend
    #[arg(long)]
    dev: bool,

    /// Settings file (defaults to ./board.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List active projects, pinned first
    List {
        /// Only show projects whose name contains this text
        #[arg(long)]
        search: Option<String>,
        /// Fetch and show the consumed budget of every listed project
        #[arg(long)]
        budgets: bool,
    },
    /// Pin or unpin a project
    Pin { id: String },
    /// Create a new active project
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_filename(".env.local").ok();

    let opts = Opts::parse();
    let settings = read_settings(opts.config.as_deref()).context("Failed to read settings")?;
    init_tracing(&settings.log_level)?;

    if opts.dev {
        let api = InMemoryProjectApi::seeded(time::OffsetDateTime::now_utc());
        run(Arc::new(api), &settings, opts.command).await
    } else {
        let api = HttpProjectApi::new(&settings.api_url)
            .with_context(|| format!("Invalid API URL: {}", settings.api_url))?;
        run(Arc::new(api), &settings, opts.command).await
    }
}

async fn run<A: ProjectApi>(api: Arc<A>, settings: &Settings, command: Command) -> Result<()> {
    let mut store = ProjectStore::new(api).with_pin_failure_policy(settings.pin_failure_policy);

    match command {
        Command::List { search, budgets } => {
            store.load().await.context("Failed to load projects")?;
            if let Some(term) = search {
                store.set_search(&term);
            }

            if budgets {
                let usages = store
                    .displayed_budgets(time::OffsetDateTime::now_utc())
                    .await;
                for (project, (_, usage)) in store.displayed().iter().zip(usages) {
                    print_project(project);
                    print_budget(project, usage);
                }
            } else {
                store.displayed().iter().for_each(print_project);
            }
        }
        Command::Pin { id } => {
            store.load().await.context("Failed to load projects")?;

            let id = ProjectId::new(id);
            let sync = store
                .toggle_pin(&id)
                .await
                .with_context(|| format!("Cannot pin project {}", id))?;

            let mut unsaved = Vec::new();
            match sync {
                PinSync::Persisted => println!("Saved."),
                PinSync::Pending(e) => {
                    println!("Not saved ({e}), retrying once.");
                    unsaved = store.retry_pending_pins().await;
                    if unsaved.is_empty() {
                        println!("Saved.");
                    }
                }
                PinSync::RolledBack(e) => println!("Not saved ({e}), change undone."),
            }
            store.displayed().iter().for_each(print_project);

            if !unsaved.is_empty() {
                for (id, e) in &unsaved {
                    println!("Pin of {id} not saved: {e}");
                }
                anyhow::bail!("{} pin change(s) not saved", unsaved.len());
            }
        }
        Command::Create { name, description } => {
            let mut project = NewProject::new(name);
            if let Some(description) = description {
                project = project.with_description(description);
            }

            match store.create_project(project).await {
                Ok(created) => println!("Created {} ({})", created.name, created.id),
                Err(e) => {
                    tracing::debug!("create failed: {:?}", e);
                    anyhow::bail!("Could not create project");
                }
            }
        }
    }

    Ok(())
}

fn print_project(project: &Project) {
    println!(
        "{} {} [{}]{}",
        if project.pinned { "*" } else { " " },
        project.name,
        project.id,
        project
            .description
            .as_deref()
            .map(|d| format!(" - {d}"))
            .unwrap_or_default()
    );
}

fn print_budget(project: &Project, usage: Result<BudgetUsage, BoardError>) {
    match usage {
        Ok(usage) => println!("    {}: {}", BudgetAggregator::heading(project), usage),
        Err(e) => println!("    {}: unavailable ({})", BudgetAggregator::heading(project), e),
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow::anyhow!("Invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
