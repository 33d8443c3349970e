mod board_url;
mod client;
mod error;
mod memory;

pub mod budget;
pub mod domain;
pub mod ordering;
pub mod ports;
pub mod settings;
pub mod store;

pub(crate) use board_url::*;

pub use budget::{fetch_budget, BudgetAggregator, BudgetUsage};
pub use client::*;
pub use error::BoardError;
pub use memory::InMemoryProjectApi;
pub use ports::ProjectApi;
pub use settings::{read_settings, PinFailurePolicy, Settings};
pub use store::{PinSync, ProjectStore};
