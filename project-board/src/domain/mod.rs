mod activity;
mod budget_window;
mod filters;
mod ids;
mod project;

pub use activity::*;
pub use budget_window::*;
pub use filters::*;
pub use ids::*;
pub use project::*;
