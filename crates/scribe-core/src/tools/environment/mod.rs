//! Environment awareness tools
//!
//! Read-only tools that describe the workspace, the host and the project so
//! the model can orient itself before acting.

mod directory;
mod project;
mod smart_context;
mod system;
mod working_context;

pub use directory::{describe_directory, GetCurrentDirectory, MAX_LISTED_ENTRIES};
pub use project::{describe_project, GetProjectInfo};
pub use smart_context::GetSmartContext;
pub use system::{describe_system, system_summary, GetSystemInfo};
pub use working_context::{describe_working_context, GetWorkingContext};
