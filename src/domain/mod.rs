pub mod board;
pub mod project;

pub use board::{BoardConfig, Column};
pub use project::{Project, ProjectId, ProjectStatus};
