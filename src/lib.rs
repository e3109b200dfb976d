//! # Project Board
//!
//! A headless project board: projects are created through a validated form,
//! kept in an observable [`ProjectStore`], and shown in one column per status.
//! Dragging a project onto another column moves it to that column's status.
//!
//! Rendering goes through the in-memory [`dom::Document`], so every component
//! can be driven and inspected without a browser.

pub mod app;
pub mod components;
pub mod dom;
pub mod domain;
pub mod drag;
pub mod error;
pub mod logging;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use app::ProjectBoard;
pub use components::{Component, ProjectInput, ProjectItem, ProjectList, SubmitOutcome};
pub use domain::{
    board::{BoardConfig, Column},
    project::{Project, ProjectId, ProjectStatus},
};
pub use drag::{DataTransfer, DragEvent, DragGesture, DragTarget, Draggable, GestureState};
pub use error::{BoardError, Result};
pub use store::ProjectStore;
pub use validation::{validate, validate_project_input, FormRules, Validatable, ValidationError};
