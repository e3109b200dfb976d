//! Drag-and-drop contract between project items and status columns.
//!
//! A draggable puts the project id on the transfer as `text/plain`; a drop
//! target accepts transfers whose first type is `text/plain` and moves the
//! project into its own status on drop. [`DragGesture`] sequences the events
//! of one gesture and refuses out-of-order ones.

use crate::error::{BoardError, Result};
use log::trace;
use std::fmt;

/// Payload type carrying a project id
pub const TEXT_PLAIN: &str = "text/plain";

/// Operations a drag source allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropEffect {
    #[default]
    None,
    Move,
}

/// Data carried across a drag gesture, keyed by format in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    items: Vec<(String, String)>,
    effect_allowed: DropEffect,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `format`, replacing any previous value for it
    pub fn set_data(&mut self, format: &str, data: impl Into<String>) {
        let data = data.into();
        match self.items.iter_mut().find(|(fmt, _)| fmt == format) {
            Some(item) => item.1 = data,
            None => self.items.push((format.to_string(), data)),
        }
    }

    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(fmt, _)| fmt == format)
            .map(|(_, data)| data.as_str())
    }

    pub fn types(&self) -> Vec<&str> {
        self.items.iter().map(|(fmt, _)| fmt.as_str()).collect()
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.items.first().map(|(fmt, _)| fmt.as_str())
    }

    pub fn effect_allowed(&self) -> DropEffect {
        self.effect_allowed
    }

    pub fn set_effect_allowed(&mut self, effect: DropEffect) {
        self.effect_allowed = effect;
    }
}

/// A single drag event as delivered to a handler
#[derive(Debug, Clone, Default)]
pub struct DragEvent {
    data_transfer: Option<DataTransfer>,
    default_prevented: bool,
}

impl DragEvent {
    pub fn new(data_transfer: DataTransfer) -> Self {
        Self {
            data_transfer: Some(data_transfer),
            default_prevented: false,
        }
    }

    /// An event without a transfer object, e.g. synthesized by a script
    pub fn without_transfer() -> Self {
        Self::default()
    }

    pub fn data_transfer(&self) -> Option<&DataTransfer> {
        self.data_transfer.as_ref()
    }

    pub fn data_transfer_mut(&mut self) -> Option<&mut DataTransfer> {
        self.data_transfer.as_mut()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Source side of a drag
pub trait Draggable {
    fn drag_start(&self, event: &mut DragEvent) -> Result<()>;

    fn drag_end(&self, event: &DragEvent) -> Result<()>;
}

/// Receiving side of a drag
pub trait DragTarget {
    /// Must call [`DragEvent::prevent_default`] to accept a drop
    fn drag_over(&self, event: &mut DragEvent) -> Result<()>;

    fn drag_drop(&self, event: &mut DragEvent) -> Result<()>;

    fn drag_leave(&self, event: &DragEvent) -> Result<()>;
}

/// Phase of a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
    OverTarget,
    Dropped,
    Left,
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Dragging => write!(f, "dragging"),
            Self::OverTarget => write!(f, "over a target"),
            Self::Dropped => write!(f, "dropped"),
            Self::Left => write!(f, "outside any target"),
        }
    }
}

impl GestureState {
    /// Checks if a gesture may move from this phase to `target`
    pub fn can_transition_to(&self, target: GestureState) -> bool {
        use GestureState::*;

        match (self, target) {
            (Idle, Dragging) => true,

            // Drag over repeats while the pointer moves inside a target
            (Dragging, OverTarget) => true,
            (OverTarget, OverTarget) => true,
            (Left, OverTarget) => true,

            (OverTarget, Dropped) => true,
            (OverTarget, Left) => true,

            // Drag end or browser cancel
            (Dragging | OverTarget | Left | Dropped, Idle) => true,

            _ => false,
        }
    }
}

/// Drives one drag gesture from a source to at most one drop.
#[derive(Debug)]
pub struct DragGesture {
    state: GestureState,
    transfer: DataTransfer,
    accepted: bool,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new()
    }
}

impl DragGesture {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
            transfer: DataTransfer::new(),
            accepted: false,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn transfer(&self) -> &DataTransfer {
        &self.transfer
    }

    /// Lets `source` fill the transfer payload
    pub fn start(&mut self, source: &dyn Draggable) -> Result<()> {
        self.check(GestureState::Dragging, "start dragging")?;

        let mut event = DragEvent::new(DataTransfer::new());
        source.drag_start(&mut event)?;
        self.transfer = event.data_transfer.unwrap_or_default();
        self.enter(GestureState::Dragging);
        Ok(())
    }

    /// Moves over `target`; returns whether the target accepts a drop
    pub fn over(&mut self, target: &dyn DragTarget) -> Result<bool> {
        self.check(GestureState::OverTarget, "drag over")?;

        let mut event = DragEvent::new(self.transfer.clone());
        target.drag_over(&mut event)?;
        self.accepted = event.default_prevented();
        self.enter(GestureState::OverTarget);
        Ok(self.accepted)
    }

    /// Releases over `target`.
    ///
    /// A target that did not accept the last drag over never sees the drop;
    /// the gesture counts as having left it and `Ok(false)` is returned.
    pub fn drop(&mut self, target: &dyn DragTarget) -> Result<bool> {
        if self.state != GestureState::OverTarget {
            return Err(self.invalid("drop"));
        }
        if !self.accepted {
            trace!("drop ignored, target did not accept the drag");
            self.state = GestureState::Left;
            return Ok(false);
        }

        self.check(GestureState::Dropped, "drop")?;
        let mut event = DragEvent::new(self.transfer.clone());
        target.drag_drop(&mut event)?;
        self.enter(GestureState::Dropped);
        Ok(true)
    }

    pub fn leave(&mut self, target: &dyn DragTarget) -> Result<()> {
        self.check(GestureState::Left, "leave")?;
        target.drag_leave(&DragEvent::new(self.transfer.clone()))?;
        self.accepted = false;
        self.enter(GestureState::Left);
        Ok(())
    }

    /// Finishes the gesture and notifies the source
    pub fn end(&mut self, source: &dyn Draggable) -> Result<()> {
        self.check(GestureState::Idle, "end")?;
        source.drag_end(&DragEvent::new(self.transfer.clone()))?;
        self.accepted = false;
        self.enter(GestureState::Idle);
        Ok(())
    }

    /// Abandons the gesture without notifying anyone
    pub fn cancel(&mut self) {
        trace!("drag gesture cancelled while {}", self.state);
        self.state = GestureState::Idle;
        self.accepted = false;
    }

    /// Handlers run between `check` and `enter`, so a failing handler leaves
    /// the gesture where it was
    fn check(&self, next: GestureState, event: &str) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(self.invalid(event));
        }
        Ok(())
    }

    fn enter(&mut self, next: GestureState) {
        trace!("drag gesture {} -> {}", self.state, next);
        self.state = next;
    }

    fn invalid(&self, event: &str) -> BoardError {
        BoardError::InvalidGesture {
            from: self.state,
            event: event.to_string(),
        }
    }
}
