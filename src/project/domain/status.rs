//! Lifecycle status shared by projects and tasks.

use super::ParseLifecycleStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a project or task.
///
/// Statuses only move forward: `Pending` may start or terminate, `Active`
/// may terminate, and `Cancelled` / `Completed` admit no further
/// transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// Created but not yet started.
    #[default]
    Pending,
    /// Work is under way.
    Active,
    /// Abandoned before completion.
    Cancelled,
    /// Finished.
    Completed,
}

impl LifecycleStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` for statuses with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Returns `true` while work is still outstanding.
    #[must_use]
    pub const fn is_unresolved(self) -> bool {
        !self.is_terminal()
    }

    /// Returns the status reached by applying `action`, or `None` when the
    /// action is not permitted from this status.
    ///
    /// [`LifecycleAction::AddTask`] and [`LifecycleAction::StartTask`] leave
    /// the status unchanged but are only permitted while the status is
    /// unresolved.
    #[must_use]
    pub const fn after(self, action: LifecycleAction) -> Option<Self> {
        match (self, action) {
            (Self::Pending, LifecycleAction::Start) => Some(Self::Active),
            (Self::Pending | Self::Active, LifecycleAction::Cancel) => Some(Self::Cancelled),
            (Self::Pending | Self::Active, LifecycleAction::Complete) => Some(Self::Completed),
            (
                Self::Pending | Self::Active,
                LifecycleAction::AddTask | LifecycleAction::StartTask,
            ) => Some(self),
            _ => None,
        }
    }

    /// Returns `true` when `action` is permitted from this status.
    #[must_use]
    pub const fn permits(self, action: LifecycleAction) -> bool {
        self.after(action).is_some()
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LifecycleStatus {
    type Error = ParseLifecycleStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseLifecycleStatusError(value.to_owned())),
        }
    }
}

/// Guarded lifecycle operation, used for transition checks and error
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Move from pending to active.
    Start,
    /// Terminate without finishing.
    Cancel,
    /// Terminate as finished.
    Complete,
    /// Attach a task to a project.
    AddTask,
    /// Start one of a project's tasks.
    StartTask,
}

impl LifecycleAction {
    /// Returns the verb used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
            Self::AddTask => "add a task to",
            Self::StartTask => "start a task in",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
