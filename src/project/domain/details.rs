//! Descriptive fields shared by projects and tasks.

use chrono::{DateTime, Utc};

/// Partial update of the freely editable fields of a project or task.
///
/// Unset fields are left untouched when the change is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsChange {
    name: Option<String>,
    description: Option<String>,
    forecasted_at: Option<DateTime<Utc>>,
}

impl DetailsChange {
    /// Creates an empty change.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the replacement forecast date.
    #[must_use]
    pub const fn with_forecasted_at(mut self, date: DateTime<Utc>) -> Self {
        self.forecasted_at = Some(date);
        self
    }

    /// Returns `true` when the change would not modify anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.forecasted_at.is_none()
    }

    pub(super) fn into_parts(
        self,
    ) -> (Option<String>, Option<String>, Option<DateTime<Utc>>) {
        (self.name, self.description, self.forecasted_at)
    }
}
