//! Diesel schema for project persistence.

diesel::table! {
    /// Project aggregate roots.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Project name.
        name -> Text,
        /// Free-form description.
        description -> Text,
        /// Start timestamp.
        started_at -> Nullable<Timestamptz>,
        /// Cancellation timestamp.
        cancelled_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        finished_at -> Nullable<Timestamptz>,
        /// Forecast completion date.
        forecasted_at -> Nullable<Timestamptz>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
    }
}

diesel::table! {
    /// Tasks owned by a project, ordered by position.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Zero-based position within the project.
        position -> Int4,
        /// Task name.
        name -> Text,
        /// Free-form description.
        description -> Text,
        /// Start timestamp.
        started_at -> Nullable<Timestamptz>,
        /// Cancellation timestamp.
        cancelled_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        finished_at -> Nullable<Timestamptz>,
        /// Forecast completion date.
        forecasted_at -> Nullable<Timestamptz>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
