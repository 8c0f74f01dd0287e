use std::io;

use thiserror::Error;

/// Everything that can go wrong while building a profile.
///
/// The HTTP front-end does not tell these apart: any of them fails the request with the
/// error's text.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The task file could not be read.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The task file is not valid JSON, or does not have the expected shape.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// A task has never been run.
    #[error("task {task:?} has no runs")]
    MissingRun {
        /// Name of the offending task.
        task: String,
    },

    /// A task's first run lacks a timestamp.
    #[error("task {task:?} has no `{field}` time in its first run")]
    MissingTimestamp {
        /// Name of the offending task.
        task: String,
        /// Either `started` or `resolved`.
        field: &'static str,
    },

    /// There is nothing to put on a timeline.
    #[error("no tasks found")]
    NoTasks,
}
