use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ProfileError;

/// The output of `taskcluster api queue listTaskGroup`.
///
/// Only the fields needed to place tasks on a timeline are modelled; everything else in the
/// export is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct TaskGroup {
    /// All tasks of the group, in no particular order.
    pub tasks: Vec<TaskEntry>,
}

/// One element of [`TaskGroup::tasks`].
#[derive(Clone, Debug, Deserialize)]
pub struct TaskEntry {
    /// The task definition.
    pub task: TaskDefinition,
    /// The task's current status, including its runs.
    pub status: TaskStatus,
}

/// The parts of a task definition we care about.
#[derive(Clone, Debug, Deserialize)]
pub struct TaskDefinition {
    /// Human-oriented metadata.
    pub metadata: TaskMetadata,
}

/// Task metadata.
#[derive(Clone, Debug, Deserialize)]
pub struct TaskMetadata {
    /// Task name, conventionally `Category/job`.
    pub name: String,
}

/// Status of a task.
#[derive(Clone, Debug, Deserialize)]
pub struct TaskStatus {
    /// Every attempt at running the task, oldest first.
    #[serde(default)]
    pub runs: Vec<TaskRun>,
}

/// A single attempt at running a task.
#[derive(Clone, Debug, Deserialize)]
pub struct TaskRun {
    /// When a worker picked up the run.
    pub started: Option<DateTime<Utc>>,
    /// When the run finished, successfully or not.
    pub resolved: Option<DateTime<Utc>>,
}

/// A task reduced to what the timeline shows: a name and its time bounds.
///
/// Times are milliseconds since the Unix epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// The full task name.
    pub name: String,
    /// Start of the first run.
    pub start: i64,
    /// End of the first run.
    pub end: i64,
}

impl TryFrom<TaskEntry> for Task {
    type Error = ProfileError;

    fn try_from(entry: TaskEntry) -> Result<Self, Self::Error> {
        let name = entry.task.metadata.name;
        let run = match entry.status.runs.first() {
            Some(run) => run,
            None => return Err(ProfileError::MissingRun { task: name }),
        };
        let start = match run.started {
            Some(started) => started.timestamp_millis(),
            None => {
                return Err(ProfileError::MissingTimestamp {
                    task: name,
                    field: "started",
                })
            }
        };
        let end = match run.resolved {
            Some(resolved) => resolved.timestamp_millis(),
            None => {
                return Err(ProfileError::MissingTimestamp {
                    task: name,
                    field: "resolved",
                })
            }
        };
        Ok(Task { name, start, end })
    }
}

impl Task {
    /// Splits the name into its category and job parts.
    ///
    /// The category is everything before the first `/`, the job everything after it. A name
    /// without a separator is all category and has no job.
    ///
    /// Any further `/` stays in the job: `Test/linux64/opt` gives job `linux64/opt`, not just
    /// `linux64`, so no segment of the name is dropped from the profile.
    pub fn category_and_job(&self) -> (&str, Option<&str>) {
        match self.name.split_once('/') {
            Some((category, job)) => (category, Some(job)),
            None => (&self.name, None),
        }
    }
}

impl TaskGroup {
    /// Projects every entry into a [`Task`], sorted by start time.
    ///
    /// Fails on the first entry that lacks run data.
    pub fn into_tasks(self) -> Result<Vec<Task>, ProfileError> {
        let mut tasks = self
            .tasks
            .into_iter()
            .map(Task::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        tasks.sort_unstable_by_key(|t| t.start);
        Ok(tasks)
    }
}

/// Overall bounds of a set of tasks: the earliest start and the latest end.
///
/// The two are computed independently, since the task that starts first need not be the one
/// that ends last. Returns `None` for an empty set.
pub fn bounds(tasks: &[Task]) -> Option<(i64, i64)> {
    let start = tasks.iter().map(|t| t.start).min()?;
    let end = tasks.iter().map(|t| t.end).max()?;
    Some((start, end))
}
