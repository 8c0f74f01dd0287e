//! Taskprof turns the task history of a [Taskcluster] task group into a profile that the
//! [Firefox Profiler] can open, so that a whole CI run can be inspected on a timeline.
//!
//! Every task becomes one _marker_: a named interval on the marker chart, grouped by the task's
//! category (the part of its name before the first `/`) and labelled with the job name (the part
//! after it). The profile carries a single synthetic thread with two empty samples whose only
//! purpose is to give the profiler a time range to draw in.
//!
//! # Command-line use
//!
//! ## Fetching the task data
//!
//! Download the task list of a decision task with the `taskcluster` client:
//!
//! ```console
//! $ export TASKCLUSTER_ROOT_URL="https://firefox-ci-tc.services.mozilla.com/"
//! $ taskcluster api queue listTaskGroup <decision task id> > tasks.json
//! ```
//!
//! ## Serving the profile
//!
//! Start the server next to `tasks.json`:
//!
//! ```console
//! $ taskprof-serve
//! ```
//!
//! and load `http://localhost:8181/tasks` in the Firefox Profiler ("Load a profile from a URL").
//! The file is re-read on every request, so replacing `tasks.json` does not need a restart. Any
//! other path is served from the static directory (`./static` by default).
//!
//! Setting `TASKPROF_ENV=production` binds ports 80 and 443 instead, the latter using `ssl.crt`
//! and `ssl.key` from the working directory. Neither file is ever served as a static file.
//!
//! ## Converting once
//!
//! ```console
//! $ taskprof-convert tasks.json > profile.json
//! ```
//!
//! # Programmatic access
//!
//! The conversion lives in [`convert`]; [`convert::from_file`] returns a [`profile::Profile`]
//! that serializes to the profiler's processed format with `serde_json`.
//!
//!   [Taskcluster]: https://docs.taskcluster.net/
//!   [Firefox Profiler]: https://profiler.firefox.com/

#![deny(missing_docs)]

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

#[macro_use]
extern crate log;

mod error;

pub use error::ProfileError;

/// The task-history export read as input.
pub mod tasks;

/// The processed profile format understood by the Firefox Profiler.
pub mod profile;

/// Conversion from a task list to a profile.
///
/// See the [crate-level documentation] for details.
///
///   [crate-level documentation]: ../index.html
pub mod convert;

/// The HTTP front-end serving converted profiles and static files.
#[cfg(feature = "server")]
pub mod server;
