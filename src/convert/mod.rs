mod locale;

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use chrono_tz::Tz;

use crate::profile::{MarkerPayload, MarkerSchema, Profile, Samples, Thread};
use crate::tasks::{self, Task, TaskGroup};
use crate::ProfileError;

const READER_CAPACITY: usize = 128 * 1024;

/// Default time zone for dates and times shown in the profile.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;

/// Suffix appended to the date in the profile's title.
const PRODUCT_SUFFIX: &str = " — Task cluster";

/// Name shown where the profiler would show the CPU model.
const CPU_NAME: &str = "Task cluster";

/// Configure the generated profile.
#[derive(Clone, Debug)]
pub struct Options {
    /// Time zone used to render the profile date and the marker start times.
    ///
    /// Default is `Europe/Paris`.
    pub timezone: Tz,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

/// Builds a profile with one marker per task.
///
/// `tasks` must already be sorted by start time, as [`TaskGroup::into_tasks`] returns them;
/// markers are added in the given order. Times in the profile are relative to the earliest
/// task start, which also becomes the profile's start time.
///
/// An empty task list has no time range and is rejected with [`ProfileError::NoTasks`].
pub fn from_tasks(opt: &Options, tasks: &[Task]) -> Result<Profile, ProfileError> {
    let (start_time, end_time) = tasks::bounds(tasks).ok_or(ProfileError::NoTasks)?;

    let mut profile = Profile::default();
    let meta = &mut profile.meta;
    meta.interval = 1;
    meta.start_time = start_time;
    meta.product = format!("{}{}", locale::date(opt.timezone, start_time), PRODUCT_SUFFIX);
    meta.physical_cpus = tasks.len();
    meta.cpu_name = CPU_NAME.to_string();
    meta.marker_schema.push(MarkerSchema::task());

    let mut thread = Thread::default();
    thread.samples = Samples::spanning(end_time - start_time);

    let mut nunnamed = 0;
    for task in tasks {
        let (category, job) = task.category_and_job();
        if job.is_none() {
            nunnamed += 1;
            debug!("Task {:?} has no job name", task.name);
        }
        let payload = MarkerPayload::task(
            locale::time(opt.timezone, task.start),
            job.map(str::to_string),
        );
        thread.add_marker(
            category,
            task.start - start_time,
            Some(task.end - start_time),
            payload,
        );
    }
    if nunnamed != 0 {
        warn!("{} task names had no '/' separating category and job", nunnamed);
    }

    info!(
        "Built profile with {} markers in {} categories",
        thread.markers.len(),
        // "(root)" is not a category
        thread.string_array.len() - 1
    );
    profile.threads = vec![thread];
    Ok(profile)
}

/// Builds a profile from the JSON text of a task-group export.
///
/// See [`TaskGroup`] for the expected input.
pub fn from_slice(opt: &Options, bytes: &[u8]) -> Result<Profile, ProfileError> {
    let group: TaskGroup = serde_json::from_slice(bytes)?;
    from_tasks(opt, &group.into_tasks()?)
}

/// Builds a profile from a reader yielding a task-group export.
pub fn from_reader<R>(opt: &Options, reader: R) -> Result<Profile, ProfileError>
where
    R: Read,
{
    let group: TaskGroup = serde_json::from_reader(reader)?;
    from_tasks(opt, &group.into_tasks()?)
}

/// Builds a profile from a task-group export file, or from STDIN if `infile` is `None`.
pub fn from_file<P>(opt: &Options, infile: Option<P>) -> Result<Profile, ProfileError>
where
    P: AsRef<Path>,
{
    match infile {
        Some(ref path) => {
            let file = File::open(path)?;
            let reader = io::BufReader::with_capacity(READER_CAPACITY, file);
            from_reader(opt, reader)
        }
        None => {
            let stdio = io::stdin();
            let stdio_guard = stdio.lock();
            let reader = io::BufReader::with_capacity(READER_CAPACITY, stdio_guard);
            from_reader(opt, reader)
        }
    }
}

/// Writes `profile` as JSON to `writer`.
pub fn write_profile<W>(profile: &Profile, mut writer: W, pretty: bool) -> Result<(), ProfileError>
where
    W: Write,
{
    if pretty {
        serde_json::to_writer_pretty(&mut writer, profile)?;
    } else {
        serde_json::to_writer(&mut writer, profile)?;
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Phase;

    fn task(name: &str, start: i64, end: i64) -> Task {
        Task {
            name: name.to_string(),
            start,
            end,
        }
    }

    // 2024-01-01T00:00:00Z
    const T0: i64 = 1_704_067_200_000;

    #[test]
    fn single_task() {
        let profile = from_tasks(
            &Options::default(),
            &[task("Build/linux64", T0, T0 + 300_000)],
        )
        .unwrap();

        assert_eq!(profile.meta.start_time, T0);
        assert_eq!(profile.meta.interval, 1);
        assert_eq!(profile.meta.physical_cpus, 1);
        assert_eq!(profile.meta.product, "01/01/2024 — Task cluster");
        assert_eq!(profile.meta.cpu_name, "Task cluster");
        assert_eq!(profile.meta.marker_schema, vec![MarkerSchema::task()]);

        let thread = profile.main_thread().unwrap();
        assert_eq!(thread.samples.time, vec![0, 300_000]);

        let markers = &thread.markers;
        assert_eq!(markers.len(), 1);
        assert_eq!(thread.string_array.get(markers.names()[0]), Some("Build"));
        assert_eq!(markers.start_times(), &[0]);
        assert_eq!(markers.end_times(), &[Some(300_000)]);
        assert_eq!(markers.phases(), &[Phase::Interval]);
        assert_eq!(
            markers.data()[0],
            MarkerPayload::task("01:00:00".to_string(), Some("linux64".to_string()))
        );
    }

    #[test]
    fn span_uses_latest_end() {
        let tasks = [
            task("Build/a", T0, T0 + 10_000),
            task("Build/b", T0 + 1_000, T0 + 50_000),
            task("Test/c", T0 + 2_000, T0 + 3_000),
        ];
        let profile = from_tasks(&Options::default(), &tasks).unwrap();
        let thread = profile.main_thread().unwrap();
        assert_eq!(thread.samples.time, vec![0, 50_000]);
        assert_eq!(thread.markers.start_times(), &[0, 1_000, 2_000]);
        assert_eq!(thread.markers.names(), &[1, 1, 2]);
        assert_eq!(thread.string_array.len(), 3);
    }

    #[test]
    fn no_tasks() {
        match from_tasks(&Options::default(), &[]) {
            Err(ProfileError::NoTasks) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn timezone_applies_to_labels() {
        let opt = Options {
            timezone: chrono_tz::UTC,
        };
        let profile = from_tasks(&opt, &[task("Build/x", T0, T0 + 1)]).unwrap();
        assert_eq!(profile.main_thread().unwrap().markers.data()[0].start_time, "00:00:00");
    }

    #[test]
    fn malformed_json_is_an_error() {
        match from_slice(&Options::default(), b"{\"tasks\": [") {
            Err(ProfileError::Json(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
