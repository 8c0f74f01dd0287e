use std::io;
use std::path::PathBuf;

use chrono_tz::Tz;
use clap::{ArgAction, Parser};
use env_logger::Env;
use taskprof::convert::{self, DEFAULT_TIMEZONE};
use taskprof::server::{self, Config, Mode, DEFAULT_STATIC_DIR, DEFAULT_TASKS_FILE};

#[derive(Debug, Parser)]
#[command(
    name = "taskprof-serve",
    about,
    after_help = "\
Fetch the task data with the taskcluster client, e.g.:
    TASKCLUSTER_ROOT_URL=https://firefox-ci-tc.services.mozilla.com/ \\
        taskcluster api queue listTaskGroup <decision task id> > tasks.json
then load http://localhost:8181/tasks in the Firefox Profiler.

Set TASKPROF_ENV=production to listen on ports 80 and 443 (using ./ssl.crt and ./ssl.key)."
)]
struct Opt {
    // Flags...
    /// Silence all log output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Verbose logging mode (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    // Options...
    /// Task group export to convert on every request
    #[arg(long = "tasks", default_value = DEFAULT_TASKS_FILE, value_name = "PATH")]
    tasks: PathBuf,

    /// Directory serving every path other than /tasks
    #[arg(long = "static-dir", default_value = DEFAULT_STATIC_DIR, value_name = "DIR")]
    static_dir: PathBuf,

    /// Time zone of the dates and times shown in the profile [default: Europe/Paris]
    #[arg(long = "timezone", value_name = "TZ")]
    timezone: Option<Tz>,
}

impl Opt {
    fn into_config(self) -> Config {
        Config {
            mode: Mode::from_env(),
            tasks: self.tasks,
            static_dir: self.static_dir,
            options: convert::Options {
                timezone: self.timezone.unwrap_or(DEFAULT_TIMEZONE),
            },
            ..Default::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let opt = Opt::parse();

    // Initialize logger
    if !opt.quiet {
        env_logger::Builder::from_env(Env::default().default_filter_or(match opt.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }))
        .init();
    }

    server::serve(opt.into_config()).await
}
