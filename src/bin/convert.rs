use std::io;
use std::path::PathBuf;
use std::process;

use chrono_tz::Tz;
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::error;
use taskprof::convert::{self, Options, DEFAULT_TIMEZONE};

#[derive(Debug, Parser)]
#[command(name = "taskprof-convert", about)]
struct Opt {
    // Flags...
    /// Indent the output
    #[arg(long = "pretty")]
    pretty: bool,

    /// Silence all log output, including the error reported on failure
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Verbose logging mode (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    // Options...
    /// Time zone of the dates and times shown in the profile [default: Europe/Paris]
    #[arg(long = "timezone", value_name = "TZ")]
    timezone: Option<Tz>,

    // Args...
    /// Task group export (`taskcluster api queue listTaskGroup`), or STDIN if not specified
    #[arg(value_name = "PATH")]
    infile: Option<PathBuf>,
}

impl Opt {
    fn into_parts(self) -> (Option<PathBuf>, bool, Options) {
        (
            self.infile,
            self.pretty,
            Options {
                timezone: self.timezone.unwrap_or(DEFAULT_TIMEZONE),
            },
        )
    }
}

fn main() {
    let opt = Opt::parse();

    // Initialize logger
    if !opt.quiet {
        env_logger::Builder::from_env(Env::default().default_filter_or(match opt.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }))
        .format_timestamp(None)
        .init();
    }

    let (infile, pretty, options) = opt.into_parts();
    let result = convert::from_file(&options, infile.as_ref())
        .and_then(|profile| convert::write_profile(&profile, io::stdout().lock(), pretty));
    if let Err(e) = result {
        error!("profile: {}", e);
        process::exit(1);
    }
}
