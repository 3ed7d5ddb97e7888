use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use weather_reporter_core::{
    Config, EXIT_FAILURE, EXIT_SUCCESS, OpenMeteoForecast, OpenMeteoGeocoding, Pipeline,
    RunContext,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const COMMIT: &str = match option_env!("WEATHER_REPORTER_COMMIT") {
    Some(c) => c,
    None => "none",
};
const BUILD_DATE: &str = match option_env!("WEATHER_REPORTER_BUILD_DATE") {
    Some(d) => d,
    None => "unknown",
};

/// How long a canceled run gets to unwind before the process exits anyway.
const CANCEL_GRACE: Duration = Duration::from_millis(500);

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-reporter",
    about = "Current weather for a place name",
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version information.
    #[arg(long)]
    pub version: bool,

    /// Config file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log pipeline stages to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Place name; multiple words are joined with spaces.
    #[arg(value_name = "LOCATION", trailing_var_arg = true)]
    pub location: Vec<String>,
}

impl Cli {
    /// The place name as typed, or `None` when the words are all blank.
    pub fn query(&self) -> Option<String> {
        let query = self.location.join(" ");
        (!query.trim().is_empty()).then_some(query)
    }

    pub async fn run(self) -> anyhow::Result<u8> {
        let mut stdout = io::stdout().lock();

        if self.version {
            write_version(&mut stdout)?;
            return Ok(EXIT_SUCCESS);
        }

        let Some(query) = self.query() else {
            writeln!(stdout, "Usage: weather-reporter <location>")?;
            return Ok(EXIT_FAILURE);
        };

        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        debug!(?config, "configuration loaded");

        let geocoding = OpenMeteoGeocoding::from_config(&config)
            .context("Failed to build geocoding client")?;
        let weather = OpenMeteoForecast::from_config(&config)
            .context("Failed to build weather client")?;

        let stdin = io::stdin();
        let pipeline = Pipeline {
            geocoding: &geocoding,
            weather: &weather,
            interactive: stdin.is_terminal(),
        };

        let ctx = RunContext::with_timeout(config.run_timeout());
        cancel_on_ctrl_c(&ctx);

        let (mut input, mut errors) = (stdin.lock(), io::stderr());
        let code = pipeline
            .execute(&ctx, &query, &mut input, &mut stdout, &mut errors)
            .await;

        Ok(code)
    }
}

/// Exit code for a rejected command line: success when clap only printed
/// help, failure for every usage error.
pub fn usage_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

/// Ctrl-C cancels the run's in-flight requests. A blocked selection prompt
/// cannot observe the cancellation, so the process exits after a short grace.
fn cancel_on_ctrl_c(ctx: &RunContext) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, canceling run");
            ctx.cancel();
            tokio::time::sleep(CANCEL_GRACE).await;
            std::process::exit(EXIT_FAILURE.into());
        }
    });
}

fn write_version<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "weather-reporter version {VERSION}")?;
    writeln!(out, "commit: {COMMIT}")?;
    writeln!(out, "built at: {BUILD_DATE}")
}
