//! One run of the reporter: search, disambiguate, fetch, render.
//!
//! Every network call shares the caller's [`RunContext`]; the selection prompt
//! runs outside it so a user can take as long as they like.

use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::{
    context::RunContext,
    disambiguate::{Resolution, decide},
    error::RunError,
    model::Location,
    provider::{LocationProvider, WeatherProvider},
    render::write_report,
};

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Reported(Location),
    NotFound,
}

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Collaborators of a run. Streams are generic so tests can use buffers.
pub struct Pipeline<'a> {
    pub geocoding: &'a dyn LocationProvider,
    pub weather: &'a dyn WeatherProvider,
    pub interactive: bool,
}

impl Pipeline<'_> {
    pub async fn run<R, W>(
        &self,
        ctx: &RunContext,
        query: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<Outcome, RunError>
    where
        R: BufRead,
        W: Write,
    {
        let candidates = self
            .geocoding
            .search(ctx, query)
            .await
            .map_err(RunError::Search)?;

        let resolution = decide(&candidates, self.interactive, input, output)
            .map_err(RunError::Selection)?;
        let location = match resolution {
            Resolution::NoMatch => {
                info!(query, "no location matched");
                writeln!(output, "Location not found: {query}")
                    .map_err(RunError::Render)?;
                return Ok(Outcome::NotFound);
            }
            Resolution::Resolved(location) => location,
        };

        info!(
            id = location.id,
            name = %location.name,
            latitude = location.latitude,
            longitude = location.longitude,
            "location resolved"
        );

        let measurement = self
            .weather
            .current_weather(ctx, location.latitude, location.longitude)
            .await
            .map_err(RunError::Weather)?;

        write_report(output, &location, &measurement)
            .map_err(RunError::Render)?;

        Ok(Outcome::Reported(location))
    }

    /// Runs and reports failures on `errors`, returning the process exit code.
    pub async fn execute<R, W, E>(
        &self,
        ctx: &RunContext,
        query: &str,
        input: &mut R,
        output: &mut W,
        errors: &mut E,
    ) -> u8
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        match self.run(ctx, query, input, output).await {
            Ok(_) => EXIT_SUCCESS,
            Err(err) => {
                warn!(error = %err, "run failed");
                let _ = writeln!(errors, "{err}");
                EXIT_FAILURE
            }
        }
    }
}
