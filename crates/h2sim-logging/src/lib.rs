//! ---
//! ems_section: "03-persistence-logging"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Structured logging adapters for simulation runs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Log context and macros shared by the engine pipeline and the CLI.

use tracing::Level;

pub mod macros;

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Scenario or input file the run was started for.
    pub scenario: Option<&'a str>,
    /// Month label the event refers to.
    pub month: Option<&'a str>,
    /// Hydrogen production mode (energy-derived, seasonal-fixed).
    pub mode: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a scenario name.
    pub fn with_scenario(mut self, scenario: &'a str) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Attach a month label.
    pub fn with_month(mut self, month: &'a str) -> Self {
        self.month = Some(month);
        self
    }

    /// Attach a production mode descriptor.
    pub fn with_mode(mut self, mode: &'a str) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Outcome attached to run lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run produced a result table.
    Success,
    /// The run was rejected or aborted.
    Fault,
}

impl RunOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Success => "success",
            RunOutcome::Fault => "fault",
        }
    }
}

/// Emit a standardized run event with a success/fault outcome.
pub fn log_run_event(context: Option<&LogContext>, event: &str, message: &str, outcome: RunOutcome) {
    let ctx = context.cloned().unwrap_or_default();
    let scenario = ctx.scenario.unwrap_or("");
    let month = ctx.month.unwrap_or("");
    let mode = ctx.mode.unwrap_or("");
    // `tracing::event!` needs a constant level, so branch per outcome.
    match outcome {
        RunOutcome::Success => tracing::event!(
            Level::INFO,
            event,
            outcome = outcome.as_str(),
            scenario,
            month,
            mode,
            message = %message
        ),
        RunOutcome::Fault => tracing::event!(
            Level::ERROR,
            event,
            outcome = outcome.as_str(),
            scenario,
            month,
            mode,
            message = %message
        ),
    }
}
