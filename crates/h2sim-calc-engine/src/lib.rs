//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Monthly energy, hydrogen storage, emission and cashflow engine."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
pub mod api;
pub mod balance;
pub mod engine;
pub mod errors;
pub mod io;
pub mod model;
pub mod recurrence;
pub mod reports;
pub mod season;
pub mod summary;
pub mod validation;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use h2sim_common::EnergyUnit;
use h2sim_logging::{h2_debug, h2_info, h2_warn, log_run_event, LogContext, RunOutcome};
use uuid::Uuid;

use crate::reports::ReportExporter;

pub use engine::simulate;
pub use errors::{CalcEngineError, RangeError, Result, SchemaError, ValidationError};
pub use model::{
    DieselCo2Method, HydrogenMode, MonthlyProfile, MonthlyRecord, MonthlyResult, Parameters,
    SeasonalProduction, SimulationTable, SimulationWarning,
};
pub use season::Season;
pub use summary::AnnualSummary;

/// One completed run: inputs, result table and annual reductions.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub scenario: String,
    pub energy_unit: EnergyUnit,
    pub parameters: Parameters,
    pub table: SimulationTable,
    pub summary: AnnualSummary,
}

impl SimulationReport {
    pub fn exporter(&self) -> ReportExporter<'_> {
        ReportExporter::new(self)
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scenario: String,
    pub energy_unit: EnergyUnit,
    /// Reports are written here when set.
    pub output_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scenario: "default".to_owned(),
            energy_unit: EnergyUnit::default(),
            output_dir: None,
        }
    }
}

impl RunOptions {
    pub fn new(scenario: impl Into<String>, energy_unit: EnergyUnit) -> Self {
        Self {
            scenario: scenario.into(),
            energy_unit,
            output_dir: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

/// Runs a simulation without writing reports.
///
/// For exporting usage, set [`RunOptions::output_dir`] and call
/// [`run_simulation_with_options`].
pub fn run_simulation(
    profile: &MonthlyProfile,
    params: &Parameters,
    options: &RunOptions,
) -> Result<SimulationReport> {
    let options = RunOptions {
        output_dir: None,
        ..options.clone()
    };
    run_simulation_with_options(profile, params, &options)
}

/// Validates, simulates, summarises and optionally exports one run.
pub fn run_simulation_with_options(
    profile: &MonthlyProfile,
    params: &Parameters,
    options: &RunOptions,
) -> Result<SimulationReport> {
    let context = LogContext::new()
        .with_scenario(&options.scenario)
        .with_mode(params.hydrogen_mode.label());

    h2_info!(
        context = context,
        "Running monthly simulation over {} months ({})",
        profile.len(),
        options.energy_unit
    );

    let table = match simulate(profile, params) {
        Ok(table) => table,
        Err(err) => {
            log_run_event(
                Some(&context),
                "simulation.rejected",
                &err.to_string(),
                RunOutcome::Fault,
            );
            return Err(err.into());
        }
    };

    for month in table.iter() {
        h2_debug!(
            context = context.clone().with_month(&month.month),
            "balanced: {:.2} kg hydrogen, {:.2} kg stored, cumulative cashflow {:.2}",
            month.hydrogen_mass,
            month.stored_h2,
            month.cumulative_cashflow
        );
    }

    for warning in &table.warnings {
        match warning {
            SimulationWarning::StorageFloorReached { month, .. } => {
                h2_warn!(context = context.clone().with_month(month), "{warning}")
            }
            SimulationWarning::FractionOverAllocation { .. } => {
                h2_warn!(context = context, "{warning}")
            }
        }
    }

    let summary = AnnualSummary::from_table(&table, params);
    let report = SimulationReport {
        run_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        scenario: options.scenario.clone(),
        energy_unit: options.energy_unit,
        parameters: params.clone(),
        table,
        summary,
    };

    if let Some(dir) = &options.output_dir {
        report.exporter().export_all(dir)?;
    }

    log_run_event(
        Some(&context),
        "simulation.completed",
        &format!(
            "{:.2} kg hydrogen, final storage {:.2} kg, {} warning(s)",
            report.summary.total_hydrogen_mass,
            report.summary.final_storage,
            report.table.warnings.len()
        ),
        RunOutcome::Success,
    );

    Ok(report)
}
