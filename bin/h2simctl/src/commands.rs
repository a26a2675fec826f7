//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Command-line runner for monthly solar-hydrogen balance simulations."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use h2sim_calc_engine::{
    io::{load_parameters_from_file, load_profile_from_file, parameters_to_toml},
    run_simulation_with_options, MonthlyProfile, Parameters, RunOptions, SimulationReport,
};
use h2sim_common::{AppConfig, EnergyUnit};
use h2sim_logging::{h2_info, LogContext};

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Monthly profile (CSV with month/solar/demand columns, or JSON).
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,
    /// Parameter file (TOML, YAML or JSON). Unit defaults apply when omitted.
    #[arg(long = "params", value_name = "FILE")]
    parameters: Option<PathBuf>,
    /// Energy unit of the profile when its columns carry none.
    #[arg(long, value_name = "UNIT")]
    unit: Option<EnergyUnit>,
    /// Directory for the exported reports.
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Scenario label used in logs and reports.
    #[arg(long)]
    scenario: Option<String>,
    /// Print the annual summary as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl RunCommand {
    pub fn execute(self, config: &AppConfig) -> Result<()> {
        let sim = &config.simulation;
        let profile_path = self
            .profile
            .or_else(|| sim.profile.clone())
            .ok_or_else(|| anyhow!("no profile given; pass --profile or set simulation.profile"))?;
        let hint = self.unit.unwrap_or(sim.energy_unit);
        let loaded = load_profile_from_file(&profile_path, hint)
            .with_context(|| format!("failed to load profile {}", profile_path.display()))?;

        let parameters = match self.parameters.or_else(|| sim.parameters.clone()) {
            Some(path) => load_parameters_from_file(&path)
                .with_context(|| format!("failed to load parameters {}", path.display()))?,
            None => Parameters::for_unit(loaded.unit),
        };

        let scenario = self.scenario.unwrap_or_else(|| {
            profile_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| sim.scenario_name())
        });
        let output = self.output.unwrap_or_else(|| sim.output_dir.clone());

        let report = execute_run(
            &loaded.profile,
            &parameters,
            RunOptions::new(scenario, loaded.unit).with_output_dir(&output),
        )?;
        print_report(&report, &output, self.json)
    }
}

#[derive(Debug, Args)]
pub struct DemoCommand {
    /// Energy unit for the demo profile and its default parameters.
    #[arg(long, value_name = "UNIT")]
    unit: Option<EnergyUnit>,
    /// Constant monthly solar yield (defaults to the unit's reference value).
    #[arg(long, value_name = "ENERGY")]
    solar: Option<f64>,
    /// Directory for the exported reports.
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Print the annual summary as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl DemoCommand {
    pub fn execute(self, config: &AppConfig) -> Result<()> {
        let unit = self.unit.unwrap_or(config.simulation.energy_unit);
        let solar = self
            .solar
            .unwrap_or_else(|| Parameters::default_solar_per_month(unit));
        let output = self
            .output
            .unwrap_or_else(|| config.simulation.output_dir.clone());

        let report = execute_run(
            &MonthlyProfile::demo(unit, solar),
            &Parameters::for_unit(unit),
            RunOptions::new("demo", unit).with_output_dir(&output),
        )?;
        print_report(&report, &output, self.json)
    }
}

#[derive(Debug, Args)]
pub struct DefaultsCommand {
    /// Energy unit the defaults are expressed in.
    #[arg(long, value_name = "UNIT")]
    unit: Option<EnergyUnit>,
}

impl DefaultsCommand {
    pub fn execute(self, config: &AppConfig) -> Result<()> {
        let unit = self.unit.unwrap_or(config.simulation.energy_unit);
        print!("{}", parameters_to_toml(&Parameters::for_unit(unit))?);
        Ok(())
    }
}

fn execute_run(
    profile: &MonthlyProfile,
    parameters: &Parameters,
    options: RunOptions,
) -> Result<SimulationReport> {
    let report = run_simulation_with_options(profile, parameters, &options)
        .with_context(|| format!("simulation '{}' failed", options.scenario))?;
    h2_info!(
        context = LogContext::new().with_scenario(&report.scenario),
        "run {} finished",
        report.run_id
    );
    Ok(report)
}

fn print_report(report: &SimulationReport, output: &Path, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
        return Ok(());
    }

    let unit = report.energy_unit.column_suffix();
    println!(
        "{:<6} {:<6} {:>12} {:>12} {:>12} {:>12} {:>12} {:>16}",
        "month",
        "season",
        format!("import_{unit}"),
        format!("export_{unit}"),
        "h2_kg",
        "stored_kg",
        "revenue",
        "cumulative"
    );
    for month in report.table.iter() {
        println!(
            "{:<6} {:<6} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>16.2}",
            month.month,
            month.season.to_string(),
            month.grid_import,
            month.grid_export,
            month.hydrogen_mass,
            month.stored_h2,
            month.total_revenue_converted,
            month.cumulative_cashflow
        );
    }

    let summary = &report.summary;
    println!();
    println!("hydrogen produced   {:>14.2} kg", summary.total_hydrogen_mass);
    println!("oxygen produced     {:>14.2} kg", summary.total_oxygen_mass);
    println!("final storage       {:>14.2} kg", summary.final_storage);
    println!("annual revenue      {:>14.2}", summary.total_revenue_converted);
    println!("net CO2 avoided     {:>14.2} t", summary.net_co2_avoided() / 1000.0);
    println!(
        "payback month       {:>14}",
        summary.payback_month.as_deref().unwrap_or("none")
    );
    for warning in &report.table.warnings {
        println!("warning: {warning}");
    }
    println!("reports written to {}", output.display());
    Ok(())
}
