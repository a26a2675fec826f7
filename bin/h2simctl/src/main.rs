//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Command-line runner for monthly solar-hydrogen balance simulations."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use h2sim_common::{init_tracing, version_info, AppConfig};

mod commands;
mod serve;

const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = ["h2sim.toml", "config/h2sim.toml"];

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "Monthly solar-hydrogen balance simulator",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print extended version information and exit"
    )]
    version: bool,
    /// Configuration file (overrides H2SIM_CONFIG and the default search paths).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Simulate a twelve-month profile loaded from CSV or JSON.
    Run(commands::RunCommand),
    /// Simulate the built-in demo profile.
    Demo(commands::DemoCommand),
    /// Print the default parameter set as TOML.
    Defaults(commands::DefaultsCommand),
    /// Serve the simulation endpoint over HTTP.
    Serve(serve::ServeCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", version_info!().extended());
        return Ok(());
    }
    let Some(command) = cli.command else {
        println!("{}", version_info!().extended());
        println!("run `h2simctl --help` for usage");
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?
            .parse::<AppConfig>()?,
        None => AppConfig::load_or_default(&DEFAULT_CONFIG_CANDIDATES)?.config,
    };
    init_tracing("h2simctl", &config.logging)?;

    match command {
        Commands::Run(cmd) => cmd.execute(&config),
        Commands::Demo(cmd) => cmd.execute(&config),
        Commands::Defaults(cmd) => cmd.execute(&config),
        Commands::Serve(cmd) => cmd.execute(),
    }
}
