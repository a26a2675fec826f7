//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the simulation tooling."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Shared primitives for the H2Sim workspace.
//! This crate exposes configuration loading, tracing initialisation and
//! version metadata consumed by the engine pipeline and the CLI.

pub mod config;
pub mod logging;
pub mod version;

pub use config::{AppConfig, EnergyUnit, LoadedAppConfig, LoggingConfig, SimulationConfig};
pub use logging::{init_tracing, LogFormat};
pub use version::VersionInfo;
