//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the simulation tooling."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::logging::LogFormat;

const PROFILE_EXTENSIONS: &[&str] = &["csv", "json"];
const PARAMETER_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Energy unit the monthly profile and the energy-denominated parameters use.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EnergyUnit {
    #[default]
    Mwh,
    Kwh,
}

impl EnergyUnit {
    /// Column suffix used by profile tables expressed in this unit.
    pub fn column_suffix(&self) -> &'static str {
        match self {
            EnergyUnit::Mwh => "mwh",
            EnergyUnit::Kwh => "kwh",
        }
    }

    /// Multiplier converting one unit into kWh.
    pub fn kwh_factor(&self) -> f64 {
        match self {
            EnergyUnit::Mwh => 1000.0,
            EnergyUnit::Kwh => 1.0,
        }
    }
}

/// Primary configuration object for the H2Sim tooling.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "H2SIM_CONFIG";

    /// Load configuration from disk, respecting the `H2SIM_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Some(path) = Self::env_override() {
            let config = Self::from_path(&path)?;
            return Ok(LoadedAppConfig {
                config,
                source: Some(path),
            });
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Like [`AppConfig::load_with_source`] but falls back to defaults when no
    /// file exists. A file that exists and fails to parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        let any_present =
            Self::env_override().is_some() || candidates.iter().any(|c| c.as_ref().exists());
        if any_present {
            return Self::load_with_source(candidates);
        }
        debug!("no configuration file present, using defaults");
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    fn env_override() -> Option<PathBuf> {
        std::env::var(Self::ENV_CONFIG_PATH)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the rolling log file. No file is written when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub energy_unit: EnergyUnit,
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub profile: Option<PathBuf>,
    #[serde(default)]
    pub parameters: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            energy_unit: EnergyUnit::default(),
            scenario: None,
            profile: None,
            parameters: None,
            output_dir: default_output_dir(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("simulation.output_dir must not be empty"));
        }
        if let Some(profile) = &self.profile {
            check_extension("simulation.profile", profile, PROFILE_EXTENSIONS)?;
        }
        if let Some(parameters) = &self.parameters {
            check_extension("simulation.parameters", parameters, PARAMETER_EXTENSIONS)?;
        }
        Ok(())
    }

    /// Scenario label used in logs and reports.
    pub fn scenario_name(&self) -> String {
        self.scenario
            .clone()
            .or_else(|| {
                self.profile
                    .as_ref()
                    .and_then(|p| p.file_stem())
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "default".to_owned())
    }
}

fn check_extension(field: &str, path: &Path, allowed: &[&str]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(anyhow!(
            "{} {} must use one of the extensions: {}",
            field,
            path.display(),
            allowed.join(", ")
        )),
    }
}
