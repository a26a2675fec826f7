//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Report export for monthly hydrogen balance runs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::{
    fs,
    path::{Path, PathBuf},
};

use h2sim_common::EnergyUnit;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{errors::Result, SimulationReport};

pub const MONTHLY_JSON: &str = "monthly_results.json";
pub const SUMMARY_JSON: &str = "annual_summary.json";
pub const MONTHLY_CSV: &str = "monthly_results.csv";

#[derive(Debug)]
pub struct ReportExporter<'a> {
    report: &'a SimulationReport,
}

impl<'a> ReportExporter<'a> {
    pub fn new(report: &'a SimulationReport) -> Self {
        Self { report }
    }

    /// Writes the JSON envelopes and the CSV table, returning the written paths.
    pub fn export_all(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        let timestamp = self.report.timestamp.to_rfc3339();
        let run_id = self.report.run_id;
        let unit = self.report.energy_unit;

        let monthly = ReportEnvelope::new(
            &timestamp,
            run_id,
            unit,
            monthly_results_schema(),
            &self.report.table,
        );
        let summary = ReportEnvelope::new(
            &timestamp,
            run_id,
            unit,
            annual_summary_schema(),
            &self.report.summary,
        );

        let written = vec![
            output_dir.join(MONTHLY_JSON),
            output_dir.join(SUMMARY_JSON),
            output_dir.join(MONTHLY_CSV),
        ];
        write_json(&written[0], &monthly)?;
        write_json(&written[1], &summary)?;
        self.write_csv(&written[2])?;

        info!(run_id = %run_id, "Reports exported to {}", output_dir.display());
        Ok(written)
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in self.report.table.iter() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a, T: Serialize> {
    timestamp: &'a str,
    run_id: Uuid,
    energy_unit: EnergyUnit,
    schema: serde_json::Value,
    data: &'a T,
}

impl<'a, T: Serialize> ReportEnvelope<'a, T> {
    fn new(
        timestamp: &'a str,
        run_id: Uuid,
        energy_unit: EnergyUnit,
        schema: serde_json::Value,
        data: &'a T,
    ) -> Self {
        Self {
            timestamp,
            run_id,
            energy_unit,
            schema,
            data,
        }
    }
}

fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value)?;
    fs::write(path, serialized)?;
    Ok(())
}

fn monthly_results_schema() -> serde_json::Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "SimulationTable",
        "type": "object",
        "properties": {
            "months": {
                "type": "array",
                "minItems": 12,
                "maxItems": 12,
                "items": {
                    "type": "object",
                    "properties": {
                        "month": {"type": "string"},
                        "season": {"enum": ["hot", "cold"]},
                        "grid_import": {"type": "number", "minimum": 0},
                        "grid_export": {"type": "number", "minimum": 0},
                        "hydrogen_mass": {"type": "number"},
                        "oxygen_mass": {"type": "number"},
                        "stored_h2": {"type": "number", "minimum": 0},
                        "total_revenue_converted": {"type": "number"},
                        "cumulative_cashflow": {"type": "number"}
                    },
                    "required": ["month", "hydrogen_mass", "stored_h2", "cumulative_cashflow"]
                }
            },
            "warnings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "kind": {"enum": ["fraction-over-allocation", "storage-floor-reached"]}
                    },
                    "required": ["kind"]
                }
            }
        },
        "required": ["months"]
    })
}

fn annual_summary_schema() -> serde_json::Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "AnnualSummary",
        "type": "object",
        "properties": {
            "months": {"type": "integer"},
            "total_hydrogen_mass": {"type": "number"},
            "total_oxygen_mass": {"type": "number"},
            "total_revenue_converted": {"type": "number"},
            "total_co2_avoided_diesel": {"type": "number"},
            "final_storage": {"type": "number", "minimum": 0},
            "final_cumulative_cashflow": {"type": "number"},
            "payback_month": {"type": ["string", "null"]}
        },
        "required": [
            "months",
            "total_hydrogen_mass",
            "final_storage",
            "final_cumulative_cashflow"
        ]
    })
}
