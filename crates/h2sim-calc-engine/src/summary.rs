//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Monthly balance routines for solar-hydrogen planning."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

use crate::model::{MonthlyResult, Parameters, SimulationTable};

const KG_PER_TONNE: f64 = 1000.0;

/// Annual reductions over a result table.
///
/// Native-currency totals are converted by dividing the annual sum by the
/// exchange rate, matching how the monthly converted revenue is derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnualSummary {
    pub months: usize,
    pub mean_solar_energy: f64,
    pub mean_demand_energy: f64,
    pub mean_grid_import: f64,
    pub total_grid_import: f64,
    pub total_grid_export: f64,
    pub total_electrolyzer_energy: f64,
    pub mean_hydrogen_mass: f64,
    pub total_hydrogen_mass: f64,
    pub mean_oxygen_mass: f64,
    pub total_oxygen_mass: f64,
    pub total_water_consumed: f64,
    pub total_fuel_cell_electricity: f64,
    pub total_h2_to_refuel: f64,
    pub o2_revenue_native: f64,
    pub h2_revenue_native: f64,
    pub electricity_avoided_native: f64,
    pub total_revenue_native: f64,
    pub o2_revenue_converted: f64,
    pub h2_revenue_converted: f64,
    pub electricity_avoided_converted: f64,
    pub total_revenue_converted: f64,
    pub mean_monthly_revenue_converted: f64,
    pub total_co2_from_import: f64,
    pub total_co2_avoided_export: f64,
    pub total_co2_avoided_diesel: f64,
    pub annual_diesel_cost_avoided: f64,
    pub final_storage: f64,
    pub final_cumulative_cashflow: f64,
    pub capex: f64,
    /// First month whose cumulative cashflow is non-negative.
    pub payback_month: Option<String>,
}

impl AnnualSummary {
    pub fn from_table(table: &SimulationTable, params: &Parameters) -> Self {
        let rows = &table.months;
        let sum = |field: fn(&MonthlyResult) -> f64| rows.iter().map(field).sum::<f64>();
        let mean = |total: f64| {
            if rows.is_empty() {
                0.0
            } else {
                total / rows.len() as f64
            }
        };

        let total_hydrogen_mass = sum(|m| m.hydrogen_mass);
        let total_oxygen_mass = sum(|m| m.oxygen_mass);
        let total_grid_import = sum(|m| m.grid_import);
        let o2_revenue_native = sum(|m| m.o2_revenue);
        let h2_revenue_native = sum(|m| m.h2_revenue);
        let electricity_avoided_native = sum(|m| m.electricity_avoided_revenue);
        let total_revenue_native = sum(|m| m.total_revenue_native);
        let total_revenue_converted = sum(|m| m.total_revenue_converted);

        Self {
            months: rows.len(),
            mean_solar_energy: mean(sum(|m| m.solar_energy)),
            mean_demand_energy: mean(sum(|m| m.demand_energy)),
            mean_grid_import: mean(total_grid_import),
            total_grid_import,
            total_grid_export: sum(|m| m.grid_export),
            total_electrolyzer_energy: sum(|m| m.electrolyzer_energy),
            mean_hydrogen_mass: mean(total_hydrogen_mass),
            total_hydrogen_mass,
            mean_oxygen_mass: mean(total_oxygen_mass),
            total_oxygen_mass,
            total_water_consumed: sum(|m| m.water_consumed),
            total_fuel_cell_electricity: sum(|m| m.fuel_cell_electricity),
            total_h2_to_refuel: sum(|m| m.h2_to_refuel),
            o2_revenue_native,
            h2_revenue_native,
            electricity_avoided_native,
            total_revenue_native,
            o2_revenue_converted: o2_revenue_native / params.exchange_rate,
            h2_revenue_converted: h2_revenue_native / params.exchange_rate,
            electricity_avoided_converted: electricity_avoided_native / params.exchange_rate,
            total_revenue_converted,
            mean_monthly_revenue_converted: mean(total_revenue_converted),
            total_co2_from_import: sum(|m| m.co2_from_import),
            total_co2_avoided_export: sum(|m| m.co2_avoided_export),
            total_co2_avoided_diesel: sum(|m| m.co2_avoided_diesel),
            annual_diesel_cost_avoided: sum(|m| m.diesel_cost_avoided),
            final_storage: table.final_storage().unwrap_or(params.initial_h2_storage),
            final_cumulative_cashflow: table
                .final_cumulative_cashflow()
                .unwrap_or(-params.capex),
            capex: params.capex,
            payback_month: rows
                .iter()
                .find(|m| m.cumulative_cashflow >= 0.0)
                .map(|m| m.month.clone()),
        }
    }

    pub fn co2_from_import_tonnes(&self) -> f64 {
        self.total_co2_from_import / KG_PER_TONNE
    }

    pub fn co2_avoided_export_tonnes(&self) -> f64 {
        self.total_co2_avoided_export / KG_PER_TONNE
    }

    pub fn co2_avoided_diesel_tonnes(&self) -> f64 {
        self.total_co2_avoided_diesel / KG_PER_TONNE
    }

    pub fn net_co2_avoided(&self) -> f64 {
        self.total_co2_avoided_export + self.total_co2_avoided_diesel - self.total_co2_from_import
    }
}
