//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Monthly balance routines for solar-hydrogen planning."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Sequential carry-forward of stored hydrogen and cumulative cashflow.
//! Months must be folded strictly in calendar order.
use crate::{
    balance::MonthBalance,
    model::{MonthlyResult, Parameters, SimulationWarning},
};

/// Unmet output below this many kg is treated as rounding noise.
const FLOOR_TOLERANCE: f64 = 1e-9;

/// State carried from one month into the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarryState {
    pub stored_h2: f64,
    pub cumulative_cashflow: f64,
}

impl CarryState {
    /// Opening state: initial storage, CAPEX debited before month zero.
    pub fn opening(params: &Parameters) -> Self {
        Self {
            stored_h2: params.initial_h2_storage,
            cumulative_cashflow: -params.capex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub state: CarryState,
    pub monthly_net: f64,
    /// Output that storage could not supply; absorbed by the zero floor.
    pub deficit: f64,
}

pub fn advance(state: CarryState, balance: &MonthBalance, monthly_opex: f64) -> Step {
    let unfloored = state.stored_h2 + balance.hydrogen_mass - balance.storage_output();
    let monthly_net = balance.total_revenue_converted - monthly_opex;
    Step {
        state: CarryState {
            stored_h2: unfloored.max(0.0),
            cumulative_cashflow: state.cumulative_cashflow + monthly_net,
        },
        monthly_net,
        deficit: (-unfloored).max(0.0),
    }
}

/// Folds month balances into result rows, returning any floor warnings.
pub fn carry_forward(
    balances: Vec<MonthBalance>,
    params: &Parameters,
) -> (Vec<MonthlyResult>, Vec<SimulationWarning>) {
    let mut rows = Vec::with_capacity(balances.len());
    let mut warnings = Vec::new();

    balances
        .into_iter()
        .fold(CarryState::opening(params), |state, balance| {
            let step = advance(state, &balance, params.monthly_opex);
            if step.deficit > FLOOR_TOLERANCE {
                warnings.push(SimulationWarning::StorageFloorReached {
                    month: balance.month.clone(),
                    deficit: step.deficit,
                });
            }
            rows.push(into_result(balance, &step));
            step.state
        });

    (rows, warnings)
}

fn into_result(balance: MonthBalance, step: &Step) -> MonthlyResult {
    let storage_output = balance.storage_output();
    MonthlyResult {
        month: balance.month,
        season: balance.season,
        solar_energy: balance.solar_energy,
        demand_energy: balance.demand_energy,
        grid_import: balance.grid_import,
        grid_export: balance.grid_export,
        solar_for_electrolysis: balance.solar_for_electrolysis,
        electrolyzer_energy: balance.electrolyzer_energy,
        hydrogen_mass: balance.hydrogen_mass,
        energy_derived_hydrogen: balance.energy_derived_hydrogen,
        oxygen_mass: balance.oxygen_mass,
        water_consumed: balance.water_consumed,
        h2_to_fuel_cell: balance.h2_to_fuel_cell,
        fuel_cell_electricity: balance.fuel_cell_electricity,
        h2_to_refuel: balance.h2_to_refuel,
        storage_input: balance.hydrogen_mass,
        storage_output,
        stored_h2: step.state.stored_h2,
        co2_from_import: balance.co2_from_import,
        co2_avoided_export: balance.co2_avoided_export,
        co2_avoided_diesel: balance.co2_avoided_diesel,
        diesel_cost_avoided: balance.diesel_cost_avoided,
        o2_revenue: balance.o2_revenue,
        h2_revenue: balance.h2_revenue,
        electricity_avoided_revenue: balance.electricity_avoided_revenue,
        total_revenue_native: balance.total_revenue_native,
        total_revenue_converted: balance.total_revenue_converted,
        monthly_net: step.monthly_net,
        cumulative_cashflow: step.state.cumulative_cashflow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::Season;

    fn balance(month: &str, produced: f64, to_fuel_cell: f64, to_refuel: f64) -> MonthBalance {
        MonthBalance {
            month: month.into(),
            season: Season::Cold,
            solar_energy: 0.0,
            demand_energy: 0.0,
            grid_import: 0.0,
            grid_export: 0.0,
            solar_for_electrolysis: 0.0,
            electrolyzer_energy: 0.0,
            hydrogen_mass: produced,
            energy_derived_hydrogen: produced,
            oxygen_mass: produced * 8.0,
            water_consumed: produced * 9.0,
            h2_to_fuel_cell: to_fuel_cell,
            fuel_cell_electricity: 0.0,
            h2_to_refuel: to_refuel,
            co2_from_import: 0.0,
            co2_avoided_export: 0.0,
            co2_avoided_diesel: 0.0,
            diesel_cost_avoided: 0.0,
            o2_revenue: 0.0,
            h2_revenue: 0.0,
            electricity_avoided_revenue: 0.0,
            total_revenue_native: 0.0,
            total_revenue_converted: 1_000.0,
        }
    }

    #[test]
    fn idle_month_keeps_storage_unchanged() {
        let state = CarryState {
            stored_h2: 700.0,
            cumulative_cashflow: 0.0,
        };
        let step = advance(state, &balance("Jan", 0.0, 0.0, 0.0), 0.0);
        assert_eq!(step.state.stored_h2, 700.0);
        assert_eq!(step.deficit, 0.0);
    }

    #[test]
    fn overdraw_is_floored_and_reported() {
        let params = Parameters {
            initial_h2_storage: 100.0,
            capex: 0.0,
            monthly_opex: 0.0,
            ..Parameters::default()
        };
        let (rows, warnings) = carry_forward(
            vec![
                balance("Jan", 50.0, 100.0, 100.0),
                balance("Feb", 80.0, 10.0, 10.0),
            ],
            &params,
        );
        assert_eq!(rows[0].stored_h2, 0.0);
        assert_eq!(rows[1].stored_h2, 60.0);
        assert_eq!(
            warnings,
            vec![SimulationWarning::StorageFloorReached {
                month: "Jan".into(),
                deficit: 50.0
            }]
        );
    }

    #[test]
    fn cashflow_is_seeded_with_negative_capex() {
        let params = Parameters {
            capex: 5_000.0,
            monthly_opex: 400.0,
            ..Parameters::default()
        };
        let (rows, _) = carry_forward(
            vec![balance("Jan", 0.0, 0.0, 0.0), balance("Feb", 0.0, 0.0, 0.0)],
            &params,
        );
        assert_eq!(rows[0].monthly_net, 600.0);
        assert_eq!(rows[0].cumulative_cashflow, -4_400.0);
        assert_eq!(rows[1].cumulative_cashflow, -3_800.0);
    }
}
