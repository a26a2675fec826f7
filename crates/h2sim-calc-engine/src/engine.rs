//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Monthly balance routines for solar-hydrogen planning."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use crate::{
    balance::{balance_month, MonthBalance},
    errors::ValidationError,
    model::{MonthlyProfile, Parameters, SimulationTable, SimulationWarning},
    recurrence::carry_forward,
    validation::{validate_parameters, validate_profile},
};

const FRACTION_TOLERANCE: f64 = 1e-9;

/// Computes the twelve-month result table for one profile and parameter set.
///
/// Inputs are validated in full before any month is evaluated. The function
/// is pure: it does not log, and each call allocates its own table.
pub fn simulate(
    profile: &MonthlyProfile,
    params: &Parameters,
) -> Result<SimulationTable, ValidationError> {
    validate_profile(profile)?;
    validate_parameters(params)?;

    let mut warnings = Vec::new();
    let routed = params.routed_fraction();
    if routed > 1.0 + FRACTION_TOLERANCE {
        warnings.push(SimulationWarning::FractionOverAllocation { total: routed });
    }

    let balances: Vec<MonthBalance> = profile
        .iter()
        .enumerate()
        .map(|(position, record)| balance_month(position, record, params))
        .collect();

    let (months, floor_warnings) = carry_forward(balances, params);
    warnings.extend(floor_warnings);

    Ok(SimulationTable { months, warnings })
}
