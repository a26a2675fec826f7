//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Monthly balance routines for solar-hydrogen planning."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Eager input checks. Everything here runs before the first month is
//! computed, so a failing run never yields a partial table.
use std::collections::HashSet;

use crate::{
    errors::{RangeError, SchemaError, ValidationError},
    model::{HydrogenMode, MonthlyProfile, Parameters, MONTHS_PER_YEAR},
};

type Check = Result<(), ValidationError>;

/// Row count and month labels.
pub fn validate_schema(profile: &MonthlyProfile) -> Check {
    if profile.len() != MONTHS_PER_YEAR {
        return Err(SchemaError::RowCount {
            expected: MONTHS_PER_YEAR,
            found: profile.len(),
        }
        .into());
    }
    let mut seen = HashSet::with_capacity(MONTHS_PER_YEAR);
    for (row, record) in profile.iter().enumerate() {
        let label = record.month.trim();
        if label.is_empty() {
            return Err(SchemaError::EmptyMonth { row }.into());
        }
        if !seen.insert(label) {
            return Err(SchemaError::DuplicateMonth {
                label: label.to_owned(),
            }
            .into());
        }
    }
    Ok(())
}

pub fn validate_profile(profile: &MonthlyProfile) -> Check {
    validate_schema(profile)?;
    for (row, record) in profile.iter().enumerate() {
        non_negative(&format!("profile[{row}].solar_energy"), record.solar_energy)?;
        non_negative(&format!("profile[{row}].demand_energy"), record.demand_energy)?;
    }
    Ok(())
}

pub fn validate_parameters(params: &Parameters) -> Check {
    efficiency("electrolyzer_efficiency", params.electrolyzer_efficiency)?;
    efficiency("fuel_cell_efficiency", params.fuel_cell_efficiency)?;
    positive("h2_lhv", params.h2_lhv)?;
    positive("exchange_rate", params.exchange_rate)?;
    fraction("fraction_to_fuel_cell", params.fraction_to_fuel_cell)?;
    fraction("fraction_to_refuel", params.fraction_to_refuel)?;
    fraction(
        "solar_fraction_for_electrolysis",
        params.solar_fraction_for_electrolysis,
    )?;

    let non_negative_fields = [
        ("initial_h2_storage", params.initial_h2_storage),
        ("o2_price", params.o2_price),
        ("h2_price", params.h2_price),
        ("grid_price", params.grid_price),
        ("grid_emission_factor", params.grid_emission_factor),
        ("diesel_volume_per_month", params.diesel_volume_per_month),
        ("diesel_price", params.diesel_price),
        ("diesel_emission_factor", params.diesel_emission_factor),
        ("monthly_opex", params.monthly_opex),
        ("capex", params.capex),
    ];
    for (field, value) in non_negative_fields {
        non_negative(field, value)?;
    }

    if let HydrogenMode::SeasonalFixed(seasonal) = &params.hydrogen_mode {
        non_negative("hydrogen_mode.hot_month_mass", seasonal.hot_month_mass)?;
        non_negative("hydrogen_mode.cold_month_mass", seasonal.cold_month_mass)?;
        if let Some(month) = seasonal.hot_months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(RangeError::new(
                "hydrogen_mode.hot_months",
                f64::from(*month),
                "calendar month in 1..=12",
            )
            .into());
        }
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Check {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RangeError::new(field, value, "a finite number").into())
    }
}

fn non_negative(field: &str, value: f64) -> Check {
    finite(field, value)?;
    if value < 0.0 {
        return Err(RangeError::new(field, value, ">= 0").into());
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Check {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(RangeError::new(field, value, "> 0").into());
    }
    Ok(())
}

fn efficiency(field: &str, value: f64) -> Check {
    finite(field, value)?;
    if value <= 0.0 || value > 1.0 {
        return Err(RangeError::new(field, value, "in (0, 1]").into());
    }
    Ok(())
}

fn fraction(field: &str, value: f64) -> Check {
    finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(RangeError::new(field, value, "in [0, 1]").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MonthlyRecord, SeasonalProduction};

    fn range_field(result: Check) -> String {
        match result {
            Err(ValidationError::Range(err)) => err.field,
            other => panic!("expected range error, got {other:?}"),
        }
    }

    #[test]
    fn eleven_rows_is_a_schema_error() {
        let mut profile = MonthlyProfile::uniform(80.0, 80.0);
        profile.records.pop();
        assert_eq!(
            validate_profile(&profile),
            Err(ValidationError::Schema(SchemaError::RowCount {
                expected: 12,
                found: 11
            }))
        );
    }

    #[test]
    fn duplicate_and_empty_labels_are_rejected() {
        let mut profile = MonthlyProfile::uniform(80.0, 80.0);
        profile.records[5].month = "Jan".into();
        assert!(matches!(
            validate_schema(&profile),
            Err(ValidationError::Schema(SchemaError::DuplicateMonth { .. }))
        ));

        let mut profile = MonthlyProfile::uniform(80.0, 80.0);
        profile.records[3].month = "  ".into();
        assert_eq!(
            validate_schema(&profile),
            Err(ValidationError::Schema(SchemaError::EmptyMonth { row: 3 }))
        );
    }

    #[test]
    fn negative_energy_names_the_row() {
        let mut profile = MonthlyProfile::uniform(80.0, 80.0);
        profile.records[7] = MonthlyRecord::new("Aug", 80.0, -1.0);
        assert_eq!(
            range_field(validate_profile(&profile)),
            "profile[7].demand_energy"
        );
    }

    #[test]
    fn zero_electrolyzer_efficiency_is_a_range_error() {
        let params = Parameters {
            electrolyzer_efficiency: 0.0,
            ..Parameters::default()
        };
        assert_eq!(
            range_field(validate_parameters(&params)),
            "electrolyzer_efficiency"
        );
    }

    #[test]
    fn efficiency_of_one_is_accepted() {
        let params = Parameters {
            electrolyzer_efficiency: 1.0,
            fuel_cell_efficiency: 1.0,
            ..Parameters::default()
        };
        assert!(validate_parameters(&params).is_ok());
    }

    #[test]
    fn non_finite_and_non_positive_values_are_rejected() {
        let params = Parameters {
            h2_lhv: 0.0,
            ..Parameters::default()
        };
        assert_eq!(range_field(validate_parameters(&params)), "h2_lhv");

        let params = Parameters {
            exchange_rate: f64::NAN,
            ..Parameters::default()
        };
        assert_eq!(range_field(validate_parameters(&params)), "exchange_rate");

        let params = Parameters {
            fraction_to_refuel: 1.2,
            ..Parameters::default()
        };
        assert_eq!(range_field(validate_parameters(&params)), "fraction_to_refuel");
    }

    #[test]
    fn seasonal_hot_months_must_be_calendar_months() {
        let params = Parameters {
            hydrogen_mode: HydrogenMode::SeasonalFixed(SeasonalProduction {
                hot_months: vec![3, 13],
                ..SeasonalProduction::default()
            }),
            ..Parameters::default()
        };
        assert_eq!(
            range_field(validate_parameters(&params)),
            "hydrogen_mode.hot_months"
        );
    }
}
