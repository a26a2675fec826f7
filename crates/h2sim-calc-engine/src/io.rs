//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Monthly balance routines for solar-hydrogen planning."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::{fs, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use h2sim_common::EnergyUnit;
use serde_json::{Map, Value};

use crate::{
    errors::{CalcEngineError, Result, SchemaError},
    model::{MonthlyProfile, MonthlyRecord, Parameters},
    validation::validate_schema,
};

const MONTH_COLUMN: &str = "month";
const SOLAR_FIELD: &str = "solar_energy";
const DEMAND_FIELD: &str = "demand_energy";

/// Profile plus the energy unit its columns resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProfile {
    pub profile: MonthlyProfile,
    pub unit: EnergyUnit,
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Loads a CSV or JSON profile. `unit_hint` applies when the columns carry no unit.
pub fn load_profile_from_file(path: impl AsRef<Path>, unit_hint: EnergyUnit) -> Result<LoadedProfile> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("csv") => load_profile_from_csv(path, unit_hint),
        Some("json") => Ok(LoadedProfile {
            profile: load_profile_from_json(path)?,
            unit: unit_hint,
        }),
        _ => Err(CalcEngineError::UnsupportedFormat(path.to_path_buf())),
    }
}

pub fn load_profile_from_csv(path: impl AsRef<Path>, unit_hint: EnergyUnit) -> Result<LoadedProfile> {
    let file = fs::File::open(path)?;
    read_profile_csv(file, unit_hint)
}

pub fn load_profile_from_json(path: impl AsRef<Path>) -> Result<MonthlyProfile> {
    let data = fs::read_to_string(path)?;
    read_profile_json(&data)
}

/// Reads an array of `{month, solar_energy, demand_energy}` objects.
///
/// Absent or null fields are reported as missing columns and non-numeric
/// energies as invalid numbers, the same way the CSV reader reports them.
/// Numbers given as strings are accepted.
pub fn read_profile_json(data: &str) -> Result<MonthlyProfile> {
    let rows: Vec<Map<String, Value>> = serde_json::from_str(data)?;
    let records = rows
        .iter()
        .enumerate()
        .map(|(row, fields)| json_record(row, fields))
        .collect::<Result<Vec<_>>>()?;

    let profile = MonthlyProfile::new(records);
    validate_schema(&profile)?;
    Ok(profile)
}

/// Reads a `month` column plus one solar/demand pair.
///
/// Pairs are resolved in the order `solar_mwh`/`demand_mwh`,
/// `solar_kwh`/`demand_kwh`, then unit-less `solar`/`demand`. Extra columns
/// are ignored. The result must have exactly twelve uniquely labelled rows.
pub fn read_profile_csv<R: Read>(reader: R, unit_hint: EnergyUnit) -> Result<LoadedProfile> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::resolve(&headers, unit_hint)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        records.push(MonthlyRecord {
            month: record.get(layout.month).unwrap_or_default().to_owned(),
            solar_energy: parse_cell(&record, row, layout.solar, &layout.solar_name)?,
            demand_energy: parse_cell(&record, row, layout.demand, &layout.demand_name)?,
        });
    }

    let profile = MonthlyProfile::new(records);
    validate_schema(&profile)?;
    Ok(LoadedProfile {
        profile,
        unit: layout.unit,
    })
}

/// Loads a parameter set from TOML, YAML or JSON, chosen by extension.
pub fn load_parameters_from_file(path: impl AsRef<Path>) -> Result<Parameters> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    let params = match extension(path).as_deref() {
        Some("toml") => toml::from_str(&data)?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&data)?,
        Some("json") => serde_json::from_str(&data)?,
        _ => return Err(CalcEngineError::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(params)
}

pub fn parameters_to_toml(params: &Parameters) -> Result<String> {
    Ok(toml::to_string_pretty(params)?)
}

struct ColumnLayout {
    month: usize,
    solar: usize,
    demand: usize,
    solar_name: String,
    demand_name: String,
    unit: EnergyUnit,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord, unit_hint: EnergyUnit) -> Result<Self> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
        };

        let month = position(MONTH_COLUMN).ok_or_else(|| SchemaError::MissingColumn {
            column: MONTH_COLUMN.to_owned(),
        })?;

        let candidates = [
            ("solar_mwh", "demand_mwh", EnergyUnit::Mwh),
            ("solar_kwh", "demand_kwh", EnergyUnit::Kwh),
            ("solar", "demand", unit_hint),
        ];
        for (solar_name, demand_name, unit) in candidates {
            if let (Some(solar), Some(demand)) = (position(solar_name), position(demand_name)) {
                return Ok(Self {
                    month,
                    solar,
                    demand,
                    solar_name: solar_name.to_owned(),
                    demand_name: demand_name.to_owned(),
                    unit,
                });
            }
        }

        // Report the half of a pair that is present, else the hinted unit's column.
        let missing = candidates
            .iter()
            .find_map(|(solar, demand, _)| match (position(*solar), position(*demand)) {
                (Some(_), None) => Some(*demand),
                (None, Some(_)) => Some(*solar),
                _ => None,
            })
            .map(str::to_owned)
            .unwrap_or_else(|| format!("solar_{}", unit_hint.column_suffix()));
        Err(SchemaError::MissingColumn { column: missing }.into())
    }
}

// Short rows leave trailing cells absent; they read as empty.
fn parse_cell(record: &StringRecord, row: usize, index: usize, column: &str) -> Result<f64> {
    let raw = record.get(index).unwrap_or("");
    raw.parse::<f64>()
        .map_err(|_| invalid_number(row, column, raw).into())
}

fn invalid_number(row: usize, column: &str, raw: &str) -> SchemaError {
    SchemaError::InvalidNumber {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
    }
}

fn missing_field(column: &str) -> SchemaError {
    SchemaError::MissingColumn {
        column: column.to_owned(),
    }
}

fn json_record(row: usize, fields: &Map<String, Value>) -> Result<MonthlyRecord> {
    let month = match fields.get(MONTH_COLUMN) {
        None | Some(Value::Null) => return Err(missing_field(MONTH_COLUMN).into()),
        Some(Value::String(label)) => label.clone(),
        Some(other) => other.to_string(),
    };
    Ok(MonthlyRecord {
        month,
        solar_energy: json_number(row, fields, SOLAR_FIELD)?,
        demand_energy: json_number(row, fields, DEMAND_FIELD)?,
    })
}

fn json_number(row: usize, fields: &Map<String, Value>, column: &str) -> Result<f64> {
    let parsed = match fields.get(column) {
        None | Some(Value::Null) => return Err(missing_field(column).into()),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    parsed.ok_or_else(|| {
        let raw = match fields.get(column) {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        invalid_number(row, column, &raw).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;

    fn csv_with(header: &str, rows: usize) -> String {
        let months = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        let mut text = format!("{header}\n");
        for month in months.iter().take(rows) {
            text.push_str(&format!("{month},80,46.5\n"));
        }
        text
    }

    fn schema_error(err: CalcEngineError) -> SchemaError {
        match err {
            CalcEngineError::Validation(ValidationError::Schema(schema)) => schema,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn mwh_columns_resolve_unit() {
        let loaded =
            read_profile_csv(csv_with("month,solar_mwh,demand_mwh", 12).as_bytes(), EnergyUnit::Kwh)
                .unwrap();
        assert_eq!(loaded.unit, EnergyUnit::Mwh);
        assert_eq!(loaded.profile.len(), 12);
        assert_eq!(loaded.profile.records[0].demand_energy, 46.5);
    }

    #[test]
    fn kwh_columns_in_any_order_with_extras() {
        let mut text = String::from("demand_kwh,notes,month,solar_kwh\n");
        for month in ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"] {
            text.push_str(&format!("46500,n/a,{month},750000\n"));
        }
        let loaded = read_profile_csv(text.as_bytes(), EnergyUnit::Mwh).unwrap();
        assert_eq!(loaded.unit, EnergyUnit::Kwh);
        assert_eq!(loaded.profile.records[11].month, "Dec");
        assert_eq!(loaded.profile.records[11].solar_energy, 750_000.0);
        assert_eq!(loaded.profile.records[11].demand_energy, 46_500.0);
    }

    #[test]
    fn unitless_columns_use_hint() {
        let loaded =
            read_profile_csv(csv_with("month,solar,demand", 12).as_bytes(), EnergyUnit::Kwh).unwrap();
        assert_eq!(loaded.unit, EnergyUnit::Kwh);
    }

    #[test]
    fn missing_demand_column_is_named() {
        let err = read_profile_csv(csv_with("month,solar_mwh,load", 12).as_bytes(), EnergyUnit::Mwh)
            .unwrap_err();
        assert_eq!(
            schema_error(err),
            SchemaError::MissingColumn {
                column: "demand_mwh".into()
            }
        );
    }

    #[test]
    fn missing_month_column_is_named() {
        let err = read_profile_csv(csv_with("period,solar_mwh,demand_mwh", 12).as_bytes(), EnergyUnit::Mwh)
            .unwrap_err();
        assert_eq!(
            schema_error(err),
            SchemaError::MissingColumn {
                column: "month".into()
            }
        );
    }

    #[test]
    fn eleven_rows_are_rejected() {
        let err = read_profile_csv(csv_with("month,solar_mwh,demand_mwh", 11).as_bytes(), EnergyUnit::Mwh)
            .unwrap_err();
        assert_eq!(
            schema_error(err),
            SchemaError::RowCount {
                expected: 12,
                found: 11
            }
        );
    }

    #[test]
    fn non_numeric_cell_is_reported() {
        let text = csv_with("month,solar_mwh,demand_mwh", 12).replacen("46.5", "n/a", 1);
        let err = read_profile_csv(text.as_bytes(), EnergyUnit::Mwh).unwrap_err();
        assert_eq!(
            schema_error(err),
            SchemaError::InvalidNumber {
                row: 0,
                column: "demand_mwh".into(),
                raw: "n/a".into()
            }
        );
    }

    #[test]
    fn short_csv_row_names_row_and_column() {
        let text = csv_with("month,solar_mwh,demand_mwh", 12).replacen("Jan,80,46.5", "Jan,80", 1);
        let err = read_profile_csv(text.as_bytes(), EnergyUnit::Mwh).unwrap_err();
        assert_eq!(
            schema_error(err),
            SchemaError::InvalidNumber {
                row: 0,
                column: "demand_mwh".into(),
                raw: String::new()
            }
        );
    }

    fn json_rows(fields: impl Fn(&str) -> serde_json::Value) -> String {
        let rows: Vec<_> = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ]
        .into_iter()
        .map(fields)
        .collect();
        serde_json::to_string(&rows).unwrap()
    }

    #[test]
    fn json_profile_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(
            &path,
            json_rows(|month| {
                serde_json::json!({"month": month, "solar_energy": 80.0, "demand_energy": "46.5"})
            }),
        )
        .unwrap();

        let loaded = load_profile_from_file(&path, EnergyUnit::Kwh).unwrap();
        assert_eq!(loaded.unit, EnergyUnit::Kwh);
        assert_eq!(loaded.profile.len(), 12);
        assert_eq!(loaded.profile.records[3].month, "Apr");
        assert_eq!(loaded.profile.records[3].demand_energy, 46.5);
    }

    #[test]
    fn json_profile_missing_field_is_schema_error() {
        let text = json_rows(|month| serde_json::json!({"month": month, "solar_energy": 80.0}));
        let err = read_profile_json(&text).unwrap_err();
        assert_eq!(
            schema_error(err),
            SchemaError::MissingColumn {
                column: "demand_energy".into()
            }
        );
    }

    #[test]
    fn json_profile_non_numeric_value_is_reported() {
        let text = json_rows(|month| {
            let solar = if month == "Mar" { serde_json::json!(true) } else { serde_json::json!(80.0) };
            serde_json::json!({"month": month, "solar_energy": solar, "demand_energy": 40.0})
        });
        let err = read_profile_json(&text).unwrap_err();
        assert_eq!(
            schema_error(err),
            SchemaError::InvalidNumber {
                row: 2,
                column: "solar_energy".into(),
                raw: "true".into()
            }
        );
    }

    #[test]
    fn parameters_round_trip_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.toml");
        let params = Parameters {
            h2_price: 250.0,
            ..Parameters::default()
        };
        fs::write(&path, parameters_to_toml(&params).unwrap()).unwrap();
        assert_eq!(load_parameters_from_file(&path).unwrap(), params);
    }

    #[test]
    fn parameters_load_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.yaml");
        fs::write(&path, "grid_supplement_enabled: false\nexchange_rate: 110.0\n").unwrap();
        let params = load_parameters_from_file(&path).unwrap();
        assert!(!params.grid_supplement_enabled);
        assert_eq!(params.exchange_rate, 110.0);
        assert_eq!(params.fraction_to_refuel, 0.7);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_profile_from_file("profile.xlsx", EnergyUnit::Mwh).unwrap_err();
        assert!(matches!(err, CalcEngineError::UnsupportedFormat(_)));
    }
}
