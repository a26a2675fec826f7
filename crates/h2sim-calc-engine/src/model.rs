//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Monthly balance routines for solar-hydrogen planning."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use h2sim_common::EnergyUnit;
use serde::{Deserialize, Serialize};

use crate::season::{Season, DEFAULT_HOT_MONTHS};

pub const MONTHS_PER_YEAR: usize = 12;

/// Oxygen mass released per unit hydrogen mass in water electrolysis.
pub const OXYGEN_PER_HYDROGEN: f64 = 8.0;
/// Water mass consumed per unit hydrogen mass.
pub const WATER_PER_HYDROGEN: f64 = 9.0;

const MONTH_LABELS: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DEMO_DEMAND_MWH: [f64; MONTHS_PER_YEAR] = [
    31.5, 39.0, 64.5, 72.0, 117.0, 78.0, 94.5, 46.5, 114.0, 102.0, 87.0, 46.5,
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRecord {
    pub month: String,
    pub solar_energy: f64,
    pub demand_energy: f64,
}

impl MonthlyRecord {
    pub fn new(month: impl Into<String>, solar_energy: f64, demand_energy: f64) -> Self {
        Self {
            month: month.into(),
            solar_energy,
            demand_energy,
        }
    }
}

/// Ordered Jan..Dec input table. Shape is checked by the engine, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct MonthlyProfile {
    pub records: Vec<MonthlyRecord>,
}

impl MonthlyProfile {
    pub fn new(records: Vec<MonthlyRecord>) -> Self {
        Self { records }
    }

    /// Twelve months labelled Jan..Dec with the same solar and demand figures.
    pub fn uniform(solar_energy: f64, demand_energy: f64) -> Self {
        Self::new(
            MONTH_LABELS
                .iter()
                .map(|label| MonthlyRecord::new(*label, solar_energy, demand_energy))
                .collect(),
        )
    }

    /// Reference demand curve with a constant solar yield.
    pub fn demo(unit: EnergyUnit, solar_per_month: f64) -> Self {
        let scale = match unit {
            EnergyUnit::Mwh => 1.0,
            EnergyUnit::Kwh => 1000.0,
        };
        Self::new(
            MONTH_LABELS
                .iter()
                .zip(DEMO_DEMAND_MWH)
                .map(|(label, demand)| MonthlyRecord::new(*label, solar_per_month, demand * scale))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthlyRecord> {
        self.records.iter()
    }
}

/// How monthly hydrogen mass is derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HydrogenMode {
    /// Electrolyzer energy divided by the specific energy per unit mass.
    #[default]
    EnergyDerived,
    /// Fixed masses per hot/cold month.
    SeasonalFixed(SeasonalProduction),
}

impl HydrogenMode {
    pub fn label(&self) -> &'static str {
        match self {
            HydrogenMode::EnergyDerived => "energy-derived",
            HydrogenMode::SeasonalFixed(_) => "seasonal-fixed",
        }
    }
}

fn default_hot_month_mass() -> f64 {
    18_000.0
}

fn default_cold_month_mass() -> f64 {
    15_000.0
}

fn default_hot_months() -> Vec<u32> {
    DEFAULT_HOT_MONTHS.to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeasonalProduction {
    #[serde(default = "default_hot_month_mass")]
    pub hot_month_mass: f64,
    #[serde(default = "default_cold_month_mass")]
    pub cold_month_mass: f64,
    /// Calendar month numbers (1 = January) classified as hot.
    #[serde(default = "default_hot_months")]
    pub hot_months: Vec<u32>,
}

impl Default for SeasonalProduction {
    fn default() -> Self {
        Self {
            hot_month_mass: default_hot_month_mass(),
            cold_month_mass: default_cold_month_mass(),
            hot_months: default_hot_months(),
        }
    }
}

impl SeasonalProduction {
    pub fn mass_for(&self, season: Season) -> f64 {
        match season {
            Season::Hot => self.hot_month_mass,
            Season::Cold => self.cold_month_mass,
        }
    }
}

/// Treatment of the monthly diesel volume when computing displaced CO2.
///
/// Both reference dashboards divide the per-month diesel volume by twelve.
/// `MonthlyVolume` uses the volume as-is for callers that treat it as a
/// true monthly figure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DieselCo2Method {
    #[default]
    OverTwelve,
    MonthlyVolume,
}

/// Immutable parameter set for one simulation run.
///
/// Energy-denominated values (`h2_lhv`, `grid_price`, `grid_emission_factor`)
/// use the same energy unit as the monthly profile.
/// Missing keys take their defaults; unknown keys are rejected so a misspelt
/// name cannot slip past validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    pub electrolyzer_efficiency: f64,
    /// Lower heating value, energy units per kg.
    pub h2_lhv: f64,
    pub fuel_cell_efficiency: f64,
    pub fraction_to_fuel_cell: f64,
    pub fraction_to_refuel: f64,
    pub solar_fraction_for_electrolysis: f64,
    pub grid_supplement_enabled: bool,
    pub initial_h2_storage: f64,
    /// Native currency per kg O2.
    pub o2_price: f64,
    /// Native currency per kg H2 delivered for refuelling.
    pub h2_price: f64,
    /// Native currency per energy unit.
    pub grid_price: f64,
    /// kg CO2 per energy unit.
    pub grid_emission_factor: f64,
    /// Litres per month.
    pub diesel_volume_per_month: f64,
    /// Native currency per litre.
    pub diesel_price: f64,
    /// kg CO2 per litre.
    pub diesel_emission_factor: f64,
    /// Native currency per converted currency unit.
    pub exchange_rate: f64,
    /// Converted currency per month.
    pub monthly_opex: f64,
    /// Converted currency, debited once before the first month.
    pub capex: f64,
    pub diesel_co2_method: DieselCo2Method,
    pub hydrogen_mode: HydrogenMode,
}

impl Default for Parameters {
    fn default() -> Self {
        Self::for_unit(EnergyUnit::Mwh)
    }
}

impl Parameters {
    /// Default parameter set expressed in the given energy unit.
    pub fn for_unit(unit: EnergyUnit) -> Self {
        // Reference values are quoted per kWh.
        let per_unit = unit.kwh_factor();
        Self {
            electrolyzer_efficiency: 0.80,
            h2_lhv: 33.33 / per_unit,
            fuel_cell_efficiency: 0.50,
            fraction_to_fuel_cell: 0.30,
            fraction_to_refuel: 0.70,
            solar_fraction_for_electrolysis: 0.80,
            grid_supplement_enabled: true,
            initial_h2_storage: 700.0,
            o2_price: 10.0,
            h2_price: 0.0,
            grid_price: 10.56 * per_unit,
            grid_emission_factor: 0.71 * per_unit,
            diesel_volume_per_month: 42_000.0,
            diesel_price: 114.0,
            diesel_emission_factor: 2.68,
            exchange_rate: 114.0,
            monthly_opex: 598.29,
            capex: 16_000_000.0,
            hydrogen_mode: HydrogenMode::EnergyDerived,
            diesel_co2_method: DieselCo2Method::OverTwelve,
        }
    }

    /// Default solar yield used for demo profiles in the given unit.
    pub fn default_solar_per_month(unit: EnergyUnit) -> f64 {
        match unit {
            EnergyUnit::Mwh => 80.0,
            EnergyUnit::Kwh => 750_000.0,
        }
    }

    /// Energy required per kg of hydrogen once electrolyzer losses are included.
    pub fn specific_electrolysis_energy(&self) -> f64 {
        self.h2_lhv / self.electrolyzer_efficiency
    }

    pub fn routed_fraction(&self) -> f64 {
        self.fraction_to_fuel_cell + self.fraction_to_refuel
    }

    /// Calendar months treated as hot for season classification.
    pub fn hot_months(&self) -> &[u32] {
        match &self.hydrogen_mode {
            HydrogenMode::SeasonalFixed(seasonal) => &seasonal.hot_months,
            HydrogenMode::EnergyDerived => &DEFAULT_HOT_MONTHS,
        }
    }
}

/// One row of the result table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyResult {
    pub month: String,
    pub season: Season,
    pub solar_energy: f64,
    pub demand_energy: f64,
    pub grid_import: f64,
    pub grid_export: f64,
    pub solar_for_electrolysis: f64,
    pub electrolyzer_energy: f64,
    pub hydrogen_mass: f64,
    /// Equal to `hydrogen_mass` outside seasonal mode; in seasonal mode the
    /// estimate from the solar allocation alone.
    pub energy_derived_hydrogen: f64,
    pub oxygen_mass: f64,
    pub water_consumed: f64,
    pub h2_to_fuel_cell: f64,
    pub fuel_cell_electricity: f64,
    pub h2_to_refuel: f64,
    pub storage_input: f64,
    pub storage_output: f64,
    pub stored_h2: f64,
    pub co2_from_import: f64,
    pub co2_avoided_export: f64,
    pub co2_avoided_diesel: f64,
    pub diesel_cost_avoided: f64,
    pub o2_revenue: f64,
    pub h2_revenue: f64,
    pub electricity_avoided_revenue: f64,
    pub total_revenue_native: f64,
    pub total_revenue_converted: f64,
    pub monthly_net: f64,
    pub cumulative_cashflow: f64,
}

/// Non-fatal conditions observed while simulating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SimulationWarning {
    /// Fuel-cell and refuelling fractions route more than the produced hydrogen.
    FractionOverAllocation { total: f64 },
    /// Storage would have gone negative; the floor absorbed `deficit` kg.
    StorageFloorReached { month: String, deficit: f64 },
}

impl std::fmt::Display for SimulationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationWarning::FractionOverAllocation { total } => write!(
                f,
                "fuel-cell and refuel fractions sum to {:.2}, above 1.0",
                total
            ),
            SimulationWarning::StorageFloorReached { month, deficit } => write!(
                f,
                "{}: storage floor absorbed an unmet output of {:.2} kg",
                month, deficit
            ),
        }
    }
}

/// Result table of one run. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationTable {
    pub months: Vec<MonthlyResult>,
    #[serde(default)]
    pub warnings: Vec<SimulationWarning>,
}

impl SimulationTable {
    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthlyResult> {
        self.months.iter()
    }

    pub fn month(&self, label: &str) -> Option<&MonthlyResult> {
        self.months.iter().find(|m| m.month == label)
    }

    pub fn final_storage(&self) -> Option<f64> {
        self.months.last().map(|m| m.stored_h2)
    }

    pub fn final_cumulative_cashflow(&self) -> Option<f64> {
        self.months.last().map(|m| m.cumulative_cashflow)
    }
}
