//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Monthly balance routines for solar-hydrogen planning."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use chrono::Month;
use serde::{Deserialize, Serialize};
use strum::Display;

/// March through November.
pub const DEFAULT_HOT_MONTHS: [u32; 9] = [3, 4, 5, 6, 7, 8, 9, 10, 11];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Season {
    Hot,
    Cold,
}

/// Calendar month number (1..=12) for a profile row.
///
/// Labels such as `Jan` or `january` are parsed; anything else falls back to
/// the row position, row 0 being January.
pub fn calendar_month(label: &str, position: usize) -> u32 {
    label
        .trim()
        .parse::<Month>()
        .map(|month| month.number_from_month())
        .unwrap_or_else(|_| (position % 12) as u32 + 1)
}

pub fn classify(label: &str, position: usize, hot_months: &[u32]) -> Season {
    if hot_months.contains(&calendar_month(label, position)) {
        Season::Hot
    } else {
        Season::Cold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_take_precedence_over_position() {
        assert_eq!(calendar_month("Mar", 0), 3);
        assert_eq!(calendar_month("december", 4), 12);
        assert_eq!(calendar_month(" Jul ", 1), 7);
    }

    #[test]
    fn unknown_labels_fall_back_to_position() {
        assert_eq!(calendar_month("M01", 0), 1);
        assert_eq!(calendar_month("period-9", 8), 9);
    }

    #[test]
    fn default_hot_season_spans_march_to_november() {
        assert_eq!(classify("Jan", 0, &DEFAULT_HOT_MONTHS), Season::Cold);
        assert_eq!(classify("Feb", 1, &DEFAULT_HOT_MONTHS), Season::Cold);
        assert_eq!(classify("Mar", 2, &DEFAULT_HOT_MONTHS), Season::Hot);
        assert_eq!(classify("Nov", 10, &DEFAULT_HOT_MONTHS), Season::Hot);
        assert_eq!(classify("Dec", 11, &DEFAULT_HOT_MONTHS), Season::Cold);
    }

    #[test]
    fn season_renders_lowercase() {
        assert_eq!(Season::Hot.to_string(), "hot");
        assert_eq!(serde_json::to_string(&Season::Cold).unwrap(), "\"cold\"");
    }
}
