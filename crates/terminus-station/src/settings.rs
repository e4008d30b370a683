//! Station settings consumed by rect and catchment bookkeeping.
//!
//! Nothing in this crate reads settings from ambient state; every call that
//! depends on them takes a [`StationSettings`] argument.

use serde::{Deserialize, Serialize};

use crate::error::StationError;

/// Largest allowed `station_spread`.
pub const MAX_STATION_SPREAD: u32 = 64;

/// Largest allowed `catchment_increase`.
pub const MAX_CATCHMENT_INCREASE: u32 = 5;

/// Station rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSettings {
    /// Use per-facility catchment radii instead of one flat radius.
    #[serde(default = "default_modified_catchment")]
    pub modified_catchment: bool,

    /// Bonus added to every non-zero catchment radius.
    #[serde(default)]
    pub catchment_increase: u32,

    /// Maximum width and height of a station's bounding rect.
    #[serde(default = "default_station_spread")]
    pub station_spread: u32,

    /// Let ordinary stations serve industries that have their own
    /// neutral station.
    #[serde(default)]
    pub serve_neutral_industries: bool,
}

const fn default_modified_catchment() -> bool {
    true
}

const fn default_station_spread() -> u32 {
    12
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            modified_catchment: default_modified_catchment(),
            catchment_increase: 0,
            station_spread: default_station_spread(),
            serve_neutral_industries: false,
        }
    }
}

impl StationSettings {
    /// Check that every value is within its allowed range.
    pub fn validate(&self) -> Result<(), StationError> {
        if self.station_spread == 0 || self.station_spread > MAX_STATION_SPREAD {
            return Err(StationError::InvalidSettings {
                field: "station_spread",
                reason: format!("must be in 1..={MAX_STATION_SPREAD}, got {}", self.station_spread),
            });
        }
        if self.catchment_increase > MAX_CATCHMENT_INCREASE {
            return Err(StationError::InvalidSettings {
                field: "catchment_increase",
                reason: format!(
                    "must be at most {MAX_CATCHMENT_INCREASE}, got {}",
                    self.catchment_increase
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = StationSettings::default();
        assert!(s.modified_catchment);
        assert_eq!(s.station_spread, 12);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn out_of_range_values_rejected() {
        let spread = StationSettings {
            station_spread: 0,
            ..StationSettings::default()
        };
        assert!(spread.validate().is_err());

        let bonus = StationSettings {
            catchment_increase: 9,
            ..StationSettings::default()
        };
        assert!(matches!(
            bonus.validate(),
            Err(StationError::InvalidSettings { field: "catchment_increase", .. })
        ));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: StationSettings = serde_json::from_str(r#"{"catchment_increase": 2}"#)
            .unwrap_or_default();
        assert_eq!(s.catchment_increase, 2);
        assert_eq!(s.station_spread, 12);
        assert!(s.modified_catchment);
    }
}
