//! Core domain types for titration calculations.
//!
//! This module defines:
//! - Titration, volume and concentration unit enumerations
//! - The calculation input and result values
//! - History records pairing an input with its result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Enumerations
// ============================================================================

/// Kind of titration being performed
///
/// Descriptive only: the arithmetic is identical for every kind.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TitrationType {
    AcidBase,
    Redox,
    Complexometric,
    Precipitation,
}

/// Display names for the two species taking part in a titration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleLabels {
    pub titrant: &'static str,
    pub analyte: &'static str,
}

impl TitrationType {
    pub const ALL: [TitrationType; 4] = [
        TitrationType::AcidBase,
        TitrationType::Redox,
        TitrationType::Complexometric,
        TitrationType::Precipitation,
    ];

    /// Human-readable name of the titration kind
    pub fn display_name(&self) -> &'static str {
        match self {
            TitrationType::AcidBase => "Acid–Base",
            TitrationType::Redox => "Redox",
            TitrationType::Complexometric => "Complexometric",
            TitrationType::Precipitation => "Precipitation",
        }
    }

    /// Role labels used when presenting titrant and analyte
    pub fn labels(&self) -> RoleLabels {
        match self {
            TitrationType::AcidBase => RoleLabels {
                titrant: "Titrant (e.g., Base)",
                analyte: "Analyte (e.g., Acid)",
            },
            TitrationType::Redox => RoleLabels {
                titrant: "Oxidizing Agent",
                analyte: "Reducing Agent",
            },
            TitrationType::Complexometric => RoleLabels {
                titrant: "Complexing Agent (Titrant)",
                analyte: "Analyte",
            },
            TitrationType::Precipitation => RoleLabels {
                titrant: "Precipitating Agent (Titrant)",
                analyte: "Analyte",
            },
        }
    }
}

impl fmt::Display for TitrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TitrationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "acid_base" | "acidbase" => Ok(TitrationType::AcidBase),
            "redox" => Ok(TitrationType::Redox),
            "complexometric" => Ok(TitrationType::Complexometric),
            "precipitation" => Ok(TitrationType::Precipitation),
            _ => Err(format!(
                "unknown titration type '{}' (expected acid-base, redox, complexometric or precipitation)",
                s
            )),
        }
    }
}

/// Unit a volume measurement is expressed in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VolumeUnit {
    #[serde(rename = "mL")]
    Milliliter,
    #[serde(rename = "L")]
    Liter,
}

impl VolumeUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "mL",
            VolumeUnit::Liter => "L",
        }
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for VolumeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ml" | "milliliter" | "millilitre" => Ok(VolumeUnit::Milliliter),
            "l" | "liter" | "litre" => Ok(VolumeUnit::Liter),
            _ => Err(format!("unknown volume unit '{}' (expected mL or L)", s)),
        }
    }
}

/// Unit the titrant concentration is expressed in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationUnit {
    /// mol/L
    Molarity,
    /// eq/L
    Normality,
}

impl ConcentrationUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            ConcentrationUnit::Molarity => "mol/L",
            ConcentrationUnit::Normality => "eq/L",
        }
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ConcentrationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m" | "molarity" | "mol/l" => Ok(ConcentrationUnit::Molarity),
            "n" | "normality" | "eq/l" => Ok(ConcentrationUnit::Normality),
            _ => Err(format!(
                "unknown concentration unit '{}' (expected molarity or normality)",
                s
            )),
        }
    }
}

// ============================================================================
// Calculation Input and Result
// ============================================================================

/// Everything needed for one titration calculation
///
/// Volumes are non-negative and each carries its own unit. The stoichiometry
/// pair is the balanced-equation mole ratio titrant:analyte and both values
/// must be at least 1 (see [`TitrationInput::validate`]).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TitrationInput {
    pub titration_type: TitrationType,
    pub titrant_name: String,
    pub titrant_concentration: f64,
    pub titrant_concentration_unit: ConcentrationUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titrant_n_factor: Option<u32>,
    pub analyte_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyte_molar_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_mass: Option<f64>,
    pub titration_volume: f64,
    pub titration_volume_unit: VolumeUnit,
    pub blank_volume: f64,
    pub blank_volume_unit: VolumeUnit,
    pub sample_volume: f64,
    pub sample_volume_unit: VolumeUnit,
    pub titrant_stoichiometry: u32,
    pub analyte_stoichiometry: u32,
    /// Opt-in for the mass and purity derivation
    #[serde(default)]
    pub compute_mass: bool,
}

impl Default for TitrationInput {
    fn default() -> Self {
        Self {
            titration_type: TitrationType::AcidBase,
            titrant_name: String::new(),
            titrant_concentration: 0.1,
            titrant_concentration_unit: ConcentrationUnit::Molarity,
            titrant_n_factor: Some(1),
            analyte_name: String::new(),
            analyte_molar_mass: None,
            sample_mass: None,
            titration_volume: 0.0,
            titration_volume_unit: VolumeUnit::Milliliter,
            blank_volume: 0.0,
            blank_volume_unit: VolumeUnit::Milliliter,
            sample_volume: 0.0,
            sample_volume_unit: VolumeUnit::Milliliter,
            titrant_stoichiometry: 1,
            analyte_stoichiometry: 1,
            compute_mass: false,
        }
    }
}

/// Output of one titration calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TitrationResult {
    /// Titration volume minus blank, in liters; negative if the blank is larger
    pub corrected_titrant_volume_l: f64,
    pub moles_of_titrant: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalents_of_titrant: Option<f64>,
    pub moles_of_analyte: f64,
    pub analyte_concentration_mol_l: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyte_concentration_normality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyte_concentration_g_l: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyte_mass_in_sample: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyte_purity: Option<f64>,
    pub analyte_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyte_molar_mass: Option<f64>,
}

// ============================================================================
// History Records
// ============================================================================

/// A calculation as kept in history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TitrationRecord {
    /// Creation time in Unix milliseconds, strictly increasing within a store
    pub id: i64,
    pub input: TitrationInput,
    pub result: TitrationResult,
}

impl TitrationRecord {
    /// Creation time of the record
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titration_type_parsing() {
        assert_eq!("acid-base".parse::<TitrationType>(), Ok(TitrationType::AcidBase));
        assert_eq!("Acid Base".parse::<TitrationType>(), Ok(TitrationType::AcidBase));
        assert_eq!("REDOX".parse::<TitrationType>(), Ok(TitrationType::Redox));
        assert!("gravimetric".parse::<TitrationType>().is_err());
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("mL".parse::<VolumeUnit>(), Ok(VolumeUnit::Milliliter));
        assert_eq!("L".parse::<VolumeUnit>(), Ok(VolumeUnit::Liter));
        assert!("gal".parse::<VolumeUnit>().is_err());

        assert_eq!("M".parse::<ConcentrationUnit>(), Ok(ConcentrationUnit::Molarity));
        assert_eq!("eq/L".parse::<ConcentrationUnit>(), Ok(ConcentrationUnit::Normality));
    }

    #[test]
    fn test_labels_per_type() {
        assert_eq!(TitrationType::Redox.labels().titrant, "Oxidizing Agent");
        assert_eq!(TitrationType::Redox.labels().analyte, "Reducing Agent");
        assert_eq!(TitrationType::Precipitation.labels().analyte, "Analyte");
    }

    #[test]
    fn test_input_json_uses_unit_symbols() {
        let input = TitrationInput::default();
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"titration_volume_unit\":\"mL\""));
        assert!(json.contains("\"titration_type\":\"acid_base\""));
        // Absent optional fields are omitted
        assert!(!json.contains("analyte_molar_mass"));
    }

    #[test]
    fn test_input_without_compute_mass_defaults_false() {
        let mut value = serde_json::to_value(TitrationInput::default()).unwrap();
        value.as_object_mut().unwrap().remove("compute_mass");
        let input: TitrationInput = serde_json::from_value(value).unwrap();
        assert!(!input.compute_mass);
    }

    #[test]
    fn test_record_created_at() {
        let record = TitrationRecord {
            id: 1_700_000_000_000,
            input: TitrationInput::default(),
            result: crate::compute(&TitrationInput::default()),
        };
        let created = record.created_at().unwrap();
        assert_eq!(created.timestamp(), 1_700_000_000);
    }
}
