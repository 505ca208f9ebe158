//! Input checks performed by the collector before calling the engine.
//!
//! The engine accepts any input; these checks keep out values that would
//! make its output meaningless (zero stoichiometry, negative volumes) and
//! flag results worth a second look.

use crate::{ConcentrationUnit, Error, Result, TitrationInput, TitrationResult};
use std::fmt;

impl TitrationInput {
    /// List every problem with this input
    ///
    /// Returns an empty list if the input is fit for the engine.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !(self.titrant_concentration.is_finite() && self.titrant_concentration > 0.0) {
            problems.push(format!(
                "titrant concentration must be positive, got {}",
                self.titrant_concentration
            ));
        }

        for (name, value) in [
            ("titration volume", self.titration_volume),
            ("blank volume", self.blank_volume),
            ("sample volume", self.sample_volume),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                problems.push(format!("{} must be non-negative, got {}", name, value));
            }
        }

        if self.titrant_stoichiometry < 1 {
            problems.push("titrant stoichiometry must be at least 1".to_string());
        }
        if self.analyte_stoichiometry < 1 {
            problems.push("analyte stoichiometry must be at least 1".to_string());
        }

        if self.titrant_concentration_unit == ConcentrationUnit::Normality
            && self.titrant_n_factor.unwrap_or(0) < 1
        {
            problems.push("titrant n-factor of at least 1 is required for normality".to_string());
        }

        if let Some(molar_mass) = self.analyte_molar_mass {
            if !(molar_mass.is_finite() && molar_mass > 0.0) {
                problems.push(format!("molar mass must be positive, got {}", molar_mass));
            }
        } else if self.compute_mass {
            problems.push("molar mass is required to compute mass and purity".to_string());
        }

        if let Some(sample_mass) = self.sample_mass {
            if !(sample_mass.is_finite() && sample_mass > 0.0) {
                problems.push(format!("sample mass must be positive, got {}", sample_mass));
            }
        }

        problems
    }

    /// Reject the input if it has any problems
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(problems))
        }
    }
}

/// Something unusual about a result that the user should know about
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// Blank volume exceeds titration volume
    NegativeCorrectedVolume { corrected_volume_l: f64 },
    /// No sample volume, so concentration was reported as zero
    ZeroSampleVolume,
    /// Computed purity is above 100 %
    PurityAboveHundred { purity: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NegativeCorrectedVolume { corrected_volume_l } => write!(
                f,
                "blank volume exceeds titration volume (corrected volume {} L)",
                corrected_volume_l
            ),
            Warning::ZeroSampleVolume => {
                write!(f, "sample volume is zero; concentration reported as 0")
            }
            Warning::PurityAboveHundred { purity } => {
                write!(f, "purity of {:.2}% exceeds 100%; check sample mass", purity)
            }
        }
    }
}

/// Collect warnings for a computed result
pub fn warnings(input: &TitrationInput, result: &TitrationResult) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if result.corrected_titrant_volume_l < 0.0 {
        warnings.push(Warning::NegativeCorrectedVolume {
            corrected_volume_l: result.corrected_titrant_volume_l,
        });
    }
    if input.sample_volume <= 0.0 {
        warnings.push(Warning::ZeroSampleVolume);
    }
    if let Some(purity) = result.analyte_purity.filter(|p| *p > 100.0) {
        warnings.push(Warning::PurityAboveHundred { purity });
    }

    warnings
}
