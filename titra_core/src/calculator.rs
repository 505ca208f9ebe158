//! Titration calculation engine.
//!
//! Turns one [`TitrationInput`] into one [`TitrationResult`]:
//! - Normalize volumes to liters and apply the blank correction
//! - Derive moles and equivalents of titrant
//! - Scale to moles of analyte by the stoichiometric ratio
//! - Derive analyte concentrations, and mass/purity when requested
//!
//! The engine is total: no input produces an error. Division by a zero
//! sample volume yields a zero concentration and a missing or zero n-factor
//! counts as 1. Callers must guarantee both stoichiometry values are at
//! least 1; see [`TitrationInput::validate`].

use crate::units::to_liters;
use crate::{ConcentrationUnit, TitrationInput, TitrationResult};

/// Compute the result of a titration
pub fn compute(input: &TitrationInput) -> TitrationResult {
    let corrected_titrant_volume_l = corrected_volume_l(input);
    let sample_volume_l = to_liters(input.sample_volume, input.sample_volume_unit);

    let n_factor = titrant_n_factor(input);
    let stoichiometric_ratio =
        f64::from(input.analyte_stoichiometry) / f64::from(input.titrant_stoichiometry);

    let effective_molarity = match input.titrant_concentration_unit {
        ConcentrationUnit::Molarity => input.titrant_concentration,
        ConcentrationUnit::Normality => input.titrant_concentration / n_factor.unwrap_or(1.0),
    };

    let moles_of_titrant = effective_molarity * corrected_titrant_volume_l;
    let moles_of_analyte = moles_of_titrant * stoichiometric_ratio;

    let equivalents_of_titrant = match input.titrant_concentration_unit {
        ConcentrationUnit::Normality => input.titrant_concentration * corrected_titrant_volume_l,
        // Heuristic: without a known n-factor the stoichiometric ratio stands
        // in for it. Not a verified chemical identity.
        ConcentrationUnit::Molarity => moles_of_titrant * n_factor.unwrap_or(stoichiometric_ratio),
    };

    let analyte_concentration_mol_l = if sample_volume_l > 0.0 {
        moles_of_analyte / sample_volume_l
    } else {
        0.0
    };

    let analyte_n_factor = n_factor.unwrap_or(1.0)
        * (f64::from(input.titrant_stoichiometry) / f64::from(input.analyte_stoichiometry));
    let analyte_concentration_normality = analyte_concentration_mol_l * analyte_n_factor;

    let mut result = TitrationResult {
        corrected_titrant_volume_l,
        moles_of_titrant,
        equivalents_of_titrant: Some(equivalents_of_titrant),
        moles_of_analyte,
        analyte_concentration_mol_l,
        analyte_concentration_normality: Some(analyte_concentration_normality),
        analyte_concentration_g_l: None,
        analyte_mass_in_sample: None,
        analyte_purity: None,
        analyte_name: input.analyte_name.clone(),
        analyte_molar_mass: input.analyte_molar_mass,
    };

    if let Some(molar_mass) = mass_branch_molar_mass(input) {
        let mass = moles_of_analyte * molar_mass;
        result.analyte_concentration_g_l = Some(analyte_concentration_mol_l * molar_mass);
        result.analyte_mass_in_sample = Some(mass);
        result.analyte_purity = input
            .sample_mass
            .filter(|m| *m > 0.0)
            .map(|sample_mass| mass / sample_mass * 100.0);
    }

    tracing::debug!(
        "Computed titration for '{}': {} mol analyte, {} mol/L",
        input.analyte_name,
        result.moles_of_analyte,
        result.analyte_concentration_mol_l
    );

    result
}

/// Titration volume minus blank, in liters
///
/// When both volumes share a unit the subtraction happens before conversion,
/// so 30 mL - 5 mL gives exactly 25 mL / 1000.
fn corrected_volume_l(input: &TitrationInput) -> f64 {
    if input.titration_volume_unit == input.blank_volume_unit {
        to_liters(
            input.titration_volume - input.blank_volume,
            input.titration_volume_unit,
        )
    } else {
        to_liters(input.titration_volume, input.titration_volume_unit)
            - to_liters(input.blank_volume, input.blank_volume_unit)
    }
}

/// Titrant n-factor, treating zero as absent
fn titrant_n_factor(input: &TitrationInput) -> Option<f64> {
    input
        .titrant_n_factor
        .filter(|n| *n != 0)
        .map(f64::from)
}

/// Molar mass to use for mass/purity, if that branch applies
fn mass_branch_molar_mass(input: &TitrationInput) -> Option<f64> {
    if !input.compute_mass {
        return None;
    }
    input.analyte_molar_mass.filter(|m| *m > 0.0)
}
