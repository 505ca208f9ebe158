//! Plain-text presentation of titration results.
//!
//! Numbers below the configured magnitude are shown in scientific notation,
//! everything else in fixed point. The derivation is always listed in the
//! same order: corrected volume, moles of titrant, equivalents, moles of
//! analyte, concentration, mass, purity.

use crate::config::DisplayConfig;
use crate::TitrationResult;
use std::fmt::Write;

/// One line of the step-by-step breakdown
#[derive(Clone, Debug, PartialEq)]
pub struct DerivationStep {
    pub label: &'static str,
    pub formula: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

/// Format a number according to the display policy
pub fn format_number(value: f64, display: &DisplayConfig) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    if value.abs() < display.scientific_below {
        let precision = display.significant_digits.saturating_sub(1);
        return format!("{:.*e}", precision, value);
    }

    let fixed = format!("{:.*}", display.decimals, value);
    trim_fraction(fixed, 2)
}

/// Drop trailing zeros after the decimal point, keeping at least `min` digits
fn trim_fraction(mut text: String, min: usize) -> String {
    let Some(dot) = text.find('.') else {
        return text;
    };
    let keep = dot + 1 + min;
    while text.len() > keep && text.ends_with('0') {
        text.pop();
    }
    text
}

/// Build the ordered derivation, skipping steps whose values are absent
pub fn derivation_steps(result: &TitrationResult) -> Vec<DerivationStep> {
    let mut steps = vec![DerivationStep {
        label: "Corrected Titrant Volume",
        formula: "V_corrected = V_titration - V_blank",
        value: result.corrected_titrant_volume_l,
        unit: "L",
    }];

    steps.push(DerivationStep {
        label: "Moles of Titrant",
        formula: "n_titrant = C_titrant * V_corrected",
        value: result.moles_of_titrant,
        unit: "mol",
    });

    if let Some(equivalents) = result.equivalents_of_titrant {
        steps.push(DerivationStep {
            label: "Equivalents of Titrant",
            formula: "eq_titrant = N_titrant * V_corrected",
            value: equivalents,
            unit: "eq",
        });
    }

    steps.push(DerivationStep {
        label: "Moles of Analyte",
        formula: "n_analyte = n_titrant * (ratio)",
        value: result.moles_of_analyte,
        unit: "mol",
    });

    steps.push(DerivationStep {
        label: "Analyte Concentration (mol/L)",
        formula: "C_analyte = n_analyte / V_sample",
        value: result.analyte_concentration_mol_l,
        unit: "mol/L",
    });

    if let Some(mass) = result.analyte_mass_in_sample {
        steps.push(DerivationStep {
            label: "Mass of Analyte",
            formula: "mass = n_analyte * MolarMass",
            value: mass,
            unit: "g",
        });
    }

    if let Some(purity) = result.analyte_purity {
        steps.push(DerivationStep {
            label: "Sample Purity",
            formula: "%Purity = (mass_analyte / mass_sample) * 100",
            value: purity,
            unit: "%",
        });
    }

    steps
}

/// Headline figures shown above the breakdown, as (value, unit) pairs
pub fn summary(result: &TitrationResult) -> Vec<(f64, &'static str)> {
    let mut items = vec![(result.analyte_concentration_mol_l, "mol/L")];
    if let Some(g_l) = result.analyte_concentration_g_l {
        items.push((g_l, "g/L"));
    }
    if let Some(purity) = result.analyte_purity {
        items.push((purity, "% purity"));
    }
    if let Some(normality) = result.analyte_concentration_normality {
        items.push((normality, "eq/L (N)"));
    }
    if let Some(mass) = result.analyte_mass_in_sample {
        items.push((mass, "g in sample"));
    }
    items
}

/// Render a full report for the terminal
pub fn render(result: &TitrationResult, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let name = if result.analyte_name.is_empty() {
        "analyte"
    } else {
        result.analyte_name.as_str()
    };

    // Writing to a String cannot fail
    let _ = writeln!(out, "Calculation Results for {}", name);
    let _ = writeln!(out);
    let _ = writeln!(out, "Analyte Concentration");
    for (value, unit) in summary(result) {
        let _ = writeln!(out, "  {} {}", format_number(value, display), unit);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Step-by-Step Breakdown");
    for (idx, step) in derivation_steps(result).iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}: {} {}",
            idx + 1,
            step.label,
            format_number(step.value, display),
            step.unit
        );
        let _ = writeln!(out, "     {}", step.formula);
    }

    out
}
