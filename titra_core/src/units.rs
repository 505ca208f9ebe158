//! Volume unit normalization.

use crate::VolumeUnit;

const MILLILITERS_PER_LITER: f64 = 1000.0;

/// Convert a volume to liters
pub fn to_liters(value: f64, unit: VolumeUnit) -> f64 {
    match unit {
        VolumeUnit::Liter => value,
        VolumeUnit::Milliliter => value / MILLILITERS_PER_LITER,
    }
}
