//! CSV export of calculation history.
//!
//! The export file is written to a temp file in the target directory and
//! renamed into place, so a reader never sees a half-written export.

use crate::{Error, Result, TitrationRecord};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: i64,
    created_at: Option<String>,
    titration_type: &'static str,
    titrant_name: String,
    titrant_concentration: f64,
    titrant_concentration_unit: &'static str,
    analyte_name: String,
    titration_volume: f64,
    titration_volume_unit: &'static str,
    blank_volume: f64,
    blank_volume_unit: &'static str,
    sample_volume: f64,
    sample_volume_unit: &'static str,
    stoichiometry: String,
    corrected_titrant_volume_l: f64,
    moles_of_titrant: f64,
    moles_of_analyte: f64,
    analyte_concentration_mol_l: f64,
    analyte_concentration_normality: Option<f64>,
    analyte_concentration_g_l: Option<f64>,
    analyte_mass_in_sample: Option<f64>,
    analyte_purity: Option<f64>,
}

impl From<&TitrationRecord> for CsvRow {
    fn from(record: &TitrationRecord) -> Self {
        let input = &record.input;
        let result = &record.result;
        CsvRow {
            id: record.id,
            created_at: record.created_at().map(|t| t.to_rfc3339()),
            titration_type: input.titration_type.display_name(),
            titrant_name: input.titrant_name.clone(),
            titrant_concentration: input.titrant_concentration,
            titrant_concentration_unit: input.titrant_concentration_unit.symbol(),
            analyte_name: input.analyte_name.clone(),
            titration_volume: input.titration_volume,
            titration_volume_unit: input.titration_volume_unit.symbol(),
            blank_volume: input.blank_volume,
            blank_volume_unit: input.blank_volume_unit.symbol(),
            sample_volume: input.sample_volume,
            sample_volume_unit: input.sample_volume_unit.symbol(),
            stoichiometry: format!(
                "{}:{}",
                input.titrant_stoichiometry, input.analyte_stoichiometry
            ),
            corrected_titrant_volume_l: result.corrected_titrant_volume_l,
            moles_of_titrant: result.moles_of_titrant,
            moles_of_analyte: result.moles_of_analyte,
            analyte_concentration_mol_l: result.analyte_concentration_mol_l,
            analyte_concentration_normality: result.analyte_concentration_normality,
            analyte_concentration_g_l: result.analyte_concentration_g_l,
            analyte_mass_in_sample: result.analyte_mass_in_sample,
            analyte_purity: result.analyte_purity,
        }
    }
}

/// Write records as CSV (with headers) to any writer
pub fn write_csv<W: Write>(records: &[TitrationRecord], writer: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Export records to a CSV file, replacing it if it exists
///
/// Returns the number of rows written.
pub fn export_csv(records: &[TitrationRecord], path: &Path) -> Result<usize> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    let count = write_csv(records, temp.as_file())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} records to {:?}", count, path);
    Ok(count)
}
