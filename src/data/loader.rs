use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Peak, RawReferenceEntry};
use crate::error::AnalysisError;

/// SNFG monosaccharide table shipped with the crate.
const BUNDLED_REFERENCE: &str = include_str!("../../assets/mono.json");

// ---------------------------------------------------------------------------
// Peak lists
// ---------------------------------------------------------------------------

/// Load a peak list from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`      – comma separated, first column m/z, second intensity
/// * `.tsv`/`.txt` – the same, tab separated
/// * `.parquet`  – first two numeric columns are m/z and intensity
///
/// Rows whose m/z or intensity is not a number are dropped, which also takes
/// care of header rows.
pub fn load_peaks(path: &Path) -> Result<Vec<Peak>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let peaks = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV peak list")?;
            parse_delimited(file, b',')?
        }
        "tsv" | "txt" => {
            let file = std::fs::File::open(path).context("opening TSV peak list")?;
            parse_delimited(file, b'\t')?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported peak list extension: .{other}"),
    };

    info!("Loaded {} peaks from {}", peaks.len(), path.display());
    Ok(peaks)
}

/// Parse a delimited peak table without assuming a header row.
pub fn parse_delimited<R: Read>(source: R, delimiter: u8) -> Result<Vec<Peak>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(source);

    let mut peaks = Vec::new();
    let mut skipped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("peak list row {row_no}"))?;
        let mz = record.get(0).and_then(|s| s.parse::<f64>().ok());
        let intensity = record.get(1).and_then(|s| s.parse::<f64>().ok());

        match (mz, intensity) {
            (Some(mz), Some(intensity)) if mz.is_finite() => {
                peaks.push(Peak::new(mz, intensity));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {skipped} non-numeric peak list rows");
    }
    Ok(peaks)
}

/// Load a Parquet peak list.
///
/// The first two numeric columns of the schema are taken as m/z and
/// intensity, whatever they are called.
fn load_parquet(path: &Path) -> Result<Vec<Peak>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut peaks = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let numeric: Vec<usize> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| is_numeric(f.data_type()))
            .map(|(i, _)| i)
            .collect();
        let [mz_idx, intensity_idx, ..] = numeric.as_slice() else {
            bail!("Parquet peak list needs two numeric columns, found {}", numeric.len());
        };

        let mz = extract_f64_column(batch.column(*mz_idx)).context("reading m/z column")?;
        let intensity =
            extract_f64_column(batch.column(*intensity_idx)).context("reading intensity column")?;

        peaks.extend(
            mz.into_iter()
                .zip(intensity)
                .filter_map(|(mz, intensity)| match (mz, intensity) {
                    (Some(mz), Some(intensity)) if mz.is_finite() => Some(Peak::new(mz, intensity)),
                    _ => None,
                }),
        );
    }

    Ok(peaks)
}

// -- Parquet / Arrow helpers --

fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32
    )
}

/// Read a numeric column as `f64`, keeping nulls as `None`.
fn extract_f64_column(col: &Arc<dyn Array>) -> Result<Vec<Option<f64>>> {
    let values: Vec<Option<f64>> = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .iter()
            .collect(),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .iter()
            .map(|v| v.map(|i| i as f64))
            .collect(),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(values)
}

// ---------------------------------------------------------------------------
// Reference tables
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "name": "Hexose", "m/z": 180.06339, "symbol": "Hex", "symbol_description": "White circle" },
///   ...
/// ]
/// ```
pub fn load_reference(path: &Path) -> Result<Vec<RawReferenceEntry>, AnalysisError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AnalysisError::ReferenceLoad(format!("reading {}: {e}", path.display()))
    })?;
    parse_reference(&text)
}

pub fn parse_reference(text: &str) -> Result<Vec<RawReferenceEntry>, AnalysisError> {
    serde_json::from_str(text).map_err(|e| AnalysisError::ReferenceLoad(e.to_string()))
}

/// The bundled SNFG monosaccharide reference.
pub fn default_reference() -> Result<Vec<RawReferenceEntry>, AnalysisError> {
    parse_reference(BUNDLED_REFERENCE)
}
