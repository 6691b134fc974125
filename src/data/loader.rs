use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, anyhow};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::Observation;
use super::region::RegionTable;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Load configuration
// ---------------------------------------------------------------------------

/// Source column names. Defaults follow the ITU `DH_INT_BAND_PER_CAP` export.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub code: String,
    /// Optional in the source; the code is used as the name when absent.
    pub label: String,
    pub period: String,
    pub value: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            code: "REF_AREA".to_string(),
            label: "REF_AREA_LABEL".to_string(),
            period: "TIME_PERIOD".to_string(),
            value: "OBS_VALUE".to_string(),
        }
    }
}

impl ColumnMapping {
    fn required(&self) -> [&str; 3] {
        [self.code.as_str(), self.period.as_str(), self.value.as_str()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub columns: ColumnMapping,
    pub regions: RegionTable,
}

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// A loosely typed cell as it came out of the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

impl RawCell {
    fn as_text(&self) -> Option<String> {
        match self {
            RawCell::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            RawCell::Text(_) | RawCell::Missing => None,
            RawCell::Integer(i) => Some(i.to_string()),
            RawCell::Float(f) => Some(f.to_string()),
        }
    }

    fn as_year(&self) -> Option<i32> {
        match self {
            RawCell::Text(s) => s.trim().parse().ok(),
            RawCell::Integer(i) => i32::try_from(*i).ok(),
            RawCell::Float(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Some(*f as i32),
            RawCell::Float(_) | RawCell::Missing => None,
        }
    }

    fn as_bandwidth(&self) -> Option<f64> {
        let value = match self {
            RawCell::Text(s) => s.trim().parse::<f64>().ok()?,
            RawCell::Integer(i) => *i as f64,
            RawCell::Float(f) => *f,
            RawCell::Missing => return None,
        };
        (value.is_finite() && value >= 0.0).then_some(value)
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

/// One source row reduced to the columns the parser cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub code: RawCell,
    pub label: RawCell,
    pub period: RawCell,
    pub value: RawCell,
}

// ---------------------------------------------------------------------------
// Record parser
// ---------------------------------------------------------------------------

/// Turn raw rows into observations, dropping rows whose year or value is
/// unusable. Surviving rows keep their input order.
pub fn parse_rows<I>(rows: I, regions: &RegionTable) -> Vec<Observation>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut dropped = 0usize;
    let observations: Vec<Observation> = rows
        .into_iter()
        .filter_map(|row| {
            let parsed = parse_row(&row, regions);
            if parsed.is_none() {
                dropped += 1;
            }
            parsed
        })
        .collect();

    if dropped > 0 {
        log::debug!("dropped {dropped} malformed rows");
    }
    observations
}

fn parse_row(row: &RawRow, regions: &RegionTable) -> Option<Observation> {
    let year = row.period.as_year()?;
    let bandwidth = row.value.as_bandwidth()?;
    let country_code = row.code.as_text().unwrap_or_default();
    let country = row.label.as_text().unwrap_or_else(|| country_code.clone());
    let region = Some(regions.resolve(&country_code).to_string());

    Some(Observation {
        country,
        country_code,
        year,
        bandwidth,
        region,
    })
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load observations from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one row per (country, year)
/// * `.json`    – `[{ "REF_AREA": "USA", "TIME_PERIOD": 2020, ... }, ...]`
/// * `.parquet` – flat columns with the same names as the CSV header
pub fn load_observations(path: &Path, options: &LoadOptions) -> Result<Vec<Observation>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(open(path)?, &options.columns)?,
        "json" => read_json(open(path)?, &options.columns)?,
        "parquet" | "pq" => read_parquet(open(path)?, &options.columns)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let total = rows.len();
    let observations = parse_rows(rows, &options.regions);
    log::info!(
        "Loaded {} observations from {} ({} rows read)",
        observations.len(),
        path.display(),
        total
    );
    Ok(observations)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn missing(column: &str) -> LoadError {
    LoadError::MissingColumn {
        column: column.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Header-driven CSV reader. Short rows are tolerated and end up as missing
/// cells, which the parser then drops.
pub fn read_csv<R: Read>(reader: R, columns: &ColumnMapping) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let position = |name: &str| headers.iter().position(|h| h == name);
    for name in columns.required() {
        if position(name).is_none() {
            return Err(missing(name));
        }
    }
    let code_idx = position(columns.code.as_str());
    let label_idx = position(columns.label.as_str());
    let period_idx = position(columns.period.as_str());
    let value_idx = position(columns.value.as_str());

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(RawCell::from)
                .unwrap_or(RawCell::Missing)
        };
        rows.push(RawRow {
            code: cell(code_idx),
            label: cell(label_idx),
            period: cell(period_idx),
            value: cell(value_idx),
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "REF_AREA": "USA", "REF_AREA_LABEL": "United States",
///     "TIME_PERIOD": 2020, "OBS_VALUE": 512.3 },
///   ...
/// ]
/// ```
pub fn read_json<R: Read>(reader: R, columns: &ColumnMapping) -> Result<Vec<RawRow>, LoadError> {
    let root: JsonValue = serde_json::from_reader(reader).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let objects = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<anyhow::Result<Vec<&Map<String, JsonValue>>>>()?;

    if !objects.is_empty() {
        for name in columns.required() {
            if !objects.iter().any(|obj| obj.contains_key(name)) {
                return Err(missing(name));
            }
        }
    }

    let cell = |obj: &Map<String, JsonValue>, name: &str| {
        obj.get(name).map(json_to_cell).unwrap_or(RawCell::Missing)
    };
    Ok(objects
        .into_iter()
        .map(|obj| RawRow {
            code: cell(obj, columns.code.as_str()),
            label: cell(obj, columns.label.as_str()),
            period: cell(obj, columns.period.as_str()),
            value: cell(obj, columns.value.as_str()),
        })
        .collect())
}

fn json_to_cell(val: &JsonValue) -> RawCell {
    match val {
        JsonValue::String(s) => RawCell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawCell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                RawCell::Float(f)
            } else {
                RawCell::Text(n.to_string())
            }
        }
        JsonValue::Null => RawCell::Missing,
        other => RawCell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): strings, 32/64-bit integers and floats
/// are accepted in every column.
pub fn read_parquet(file: File, columns: &ColumnMapping) -> Result<Vec<RawRow>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    for name in columns.required() {
        if schema.index_of(name).is_err() {
            return Err(missing(name));
        }
    }
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let column = |name: &str| batch.schema().index_of(name).ok().map(|i| batch.column(i).clone());
        let code_col = column(columns.code.as_str()).ok_or_else(|| missing(&columns.code))?;
        let label_col = column(columns.label.as_str());
        let period_col = column(columns.period.as_str()).ok_or_else(|| missing(&columns.period))?;
        let value_col = column(columns.value.as_str()).ok_or_else(|| missing(&columns.value))?;

        for row in 0..batch.num_rows() {
            rows.push(RawRow {
                code: extract_cell(&code_col, row)?,
                label: match &label_col {
                    Some(col) => extract_cell(col, row)?,
                    None => RawCell::Missing,
                },
                period: extract_cell(&period_col, row)?,
                value: extract_cell(&value_col, row)?,
            });
        }
    }
    Ok(rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> anyhow::Result<RawCell> {
    if col.is_null(row) {
        return Ok(RawCell::Missing);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => RawCell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RawCell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => RawCell::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => RawCell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => RawCell::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => RawCell::Float(col.as_primitive::<Float64Type>().value(row)),
        other => return Err(anyhow!("unsupported parquet column type {other:?}")),
    };
    Ok(cell)
}
