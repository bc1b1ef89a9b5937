use std::collections::HashMap;
use std::fs;
use std::path::Path;
use na::DMatrix;

use crate::error::{DiodemError, Result};
use crate::signal::Signal;
use crate::tree::Tree;
use crate::Float;

pub mod provider;
pub mod cache;
pub mod loading_parameters;
pub mod diodem_loader;

/// Lines between the `label: rate` header and the column names.
pub const HEADER_SKIP_ROWS: usize = 2;

pub fn parse_to_float(string: &str) -> Option<Float> {
    match string.trim() {
        "" => Some(Float::NAN),
        s if s.eq_ignore_ascii_case("nan") => Some(Float::NAN),
        s => s.parse::<Float>().ok()
    }
}

/// Reads the rate from a `label: rate` line.
pub fn parse_header_rate(line: &str) -> Option<Float> {
    line.split(':').nth(1).and_then(|v| v.trim().parse::<Float>().ok())
}

/// A recording file: rate from the header line, then named columns of samples.
pub struct RecordingTable {
    pub hz: Float,
    pub path: String,
    columns: HashMap<String, usize>,
    rows: Vec<Vec<Float>>
}

impl RecordingTable {

    pub fn load(file_path: &Path) -> Result<RecordingTable> {
        let contents = fs::read_to_string(file_path)?;
        RecordingTable::parse(&contents, &file_path.display().to_string())
    }

    pub fn parse(contents: &str, path: &str) -> Result<RecordingTable> {
        let mut parts = contents.splitn(HEADER_SKIP_ROWS + 1, '\n');
        let hz = parts.next().and_then(parse_header_rate).ok_or_else(|| DiodemError::MalformedHeader { path: path.to_string() })?;
        let table = parts.nth(HEADER_SKIP_ROWS - 1).unwrap_or("");

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(table.as_bytes());
        let headers = reader.headers()?.iter().map(|h| h.to_string()).collect::<Vec<String>>();
        let columns = headers.iter().enumerate().map(|(i, h)| (h.clone(), i)).collect::<HashMap<String, usize>>();

        let mut rows = Vec::<Vec<Float>>::new();
        for record in reader.records() {
            let record = record?;
            let mut row = Vec::<Float>::with_capacity(record.len());
            for (i, field) in record.iter().enumerate() {
                let value = parse_to_float(field).ok_or_else(|| DiodemError::MalformedValue {
                    path: path.to_string(),
                    column: headers.get(i).cloned().unwrap_or_default(),
                    value: field.to_string()
                })?;
                row.push(value);
            }
            rows.push(row);
        }

        Ok(RecordingTable { hz, path: path.to_string(), columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Result<Vec<Float>> {
        let idx = *self.columns.get(name).ok_or_else(|| DiodemError::MissingColumn { path: self.path.clone(), column: name.to_string() })?;
        Ok(self.rows.iter().map(|row| row.get(idx).copied().unwrap_or(Float::NAN)).collect())
    }

    /// Columns `prefix + c` for every char `c` of `axes`, side by side.
    pub fn stack(&self, prefix: &str, axes: &str) -> Result<DMatrix<Float>> {
        let cols = axes.chars().map(|c| self.column(&format!("{}{}", prefix, c))).collect::<Result<Vec<Vec<Float>>>>()?;
        Ok(DMatrix::from_fn(self.len(), cols.len(), |r, c| cols[c][r]))
    }
}

/// Writes a tree whose leaves share one length as CSV, one column per leaf channel named `path_cN`.
pub fn write_csv<W: std::io::Write>(data: &Tree<Signal>, writer: W) -> Result<()> {
    let leaves = data.flatten_with_paths();
    let rows = leaves.first().map_or(0, |(_, s)| s.len());
    if let Some((path, s)) = leaves.iter().find(|(_, s)| s.len() != rows) {
        return Err(DiodemError::InvalidSignalShape {
            shape: s.shape(),
            reason: format!("`{}` has {} samples where {} are expected, resample to a single rate before writing", path, s.len(), rows)
        });
    }

    let mut writer = csv::Writer::from_writer(writer);
    let header = leaves.iter()
        .flat_map(|(path, s)| (0..s.channels()).map(move |c| format!("{}_c{}", path.replace('/', "_"), c)))
        .collect::<Vec<String>>();
    writer.write_record(&header)?;
    for r in 0..rows {
        let record = leaves.iter()
            .flat_map(|(_, s)| s.sample(r))
            .map(|v| v.to_string())
            .collect::<Vec<String>>();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
