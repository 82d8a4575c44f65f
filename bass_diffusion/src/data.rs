//! Sales time series loading and derived adoption features

use crate::error::{BassError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Field delimiter of a supported input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delimiter {
    /// `.csv` files
    Comma,
    /// `.txt` files
    Tab,
}

impl Delimiter {
    /// Delimiter implied by a file extension (case-insensitive)
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Delimiter::Comma),
            "txt" => Some(Delimiter::Tab),
            _ => None,
        }
    }

    /// Raw delimiter byte
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Options controlling how input files are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Overrides the delimiter implied by the file extension
    pub delimiter: Option<Delimiter>,
    /// Whether the first row is a header
    pub has_header: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
        }
    }
}

impl LoaderOptions {
    /// Force a delimiter regardless of extension
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set whether the first row is a header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

/// Historical sales with the features used by the Bass regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesData {
    /// File name without extension, or a caller-supplied label
    source_name: String,
    /// Period labels, kept verbatim
    periods: Vec<String>,
    /// Sales per period
    sales: Vec<f64>,
    /// Running total of sales
    cumulative_sales: Vec<f64>,
    /// Element-wise square of the running total
    cumulative_sales_squared: Vec<f64>,
    /// 0-based index of the largest observed sales value
    peak_index: Option<usize>,
}

impl SalesData {
    /// Create a dataset from period labels and sales values
    pub fn new(periods: Vec<String>, sales: Vec<f64>) -> Result<Self> {
        if periods.len() != sales.len() {
            return Err(BassError::InvalidParameter(format!(
                "Periods length ({}) doesn't match sales length ({})",
                periods.len(),
                sales.len()
            )));
        }
        if let Some(pos) = sales.iter().position(|v| !v.is_finite()) {
            return Err(BassError::InvalidParameter(format!(
                "Sales value at position {} is not finite",
                pos
            )));
        }

        Ok(Self::derive("in-memory".to_string(), periods, sales))
    }

    /// Create a dataset whose periods are labelled `1..=n`
    pub fn from_sales(sales: Vec<f64>) -> Result<Self> {
        let periods = (1..=sales.len()).map(|t| t.to_string()).collect();
        Self::new(periods, sales)
    }

    /// Replace the source name used in reports
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    fn derive(source_name: String, periods: Vec<String>, sales: Vec<f64>) -> Self {
        let cumulative_sales: Vec<f64> = sales
            .iter()
            .scan(0.0, |total, &s| {
                *total += s;
                Some(*total)
            })
            .collect();
        let cumulative_sales_squared = cumulative_sales.iter().map(|c| c * c).collect();

        let peak_index = sales
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &s)| match best {
                Some((_, top)) if top >= s => best,
                _ => Some((i, s)),
            })
            .map(|(i, _)| i);

        Self {
            source_name,
            periods,
            sales,
            cumulative_sales,
            cumulative_sales_squared,
            peak_index,
        }
    }

    /// Name of the data source
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Period labels
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Sales per period
    pub fn sales(&self) -> &[f64] {
        &self.sales
    }

    /// Running total of sales
    pub fn cumulative_sales(&self) -> &[f64] {
        &self.cumulative_sales
    }

    /// Squared running total of sales
    pub fn cumulative_sales_squared(&self) -> &[f64] {
        &self.cumulative_sales_squared
    }

    /// 1-based time index `t = 1..=n`
    pub fn time_index(&self) -> Vec<f64> {
        (1..=self.len()).map(|t| t as f64).collect()
    }

    /// Total observed sales
    pub fn total_sales(&self) -> f64 {
        self.cumulative_sales.last().copied().unwrap_or(0.0)
    }

    /// 0-based index of the peak observed sales (first one on ties)
    pub fn peak_index(&self) -> Option<usize> {
        self.peak_index
    }

    /// Label of the period with peak observed sales
    pub fn peak_period(&self) -> Option<&str> {
        self.peak_index.map(|i| self.periods[i].as_str())
    }

    /// Time index of the peak observed sales
    pub fn peak_time(&self) -> Option<usize> {
        self.peak_index.map(|i| i + 1)
    }

    /// Check if the time series is empty
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Get the length of the time series
    pub fn len(&self) -> usize {
        self.sales.len()
    }
}

/// Data loader for two-column sales files
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    options: LoaderOptions,
}

impl DataLoader {
    /// Create a loader with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom options
    pub fn with_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Load a `.csv` or `.txt` file with default options
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SalesData> {
        Self::new().load(path)
    }

    /// Parse sales data from any reader
    pub fn from_reader<R: Read>(
        reader: R,
        delimiter: Delimiter,
        source_name: &str,
    ) -> Result<SalesData> {
        Self::new().parse(reader, delimiter, source_name)
    }

    /// Load a `.csv` (comma) or `.txt` (tab) file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<SalesData> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let implied = Delimiter::from_extension(extension).ok_or_else(|| {
            BassError::InvalidFormat(format!(
                "Unsupported file format \"{}\". Expected csv or txt.",
                extension
            ))
        })?;
        let delimiter = self.options.delimiter.unwrap_or(implied);

        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                BassError::NotFound(format!("File not found: {}", path.display()))
            }
            _ => BassError::IoError(e),
        })?;

        let source_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        info!("Loading sales data from {}", path.display());
        self.parse(file, delimiter, source_name)
    }

    fn parse<R: Read>(
        &self,
        reader: R,
        delimiter: Delimiter,
        source_name: &str,
    ) -> Result<SalesData> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(self.options.has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        if self.options.has_header {
            let columns = reader.headers()?.len();
            if columns != 2 {
                return Err(BassError::ParseError(format!(
                    "Header has {} columns, expected 2 (period, sales)",
                    columns
                )));
            }
        }

        let mut periods = Vec::new();
        let mut sales = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let row = row + 1;

            if record.len() != 2 {
                return Err(BassError::ParseError(format!(
                    "Row {} has {} columns, expected 2",
                    row,
                    record.len()
                )));
            }

            let value: f64 = record[1].parse().map_err(|_| {
                BassError::ParseError(format!(
                    "Row {}: sales value '{}' is not numeric",
                    row, &record[1]
                ))
            })?;
            if !value.is_finite() {
                return Err(BassError::ParseError(format!(
                    "Row {}: sales value '{}' is not finite",
                    row, &record[1]
                )));
            }

            periods.push(record[0].to_string());
            sales.push(value);
        }

        debug!("Parsed {} rows from '{}'", sales.len(), source_name);
        Ok(SalesData::derive(source_name.to_string(), periods, sales))
    }
}
