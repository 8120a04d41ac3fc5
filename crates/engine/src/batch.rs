//! Multi-company analysis from a CSV sheet.
//!
//! Expected header:
//!
//! ```text
//! name,ticker,shares_outstanding,share_price,btc_nav,fiat_debt,btc_yield_ytd,months_since_start,current_mnav,projected_yield,risk_score
//! ```
//!
//! `projected_yield` and `risk_score` may be left empty or omitted. Numeric
//! cells accept thousands separators and percent signs. Rows are read and
//! analyzed independently; a row that fails is reported without stopping the
//! rest of the sheet.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use treasury_common::error::AppError;
use treasury_common::types::{Company, CompanyReport, TreasuryParams};

use crate::coverage::CoverageCalculator;
use crate::input::{parse_number, parse_optional};

/// One sheet row as typed, before numeric parsing.
#[derive(Debug, Deserialize)]
struct SheetRecord {
    name: String,
    ticker: String,
    shares_outstanding: String,
    share_price: String,
    btc_nav: String,
    fiat_debt: String,
    btc_yield_ytd: String,
    months_since_start: String,
    current_mnav: String,
    #[serde(default)]
    projected_yield: String,
    #[serde(default)]
    risk_score: String,
}

/// One parsed row of the company sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRow {
    /// Zero-based data row index (header excluded)
    pub row: usize,
    pub name: String,
    pub ticker: String,
    pub shares_outstanding: f64,
    pub share_price: f64,
    pub btc_nav: f64,
    pub fiat_debt: f64,
    pub btc_yield_ytd: f64,
    pub months_since_start: f64,
    pub current_mnav: f64,
    pub projected_yield: Option<f64>,
    pub risk_score: Option<f64>,
}

impl CompanyRow {
    /// Parse numeric cells the same way hand-typed figures are parsed, so
    /// `1,000` and `12%` are accepted.
    fn from_record(row: usize, record: SheetRecord) -> Result<Self, AppError> {
        Ok(Self {
            row,
            shares_outstanding: parse_number(&record.shares_outstanding)?,
            share_price: parse_number(&record.share_price)?,
            btc_nav: parse_number(&record.btc_nav)?,
            fiat_debt: parse_number(&record.fiat_debt)?,
            btc_yield_ytd: parse_number(&record.btc_yield_ytd)?,
            months_since_start: parse_number(&record.months_since_start)?,
            current_mnav: parse_number(&record.current_mnav)?,
            projected_yield: parse_optional(&record.projected_yield)?,
            risk_score: parse_optional(&record.risk_score)?,
            name: record.name,
            ticker: record.ticker,
        })
    }

    pub fn company(&self) -> Company {
        Company {
            name: self.name.clone(),
            ticker: self.ticker.clone(),
        }
    }

    pub fn params(&self) -> TreasuryParams {
        TreasuryParams {
            shares_outstanding: self.shares_outstanding,
            share_price: self.share_price,
            btc_nav: self.btc_nav,
            fiat_debt: self.fiat_debt,
            btc_yield_ytd: self.btc_yield_ytd,
            months_since_start: self.months_since_start,
            current_mnav: self.current_mnav,
            projected_yield: self.projected_yield,
            risk_score: self.risk_score,
        }
    }

    /// Run the calculator on this row.
    pub fn analyze(&self) -> Result<CompanyReport, AppError> {
        let input = self.params().resolve();
        let result = CoverageCalculator::compute(&input)?;
        Ok(CompanyReport {
            company: self.company(),
            input,
            result,
        })
    }
}

/// A row that could not be read or analyzed.
#[derive(Debug)]
pub struct RowFailure {
    /// Zero-based data row index (header excluded)
    pub row: usize,
    pub ticker: String,
    pub error: AppError,
}

/// A company sheet split into usable rows and rows rejected while reading.
#[derive(Debug, Default)]
pub struct CompanySheet {
    pub rows: Vec<CompanyRow>,
    pub rejected: Vec<RowFailure>,
}

impl CompanySheet {
    /// Number of data rows in the sheet, readable or not.
    pub fn len(&self) -> usize {
        self.rows.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of analyzing a whole sheet. Reports and failures are each in
/// row order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reports: Vec<CompanyReport>,
    pub failures: Vec<RowFailure>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Read company rows from any CSV source.
///
/// Only an unreadable header or an I/O failure rejects the whole sheet. A row
/// with a malformed cell or the wrong number of fields becomes a
/// [`RowFailure`] and reading continues.
pub fn read_companies<R: Read>(reader: R) -> Result<CompanySheet, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let ticker_column = headers.iter().position(|h| h == "ticker");

    let mut sheet = CompanySheet::default();
    for (index, record) in csv_reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                sheet.rejected.push(RowFailure {
                    row: index,
                    ticker: String::new(),
                    error: e.into(),
                });
                continue;
            }
        };

        let ticker = ticker_column
            .and_then(|column| record.get(column))
            .unwrap_or_default()
            .to_string();

        let parsed = record
            .deserialize::<SheetRecord>(Some(&headers))
            .map_err(AppError::from)
            .and_then(|raw| CompanyRow::from_record(index, raw));

        match parsed {
            Ok(row) => sheet.rows.push(row),
            Err(error) => sheet.rejected.push(RowFailure {
                row: index,
                ticker,
                error,
            }),
        }
    }
    Ok(sheet)
}

/// Read company rows from a CSV file on disk.
pub fn load_companies(path: &Path) -> Result<CompanySheet, AppError> {
    let file = std::fs::File::open(path)?;
    let sheet = read_companies(file)?;
    tracing::info!(
        path = %path.display(),
        companies = sheet.rows.len(),
        rejected = sheet.rejected.len(),
        "Loaded company sheet"
    );
    Ok(sheet)
}

/// Analyze every readable row independently. Rows rejected while reading
/// are carried into the failures.
pub fn analyze_companies(sheet: CompanySheet) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        reports: Vec::with_capacity(sheet.rows.len()),
        failures: sheet.rejected,
    };

    for row in &sheet.rows {
        match row.analyze() {
            Ok(report) => outcome.reports.push(report),
            Err(error) => outcome.failures.push(RowFailure {
                row: row.row,
                ticker: row.ticker.clone(),
                error,
            }),
        }
    }

    outcome.failures.sort_by_key(|failure| failure.row);
    for failure in &outcome.failures {
        tracing::warn!(
            row = failure.row,
            ticker = %failure.ticker,
            error = %failure.error,
            "Skipping company row"
        );
    }

    outcome
}
