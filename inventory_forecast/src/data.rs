//! CSV ingestion for daily inventory records
//!
//! Parsing happens in two layers. [`CsvTable`] is the untyped view: every
//! field is coerced to a number when the whole trimmed field is numeric and
//! kept as text otherwise. [`DataLoader`] resolves an explicit
//! [`InventorySchema`] against the header once and turns table rows into
//! typed [`RawRecord`]s, applying the configured [`RowPolicy`] to rows that
//! do not fit.

use crate::config::RowPolicy;
use crate::error::{InventoryError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Small bundled dataset used when no input file is given
pub const SAMPLE_CSV: &str = include_str!("../data/sample_inventory.csv");

/// Date format of the `DATA_EVENTO` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static MISSING: FieldValue = FieldValue::Missing;

/// One field of an untyped CSV row
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// The row ended before this column
    Missing,
}

impl FieldValue {
    /// Coerce a raw field: numeric when the trimmed field is non-empty and
    /// parses as a number, text otherwise
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if let Ok(number) = trimmed.parse::<f64>() {
                if number.is_finite() {
                    return FieldValue::Number(number);
                }
            }
        }
        FieldValue::Text(raw.to_string())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

/// Header plus coerced rows of a comma-separated document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl CsvTable {
    /// Parse comma-separated text with a header line.
    ///
    /// Fewer than two lines yields an empty table. Rows shorter than the
    /// header are padded with [`FieldValue::Missing`]; extra trailing fields
    /// are dropped.
    pub fn parse(text: &str) -> Self {
        if text.lines().filter(|l| !l.trim().is_empty()).count() < 2 {
            debug!("fewer than two lines of CSV input, returning an empty table");
            return Self::default();
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = match reader.headers() {
            Ok(record) => record.iter().map(str::to_string).collect(),
            Err(err) => {
                warn!(error = %err, "unreadable CSV header");
                return Self::default();
            }
        };

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    warn!(row = index + 2, error = %err, "unreadable CSV row");
                    continue;
                }
            };

            let row = (0..headers.len())
                .map(|col| match record.get(col) {
                    Some(raw) => FieldValue::coerce(raw),
                    None => FieldValue::Missing,
                })
                .collect();
            rows.push(row);
        }

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<FieldValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header, matched case-insensitively
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Field of `row` under header `name`
    pub fn get(&self, row: usize, name: &str) -> Option<&FieldValue> {
        let col = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

/// Declared type of a schema column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Non-negative whole number
    Count,
    Decimal,
    /// 0/1 (or true/false)
    Flag,
    /// ISO `YYYY-MM-DD`
    Date,
}

/// Columns of the inventory table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ProductId = 0,
    EventDate,
    Stock,
    Price,
    Promotion,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::ProductId,
        Column::EventDate,
        Column::Stock,
        Column::Price,
        Column::Promotion,
    ];

    /// Canonical header name
    pub fn header(&self) -> &'static str {
        match self {
            Column::ProductId => "ID_PRODUTO",
            Column::EventDate => "DATA_EVENTO",
            Column::Stock => "QUANTIDADE_ESTOQUE",
            Column::Price => "PRECO",
            Column::Promotion => "FLAG_PROMOCAO",
        }
    }

    /// English header names accepted in place of the canonical one
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::ProductId => &["product_id"],
            Column::EventDate => &["event_date", "date"],
            Column::Stock => &["stock", "stock_quantity"],
            Column::Price => &["price"],
            Column::Promotion => &["promotion", "promotion_flag"],
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::ProductId | Column::Stock => ColumnType::Count,
            Column::EventDate => ColumnType::Date,
            Column::Price => ColumnType::Decimal,
            Column::Promotion => ColumnType::Flag,
        }
    }
}

/// The inventory columns resolved to positions in a concrete header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySchema {
    positions: [usize; 5],
}

impl InventorySchema {
    /// Resolve every column by header name, in any order
    pub fn resolve(table: &CsvTable) -> Result<Self> {
        let mut positions = [0usize; 5];
        for column in Column::ALL {
            let found = std::iter::once(column.header())
                .chain(column.aliases().iter().copied())
                .find_map(|name| table.column_index(name));

            positions[column as usize] = found.ok_or_else(|| {
                InventoryError::DataError(format!(
                    "Missing required column {}",
                    column.header()
                ))
            })?;
        }
        Ok(Self { positions })
    }

    /// Position of `column` in the header
    pub fn position(&self, column: Column) -> usize {
        self.positions[column as usize]
    }

    /// Convert one table row into a typed record
    pub fn record(&self, row: &[FieldValue], line: usize) -> Result<RawRecord> {
        let typed = |column: Column| -> Result<TypedValue> {
            let field = row
                .get(self.position(column))
                .unwrap_or(&MISSING);
            column
                .column_type()
                .convert(field)
                .map_err(|reason| InventoryError::InvalidRow {
                    line,
                    column: column.header().to_string(),
                    reason,
                })
        };

        match (
            typed(Column::ProductId)?,
            typed(Column::EventDate)?,
            typed(Column::Stock)?,
            typed(Column::Price)?,
            typed(Column::Promotion)?,
        ) {
            (
                TypedValue::Count(product_id),
                TypedValue::Date(date),
                TypedValue::Count(stock),
                TypedValue::Decimal(price),
                TypedValue::Flag(promotion),
            ) => Ok(RawRecord {
                product_id,
                date,
                stock,
                price,
                promotion,
            }),
            _ => Err(InventoryError::DataError(format!(
                "Row {}: column types do not match the inventory schema",
                line
            ))),
        }
    }
}

/// A field converted according to its [`ColumnType`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedValue {
    Count(u32),
    Decimal(f64),
    Flag(bool),
    Date(NaiveDate),
}

impl ColumnType {
    /// Convert a coerced field, describing the mismatch on failure
    pub fn convert(&self, value: &FieldValue) -> std::result::Result<TypedValue, String> {
        match (self, value) {
            (_, FieldValue::Missing) => Err("missing".to_string()),
            (ColumnType::Count, FieldValue::Number(n))
                if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 =>
            {
                Ok(TypedValue::Count(*n as u32))
            }
            (ColumnType::Decimal, FieldValue::Number(n)) => Ok(TypedValue::Decimal(*n)),
            (ColumnType::Flag, FieldValue::Number(n)) if *n == 0.0 || *n == 1.0 => {
                Ok(TypedValue::Flag(*n == 1.0))
            }
            (ColumnType::Flag, FieldValue::Text(s)) if s.trim().eq_ignore_ascii_case("true") => {
                Ok(TypedValue::Flag(true))
            }
            (ColumnType::Flag, FieldValue::Text(s)) if s.trim().eq_ignore_ascii_case("false") => {
                Ok(TypedValue::Flag(false))
            }
            (ColumnType::Date, FieldValue::Text(s)) => {
                NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                    .map(TypedValue::Date)
                    .map_err(|e| format!("{:?} is not a YYYY-MM-DD date: {}", s, e))
            }
            (ColumnType::Count, FieldValue::Number(n)) => Err(format!("{} is not a count", n)),
            (ColumnType::Flag, other) => Err(format!("{:?} is not a 0/1 flag", other)),
            (_, FieldValue::Number(n)) => Err(format!("{} is not a date", n)),
            (_, FieldValue::Text(s)) => Err(format!("{:?} is not numeric", s)),
        }
    }
}

/// One row of the source table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub product_id: u32,
    pub date: NaiveDate,
    pub stock: u32,
    pub price: f64,
    pub promotion: bool,
}

/// Loader turning CSV text into typed inventory records
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load records from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, policy: RowPolicy) -> Result<Vec<RawRecord>> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text, policy)
    }

    /// Load records from CSV text.
    ///
    /// Under [`RowPolicy::Skip`] this never fails: a header without the
    /// required columns or an unreadable document yields no records.
    pub fn from_text(text: &str, policy: RowPolicy) -> Result<Vec<RawRecord>> {
        let table = CsvTable::parse(text);
        if table.headers().is_empty() {
            return Ok(Vec::new());
        }

        let schema = match InventorySchema::resolve(&table) {
            Ok(schema) => schema,
            Err(err) if policy == RowPolicy::Skip => {
                warn!(error = %err, "header does not match the inventory schema");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        let mut records = Vec::with_capacity(table.len());
        let mut skipped = 0usize;
        for (index, row) in table.rows().iter().enumerate() {
            match schema.record(row, index + 2) {
                Ok(record) => records.push(record),
                Err(err) if policy == RowPolicy::Skip => {
                    warn!(error = %err, "skipping row");
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        debug!(records = records.len(), skipped, "parsed inventory records");
        Ok(records)
    }
}

/// Lenient parse: malformed input and bad rows are dropped, never an error
pub fn parse_records(text: &str) -> Vec<RawRecord> {
    DataLoader::from_text(text, RowPolicy::Skip).unwrap_or_default()
}
