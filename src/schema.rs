//! Typed loading of delimiter-separated source files.
//!
//! Each record type declares its columns and their types through the [Record] trait. The loader
//! resolves the declared columns against the header row, coerces every declared cell, including
//! cells of columns that the record type does not keep, and then builds the typed record.

use crate::error::PipelineError;
use crate::models::{DeforestationRecord, RawWeatherRecord};

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use strum_macros::Display;
use tracing::{debug, warn};

/// Type of the values held in a column
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// A column declared by a [Record] type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn integer(name: &'static str) -> Self {
        Column {
            name,
            kind: ColumnKind::Integer,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Column {
            name,
            kind: ColumnKind::Float,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Column {
            name,
            kind: ColumnKind::Text,
        }
    }
}

/// What to do with a row holding a value that does not match its column type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MalformedRows {
    /// Abort loading with an error
    #[default]
    Reject,
    /// Drop the row and log a warning
    Skip,
}

/// Options controlling how a source file is parsed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Character separating the integer and fractional parts of floats
    pub decimal_mark: char,
    /// Policy for rows with malformed values
    pub malformed_rows: MalformedRows,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            delimiter: b';',
            decimal_mark: ',',
            malformed_rows: MalformedRows::Reject,
        }
    }
}

/// Trait for records that can be loaded from delimited text.
pub trait Record: Sized {
    /// Columns that must be present in the header and coercible to their declared type.
    const COLUMNS: &'static [Column];

    /// Build a record from a row whose declared cells have already been type checked.
    fn from_row(row: &Row<'_>) -> Result<Self, PipelineError>;
}

/// View of one data row restricted to the columns declared by a [Record].
pub struct Row<'a> {
    record: &'a StringRecord,
    columns: &'static [Column],
    indices: &'a [usize],
    line: u64,
    decimal_mark: char,
}

impl<'a> Row<'a> {
    /// Line number of the row in the source file (the header is line 1).
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns the value of an integer column.
    pub fn integer<T: FromStr>(&self, name: &'static str) -> Result<T, PipelineError> {
        let (column, value) = self.cell(name)?;
        value
            .trim()
            .parse::<T>()
            .map_err(|_| self.invalid(column, value))
    }

    /// Returns the value of a float column, honouring the configured decimal mark.
    pub fn float(&self, name: &'static str) -> Result<f64, PipelineError> {
        let (column, value) = self.cell(name)?;
        parse_float(value, self.decimal_mark).ok_or_else(|| self.invalid(column, value))
    }

    /// Returns the value of a text column verbatim.
    pub fn text(&self, name: &'static str) -> Result<String, PipelineError> {
        let (_, value) = self.cell(name)?;
        Ok(value.to_string())
    }

    /// Coerce every declared cell to its column type.
    fn check(&self) -> Result<(), PipelineError> {
        for column in self.columns {
            match column.kind {
                ColumnKind::Integer => self.integer::<i64>(column.name).map(|_| ())?,
                ColumnKind::Float => self.float(column.name).map(|_| ())?,
                ColumnKind::Text => (),
            }
        }
        Ok(())
    }

    fn cell(&self, name: &'static str) -> Result<(&'static Column, &'a str), PipelineError> {
        let columns: &'static [Column] = self.columns;
        let position = columns
            .iter()
            .position(|column| column.name == name)
            .ok_or(PipelineError::MissingColumn { column: name })?;
        let column = &columns[position];
        match self.record.get(self.indices[position]) {
            Some(value) => Ok((column, value)),
            // Short row.
            None => Err(self.invalid(column, "")),
        }
    }

    fn invalid(&self, column: &Column, value: &str) -> PipelineError {
        PipelineError::InvalidValue {
            line: self.line,
            column: column.name,
            kind: column.kind,
            value: value.to_string(),
        }
    }
}

/// Parse a finite float written with the given decimal mark.
fn parse_float(value: &str, decimal_mark: char) -> Option<f64> {
    let value = value.trim();
    let parsed = if decimal_mark == '.' {
        value.parse::<f64>()
    } else {
        value.replace(decimal_mark, ".").parse::<f64>()
    };
    parsed.ok().filter(|v| v.is_finite())
}

/// Load typed records from a file.
///
/// # Arguments
///
/// * `path`: Path of the delimited text file
/// * `options`: Parsing options
pub fn load<R: Record>(path: &Path, options: &LoadOptions) -> Result<Vec<R>, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let records = load_from_reader::<R, _>(file, options)?;
    debug!(path = %path.display(), rows = records.len(), "loaded");
    Ok(records)
}

/// Load typed records from any reader of delimited text with a header row.
///
/// # Arguments
///
/// * `reader`: Source of the delimited text
/// * `options`: Parsing options
pub fn load_from_reader<R: Record, T: Read>(
    reader: T,
    options: &LoadOptions,
) -> Result<Vec<R>, PipelineError> {
    if u32::from(options.decimal_mark) == u32::from(options.delimiter) {
        return Err(PipelineError::AmbiguousDecimalMark(options.decimal_mark));
    }
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        // Short rows are reported per row rather than as a framing error.
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let indices = R::COLUMNS
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|header| header.trim() == column.name)
                .ok_or(PipelineError::MissingColumn {
                    column: column.name,
                })
        })
        .collect::<Result<Vec<usize>, PipelineError>>()?;

    let mut records = Vec::new();
    let mut skipped = 0_usize;
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            // Per-record errors such as invalid UTF-8 leave the reader usable.
            Err(error)
                if options.malformed_rows == MalformedRows::Skip && !error.is_io_error() =>
            {
                let line = error.position().map_or(0, |position| position.line());
                warn!(line, %error, "skipping malformed row");
                skipped += 1;
                continue;
            }
            Err(error) => return Err(error.into()),
        };
        let row = Row {
            record: &record,
            columns: R::COLUMNS,
            indices: &indices,
            line: record.position().map_or(0, |position| position.line()),
            decimal_mark: options.decimal_mark,
        };
        match row.check().and_then(|_| R::from_row(&row)) {
            Ok(typed) => records.push(typed),
            Err(error) if options.malformed_rows == MalformedRows::Skip => {
                warn!(line = row.line(), %error, "skipping malformed row");
                skipped += 1;
            }
            Err(error) => return Err(error),
        }
    }
    if skipped > 0 {
        warn!(skipped, kept = records.len(), "malformed rows were skipped");
    }
    Ok(records)
}

impl Record for DeforestationRecord {
    // The last three columns are type checked but not kept.
    const COLUMNS: &'static [Column] = &[
        Column::integer("ano"),
        Column::text("estado"),
        Column::integer("area"),
        Column::float("desmatado"),
        Column::float("incremento"),
        Column::float("floresta"),
        Column::float("nuvem"),
        Column::float("nao_observado"),
        Column::float("nao_floresta"),
        Column::float("hidrografia"),
    ];

    fn from_row(row: &Row<'_>) -> Result<Self, PipelineError> {
        Ok(DeforestationRecord {
            year: row.integer("ano")?,
            state: row.text("estado")?,
            area: row.integer("area")?,
            deforested_area: row.float("desmatado")?,
            increment: row.float("incremento")?,
            forest_cover: row.float("floresta")?,
            cloud_cover: row.float("nuvem")?,
        })
    }
}

impl Record for RawWeatherRecord {
    const COLUMNS: &'static [Column] = &[
        Column::text("data"),
        Column::text("estado"),
        Column::float("precipitacao_total"),
    ];

    fn from_row(row: &Row<'_>) -> Result<Self, PipelineError> {
        Ok(RawWeatherRecord {
            date: row.text("data")?,
            state: row.text("estado")?,
            total_precipitation: row.float("precipitacao_total")?,
        })
    }
}
