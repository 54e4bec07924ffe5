//! CSV input and output for enrichment runs.

use crate::pricerunner::OfferSummary;
use csv::{ReaderBuilder, StringRecord, Writer};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const EAN_COLUMN: &str = "EAN";
pub const BRAND_NAME_COLUMN: &str = "BrandName";
pub const SELL_PRICE_COLUMN: &str = "Sell Price";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("input has no `{0}` column")]
    MissingColumn(&'static str),

    #[error("row on line {line} has {found} fields but the header has {expected}")]
    RowTooLong { line: u64, found: usize, expected: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One input row, padded to the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    fields: Vec<String>,
    ean_index: usize,
}

impl InputRow {
    pub fn ean(&self) -> &str {
        &self.fields[self.ean_index]
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Reader over an input CSV that has an `EAN` column.
pub struct InputTable<R> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    ean_index: usize,
}

impl InputTable<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        Self::from_csv(reader)
    }
}

impl<R: io::Read> InputTable<R> {
    pub fn from_reader(rdr: R) -> Result<Self, TableError> {
        Self::from_csv(ReaderBuilder::new().flexible(true).from_reader(rdr))
    }

    fn from_csv(mut reader: csv::Reader<R>) -> Result<Self, TableError> {
        let headers = reader.headers()?.clone();
        // With duplicate headers the last column wins.
        let ean_index = headers
            .iter()
            .rposition(|h| h == EAN_COLUMN)
            .ok_or(TableError::MissingColumn(EAN_COLUMN))?;

        Ok(Self { reader, headers, ean_index })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Iterates data rows in file order. Short rows are padded with empty fields.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<InputRow, TableError>> + '_ {
        let width = self.headers.len();
        let ean_index = self.ean_index;

        self.reader.records().map(move |record| {
            let record = record?;
            if record.len() > width {
                return Err(TableError::RowTooLong {
                    line: record.position().map_or(0, |p| p.line()),
                    found: record.len(),
                    expected: width,
                });
            }

            let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
            fields.resize(width, String::new());
            Ok(InputRow { fields, ean_index })
        })
    }
}

/// Writes the input columns plus `BrandName` and `Sell Price`, flushing per row.
pub struct EnrichedWriter<W: io::Write> {
    writer: Writer<W>,
}

impl EnrichedWriter<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TableError> {
        Ok(Self { writer: Writer::from_path(path)? })
    }
}

impl<W: io::Write> EnrichedWriter<W> {
    pub fn new(wtr: W) -> Self {
        Self { writer: Writer::from_writer(wtr) }
    }

    pub fn write_header(&mut self, headers: &StringRecord) -> Result<(), TableError> {
        self.writer.write_record(headers.iter().chain([BRAND_NAME_COLUMN, SELL_PRICE_COLUMN]))?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_row(&mut self, row: &InputRow, summary: &OfferSummary) -> Result<(), TableError> {
        self.writer.write_record(
            row.fields()
                .iter()
                .map(String::as_str)
                .chain([summary.brand_name.as_str(), summary.sell_price.as_str()]),
        )?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, TableError> {
        self.writer.into_inner().map_err(|e| TableError::Io(e.into_error()))
    }
}
