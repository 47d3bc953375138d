use std::fmt;

use arrow::array::ArrayRef;
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Dataset names
// ---------------------------------------------------------------------------

/// Every dataset shipped with the crate, in canonical order.
///
/// Loading with no selector returns exactly these, and each one resolves to
/// `<name>.parquet` in the data directory.
pub static DATASETS: [&str; 8] = [
    "campaign_descriptions",
    "coupons",
    "promotions",
    "campaigns",
    "demographics",
    "transactions",
    "coupon_redemptions",
    "products",
];

/// Whether `name` is one of the bundled datasets.
pub fn is_known(name: &str) -> bool {
    DATASETS.contains(&name)
}

// ---------------------------------------------------------------------------
// Table – one fully materialized dataset
// ---------------------------------------------------------------------------

/// An in-memory table read in full from one parquet file.
///
/// All record batches of the file are combined into a single batch, so rows
/// and columns are addressed the same way regardless of how the file was
/// chunked into row groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Combine the batches produced by a reader into one table.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self, ArrowError> {
        let batch = concat_batches(&schema, batches)?;
        Ok(Self { batch })
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// `(rows, columns)`, like a DataFrame's shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    /// Render the first `n` rows as an ASCII table.
    pub fn head(&self, n: usize) -> Result<String, ArrowError> {
        let slice = self.batch.slice(0, n.min(self.num_rows()));
        Ok(pretty_format_batches(&[slice])?.to_string())
    }

    /// Shape and column types, labelled with the dataset name.
    pub fn summary(&self, name: &str) -> TableSummary {
        let columns = self
            .batch
            .schema()
            .fields()
            .iter()
            .map(|f| ColumnSummary {
                name: f.name().clone(),
                data_type: f.data_type().to_string(),
                nullable: f.is_nullable(),
            })
            .collect();

        TableSummary {
            name: name.to_string(),
            rows: self.num_rows(),
            columns,
        }
    }
}

// ---------------------------------------------------------------------------
// Summaries (printed by the CLI, serializable to JSON)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} rows × {} columns)",
            self.name,
            self.rows,
            self.columns.len()
        )?;
        for col in &self.columns {
            let null = if col.nullable { "" } else { " not null" };
            writeln!(f, "  {:<24} {}{null}", col.name, col.data_type)?;
        }
        Ok(())
    }
}
