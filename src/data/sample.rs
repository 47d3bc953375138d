//! Deterministic synthetic versions of the bundled datasets.
//!
//! Column names and types follow the real collection; the values are noise.
//! Used to populate a `data/` directory during development and as test
//! fixtures. The loader never calls into this module.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, Date32Array, Float64Array, Int32Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;

use super::model::DATASETS;
use super::source::MemorySource;

/// 2017-01-01 as days since the Unix epoch; the collection covers one year.
const YEAR_START_DAYS: i32 = 17_167;

// ---------------------------------------------------------------------------
// Column generators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Col {
    /// Numeric identifier stored as text, drawn from `1..=max`.
    Id { max: u64 },
    Choice(&'static [&'static str]),
    Int { lo: i32, hi: i32 },
    Money { max: f64 },
    Date,
    Timestamp,
}

const AGES: &[&str] = &["19-24", "25-34", "35-44", "45-54", "55-64", "65+"];
const INCOMES: &[&str] = &["Under 15K", "15-24K", "25-34K", "35-49K", "50-74K", "75-99K", "100-124K"];
const DEPARTMENTS: &[&str] = &["GROCERY", "DRUG GM", "PRODUCE", "MEAT", "DELI", "PASTRY"];
const CATEGORIES: &[&str] = &["SOFT DRINKS", "CHEESE", "BAKED BREAD/BUNS/ROLLS", "FLUID MILK PRODUCTS", "FROZEN PIZZA"];

fn schema_for(name: &str) -> Option<&'static [(&'static str, Col)]> {
    use Col::*;

    let cols: &'static [(&'static str, Col)] = match name {
        "campaign_descriptions" => &[
            ("campaign_id", Id { max: 27 }),
            ("campaign_type", Choice(&["Type A", "Type B", "Type C"])),
            ("start_date", Date),
            ("end_date", Date),
        ],
        "coupons" => &[
            ("coupon_upc", Id { max: 99_999_999 }),
            ("product_id", Id { max: 20_000 }),
            ("campaign_id", Id { max: 27 }),
        ],
        "promotions" => &[
            ("product_id", Id { max: 20_000 }),
            ("store_id", Id { max: 400 }),
            ("display_location", Choice(&["0", "1", "2", "3", "5", "7", "A"])),
            ("mailer_location", Choice(&["0", "A", "D", "F", "H", "L"])),
            ("week", Int { lo: 1, hi: 53 }),
        ],
        "campaigns" => &[
            ("campaign_id", Id { max: 27 }),
            ("household_id", Id { max: 2_500 }),
        ],
        "demographics" => &[
            ("household_id", Id { max: 2_500 }),
            ("age", Choice(AGES)),
            ("income", Choice(INCOMES)),
            ("home_ownership", Choice(&["Homeowner", "Renter", "Unknown"])),
            ("marital_status", Choice(&["Married", "Unmarried"])),
            ("household_size", Choice(&["1", "2", "3", "4", "5+"])),
            ("household_comp", Choice(&["1 Adult No Kids", "2 Adults No Kids", "2 Adults Kids"])),
            ("kids_count", Choice(&["0", "1", "2", "3+"])),
        ],
        "transactions" => &[
            ("household_id", Id { max: 2_500 }),
            ("store_id", Id { max: 400 }),
            ("basket_id", Id { max: 9_999_999 }),
            ("product_id", Id { max: 20_000 }),
            ("quantity", Int { lo: 1, hi: 5 }),
            ("sales_value", Money { max: 20.0 }),
            ("retail_disc", Money { max: 2.0 }),
            ("coupon_disc", Money { max: 1.0 }),
            ("coupon_match_disc", Money { max: 0.5 }),
            ("week", Int { lo: 1, hi: 53 }),
            ("transaction_timestamp", Timestamp),
        ],
        "coupon_redemptions" => &[
            ("household_id", Id { max: 2_500 }),
            ("coupon_upc", Id { max: 99_999_999 }),
            ("campaign_id", Id { max: 27 }),
            ("redemption_date", Date),
        ],
        "products" => &[
            ("product_id", Id { max: 20_000 }),
            ("manufacturer_id", Id { max: 6_000 }),
            ("department", Choice(DEPARTMENTS)),
            ("brand", Choice(&["National", "Private"])),
            ("product_category", Choice(CATEGORIES)),
            ("product_type", Choice(&["SOFT DRINKS 12/18&15PK CAN CAR", "CHEDDAR", "MAINSTREAM WHITE BREAD"])),
            ("package_size", Choice(&["12 OZ", "16 OZ", "1 GA", "2 LB"])),
        ],
        _ => return None,
    };
    Some(cols)
}

fn data_type(col: Col) -> DataType {
    match col {
        Col::Id { .. } | Col::Choice(_) => DataType::Utf8,
        Col::Int { .. } => DataType::Int32,
        Col::Money { .. } => DataType::Float64,
        Col::Date => DataType::Date32,
        Col::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
    }
}

fn generate(col: Col, rows: usize, rng: &mut SimpleRng) -> ArrayRef {
    match col {
        Col::Id { max } => Arc::new(StringArray::from_iter_values(
            (0..rows).map(|_| (rng.below(max) + 1).to_string()),
        )),
        Col::Choice(options) => Arc::new(StringArray::from_iter_values(
            (0..rows).map(|_| options[rng.below(options.len() as u64) as usize]),
        )),
        Col::Int { lo, hi } => {
            let span = (hi - lo + 1) as u64;
            Arc::new(Int32Array::from_iter_values(
                (0..rows).map(|_| lo + rng.below(span) as i32),
            ))
        }
        Col::Money { max } => Arc::new(Float64Array::from_iter_values(
            (0..rows).map(|_| (rng.next_f64() * max * 100.0).round() / 100.0),
        )),
        Col::Date => Arc::new(Date32Array::from_iter_values(
            (0..rows).map(|_| YEAR_START_DAYS + rng.below(365) as i32),
        )),
        Col::Timestamp => {
            let start = YEAR_START_DAYS as i64 * 86_400 * 1_000_000;
            let year = 365 * 86_400 * 1_000_000_u64;
            Arc::new(TimestampMicrosecondArray::from_iter_values(
                (0..rows).map(|_| start + rng.below(year) as i64),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Build `rows` synthetic rows for `name`. The same `(name, rows, seed)`
/// always produces the same batch.
pub fn sample_batch(name: &str, rows: usize, seed: u64) -> Option<RecordBatch> {
    let cols = schema_for(name)?;
    let mut rng = SimpleRng::new(seed);

    let schema = Arc::new(Schema::new(
        cols.iter()
            .map(|(n, c)| Field::new(*n, data_type(*c), true))
            .collect::<Vec<_>>(),
    ));
    let arrays = cols.iter().map(|(_, c)| generate(*c, rows, &mut rng)).collect();

    // Schema and arrays are derived from the same column list.
    RecordBatch::try_new(schema, arrays).ok()
}

/// Encode a batch as a parquet file.
///
/// `max_row_group_size` splits the rows over several row groups when set.
pub fn encode_parquet(
    batch: &RecordBatch,
    max_row_group_size: Option<usize>,
) -> Result<Vec<u8>, ParquetError> {
    let mut props = WriterProperties::builder();
    if let Some(size) = max_row_group_size {
        props = props.set_max_row_group_size(size);
    }

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), Some(props.build()))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(buf)
}

/// All eight datasets, `rows` rows each, encoded and held in memory.
pub fn sample_source(rows: usize, seed: u64) -> Result<MemorySource, ParquetError> {
    let mut source = MemorySource::new();
    for (i, name) in DATASETS.iter().enumerate() {
        let batch = sample_batch(name, rows, seed.wrapping_add(i as u64))
            .ok_or_else(|| ParquetError::General(format!("no sample schema for {name}")))?;
        source.insert(*name, encode_parquet(&batch, None)?);
    }
    Ok(source)
}

// ---------------------------------------------------------------------------
// PRNG
// ---------------------------------------------------------------------------

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }
}
