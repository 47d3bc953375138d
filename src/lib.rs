//! Access to the Complete Journey retail datasets.
//!
//! Eight tables (transactions, products, households and the coupon/campaign
//! reference data) ship as parquet files in the crate's `data/` directory.
//! [`get_data`] reads any of them into Arrow-backed [`Table`]s:
//!
//! ```no_run
//! use completejourney::{get_data, Selector};
//!
//! let all = get_data(Selector::All)?;
//! let products = get_data("products")?;
//! let pair = get_data(["transactions", "products"])?;
//! # Ok::<(), completejourney::LoadError>(())
//! ```
//!
//! Other locations go through [`Loader`] with a different [`DatasetSource`].

use std::collections::HashMap;

pub mod data;
pub mod error;

pub use data::loader::{parse_table, Loader};
pub use data::model::{is_known, ColumnSummary, Table, TableSummary, DATASETS};
pub use data::selector::Selector;
pub use data::source::{DatasetSource, DirectorySource, MemorySource, BUNDLED_DATA_DIR};
pub use error::LoadError;

/// Load datasets from the files bundled with the crate.
pub fn get_data(which: impl Into<Selector>) -> Result<HashMap<String, Table>, LoadError> {
    Loader::bundled().load(which)
}
