use std::collections::HashMap;
use std::time::Instant;

use bytes::Bytes;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::Table;
use super::selector::Selector;
use super::source::{DatasetSource, DirectorySource};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Loads datasets by name from a [`DatasetSource`].
///
/// Holds nothing but the source: every call reads and parses the files again,
/// so results from separate calls never share state.
#[derive(Debug, Clone, Default)]
pub struct Loader<S = DirectorySource> {
    source: S,
}

impl Loader<DirectorySource> {
    /// Loader over the parquet files packaged with the crate.
    pub fn bundled() -> Self {
        Self::new(DirectorySource::bundled())
    }
}

impl<S: DatasetSource> Loader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load the selected datasets, keyed by name.
    ///
    /// Datasets are read one after another in selector order. A repeated name
    /// is read again and replaces the earlier entry. The first failure aborts
    /// the call and nothing loaded so far is returned.
    pub fn load(&self, which: impl Into<Selector>) -> Result<HashMap<String, Table>, LoadError> {
        let names = which.into().names();
        let started = Instant::now();

        let mut tables = HashMap::with_capacity(names.len());
        for name in names {
            let table = self.load_one(&name)?;
            tables.insert(name, table);
        }

        info!(
            "loaded {} dataset(s) from {} in {:.2?}",
            tables.len(),
            self.source.describe(),
            started.elapsed()
        );
        Ok(tables)
    }

    /// Load a single dataset.
    pub fn load_one(&self, name: &str) -> Result<Table, LoadError> {
        let bytes = self.source.fetch(name)?;
        let table = parse_table(name, bytes)?;
        debug!(
            "{name}: {} rows × {} columns",
            table.num_rows(),
            table.num_columns()
        );
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Parquet → Table
// ---------------------------------------------------------------------------

/// Parse a complete parquet file into a [`Table`].
///
/// `name` only labels errors.
pub fn parse_table(name: &str, bytes: Bytes) -> Result<Table, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes).map_err(|source| {
        LoadError::Parse {
            name: name.to_string(),
            source,
        }
    })?;
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(|source| LoadError::Parse {
        name: name.to_string(),
        source,
    })?;

    let arrow_err = |source| LoadError::Arrow {
        name: name.to_string(),
        source,
    };
    let batches = reader.collect::<Result<Vec<_>, _>>().map_err(arrow_err)?;
    Table::from_batches(schema, &batches).map_err(arrow_err)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::data::model::DATASETS;
    use crate::data::sample::{encode_parquet, sample_batch, sample_source};
    use crate::data::source::MemorySource;

    fn loader() -> Loader<MemorySource> {
        Loader::new(sample_source(25, 42).unwrap())
    }

    fn keys(tables: &HashMap<String, Table>) -> HashSet<&str> {
        tables.keys().map(String::as_str).collect()
    }

    #[test]
    fn load_all_returns_every_dataset() {
        let tables = loader().load(Selector::All).unwrap();

        assert_eq!(tables.len(), 8);
        assert_eq!(keys(&tables), DATASETS.iter().copied().collect::<HashSet<_>>());
        for (name, table) in &tables {
            assert!(table.num_rows() > 0, "{name} has no rows");
            assert!(table.num_columns() > 0, "{name} has no columns");
        }
    }

    #[test]
    fn load_none_means_all() {
        let tables = loader().load(None::<&str>).unwrap();
        assert_eq!(tables.len(), 8);
    }

    #[test]
    fn load_single_name() {
        let tables = loader().load("products").unwrap();
        assert_eq!(keys(&tables), HashSet::from(["products"]));
        assert_eq!(tables["products"].num_rows(), 25);
    }

    #[test]
    fn subsets_return_exactly_their_names() {
        let loader = loader();
        let subsets: [&[&str]; 4] = [
            &[],
            &["coupons", "transactions"],
            &["demographics", "campaigns", "promotions"],
            &["products", "coupon_redemptions", "products"],
        ];
        for subset in subsets {
            let tables = loader.load(subset).unwrap();
            let expected: HashSet<&str> = subset.iter().copied().collect();
            assert_eq!(keys(&tables), expected);
        }
    }

    #[test]
    fn duplicate_names_collapse() {
        let tables = loader().load(vec!["coupons", "coupons"]).unwrap();
        assert_eq!(tables.len(), 1);
        assert!(tables.contains_key("coupons"));
    }

    #[test]
    fn unknown_name_is_not_found() {
        let err = loader().load("not_a_real_dataset").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.dataset(), "not_a_real_dataset");
    }

    #[test]
    fn failure_aborts_whole_call() {
        // products loads fine, the bogus name after it fails
        let err = loader()
            .load(vec!["products", "not_a_real_dataset", "coupons"])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let source = MemorySource::new().with("products", b"definitely not parquet".to_vec());
        let err = Loader::new(source).load("products").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "got {err:?}");
        assert_eq!(err.dataset(), "products");
    }

    #[test]
    fn repeated_loads_are_equal_and_independent() {
        let loader = loader();
        let mut first = loader.load(Selector::All).unwrap();
        let second = loader.load(Selector::All).unwrap();

        assert_eq!(first, second);

        first.remove("transactions");
        first.insert("products".into(), second["coupons"].clone());
        assert_eq!(second.len(), 8);
        assert_ne!(second["products"], first["products"]);
        assert_eq!(second["products"], loader.load_one("products").unwrap());
    }

    #[test]
    fn multiple_row_groups_become_one_table() {
        let batch = sample_batch("transactions", 100, 3).unwrap();
        let bytes = encode_parquet(&batch, Some(16)).unwrap();

        let table = parse_table("transactions", Bytes::from(bytes)).unwrap();
        assert_eq!(table.num_rows(), 100);
        assert_eq!(table.batch().columns(), batch.columns());
    }

    #[test]
    fn reads_from_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let batch = sample_batch("demographics", 10, 9).unwrap();
        std::fs::write(
            tmp.path().join("demographics.parquet"),
            encode_parquet(&batch, None).unwrap(),
        )
        .unwrap();

        let loader = Loader::new(DirectorySource::new(tmp.path()));
        let tables = loader.load("demographics").unwrap();
        assert_eq!(tables["demographics"].batch().columns(), batch.columns());

        let err = loader.load("products").unwrap_err();
        assert!(err.is_not_found());
    }

    /// Restores the working directory when dropped, even if the test panics.
    struct CwdGuard(std::path::PathBuf);

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    #[test]
    fn reads_from_working_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("data")).unwrap();
        let batch = sample_batch("campaigns", 12, 5).unwrap();
        std::fs::write(
            tmp.path().join("data").join("campaigns.parquet"),
            encode_parquet(&batch, None).unwrap(),
        )
        .unwrap();

        // Nothing else in this crate's tests resolves relative paths.
        let _guard = CwdGuard(std::env::current_dir().unwrap());
        std::env::set_current_dir(tmp.path()).unwrap();

        let loader = Loader::new(DirectorySource::current_dir());
        let tables = loader.load("campaigns").unwrap();
        assert_eq!(tables["campaigns"].num_rows(), 12);
        assert_eq!(tables["campaigns"].batch().columns(), batch.columns());
        assert!(loader.load(Selector::All).unwrap_err().is_not_found());
    }

    #[test]
    fn borrowed_and_boxed_sources() {
        let source = sample_source(3, 1).unwrap();
        assert_eq!(Loader::new(&source).load("coupons").unwrap().len(), 1);

        let boxed: Box<dyn DatasetSource> = Box::new(source);
        assert_eq!(Loader::new(boxed).load(Selector::All).unwrap().len(), 8);
    }
}
