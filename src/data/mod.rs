/// Data layer: dataset names, sources, loading.
///
/// Architecture:
/// ```text
///   Selector (all / one / many)
///        │
///        ▼
///   ┌──────────┐     name → <name>.parquet bytes
///   │  loader   │ ◄── DatasetSource (bundled dir / any dir / memory)
///   └──────────┘
///        │  parse parquet → Table
///        ▼
///   HashMap<String, Table>
/// ```

pub mod loader;
pub mod model;
pub mod sample;
pub mod selector;
pub mod source;
