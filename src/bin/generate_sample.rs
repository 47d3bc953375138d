use std::path::PathBuf;

use anyhow::{Context, Result};
use completejourney::data::sample::{encode_parquet, sample_batch};
use completejourney::{BUNDLED_DATA_DIR, DATASETS};
use log::info;

/// Rows written per dataset.
const ROWS: usize = 500;
const SEED: u64 = 42;

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(BUNDLED_DATA_DIR));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    for (i, name) in DATASETS.iter().enumerate() {
        let batch = sample_batch(name, ROWS, SEED + i as u64)
            .with_context(|| format!("no sample schema for {name}"))?;
        let bytes = encode_parquet(&batch, None).with_context(|| format!("encoding {name}"))?;

        let path = out_dir.join(format!("{name}.parquet"));
        std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        info!("{name}: {} columns, {} bytes", batch.num_columns(), bytes.len());
    }

    println!(
        "Wrote {} datasets ({ROWS} rows each) to {}",
        DATASETS.len(),
        out_dir.display()
    );
    Ok(())
}
