use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result, bail};
use completejourney::{DirectorySource, Loader, Selector, TableSummary, is_known};
use log::warn;

const USAGE: &str = "Usage: completejourney [--data-dir DIR] [--json] [--head N] [NAME ...]";

/// Command-line options. Everything else is configured through `RUST_LOG`.
#[derive(Debug, Default, PartialEq)]
struct Options {
    data_dir: Option<PathBuf>,
    json: bool,
    head: Option<usize>,
    names: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut opts = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let dir = args.next().context("--data-dir needs a directory")?;
                opts.data_dir = Some(PathBuf::from(dir));
            }
            "--json" => opts.json = true,
            "--head" => {
                let n = args.next().context("--head needs a row count")?;
                opts.head = Some(n.parse().with_context(|| format!("invalid row count '{n}'"))?);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            name => opts.names.push(name.to_string()),
        }
    }
    Ok(opts)
}

fn run(opts: Options) -> Result<()> {
    let source = opts
        .data_dir
        .map(DirectorySource::new)
        .unwrap_or_else(DirectorySource::bundled);
    let loader = Loader::new(source);

    for name in opts.names.iter().filter(|n| !is_known(n)) {
        warn!("'{name}' is not one of the bundled datasets");
    }

    let selector = if opts.names.is_empty() {
        Selector::All
    } else {
        Selector::Many(opts.names.clone())
    };
    // Report in the order asked for, each name once.
    let mut order = selector.names();
    let mut seen = std::collections::HashSet::new();
    order.retain(|n| seen.insert(n.clone()));

    let tables = loader
        .load(selector)
        .with_context(|| format!("loading from {}", loader.source().root().display()))?;

    let summaries: Vec<TableSummary> = order
        .iter()
        .filter_map(|name| tables.get(name).map(|t| t.summary(name)))
        .collect();

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in &summaries {
        print!("{summary}");
        if let Some(n) = opts.head {
            let table = &tables[&summary.name];
            println!("{}", table.head(n).context("formatting rows")?);
        }
        println!();
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}
