use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use contrast_evaluate::cli::{Cli, Command};
use contrast_evaluate::config::RunConfig;
use contrast_evaluate::data::loader::load_split;
use contrast_evaluate::data::{
    choose_split, ColumnPairView, ColumnSequence, Dataset, DirectorySplits,
};

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Preview { config } => preview(&config),
        Command::Split {
            data_dir,
            dataset,
            subset,
        } => print_split(&data_dir, &dataset, subset.as_deref()),
    }
}

fn print_split(root: &Path, dataset: &str, subset: Option<&str>) -> Result<()> {
    let split = choose_split(&DirectorySplits::new(root), dataset, subset)
        .with_context(|| format!("choosing split of '{dataset}'"))?;
    println!("{split}");
    Ok(())
}

/// Print the rows a module would receive for the configured columns.
fn preview(config_path: &Path) -> Result<()> {
    let config = RunConfig::from_path(config_path)?;
    let split = config.resolve_split()?;
    let dataset = load_split(&config.dataset_dir(), &split)?;

    let view = ColumnPairView::new(
        &dataset,
        config.first_column.clone(),
        config.second_column.clone(),
        config.first_key.clone(),
        config.second_key.clone(),
        config.n_rows,
    );
    log::info!(
        "Previewing {} of {} rows from split '{split}' of '{}'",
        view.len(),
        dataset.len(),
        config.dataset
    );

    for (i, row) in view.iter().enumerate() {
        let row = row.with_context(|| format!("reading row {i}"))?;
        let cells: Vec<String> = row.iter().map(|(k, v)| format!("{k}={v}")).collect();
        println!("{i}\t{}", cells.join("\t"));
    }
    Ok(())
}
