use anyhow::Context;
use comfy_table::{Cell, Table};

use dwca_cli::pipeline::{PipelineConfig, run_pipeline};
use dwca_cli::types::{RunFailure, RunResult};
use dwca_extract::{ExtractOptions, FlatSchema, Selection, WriteMode};
use dwca_model::RELATIONSHIP_TERMS;

use crate::cli::Cli;
use crate::summary::{apply_table_style, header_cell};

pub fn run_list_terms() {
    let schema = FlatSchema::new(true);
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Term"), header_cell("Group")]);
    apply_table_style(&mut table);
    for (index, term) in schema.terms().enumerate() {
        let group = if RELATIONSHIP_TERMS.contains(&term) {
            format!("{} (example copies only)", term.group())
        } else {
            term.group().to_string()
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(term.simple_name()),
            Cell::new(group),
        ]);
    }
    println!("{table}");
}

pub fn run_extract(cli: &Cli) -> Result<RunResult, RunFailure> {
    let config = pipeline_config(cli).map_err(RunFailure::setup)?;
    run_pipeline(&config)
}

fn pipeline_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let input = cli.input.clone().context("an input archive is required")?;
    let selection = Selection::from_options(cli.limit, cli.cherry_pick.as_deref())?;
    let options = ExtractOptions {
        selection,
        dataset_doi: cli.doi.clone().filter(|doi| !doi.trim().is_empty()),
        create_examples: cli.create_example_copies,
        ..ExtractOptions::default()
    };

    let mut config = PipelineConfig::new(input, &cli.output)
        .with_mode(WriteMode::from_append(cli.append))
        .with_options(options);
    if let Some(work_dir) = &cli.work_dir {
        config = config.with_work_dir(work_dir);
    }
    Ok(config)
}
