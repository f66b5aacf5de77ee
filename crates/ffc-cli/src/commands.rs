use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::Table;
use ffc_cli::config::RunConfig;
use ffc_cli::pipeline::{RunOptions, RunOutcome, build_engine, load_structures, run};
use ffc_model::RowStructure;
use ffc_report::{ReportFile, ReportFormat};
use tracing::info;

use crate::cli::{CheckArgs, ConfigArgs, ReportFormatArg};
use crate::summary::apply_table_style;

/// Result of `ffcheck check`, for the summary and the exit code.
pub struct CheckSummary {
    pub outcome: RunOutcome,
    pub report_path: Option<PathBuf>,
}

/// Configuration file first, then command line overrides.
fn resolve_config(args: &ConfigArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(dir) = &args.structures_dir {
        config.structures_dir.clone_from(dir);
    }
    if let Some(pattern) = &args.structure_pattern {
        config.structure_pattern.clone_from(pattern);
    }
    if let Some(path) = &args.test_configs {
        config.test_configs = Some(path.clone());
    }
    if !args.plugin_dirs.is_empty() {
        config.plugin_dirs.clone_from(&args.plugin_dirs);
    }
    Ok(config)
}

pub fn run_check(args: &CheckArgs) -> Result<CheckSummary> {
    let mut config = resolve_config(&args.config)?;
    if let Some(dir) = &args.output_dir {
        config.output_dir.clone_from(dir);
    }

    let report_file = if args.no_output {
        info!("report output disabled");
        None
    } else {
        let format = match args.format {
            ReportFormatArg::Csv => ReportFormat::Csv,
            ReportFormatArg::Json => ReportFormat::Json,
        };
        let file = ReportFile::create(&config.output_dir, format, Local::now())
            .with_context(|| format!("create report in {}", config.output_dir.display()))?;
        Some(file)
    };

    let structures = load_structures(&config, args.keep_going)?;
    let engine = build_engine(&config)?;
    let options = RunOptions {
        file_structure: args.file_structure.clone(),
    };
    let outcome = run(&args.inputs, &structures, &engine, &options)?;

    let report_path = match report_file {
        Some(file) => {
            let path = file.path().to_path_buf();
            Some(
                file.write(&outcome.report)
                    .with_context(|| format!("write report {}", path.display()))?,
            )
        }
        None => None,
    };

    Ok(CheckSummary {
        outcome,
        report_path,
    })
}

pub fn run_checks(args: &ConfigArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let engine = build_engine(&config)?;
    let mut table = Table::new();
    table.set_header(vec!["Check", "Source"]);
    apply_table_style(&mut table);
    for (name, source) in engine.registry().available_checks() {
        table.add_row(vec![name.to_string(), source.to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_structures(args: &ConfigArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let structures = load_structures(&config, true)?;
    let mut table = Table::new();
    table.set_header(vec![
        "Structure",
        "Type",
        "File pattern",
        "Encoding",
        "Row types",
        "Tests",
        "Definition",
    ]);
    apply_table_style(&mut table);
    for structure in structures.registry.iter() {
        let row_types: Vec<&str> = structure
            .row_structures
            .iter()
            .map(RowStructure::type_name)
            .collect();
        let source = structures
            .registry
            .source(&structure.name)
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.add_row(vec![
            structure.name.clone(),
            structure.conf_type().label().to_string(),
            structure.file_pattern.to_string(),
            structure.encoding.clone(),
            row_types.join(", "),
            structure.tests.join(", "),
            source,
        ]);
    }
    println!("{table}");
    for (file_name, message) in &structures.failures {
        eprintln!("skipped {file_name}: {message}");
    }
    Ok(())
}
