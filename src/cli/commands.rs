//! Command implementations for the nodekind CLI.

use std::fs;
use std::path::{Path, PathBuf};

use nodekind_core::{GateSet, SlotPolicy};

use super::{CliError, CliResult, ExitCode, TableArgs};
use crate::config::{self, GenerateConfig, Output};
use crate::pipeline::{self, DriftKind, PipelineError};
use crate::tables;

/// Maximum declaration table size (16 MB)
const MAX_TABLE_SIZE: u64 = 16 * 1024 * 1024;

/// A table ready for the pipeline.
#[derive(Debug, Clone)]
pub struct TableSource {
    pub origin: String,
    pub source: String,
    /// Gate values used when neither `--gates` nor `--gate` sets them
    pub defaults: GateSet,
}

impl TableSource {
    pub fn bundled() -> Self {
        Self {
            origin: tables::C2_NODES_ORIGIN.to_string(),
            source: tables::C2_NODES.to_string(),
            defaults: tables::c2_default_gates(),
        }
    }
}

/// Options of `nodekind generate` beyond table selection.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub out: PathBuf,
    pub reserve_slots: bool,
    /// Empty means every output.
    pub outputs: Vec<Output>,
    pub check: bool,
    pub diff: bool,
}

/// Read a declaration table from disk.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_TABLE_SIZE`
pub fn read_table(path: &Path) -> CliResult<TableSource> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access table '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_TABLE_SIZE {
        return Err(CliError::failure(format!(
            "Table '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_TABLE_SIZE
        )));
    }

    let source = fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading table '{}': {}", path.display(), e)))?;
    Ok(TableSource {
        origin: path.display().to_string(),
        source,
        defaults: GateSet::new(),
    })
}

fn table_source(args: &TableArgs) -> CliResult<TableSource> {
    match &args.table {
        Some(path) => read_table(path),
        None => Ok(TableSource::bundled()),
    }
}

/// Resolve the gate configuration for `args` on top of `table`'s defaults.
pub fn build_config(args: &TableArgs, table: &TableSource) -> CliResult<GenerateConfig> {
    let gates = config::resolve_gates(table.defaults.clone(), args.gates_file.as_deref(), &args.gates)
        .map_err(|e| CliError::failure(format!("error: {e}")))?;
    Ok(GenerateConfig::new()
        .with_gates(gates)
        .with_soft_fallback(args.soft_fallback.into()))
}

fn pipeline_failure(error: PipelineError) -> CliError {
    CliError::failure(error.render())
}

/// Generate artifacts into (or check them against) `options.out`.
pub fn generate(args: &TableArgs, options: &GenerateOptions) -> CliResult<ExitCode> {
    let table = table_source(args)?;
    let policy = if options.reserve_slots {
        SlotPolicy::Reserve
    } else {
        SlotPolicy::Compact
    };
    let config = build_config(args, &table)?
        .with_slot_policy(policy)
        .with_outputs(options.outputs.iter().copied());

    let files = pipeline::generate(&table.source, &table.origin, &config).map_err(pipeline_failure)?;

    if options.check {
        let drift = files.check_against(&options.out).map_err(pipeline_failure)?;
        for d in &drift {
            let path = options.out.join(&d.file);
            match d.kind {
                DriftKind::Missing => println!("Missing: {}", path.display()),
                DriftKind::Stale => println!("Out of date: {}", path.display()),
            }
            if options.diff && d.kind == DriftKind::Stale {
                println!("--- {}", path.display());
                print!("{}", d.diff());
                println!();
            }
        }

        if !drift.is_empty() {
            return Err(CliError::failure(format!(
                "\n{} of {} file(s) out of date; rerun without --check to regenerate",
                drift.len(),
                files.len()
            )));
        }
        println!("✓ {} file(s) up to date", files.len());
        return Ok(ExitCode::SUCCESS);
    }

    let written = files.write_to(&options.out).map_err(pipeline_failure)?;
    for path in &written {
        println!("Generated: {}", path.display());
    }
    println!(
        "\n✓ {} file(s) written, {} unchanged",
        written.len(),
        files.len() - written.len()
    );
    Ok(ExitCode::SUCCESS)
}

/// Print the classification of every entry.
pub fn list(args: &TableArgs) -> CliResult<ExitCode> {
    let table = table_source(args)?;
    let config = build_config(args, &table)?;
    let loaded = pipeline::load(&table.source, &table.origin, &config).map_err(pipeline_failure)?;
    let sequence = pipeline::classify(&loaded.registry, &config).map_err(pipeline_failure)?;
    print!("{}", pipeline::listing(&sequence));
    Ok(ExitCode::SUCCESS)
}

/// Validate a table without writing anything.
///
/// Artifacts are rendered in memory, so a table that passes here also passes `generate` (visitor method collisions
/// included).
pub fn check(args: &TableArgs) -> CliResult<ExitCode> {
    let table = table_source(args)?;
    let config = build_config(args, &table)?;
    let loaded = pipeline::load(&table.source, &table.origin, &config).map_err(pipeline_failure)?;
    let sequence = pipeline::classify(&loaded.registry, &config).map_err(pipeline_failure)?;
    pipeline::emit(&sequence, &config).map_err(pipeline_failure)?;
    println!(
        "✓ {}: {} declared, {} active",
        table.origin,
        loaded.registry.len(),
        sequence.len()
    );
    Ok(ExitCode::SUCCESS)
}
