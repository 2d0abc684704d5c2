//! Command-level tests: generate, check for drift, list and validate, driven through the same functions the binary
//! dispatches to.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use nodekind::cli::commands::{self, GenerateOptions};
use nodekind::cli::{Cli, ExitCode, SoftFallbackArg, TableArgs, execute};
use nodekind::config::Output;

const TABLE: &str = "\
# demo table
AbsD
CallNative if(native_calls)
AddI
Barrier soft(barriers)
";

fn table_args(path: Option<PathBuf>, gates: &[&str]) -> TableArgs {
    TableArgs {
        table: path,
        gates: gates.iter().map(|g| g.to_string()).collect(),
        gates_file: None,
        soft_fallback: SoftFallbackArg::Exclude,
    }
}

fn options(out: PathBuf) -> GenerateOptions {
    GenerateOptions {
        out,
        reserve_slots: false,
        outputs: Vec::new(),
        check: false,
        diff: false,
    }
}

#[test]
fn generate_then_check() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("demo.nk");
    fs::write(&table, TABLE).unwrap();
    let out = dir.path().join("generated");
    let args = table_args(Some(table), &["native_calls=true", "barriers=false"]);

    assert_eq!(commands::generate(&args, &options(out.clone())).unwrap(), ExitCode::SUCCESS);
    for output in Output::ALL {
        assert!(out.join(output.file_name()).exists(), "{} missing", output.file_name());
    }
    let names = fs::read_to_string(out.join("names.rs")).unwrap();
    assert!(names.contains(r#"["AbsD", "CallNative", "AddI"]"#), "{names}");

    let check = GenerateOptions {
        check: true,
        ..options(out.clone())
    };
    assert_eq!(commands::generate(&args, &check).unwrap(), ExitCode::SUCCESS);

    // Flipping a gate makes the generated directory stale.
    let flipped = table_args(args.table.clone(), &["native_calls=false", "barriers=false"]);
    let err = commands::generate(&flipped, &check).unwrap_err();
    assert!(err.message.contains("out of date"), "{}", err.message);

    // `--diff` without writing leaves the directory as it was.
    let diff = GenerateOptions { diff: true, ..check };
    assert!(commands::generate(&flipped, &diff).is_err());
    assert_eq!(fs::read_to_string(out.join("names.rs")).unwrap(), names);
}

#[test]
fn only_selected_outputs_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("gen");
    let opts = GenerateOptions {
        outputs: vec![Output::Opcodes, Output::Manifest],
        ..options(out.clone())
    };
    commands::generate(&table_args(None, &[]), &opts).unwrap();
    assert!(out.join("opcodes.rs").exists());
    assert!(out.join("manifest.json").exists());
    assert!(!out.join("visitor.rs").exists());
}

#[test]
fn gates_file_is_overridden_by_flags() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("demo.nk");
    fs::write(&table, TABLE).unwrap();
    let gates = dir.path().join("gates.json");
    fs::write(&gates, r#"{"native_calls": true, "barriers": true}"#).unwrap();

    let mut args = table_args(Some(table), &["barriers=false"]);
    args.gates_file = Some(gates);
    let out = dir.path().join("gen");
    commands::generate(&args, &options(out.clone())).unwrap();

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["gates"]["native_calls"], true);
    assert_eq!(manifest["gates"]["barriers"], false);
    assert_eq!(manifest["active"], 3);
}

#[test]
fn bundled_table_validates_without_flags() {
    assert_eq!(commands::check(&table_args(None, &[])).unwrap(), ExitCode::SUCCESS);
    assert_eq!(commands::list(&table_args(None, &["shenandoah_gc=on"])).unwrap(), ExitCode::SUCCESS);
}

#[test]
fn unresolved_gate_is_reported_with_source() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("demo.nk");
    fs::write(&table, TABLE).unwrap();

    let err = commands::check(&table_args(Some(table), &["native_calls=true"])).unwrap_err();
    assert_eq!(err.exit_code, ExitCode::FAILURE);
    assert!(err.message.contains("references unknown gate `barriers`"), "{}", err.message);
    assert!(err.message.contains("Barrier soft(barriers)"), "{}", err.message);
}

#[test]
fn check_rejects_what_generate_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("collide.nk");
    fs::write(&table, "AddVB\nAddVb\n").unwrap();

    let err = commands::check(&table_args(Some(table.clone()), &[])).unwrap_err();
    assert_eq!(err.exit_code, ExitCode::FAILURE);
    assert!(
        err.message.contains("both map to visitor method `visit_add_vb`"),
        "{}",
        err.message
    );

    let out = dir.path().join("out");
    let generate_err = commands::generate(&table_args(Some(table), &[]), &options(out.clone())).unwrap_err();
    assert_eq!(generate_err.message, err.message);
    assert!(!out.exists());
}

#[test]
fn bad_gate_flag_is_a_cli_error() {
    let err = commands::check(&table_args(None, &["shenandoah_gc"])).unwrap_err();
    assert!(err.message.contains("expected `name=value`"), "{}", err.message);
}

#[test]
fn missing_table_file() {
    let err = commands::check(&table_args(Some(PathBuf::from("/no/such/table.nk")), &[])).unwrap_err();
    assert!(err.message.starts_with("Cannot access table"), "{}", err.message);
}

#[test]
fn execute_dispatches_parsed_commands() {
    let cli = Cli::try_parse_from(["nodekind", "check", "--gate", "shenandoah_gc=false"]).unwrap();
    assert_eq!(execute(cli).unwrap(), ExitCode::SUCCESS);
}
