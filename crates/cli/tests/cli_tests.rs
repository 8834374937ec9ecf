// End-to-end tests for the `tally` binary.
// Run with: cargo test -p tally-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const INTERNAL_CSV: &str = "\
transaction_reference,amount,status
A,100,settled
B,50,pending
X,10,paid
";

const PROVIDER_CSV: &str = "\
transaction_reference,amount,status
A,100,settled
C,75,settled
X,12,paid
";

fn tally() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tally"));
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("TALLY_LOG");
    cmd
}

struct Inputs {
    dir: TempDir,
    internal: PathBuf,
    provider: PathBuf,
}

fn write_inputs(internal: &str, provider: &str) -> Inputs {
    let dir = tempfile::tempdir().unwrap();
    let internal_path = dir.path().join("internal.csv");
    let provider_path = dir.path().join("provider.csv");
    std::fs::write(&internal_path, internal).unwrap();
    std::fs::write(&provider_path, provider).unwrap();
    Inputs { dir, internal: internal_path, provider: provider_path }
}

fn run(args: &[&str], inputs: &Inputs) -> Output {
    tally()
        .arg(args[0])
        .arg(&inputs.internal)
        .arg(&inputs.provider)
        .args(&args[1..])
        .output()
        .expect("run tally")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

// ===========================================================================
// tally run
// ===========================================================================

#[test]
fn run_prints_three_tables_and_summary() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let out = run(&["run"], &inputs);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("✔ Matched Transactions (2)"));
    assert!(text.contains("⚠ Present only in Internal file (1)"));
    assert!(text.contains("✘ Present only in Provider file (1)"));
    assert!(text.contains("12*"), "amount mismatch should be marked:\n{text}");

    let err = stderr(&out);
    assert!(err.contains("2 matched"));
    assert!(err.contains("1 amount mismatches"));
}

#[test]
fn run_single_table_page() {
    let internal: String = std::iter::once("transaction_reference,amount,status\n".to_string())
        .chain((0..25).map(|i| format!("R{i:02},1,ok\n")))
        .collect();
    let inputs = write_inputs(&internal, "transaction_reference,amount,status\nZ,1,ok\n");

    let out = run(&["run", "--table", "only-internal", "--page", "3", "-q"], &inputs);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("(25)"));
    assert!(text.contains("R20"));
    assert!(!text.contains("R19"));
    assert!(text.trim_end().ends_with("page 3/3, rows 21-25 (prev 2)"));
    assert!(!text.contains("Matched Transactions"));
    assert!(stderr(&out).is_empty());
}

#[test]
fn run_page_size_override() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let out = run(&["run", "--table", "matched", "--page-size", "1", "--page", "9"], &inputs);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("page 2/2, row 2 (prev 1)"));
    assert!(text.contains("X"));
}

#[test]
fn run_rejects_zero_page_size() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let out = run(&["run", "--page-size", "0"], &inputs);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn run_json_is_single_report() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let out = run(&["run", "--json"], &inputs);
    assert!(out.status.success());

    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(val["summary"]["matched"], 2);
    assert_eq!(val["result"]["onlyInternal"][0]["transaction_reference"], "B");
    assert_eq!(val["result"]["onlyProvider"][0]["transaction_reference"], "C");
    assert_eq!(val["result"]["matched"][1]["providerAmount"], "12");
    assert_eq!(val["result"]["matched"][1]["isAmountMatch"], false);
    assert!(val["meta"]["engine_version"].is_string());
}

#[test]
fn run_writes_output_and_exports() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let report = inputs.dir.path().join("report.json");
    let export_dir = inputs.dir.path().join("out");

    let out = run(
        &["run", "--output", path_str(&report), "--export-dir", path_str(&export_dir)],
        &inputs,
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let val: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(val["summary"]["only_provider"], 1);

    let matched = std::fs::read_to_string(export_dir.join("matched.csv")).unwrap();
    assert_eq!(
        matched,
        "transaction_reference,amount,status,providerAmount,providerStatus,isAmountMatch,isStatusMatch\n\
         \"A\",\"100\",\"settled\",\"100\",\"settled\",\"true\",\"true\"\n\
         \"X\",\"10\",\"paid\",\"12\",\"paid\",\"false\",\"true\""
    );
    assert!(export_dir.join("only-internal.csv").exists());
    assert!(export_dir.join("only-provider.csv").exists());
}

#[test]
fn strict_fails_on_mismatch() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let out = run(&["run", "--strict", "-q"], &inputs);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("mismatches found"));
}

#[test]
fn strict_passes_when_clean() {
    let csv = "transaction_reference,amount,status\nA,1,ok\n";
    let inputs = write_inputs(csv, csv);
    let out = run(&["run", "--strict"], &inputs);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
}

#[test]
fn config_fail_on_duplicates() {
    let inputs = write_inputs(
        "transaction_reference,amount,status\nA,1,ok\nA,2,ok\n",
        "transaction_reference,amount,status\nA,2,ok\n",
    );
    let config = inputs.dir.path().join("recon.toml");
    std::fs::write(&config, "name = \"dups\"\nfail_on_duplicates = true\n").unwrap();

    let out = run(&["run", "--config", path_str(&config), "-q"], &inputs);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("duplicate reference"));

    // Without the config the duplicate is only a warning
    let out = run(&["run", "-q"], &inputs);
    assert!(out.status.success());
}

#[test]
fn missing_input_is_input_error() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let out = tally()
        .args(["run", "/nonexistent/internal.csv"])
        .arg(&inputs.provider)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn bad_config_is_config_error() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let config = inputs.dir.path().join("bad.toml");
    std::fs::write(&config, "page_size = 0\n").unwrap();
    let out = run(&["run", "--config", path_str(&config)], &inputs);
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn missing_config_is_config_error_for_run_and_validate() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let missing = inputs.dir.path().join("missing.toml");

    let out = run(&["run", "--config", path_str(&missing)], &inputs);
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("cannot read config"));

    let out = tally().args(["validate", path_str(&missing)]).output().unwrap();
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("cannot read config"));
}

// ===========================================================================
// tally export
// ===========================================================================

#[test]
fn export_prints_csv() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let out = run(&["export", "--table", "only-provider"], &inputs);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "transaction_reference,amount,status\n\"C\",\"75\",\"settled\"\n"
    );
}

#[test]
fn export_writes_file() {
    let inputs = write_inputs(INTERNAL_CSV, PROVIDER_CSV);
    let dest = inputs.dir.path().join("only-internal.csv");
    let out = run(&["export", "--table", "only-internal", "--out", path_str(&dest)], &inputs);
    assert!(out.status.success());
    assert_eq!(
        std::fs::read_to_string(&dest).unwrap(),
        "transaction_reference,amount,status\n\"B\",\"50\",\"pending\""
    );
}

#[test]
fn export_empty_table_prints_nothing() {
    let csv = "transaction_reference,amount,status\nA,1,ok\n";
    let inputs = write_inputs(csv, csv);
    let out = run(&["export", "--table", "only-provider"], &inputs);
    assert!(out.status.success());
    assert!(stdout(&out).is_empty());
}

// ===========================================================================
// tally validate
// ===========================================================================

#[test]
fn validate_accepts_good_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("recon.toml");
    std::fs::write(&config, "name = \"October close\"\npage_size = 20\n").unwrap();

    let out = tally().args(["validate", path_str(&config)]).output().unwrap();
    assert!(out.status.success());
    assert!(stderr(&out).contains("valid: config 'October close'"));
}

#[test]
fn validate_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("recon.toml");
    std::fs::write(&config, "[export]\nmatched = \"a.csv\"\nonly_internal = \"a.csv\"\n").unwrap();

    let out = tally().args(["validate", path_str(&config)]).output().unwrap();
    assert_eq!(out.status.code(), Some(4));
}
