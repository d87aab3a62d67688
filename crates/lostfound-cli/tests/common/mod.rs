use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI binary against an isolated data directory.
pub fn run_cli(args: &[&str], data_dir: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lostfound"));
    cmd.arg("--data-dir").arg(data_dir);
    cmd.args(args);
    cmd.env_remove("LOSTFOUND_DATA_DIR");
    cmd.env_remove("LOSTFOUND_PUBLIC_URL");
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_success(args: &[&str], data_dir: &Path) -> String {
    let output = run_cli(args, data_dir);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_failure(args: &[&str], data_dir: &Path) -> String {
    let output = run_cli(args, data_dir);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Create an item and return its JSON representation.
pub fn create_item(data_dir: &Path, title: &str, extra: &[&str]) -> serde_json::Value {
    let mut args = vec![
        "create",
        "--title",
        title,
        "--description",
        "Found on the 8:15 train",
        "--contact",
        "desk@example.com",
        "--json",
    ];
    args.extend_from_slice(extra);
    let stdout = run_cli_success(&args, data_dir);
    serde_json::from_str(stdout.trim()).expect("create --json should print an item")
}
