// Process output: the JSON result on stdout, the GitHub Actions step output
// and the failure report.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::error;

const GITHUB_OUTPUT_ENV_VAR: &str = "GITHUB_OUTPUT";
const GITHUB_ACTIONS_ENV_VAR: &str = "GITHUB_ACTIONS";
const STEP_OUTPUT_NAME: &str = "deleted";

pub fn deleted_keys_json(deleted: &[String]) -> Result<String> {
    serde_json::to_string(deleted).context("serde_json::to_string() failed.")
}

pub fn write_result<W: Write>(writer: &mut W, json: &str) -> Result<()> {
    writeln!(writer, "{json}").context("failed to write result.")?;
    writer.flush().context("failed to flush result.")
}

/// Append `deleted=<json>` to the step output file.
pub fn append_step_output(path: &Path, json: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open step output file {}.", path.display()))?;

    writeln!(file, "{STEP_OUTPUT_NAME}={json}")
        .with_context(|| format!("failed to write step output file {}.", path.display()))
}

/// Emit the confirmed deletions on stdout and, inside a GitHub Actions
/// runner, as the `deleted` step output.
pub fn emit_result(deleted: &[String]) -> Result<()> {
    let json = deleted_keys_json(deleted)?;

    write_result(&mut std::io::stdout().lock(), &json)?;

    if let Some(path) = env::var_os(GITHUB_OUTPUT_ENV_VAR).filter(|p| !p.is_empty()) {
        append_step_output(Path::new(&path), &json)?;
    }

    Ok(())
}

pub fn failure_message(e: &anyhow::Error) -> String {
    format!("Action failed with error {e:#}")
}

/// Report a failed run once. Falls back to stderr when tracing is disabled.
pub fn report_failure(e: &anyhow::Error, tracing_enabled: bool) {
    let message = failure_message(e);

    if tracing_enabled {
        error!("{message}");
    } else {
        eprintln!("{message}");
    }

    if env::var(GITHUB_ACTIONS_ENV_VAR).is_ok_and(|v| v == "true") {
        println!("::error::{message}");
    }
}
