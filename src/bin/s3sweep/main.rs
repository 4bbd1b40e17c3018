use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::{debug, trace, warn};

use s3sweep_rs::config::Config;
use s3sweep_rs::{CLIArgs, DeletionPipeline, exit_code_from_error};

mod output;
mod tracing_init;

/// s3sweep - Delete Amazon S3 objects whose keys match a pattern.
///
/// This binary is a thin wrapper over the s3sweep-rs library.
/// All core functionality is implemented in the library crate.
#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();
    let config = load_config_exit_if_err(cli_args.clone());

    if let Some(shell) = config.auto_complete_shell {
        generate(
            shell,
            &mut CLIArgs::command(),
            "s3sweep",
            &mut std::io::stdout(),
        );

        return Ok(());
    }

    let tracing_enabled = start_tracing_if_necessary(&config);

    if cli_args.has_partial_credentials() {
        warn!(
            "Only one of the AWS access key ID and secret access key was given. Using credentials from environment."
        );
    }

    trace!("config = {:?}", config);

    if let Err(e) = run(config).await {
        output::report_failure(&e, tracing_enabled);
        std::process::exit(exit_code_from_error(&e));
    }

    Ok(())
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn load_config_exit_if_err(cli_args: CLIArgs) -> Config {
    match Config::try_from(cli_args) {
        Ok(config) => config,
        Err(e) => clap::Error::raw(clap::error::ErrorKind::ValueValidation, e.to_string()).exit(),
    }
}

fn start_tracing_if_necessary(config: &Config) -> bool {
    let Some(tracing_config) = config.tracing_config.as_ref() else {
        return false;
    };

    tracing_init::init_tracing(tracing_config);
    true
}

async fn run(config: Config) -> Result<()> {
    let start_time = tokio::time::Instant::now();
    debug!("deletion pipeline start.");

    let pipeline = DeletionPipeline::new(config).await;
    let result = pipeline.run().await?;

    output::emit_result(&result.deleted)?;

    let duration_sec = format!("{:.3}", start_time.elapsed().as_secs_f32());
    debug!(
        duration_sec = duration_sec,
        deleted = result.deleted.len(),
        failed = result.failed.len(),
        "s3sweep has been completed."
    );

    Ok(())
}
