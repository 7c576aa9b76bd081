//! `run` command implementation.

use anyhow::Result;
use tracing::info;

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let config = PipelineConfig::from_args(args);

    info!(
        mode = config.mode(),
        button = %config.button,
        endpoint = %config.endpoint,
        interval_ms = config.poll_interval_ms,
        capacity = config.channel_capacity,
        request_timeout = ?config.request_timeout(),
        run_timeout = ?config.run_timeout(),
        max_captures = ?config.capture_limit(),
        "configuration resolved"
    );

    let stats = Pipeline::new(config).run().await?;
    stats.print_summary();

    info!("shutterpost finished");
    Ok(())
}
