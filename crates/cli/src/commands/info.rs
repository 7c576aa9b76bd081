//! `info` command implementation.

use anyhow::Result;

use crate::cli::InfoArgs;
use crate::pipeline::PipelineConfig;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let config = PipelineConfig::from_args(&args.run);

    if args.json {
        let mut value = serde_json::to_value(&config)?;
        value["mode"] = serde_json::Value::String(config.mode().to_string());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("\n=== Resolved Configuration ===\n");
    println!("Mode:              {}", config.mode());
    println!("Button line:       {}", config.button);
    println!("Endpoint:          {}", config.endpoint);
    println!(
        "Secret:            {}",
        if config.secret.is_empty() {
            "(empty)"
        } else {
            "(set)"
        }
    );
    println!("Poll interval:     {} ms", config.poll_interval_ms);
    println!("Channel capacity:  {}", config.channel_capacity);
    match config.request_timeout() {
        Some(timeout) => println!("Request timeout:   {} s", timeout.as_secs()),
        None => println!("Request timeout:   unbounded"),
    }
    match config.run_timeout() {
        Some(timeout) => println!("Run limit:         {} s", timeout.as_secs()),
        None => println!("Run limit:         until interrupted"),
    }
    match config.capture_limit() {
        Some(limit) => println!("Capture limit:     {limit}"),
        None => println!("Capture limit:     unlimited"),
    }
    println!();

    Ok(())
}
