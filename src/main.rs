//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `linksentinel` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Configuration assembly (environment + CLI)
//! - Per-format rendering of results
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::time::Instant;

use anyhow::{Context, Result};

use linksentinel::cli::{Cli, OutputFormat};
use linksentinel::structured_output::ScanOutput;
use linksentinel::styled_output::StyledFormatter;
use linksentinel::{Config, LinkSentinel};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Handle schema generation early exit
    if cli.generate_schema {
        match ScanOutput::generate_json_schema() {
            Ok(schema) => {
                println!("{schema}");
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error generating JSON schema: {e}");
                process::exit(1);
            }
        }
    }

    // Diagnostics go through the log facade; user-facing messages stay on
    // the verbosity-gated paths below.
    let default_level = if cli.is_trace() { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let start_time = Instant::now();

    // Load configuration
    let mut config = Config::from_env();
    config.merge_with_cli(&cli);

    if let Err(e) = config.validate() {
        if cli.error_enabled() {
            eprintln!("Configuration error: {e}");
        }
        process::exit(2);
    }

    if config.api.api_key.is_none() && cli.warn_enabled() {
        eprintln!("Warning: no API key configured; every scan will report UNKNOWN.");
    }

    let mut session = LinkSentinel::new(&config).context("Failed to initialize scanner")?;

    let formatter = if cli.no_color || cli.format == OutputFormat::Plain {
        StyledFormatter::without_colors()
    } else {
        StyledFormatter::new()
    };

    let mut structured = if cli.is_structured_output() {
        Some(ScanOutput::new())
    } else {
        None
    };

    let mut scanned = 0u32;
    let mut rejected = 0u32;

    // One analysis in flight at a time: URLs are processed sequentially.
    for input in &cli.urls {
        if cli.is_trace() {
            eprintln!("Analyzing: {input}");
        }

        match session.scan(input).await {
            Ok(item) => {
                scanned += 1;
                match cli.format {
                    OutputFormat::Styled | OutputFormat::Plain => {
                        formatter.print_result(&item.result);
                    }
                    OutputFormat::Batch => {
                        println!(
                            "{}\t{}\t{}",
                            item.result.url,
                            item.result.risk_level.label(),
                            item.result.risk_score
                        );
                    }
                    OutputFormat::Json | OutputFormat::Yaml => {
                        if let Some(ref mut doc) = structured {
                            doc.push_scan(input, item);
                        }
                    }
                }
            }
            Err(e) => {
                // Validation failure: surfaced inline, no service call made.
                rejected += 1;
                if let Some(ref mut doc) = structured {
                    doc.push_rejected(input, &e.to_string());
                }
                if cli.error_enabled() {
                    eprintln!("{input}: {e}");
                }
            }
        }
    }

    // Emit the structured document, or the history table for styled runs.
    if let Some(mut doc) = structured {
        doc.finalize(
            cli.urls.len() as u32,
            start_time.elapsed().as_millis() as u64,
        );
        let rendered = match cli.format {
            OutputFormat::Json => doc.to_json(),
            OutputFormat::Yaml => doc.to_yaml(),
            _ => unreachable!(),
        };
        match rendered {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error formatting structured output: {e}");
                process::exit(1);
            }
        }
    } else if !cli.is_structured_output()
        && cli.format != OutputFormat::Batch
        && (cli.show_history || scanned > 1)
    {
        println!();
        formatter.print_history(session.history().list());
    }

    if scanned == 0 && rejected > 0 {
        process::exit(1);
    }

    Ok(())
}
