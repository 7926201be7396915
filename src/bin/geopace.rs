// ABOUTME: Geopace CLI - replays tracking scenarios and runs the live tracker on JSON events
// ABOUTME: Prints tracker output as JSON lines on stdout, logs on stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors
//!
//! Usage:
//! ```bash
//! # Replay a recorded trace on virtual time
//! geopace replay trace.json
//!
//! # Feed JSON events on stdin to a live tracker with real timers
//! echo '{"type":"command","command":{"name":"start"}}' | geopace listen
//!
//! # Show the effective configuration
//! geopace config
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geopace::logging::LoggingConfig;
use geopace::platform::Collaborators;
use geopace::runtime::{
    event_channel, BroadcastSink, PassivePositionSource, PassiveRegionWatcher, SystemClock,
    TokioAlarmScheduler, TracingFeedback, TrackerService,
};
use geopace::simulation::Scenario;
use geopace::{config, Tracker};
use geopace_core::constants::runtime::{EVENT_CHANNEL_SIZE, OUTPUT_CHANNEL_SIZE};
use geopace_core::models::{TrackerCommand, TrackerEvent, TrackerOutput};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "geopace",
    about = "Adaptive motion-state location tracker",
    long_about = "Switches between moving and stationary tracking to trade location sampling rate for battery."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON scenario on virtual time and print the output
    Replay {
        /// Scenario file
        file: PathBuf,

        /// Print the final tracker state after the output
        #[arg(long)]
        summary: bool,
    },

    /// Run the tracker on real time, reading JSON events from stdin
    Listen {
        /// Send a start command before reading stdin
        #[arg(long)]
        start: bool,
    },

    /// Print the configuration loaded from the environment
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    match cli.command {
        Command::Replay { file, summary } => replay(&file, summary),
        Command::Listen { start } => listen(start).await,
        Command::Config => {
            let config = config::tracker_config_from_env()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn replay(file: &Path, summary: bool) -> Result<()> {
    let scenario = Scenario::from_file(file)
        .with_context(|| format!("Failed to load scenario {}", file.display()))?;
    let report = scenario.run()?;
    info!(
        outputs = report.outputs.len(),
        alarms_fired = report.alarms_fired,
        state = ?report.final_state.state,
        "Replay finished"
    );

    for output in &report.outputs {
        println!("{}", serde_json::to_string(output)?);
    }
    if summary {
        println!("{}", serde_json::to_string(&report.final_state)?);
    }
    Ok(())
}

async fn listen(start: bool) -> Result<()> {
    let config = config::tracker_config_from_env()?;
    let (sender, receiver) = event_channel(EVENT_CHANNEL_SIZE);
    let sink = Arc::new(BroadcastSink::new(OUTPUT_CHANNEL_SIZE));

    let collaborators = Collaborators {
        positions: Arc::new(PassivePositionSource),
        regions: Arc::new(PassiveRegionWatcher),
        alarms: Arc::new(TokioAlarmScheduler::new(sender.clone())),
        sink: sink.clone(),
        feedback: Arc::new(TracingFeedback),
        clock: Arc::new(SystemClock),
    };
    let tracker = Tracker::new(config, collaborators)?;

    let printer = tokio::spawn(print_outputs(sink.subscribe()));
    let handle = TrackerService::spawn(tracker, sender, receiver);
    if start {
        handle
            .post(TrackerEvent::command(TrackerCommand::Start))
            .await?;
    }

    info!("Listening for JSON events on stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            _ = &mut interrupted => {
                info!("Interrupted, shutting down");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("Input closed, shutting down");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<TrackerEvent>(&line) {
                    Ok(event) => handle.post(event).await?,
                    Err(e) => warn!(error = %e, "Skipping malformed event"),
                }
            }
        }
    }

    let tracker = handle.shutdown().await?;
    info!(state = ?tracker.snapshot().state, "Tracker stopped");
    drop(tracker);
    drop(sink);
    printer.await.context("Output printer failed")?;
    Ok(())
}

async fn print_outputs(mut outputs: tokio::sync::broadcast::Receiver<TrackerOutput>) {
    loop {
        match outputs.recv().await {
            Ok(output) => match serde_json::to_string(&output) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to serialize output"),
            },
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Output consumer lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
