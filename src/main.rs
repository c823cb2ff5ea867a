use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use wifigaze::config::Arguments;
use wifigaze::gazeruntime::GazeRuntime;

fn main() -> Result<()> {
    let env_filter = EnvFilter::from_env("GAZE_LOG_LEVEL");

    // Logs go to stderr; stdout carries the graph snapshot.
    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Arguments::parse();
    let mut runtime = GazeRuntime::new(&cli)?;

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for line in reader.lines() {
        let line = line.context("failed reading capture record")?;
        if line.trim().is_empty() {
            continue;
        }
        runtime.ingest_record(&line);
    }

    let counters = runtime.counters;
    tracing::info!(
        records = counters.records,
        dropped = counters.dropped,
        anomalous = counters.anomalous,
        beacons = counters.beacons,
        probe_requests = counters.probe_requests,
        probe_responses = counters.probe_responses,
        nodes = runtime.graph.node_count(),
        edges = runtime.graph.edge_count(),
        ssids = runtime.ssids.len(),
        "capture stream finished"
    );

    let export = runtime.export();
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            serde_json::to_writer_pretty(file, &export)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &export)?;
            writeln!(handle)?;
        }
    }

    Ok(())
}
