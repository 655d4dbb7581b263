//! `replay` command implementation.

use anyhow::{Context, Result};
use contracts::{ByteSink, Channel, RoutingBlueprint, TransferSettings};
use dispatcher::{
    create_sink, perform_reporting, CaptureSource, ConfiguredSink, TransferReport, TransferState,
    WriteOptions,
};
use observability::{TransferOutcome, TransferStatsAggregator};
use tracing::{info, warn};

use crate::cli::ReplayArgs;
use crate::commands::load_blueprint;
use crate::error::CliError;

/// Sinks named in the option slots of a blueprint
///
/// Owned here and lent to `WriteOptions` for the duration of the replay.
struct SlotSinks {
    body_callback: Option<ConfiguredSink>,
    body_object: Option<ConfiguredSink>,
    header_callback: Option<ConfiguredSink>,
    header_object: Option<ConfiguredSink>,
}

impl SlotSinks {
    fn create(blueprint: &RoutingBlueprint) -> Result<Self> {
        let make = |config: &Option<contracts::SinkConfig>| -> Result<Option<ConfiguredSink>> {
            config
                .as_ref()
                .map(create_sink)
                .transpose()
                .context("Failed to create sink")
        };

        Ok(Self {
            body_callback: make(&blueprint.body.callback)?,
            body_object: make(&blueprint.body.object)?,
            header_callback: make(&blueprint.header.callback)?,
            header_object: make(&blueprint.header.object)?,
        })
    }

    /// Callback slots are not flushed by the dispatcher
    fn flush_callbacks(&mut self) -> Result<()> {
        for sink in [self.body_callback.as_mut(), self.header_callback.as_mut()]
            .into_iter()
            .flatten()
        {
            sink.flush().context("Failed to flush callback sink")?;
        }
        Ok(())
    }
}

/// Register the slot sinks and defaults of `blueprint` on fresh options
fn build_options<'a>(
    sinks: &'a mut SlotSinks,
    blueprint: &RoutingBlueprint,
) -> Result<WriteOptions<'a>> {
    let mut options = WriteOptions::new();

    options.set_default_sink(
        Channel::Body,
        Box::new(create_sink(&blueprint.defaults.body).context("Failed to create body default")?),
    );
    options.set_default_sink(
        Channel::Header,
        Box::new(
            create_sink(&blueprint.defaults.header).context("Failed to create header default")?,
        ),
    );

    if let Some(sink) = sinks.body_object.as_mut() {
        options.set_body_object_sink(sink);
    }
    if let Some(sink) = sinks.header_object.as_mut() {
        options.set_header_object_sink(sink);
    }
    if let Some(sink) = sinks.body_callback.as_mut() {
        options.set_body_callback(move |chunk: &[u8]| sink.write(chunk));
    }
    if let Some(sink) = sinks.header_callback.as_mut() {
        options.set_header_callback(move |chunk: &[u8]| sink.write(chunk));
    }

    Ok(options)
}

/// Execute the `replay` command
pub async fn run_replay(args: &ReplayArgs) -> Result<()> {
    let mut blueprint = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            load_blueprint(path)?
        }
        None => {
            info!("No configuration given, using default routing");
            RoutingBlueprint::default()
        }
    };

    if let Some(chunk_size) = args.chunk_size {
        if chunk_size == 0 || chunk_size > TransferSettings::MAX_CHUNK_SIZE {
            anyhow::bail!(
                "--chunk-size must be between 1 and {} bytes",
                TransferSettings::MAX_CHUNK_SIZE
            );
        }
        info!(chunk_size, "Overriding chunk size from CLI");
        blueprint.transfer.chunk_size = chunk_size;
    }

    if !args.capture.exists() {
        return Err(CliError::capture_not_found(args.capture.display().to_string()).into());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let total = args.repeat.max(1);
    let mut sinks = SlotSinks::create(&blueprint)?;
    let mut aggregator = TransferStatsAggregator::new();
    let mut failure = None;

    {
        let mut options = build_options(&mut sinks, &blueprint)?;

        for index in 1..=total {
            let mut source = CaptureSource::open(&args.capture, blueprint.transfer.chunk_size)
                .await
                .with_context(|| format!("Failed to open capture {}", args.capture.display()))?;

            info!(
                transfer = %blueprint.transfer.name,
                index,
                total,
                "Replaying capture"
            );
            let (report, result) = perform_reporting(&mut source, &mut options).await;
            record_report(&report, &mut aggregator);
            print_report(&report, args.json)?;

            if let Err(e) = result {
                warn!(index, error = %e, "Replay stopped");
                failure = Some(CliError::transfer_aborted(index, total, e.to_string()));
                break;
            }
        }
    }

    sinks.flush_callbacks()?;
    eprintln!("{}", aggregator.summary());

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn record_report(report: &TransferReport, aggregator: &mut TransferStatsAggregator) {
    for channel in Channel::ALL {
        let snapshot = report.channel(channel);
        observability::record_channel_writes(
            channel,
            snapshot.chunk_count,
            snapshot.byte_count,
            snapshot.failure_count,
        );
    }

    let outcome = TransferOutcome {
        completed: report.state == TransferState::Completed,
        body_bytes: report.body.byte_count,
        header_bytes: report.header.byte_count,
        failure: report.failure,
    };
    observability::record_transfer(&outcome);
    aggregator.update(&outcome);
}

fn print_report(report: &TransferReport, json: bool) -> Result<()> {
    if json {
        let text =
            serde_json::to_string_pretty(report).context("Failed to serialize transfer report")?;
        eprintln!("{}", text);
        return Ok(());
    }

    eprintln!("Transfer {}", report.state);
    if let Some(routing) = report.routing {
        eprintln!("   ├─ body   -> {}", routing.body);
        eprintln!("   ├─ header -> {}", routing.header);
    }
    eprintln!(
        "   ├─ body:   {} chunks, {} bytes",
        report.body.chunk_count, report.body.byte_count
    );
    eprintln!(
        "   └─ header: {} chunks, {} bytes",
        report.header.chunk_count, report.header.byte_count
    );
    if let Some(error) = &report.error {
        eprintln!("   error: {}", error);
    }
    Ok(())
}
