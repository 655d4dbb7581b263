//! Transfer driver - pulls events from a source through a fresh dispatcher

use contracts::TransferSource;
use tracing::{info, instrument, warn};

use crate::dispatcher::{StreamDispatcher, TransferReport};
use crate::error::DispatcherError;
use crate::options::WriteOptions;

/// Run one transfer, returning its report whether or not it succeeded
///
/// Routing is resolved fresh from `options` for this transfer. Pulling stops
/// at the first sink failure or source error.
#[instrument(name = "transfer_perform", skip(source, options), fields(source = source.name()))]
pub async fn perform_reporting<S: TransferSource>(
    source: &mut S,
    options: &mut WriteOptions<'_>,
) -> (TransferReport, Result<(), DispatcherError>) {
    let mut dispatcher = StreamDispatcher::new(options);
    let result = drive(source, &mut dispatcher).await;

    let report = dispatcher.report();
    match &result {
        Ok(()) => info!(
            body_bytes = report.body.byte_count,
            header_bytes = report.header.byte_count,
            "Transfer finished"
        ),
        Err(e) => warn!(error = %e, "Transfer aborted"),
    }
    (report, result)
}

/// Run one transfer
///
/// # Errors
/// - `ShortWrite` / `SinkAbort` when a sink refuses data
/// - `Transfer` when the source fails
pub async fn perform<S: TransferSource>(
    source: &mut S,
    options: &mut WriteOptions<'_>,
) -> Result<TransferReport, DispatcherError> {
    let (report, result) = perform_reporting(source, options).await;
    result.map(|()| report)
}

async fn drive<S: TransferSource>(
    source: &mut S,
    dispatcher: &mut StreamDispatcher<'_, '_>,
) -> Result<(), DispatcherError> {
    dispatcher.start()?;

    loop {
        match source.next_event().await {
            Ok(Some(event)) => dispatcher.deliver(event.channel(), event.bytes())?,
            Ok(None) => break,
            Err(e) => {
                let kind = e.transfer_kind();
                dispatcher.fail(kind);
                return Err(DispatcherError::Transfer {
                    kind,
                    message: e.to_string(),
                });
            }
        }
    }

    dispatcher.complete().map(|_| ())
}
