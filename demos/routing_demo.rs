//! Routing Demo
//!
//! Replays a scripted HTTP response three times while changing the option
//! slots between transfers, printing where each channel landed.
//!
//! Run with: cargo run -p routing_demos -- [routing.toml]

use config_loader::ConfigLoader;
use contracts::{ByteSink, Channel};
use dispatcher::{perform, resolve, BufferSink, ScriptedSource, WriteOptions};
use observability::ObservabilityConfig;

fn response() -> ScriptedSource {
    ScriptedSource::http_response(
        "HTTP/1.1 200 OK",
        &[("Content-Type", "text/plain"), ("Content-Length", "7")],
        b"success",
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_with_config(ObservabilityConfig::default())?;

    if let Some(path) = std::env::args().nth(1) {
        let blueprint = ConfigLoader::load_from_path(std::path::Path::new(&path))?;
        for (label, sink) in blueprint.sinks() {
            tracing::info!(slot = %label, sink = %sink.name, kind = ?sink.sink_type, "Configured sink");
        }
    }

    let mut file_like = BufferSink::new("file_like");
    let file_view = file_like.clone();
    let callback_target = BufferSink::new("callback");
    let headers = BufferSink::new("headers");

    let mut options = WriteOptions::new();
    options.set_default_sink(Channel::Header, Box::new(headers.clone()));

    // 1: object sink only, headers share it
    options.set_body_object_sink(&mut file_like);
    tracing::info!(routing = ?resolve(&options), "Transfer 1");
    perform(&mut response(), &mut options).await?;

    // 2: callback shadows the object sink, headers go to their default
    let mut target = callback_target.clone();
    options.set_body_callback(move |chunk: &[u8]| target.write(chunk));
    tracing::info!(routing = ?resolve(&options), "Transfer 2");
    perform(&mut response(), &mut options).await?;

    // 3: callback cleared, back to the object sink
    options.clear_callback(Channel::Body);
    tracing::info!(routing = ?resolve(&options), "Transfer 3");
    perform(&mut response(), &mut options).await?;

    drop(options);
    println!("object sink:   {:?}", file_view.text());
    println!("callback sink: {:?}", callback_target.text());
    println!("header default: {:?}", headers.text());
    Ok(())
}
