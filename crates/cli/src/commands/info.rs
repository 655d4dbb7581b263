//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{Channel, RoutingBlueprint, SinkConfig};
use dispatcher::{resolve_slots, Route, SlotState};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::commands::load_blueprint;

/// Routing info for JSON output
#[derive(Serialize)]
struct RoutingInfo {
    version: String,
    transfer: String,
    chunk_size: usize,
    channels: Vec<ChannelInfo>,
    shared: bool,
}

#[derive(Serialize)]
struct ChannelInfo {
    channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback: Option<SinkInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    object: Option<SinkInfo>,
    route: Route,
    sink: SinkInfo,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
}

impl From<&SinkConfig> for SinkInfo {
    fn from(config: &SinkConfig) -> Self {
        Self {
            name: config.name.clone(),
            sink_type: format!("{:?}", config.sink_type),
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = load_blueprint(&args.config)?;
    let info = build_routing_info(&blueprint);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize routing info")?;
        println!("{}", json);
    } else {
        print_routing_info(&info);
    }

    Ok(())
}

fn slot_state(blueprint: &RoutingBlueprint, channel: Channel) -> SlotState {
    let routing = blueprint.channel(channel);
    SlotState {
        callback: routing.callback.is_some(),
        object: routing.object.is_some(),
    }
}

/// The configured sink a resolved route lands on
fn route_sink(blueprint: &RoutingBlueprint, route: Route) -> Option<&SinkConfig> {
    match route {
        Route::Callback(c) => blueprint.channel(c).callback.as_ref(),
        Route::Object(c) => blueprint.channel(c).object.as_ref(),
        Route::Default(Channel::Body) => Some(&blueprint.defaults.body),
        Route::Default(Channel::Header) => Some(&blueprint.defaults.header),
    }
}

fn build_routing_info(blueprint: &RoutingBlueprint) -> RoutingInfo {
    let routing = resolve_slots(
        slot_state(blueprint, Channel::Body),
        slot_state(blueprint, Channel::Header),
    );

    let channels = Channel::ALL
        .iter()
        .map(|&channel| {
            let slots = blueprint.channel(channel);
            let route = routing.route(channel);
            let sink = route_sink(blueprint, route)
                .map(SinkInfo::from)
                .unwrap_or_else(|| SinkInfo {
                    name: "(unset)".to_string(),
                    sink_type: "-".to_string(),
                });
            ChannelInfo {
                channel,
                callback: slots.callback.as_ref().map(SinkInfo::from),
                object: slots.object.as_ref().map(SinkInfo::from),
                route,
                sink,
            }
        })
        .collect();

    RoutingInfo {
        version: format!("{:?}", blueprint.version),
        transfer: blueprint.transfer.name.clone(),
        chunk_size: blueprint.transfer.chunk_size,
        channels,
        shared: routing.is_shared(),
    }
}

fn print_routing_info(info: &RoutingInfo) {
    println!("Transfer '{}' ({})", info.transfer, info.version);
    println!("   └─ Chunk size: {}", info.chunk_size);

    for channel in &info.channels {
        println!("\n{}", channel.channel);
        let describe = |slot: &Option<SinkInfo>| match slot {
            Some(s) => format!("{} ({})", s.name, s.sink_type),
            None => "-".to_string(),
        };
        println!("   ├─ callback: {}", describe(&channel.callback));
        println!("   ├─ object:   {}", describe(&channel.object));
        println!(
            "   └─ resolved: {} -> {} ({})",
            channel.route, channel.sink.name, channel.sink.sink_type
        );
    }

    if info.shared {
        println!("\nBody and header share one sink");
    }
    println!();
}
