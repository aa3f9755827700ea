mod demo;
mod protocol;

use clap::Parser;
use mirror_dom::{describe_tree, ChannelSink, Document, PipelineConfig, DEFAULT_CONFIG_NAME};
use protocol::{Inbound, Outbound};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::{LinesStream, UnboundedReceiverStream};
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

/// Drive a mirrored document over JSON lines: events in on stdin, render
/// commands out on stdout.
#[derive(Parser, Debug)]
#[command(name = "mirror-playground")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pipeline config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_NAME)]
    config: PathBuf,

    /// Override the per-node inbound channel capacity
    #[arg(long)]
    capacity: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries protocol lines only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = PipelineConfig::load(&args.config)?;
    if let Some(capacity) = args.capacity {
        config.channel_capacity = capacity;
    }
    config.validate()?;
    tracing::info!(capacity = config.channel_capacity, "starting playground");

    let (sink, commands) = ChannelSink::new();
    let doc = Document::new(Arc::new(sink), config)?;
    let page = demo::build(&doc)?;
    tracing::info!(
        button = %page.button.id(),
        input = %page.input.id(),
        counter = %page.counter.id(),
        echo = %page.echo.id(),
        "demo page ready"
    );

    let writer = tokio::spawn(async move {
        let mut commands = UnboundedReceiverStream::new(commands);
        while let Some(command) = commands.next().await {
            protocol::emit(&Outbound::Render { command });
        }
    });

    protocol::emit(&Outbound::Snapshot {
        tree: describe_tree(doc.root()),
    });

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    while let Some(line) = lines.next().await {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let inbound: Inbound = match serde_json::from_str(&line) {
            Ok(inbound) => inbound,
            Err(e) => {
                protocol::emit(&Outbound::Error {
                    message: format!("Invalid message: {}", e),
                });
                continue;
            }
        };

        match inbound {
            Inbound::Event { node, payload } => {
                if let Err(e) = doc.deliver(node, payload).await {
                    protocol::emit(&Outbound::Error {
                        message: e.to_string(),
                    });
                }
            }
            Inbound::Describe { node } => {
                let target = match node {
                    Some(id) => doc.find(id),
                    None => Some(doc.root().clone()),
                };
                match target {
                    Some(target) => protocol::emit(&Outbound::Snapshot {
                        tree: describe_tree(&target),
                    }),
                    None => protocol::emit(&Outbound::Error {
                        message: "Node not found".to_string(),
                    }),
                }
            }
        }
    }

    tracing::info!("stdin closed, shutting down");
    drop(page);
    drop(doc);
    writer.abort();
    Ok(())
}
