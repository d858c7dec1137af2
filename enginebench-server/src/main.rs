use clap::Parser;
use enginebench_server::{config::DEFAULT_BODY_SIZE, Server, ServerConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "enginebench-stub", about = "Stand-in HTTP engine with scripted latency")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Bytes in every response body.
    #[arg(long, default_value_t = DEFAULT_BODY_SIZE)]
    body_size: usize,

    /// Fixed latency per response, in milliseconds.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Extra random latency of up to this many milliseconds.
    #[arg(long, default_value_t = 0)]
    jitter_ms: u64,

    /// Grow the body by one byte per request served.
    #[arg(long)]
    unstable_length: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enginebench_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = ServerConfig {
        address: args.listen,
        body_size: args.body_size,
        delay: Duration::from_millis(args.delay_ms),
        jitter: Duration::from_millis(args.jitter_ms),
        unstable_length: args.unstable_length,
    };

    let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();

    // Print "Listening on <addr>" once the server signals it is bound.
    tokio::spawn(async move {
        if let Ok(addr) = ready_rx.await {
            println!("Listening on {}", addr);
        }
    });

    Server::new(config).run(ready_tx).await?;
    Ok(())
}
