//! tripdesk-hub: development broadcast server for the realtime feed.
//!
//! Accepts WebSocket connections on any path and rebroadcasts every
//! `{type, data}` envelope a client sends to all other connected clients,
//! never back to the sender. Stands in for the backend's update socket
//! when exercising the realtime client locally.

mod connection;
mod registry;

use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use crate::connection::handle_connection;
use crate::registry::HubRegistry;

#[derive(Parser)]
#[command(name = "tripdesk-hub", about = "WebSocket broadcast hub for tripdesk development")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripdesk_hub=info".into()),
        )
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.bind, args.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind TCP listener");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("tripdesk-hub listening on {}", addr);
    serve(listener, HubRegistry::new()).await;
    ExitCode::SUCCESS
}

/// Accept loop. Each connection gets its own task.
async fn serve(listener: TcpListener, registry: HubRegistry) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let registry = registry.clone();
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, registry).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
