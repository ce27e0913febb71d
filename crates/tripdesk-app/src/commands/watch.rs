//! Live view: print feed events and refresh listings as updates arrive.

use tripdesk_common::{Result, TripdeskError};
use tripdesk_realtime::{ConnectionStatus, EventName, RealtimeEvent};

use super::trips::print_trips;
use super::users::print_users;
use crate::context::AppContext;
use crate::render;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let user = ctx.require_session()?;
    let client = ctx.realtime_client();
    let mut events = client.event_stream(&EventName::ALL);
    client.connect();
    println!("Watching {} (Ctrl-C to stop)", client.config().url);
    refresh(print_trips(ctx).await, "trips");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let outcome = loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Interrupted, closing realtime connection");
                break Ok(());
            }
            event = events.recv() => {
                let Some(event) = event else {
                    break Ok(());
                };
                println!("{}", render::event(&event));
                match event {
                    RealtimeEvent::TripUpdate(_) | RealtimeEvent::ReservationUpdate(_) => {
                        refresh(print_trips(ctx).await, "trips");
                    }
                    RealtimeEvent::UserUpdate(_) if user.is_admin => {
                        refresh(print_users(ctx).await, "users");
                    }
                    RealtimeEvent::Connection(ConnectionStatus::ReconnectExhausted) => {
                        break Err(TripdeskError::Realtime(format!(
                            "gave up reconnecting to {}",
                            client.config().url
                        )));
                    }
                    _ => {}
                }
            }
        }
    };

    client.disconnect();
    outcome
}

/// A failed refetch is reported and the watch carries on.
fn refresh(result: Result<()>, what: &str) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to load {what}. Is the API server running?");
    }
}
