use serde_json::Value;
use tripdesk_common::{Result, TripdeskError};
use tripdesk_realtime::envelope::{RESERVATION_UPDATE, TRIP_UPDATE, USER_UPDATE};

use crate::context::{send_once, AppContext};

pub async fn run(ctx: &AppContext, kind: &str, data: Option<&str>) -> Result<()> {
    let payload = parse_payload(data)?;
    if ![TRIP_UPDATE, USER_UPDATE, RESERVATION_UPDATE].contains(&kind) {
        tracing::warn!(kind, "Receivers drop envelope types they do not know");
    }

    let client = ctx.oneshot_client();
    send_once(&client, kind, &payload).await?;
    println!("Sent {kind} to {}", client.config().url);
    Ok(())
}

fn parse_payload(data: Option<&str>) -> Result<Value> {
    match data {
        None => Ok(Value::Null),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| TripdeskError::Other(format!("--data is not valid JSON: {e}"))),
    }
}
