use serde_json::json;
use tripdesk_api::ReservationRequest;
use tripdesk_common::Result;
use tripdesk_realtime::envelope::RESERVATION_UPDATE;

use super::trips::print_trips;
use crate::context::AppContext;
use crate::render;

pub async fn reserve(
    ctx: &AppContext,
    trip_id: i32,
    name: String,
    phone: String,
    tickets: i32,
) -> Result<()> {
    ctx.require_session()?;
    let request = ReservationRequest {
        trip_id,
        customer_name: name,
        customer_phone: phone,
        tickets,
    };
    let reply = ctx.api.make_reservation(&request).await?;
    match &reply.reservation {
        Some(reservation) => println!("Reservation #{} confirmed!", reservation.id),
        None => println!("Reservation confirmed!"),
    }
    ctx.announce(RESERVATION_UPDATE, &json!({ "tripId": trip_id, "tickets": tickets }))
        .await;
    // Seat counts changed.
    print_trips(ctx).await
}

pub async fn list(ctx: &AppContext, trip_id: i32) -> Result<()> {
    ctx.require_session()?;
    let reservations = ctx.api.reservations_for_trip(trip_id).await?;
    println!("{}", render::reservations(&reservations));
    Ok(())
}

pub async fn cancel(ctx: &AppContext, reservation_id: i32) -> Result<()> {
    ctx.require_session()?;
    let reply = ctx.api.cancel_reservation(reservation_id).await?;
    println!("{}", reply.message);
    ctx.announce(RESERVATION_UPDATE, &json!({ "id": reservation_id }))
        .await;
    print_trips(ctx).await
}
