use serde_json::json;
use tripdesk_common::Result;
use tripdesk_realtime::envelope::TRIP_UPDATE;

use crate::cli::TripsCommand;
use crate::context::AppContext;
use crate::render;

pub async fn run(ctx: &AppContext, command: TripsCommand) -> Result<()> {
    match command {
        TripsCommand::List => {
            ctx.require_session()?;
            print_trips(ctx).await
        }
        TripsCommand::Show { id } => {
            ctx.require_session()?;
            let trip = ctx.api.get_trip(id).await?;
            println!("{}", render::trip(&trip));
            Ok(())
        }
        TripsCommand::Search {
            attraction,
            from,
            to,
        } => {
            ctx.require_session()?;
            let term = attraction.trim();
            let trips = match (from, to) {
                _ if term.is_empty() => ctx.api.list_trips().await?,
                (Some(from), Some(to)) => {
                    ctx.api
                        .search_by_attraction_and_time(term, &from, &to)
                        .await?
                }
                _ => ctx.api.search_by_attraction(term).await?,
            };
            println!("{}", render::trips(&trips));
            Ok(())
        }
        TripsCommand::Create(fields) => {
            ctx.require_admin()?;
            let trip = ctx.api.create_trip(&fields.into_trip()).await?;
            println!("Trip created successfully!");
            ctx.announce(TRIP_UPDATE, &trip).await;
            print_trips(ctx).await
        }
        TripsCommand::Update(fields) => {
            ctx.require_admin()?;
            let trip = ctx.api.update_trip(&fields.into_trip()).await?;
            println!("Trip updated successfully!");
            ctx.announce(TRIP_UPDATE, &trip).await;
            print_trips(ctx).await
        }
        TripsCommand::Delete { id } => {
            ctx.require_admin()?;
            let reply = ctx.api.delete_trip(id).await?;
            println!("{}", reply.message);
            ctx.announce(TRIP_UPDATE, &json!({ "id": id })).await;
            print_trips(ctx).await
        }
    }
}

/// Fetch and print the full trip listing.
pub async fn print_trips(ctx: &AppContext) -> Result<()> {
    let trips = ctx.api.list_trips().await?;
    println!("{}", render::trips(&trips));
    Ok(())
}
