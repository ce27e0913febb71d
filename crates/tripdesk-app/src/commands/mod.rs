//! Subcommand handlers. Each one prints its result to stdout and returns
//! errors for `main` to report.

mod auth;
mod config;
mod notify;
mod reservations;
mod trips;
mod users;
mod watch;

use tripdesk_common::Result;

use crate::cli::Command;
use crate::context::AppContext;

pub async fn run(command: Command, ctx: &AppContext) -> Result<()> {
    match command {
        Command::Login { username, password } => auth::login(ctx, &username, &password).await,
        Command::Logout => auth::logout(ctx),
        Command::Whoami => auth::whoami(ctx),
        Command::Trips(cmd) => trips::run(ctx, cmd).await,
        Command::Users(cmd) => users::run(ctx, cmd).await,
        Command::Reserve {
            trip_id,
            name,
            phone,
            tickets,
        } => reservations::reserve(ctx, trip_id, name, phone, tickets).await,
        Command::Reservations { trip_id } => reservations::list(ctx, trip_id).await,
        Command::Cancel { reservation_id } => reservations::cancel(ctx, reservation_id).await,
        Command::Watch => watch::run(ctx).await,
        Command::Config(cmd) => config::run(ctx, cmd),
        Command::Notify { kind, data } => notify::run(ctx, &kind, data.as_deref()).await,
    }
}
