use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tripdesk_api::Trip;

/// Tripdesk: trip-booking administration from the terminal.
#[derive(Parser, Debug)]
#[command(name = "tripdesk", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (e.g. `debug`, `tripdesk=trace`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Log in and remember the session.
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show who is logged in.
    Whoami,
    /// Browse and manage trips.
    #[command(subcommand)]
    Trips(TripsCommand),
    /// Manage user accounts (admin only).
    #[command(subcommand)]
    Users(UsersCommand),
    /// Book seats on a trip.
    Reserve {
        trip_id: i32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..))]
        tickets: i32,
    },
    /// List reservations for a trip.
    Reservations { trip_id: i32 },
    /// Cancel a reservation.
    Cancel { reservation_id: i32 },
    /// Follow the live update feed until Ctrl-C.
    Watch,
    /// Inspect or create the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Send one update envelope to other watchers.
    Notify {
        /// Envelope type, e.g. TRIP_UPDATE.
        kind: String,
        /// JSON payload; `null` when omitted.
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum TripsCommand {
    List,
    Show {
        id: i32,
    },
    /// Search by attraction, optionally within a departure window.
    Search {
        attraction: String,
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    Create(TripFields),
    Update(TripFields),
    Delete {
        id: i32,
    },
}

/// Every field of a trip; create and update both send the full record.
#[derive(ClapArgs, Debug, Clone, PartialEq)]
pub struct TripFields {
    pub id: i32,
    #[arg(long)]
    pub attraction: String,
    #[arg(long)]
    pub company: String,
    /// Departure time, in the format the server expects.
    #[arg(long)]
    pub departure: String,
    #[arg(long)]
    pub price: f64,
    #[arg(long)]
    pub seats: i32,
}

impl TripFields {
    pub fn into_trip(self) -> Trip {
        Trip {
            id: self.id,
            attraction_name: self.attraction,
            transport_company: self.company,
            departure_time: self.departure,
            price: self.price,
            available_seats: self.seats,
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum UsersCommand {
    List,
    Search {
        username: String,
    },
    Create {
        id: i32,
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Update {
        id: i32,
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Delete {
        id: i32,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommand {
    /// Print the effective config as JSON.
    Show,
    /// Write a config file filled with defaults.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    /// Commands that must run even when no config file exists yet.
    pub fn skips_config_load(&self) -> bool {
        matches!(self, Command::Config(ConfigCommand::Init { .. }))
    }
}

pub fn parse() -> Args {
    Args::parse()
}
