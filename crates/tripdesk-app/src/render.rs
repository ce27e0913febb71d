//! Plain-text tables and lines for terminal output.

use tabled::settings::Style;
use tabled::{Table, Tabled};
use tripdesk_api::{Reservation, SessionUser, Trip, User};
use tripdesk_realtime::RealtimeEvent;

#[derive(Tabled)]
struct TripRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "ATTRACTION")]
    attraction: String,
    #[tabled(rename = "COMPANY")]
    company: String,
    #[tabled(rename = "DEPARTURE")]
    departure: String,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "SEATS")]
    seats: String,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "USERNAME")]
    username: String,
}

#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "TICKETS")]
    tickets: i32,
}

fn table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn trips(trips: &[Trip]) -> String {
    if trips.is_empty() {
        return "No trips found.".to_string();
    }
    table(
        trips
            .iter()
            .map(|t| TripRow {
                id: t.id,
                attraction: t.attraction_name.clone(),
                company: t.transport_company.clone(),
                departure: t.departure_time.clone(),
                price: format!("{:.2}", t.price),
                seats: seats(t.available_seats),
            })
            .collect(),
    )
}

fn seats(available: i32) -> String {
    if available > 0 {
        available.to_string()
    } else {
        "sold out".to_string()
    }
}

pub fn trip(trip: &Trip) -> String {
    format!(
        "Trip #{}\n  Attraction: {}\n  Company:    {}\n  Departure:  {}\n  Price:      {:.2}\n  Seats:      {}",
        trip.id,
        trip.attraction_name,
        trip.transport_company,
        trip.departure_time,
        trip.price,
        seats(trip.available_seats),
    )
}

pub fn users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }
    table(
        users
            .iter()
            .map(|u| UserRow {
                id: u.id,
                username: u.username.clone(),
            })
            .collect(),
    )
}

pub fn reservations(reservations: &[Reservation]) -> String {
    if reservations.is_empty() {
        return "No reservations.".to_string();
    }
    table(
        reservations
            .iter()
            .map(|r| ReservationRow {
                id: r.id,
                customer: r
                    .customer_name
                    .clone()
                    .unwrap_or_else(|| format!("#{}", r.customer_id)),
                tickets: r.number_of_tickets,
            })
            .collect(),
    )
}

pub fn session(user: &SessionUser) -> String {
    let role = if user.is_admin { "administrator" } else { "agent" };
    format!("{} (id {}, {role})", user.username, user.user_id)
}

/// One line per feed event, prefixed with the event name.
pub fn event(event: &RealtimeEvent) -> String {
    match event {
        RealtimeEvent::Connection(status) => format!("[connection] {}", status.as_str()),
        RealtimeEvent::Error(message) => format!("[error] {message}"),
        other => format!("[{}] {}", other.name(), other.payload()),
    }
}

#[cfg(test)]
mod tests {
    use tripdesk_realtime::ConnectionStatus;

    use super::*;

    fn trip_fixture(id: i32, attraction: &str, seats: i32) -> Trip {
        Trip {
            id,
            attraction_name: attraction.into(),
            transport_company: "BusCo".into(),
            departure_time: "2024-06-01T08:00".into(),
            price: 49.5,
            available_seats: seats,
        }
    }

    #[test]
    fn trip_table_lists_rows_in_order() {
        let out = trips(&[trip_fixture(1, "Castle", 12), trip_fixture(10, "Old Town", 0)]);
        let header = out.lines().next().unwrap();
        for column in ["ID", "ATTRACTION", "COMPANY", "DEPARTURE", "PRICE", "SEATS"] {
            assert!(header.contains(column), "{header}");
        }
        let castle = out.find("Castle").unwrap();
        let old_town = out.find("Old Town").unwrap();
        assert!(castle < old_town);
        assert!(out.contains("49.50"));
        assert!(out.contains("sold out"));
    }

    #[test]
    fn empty_listings_say_so() {
        assert_eq!(trips(&[]), "No trips found.");
        assert_eq!(users(&[]), "No users found.");
        assert_eq!(reservations(&[]), "No reservations.");
    }

    #[test]
    fn user_table_never_shows_passwords() {
        let out = users(&[User {
            id: 2,
            username: "ana".into(),
            password: "hunter2".into(),
        }]);
        assert!(out.contains("ana"));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn reservations_fall_back_to_customer_id() {
        let out = reservations(&[Reservation {
            id: 5,
            trip_id: 1,
            customer_id: 9,
            number_of_tickets: 2,
            customer_name: None,
            attraction_name: None,
        }]);
        assert!(out.contains("#9"), "{out}");
        assert!(out.contains("CUSTOMER"));
    }

    #[test]
    fn event_lines() {
        assert_eq!(
            event(&RealtimeEvent::Connection(ConnectionStatus::ReconnectExhausted)),
            "[connection] reconnect_exhausted"
        );
        assert_eq!(
            event(&RealtimeEvent::TripUpdate(serde_json::json!({"id": 7}))),
            r#"[tripUpdate] {"id":7}"#
        );
        assert_eq!(event(&RealtimeEvent::Error("refused".into())), "[error] refused");
    }

    #[test]
    fn session_line_names_the_role() {
        let user = SessionUser {
            user_id: 1,
            username: "admin".into(),
            is_admin: true,
        };
        assert_eq!(session(&user), "admin (id 1, administrator)");
    }
}
