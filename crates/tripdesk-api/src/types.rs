//! Request and response bodies, named after the JSON the server speaks.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: i32,
    pub attraction_name: String,
    pub transport_company: String,
    /// Opaque; forwarded exactly as the server formats it.
    pub departure_time: String,
    pub price: f64,
    pub available_seats: i32,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Serialize)]
pub(crate) struct CreateUserRequest<'a> {
    pub id: i32,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct UpdateUserRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Reply to user create and update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserMutationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub trip_id: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub tickets: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i32,
    pub trip_id: i32,
    pub customer_id: i32,
    pub number_of_tickets: i32,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub attraction_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReservationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reservation: Option<Reservation>,
}

/// `{"message": ...}`, returned by deletes and cancellations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Any reply carrying the `success`/`message` pair.
#[derive(Deserialize)]
pub(crate) struct Outcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
