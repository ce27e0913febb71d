//! REST facade and session store for the trip-booking API.
//!
//! [`ApiClient`] issues the authentication, trip, reservation and user calls
//! and normalizes failures into [`ApiError`]. [`SessionStore`] keeps the
//! logged-in identity on disk between runs.

pub mod client;
mod error;
pub mod session;
pub mod types;

pub use client::{ApiClient, ApiSettings, DEFAULT_API_BASE_URL};
pub use error::ApiError;
pub use session::{SessionStore, SessionUser};
pub use types::{
    LoginResponse, MessageResponse, Reservation, ReservationRequest, ReservationResponse, Trip,
    User, UserMutationResponse,
};
