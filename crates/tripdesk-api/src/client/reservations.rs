//! `/reservations` endpoints.

use reqwest::Method;

use super::{accepted, ApiClient};
use crate::error::ApiError;
use crate::types::{MessageResponse, Reservation, ReservationRequest, ReservationResponse};

impl ApiClient {
    /// Book seats. Seat accounting happens server-side; a refusal such as
    /// "Not enough seats available" surfaces as [`ApiError::Rejected`].
    pub async fn make_reservation(
        &self,
        reservation: &ReservationRequest,
    ) -> Result<ReservationResponse, ApiError> {
        let request = self
            .request(Method::POST, "/reservations")
            .json(reservation);
        let response: ReservationResponse = self.json(request).await?;
        let message = response.message.clone();
        accepted(response.success, &message, response)
    }

    pub async fn reservations_for_trip(&self, trip_id: i32) -> Result<Vec<Reservation>, ApiError> {
        self.json(self.request(Method::GET, &format!("/reservations/trip/{trip_id}")))
            .await
    }

    pub async fn cancel_reservation(&self, id: i32) -> Result<MessageResponse, ApiError> {
        self.message(self.request(Method::DELETE, &format!("/reservations/{id}")))
            .await
    }
}
