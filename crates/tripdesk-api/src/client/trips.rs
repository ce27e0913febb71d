//! `/trips` endpoints.

use reqwest::Method;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{MessageResponse, Trip};

impl ApiClient {
    pub async fn list_trips(&self) -> Result<Vec<Trip>, ApiError> {
        self.json(self.request(Method::GET, "/trips")).await
    }

    pub async fn get_trip(&self, id: i32) -> Result<Trip, ApiError> {
        self.json(self.request(Method::GET, &format!("/trips/{id}")))
            .await
    }

    /// Create `trip` under `trip.id`. The server takes the id from the path.
    pub async fn create_trip(&self, trip: &Trip) -> Result<Trip, ApiError> {
        let path = format!("/trips/{}", trip.id);
        self.json(self.request(Method::POST, &path).json(trip)).await
    }

    pub async fn update_trip(&self, trip: &Trip) -> Result<Trip, ApiError> {
        let path = format!("/trips/{}", trip.id);
        self.json(self.request(Method::PUT, &path).json(trip)).await
    }

    pub async fn delete_trip(&self, id: i32) -> Result<MessageResponse, ApiError> {
        self.message(self.request(Method::DELETE, &format!("/trips/{id}")))
            .await
    }

    /// Trips whose attraction name contains `attraction`.
    pub async fn search_by_attraction(&self, attraction: &str) -> Result<Vec<Trip>, ApiError> {
        let request = self
            .request(Method::GET, "/trips/search/attraction")
            .query(&[("attraction", attraction)]);
        self.json(request).await
    }

    /// Trips for `attraction` departing between `start_time` and `end_time`.
    /// Times are passed through in whatever format the server accepts.
    pub async fn search_by_attraction_and_time(
        &self,
        attraction: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<Vec<Trip>, ApiError> {
        let request = self.request(Method::GET, "/trips/search/time").query(&[
            ("attraction", attraction),
            ("startTime", start_time),
            ("endTime", end_time),
        ]);
        self.json(request).await
    }
}
