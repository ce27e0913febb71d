//! `/auth` endpoints: login and user administration.

use reqwest::Method;
use tracing::info;

use super::{accepted, ApiClient};
use crate::error::ApiError;
use crate::types::{
    CreateUserRequest, LoginRequest, LoginResponse, MessageResponse, UpdateUserRequest, User,
    UserMutationResponse,
};

impl ApiClient {
    /// Check credentials. Bad credentials come back as
    /// [`ApiError::Rejected`] carrying the server's message.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        info!(username, "Attempting login");
        let request = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest { username, password });
        let response: LoginResponse = self.json(request).await?;
        let message = response.message.clone();
        accepted(response.success, &message, response)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.json(self.request(Method::GET, "/auth/users")).await
    }

    pub async fn search_users(&self, username: &str) -> Result<Vec<User>, ApiError> {
        let request = self
            .request(Method::GET, "/auth/users/search")
            .query(&[("username", username)]);
        self.json(request).await
    }

    pub async fn create_user(
        &self,
        id: i32,
        username: &str,
        password: &str,
    ) -> Result<UserMutationResponse, ApiError> {
        let request = self
            .request(Method::POST, "/auth/users")
            .json(&CreateUserRequest {
                id,
                username,
                password,
            });
        let response: UserMutationResponse = self.json(request).await?;
        let message = response.message.clone();
        accepted(response.success, &message, response)
    }

    pub async fn update_user(
        &self,
        id: i32,
        username: &str,
        password: &str,
    ) -> Result<UserMutationResponse, ApiError> {
        let request = self
            .request(Method::PUT, &format!("/auth/users/{id}"))
            .json(&UpdateUserRequest { username, password });
        let response: UserMutationResponse = self.json(request).await?;
        let message = response.message.clone();
        accepted(response.success, &message, response)
    }

    pub async fn delete_user(&self, id: i32) -> Result<MessageResponse, ApiError> {
        self.message(self.request(Method::DELETE, &format!("/auth/users/{id}")))
            .await
    }
}
