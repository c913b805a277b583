//! Development login endpoint.
//!
//! ```text
//! POST /api/login {"username":"alice","password":"secret"}
//! ```
//!
//! A real identity provider is out of scope for this service; the login
//! stand-in derives a deterministic UUID from the username so the same name
//! always acts as the same listing owner. Credentials are only checked for
//! presence.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::ApiResult;

/// Login request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Derive the stable development identity for a username.
pub fn derive_user_id(username: &str) -> UserId {
    UserId::from(Uuid::new_v5(&Uuid::NAMESPACE_OID, username.as_bytes()))
}

/// Establish a session for the supplied username.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })));
    }
    if password.is_empty() {
        return Err(Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })));
    }

    let user_id = derive_user_id(username);
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().json(json!({ "id": user_id })))
}
