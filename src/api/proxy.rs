//! Pass-through routes to the backend under the API prefix.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde_json::{Value, json};
use tracing::{error, instrument, warn};

use crate::backend::{BackendClient, BackendResponse};
use crate::model::shift::{CreateShiftRequest, RawShift};
use crate::model::user::CreateUserRequest;

/// Relays a backend reply: `success` on 2xx, the backend status with a
/// `{message}` envelope otherwise, 500 when the backend was unreachable.
fn relay(
    result: Result<BackendResponse, reqwest::Error>,
    success: StatusCode,
    failure_message: &str,
) -> HttpResponse {
    match result {
        Ok(reply) if reply.is_success() => {
            HttpResponse::build(success).json(reply.body.unwrap_or(Value::Null))
        }
        Ok(reply) => {
            let status =
                StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            warn!(status = reply.status, "Backend rejected request");
            HttpResponse::build(status).json(json!({
                "message": reply.message().unwrap_or_else(|| failure_message.to_string())
            }))
        }
        Err(e) => {
            error!(error = %e, "Backend unreachable");
            HttpResponse::InternalServerError().json(json!({
                "message": failure_message,
                "error": e.to_string()
            }))
        }
    }
}

/// List all shifts
#[utoipa::path(
    get,
    path = "/api/shifts",
    responses(
        (status = 200, description = "Shifts as returned by the backend", body = [RawShift]),
        (status = 500, description = "Backend unreachable", body = Object, example = json!({
            "message": "Failed to fetch shifts",
            "error": "error sending request"
        }))
    ),
    tag = "Proxy"
)]
#[instrument(name = "proxy_get_shifts", skip_all)]
pub async fn get_shifts(backend: web::Data<BackendClient>) -> impl Responder {
    relay(
        backend.get_json(&["shifts"], &[]).await,
        StatusCode::OK,
        "Failed to fetch shifts",
    )
}

/// Create a shift
#[utoipa::path(
    post,
    path = "/api/shifts",
    request_body = CreateShiftRequest,
    responses(
        (status = 201, description = "Shift created", body = Object),
        (status = 500, description = "Backend unreachable", body = Object, example = json!({
            "message": "Failed to create shift"
        }))
    ),
    tag = "Proxy"
)]
#[instrument(name = "proxy_create_shift", skip_all)]
pub async fn create_shift(
    backend: web::Data<BackendClient>,
    body: web::Json<Value>,
) -> impl Responder {
    relay(
        backend.post_json(&["shifts"], &body.into_inner()).await,
        StatusCode::CREATED,
        "Failed to create shift",
    )
}

/// List the shifts of one user
///
/// Extra query parameters are forwarded after `userName`.
#[utoipa::path(
    get,
    path = "/api/shifts/{user_name}",
    params(("user_name" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "Shifts of the user", body = [RawShift]),
        (status = 500, description = "Backend unreachable", body = Object, example = json!({
            "message": "Failed to fetch user shifts"
        }))
    ),
    tag = "Proxy"
)]
#[instrument(name = "proxy_get_user_shifts", skip_all, fields(user = %user_name))]
pub async fn get_user_shifts(
    backend: web::Data<BackendClient>,
    user_name: web::Path<String>,
    query: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    let mut pairs = vec![("userName".to_string(), user_name.into_inner())];
    pairs.extend(query.into_inner());

    relay(
        backend.get_json(&["shifts"], &pairs).await,
        StatusCode::OK,
        "Failed to fetch user shifts",
    )
}

/// Create a shift for one user
#[utoipa::path(
    post,
    path = "/api/shifts/{user_name}",
    params(("user_name" = String, Path, description = "User name")),
    request_body = CreateShiftRequest,
    responses(
        (status = 201, description = "Shift created", body = Object),
        (status = 500, description = "Backend unreachable", body = Object, example = json!({
            "message": "Failed to create user shift"
        }))
    ),
    tag = "Proxy"
)]
#[instrument(name = "proxy_create_user_shift", skip_all, fields(user = %user_name))]
pub async fn create_user_shift(
    backend: web::Data<BackendClient>,
    user_name: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    relay(
        backend
            .post_json(&["shifts", user_name.as_str()], &body.into_inner())
            .await,
        StatusCode::CREATED,
        "Failed to create user shift",
    )
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users as returned by the backend", body = Object),
        (status = 500, description = "Backend unreachable", body = Object, example = json!({
            "message": "Failed to fetch users"
        }))
    ),
    tag = "Proxy"
)]
#[instrument(name = "proxy_get_users", skip_all)]
pub async fn get_users(backend: web::Data<BackendClient>) -> impl Responder {
    relay(
        backend.get_json(&["users"], &[]).await,
        StatusCode::OK,
        "Failed to fetch users",
    )
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = Object),
        (status = 500, description = "Backend unreachable", body = Object, example = json!({
            "message": "Failed to create user"
        }))
    ),
    tag = "Proxy"
)]
#[instrument(name = "proxy_create_user", skip_all)]
pub async fn create_user(
    backend: web::Data<BackendClient>,
    body: web::Json<Value>,
) -> impl Responder {
    relay(
        backend.post_json(&["users"], &body.into_inner()).await,
        StatusCode::CREATED,
        "Failed to create user",
    )
}
