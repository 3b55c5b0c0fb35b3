use actix_web::{HttpResponse, web};
use tracing::instrument;

use crate::error::GatewayError;
use crate::model::user::CreateUserRequest;
use crate::service::{AttendanceService, UserCreated};

/// Create user form
#[utoipa::path(
    post,
    path = "/user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserCreated),
        (status = 400, description = "Name or email missing, or reserved name", body = Object, example = json!({
            "message": "名前とメールアドレスを入力してください"
        }))
    ),
    tag = "User"
)]
#[instrument(name = "user_create", skip_all)]
pub async fn create_user(
    service: web::Data<AttendanceService>,
    form: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, GatewayError> {
    let created = service.create_user(&form).await?;
    Ok(HttpResponse::Created().json(created))
}
