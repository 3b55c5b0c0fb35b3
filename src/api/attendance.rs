use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use crate::error::GatewayError;
use crate::model::attendance::AttendanceRecord;
use crate::model::summary::MonthlyReport;
use crate::service::{AttendanceService, SaveOutcome, TodayView};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    /// `YYYY-MM`; defaults to the current month.
    #[param(example = "2024-05")]
    pub month: Option<String>,
}

/// Today's attendance
#[utoipa::path(
    get,
    path = "/{user_name}",
    params(("user_name" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "Today's record and working hours", body = TodayView),
        (status = 502, description = "Backend unreachable", body = Object, example = json!({
            "message": "データの読み込みに失敗しました: backend request failed"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_today", skip_all, fields(user = %user_name))]
pub async fn today(
    service: web::Data<AttendanceService>,
    user_name: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let view = service.today(&user_name, service.now()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Clock in
///
/// Stamps the current time on the posted draft without saving it.
#[utoipa::path(
    post,
    path = "/{user_name}/clock-in",
    params(("user_name" = String, Path, description = "User name")),
    request_body = AttendanceRecord,
    responses(
        (status = 200, description = "Draft with clock-in time", body = TodayView),
        (status = 409, description = "Already clocked in", body = Object, example = json!({
            "message": "既に出勤済みです。"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_clock_in", skip_all, fields(user = %user_name))]
pub async fn clock_in(
    service: web::Data<AttendanceService>,
    user_name: web::Path<String>,
    draft: web::Json<AttendanceRecord>,
) -> Result<HttpResponse, GatewayError> {
    let view = service.clock_in(draft.into_inner(), service.now())?;
    Ok(HttpResponse::Ok().json(view))
}

/// Clock out
#[utoipa::path(
    post,
    path = "/{user_name}/clock-out",
    params(("user_name" = String, Path, description = "User name")),
    request_body = AttendanceRecord,
    responses(
        (status = 200, description = "Draft with clock-out time", body = TodayView),
        (status = 409, description = "Not clocked in, or already clocked out", body = Object, example = json!({
            "message": "出勤時間が記録されていません。"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_clock_out", skip_all, fields(user = %user_name))]
pub async fn clock_out(
    service: web::Data<AttendanceService>,
    user_name: web::Path<String>,
    draft: web::Json<AttendanceRecord>,
) -> Result<HttpResponse, GatewayError> {
    let view = service.clock_out(draft.into_inner(), service.now())?;
    Ok(HttpResponse::Ok().json(view))
}

/// Save today's record
#[utoipa::path(
    post,
    path = "/{user_name}",
    params(("user_name" = String, Path, description = "User name")),
    request_body = AttendanceRecord,
    responses(
        (status = 200, description = "Saved; refreshed records", body = SaveOutcome),
        (status = 400, description = "Clock time missing, or malformed date or time", body = Object, example = json!({
            "message": "出勤時間と退勤時間の両方が記録されていません。"
        })),
        (status = 502, description = "Backend unreachable", body = Object, example = json!({
            "message": "保存に失敗しました: backend request failed"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_save", skip_all, fields(user = %user_name))]
pub async fn save(
    service: web::Data<AttendanceService>,
    user_name: web::Path<String>,
    draft: web::Json<AttendanceRecord>,
) -> Result<HttpResponse, GatewayError> {
    let outcome = service.save(&user_name, draft.into_inner()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Monthly report
#[utoipa::path(
    get,
    path = "/{user_name}/monthly",
    params(
        ("user_name" = String, Path, description = "User name"),
        MonthQuery
    ),
    responses(
        (status = 200, description = "Records of the month with summary", body = MonthlyReport),
        (status = 400, description = "Malformed month", body = Object, example = json!({
            "message": "month must look like 2024-05, got `May`"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_monthly", skip_all, fields(user = %user_name))]
pub async fn monthly(
    service: web::Data<AttendanceService>,
    user_name: web::Path<String>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, GatewayError> {
    let report = service
        .monthly(&user_name, query.month.as_deref(), service.now())
        .await?;
    Ok(HttpResponse::Ok().json(report))
}
