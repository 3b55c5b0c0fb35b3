use crate::model::attendance::AttendanceRecord;
use crate::model::shift::{CreateShiftRequest, RawShift};
use crate::model::summary::{MonthlyReport, MonthlySummary};
use crate::model::user::CreateUserRequest;
use crate::service::{SaveOutcome, TodayView, UserCreated};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kintai API",
        version = "0.1.0",
        description = r#"
## Attendance tracking

Employees clock in and out, note what they worked on and any concerns,
and review monthly summaries.

### 🔹 Key Features
- **Daily attendance**
  - Clock in / clock out, working hours for the day, save with notes
- **Monthly report**
  - Working days, total and average working hours, month selector
- **Backend proxy**
  - `/api/shifts` and `/api/users` forward to the configured backend,
    preserving status codes and the `{message}` error envelope

### 📦 Response Format
- JSON; durations are rendered as `HH時間MM分`
"#,
    ),
    paths(
        crate::api::attendance::today,
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::save,
        crate::api::attendance::monthly,

        crate::api::user::create_user,

        crate::api::proxy::get_shifts,
        crate::api::proxy::create_shift,
        crate::api::proxy::get_user_shifts,
        crate::api::proxy::create_user_shift,
        crate::api::proxy::get_users,
        crate::api::proxy::create_user
    ),
    components(
        schemas(
            AttendanceRecord,
            RawShift,
            CreateShiftRequest,
            CreateUserRequest,
            MonthlySummary,
            MonthlyReport,
            TodayView,
            SaveOutcome,
            UserCreated
        )
    ),
    tags(
        (name = "Attendance", description = "Daily attendance and monthly reports"),
        (name = "User", description = "User registration"),
        (name = "Proxy", description = "Pass-through to the shift backend"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/{user_name}",
            "/{user_name}/clock-in",
            "/{user_name}/clock-out",
            "/{user_name}/monthly",
            "/user",
            "/api/shifts",
            "/api/shifts/{user_name}",
            "/api/users",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
