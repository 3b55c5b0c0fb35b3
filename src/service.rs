//! Daily and monthly attendance operations on top of a [`ShiftGateway`].

use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::backend::{BackendClient, BackendResponse};
use crate::error::GatewayError;
use crate::gateway::ShiftGateway;
use crate::model::attendance::AttendanceRecord;
use crate::model::summary::MonthlyReport;
use crate::model::user::CreateUserRequest;
use crate::timesheet::aggregate::{find_by_date, monthly_report};
use crate::timesheet::time::working_hours_label;

pub const MSG_SAVED: &str = "保存しました";
pub const MSG_SAVE_FAILED: &str = "保存に失敗しました";
pub const MSG_MISSING_TIMES: &str = "出勤時間と退勤時間の両方が記録されていません。";
pub const MSG_INVALID_RECORD: &str = "日付または時刻の形式が正しくありません。";
pub const MSG_ALREADY_CLOCKED_IN: &str = "既に出勤済みです。";
pub const MSG_NOT_CLOCKED_IN: &str = "出勤時間が記録されていません。";
pub const MSG_ALREADY_CLOCKED_OUT: &str = "既に退勤済みです。";
pub const MSG_FETCH_FAILED: &str = "データの読み込みに失敗しました";
pub const MSG_USER_FIELDS_REQUIRED: &str = "名前とメールアドレスを入力してください";
pub const MSG_USER_CREATED: &str = "ユーザーが正常に作成されました";
pub const MSG_USER_CREATE_FAILED: &str = "ユーザーの作成に失敗しました";
pub const MSG_USER_NAME_RESERVED: &str = "このユーザー名は使用できません";

/// First path segments taken by non-user routes; a user with one of these
/// names would be shadowed.
pub const RESERVED_USER_NAMES: [&str; 4] = ["api", "api-doc", "swagger-ui", "user"];

/// Everything the daily page shows.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayView {
    #[schema(example = "2024-05-01")]
    pub date: String,
    #[schema(example = "2024年5月1日水曜日")]
    pub date_label: String,
    #[schema(example = "09:12:45")]
    pub current_time: String,
    pub record: AttendanceRecord,
    #[schema(example = "08時間30分", nullable = true)]
    pub working_hours: Option<String>,
    pub can_clock_in: bool,
    pub can_clock_out: bool,
}

impl TodayView {
    fn new(record: AttendanceRecord, now: &DateTime<FixedOffset>) -> Self {
        let working_hours =
            working_hours_label(record.clock_in.as_deref(), record.clock_out.as_deref());

        Self {
            date: record.date.clone(),
            date_label: long_date_label(now.date_naive()),
            current_time: now.format("%H:%M:%S").to_string(),
            can_clock_in: record.clock_in.is_none(),
            can_clock_out: record.clock_in.is_some() && record.clock_out.is_none(),
            working_hours,
            record,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaveOutcome {
    #[schema(example = "保存しました")]
    pub message: String,
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserCreated {
    #[schema(example = "ユーザーが正常に作成されました")]
    pub message: String,
    #[schema(value_type = Object, nullable = true)]
    pub user: serde_json::Value,
}

pub struct AttendanceService {
    gateway: Arc<dyn ShiftGateway>,
    backend: BackendClient,
    offset: FixedOffset,
}

impl AttendanceService {
    pub fn new(gateway: Arc<dyn ShiftGateway>, backend: BackendClient, offset: FixedOffset) -> Self {
        Self {
            gateway,
            backend,
            offset,
        }
    }

    /// Current wall-clock time in the display offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Today's record of `user`, or an empty one dated today.
    pub async fn today(
        &self,
        user: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<TodayView, GatewayError> {
        let today = now.format("%Y-%m-%d").to_string();
        let records = self
            .gateway
            .list(user)
            .await
            .map_err(|e| e.during(MSG_FETCH_FAILED))?;

        let record = find_by_date(&records, &today)
            .cloned()
            .unwrap_or_else(|| AttendanceRecord::empty(&today));

        Ok(TodayView::new(record, &now))
    }

    /// Stamps the clock-in time on an unsaved draft.
    pub fn clock_in(
        &self,
        mut draft: AttendanceRecord,
        now: DateTime<FixedOffset>,
    ) -> Result<TodayView, GatewayError> {
        if draft.clock_in.is_some() {
            return Err(GatewayError::Conflict(MSG_ALREADY_CLOCKED_IN.into()));
        }

        if draft.date.is_empty() {
            draft.date = now.format("%Y-%m-%d").to_string();
        }
        draft.clock_in = Some(now.format("%H:%M").to_string());
        Ok(TodayView::new(draft, &now))
    }

    /// Stamps the clock-out time; only after clock-in.
    pub fn clock_out(
        &self,
        mut draft: AttendanceRecord,
        now: DateTime<FixedOffset>,
    ) -> Result<TodayView, GatewayError> {
        if draft.clock_in.is_none() {
            return Err(GatewayError::Conflict(MSG_NOT_CLOCKED_IN.into()));
        }
        if draft.clock_out.is_some() {
            return Err(GatewayError::Conflict(MSG_ALREADY_CLOCKED_OUT.into()));
        }

        draft.clock_out = Some(now.format("%H:%M").to_string());
        Ok(TodayView::new(draft, &now))
    }

    /// Persists a draft that has both clock times.
    pub async fn save(
        &self,
        user: &str,
        draft: AttendanceRecord,
    ) -> Result<SaveOutcome, GatewayError> {
        if !draft.is_complete() {
            info!(user, date = %draft.date, "Save rejected: missing clock times");
            return Err(GatewayError::Validation(MSG_MISSING_TIMES.into()));
        }
        if !is_well_formed(&draft) {
            info!(user, date = %draft.date, "Save rejected: malformed date or time");
            return Err(GatewayError::Validation(MSG_INVALID_RECORD.into()));
        }

        let records = self
            .gateway
            .save(user, &draft)
            .await
            .map_err(|e| {
                warn!(user, error = %e, "Save failed");
                e.during(MSG_SAVE_FAILED)
            })?;

        info!(user, date = %draft.date, "Record saved");
        Ok(SaveOutcome {
            message: MSG_SAVED.to_string(),
            records,
        })
    }

    /// Report for `month` (`YYYY-MM`), defaulting to the month of `now`.
    pub async fn monthly(
        &self,
        user: &str,
        month: Option<&str>,
        now: DateTime<FixedOffset>,
    ) -> Result<MonthlyReport, GatewayError> {
        let month = match month.map(str::trim).filter(|m| !m.is_empty()) {
            Some(month) => validate_month(month)?,
            None => now.format("%Y-%m").to_string(),
        };

        let records = self
            .gateway
            .list(user)
            .await
            .map_err(|e| e.during(MSG_FETCH_FAILED))?;

        Ok(monthly_report(&records, &month))
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<UserCreated, GatewayError> {
        if request.is_blank() {
            return Err(GatewayError::Validation(MSG_USER_FIELDS_REQUIRED.into()));
        }
        let name = request.name.trim();
        if RESERVED_USER_NAMES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(name))
        {
            return Err(GatewayError::Validation(MSG_USER_NAME_RESERVED.into()));
        }

        let created = self
            .backend
            .post_json(&["users"], request)
            .await
            .map_err(GatewayError::from)
            .and_then(BackendResponse::into_result)
            .map_err(|e| e.during(MSG_USER_CREATE_FAILED))?;

        info!(name = %request.name, "User created");
        Ok(UserCreated {
            message: MSG_USER_CREATED.to_string(),
            user: created,
        })
    }
}

/// `YYYY-MM-DD` date with `HH:MM` clock times.
fn is_well_formed(draft: &AttendanceRecord) -> bool {
    let time_ok = |time: Option<&str>| {
        time.is_some_and(|time| NaiveTime::parse_from_str(time, "%H:%M").is_ok())
    };

    draft.date.len() == 10
        && NaiveDate::parse_from_str(&draft.date, "%Y-%m-%d").is_ok()
        && time_ok(draft.clock_in.as_deref())
        && time_ok(draft.clock_out.as_deref())
}

fn validate_month(month: &str) -> Result<String, GatewayError> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .ok()
        .filter(|_| month.len() == 7)
        .map(|_| month.to_string())
        .ok_or_else(|| GatewayError::Validation(format!("month must look like 2024-05, got `{month}`")))
}

/// `2024年5月1日水曜日`
fn long_date_label(day: NaiveDate) -> String {
    let weekday = match day.weekday() {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    };
    format!("{}年{}月{}日{}曜日", day.year(), day.month(), day.day(), weekday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{LocalGateway, MemoryStorage};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        jst().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn backend() -> BackendClient {
        BackendClient::new("http://127.0.0.1:9").unwrap()
    }

    fn local_service() -> AttendanceService {
        AttendanceService::new(
            Arc::new(LocalGateway::new(Arc::new(MemoryStorage::new()))),
            backend(),
            jst(),
        )
    }

    /// Counts calls so tests can assert the gateway was never reached.
    #[derive(Default)]
    struct CountingGateway {
        saves: AtomicUsize,
    }

    #[async_trait]
    impl ShiftGateway for CountingGateway {
        async fn list(&self, _user: &str) -> Result<Vec<AttendanceRecord>, GatewayError> {
            Ok(Vec::new())
        }

        async fn save(
            &self,
            _user: &str,
            record: &AttendanceRecord,
        ) -> Result<Vec<AttendanceRecord>, GatewayError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(vec![record.clone()])
        }
    }

    #[actix_web::test]
    async fn save_without_both_times_never_reaches_the_gateway() {
        let gateway = Arc::new(CountingGateway::default());
        let service = AttendanceService::new(gateway.clone(), backend(), jst());

        for draft in [
            AttendanceRecord::empty("2024-05-01"),
            AttendanceRecord {
                clock_in: Some("09:00".into()),
                ..AttendanceRecord::empty("2024-05-01")
            },
            AttendanceRecord {
                clock_out: Some("18:00".into()),
                ..AttendanceRecord::empty("2024-05-01")
            },
        ] {
            let err = service.save("taro", draft).await.unwrap_err();
            assert_eq!(err.to_string(), MSG_MISSING_TIMES);
        }

        assert_eq!(gateway.saves.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn malformed_draft_never_reaches_the_gateway() {
        let gateway = Arc::new(CountingGateway::default());
        let service = AttendanceService::new(gateway.clone(), backend(), jst());

        for (date, clock_in, clock_out) in [
            ("05/01/2024", "09:00", "18:00"),
            ("2024-5-1", "09:00", "18:00"),
            ("2024-02-30", "09:00", "18:00"),
            ("2024-05-01", "09:00", "99:99"),
            ("2024-05-01", "nine", "18:00"),
        ] {
            let draft = AttendanceRecord {
                clock_in: Some(clock_in.into()),
                clock_out: Some(clock_out.into()),
                ..AttendanceRecord::empty(date)
            };
            let err = service.save("taro", draft).await.unwrap_err();
            assert_eq!(err.to_string(), MSG_INVALID_RECORD, "{date} {clock_in} {clock_out}");
        }

        assert_eq!(gateway.saves.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn clock_in_then_out_then_save_shows_up_today() {
        let service = local_service();
        let morning = at(2024, 5, 1, 9, 0);

        let view = service.today("taro", morning).await.unwrap();
        assert_eq!(view.record, AttendanceRecord::empty("2024-05-01"));
        assert!(view.can_clock_in);
        assert!(!view.can_clock_out);

        let view = service.clock_in(view.record, morning).unwrap();
        assert_eq!(view.record.clock_in.as_deref(), Some("09:00"));
        assert!(view.can_clock_out);

        let evening = at(2024, 5, 1, 17, 30);
        let view = service.clock_out(view.record, evening).unwrap();
        assert_eq!(view.working_hours.as_deref(), Some("08時間30分"));

        let outcome = service.save("taro", view.record).await.unwrap();
        assert_eq!(outcome.message, MSG_SAVED);

        let reloaded = service.today("taro", evening).await.unwrap();
        assert_eq!(reloaded.record.clock_out.as_deref(), Some("17:30"));
        assert!(!reloaded.can_clock_in);
        assert!(!reloaded.can_clock_out);
    }

    #[test]
    fn clock_actions_respect_record_state() {
        let service = local_service();
        let now = at(2024, 5, 1, 9, 0);

        let err = service
            .clock_out(AttendanceRecord::empty("2024-05-01"), now)
            .unwrap_err();
        assert!(matches!(err, GatewayError::Conflict(_)));

        let clocked_in = AttendanceRecord {
            clock_in: Some("08:00".into()),
            ..AttendanceRecord::empty("2024-05-01")
        };
        assert!(matches!(
            service.clock_in(clocked_in, now),
            Err(GatewayError::Conflict(_))
        ));
    }

    #[test]
    fn clock_in_dates_an_undated_draft() {
        let view = local_service()
            .clock_in(AttendanceRecord::default(), at(2024, 5, 3, 8, 5))
            .unwrap();

        assert_eq!(view.record.date, "2024-05-03");
        assert_eq!(view.record.clock_in.as_deref(), Some("08:05"));
    }

    #[actix_web::test]
    async fn monthly_defaults_to_current_month() {
        let service = local_service();
        for (date, out) in [("2024-04-30", "18:00"), ("2024-05-01", "18:00"), ("2024-05-02", "17:30")] {
            let record = AttendanceRecord {
                clock_in: Some("09:00".into()),
                clock_out: Some(out.into()),
                ..AttendanceRecord::empty(date)
            };
            service.save("taro", record).await.unwrap();
        }

        let report = service
            .monthly("taro", None, at(2024, 5, 20, 12, 0))
            .await
            .unwrap();

        assert_eq!(report.month, "2024-05");
        assert_eq!(report.summary.day_count, 2);
        assert_eq!(report.summary.average_label, "08時間45分");
        assert_eq!(report.available_months, vec!["2024-05", "2024-04"]);
    }

    #[actix_web::test]
    async fn monthly_rejects_malformed_months() {
        let service = local_service();
        let now = at(2024, 5, 20, 12, 0);

        for month in ["2024-13", "May", "2024-5", "2024-05-01"] {
            assert!(matches!(
                service.monthly("taro", Some(month), now).await,
                Err(GatewayError::Validation(_))
            ));
        }
    }

    #[actix_web::test]
    async fn create_user_requires_name_and_email() {
        let request = CreateUserRequest {
            name: "  ".into(),
            email: "taro@example.com".into(),
        };

        let err = local_service().create_user(&request).await.unwrap_err();
        assert_eq!(err.to_string(), MSG_USER_FIELDS_REQUIRED);
    }

    #[actix_web::test]
    async fn create_user_refuses_route_names() {
        for name in ["api", "Swagger-UI", " user "] {
            let request = CreateUserRequest {
                name: name.into(),
                email: "taro@example.com".into(),
            };

            let err = local_service().create_user(&request).await.unwrap_err();
            assert_eq!(err.to_string(), MSG_USER_NAME_RESERVED);
        }
    }

    #[test]
    fn long_date_label_is_japanese() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(long_date_label(day), "2024年5月1日水曜日");
    }
}
