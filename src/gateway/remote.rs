use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::BackendClient;
use crate::error::GatewayError;
use crate::gateway::ShiftGateway;
use crate::model::attendance::{AttendanceRecord, ShiftInput};
use crate::model::shift::CreateShiftRequest;
use crate::timesheet::aggregate::latest_per_date;
use crate::timesheet::normalize::normalize_all;

/// Reads and writes shifts through the HTTP backend.
pub struct RemoteGateway {
    backend: BackendClient,
    offset: FixedOffset,
}

impl RemoteGateway {
    pub fn new(backend: BackendClient, offset: FixedOffset) -> Self {
        Self { backend, offset }
    }

    fn timestamp(&self, date: &str, time: Option<&str>) -> Result<String, GatewayError> {
        let invalid = || GatewayError::Validation(format!("invalid date or time: {date} {time:?}"));

        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;
        let time = time
            .and_then(|time| NaiveTime::parse_from_str(time, "%H:%M").ok())
            .ok_or_else(invalid)?;

        self.offset
            .from_local_datetime(&day.and_time(time))
            .single()
            .map(|at| at.to_rfc3339())
            .ok_or_else(invalid)
    }

    /// Body for `POST /shifts/{user}`.
    pub fn create_request(
        &self,
        user: &str,
        record: &AttendanceRecord,
    ) -> Result<CreateShiftRequest, GatewayError> {
        Ok(CreateShiftRequest {
            user_name: user.to_string(),
            start_time: self.timestamp(&record.date, record.clock_in.as_deref())?,
            end_time: self.timestamp(&record.date, record.clock_out.as_deref())?,
            work_content: record.work_content.clone(),
            issues: record.concerns.clone(),
        })
    }
}

/// Backends answer either a bare array or `{data: [...]}`.
fn shift_list(body: Value) -> Result<Vec<ShiftInput>, GatewayError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Null => Vec::new(),
        other => {
            warn!(body = %other, "Unexpected shift list body");
            Vec::new()
        }
    };

    Ok(serde_json::from_value(Value::Array(items))?)
}

#[async_trait]
impl ShiftGateway for RemoteGateway {
    async fn list(&self, user: &str) -> Result<Vec<AttendanceRecord>, GatewayError> {
        let query = [("userName".to_string(), user.to_string())];
        let body = self
            .backend
            .get_json(&["shifts"], &query)
            .await?
            .into_result()?;

        // The backend appends on every save; a re-saved day wins
        let records = latest_per_date(normalize_all(shift_list(body)?, &self.offset));
        debug!(user, count = records.len(), "Fetched shifts from backend");
        Ok(records)
    }

    async fn save(
        &self,
        user: &str,
        record: &AttendanceRecord,
    ) -> Result<Vec<AttendanceRecord>, GatewayError> {
        let request = self.create_request(user, record)?;
        self.backend
            .post_json(&["shifts", user], &request)
            .await?
            .into_result()?;

        self.list(user).await
    }
}
