use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::shift::RawShift;

/// One user's clock-in/out plus notes for a single calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "date": "2024-05-01",
    "clockIn": "09:00",
    "clockOut": "18:00",
    "workContent": "Sprint planning",
    "concerns": ""
}))]
pub struct AttendanceRecord {
    #[schema(example = "2024-05-01")]
    pub date: String,
    #[schema(example = "09:00", nullable = true)]
    pub clock_in: Option<String>,
    #[schema(example = "18:00", nullable = true)]
    pub clock_out: Option<String>,
    #[serde(default)]
    pub work_content: String,
    #[serde(default)]
    pub concerns: String,
}

impl AttendanceRecord {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    /// Both clock times are recorded.
    pub fn is_complete(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_some()
    }

    /// `YYYY-MM` prefix of the date.
    pub fn month_key(&self) -> Option<&str> {
        self.date.get(..7)
    }
}

/// Anything a gateway may hand back: backend shifts or records that were
/// already normalized (local storage).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShiftInput {
    Normalized(AttendanceRecord),
    Raw(RawShift),
}
