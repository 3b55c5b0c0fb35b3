use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::AttendanceRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    #[schema(example = 2)]
    pub day_count: usize,
    #[schema(example = 1050)]
    pub total_minutes: u32,
    #[schema(example = 525, nullable = true)]
    pub average_minutes: Option<u32>,
    #[schema(example = "17時間30分")]
    pub total_label: String,
    #[schema(example = "08時間45分")]
    pub average_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    #[schema(example = "2024-05")]
    pub month: String,
    pub records: Vec<AttendanceRecord>,
    pub summary: MonthlySummary,
    /// Month selector entries, most recent first.
    #[schema(example = json!(["2024-05", "2024-04"]))]
    pub available_months: Vec<String>,
}
