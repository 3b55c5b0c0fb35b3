use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Shift object as stored by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RawShift {
    #[schema(example = "2024-05-01T09:00:00+09:00", nullable = true)]
    pub start_time: Option<String>,
    #[schema(example = "2024-05-01T18:00:00+09:00", nullable = true)]
    pub end_time: Option<String>,
    pub work_content: Option<String>,
    pub issues: Option<String>,
    pub user_name: Option<String>,
    #[serde(rename = "UserID")]
    #[schema(value_type = Object, nullable = true)]
    pub user_id: Option<Value>,
}

/// Body sent to `POST {backend}/shifts/{userName}` on save.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateShiftRequest {
    #[schema(example = "taro")]
    pub user_name: String,
    #[schema(example = "2024-05-01T09:00:00+09:00")]
    pub start_time: String,
    #[schema(example = "2024-05-01T18:00:00+09:00")]
    pub end_time: String,
    pub work_content: String,
    pub issues: String,
}
