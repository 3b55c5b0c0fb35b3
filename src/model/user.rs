use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Form body of the create-user page.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateUserRequest {
    #[schema(example = "taro")]
    #[serde(default)]
    pub name: String,
    #[schema(example = "taro@example.com", format = "email")]
    #[serde(default)]
    pub email: String,
}

impl CreateUserRequest {
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() || self.email.trim().is_empty()
    }
}
