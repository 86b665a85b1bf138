use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mirror record created alongside each user; `emp_id` equals `users.id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "empId": 1,
        "empName": "Jane Doe",
        "email": "jane@acme.com"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub emp_id: i32,

    #[schema(example = "Jane Doe")]
    pub emp_name: String,

    #[schema(example = "jane@acme.com")]
    pub email: String,
}
