use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `error` member of failed responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
