use serde::{Deserialize, Serialize};

/// Body of `POST /classify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub transaction_descriptions: Vec<String>,
    pub categories: Vec<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootStatus {
    pub status: String,
    pub message: String,
}

impl RootStatus {
    pub fn alive() -> Self {
        Self {
            status: "Alive".to_string(),
            message: "Budget Backend is running!".to_string(),
        }
    }
}
