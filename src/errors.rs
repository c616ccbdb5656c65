#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Booking not found")]
    NotFound,

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl AppError {
    pub fn missing_fields() -> Self {
        AppError::Validation("Missing required fields".to_string())
    }
}
