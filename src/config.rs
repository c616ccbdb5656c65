use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub sheet_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            sheet_path: env::var("SHEET_PATH").unwrap_or_else(|_| "bookings.db".to_string()),
        }
    }
}
