use std::sync::Mutex;

use crate::config::AppConfig;
use crate::store::SheetStore;

pub struct AppState {
    pub sheet: Mutex<SheetStore>,
    pub config: AppConfig,
}
