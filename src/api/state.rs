//! Shared handler state

use std::sync::Arc;

use crate::features::licenses::LicenseCatalog;
use crate::features::reminders::ReminderService;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<LicenseCatalog>,
    pub reminders: Arc<ReminderService>,
}

impl AppState {
    pub fn new(catalog: Arc<LicenseCatalog>, reminders: Arc<ReminderService>) -> Self {
        Self { catalog, reminders }
    }
}
