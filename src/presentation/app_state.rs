// Application state for HTTP handlers
use crate::application::charge_service::ChargeService;
use crate::application::import_service::ImportService;
use crate::application::insights_service::InsightsService;

#[derive(Clone)]
pub struct AppState {
    pub charge_service: ChargeService,
    pub insights_service: InsightsService,
    pub import_service: ImportService,
}
