use crate::config::AppConfig;
use crate::observability::AppMetrics;
use crate::services::{
    AuthService, LogService, StudentService, create_auth_service, create_log_service,
    create_student_service,
};
use crate::storage::Stores;
use std::sync::Arc;

/// Application state containing all shared services
///
/// Holds no record state of its own: every request goes through the services,
/// which reload the collections from the stores.
#[derive(Clone)]
pub struct AppState {
    /// Student and log stores
    pub stores: Stores,
    /// Admin and student authentication
    pub auth_service: Arc<dyn AuthService>,
    /// Student roster operations
    pub student_service: Arc<dyn StudentService>,
    /// Access log operations
    pub log_service: Arc<dyn LogService>,
    /// Request and domain counters
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("stores", &self.stores)
            .field("auth_service", &"Arc<dyn AuthService>")
            .field("student_service", &"Arc<dyn StudentService>")
            .field("log_service", &"Arc<dyn LogService>")
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        stores: Stores,
        auth_service: Box<dyn AuthService>,
        student_service: Box<dyn StudentService>,
        log_service: Box<dyn LogService>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            stores,
            auth_service: Arc::from(auth_service),
            student_service: Arc::from(student_service),
            log_service: Arc::from(log_service),
            metrics,
        }
    }

    /// Wire the default services over the given stores
    pub fn from_config(config: &AppConfig, stores: Stores, metrics: Arc<AppMetrics>) -> Self {
        let auth_service = create_auth_service(config.admin.clone(), stores.students.clone());
        let student_service =
            create_student_service(stores.students.clone(), config.storage.unique_register_no);
        let log_service = create_log_service(stores.logs.clone(), stores.students.clone());

        Self::new(stores, auth_service, student_service, log_service, metrics)
    }
}
