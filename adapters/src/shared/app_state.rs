use std::sync::Arc;

use cake_api_application::{
    admin::service::DynAdminUseCase, ban::service::DynBanUseCase,
    infrastructure_config::Config,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ban_use_case: DynBanUseCase,
    pub admin_use_case: DynAdminUseCase,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        ban_use_case: DynBanUseCase,
        admin_use_case: DynAdminUseCase,
    ) -> Self {
        Self {
            config,
            ban_use_case,
            admin_use_case,
        }
    }
}
