use axum::{Router, middleware};

use crate::incoming::http_axum::middleware::{
    admin_auth::require_admin_role, request_id::request_id_middleware,
};

pub trait RouterExt<State> {
    fn with_request_id(self) -> Self;
    fn with_admin_gate(self, enabled: bool) -> Self;
}

impl<State> RouterExt<State> for Router<State>
where
    State: Clone + Send + Sync + 'static,
{
    fn with_request_id(self) -> Self {
        self.layer(middleware::from_fn(request_id_middleware))
    }

    fn with_admin_gate(self, enabled: bool) -> Self {
        if enabled {
            self.layer(middleware::from_fn(require_admin_role))
        } else {
            self
        }
    }
}
