//! Shared handler state.

use std::sync::Arc;

use bookshelf_app::context::AppContext;

/// Injected into every request's depot.
#[derive(Debug, Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    pub(crate) fn shared(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }
}
