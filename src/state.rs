use crate::config::AppConfig;
use crate::questions::{PgQuestionCatalog, QuestionCatalog};
use crate::users::{PgUserStore, UserStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub catalog: Arc<dyn QuestionCatalog>,
}

impl AppState {
    pub fn from_pool(config: Arc<AppConfig>, db: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgQuestionCatalog::new(db)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        catalog: Arc<dyn QuestionCatalog>,
    ) -> Self {
        Self {
            config,
            users,
            catalog,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        fakes::state(
            Arc::new(fakes::MemoryUsers::default()),
            Arc::new(fakes::catalog(5)),
        )
    }
}
