use crate::config::Config;
use crate::store::{BulkIngest, CompletionTracker, QuestionStore, UserStore};
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub questions: QuestionStore,
    pub bulk: BulkIngest,
    pub completions: CompletionTracker,
    pub users: UserStore,
    pub config: Config,
}

impl AppState {
    /// Builds every store on top of the same pool.
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            questions: QuestionStore::new(pool.clone()),
            bulk: BulkIngest::new(pool.clone()),
            completions: CompletionTracker::new(pool.clone()),
            users: UserStore::new(pool),
            config,
        }
    }
}

impl FromRef<AppState> for QuestionStore {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for BulkIngest {
    fn from_ref(state: &AppState) -> Self {
        state.bulk.clone()
    }
}

impl FromRef<AppState> for CompletionTracker {
    fn from_ref(state: &AppState) -> Self {
        state.completions.clone()
    }
}

impl FromRef<AppState> for UserStore {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
