use sqlx::SqlitePool;

use crate::services::Registrar;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub registrar: Registrar,
}

impl AppState {
    pub fn new(db: SqlitePool, email_domain: &str) -> Self {
        let registrar = Registrar::new(db.clone(), email_domain);
        Self { db, registrar }
    }
}
