pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod store;
pub mod services;
pub mod controllers;

use std::sync::Arc;

use services::reservations::ReservationEngine;

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
    pub engine: ReservationEngine,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let engine = ReservationEngine::new(db.pool.clone());
        Ok(Arc::new(Self { db, config, engine }))
    }
}
