use thiserror::Error;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::store::{LeadStore, StoreError};

#[derive(Debug, Error)]
pub enum LeadError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Lead capture: two near-identical single-record insert flows backing the
/// feedback and request forms.
pub struct LeadService {
    store: LeadStore,
}

impl LeadService {
    pub async fn new() -> Result<Self, LeadError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            store: LeadStore::new(pool),
        })
    }

    pub async fn save_feedback(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), LeadError> {
        self.store.insert_feedback(name, email, message).await?;
        tracing::info!("Feedback saved from {}", email);
        Ok(())
    }

    pub async fn save_request(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), LeadError> {
        self.store.insert_request(name, email, message).await?;
        tracing::info!("Request saved from {}", email);
        Ok(())
    }
}
