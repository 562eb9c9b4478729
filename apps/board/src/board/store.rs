use async_trait::async_trait;

use crate::errors::BoardError;
use crate::models::application::{Application, Stage};

/// Persists a card's new stage. Implement this to swap the backend without
/// touching the board or session.
///
/// Carried in `BoardSession` as `Arc<dyn StageStore>`.
#[async_trait]
pub trait StageStore: Send + Sync {
    async fn update_stage(&self, application_id: i64, stage: Stage) -> Result<(), BoardError>;
}

/// Supplies fresh board snapshots.
#[async_trait]
pub trait BoardSource: Send + Sync {
    async fn fetch_board(&self) -> Result<Vec<Application>, BoardError>;
}
