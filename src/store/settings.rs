//! Settings store
//!
//! Session settings are loaded at startup and saved through a store
//! interface so that a persistent backend can be plugged in later.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::FeedResult;
use crate::models::Settings;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> FeedResult<Settings>;
    async fn save(&self, settings: &Settings) -> FeedResult<()>;
}

/// Settings kept in process memory
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RwLock<Settings>,
}

impl MemorySettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            settings: RwLock::new(initial),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> FeedResult<Settings> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: &Settings) -> FeedResult<()> {
        *self.settings.write().await = settings.clone();
        tracing::debug!("Saved settings (phase {})", settings.growth_phase.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GrowthPhase, InclusionMode};

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySettingsStore::new(Settings::with_growth_phase(GrowthPhase::Grower));
        let mut settings = store.load().await.unwrap();
        assert_eq!(settings.growth_phase, GrowthPhase::Grower);

        settings.inclusion_mode = InclusionMode::KgPerTon;
        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap().inclusion_mode, InclusionMode::KgPerTon);
    }
}
