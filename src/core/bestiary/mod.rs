//! Monster Data Gateway
//!
//! Fetches the monster list and per-monster stat blocks and feeds them into
//! the combat store's lookup list and detail cache.
//!
//! Fetches run on background tasks while the combat state stays on the
//! event loop, so each lookup is split into a fetch half and a state half.
//!
//! The cache is filled lazily and never evicted or refreshed. Two
//! overlapping fetches for the same monster both write the entry; the last
//! one wins and the records are expected to be identical.

pub mod client;
pub mod error;
pub mod models;

pub use client::{Dnd5eApiClient, MonsterGateway, DEFAULT_BASE_URL};
pub use error::{BestiaryError, Result};
pub use models::{
    ArmorClass, Damage, DamageType, MonsterAction, MonsterDetail, MonsterList, MonsterSummary,
    SpecialAbility,
};

use tracing::{debug, error, info};

use crate::core::combat::CombatState;

/// Fetch the monster list.
///
/// Runs off the event loop; the result is handed to [`store_monster_list`]
/// by whoever owns the combat state.
pub async fn fetch_monster_list(gateway: &dyn MonsterGateway) -> Result<Vec<MonsterSummary>> {
    match gateway.fetch_monster_list().await {
        Ok(list) => {
            info!(count = list.len(), "monster list fetched");
            Ok(list)
        }
        Err(e) => {
            error!(error = %e, "failed to load monster list");
            Err(e)
        }
    }
}

/// Replace the stored monster list. Returns the number of entries.
pub fn store_monster_list(state: &mut CombatState, list: Vec<MonsterSummary>) -> usize {
    let count = list.len();
    state.set_monster_list(list);
    count
}

/// Cached stat block for `index`, or `None` when it still has to be fetched.
pub fn cached_monster_detail(state: &CombatState, index: &str) -> Option<MonsterDetail> {
    match state.monster_detail(index) {
        Some(cached) => {
            debug!(index, "monster detail cache hit");
            Some(cached.clone())
        }
        None => {
            debug!(index, "monster detail cache miss");
            None
        }
    }
}

/// Fetch one stat block after a cache miss.
///
/// Nothing is cached here; a failed fetch leaves the cache untouched so a
/// later attempt retries.
pub async fn fetch_monster_detail(
    gateway: &dyn MonsterGateway,
    index: &str,
) -> Result<MonsterDetail> {
    gateway.fetch_monster_detail(index).await.map_err(|e| {
        error!(index, error = %e, "failed to fetch monster detail");
        e
    })
}

/// Map a typed monster name to its API index using the loaded list.
pub fn resolve_monster_name(state: &CombatState, name: &str) -> Result<String> {
    state
        .find_monster(name)
        .map(|m| m.index.clone())
        .ok_or_else(|| BestiaryError::UnknownMonsterName(name.trim().to_string()))
}
