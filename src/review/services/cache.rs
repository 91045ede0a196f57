//! Per-team cache of active members.
//!
//! Entries live until explicitly invalidated; there is no time-based expiry.
//! Every operation that changes a team's membership or activity must call
//! [`ActiveMemberCache::invalidate`] for that team.

use crate::review::{
    domain::{TeamId, User, UserId},
    ports::{ReviewRepository, ReviewRepositoryResult},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
struct CacheSlot {
    generation: u64,
    members: Option<Arc<[User]>>,
}

/// Process-wide cache of each team's active members.
///
/// The full active roster is cached per team and the excluded user is
/// filtered out on every read, so callers with different exclusions can share
/// one entry. A load that races with an invalidation is discarded rather than
/// stored.
#[derive(Debug, Default)]
pub struct ActiveMemberCache {
    slots: Mutex<HashMap<TeamId, CacheSlot>>,
}

impl ActiveMemberCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active members of `team_id` other than `exclude`.
    ///
    /// On a miss the roster is loaded from `repository` and stored.
    ///
    /// # Errors
    ///
    /// Propagates repository failures from the load on a miss.
    pub async fn get<R>(
        &self,
        repository: &R,
        team_id: TeamId,
        exclude: UserId,
    ) -> ReviewRepositoryResult<Vec<User>>
    where
        R: ReviewRepository + ?Sized,
    {
        let members = match self.lookup(team_id) {
            Ok(members) => {
                debug!(team = %team_id, "active member cache hit");
                members
            }
            Err(generation) => {
                debug!(team = %team_id, "active member cache miss");
                let loaded: Arc<[User]> = repository.active_team_members(team_id).await?.into();
                self.populate(team_id, generation, Arc::clone(&loaded));
                loaded
            }
        };

        Ok(members
            .iter()
            .filter(|user| user.id() != exclude)
            .cloned()
            .collect())
    }

    /// Evicts the entry for `team_id`.
    pub fn invalidate(&self, team_id: TeamId) {
        let mut slots = self.lock();
        let slot = slots.entry(team_id).or_default();
        slot.generation = slot.generation.wrapping_add(1);
        slot.members = None;
        debug!(team = %team_id, "active member cache invalidated");
    }

    /// Returns the cached roster, or the generation to populate on a miss.
    fn lookup(&self, team_id: TeamId) -> Result<Arc<[User]>, u64> {
        let slots = self.lock();
        match slots.get(&team_id) {
            Some(CacheSlot {
                members: Some(members),
                ..
            }) => Ok(Arc::clone(members)),
            Some(slot) => Err(slot.generation),
            None => Err(0),
        }
    }

    fn populate(&self, team_id: TeamId, generation: u64, members: Arc<[User]>) {
        let mut slots = self.lock();
        let slot = slots.entry(team_id).or_default();
        if slot.generation == generation {
            slot.members = Some(members);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TeamId, CacheSlot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
