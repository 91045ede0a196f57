//! Wiring of the review services around one shared cache.

use super::{
    ActiveMemberCache, PullRequestLifecycleService, TeamDeactivationService,
    TeamMembershipService,
};
use crate::review::ports::ReviewRepository;
use mockable::Clock;
use std::sync::Arc;

/// The review services sharing one repository and one active-member cache.
pub struct ReviewEngine<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    /// Team and user administration.
    pub membership: TeamMembershipService<R>,
    /// Pull request lifecycle.
    pub lifecycle: PullRequestLifecycleService<R, C>,
    /// Team deactivation cascade.
    pub deactivation: TeamDeactivationService<R, C>,
}

impl<R, C> ReviewEngine<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    /// Builds all services over `repository` with a fresh cache.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        let cache = Arc::new(ActiveMemberCache::new());
        Self {
            membership: TeamMembershipService::new(Arc::clone(&repository), Arc::clone(&cache)),
            lifecycle: PullRequestLifecycleService::new(
                Arc::clone(&repository),
                Arc::clone(&cache),
                Arc::clone(&clock),
            ),
            deactivation: TeamDeactivationService::new(repository, cache, clock),
        }
    }
}
