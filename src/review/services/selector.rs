//! Random reviewer selection.

use crate::review::domain::User;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

/// Maximum number of reviewers assigned to a pull request.
pub const MAX_REVIEWERS: usize = 2;

/// Picks reviewers by shuffling the whole candidate pool with OS entropy.
///
/// The full Fisher-Yates shuffle keeps every candidate equally likely in
/// every position regardless of the order storage returned them in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewerSelector;

impl ReviewerSelector {
    /// Creates a selector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns `candidates` in a uniformly random order.
    #[must_use]
    pub fn shuffled(&self, mut candidates: Vec<User>) -> Vec<User> {
        candidates.shuffle(&mut OsRng);
        candidates
    }

    /// Returns up to [`MAX_REVIEWERS`] candidates, in assignment order.
    ///
    /// An empty pool yields an empty selection.
    #[must_use]
    pub fn select(&self, candidates: Vec<User>) -> Vec<User> {
        let mut picked = self.shuffled(candidates);
        picked.truncate(MAX_REVIEWERS);
        picked
    }
}
