//! Reviewer slot value object.
//!
//! A pull request carries at most two reviewers. Slots are filled left to
//! right: the second slot is only ever occupied while the first one is too.
//! Reviewers are distinct and never the pull request author.

use super::{ReviewDomainError, UserId};

/// Position of a reviewer on a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewerSlot {
    /// Slot 1.
    First,
    /// Slot 2.
    Second,
}

/// The two reviewer positions of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewerSlots {
    first: Option<UserId>,
    second: Option<UserId>,
}

impl ReviewerSlots {
    /// Returns slots with no reviewers assigned.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            first: None,
            second: None,
        }
    }

    /// Creates validated reviewer slots for a pull request by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::SlotOrderViolated`] when only the second
    /// slot is set, [`ReviewDomainError::DuplicateReviewer`] when both slots
    /// hold the same user, or [`ReviewDomainError::ReviewerIsAuthor`] when a
    /// slot holds the author.
    pub fn new(
        first: Option<UserId>,
        second: Option<UserId>,
        author: UserId,
    ) -> Result<Self, ReviewDomainError> {
        if first.is_none() && second.is_some() {
            return Err(ReviewDomainError::SlotOrderViolated);
        }
        if let (Some(a), Some(b)) = (first, second) {
            if a == b {
                return Err(ReviewDomainError::DuplicateReviewer(a));
            }
        }
        if let Some(reviewer) = [first, second].into_iter().flatten().find(|id| *id == author) {
            return Err(ReviewDomainError::ReviewerIsAuthor(reviewer));
        }
        Ok(Self { first, second })
    }

    /// Builds slots from an ordered selection; the first two entries are used.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ReviewerSlots::new`].
    pub fn from_selection(selection: &[UserId], author: UserId) -> Result<Self, ReviewDomainError> {
        let mut picked = selection.iter().copied();
        Self::new(picked.next(), picked.next(), author)
    }

    /// Returns the reviewer in slot 1.
    #[must_use]
    pub const fn first(&self) -> Option<UserId> {
        self.first
    }

    /// Returns the reviewer in slot 2.
    #[must_use]
    pub const fn second(&self) -> Option<UserId> {
        self.second
    }

    /// Returns the slot occupied by `reviewer`, if any.
    #[must_use]
    pub fn slot_of(&self, reviewer: UserId) -> Option<ReviewerSlot> {
        if self.first == Some(reviewer) {
            Some(ReviewerSlot::First)
        } else if self.second == Some(reviewer) {
            Some(ReviewerSlot::Second)
        } else {
            None
        }
    }

    /// Returns whether `user` occupies either slot.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.slot_of(user).is_some()
    }

    /// Iterates over occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = UserId> + '_ {
        self.first.iter().chain(self.second.iter()).copied()
    }

    /// Returns the number of assigned reviewers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns whether no reviewer is assigned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    /// Puts `replacement` into `slot`, leaving the other slot untouched.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ReviewerSlots::new`] when the result would
    /// violate a slot invariant.
    pub fn replace(
        &self,
        slot: ReviewerSlot,
        replacement: UserId,
        author: UserId,
    ) -> Result<Self, ReviewDomainError> {
        match slot {
            ReviewerSlot::First => Self::new(Some(replacement), self.second, author),
            ReviewerSlot::Second => Self::new(self.first, Some(replacement), author),
        }
    }

    /// Empties `slot`, moving a remaining second reviewer into slot 1.
    #[must_use]
    pub const fn vacate(&self, slot: ReviewerSlot) -> Self {
        match slot {
            ReviewerSlot::First => Self {
                first: self.second,
                second: None,
            },
            ReviewerSlot::Second => Self {
                first: self.first,
                second: None,
            },
        }
    }
}
