//! Validated text values: team names, user names and pull request titles.

use super::ReviewDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for names and titles, matching the `VARCHAR(255)` columns.
const MAX_TEXT_LENGTH: usize = 255;

fn normalize(
    raw: &str,
    empty: ReviewDomainError,
    too_long: impl FnOnce() -> ReviewDomainError,
) -> Result<String, ReviewDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > MAX_TEXT_LENGTH {
        return Err(too_long());
    }
    Ok(trimmed.to_owned())
}

/// Unique, human-readable team name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Creates a validated team name.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyTeamName`] when the value is empty
    /// after trimming, or [`ReviewDomainError::TextTooLong`] when it exceeds
    /// 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ReviewDomainError> {
        let raw = value.into();
        normalize(&raw, ReviewDomainError::EmptyTeamName, || {
            ReviewDomainError::TextTooLong("team name")
        })
        .map(Self)
    }

    /// Returns the team name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique user login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Creates a validated user name.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyUserName`] when the value is empty
    /// after trimming, or [`ReviewDomainError::TextTooLong`] when it exceeds
    /// 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ReviewDomainError> {
        let raw = value.into();
        normalize(&raw, ReviewDomainError::EmptyUserName, || {
            ReviewDomainError::TextTooLong("user name")
        })
        .map(Self)
    }

    /// Returns the user name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull request title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PullRequestTitle(String);

impl PullRequestTitle {
    /// Creates a validated pull request title.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyTitle`] when the value is empty after
    /// trimming, or [`ReviewDomainError::TextTooLong`] when it exceeds 255
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ReviewDomainError> {
        let raw = value.into();
        normalize(&raw, ReviewDomainError::EmptyTitle, || {
            ReviewDomainError::TextTooLong("pull request title")
        })
        .map(Self)
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PullRequestTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
