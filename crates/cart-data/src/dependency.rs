//! Dependency tagging for per-collaborator defaults.

use std::time::Duration;

/// The external collaborators the cart reads from.
///
/// Each tag carries a default timeout and retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Product title, price and image lookups.
    Catalog,
    /// Stock level checks.
    Inventory,
}

impl DependencyTag {
    /// Per-attempt time budget.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Catalog => Duration::from_millis(2000),
            Self::Inventory => Duration::from_millis(1500),
        }
    }

    /// Retries after the first attempt.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            Self::Inventory => 2,
            Self::Catalog => 1,
        }
    }

    /// Label used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Inventory => "inventory",
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
