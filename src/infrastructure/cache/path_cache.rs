use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::domain::repositories::cache_invalidator::CacheInvalidator;

/// In-process path-version map. Every successful mutation bumps the counter
/// for its read path; readers compare versions instead of expiring payloads.
#[derive(Debug, Default)]
pub struct PathVersionCache {
    versions: RwLock<HashMap<String, u64>>,
}

impl PathVersionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheInvalidator for PathVersionCache {
    fn invalidate(&self, path: &str) {
        let mut versions = match self.versions.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let version = versions.entry(path.to_string()).or_insert(0);
        *version += 1;
        debug!(path, version = *version, "cache: invalidated path");
    }

    fn version(&self, path: &str) -> u64 {
        let versions = match self.versions.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        versions.get(path).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_path_starts_at_version_zero() {
        let cache = PathVersionCache::new();
        assert_eq!(cache.version("/plans"), 0);
    }

    #[test]
    fn invalidation_bumps_only_the_given_path() {
        let cache = PathVersionCache::new();
        cache.invalidate("/plans");
        cache.invalidate("/plans");
        cache.invalidate("/diaries");

        assert_eq!(cache.version("/plans"), 2);
        assert_eq!(cache.version("/diaries"), 1);
        assert_eq!(cache.version("/routines"), 0);
    }
}
