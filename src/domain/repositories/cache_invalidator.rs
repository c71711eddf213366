use mockall::automock;

/// Path-keyed cache-bust collaborator, called after a successful mutation
/// commits. Failures are logged by callers, never surfaced.
#[automock]
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, path: &str);
    fn version(&self, path: &str) -> u64;
}
