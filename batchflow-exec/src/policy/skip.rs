use super::classify::ErrorClassifier;

/// Decides whether an item whose processing failed may be dropped.
pub trait SkipPolicy: Send + Sync {
    /// `skip_count` is the number of items already skipped in this step.
    fn should_skip(&self, error: &anyhow::Error, skip_count: u64) -> bool;
}

/// Skips at most `skip_limit` items, optionally restricted to a set of
/// error kinds.
#[derive(Debug)]
pub struct SimpleSkipPolicy {
    skip_limit: u64,
    skippable: ErrorClassifier,
}

impl SimpleSkipPolicy {
    pub fn new(skip_limit: u64) -> Self {
        Self {
            skip_limit,
            skippable: ErrorClassifier::new(),
        }
    }

    pub fn skip_on<E>(mut self) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.skippable.add::<E>();
        self
    }

    pub fn skip_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&anyhow::Error) -> bool + Send + Sync + 'static,
    {
        self.skippable.add_predicate(predicate);
        self
    }

    pub fn skip_limit(&self) -> u64 {
        self.skip_limit
    }
}

impl SkipPolicy for SimpleSkipPolicy {
    fn should_skip(&self, error: &anyhow::Error, skip_count: u64) -> bool {
        if skip_count >= self.skip_limit {
            return false;
        }
        self.skippable.matches(error)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSkipPolicy;

impl SkipPolicy for AlwaysSkipPolicy {
    fn should_skip(&self, _error: &anyhow::Error, _skip_count: u64) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSkipPolicy;

impl SkipPolicy for NeverSkipPolicy {
    fn should_skip(&self, _error: &anyhow::Error, _skip_count: u64) -> bool {
        false
    }
}
