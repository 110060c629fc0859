use std::fmt;

type Matcher = Box<dyn Fn(&anyhow::Error) -> bool + Send + Sync>;

/// Decides whether an error belongs to a configured set of error kinds.
///
/// An empty classifier matches every error.
#[derive(Default)]
pub struct ErrorClassifier {
    matchers: Vec<Matcher>,
}

impl ErrorClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match errors whose underlying value is (or is wrapped context around) `E`.
    pub fn add<E>(&mut self)
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.matchers
            .push(Box::new(|error| error.downcast_ref::<E>().is_some()));
    }

    pub fn add_predicate<P>(&mut self, predicate: P)
    where
        P: Fn(&anyhow::Error) -> bool + Send + Sync + 'static,
    {
        self.matchers.push(Box::new(predicate));
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn matches(&self, error: &anyhow::Error) -> bool {
        self.matchers.is_empty() || self.matchers.iter().any(|m| m(error))
    }
}

impl fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorClassifier")
            .field("matchers", &self.matchers.len())
            .finish()
    }
}
