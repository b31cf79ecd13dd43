/// Errors of the most recent cycle, capped at `max` entries (newest kept).
#[derive(Debug, Clone, Default)]
pub struct RecentErrors {
    max: usize,
    entries: Vec<String>,
}

impl RecentErrors {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            entries: Vec::new(),
        }
    }

    /// Replace (not append) with the errors of a new cycle.
    pub fn replace(&mut self, errors: &[String]) {
        let skip = errors.len().saturating_sub(self.max);
        self.entries = errors[skip..].to_vec();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.clone()
    }
}
