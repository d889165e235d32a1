use std::collections::HashSet;

/// Transaction ids that have already been processed.
///
/// Grows for the lifetime of the process and is never persisted, so a
/// restart begins from whatever the startup bootstrap seeds it with.
#[derive(Debug, Default, Clone)]
pub struct SeenTransactions {
    ids: HashSet<String>,
}

impl SeenTransactions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, txid: &str) -> bool {
        self.ids.contains(txid)
    }

    /// Returns false if the id was already present
    pub fn insert(&mut self, txid: &str) -> bool {
        if self.ids.contains(txid) {
            return false;
        }
        self.ids.insert(txid.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: AsRef<str>> Extend<S> for SeenTransactions {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for txid in iter {
            self.insert(txid.as_ref());
        }
    }
}
