//! Batch-scoped deduplication by IP address text.

use std::collections::HashSet;

/// Remembers every IP key admitted during one import run.
///
/// Keys are compared as raw text: `"::1"` and `"0:0:0:0:0:0:0:1"` are two
/// different keys.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and records `ip` the first time it is offered,
    /// `false` on every later offer.
    pub fn admit(&mut self, ip: &str) -> bool {
        if self.seen.contains(ip) {
            return false;
        }
        self.seen.insert(ip.to_string())
    }

    /// Number of distinct keys admitted so far.
    pub fn distinct_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sight_admitted() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.admit("192.184.51.218"));
        assert_eq!(dedup.distinct_count(), 1);
    }

    #[test]
    fn test_repeat_sightings_rejected() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.admit("192.184.51.218"));
        assert!(!dedup.admit("192.184.51.218"));
        assert!(!dedup.admit("192.184.51.218"));
        assert_eq!(dedup.distinct_count(), 1);
    }

    #[test]
    fn test_distinct_keys_admitted() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.admit("160.168.85.54"));
        assert!(dedup.admit("214.165.161.44"));
        assert_eq!(dedup.distinct_count(), 2);
    }

    #[test]
    fn test_textual_variants_are_distinct_keys() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.admit("::1"));
        assert!(dedup.admit("0:0:0:0:0:0:0:1"));
    }

    #[test]
    fn test_new_has_no_keys() {
        assert_eq!(Deduplicator::new().distinct_count(), 0);
    }
}
