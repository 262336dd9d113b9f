//! Term frequencies for a whole corpus
use std::io::{self, Write};
use std::slice;
use farm::{FarmMap, new_farm};

/// Counts of every term seen so far
///
/// Terms remember the order they were first seen in, which is what breaks ties in `top_k`.
/// Counting only goes up; nothing is ever removed.
#[derive(Debug,Clone)]
pub struct FrequencyTable {
    // Term to its position in `entries`
    slots: FarmMap<String, usize>,
    entries: Vec<(String, u64)>,
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        FrequencyTable::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            slots: new_farm(),
            entries: vec![],
            total: 0,
        }
    }

    /// Add one to a single term
    pub fn increment<S: AsRef<str> + Into<String>>(&mut self, term: S) {
        self.add(term, 1);
    }

    fn add<S: AsRef<str> + Into<String>>(&mut self, term: S, count: u64) {
        self.total += count;
        if let Some(&slot) = self.slots.get(term.as_ref()) {
            self.entries[slot].1 += count;
            return;
        }
        let term = term.into();
        self.slots.insert(term.clone(), self.entries.len());
        self.entries.push((term, count));
    }

    /// Count every term once per appearance. Returns how many were counted.
    pub fn update<I, S>(&mut self, terms: I) -> u64
        where I: IntoIterator<Item = S>, S: AsRef<str> + Into<String> {
        let mut counted = 0;
        for term in terms {
            self.increment(term);
            counted += 1;
        }
        counted
    }

    /// Add in another table's counts.
    ///
    /// Terms new to this table go after the ones it already has, in the other table's order.
    pub fn merge(&mut self, other: FrequencyTable) {
        for (term, count) in other.entries {
            self.add(term, count);
        }
    }

    pub fn get(&self, term: &str) -> u64 {
        self.slots.get(term).map(|&slot| self.entries[slot].1).unwrap_or(0)
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Terms and counts in first-seen order
    pub fn iter(&self) -> Iter {
        Iter { inner: self.entries.iter() }
    }

    /// The `k` most frequent terms, most frequent first
    ///
    /// Ties keep first-seen order, so the same input always gives the same answer. Fewer than
    /// `k` terms in the table just means a shorter result.
    pub fn top_k(&self, k: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self.iter().collect();
        // Stable, so ties stay in first-seen order
        ranked.sort_by(|left, right| right.1.cmp(&left.1));
        ranked.truncate(k);
        ranked
    }
}

pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, u64)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|&(ref term, count)| (term.as_str(), count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Print `term count`, one per line
pub fn write_report<W: Write>(out: &mut W, ranked: &[(&str, u64)]) -> io::Result<()> {
    for &(term, count) in ranked {
        writeln!(out, "{} {}", term, count)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(batches: &[&[&str]]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for batch in batches {
            table.update(batch.iter().cloned());
        }
        table
    }

    #[test]
    fn counts_across_batches() {
        let table = table_of(&[&["a", "b", "a"], &["a", "c"]]);
        assert_eq!(table.get("a"), 3);
        assert_eq!(table.get("b"), 1);
        assert_eq!(table.get("c"), 1);
        assert_eq!(table.get("d"), 0);
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 5);

        let top = table.top_k(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], ("a", 3));
        assert_eq!(top[1].1, 1);
        assert!(top[1].0 == "b" || top[1].0 == "c");
    }

    #[test]
    fn ties_are_deterministic() {
        let first = table_of(&[&["x", "y", "z", "y"], &["z", "x"]]);
        let second = table_of(&[&["x", "y", "z", "y"], &["z", "x"]]);
        assert_eq!(first.top_k(3), second.top_k(3));
    }

    #[test]
    fn short_tables_give_everything() {
        let table = table_of(&[&["東京", "大阪", "東京"]]);
        assert_eq!(table.top_k(30), vec![("東京", 2), ("大阪", 1)]);
        assert!(table.top_k(0).is_empty());
        assert!(FrequencyTable::new().top_k(30).is_empty());
    }

    #[test]
    fn update_reports_increments() {
        let mut table = FrequencyTable::new();
        assert_eq!(table.update(vec!["a".to_string(), "a".to_string()]), 2);
        assert_eq!(table.update(Vec::<String>::new()), 0);
        assert_eq!(table.total(), 2);
    }

    #[test]
    fn merge_adds_counts() {
        let mut left = table_of(&[&["a", "b", "a"]]);
        let right = table_of(&[&["c", "a"]]);
        left.merge(right);
        let merged: Vec<(&str, u64)> = left.iter().collect();
        assert_eq!(merged, vec![("a", 3), ("b", 1), ("c", 1)]);
        assert_eq!(left.total(), 5);
    }

    #[test]
    fn merge_order_does_not_change_counts() {
        let parts = vec![&["a", "b"][..], &["b", "c", "c"][..], &["d", "a"][..]];
        let mut forward = FrequencyTable::new();
        for part in &parts {
            forward.merge(table_of(&[*part]));
        }
        let mut backward = FrequencyTable::new();
        for part in parts.iter().rev() {
            backward.merge(table_of(&[*part]));
        }
        for term in &["a", "b", "c", "d"] {
            assert_eq!(forward.get(term), backward.get(term));
        }
        assert_eq!(forward.len(), backward.len());
    }

    #[test]
    fn report_format() {
        let table = table_of(&[&["東京", "大阪", "東京"]]);
        let mut out = vec![];
        write_report(&mut out, &table.top_k(30)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "東京 2\n大阪 1\n");
    }
}
