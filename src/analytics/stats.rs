//! Summary statistics shared by the graph and timeseries stages

use statrs::statistics::{Data, Median, Statistics};
use std::collections::HashMap;

/// Arithmetic mean of the word counts, `None` when empty
#[must_use]
pub fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|&v| v as f64).mean())
}

/// Median of the word counts, `None` when empty
///
/// Even-length inputs yield the average of the two middle values.
#[must_use]
pub fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let data = Data::new(values.iter().map(|&v| v as f64).collect::<Vec<_>>());
    Some(data.median())
}

/// Occurrence tally of section labels
///
/// Remembers insertion order so that the most frequent section is resolved
/// in favour of the label seen first when counts are tied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionTally {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl SectionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `section`
    pub fn record(&mut self, section: &str) {
        match self.index.get(section) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(section.to_string(), self.counts.len());
                self.counts.push((section.to_string(), 1));
            }
        }
    }

    #[must_use]
    pub fn count(&self, section: &str) -> u64 {
        self.index.get(section).map_or(0, |&i| self.counts[i].1)
    }

    /// Most frequent section; ties go to the first one recorded
    #[must_use]
    pub fn top(&self) -> Option<&str> {
        let mut best: Option<&(String, u64)> = None;
        for entry in &self.counts {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(section, _)| section.as_str())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
