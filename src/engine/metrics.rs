//! Extraction run metrics.
//!
//! Collected on every run; cheap counters and a few `Instant` reads per
//! category. The CLI report prints them, library callers can ignore them.

use crate::Category;
use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time, extraction plus resolution.
    pub total: Duration,
    /// Number of sentences processed.
    pub sentences: usize,
    /// Per-category counters, in priority order. Only categories that ran
    /// appear here.
    pub categories: Vec<CategoryMetrics>,
    /// Expressions removed because a longer one covered them.
    pub subsumed: usize,
    /// Time spent in placeholder resolution.
    pub resolve: Duration,
}

/// What one category's rules did over a run.
#[derive(Debug, Clone)]
pub struct CategoryMetrics {
    pub category: Category,
    pub duration: Duration,
    /// Rule applications attempted (rules × sentences).
    pub rules_considered: usize,
    /// Applications skipped because the fast check failed.
    pub fast_rejected: usize,
    /// Raw regex matches.
    pub candidates: usize,
    pub rejected_boundary: usize,
    pub rejected_pos: usize,
    /// Matches whose offset groups did not participate.
    pub rejected_offset: usize,
    pub emitted: usize,
}

impl CategoryMetrics {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            duration: Duration::ZERO,
            rules_considered: 0,
            fast_rejected: 0,
            candidates: 0,
            rejected_boundary: 0,
            rejected_pos: 0,
            rejected_offset: 0,
            emitted: 0,
        }
    }

    fn absorb(&mut self, other: &CategoryMetrics) {
        self.duration += other.duration;
        self.rules_considered += other.rules_considered;
        self.fast_rejected += other.fast_rejected;
        self.candidates += other.candidates;
        self.rejected_boundary += other.rejected_boundary;
        self.rejected_pos += other.rejected_pos;
        self.rejected_offset += other.rejected_offset;
        self.emitted += other.emitted;
    }
}

impl RunMetrics {
    pub fn category(&self, category: Category) -> Option<&CategoryMetrics> {
        self.categories.iter().find(|m| m.category == category)
    }

    /// Total expressions emitted before overlap filtering.
    pub fn emitted(&self) -> usize {
        self.categories.iter().map(|m| m.emitted).sum()
    }

    /// Fold a per-sentence run into this one.
    pub(crate) fn merge(&mut self, other: &RunMetrics) {
        self.total += other.total;
        self.sentences += other.sentences;
        self.subsumed += other.subsumed;
        self.resolve += other.resolve;
        for metrics in &other.categories {
            match self.categories.iter_mut().find(|m| m.category == metrics.category) {
                Some(existing) => existing.absorb(metrics),
                None => self.categories.push(metrics.clone()),
            }
        }
        self.categories.sort_by_key(|m| m.category);
    }
}
