use std::collections::VecDeque;

use super::record::GenerationRecord;

/// Session-scoped generation history, newest first.
///
/// Unbounded and never persisted; it lives as long as the session that owns it.
#[derive(Debug, Clone, Default)]
pub struct History {
    records: VecDeque<GenerationRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record in front of all earlier ones
    pub fn prepend(&mut self, record: GenerationRecord) {
        self.records.push_front(record);
    }

    /// Most recently prepended record
    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.records.front()
    }

    /// All records, newest first
    pub fn all(&self) -> impl ExactSizeIterator<Item = &GenerationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record (session reset)
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AspectRatio, Style};
    use chrono::Utc;

    fn record(seed: u32) -> GenerationRecord {
        GenerationRecord {
            image_url: format!("https://cdn.example/{}.png", seed),
            raw_prompt: "a red fox in snow".into(),
            style: Style::Anime,
            aspect_ratio: AspectRatio::SquareHd,
            seed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_history_has_no_latest() {
        let history = History::new();
        assert!(history.latest().is_none());
        assert_eq!(history.all().len(), 0);
    }

    #[test]
    fn prepend_keeps_newest_first() {
        let mut history = History::new();
        for seed in 1..=3 {
            history.prepend(record(seed));
            assert_eq!(history.latest().map(|r| r.seed), Some(seed));
            assert_eq!(history.all().len(), seed as usize);
        }

        let seeds: Vec<u32> = history.all().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![3, 2, 1]);

        let gallery: Vec<u32> = history.all().skip(1).map(|r| r.seed).collect();
        assert_eq!(gallery, vec![2, 1]);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut history = History::new();
        history.prepend(record(5));
        history.prepend(record(5));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn clear_resets_session() {
        let mut history = History::new();
        history.prepend(record(1));
        history.clear();
        assert!(history.is_empty());
    }
}
