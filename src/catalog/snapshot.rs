use super::models::{Difficulty, Problem};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub input_records: usize,
    pub dropped: usize,
    pub duplicates: usize,
}

/// An immutable catalog version together with its derived indexes.
///
/// Indexes store positions into `problems`, so every entry of every index
/// refers to a problem of this same snapshot. A snapshot is only ever built
/// whole by [`super::build_snapshot`] and never modified after that.
#[derive(Debug)]
pub struct Snapshot {
    pub(super) sequence: u64,
    pub(super) fetched_at: DateTime<Utc>,
    pub(super) problems: Vec<Problem>,
    pub(super) by_id: HashMap<u32, usize>,
    pub(super) by_slug: HashMap<String, usize>,
    pub(super) by_tag: HashMap<String, Vec<usize>>,
    pub(super) by_difficulty: BTreeMap<Difficulty, Vec<usize>>,
    pub(super) tag_names: HashMap<String, String>,
    pub(super) stats: BuildStats,
}

impl Snapshot {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Problems in catalog order.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn problem_at(&self, position: usize) -> Option<&Problem> {
        self.problems.get(position)
    }

    pub fn position_of_id(&self, id: u32) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn position_of_slug(&self, slug: &str) -> Option<usize> {
        self.by_slug.get(slug).copied()
    }

    pub fn get_by_id(&self, id: u32) -> Option<&Problem> {
        self.position_of_id(id).map(|p| &self.problems[p])
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&Problem> {
        self.position_of_slug(slug).map(|p| &self.problems[p])
    }

    /// Positions of the problems carrying `tag_slug`, ascending.
    pub fn tag_bucket(&self, tag_slug: &str) -> &[usize] {
        self.by_tag.get(tag_slug).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positions of the problems of the given difficulty, ascending.
    pub fn difficulty_bucket(&self, difficulty: Difficulty) -> &[usize] {
        self.by_difficulty
            .get(&difficulty)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn tag_name(&self, tag_slug: &str) -> Option<&str> {
        self.tag_names.get(tag_slug).map(String::as_str)
    }

    /// (slug, display name, problem count), sorted by slug.
    pub fn tag_counts(&self) -> Vec<(&str, &str, usize)> {
        let mut tags: Vec<(&str, &str, usize)> = self
            .by_tag
            .iter()
            .map(|(slug, positions)| {
                let name = self
                    .tag_names
                    .get(slug)
                    .map(String::as_str)
                    .unwrap_or(slug.as_str());
                (slug.as_str(), name, positions.len())
            })
            .collect();
        tags.sort_by(|a, b| a.0.cmp(b.0));
        tags
    }

    pub fn difficulty_counts(&self) -> Vec<(Difficulty, usize)> {
        Difficulty::ALL
            .iter()
            .map(|d| (*d, self.difficulty_bucket(*d).len()))
            .collect()
    }
}
