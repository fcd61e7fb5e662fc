use super::{ProblemFilter, QueryError};
use crate::catalog::{Problem, Snapshot, SnapshotStore};
use rand::Rng;
use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;

/// A problem together with the snapshot it was read from.
#[derive(Debug, Clone)]
pub struct ProblemRef {
    snapshot: Arc<Snapshot>,
    position: usize,
}

impl ProblemRef {
    pub fn sequence(&self) -> u64 {
        self.snapshot.sequence()
    }
}

impl Deref for ProblemRef {
    type Target = Problem;

    fn deref(&self) -> &Problem {
        &self.snapshot.problems()[self.position]
    }
}

/// An ordered selection of problems from one snapshot.
#[derive(Debug, Clone)]
pub struct ProblemSet {
    snapshot: Arc<Snapshot>,
    positions: Vec<usize>,
}

impl ProblemSet {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn sequence(&self) -> u64 {
        self.snapshot.sequence()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> + '_ {
        let problems = self.snapshot.problems();
        self.positions.iter().map(move |p| &problems[*p])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub slug: String,
    pub name: String,
    pub count: usize,
}

/// Answers catalog queries from whatever snapshot is current. Every call
/// works on exactly one snapshot.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<SnapshotStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    fn snapshot(&self) -> Result<Arc<Snapshot>, QueryError> {
        self.store.current().ok_or(QueryError::NotInitialized)
    }

    pub fn get_by_id(&self, id: u32) -> Result<Option<ProblemRef>, QueryError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .position_of_id(id)
            .map(|position| ProblemRef { snapshot, position }))
    }

    pub fn get_by_slug(&self, slug: &str) -> Result<Option<ProblemRef>, QueryError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .position_of_slug(slug)
            .map(|position| ProblemRef { snapshot, position }))
    }

    /// Numeric identifiers are ids, anything else is a slug.
    pub fn resolve(&self, identifier: &str) -> Result<Option<ProblemRef>, QueryError> {
        let identifier = identifier.trim();
        if !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit()) {
            return match identifier.parse::<u32>() {
                Ok(id) => self.get_by_id(id),
                Err(_) => self.snapshot().map(|_| None),
            };
        }
        self.get_by_slug(identifier)
    }

    pub fn list(&self) -> Result<ProblemSet, QueryError> {
        let snapshot = self.snapshot()?;
        let positions = (0..snapshot.len()).collect();
        Ok(ProblemSet {
            snapshot,
            positions,
        })
    }

    pub fn filter(&self, filter: &ProblemFilter) -> Result<ProblemSet, QueryError> {
        let snapshot = self.snapshot()?;
        let positions = filter_positions(&snapshot, filter);
        Ok(ProblemSet {
            snapshot,
            positions,
        })
    }

    /// Case-insensitive substring match on title and slug, in catalog order.
    /// A blank query matches nothing.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<ProblemSet, QueryError> {
        let snapshot = self.snapshot()?;
        let needle = query.trim().to_lowercase();
        let positions = if needle.is_empty() {
            Vec::new()
        } else {
            snapshot
                .problems()
                .iter()
                .enumerate()
                .filter(|(_, p)| {
                    p.title.to_lowercase().contains(&needle) || p.slug.contains(&needle)
                })
                .map(|(position, _)| position)
                .take(limit.unwrap_or(usize::MAX))
                .collect()
        };
        Ok(ProblemSet {
            snapshot,
            positions,
        })
    }

    pub fn random(&self, filter: &ProblemFilter) -> Result<Option<ProblemRef>, QueryError> {
        self.random_with(filter, &mut rand::rng())
    }

    pub fn random_with<R: Rng + ?Sized>(
        &self,
        filter: &ProblemFilter,
        rng: &mut R,
    ) -> Result<Option<ProblemRef>, QueryError> {
        let snapshot = self.snapshot()?;
        let positions = filter_positions(&snapshot, filter);
        if positions.is_empty() {
            return Ok(None);
        }
        let position = positions[rng.random_range(0..positions.len())];
        Ok(Some(ProblemRef { snapshot, position }))
    }

    /// Tags sorted by slug, with the number of problems carrying each.
    pub fn tags(&self) -> Result<Vec<TagSummary>, QueryError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .tag_counts()
            .into_iter()
            .map(|(slug, name, count)| TagSummary {
                slug: slug.to_string(),
                name: name.to_string(),
                count,
            })
            .collect())
    }
}

/// Intersects the difficulty and tag buckets, then applies the topic check.
/// Buckets are sorted, so the result stays in catalog order.
fn filter_positions(snapshot: &Snapshot, filter: &ProblemFilter) -> Vec<usize> {
    let mut buckets: Vec<&[usize]> = Vec::with_capacity(2);
    if let Some(difficulty) = filter.difficulty {
        buckets.push(snapshot.difficulty_bucket(difficulty));
    }
    if let Some(tag) = filter.tag.as_deref() {
        buckets.push(snapshot.tag_bucket(tag));
    }
    buckets.sort_by_key(|b| b.len());

    let candidates: Vec<usize> = match buckets.split_first() {
        None => (0..snapshot.len()).collect(),
        Some((smallest, rest)) => smallest
            .iter()
            .copied()
            .filter(|p| rest.iter().all(|b| b.binary_search(p).is_ok()))
            .collect(),
    };

    candidates
        .into_iter()
        .filter(|p| filter.matches_topic(&snapshot.problems()[*p]))
        .collect()
}
