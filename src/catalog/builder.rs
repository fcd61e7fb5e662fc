//! Turns raw upstream records into a validated [`Snapshot`].
//!
//! Records missing an id, a slug or a difficulty are dropped. On id or slug
//! collisions the first occurrence is kept and the later one is counted as a
//! duplicate. All four indexes are built in the same pass over the records.

use super::models::{
    is_url_safe_slug, slugify, Difficulty, Problem, RawRecord, RawTag, TagRef,
};
use super::snapshot::{BuildStats, Snapshot};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No records to build a catalog from")]
    EmptyInput,
    #[error("None of the {input} records survived validation ({dropped} dropped)")]
    NothingUsable { input: usize, dropped: usize },
}

/// Why a single record was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum BuildIssue {
    MissingField { field: &'static str },
    InvalidField { field: &'static str, value: String },
    DuplicateId { id: u32 },
    DuplicateSlug { slug: String },
}

impl fmt::Display for BuildIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildIssue::MissingField { field } => {
                write!(f, "Field '{}' is required but was missing", field)
            }
            BuildIssue::InvalidField { field, value } => {
                write!(f, "Field '{}' has invalid value '{}'", field, value)
            }
            BuildIssue::DuplicateId { id } => write!(f, "Problem with id {} already exists", id),
            BuildIssue::DuplicateSlug { slug } => {
                write!(f, "Problem with slug '{}' already exists", slug)
            }
        }
    }
}

/// Converts one record into a [`Problem`], without uniqueness checks.
pub fn validate_record(record: &RawRecord) -> Result<Problem, BuildIssue> {
    let raw_id = record
        .question_frontend_id
        .as_ref()
        .ok_or(BuildIssue::MissingField { field: "id" })?;
    let id = raw_id
        .as_positive_u32()
        .ok_or_else(|| BuildIssue::InvalidField {
            field: "id",
            value: raw_id.as_text(),
        })?;

    let slug = record
        .slug()
        .ok_or(BuildIssue::MissingField { field: "slug" })?;
    if !is_url_safe_slug(&slug) {
        return Err(BuildIssue::InvalidField {
            field: "slug",
            value: slug,
        });
    }

    let raw_difficulty = record
        .difficulty
        .as_deref()
        .ok_or(BuildIssue::MissingField {
            field: "difficulty",
        })?;
    let difficulty =
        Difficulty::parse(raw_difficulty).ok_or_else(|| BuildIssue::InvalidField {
            field: "difficulty",
            value: raw_difficulty.to_string(),
        })?;

    let title = record
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(slug.as_str())
        .to_string();

    Ok(Problem {
        id,
        question_id: record.question_id.as_ref().map(|q| q.as_text()),
        title,
        difficulty,
        paid_only: record.is_paid_only.unwrap_or(false),
        tags: collect_tags(record.topic_tags.as_deref().unwrap_or(&[])),
        acceptance_rate: record.acceptance(),
        likes: record.likes.and_then(|v| u64::try_from(v).ok()),
        dislikes: record.dislikes.and_then(|v| u64::try_from(v).ok()),
        category: record
            .category_title
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        has_solution: record.has_solution.unwrap_or(false),
        has_video_solution: record.has_video_solution.unwrap_or(false),
        slug,
    })
}

fn collect_tags(raw_tags: &[RawTag]) -> Vec<TagRef> {
    let mut seen = HashSet::new();
    let mut tags = Vec::with_capacity(raw_tags.len());
    for raw in raw_tags {
        let (slug, name) = match raw {
            RawTag::Named { name, slug } => {
                let slug = match slug.as_deref().map(str::trim) {
                    Some(s) if !s.is_empty() => slugify(s),
                    _ => slugify(name),
                };
                (slug, name.trim().to_string())
            }
            RawTag::Slug(s) => (slugify(s), s.trim().to_string()),
        };
        if slug.is_empty() || !seen.insert(slug.clone()) {
            continue;
        }
        let name = if name.is_empty() { slug.clone() } else { name };
        tags.push(TagRef { slug, name });
    }
    tags
}

/// Builds a snapshot from `records`. Only fails when nothing usable remains.
pub fn build_snapshot(
    records: &[RawRecord],
    sequence: u64,
    fetched_at: DateTime<Utc>,
) -> Result<Snapshot, BuildError> {
    if records.is_empty() {
        return Err(BuildError::EmptyInput);
    }

    let mut stats = BuildStats {
        input_records: records.len(),
        ..Default::default()
    };
    let mut problems: Vec<Problem> = Vec::with_capacity(records.len());
    let mut by_id: HashMap<u32, usize> = HashMap::with_capacity(records.len());
    let mut by_slug: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut by_tag: HashMap<String, Vec<usize>> = HashMap::new();
    let mut by_difficulty: BTreeMap<Difficulty, Vec<usize>> = BTreeMap::new();
    let mut tag_names: HashMap<String, String> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        let problem = match validate_record(record) {
            Ok(problem) => problem,
            Err(issue) => {
                debug!("Dropping record #{}: {}", index, issue);
                stats.dropped += 1;
                continue;
            }
        };

        let collision = if by_id.contains_key(&problem.id) {
            Some(BuildIssue::DuplicateId { id: problem.id })
        } else if by_slug.contains_key(&problem.slug) {
            Some(BuildIssue::DuplicateSlug {
                slug: problem.slug.clone(),
            })
        } else {
            None
        };
        if let Some(issue) = collision {
            debug!("Skipping record #{}: {}", index, issue);
            stats.duplicates += 1;
            continue;
        }

        let position = problems.len();
        by_id.insert(problem.id, position);
        by_slug.insert(problem.slug.clone(), position);
        by_difficulty
            .entry(problem.difficulty)
            .or_default()
            .push(position);
        for tag in &problem.tags {
            by_tag.entry(tag.slug.clone()).or_default().push(position);
            tag_names
                .entry(tag.slug.clone())
                .or_insert_with(|| tag.name.clone());
        }
        problems.push(problem);
    }

    if problems.is_empty() {
        return Err(BuildError::NothingUsable {
            input: stats.input_records,
            dropped: stats.dropped,
        });
    }

    Ok(Snapshot {
        sequence,
        fetched_at,
        problems,
        by_id,
        by_slug,
        by_tag,
        by_difficulty,
        tag_names,
        stats,
    })
}
