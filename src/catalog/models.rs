use serde::{Deserialize, Serialize};

pub const PROBLEM_URL_PREFIX: &str = "https://leetcode.com/problems/";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Case-insensitive, surrounding whitespace ignored.
    pub fn parse(s: &str) -> Option<Difficulty> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub slug: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: u32,
    pub question_id: Option<String>,
    pub slug: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub paid_only: bool,
    pub tags: Vec<TagRef>,
    pub acceptance_rate: Option<f64>,
    pub likes: Option<u64>,
    pub dislikes: Option<u64>,
    pub category: Option<String>,
    pub has_solution: bool,
    pub has_video_solution: bool,
}

impl Problem {
    pub fn url(&self) -> String {
        format!("{}{}/", PROBLEM_URL_PREFIX, self.slug)
    }

    pub fn has_tag(&self, tag_slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == tag_slug)
    }
}

/// Problem as rendered to HTTP clients, with its derived url.
#[derive(Clone, Debug, Serialize)]
pub struct ProblemView<'a> {
    #[serde(flatten)]
    pub problem: &'a Problem,
    pub url: String,
}

impl<'a> From<&'a Problem> for ProblemView<'a> {
    fn from(problem: &'a Problem) -> Self {
        ProblemView {
            url: problem.url(),
            problem,
        }
    }
}

/// Upstream ids come as numbers from some sources and as strings from GraphQL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    pub fn as_positive_u32(&self) -> Option<u32> {
        let value = match self {
            RawId::Number(n) => *n,
            RawId::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        if value <= 0 {
            return None;
        }
        u32::try_from(value).ok()
    }

    pub fn as_text(&self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTag {
    Named {
        name: String,
        #[serde(default)]
        slug: Option<String>,
    },
    Slug(String),
}

/// A catalog record as it comes from upstream. Every field is optional, the
/// index builder decides what is usable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<RawId>,
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub question_frontend_id: Option<RawId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, alias = "slug", skip_serializing_if = "Option::is_none")]
    pub title_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, alias = "paidOnly", skip_serializing_if = "Option::is_none")]
    pub is_paid_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dislikes: Option<i64>,
    #[serde(default, alias = "tags", skip_serializing_if = "Option::is_none")]
    pub topic_tags: Option<Vec<RawTag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_solution: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_video_solution: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RawRecord {
    /// The explicit slug, or the last path segment of the record url.
    pub fn slug(&self) -> Option<String> {
        if let Some(slug) = self.title_slug.as_deref().map(str::trim) {
            if !slug.is_empty() {
                return Some(slug.to_string());
            }
        }
        self.url
            .as_deref()?
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Acceptance as a fraction in 0.0..=1.0. `acRate` is a percentage.
    pub fn acceptance(&self) -> Option<f64> {
        let fraction = match (self.acceptance_rate, self.ac_rate) {
            (Some(fraction), _) => fraction,
            (None, Some(percent)) => percent / 100.0,
            (None, None) => return None,
        };
        if fraction.is_nan() {
            return None;
        }
        Some(fraction.clamp(0.0, 1.0))
    }
}

/// Tag slug form shared by the index builder and request filters:
/// lowercase, whitespace runs collapsed into `-`.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

pub fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
