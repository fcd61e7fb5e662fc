use super::QueryError;
use crate::catalog::{slugify, Difficulty, Problem};

/// Optional constraints on difficulty, tag slug and topic (category).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemFilter {
    pub difficulty: Option<Difficulty>,
    pub tag: Option<String>,
    pub topic: Option<String>,
}

impl ProblemFilter {
    /// Validates raw request values. Absent values are no constraint,
    /// present values must be meaningful.
    pub fn parse(
        difficulty: Option<&str>,
        tag: Option<&str>,
        topic: Option<&str>,
    ) -> Result<ProblemFilter, QueryError> {
        let difficulty = match difficulty {
            None => None,
            Some(raw) => Some(Difficulty::parse(raw).ok_or_else(|| {
                QueryError::InvalidRequest(format!(
                    "unknown difficulty '{}', expected Easy, Medium or Hard",
                    raw
                ))
            })?),
        };

        let tag = match tag.map(slugify) {
            Some(t) if t.is_empty() => {
                return Err(QueryError::InvalidRequest("tag must not be empty".to_string()))
            }
            other => other,
        };

        let topic = match topic.map(str::trim) {
            Some("") => {
                return Err(QueryError::InvalidRequest(
                    "topic must not be empty".to_string(),
                ))
            }
            other => other.map(str::to_lowercase),
        };

        Ok(ProblemFilter {
            difficulty,
            tag,
            topic,
        })
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(slugify(tag));
        self
    }

    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = Some(topic.trim().to_lowercase());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.difficulty.is_none() && self.tag.is_none() && self.topic.is_none()
    }

    pub fn matches_topic(&self, problem: &Problem) -> bool {
        match &self.topic {
            None => true,
            Some(topic) => problem
                .category
                .as_deref()
                .map(|c| c.to_lowercase() == *topic)
                .unwrap_or(false),
        }
    }
}
