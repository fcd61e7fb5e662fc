//! Fixture data served by the mock upstream, in the GraphQL response shape.

use super::constants::*;
use serde_json::{json, Value};

fn tag(name: &str, slug: &str) -> Value {
    json!({ "name": name, "slug": slug })
}

/// The raw problem list. Two records are unusable on purpose: one has no
/// slug and one repeats the id of Two Sum.
pub fn problem_records() -> Vec<Value> {
    vec![
        json!({
            "questionId": "1",
            "questionFrontendId": TWO_SUM_ID.to_string(),
            "title": TWO_SUM_TITLE,
            "titleSlug": TWO_SUM_SLUG,
            "difficulty": "Easy",
            "isPaidOnly": false,
            "acRate": 55.2,
            "topicTags": [tag("Array", "array"), tag("Hash Table", "hash-table")],
            "categoryTitle": "Algorithms",
            "hasSolution": true,
            "hasVideoSolution": true,
        }),
        json!({
            "questionId": "2",
            "questionFrontendId": ADD_TWO_NUMBERS_ID.to_string(),
            "title": "Add Two Numbers",
            "titleSlug": ADD_TWO_NUMBERS_SLUG,
            "difficulty": "Medium",
            "isPaidOnly": false,
            "acRate": 45.1,
            "topicTags": [
                tag("Linked List", "linked-list"),
                tag("Math", "math"),
                tag("Recursion", "recursion"),
            ],
            "categoryTitle": "Algorithms",
            "hasSolution": true,
            "hasVideoSolution": false,
        }),
        json!({
            "questionId": "4",
            "questionFrontendId": MEDIAN_ID.to_string(),
            "title": "Median of Two Sorted Arrays",
            "titleSlug": MEDIAN_SLUG,
            "difficulty": "Hard",
            "isPaidOnly": false,
            "acRate": 42.0,
            "topicTags": [
                tag("Array", "array"),
                tag("Binary Search", "binary-search"),
                tag("Divide and Conquer", "divide-and-conquer"),
            ],
            "categoryTitle": "Algorithms",
            "hasSolution": true,
            "hasVideoSolution": false,
        }),
        json!({
            "questionId": "99999",
            "questionFrontendId": "",
            "title": "Broken Record",
            "difficulty": "Easy",
            "topicTags": [],
        }),
        json!({
            "questionId": "15",
            "questionFrontendId": THREE_SUM_ID.to_string(),
            "title": "3Sum",
            "titleSlug": THREE_SUM_SLUG,
            "difficulty": "Medium",
            "isPaidOnly": false,
            "acRate": 36.9,
            "topicTags": [
                tag("Array", "array"),
                tag("Two Pointers", "two-pointers"),
                tag("Sorting", "sorting"),
            ],
            "categoryTitle": "Algorithms",
            "hasSolution": true,
            "hasVideoSolution": false,
        }),
        json!({
            "questionId": "1",
            "questionFrontendId": TWO_SUM_ID.to_string(),
            "title": "Two Sum Again",
            "titleSlug": "two-sum-again",
            "difficulty": "Easy",
            "topicTags": [],
        }),
        json!({
            "questionId": "175",
            "questionFrontendId": COMBINE_TABLES_ID.to_string(),
            "title": "Combine Two Tables",
            "titleSlug": COMBINE_TABLES_SLUG,
            "difficulty": "Easy",
            "isPaidOnly": false,
            "acRate": 77.3,
            "topicTags": [tag("Database", "database")],
            "categoryTitle": "Database",
            "hasSolution": true,
            "hasVideoSolution": false,
        }),
    ]
}

/// Full detail for the problems the mock upstream knows about.
pub fn question_detail(slug: &str) -> Option<Value> {
    let record = problem_records()
        .into_iter()
        .find(|r| r["titleSlug"].as_str() == Some(slug))?;
    Some(json!({
        "questionId": record["questionId"],
        "questionFrontendId": record["questionFrontendId"],
        "title": record["title"],
        "titleSlug": slug,
        "difficulty": record["difficulty"],
        "content": format!("<p>Statement of {}</p>", slug),
        "topicTags": record["topicTags"],
        "hints": ["Think about it"],
        "exampleTestcases": "[2,7,11,15]\n9",
    }))
}

pub fn daily_challenge() -> Value {
    json!({
        "date": "2026-10-19",
        "link": format!("/problems/{}/", TWO_SUM_SLUG),
        "question": {
            "questionFrontendId": TWO_SUM_ID.to_string(),
            "title": TWO_SUM_TITLE,
            "titleSlug": TWO_SUM_SLUG,
            "difficulty": "Easy",
        }
    })
}

pub fn user_profile(username: &str) -> Value {
    json!({
        "username": username,
        "profile": { "realName": "Alice", "ranking": 1234, "reputation": 10 },
        "submitStats": {
            "acSubmissionNum": [
                { "difficulty": "All", "count": 120 },
                { "difficulty": "Easy", "count": 60 },
            ]
        }
    })
}

pub fn user_contests() -> Value {
    json!({
        "userContestRanking": { "attendedContestsCount": 12, "rating": 1850.5 },
        "userContestRankingHistory": [
            { "attended": true, "rating": 1500.0, "contest": { "title": "Weekly Contest 400" } }
        ]
    })
}

pub fn user_submissions(limit: usize) -> Value {
    let submissions: Vec<Value> = (0..limit)
        .map(|i| {
            json!({
                "title": TWO_SUM_TITLE,
                "titleSlug": TWO_SUM_SLUG,
                "timestamp": (1_760_000_000 + i).to_string(),
                "statusDisplay": "Accepted",
                "lang": "rust",
            })
        })
        .collect();
    Value::Array(submissions)
}

pub fn user_calendar(year: Option<i64>) -> Value {
    json!({
        "activeYears": [2025, 2026],
        "streak": 5,
        "totalActiveDays": 40,
        "submissionCalendar": "{\"1760000000\": 3}",
        "year": year,
    })
}

pub fn user_skills() -> Value {
    json!({
        "advanced": [],
        "intermediate": [{ "tagName": "Hash Table", "tagSlug": "hash-table", "problemsSolved": 12 }],
        "fundamental": [{ "tagName": "Array", "tagSlug": "array", "problemsSolved": 40 }],
    })
}

pub fn user_badges() -> Value {
    json!({
        "badges": [{ "id": "1", "displayName": "50 Days Badge 2026" }],
        "upcomingBadges": [{ "name": "100 Days Badge 2026" }],
    })
}
