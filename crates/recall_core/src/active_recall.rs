//! crates/recall_core/src/active_recall.rs
//!
//! Key-concept extraction from study material and heuristic scoring of the
//! free-text answers a student gives when recalling a concept.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{AnswerAnalysis, AnswerLevel};

/// Study-technique vocabulary looked up verbatim in the material.
const KNOWN_CONCEPTS: &[&str] = &[
    "active recall",
    "spaced repetition",
    "metacognition",
    "long-term memory",
    "retrieval practice",
    "testing effect",
    "elaborative interrogation",
    "self-explanation",
    "interleaving",
    "feedback",
    "spaced practice",
    "desirable difficulties",
    "learning",
    "study",
    "memory",
    "comprehension",
    "knowledge",
    "technique",
    "method",
    "strategy",
    "education",
    "teaching",
    "pedagogy",
    "training",
];

/// Phrasings that introduce a concept; group 1 is the concept.
const CONCEPT_PATTERNS: &[&str] = &[
    r"(?i)the concept of ([\p{L}\s]{3,25})",
    r"(?i)the technique of ([\p{L}\s]{3,25})",
    r"(?i)the method of ([\p{L}\s]{3,25})",
    r"(?i)the strategy of ([\p{L}\s]{3,25})",
    r"(?i)the process of ([\p{L}\s]{3,25})",
    r"(\p{Lu}[\p{L}\s]{5,25}) is a technique",
    r"(\p{Lu}[\p{L}\s]{5,25}) is a method",
    r"(\p{Lu}[\p{L}\s]{5,25}) allows",
];

static CONCEPT_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    CONCEPT_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

static CAPITALIZED_WORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b\p{Lu}\p{Ll}{4,}\b").ok());

/// Concepts used to top up a list that came out too short.
const BASIC_CONCEPTS: [&str; 3] = ["learning", "knowledge", "comprehension"];

const MAX_SPECIFIC_CONCEPTS: usize = 8;
const MAX_GENERAL_CONCEPTS: usize = 5;
const MIN_CONCEPTS: usize = 3;

/// Words that suggest the student explained the why or the how.
const UNDERSTANDING_MARKERS: &[&str] = &[
    "because", "due to", "allows", "means", "implies", "consists", "example", "apply",
];

const MIN_DETAILED_WORDS: usize = 10;

/// Picks the concepts of `text` worth asking about.
///
/// Known vocabulary and pattern matches come first (up to eight, deduplicated
/// without regard to case). Without any, the first capitalized words of five or
/// more letters stand in (up to five). A list shorter than three is topped up
/// with basic concepts and capped at five.
pub fn extract_key_concepts(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();

    let mut found: Vec<String> = KNOWN_CONCEPTS
        .iter()
        .filter(|concept| lower.contains(*concept))
        .map(|concept| concept.to_string())
        .collect();
    for regex in CONCEPT_REGEXES.iter() {
        found.extend(
            regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string()),
        );
    }

    let mut concepts = dedup_ignoring_case(found.into_iter().filter(|c| c.chars().count() > 3));
    if concepts.is_empty() {
        let words = CAPITALIZED_WORD
            .as_ref()
            .map(|regex| {
                regex
                    .find_iter(text)
                    .take(10)
                    .map(|m| m.as_str().to_lowercase())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        concepts = dedup_ignoring_case(words.into_iter());
        concepts.truncate(MAX_GENERAL_CONCEPTS);
    } else {
        concepts.truncate(MAX_SPECIFIC_CONCEPTS);
    }

    if concepts.len() < MIN_CONCEPTS {
        for basic in BASIC_CONCEPTS {
            if !concepts.iter().any(|c| c.eq_ignore_ascii_case(basic)) {
                concepts.push(basic.to_string());
            }
        }
        concepts.truncate(MAX_GENERAL_CONCEPTS);
    }
    concepts
}

fn dedup_ignoring_case(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for item in items {
        if !unique.iter().any(|u| u.to_lowercase() == item.to_lowercase()) {
            unique.push(item);
        }
    }
    unique
}

/// Scores a free-text answer about `concept` out of 100.
///
/// Mentioning the concept is worth 40, an understanding marker 30 and at least
/// ten words another 30. Both inputs are compared case-insensitively.
pub fn analyze_answer(concept: &str, answer: &str) -> AnswerAnalysis {
    let answer_lower = answer.to_lowercase();
    let concept_lower = concept.trim().to_lowercase();

    let mentions_concept = !concept_lower.is_empty() && answer_lower.contains(&concept_lower);
    let shows_understanding = UNDERSTANDING_MARKERS
        .iter()
        .any(|marker| answer_lower.contains(marker));
    let detailed_enough = answer.split_whitespace().count() >= MIN_DETAILED_WORDS;

    let mut score = 0;
    let mut feedback = Vec::with_capacity(3);

    if mentions_concept {
        score += 40;
        feedback.push("Mentions the key concept".to_string());
    } else {
        feedback.push("Does not explicitly mention the key concept".to_string());
    }
    if shows_understanding {
        score += 30;
        feedback.push("Shows conceptual understanding".to_string());
    } else {
        feedback.push("Could explain the why or the how better".to_string());
    }
    if detailed_enough {
        score += 30;
        feedback.push("Answer has enough detail".to_string());
    } else {
        feedback.push("Answer is very brief, elaborate more".to_string());
    }

    AnswerAnalysis {
        concept: concept.trim().to_string(),
        score,
        level: level_for(score),
        feedback,
        mentions_concept,
        shows_understanding,
        detailed_enough,
    }
}

fn level_for(score: u8) -> AnswerLevel {
    match score {
        80.. => AnswerLevel::Excellent,
        60..=79 => AnswerLevel::Good,
        40..=59 => AnswerLevel::Fair,
        _ => AnswerLevel::NeedsImprovement,
    }
}
