//! crates/recall_core/src/generator.rs
//!
//! Turns raw study material into placeholder questions. This is not an NLP
//! pipeline: each long enough sentence becomes a "what does this mean" card.

use rand::Rng;

use crate::domain::Question;

/// At most this many questions come out of one piece of text.
pub const MAX_GENERATED_QUESTIONS: usize = 5;

/// Fragments must be longer than this (in characters) to become a question.
const MIN_SENTENCE_CHARS: usize = 20;
const PROMPT_PREVIEW_CHARS: usize = 50;
const FALLBACK_ANSWER_CHARS: usize = 200;
const FALLBACK_DIFFICULTY: u8 = 2;

pub const FALLBACK_PROMPT: &str = "What is the main concept of this material?";

/// Builds up to five questions from `text`, or one fallback question when no
/// sentence qualifies. Question ids are `q_<batch>_<index>` and `q_<batch>_default`.
pub fn generate_questions<R: Rng + ?Sized>(text: &str, batch: &str, rng: &mut R) -> Vec<Question> {
    let questions: Vec<Question> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .take(MAX_GENERATED_QUESTIONS)
        .enumerate()
        .map(|(i, sentence)| Question {
            id: format!("q_{batch}_{i}"),
            question: format!("What does \"{}\" mean?", ellipsize(sentence, PROMPT_PREVIEW_CHARS)),
            answer: sentence.to_string(),
            difficulty: rng.gen_range(1..=3),
        })
        .collect();

    if !questions.is_empty() {
        return questions;
    }

    vec![Question {
        id: format!("q_{batch}_default"),
        question: FALLBACK_PROMPT.to_string(),
        answer: ellipsize(text, FALLBACK_ANSWER_CHARS),
        difficulty: FALLBACK_DIFFICULTY,
    }]
}

/// The first `max_chars` characters of `text`, with `...` appended if anything was cut.
pub(crate) fn ellipsize(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
