//! crates/recall_core/src/fixtures.rs
//!
//! Seed data and canned responses. The demo accounts and sets are written once
//! into an empty store; the PDF chunks and review queue are returned verbatim.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::{
    Chunk, Question, ReviewPriority, ReviewQueueItem, ReviewStatus, StudySet, User,
};

pub const EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const EMBEDDING_DIMENSION: usize = 384;

/// Completion ratio for each of the last seven days.
pub const WEEKLY_PROGRESS: [f64; 7] = [0.65, 0.72, 0.78, 0.81, 0.85, 0.88, 0.91];

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_default()
}

fn question(id: &str, question: &str, answer: &str, difficulty: u8) -> Question {
    Question {
        id: id.to_string(),
        question: question.to_string(),
        answer: answer.to_string(),
        difficulty,
    }
}

pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "u1".to_string(),
            email: "demo@recall.app".to_string(),
            password: "demo123".to_string(),
            name: "Demo User".to_string(),
            created_at: at(2025, 9, 20, 10, 0),
        },
        User {
            id: "u2".to_string(),
            email: "student@upao.edu.pe".to_string(),
            password: "upao2025".to_string(),
            name: "UPAO Student".to_string(),
            created_at: at(2025, 9, 21, 14, 30),
        },
    ]
}

pub fn seed_study_sets() -> Vec<StudySet> {
    vec![
        StudySet {
            id: "set_1".to_string(),
            user_id: "u1".to_string(),
            title: "Endodontics - Dental Pulp".to_string(),
            questions: vec![
                question(
                    "q1",
                    "What is the dental pulp?",
                    "Connective tissue in the pulp chamber of the tooth containing nerves, blood vessels and specialised cells. It keeps the tooth vital.",
                    2,
                ),
                question(
                    "q2",
                    "What are the symptoms of pulpitis?",
                    "Sharp intense pain, thermal sensitivity (especially to cold), spontaneous night pain and pain when chewing.",
                    3,
                ),
                question(
                    "q3",
                    "What is endodontic treatment?",
                    "Removing infected or damaged pulp, cleaning and disinfecting the root canals, then sealing them to prevent reinfection.",
                    1,
                ),
                question(
                    "q4",
                    "When is a root canal indicated?",
                    "Irreversible pulpitis, pulp necrosis, apical periodontitis, dental trauma and prosthetic work that requires devitalisation.",
                    2,
                ),
                question(
                    "q5",
                    "What is canal obturation?",
                    "Three-dimensional sealing of the root canal space with biocompatible materials, usually gutta-percha and sealer cement.",
                    3,
                ),
            ],
            created_at: at(2025, 9, 22, 9, 15),
        },
        StudySet {
            id: "set_2".to_string(),
            user_id: "u1".to_string(),
            title: "Cardiovascular Physiology".to_string(),
            questions: vec![
                question(
                    "q6",
                    "What is the cardiac cycle?",
                    "The sequence of events during one heartbeat, including systole (contraction) and diastole (relaxation).",
                    2,
                ),
                question(
                    "q7",
                    "What does the sinoatrial node do?",
                    "It is the heart's natural pacemaker, generating the impulses that start each beat at 60-100 beats per minute.",
                    3,
                ),
                question(
                    "q8",
                    "What is systolic blood pressure?",
                    "The peak pressure of blood against the arterial walls during ventricular contraction. Normal value: 120 mmHg.",
                    1,
                ),
            ],
            created_at: at(2025, 9, 22, 11, 30),
        },
    ]
}

/// The chunks every processed PDF "contains".
pub fn canned_pdf_chunks() -> Vec<Chunk> {
    let chunk = |id: &str, content: &str, page, start_char, end_char| Chunk {
        id: id.to_string(),
        content: content.to_string(),
        page,
        start_char,
        end_char,
    };

    vec![
        chunk(
            "chunk_1",
            "The dental pulp is connective tissue located in the pulp chamber of the tooth. It contains nerves, blood vessels and specialised cells such as odontoblasts.",
            1,
            0,
            150,
        ),
        chunk(
            "chunk_2",
            "Symptoms of pulpitis include intense pain, thermal sensitivity and night pain. Pulpitis can be reversible or irreversible depending on the degree of inflammation.",
            1,
            151,
            320,
        ),
        chunk(
            "chunk_3",
            "Endodontic treatment removes the infected pulp, cleans and disinfects the root canals, and then fills them.",
            2,
            0,
            155,
        ),
        chunk(
            "chunk_4",
            "The canal is filled with gutta-percha and sealer cement, providing a three-dimensional seal that prevents reinfection.",
            2,
            156,
            300,
        ),
    ]
}

pub fn canned_review_queue() -> Vec<ReviewQueueItem> {
    vec![
        ReviewQueueItem {
            id: "rev_1".to_string(),
            set_id: "set_1".to_string(),
            set_title: "Endodontics - Dental Pulp".to_string(),
            questions_count: 5,
            status: ReviewStatus::Overdue,
            days_overdue: 2,
            last_score: 0.58,
            current_interval: 1,
            priority: ReviewPriority::Urgent,
            next_review: at(2025, 9, 21, 9, 0),
        },
        ReviewQueueItem {
            id: "rev_2".to_string(),
            set_id: "set_2".to_string(),
            set_title: "Cardiovascular Physiology".to_string(),
            questions_count: 3,
            status: ReviewStatus::Today,
            days_overdue: 0,
            last_score: 0.78,
            current_interval: 14,
            priority: ReviewPriority::Normal,
            next_review: at(2025, 9, 23, 10, 0),
        },
        ReviewQueueItem {
            id: "rev_3".to_string(),
            set_id: "set_3".to_string(),
            set_title: "Basic Pharmacology".to_string(),
            questions_count: 4,
            status: ReviewStatus::Bonus,
            days_overdue: -1,
            last_score: 0.91,
            current_interval: 30,
            priority: ReviewPriority::Optional,
            next_review: at(2025, 9, 24, 15, 0),
        },
    ]
}
