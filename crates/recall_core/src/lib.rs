pub mod active_recall;
pub mod chunking;
pub mod collections;
pub mod domain;
pub mod fakes;
pub mod fixtures;
pub mod generator;
pub mod ports;
pub mod protocol;
pub mod scheduling;
pub mod service;

pub use domain::{
    Chunk, EmbeddingVector, Question, ReviewProgress, ReviewSubmission, StudySet, User,
    UserSession,
};
pub use ports::{
    Clock, DocumentStore, Latency, Operation, PortError, PortResult, StudyApi, StudyError,
    StudyResult,
};
pub use service::StudyService;
