pub mod clock;
pub mod file_store;
pub mod latency;

pub use clock::SystemClock;
pub use file_store::FileStore;
pub use latency::SimulatedLatency;
