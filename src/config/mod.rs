pub mod engine;

pub use engine::{EngineConfig, HeuristicsSection, ValidationSection};
