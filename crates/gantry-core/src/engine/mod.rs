pub mod runner;

pub use runner::{BatchReport, Engine, PairOutcome, PairState, Stage};
