pub mod catalog;
pub mod matching;
pub mod recommendations;

pub use recommendations::RecommendationEngine;
