//! Method Recommender.

pub mod engine;
pub mod heuristic;
pub mod remote;

pub use engine::RecommendationEngine;
pub use heuristic::HeuristicRecommender;
pub use remote::HttpRecommender;
