pub mod fallback;
pub mod normalize;
pub mod relevance;
