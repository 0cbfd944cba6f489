//! Text-generation features: the free-form passthrough and the university advisor.

pub mod advisor;
pub mod client;
pub mod parse;
pub mod prompt;
pub mod router;

#[cfg(test)]
mod tests;

pub use advisor::{
    AdvisorError, AdvisorRecommendation, AdvisorRequest, AdvisorService, AiRequest,
    RecommendationSource,
};
pub use client::{AiError, OpenAiCompatibleClient, TextGenerator};
pub use router::advisor_router;
