use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{CatalogRepository, CatalogService, CatalogServiceError};

use super::client::{AiError, TextGenerator};
use super::parse::{fallback_university, parse_recommendation, resolve_university, FallbackKind};
use super::prompt::{advisor_prompt, ask_prompt};

/// Free-form passthrough request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiRequest {
    pub template: String,
    pub text: String,
}

/// Applicant profile submitted to the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorRequest {
    pub ent_score: i64,
    pub profile_subjects: String,
    pub interests: String,
    pub preferred_city: String,
    pub career_goal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorRecommendation {
    pub university_name: String,
    pub short_reason: String,
}

/// Where the recommended university came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationSource {
    Model,
    CityMatch,
    FirstAvailable,
}

/// Composes the catalog and a text generator into the ask/recommend operations.
pub struct AdvisorService<R, G> {
    catalog: Arc<CatalogService<R>>,
    generator: Arc<G>,
}

impl<R, G> AdvisorService<R, G>
where
    R: CatalogRepository + 'static,
    G: TextGenerator + 'static,
{
    pub fn new(catalog: Arc<CatalogService<R>>, generator: Arc<G>) -> Self {
        Self { catalog, generator }
    }

    pub async fn ask(&self, request: AiRequest) -> Result<String, AdvisorError> {
        let prompt = ask_prompt(&request.template, &request.text);
        let text = self.generator.generate(&prompt).await?;
        Ok(text)
    }

    pub async fn recommend(
        &self,
        profile: AdvisorRequest,
    ) -> Result<AdvisorRecommendation, AdvisorError> {
        self.recommend_with_source(profile)
            .await
            .map(|(recommendation, _)| recommendation)
    }

    /// Same as [`recommend`](Self::recommend), also reporting which branch produced the answer.
    pub async fn recommend_with_source(
        &self,
        profile: AdvisorRequest,
    ) -> Result<(AdvisorRecommendation, RecommendationSource), AdvisorError> {
        let candidates = self
            .catalog
            .on_blocking_pool(|catalog| catalog.list_universities())
            .await?;
        if candidates.is_empty() {
            return Err(AdvisorError::NoCandidates);
        }

        let prompt = advisor_prompt(&profile, &candidates);
        let fallback_cause = match self.generator.generate(&prompt).await {
            Ok(raw) => match parse_recommendation(&raw) {
                Some(parsed) => match resolve_university(&parsed.university_name, &candidates) {
                    Some(view) => {
                        let reason = parsed.short_reason.trim();
                        let short_reason = if reason.is_empty() {
                            default_reason(&view.university.city)
                        } else {
                            reason.to_string()
                        };
                        info!(
                            university_id = view.university.id,
                            "advisor recommendation accepted from model"
                        );
                        return Ok((
                            AdvisorRecommendation {
                                university_name: view.university.name.clone(),
                                short_reason,
                            },
                            RecommendationSource::Model,
                        ));
                    }
                    None => format!("unknown university '{}'", parsed.university_name),
                },
                None => "unparseable reply".to_string(),
            },
            Err(err) => err.to_string(),
        };

        let Some((view, kind)) = fallback_university(&profile.preferred_city, &candidates) else {
            return Err(AdvisorError::NoCandidates);
        };
        warn!(
            cause = %fallback_cause,
            university_id = view.university.id,
            fallback = ?kind,
            "advisor fell back to heuristic selection"
        );

        let (short_reason, source) = match kind {
            FallbackKind::CityMatch => (
                format!(
                    "{} is located in {}, your preferred city.",
                    view.university.name, view.university.city
                ),
                RecommendationSource::CityMatch,
            ),
            FallbackKind::FirstAvailable => (
                format!(
                    "No university matched your preferred city; {} is the first available option in the directory.",
                    view.university.name
                ),
                RecommendationSource::FirstAvailable,
            ),
        };

        Ok((
            AdvisorRecommendation {
                university_name: view.university.name.clone(),
                short_reason,
            },
            source,
        ))
    }
}

fn default_reason(city: &str) -> String {
    format!("Matches your profile and is located in {city}.")
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("no universities available to recommend")]
    NoCandidates,
    #[error(transparent)]
    Catalog(#[from] CatalogServiceError),
    #[error(transparent)]
    Generator(#[from] AiError),
}
