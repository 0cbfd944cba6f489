use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ai::advisor::{AdvisorRequest, AdvisorService};
use crate::ai::client::{AiError, TextGenerator};
use crate::catalog::domain::UniversityRequest;
use crate::catalog::repository::CatalogRepository;
use crate::catalog::service::CatalogService;
use crate::catalog::sqlite::SqliteCatalogRepository;

/// Replays a fixed reply and records every prompt it receives.
#[derive(Debug)]
pub(super) struct ScriptedGenerator {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub(super) fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        self.reply.clone().map_err(AiError::Transport)
    }
}

pub(super) fn university(name: &str, city: &str) -> UniversityRequest {
    UniversityRequest {
        name: name.to_string(),
        description: format!("{name} description"),
        mission_text: "Mission".to_string(),
        logo_url: "https://example.edu/logo.png".to_string(),
        tour_url: None,
        city: city.to_string(),
        min_ent_score: 75,
        has_dormitory: true,
        rating: 4.2,
        has_tour: false,
        history: "History".to_string(),
        languages: "Kazakh, Russian".to_string(),
        number_of_grants: 300,
        exchange_program: false,
        double_degree_program: false,
        ielts_certificate: false,
        format: "public".to_string(),
        price: 1_200_000,
    }
}

pub(super) fn profile(preferred_city: &str) -> AdvisorRequest {
    AdvisorRequest {
        ent_score: 110,
        profile_subjects: "Math, Informatics".to_string(),
        interests: "machine learning".to_string(),
        preferred_city: preferred_city.to_string(),
        career_goal: "data scientist".to_string(),
    }
}

/// Catalog seeded with Nazarbayev University (Astana), KBTU (Almaty), and
/// Satbayev University (Almaty), in that order.
pub(super) fn seeded_catalog() -> Arc<CatalogService<SqliteCatalogRepository>> {
    let repository = Arc::new(SqliteCatalogRepository::in_memory().expect("in-memory store"));
    for (name, city) in [
        ("Nazarbayev University", "Astana"),
        ("KBTU", "Almaty"),
        ("Satbayev University", "Almaty"),
    ] {
        repository
            .insert_university(&university(name, city))
            .expect("seed university");
    }
    Arc::new(CatalogService::new(repository))
}

pub(super) fn empty_catalog() -> Arc<CatalogService<SqliteCatalogRepository>> {
    let repository = Arc::new(SqliteCatalogRepository::in_memory().expect("in-memory store"));
    Arc::new(CatalogService::new(repository))
}

pub(super) fn advisor(
    catalog: Arc<CatalogService<SqliteCatalogRepository>>,
    generator: ScriptedGenerator,
) -> (
    AdvisorService<SqliteCatalogRepository, ScriptedGenerator>,
    Arc<ScriptedGenerator>,
) {
    let generator = Arc::new(generator);
    (AdvisorService::new(catalog, generator.clone()), generator)
}
