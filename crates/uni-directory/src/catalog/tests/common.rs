use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::catalog::domain::{
    AdmissionInfo, AdmissionInfoRequest, Program, ProgramRequest, University, UniversityRequest,
};
use crate::catalog::repository::{CatalogRepository, RepositoryError};
use crate::catalog::service::CatalogService;
use crate::catalog::sqlite::SqliteCatalogRepository;

pub(super) fn university_request(name: &str, city: &str) -> UniversityRequest {
    UniversityRequest {
        name: name.to_string(),
        description: "Research university with strong engineering faculties".to_string(),
        mission_text: "Educate leaders for the region".to_string(),
        logo_url: "https://example.edu/logo.png".to_string(),
        tour_url: Some("https://example.edu/tour".to_string()),
        city: city.to_string(),
        min_ent_score: 85,
        has_dormitory: true,
        rating: 4.6,
        has_tour: true,
        history: "Founded in 1934".to_string(),
        languages: "Kazakh, Russian, English".to_string(),
        number_of_grants: 1200,
        exchange_program: true,
        double_degree_program: false,
        ielts_certificate: true,
        format: "public".to_string(),
        price: 1_800_000,
    }
}

pub(super) fn program_request(university_id: i64, name: &str) -> ProgramRequest {
    ProgramRequest {
        university_id,
        name: name.to_string(),
        description: "Four year undergraduate track".to_string(),
        degree: "Bachelor".to_string(),
        price: 1_500_000,
        duration: 4,
        language: "English".to_string(),
        min_ent_score: 90,
        internship: true,
        double_degree_program: false,
        employment: 87,
    }
}

pub(super) fn admission_request(university_id: Option<i64>) -> AdmissionInfoRequest {
    AdmissionInfoRequest {
        university_id,
        deadline_date: Some(NaiveDate::from_ymd_opt(2026, 7, 20).expect("valid date")),
        requirements_text: "ENT certificate, ID card, medical form 075".to_string(),
    }
}

pub(super) fn build_service() -> (
    CatalogService<SqliteCatalogRepository>,
    Arc<SqliteCatalogRepository>,
) {
    let repository = Arc::new(SqliteCatalogRepository::in_memory().expect("in-memory store"));
    let service = CatalogService::new(repository.clone());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl CatalogRepository for UnavailableRepository {
    fn list_universities(&self) -> Result<Vec<University>, RepositoryError> {
        offline()
    }

    fn fetch_university(&self, _id: i64) -> Result<Option<University>, RepositoryError> {
        offline()
    }

    fn insert_university(
        &self,
        _request: &UniversityRequest,
    ) -> Result<University, RepositoryError> {
        offline()
    }

    fn update_university(
        &self,
        _id: i64,
        _request: &UniversityRequest,
    ) -> Result<(), RepositoryError> {
        offline()
    }

    fn delete_university(&self, _id: i64) -> Result<(), RepositoryError> {
        offline()
    }

    fn list_programs(&self) -> Result<Vec<Program>, RepositoryError> {
        offline()
    }

    fn programs_for(&self, _university_id: i64) -> Result<Vec<Program>, RepositoryError> {
        offline()
    }

    fn fetch_program(&self, _id: i64) -> Result<Option<Program>, RepositoryError> {
        offline()
    }

    fn insert_program(&self, _request: &ProgramRequest) -> Result<Program, RepositoryError> {
        offline()
    }

    fn update_program(&self, _id: i64, _request: &ProgramRequest) -> Result<(), RepositoryError> {
        offline()
    }

    fn delete_program(&self, _id: i64) -> Result<(), RepositoryError> {
        offline()
    }

    fn list_admissions(&self) -> Result<Vec<AdmissionInfo>, RepositoryError> {
        offline()
    }

    fn admission_for(&self, _university_id: i64) -> Result<Option<AdmissionInfo>, RepositoryError> {
        offline()
    }

    fn fetch_admission(&self, _id: i64) -> Result<Option<AdmissionInfo>, RepositoryError> {
        offline()
    }

    fn insert_admission(
        &self,
        _request: &AdmissionInfoRequest,
    ) -> Result<AdmissionInfo, RepositoryError> {
        offline()
    }

    fn update_admission(
        &self,
        _id: i64,
        _request: &AdmissionInfoRequest,
    ) -> Result<(), RepositoryError> {
        offline()
    }

    fn delete_admission(&self, _id: i64) -> Result<(), RepositoryError> {
        offline()
    }
}
