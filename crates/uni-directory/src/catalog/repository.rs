use super::domain::{
    AdmissionInfo, AdmissionInfoRequest, Program, ProgramRequest, University, UniversityRequest,
};

/// Storage abstraction so the catalog service can be exercised in isolation.
pub trait CatalogRepository: Send + Sync {
    fn list_universities(&self) -> Result<Vec<University>, RepositoryError>;
    fn fetch_university(&self, id: i64) -> Result<Option<University>, RepositoryError>;
    fn insert_university(&self, request: &UniversityRequest) -> Result<University, RepositoryError>;
    fn update_university(&self, id: i64, request: &UniversityRequest)
        -> Result<(), RepositoryError>;
    fn delete_university(&self, id: i64) -> Result<(), RepositoryError>;

    fn list_programs(&self) -> Result<Vec<Program>, RepositoryError>;
    fn programs_for(&self, university_id: i64) -> Result<Vec<Program>, RepositoryError>;
    fn fetch_program(&self, id: i64) -> Result<Option<Program>, RepositoryError>;
    fn insert_program(&self, request: &ProgramRequest) -> Result<Program, RepositoryError>;
    fn update_program(&self, id: i64, request: &ProgramRequest) -> Result<(), RepositoryError>;
    fn delete_program(&self, id: i64) -> Result<(), RepositoryError>;

    fn list_admissions(&self) -> Result<Vec<AdmissionInfo>, RepositoryError>;
    fn admission_for(&self, university_id: i64) -> Result<Option<AdmissionInfo>, RepositoryError>;
    fn fetch_admission(&self, id: i64) -> Result<Option<AdmissionInfo>, RepositoryError>;
    fn insert_admission(
        &self,
        request: &AdmissionInfoRequest,
    ) -> Result<AdmissionInfo, RepositoryError>;
    fn update_admission(
        &self,
        id: i64,
        request: &AdmissionInfoRequest,
    ) -> Result<(), RepositoryError>;
    fn delete_admission(&self, id: i64) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
