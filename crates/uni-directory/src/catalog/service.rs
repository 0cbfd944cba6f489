use std::sync::Arc;

use tracing::info;

use super::domain::{
    ensure_positive_id, AdmissionInfo, AdmissionInfoRequest, Program, ProgramRequest, University,
    UniversityRequest, UniversityView, ValidationError,
};
use super::repository::{CatalogRepository, RepositoryError};

/// Validates catalog requests and assembles read models on top of a repository.
pub struct CatalogService<R> {
    repository: Arc<R>,
}

impl<R> CatalogService<R>
where
    R: CatalogRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Runs a catalog call on tokio's blocking pool. Repository calls are
    /// synchronous and must stay off the async workers.
    pub async fn on_blocking_pool<T, F>(
        self: &Arc<Self>,
        call: F,
    ) -> Result<T, CatalogServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&CatalogService<R>) -> Result<T, CatalogServiceError> + Send + 'static,
    {
        let service = Arc::clone(self);
        tokio::task::spawn_blocking(move || call(&service))
            .await
            .map_err(|err| {
                CatalogServiceError::Repository(RepositoryError::Unavailable(format!(
                    "catalog task failed: {err}"
                )))
            })?
    }

    /// Every university with its programs and admission record.
    pub fn list_universities(&self) -> Result<Vec<UniversityView>, CatalogServiceError> {
        let universities = self.repository.list_universities()?;
        universities
            .into_iter()
            .map(|university| self.view(university))
            .collect()
    }

    pub fn get_university(&self, id: i64) -> Result<UniversityView, CatalogServiceError> {
        let id = ensure_positive_id("university_id", id)?;
        let university = self
            .repository
            .fetch_university(id)?
            .ok_or(CatalogServiceError::NotFound("university"))?;
        self.view(university)
    }

    pub fn create_university(
        &self,
        request: UniversityRequest,
    ) -> Result<University, CatalogServiceError> {
        request.validate()?;
        let university = self.repository.insert_university(&request)?;
        info!(university_id = university.id, name = %university.name, "university created");
        Ok(university)
    }

    pub fn update_university(
        &self,
        id: i64,
        request: UniversityRequest,
    ) -> Result<(), CatalogServiceError> {
        let id = ensure_positive_id("university_id", id)?;
        request.validate()?;
        self.repository
            .update_university(id, &request)
            .map_err(|err| not_found_as("university", err))?;
        info!(university_id = id, "university updated");
        Ok(())
    }

    pub fn delete_university(&self, id: i64) -> Result<(), CatalogServiceError> {
        let id = ensure_positive_id("university_id", id)?;
        self.repository
            .delete_university(id)
            .map_err(|err| not_found_as("university", err))?;
        info!(university_id = id, "university deleted");
        Ok(())
    }

    pub fn list_programs(&self) -> Result<Vec<Program>, CatalogServiceError> {
        Ok(self.repository.list_programs()?)
    }

    pub fn get_program(&self, id: i64) -> Result<Program, CatalogServiceError> {
        let id = ensure_positive_id("program_id", id)?;
        self.repository
            .fetch_program(id)?
            .ok_or(CatalogServiceError::NotFound("program"))
    }

    pub fn create_program(&self, request: ProgramRequest) -> Result<Program, CatalogServiceError> {
        request.validate()?;
        self.ensure_university_exists(request.university_id)?;
        let program = self.repository.insert_program(&request)?;
        info!(
            program_id = program.id,
            university_id = program.university_id,
            "program created"
        );
        Ok(program)
    }

    pub fn update_program(
        &self,
        id: i64,
        request: ProgramRequest,
    ) -> Result<(), CatalogServiceError> {
        let id = ensure_positive_id("program_id", id)?;
        request.validate()?;
        self.ensure_university_exists(request.university_id)?;
        self.repository
            .update_program(id, &request)
            .map_err(|err| not_found_as("program", err))?;
        info!(program_id = id, "program updated");
        Ok(())
    }

    pub fn delete_program(&self, id: i64) -> Result<(), CatalogServiceError> {
        let id = ensure_positive_id("program_id", id)?;
        self.repository
            .delete_program(id)
            .map_err(|err| not_found_as("program", err))?;
        info!(program_id = id, "program deleted");
        Ok(())
    }

    pub fn list_admissions(&self) -> Result<Vec<AdmissionInfo>, CatalogServiceError> {
        Ok(self.repository.list_admissions()?)
    }

    pub fn get_admission(&self, id: i64) -> Result<AdmissionInfo, CatalogServiceError> {
        let id = ensure_positive_id("admission_id", id)?;
        self.repository
            .fetch_admission(id)?
            .ok_or(CatalogServiceError::NotFound("admission"))
    }

    pub fn create_admission(
        &self,
        request: AdmissionInfoRequest,
    ) -> Result<AdmissionInfo, CatalogServiceError> {
        request.validate()?;
        if let Some(university_id) = request.university_id {
            self.ensure_university_exists(university_id)?;
        }
        let admission = self.repository.insert_admission(&request)?;
        info!(
            admission_id = admission.id,
            university_id = ?admission.university_id,
            "admission info created"
        );
        Ok(admission)
    }

    pub fn update_admission(
        &self,
        id: i64,
        request: AdmissionInfoRequest,
    ) -> Result<(), CatalogServiceError> {
        let id = ensure_positive_id("admission_id", id)?;
        request.validate()?;
        if let Some(university_id) = request.university_id {
            self.ensure_university_exists(university_id)?;
        }
        self.repository
            .update_admission(id, &request)
            .map_err(|err| not_found_as("admission", err))?;
        info!(admission_id = id, "admission info updated");
        Ok(())
    }

    pub fn delete_admission(&self, id: i64) -> Result<(), CatalogServiceError> {
        let id = ensure_positive_id("admission_id", id)?;
        self.repository
            .delete_admission(id)
            .map_err(|err| not_found_as("admission", err))?;
        info!(admission_id = id, "admission info deleted");
        Ok(())
    }

    fn view(&self, university: University) -> Result<UniversityView, CatalogServiceError> {
        let programs = self.repository.programs_for(university.id)?;
        let admission_info = self.repository.admission_for(university.id)?;
        Ok(UniversityView {
            university,
            programs,
            admission_info,
        })
    }

    fn ensure_university_exists(&self, university_id: i64) -> Result<(), CatalogServiceError> {
        match self.repository.fetch_university(university_id)? {
            Some(_) => Ok(()),
            None => Err(CatalogServiceError::Validation(ValidationError::new(format!(
                "university {university_id} does not exist"
            )))),
        }
    }
}

fn not_found_as(entity: &'static str, err: RepositoryError) -> CatalogServiceError {
    match err {
        RepositoryError::NotFound => CatalogServiceError::NotFound(entity),
        other => CatalogServiceError::Repository(other),
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
