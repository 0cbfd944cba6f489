//! University catalog: records, storage, validation, and the `/api` CRUD surface.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use domain::{
    AdmissionInfo, AdmissionInfoRequest, Program, ProgramRequest, University, UniversityRequest,
    UniversityView, ValidationError,
};
pub use repository::{CatalogRepository, RepositoryError};
pub use router::catalog_router;
pub use service::{CatalogService, CatalogServiceError};
pub use sqlite::SqliteCatalogRepository;
