//! Bulk import of universities, with their programs and admission record, from JSON.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::catalog::{
    AdmissionInfoRequest, CatalogRepository, CatalogService, CatalogServiceError, ProgramRequest,
    UniversityRequest,
};

/// One university entry of a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUniversity {
    #[serde(flatten)]
    pub university: UniversityRequest,
    #[serde(default)]
    pub programs: Vec<SeedProgram>,
    #[serde(default)]
    pub admission: Option<SeedAdmission>,
}

/// Program entry; the owning university is implied by nesting.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProgram {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub degree: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub min_ent_score: i64,
    #[serde(default)]
    pub internship: bool,
    #[serde(default)]
    pub double_degree_program: bool,
    #[serde(default)]
    pub employment: i64,
}

impl SeedProgram {
    fn into_request(self, university_id: i64) -> ProgramRequest {
        ProgramRequest {
            university_id,
            name: self.name,
            description: self.description,
            degree: self.degree,
            price: self.price,
            duration: self.duration,
            language: self.language,
            min_ent_score: self.min_ent_score,
            internship: self.internship,
            double_degree_program: self.double_degree_program,
            employment: self.employment,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAdmission {
    #[serde(default)]
    pub deadline_date: Option<NaiveDate>,
    pub requirements_text: String,
}

/// Counts of records written by a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub universities: usize,
    pub programs: usize,
    pub admissions: usize,
}

#[derive(Debug)]
pub enum SeedError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Catalog {
        university: String,
        source: CatalogServiceError,
    },
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Io(err) => write!(f, "failed to read seed file: {}", err),
            SeedError::Json(err) => write!(f, "invalid seed JSON: {}", err),
            SeedError::Catalog { university, source } => {
                write!(f, "could not seed '{}': {}", university, source)
            }
        }
    }
}

impl std::error::Error for SeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeedError::Io(err) => Some(err),
            SeedError::Json(err) => Some(err),
            SeedError::Catalog { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for SeedError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub struct CatalogSeeder;

impl CatalogSeeder {
    pub fn from_path<P, R>(
        path: P,
        catalog: &CatalogService<R>,
    ) -> Result<SeedSummary, SeedError>
    where
        P: AsRef<Path>,
        R: CatalogRepository + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, catalog)
    }

    pub fn from_reader<Rd, R>(reader: Rd, catalog: &CatalogService<R>) -> Result<SeedSummary, SeedError>
    where
        Rd: Read,
        R: CatalogRepository + 'static,
    {
        let entries: Vec<SeedUniversity> = serde_json::from_reader(reader)?;
        Self::apply(entries, catalog)
    }

    /// Entries are written in file order; the first failure stops the run.
    pub fn apply<R>(
        entries: Vec<SeedUniversity>,
        catalog: &CatalogService<R>,
    ) -> Result<SeedSummary, SeedError>
    where
        R: CatalogRepository + 'static,
    {
        let mut summary = SeedSummary::default();

        for entry in entries {
            let name = entry.university.name.clone();
            let wrap = |source: CatalogServiceError| SeedError::Catalog {
                university: name.clone(),
                source,
            };

            let university = catalog.create_university(entry.university).map_err(wrap)?;
            summary.universities += 1;

            for program in entry.programs {
                catalog
                    .create_program(program.into_request(university.id))
                    .map_err(wrap)?;
                summary.programs += 1;
            }

            if let Some(admission) = entry.admission {
                catalog
                    .create_admission(AdmissionInfoRequest {
                        university_id: Some(university.id),
                        deadline_date: admission.deadline_date,
                        requirements_text: admission.requirements_text,
                    })
                    .map_err(wrap)?;
                summary.admissions += 1;
            }
        }

        info!(
            universities = summary.universities,
            programs = summary.programs,
            admissions = summary.admissions,
            "catalog seeded"
        );
        Ok(summary)
    }
}
