use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_UNIVERSITY_NAME_CHARS: usize = 255;
pub const MAX_CITY_CHARS: usize = 100;
/// Upper bound of the national entrance test (ENT) scale.
pub const MAX_ENT_SCORE: i64 = 140;

/// Stored university row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub mission_text: String,
    pub history: String,
    pub min_ent_score: i64,
    pub logo_url: String,
    pub tour_url: Option<String>,
    pub city: String,
    pub has_dormitory: bool,
    pub rating: f64,
    pub has_tour: bool,
    pub languages: String,
    pub number_of_grants: i64,
    pub exchange_program: bool,
    pub double_degree_program: bool,
    #[serde(rename = "IELTS_sertificate")]
    pub ielts_certificate: bool,
    pub format: String,
    pub price: i64,
}

/// Stored academic program, owned by a university through `university_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub university_id: i64,
    pub name: String,
    pub description: String,
    pub degree: String,
    pub price: i64,
    pub duration: i64,
    pub language: String,
    pub min_ent_score: i64,
    pub internship: bool,
    pub double_degree_program: bool,
    pub employment: i64,
}

/// Admissions metadata. At most one record may point at a given university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionInfo {
    pub id: i64,
    pub university_id: Option<i64>,
    pub deadline_date: Option<NaiveDate>,
    pub requirements_text: String,
}

/// Read model for the university endpoints: the row plus everything hanging off it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniversityView {
    #[serde(flatten)]
    pub university: University,
    pub programs: Vec<Program>,
    pub admission_info: Option<AdmissionInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversityRequest {
    pub name: String,
    pub description: String,
    pub mission_text: String,
    pub logo_url: String,
    #[serde(default)]
    pub tour_url: Option<String>,
    pub city: String,
    pub min_ent_score: i64,
    #[serde(default)]
    pub has_dormitory: bool,
    pub rating: f64,
    #[serde(default)]
    pub has_tour: bool,
    pub history: String,
    pub languages: String,
    pub number_of_grants: i64,
    #[serde(default)]
    pub exchange_program: bool,
    #[serde(default)]
    pub double_degree_program: bool,
    #[serde(default, rename = "IELTS_sertificate")]
    pub ielts_certificate: bool,
    pub format: String,
    pub price: i64,
}

impl UniversityRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_chars = self.name.trim().chars().count();
        if name_chars == 0 {
            return Err(ValidationError::new("name must not be empty"));
        }
        if name_chars > MAX_UNIVERSITY_NAME_CHARS {
            return Err(ValidationError::new(format!(
                "name must be at most {MAX_UNIVERSITY_NAME_CHARS} characters"
            )));
        }
        let city_chars = self.city.trim().chars().count();
        if city_chars == 0 {
            return Err(ValidationError::new("city must not be empty"));
        }
        if city_chars > MAX_CITY_CHARS {
            return Err(ValidationError::new(format!(
                "city must be at most {MAX_CITY_CHARS} characters"
            )));
        }
        if !(0..=MAX_ENT_SCORE).contains(&self.min_ent_score) {
            return Err(ValidationError::new(format!(
                "min_ent_score must be between 0 and {MAX_ENT_SCORE}"
            )));
        }
        if !(self.rating > -1.0 && self.rating < 6.0) {
            return Err(ValidationError::new(
                "rating must be greater than -1 and less than 6",
            ));
        }
        if self.number_of_grants < 0 {
            return Err(ValidationError::new("number_of_grants must not be negative"));
        }
        if self.price < 0 {
            return Err(ValidationError::new("price must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRequest {
    pub university_id: i64,
    pub name: String,
    pub description: String,
    pub degree: String,
    pub price: i64,
    pub duration: i64,
    pub language: String,
    pub min_ent_score: i64,
    #[serde(default)]
    pub internship: bool,
    #[serde(default)]
    pub double_degree_program: bool,
    pub employment: i64,
}

impl ProgramRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("program name must not be empty"));
        }
        if self.university_id <= 0 {
            return Err(ValidationError::new("university_id must be greater than 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionInfoRequest {
    #[serde(default)]
    pub university_id: Option<i64>,
    #[serde(default)]
    pub deadline_date: Option<NaiveDate>,
    pub requirements_text: String,
}

impl AdmissionInfoRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.university_id {
            Some(id) if id <= 0 => Err(ValidationError::new(
                "university_id must be greater than 0",
            )),
            _ => Ok(()),
        }
    }
}

/// Rejected request payload or path parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Path ids follow the store's positive integer keys.
pub fn ensure_positive_id(field: &str, id: i64) -> Result<i64, ValidationError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ValidationError::new(format!("{field} must be greater than 0")))
    }
}
