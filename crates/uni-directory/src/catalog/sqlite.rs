use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::domain::{
    AdmissionInfo, AdmissionInfoRequest, Program, ProgramRequest, University, UniversityRequest,
};
use super::repository::{CatalogRepository, RepositoryError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS universities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    mission_text TEXT NOT NULL,
    history TEXT NOT NULL,
    min_ent_score INTEGER NOT NULL,
    logo_url TEXT NOT NULL,
    tour_url TEXT,
    city TEXT NOT NULL,
    has_dormitory INTEGER NOT NULL DEFAULT 0,
    rating REAL NOT NULL,
    has_tour INTEGER NOT NULL DEFAULT 0,
    languages TEXT NOT NULL,
    number_of_grants INTEGER NOT NULL,
    exchange_program INTEGER NOT NULL DEFAULT 0,
    double_degree_program INTEGER NOT NULL DEFAULT 0,
    ielts_certificate INTEGER NOT NULL DEFAULT 0,
    format TEXT NOT NULL,
    price INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS programs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    university_id INTEGER NOT NULL REFERENCES universities(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    degree TEXT NOT NULL,
    price INTEGER NOT NULL,
    duration INTEGER NOT NULL,
    language TEXT NOT NULL,
    min_ent_score INTEGER NOT NULL,
    internship INTEGER NOT NULL DEFAULT 0,
    double_degree_program INTEGER NOT NULL DEFAULT 0,
    employment INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_programs_university_id ON programs (university_id);
CREATE TABLE IF NOT EXISTS admission_info (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    university_id INTEGER UNIQUE REFERENCES universities(id) ON DELETE CASCADE,
    deadline_date TEXT,
    requirements_text TEXT NOT NULL
);
";

const UNIVERSITY_COLUMNS: &str = "id, name, description, mission_text, history, min_ent_score, \
    logo_url, tour_url, city, has_dormitory, rating, has_tour, languages, number_of_grants, \
    exchange_program, double_degree_program, ielts_certificate, format, price";

const PROGRAM_COLUMNS: &str = "id, university_id, name, description, degree, price, duration, \
    language, min_ent_score, internship, double_degree_program, employment";

const ADMISSION_COLUMNS: &str = "id, university_id, deadline_date, requirements_text";

/// Catalog storage backed by a single SQLite connection.
pub struct SqliteCatalogRepository {
    connection: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteCatalogRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCatalogRepository")
            .finish_non_exhaustive()
    }
}

impl SqliteCatalogRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening catalog database");
        let connection = Connection::open(path).map_err(db_error)?;
        Self::initialize(connection)
    }

    pub fn in_memory() -> Result<Self, RepositoryError> {
        let connection = Connection::open_in_memory().map_err(db_error)?;
        Self::initialize(connection)
    }

    fn initialize(connection: Connection) -> Result<Self, RepositoryError> {
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(db_error)?;
        connection.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.connection
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection mutex poisoned".to_string()))
    }

    fn query_all<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, RepositoryError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql).map_err(db_error)?;
        let rows = stmt.query_map(params, map).map_err(db_error)?;
        rows.collect::<rusqlite::Result<Vec<T>>>().map_err(db_error)
    }

    fn query_one<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Option<T>, RepositoryError> {
        let conn = self.connection()?;
        conn.query_row(sql, params, map)
            .optional()
            .map_err(db_error)
    }

    fn execute_existing(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        let changed = conn.execute(sql, params).map_err(db_error)?;
        if changed == 0 {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }
}

impl CatalogRepository for SqliteCatalogRepository {
    fn list_universities(&self) -> Result<Vec<University>, RepositoryError> {
        self.query_all(
            &format!("SELECT {UNIVERSITY_COLUMNS} FROM universities ORDER BY id"),
            [],
            university_from_row,
        )
    }

    fn fetch_university(&self, id: i64) -> Result<Option<University>, RepositoryError> {
        self.query_one(
            &format!("SELECT {UNIVERSITY_COLUMNS} FROM universities WHERE id = ?1"),
            [id],
            university_from_row,
        )
    }

    fn insert_university(&self, request: &UniversityRequest) -> Result<University, RepositoryError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO universities (name, description, mission_text, history, min_ent_score, \
             logo_url, tour_url, city, has_dormitory, rating, has_tour, languages, \
             number_of_grants, exchange_program, double_degree_program, ielts_certificate, \
             format, price) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                request.name,
                request.description,
                request.mission_text,
                request.history,
                request.min_ent_score,
                request.logo_url,
                request.tour_url,
                request.city,
                request.has_dormitory,
                request.rating,
                request.has_tour,
                request.languages,
                request.number_of_grants,
                request.exchange_program,
                request.double_degree_program,
                request.ielts_certificate,
                request.format,
                request.price,
            ],
        )
        .map_err(db_error)?;
        Ok(university_from_request(conn.last_insert_rowid(), request))
    }

    fn update_university(
        &self,
        id: i64,
        request: &UniversityRequest,
    ) -> Result<(), RepositoryError> {
        self.execute_existing(
            "UPDATE universities SET name = ?1, description = ?2, mission_text = ?3, \
             history = ?4, min_ent_score = ?5, logo_url = ?6, tour_url = ?7, city = ?8, \
             has_dormitory = ?9, rating = ?10, has_tour = ?11, languages = ?12, \
             number_of_grants = ?13, exchange_program = ?14, double_degree_program = ?15, \
             ielts_certificate = ?16, format = ?17, price = ?18 WHERE id = ?19",
            params![
                request.name,
                request.description,
                request.mission_text,
                request.history,
                request.min_ent_score,
                request.logo_url,
                request.tour_url,
                request.city,
                request.has_dormitory,
                request.rating,
                request.has_tour,
                request.languages,
                request.number_of_grants,
                request.exchange_program,
                request.double_degree_program,
                request.ielts_certificate,
                request.format,
                request.price,
                id,
            ],
        )
    }

    fn delete_university(&self, id: i64) -> Result<(), RepositoryError> {
        self.execute_existing("DELETE FROM universities WHERE id = ?1", [id])
    }

    fn list_programs(&self) -> Result<Vec<Program>, RepositoryError> {
        self.query_all(
            &format!("SELECT {PROGRAM_COLUMNS} FROM programs ORDER BY id"),
            [],
            program_from_row,
        )
    }

    fn programs_for(&self, university_id: i64) -> Result<Vec<Program>, RepositoryError> {
        self.query_all(
            &format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE university_id = ?1 ORDER BY id"),
            [university_id],
            program_from_row,
        )
    }

    fn fetch_program(&self, id: i64) -> Result<Option<Program>, RepositoryError> {
        self.query_one(
            &format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = ?1"),
            [id],
            program_from_row,
        )
    }

    fn insert_program(&self, request: &ProgramRequest) -> Result<Program, RepositoryError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO programs (university_id, name, description, degree, price, duration, \
             language, min_ent_score, internship, double_degree_program, employment) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                request.university_id,
                request.name,
                request.description,
                request.degree,
                request.price,
                request.duration,
                request.language,
                request.min_ent_score,
                request.internship,
                request.double_degree_program,
                request.employment,
            ],
        )
        .map_err(db_error)?;
        Ok(program_from_request(conn.last_insert_rowid(), request))
    }

    fn update_program(&self, id: i64, request: &ProgramRequest) -> Result<(), RepositoryError> {
        self.execute_existing(
            "UPDATE programs SET university_id = ?1, name = ?2, description = ?3, degree = ?4, \
             price = ?5, duration = ?6, language = ?7, min_ent_score = ?8, internship = ?9, \
             double_degree_program = ?10, employment = ?11 WHERE id = ?12",
            params![
                request.university_id,
                request.name,
                request.description,
                request.degree,
                request.price,
                request.duration,
                request.language,
                request.min_ent_score,
                request.internship,
                request.double_degree_program,
                request.employment,
                id,
            ],
        )
    }

    fn delete_program(&self, id: i64) -> Result<(), RepositoryError> {
        self.execute_existing("DELETE FROM programs WHERE id = ?1", [id])
    }

    fn list_admissions(&self) -> Result<Vec<AdmissionInfo>, RepositoryError> {
        self.query_all(
            &format!("SELECT {ADMISSION_COLUMNS} FROM admission_info ORDER BY id"),
            [],
            admission_from_row,
        )
    }

    fn admission_for(&self, university_id: i64) -> Result<Option<AdmissionInfo>, RepositoryError> {
        self.query_one(
            &format!("SELECT {ADMISSION_COLUMNS} FROM admission_info WHERE university_id = ?1"),
            [university_id],
            admission_from_row,
        )
    }

    fn fetch_admission(&self, id: i64) -> Result<Option<AdmissionInfo>, RepositoryError> {
        self.query_one(
            &format!("SELECT {ADMISSION_COLUMNS} FROM admission_info WHERE id = ?1"),
            [id],
            admission_from_row,
        )
    }

    fn insert_admission(
        &self,
        request: &AdmissionInfoRequest,
    ) -> Result<AdmissionInfo, RepositoryError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO admission_info (university_id, deadline_date, requirements_text) \
             VALUES (?1, ?2, ?3)",
            params![
                request.university_id,
                request.deadline_date,
                request.requirements_text,
            ],
        )
        .map_err(db_error)?;
        Ok(AdmissionInfo {
            id: conn.last_insert_rowid(),
            university_id: request.university_id,
            deadline_date: request.deadline_date,
            requirements_text: request.requirements_text.clone(),
        })
    }

    fn update_admission(
        &self,
        id: i64,
        request: &AdmissionInfoRequest,
    ) -> Result<(), RepositoryError> {
        self.execute_existing(
            "UPDATE admission_info SET university_id = ?1, deadline_date = ?2, \
             requirements_text = ?3 WHERE id = ?4",
            params![
                request.university_id,
                request.deadline_date,
                request.requirements_text,
                id,
            ],
        )
    }

    fn delete_admission(&self, id: i64) -> Result<(), RepositoryError> {
        self.execute_existing("DELETE FROM admission_info WHERE id = ?1", [id])
    }
}

fn db_error(err: rusqlite::Error) -> RepositoryError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepositoryError::Conflict
        }
        _ => RepositoryError::Unavailable(err.to_string()),
    }
}

fn university_from_row(row: &Row<'_>) -> rusqlite::Result<University> {
    Ok(University {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        mission_text: row.get(3)?,
        history: row.get(4)?,
        min_ent_score: row.get(5)?,
        logo_url: row.get(6)?,
        tour_url: row.get(7)?,
        city: row.get(8)?,
        has_dormitory: row.get(9)?,
        rating: row.get(10)?,
        has_tour: row.get(11)?,
        languages: row.get(12)?,
        number_of_grants: row.get(13)?,
        exchange_program: row.get(14)?,
        double_degree_program: row.get(15)?,
        ielts_certificate: row.get(16)?,
        format: row.get(17)?,
        price: row.get(18)?,
    })
}

fn program_from_row(row: &Row<'_>) -> rusqlite::Result<Program> {
    Ok(Program {
        id: row.get(0)?,
        university_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        degree: row.get(4)?,
        price: row.get(5)?,
        duration: row.get(6)?,
        language: row.get(7)?,
        min_ent_score: row.get(8)?,
        internship: row.get(9)?,
        double_degree_program: row.get(10)?,
        employment: row.get(11)?,
    })
}

fn admission_from_row(row: &Row<'_>) -> rusqlite::Result<AdmissionInfo> {
    Ok(AdmissionInfo {
        id: row.get(0)?,
        university_id: row.get(1)?,
        deadline_date: row.get(2)?,
        requirements_text: row.get(3)?,
    })
}

fn university_from_request(id: i64, request: &UniversityRequest) -> University {
    let UniversityRequest {
        name,
        description,
        mission_text,
        logo_url,
        tour_url,
        city,
        min_ent_score,
        has_dormitory,
        rating,
        has_tour,
        history,
        languages,
        number_of_grants,
        exchange_program,
        double_degree_program,
        ielts_certificate,
        format,
        price,
    } = request.clone();

    University {
        id,
        name,
        description,
        mission_text,
        history,
        min_ent_score,
        logo_url,
        tour_url,
        city,
        has_dormitory,
        rating,
        has_tour,
        languages,
        number_of_grants,
        exchange_program,
        double_degree_program,
        ielts_certificate,
        format,
        price,
    }
}

fn program_from_request(id: i64, request: &ProgramRequest) -> Program {
    Program {
        id,
        university_id: request.university_id,
        name: request.name.clone(),
        description: request.description.clone(),
        degree: request.degree.clone(),
        price: request.price,
        duration: request.duration,
        language: request.language.clone(),
        min_ent_score: request.min_ent_score,
        internship: request.internship,
        double_degree_program: request.double_degree_program,
        employment: request.employment,
    }
}
