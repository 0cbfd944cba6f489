use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use crate::extract::{ApiJson, ApiPath};

use super::domain::{AdmissionInfoRequest, ProgramRequest, UniversityRequest};
use super::repository::{CatalogRepository, RepositoryError};
use super::service::{CatalogService, CatalogServiceError};

/// Router builder exposing the university, program, and admission endpoints under `/api`.
pub fn catalog_router<R>(service: Arc<CatalogService<R>>) -> Router
where
    R: CatalogRepository + 'static,
{
    Router::new()
        .route(
            "/api",
            get(list_universities_handler::<R>).post(create_university_handler::<R>),
        )
        .route(
            "/api/",
            get(list_universities_handler::<R>).post(create_university_handler::<R>),
        )
        .route(
            "/api/get/:university_id",
            get(get_university_handler::<R>).put(update_university_handler::<R>),
        )
        .route("/api/:university_id", delete(delete_university_handler::<R>))
        .route(
            "/api/programs",
            get(list_programs_handler::<R>).post(create_program_handler::<R>),
        )
        .route(
            "/api/programs/get/:program_id",
            get(get_program_handler::<R>)
                .put(update_program_handler::<R>)
                .delete(delete_program_handler::<R>),
        )
        .route("/api/admissions", get(list_admissions_handler::<R>))
        .route(
            "/api/admission",
            axum::routing::post(create_admission_handler::<R>),
        )
        .route(
            "/api/admissions/get/:admission_id",
            get(get_admission_handler::<R>)
                .put(update_admission_handler::<R>)
                .delete(delete_admission_handler::<R>),
        )
        .with_state(service)
}

type CatalogState<R> = State<Arc<CatalogService<R>>>;

pub(crate) fn error_response(err: CatalogServiceError) -> Response {
    let status = match &err {
        CatalogServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CatalogServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CatalogServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CatalogServiceError::Repository(RepositoryError::Unavailable(reason)) => {
            error!(%reason, "catalog store unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, CatalogServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => error_response(err),
    }
}

fn no_content(result: Result<(), CatalogServiceError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_universities_handler<R>(State(service): CatalogState<R>) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.list_universities())
        .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn get_university_handler<R>(
    State(service): CatalogState<R>,
    ApiPath(university_id): ApiPath<i64>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.get_university(university_id))
        .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn create_university_handler<R>(
    State(service): CatalogState<R>,
    ApiJson(request): ApiJson<UniversityRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.create_university(request))
        .await;
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn update_university_handler<R>(
    State(service): CatalogState<R>,
    ApiPath(university_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UniversityRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.update_university(university_id, request))
        .await;
    no_content(result)
}

pub(crate) async fn delete_university_handler<R>(
    State(service): CatalogState<R>,
    ApiPath(university_id): ApiPath<i64>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.delete_university(university_id))
        .await;
    no_content(result)
}

pub(crate) async fn list_programs_handler<R>(State(service): CatalogState<R>) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.list_programs())
        .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn get_program_handler<R>(
    State(service): CatalogState<R>,
    ApiPath(program_id): ApiPath<i64>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.get_program(program_id))
        .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn create_program_handler<R>(
    State(service): CatalogState<R>,
    ApiJson(request): ApiJson<ProgramRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.create_program(request))
        .await;
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn update_program_handler<R>(
    State(service): CatalogState<R>,
    ApiPath(program_id): ApiPath<i64>,
    ApiJson(request): ApiJson<ProgramRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.update_program(program_id, request))
        .await;
    no_content(result)
}

pub(crate) async fn delete_program_handler<R>(
    State(service): CatalogState<R>,
    ApiPath(program_id): ApiPath<i64>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.delete_program(program_id))
        .await;
    no_content(result)
}

pub(crate) async fn list_admissions_handler<R>(State(service): CatalogState<R>) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.list_admissions())
        .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn get_admission_handler<R>(
    State(service): CatalogState<R>,
    ApiPath(admission_id): ApiPath<i64>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.get_admission(admission_id))
        .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn create_admission_handler<R>(
    State(service): CatalogState<R>,
    ApiJson(request): ApiJson<AdmissionInfoRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.create_admission(request))
        .await;
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn update_admission_handler<R>(
    State(service): CatalogState<R>,
    ApiPath(admission_id): ApiPath<i64>,
    ApiJson(request): ApiJson<AdmissionInfoRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.update_admission(admission_id, request))
        .await;
    no_content(result)
}

pub(crate) async fn delete_admission_handler<R>(
    State(service): CatalogState<R>,
    ApiPath(admission_id): ApiPath<i64>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let result = service
        .on_blocking_pool(move |catalog| catalog.delete_admission(admission_id))
        .await;
    no_content(result)
}
