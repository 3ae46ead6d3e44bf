use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;

use super::models::{BatchGenerationRequest, BatchGenerationResult};
use super::service::BatchDocumentService;
use super::BatchError;
use crate::auth::middleware::optional_actor;
use crate::state::AppState;
use crate::ErrorResponse;

/// Session key used for guest rate limiting: an explicit `X-Session-Id`
/// header when the client sends one, the peer address otherwise.
fn guest_session_key(req: &HttpRequest) -> String {
    if let Some(session_id) = req
        .headers()
        .get("X-Session-Id")
        .and_then(|value| value.to_str().ok())
    {
        return format!("guest_{}", session_id);
    }
    match req.peer_addr() {
        Some(addr) => format!("guest_{}", addr.ip()),
        None => "guest_unknown".to_string(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Batch Generation",
    post,
    path = "/documents/batch/generate",
    request_body = BatchGenerationRequest,
    responses(
        (status = 200, description = "Batch processed", body = BatchGenerationResult),
        (status = 400, description = "Batch contains no data rows"),
        (status = 404, description = "Template not found"),
        (status = 429, description = "Guest batch limit reached"),
        (status = 500, description = "Unhandled processing failure")
    )
)]
pub async fn generate_batch(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<BatchGenerationRequest>,
) -> impl Responder {
    let request = body.into_inner();
    if request.data_rows.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "data_rows must contain at least one row",
        ));
    }

    let actor = optional_actor(&req, &state.users);
    if actor.is_none() {
        let key = guest_session_key(&req);
        if !state.guest_limiter.try_acquire(&key) {
            return HttpResponse::TooManyRequests().json(ErrorResponse::new(
                "TooManyRequests",
                "Too many requests. Guests are limited to 3 batch jobs per hour.",
            ));
        }
    }

    let service = BatchDocumentService::from_state(&state);
    let outcome = web::block(move || service.generate_batch(&request, actor.as_ref())).await;
    match outcome {
        Ok(Ok(result)) => HttpResponse::Ok().json(result),
        Ok(Err(BatchError::TemplateNotFound(id))) => HttpResponse::NotFound().json(
            ErrorResponse::not_found(&format!("Template {} not found", id)),
        ),
        Ok(Err(err)) => {
            log::error!("batch submission failed: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Error processing batch: {}",
                err
            )))
        }
        Err(err) => {
            log::error!("batch task join error: {}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Error processing batch"))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Batch Generation",
    get,
    path = "/documents/batch/progress/{batch_id}",
    params(("batch_id" = Uuid, Path, description = "Batch job identifier")),
    responses(
        (status = 200, description = "Stored batch result", body = BatchGenerationResult),
        (status = 404, description = "Unknown batch job")
    )
)]
pub async fn get_batch_progress(
    batch_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.jobs.get(&batch_id.into_inner()) {
        Some(result) => HttpResponse::Ok().json(result),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Batch job not found")),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Batch Generation",
    get,
    path = "/documents/batch/download/{batch_id}",
    params(("batch_id" = Uuid, Path, description = "Batch job identifier")),
    responses(
        (status = 200, description = "ZIP archive bytes; the file is deleted after this response"),
        (status = 404, description = "Archive not found (never produced, or already downloaded)")
    )
)]
pub async fn download_batch(
    batch_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = batch_id.into_inner();
    let service = BatchDocumentService::from_state(&state);
    match web::block(move || service.take_archive(&id)).await {
        Ok(Some((zip_file_name, bytes))) => HttpResponse::Ok()
            .content_type("application/octet-stream")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", zip_file_name),
            ))
            .body(bytes),
        Ok(None) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found("Batch archive not found"))
        }
        Err(err) => {
            log::error!("batch download task failed: {}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Error reading batch archive"))
        }
    }
}
