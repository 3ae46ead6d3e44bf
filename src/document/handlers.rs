use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;

use super::model::{DocumentDto, GenerateDocumentRequest};
use crate::auth::middleware::require_actor;
use crate::auth::model::User;
use crate::render;
use crate::state::AppState;
use crate::ErrorResponse;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new("Unauthorized", "Not authenticated"))
}

fn forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(ErrorResponse::new("Forbidden", "Access denied"))
}

fn actor_or_unauthorized(req: &HttpRequest, state: &AppState) -> Result<User, HttpResponse> {
    require_actor(req, &state.users).map_err(|_| unauthorized())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    get,
    path = "/documents",
    responses(
        (status = 200, description = "Documents owned by the caller", body = [DocumentDto]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_user_documents(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let user = match actor_or_unauthorized(&req, &state) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let documents: Vec<DocumentDto> = state
        .documents
        .list_by_user(&user.id)
        .iter()
        .map(DocumentDto::from)
        .collect();
    HttpResponse::Ok().json(documents)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    post,
    path = "/documents/generate",
    request_body = GenerateDocumentRequest,
    responses(
        (status = 200, description = "Document generated", body = crate::document::model::Document),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn generate_document(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<GenerateDocumentRequest>,
) -> impl Responder {
    let user = match actor_or_unauthorized(&req, &state) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let request = body.into_inner();
    let template = match state.templates.get(&request.template_id) {
        Some(template) => template,
        None => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Template not found"))
        }
    };

    let document = state
        .documents
        .create(&request.name, &template, user.id, &request.data);
    HttpResponse::Ok().json(document)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    get,
    path = "/documents/{id}/export",
    params(("id" = Uuid, Path, description = "ID of the document to export")),
    responses(
        (status = 200, description = "Generated text body"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Document owned by another user"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn export_document(
    req: HttpRequest,
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = match actor_or_unauthorized(&req, &state) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let document = match state.documents.get(&id.into_inner()) {
        Some(document) => document,
        None => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Document not found"))
        }
    };
    if document.user_id != user.id {
        return forbidden();
    }

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(document.generated_content)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    get,
    path = "/documents/{id}/export-docx",
    params(("id" = Uuid, Path, description = "ID of the document to export")),
    responses(
        (status = 200, description = "DOCX bytes as attachment"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Document owned by another user"),
        (status = 404, description = "Document or its template not found"),
        (status = 500, description = "Rendering failed")
    )
)]
pub async fn export_document_docx(
    req: HttpRequest,
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = match actor_or_unauthorized(&req, &state) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let document = match state.documents.get(&id.into_inner()) {
        Some(document) => document,
        None => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Document not found"))
        }
    };
    if document.user_id != user.id {
        return forbidden();
    }

    // Re-render from the template so an uploaded binary template is honored.
    let template = match state.templates.get(&document.template_id) {
        Some(template) => template,
        None => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Template not found"))
        }
    };

    let name = document.name.clone();
    let rendered =
        web::block(move || render::render_row(&template, &document.data, "docx")).await;
    match rendered {
        Ok(Ok(bytes)) => HttpResponse::Ok()
            .content_type(DOCX_CONTENT_TYPE)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.docx\"", name),
            ))
            .body(bytes),
        Ok(Err(err)) => {
            log::error!("DOCX export failed: {}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("DOCX rendering failed"))
        }
        Err(err) => {
            log::error!("DOCX export task failed: {}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("DOCX rendering failed"))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    get,
    path = "/documents/{id}/export-pdf",
    params(("id" = Uuid, Path, description = "ID of the document to export")),
    responses(
        (status = 200, description = "PDF bytes as attachment"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Document owned by another user"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Rendering failed")
    )
)]
pub async fn export_document_pdf(
    req: HttpRequest,
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = match actor_or_unauthorized(&req, &state) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let document = match state.documents.get(&id.into_inner()) {
        Some(document) => document,
        None => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Document not found"))
        }
    };
    if document.user_id != user.id {
        return forbidden();
    }

    let name = document.name.clone();
    let rendered =
        web::block(move || render::pdf::from_text(&document.generated_content)).await;
    match rendered {
        Ok(Ok(bytes)) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.pdf\"", name),
            ))
            .body(bytes),
        Ok(Err(err)) => {
            log::error!("PDF export failed: {}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("PDF rendering failed"))
        }
        Err(err) => {
            log::error!("PDF export task failed: {}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("PDF rendering failed"))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    delete,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "ID of the document to delete")),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Document owned by another user"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn delete_document(
    req: HttpRequest,
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = match actor_or_unauthorized(&req, &state) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let document_id = id.into_inner();
    let document = match state.documents.get(&document_id) {
        Some(document) => document,
        None => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Document not found"))
        }
    };
    if document.user_id != user.id {
        return forbidden();
    }

    state.documents.remove(&document_id);
    HttpResponse::Ok().body("Document deleted successfully")
}
