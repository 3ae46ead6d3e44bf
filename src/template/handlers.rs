use actix_web::{web, HttpResponse, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use uuid::Uuid;

use crate::state::AppState;
use crate::template::model::{CreateTemplateRequest, Template};
use crate::ErrorResponse;

#[utoipa::path(
    context_path = "/api",
    tag = "Templates",
    post,
    path = "/templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = Template),
        (status = 400, description = "Invalid DOCX payload")
    )
)]
pub async fn create_template(
    state: web::Data<AppState>,
    body: web::Json<CreateTemplateRequest>,
) -> impl Responder {
    let request = body.into_inner();

    let mut template = Template::new(request.name, request.content);
    if let Some(encoded) = request.docx_file {
        match BASE64.decode(encoded.as_bytes()) {
            Ok(bytes) => {
                template.docx_file = Some(bytes);
                template.original_file_name = request.original_file_name;
            }
            Err(err) => {
                return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!(
                    "docx_file is not valid base64: {}",
                    err
                )));
            }
        }
    }

    log::info!("template {} created: {}", template.id, template.name);
    state.templates.insert(template.clone());
    HttpResponse::Created().json(template)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Templates",
    get,
    path = "/templates",
    responses(
        (status = 200, description = "List of all templates", body = [Template])
    )
)]
pub async fn get_all_templates(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.templates.list())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Templates",
    get,
    path = "/templates/{id}",
    params(("id" = Uuid, Path, description = "ID of the template to retrieve")),
    responses(
        (status = 200, description = "Template found", body = Template),
        (status = 404, description = "Template not found")
    )
)]
pub async fn get_template_by_id(
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.templates.get(&id.into_inner()) {
        Some(template) => HttpResponse::Ok().json(template),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Template not found")),
    }
}
