use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod batch;
pub mod document;
pub mod engine;
pub mod guest;
pub mod render;
pub mod state;
pub mod template;

pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Register every `/api` route. Shared by `run` and the integration tests.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/register").route(web::post().to(auth::handlers::register)))
        .service(web::resource("/auth/login").route(web::post().to(auth::handlers::login)))
        .service(
            web::resource("/templates")
                .route(web::get().to(template::handlers::get_all_templates))
                .route(web::post().to(template::handlers::create_template)),
        )
        .service(
            web::resource("/templates/{id}")
                .route(web::get().to(template::handlers::get_template_by_id)),
        )
        .service(
            web::resource("/documents")
                .route(web::get().to(document::handlers::get_user_documents)),
        )
        .service(
            web::resource("/documents/generate")
                .route(web::post().to(document::handlers::generate_document)),
        )
        .service(
            web::resource("/documents/batch/generate")
                .route(web::post().to(batch::handlers::generate_batch)),
        )
        .service(
            web::resource("/documents/batch/progress/{batch_id}")
                .route(web::get().to(batch::handlers::get_batch_progress)),
        )
        .service(
            web::resource("/documents/batch/download/{batch_id}")
                .route(web::get().to(batch::handlers::download_batch)),
        )
        .service(
            web::resource("/documents/{id}/export")
                .route(web::get().to(document::handlers::export_document)),
        )
        .service(
            web::resource("/documents/{id}/export-docx")
                .route(web::get().to(document::handlers::export_document_docx)),
        )
        .service(
            web::resource("/documents/{id}/export-pdf")
                .route(web::get().to(document::handlers::export_document_pdf)),
        )
        .service(
            web::resource("/documents/{id}")
                .route(web::delete().to(document::handlers::delete_document)),
        );
}

pub async fn run() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::auth::handlers::register,
            crate::auth::handlers::login,
            crate::template::handlers::create_template,
            crate::template::handlers::get_all_templates,
            crate::template::handlers::get_template_by_id,
            crate::document::handlers::get_user_documents,
            crate::document::handlers::generate_document,
            crate::document::handlers::export_document,
            crate::document::handlers::export_document_docx,
            crate::document::handlers::export_document_pdf,
            crate::document::handlers::delete_document,
            crate::batch::handlers::generate_batch,
            crate::batch::handlers::get_batch_progress,
            crate::batch::handlers::download_batch
        ),
        components(
            schemas(
                ErrorResponse,
                auth::model::RegisterRequest,
                auth::model::LoginRequest,
                auth::model::TokenResponse,
                auth::model::UserInfo,
                template::model::Template,
                template::model::CreateTemplateRequest,
                document::model::Document,
                document::model::DocumentDto,
                document::model::GenerateDocumentRequest,
                batch::models::BatchGenerationRequest,
                batch::models::BatchGenerationResult,
                batch::models::BatchItemResult,
                batch::models::BatchRowError,
                batch::models::ItemStatus
            )
        ),
        tags(
            (name = "Authentication", description = "User registration and login."),
            (name = "Templates", description = "Template CRUD endpoints."),
            (name = "Documents", description = "Single-document generation and export."),
            (name = "Batch Generation", description = "Batch jobs: submit, poll progress, download archive.")
        )
    )]
    struct ApiDoc;

    let app_state = web::Data::new(AppState::new());
    std::fs::create_dir_all(&app_state.temp_root)?;

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);
    log::info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .allowed_header("x-session-id")
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(api_config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
