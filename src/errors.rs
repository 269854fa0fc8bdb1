use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

/// Failures of the download pipeline. Every variant carries the user-visible
/// (Spanish) message; the API routes never use this type because they report
/// negative results as JSON payloads with HTTP 200.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Por favor, ingrese una URL válida")]
    InvalidInput,

    #[error("No se pudo encontrar el archivo {kind} descargado. Archivos encontrados: {listing:?}")]
    NotFound {
        kind: &'static str,
        listing: Vec<String>,
    },

    #[error("Error al descargar el {kind}: {stderr}")]
    ToolFailure { kind: &'static str, stderr: String },

    #[error("La descarga de {kind} tardó demasiado tiempo. Por favor, inténtelo de nuevo.")]
    Timeout { kind: &'static str },

    #[error("Error inesperado: {0}")]
    Unexpected(String),
}

impl actix_web::ResponseError for DownloadError {
    fn status_code(&self) -> StatusCode {
        match self {
            DownloadError::InvalidInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
