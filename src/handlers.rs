use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use async_stream::stream;
use serde::Deserialize;
use tempfile::TempDir;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::errors::DownloadError;
use crate::state::AppState;
use crate::ytdlp::DownloadMode;
use crate::{fsops, util, ytdlp};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[derive(Deserialize)]
pub struct PathRequest {
    #[serde(default)]
    pub path: String,
}

pub async fn check_path(req: web::Json<PathRequest>) -> impl Responder {
    let path = req.path.clone();
    match web::block(move || fsops::check_path(&path)).await {
        Ok(result) => HttpResponse::Ok().json(result),
        // Worker pool failure; still a structured negative result, never a crash.
        Err(e) => HttpResponse::Ok().json(serde_json::json!({
            "valid": false,
            "message": format!("Error: {}", e),
        })),
    }
}

pub async fn list_folders(req: web::Json<PathRequest>) -> impl Responder {
    let path = req.path.clone();
    match web::block(move || fsops::list_folders(&path)).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => HttpResponse::Ok().json(serde_json::json!({
            "success": false,
            "message": format!("Error: {}", e),
        })),
    }
}

#[derive(Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub download_type: String,
}

/// The download pipeline: Validate → Prepare → Execute → Finalize.
///
/// The temporary work directory is owned by this request alone. It is moved
/// into the response body stream on success, and dropped (deleted) on every
/// earlier exit path; `TempDir` swallows its own removal errors.
pub async fn download(
    form: web::Form<DownloadForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, DownloadError> {
    // Validate
    let url = form.url.trim().to_string();
    if url.is_empty() {
        return Err(DownloadError::InvalidInput);
    }
    let mode = DownloadMode::from_request(form.download_type.trim());

    log::info!("[DOWNLOAD] Request: mode={} url={}", mode.label(), url);

    let cfg = state.config.as_ref();

    // Prepare: resolved filename and an exclusively-owned work directory.
    let custom = form.filename.trim();
    let filename = if custom.is_empty() {
        ytdlp::resolve_title(cfg, &url).await
    } else {
        util::sanitize_filename(custom)
    };

    let temp_dir = tempfile::Builder::new()
        .prefix("descarga-")
        .tempdir()
        .map_err(|e| DownloadError::Unexpected(e.to_string()))?;
    let out_template = temp_dir.path().join(format!("{}.%(ext)s", filename));

    // Execute
    ytdlp::run_download(cfg, mode, &url, out_template.to_string_lossy().as_ref()).await?;

    // Finalize
    let (file_path, ext) =
        ytdlp::find_output_file(temp_dir.path(), mode).map_err(|listing| {
            DownloadError::NotFound {
                kind: mode.label(),
                listing,
            }
        })?;

    let meta = tokio::fs::metadata(&file_path)
        .await
        .map_err(|e| DownloadError::Unexpected(e.to_string()))?;

    log::info!(
        "[DOWNLOAD] Completed: {}.{} ({} bytes)",
        filename,
        ext,
        meta.len()
    );

    // Capture TempDir inside the body stream so it is deleted when the
    // response ends, even if the client disconnects mid-transfer.
    let body = stream! {
        let _temp_dir: TempDir = temp_dir;

        let mut file = match File::open(&file_path).await {
            Ok(f) => f,
            Err(e) => {
                yield Err(e);
                return;
            }
        };

        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            match file.read(&mut buffer).await {
                Ok(0) => break,
                Ok(n) => yield Ok(bytes::Bytes::copy_from_slice(&buffer[..n])),
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    };

    Ok(HttpResponse::Ok()
        .content_type(util::content_type_for_extension(ext))
        .append_header((header::CONTENT_LENGTH, meta.len().to_string()))
        .append_header((
            header::CONTENT_DISPOSITION,
            format!(r#"attachment; filename="{}.{}""#, filename, ext),
        ))
        .append_header((header::CACHE_CONTROL, "no-store"))
        .streaming(body))
}
