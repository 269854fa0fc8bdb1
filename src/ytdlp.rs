use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time;

use crate::config::AppConfig;
use crate::errors::DownloadError;
use crate::util;

/// Title used when the external tool cannot produce one. Title resolution is
/// best-effort and must never block the download path.
pub const FALLBACK_TITLE: &str = "audio_descargado";

/// Extractor argument that makes short-video platforms (TikTok et al.) resolve.
const TIKTOK_EXTRACTOR_ARGS: &str = "tiktok:webpage_url_basename=t";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    Audio,
    Video,
}

impl DownloadMode {
    /// Parse the `download_type` form field. Anything that is not exactly
    /// `video` falls back to the default `audio`.
    pub fn from_request(value: &str) -> Self {
        if value == "video" {
            DownloadMode::Video
        } else {
            DownloadMode::Audio
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DownloadMode::Audio => "audio",
            DownloadMode::Video => "video",
        }
    }

    /// Extensions the tool may produce for this mode. Order is the priority
    /// used when more than one candidate file exists in the work directory.
    pub fn extension_priority(self) -> &'static [&'static str] {
        match self {
            DownloadMode::Audio => &["mp3", "m4a", "aac", "ogg", "wav"],
            DownloadMode::Video => &["mp4", "webm", "mkv", "avi", "mov"],
        }
    }
}

fn base_command(cfg: &AppConfig) -> Command {
    let mut cmd = Command::new(&cfg.ytdlp_bin);
    cmd.env("PATH", &cfg.ytdlp_path);

    if !cfg.inherit_proxy_env {
        // Avoid being accidentally bound to a dead local proxy (common in shell env).
        cmd.env_remove("http_proxy")
            .env_remove("https_proxy")
            .env_remove("HTTP_PROXY")
            .env_remove("HTTPS_PROXY")
            .env_remove("no_proxy")
            .env_remove("NO_PROXY");
    }

    if let Some(p) = &cfg.ytdlp_proxy {
        cmd.arg("--proxy").arg(p);
    }

    cmd
}

pub fn title_args(url: &str) -> Vec<String> {
    vec![
        "--get-title".to_string(),
        "--no-warnings".to_string(),
        url.to_string(),
    ]
}

pub fn download_args(mode: DownloadMode, out_template: &str, url: &str) -> Vec<String> {
    let mut args: Vec<String> = match mode {
        DownloadMode::Audio => vec![
            "-x".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            "192K".to_string(),
        ],
        DownloadMode::Video => vec![
            "-f".to_string(),
            "best".to_string(),
            "--format".to_string(),
            "best[ext=mp4]/best".to_string(),
        ],
    };

    args.push("--extractor-args".to_string());
    args.push(TIKTOK_EXTRACTOR_ARGS.to_string());
    args.push("-o".to_string());
    args.push(out_template.to_string());
    args.push("--no-playlist".to_string());
    args.push(url.to_string());
    args
}

/// Ask the tool for the resource's title. Any failure — non-zero exit, empty
/// output, timeout, tool missing — yields the fixed fallback, never an error.
pub async fn resolve_title(cfg: &AppConfig, url: &str) -> String {
    let mut cmd = base_command(cfg);
    cmd.args(title_args(url))
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let timeout = Duration::from_secs(cfg.title_timeout_secs);
    match time::timeout(timeout, cmd.output()).await {
        Ok(Ok(out)) if out.status.success() => {
            let title = String::from_utf8_lossy(&out.stdout).trim().to_string();
            let title = util::sanitize_filename(&title);
            if title.is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                title
            }
        }
        Ok(Ok(_)) => FALLBACK_TITLE.to_string(),
        Ok(Err(e)) => {
            log::warn!("[TITLE] Failed to run yt-dlp: {}", e);
            FALLBACK_TITLE.to_string()
        }
        Err(_) => {
            log::warn!(
                "[TITLE] yt-dlp did not answer within {}s",
                cfg.title_timeout_secs
            );
            FALLBACK_TITLE.to_string()
        }
    }
}

/// Run one download invocation against the output template, bounded by the
/// configured timeout. On timeout the future is dropped, which kills the
/// child via `kill_on_drop`.
pub async fn run_download(
    cfg: &AppConfig,
    mode: DownloadMode,
    url: &str,
    out_template: &str,
) -> Result<(), DownloadError> {
    let mut cmd = base_command(cfg);
    cmd.args(download_args(mode, out_template, url))
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let timeout = Duration::from_secs(cfg.download_timeout_secs);
    let out = match time::timeout(timeout, cmd.output()).await {
        Ok(Ok(out)) => out,
        Ok(Err(e)) => return Err(DownloadError::Unexpected(e.to_string())),
        Err(_) => return Err(DownloadError::Timeout { kind: mode.label() }),
    };

    if !out.status.success() {
        return Err(DownloadError::ToolFailure {
            kind: mode.label(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Locate the downloaded file in the work directory: first extension in the
/// mode's priority list that matches wins; ties within one extension are
/// broken by filename order. On failure returns the directory listing so the
/// caller can report what was actually produced.
pub fn find_output_file(
    dir: &Path,
    mode: DownloadMode,
) -> Result<(PathBuf, &'static str), Vec<String>> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();

    for ext in mode.extension_priority() {
        let suffix = format!(".{}", ext);
        if let Some(name) = names.iter().find(|n| n.ends_with(&suffix)) {
            return Ok((dir.join(name), ext));
        }
    }

    Err(names)
}
