use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,

    pub ytdlp_bin: PathBuf,
    pub ytdlp_path: String,
    // Preferred: explicit yt-dlp proxy (e.g. socks5://127.0.0.1:7890).
    pub ytdlp_proxy: Option<String>,
    // Whether to let yt-dlp inherit http_proxy/https_proxy from the service environment.
    pub inherit_proxy_env: bool,

    pub title_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
struct AppConfigFile {
    listen_addr: Option<String>,

    ytdlp_bin: Option<String>,
    ytdlp_path: Option<String>,
    ytdlp_proxy: Option<String>,
    inherit_proxy_env: Option<bool>,

    title_timeout_secs: Option<u64>,
    download_timeout_secs: Option<u64>,
}

fn default_ytdlp_path() -> String {
    // Prefer inheriting PATH from the service process; override via config.toml when needed
    // (e.g. to include Homebrew, ffmpeg, etc).
    std::env::var("PATH").unwrap_or_else(|_| {
        "/opt/homebrew/bin:/usr/local/bin:/usr/bin:/bin:/usr/sbin:/sbin".to_string()
    })
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_file(AppConfigFile::default())
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. A missing file is not an error:
    /// the service runs on defaults so the common "just run it" case works.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = match fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).with_context(|| {
                format!("Failed to parse config file: {}", path.display())
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => AppConfigFile::default(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))
            }
        };

        Ok(Self::from_file(file))
    }

    fn from_file(file: AppConfigFile) -> Self {
        Self {
            listen_addr: file.listen_addr.unwrap_or_else(|| "0.0.0.0:8080".to_string()),

            ytdlp_bin: PathBuf::from(file.ytdlp_bin.unwrap_or_else(|| "yt-dlp".to_string())),
            ytdlp_path: file.ytdlp_path.unwrap_or_else(default_ytdlp_path),
            ytdlp_proxy: file.ytdlp_proxy.and_then(|s| {
                let s = s.trim().to_string();
                if s.is_empty() {
                    None
                } else {
                    Some(s)
                }
            }),
            inherit_proxy_env: file.inherit_proxy_env.unwrap_or(false),

            title_timeout_secs: file.title_timeout_secs.unwrap_or(30),
            download_timeout_secs: file.download_timeout_secs.unwrap_or(600),
        }
    }
}
