use std::path::PathBuf;

const DEFAULT_MAX_SIZE_MB: u64 = 50;
const BYTES_PER_MB: u64 = 1024 * 1024;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub upload_dir: PathBuf,
    pub max_size: u64,
    pub max_size_label: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let (max_size, max_size_label) = read_max_size_config();
        let upload_dir = std::env::var("UPLOAD_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            upload_dir: PathBuf::from(upload_dir),
            max_size,
            max_size_label,
            port,
        }
    }
}

pub fn read_max_size_config() -> (u64, String) {
    let max_size_mb = std::env::var("UPLOAD_MAX_SIZE_MB")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MAX_SIZE_MB);
    let bytes = max_size_mb.saturating_mul(BYTES_PER_MB);
    (bytes, format_bytes(bytes))
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if bytes >= GB && bytes % GB == 0 {
        format!("{}GB", bytes / GB)
    } else if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        format!("{}B", bytes)
    }
}
