//! Backend selection for the CLI.
//!
//! One externally supplied value selects the Central Server. Precedence:
//! `--server` flag, then `BENTO_SERVER`, then `server` in
//! `~/.config/bento/config.toml`. The session directory resolves the
//! same way (`--session-dir`, `BENTO_SESSION_DIR`, config file) and
//! defaults to `~/.config/bento/session`.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Deserialize;

pub const SERVER_ENV: &str = "BENTO_SERVER";
pub const SESSION_DIR_ENV: &str = "BENTO_SESSION_DIR";

/// Resolved CLI settings.
#[derive(Debug)]
pub struct Settings {
    pub server: String,
    pub session_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: Option<String>,
    #[serde(default)]
    session_dir: Option<PathBuf>,
}

fn config_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("bento"))
}

fn load_file() -> Result<FileConfig, String> {
    let Some(path) = config_dir().map(|dir| dir.join("config.toml")) else {
        return Ok(FileConfig::default());
    };
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(e) => return Err(format!("could not read {}: {}", path.display(), e)),
    };
    toml::from_str(&raw).map_err(|e| format!("invalid config {}: {}", path.display(), e))
}

fn pick_server(flag: Option<String>, env_value: Option<String>, file: Option<String>) -> Result<String, String> {
    flag.or(env_value.filter(|s| !s.is_empty()))
        .or(file)
        .ok_or_else(|| {
            format!(
                "no server configured: pass --server, set {}, or add `server = \"...\"` to ~/.config/bento/config.toml",
                SERVER_ENV
            )
        })
}

fn pick_session_dir(
    flag: Option<PathBuf>,
    env_value: Option<PathBuf>,
    file: Option<PathBuf>,
    fallback: Option<PathBuf>,
) -> Result<PathBuf, String> {
    flag.or(env_value)
        .or(file)
        .or(fallback)
        .ok_or_else(|| "could not determine a session directory (HOME is unset); pass --session-dir".to_string())
}

/// Resolve settings from flags, environment, and the config file.
pub fn resolve(server_flag: Option<String>, session_dir_flag: Option<PathBuf>) -> Result<Settings, String> {
    let file = load_file()?;
    let server = pick_server(
        server_flag,
        env::var(SERVER_ENV).ok(),
        file.server,
    )?;
    let session_dir = pick_session_dir(
        session_dir_flag,
        env::var_os(SESSION_DIR_ENV).map(PathBuf::from),
        file.session_dir,
        config_dir().map(|dir| dir.join("session")),
    )?;
    Ok(Settings { server, session_dir })
}
