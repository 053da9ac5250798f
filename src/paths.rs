use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "reporthist";

/// Resolve the XDG data directory for the application.
/// Defaults to ~/.local/share/reporthist if XDG_DATA_HOME is not set.
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/share").join(APP_DIR)))
        .context("Could not determine data directory")
}

/// Resolve the XDG config directory for the application.
/// Defaults to ~/.config/reporthist if XDG_CONFIG_HOME is not set.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .or_else(|| dirs::home_dir().map(|h| h.join(".config").join(APP_DIR)))
        .context("Could not determine config directory")
}

/// Get the default logs directory.
pub fn logs_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("logs"))
}

/// Default target for downloaded report artifacts.
pub fn default_download_dir() -> Result<PathBuf> {
    match dirs::download_dir() {
        Some(dir) => Ok(dir.join(APP_DIR)),
        None => Ok(data_dir()?.join("downloads")),
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Ensure the data directory exists.
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = data_dir()?;
    ensure_dir(&dir)?;
    ensure_dir(&logs_dir()?)?;
    Ok(dir)
}

/// Ensure the config directory exists.
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir()?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Validate that a path is a directory, or does not exist yet.
pub fn validate_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }
    Ok(())
}

/// Expand user home directory in path (e.g., ~/path -> /home/user/path).
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Reduce a server-supplied file name to a single safe path component.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/test");
        assert!(expanded.to_string_lossy().contains("test"));
        assert!(!expanded.to_string_lossy().starts_with("~"));
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/tmp/reports"), PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_validate_dir_rejects_files() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_dir(file.path()).is_err());
        assert!(validate_dir(&file.path().with_extension("missing")).is_ok());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report.csv").as_deref(), Some("report.csv"));
        assert_eq!(
            sanitize_file_name("/var/reports/../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(sanitize_file_name("..\\"), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name(""), None);
    }
}
