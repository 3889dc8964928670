use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Url;
use uuid::Uuid;

pub const CATALOG_ENV: &str = "BOOKSHELF_CATALOG";
pub const LOG_DIR_ENV: &str = "BOOKSHELF_LOG_DIR";

const DEFAULT_CATALOG: &str = "http://localhost:3000/db.json";

/// Where the catalog document is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Http(Url),
    File(PathBuf),
}

impl CatalogSource {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).with_context(|| format!("Invalid catalog URL: {raw}"))?;
            Ok(Self::Http(url))
        } else {
            Ok(Self::File(PathBuf::from(raw)))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Runtime configuration used throughout the application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    catalog_source: CatalogSource,
    log_dir: PathBuf,
    user_agent: String,
    session_id: String,
}

impl AppConfig {
    /// Defaults overridden by `BOOKSHELF_CATALOG` and `BOOKSHELF_LOG_DIR`.
    pub fn from_env() -> Result<Self> {
        Self::with_overrides(env::var(CATALOG_ENV).ok(), env::var(LOG_DIR_ENV).ok())
    }

    pub fn with_overrides(catalog: Option<String>, log_dir: Option<String>) -> Result<Self> {
        let catalog = catalog.filter(|value| !value.is_empty());
        let catalog_source = CatalogSource::parse(catalog.as_deref().unwrap_or(DEFAULT_CATALOG))?;
        let log_dir = log_dir
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));

        let session_id = Uuid::new_v4().to_string();
        let user_agent = format!(
            "{}/{} ( session={session_id} )",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );

        Ok(Self {
            catalog_source,
            log_dir,
            user_agent,
            session_id,
        })
    }

    pub fn catalog_source(&self) -> &CatalogSource {
        &self.catalog_source
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Ensures that the log directory exists.
    pub fn ensure_filesystem(&self) -> Result<()> {
        fs::create_dir_all(self.log_dir()).with_context(|| {
            format!("Failed to create log directory: {}", self.log_dir().display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_json_server() {
        let config = AppConfig::with_overrides(None, None).unwrap();
        assert_eq!(config.catalog_source().to_string(), DEFAULT_CATALOG);
        assert_eq!(config.log_dir(), Path::new("logs"));
        assert!(config.user_agent().contains(config.session_id()));
    }

    #[test]
    fn classifies_catalog_sources() {
        assert!(matches!(
            CatalogSource::parse("https://example.org/db.json").unwrap(),
            CatalogSource::Http(_)
        ));
        assert_eq!(
            CatalogSource::parse("data/db.json").unwrap(),
            CatalogSource::File(PathBuf::from("data/db.json"))
        );
    }

    #[test]
    fn overrides_apply_and_blank_values_are_ignored() {
        let config =
            AppConfig::with_overrides(Some("books.json".into()), Some(String::new())).unwrap();
        assert_eq!(
            config.catalog_source(),
            &CatalogSource::File(PathBuf::from("books.json"))
        );
        assert_eq!(config.log_dir(), Path::new("logs"));
    }

    #[test]
    fn rejects_malformed_urls() {
        assert!(CatalogSource::parse("http://").is_err());
    }
}
