use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL is empty")]
    EmptyDatabaseUrl,
    #[error("unsupported database url scheme `{0}`; expected sqlite")]
    UnsupportedScheme(String),
    #[error("in-memory databases are not supported; point DATABASE_URL at a file")]
    InMemoryDatabase,
    #[error("invalid database url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub struct Context {
    pub database_path: PathBuf,
    pub api_listen: SocketAddr,
    pub log_file: Option<String>,
    pub reset: bool,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            database_path: sqlite_path_from_url(&cli.database_url)?,
            api_listen: cli.api_listen,
            log_file: cli.log_file.clone(),
            reset: cli.reset,
        })
    }
}

/// Resolves `DATABASE_URL` to a SQLite file path.
///
/// Accepts `sqlite://<path>`, `sqlite:<path>`, driver-qualified schemes such
/// as `sqlite+aiosqlite://<path>` and bare paths. Three slashes follow the
/// SQLAlchemy convention: `sqlite:///feedback.db` is relative and
/// `sqlite:////var/lib/feedback.db` is absolute. Query parameters are ignored.
pub fn sqlite_path_from_url(raw: &str) -> Result<PathBuf, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::EmptyDatabaseUrl);
    }

    let path = match Url::parse(raw) {
        // A single letter scheme is a Windows drive, not a URL.
        Ok(url) if url.scheme().len() == 1 => raw,
        Ok(url) => {
            let scheme = url.scheme();
            if scheme != "sqlite" && !scheme.starts_with("sqlite+") {
                return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
            }
            let rest = &raw[scheme.len() + 1..];
            let rest = rest
                .strip_prefix("///")
                .or_else(|| rest.strip_prefix("//"))
                .unwrap_or(rest);
            rest.split('?').next().unwrap_or_default()
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => raw,
        Err(err) => return Err(err.into()),
    };

    if path.is_empty() {
        return Err(ConfigError::EmptyDatabaseUrl);
    }
    if path == ":memory:" || raw.contains("mode=memory") {
        return Err(ConfigError::InMemoryDatabase);
    }
    Ok(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sqlite_urls_and_plain_paths() {
        let cases = [
            ("sqlite://feedback.db", "feedback.db"),
            ("sqlite://data/feedback.db", "data/feedback.db"),
            ("sqlite:////var/lib/feedback.db", "/var/lib/feedback.db"),
            ("sqlite:///feedback.db", "feedback.db"),
            ("sqlite:///./feedback.db", "./feedback.db"),
            ("sqlite+aiosqlite:///./feedback.db", "./feedback.db"),
            ("sqlite:feedback.db", "feedback.db"),
            ("sqlite+aiosqlite://feedback.db", "feedback.db"),
            ("sqlite://feedback.db?mode=rwc", "feedback.db"),
            ("feedback.db", "feedback.db"),
            ("./data/feedback.db", "./data/feedback.db"),
            ("/tmp/feedback.db", "/tmp/feedback.db"),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                sqlite_path_from_url(raw).unwrap(),
                PathBuf::from(expected),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(
            sqlite_path_from_url("postgres://user@localhost/feedback"),
            Err(ConfigError::UnsupportedScheme("postgres".to_string()))
        );
    }

    #[test]
    fn rejects_empty_and_in_memory_targets() {
        assert_eq!(sqlite_path_from_url("  "), Err(ConfigError::EmptyDatabaseUrl));
        assert_eq!(sqlite_path_from_url("sqlite://"), Err(ConfigError::EmptyDatabaseUrl));
        assert_eq!(
            sqlite_path_from_url("sqlite::memory:"),
            Err(ConfigError::InMemoryDatabase)
        );
        assert_eq!(
            sqlite_path_from_url("sqlite://feedback.db?mode=memory"),
            Err(ConfigError::InMemoryDatabase)
        );
    }
}
