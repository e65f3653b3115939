use clap::Parser;
use std::env;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Collect feedback scores between 1 and 5 over HTTP",
    long_about = "A small REST service that records feedback scores in SQLite, with soft deletion."
)]
pub struct Cli {
    #[arg(
        long = "database-url",
        env = "DATABASE_URL",
        value_name = "URL",
        help = "SQLite database to use: sqlite://<path>, sqlite:<path> or a plain file path"
    )]
    pub database_url: String,

    #[arg(
        long = "api-listen",
        env = "FEEDBACK_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8000",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long = "log-file",
        env = "FEEDBACK_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    match dotenvy::from_filename(&dotenv_path) {
        Ok(_) => log::info!("Loaded env from {}", dotenv_path),
        Err(err) if err.not_found() => log::debug!("No env file at {}", dotenv_path),
        Err(err) => log::warn!("Failed to load env from {}: {}", dotenv_path, err),
    }
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_flags() {
        let cli = Cli::try_parse_from([
            "feedback",
            "--database-url",
            "sqlite://feedback.db",
            "--api-listen",
            "0.0.0.0:9000",
            "--log-file",
            "feedback.log",
            "--reset",
        ])
        .unwrap();

        assert_eq!(cli.database_url, "sqlite://feedback.db");
        assert_eq!(
            cli.api_listen,
            "0.0.0.0:9000".parse::<std::net::SocketAddr>().unwrap()
        );
        assert_eq!(cli.log_file.as_deref(), Some("feedback.log"));
        assert!(cli.reset);
    }

    #[test]
    fn rejects_malformed_listen_address() {
        let err = Cli::try_parse_from([
            "feedback",
            "--database-url",
            "feedback.db",
            "--api-listen",
            "localhost",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
