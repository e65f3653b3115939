use std::process::Command;

use tempfile::TempDir;

/// Runs the service binary from an empty directory with a scrubbed environment,
/// so no `.env` file or inherited `DATABASE_URL` leaks into the test.
pub fn base_cmd(work_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_feedback"));
    cmd.current_dir(work_dir.path())
        .env_remove("DATABASE_URL")
        .env_remove("FEEDBACK_API_LISTEN")
        .env_remove("FEEDBACK_LOG_FILE")
        .env("DOTENV_PATH", work_dir.path().join("missing.env"))
        .env("RUST_LOG", "info");
    cmd
}
