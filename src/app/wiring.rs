use anyhow::{Context, Result};

use crate::{context, storage};

pub fn init_storage(ctx: &context::Context) -> Result<storage::SqliteStorage> {
    if let Some(parent) = ctx
        .database_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }

    let sqlite = storage::SqliteStorage::new(&ctx.database_path);
    if ctx.reset {
        log::warn!("🧹 Resetting database {}", ctx.database_path.display());
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;
    Ok(sqlite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Storage, StorageRead, StorageTx, StorageWrite};
    use crate::types::Score;
    use tempfile::TempDir;

    fn ctx(dir: &TempDir, reset: bool) -> context::Context {
        context::Context {
            database_path: dir.path().join("nested").join("feedback.sqlite"),
            api_listen: "127.0.0.1:0".parse().unwrap(),
            log_file: None,
            reset,
        }
    }

    #[test]
    fn init_storage_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let ctx = ctx(&dir, false);

        init_storage(&ctx).unwrap();
        assert!(ctx.database_path.exists());
    }

    #[test]
    fn init_storage_keeps_data_unless_reset() {
        let dir = TempDir::new().unwrap();

        let storage = init_storage(&ctx(&dir, false)).unwrap();
        let tx = storage.begin_tx().unwrap();
        tx.insert_feedback(Score::try_from(3).unwrap()).unwrap();
        tx.commit().unwrap();

        let storage = init_storage(&ctx(&dir, false)).unwrap();
        assert_eq!(storage.list_feedbacks().unwrap().len(), 1);

        let storage = init_storage(&ctx(&dir, true)).unwrap();
        assert!(storage.list_feedbacks().unwrap().is_empty());
    }
}
