//! Filesystem locations under `~/.plano`

use std::path::PathBuf;

use crate::constants::ui::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DATABASE_FILE_NAME};

/// `~/.plano`, or `./.plano` when no home directory is known
pub fn plano_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

pub fn config_path() -> PathBuf {
    plano_dir().join(CONFIG_FILE_NAME)
}

pub fn logs_dir() -> PathBuf {
    plano_dir().join("logs")
}

pub fn database_path() -> PathBuf {
    plano_dir().join(DATABASE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_root() {
        let root = plano_dir();
        assert!(root.ends_with(".plano"));
        assert!(config_path().starts_with(&root));
        assert!(logs_dir().starts_with(&root));
        assert_eq!(database_path().file_name().unwrap(), "plano.db");
    }
}
