use std::path::{Path, PathBuf};

/// XDG app name used for the user-level config directory.
pub const APP_NAME: &str = "cuekit";

/// Project-local directory holding `config.toml`.
pub const PROJECT_CONFIG_DIR: &str = ".cuekit";

fn project_config_dir(app_name: &str) -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// User-level config directory (e.g. `~/.config/cuekit`).
pub fn config_dir() -> Option<PathBuf> {
    project_config_dir(APP_NAME)
}

/// `~/.config/cuekit/config.toml`, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// `<project>/.cuekit/config.toml`.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_DIR).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_config_path_layout() {
        let path = project_config_path(Path::new("/work/app"));
        assert_eq!(path, PathBuf::from("/work/app/.cuekit/config.toml"));
    }

    #[test]
    fn test_user_config_path_ends_with_app_name() {
        if let Some(path) = user_config_path() {
            assert!(path.ends_with("config.toml"));
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
    }
}
