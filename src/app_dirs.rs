use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn score_log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("tortoise");
            Some(state_dir.join("scores.csv"))
        } else {
            ProjectDirs::from("", "", "tortoise")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("scores.csv"))
        }
    }
}
