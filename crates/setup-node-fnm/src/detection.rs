use std::path::{Path, PathBuf};

use log::{debug, info};
use setup_node_platform::capture_stdout_from;
use which::which;

#[derive(Debug, Clone, Default)]
pub struct FnmDetection {
    pub path: Option<PathBuf>,
    pub fnm_dir: Option<PathBuf>,
}

impl FnmDetection {
    #[must_use]
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Locate the `fnm` executable on PATH, then in well-known install
/// locations, along with its data directory.
pub async fn detect_fnm() -> FnmDetection {
    let fnm_dir = detect_fnm_dir();

    let path = which("fnm")
        .ok()
        .or_else(|| common_fnm_paths().into_iter().find(|path| path.is_file()));

    let Some(path) = path else {
        debug!("fnm was not found on PATH or in common locations");
        return FnmDetection {
            fnm_dir,
            ..FnmDetection::default()
        };
    };

    let version = fnm_version(&path).await;
    info!(
        "Found fnm {} at {}",
        version.as_deref().unwrap_or("(unknown version)"),
        path.display()
    );

    FnmDetection {
        path: Some(path),
        fnm_dir,
    }
}

pub(crate) fn detect_fnm_dir() -> Option<PathBuf> {
    let env_dir = std::env::var_os("FNM_DIR")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    select_fnm_dir(env_dir, fnm_dir_candidates())
}

/// An existing `FNM_DIR` wins; otherwise the first candidate that already
/// holds `node-versions`, then the first candidate that exists at all.
fn select_fnm_dir(env_dir: Option<PathBuf>, candidates: Vec<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = env_dir.filter(|path| path.exists()) {
        return Some(path);
    }

    candidates
        .iter()
        .find(|candidate| candidate.join("node-versions").is_dir())
        .cloned()
        .or_else(|| candidates.into_iter().find(|candidate| candidate.is_dir()))
}

fn fnm_dir_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(xdg_data) = std::env::var_os("XDG_DATA_HOME").filter(|value| !value.is_empty()) {
        paths.push(PathBuf::from(xdg_data).join("fnm"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".local").join("share").join("fnm"));
        paths.push(home.join(".fnm"));
    }

    if let Some(data_dir) = dirs::data_local_dir() {
        paths.push(data_dir.join("fnm"));
    }

    paths
}

fn common_fnm_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".local").join("share").join("fnm").join("fnm"));
        paths.push(home.join(".fnm").join("fnm"));
        paths.push(home.join(".cargo").join("bin").join("fnm"));
    }

    #[cfg(target_os = "macos")]
    {
        paths.push(PathBuf::from("/opt/homebrew/bin/fnm"));
    }

    #[cfg(unix)]
    {
        paths.push(PathBuf::from("/usr/local/bin/fnm"));
        paths.push(PathBuf::from("/usr/bin/fnm"));
    }

    #[cfg(windows)]
    {
        if let Some(local_app_data) = dirs::data_local_dir() {
            paths.push(local_app_data.join("fnm").join("fnm.exe"));
        }
    }

    paths
}

async fn fnm_version(path: &Path) -> Option<String> {
    let stdout = capture_stdout_from("fnm", path, &["--version"], None)
        .await
        .inspect_err(|error| debug!("fnm --version failed: {error}"))
        .ok()?;

    Some(stdout.strip_prefix("fnm ").unwrap_or(&stdout).to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{FnmDetection, common_fnm_paths, select_fnm_dir};

    #[test]
    fn select_fnm_dir_prefers_existing_env_dir() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let env_dir = temp_dir.path().join("env");
        let candidate = temp_dir.path().join("candidate");
        std::fs::create_dir_all(&env_dir).expect("create env dir");
        std::fs::create_dir_all(candidate.join("node-versions")).expect("create candidate dir");

        let selected = select_fnm_dir(Some(env_dir.clone()), vec![candidate]);

        assert_eq!(selected, Some(env_dir));
    }

    #[test]
    fn select_fnm_dir_skips_missing_env_dir() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let candidate = temp_dir.path().join("candidate");
        std::fs::create_dir_all(&candidate).expect("create candidate dir");

        let selected = select_fnm_dir(Some(temp_dir.path().join("gone")), vec![candidate.clone()]);

        assert_eq!(selected, Some(candidate));
    }

    #[test]
    fn select_fnm_dir_prefers_candidate_with_installs() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let plain = temp_dir.path().join("plain");
        let with_versions = temp_dir.path().join("with-node-versions");
        std::fs::create_dir_all(&plain).expect("create plain candidate");
        std::fs::create_dir_all(with_versions.join("node-versions"))
            .expect("create node-versions candidate");

        let selected = select_fnm_dir(None, vec![plain, with_versions.clone()]);

        assert_eq!(selected, Some(with_versions));
    }

    #[test]
    fn select_fnm_dir_returns_none_when_nothing_exists() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");

        assert!(select_fnm_dir(None, vec![temp_dir.path().join("missing")]).is_none());
    }

    #[test]
    fn common_paths_include_home_install_locations() {
        let paths = common_fnm_paths();
        let Some(home) = dirs::home_dir() else {
            return;
        };

        assert!(paths.contains(&home.join(".fnm").join("fnm")));
        assert!(paths.contains(&home.join(".cargo").join("bin").join("fnm")));
    }

    #[test]
    fn empty_detection_is_not_found() {
        assert!(!FnmDetection::default().found());
    }

    #[test]
    fn detection_with_binary_is_found() {
        let detection = FnmDetection {
            path: Some(PathBuf::from("/usr/local/bin/fnm")),
            fnm_dir: None,
        };

        assert!(detection.found());
    }
}
