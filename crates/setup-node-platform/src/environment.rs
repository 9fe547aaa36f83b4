use std::path::PathBuf;

/// Snapshot of the runner-provided environment, taken once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerEnvironment {
    pub workspace: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
    pub debug: bool,
    pub server_url: Option<String>,
    pub repository_owner: Option<String>,
    pub cache_service_url: Option<String>,
    pub node_auth_token: Option<String>,
}

impl RunnerEnvironment {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Self {
            workspace: non_empty("GITHUB_WORKSPACE").map(PathBuf::from),
            temp_dir: non_empty("RUNNER_TEMP").map(PathBuf::from),
            debug: non_empty("RUNNER_DEBUG").is_some_and(|value| value == "1"),
            server_url: non_empty("GITHUB_SERVER_URL"),
            repository_owner: non_empty("GITHUB_REPOSITORY_OWNER"),
            cache_service_url: non_empty("ACTIONS_CACHE_URL")
                .or_else(|| non_empty("ACTIONS_RESULTS_URL")),
            node_auth_token: non_empty("NODE_AUTH_TOKEN"),
        }
    }

    /// GitHub Enterprise Server hosts anything other than github.com,
    /// `*.ghe.com` and `*.localhost`.
    #[must_use]
    pub fn is_ghes(&self) -> bool {
        let Some(url) = self.server_url.as_deref() else {
            return false;
        };
        let host = url
            .split_once("://")
            .map_or(url, |(_, rest)| rest)
            .split(['/', ':'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        host != "github.com" && !host.ends_with(".ghe.com") && !host.ends_with(".localhost")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::RunnerEnvironment;

    fn env(pairs: &[(&str, &str)]) -> RunnerEnvironment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RunnerEnvironment::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_values_are_treated_as_unset() {
        let runner = env(&[("GITHUB_WORKSPACE", ""), ("RUNNER_TEMP", "/tmp/runner")]);

        assert_eq!(runner.workspace, None);
        assert_eq!(runner.temp_dir, Some(PathBuf::from("/tmp/runner")));
    }

    #[test]
    fn debug_requires_exact_one() {
        assert!(env(&[("RUNNER_DEBUG", "1")]).debug);
        assert!(!env(&[("RUNNER_DEBUG", "true")]).debug);
        assert!(!env(&[]).debug);
    }

    #[test]
    fn cache_service_url_falls_back_to_results_url() {
        let runner = env(&[("ACTIONS_RESULTS_URL", "https://results.example/")]);

        assert_eq!(
            runner.cache_service_url.as_deref(),
            Some("https://results.example/")
        );
    }

    #[test]
    fn ghes_detection_ignores_dotcom_and_ghe_cloud() {
        assert!(!env(&[("GITHUB_SERVER_URL", "https://github.com")]).is_ghes());
        assert!(!env(&[("GITHUB_SERVER_URL", "https://acme.ghe.com")]).is_ghes());
        assert!(env(&[("GITHUB_SERVER_URL", "https://git.acme.internal:8443")]).is_ghes());
        assert!(!env(&[]).is_ghes());
    }
}
