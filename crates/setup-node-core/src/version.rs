use std::path::{Component, Path, PathBuf};

use log::debug;
use setup_node_backend::{BackendError, InputSource, LogSink, VersionFileParser};

use crate::keys::input;

const BOTH_INPUTS_WARNING: &str =
    "Both node-version and node-version-file inputs are specified, only node-version will be used";

/// Determine the version spec to install. An empty result means no install
/// was requested.
///
/// # Errors
/// Returns [`BackendError::MissingEnvironment`] when a version file has to be
/// resolved but no workspace root is known.
pub fn resolve_version(
    inputs: &dyn InputSource,
    workspace: Option<&Path>,
    parser: &dyn VersionFileParser,
    sink: &dyn LogSink,
) -> Result<String, BackendError> {
    let version = inputs.get_input(input::NODE_VERSION);
    let version_file = inputs.get_input(input::NODE_VERSION_FILE);

    if !version.is_empty() && !version_file.is_empty() {
        sink.warning(BOTH_INPUTS_WARNING);
    }

    if !version.is_empty() {
        return Ok(version);
    }

    if version_file.is_empty() {
        return Ok(String::new());
    }

    let workspace = workspace.ok_or(BackendError::MissingEnvironment {
        name: "GITHUB_WORKSPACE",
    })?;
    let path = join_normalized(workspace, &version_file);
    debug!("Reading node version from {}", path.display());

    let resolved = match parser
        .parse_version_file(&path)
        .filter(|parsed| !parsed.is_empty())
    {
        Some(parsed) => parsed,
        None => {
            sink.warning(&format!(
                "Could not determine node version from {}. Falling back",
                path.display()
            ));
            String::new()
        }
    };

    sink.info(&format!("Resolved {version_file} as {resolved}"));
    Ok(resolved)
}

/// Join `relative` onto `base` and fold `.`/`..` segments. A leading root in
/// `relative` is treated as relative to `base`.
pub(crate) fn join_normalized(base: &Path, relative: &str) -> PathBuf {
    let mut joined = base.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::ParentDir => {
                joined.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use setup_node_backend::{BackendError, VersionFileParser};
    use setup_node_platform::{MapInputs, WorkflowLog};

    use super::{join_normalized, resolve_version};

    struct FixedParser {
        result: Option<String>,
        seen: Mutex<Vec<PathBuf>>,
    }

    impl FixedParser {
        fn returning(result: Option<&str>) -> Self {
            Self {
                result: result.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<PathBuf> {
            self.seen.lock().expect("parser lock").clone()
        }
    }

    impl VersionFileParser for FixedParser {
        fn parse_version_file(&self, path: &Path) -> Option<String> {
            self.seen.lock().expect("parser lock").push(path.to_path_buf());
            self.result.clone()
        }
    }

    fn workspace() -> &'static Path {
        Path::new("/home/runner/work/app")
    }

    #[test]
    fn explicit_version_wins_and_warns_when_file_also_given() {
        let inputs = MapInputs::new()
            .with("node-version", "18.x")
            .with("node-version-file", ".nvmrc");
        let parser = FixedParser::returning(Some("20.0.0"));
        let log = WorkflowLog::buffered();

        let version = resolve_version(&inputs, Some(workspace()), &parser, &log)
            .expect("resolution succeeds");

        assert_eq!(version, "18.x");
        assert!(parser.seen().is_empty());
        assert!(log.captured().contains(
            "::warning::Both node-version and node-version-file inputs are specified"
        ));
    }

    #[test]
    fn explicit_version_alone_does_not_warn() {
        let inputs = MapInputs::new().with("node-version", "20");
        let log = WorkflowLog::buffered();

        let version = resolve_version(&inputs, None, &FixedParser::returning(None), &log)
            .expect("resolution succeeds");

        assert_eq!(version, "20");
        assert_eq!(log.captured(), "");
    }

    #[test]
    fn version_file_is_resolved_against_workspace() {
        let inputs = MapInputs::new().with("node-version-file", "./.nvmrc");
        let parser = FixedParser::returning(Some("20.0.0"));
        let log = WorkflowLog::buffered();

        let version = resolve_version(&inputs, Some(workspace()), &parser, &log)
            .expect("resolution succeeds");

        assert_eq!(version, "20.0.0");
        assert_eq!(parser.seen(), vec![workspace().join(".nvmrc")]);
        assert!(log.captured().contains("Resolved ./.nvmrc as 20.0.0"));
    }

    #[test]
    fn unparseable_version_file_warns_with_path_and_falls_back() {
        let inputs = MapInputs::new().with("node-version-file", "package.json");
        let parser = FixedParser::returning(None);
        let log = WorkflowLog::buffered();

        let version = resolve_version(&inputs, Some(workspace()), &parser, &log)
            .expect("resolution succeeds");

        assert_eq!(version, "");
        let expected_path = workspace().join("package.json");
        assert!(log.captured().contains(&format!(
            "::warning::Could not determine node version from {}. Falling back",
            expected_path.display()
        )));
    }

    #[test]
    fn no_inputs_resolve_to_empty_version() {
        let log = WorkflowLog::buffered();

        let version = resolve_version(
            &MapInputs::new(),
            None,
            &FixedParser::returning(Some("20")),
            &log,
        )
        .expect("resolution succeeds");

        assert_eq!(version, "");
        assert_eq!(log.captured(), "");
    }

    #[test]
    fn version_file_without_workspace_fails_fast() {
        let inputs = MapInputs::new().with("node-version-file", ".nvmrc");

        let result = resolve_version(
            &inputs,
            None,
            &FixedParser::returning(Some("20")),
            &WorkflowLog::buffered(),
        );

        assert_eq!(
            result,
            Err(BackendError::MissingEnvironment {
                name: "GITHUB_WORKSPACE"
            })
        );
    }

    #[test]
    fn join_normalized_folds_relative_segments() {
        let base = Path::new("/ws/repo");

        assert_eq!(join_normalized(base, "./.nvmrc"), PathBuf::from("/ws/repo/.nvmrc"));
        assert_eq!(
            join_normalized(base, "../shared/.node-version"),
            PathBuf::from("/ws/shared/.node-version")
        );
        assert_eq!(
            join_normalized(base, "/nested/package.json"),
            PathBuf::from("/ws/repo/nested/package.json")
        );
    }
}
