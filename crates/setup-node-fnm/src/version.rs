use log::trace;
use setup_node_backend::NodeVersion;

/// Translate an action version spec into `fnm install` arguments.
#[must_use]
pub fn install_args(spec: &str) -> Vec<String> {
    let spec = spec.trim();
    match spec.to_ascii_lowercase().as_str() {
        "lts/*" | "lts" => return vec!["--lts".to_string()],
        "latest" | "current" | "node" => return vec!["--latest".to_string()],
        _ => {}
    }

    let spec = spec.strip_prefix('v').unwrap_or(spec);
    let mut kept: Vec<&str> = spec.split('.').collect();
    while kept.len() > 1 && matches!(kept.last(), Some(&("x" | "X" | "*"))) {
        kept.pop();
    }

    vec![kept.join(".")]
}

/// The `fnm exec --using` selector for a spec that is not a plain numeric
/// version. fnm aliases `--lts` installs as `lts-latest` and `--latest`
/// installs as `latest`; codenames such as `lts/hydrogen` resolve through the
/// same aliases, and prerelease builds are selected by their full version.
#[must_use]
pub fn using_selector(spec: &str) -> String {
    match install_args(spec).as_slice() {
        [flag] if flag == "--lts" => "lts-latest".to_string(),
        [flag] if flag == "--latest" => "latest".to_string(),
        [exact] if exact.starts_with(|c: char| c.is_ascii_digit()) => format!("v{exact}"),
        [other] => other.clone(),
        _ => spec.trim().to_string(),
    }
}

/// Parse `fnm list` output. Lines that do not carry a semantic version, such
/// as `* system` or prerelease builds, are skipped.
#[must_use]
pub fn parse_installed_versions(output: &str) -> Vec<NodeVersion> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim().trim_start_matches('*').trim();
            let version = line.split_whitespace().next()?.parse::<NodeVersion>().ok();
            if version.is_none() {
                trace!("Skipping fnm list line {line:?}");
            }
            version
        })
        .collect()
}

/// Components of a plain numeric spec such as `18`, `18.x` or `v18.17.1`.
/// Aliases, ranges and prerelease versions yield `None`.
#[must_use]
pub fn numeric_spec(spec: &str) -> Option<Vec<u32>> {
    let [arg]: [String; 1] = install_args(spec).try_into().ok()?;
    let wanted = arg
        .split('.')
        .map(str::parse::<u32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    (!wanted.is_empty() && wanted.len() <= 3).then_some(wanted)
}

/// Highest installed version satisfying a plain numeric spec. Anything else
/// never matches.
#[must_use]
pub fn matching_installed(spec: &str, installed: &[NodeVersion]) -> Option<NodeVersion> {
    let wanted = numeric_spec(spec)?;

    installed
        .iter()
        .filter(|version| {
            let parts = [version.major, version.minor, version.patch];
            parts.iter().zip(&wanted).all(|(have, want)| have == want)
        })
        .max()
        .cloned()
}
