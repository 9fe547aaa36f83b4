use std::path::Path;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use setup_node_backend::VersionFileParser;

const MAX_EXTENDS_DEPTH: usize = 8;

static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:node(?:js)?\s+)?v?(\S+)\r?$").expect("version line pattern is valid")
});

/// The `package.json` fields that can pin a Node.js version.
#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    volta: Option<VoltaSection>,
    engines: Option<EnginesSection>,
}

#[derive(Debug, Default, Deserialize)]
struct VoltaSection {
    node: Option<String>,
    extends: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EnginesSection {
    node: Option<String>,
}

/// Reads `.nvmrc`, `.node-version`, `.tool-versions` and `package.json`
/// style files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeVersionFile;

impl VersionFileParser for NodeVersionFile {
    fn parse_version_file(&self, path: &Path) -> Option<String> {
        parse_path(path, 0)
    }
}

fn parse_path(path: &Path, depth: usize) -> Option<String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) => {
            debug!("Cannot read node version file {}: {error}", path.display());
            return None;
        }
    };

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&contents) {
        let manifest = PackageManifest::deserialize(value).unwrap_or_else(|error| {
            debug!("Ignoring unexpected fields in {}: {error}", path.display());
            PackageManifest::default()
        });
        return from_manifest(&manifest, path, depth);
    }

    debug!("{} is not a JSON manifest", path.display());
    from_plain_text(&contents)
}

/// `package.json`: Volta pin, then `engines.node`, then a Volta `extends`
/// chain. A manifest without any of these yields nothing.
fn from_manifest(manifest: &PackageManifest, path: &Path, depth: usize) -> Option<String> {
    let field = |value: Option<&String>| {
        value
            .map(String::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let volta = manifest.volta.as_ref();

    if let Some(node) = field(volta.and_then(|volta| volta.node.as_ref())) {
        return Some(node);
    }

    if let Some(node) = field(manifest.engines.as_ref().and_then(|engines| engines.node.as_ref())) {
        return Some(node);
    }

    let extends = field(volta.and_then(|volta| volta.extends.as_ref()))?;
    if depth >= MAX_EXTENDS_DEPTH {
        warn!("Volta extends chain deeper than {MAX_EXTENDS_DEPTH} at {}", path.display());
        return None;
    }

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    debug!("Following volta.extends to {extends}");
    parse_path(&base.join(extends), depth + 1)
}

fn from_plain_text(contents: &str) -> Option<String> {
    let version = VERSION_LINE
        .captures(contents)
        .and_then(|captures| captures.get(1))
        .map_or_else(|| contents.trim(), |found| found.as_str());

    (!version.is_empty()).then(|| version.to_string())
}
