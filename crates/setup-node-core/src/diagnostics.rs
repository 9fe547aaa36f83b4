use std::path::{Path, PathBuf};

use setup_node_backend::LogSink;

pub const MATCHER_FILES: [&str; 3] = ["tsc.json", "eslint-stylish.json", "eslint-compact.json"];

/// Problem matchers ship in `.github/` two levels above the executable's
/// directory (`<root>/target/release/setup-node` → `<root>/.github`).
#[must_use]
pub fn matchers_dir(install_dir: &Path) -> PathBuf {
    install_dir
        .ancestors()
        .nth(2)
        .unwrap_or(install_dir)
        .join(".github")
}

pub fn emit_matchers(sink: &dyn LogSink, install_dir: &Path) {
    let dir = matchers_dir(install_dir);
    for file in MATCHER_FILES {
        sink.add_matcher(&dir.join(file));
    }
}
