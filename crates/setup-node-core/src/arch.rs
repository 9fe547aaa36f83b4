use setup_node_backend::LogSink;

const ARCH_WITHOUT_VERSION_WARNING: &str = "`architecture` is provided but `node-version` is missing. In this configuration, the version/architecture of Node will not be changed. To fix this, provide `architecture` in combination with `node-version`";

/// Pick the target architecture: the `architecture` input when given,
/// otherwise the host's.
pub fn resolve_arch(input: &str, version: &str, host_arch: &str, sink: &dyn LogSink) -> String {
    let arch = input.trim().to_ascii_lowercase();

    if !arch.is_empty() && version.is_empty() {
        sink.warning(ARCH_WITHOUT_VERSION_WARNING);
    }

    if arch.is_empty() {
        host_arch.to_string()
    } else {
        arch
    }
}
