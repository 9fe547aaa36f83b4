//! Host platform naming in the vocabulary Node.js uses for its release
//! artifacts (`process.arch` / `process.platform`).

#[must_use]
pub fn host_arch() -> &'static str {
    node_arch(std::env::consts::ARCH)
}

#[must_use]
pub fn host_platform() -> &'static str {
    node_platform(std::env::consts::OS)
}

#[must_use]
pub fn node_arch(rust_arch: &'static str) -> &'static str {
    match rust_arch {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "powerpc" => "ppc",
        "loongarch64" => "loong64",
        "riscv64" => "riscv64",
        other => other,
    }
}

#[must_use]
pub fn node_platform(rust_os: &'static str) -> &'static str {
    match rust_os {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}
