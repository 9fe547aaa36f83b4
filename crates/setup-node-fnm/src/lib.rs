mod backend;
mod detection;
mod provider;
mod version;

pub use backend::FnmDistribution;
pub use detection::{FnmDetection, detect_fnm};
pub use provider::FnmProvider;
pub use version::{
    install_args, matching_installed, numeric_spec, parse_installed_versions, using_selector,
};
