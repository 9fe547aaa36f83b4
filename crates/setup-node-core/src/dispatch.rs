use log::info;
use setup_node_backend::{BackendError, DistributionFactory, InputSource, SetupRequest};

use crate::flags::parse_flag;
use crate::keys::input;

#[must_use]
pub fn build_request(inputs: &dyn InputSource, version_spec: String, arch: String) -> SetupRequest {
    let token = inputs.get_input(input::TOKEN);

    SetupRequest {
        version_spec,
        check_latest: parse_flag(&inputs.get_input(input::CHECK_LATEST), false),
        auth: (!token.is_empty()).then(|| format!("token {token}")),
        stable: parse_flag(&inputs.get_input(input::STABLE), true),
        arch,
    }
}

/// Hand the request to the matching distribution and wait for it to finish.
///
/// # Errors
/// Propagates the installer's error unchanged.
pub async fn dispatch(
    factory: &dyn DistributionFactory,
    request: SetupRequest,
) -> Result<(), BackendError> {
    let distribution = factory.create(request);
    info!(
        "Installing Node.js {} ({}) from the {} distribution",
        distribution.request().version_spec,
        distribution.request().arch,
        distribution.kind()
    );
    distribution.setup_node().await
}
