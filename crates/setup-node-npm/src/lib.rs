//! npm-ecosystem integration: registry auth in `.npmrc` and dependency cache
//! keys for npm, yarn and pnpm.

mod auth;
mod cache;

pub use auth::{NpmrcAuth, NpmrcEdit, NpmrcFile, PLACEHOLDER_TOKEN};
pub use cache::{ActionsCacheSupport, PackageManager, PackageManagerCache, hash_lockfiles};
