use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Everything an installer needs to provision one Node.js runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupRequest {
    pub version_spec: String,
    pub check_latest: bool,
    pub auth: Option<String>,
    pub stable: bool,
    pub arch: String,
}

impl SetupRequest {
    #[must_use]
    pub fn distribution(&self) -> DistributionKind {
        DistributionKind::from_version_spec(&self.version_spec)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionKind {
    Official,
    Nightly,
    Canary,
    Rc,
}

impl DistributionKind {
    /// Pick the release channel a version spec refers to. Checked in the order
    /// nightly, canary, rc so that `v8-canary` specs never fall through to rc.
    #[must_use]
    pub fn from_version_spec(spec: &str) -> Self {
        if spec.contains("nightly") {
            Self::Nightly
        } else if spec.contains("v8-canary") {
            Self::Canary
        } else if spec.contains("rc") {
            Self::Rc
        } else {
            Self::Official
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::Nightly => "nightly",
            Self::Canary => "v8-canary",
            Self::Rc => "rc",
        }
    }

    #[must_use]
    pub const fn mirror_url(self) -> &'static str {
        match self {
            Self::Official => "https://nodejs.org/dist",
            Self::Nightly => "https://nodejs.org/download/nightly",
            Self::Canary => "https://nodejs.org/download/v8-canary",
            Self::Rc => "https://nodejs.org/download/rc",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl NodeVersion {
    #[must_use]
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Ord for NodeVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for NodeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionComponent {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("Expected X.Y.Z format, got: {input}")]
    InvalidFormat { input: String },
    #[error("Invalid {component} version: {value}")]
    InvalidComponent {
        component: VersionComponent,
        value: String,
    },
}

impl FromStr for NodeVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().strip_prefix('v').unwrap_or(s.trim());
        let invalid = || VersionParseError::InvalidFormat {
            input: s.to_string(),
        };

        let mut parts = s.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let minor_str = parts.next().ok_or_else(invalid)?;
        let patch_str = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let component = |component: VersionComponent, value: &str| {
            value
                .parse::<u32>()
                .map_err(|_| VersionParseError::InvalidComponent {
                    component,
                    value: value.to_string(),
                })
        };

        Ok(NodeVersion::new(
            component(VersionComponent::Major, major_str)?,
            component(VersionComponent::Minor, minor_str)?,
            component(VersionComponent::Patch, patch_str)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_with_v_prefix() {
        let v: NodeVersion = "v20.11.0".parse().unwrap();
        assert_eq!(v, NodeVersion::new(20, 11, 0));
    }

    #[test]
    fn test_parse_version_with_whitespace() {
        let v: NodeVersion = "  20.11.0  ".parse().unwrap();
        assert_eq!(v.major, 20);
    }

    #[test]
    fn test_parse_version_invalid_format() {
        let result: Result<NodeVersion, _> = "v20.11".parse();
        assert!(matches!(
            result,
            Err(VersionParseError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_version_invalid_patch() {
        let result: Result<NodeVersion, _> = "v21.0.0-nightly20231010".parse();
        assert!(matches!(
            result,
            Err(VersionParseError::InvalidComponent {
                component: VersionComponent::Patch,
                ..
            })
        ));
    }

    #[test]
    fn test_version_ordering() {
        let older: NodeVersion = "v18.19.0".parse().unwrap();
        let newer: NodeVersion = "v20.0.0".parse().unwrap();
        assert!(newer > older);
        assert_eq!(newer.to_string(), "v20.0.0");
    }

    #[test]
    fn distribution_kind_detects_prerelease_channels() {
        assert_eq!(
            DistributionKind::from_version_spec("20-nightly"),
            DistributionKind::Nightly
        );
        assert_eq!(
            DistributionKind::from_version_spec("20.0.0-v8-canary2023"),
            DistributionKind::Canary
        );
        assert_eq!(
            DistributionKind::from_version_spec("20.0.0-rc.1"),
            DistributionKind::Rc
        );
        assert_eq!(
            DistributionKind::from_version_spec("18.x"),
            DistributionKind::Official
        );
        assert_eq!(
            DistributionKind::from_version_spec("lts/*"),
            DistributionKind::Official
        );
    }

    #[test]
    fn distribution_kind_mirrors_point_at_nodejs_org() {
        assert_eq!(
            DistributionKind::Official.mirror_url(),
            "https://nodejs.org/dist"
        );
        assert_eq!(
            DistributionKind::Rc.mirror_url(),
            "https://nodejs.org/download/rc"
        );
    }

    #[test]
    fn setup_request_delegates_distribution_lookup() {
        let request = SetupRequest {
            version_spec: "21-nightly".to_string(),
            check_latest: false,
            auth: None,
            stable: true,
            arch: "x64".to_string(),
        };

        assert_eq!(request.distribution(), DistributionKind::Nightly);
    }
}
