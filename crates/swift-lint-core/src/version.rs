//! Version literals and platform deployment thresholds.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Error returned when text is not a `N`, `N.N` or `N.N.N` version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// The text was empty.
    #[error("version is empty")]
    Empty,

    /// More than three dot-separated components.
    #[error("version '{0}' has more than three components")]
    TooManyComponents(String),

    /// A component is empty, not decimal, or does not fit in 32 bits.
    #[error("version '{text}' has an invalid component '{component}'")]
    InvalidComponent {
        /// Full input text.
        text: String,
        /// The offending component.
        component: String,
    },
}

/// A dotted numeric version. Missing minor and patch components are zero.
///
/// Ordering is lexicographic over `(major, minor, patch)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl Version {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

/// Compares two versions.
#[must_use]
pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut parts = [0_u32; 3];
        for (index, component) in text.split('.').enumerate() {
            if index >= parts.len() {
                return Err(VersionError::TooManyComponents(text.to_string()));
            }
            let invalid = || VersionError::InvalidComponent {
                text: text.to_string(),
                component: component.to_string(),
            };
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            parts[index] = component.parse().map_err(|_| invalid())?;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

/// Formats as `major.minor`, adding `.patch` only when it is non-zero.
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.patch != 0 {
            write!(f, ".{}", self.patch)?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VersionVisitor;

        impl Visitor<'_> for VersionVisitor {
            type Value = Version;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a version string such as \"9.0\" or an integer major version")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Version, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Version, E> {
                u32::try_from(v)
                    .map(|major| Version::new(major, 0, 0))
                    .map_err(|_| E::custom(format!("version major {v} is too large")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Version, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("version {v} is negative")))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Version, E> {
                Err(E::custom(format!(
                    "version {v} must be quoted (e.g. \"{v}\") so minor versions like 10.10 survive"
                )))
            }
        }

        deserializer.deserialize_any(VersionVisitor)
    }
}

/// Apple platforms that appear in availability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    /// `iOS`
    Ios,
    /// `iOSApplicationExtension`
    IosApplicationExtension,
    /// `macOS` / `OSX`
    MacOs,
    /// `macOSApplicationExtension` / `OSXApplicationExtension`
    MacOsApplicationExtension,
    /// `tvOS`
    TvOs,
    /// `tvOSApplicationExtension`
    TvOsApplicationExtension,
    /// `watchOS`
    WatchOs,
    /// `watchOSApplicationExtension`
    WatchOsApplicationExtension,
}

impl Platform {
    /// All platforms.
    pub const ALL: [Self; 8] = [
        Self::Ios,
        Self::IosApplicationExtension,
        Self::MacOs,
        Self::MacOsApplicationExtension,
        Self::TvOs,
        Self::TvOsApplicationExtension,
        Self::WatchOs,
        Self::WatchOsApplicationExtension,
    ];

    /// Every accepted source spelling, aliases included.
    pub const NAMES: [&'static str; 10] = [
        "iOS",
        "iOSApplicationExtension",
        "macOS",
        "macOSApplicationExtension",
        "OSX",
        "OSXApplicationExtension",
        "tvOS",
        "tvOSApplicationExtension",
        "watchOS",
        "watchOSApplicationExtension",
    ];

    /// Resolves a case-sensitive source name, applying the `OSX` aliases.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "iOS" => Some(Self::Ios),
            "iOSApplicationExtension" => Some(Self::IosApplicationExtension),
            "macOS" | "OSX" => Some(Self::MacOs),
            "macOSApplicationExtension" | "OSXApplicationExtension" => {
                Some(Self::MacOsApplicationExtension)
            }
            "tvOS" => Some(Self::TvOs),
            "tvOSApplicationExtension" => Some(Self::TvOsApplicationExtension),
            "watchOS" => Some(Self::WatchOs),
            "watchOSApplicationExtension" => Some(Self::WatchOsApplicationExtension),
            _ => None,
        }
    }

    /// Canonical spelling.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::IosApplicationExtension => "iOSApplicationExtension",
            Self::MacOs => "macOS",
            Self::MacOsApplicationExtension => "macOSApplicationExtension",
            Self::TvOs => "tvOS",
            Self::TvOsApplicationExtension => "tvOSApplicationExtension",
            Self::WatchOs => "watchOS",
            Self::WatchOsApplicationExtension => "watchOSApplicationExtension",
        }
    }

    /// The app platform an application-extension platform belongs to.
    #[must_use]
    pub fn base(self) -> Self {
        match self {
            Self::Ios | Self::IosApplicationExtension => Self::Ios,
            Self::MacOs | Self::MacOsApplicationExtension => Self::MacOs,
            Self::TvOs | Self::TvOsApplicationExtension => Self::TvOs,
            Self::WatchOs | Self::WatchOsApplicationExtension => Self::WatchOs,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum deployment version for every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformThresholds {
    minimums: BTreeMap<Platform, Version>,
}

impl PlatformThresholds {
    /// Creates thresholds from the four app platforms.
    ///
    /// Application-extension platforms inherit their base platform's minimum.
    #[must_use]
    pub fn new(ios: Version, macos: Version, tvos: Version, watchos: Version) -> Self {
        let minimums = Platform::ALL
            .into_iter()
            .map(|platform| {
                let version = match platform.base() {
                    Platform::MacOs => macos,
                    Platform::TvOs => tvos,
                    Platform::WatchOs => watchos,
                    _ => ios,
                };
                (platform, version)
            })
            .collect();
        Self { minimums }
    }

    /// Overrides the minimum for one platform.
    #[must_use]
    pub fn with(mut self, platform: Platform, version: Version) -> Self {
        self.minimums.insert(platform, version);
        self
    }

    /// Minimum version configured for `platform`.
    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<Version> {
        self.minimums.get(&platform).copied()
    }

    /// Resolves a source platform name to its platform and configured minimum.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<(Platform, Version)> {
        let platform = Platform::from_name(name)?;
        self.get(platform).map(|version| (platform, version))
    }
}
