//! Rule to flag availability checks already satisfied by the deployment target.
//!
//! # Rationale
//!
//! `@available(iOS 6.0, *)` or `if #available(iOS 6.0, *)` is dead weight when
//! the app never runs on anything older than the deployment target. Versions
//! equal to the deployment target count as redundant too.
//!
//! # Configuration
//!
//! - `ios_deployment_target`: Minimum iOS version (default: `"7.0"`)
//! - `macos_deployment_target`: Minimum macOS version (default: `"10.9"`)
//! - `tvos_deployment_target`: Minimum tvOS version (default: `"9.0"`)
//! - `watchos_deployment_target`: Minimum watchOS version (default: `"1.0"`)
//! - `*_app_extension_deployment_target`: Per-platform override for app
//!   extensions (default: the platform's value)
//!
//! # Suppression
//!
//! - `// swift-lint: allow(deployment-target)` comment

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;
use swift_lint_core::query::find_matches;
use swift_lint_core::{
    traverse, ConfigError, Location, Platform, PlatformThresholds, Rule, RuleConfig, Severity,
    SourceFile, StructureError, TokenKind, Version, Violation,
};

/// Rule code for deployment-target.
pub const CODE: &str = "SL002";

/// Rule name for deployment-target.
pub const NAME: &str = "deployment-target";

/// `<platform> <version>` inside an availability argument list.
static PLATFORM_VERSION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:{})\s+[\d.]+", Platform::NAMES.join("|"))).ok()
});

static AVAILABLE_CONDITION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"#available\s*\([^(]+\)").ok());

static UNAVAILABLE_CONDITION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"#unavailable\s*\([^(]+\)").ok());

/// Where a redundant version was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityKind {
    /// `@available(...)` on a declaration.
    Attribute,
    /// `#available(...)` in a condition.
    Condition,
    /// `#unavailable(...)` in a condition.
    NegativeCondition,
}

impl fmt::Display for AvailabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Attribute => "attribute",
            Self::Condition => "condition",
            Self::NegativeCondition => "negative condition",
        })
    }
}

/// A platform/version pair found in an availability argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityPair {
    /// Resolved platform.
    pub platform: Platform,
    /// Platform name as written (`OSX`, `macOS`, ...).
    pub platform_text: String,
    /// Parsed version.
    pub version: Version,
    /// Version as written.
    pub version_text: String,
    /// Deployment target configured for the platform.
    pub threshold: Version,
}

impl AvailabilityPair {
    /// True if every supported OS version already satisfies this check.
    #[must_use]
    pub fn is_redundant(&self) -> bool {
        self.version <= self.threshold
    }
}

/// Deployment targets for [`DeploymentTarget`], as read from
/// `[rules.deployment-target]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentTargetConfig {
    /// Minimum iOS version.
    #[serde(default = "default_ios")]
    pub ios_deployment_target: Version,
    /// Minimum iOS app extension version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios_app_extension_deployment_target: Option<Version>,
    /// Minimum macOS version.
    #[serde(default = "default_macos")]
    pub macos_deployment_target: Version,
    /// Minimum macOS app extension version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macos_app_extension_deployment_target: Option<Version>,
    /// Minimum tvOS version.
    #[serde(default = "default_tvos")]
    pub tvos_deployment_target: Version,
    /// Minimum tvOS app extension version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvos_app_extension_deployment_target: Option<Version>,
    /// Minimum watchOS version.
    #[serde(default = "default_watchos")]
    pub watchos_deployment_target: Version,
    /// Minimum watchOS app extension version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watchos_app_extension_deployment_target: Option<Version>,
}

fn default_ios() -> Version {
    Version::new(7, 0, 0)
}

fn default_macos() -> Version {
    Version::new(10, 9, 0)
}

fn default_tvos() -> Version {
    Version::new(9, 0, 0)
}

fn default_watchos() -> Version {
    Version::new(1, 0, 0)
}

impl Default for DeploymentTargetConfig {
    fn default() -> Self {
        Self {
            ios_deployment_target: default_ios(),
            ios_app_extension_deployment_target: None,
            macos_deployment_target: default_macos(),
            macos_app_extension_deployment_target: None,
            tvos_deployment_target: default_tvos(),
            tvos_app_extension_deployment_target: None,
            watchos_deployment_target: default_watchos(),
            watchos_app_extension_deployment_target: None,
        }
    }
}

impl DeploymentTargetConfig {
    /// Resolves the per-platform minimums, filling in app extensions.
    #[must_use]
    pub fn thresholds(&self) -> PlatformThresholds {
        let overrides = [
            (
                Platform::IosApplicationExtension,
                self.ios_app_extension_deployment_target,
            ),
            (
                Platform::MacOsApplicationExtension,
                self.macos_app_extension_deployment_target,
            ),
            (
                Platform::TvOsApplicationExtension,
                self.tvos_app_extension_deployment_target,
            ),
            (
                Platform::WatchOsApplicationExtension,
                self.watchos_app_extension_deployment_target,
            ),
        ];

        overrides.into_iter().fold(
            PlatformThresholds::new(
                self.ios_deployment_target,
                self.macos_deployment_target,
                self.tvos_deployment_target,
                self.watchos_deployment_target,
            ),
            |thresholds, (platform, version)| match version {
                Some(version) => thresholds.with(platform, version),
                None => thresholds,
            },
        )
    }
}

/// Flags `@available`, `#available` and `#unavailable` versions at or below
/// the deployment target.
#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    thresholds: PlatformThresholds,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for DeploymentTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl DeploymentTarget {
    /// Creates a new rule with the default deployment targets.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&DeploymentTargetConfig::default())
    }

    /// Creates a rule from typed configuration.
    #[must_use]
    pub fn with_config(config: &DeploymentTargetConfig) -> Self {
        Self {
            thresholds: config.thresholds(),
            severity: Severity::Warning,
        }
    }

    /// Creates a rule from its `[rules.deployment-target]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if a deployment target is not a
    /// valid version or an unknown option is present.
    pub fn from_rule_config(config: Option<&RuleConfig>) -> Result<Self, ConfigError> {
        let Some(config) = config else {
            return Ok(Self::new());
        };
        let options: DeploymentTargetConfig = config.options(NAME)?;
        let rule = Self::with_config(&options);
        Ok(match config.severity {
            Some(severity) => rule.severity(severity),
            None => rule,
        })
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// The resolved per-platform minimums.
    #[must_use]
    pub fn thresholds(&self) -> &PlatformThresholds {
        &self.thresholds
    }

    /// Finds every known `<platform> <version>` pair inside `range`.
    ///
    /// A candidate is skipped unless it covers exactly a word token followed
    /// by a number token, names a known platform, and holds a valid version.
    #[must_use]
    pub fn availability_pairs(
        &self,
        file: &SourceFile,
        range: Range<usize>,
    ) -> Vec<AvailabilityPair> {
        let Some(pattern) = PLATFORM_VERSION.as_ref() else {
            return Vec::new();
        };

        find_matches(file, pattern, range)
            .into_iter()
            .filter_map(|m| {
                let [word, number] = m.tokens else {
                    return None;
                };
                if !matches!(word.kind, TokenKind::Keyword | TokenKind::Identifier)
                    || number.kind != TokenKind::Number
                {
                    return None;
                }
                let (platform, threshold) = self.thresholds.resolve(&word.text)?;
                let version = number.text.parse().ok()?;
                Some(AvailabilityPair {
                    platform,
                    platform_text: word.text.clone(),
                    version,
                    version_text: number.text.clone(),
                    threshold,
                })
            })
            .collect()
    }

    fn attribute_findings(
        &self,
        file: &SourceFile,
    ) -> Result<Vec<(usize, AvailabilityKind, AvailabilityPair)>, StructureError> {
        traverse(file.tree(), |node| {
            node.attributes
                .iter()
                .filter(|attribute| attribute.name == "available")
                .flat_map(|attribute| {
                    self.availability_pairs(file, attribute.range())
                        .into_iter()
                        .map(|pair| (attribute.offset, AvailabilityKind::Attribute, pair))
                })
                .collect::<Vec<_>>()
        })
    }

    fn condition_findings(
        &self,
        file: &SourceFile,
        pattern: &Regex,
        keyword: &str,
        kind: AvailabilityKind,
    ) -> Vec<(usize, AvailabilityKind, AvailabilityPair)> {
        find_matches(file, pattern, 0..file.contents().len())
            .into_iter()
            .filter_map(|m| {
                let leading = m.tokens.first()?;
                (leading.kind == TokenKind::Keyword && leading.text == keyword)
                    .then(|| (leading.offset, leading.end()..m.range.end))
            })
            .flat_map(|(offset, rest)| {
                self.availability_pairs(file, rest)
                    .into_iter()
                    .map(move |pair| (offset, kind, pair))
            })
            .collect()
    }

    fn violation(
        &self,
        file: &SourceFile,
        offset: usize,
        kind: AvailabilityKind,
        pair: &AvailabilityPair,
    ) -> Violation {
        Violation::new(
            CODE,
            NAME,
            self.severity,
            Location::from_offset(file.path().to_path_buf(), file.contents(), offset),
            format!(
                "Availability {kind} is using a version ({}) that is satisfied by the \
                 deployment target ({}) for platform {}",
                pair.version_text, pair.threshold, pair.platform_text
            ),
        )
    }
}

impl Rule for DeploymentTarget {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn human_name(&self) -> &'static str {
        "Deployment Target"
    }

    fn description(&self) -> &'static str {
        "Availability checks should not be satisfied by the deployment target"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, file: &SourceFile) -> Result<Vec<Violation>, StructureError> {
        let mut findings = self.attribute_findings(file)?;

        let conditions = [
            (&AVAILABLE_CONDITION, "#available", AvailabilityKind::Condition),
            (
                &UNAVAILABLE_CONDITION,
                "#unavailable",
                AvailabilityKind::NegativeCondition,
            ),
        ];
        for (pattern, keyword, kind) in conditions {
            if let Some(pattern) = pattern.as_ref() {
                findings.extend(self.condition_findings(file, pattern, keyword, kind));
            }
        }

        let mut seen = HashSet::new();
        let mut violations: Vec<_> = findings
            .into_iter()
            .filter(|(offset, _, pair)| {
                pair.is_redundant() && seen.insert((pair.platform, *offset))
            })
            .map(|(offset, kind, pair)| self.violation(file, offset, kind, &pair))
            .collect();
        violations.sort_by_key(|v| v.location.offset);
        Ok(violations)
    }
}
