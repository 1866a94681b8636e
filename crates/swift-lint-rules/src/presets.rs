//! Rule presets and construction from configuration.

use crate::{
    deployment_target, no_extension_access_modifier, DeploymentTarget, NoExtensionAccessModifier,
};
use std::str::FromStr;
use swift_lint_core::{Config, ConfigError, Rule, RuleBox};

/// Preset configurations for swift-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every rule that is not opt-in.
    #[default]
    Default,
    /// Every rule, opt-in rules included.
    All,
}

impl Preset {
    /// Returns the rules for this preset, with default settings.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        all_rules()
            .into_iter()
            .filter(|rule| self.includes(rule.as_ref()))
            .collect()
    }

    fn includes(self, rule: &dyn Rule) -> bool {
        match self {
            Self::Default => !rule.opt_in(),
            Self::All => true,
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "all" => Ok(Self::All),
            other => Err(ConfigError::Parse {
                message: format!("unknown preset '{other}' (expected \"default\" or \"all\")"),
            }),
        }
    }
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoExtensionAccessModifier::new()),
        Box::new(DeploymentTarget::new()),
    ]
}

/// Builds every rule from its `[rules.<name>]` section.
fn configured_rules(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let mut modifier = NoExtensionAccessModifier::new();
    if let Some(severity) = config.rule_severity(no_extension_access_modifier::NAME) {
        modifier = modifier.severity(severity);
    }
    let deployment = DeploymentTarget::from_rule_config(config.rule(deployment_target::NAME))?;

    Ok(vec![Box::new(modifier), Box::new(deployment)])
}

/// Builds the rules enabled by `preset` and the configuration.
///
/// A rule runs when its section sets `enabled = true`, or when it has no
/// `enabled` entry and the preset includes it.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOption`] if a rule's options are invalid.
pub fn rules_from_config(config: &Config, preset: Preset) -> Result<Vec<RuleBox>, ConfigError> {
    Ok(configured_rules(config)?
        .into_iter()
        .filter(|rule| {
            let enabled = config.is_rule_enabled(rule.name(), preset.includes(rule.as_ref()));
            if !enabled {
                tracing::debug!("Skipping disabled rule: {}", rule.name());
            }
            enabled
        })
        .collect())
}

/// Builds only the named rules, matched by name or code, ignoring presets and
/// `enabled` flags.
///
/// Unknown names are logged and skipped.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOption`] if a rule's options are invalid.
pub fn select_rules(config: &Config, names: &[&str]) -> Result<Vec<RuleBox>, ConfigError> {
    for name in names {
        if !all_rules()
            .iter()
            .any(|rule| rule.name() == *name || rule.code() == *name)
        {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    Ok(configured_rules(config)?
        .into_iter()
        .filter(|rule| names.iter().any(|n| rule.name() == *n || rule.code() == *n))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use swift_lint_core::Analyzer;
    use swift_lint_ts::SwiftParser;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(names(&Preset::Default.rules()), vec!["deployment-target"]);
        assert_eq!(
            names(&Preset::All.rules()),
            vec!["no-extension-access-modifier", "deployment-target"]
        );
    }

    #[test]
    fn parses_preset_names() {
        assert_eq!("all".parse::<Preset>().ok(), Some(Preset::All));
        assert!("strict".parse::<Preset>().is_err());
    }

    #[test]
    fn config_can_enable_opt_in_and_disable_default() {
        let config = Config::parse(
            "[rules.no-extension-access-modifier]\nenabled = true\n\
             [rules.deployment-target]\nenabled = false",
        )
        .expect("valid toml");
        let rules = rules_from_config(&config, Preset::Default).expect("valid options");
        assert_eq!(names(&rules), vec!["no-extension-access-modifier"]);
    }

    #[test]
    fn invalid_options_fail_construction() {
        let config = Config::parse("[rules.deployment-target]\nios_deployment_target = \"nine\"")
            .expect("valid toml");
        assert!(rules_from_config(&config, Preset::Default).is_err());
    }

    #[test]
    fn selects_by_name_or_code() {
        let config = Config::default();
        let rules = select_rules(&config, &["SL001", "no-such-rule"]).expect("valid options");
        assert_eq!(names(&rules), vec!["no-extension-access-modifier"]);
    }

    #[test]
    fn selected_rule_runs_even_when_config_disables_it() {
        let config = Config::parse("[rules.no-extension-access-modifier]\nenabled = false")
            .expect("valid toml");
        assert!(rules_from_config(&config, Preset::All)
            .expect("valid options")
            .iter()
            .all(|r| r.name() != "no-extension-access-modifier"));

        let mut builder = Analyzer::builder()
            .config(config.clone())
            .parser(SwiftParser::new());
        for rule in select_rules(&config, &["SL001"]).expect("valid options") {
            builder = builder.rule_box(rule);
        }
        let analyzer = builder.build().expect("analyzer should build");
        let violations = analyzer
            .check_source(Path::new("T.swift"), "private extension String {}")
            .expect("valid swift");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "SL001");
    }

    #[test]
    fn severity_override_applies_to_configured_rules() {
        let config = Config::parse("[rules.no-extension-access-modifier]\nseverity = \"warning\"")
            .expect("valid toml");
        let rules = rules_from_config(&config, Preset::All).expect("valid options");
        assert_eq!(
            rules[0].default_severity(),
            swift_lint_core::Severity::Warning
        );
    }
}
