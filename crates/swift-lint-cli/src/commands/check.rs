//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use swift_lint_core::{Analyzer, Config, RuleBox};
use swift_lint_rules::{rules_from_config, select_rules, Preset};
use swift_lint_ts::SwiftParser;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line options of `swift-lint check`.
pub struct CheckOptions {
    /// How to print the results.
    pub format: OutputFormat,
    /// Rule names or codes to run instead of the configured set.
    pub rules: Vec<String>,
    /// Extra exclude globs on top of the configured ones.
    pub exclude: Vec<String>,
    /// Abort on unparsable files instead of skipping them.
    pub fail_on_parse_error: bool,
}

/// Runs the check command.
///
/// Exits the process with status 1 when any error-severity violation is found.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let config = load_config(source)?;
    let rules = build_rules(&config, &options.rules)?;

    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .parser(SwiftParser::new())
        .excludes(options.exclude.iter().cloned())
        .fail_on_parse_error(options.fail_on_parse_error);
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Explicit `--rules` win over the preset and `enabled` flags.
fn build_rules(config: &Config, only: &[String]) -> Result<Vec<RuleBox>> {
    if !only.is_empty() {
        let names: Vec<&str> = only.iter().map(|n| n.trim()).collect();
        return select_rules(config, &names).context("Invalid rule configuration");
    }

    let preset: Preset = match config.preset.as_deref() {
        Some(name) => name.parse().context("Invalid preset")?,
        None => Preset::default(),
    };
    rules_from_config(config, preset).context("Invalid rule configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn preset_comes_from_config() {
        let config = Config::parse("preset = \"all\"").unwrap();
        assert_eq!(
            names(&build_rules(&config, &[]).unwrap()),
            vec!["no-extension-access-modifier", "deployment-target"]
        );
        assert_eq!(
            names(&build_rules(&Config::default(), &[]).unwrap()),
            vec!["deployment-target"]
        );
    }

    #[test]
    fn explicit_rules_override_preset() {
        let config = Config::parse("[rules.no-extension-access-modifier]\nenabled = false").unwrap();
        let rules = build_rules(&config, &[" SL001".to_string()]).unwrap();
        assert_eq!(names(&rules), vec!["no-extension-access-modifier"]);

        let mut builder = Analyzer::builder()
            .config(config)
            .parser(SwiftParser::new());
        for rule in rules {
            builder = builder.rule_box(rule);
        }
        let violations = builder
            .build()
            .unwrap()
            .check_source(Path::new("Ext.swift"), "public extension Int {}")
            .unwrap();
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let config = Config::parse("preset = \"strict\"").unwrap();
        assert!(build_rules(&config, &[]).is_err());
    }
}
