//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# swift-lint configuration

# "default" runs every rule that is not opt-in; "all" runs every rule.
preset = "default"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./Sources"

# Glob patterns to exclude from analysis
exclude = [
    "**/.build/**",
    "**/Pods/**",
    "**/Carthage/**",
]

# Respect .gitignore files
respect_gitignore = true

# Maximum number of files analyzed in parallel (default: one per CPU)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.deployment-target]
enabled = true
# severity = "error"
ios_deployment_target = "7.0"
macos_deployment_target = "10.9"
watchos_deployment_target = "1.0"
tvos_deployment_target = "9.0"
# Application extensions inherit the platform target unless set here.
# ios_app_extension_deployment_target = "8.0"

# [rules.no-extension-access-modifier]
# enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("swift-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created swift-lint.toml");
    println!("\nNext steps:");
    println!("  1. Set the deployment targets for your project");
    println!("  2. Run: swift-lint check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swift_lint_core::Config;
    use swift_lint_rules::{rules_from_config, Preset};

    #[test]
    fn default_config_is_valid() {
        let config = Config::parse(DEFAULT_CONFIG).expect("template should parse");
        assert_eq!(config.preset.as_deref(), Some("default"));

        let rules = rules_from_config(&config, Preset::Default).expect("valid rule options");
        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["deployment-target"]);
    }
}
