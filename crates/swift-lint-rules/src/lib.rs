//! # swift-lint-rules
//!
//! Built-in lint rules for swift-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | SL001 | `no-extension-access-modifier` | Forbids access modifiers on extensions (opt-in) |
//! | SL002 | `deployment-target` | Flags availability checks satisfied by the deployment target |
//!
//! ## Usage
//!
//! ```ignore
//! use swift_lint_core::{Analyzer, Config};
//! use swift_lint_rules::{rules_from_config, Preset};
//!
//! let config = Config::from_file("swift-lint.toml".as_ref())?;
//! let mut builder = Analyzer::builder().root("./Sources").parser(SwiftParser::new());
//! for rule in rules_from_config(&config, Preset::Default)? {
//!     builder = builder.rule_box(rule);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod deployment_target;
pub mod no_extension_access_modifier;
mod presets;

pub use deployment_target::{DeploymentTarget, DeploymentTargetConfig};
pub use no_extension_access_modifier::NoExtensionAccessModifier;
pub use presets::{all_rules, rules_from_config, select_rules, Preset};

/// Re-export core types for convenience.
pub use swift_lint_core::{Rule, Severity, Violation};
