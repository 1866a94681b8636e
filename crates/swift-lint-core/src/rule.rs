//! Rule trait for defining lint rules.

use crate::syntax::{SourceFile, StructureError};
use crate::types::{RuleCategory, Severity, Violation};

/// A per-file lint rule over the structure model.
///
/// Rules hold only immutable configuration, so one instance can evaluate many
/// files concurrently.
///
/// # Example
///
/// ```ignore
/// use swift_lint_core::{query, Location, Rule, Severity, SourceFile, StructureError, Violation};
///
/// pub struct NoForceTry;
///
/// impl Rule for NoForceTry {
///     fn name(&self) -> &'static str { "no-force-try" }
///     fn code(&self) -> &'static str { "SL900" }
///     fn human_name(&self) -> &'static str { "No Force Try" }
///
///     fn check(&self, file: &SourceFile) -> Result<Vec<Violation>, StructureError> {
///         // query the token stream or traverse the declaration tree here
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case identifier of this rule (e.g., "deployment-target").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "SL002").
    fn code(&self) -> &'static str;

    /// Returns the human-readable rule name (e.g., "Deployment Target").
    fn human_name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the category this rule is listed under.
    fn category(&self) -> RuleCategory {
        RuleCategory::Lint
    }

    /// Returns the severity violations from this rule are reported with.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Whether the rule only runs when explicitly enabled.
    fn opt_in(&self) -> bool {
        false
    }

    /// Finds violations in a single file, in any order.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if the file's declaration tree is malformed.
    fn check(&self, file: &SourceFile) -> Result<Vec<Violation>, StructureError>;

    /// Evaluates the rule and returns violations sorted by byte offset.
    ///
    /// The sort is stable, so violations at the same offset keep the order
    /// [`Rule::check`] produced them in.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Rule::check`].
    fn evaluate(&self, file: &SourceFile) -> Result<Vec<Violation>, StructureError> {
        let mut violations = self.check(file)?;
        violations.sort_by_key(|v| v.location.offset);
        Ok(violations)
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::DeclarationTree;
    use crate::types::Location;

    struct ReversedRule;

    impl Rule for ReversedRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn human_name(&self) -> &'static str {
            "Test Rule"
        }

        fn check(&self, file: &SourceFile) -> Result<Vec<Violation>, StructureError> {
            let at = |offset, message: &str| {
                Violation::new(
                    self.code(),
                    self.name(),
                    self.default_severity(),
                    Location::from_offset(file.path().to_path_buf(), file.contents(), offset),
                    message,
                )
            };
            Ok(vec![at(4, "late"), at(0, "first"), at(4, "second")])
        }
    }

    #[test]
    fn test_rule_defaults() {
        let rule = ReversedRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.default_severity(), Severity::Warning);
        assert_eq!(rule.category(), RuleCategory::Lint);
        assert!(!rule.opt_in());
    }

    #[test]
    fn evaluate_sorts_stably_by_offset() {
        let file = SourceFile::new("a.swift", "let a = 1", Vec::new(), DeclarationTree::new())
            .expect("valid file");
        let messages: Vec<_> = ReversedRule
            .evaluate(&file)
            .expect("no structure error")
            .into_iter()
            .map(|v| v.message)
            .collect();
        assert_eq!(messages, vec!["first", "late", "second"]);
    }
}
