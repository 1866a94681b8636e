//! Rule to forbid access modifiers on extension declarations.
//!
//! # Rationale
//!
//! An access modifier on an extension silently changes the default access of
//! every member declared inside it. Spelling the access level on each member
//! keeps it visible where the member is read.
//!
//! ```swift
//! private extension String {}   // flagged
//! extension String {            // fine
//!     private func trimmed() {}
//! }
//! ```
//!
//! # Suppression
//!
//! - `// swift-lint: allow(no-extension-access-modifier)` comment

use swift_lint_core::query::nearest_preceding_token;
use swift_lint_core::{
    traverse, AccessLevel, DeclKind, DeclarationNode, Location, Rule, RuleCategory, Severity,
    SourceFile, StructureError, Suggestion, TokenKind, Violation,
};

/// Rule code for no-extension-access-modifier.
pub const CODE: &str = "SL001";

/// Rule name for no-extension-access-modifier.
pub const NAME: &str = "no-extension-access-modifier";

/// Forbids an access-level keyword directly in front of a container declaration.
#[derive(Debug, Clone)]
pub struct NoExtensionAccessModifier {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoExtensionAccessModifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NoExtensionAccessModifier {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn check_node(&self, file: &SourceFile, node: &DeclarationNode) -> Option<Violation> {
        if !is_container(node.kind) {
            return None;
        }

        let modifier = nearest_preceding_token(file.tokens(), node.offset)?;
        if modifier.kind != TokenKind::Keyword || modifier.text.parse::<AccessLevel>().is_err() {
            return None;
        }

        let location =
            Location::from_offset(file.path().to_path_buf(), file.contents(), modifier.offset)
                .with_length(modifier.length);
        Some(
            Violation::new(
                CODE,
                NAME,
                self.severity,
                location,
                "Prefer not to use extension access modifiers",
            )
            .with_suggestion(Suggestion::new(format!(
                "Remove `{}` and declare the access level on each member instead",
                modifier.text
            ))),
        )
    }
}

/// Declarations whose access modifier leaks into every member.
fn is_container(kind: DeclKind) -> bool {
    match kind {
        DeclKind::Extension => true,
        DeclKind::Class
        | DeclKind::Struct
        | DeclKind::Enum
        | DeclKind::EnumCase
        | DeclKind::Protocol
        | DeclKind::Actor
        | DeclKind::Function
        | DeclKind::Initializer
        | DeclKind::Deinitializer
        | DeclKind::Subscript
        | DeclKind::Variable
        | DeclKind::TypeAlias
        | DeclKind::AssociatedType
        | DeclKind::Operator
        | DeclKind::PrecedenceGroup => false,
    }
}

impl Rule for NoExtensionAccessModifier {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn human_name(&self) -> &'static str {
        "No Extension Access Modifier"
    }

    fn description(&self) -> &'static str {
        "Forbids access modifiers on extension declarations"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Idiomatic
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn opt_in(&self) -> bool {
        true
    }

    fn check(&self, file: &SourceFile) -> Result<Vec<Violation>, StructureError> {
        traverse(file.tree(), |node| self.check_node(file, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use swift_lint_core::StructureParser;
    use swift_lint_ts::SwiftParser;

    fn swift_file(code: &str) -> SourceFile {
        SwiftParser::new()
            .parse(Path::new("Test.swift"), code)
            .expect("valid swift")
    }

    fn check_code(code: &str) -> Vec<Violation> {
        NoExtensionAccessModifier::new()
            .evaluate(&swift_file(code))
            .expect("well-formed fixture")
    }

    #[test]
    fn plain_extension_is_fine() {
        assert!(check_code("extension String {}").is_empty());
    }

    #[test]
    fn flags_private_extension() {
        let violations = check_code("private extension String {}");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.offset, 0);
        assert_eq!(violations[0].location.length, 7);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[0].message, "Prefer not to use extension access modifiers");
    }

    #[test]
    fn flags_modifier_across_newline() {
        let violations = check_code("public \n extension String {}");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.offset, 0);
        assert_eq!(violations[0].location.line, 1);
    }

    #[test]
    fn flags_every_access_level() {
        for level in ["private", "fileprivate", "internal", "package", "public", "open"] {
            let violations = check_code(&format!("{level} extension Foo {{}}"));
            assert_eq!(violations.len(), 1, "{level} should be flagged");
        }
    }

    #[test]
    fn ignores_non_access_modifiers_and_comments() {
        assert!(check_code("final extension Foo {}").is_empty());
        assert!(check_code("public /* hi */ extension Foo {}").is_empty());
        assert!(check_code("// public\nextension Foo {}").is_empty());
    }

    #[test]
    fn ignores_modifiers_on_other_declarations() {
        assert!(check_code("public class Foo {}").is_empty());
        assert!(check_code("private struct Foo {}\nextension Foo {}").is_empty());
        assert!(check_code("extension Foo {\n  public func bar() {}\n}").is_empty());
    }

    #[test]
    fn reports_multiple_extensions_in_order() {
        let violations =
            check_code("public extension A {}\nextension B {}\nprivate extension C {}");
        let lines: Vec<_> = violations.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn identifier_spelled_like_modifier_is_not_a_modifier() {
        let file = SourceFile::new(
            "Test.swift",
            "public extension A {}",
            vec![
                swift_lint_core::Token::new(TokenKind::Identifier, 0, "public"),
                swift_lint_core::Token::new(TokenKind::Keyword, 7, "extension"),
            ],
            {
                let mut tree = swift_lint_core::DeclarationTree::new();
                tree.insert(None, DeclarationNode::new(DeclKind::Extension, 7, 14));
                tree
            },
        )
        .expect("valid fixture");
        let violations = NoExtensionAccessModifier::new()
            .evaluate(&file)
            .expect("well-formed");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_metadata() {
        let rule = NoExtensionAccessModifier::new();
        assert_eq!(rule.code(), "SL001");
        assert_eq!(rule.category(), RuleCategory::Idiomatic);
        assert!(rule.opt_in());
        assert_eq!(
            rule.severity(Severity::Warning).default_severity(),
            Severity::Warning
        );
    }
}
