//! List rules command implementation.

use std::fmt::Write;
use swift_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    print!("{}", render());
}

/// Renders the rule table with presets and usage hints.
fn render() -> String {
    let mut out = String::from("Available rules:\n\n");
    let _ = writeln!(
        out,
        "{:<7} {:<38} {:<10} {:<8} Description",
        "Code", "Name", "Category", "Severity"
    );
    let _ = writeln!(out, "{}", "-".repeat(110));

    for rule in all_rules() {
        let name = if rule.opt_in() {
            format!("{} (opt-in)", rule.name())
        } else {
            rule.name().to_string()
        };
        let _ = writeln!(
            out,
            "{:<7} {:<38} {:<10} {:<8} {}",
            rule.code(),
            name,
            rule.category().to_string(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    out.push_str("\nPresets (set `preset` in swift-lint.toml):\n");
    out.push_str("  default  - every rule that is not opt-in\n");
    out.push_str("  all      - every rule\n");

    out.push_str("\nUse --rules to run specific rules, e.g.:\n");
    out.push_str("  swift-lint check --rules deployment-target\n");
    out.push_str("  swift-lint check --rules SL001,SL002\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_rule() {
        let listing = render();
        for rule in all_rules() {
            assert!(listing.contains(rule.code()));
            assert!(listing.contains(rule.name()));
        }
        assert!(listing.contains("no-extension-access-modifier (opt-in)"));
    }

    #[test]
    fn rule_table_snapshot() {
        let listing = render();
        let table: Vec<&str> = listing
            .lines()
            .filter(|line| line.starts_with("Code") || line.starts_with("SL"))
            .collect();
        insta::assert_snapshot!(table.join("\n"), @r"
        Code    Name                                   Category   Severity Description
        SL001   no-extension-access-modifier (opt-in)  idiomatic  error    Forbids access modifiers on extension declarations
        SL002   deployment-target                      lint       warning  Availability checks should not be satisfied by the deployment target
        ");
    }
}
