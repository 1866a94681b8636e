//! # swift-lint-core
//!
//! Core framework for linting Swift sources over a parser-independent
//! structure model.
//!
//! This crate provides the foundational types and layers rules are built on:
//!
//! - [`SourceFile`], a token stream plus a declaration tree, produced by a
//!   [`StructureParser`]
//! - [`query`] for regex matches inside byte ranges and token lookups
//! - [`traverse`] for depth-first walks over declarations
//! - [`version`] for version literals, platforms and deployment thresholds
//! - [`Rule`] trait and [`Violation`] for lint findings
//! - [`Analyzer`] for orchestrating lint execution over a source tree
//!
//! ## Example
//!
//! ```ignore
//! use swift_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Sources")
//!     .parser(SwiftParser::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod allowance;
mod analyzer;
mod config;
pub mod query;
mod rule;
mod syntax;
pub mod traverse;
mod types;
pub mod version;

pub use allowance::{AllowCheck, AllowDirective, AllowDirectives};
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use rule::{Rule, RuleBox};
pub use syntax::{
    AccessLevel, Attribute, DeclKind, DeclarationNode, DeclarationTree, NodeId, SourceFile,
    StructureError, StructureParser, Token, TokenKind,
};
pub use traverse::traverse;
pub use types::{
    LintResult, Location, RuleCategory, Severity, Suggestion, Violation, ViolationDiagnostic,
};
pub use version::{Platform, PlatformThresholds, Version, VersionError};
