//! # swift-lint-ts
//!
//! Tree-sitter based structure parser for swift-lint.
//!
//! [`SwiftParser`] implements [`swift_lint_core::StructureParser`]: it turns a
//! Swift file into the token stream and declaration tree that rules query.
//! Declaration offsets point at the introducing keyword, so modifiers and
//! attributes sit in the token stream just before a declaration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod swift;

pub use swift::SwiftParser;
