//! Structure model for one source file: a flat token stream plus a
//! declaration tree.
//!
//! The model is produced by a [`StructureParser`] and is immutable afterwards.
//! All positions are byte offsets into [`SourceFile::contents`].

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Errors raised when a file's structure is malformed or cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// The parser reported a syntax error.
    #[error("syntax error at byte {offset}")]
    Syntax {
        /// Byte offset of the first erroneous node.
        offset: usize,
    },

    /// The parser could not produce a tree at all.
    #[error("parser failure: {message}")]
    Parser {
        /// Description from the parser backend.
        message: String,
    },

    /// A token lies (partly) outside the file, or is empty.
    #[error("token at byte {offset} (length {length}) is outside the file")]
    TokenOutOfBounds {
        /// Token offset.
        offset: usize,
        /// Token length.
        length: usize,
    },

    /// Tokens are not ordered or overlap.
    #[error("token at byte {offset} overlaps or precedes the previous token")]
    TokenOrder {
        /// Offset of the offending token.
        offset: usize,
    },

    /// A declaration lies outside the file or outside its parent.
    #[error("declaration {node} at byte {offset} is outside its enclosing range")]
    NodeOutOfBounds {
        /// Arena index of the node.
        node: usize,
        /// Node offset.
        offset: usize,
    },

    /// The declaration tree contains a cycle or a shared child.
    #[error("declaration {node} is reachable more than once")]
    Cycle {
        /// Arena index of the node reached twice.
        node: usize,
    },

    /// A child reference points outside the arena.
    #[error("declaration {node} does not exist")]
    DanglingNode {
        /// The missing arena index.
        node: usize,
    },
}

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved word or `#`-directive such as `#available`.
    Keyword,
    /// Identifier or type name.
    Identifier,
    /// Numeric literal; dotted version literals form a single token.
    Number,
    /// Part of a string literal.
    String,
    /// Line or block comment.
    Comment,
    /// Operators and delimiters.
    Punctuation,
    /// Anything else.
    Other,
}

/// A single token of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical class.
    pub kind: TokenKind,
    /// Byte offset of the first byte.
    pub offset: usize,
    /// Length in bytes, always positive.
    pub length: usize,
    /// Source text of the token.
    pub text: String,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub fn new(kind: TokenKind, offset: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind,
            offset,
            length: text.len(),
            text,
        }
    }

    /// Byte offset one past the last byte.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Byte range covered by the token.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Swift access-control keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    /// `private`
    Private,
    /// `fileprivate`
    FilePrivate,
    /// `internal`
    Internal,
    /// `package`
    Package,
    /// `public`
    Public,
    /// `open`
    Open,
}

impl AccessLevel {
    /// Keyword spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::FilePrivate => "fileprivate",
            Self::Internal => "internal",
            Self::Package => "package",
            Self::Public => "public",
            Self::Open => "open",
        }
    }
}

impl FromStr for AccessLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "fileprivate" => Ok(Self::FilePrivate),
            "internal" => Ok(Self::Internal),
            "package" => Ok(Self::Package),
            "public" => Ok(Self::Public),
            "open" => Ok(Self::Open),
            _ => Err(()),
        }
    }
}

/// Kind of declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// `extension Foo`
    Extension,
    /// `class Foo`
    Class,
    /// `struct Foo`
    Struct,
    /// `enum Foo`
    Enum,
    /// `case foo` inside an enum
    EnumCase,
    /// `protocol Foo`
    Protocol,
    /// `actor Foo`
    Actor,
    /// `func foo()`
    Function,
    /// `init()`
    Initializer,
    /// `deinit`
    Deinitializer,
    /// `subscript(...)`
    Subscript,
    /// `let`/`var` property
    Variable,
    /// `typealias Foo = Bar`
    TypeAlias,
    /// `associatedtype Foo`
    AssociatedType,
    /// `operator` declaration
    Operator,
    /// `precedencegroup` declaration
    PrecedenceGroup,
}

/// An attribute such as `@available(iOS 13, *)` attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name without the `@` (e.g. `available`).
    pub name: String,
    /// Byte offset of the `@`.
    pub offset: usize,
    /// Length of the whole attribute including its argument list.
    pub length: usize,
}

impl Attribute {
    /// Creates an attribute occurrence.
    #[must_use]
    pub fn new(name: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            name: name.into(),
            offset,
            length,
        }
    }

    /// Byte range of the attribute.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Index of a node inside a [`DeclarationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A declaration in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationNode {
    /// Declaration kind.
    pub kind: DeclKind,
    /// Declared name, when the declaration has one.
    pub name: Option<String>,
    /// Byte offset of the introducing keyword (after modifiers and attributes).
    pub offset: usize,
    /// Length up to the end of the declaration.
    pub length: usize,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Nested declarations in source order.
    pub children: Vec<NodeId>,
}

impl DeclarationNode {
    /// Creates a node with no attributes or children.
    #[must_use]
    pub fn new(kind: DeclKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            name: None,
            offset,
            length,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the declared name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Byte range of the declaration.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Arena-backed declaration tree for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationTree {
    nodes: Vec<DeclarationNode>,
    roots: Vec<NodeId>,
}

impl DeclarationTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node under `parent`, or as a root when `parent` is `None`.
    ///
    /// Returns the new node's id. An unknown `parent` id leaves the node
    /// unattached; traversal never reaches it.
    pub fn insert(&mut self, parent: Option<NodeId>, node: DeclarationNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent.0) {
                    p.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Top-level declarations in source order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&DeclarationNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DeclarationNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    #[cfg(test)]
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }
}

/// A parsed source file: path, contents, tokens, and declarations.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    contents: String,
    tokens: Vec<Token>,
    tree: DeclarationTree,
}

impl SourceFile {
    /// Builds a source file, validating the structure against `contents`.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if a token is empty, out of bounds, or
    /// out of order, or if a declaration lies outside the file.
    pub fn new(
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
        tokens: Vec<Token>,
        tree: DeclarationTree,
    ) -> Result<Self, StructureError> {
        let contents = contents.into();
        let len = contents.len();

        let mut previous_end = 0;
        for token in &tokens {
            if token.length == 0 || token.end() > len {
                return Err(StructureError::TokenOutOfBounds {
                    offset: token.offset,
                    length: token.length,
                });
            }
            if token.offset < previous_end {
                return Err(StructureError::TokenOrder {
                    offset: token.offset,
                });
            }
            previous_end = token.end();
        }

        for (id, node) in tree.nodes() {
            if node.range().end > len {
                return Err(StructureError::NodeOutOfBounds {
                    node: id.0,
                    offset: node.offset,
                });
            }
            for &child_id in &node.children {
                let Some(child) = tree.get(child_id) else {
                    continue;
                };
                if child.offset < node.offset || child.range().end > node.range().end {
                    return Err(StructureError::NodeOutOfBounds {
                        node: child_id.0,
                        offset: child.offset,
                    });
                }
            }
        }

        Ok(Self {
            path: path.into(),
            contents,
            tokens,
            tree,
        })
    }

    /// Path of the file, as given to the parser.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full file text.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Token stream ordered by offset.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Declaration tree.
    #[must_use]
    pub fn tree(&self) -> &DeclarationTree {
        &self.tree
    }
}

/// Produces the structure model for a language.
///
/// Implement this to plug a parser backend into the analyzer.
pub trait StructureParser: Send + Sync {
    /// Language identifier (e.g., `"swift"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles, without the dot (e.g., `&["swift"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parses `contents` into a [`SourceFile`].
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] when the input is not syntactically valid.
    fn parse(&self, path: &Path, contents: &str) -> Result<SourceFile, StructureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_overlapping_tokens() {
        let tokens = vec![
            Token::new(TokenKind::Keyword, 0, "private"),
            Token::new(TokenKind::Keyword, 3, "vate"),
        ];
        let err = SourceFile::new("a.swift", "private", tokens, DeclarationTree::new())
            .expect_err("overlap must be rejected");
        assert_eq!(err, StructureError::TokenOrder { offset: 3 });
    }

    #[test]
    fn rejects_token_past_end() {
        let tokens = vec![Token::new(TokenKind::Identifier, 2, "abc")];
        let err = SourceFile::new("a.swift", "abc", tokens, DeclarationTree::new())
            .expect_err("token past end must be rejected");
        assert!(matches!(err, StructureError::TokenOutOfBounds { .. }));
    }

    #[test]
    fn rejects_node_past_end() {
        let mut tree = DeclarationTree::new();
        tree.insert(None, DeclarationNode::new(DeclKind::Class, 0, 50));
        let err = SourceFile::new("a.swift", "class A {}", Vec::new(), tree)
            .expect_err("node past end must be rejected");
        assert_eq!(err, StructureError::NodeOutOfBounds { node: 0, offset: 0 });
    }

    #[test]
    fn rejects_child_outside_parent() {
        let mut tree = DeclarationTree::new();
        let root = tree.insert(None, DeclarationNode::new(DeclKind::Extension, 0, 5));
        tree.insert(Some(root), DeclarationNode::new(DeclKind::Function, 3, 6));
        let err = SourceFile::new("a.swift", "extension A {}", Vec::new(), tree)
            .expect_err("child must lie inside parent");
        assert_eq!(err, StructureError::NodeOutOfBounds { node: 1, offset: 3 });
    }

    #[test]
    fn insert_attaches_children_in_order() {
        let mut tree = DeclarationTree::new();
        let root = tree.insert(None, DeclarationNode::new(DeclKind::Struct, 0, 30));
        let a = tree.insert(Some(root), DeclarationNode::new(DeclKind::Function, 10, 5));
        let b = tree.insert(Some(root), DeclarationNode::new(DeclKind::Variable, 20, 5));
        assert_eq!(tree.roots(), &[root]);
        assert_eq!(tree.get(root).map(|n| n.children.clone()), Some(vec![a, b]));
    }

    #[test]
    fn access_level_parses_known_keywords_only() {
        assert_eq!("fileprivate".parse(), Ok(AccessLevel::FilePrivate));
        assert_eq!("open".parse(), Ok(AccessLevel::Open));
        assert!("final".parse::<AccessLevel>().is_err());
        assert!("Public".parse::<AccessLevel>().is_err());
    }
}
