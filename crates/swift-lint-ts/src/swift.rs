//! Swift structure parser using Tree-sitter.

use std::path::Path;
use tree_sitter::{Language, Node, Parser};

use swift_lint_core::{
    Attribute, DeclKind, DeclarationNode, DeclarationTree, NodeId, SourceFile, StructureError,
    StructureParser, Token, TokenKind,
};

/// A syntax-tree leaf: token kind and byte range.
type Leaf = (TokenKind, usize, usize);

/// Builds the token stream and declaration tree of Swift source files.
pub struct SwiftParser {
    language: Language,
}

impl SwiftParser {
    /// Creates a new Swift parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_swift::LANGUAGE.into(),
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    /// Maps a syntax node to the declaration kind it introduces, if any.
    fn decl_kind(node: &Node<'_>, src: &[u8]) -> Option<DeclKind> {
        let kind = match node.kind() {
            "class_declaration" => {
                let keyword = node.child_by_field_name("declaration_kind")?;
                match Self::text(&keyword, src) {
                    "class" => DeclKind::Class,
                    "struct" => DeclKind::Struct,
                    "enum" => DeclKind::Enum,
                    "extension" => DeclKind::Extension,
                    "actor" => DeclKind::Actor,
                    other => {
                        tracing::debug!("Unknown declaration keyword: {}", other);
                        return None;
                    }
                }
            }
            "protocol_declaration" => DeclKind::Protocol,
            "function_declaration" | "protocol_function_declaration" => DeclKind::Function,
            "init_declaration" => DeclKind::Initializer,
            "deinit_declaration" => DeclKind::Deinitializer,
            "subscript_declaration" => DeclKind::Subscript,
            "property_declaration" | "protocol_property_declaration" => DeclKind::Variable,
            "typealias_declaration" => DeclKind::TypeAlias,
            "associatedtype_declaration" => DeclKind::AssociatedType,
            "enum_entry" => DeclKind::EnumCase,
            "operator_declaration" => DeclKind::Operator,
            "precedence_group_declaration" => DeclKind::PrecedenceGroup,
            _ => return None,
        };
        Some(kind)
    }

    /// Byte offset of the keyword that introduces a declaration, skipping
    /// modifiers, attributes and comments.
    fn keyword_offset(node: &Node<'_>) -> usize {
        if let Some(keyword) = node.child_by_field_name("declaration_kind") {
            return keyword.start_byte();
        }
        let mut cursor = node.walk();
        let keyword = node.children(&mut cursor).find(|child| {
            !matches!(
                child.kind(),
                "modifiers" | "attribute" | "comment" | "multiline_comment"
            )
        });
        keyword.map_or(node.start_byte(), |k| k.start_byte())
    }

    fn decl_name(node: &Node<'_>, kind: DeclKind, src: &[u8]) -> Option<String> {
        let mut cursor = node.walk();
        let name = match kind {
            DeclKind::Initializer | DeclKind::Deinitializer | DeclKind::Subscript => return None,
            DeclKind::Operator => node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "custom_operator")?,
            DeclKind::PrecedenceGroup => node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "simple_identifier")?,
            _ => node.child_by_field_name("name")?,
        };
        Some(Self::text(&name, src).to_owned())
    }

    fn attributes(node: &Node<'_>, src: &[u8]) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "modifiers" {
                continue;
            }
            let mut mod_cursor = child.walk();
            for modifier in child.children(&mut mod_cursor) {
                if modifier.kind() != "attribute" {
                    continue;
                }
                let mut attr_cursor = modifier.walk();
                let name = modifier
                    .named_children(&mut attr_cursor)
                    .find(|c| c.kind() == "user_type")
                    .map_or("", |c| Self::text(&c, src));
                attributes.push(Attribute::new(
                    name,
                    modifier.start_byte(),
                    modifier.end_byte() - modifier.start_byte(),
                ));
            }
        }
        attributes
    }

    /// Collects declarations in document order, nesting them by containment.
    fn declarations(root: Node<'_>, src: &[u8]) -> DeclarationTree {
        let mut tree = DeclarationTree::new();
        let mut stack: Vec<(Node<'_>, Option<NodeId>)> = vec![(root, None)];

        while let Some((node, parent)) = stack.pop() {
            let mut scope = parent;
            if let Some(kind) = Self::decl_kind(&node, src) {
                let offset = Self::keyword_offset(&node);
                let mut decl = DeclarationNode::new(kind, offset, node.end_byte() - offset);
                if let Some(name) = Self::decl_name(&node, kind, src) {
                    decl = decl.with_name(name);
                }
                for attribute in Self::attributes(&node, src) {
                    decl = decl.with_attribute(attribute);
                }
                scope = Some(tree.insert(parent, decl));
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, scope)));
        }

        tree
    }

    fn leaf_kind(node: &Node<'_>, src: &[u8]) -> TokenKind {
        let in_string = node.parent().is_some_and(|p| {
            matches!(
                p.kind(),
                "line_string_literal" | "multi_line_string_literal" | "raw_string_literal"
            )
        });
        if in_string {
            return TokenKind::String;
        }

        match node.kind() {
            "comment" | "multiline_comment" => TokenKind::Comment,
            "integer_literal" | "real_literal" | "hex_literal" | "oct_literal" | "bin_literal" => {
                TokenKind::Number
            }
            "simple_identifier" | "type_identifier" => TokenKind::Identifier,
            _ if node.is_named() => TokenKind::Other,
            _ => {
                let text = Self::text(node, src);
                if text.starts_with(|c: char| c.is_alphabetic() || c == '_') {
                    TokenKind::Keyword
                } else {
                    TokenKind::Punctuation
                }
            }
        }
    }

    /// Leaves of the syntax tree in document order.
    fn leaves(root: Node<'_>, src: &[u8]) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if node.child_count() == 0 {
                if node.end_byte() > node.start_byte() {
                    leaves.push((Self::leaf_kind(&node, src), node.start_byte(), node.end_byte()));
                }
                continue;
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        leaves
    }

    /// Turns leaves into tokens, joining `#` with the keyword after it and
    /// dotted number runs such as `10` `.` `12` into one token.
    fn tokens(source: &str, leaves: &[Leaf]) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(leaves.len());
        let mut i = 0;

        while i < leaves.len() {
            let (mut kind, start, mut end) = leaves[i];
            i += 1;

            if kind == TokenKind::Punctuation && source.get(start..end) == Some("#") {
                if let Some(&(TokenKind::Keyword, s, e)) = leaves.get(i) {
                    if s == end {
                        kind = TokenKind::Keyword;
                        end = e;
                        i += 1;
                    }
                }
            } else if kind == TokenKind::Number {
                while let (
                    Some(&(TokenKind::Punctuation, dot_start, dot_end)),
                    Some(&(TokenKind::Number, num_start, num_end)),
                ) = (leaves.get(i), leaves.get(i + 1))
                {
                    if dot_start != end
                        || source.get(dot_start..dot_end) != Some(".")
                        || num_start != dot_end
                    {
                        break;
                    }
                    end = num_end;
                    i += 2;
                }
            }

            tokens.push(Token::new(kind, start, &source[start..end]));
        }

        tokens
    }

    /// Offset of the first error or missing node, in document order.
    fn first_error(root: Node<'_>) -> usize {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                return node.start_byte();
            }
            if !node.has_error() {
                continue;
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        root.start_byte()
    }
}

impl Default for SwiftParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureParser for SwiftParser {
    fn language_id(&self) -> &'static str {
        "swift"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["swift"]
    }

    fn parse(&self, path: &Path, contents: &str) -> Result<SourceFile, StructureError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| StructureError::Parser {
                message: e.to_string(),
            })?;

        let src = contents.as_bytes();
        let tree = parser.parse(src, None).ok_or_else(|| StructureError::Parser {
            message: "tree-sitter returned no tree".to_string(),
        })?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(StructureError::Syntax {
                offset: Self::first_error(root),
            });
        }

        let tokens = Self::tokens(contents, &Self::leaves(root, src));
        let declarations = Self::declarations(root, src);
        SourceFile::new(path, contents, tokens, declarations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceFile {
        SwiftParser::new()
            .parse(Path::new("Test.swift"), src)
            .expect("valid swift")
    }

    fn token_texts(file: &SourceFile) -> Vec<(TokenKind, &str)> {
        file.tokens()
            .iter()
            .map(|t| (t.kind, t.text.as_str()))
            .collect()
    }

    fn roots(file: &SourceFile) -> Vec<&DeclarationNode> {
        file.tree()
            .roots()
            .iter()
            .filter_map(|&id| file.tree().get(id))
            .collect()
    }

    #[test]
    fn extension_offset_is_the_keyword() {
        let file = parse("private extension String {}");
        let decls = roots(&file);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].kind, DeclKind::Extension);
        assert_eq!(decls[0].offset, 8);
        assert_eq!(decls[0].name.as_deref(), Some("String"));
        assert_eq!(token_texts(&file)[0], (TokenKind::Keyword, "private"));
    }

    #[test]
    fn merges_dotted_versions_in_attributes() {
        let file = parse("@available(iOS 10.12.1, macOS 6, *)\nclass A {}");
        let texts = token_texts(&file);
        assert!(texts.contains(&(TokenKind::Identifier, "iOS")));
        assert!(texts.contains(&(TokenKind::Number, "10.12.1")));
        assert!(texts.contains(&(TokenKind::Number, "6")));

        let decls = roots(&file);
        assert_eq!(decls[0].kind, DeclKind::Class);
        assert_eq!(decls[0].offset, 36);
        let attribute = &decls[0].attributes[0];
        assert_eq!(attribute.name, "available");
        assert_eq!(attribute.range(), 0..35);
    }

    #[test]
    fn merges_hash_keywords() {
        let file = parse("if #available(iOS 9, *) {}\nif #unavailable(iOS 7) {}");
        let keywords: Vec<_> = file
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::Keyword)
            .map(|t| (t.offset, t.text.as_str()))
            .collect();
        assert_eq!(
            keywords,
            vec![(0, "if"), (3, "#available"), (27, "if"), (30, "#unavailable")]
        );
    }

    #[test]
    fn real_literals_stay_single_tokens() {
        let file = parse("let v = 6.0");
        assert!(token_texts(&file).contains(&(TokenKind::Number, "6.0")));
        assert_eq!(roots(&file)[0].kind, DeclKind::Variable);
        assert_eq!(roots(&file)[0].name.as_deref(), Some("v"));
    }

    #[test]
    fn classifies_comments_and_strings() {
        let file = parse("let s = \"#available(iOS 6, *)\" // note\n/* block */");
        let texts = token_texts(&file);
        assert!(texts.contains(&(TokenKind::String, "#available(iOS 6, *)")));
        assert!(texts.contains(&(TokenKind::Comment, "// note")));
        assert!(texts.contains(&(TokenKind::Comment, "/* block */")));
        assert!(!texts.iter().any(|&(k, t)| k == TokenKind::Keyword && t == "#available"));
    }

    #[test]
    fn nests_members_under_their_container() {
        let src = "public final class A: B {\n\
                   \x20 @objc private(set) var x = 1\n\
                   \x20 init() {}\n\
                   \x20 deinit {}\n\
                   \x20 func f() {}\n\
                   \x20 typealias T = Int\n\
                   }\n\
                   protocol P { associatedtype Q; func g() }\n\
                   enum E { case a, b }";
        let file = parse(src);
        let tree = file.tree();
        let decls = roots(&file);
        let kinds: Vec<_> = decls.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DeclKind::Class, DeclKind::Protocol, DeclKind::Enum]);

        let members: Vec<_> = decls[0]
            .children
            .iter()
            .filter_map(|&id| tree.get(id))
            .map(|d| (d.kind, d.name.as_deref()))
            .collect();
        assert_eq!(
            members,
            vec![
                (DeclKind::Variable, Some("x")),
                (DeclKind::Initializer, None),
                (DeclKind::Deinitializer, None),
                (DeclKind::Function, Some("f")),
                (DeclKind::TypeAlias, Some("T")),
            ]
        );

        let x = tree.get(decls[0].children[0]).expect("property");
        assert_eq!(x.attributes[0].name, "objc");
        assert_eq!(&src[x.offset..x.offset + 3], "var");

        let protocol_members: Vec<_> = decls[1]
            .children
            .iter()
            .filter_map(|&id| tree.get(id))
            .map(|d| d.kind)
            .collect();
        assert_eq!(
            protocol_members,
            vec![DeclKind::AssociatedType, DeclKind::Function]
        );
        assert_eq!(
            tree.get(decls[2].children[0]).map(|d| d.kind),
            Some(DeclKind::EnumCase)
        );
    }

    #[test]
    fn comment_between_modifier_and_keyword_is_a_token() {
        let file = parse("public /* hi */ extension B {}");
        let decl = roots(&file)[0];
        assert_eq!(decl.offset, 16);
        let before: Vec<_> = file
            .tokens()
            .iter()
            .take_while(|t| t.offset < decl.offset)
            .map(|t| t.kind)
            .collect();
        assert_eq!(before, vec![TokenKind::Keyword, TokenKind::Comment]);
    }

    #[test]
    fn reports_syntax_errors() {
        let err = SwiftParser::new()
            .parse(Path::new("Broken.swift"), "class A {")
            .expect_err("unterminated class");
        assert!(matches!(err, StructureError::Syntax { .. }));
    }

    #[test]
    fn empty_file_has_no_structure() {
        let file = parse("");
        assert!(file.tokens().is_empty());
        assert!(file.tree().is_empty());
    }
}
