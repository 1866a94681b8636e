//! Depth-first traversal of the declaration tree.

use crate::syntax::{DeclarationNode, DeclarationTree, NodeId, StructureError};

/// Walks the tree depth-first, pre-order, and collects every item `visit` yields.
///
/// Parents are visited before their children, siblings and roots in source
/// order. `visit` may return an `Option` for "at most one result per node" or
/// any other iterator for several.
///
/// # Errors
///
/// Returns [`StructureError::Cycle`] if a node is reachable more than once
/// and [`StructureError::DanglingNode`] if a child id does not exist.
pub fn traverse<T, I, F>(tree: &DeclarationTree, mut visit: F) -> Result<Vec<T>, StructureError>
where
    F: FnMut(&DeclarationNode) -> I,
    I: IntoIterator<Item = T>,
{
    let mut results = Vec::new();
    let mut seen = vec![false; tree.len()];
    let mut stack: Vec<NodeId> = tree.roots().iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        let node = tree
            .get(id)
            .ok_or(StructureError::DanglingNode { node: id.0 })?;
        if std::mem::replace(&mut seen[id.0], true) {
            return Err(StructureError::Cycle { node: id.0 });
        }

        results.extend(visit(node));
        stack.extend(node.children.iter().rev().copied());
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::DeclKind;

    fn sample_tree() -> DeclarationTree {
        // struct S { func a() {}; struct T { var b } }; extension S {}
        let mut tree = DeclarationTree::new();
        let s = tree.insert(
            None,
            DeclarationNode::new(DeclKind::Struct, 0, 60).with_name("S"),
        );
        tree.insert(
            Some(s),
            DeclarationNode::new(DeclKind::Function, 10, 10).with_name("a"),
        );
        let t = tree.insert(
            Some(s),
            DeclarationNode::new(DeclKind::Struct, 25, 30).with_name("T"),
        );
        tree.insert(
            Some(t),
            DeclarationNode::new(DeclKind::Variable, 35, 5).with_name("b"),
        );
        tree.insert(
            None,
            DeclarationNode::new(DeclKind::Extension, 61, 14).with_name("S"),
        );
        tree
    }

    #[test]
    fn visits_in_document_order() {
        let tree = sample_tree();
        let names = traverse(&tree, |n| n.name.clone()).expect("acyclic");
        assert_eq!(names, vec!["S", "a", "T", "b", "S"]);
    }

    #[test]
    fn collects_only_some_results() {
        let tree = sample_tree();
        let structs = traverse(&tree, |n| (n.kind == DeclKind::Struct).then_some(n.offset))
            .expect("acyclic");
        assert_eq!(structs, vec![0, 25]);
    }

    #[test]
    fn flattens_multiple_results_per_node() {
        let tree = sample_tree();
        let pairs = traverse(&tree, |n| vec![n.offset, n.offset + n.length]).expect("acyclic");
        assert_eq!(pairs.len(), 10);
        assert_eq!(&pairs[..2], &[0, 60]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = DeclarationTree::new();
        let out: Vec<usize> = traverse(&tree, |n| Some(n.offset)).expect("empty");
        assert!(out.is_empty());
    }

    #[test]
    fn detects_cycle() {
        let mut tree = sample_tree();
        // b -> S closes a loop back to the root.
        tree.link(NodeId(3), NodeId(0));
        let err = traverse(&tree, |n| Some(n.offset)).expect_err("cycle must fail");
        assert_eq!(err, StructureError::Cycle { node: 0 });
    }

    #[test]
    fn detects_dangling_child() {
        let mut tree = sample_tree();
        tree.link(NodeId(1), NodeId(42));
        let err = traverse(&tree, |n| Some(n.offset)).expect_err("dangling must fail");
        assert_eq!(err, StructureError::DanglingNode { node: 42 });
    }
}
