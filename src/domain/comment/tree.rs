use std::collections::{HashMap, HashSet};

use crate::domain::{CommentNode, CommentRecord};

/// Materialize a reply forest from flat parent-referencing rows.
///
/// One linear pass indexes every row; children are grouped under their
/// parent id as they arrive, so the input may deliver a child before its
/// parent. Sibling order and root order follow input encounter order. A row
/// whose parent id is absent from the set (the parent was deleted between
/// the two sides becoming visible) is unreachable from any root and is
/// dropped without error.
pub fn build_comment_tree(rows: Vec<CommentRecord>) -> Vec<CommentNode> {
    let mut nodes: HashMap<i64, CommentNode> = HashMap::with_capacity(rows.len());
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut roots: Vec<i64> = Vec::new();

    for row in rows {
        let node = CommentNode::from(row);
        match node.parent_id {
            Some(parent_id) => children.entry(parent_id).or_default().push(node.id),
            None => roots.push(node.id),
        }
        nodes.insert(node.id, node);
    }

    roots
        .into_iter()
        .filter_map(|id| take_subtree(id, &mut nodes, &children))
        .collect()
}

// Moves a node out of the index together with its entire subtree. `remove`
// guarantees each node is attached at most once, so a parent pointer cycle
// in corrupt data terminates instead of looping.
fn take_subtree(
    id: i64,
    nodes: &mut HashMap<i64, CommentNode>,
    children: &HashMap<i64, Vec<i64>>,
) -> Option<CommentNode> {
    let mut node = nodes.remove(&id)?;

    if let Some(child_ids) = children.get(&id) {
        node.replies = child_ids
            .iter()
            .filter_map(|child_id| take_subtree(*child_id, nodes, children))
            .collect();
    }

    Some(node)
}

/// Annotate the tree with the requesting user's likes. Separate from tree
/// construction; only runs when a session is present.
pub fn apply_likes(nodes: &mut [CommentNode], liked_ids: &HashSet<i64>) {
    for node in nodes {
        node.liked_by_current_user = liked_ids.contains(&node.id);
        apply_likes(&mut node.replies, liked_ids);
    }
}

/// Descendant closure for the cascade delete: the target plus every comment
/// reachable from it through parent pointers, computed from the review's
/// `(id, parent_id)` rows with a stack walk.
pub fn collect_subtree_ids(target_id: i64, rows: &[(i64, Option<i64>)]) -> Vec<i64> {
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for (id, parent_id) in rows {
        if let Some(parent_id) = parent_id {
            children.entry(*parent_id).or_default().push(*id);
        }
    }

    let mut collected = vec![target_id];
    let mut seen: HashSet<i64> = HashSet::from([target_id]);
    let mut stack = vec![target_id];

    while let Some(current) = stack.pop() {
        if let Some(child_ids) = children.get(&current) {
            for child_id in child_ids {
                if seen.insert(*child_id) {
                    collected.push(*child_id);
                    stack.push(*child_id);
                }
            }
        }
    }

    collected
}
