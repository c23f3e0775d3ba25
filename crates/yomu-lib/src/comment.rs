use std::collections::{HashMap, HashSet};

use crate::models::Comment;

/// Visual nesting stops growing past this depth, deeper replies render flat.
pub const MAX_INDENT_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Number of comments in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.replies.iter().map(CommentNode::count).sum::<usize>()
    }

    /// Height of the subtree, a lone comment has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .replies
            .iter()
            .map(CommentNode::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn find(&self, id: i64) -> Option<&CommentNode> {
        if self.comment.id == id {
            return Some(self);
        }
        self.replies.iter().find_map(|reply| reply.find(id))
    }
}

pub fn count_all(nodes: &[CommentNode]) -> usize {
    nodes.iter().map(CommentNode::count).sum()
}

pub fn find(nodes: &[CommentNode], id: i64) -> Option<&CommentNode> {
    nodes.iter().find_map(|node| node.find(id))
}

/// Group a flat comment list into reply trees.
///
/// Roots are newest first, replies oldest first. A comment whose parent is not
/// in the list becomes a root, and so does anything only reachable through a
/// parent cycle, so every input comment appears exactly once in the output.
pub fn build_tree(comments: Vec<Comment>) -> Vec<CommentNode> {
    let ids: HashSet<i64> = comments.iter().map(|c| c.id).collect();

    let mut roots = vec![];
    let mut children: HashMap<i64, Vec<Comment>> = HashMap::new();
    for comment in comments {
        match comment.parent_id {
            Some(parent_id) if parent_id != comment.id && ids.contains(&parent_id) => {
                children.entry(parent_id).or_default().push(comment)
            }
            Some(parent_id) => {
                debug!(
                    "comment {} has missing parent {}, promoted to root",
                    comment.id, parent_id
                );
                roots.push(comment);
            }
            None => roots.push(comment),
        }
    }

    for replies in children.values_mut() {
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    }

    let mut tree: Vec<CommentNode> = roots
        .into_iter()
        .map(|comment| attach(comment, &mut children))
        .collect();

    // whatever is left hangs off a cycle; break it at its oldest member
    while !children.is_empty() {
        let next = children
            .values()
            .flatten()
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .map(|c| c.id);
        let Some(id) = next else {
            break;
        };

        let mut orphan = None;
        for replies in children.values_mut() {
            if let Some(pos) = replies.iter().position(|c| c.id == id) {
                orphan = Some(replies.remove(pos));
                break;
            }
        }
        children.retain(|_, replies| !replies.is_empty());

        if let Some(comment) = orphan {
            warn!("comment {} is part of a reply cycle, promoted to root", comment.id);
            tree.push(attach(comment, &mut children));
        }
    }

    tree.sort_by(|a, b| {
        b.comment
            .created_at
            .cmp(&a.comment.created_at)
            .then(b.comment.id.cmp(&a.comment.id))
    });
    tree
}

fn attach(comment: Comment, children: &mut HashMap<i64, Vec<Comment>>) -> CommentNode {
    let replies = children
        .remove(&comment.id)
        .unwrap_or_default()
        .into_iter()
        .map(|reply| attach(reply, children))
        .collect();

    CommentNode { comment, replies }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::UserSummary;
    use chrono::NaiveDate;

    fn comment(id: i64, parent_id: Option<i64>, minute: u32) -> Comment {
        Comment {
            id,
            manga_id: 1,
            chapter_id: None,
            parent_id,
            user: UserSummary {
                id: 7,
                username: "reader".to_string(),
                avatar_url: None,
            },
            content: format!("comment {id}"),
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(12, minute, 0)
                .unwrap(),
            updated_at: None,
        }
    }

    fn ids(nodes: &[CommentNode]) -> Vec<i64> {
        nodes.iter().map(|n| n.comment.id).collect()
    }

    #[test]
    fn test_build_tree_nests_replies() {
        let tree = build_tree(vec![
            comment(1, None, 0),
            comment(2, Some(1), 1),
            comment(3, Some(2), 2),
            comment(4, None, 3),
            comment(5, Some(1), 4),
        ]);

        assert_eq!(ids(&tree), vec![4, 1]);
        let first = &tree[1];
        assert_eq!(ids(&first.replies), vec![2, 5]);
        assert_eq!(ids(&first.replies[0].replies), vec![3]);
        assert_eq!(first.count(), 4);
        assert_eq!(first.depth(), 3);
        assert_eq!(count_all(&tree), 5);
    }

    #[test]
    fn test_build_tree_replies_sorted_oldest_first() {
        let tree = build_tree(vec![
            comment(1, None, 0),
            comment(9, Some(1), 30),
            comment(8, Some(1), 10),
        ]);

        assert_eq!(ids(&tree[0].replies), vec![8, 9]);
    }

    #[test]
    fn test_build_tree_promotes_orphans() {
        let tree = build_tree(vec![comment(2, Some(99), 1), comment(1, None, 0)]);

        assert_eq!(ids(&tree), vec![2, 1]);
        assert!(tree.iter().all(|n| n.replies.is_empty()));
    }

    #[test]
    fn test_build_tree_keeps_cycles() {
        let tree = build_tree(vec![
            comment(1, Some(2), 0),
            comment(2, Some(1), 1),
            comment(3, Some(3), 2),
        ]);

        assert_eq!(count_all(&tree), 3);
        let cycle = tree.iter().find(|n| n.comment.id == 1).unwrap();
        assert_eq!(ids(&cycle.replies), vec![2]);
        assert!(find(&tree, 3).is_some());
    }

    #[test]
    fn test_build_tree_empty() {
        assert!(build_tree(vec![]).is_empty());
    }
}
