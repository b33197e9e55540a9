// src/graph/builder.rs
//! Graph construction: raw edge lists into typed, per-kind edge sets.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};
use crate::types::{Edge, EdgeKind, NodeId, NodeType};

/// One edge as handed over by the loader.
///
/// Either a pair of raw ids (`[3, 9]`), tagged by the list it arrives in, or a
/// joined `"src|dst"` string whose sides are `user:<n>`, `post:<n>` or a bare
/// integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEdge {
    Pair(i64, i64),
    Joined(String),
}

impl RawEdge {
    /// The same edge with its endpoints swapped.
    ///
    /// A joined string without a separator is returned unchanged so it still
    /// fails to parse in the reverse list.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Pair(a, b) => Self::Pair(*b, *a),
            Self::Joined(text) => match text.split_once('|') {
                Some((a, b)) => Self::Joined(format!("{}|{}", b.trim(), a.trim())),
                None => Self::Joined(text.clone()),
            },
        }
    }

    /// Parses this edge as a member of the `kind` list.
    ///
    /// # Errors
    /// Returns `RankError::MalformedEdge` if the edge does not fit `kind`.
    pub fn parse(&self, kind: EdgeKind) -> Result<(NodeId, NodeId)> {
        parse_edge(kind, self)
    }
}

impl From<(i64, i64)> for RawEdge {
    fn from((a, b): (i64, i64)) -> Self {
        Self::Pair(a, b)
    }
}

impl From<&str> for RawEdge {
    fn from(s: &str) -> Self {
        Self::Joined(s.to_string())
    }
}

/// The five pre-classified raw edge lists. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdges {
    #[serde(default)]
    pub user_likes_post: Vec<RawEdge>,
    #[serde(default)]
    pub user_comments_post: Vec<RawEdge>,
    #[serde(default)]
    pub user_follows_user: Vec<RawEdge>,
    #[serde(default)]
    pub post_liked_by_user: Vec<RawEdge>,
    #[serde(default)]
    pub post_commented_by_user: Vec<RawEdge>,
}

impl RawEdges {
    /// Builds the five lists from forward interactions, deriving the
    /// liked-by and commented-by lists by swapping endpoints.
    #[must_use]
    pub fn from_interactions(
        likes: &[(i64, i64)],
        comments: &[(i64, i64)],
        follows: &[(i64, i64)],
    ) -> Self {
        let forward =
            |pairs: &[(i64, i64)]| -> Vec<RawEdge> { pairs.iter().copied().map(RawEdge::from).collect() };
        Self::from_forward(forward(likes), forward(comments), forward(follows))
    }

    /// Same as [`from_interactions`](Self::from_interactions) for edges in
    /// either raw form.
    #[must_use]
    pub fn from_forward(likes: Vec<RawEdge>, comments: Vec<RawEdge>, follows: Vec<RawEdge>) -> Self {
        let reverse = |edges: &[RawEdge]| -> Vec<RawEdge> { edges.iter().map(RawEdge::reversed).collect() };

        Self {
            post_liked_by_user: reverse(&likes),
            post_commented_by_user: reverse(&comments),
            user_likes_post: likes,
            user_comments_post: comments,
            user_follows_user: follows,
        }
    }

    #[must_use]
    pub fn list(&self, kind: EdgeKind) -> &[RawEdge] {
        match kind {
            EdgeKind::UserLikesPost => &self.user_likes_post,
            EdgeKind::UserCommentsPost => &self.user_comments_post,
            EdgeKind::UserFollowsUser => &self.user_follows_user,
            EdgeKind::PostLikedByUser => &self.post_liked_by_user,
            EdgeKind::PostCommentedByUser => &self.post_commented_by_user,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        EdgeKind::ALL.iter().all(|&k| self.list(k).is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        EdgeKind::ALL.iter().map(|&k| self.list(k).len()).sum()
    }
}

/// Typed directed multigraph, edges grouped by kind in input order.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    edges: BTreeMap<EdgeKind, Vec<(NodeId, NodeId)>>,
}

impl InteractionGraph {
    /// Edges of one kind. Duplicates are kept.
    #[must_use]
    pub fn edges(&self, kind: EdgeKind) -> &[(NodeId, NodeId)] {
        self.edges.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges, kinds in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().flat_map(|(&kind, pairs)| {
            pairs.iter().map(move |&(source, target)| Edge {
                source,
                target,
                kind,
            })
        })
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Every node that appears as a source or a target of some edge.
    #[must_use]
    pub fn participants(&self) -> BTreeSet<NodeId> {
        self.edges
            .values()
            .flatten()
            .flat_map(|&(s, t)| [s, t])
            .collect()
    }
}

/// Parses all five lists into typed edges.
///
/// # Errors
/// Returns `RankError::MalformedEdge` on the first edge that fails to parse.
pub fn build(raw: &RawEdges) -> Result<InteractionGraph> {
    let mut edges = BTreeMap::new();
    for kind in EdgeKind::ALL {
        let parsed = raw
            .list(kind)
            .par_iter()
            .map(|edge| parse_edge(kind, edge))
            .collect::<Result<Vec<_>>>()?;
        edges.insert(kind, parsed);
    }
    Ok(InteractionGraph { edges })
}

fn parse_edge(kind: EdgeKind, raw: &RawEdge) -> Result<(NodeId, NodeId)> {
    let (source_type, target_type) = kind.endpoints();
    match raw {
        RawEdge::Pair(a, b) => Ok((source_type.wrap(*a), target_type.wrap(*b))),
        RawEdge::Joined(text) => {
            let (a, b) = text
                .split_once('|')
                .ok_or_else(|| malformed(kind, text, "missing '|' separator"))?;
            let source = parse_side(kind, text, a, source_type)?;
            let target = parse_side(kind, text, b, target_type)?;
            Ok((source, target))
        }
    }
}

fn parse_side(kind: EdgeKind, text: &str, side: &str, expected: NodeType) -> Result<NodeId> {
    let side = side.trim();
    if side.contains(':') {
        let node: NodeId = side
            .parse()
            .map_err(|_| malformed(kind, text, &format!("unparseable endpoint '{side}'")))?;
        if node.node_type() != expected {
            return Err(malformed(
                kind,
                text,
                &format!("endpoint '{side}' has the wrong node type"),
            ));
        }
        return Ok(node);
    }

    side.parse::<i64>()
        .map(|id| expected.wrap(id))
        .map_err(|_| malformed(kind, text, &format!("unparseable endpoint '{side}'")))
}

fn malformed(kind: EdgeKind, raw: &str, reason: &str) -> RankError {
    RankError::MalformedEdge {
        kind,
        raw: raw.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_tagged_by_kind() {
        let raw = RawEdges::from_interactions(&[(1, 10)], &[], &[(1, 2)]);
        let graph = build(&raw).unwrap();

        assert_eq!(
            graph.edges(EdgeKind::UserLikesPost),
            &[(NodeId::User(1), NodeId::Post(10))]
        );
        assert_eq!(
            graph.edges(EdgeKind::PostLikedByUser),
            &[(NodeId::Post(10), NodeId::User(1))]
        );
        assert_eq!(
            graph.edges(EdgeKind::UserFollowsUser),
            &[(NodeId::User(1), NodeId::User(2))]
        );
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn joined_strings_accept_tagged_and_bare_ids() {
        let raw = RawEdges {
            user_comments_post: vec!["user:4|post:8".into(), "5|9".into()],
            ..RawEdges::default()
        };
        let graph = build(&raw).unwrap();
        assert_eq!(
            graph.edges(EdgeKind::UserCommentsPost),
            &[
                (NodeId::User(4), NodeId::Post(8)),
                (NodeId::User(5), NodeId::Post(9)),
            ]
        );
    }

    #[test]
    fn missing_separator_is_fatal() {
        let raw = RawEdges {
            user_likes_post: vec!["user:1 post:2".into()],
            ..RawEdges::default()
        };
        let err = build(&raw).unwrap_err();
        assert!(matches!(
            err,
            RankError::MalformedEdge { kind: EdgeKind::UserLikesPost, .. }
        ));
    }

    #[test]
    fn wrong_endpoint_type_is_fatal() {
        let raw = RawEdges {
            user_follows_user: vec!["user:1|post:2".into()],
            ..RawEdges::default()
        };
        assert!(build(&raw).is_err());
    }

    #[test]
    fn joined_edges_reverse_into_the_liked_by_list() {
        let raw = RawEdges::from_forward(vec!["user:1|post:10".into(), (2, 11).into()], vec![], vec![]);
        let graph = build(&raw).unwrap();
        assert_eq!(
            graph.edges(EdgeKind::PostLikedByUser),
            &[
                (NodeId::Post(10), NodeId::User(1)),
                (NodeId::Post(11), NodeId::User(2)),
            ]
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let raw = RawEdges::from_interactions(&[(1, 10), (1, 10)], &[], &[]);
        let graph = build(&raw).unwrap();
        assert_eq!(graph.edges(EdgeKind::UserLikesPost).len(), 2);
        assert_eq!(graph.participants().len(), 2);
    }
}
