// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RankError;

/// A vertex of the interaction graph.
///
/// Users are also the labels that flow through the graph, so `NodeId` doubles
/// as the label key inside every [`LabelVector`](crate::propagation::LabelVector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    User(i64),
    Post(i64),
}

impl NodeId {
    /// The raw id without its type tag.
    #[must_use]
    pub fn id(self) -> i64 {
        match self {
            Self::User(id) | Self::Post(id) => id,
        }
    }

    #[must_use]
    pub fn is_user(self) -> bool {
        matches!(self, Self::User(_))
    }

    #[must_use]
    pub fn is_post(self) -> bool {
        matches!(self, Self::Post(_))
    }

    #[must_use]
    pub fn node_type(self) -> NodeType {
        match self {
            Self::User(_) => NodeType::User,
            Self::Post(_) => NodeType::Post,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Post(id) => write!(f, "post:{id}"),
        }
    }
}

impl FromStr for NodeId {
    type Err = RankError;

    /// Parses the `user:<id>` / `post:<id>` text form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, id) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| RankError::InvalidNode(s.to_string()))?;
        let id: i64 = id
            .parse()
            .map_err(|_| RankError::InvalidNode(s.to_string()))?;
        match tag {
            "user" => Ok(Self::User(id)),
            "post" => Ok(Self::Post(id)),
            _ => Err(RankError::InvalidNode(s.to_string())),
        }
    }
}

/// The two vertex families of the bipartite graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    User,
    Post,
}

impl NodeType {
    #[must_use]
    pub fn wrap(self, id: i64) -> NodeId {
        match self {
            Self::User => NodeId::User(id),
            Self::Post => NodeId::Post(id),
        }
    }
}

/// Interaction type an edge represents.
///
/// The declaration order is the enumeration order used everywhere a fixed
/// kind order matters (weight collisions, logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    UserLikesPost,
    UserCommentsPost,
    UserFollowsUser,
    PostLikedByUser,
    PostCommentedByUser,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 5] = [
        EdgeKind::UserLikesPost,
        EdgeKind::UserCommentsPost,
        EdgeKind::UserFollowsUser,
        EdgeKind::PostLikedByUser,
        EdgeKind::PostCommentedByUser,
    ];

    /// Outgoing influence a source splits across all its edges of this kind.
    #[must_use]
    pub const fn base_weight(self) -> f64 {
        match self {
            Self::UserLikesPost => 0.3,
            Self::UserCommentsPost => 0.5,
            Self::UserFollowsUser => 0.2,
            Self::PostLikedByUser | Self::PostCommentedByUser => 1.0,
        }
    }

    /// Node types of (source, target).
    #[must_use]
    pub const fn endpoints(self) -> (NodeType, NodeType) {
        match self {
            Self::UserLikesPost | Self::UserCommentsPost => (NodeType::User, NodeType::Post),
            Self::UserFollowsUser => (NodeType::User, NodeType::User),
            Self::PostLikedByUser | Self::PostCommentedByUser => (NodeType::Post, NodeType::User),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UserLikesPost => "user-likes-post",
            Self::UserCommentsPost => "user-comments-post",
            Self::UserFollowsUser => "user-follows-user",
            Self::PostLikedByUser => "post-liked-by-user",
            Self::PostCommentedByUser => "post-commented-by-user",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A directed, typed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_text_form_parses() {
        assert_eq!("user:7".parse::<NodeId>().unwrap(), NodeId::User(7));
        assert_eq!(" post:12 ".parse::<NodeId>().unwrap(), NodeId::Post(12));
        assert_eq!(NodeId::Post(3).to_string(), "post:3");
    }

    #[test]
    fn node_id_rejects_unknown_tag() {
        assert!("group:1".parse::<NodeId>().is_err());
        assert!("user:abc".parse::<NodeId>().is_err());
        assert!("17".parse::<NodeId>().is_err());
    }

    #[test]
    fn users_order_before_posts() {
        assert!(NodeId::User(999) < NodeId::Post(0));
    }

    #[test]
    fn reverse_kinds_start_at_posts() {
        assert_eq!(
            EdgeKind::PostLikedByUser.endpoints(),
            (NodeType::Post, NodeType::User)
        );
        assert!((EdgeKind::UserFollowsUser.base_weight() - 0.2).abs() < f64::EPSILON);
    }
}
