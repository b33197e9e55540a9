// src/snapshot.rs
//! JSON interaction snapshot: the file-based stand-in for the relational loader.
//!
//! ```json
//! { "users": [1, 2], "posts": [10],
//!   "likes": [[1, 10]], "comments": [[2, 10]], "follows": [[1, 2]] }
//! ```
//!
//! Each interaction is `[user, post]` (or `[user, user]` for follows), or a
//! joined string such as `"user:1|post:10"`. The liked-by and commented-by
//! lists are derived from likes and comments unless the snapshot carries
//! `post_liked_by_user` / `post_commented_by_user` explicitly, in which case
//! those are used as given.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::error::{RankError, Result};
use crate::graph::{RawEdge, RawEdges};
use crate::pipeline::RankInput;
use crate::types::EdgeKind;

/// Posts each user is linked to when placeholders are synthesized.
pub const PLACEHOLDER_POSTS_PER_USER: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<i64>,
    #[serde(default)]
    pub posts: Vec<i64>,
    #[serde(default)]
    pub likes: Vec<RawEdge>,
    #[serde(default)]
    pub comments: Vec<RawEdge>,
    #[serde(default)]
    pub follows: Vec<RawEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_liked_by_user: Option<Vec<RawEdge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_commented_by_user: Option<Vec<RawEdge>>,
}

impl Snapshot {
    /// # Errors
    /// Returns error if the file cannot be read or is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RankError::io(e, path))?;
        let snapshot: Self = serde_json::from_str(&content)?;
        log::info!(
            "Loaded {} users, {} posts, {} likes, {} comments, {} follows from {}",
            snapshot.users.len(),
            snapshot.posts.len(),
            snapshot.likes.len(),
            snapshot.comments.len(),
            snapshot.follows.len(),
            path.display()
        );
        Ok(snapshot)
    }

    #[must_use]
    pub fn has_interactions(&self) -> bool {
        let explicit = |list: &Option<Vec<RawEdge>>| list.as_ref().is_some_and(|l| !l.is_empty());
        !(self.likes.is_empty() && self.comments.is_empty() && self.follows.is_empty())
            || explicit(&self.post_liked_by_user)
            || explicit(&self.post_commented_by_user)
    }

    /// Applies the loader options and produces the core's input.
    ///
    /// # Errors
    /// Returns `RankError::MalformedEdge` if co-comment follows are requested
    /// and a comment edge cannot be parsed.
    pub fn into_input(mut self, options: &GraphConfig) -> Result<RankInput> {
        if options.co_comment_follows {
            let comments = self
                .comments
                .iter()
                .map(|edge| -> Result<(i64, i64)> {
                    let (user, post) = edge.parse(EdgeKind::UserCommentsPost)?;
                    Ok((user.id(), post.id()))
                })
                .collect::<Result<Vec<_>>>()?;
            let derived = co_comment_follows(&comments);
            log::info!("Derived {} follow edges from co-commenting", derived.len());
            self.follows.extend(derived.into_iter().map(RawEdge::from));
        }

        if options.synthesize_placeholders && !self.has_interactions() {
            let (likes, follows) = placeholder_edges(&self.users, &self.posts);
            log::info!(
                "No interactions found; synthesized {} likes and {} follows",
                likes.len(),
                follows.len()
            );
            self.likes = likes.into_iter().map(RawEdge::from).collect();
            self.follows = follows.into_iter().map(RawEdge::from).collect();
        }

        let mut edges = RawEdges::from_forward(self.likes, self.comments, self.follows);
        if let Some(liked_by) = self.post_liked_by_user {
            edges.post_liked_by_user = liked_by;
        }
        if let Some(commented_by) = self.post_commented_by_user {
            edges.post_commented_by_user = commented_by;
        }

        Ok(RankInput {
            edges,
            users: self.users,
            posts: self.posts,
        })
    }
}

/// Distinct ordered pairs of different users who commented on the same post.
#[must_use]
pub fn co_comment_follows(comments: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let mut by_post: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
    for &(user, post) in comments {
        by_post.entry(post).or_default().insert(user);
    }

    let mut pairs = BTreeSet::new();
    for authors in by_post.values() {
        for &a in authors {
            for &b in authors {
                if a != b {
                    pairs.insert((a, b));
                }
            }
        }
    }
    pairs.into_iter().collect()
}

/// Evenly spread likes (up to [`PLACEHOLDER_POSTS_PER_USER`] per user) plus a
/// complete follow graph between distinct users.
#[must_use]
pub fn placeholder_edges(users: &[i64], posts: &[i64]) -> (Vec<(i64, i64)>, Vec<(i64, i64)>) {
    if users.is_empty() || posts.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let per_user = PLACEHOLDER_POSTS_PER_USER.min(posts.len());
    let likes = users
        .iter()
        .flat_map(|&user| {
            (0..per_user).map(move |i| (user, posts[(i * posts.len() / per_user) % posts.len()]))
        })
        .collect();

    let mut follows = Vec::new();
    if users.len() > 1 {
        for (i, &a) in users.iter().enumerate() {
            for (j, &b) in users.iter().enumerate() {
                if i != j {
                    follows.push((a, b));
                }
            }
        }
    }
    (likes, follows)
}
