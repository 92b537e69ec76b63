//! Page query - looks up a markdown node by its front-matter path
//!
//! This is the build-time data query that feeds the blog post template:
//! given a page path it returns the node's rendered HTML together with its
//! title, path and date formatted with a Moment.js-style format string.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::content::MarkdownNode;
use crate::helpers::format_date;

/// Errors raised while indexing or querying nodes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("no markdown node has path {0:?}")]
    NoMatch(String),

    #[error("path {path:?} is claimed by both {first} and {second}")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },
}

/// Front-matter fields selected by the page query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueriedFrontmatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub path: Option<String>,
}

/// Result of the page query: the data a blog post template renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkdownRemark {
    pub html: String,
    pub frontmatter: QueriedFrontmatter,
}

/// All loaded nodes, indexed by front-matter path
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<MarkdownNode>,
    by_path: BTreeMap<String, usize>,
}

impl NodeStore {
    /// Index nodes by path. Nodes without a path are kept but not queryable.
    pub fn from_nodes(nodes: Vec<MarkdownNode>) -> Result<Self, QueryError> {
        let mut by_path = BTreeMap::new();

        for (i, node) in nodes.iter().enumerate() {
            let Some(path) = node.path() else {
                tracing::warn!("{} has no path in its front-matter, no page created", node.source);
                continue;
            };

            if let Some(&existing) = by_path.get(path) {
                let first: &MarkdownNode = &nodes[existing];
                return Err(QueryError::DuplicatePath {
                    path: path.to_string(),
                    first: first.source.clone(),
                    second: node.source.clone(),
                });
            }
            by_path.insert(path.to_string(), i);
        }

        Ok(Self { nodes, by_path })
    }

    /// Every queryable path, sorted
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.by_path.keys().map(String::as_str)
    }

    /// Exact-match lookup by path
    pub fn get(&self, path: &str) -> Option<&MarkdownNode> {
        self.by_path.get(path).map(|&i| &self.nodes[i])
    }

    /// All nodes in load order, including ones without a path
    pub fn nodes(&self) -> &[MarkdownNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The page query, bound to a store and a date format
pub struct PageQuery<'a> {
    store: &'a NodeStore,
    date_format: &'a str,
}

impl<'a> PageQuery<'a> {
    pub fn new(store: &'a NodeStore, date_format: &'a str) -> Self {
        Self { store, date_format }
    }

    /// Run the query for one page path
    pub fn run(&self, path: &str) -> Result<MarkdownRemark, QueryError> {
        let node = self
            .store
            .get(path)
            .ok_or_else(|| QueryError::NoMatch(path.to_string()))?;

        Ok(MarkdownRemark {
            html: node.html.clone(),
            frontmatter: QueriedFrontmatter {
                title: node.frontmatter.title.clone(),
                date: self.format_node_date(node),
                path: node.frontmatter.path.clone(),
            },
        })
    }

    /// Unparseable dates pass through as written
    fn format_node_date(&self, node: &MarkdownNode) -> Option<String> {
        match node.date {
            Some(date) => Some(format_date(&date, self.date_format)),
            None => node.frontmatter.date.clone(),
        }
    }
}
