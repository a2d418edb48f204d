//! Boolean query language over a [`Store`].
//!
//! A query is tokenized, built into a tree and evaluated against the store's
//! folder, tag and fulltext filters:
//!
//! ```text
//! "groceries"                       fulltext search
//! folder:inbox                      notes in a folder
//! (tag:(work) and "report") or (x)  composed queries
//! ```
//!
//! Queries that can't be built evaluate to no results.

pub mod ast;
pub mod tokenizer;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::Result;
use crate::store::Store;
pub use ast::{build, Ast, NodeId, NodeKind};
pub use tokenizer::{tokenize, Operator, SearchType, Token};

/// Matching ids plus the fulltext terms used, for highlighting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Highest version first, no duplicates
    pub ids: Vec<String>,
    pub highlights: Vec<String>,
}

/// Runs `query` against `store`
pub fn search(store: &Store, query: &str) -> SearchResult {
    let tokens = tokenize(query);
    let Some(ast) = build(&tokens) else {
        debug!(query, "Search query rejected");
        return SearchResult::default();
    };
    let mut highlights = Vec::new();
    match execute(&ast, Ast::ROOT, store, None, Some(&mut highlights)) {
        Ok(ids) => SearchResult { ids, highlights },
        Err(e) => {
            warn!(query, error = %e, "Search failed");
            SearchResult::default()
        }
    }
}

/// Evaluates one node of the tree.
///
/// `search_type` is inherited from the nearest `fulltext:`/`folder:`/`tag:`
/// ancestor, fulltext when there is none. Fulltext terms are appended to
/// `highlights` when given.
pub fn execute(
    ast: &Ast,
    id: NodeId,
    store: &Store,
    search_type: Option<SearchType>,
    mut highlights: Option<&mut Vec<String>>,
) -> Result<Vec<String>> {
    let Some(node) = ast.node(id) else {
        return Ok(Vec::new());
    };
    let child = |n: usize| node.children.get(n).copied();

    match &node.kind {
        NodeKind::ExecRoot => match child(0) {
            Some(c) => dedup_sorted(store, execute(ast, c, store, None, highlights)?),
            None => Ok(Vec::new()),
        },
        NodeKind::SearchString(text) => Ok(match search_type.unwrap_or_default() {
            SearchType::Fulltext => {
                if let Some(h) = highlights {
                    h.push(text.clone());
                }
                store.filter_search(text)
            }
            SearchType::Folder => store.filter_folder(text),
            SearchType::Tag => store.filter_tag(text),
        }),
        NodeKind::Operator(op) => {
            let (Some(left), Some(right)) = (child(0), child(1)) else {
                return Ok(Vec::new());
            };
            let left = execute(ast, left, store, search_type, highlights.as_deref_mut())?;
            let right = execute(ast, right, store, search_type, highlights)?;
            let combined = match op {
                Operator::And => {
                    let right: BTreeSet<&String> = right.iter().collect();
                    left.iter().filter(|id| right.contains(id)).cloned().collect()
                }
                Operator::Or => left.into_iter().chain(right).collect(),
            };
            dedup_sorted(store, combined)
        }
        NodeKind::SearchType(t) => match child(0) {
            Some(c) => execute(ast, c, store, Some(*t), highlights),
            None => Ok(Vec::new()),
        },
        NodeKind::Closed(_) => match child(0) {
            Some(c) => execute(ast, c, store, search_type, highlights),
            None => Ok(Vec::new()),
        },
        NodeKind::Empty | NodeKind::Opening(_) => Ok(Vec::new()),
    }
}

fn dedup_sorted(store: &Store, ids: Vec<String>) -> Result<Vec<String>> {
    let unique: BTreeSet<String> = ids.into_iter().collect();
    store.sort_ids_descending_lamport(unique)
}
