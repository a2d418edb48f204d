use tracing::debug;

use super::tokenizer::{Operator, SearchType, Token};

/// Deepest group nesting [`build`] accepts
pub const MAX_QUERY_DEPTH: usize = 256;

/// Index of a node inside an [`Ast`]
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Sentinel at index 0; its single child is the query
    ExecRoot,
    /// Placeholder waiting for content
    Empty,
    SearchString(String),
    /// Group that never saw its closing character
    Opening(char),
    /// Group whose closing character arrived
    Closed(char),
    Operator(Operator),
    SearchType(SearchType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Query tree stored as an arena; parents and children refer to each other
/// by index so operators can be spliced in above an existing node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub const ROOT: NodeId = 0;

    fn new() -> Self {
        Ast {
            nodes: vec![
                Node {
                    kind: NodeKind::ExecRoot,
                    parent: None,
                    children: vec![1],
                },
                Node {
                    kind: NodeKind::Empty,
                    parent: Some(Self::ROOT),
                    children: Vec::new(),
                },
            ],
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    fn push_child(&mut self, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind: NodeKind::Empty,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Sets the kind of `current` and descends into a fresh empty child
    fn open(&mut self, current: NodeId, kind: NodeKind) -> NodeId {
        self.nodes[current].kind = kind;
        self.push_child(current)
    }

    /// Puts an operator node in place of `current`, which becomes its first
    /// child; returns the new empty second child.
    fn splice_operator(&mut self, current: NodeId, op: Operator) -> Option<NodeId> {
        let parent = self.nodes[current].parent?;
        let inserted = self.nodes.len();
        self.nodes.push(Node {
            kind: NodeKind::Operator(op),
            parent: Some(parent),
            children: vec![current],
        });
        for child in self.nodes[parent].children.iter_mut() {
            if *child == current {
                *child = inserted;
            }
        }
        self.nodes[current].parent = Some(inserted);
        Some(self.push_child(inserted))
    }

    /// Walks up from `current` to the nearest open group and closes it
    fn close(&mut self, mut current: NodeId) -> Option<NodeId> {
        loop {
            let node = &mut self.nodes[current];
            if let NodeKind::Opening(c) = node.kind {
                node.kind = NodeKind::Closed(c);
                return Some(current);
            }
            current = node.parent?;
        }
    }

    /// Longest path from the root to a leaf, counted in edges
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(Self::ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().map(|c| (*c, depth + 1)));
            }
        }
        deepest
    }

    /// Indented one-node-per-line rendering for debug logs
    pub fn render(&self) -> String {
        let mut out = Vec::new();
        self.render_node(Self::ROOT, 0, &mut out);
        out.join("\n")
    }

    fn render_node(&self, id: NodeId, depth: usize, out: &mut Vec<String>) {
        let node = &self.nodes[id];
        out.push(format!("{}{:?}", " ".repeat(depth), node.kind));
        for child in &node.children {
            self.render_node(*child, depth + 1, out);
        }
    }
}

/// Builds a query tree from tokens.
///
/// Returns `None` for queries that can't be evaluated, e.g. a closing
/// character with no open group above the current position, or nesting
/// deeper than [`MAX_QUERY_DEPTH`].
pub fn build(tokens: &[Token]) -> Option<Ast> {
    let mut ast = Ast::new();
    let mut current: NodeId = 1;

    for token in tokens {
        match token {
            Token::SearchString(s) => ast.nodes[current].kind = NodeKind::SearchString(s.clone()),
            Token::Opening(c) => current = ast.open(current, NodeKind::Opening(*c)),
            Token::SearchType(t) => current = ast.open(current, NodeKind::SearchType(*t)),
            Token::Operator(op) => current = ast.splice_operator(current, *op)?,
            Token::Closing(_) => match ast.close(current) {
                Some(closed) => current = closed,
                None => {
                    debug!("Closing character without an open group");
                    return None;
                }
            },
        }
    }

    let depth = ast.depth();
    if depth > MAX_QUERY_DEPTH {
        debug!(depth, "Search query nested too deeply");
        return None;
    }

    debug!(tree = %ast.render(), "Built search tree");

    let root = ast.root();
    if root.kind != NodeKind::ExecRoot || root.parent.is_some() {
        return None;
    }
    Some(ast)
}
