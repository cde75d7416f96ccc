//! The mapping tree produced alongside generated code.
//!
//! Each [`MappingNode`] says "this span of output was produced for this span of source,
//! on behalf of this origin". Children nest inside their parent in output order, so the
//! tree can be walked from either side to translate a position.

use crate::range::Range;
use crate::syntax::SyntaxNode;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// What a mapping node is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin<N> {
    /// A node of the input tree.
    Node(N),
    /// A bare name that has no node of its own in the input tree.
    Identifier(String),
}

impl<N: SyntaxNode> Origin<N> {
    /// Node kind, or `"Identifier"` for identifier placeholders.
    pub fn kind(&self) -> &str {
        match self {
            Origin::Node(node) => node.kind(),
            Origin::Identifier(_) => "Identifier",
        }
    }
}

impl<N> Origin<N> {
    pub fn as_node(&self) -> Option<&N> {
        match self {
            Origin::Node(node) => Some(node),
            Origin::Identifier(_) => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Origin::Node(_) => None,
            Origin::Identifier(name) => Some(name),
        }
    }
}

impl<N: SyntaxNode> Serialize for Origin<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Origin::Node(node) => map.serialize_entry("node", node.kind())?,
            Origin::Identifier(name) => map.serialize_entry("identifier", name)?,
        }
        map.end()
    }
}

/// One record of the mapping tree.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(bound(serialize = "N: SyntaxNode"))]
pub struct MappingNode<N> {
    pub output_range: Range,
    pub source_range: Range,
    /// Ordered by output position, each inside `output_range`, never overlapping.
    pub children: Vec<MappingNode<N>>,
    pub origin: Origin<N>,
}

impl<N> MappingNode<N> {
    pub fn new(
        output_range: Range,
        source_range: Range,
        children: Vec<MappingNode<N>>,
        origin: Origin<N>,
    ) -> Self {
        Self {
            output_range,
            source_range,
            children,
            origin,
        }
    }

    pub fn children(&self) -> &[MappingNode<N>] {
        &self.children
    }

    /// Deepest node whose output range contains `range`.
    ///
    /// Returns `self` when no child is narrower; callers are expected to pass a range
    /// inside this node's output range.
    pub fn narrowest_for_output(&self, range: Range) -> &MappingNode<N> {
        let mut current = self;
        while let Some(child) = current
            .children
            .iter()
            .find(|child| child.output_range.contains(range))
        {
            current = child;
        }
        current
    }

    /// Deepest node whose source range contains `range`, preferring the earliest child
    /// when several cover the same source.
    pub fn narrowest_for_source(&self, range: Range) -> &MappingNode<N> {
        let mut current = self;
        while let Some(child) = current
            .children
            .iter()
            .find(|child| child.source_range.contains(range))
        {
            current = child;
        }
        current
    }

    /// Pre-order walk starting with this node.
    pub fn walk(&self) -> Walk<'_, N> {
        Walk { stack: vec![self] }
    }

    /// Number of levels in this subtree (1 for a leaf).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }
}

impl<N: SyntaxNode> MappingNode<N> {
    /// Indented dump of the tree showing the text on both sides of every node.
    pub fn to_debug_string(&self, source: &str, code: &str) -> String {
        let mut out = String::new();
        self.write_debug(source, code, 0, &mut out);
        out
    }

    fn write_debug(&self, source: &str, code: &str, level: usize, out: &mut String) {
        let label = match &self.origin {
            Origin::Node(node) => node.kind().to_string(),
            Origin::Identifier(name) => format!("Identifier({name})"),
        };
        out.push_str(&format!(
            "{}{} [{}..{}] {:?} => [{}..{}] {:?}\n",
            "  ".repeat(level),
            label,
            self.source_range.start,
            self.source_range.end,
            self.source_range.slice(source),
            self.output_range.start,
            self.output_range.end,
            self.output_range.slice(code),
        ));
        for child in &self.children {
            child.write_debug(source, code, level + 1, out);
        }
    }
}

/// Iterator returned by [`MappingNode::walk`].
pub struct Walk<'a, N> {
    stack: Vec<&'a MappingNode<N>>,
}

impl<'a, N> Iterator for Walk<'a, N> {
    type Item = &'a MappingNode<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
