//! Collapsible tree rendering of a [`JsonValue`].
//!
//! Rendering is a pure function of the value, the set of collapsed paths and
//! the key order. Every container is addressed by its [`TreePath`], so the
//! collapse flags live outside the rendered lines and survive re-renders.

use std::collections::HashSet;
use std::fmt;

use crate::value::JsonValue;

const INDENT: &str = "  ";
const EXPANDED: &str = "▾ ";
const COLLAPSED: &str = "▸ ";

/// Position of a node: the keys (or stringified list indices) from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath(Vec<String>);

impl TreePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a `/` separated path; an empty string is the root.
    /// Parses `/` separated segments. Inside a segment `~1` stands for `/`
    /// and `~0` for `~`, as in a JSON Pointer.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim_matches('/');
        if trimmed.is_empty() {
            return Self::root();
        }
        Self(trimmed.split('/').map(unescape).collect())
    }

    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn resolve<'v>(&self, value: &'v JsonValue) -> Option<&'v JsonValue> {
        self.0
            .iter()
            .try_fold(value, |node, key| node.child(key))
    }
}

impl<S: Into<String>> FromIterator<S> for TreePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaped: Vec<String> = self.0.iter().map(|segment| escape(segment)).collect();
        write!(f, "/{}", escaped.join("/"))
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// The set of collapsed containers. Anything not in the set is expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashSet<TreePath>,
}

impl CollapseState {
    pub fn is_collapsed(&self, path: &TreePath) -> bool {
        self.collapsed.contains(path)
    }

    /// Flips one node and returns its new collapsed flag.
    pub fn toggle(&mut self, path: &TreePath) -> bool {
        if self.collapsed.remove(path) {
            false
        } else {
            self.collapsed.insert(path.clone());
            true
        }
    }

    pub fn set(&mut self, path: TreePath, collapsed: bool) {
        if collapsed {
            self.collapsed.insert(path);
        } else {
            self.collapsed.remove(&path);
        }
    }

    pub fn clear(&mut self) {
        self.collapsed.clear();
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }
}

/// How map entries are ordered in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyOrder {
    /// Source order, matching the formatted text.
    #[default]
    Insertion,
    /// Byte-wise lexicographic order.
    Sorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    List,
    Map,
}

impl Container {
    pub fn open(self) -> char {
        match self {
            Container::List => '[',
            Container::Map => '{',
        }
    }

    pub fn close(self) -> char {
        match self {
            Container::List => ']',
            Container::Map => '}',
        }
    }

    fn noun(self, count: usize) -> &'static str {
        match (self, count) {
            (Container::List, 1) => "item",
            (Container::List, _) => "items",
            (Container::Map, 1) => "property",
            (Container::Map, _) => "properties",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A scalar: `"key": literal`.
    Leaf { key: String, literal: String },
    /// A container without children: `"key": []`. No toggle.
    Empty { key: String, container: Container },
    /// Header of an expanded container.
    Open { key: String, container: Container },
    /// Summary of a collapsed container: `"key": [3 items]`.
    Collapsed {
        key: String,
        container: Container,
        count: usize,
    },
    /// Closing bracket of an expanded container.
    Close { container: Container },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub path: TreePath,
    pub kind: LineKind,
}

impl TreeLine {
    /// Whether clicking this line would flip a collapse flag.
    pub fn has_toggle(&self) -> bool {
        matches!(
            self.kind,
            LineKind::Open { .. } | LineKind::Collapsed { .. }
        )
    }
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            f.write_str(INDENT)?;
        }
        match &self.kind {
            LineKind::Leaf { key, literal } => {
                f.write_str(INDENT)?;
                write_key(f, key)?;
                f.write_str(literal)
            }
            LineKind::Empty { key, container } => {
                f.write_str(INDENT)?;
                write_key(f, key)?;
                write!(f, "{}{}", container.open(), container.close())
            }
            LineKind::Open { key, container } => {
                f.write_str(EXPANDED)?;
                write_key(f, key)?;
                write!(f, "{}", container.open())
            }
            LineKind::Collapsed {
                key,
                container,
                count,
            } => {
                f.write_str(COLLAPSED)?;
                write_key(f, key)?;
                write!(
                    f,
                    "{}{} {}{}",
                    container.open(),
                    count,
                    container.noun(*count),
                    container.close()
                )
            }
            LineKind::Close { container } => {
                f.write_str(INDENT)?;
                write!(f, "{}", container.close())
            }
        }
    }
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    if key.is_empty() {
        Ok(())
    } else {
        write!(f, "\"{}\": ", key)
    }
}

/// Display form of a scalar. Strings are quoted but not escaped.
pub fn literal(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => Some("null".to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::String(s) => Some(format!("\"{}\"", s)),
        JsonValue::List(_) | JsonValue::Map(_) => None,
    }
}

pub fn render(value: &JsonValue, collapsed: &CollapseState, order: KeyOrder) -> Vec<TreeLine> {
    let mut renderer = Renderer {
        collapsed,
        order,
        lines: Vec::new(),
    };
    renderer.node("", value, TreePath::root(), 0);
    renderer.lines
}

/// Renders and joins the lines with `\n`.
pub fn render_text(value: &JsonValue, collapsed: &CollapseState, order: KeyOrder) -> String {
    render(value, collapsed, order)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

struct Renderer<'a> {
    collapsed: &'a CollapseState,
    order: KeyOrder,
    lines: Vec<TreeLine>,
}

impl Renderer<'_> {
    fn node(&mut self, key: &str, value: &JsonValue, path: TreePath, depth: usize) {
        let key = key.to_owned();
        let kind = match value {
            JsonValue::List(items) => {
                let children = items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| (idx.to_string(), item))
                    .collect();
                return self.container(key, Container::List, children, path, depth);
            }
            JsonValue::Map(entries) => {
                let mut children: Vec<(String, &JsonValue)> = entries
                    .iter()
                    .map(|(name, item)| (name.clone(), item))
                    .collect();
                if self.order == KeyOrder::Sorted {
                    children.sort_by(|a, b| a.0.cmp(&b.0));
                }
                return self.container(key, Container::Map, children, path, depth);
            }
            scalar => LineKind::Leaf {
                key,
                literal: literal(scalar).unwrap_or_default(),
            },
        };
        self.lines.push(TreeLine { depth, path, kind });
    }

    fn container(
        &mut self,
        key: String,
        container: Container,
        children: Vec<(String, &JsonValue)>,
        path: TreePath,
        depth: usize,
    ) {
        if children.is_empty() {
            self.lines.push(TreeLine {
                depth,
                path,
                kind: LineKind::Empty { key, container },
            });
            return;
        }
        if self.collapsed.is_collapsed(&path) {
            self.lines.push(TreeLine {
                depth,
                path,
                kind: LineKind::Collapsed {
                    key,
                    container,
                    count: children.len(),
                },
            });
            return;
        }
        self.lines.push(TreeLine {
            depth,
            path: path.clone(),
            kind: LineKind::Open { key, container },
        });
        for (name, child) in children {
            let child_path = path.child(name.as_str());
            self.node(&name, child, child_path, depth + 1);
        }
        self.lines.push(TreeLine {
            depth,
            path,
            kind: LineKind::Close { container },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(v: serde_json::Value) -> JsonValue {
        JsonValue::from(v)
    }

    #[test]
    fn renders_nested_document() {
        let doc = value(json!({"a": 1, "b": [1, 2, 3]}));
        let text = render_text(&doc, &CollapseState::default(), KeyOrder::Insertion);
        assert_eq!(
            text,
            [
                "▾ {",
                "    \"a\": 1",
                "  ▾ \"b\": [",
                "      \"0\": 1",
                "      \"1\": 2",
                "      \"2\": 3",
                "    ]",
                "  }",
            ]
            .join("\n")
        );
    }

    #[test]
    fn empty_containers_have_no_toggle() {
        let lines = render(&value(json!([])), &CollapseState::default(), KeyOrder::Insertion);
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].has_toggle());
        assert_eq!(lines[0].to_string(), "  []");

        let lines = render(
            &value(json!({"k": {}})),
            &CollapseState::default(),
            KeyOrder::Insertion,
        );
        assert_eq!(lines[1].to_string(), "    \"k\": {}");
        assert!(!lines[1].has_toggle());
    }

    #[test]
    fn scalar_root_omits_key() {
        let lines = render(&value(json!(42)), &CollapseState::default(), KeyOrder::Insertion);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "  42");
    }

    #[test]
    fn collapsed_node_shows_count() {
        let doc = value(json!({"b": [1, 2, 3], "c": {"x": null}}));
        let mut state = CollapseState::default();
        state.toggle(&TreePath::parse("b"));
        state.toggle(&TreePath::parse("c"));
        let text = render_text(&doc, &state, KeyOrder::Insertion);
        assert_eq!(
            text,
            "▾ {\n  ▸ \"b\": [3 items]\n  ▸ \"c\": {1 property}\n  }"
        );

        state.toggle(&TreePath::root());
        assert_eq!(render_text(&doc, &state, KeyOrder::Insertion), "▸ {2 properties}");
    }

    #[test]
    fn strings_are_not_escaped() {
        let doc = value(json!({"q": "say \"hi\"\n"}));
        let lines = render(&doc, &CollapseState::default(), KeyOrder::Insertion);
        assert_eq!(lines[1].to_string(), "    \"q\": \"say \"hi\"\n\"");
    }

    #[test]
    fn key_order_policy() {
        let doc = value(json!({"z": 1, "a": 2}));
        let keys = |order| {
            render(&doc, &CollapseState::default(), order)
                .into_iter()
                .filter_map(|line| match line.kind {
                    LineKind::Leaf { key, .. } => Some(key),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(KeyOrder::Insertion), ["z", "a"]);
        assert_eq!(keys(KeyOrder::Sorted), ["a", "z"]);
    }

    #[test]
    fn toggles_are_independent() {
        let mut state = CollapseState::default();
        let parent = TreePath::parse("a");
        let child = parent.child("b");
        let sibling = TreePath::parse("c");

        state.toggle(&parent);
        assert!(state.toggle(&child));
        assert!(state.is_collapsed(&parent));
        assert!(!state.is_collapsed(&sibling));

        assert!(!state.toggle(&child));
        assert!(state.is_collapsed(&parent));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn collapsed_child_survives_parent_toggle() {
        let doc = value(json!({"a": {"b": [1]}}));
        let mut state = CollapseState::default();
        let a = TreePath::parse("a");
        let b = TreePath::parse("a/b");
        state.toggle(&b);
        state.toggle(&a);
        state.toggle(&a);
        let lines = render(&doc, &state, KeyOrder::Insertion);
        assert!(lines
            .iter()
            .any(|line| line.path == b && matches!(line.kind, LineKind::Collapsed { .. })));
    }

    #[test]
    fn paths_parse_and_resolve() {
        let doc = value(json!({"a": [{"b": true}]}));
        assert!(TreePath::parse("").is_root());
        assert!(TreePath::parse("/").is_root());
        let path = TreePath::parse("/a/0/b");
        assert_eq!(path.segments(), ["a", "0", "b"]);
        assert_eq!(path.to_string(), "/a/0/b");
        assert_eq!(path.resolve(&doc), Some(&JsonValue::Bool(true)));
        assert_eq!(TreePath::parse("a/1").resolve(&doc), None);
        let collected: TreePath = ["a", "0"].into_iter().collect();
        assert_eq!(collected, TreePath::parse("a/0"));
    }

    #[test]
    fn paths_escape_slash_and_tilde_in_keys() {
        let doc = value(json!({"a/b": {"~c": 1}, "a": {"b": 2}}));
        let path = TreePath::parse("/a~1b/~0c");
        assert_eq!(path.segments(), ["a/b", "~c"]);
        assert_eq!(path.resolve(&doc), Some(&value(json!(1))));
        assert_eq!(path.to_string(), "/a~1b/~0c");
        assert_eq!(TreePath::parse(&path.to_string()), path);
        assert_eq!(TreePath::parse("/~01").segments(), ["~1"]);
        assert_eq!(TreePath::parse("/a/b").resolve(&doc), Some(&value(json!(2))));
    }
}
