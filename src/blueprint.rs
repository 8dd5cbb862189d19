//! The layout blueprint data model.
//!
//! A [`LayoutBlueprint`] is the structured form of an Astro layout file:
//! imports, typed props with defaults, head nodes, body regions on either
//! side of a single content slot, and attributes for the root element.
//! Blueprints are built or mutated by an external editor, rendered to text
//! by the compiler, and reconstructed from text by the parser; only the
//! compiled text form is ever persisted.
//!
//! Everywhere ordering affects compiled output, the model uses explicit
//! ordered sequences ([`PropMap`], [`AttrList`], node vectors) rather than
//! hash maps, so that equal blueprints always compile to identical text.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named import binding: `import <binding> from "<from>";`.
///
/// `binding` must be a valid identifier; `from` is an opaque module path and
/// is not checked for existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub binding: String,
    pub from: String,
}

impl ImportSpec {
    pub fn new(binding: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            binding: binding.into(),
            from: from.into(),
        }
    }
}

/// The declared type of a prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    String,
    Number,
    Boolean,
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Boolean => "boolean",
        };
        write!(f, "{}", s)
    }
}

/// A prop default (or component prop) value: a bare JSON literal.
///
/// # Examples
///
/// ```rust
/// use lamina::blueprint::{PropType, PropValue};
/// let v = PropValue::String("hello".to_string());
/// assert_eq!(v.prop_type(), PropType::String);
/// assert_eq!(v.to_literal(), "\"hello\"");
/// assert_eq!(PropValue::Number(3.0).to_literal(), "3");
/// assert_eq!(PropValue::Bool(true).to_literal(), "true");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl PropValue {
    /// The [`PropType`] this value inhabits.
    pub fn prop_type(&self) -> PropType {
        match self {
            PropValue::String(_) => PropType::String,
            PropValue::Number(_) => PropType::Number,
            PropValue::Bool(_) => PropType::Boolean,
        }
    }

    /// Renders the value as a JavaScript/JSON literal.
    ///
    /// Strings are quoted and escaped; whole numbers render without a
    /// fractional part (`3`, not `3.0`) to match hand-authored defaults.
    pub fn to_literal(&self) -> String {
        match self {
            PropValue::String(s) => {
                serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
            }
            PropValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            PropValue::Bool(b) => b.to_string(),
        }
    }
}

/// The declared type and optional default of a single prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    #[serde(rename = "type")]
    pub ty: PropType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<PropValue>,
}

impl PropSpec {
    pub fn new(ty: PropType) -> Self {
        Self { ty, default: None }
    }

    pub fn with_default(ty: PropType, default: PropValue) -> Self {
        Self {
            ty,
            default: Some(default),
        }
    }

    /// Whether the default (if any) actually matches the declared type.
    /// The compiler does not enforce this; callers that construct specs
    /// from user input should.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::blueprint::{PropSpec, PropType, PropValue};
    /// let ok = PropSpec::with_default(PropType::Number, PropValue::Number(1.0));
    /// assert!(ok.is_coherent());
    /// let bad = PropSpec::with_default(PropType::Number, PropValue::Bool(true));
    /// assert!(!bad.is_coherent());
    /// ```
    pub fn is_coherent(&self) -> bool {
        match &self.default {
            Some(v) => v.prop_type() == self.ty,
            None => true,
        }
    }
}

/// An ordered prop-name → [`PropSpec`] mapping.
///
/// Insertion order is preserved and is the order props render in both the
/// destructure line and the props JSON marker. Serializes as a JSON object
/// in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropMap {
    entries: Vec<(String, PropSpec)>,
}

impl PropMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a prop. Replacement keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, spec: PropSpec) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = spec,
            None => self.entries.push((name, spec)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropSpec> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropSpec> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropSpec)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds every entry of `other` whose key is not already present.
    /// Existing entries are left untouched, so the receiver wins on
    /// conflict. This is the parser's props-precedence merge.
    pub fn merge_missing(&mut self, other: PropMap) {
        for (name, spec) in other.entries {
            if !self.contains_key(&name) {
                self.entries.push((name, spec));
            }
        }
    }
}

impl FromIterator<(String, PropSpec)> for PropMap {
    fn from_iter<I: IntoIterator<Item = (String, PropSpec)>>(iter: I) -> Self {
        let mut map = PropMap::new();
        for (name, spec) in iter {
            map.insert(name, spec);
        }
        map
    }
}

impl Serialize for PropMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, spec) in &self.entries {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropMapVisitor;

        impl<'de> Visitor<'de> for PropMapVisitor {
            type Value = PropMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a prop-name to prop-spec object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PropMap, A::Error> {
                let mut map = PropMap::new();
                while let Some((name, spec)) = access.next_entry::<String, PropSpec>()? {
                    map.insert(name, spec);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(PropMapVisitor)
    }
}

/// An ordered attribute list: `key="value"` pairs or bare keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttrList {
    entries: Vec<(String, Option<String>)>,
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Option<String>)> for AttrList {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Where a `<title>` gets its text: a literal, or a prop interpolated at
/// render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleSource {
    Literal(String),
    Prop(String),
}

/// A single node in the head region. Order within the region is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HeadNode {
    Meta { attrs: AttrList },
    Title { source: TitleSource },
    Raw { markup: String },
}

impl HeadNode {
    pub fn meta(attrs: AttrList) -> Self {
        HeadNode::Meta { attrs }
    }

    pub fn title_literal(text: impl Into<String>) -> Self {
        HeadNode::Title {
            source: TitleSource::Literal(text.into()),
        }
    }

    pub fn title_prop(name: impl Into<String>) -> Self {
        HeadNode::Title {
            source: TitleSource::Prop(name.into()),
        }
    }

    pub fn raw(markup: impl Into<String>) -> Self {
        HeadNode::Raw {
            markup: markup.into(),
        }
    }
}

/// A single node in a body region: an imported component reference with
/// prop values, or opaque markup passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BodyNode {
    Component {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        props: Vec<(String, PropValue)>,
    },
    Raw {
        markup: String,
    },
}

impl BodyNode {
    pub fn component(name: impl Into<String>) -> Self {
        BodyNode::Component {
            name: name.into(),
            props: Vec::new(),
        }
    }

    pub fn component_with_props(name: impl Into<String>, props: Vec<(String, PropValue)>) -> Self {
        BodyNode::Component {
            name: name.into(),
            props,
        }
    }

    pub fn raw(markup: impl Into<String>) -> Self {
        BodyNode::Raw {
            markup: markup.into(),
        }
    }
}

/// Declares where page-specific content is injected. Exactly one slot
/// exists per blueprint. `single` flags that the slot accepts exactly one
/// content block; it is informational at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSlot {
    pub name: String,
    pub single: bool,
}

impl Default for ContentSlot {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            single: true,
        }
    }
}

/// The aggregate root: everything needed to compile one layout file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBlueprint {
    pub name: String,
    pub html_attrs: AttrList,
    pub imports: Vec<ImportSpec>,
    pub props: PropMap,
    pub head: Vec<HeadNode>,
    pub pre_content: Vec<BodyNode>,
    pub content_slot: ContentSlot,
    pub post_content: Vec<BodyNode>,
}

impl LayoutBlueprint {
    /// A fresh, empty blueprint with the default content slot. Root
    /// attributes are left empty; the compiler falls back to `lang="en"`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html_attrs: AttrList::new(),
            imports: Vec::new(),
            props: PropMap::new(),
            head: Vec::new(),
            pre_content: Vec::new(),
            content_slot: ContentSlot::default(),
            post_content: Vec::new(),
        }
    }
}
