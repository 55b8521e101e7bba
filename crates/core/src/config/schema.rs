use serde_json::Value;

/// Name of the boolean option added by [`ArrayNode::can_be_enabled`] and
/// [`ArrayNode::can_be_disabled`]
pub const ENABLED_OPTION: &str = "enabled";

/// Builds the configuration tree of one named section
///
/// ```rust
/// use weave_core::config::TreeBuilder;
///
/// let mut tree = TreeBuilder::new("cache");
/// let root = tree.root_node();
/// root.integer("ttl").default_value(60).min(0);
/// root.string("prefix").required();
/// root.array("pool").can_be_enabled().integer("size").default_value(8);
///
/// assert_eq!(tree.name(), "cache");
/// assert!(tree.root().child("pool").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    root: ArrayNode,
}

impl TreeBuilder {
    /// Create a tree whose root node carries the section name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            root: ArrayNode::new(name),
        }
    }

    /// Section name
    pub fn name(&self) -> &str {
        &self.root.name
    }

    /// Mutable root node, handed to integrations to declare their options
    pub fn root_node(&mut self) -> &mut ArrayNode {
        &mut self.root
    }

    /// Finished tree
    pub fn root(&self) -> &ArrayNode {
        &self.root
    }
}

/// Value shape accepted by a leaf node
#[derive(Debug, Clone, PartialEq)]
pub enum LeafKind {
    /// Any scalar: string, number, bool or null
    Scalar,
    String,
    Integer,
    Float,
    Boolean,
    /// One of a fixed set of values
    Enum(Vec<Value>),
    /// Sequence of values of the inner kind; merged configs append
    List(Box<LeafKind>),
    /// String-keyed object of values of the inner kind; merged configs override per key
    Map(Box<LeafKind>),
    /// Anything, passed through untouched
    Variable,
}

impl LeafKind {
    /// Describe the kind for error messages
    pub fn describe(&self) -> String {
        match self {
            LeafKind::Scalar => "scalar".to_string(),
            LeafKind::String => "string".to_string(),
            LeafKind::Integer => "int".to_string(),
            LeafKind::Float => "float".to_string(),
            LeafKind::Boolean => "bool".to_string(),
            LeafKind::Enum(values) => {
                let values: Vec<String> = values.iter().map(Value::to_string).collect();
                format!("one of {}", values.join(", "))
            }
            LeafKind::List(inner) => format!("list of {}", inner.describe()),
            LeafKind::Map(inner) => format!("map of {}", inner.describe()),
            LeafKind::Variable => "any value".to_string(),
        }
    }

    /// Implicit value of a node without an explicit default
    fn implicit_default(&self) -> Option<Value> {
        match self {
            LeafKind::List(_) => Some(Value::Array(Vec::new())),
            LeafKind::Map(_) => Some(Value::Object(serde_json::Map::new())),
            _ => None,
        }
    }
}

/// Leaf option of a configuration tree
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub name: String,
    pub kind: LeafKind,
    pub default: Option<Value>,
    pub required: bool,
    pub info: Option<String>,
    pub pattern: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl LeafNode {
    /// Create a new leaf node
    pub fn new(name: impl Into<String>, kind: LeafKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: false,
            info: None,
            pattern: None,
            min: None,
            max: None,
        }
    }

    /// Set the default value used when the option is not configured
    pub fn default_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    /// Make the option mandatory
    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    /// Attach a description
    pub fn info(&mut self, info: impl Into<String>) -> &mut Self {
        self.info = Some(info.into());
        self
    }

    /// Require string values to match a regular expression
    pub fn matches(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Lower bound for numeric values
    pub fn min(&mut self, min: impl Into<f64>) -> &mut Self {
        self.min = Some(min.into());
        self
    }

    /// Upper bound for numeric values
    pub fn max(&mut self, max: impl Into<f64>) -> &mut Self {
        self.max = Some(max.into());
        self
    }

    /// Value used when the option is absent from every raw config
    pub fn effective_default(&self) -> Option<Value> {
        self.default.clone().or_else(|| self.kind.implicit_default())
    }
}

/// Child of an [`ArrayNode`]
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(LeafNode),
    Array(ArrayNode),
}

impl Node {
    /// Option name
    pub fn name(&self) -> &str {
        match self {
            Node::Leaf(leaf) => &leaf.name,
            Node::Array(array) => &array.name,
        }
    }
}

/// Nested group of options
///
/// Array nodes always materialize: when absent from the raw configuration they
/// resolve to the defaults of their children.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub name: String,
    pub info: Option<String>,
    children: Vec<Node>,
    toggle: Option<bool>,
}

impl ArrayNode {
    /// Create an empty array node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: None,
            children: Vec::new(),
            toggle: None,
        }
    }

    /// Declare an option accepting any scalar
    pub fn scalar(&mut self, name: impl Into<String>) -> &mut LeafNode {
        self.leaf(LeafNode::new(name, LeafKind::Scalar))
    }

    /// Declare a string option
    pub fn string(&mut self, name: impl Into<String>) -> &mut LeafNode {
        self.leaf(LeafNode::new(name, LeafKind::String))
    }

    /// Declare an integer option
    pub fn integer(&mut self, name: impl Into<String>) -> &mut LeafNode {
        self.leaf(LeafNode::new(name, LeafKind::Integer))
    }

    /// Declare a float option; integers are accepted too
    pub fn float(&mut self, name: impl Into<String>) -> &mut LeafNode {
        self.leaf(LeafNode::new(name, LeafKind::Float))
    }

    /// Declare a boolean option
    pub fn boolean(&mut self, name: impl Into<String>) -> &mut LeafNode {
        self.leaf(LeafNode::new(name, LeafKind::Boolean))
    }

    /// Declare an option restricted to the given values
    pub fn enumeration<I, V>(&mut self, name: impl Into<String>, values: I) -> &mut LeafNode
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.leaf(LeafNode::new(name, LeafKind::Enum(values)))
    }

    /// Declare a list option whose items have the given kind
    pub fn list(&mut self, name: impl Into<String>, item: LeafKind) -> &mut LeafNode {
        self.leaf(LeafNode::new(name, LeafKind::List(Box::new(item))))
    }

    /// Declare a string-keyed map option whose values have the given kind
    pub fn map(&mut self, name: impl Into<String>, value: LeafKind) -> &mut LeafNode {
        self.leaf(LeafNode::new(name, LeafKind::Map(Box::new(value))))
    }

    /// Declare an option accepting any value
    pub fn variable(&mut self, name: impl Into<String>) -> &mut LeafNode {
        self.leaf(LeafNode::new(name, LeafKind::Variable))
    }

    /// Declare a nested group of options
    pub fn array(&mut self, name: impl Into<String>) -> &mut ArrayNode {
        let name = name.into();
        self.children.retain(|child| child.name() != name);
        let index = self.children.len();
        self.children.push(Node::Array(ArrayNode::new(name)));
        match &mut self.children[index] {
            Node::Array(array) => array,
            Node::Leaf(_) => unreachable!("just pushed an array node"),
        }
    }

    /// Add an `enabled` flag defaulting to `false`
    ///
    /// A bare `true`, `false` or `null` in the raw configuration toggles the
    /// flag; configuring any other option of the group implies `enabled: true`.
    pub fn can_be_enabled(&mut self) -> &mut Self {
        self.toggle(false)
    }

    /// Add an `enabled` flag defaulting to `true`
    pub fn can_be_disabled(&mut self) -> &mut Self {
        self.toggle(true)
    }

    /// Attach a description
    pub fn info(&mut self, info: impl Into<String>) -> &mut Self {
        self.info = Some(info.into());
        self
    }

    /// Default of the `enabled` flag when the node is toggleable
    pub fn toggle_default(&self) -> Option<bool> {
        self.toggle
    }

    /// Declared children, in declaration order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Look up a child by name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Names of the declared children
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(Node::name).collect()
    }

    fn toggle(&mut self, enabled_by_default: bool) -> &mut Self {
        self.toggle = Some(enabled_by_default);
        self.boolean(ENABLED_OPTION).default_value(enabled_by_default);
        self
    }

    fn leaf(&mut self, leaf: LeafNode) -> &mut LeafNode {
        let name = leaf.name.clone();
        self.children.retain(|child| child.name() != name);
        let index = self.children.len();
        self.children.push(Node::Leaf(leaf));
        match &mut self.children[index] {
            Node::Leaf(leaf) => leaf,
            Node::Array(_) => unreachable!("just pushed a leaf node"),
        }
    }
}
