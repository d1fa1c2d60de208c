// Strongly-typed schema tree. No serde_json::Value here except literal numbers.
//
// Child nodes are `Arc`-shared: the tree is `Send + Sync` (namespaces render in
// parallel) and node identity (`Arc::as_ptr`) is what anonymous-object
// de-duplication keys on.
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Number;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSchema {
    pub kind: TypeKind,
    pub optional: bool,
    pub description: Option<String>,
    pub facets: Facets,
}

/// Exactly one kind per node.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive { name: String },
    Array { items: Arc<TypeSchema> },
    Object { properties: IndexMap<String, Arc<TypeSchema>> }, // declaration order
    Reference { target: String },
    Union { choices: Vec<Arc<TypeSchema>> },
    Function { parameters: Vec<Parameter>, returns: Option<Arc<TypeSchema>> },
}

/// Value constraints that only make sense for some kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facets {
    pub enum_values: Option<Vec<EnumValue>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    Bare(String),
    Described { name: String, description: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub schema: Arc<TypeSchema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSchema {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub returns: Option<Arc<TypeSchema>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventSchema {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    /// Arguments given to `addListener` itself, after the callback.
    pub extra_parameters: Vec<Parameter>,
    pub returns: Option<Arc<TypeSchema>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub name: String,
    pub description: Option<String>,
    pub schema: Arc<TypeSchema>,
}

/// A named entry of a namespace's `types` list.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub id: String,
    pub schema: Arc<TypeSchema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub description: Option<String>,
    /// File stem of the document the namespace came from (`web_request`).
    pub source_name: String,
    pub functions: Vec<FunctionSchema>,
    pub properties: IndexMap<String, PropertySchema>,
    pub types: Vec<TypeDefinition>,
    pub events: Vec<EventSchema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    pub source_name: String,
    pub namespaces: Vec<Namespace>,
}

impl TypeSchema {
    pub fn new(kind: TypeKind) -> Self {
        Self { kind, optional: false, description: None, facets: Facets::default() }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Primitive { name: name.into() })
    }

    pub fn reference(target: impl Into<String>) -> Self {
        Self::new(TypeKind::Reference { target: target.into() })
    }

    pub fn array(items: TypeSchema) -> Self {
        Self::new(TypeKind::Array { items: Arc::new(items) })
    }

    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeSchema)>,
        K: Into<String>,
    {
        Self::new(TypeKind::Object {
            properties: properties.into_iter().map(|(k, v)| (k.into(), Arc::new(v))).collect(),
        })
    }

    pub fn union(choices: impl IntoIterator<Item = TypeSchema>) -> Self {
        Self::new(TypeKind::Union { choices: choices.into_iter().map(Arc::new).collect() })
    }

    pub fn function(parameters: Vec<Parameter>) -> Self {
        Self::new(TypeKind::Function { parameters, returns: None })
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_enum(mut self, values: Vec<EnumValue>) -> Self {
        self.facets.enum_values = Some(values);
        self
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, TypeKind::Object { .. })
    }

    /// Object with at least one declared property.
    pub fn has_properties(&self) -> bool {
        matches!(&self.kind, TypeKind::Object { properties } if !properties.is_empty())
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, schema: TypeSchema) -> Self {
        Self { name: name.into(), schema: Arc::new(schema) }
    }
}

impl Namespace {
    pub fn new(name: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            source_name: source_name.into(),
            functions: Vec::new(),
            properties: IndexMap::new(),
            types: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
            && self.properties.is_empty()
            && self.types.is_empty()
            && self.events.is_empty()
    }
}

/// The four documented entity kinds plus the per-namespace index page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Function,
    Property,
    Type,
    Event,
    Index,
}

impl EntityKind {
    /// Tag used in page headers.
    pub fn tag(self) -> &'static str {
        match self {
            EntityKind::Function => "Method",
            EntityKind::Property => "Property",
            EntityKind::Type => "Type",
            EntityKind::Event => "Event",
            EntityKind::Index => "Interface",
        }
    }

    /// Prefix of the upstream documentation anchor (`method-create`).
    pub fn anchor_prefix(self) -> Option<&'static str> {
        match self {
            EntityKind::Function => Some("method"),
            EntityKind::Property => Some("property"),
            EntityKind::Type => Some("type"),
            EntityKind::Event => Some("event"),
            EntityKind::Index => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityKind::Function => "function",
            EntityKind::Property => "property",
            EntityKind::Type => "type",
            EntityKind::Event => "event",
            EntityKind::Index => "index",
        };
        f.write_str(s)
    }
}
