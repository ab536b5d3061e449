//! Declaration nodes.
//!
//! The front end reduces its syntax tree to the declarations the converter
//! cares about. Nodes live in a flat [`NodeArena`] and refer to each other by
//! [`NodeIndex`]; a node's `children` are the member declarations nested in it
//! (class members, namespace statements, enum members, ...).

use crate::program::FileId;
use crate::symbol::SymbolId;
use crate::types::TypeId;
use serde::{Deserialize, Serialize};

/// Index of a node in a program's [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIndex(pub u32);

/// Declaration node kinds handed over by the front end.
///
/// Wrapper statements the converter has no converter for (`VariableStatement`,
/// `ModuleBlock`, `ExportDeclaration`, ...) are reported with their own kind or
/// as `Unknown`; their children are still visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    /// `declare module "name" { ... }`
    Module,
    Namespace,
    Class,
    Interface,
    Enum,
    EnumMember,
    Variable,
    Function,
    Method,
    Constructor,
    Property,
    GetAccessor,
    SetAccessor,
    TypeAlias,
    CallSignature,
    ConstructSignature,
    IndexSignature,
    Parameter,
    TypeParameter,
    VariableStatement,
    ModuleBlock,
    ExportDeclaration,
    #[serde(other)]
    Unknown,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Module => "module",
            DeclarationKind::Namespace => "namespace",
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Enum => "enum",
            DeclarationKind::EnumMember => "enum member",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Function => "function",
            DeclarationKind::Method => "method",
            DeclarationKind::Constructor => "constructor",
            DeclarationKind::Property => "property",
            DeclarationKind::GetAccessor => "get accessor",
            DeclarationKind::SetAccessor => "set accessor",
            DeclarationKind::TypeAlias => "type alias",
            DeclarationKind::CallSignature => "call signature",
            DeclarationKind::ConstructSignature => "construct signature",
            DeclarationKind::IndexSignature => "index signature",
            DeclarationKind::Parameter => "parameter",
            DeclarationKind::TypeParameter => "type parameter",
            DeclarationKind::VariableStatement => "variable statement",
            DeclarationKind::ModuleBlock => "module block",
            DeclarationKind::ExportDeclaration => "export declaration",
            DeclarationKind::Unknown => "unknown",
        }
    }

    /// Kinds whose declarations produce call signatures.
    pub const fn is_signature_like(self) -> bool {
        matches!(
            self,
            DeclarationKind::Function
                | DeclarationKind::Method
                | DeclarationKind::Constructor
                | DeclarationKind::CallSignature
                | DeclarationKind::ConstructSignature
        )
    }
}

/// Modifier flags on a declaration node (`export`, `private`, `static`, ...).
pub mod modifier_flags {
    pub const NONE: u32 = 0;
    pub const EXPORT: u32 = 1 << 0;
    pub const DEFAULT: u32 = 1 << 1;
    pub const AMBIENT: u32 = 1 << 2;
    pub const PUBLIC: u32 = 1 << 3;
    pub const PRIVATE: u32 = 1 << 4;
    pub const PROTECTED: u32 = 1 << 5;
    pub const STATIC: u32 = 1 << 6;
    pub const ABSTRACT: u32 = 1 << 7;
    pub const READONLY: u32 = 1 << 8;
    pub const OPTIONAL: u32 = 1 << 9;
    pub const REST: u32 = 1 << 10;
    pub const CONST: u32 = 1 << 11;
    pub const ASYNC: u32 = 1 << 12;
    pub const OVERRIDE: u32 = 1 << 13;
    /// `#name` private field.
    pub const HASH_PRIVATE: u32 = 1 << 14;

    pub const ACCESSIBILITY: u32 = PUBLIC | PRIVATE | PROTECTED;
}

/// `in` / `out` variance annotation on a type parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VarianceModifier {
    In,
    Out,
    InOut,
}

/// One declaration node.
///
/// Fields are shared across kinds; each kind only populates the ones that
/// apply (a `Parameter` has `type_id` and `initializer`, a `Class` has
/// `extends`, `implements`, `type_parameters` and `children`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub kind: DeclarationKind,
    pub name: String,
    /// Symbol this node declares. `None` for parameters, type parameters and
    /// wrapper statements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
    pub file: FileId,
    /// 1-based line of the declaration name.
    pub line: u32,
    /// 0-based character of the declaration name.
    #[serde(default)]
    pub character: u32,
    /// Raw leading trivia containing the declaration's comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub modifiers: u32,
    /// Declared/resolved type: property and variable types, alias targets,
    /// parameter types, enum member literal types, index signature value types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<TypeId>,
    /// Return type of signature-like declarations and get accessors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeId>,
    /// Constraint of a type parameter; key type of an index signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<TypeId>,
    /// Default of a type parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_type: Option<TypeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<VarianceModifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<NodeIndex>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<NodeIndex>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<TypeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<TypeId>,
    /// Initializer source text (variables, properties, parameters, enum members).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<String>,
    /// Whether a function-like declaration has a body (implementation signature).
    #[serde(default)]
    pub has_body: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeIndex>,
}

impl Node {
    /// Create a node with every optional field empty.
    pub fn new(kind: DeclarationKind, name: impl Into<String>, file: FileId, line: u32) -> Self {
        Node {
            kind,
            name: name.into(),
            symbol: None,
            file,
            line,
            character: 0,
            comment: None,
            modifiers: modifier_flags::NONE,
            type_id: None,
            return_type: None,
            constraint: None,
            default_type: None,
            variance: None,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            initializer: None,
            has_body: false,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: u32) -> Self {
        self.modifiers |= modifiers;
        self
    }

    #[must_use]
    pub fn with_type(mut self, type_id: TypeId) -> Self {
        self.type_id = Some(type_id);
        self
    }

    #[must_use]
    pub fn with_return_type(mut self, type_id: TypeId) -> Self {
        self.return_type = Some(type_id);
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, type_id: TypeId) -> Self {
        self.constraint = Some(type_id);
        self
    }

    #[must_use]
    pub fn with_default_type(mut self, type_id: TypeId) -> Self {
        self.default_type = Some(type_id);
        self
    }

    #[must_use]
    pub fn with_extends(mut self, types: Vec<TypeId>) -> Self {
        self.extends = types;
        self
    }

    #[must_use]
    pub fn with_implements(mut self, types: Vec<TypeId>) -> Self {
        self.implements = types;
        self
    }

    #[must_use]
    pub fn with_initializer(mut self, text: impl Into<String>) -> Self {
        self.initializer = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self) -> Self {
        self.has_body = true;
        self
    }

    #[must_use]
    pub fn at(mut self, line: u32, character: u32) -> Self {
        self.line = line;
        self.character = character;
        self
    }

    #[inline]
    pub const fn has_modifier(&self, flag: u32) -> bool {
        (self.modifiers & flag) != 0
    }
}

/// Flat storage for declaration nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Node) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        idx
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.0 as usize)
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(idx.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
