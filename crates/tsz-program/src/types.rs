//! Resolved types.
//!
//! Types are handed over already resolved by the front end's checker. The
//! converter treats a [`TypeId`] as an opaque handle and reads the structure
//! behind it only through [`TypeDatabase`].
//!
//! Named types (classes, interfaces, aliases, enums) appear as
//! [`TypeData::Reference`] to their symbol; only anonymous structure (object
//! literals, function types, unions, ...) is spelled out. The graph may
//! contain cycles: an anonymous object type can mention its own `TypeId`.

use crate::symbol::SymbolId;
use serde::{Deserialize, Serialize};

/// Handle to a resolved type in a program's [`TypeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    Bigint,
    Symbol,
    Object,
    This,
}

impl IntrinsicKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::String => "string",
            IntrinsicKind::Number => "number",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Bigint => "bigint",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Object => "object",
            IntrinsicKind::This => "this",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
    BigInt { negative: bool, digits: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeOperatorKind {
    Keyof,
    Unique,
    Readonly,
}

impl TypeOperatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeOperatorKind::Keyof => "keyof",
            TypeOperatorKind::Unique => "unique",
            TypeOperatorKind::Readonly => "readonly",
        }
    }
}

/// `+`/`-` modifier on a mapped type's `readonly` or `?`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappedModifier {
    Add,
    Remove,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleElement {
    pub type_id: TypeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyShape {
    pub name: String,
    pub type_id: TypeId,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    /// Declared with method syntax (`m(): void`) rather than as a property.
    #[serde(default)]
    pub is_method: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamShape {
    pub name: String,
    pub type_id: TypeId,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParamShape {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<TypeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureShape {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParamShape>,
    #[serde(default)]
    pub parameters: Vec<ParamShape>,
    pub return_type: TypeId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignatureShape {
    pub key_name: String,
    pub key_type: TypeId,
    pub value_type: TypeId,
    #[serde(default)]
    pub readonly: bool,
}

/// Anonymous object type: `{ a: string; (x: number): void; [k: string]: unknown }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectShape {
    #[serde(default)]
    pub properties: Vec<PropertyShape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_signatures: Vec<SignatureShape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub construct_signatures: Vec<SignatureShape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_signatures: Vec<IndexSignatureShape>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSpan {
    pub type_id: TypeId,
    pub text: String,
}

/// Structure of a resolved type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeData {
    Intrinsic {
        name: IntrinsicKind,
    },
    Literal {
        value: LiteralValue,
    },
    /// A named type. `symbol` is `None` for names the checker could not
    /// attach to a declaration (unresolved globals).
    #[serde(rename_all = "camelCase")]
    Reference {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<SymbolId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_arguments: Vec<TypeId>,
    },
    TypeParameter {
        name: String,
    },
    Union {
        types: Vec<TypeId>,
    },
    Intersection {
        types: Vec<TypeId>,
    },
    Array {
        element: TypeId,
    },
    Tuple {
        elements: Vec<TupleElement>,
    },
    Object {
        shape: ObjectShape,
    },
    Function {
        signature: SignatureShape,
    },
    Constructor {
        signature: SignatureShape,
        #[serde(default)]
        r#abstract: bool,
    },
    #[serde(rename_all = "camelCase")]
    Conditional {
        check_type: TypeId,
        extends_type: TypeId,
        true_type: TypeId,
        false_type: TypeId,
    },
    #[serde(rename_all = "camelCase")]
    Mapped {
        type_parameter: String,
        constraint: TypeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name_type: Option<TypeId>,
        template: TypeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        readonly_modifier: Option<MappedModifier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        optional_modifier: Option<MappedModifier>,
    },
    #[serde(rename_all = "camelCase")]
    IndexedAccess {
        object_type: TypeId,
        index_type: TypeId,
    },
    TypeOperator {
        operator: TypeOperatorKind,
        target: TypeId,
    },
    /// `typeof x`
    Query {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<SymbolId>,
    },
    /// `x is T` / `asserts x is T` / `asserts x`
    Predicate {
        parameter: String,
        #[serde(default)]
        asserts: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<TypeId>,
    },
    TemplateLiteral {
        head: String,
        #[serde(default)]
        spans: Vec<TemplateSpan>,
    },
    Infer {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        constraint: Option<TypeId>,
    },
    /// Anything the front end could not describe structurally; `text` is the
    /// checker's printed form.
    Unknown {
        text: String,
    },
}

/// Read access to resolved types.
pub trait TypeDatabase {
    fn lookup(&self, id: TypeId) -> Option<&TypeData>;
}

/// Flat storage for resolved types. Identity is the index, not the structure:
/// two structurally equal types may have different ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeArena {
    types: Vec<TypeData>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        id
    }

    /// Replace the structure behind an id. Used to tie recursive knots: allocate
    /// a placeholder, build the members that mention it, then fill it in.
    pub fn set(&mut self, id: TypeId, data: TypeData) {
        if let Some(slot) = self.types.get_mut(id.0 as usize) {
            *slot = data;
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeDatabase for TypeArena {
    fn lookup(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.0 as usize)
    }
}
