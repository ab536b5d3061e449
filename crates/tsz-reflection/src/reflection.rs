//! Reflections: the nodes of the documentation model.

use crate::comment::Comment;
use crate::kind::{ReflectionFlags, ReflectionKind};
use crate::types::SomeType;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use tsz_program::VarianceModifier;

/// Identifier of a reflection; also its index in the project arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReflectionId(pub u32);

impl ReflectionId {
    /// The project root.
    pub const ROOT: ReflectionId = ReflectionId(0);
}

impl fmt::Display for ReflectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a reflection was declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    pub file_name: String,
    /// 1-based.
    pub line: u32,
    /// 0-based.
    pub character: u32,
}

impl SourceReference {
    pub fn new(file_name: impl Into<String>, line: u32, character: u32) -> Self {
        SourceReference {
            file_name: file_name.into(),
            line,
            character,
        }
    }
}

/// How an owned reflection hangs off its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraversalRole {
    Child,
    TypeParameter,
    Signature,
    IndexSignature,
    GetSignature,
    SetSignature,
    Parameter,
}

/// Ordered children plus a by-name index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerData {
    pub children: Vec<ReflectionId>,
    name_index: FxHashMap<String, SmallVec<[ReflectionId; 1]>>,
}

impl ContainerData {
    pub(crate) fn push(&mut self, name: &str, id: ReflectionId) {
        self.children.push(id);
        self.name_index.entry(name.to_string()).or_default().push(id);
    }

    /// Children named `name`, in insertion order.
    pub fn named(&self, name: &str) -> &[ReflectionId] {
        self.name_index.get(name).map_or(&[], |ids| ids.as_slice())
    }
}

/// Inheritance links shared by declarations and signatures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InheritanceLinks {
    /// Member of a base class/interface this member redeclares.
    pub overwrites: Option<ReflectionId>,
    /// Member of a base this member was copied from.
    pub inherited_from: Option<ReflectionId>,
    /// Interface member this class member implements.
    pub implementation_of: Option<ReflectionId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeclarationData {
    pub container: ContainerData,
    pub declared_type: Option<SomeType>,
    pub default_value: Option<String>,
    pub links: InheritanceLinks,
    /// Unresolved `extends` clauses, as written.
    pub extended_types: Vec<SomeType>,
    pub implemented_types: Vec<SomeType>,
    /// Filled by the inheritance pass only.
    pub extended_by: Vec<ReflectionId>,
    pub implemented_by: Vec<ReflectionId>,
    pub type_parameters: Vec<ReflectionId>,
    pub signatures: Vec<ReflectionId>,
    pub index_signatures: Vec<ReflectionId>,
    pub get_signature: Option<ReflectionId>,
    pub set_signature: Option<ReflectionId>,
    /// For `Reference` reflections: the reflection being re-exported.
    pub target: Option<ReflectionId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignatureData {
    pub parameters: Vec<ReflectionId>,
    pub type_parameters: Vec<ReflectionId>,
    /// Return type; the value type for index signatures.
    pub return_type: Option<SomeType>,
    pub links: InheritanceLinks,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterData {
    pub param_type: Option<SomeType>,
    pub default_value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeParameterData {
    pub constraint: Option<SomeType>,
    pub default: Option<SomeType>,
    pub variance: Option<VarianceModifier>,
}

/// Kind-specific payload of a reflection.
#[derive(Clone, Debug, PartialEq)]
pub enum ReflectionData {
    Project(ContainerData),
    Declaration(Box<DeclarationData>),
    Signature(SignatureData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
}

impl ReflectionData {
    /// Empty payload matching `kind`.
    pub fn for_kind(kind: ReflectionKind) -> Self {
        match kind {
            ReflectionKind::Project => ReflectionData::Project(ContainerData::default()),
            ReflectionKind::CallSignature
            | ReflectionKind::IndexSignature
            | ReflectionKind::ConstructorSignature
            | ReflectionKind::GetSignature
            | ReflectionKind::SetSignature => ReflectionData::Signature(SignatureData::default()),
            ReflectionKind::Parameter => ReflectionData::Parameter(ParameterData::default()),
            ReflectionKind::TypeParameter => {
                ReflectionData::TypeParameter(TypeParameterData::default())
            }
            _ => ReflectionData::Declaration(Box::default()),
        }
    }

    /// JSON `variant` tag.
    pub const fn variant(&self) -> &'static str {
        match self {
            ReflectionData::Project(_) => "project",
            ReflectionData::Declaration(_) => "declaration",
            ReflectionData::Signature(_) => "signature",
            ReflectionData::Parameter(_) => "param",
            ReflectionData::TypeParameter(_) => "typeParam",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reflection {
    pub id: ReflectionId,
    pub name: String,
    pub kind: ReflectionKind,
    pub flags: ReflectionFlags,
    pub comment: Option<Comment>,
    pub sources: Vec<SourceReference>,
    pub parent: Option<ReflectionId>,
    pub data: ReflectionData,
}

impl Reflection {
    pub fn new(id: ReflectionId, kind: ReflectionKind, name: impl Into<String>) -> Self {
        Reflection {
            id,
            name: name.into(),
            kind,
            flags: ReflectionFlags::empty(),
            comment: None,
            sources: Vec::new(),
            parent: None,
            data: ReflectionData::for_kind(kind),
        }
    }

    /// Record a declaration site; repeated sites are ignored.
    pub fn add_source(&mut self, source: SourceReference) -> bool {
        if self.sources.contains(&source) {
            return false;
        }
        self.sources.push(source);
        true
    }

    #[inline]
    pub fn has_flag(&self, flag: ReflectionFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn container(&self) -> Option<&ContainerData> {
        match &self.data {
            ReflectionData::Project(c) => Some(c),
            ReflectionData::Declaration(d) => Some(&d.container),
            _ => None,
        }
    }

    pub(crate) fn container_mut(&mut self) -> Option<&mut ContainerData> {
        match &mut self.data {
            ReflectionData::Project(c) => Some(c),
            ReflectionData::Declaration(d) => Some(&mut d.container),
            _ => None,
        }
    }

    pub fn declaration(&self) -> Option<&DeclarationData> {
        match &self.data {
            ReflectionData::Declaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn declaration_mut(&mut self) -> Option<&mut DeclarationData> {
        match &mut self.data {
            ReflectionData::Declaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn signature(&self) -> Option<&SignatureData> {
        match &self.data {
            ReflectionData::Signature(s) => Some(s),
            _ => None,
        }
    }

    pub fn signature_mut(&mut self) -> Option<&mut SignatureData> {
        match &mut self.data {
            ReflectionData::Signature(s) => Some(s),
            _ => None,
        }
    }

    pub fn parameter(&self) -> Option<&ParameterData> {
        match &self.data {
            ReflectionData::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn parameter_mut(&mut self) -> Option<&mut ParameterData> {
        match &mut self.data {
            ReflectionData::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn type_parameter(&self) -> Option<&TypeParameterData> {
        match &self.data {
            ReflectionData::TypeParameter(t) => Some(t),
            _ => None,
        }
    }

    pub fn type_parameter_mut(&mut self) -> Option<&mut TypeParameterData> {
        match &mut self.data {
            ReflectionData::TypeParameter(t) => Some(t),
            _ => None,
        }
    }

    /// Inheritance links of a declaration or signature.
    pub fn links(&self) -> Option<&InheritanceLinks> {
        match &self.data {
            ReflectionData::Declaration(d) => Some(&d.links),
            ReflectionData::Signature(s) => Some(&s.links),
            _ => None,
        }
    }

    pub fn links_mut(&mut self) -> Option<&mut InheritanceLinks> {
        match &mut self.data {
            ReflectionData::Declaration(d) => Some(&mut d.links),
            ReflectionData::Signature(s) => Some(&mut s.links),
            _ => None,
        }
    }

    /// Owned reflections with their roles, in traversal order.
    pub fn owned(&self) -> Vec<(ReflectionId, TraversalRole)> {
        let mut out = Vec::new();
        match &self.data {
            ReflectionData::Project(c) => {
                out.extend(c.children.iter().map(|&id| (id, TraversalRole::Child)));
            }
            ReflectionData::Declaration(d) => {
                out.extend(
                    d.type_parameters
                        .iter()
                        .map(|&id| (id, TraversalRole::TypeParameter)),
                );
                out.extend(d.signatures.iter().map(|&id| (id, TraversalRole::Signature)));
                out.extend(
                    d.index_signatures
                        .iter()
                        .map(|&id| (id, TraversalRole::IndexSignature)),
                );
                if let Some(id) = d.get_signature {
                    out.push((id, TraversalRole::GetSignature));
                }
                if let Some(id) = d.set_signature {
                    out.push((id, TraversalRole::SetSignature));
                }
                out.extend(
                    d.container
                        .children
                        .iter()
                        .map(|&id| (id, TraversalRole::Child)),
                );
            }
            ReflectionData::Signature(s) => {
                out.extend(
                    s.type_parameters
                        .iter()
                        .map(|&id| (id, TraversalRole::TypeParameter)),
                );
                out.extend(s.parameters.iter().map(|&id| (id, TraversalRole::Parameter)));
            }
            ReflectionData::Parameter(_) | ReflectionData::TypeParameter(_) => {}
        }
        out
    }
}
