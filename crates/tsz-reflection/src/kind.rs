//! Reflection kinds and flags.

use bitflags::bitflags;

/// What a reflection describes.
///
/// Discriminants are single bits so that kind sets can be expressed as masks
/// (see [`kind_masks`]); the numeric value is what the JSON form carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ReflectionKind {
    Project = 0x1,
    Module = 0x2,
    Namespace = 0x4,
    Enum = 0x8,
    EnumMember = 0x10,
    Variable = 0x20,
    Function = 0x40,
    Class = 0x80,
    Interface = 0x100,
    Constructor = 0x200,
    Property = 0x400,
    Method = 0x800,
    CallSignature = 0x1000,
    IndexSignature = 0x2000,
    ConstructorSignature = 0x4000,
    Parameter = 0x8000,
    TypeLiteral = 0x10000,
    TypeParameter = 0x20000,
    Accessor = 0x40000,
    GetSignature = 0x80000,
    SetSignature = 0x100000,
    TypeAlias = 0x200000,
    Reference = 0x400000,
}

impl ReflectionKind {
    pub const ALL: [ReflectionKind; 23] = [
        ReflectionKind::Project,
        ReflectionKind::Module,
        ReflectionKind::Namespace,
        ReflectionKind::Enum,
        ReflectionKind::EnumMember,
        ReflectionKind::Variable,
        ReflectionKind::Function,
        ReflectionKind::Class,
        ReflectionKind::Interface,
        ReflectionKind::Constructor,
        ReflectionKind::Property,
        ReflectionKind::Method,
        ReflectionKind::CallSignature,
        ReflectionKind::IndexSignature,
        ReflectionKind::ConstructorSignature,
        ReflectionKind::Parameter,
        ReflectionKind::TypeLiteral,
        ReflectionKind::TypeParameter,
        ReflectionKind::Accessor,
        ReflectionKind::GetSignature,
        ReflectionKind::SetSignature,
        ReflectionKind::TypeAlias,
        ReflectionKind::Reference,
    ];

    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.bits() == bits)
    }

    #[inline]
    pub const fn is(self, mask: u32) -> bool {
        (self as u32 & mask) != 0
    }

    /// Human readable name, as used in log and warning messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            ReflectionKind::Project => "project",
            ReflectionKind::Module => "module",
            ReflectionKind::Namespace => "namespace",
            ReflectionKind::Enum => "enum",
            ReflectionKind::EnumMember => "enum member",
            ReflectionKind::Variable => "variable",
            ReflectionKind::Function => "function",
            ReflectionKind::Class => "class",
            ReflectionKind::Interface => "interface",
            ReflectionKind::Constructor => "constructor",
            ReflectionKind::Property => "property",
            ReflectionKind::Method => "method",
            ReflectionKind::CallSignature => "call signature",
            ReflectionKind::IndexSignature => "index signature",
            ReflectionKind::ConstructorSignature => "constructor signature",
            ReflectionKind::Parameter => "parameter",
            ReflectionKind::TypeLiteral => "type literal",
            ReflectionKind::TypeParameter => "type parameter",
            ReflectionKind::Accessor => "accessor",
            ReflectionKind::GetSignature => "get signature",
            ReflectionKind::SetSignature => "set signature",
            ReflectionKind::TypeAlias => "type alias",
            ReflectionKind::Reference => "reference",
        }
    }
}

/// Kind masks for common groupings.
pub mod kind_masks {
    use super::ReflectionKind as K;

    pub const CONTAINER: u32 = K::Project as u32
        | K::Module as u32
        | K::Namespace as u32
        | K::Enum as u32
        | K::Class as u32
        | K::Interface as u32
        | K::TypeLiteral as u32;

    pub const SIGNATURE: u32 = K::CallSignature as u32
        | K::IndexSignature as u32
        | K::ConstructorSignature as u32
        | K::GetSignature as u32
        | K::SetSignature as u32;

    /// Kinds whose reflections own call/constructor signatures.
    pub const FUNCTION_LIKE: u32 = K::Function as u32 | K::Method as u32 | K::Constructor as u32;

    /// Kinds that take part in inheritance (`extends`/`implements`).
    pub const CLASS_OR_INTERFACE: u32 = K::Class as u32 | K::Interface as u32;

    /// Kinds that may appear as class or interface members.
    pub const MEMBER: u32 = K::Property as u32
        | K::Method as u32
        | K::Accessor as u32
        | K::Constructor as u32;
}

bitflags! {
    /// Modifier flags of a reflection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ReflectionFlags: u32 {
        const PRIVATE = 1 << 0;
        const PROTECTED = 1 << 1;
        const PUBLIC = 1 << 2;
        const STATIC = 1 << 3;
        const EXTERNAL = 1 << 4;
        const OPTIONAL = 1 << 5;
        const REST = 1 << 6;
        const ABSTRACT = 1 << 7;
        const CONST = 1 << 8;
        const READONLY = 1 << 9;
        const INHERITED = 1 << 10;
        const EXPORTED = 1 << 11;
    }
}

impl ReflectionFlags {
    /// Flags paired with their JSON keys, in output order.
    pub const JSON_KEYS: [(ReflectionFlags, &'static str); 12] = [
        (ReflectionFlags::PRIVATE, "isPrivate"),
        (ReflectionFlags::PROTECTED, "isProtected"),
        (ReflectionFlags::PUBLIC, "isPublic"),
        (ReflectionFlags::STATIC, "isStatic"),
        (ReflectionFlags::EXTERNAL, "isExternal"),
        (ReflectionFlags::OPTIONAL, "isOptional"),
        (ReflectionFlags::REST, "isRest"),
        (ReflectionFlags::ABSTRACT, "isAbstract"),
        (ReflectionFlags::CONST, "isConst"),
        (ReflectionFlags::READONLY, "isReadonly"),
        (ReflectionFlags::INHERITED, "isInherited"),
        (ReflectionFlags::EXPORTED, "isExported"),
    ];

    pub const ACCESSIBILITY: ReflectionFlags = ReflectionFlags::PRIVATE
        .union(ReflectionFlags::PROTECTED)
        .union(ReflectionFlags::PUBLIC);
}
