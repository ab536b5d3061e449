//! JSON shapes of the model.

use crate::comment::Comment;
use crate::kind::ReflectionFlags;
use crate::reflection::SourceReference;
use crate::types::SomeType;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tsz_program::SymbolKey;

/// Version of the JSON layout.
pub const SCHEMA_VERSION: &str = "1.0";

/// Flags as an object of `isXxx: true` entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonFlags(pub ReflectionFlags);

impl Serialize for JsonFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let set: Vec<&str> = ReflectionFlags::JSON_KEYS
            .iter()
            .filter(|(flag, _)| self.0.contains(*flag))
            .map(|(_, key)| *key)
            .collect();
        let mut map = serializer.serialize_map(Some(set.len()))?;
        for key in set {
            map.serialize_entry(key, &true)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for JsonFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagsVisitor;

        impl<'de> Visitor<'de> for FlagsVisitor {
            type Value = JsonFlags;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of flag names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonFlags, A::Error> {
                let mut flags = ReflectionFlags::empty();
                while let Some((key, value)) = map.next_entry::<String, bool>()? {
                    if !value {
                        continue;
                    }
                    // Unknown flag names from newer writers are ignored.
                    if let Some((flag, _)) = ReflectionFlags::JSON_KEYS
                        .iter()
                        .find(|(_, name)| *name == key)
                    {
                        flags |= *flag;
                    }
                }
                Ok(JsonFlags(flags))
            }
        }

        deserializer.deserialize_map(FlagsVisitor)
    }
}

/// One serialized reflection. Fields that do not apply to the reflection's
/// variant are left empty and omitted from the output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReflection {
    pub id: u32,
    pub name: String,
    pub variant: String,
    pub kind: u32,
    #[serde(default)]
    pub flags: JsonFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonReflection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceReference>,
    /// Declared type, return type, parameter type or type parameter constraint.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Type parameter default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance_modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<JsonReflection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<JsonReflection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_signatures: Vec<JsonReflection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_signature: Option<Box<JsonReflection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_signature: Option<Box<JsonReflection>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<JsonReflection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extended_types: Vec<SomeType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implemented_types: Vec<SomeType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extended_by: Vec<SomeType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implemented_by: Vec<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrites: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_of: Option<SomeType>,
    /// Re-export target of a `Reference` reflection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

/// The serialized project: the root reflection plus project-level data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonProject {
    pub schema_version: String,
    #[serde(flatten)]
    pub root: JsonReflection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    /// Reflection id (decimal string) to the symbol it was converted from.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub symbol_id_map: BTreeMap<String, SymbolKey>,
}
