//! JSON export and import of a project.

mod deserializer;
mod json;
mod serializer;

pub use deserializer::{Deserializer, ReviveError};
pub use json::{JsonFlags, JsonProject, JsonReflection, SCHEMA_VERSION};
pub use serializer::{SerializeEvent, Serializer, SerializerHook};

#[cfg(test)]
#[path = "../tests/serializer_tests.rs"]
mod tests;
