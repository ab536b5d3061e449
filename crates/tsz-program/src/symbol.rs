//! Symbols: the front end's notion of "the same named entity".
//!
//! A symbol may have several declaration nodes (declaration merging,
//! overloads, partial declarations spread over files). The converter keys its
//! registry on [`SymbolKey`], which is derived from a symbol rather than its
//! arena index so that the same entity seen through different programs of a
//! solution maps to one reflection.

use crate::node::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a symbol in a program's [`SymbolArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

/// Symbol flags.
pub mod symbol_flags {
    pub const NONE: u32 = 0;
    /// The module symbol of an external-module source file. Its name is not
    /// part of the qualified names of the symbols it contains.
    pub const SOURCE_FILE: u32 = 1 << 0;
    /// Declared in a file outside of the documented package (e.g. `node_modules`).
    pub const EXTERNAL: u32 = 1 << 1;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub name: String,
    #[serde(default)]
    pub flags: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<SymbolId>,
    #[serde(default)]
    pub declarations: Vec<NodeIndex>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, flags: u32, parent: Option<SymbolId>) -> Self {
        Symbol {
            name: name.into(),
            flags,
            parent,
            declarations: Vec::new(),
        }
    }

    #[inline]
    pub const fn has_flags(&self, flags: u32) -> bool {
        (self.flags & flags) != 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Stable symbol identity: the file of the symbol's first declaration plus its
/// dotted qualified name within that file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolKey {
    pub source_file_name: String,
    pub qualified_name: String,
}

impl SymbolKey {
    pub fn new(source_file_name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        SymbolKey {
            source_file_name: source_file_name.into(),
            qualified_name: qualified_name.into(),
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source_file_name, self.qualified_name)
    }
}
