//! The type-checked program handed to the converter.

use crate::node::{Node, NodeArena, NodeIndex};
use crate::symbol::{Symbol, SymbolArena, SymbolId, SymbolKey, symbol_flags};
use crate::types::{TypeArena, TypeData, TypeDatabase, TypeId};
use serde::{Deserialize, Serialize};
use tsz_common::Diagnostic;

/// Index of a file in [`Program::files`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

/// An exported name and the symbol it resolves to.
///
/// `name` differs from the symbol's own name for `export { a as b }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub name: String,
    pub symbol: SymbolId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// Normalized path, `/`-separated.
    pub file_name: String,
    /// Module symbol of an external module; `None` for global scripts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_symbol: Option<SymbolId>,
    /// Exported symbols in export order. For global scripts: the top-level
    /// declarations.
    #[serde(default)]
    pub exports: Vec<ExportEntry>,
    /// Raw leading trivia of the file (for `@packageDocumentation` comments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_declaration_file: bool,
    /// File belongs to a dependency rather than the documented package.
    #[serde(default)]
    pub is_external: bool,
    /// Package the file belongs to, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>) -> Self {
        SourceFile {
            file_name: file_name.into(),
            module_symbol: None,
            exports: Vec::new(),
            comment: None,
            is_declaration_file: false,
            is_external: false,
            package_name: None,
        }
    }
}

/// One type-checked program: files, symbols, declaration nodes, types and the
/// checker's diagnostics. Solution-style configurations carry their projects
/// in `project_references`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// Configuration name (e.g. the tsconfig path); used in messages only.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub files: Vec<SourceFile>,
    #[serde(default)]
    pub symbols: SymbolArena,
    #[serde(default)]
    pub nodes: NodeArena,
    #[serde(default)]
    pub types: TypeArena,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_references: Vec<Program>,
}

impl Program {
    /// Load a program snapshot produced by a front end.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    /// Find a file by normalized name.
    pub fn file_by_name(&self, file_name: &str) -> Option<FileId> {
        self.files
            .iter()
            .position(|f| f.file_name == file_name)
            .map(|i| FileId(i as u32))
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx)
    }

    pub fn type_data(&self, id: TypeId) -> Option<&TypeData> {
        self.types.lookup(id)
    }

    pub fn type_database(&self) -> &dyn TypeDatabase {
        &self.types
    }

    /// File name of the node's file, or `""` when the file id is dangling.
    pub fn file_name_of(&self, node: &Node) -> &str {
        self.file(node.file).map_or("", |f| f.file_name.as_str())
    }

    /// Dotted name of a symbol within its file (`Outer.Inner.member`).
    ///
    /// Source-file module symbols are not part of the name.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        let mut guard = 0usize;
        while let Some(sym_id) = current {
            let Some(symbol) = self.symbol(sym_id) else {
                break;
            };
            if symbol.has_flags(symbol_flags::SOURCE_FILE) {
                break;
            }
            parts.push(symbol.name.as_str());
            current = symbol.parent;
            guard += 1;
            if guard > self.symbols.len() {
                // Parent chain loops; the names collected so far are enough.
                break;
            }
        }
        parts.reverse();
        parts.join(".")
    }

    /// Stable identity of a symbol: first declaration's file + qualified name.
    /// Module symbols of source files are keyed by their file.
    pub fn symbol_key(&self, id: SymbolId) -> Option<SymbolKey> {
        let symbol = self.symbol(id)?;
        if symbol.has_flags(symbol_flags::SOURCE_FILE)
            && let Some(file) = self.files.iter().find(|f| f.module_symbol == Some(id))
        {
            return Some(SymbolKey::new(file.file_name.as_str(), symbol.name.as_str()));
        }
        let file_name = symbol
            .declarations
            .first()
            .and_then(|&decl| self.node(decl))
            .map_or("", |node| self.file_name_of(node));
        Some(SymbolKey::new(file_name, self.qualified_name(id)))
    }

    /// Package of the file that first declares `id`, if any.
    pub fn package_of(&self, id: SymbolId) -> Option<&str> {
        let decl = *self.symbol(id)?.declarations.first()?;
        let node = self.node(decl)?;
        self.file(node.file)?.package_name.as_deref()
    }

    /// Whether the symbol is declared outside of the documented package.
    pub fn is_external_symbol(&self, id: SymbolId) -> bool {
        let Some(symbol) = self.symbol(id) else {
            return false;
        };
        if symbol.has_flags(symbol_flags::EXTERNAL) {
            return true;
        }
        symbol
            .declarations
            .first()
            .and_then(|&decl| self.node(decl))
            .and_then(|node| self.file(node.file))
            .is_some_and(|f| f.is_external)
    }
}

#[cfg(test)]
#[path = "tests/program_tests.rs"]
mod tests;
