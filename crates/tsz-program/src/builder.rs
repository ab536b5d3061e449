//! In-memory construction of programs.
//!
//! Front ends and tests assemble a [`Program`] through this builder instead
//! of filling the arenas by hand; it keeps symbol declaration lists, node
//! children and file export tables consistent.

use crate::node::{DeclarationKind, Node, NodeIndex};
use crate::program::{ExportEntry, FileId, Program, SourceFile};
use crate::symbol::{Symbol, SymbolId, symbol_flags};
use crate::types::{IntrinsicKind, LiteralValue, TypeData, TypeId};
use rustc_hash::FxHashMap;
use tsz_common::Diagnostic;

pub struct ProgramBuilder {
    program: Program,
    intrinsics: FxHashMap<IntrinsicKind, TypeId>,
}

impl ProgramBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ProgramBuilder {
            program: Program {
                name: name.into(),
                ..Program::default()
            },
            intrinsics: FxHashMap::default(),
        }
    }

    /// Add an external-module file (it gets its own module symbol).
    pub fn add_file(&mut self, file_name: &str) -> FileId {
        let id = FileId(self.program.files.len() as u32);
        let module_symbol = self.program.symbols.alloc(Symbol::new(
            format!("\"{}\"", strip_extension(file_name)),
            symbol_flags::SOURCE_FILE,
            None,
        ));
        let mut file = SourceFile::new(file_name);
        file.module_symbol = Some(module_symbol);
        self.program.files.push(file);
        id
    }

    /// Add a global script file (declarations share the global scope).
    pub fn add_script_file(&mut self, file_name: &str) -> FileId {
        let id = FileId(self.program.files.len() as u32);
        self.program.files.push(SourceFile::new(file_name));
        id
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut SourceFile {
        &mut self.program.files[id.0 as usize]
    }

    /// Module symbol of a file added with [`add_file`](Self::add_file).
    pub fn module_symbol(&self, file: FileId) -> Option<SymbolId> {
        self.program.file(file).and_then(|f| f.module_symbol)
    }

    pub fn symbol(&mut self, name: &str, parent: Option<SymbolId>) -> SymbolId {
        self.program
            .symbols
            .alloc(Symbol::new(name, symbol_flags::NONE, parent))
    }

    pub fn symbol_with_flags(
        &mut self,
        name: &str,
        flags: u32,
        parent: Option<SymbolId>,
    ) -> SymbolId {
        self.program.symbols.alloc(Symbol::new(name, flags, parent))
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    pub fn alloc_type(&mut self, data: TypeData) -> TypeId {
        self.program.types.alloc(data)
    }

    /// Allocate a placeholder to be filled with [`set_type`](Self::set_type).
    pub fn reserve_type(&mut self) -> TypeId {
        self.program.types.alloc(TypeData::Unknown {
            text: String::new(),
        })
    }

    pub fn set_type(&mut self, id: TypeId, data: TypeData) {
        self.program.types.set(id, data);
    }

    pub fn intrinsic(&mut self, kind: IntrinsicKind) -> TypeId {
        if let Some(&id) = self.intrinsics.get(&kind) {
            return id;
        }
        let id = self.alloc_type(TypeData::Intrinsic { name: kind });
        self.intrinsics.insert(kind, id);
        id
    }

    pub fn string_literal(&mut self, value: &str) -> TypeId {
        self.alloc_type(TypeData::Literal {
            value: LiteralValue::String(value.to_string()),
        })
    }

    pub fn number_literal(&mut self, value: f64) -> TypeId {
        self.alloc_type(TypeData::Literal {
            value: LiteralValue::Number(value),
        })
    }

    /// Reference to a named symbol, e.g. the `Base` in `extends Base`.
    pub fn reference(&mut self, symbol: SymbolId, type_arguments: Vec<TypeId>) -> TypeId {
        let name = self
            .program
            .symbol(symbol)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        self.alloc_type(TypeData::Reference {
            name,
            symbol: Some(symbol),
            type_arguments,
        })
    }

    /// Reference to a name the checker could not bind to a declaration.
    pub fn unresolved_reference(&mut self, name: &str) -> TypeId {
        self.alloc_type(TypeData::Reference {
            name: name.to_string(),
            symbol: None,
            type_arguments: Vec::new(),
        })
    }

    pub fn type_parameter(&mut self, name: &str) -> TypeId {
        self.alloc_type(TypeData::TypeParameter {
            name: name.to_string(),
        })
    }

    pub fn union(&mut self, types: Vec<TypeId>) -> TypeId {
        self.alloc_type(TypeData::Union { types })
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.alloc_type(TypeData::Array { element })
    }

    // ---------------------------------------------------------------------
    // Declarations
    // ---------------------------------------------------------------------

    /// Add a declaration node for `symbol` in `file`.
    pub fn declare(&mut self, file: FileId, symbol: Option<SymbolId>, mut node: Node) -> NodeIndex {
        node.file = file;
        node.symbol = symbol;
        let idx = self.program.nodes.alloc(node);
        if let Some(sym) = symbol.and_then(|s| self.program.symbols.get_mut(s)) {
            sym.declarations.push(idx);
        }
        idx
    }

    /// Add a member declaration nested in `parent`.
    pub fn declare_member(
        &mut self,
        parent: NodeIndex,
        symbol: Option<SymbolId>,
        node: Node,
    ) -> NodeIndex {
        let file = self.program.node(parent).map_or(FileId(0), |n| n.file);
        let idx = self.declare(file, symbol, node);
        if let Some(parent_node) = self.program.nodes.get_mut(parent) {
            parent_node.children.push(idx);
        }
        idx
    }

    /// Add a parameter to a signature-like declaration.
    pub fn declare_parameter(&mut self, owner: NodeIndex, mut node: Node) -> NodeIndex {
        node.kind = DeclarationKind::Parameter;
        let file = self.program.node(owner).map_or(FileId(0), |n| n.file);
        let idx = self.declare(file, None, node);
        if let Some(owner_node) = self.program.nodes.get_mut(owner) {
            owner_node.parameters.push(idx);
        }
        idx
    }

    /// Add a type parameter to a generic declaration.
    pub fn declare_type_parameter(&mut self, owner: NodeIndex, mut node: Node) -> NodeIndex {
        node.kind = DeclarationKind::TypeParameter;
        let file = self.program.node(owner).map_or(FileId(0), |n| n.file);
        let idx = self.declare(file, None, node);
        if let Some(owner_node) = self.program.nodes.get_mut(owner) {
            owner_node.type_parameters.push(idx);
        }
        idx
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        self.program.nodes.get_mut(idx)
    }

    /// Export `symbol` from `file` under its own name.
    pub fn export(&mut self, file: FileId, symbol: SymbolId) {
        let name = self
            .program
            .symbol(symbol)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        self.export_as(file, &name, symbol);
    }

    /// Export `symbol` from `file` under `name` (`export { x as name }`).
    pub fn export_as(&mut self, file: FileId, name: &str, symbol: SymbolId) {
        self.program.files[file.0 as usize].exports.push(ExportEntry {
            name: name.to_string(),
            symbol,
        });
    }

    pub fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.program.diagnostics.push(diagnostic);
    }

    pub fn project_reference(&mut self, program: Program) {
        self.program.project_references.push(program);
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn finish(self) -> Program {
        self.program
    }
}

fn strip_extension(file_name: &str) -> &str {
    for ext in [".d.ts", ".tsx", ".ts", ".mts", ".cts", ".js"] {
        if let Some(stem) = file_name.strip_suffix(ext) {
            return stem;
        }
    }
    file_name
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
