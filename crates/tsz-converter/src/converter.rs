//! The conversion driver.
//!
//! A [`Converter`] runs once: it checks the programs' diagnostics, picks the
//! entry files of each program, traverses their exports program by program,
//! then resolves comment inheritance and class/interface inheritance over the
//! finished tree.

use crate::comments::extract_file_comment;
use crate::context::{ConversionState, Context, InheritDocRequest};
use crate::converters::{NodeConverters, convert_symbol};
use crate::error::ConvertError;
use crate::inherit_doc::InheritDocResolver;
use crate::inheritance::InheritanceResolver;
use crate::options::ConverterOptions;
use rustc_hash::FxHashSet;
use tracing::{Level, debug, info, span};
use tsz_common::{Diagnostic, diagnostic_codes};
use tsz_program::{FileId, Program};
use tsz_reflection::{Project, ReflectionId, ReflectionKind};

/// Where a [`Converter`] is in its single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConverterState {
    Idle,
    /// Traversing the exports of the i-th traversal unit.
    PerProgramTraversal(usize),
    Resolving,
    Done,
}

/// A completed conversion.
#[derive(Debug)]
pub struct Conversion {
    pub project: Project,
    /// Recoverable problems met along the way, in the order they occurred.
    pub warnings: Vec<Diagnostic>,
}

/// One program and the entry files to traverse in it.
struct TraversalUnit<'p> {
    program: &'p Program,
    files: Vec<FileId>,
}

pub struct Converter {
    options: ConverterOptions,
    converters: NodeConverters,
    state: ConverterState,
}

impl Converter {
    pub fn new(options: ConverterOptions) -> Self {
        Self::with_converters(options, NodeConverters::default())
    }

    /// Converter with a custom dispatch table.
    pub fn with_converters(options: ConverterOptions, converters: NodeConverters) -> Self {
        Converter {
            options,
            converters,
            state: ConverterState::Idle,
        }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    pub fn converters_mut(&mut self) -> &mut NodeConverters {
        &mut self.converters
    }

    pub const fn state(&self) -> ConverterState {
        self.state
    }

    fn transition(&mut self, next: ConverterState) {
        debug!(from = ?self.state, to = ?next, "converter state");
        self.state = next;
    }

    /// Convert `programs` into a project.
    ///
    /// Fails without a partial model when a program carries blocking
    /// diagnostics or when no entry file is found.
    pub fn convert(&mut self, programs: &[Program]) -> Result<Conversion, ConvertError> {
        if self.state != ConverterState::Idle {
            return Err(ConvertError::Invariant(
                "a converter can only be run once".to_string(),
            ));
        }
        let _span = span!(Level::INFO, "convert", programs = programs.len()).entered();

        let blocking = blocking_diagnostics(programs, &self.options.ignored_diagnostic_codes);
        if !blocking.is_empty() {
            self.transition(ConverterState::Done);
            return Err(ConvertError::Diagnostics(blocking));
        }

        let mut warnings = Vec::new();
        let units = plan_units(programs, &self.options, &mut warnings);
        if units.iter().all(|u| u.files.is_empty()) {
            self.transition(ConverterState::Done);
            return Err(ConvertError::NoEntryPoints(warnings));
        }

        let fallback = programs.first().map_or("", |p| p.name.as_str());
        let mut project = Project::new(self.options.project_name(fallback));
        project.package_name = self.options.package_name.clone();

        let mut state = ConversionState::new(project, &self.options, &self.converters);
        for warning in warnings {
            state.warn(warning);
        }

        let entry_names: Vec<&str> = units
            .iter()
            .flat_map(|u| {
                u.files
                    .iter()
                    .filter_map(|&f| u.program.file(f))
                    .map(|f| f.file_name.as_str())
            })
            .collect();
        let single_entry = entry_names.len() == 1;
        let root_dir = common_directory(&entry_names);

        for (index, unit) in units.iter().enumerate() {
            self.state = ConverterState::PerProgramTraversal(index);
            let _span =
                span!(Level::DEBUG, "program", index, name = %unit.program.name).entered();
            debug!(files = unit.files.len(), "traversing program");
            for &file in &unit.files {
                convert_file(&mut state, unit.program, index, file, single_entry, &root_dir)?;
            }
        }

        self.state = ConverterState::Resolving;
        let mut inherit_docs =
            InheritDocResolver::new(std::mem::take(&mut state.inherit_docs));
        inherit_docs.resolve_named(&mut state);
        let report = InheritanceResolver::new().resolve(&mut state.project)?;
        let copied_requests: Vec<InheritDocRequest> = report
            .copies
            .iter()
            .filter_map(|&(original, copy)| {
                let request = inherit_docs.pending(original)?;
                Some(InheritDocRequest {
                    reflection: copy,
                    scope: state.project.parent_of(copy).unwrap_or(ReflectionId::ROOT),
                    directive: request.directive.clone(),
                })
            })
            .collect();
        for request in copied_requests {
            inherit_docs.add(request);
        }
        inherit_docs.resolve_remaining(&mut state);

        let ConversionState {
            project, warnings, ..
        } = state;
        self.state = ConverterState::Done;
        info!(
            reflections = project.len(),
            warnings = warnings.len(),
            "conversion finished"
        );
        Ok(Conversion { project, warnings })
    }
}

/// Error diagnostics not on the ignore list, from every program and
/// project reference.
fn blocking_diagnostics(programs: &[Program], ignored: &[u32]) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut stack: Vec<&Program> = programs.iter().rev().collect();
    while let Some(program) = stack.pop() {
        out.extend(
            program
                .diagnostics
                .iter()
                .filter(|d| d.is_blocking(ignored))
                .cloned(),
        );
        stack.extend(program.project_references.iter().rev());
    }
    out
}

/// Entry files of `program`: the requested entry points it contains, or all
/// of its own files when none were requested.
fn entry_files(program: &Program, options: &ConverterOptions) -> Vec<FileId> {
    if options.entry_points.is_empty() {
        return program
            .files
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_external)
            .map(|(i, _)| FileId(i as u32))
            .collect();
    }
    options
        .entry_points
        .iter()
        .filter_map(|path| program.file_by_name(path))
        .collect()
}

/// Decide what to traverse. A program without any entry file is replaced by
/// its project references.
fn plan_units<'p>(
    programs: &'p [Program],
    options: &ConverterOptions,
    warnings: &mut Vec<Diagnostic>,
) -> Vec<TraversalUnit<'p>> {
    let mut units = Vec::new();
    for program in programs {
        let files = entry_files(program, options);
        if files.is_empty() && !program.project_references.is_empty() {
            debug!(program = %program.name, "expanding project references");
            for reference in &program.project_references {
                let files = entry_files(reference, options);
                if files.is_empty() {
                    warnings.push(Diagnostic::warning(
                        reference.name.clone(),
                        diagnostic_codes::PROJECT_REFERENCE_WITHOUT_ENTRY_POINTS,
                        &[reference.name.as_str()],
                    ));
                    continue;
                }
                units.push(TraversalUnit {
                    program: reference,
                    files,
                });
            }
        } else {
            units.push(TraversalUnit { program, files });
        }
    }

    let found: FxHashSet<&str> = units
        .iter()
        .flat_map(|u| {
            u.files
                .iter()
                .filter_map(|&f| u.program.file(f))
                .map(|f| f.file_name.as_str())
        })
        .collect();
    for path in &options.entry_points {
        if !found.contains(path.as_str()) {
            warnings.push(Diagnostic::warning(
                path.clone(),
                diagnostic_codes::ENTRY_POINT_NOT_FOUND,
                &[path.as_str()],
            ));
        }
    }
    units
}

/// Convert the exports of one entry file.
fn convert_file(
    state: &mut ConversionState<'_>,
    program: &Program,
    program_index: usize,
    file_id: FileId,
    single_entry: bool,
    root_dir: &str,
) -> Result<(), ConvertError> {
    let Some(file) = program.file(file_id) else {
        return Ok(());
    };
    let _span = span!(Level::DEBUG, "file", name = %file.file_name).entered();

    let scope = match file.module_symbol {
        Some(module) if !single_entry => {
            let key = program.symbol_key(module);
            match key
                .as_ref()
                .and_then(|k| state.project.reflection_for_symbol(k))
            {
                Some(existing) => existing,
                None => {
                    let name = module_name(&file.file_name, root_dir);
                    let id = state.project.create_declaration(
                        ReflectionKind::Module,
                        &name,
                        state.project.root(),
                    )?;
                    if let Some(key) = key {
                        state.project.register_symbol(key, id);
                    }
                    id
                }
            }
        }
        _ => state.project.root(),
    };

    if let Some(comment) = file.comment.as_deref().and_then(extract_file_comment)
        && (scope != state.project.root() || single_entry)
        && let Some(target) = state.project.get_mut(scope)
        && target.comment.is_none()
    {
        let mut comment = comment;
        comment.modifier_tags.shift_remove("@packageDocumentation");
        comment.take_tags("@module");
        target.comment = Some(comment);
    }

    let ctx = Context::new(program, program_index, scope).with_file(file_id);
    debug!(exports = file.exports.len(), "converting exports");
    for export in &file.exports {
        convert_symbol(state, &ctx.with_export_name(&export.name), export.symbol)?;
    }
    Ok(())
}

/// Longest directory prefix shared by every path.
fn common_directory(paths: &[&str]) -> String {
    let mut iter = paths.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };
    let mut common: Vec<&str> = first.split('/').collect();
    common.pop();
    for path in iter {
        let mut dirs: Vec<&str> = path.split('/').collect();
        dirs.pop();
        let shared = common
            .iter()
            .zip(&dirs)
            .take_while(|(a, b)| a == b)
            .count();
        common.truncate(shared);
    }
    common.join("/")
}

const EXTENSIONS: &[&str] = &[
    ".d.ts", ".d.mts", ".d.cts", ".tsx", ".ts", ".mts", ".cts", ".jsx", ".js", ".mjs", ".cjs",
];

/// Module name of an entry file: its path below `root_dir`, without extension.
pub fn module_name(file_name: &str, root_dir: &str) -> String {
    let relative = if root_dir.is_empty() {
        file_name
    } else {
        file_name
            .strip_prefix(root_dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(file_name)
    };
    EXTENSIONS
        .iter()
        .find_map(|ext| relative.strip_suffix(ext))
        .unwrap_or(relative)
        .to_string()
}

#[cfg(test)]
#[path = "tests/converter_tests.rs"]
mod tests;
