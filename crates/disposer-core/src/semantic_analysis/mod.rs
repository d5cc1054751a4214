// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis: the compilation model lint rules run against.
//!
//! **DDD Context:** Semantic Analysis
//!
//! A [`Compilation`] is built from source text in three phases:
//!
//! 1. **Parse** every file (plus the core library, when enabled)
//! 2. **Declare** types and members into a [`ClassHierarchy`], resolving
//!    inheritance and overrides
//! 3. **Bind** every method body into an [`Operation`] tree
//!
//! Problems found on the way are kept as error diagnostics; a compilation is
//! always produced and rules run on whatever was bound.

use ecow::EcoString;
use tracing::debug;

use crate::ast::CompilationUnit;
use crate::source_analysis::{
    Diagnostic, DiagnosticCategory, FileId, MAX_SOURCE_LEN, Span, lex_with_eof, parse,
    sort_and_dedup,
};

mod binder;
pub mod class_hierarchy;
pub mod dispose;
pub mod error;
pub mod operation;
pub mod scope;
pub mod symbols;


pub use class_hierarchy::{
    ClassHierarchy, DISPOSABLE_TYPE, MemberLookup, OBJECT_TYPE, TypeContext,
};
pub use dispose::{DisposeAnalysisHelper, DisposeMethodKind};
pub use error::{SemanticError, SemanticErrorKind};
pub use operation::{InstanceReferenceKind, InvocationOperation, Operation, ReceiverKind};
pub use symbols::{
    FieldSymbol, Language, LanguageSpelling, MethodId, MethodModifiers, MethodSymbol,
    ParameterSymbol, TypeId, TypeKind, TypeRef, TypeSymbol,
};

/// A source file of a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: FileId,
    /// Path as given by the caller; only used for reporting.
    pub path: EcoString,
    pub text: String,
}

/// Options controlling how a [`Compilation`] is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Language used when spelling names in messages.
    pub language: Language,
    /// Include the built-in `System` declarations (`Object`, `IDisposable`).
    pub core_library: bool,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            core_library: true,
        }
    }
}

/// A parsed, declared and bound set of source files.
#[derive(Debug, Clone)]
pub struct Compilation {
    options: CompilationOptions,
    files: Vec<SourceFile>,
    hierarchy: ClassHierarchy,
    /// Bound bodies indexed by [`MethodId::index`]; `None` for methods
    /// without a body.
    bodies: Vec<Option<Operation>>,
    diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// Builds a compilation from `(path, text)` pairs.
    pub fn new<P, T>(files: impl IntoIterator<Item = (P, T)>, options: CompilationOptions) -> Self
    where
        P: Into<EcoString>,
        T: Into<String>,
    {
        let files: Vec<SourceFile> = files
            .into_iter()
            .enumerate()
            .map(|(index, (path, text))| SourceFile {
                id: FileId::from_index(index),
                path: path.into(),
                text: text.into(),
            })
            .collect();

        let mut diagnostics = Vec::new();
        let mut units: Vec<(FileId, CompilationUnit)> = Vec::with_capacity(files.len() + 1);
        if options.core_library {
            units.push((FileId::CORE_LIBRARY, class_hierarchy::builtins::core_library_unit()));
        }
        for file in &files {
            if let Some(diagnostic) = oversized_source(file.text.len()) {
                diagnostics.push(diagnostic.with_file(file.id));
                units.push((file.id, CompilationUnit::default()));
                continue;
            }
            let (unit, parse_diagnostics) = parse(lex_with_eof(&file.text));
            diagnostics.extend(
                parse_diagnostics
                    .into_iter()
                    .map(|diagnostic| diagnostic.with_file(file.id)),
            );
            units.push((file.id, unit));
        }

        let mut hierarchy = ClassHierarchy::new(options.language);
        let declared = hierarchy.declare(&units, &mut diagnostics);

        let mut bodies = vec![None; hierarchy.methods().len()];
        for declared_method in declared {
            let Some(body) = &declared_method.declaration.body else {
                continue;
            };
            let (operation, errors) = binder::bind_method_body(&hierarchy, declared_method.method, body);
            let file = hierarchy.method(declared_method.method).location.file;
            diagnostics.extend(errors.into_iter().map(|error| error.into_diagnostic(file)));
            bodies[declared_method.method.index()] = Some(operation);
        }

        sort_and_dedup(&mut diagnostics);
        debug!(
            files = files.len(),
            types = hierarchy.types().len(),
            methods = hierarchy.methods().len(),
            diagnostics = diagnostics.len(),
            "built compilation"
        );

        Self {
            options,
            files,
            hierarchy,
            bodies,
            diagnostics,
        }
    }

    /// Builds a compilation from a single unnamed C# source with the core
    /// library.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self::new([("<input>", source)], CompilationOptions::default())
    }

    #[must_use]
    pub fn options(&self) -> CompilationOptions {
        self.options
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.options.language
    }

    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// The source file behind `id`; `None` for the core library.
    #[must_use]
    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    #[must_use]
    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    #[must_use]
    pub fn types(&self) -> &[TypeSymbol] {
        self.hierarchy.types()
    }

    #[must_use]
    pub fn type_symbol(&self, id: TypeId) -> &TypeSymbol {
        self.hierarchy.type_symbol(id)
    }

    #[must_use]
    pub fn find_type(&self, qualified_name: &str) -> Option<TypeId> {
        self.hierarchy.find_type(qualified_name)
    }

    #[must_use]
    pub fn methods(&self) -> &[MethodSymbol] {
        self.hierarchy.methods()
    }

    #[must_use]
    pub fn method(&self, id: MethodId) -> &MethodSymbol {
        self.hierarchy.method(id)
    }

    /// The bound body of `method`, if it has one.
    #[must_use]
    pub fn method_body(&self, method: MethodId) -> Option<&Operation> {
        self.bodies.get(method.index()).and_then(Option::as_ref)
    }

    /// Front-end diagnostics (syntax and binding errors), in document order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Error for a source text too long for span offsets, which is then skipped.
fn oversized_source(len: usize) -> Option<Diagnostic> {
    (len > MAX_SOURCE_LEN).then(|| {
        Diagnostic::error(
            format!("source file is too large ({len} bytes, maximum {MAX_SOURCE_LEN})"),
            Span::default(),
        )
        .with_category(DiagnosticCategory::Syntax)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_sources_are_rejected() {
        assert!(oversized_source(0).is_none());
        assert!(oversized_source(MAX_SOURCE_LEN).is_none());
        #[cfg(target_pointer_width = "64")]
        {
            let diagnostic = oversized_source(MAX_SOURCE_LEN + 1).expect("too large");
            assert_eq!(diagnostic.category, Some(DiagnosticCategory::Syntax));
            assert_eq!(diagnostic.span, Span::default());
            assert!(diagnostic.message.contains("source file is too large"));
        }
    }

    #[test]
    fn files_get_sequential_ids() {
        let compilation = Compilation::new(
            [("a.cs", "class A { }"), ("b.cs", "class B : A { }")],
            CompilationOptions::default(),
        );
        assert!(compilation.diagnostics().is_empty());
        assert_eq!(compilation.files().len(), 2);
        assert_eq!(compilation.files()[1].id, FileId::from_index(1));
        assert_eq!(
            compilation.file(FileId::from_index(0)).map(|file| file.path.as_str()),
            Some("a.cs")
        );
        assert!(compilation.file(FileId::CORE_LIBRARY).is_none());
    }

    #[test]
    fn diagnostics_carry_their_file() {
        let compilation = Compilation::new(
            [("a.cs", "class A { }"), ("b.cs", "class B : Missing { void F() { @ } }")],
            CompilationOptions::default(),
        );
        let diagnostics = compilation.diagnostics();
        assert!(!diagnostics.is_empty());
        assert!(diagnostics.iter().all(|d| d.file == Some(FileId::from_index(1))));
        assert!(diagnostics.iter().any(|d| d.category == Some(DiagnosticCategory::Syntax)));
        assert!(diagnostics.iter().any(|d| d.category == Some(DiagnosticCategory::Binding)));
    }

    #[test]
    fn bodies_are_bound_for_concrete_methods_only() {
        let compilation = Compilation::from_source(
            "abstract class A { public abstract void F(); public void G() { F(); } }",
        );
        let f = compilation.methods().iter().find(|m| m.name == "F").expect("F");
        let g = compilation.methods().iter().find(|m| m.name == "G").expect("G");
        assert!(compilation.method_body(f.id).is_none());
        assert!(matches!(compilation.method_body(g.id), Some(Operation::Block { .. })));
    }

    #[test]
    fn core_library_is_optional() {
        let with = Compilation::from_source("class A { }");
        assert!(with.find_type(DISPOSABLE_TYPE).is_some());
        assert!(with.find_type(OBJECT_TYPE).is_some());

        let without = Compilation::new(
            [("a.cs", "class A { }")],
            CompilationOptions {
                core_library: false,
                ..CompilationOptions::default()
            },
        );
        assert!(without.find_type(DISPOSABLE_TYPE).is_none());
        assert_eq!(without.types().len(), 1);
    }

    #[test]
    fn language_option_is_kept() {
        let compilation = Compilation::new(
            [("a.vb", "class A { }")],
            CompilationOptions {
                language: Language::VisualBasic,
                ..CompilationOptions::default()
            },
        );
        assert_eq!(compilation.language(), Language::VisualBasic);
        assert!(compilation.options().core_library);
    }
}
