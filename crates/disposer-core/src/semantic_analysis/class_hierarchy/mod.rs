// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Static class hierarchy: the symbol tables of a compilation.
//!
//! **DDD Context:** Semantic Analysis
//!
//! The hierarchy owns every [`TypeSymbol`] and [`MethodSymbol`] and answers
//! the questions binding and analysis rules ask about them:
//!
//! - type-name resolution through namespaces and `using` directives,
//! - subtyping (base classes and interfaces) and assignability,
//! - override resolution (which base method an `override` replaces),
//! - member lookup for invocations.
//!
//! Classes have single inheritance and implicitly derive from
//! `System.Object` when the core library is present.

use std::collections::{HashMap, HashSet, VecDeque};

use ecow::EcoString;

use super::error::{SemanticError, SemanticErrorKind};
use super::symbols::{
    FieldSymbol, Language, MethodId, MethodModifiers, MethodSymbol, ParameterSymbol, TypeId,
    TypeKind, TypeRef, TypeSymbol, qualify,
};
use crate::ast::{
    CompilationUnit, Member, MethodDeclaration, Modifier, PredefinedType, QualifiedName,
    TypeDeclaration, TypeDeclarationKind, TypeSyntax,
};
use crate::source_analysis::{Diagnostic, FileId, Location};

pub(crate) mod builtins;

pub use builtins::{DISPOSABLE_TYPE, OBJECT_TYPE};

/// Name-resolution context of a declaration: its namespace and the `using`
/// directives of its file.
#[derive(Debug, Clone, Copy)]
pub struct TypeContext<'a> {
    pub namespace: Option<&'a str>,
    pub usings: &'a [EcoString],
}

/// How [`ClassHierarchy::resolve_method`] treats `override` declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberLookup {
    /// Ordinary member lookup: `override` declarations are skipped, so a
    /// call lands on the original `virtual` declaration.
    Virtual,
    /// `base.M()` lookup: the nearest implementation, overrides included.
    Implementation,
}

/// A method declaration paired with its symbol, for body binding.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeclaredMethod<'u> {
    pub method: MethodId,
    pub declaration: &'u MethodDeclaration,
}

/// Static class hierarchy built during semantic analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHierarchy {
    language: Language,
    types: Vec<TypeSymbol>,
    methods: Vec<MethodSymbol>,
    by_name: HashMap<EcoString, TypeId>,
    file_usings: HashMap<FileId, Vec<EcoString>>,
    object_type: Option<TypeId>,
}

impl ClassHierarchy {
    /// Creates an empty hierarchy.
    pub(crate) fn new(language: Language) -> Self {
        Self {
            language,
            types: Vec::new(),
            methods: Vec::new(),
            by_name: HashMap::new(),
            file_usings: HashMap::new(),
            object_type: None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// All types, indexed by [`TypeId::index`].
    #[must_use]
    pub fn types(&self) -> &[TypeSymbol] {
        &self.types
    }

    /// All methods, indexed by [`MethodId::index`].
    #[must_use]
    pub fn methods(&self) -> &[MethodSymbol] {
        &self.methods
    }

    /// Looks up a type by handle. Handles come from this hierarchy.
    #[must_use]
    pub fn type_symbol(&self, id: TypeId) -> &TypeSymbol {
        &self.types[id.index()]
    }

    /// Looks up a method by handle. Handles come from this hierarchy.
    #[must_use]
    pub fn method(&self, id: MethodId) -> &MethodSymbol {
        &self.methods[id.index()]
    }

    /// Finds a type by its namespace-qualified name.
    #[must_use]
    pub fn find_type(&self, qualified_name: &str) -> Option<TypeId> {
        self.by_name.get(qualified_name).copied()
    }

    /// `System.Object`, when declared.
    #[must_use]
    pub fn object_type(&self) -> Option<TypeId> {
        self.object_type
    }

    /// The resolution context for names used inside `ty`.
    #[must_use]
    pub fn context(&self, ty: TypeId) -> TypeContext<'_> {
        let symbol = self.type_symbol(ty);
        TypeContext {
            namespace: symbol.namespace.as_deref(),
            usings: self
                .file_usings
                .get(&symbol.location.file)
                .map_or(&[][..], Vec::as_slice),
        }
    }

    /// The base-class chain of `ty`, nearest first, excluding `ty` itself.
    pub fn base_classes(&self, ty: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::successors(self.type_symbol(ty).base_class, |base| {
            self.type_symbol(*base).base_class
        })
        .take(self.types.len())
    }

    /// Every interface `ty` implements or extends, directly or indirectly,
    /// breadth-first, excluding `ty` itself.
    #[must_use]
    pub fn all_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        let mut seen = HashSet::from([ty]);
        let mut queue: VecDeque<TypeId> = std::iter::once(ty).chain(self.base_classes(ty)).collect();
        let mut out = Vec::new();
        while let Some(current) = queue.pop_front() {
            for &interface in &self.type_symbol(current).interfaces {
                if seen.insert(interface) {
                    out.push(interface);
                    queue.push_back(interface);
                }
            }
        }
        out
    }

    /// Returns `true` if `sub` is `sup` or derives from or implements it.
    #[must_use]
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        sub == sup || self.reaches(sub, sup)
    }

    /// Returns `true` if a value of type `from` can be passed where `to` is
    /// expected. Error types are compatible with everything.
    #[must_use]
    pub fn is_assignable(&self, from: TypeRef, to: TypeRef) -> bool {
        if from == to || from == TypeRef::Error || to == TypeRef::Error {
            return true;
        }
        if self.is_object(to) {
            return from != TypeRef::Void;
        }
        match (from, to) {
            (TypeRef::Null, TypeRef::String | TypeRef::Named(_)) => true,
            (TypeRef::Named(a), TypeRef::Named(b)) => self.is_subtype(a, b),
            _ => false,
        }
    }

    fn is_object(&self, ty: TypeRef) -> bool {
        match ty {
            TypeRef::Object => true,
            TypeRef::Named(id) => Some(id) == self.object_type,
            _ => false,
        }
    }

    /// Finds a field on `ty` or one of its base classes.
    #[must_use]
    pub fn find_field(&self, ty: TypeId, name: &str) -> Option<&FieldSymbol> {
        std::iter::once(ty)
            .chain(self.base_classes(ty))
            .flat_map(|t| &self.type_symbol(t).fields)
            .find(|field| field.name == name)
    }

    /// Resolves a call to `name` with the given argument types, searching
    /// `start` and then its base types. At each level the applicable
    /// overload with the fewest inexact argument conversions wins; the first
    /// level with an applicable overload ends the search.
    #[must_use]
    pub fn resolve_method(
        &self,
        start: TypeId,
        name: &str,
        arguments: &[TypeRef],
        lookup: MemberLookup,
    ) -> Option<MethodId> {
        let mut levels: Vec<TypeId> = std::iter::once(start).chain(self.base_classes(start)).collect();
        if self.type_symbol(start).is_interface() {
            levels.extend(self.all_interfaces(start));
            levels.extend(self.object_type);
        }

        levels.into_iter().find_map(|level| {
            self.type_symbol(level)
                .methods
                .iter()
                .map(|id| self.method(*id))
                .filter(|method| {
                    method.name == name
                        && !method.is_constructor
                        && (lookup == MemberLookup::Implementation || !method.is_override())
                        && method.arity() == arguments.len()
                        && method
                            .parameters
                            .iter()
                            .zip(arguments)
                            .all(|(parameter, argument)| self.is_assignable(*argument, parameter.ty))
                })
                .min_by_key(|method| {
                    method
                        .parameters
                        .iter()
                        .zip(arguments)
                        .filter(|(parameter, argument)| parameter.ty != **argument)
                        .count()
                })
                .map(|method| method.id)
        })
    }

    /// Spells a type for messages in the hierarchy's language.
    #[must_use]
    pub fn type_display(&self, ty: TypeRef) -> EcoString {
        let spelling = self.language.spelling();
        match ty {
            TypeRef::Void => spelling.void_type.into(),
            TypeRef::Bool => spelling.boolean_type.into(),
            TypeRef::Int => spelling.integer_type.into(),
            TypeRef::String => spelling.string_type.into(),
            TypeRef::Object => spelling.object_type.into(),
            TypeRef::Null => "null".into(),
            TypeRef::Error => "?".into(),
            TypeRef::Named(id) if Some(id) == self.object_type => spelling.object_type.into(),
            TypeRef::Named(id) => self.type_symbol(id).name.clone(),
        }
    }

    /// Resolves a dotted type name as written inside `context`.
    ///
    /// Enclosing namespaces are searched innermost first, then the global
    /// namespace, then each `using` namespace in order.
    #[must_use]
    pub fn resolve_type_name(&self, dotted: &str, context: TypeContext<'_>) -> Option<TypeId> {
        let mut namespace = context.namespace;
        while let Some(prefix) = namespace {
            if let Some(id) = self.find_type(&qualify(Some(prefix), dotted)) {
                return Some(id);
            }
            namespace = prefix.rfind('.').map(|dot| &prefix[..dot]);
        }
        self.find_type(dotted).or_else(|| {
            context
                .usings
                .iter()
                .find_map(|using| self.find_type(&qualify(Some(using), dotted)))
        })
    }

    /// Resolves a type as written in source.
    pub fn resolve_type_syntax(
        &self,
        syntax: &TypeSyntax,
        context: TypeContext<'_>,
    ) -> Result<TypeRef, SemanticError> {
        match syntax {
            TypeSyntax::Predefined(predefined, _) => Ok(match predefined {
                PredefinedType::Bool => TypeRef::Bool,
                PredefinedType::Int => TypeRef::Int,
                PredefinedType::String => TypeRef::String,
                PredefinedType::Void => TypeRef::Void,
                PredefinedType::Object => self.object_type.map_or(TypeRef::Object, TypeRef::Named),
            }),
            TypeSyntax::Named(name) => self
                .resolve_type_name(&name.dotted(), context)
                .map(TypeRef::Named)
                .ok_or_else(|| {
                    SemanticError::new(
                        SemanticErrorKind::UnknownType { name: name.dotted() },
                        name.span,
                    )
                }),
        }
    }

    fn reaches(&self, from: TypeId, target: TypeId) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let symbol = self.type_symbol(current);
            for next in symbol.base_class.iter().chain(&symbol.interfaces) {
                if *next == target {
                    return true;
                }
                stack.push(*next);
            }
        }
        false
    }

    // ========================================================================
    // Declaration
    // ========================================================================

    /// Declares every type and member of `units`, resolves inheritance and
    /// overrides, and returns the declared methods for body binding.
    pub(crate) fn declare<'u>(
        &mut self,
        units: &'u [(FileId, CompilationUnit)],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<DeclaredMethod<'u>> {
        let declared = self.declare_types(units, diagnostics);
        for &(id, declaration) in &declared {
            let (base_class, interfaces) = self.resolve_base_list(id, declaration, diagnostics);
            let symbol = &mut self.types[id.index()];
            symbol.base_class = base_class;
            symbol.interfaces = interfaces;
        }
        for &(id, declaration) in &declared {
            self.break_cycles(id, declaration, diagnostics);
        }
        let mut methods = Vec::new();
        for &(id, declaration) in &declared {
            self.declare_members(id, declaration, &mut methods, diagnostics);
        }
        self.resolve_overrides(diagnostics);
        methods
    }

    fn declare_types<'u>(
        &mut self,
        units: &'u [(FileId, CompilationUnit)],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<(TypeId, &'u TypeDeclaration)> {
        let mut declared = Vec::new();
        for (file, unit) in units {
            self.file_usings
                .insert(*file, unit.usings.iter().map(QualifiedName::dotted).collect());
            for declaration in &unit.types {
                let qualified = qualify(declaration.namespace.as_deref(), &declaration.name.name);
                if self.by_name.contains_key(&qualified) {
                    report(
                        diagnostics,
                        *file,
                        SemanticError::new(
                            SemanticErrorKind::DuplicateType { name: qualified },
                            declaration.name.span,
                        ),
                    );
                    continue;
                }
                let id = TypeId::from_index(self.types.len());
                let kind = match declaration.kind {
                    TypeDeclarationKind::Class => TypeKind::Class,
                    TypeDeclarationKind::Interface => TypeKind::Interface,
                };
                let is_static = declaration.modifiers.has(Modifier::Static);
                self.types.push(TypeSymbol {
                    id,
                    name: declaration.name.name.clone(),
                    namespace: declaration.namespace.clone(),
                    kind,
                    is_abstract: kind == TypeKind::Interface
                        || is_static
                        || declaration.modifiers.has(Modifier::Abstract),
                    is_sealed: is_static || declaration.modifiers.has(Modifier::Sealed),
                    base_class: None,
                    interfaces: Vec::new(),
                    methods: Vec::new(),
                    fields: Vec::new(),
                    location: Location::new(*file, declaration.name.span),
                });
                self.by_name.insert(qualified, id);
                declared.push((id, declaration));
            }
        }
        self.object_type = self
            .find_type(OBJECT_TYPE)
            .filter(|id| !self.type_symbol(*id).is_interface());
        declared
    }

    fn resolve_base_list(
        &self,
        id: TypeId,
        declaration: &TypeDeclaration,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (Option<TypeId>, Vec<TypeId>) {
        let symbol = self.type_symbol(id);
        let file = symbol.location.file;
        let context = self.context(id);
        let mut base_class = None;
        let mut interfaces = Vec::new();

        for (position, syntax) in declaration.base_list.iter().enumerate() {
            let base = match self.resolve_type_syntax(syntax, context) {
                Ok(TypeRef::Named(base)) => base,
                Ok(other) => {
                    let name = self.type_display(other);
                    report(
                        diagnostics,
                        file,
                        SemanticError::new(SemanticErrorKind::NotAnInterface { name }, syntax.span()),
                    );
                    continue;
                }
                Err(error) => {
                    report(diagnostics, file, error);
                    continue;
                }
            };
            let base_symbol = self.type_symbol(base);
            let error = if base_symbol.is_interface() {
                if !interfaces.contains(&base) {
                    interfaces.push(base);
                }
                continue;
            } else if symbol.is_interface() {
                SemanticErrorKind::NotAnInterface {
                    name: base_symbol.qualified_name(),
                }
            } else if position != 0 {
                SemanticErrorKind::BaseClassNotFirst {
                    base: base_symbol.qualified_name(),
                }
            } else if base_symbol.is_sealed {
                SemanticErrorKind::SealedBase {
                    name: symbol.name.clone(),
                    base: base_symbol.qualified_name(),
                }
            } else {
                base_class = Some(base);
                continue;
            };
            report(diagnostics, file, SemanticError::new(error, syntax.span()));
        }

        if !symbol.is_interface() && base_class.is_none() && Some(id) != self.object_type {
            base_class = self.object_type;
        }
        (base_class, interfaces)
    }

    /// Removes any supertype edge of `id` that leads back to `id`.
    fn break_cycles(
        &mut self,
        id: TypeId,
        declaration: &TypeDeclaration,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let symbol = self.type_symbol(id);
        let supertypes: Vec<TypeId> = symbol.base_class.iter().chain(&symbol.interfaces).copied().collect();
        for supertype in supertypes {
            if supertype != id && !self.reaches(supertype, id) {
                continue;
            }
            let symbol = &mut self.types[id.index()];
            if symbol.base_class == Some(supertype) {
                symbol.base_class = None;
            }
            symbol.interfaces.retain(|interface| *interface != supertype);
            let error = SemanticError::new(
                SemanticErrorKind::CircularBase {
                    name: symbol.qualified_name(),
                },
                declaration.name.span,
            );
            report(diagnostics, symbol.location.file, error);
        }
    }

    fn declare_members<'u>(
        &mut self,
        id: TypeId,
        declaration: &'u TypeDeclaration,
        methods: &mut Vec<DeclaredMethod<'u>>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let file = self.type_symbol(id).location.file;
        for member in &declaration.members {
            match member {
                Member::Field(field) => {
                    let ty = self.resolve_or_report(&field.ty, id, diagnostics);
                    self.types[id.index()].fields.push(FieldSymbol {
                        name: field.name.name.clone(),
                        ty,
                        is_static: field.modifiers.has(Modifier::Static),
                        span: field.name.span,
                    });
                }
                Member::Method(method) => {
                    match self.declare_method(id, method, diagnostics) {
                        Ok(method_id) => methods.push(DeclaredMethod {
                            method: method_id,
                            declaration: method,
                        }),
                        Err(error) => report(diagnostics, file, error),
                    }
                }
            }
        }
    }

    fn declare_method(
        &mut self,
        owner: TypeId,
        method: &MethodDeclaration,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<MethodId, SemanticError> {
        let owner_symbol = self.type_symbol(owner);
        let in_interface = owner_symbol.is_interface();
        let type_name = owner_symbol.name.clone();
        let type_is_abstract = owner_symbol.is_abstract;
        let file = owner_symbol.location.file;

        let has = |modifier| method.modifiers.has(modifier);
        let is_abstract = has(Modifier::Abstract) || (in_interface && method.body.is_none());
        let modifiers = MethodModifiers {
            is_abstract,
            is_virtual: has(Modifier::Virtual) || (in_interface && !has(Modifier::Static)),
            is_override: has(Modifier::Override),
            is_sealed: has(Modifier::Sealed),
            is_static: has(Modifier::Static),
        };

        let parameters: Vec<ParameterSymbol> = method
            .parameters
            .iter()
            .map(|parameter| ParameterSymbol {
                name: parameter.name.name.clone(),
                ty: self.resolve_or_report(&parameter.ty, owner, diagnostics),
                span: parameter.name.span,
            })
            .collect();
        let return_type = self.resolve_or_report(&method.return_type, owner, diagnostics);

        let parameter_list = parameters
            .iter()
            .map(|parameter| self.type_display(parameter.ty))
            .collect::<Vec<_>>()
            .join(", ");
        let display_name = EcoString::from(format!("{type_name}.{}({parameter_list})", method.name.name));
        let span = method.name.span;

        let duplicate = self.type_symbol(owner).methods.iter().any(|existing| {
            let existing = self.method(*existing);
            existing.name == method.name.name
                && existing.is_constructor == method.is_constructor
                && existing.parameters.len() == parameters.len()
                && existing.parameters.iter().zip(&parameters).all(|(a, b)| a.ty == b.ty)
        });
        if duplicate {
            return Err(SemanticError::new(
                SemanticErrorKind::DuplicateMember {
                    type_name,
                    name: method.name.name.clone(),
                },
                span,
            ));
        }

        if has(Modifier::Abstract) && method.body.is_some() {
            report(
                diagnostics,
                file,
                SemanticError::new(
                    SemanticErrorKind::AbstractWithBody {
                        name: display_name.clone(),
                    },
                    span,
                ),
            );
        } else if !is_abstract && method.body.is_none() {
            report(
                diagnostics,
                file,
                SemanticError::new(
                    SemanticErrorKind::MissingBody {
                        name: display_name.clone(),
                    },
                    span,
                ),
            );
        }
        if has(Modifier::Abstract) && !type_is_abstract {
            report(
                diagnostics,
                file,
                SemanticError::new(
                    SemanticErrorKind::AbstractInConcreteType {
                        name: display_name.clone(),
                        type_name: type_name.clone(),
                    },
                    span,
                ),
            );
        }

        let id = MethodId::from_index(self.methods.len());
        self.methods.push(MethodSymbol {
            id,
            name: method.name.name.clone(),
            containing_type: owner,
            parameters,
            return_type,
            modifiers,
            is_constructor: method.is_constructor,
            overridden_method: None,
            location: Location::new(file, span),
            display_name,
            language: self.language,
        });
        self.types[owner.index()].methods.push(id);
        Ok(id)
    }

    fn resolve_or_report(
        &self,
        syntax: &TypeSyntax,
        owner: TypeId,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TypeRef {
        self.resolve_type_syntax(syntax, self.context(owner))
            .unwrap_or_else(|error| {
                report(diagnostics, self.type_symbol(owner).location.file, error);
                TypeRef::Error
            })
    }

    fn resolve_overrides(&mut self, diagnostics: &mut Vec<Diagnostic>) {
        for index in 0..self.methods.len() {
            let method = &self.methods[index];
            if !method.is_override() {
                continue;
            }
            match self.find_overridden(method) {
                Ok(base) => self.methods[index].overridden_method = Some(base),
                Err(kind) => {
                    let location = method.location;
                    report(
                        diagnostics,
                        location.file,
                        SemanticError::new(kind, location.span),
                    );
                }
            }
        }
    }

    /// The nearest base-class method with the same name and parameter types.
    fn find_overridden(&self, method: &MethodSymbol) -> Result<MethodId, SemanticErrorKind> {
        for base in self.base_classes(method.containing_type) {
            let candidate = self
                .type_symbol(base)
                .methods
                .iter()
                .map(|id| self.method(*id))
                .find(|candidate| {
                    candidate.name == method.name
                        && !candidate.is_constructor
                        && candidate.has_same_parameters(method)
                });
            let Some(candidate) = candidate else {
                continue;
            };
            if candidate.is_override() && candidate.modifiers.is_sealed {
                return Err(SemanticErrorKind::SealedOverride {
                    name: method.display_name.clone(),
                    base: candidate.display_name.clone(),
                });
            }
            if !candidate.is_overridable() {
                return Err(SemanticErrorKind::NotOverridable {
                    name: method.display_name.clone(),
                    base: candidate.display_name.clone(),
                });
            }
            return Ok(candidate.id);
        }
        Err(SemanticErrorKind::NothingToOverride {
            name: method.display_name.clone(),
        })
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, file: FileId, error: SemanticError) {
    diagnostics.push(error.into_diagnostic(file));
}
