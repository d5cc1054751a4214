// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Symbols of the semantic model.
//!
//! **DDD Context:** Semantic Analysis
//!
//! Types and methods are stored in tables owned by the
//! [`ClassHierarchy`](super::ClassHierarchy) and referred to by stable
//! [`TypeId`] / [`MethodId`] handles. A handle is allocated once per
//! declaration and never reused, so identity comparisons are plain integer
//! comparisons.

use std::fmt;

use ecow::EcoString;

use crate::source_analysis::{Location, Span};

/// Handle to a [`TypeSymbol`] in its compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

/// Handle to a [`MethodSymbol`] in its compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(u32);

macro_rules! symbol_handle {
    ($handle:ident, $prefix:literal) => {
        impl $handle {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "symbol tables over u32::MAX entries are not supported"
            )]
            pub(crate) const fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            /// Position of the symbol in its table.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $handle {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

symbol_handle!(TypeId, "type#");
symbol_handle!(MethodId, "method#");

/// Source language of a compilation. Only affects how messages spell
/// keywords and built-in type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    CSharp,
    VisualBasic,
}

/// Language-specific spellings used in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageSpelling {
    pub base_keyword: &'static str,
    pub this_keyword: &'static str,
    pub boolean_type: &'static str,
    pub integer_type: &'static str,
    pub string_type: &'static str,
    pub object_type: &'static str,
    pub void_type: &'static str,
}

const CSHARP_SPELLING: LanguageSpelling = LanguageSpelling {
    base_keyword: "base",
    this_keyword: "this",
    boolean_type: "bool",
    integer_type: "int",
    string_type: "string",
    object_type: "object",
    void_type: "void",
};

const VISUAL_BASIC_SPELLING: LanguageSpelling = LanguageSpelling {
    base_keyword: "MyBase",
    this_keyword: "Me",
    boolean_type: "Boolean",
    integer_type: "Integer",
    string_type: "String",
    object_type: "Object",
    void_type: "Void",
};

impl Language {
    /// Every supported language.
    pub const ALL: [Self; 2] = [Self::CSharp, Self::VisualBasic];

    /// Keyword and type spellings for this language.
    #[must_use]
    pub const fn spelling(self) -> &'static LanguageSpelling {
        match self {
            Self::CSharp => &CSHARP_SPELLING,
            Self::VisualBasic => &VISUAL_BASIC_SPELLING,
        }
    }

    /// Configuration name (`csharp`, `visual-basic`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CSharp => "csharp",
            Self::VisualBasic => "visual-basic",
        }
    }

    /// Parses a configuration name. Accepts a few common aliases.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "csharp" | "c#" | "cs" => Some(Self::CSharp),
            "visual-basic" | "visualbasic" | "vb" => Some(Self::VisualBasic),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Void,
    Bool,
    Int,
    String,
    /// `object` when no core library declares `System.Object`.
    Object,
    /// The type of the `null` literal.
    Null,
    /// A declared class or interface.
    Named(TypeId),
    /// Unresolvable; already reported.
    Error,
}

impl TypeRef {
    /// Returns the declared type, if this refers to one.
    #[must_use]
    pub const fn type_id(self) -> Option<TypeId> {
        match self {
            Self::Named(id) => Some(id),
            _ => None,
        }
    }
}

/// Whether a type is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
}

/// A declared class or interface.
///
/// **DDD Context:** Semantic Analysis - Entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub id: TypeId,
    pub name: EcoString,
    /// Enclosing namespace, dotted.
    pub namespace: Option<EcoString>,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub is_sealed: bool,
    /// Direct base class; `None` for `System.Object`, interfaces, and
    /// classes whose base could not be resolved.
    pub base_class: Option<TypeId>,
    /// Directly implemented (or, for interfaces, extended) interfaces.
    pub interfaces: Vec<TypeId>,
    /// Methods declared directly on this type, in source order.
    pub methods: Vec<MethodId>,
    pub fields: Vec<FieldSymbol>,
    pub location: Location,
}

impl TypeSymbol {
    /// Namespace-qualified name (`System.IDisposable`).
    #[must_use]
    pub fn qualified_name(&self) -> EcoString {
        qualify(self.namespace.as_deref(), &self.name)
    }

    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// Joins a namespace and a simple name.
pub(crate) fn qualify(namespace: Option<&str>, name: &str) -> EcoString {
    match namespace {
        Some(namespace) if !namespace.is_empty() => {
            let mut out = EcoString::from(namespace);
            out.push('.');
            out.push_str(name);
            out
        }
        _ => EcoString::from(name),
    }
}

/// A field of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSymbol {
    pub name: EcoString,
    pub ty: TypeRef,
    pub is_static: bool,
    pub span: Span,
}

/// A formal parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub name: EcoString,
    pub ty: TypeRef,
    pub span: Span,
}

/// Modifiers that affect dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent flags mirroring source modifiers"
)]
pub struct MethodModifiers {
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_sealed: bool,
    pub is_static: bool,
}

/// A declared method or constructor.
///
/// **DDD Context:** Semantic Analysis - Entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    pub id: MethodId,
    pub name: EcoString,
    pub containing_type: TypeId,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: TypeRef,
    pub modifiers: MethodModifiers,
    pub is_constructor: bool,
    /// The base method this `override` replaces. Only set for `override`
    /// methods whose target was found.
    pub overridden_method: Option<MethodId>,
    pub location: Location,
    /// `Type.Name(paramtypes)` spelled for the compilation's language.
    pub display_name: EcoString,
    pub language: Language,
}

impl MethodSymbol {
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    #[must_use]
    pub fn is_override(&self) -> bool {
        self.modifiers.is_override
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }

    /// Returns `true` if derived types may override this method.
    #[must_use]
    pub fn is_overridable(&self) -> bool {
        let m = self.modifiers;
        !m.is_static && !m.is_sealed && (m.is_virtual || m.is_abstract || m.is_override)
    }

    /// Returns `true` if both methods take the same parameter types.
    #[must_use]
    pub fn has_same_parameters(&self, other: &Self) -> bool {
        self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.ty == b.ty)
    }
}

impl fmt::Display for MethodSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spelling_table() {
        assert_eq!(Language::CSharp.spelling().base_keyword, "base");
        assert_eq!(Language::CSharp.spelling().boolean_type, "bool");
        assert_eq!(Language::VisualBasic.spelling().base_keyword, "MyBase");
        assert_eq!(Language::VisualBasic.spelling().boolean_type, "Boolean");
    }

    #[test]
    fn language_names_round_trip() {
        for language in Language::ALL {
            assert_eq!(Language::from_name(language.as_str()), Some(language));
        }
        assert_eq!(Language::from_name("VB"), Some(Language::VisualBasic));
        assert_eq!(Language::from_name("fortran"), None);
    }

    #[test]
    fn qualify_joins_namespace() {
        assert_eq!(qualify(Some("System"), "IDisposable"), "System.IDisposable");
        assert_eq!(qualify(None, "A"), "A");
        assert_eq!(qualify(Some(""), "A"), "A");
    }

    #[test]
    fn handles_display() {
        assert_eq!(TypeId::from_index(3).to_string(), "type#3");
        assert_eq!(MethodId::from_index(7).index(), 7);
    }
}
