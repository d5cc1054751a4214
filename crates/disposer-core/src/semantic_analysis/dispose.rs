// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Disposal-method classification.
//!
//! **DDD Context:** Semantic Analysis
//!
//! [`DisposeAnalysisHelper`] answers two questions shared by disposal rules:
//! which type is the disposal contract (`System.IDisposable`), and which
//! cleanup convention, if any, a given method follows.

use super::class_hierarchy::DISPOSABLE_TYPE;
use super::symbols::{MethodSymbol, TypeId, TypeRef};
use super::Compilation;

/// The cleanup convention a method follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisposeMethodKind {
    /// Not a cleanup method.
    NotDisposeMethod,
    /// `void Dispose()`
    Dispose,
    /// `void Dispose(bool disposing)`
    DisposeBool,
    /// `void Close()`
    Close,
    /// `DisposeAsync()`, `DisposeCoreAsync()`
    Other,
}

impl DisposeMethodKind {
    /// Stable lower-case name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotDisposeMethod => "not-dispose",
            Self::Dispose => "dispose",
            Self::DisposeBool => "dispose-bool",
            Self::Close => "close",
            Self::Other => "other",
        }
    }
}

/// Disposal metadata of one compilation.
#[derive(Debug, Clone, Copy)]
pub struct DisposeAnalysisHelper<'c> {
    compilation: &'c Compilation,
    idisposable: TypeId,
}

impl<'c> DisposeAnalysisHelper<'c> {
    /// Locates `System.IDisposable`. Returns `None` when the compilation
    /// does not declare it as an interface.
    #[must_use]
    pub fn try_new(compilation: &'c Compilation) -> Option<Self> {
        let idisposable = compilation.find_type(DISPOSABLE_TYPE)?;
        compilation
            .type_symbol(idisposable)
            .is_interface()
            .then_some(Self {
                compilation,
                idisposable,
            })
    }

    /// The disposal contract type.
    #[must_use]
    pub fn idisposable(&self) -> TypeId {
        self.idisposable
    }

    /// Returns `true` if `ty` is, or implements, the disposal contract.
    #[must_use]
    pub fn is_disposable_type(&self, ty: TypeId) -> bool {
        self.compilation.hierarchy().is_subtype(ty, self.idisposable)
    }

    /// Classifies `method` by name, parameters, return type and whether its
    /// containing type is disposable.
    #[must_use]
    pub fn dispose_method_kind(&self, method: &MethodSymbol) -> DisposeMethodKind {
        if method.is_static()
            || method.is_constructor
            || !self.is_disposable_type(method.containing_type)
        {
            return DisposeMethodKind::NotDisposeMethod;
        }
        let returns_void = method.return_type == TypeRef::Void;
        let parameters: Vec<TypeRef> = method.parameters.iter().map(|p| p.ty).collect();
        match (method.name.as_str(), parameters.as_slice()) {
            ("Dispose", []) if returns_void => DisposeMethodKind::Dispose,
            ("Dispose", [TypeRef::Bool]) if returns_void => DisposeMethodKind::DisposeBool,
            ("DisposeAsync" | "DisposeCoreAsync", []) => DisposeMethodKind::Other,
            ("Close", []) if returns_void => DisposeMethodKind::Close,
            _ => DisposeMethodKind::NotDisposeMethod,
        }
    }
}
