// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Scope tracking for method-body binding.
//!
//! Scopes are organized hierarchically:
//! - Method (depth 0): the parameters
//! - Block (depth 1+): locals declared in nested blocks
//!
//! **DDD Context:** Semantic Analysis
//!
//! This module implements the `Binding` value object from the DDD model.

use std::collections::HashMap;

use ecow::EcoString;

use super::symbols::TypeRef;
use crate::source_analysis::Span;

/// Tracks variable definitions across nested scopes.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Stack of scope levels, each containing variable definitions.
    levels: Vec<ScopeLevel>,
}

#[derive(Debug, Clone, Default)]
struct ScopeLevel {
    variables: HashMap<EcoString, Binding>,
}

/// The kind of binding in a scope.
///
/// **DDD Context:** Semantic Analysis - Value Object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Local variable (`var x = ...;`)
    Local,
    /// Method parameter
    Parameter,
}

/// A binding in a scope.
///
/// **DDD Context:** Semantic Analysis - Value Object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: EcoString,
    pub defined_at: Span,
    /// Scope depth (0 = method, 1+ = blocks)
    pub depth: usize,
    pub kind: BindingKind,
    pub ty: TypeRef,
}

impl Scope {
    /// Creates a new scope tracker with the method-level scope (depth 0).
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: vec![ScopeLevel::default()],
        }
    }

    /// Enters a new nested scope.
    pub fn push(&mut self) {
        self.levels.push(ScopeLevel::default());
    }

    /// Exits the current scope.
    ///
    /// Returns `false` (and does nothing) at method level.
    pub fn pop(&mut self) -> bool {
        if self.levels.len() > 1 {
            self.levels.pop();
            true
        } else {
            false
        }
    }

    /// Defines or redefines a variable in the current scope.
    pub fn define(&mut self, name: &str, span: Span, kind: BindingKind, ty: TypeRef) {
        let depth = self.current_depth();
        if let Some(level) = self.levels.last_mut() {
            level.variables.insert(
                name.into(),
                Binding {
                    name: name.into(),
                    defined_at: span,
                    depth,
                    kind,
                    ty,
                },
            );
        }
    }

    /// Looks up a variable by name, searching from innermost to outermost scope.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.levels
            .iter()
            .rev()
            .find_map(|level| level.variables.get(name))
    }

    /// Returns the current scope depth (0 = method).
    #[must_use]
    pub fn current_depth(&self) -> usize {
        self.levels.len() - 1
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
