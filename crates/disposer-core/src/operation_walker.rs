// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared walker over bound operation trees.
//!
//! **DDD Context:** Analysis
//!
//! - [`walk_operation`]: pre-order recursive walk of an operation tree,
//!   calling a visitor on every node. The visitor may stop the walk early
//!   by returning [`ControlFlow::Break`].
//!
//! - [`for_each_invocation`]: the same walk filtered to invocation nodes,
//!   which is what the analysis driver feeds to method-body analyzers.
//!
//! Children are visited in source order, so invocations arrive in document
//! order: `a.F(b.G())` yields `F` before `G`, and an invocation's receiver
//! before its arguments.

use std::ops::ControlFlow;

use crate::semantic_analysis::{InvocationOperation, Operation};

/// Walks an operation tree in pre-order, calling `f` on every node.
///
/// Returns the first `Break` produced by `f`, after which no further nodes
/// are visited.
pub fn walk_operation<B, F>(operation: &Operation, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&Operation) -> ControlFlow<B>,
{
    crate::maybe_grow_stack(|| walk_node(operation, f))
}

fn walk_node<B, F>(operation: &Operation, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&Operation) -> ControlFlow<B>,
{
    f(operation)?;
    match operation {
        Operation::Block { operations, .. } | Operation::Invalid {
            children: operations,
            ..
        } => {
            for child in operations {
                walk_operation(child, f)?;
            }
        }
        Operation::ExpressionStatement { operation, .. }
        | Operation::Unary {
            operand: operation, ..
        } => walk_operation(operation, f)?,
        Operation::VariableDeclaration { initializer, .. } => {
            if let Some(initializer) = initializer {
                walk_operation(initializer, f)?;
            }
        }
        Operation::Conditional {
            condition,
            when_true,
            when_false,
            ..
        } => {
            walk_operation(condition, f)?;
            walk_operation(when_true, f)?;
            if let Some(when_false) = when_false {
                walk_operation(when_false, f)?;
            }
        }
        Operation::Loop { condition, body, .. } => {
            walk_operation(condition, f)?;
            walk_operation(body, f)?;
        }
        Operation::TryFinally { body, finally, .. } => {
            walk_operation(body, f)?;
            if let Some(finally) = finally {
                walk_operation(finally, f)?;
            }
        }
        Operation::Return { value, .. } => {
            if let Some(value) = value {
                walk_operation(value, f)?;
            }
        }
        Operation::Invocation(invocation) => {
            if let Some(instance) = &invocation.instance {
                walk_operation(instance, f)?;
            }
            for argument in &invocation.arguments {
                walk_operation(argument, f)?;
            }
        }
        Operation::FieldReference { instance, .. } => {
            if let Some(instance) = instance {
                walk_operation(instance, f)?;
            }
        }
        Operation::Binary { left, right, .. } => {
            walk_operation(left, f)?;
            walk_operation(right, f)?;
        }
        Operation::Assignment { target, value, .. } => {
            walk_operation(target, f)?;
            walk_operation(value, f)?;
        }
        Operation::ObjectCreation { arguments, .. } => {
            for argument in arguments {
                walk_operation(argument, f)?;
            }
        }
        // Leaf nodes.
        Operation::InstanceReference { .. }
        | Operation::LocalReference { .. }
        | Operation::ParameterReference { .. }
        | Operation::TypeReference { .. }
        | Operation::Literal { .. }
        | Operation::Empty(_) => {}
    }
    ControlFlow::Continue(())
}

/// Calls `f` on every invocation in the tree, in document order.
pub fn for_each_invocation<B, F>(operation: &Operation, mut f: F) -> ControlFlow<B>
where
    F: FnMut(&InvocationOperation) -> ControlFlow<B>,
{
    walk_operation(operation, &mut |node| match node {
        Operation::Invocation(invocation) => f(invocation),
        _ => ControlFlow::Continue(()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic_analysis::{Compilation, ReceiverKind};

    fn body_of<'c>(compilation: &'c Compilation, name: &str) -> &'c Operation {
        let method = compilation
            .methods()
            .iter()
            .find(|method| method.name == name)
            .unwrap_or_else(|| panic!("no method {name}"));
        compilation.method_body(method.id).expect("body")
    }

    const SOURCE: &str = "
        class A {
            A Next() { return this; }
            void Use(A a) { }
            void F(bool flag) {
                Next().Use(Next());
                if (flag) { Use(this); } else { Next(); }
                while (flag) { flag = false; }
                try { Use(null); } finally { Next(); }
            }
        }";

    #[test]
    fn invocations_in_document_order() {
        let compilation = Compilation::from_source(SOURCE);
        assert!(compilation.diagnostics().is_empty(), "{:?}", compilation.diagnostics());
        let body = body_of(&compilation, "F");
        let mut names = Vec::new();
        let flow: ControlFlow<()> = for_each_invocation(body, |invocation| {
            let target = invocation.target.expect("resolved");
            names.push(compilation.method(target).name.to_string());
            ControlFlow::Continue(())
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(names, ["Use", "Next", "Next", "Use", "Next", "Use", "Next"]);
    }

    #[test]
    fn break_stops_the_walk() {
        let compilation = Compilation::from_source(SOURCE);
        let body = body_of(&compilation, "F");
        let mut seen = 0;
        let flow = for_each_invocation(body, |invocation| {
            seen += 1;
            if seen == 3 {
                ControlFlow::Break(invocation.span)
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(matches!(flow, ControlFlow::Break(_)));
        assert_eq!(seen, 3);
    }

    #[test]
    fn walk_visits_every_node_once() {
        let compilation = Compilation::from_source(SOURCE);
        let body = body_of(&compilation, "F");
        let mut nodes = 0;
        let mut receivers = Vec::new();
        let _: ControlFlow<()> = walk_operation(body, &mut |node| {
            nodes += 1;
            if let Operation::Invocation(invocation) = node {
                receivers.push(invocation.receiver);
            }
            ControlFlow::Continue(())
        });
        assert!(nodes > receivers.len());
        assert!(receivers.iter().all(|kind| *kind == ReceiverKind::This || *kind == ReceiverKind::Instance));
    }
}
