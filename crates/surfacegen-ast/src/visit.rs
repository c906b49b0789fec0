//! Read-only pre-order walks.

use crate::expr::Expression;
use crate::stmt::Statement;

/// Calls `f` on every statement in `body`, including nested blocks, before
/// descending into its children.
pub fn for_each_statement<F>(body: &[Statement], f: &mut F)
where
    F: FnMut(&Statement),
{
    for stmt in body {
        f(stmt);
        for child in child_blocks(stmt) {
            for_each_statement(child, f);
        }
    }
}

/// Calls `f` on every expression reachable from `body`, in pre-order.
pub fn for_each_expression<F>(body: &[Statement], f: &mut F)
where
    F: FnMut(&Expression),
{
    for_each_statement(body, &mut |stmt| {
        for expr in own_expressions(stmt) {
            walk_expression(expr, f);
        }
    });
}

/// Pre-order walk of a single expression tree.
pub fn walk_expression<F>(expr: &Expression, f: &mut F)
where
    F: FnMut(&Expression),
{
    f(expr);
    match expr {
        Expression::Name { .. } | Expression::Constant { .. } | Expression::Opaque { .. } => {}
        Expression::Attribute { value, .. }
        | Expression::Await { value }
        | Expression::Starred { value } => walk_expression(value, f),
        Expression::Not { operand } | Expression::UnaryOp { operand, .. } => {
            walk_expression(operand, f)
        }
        Expression::Call {
            func,
            args,
            keywords,
        } => {
            walk_expression(func, f);
            for arg in args {
                walk_expression(arg, f);
            }
            for kw in keywords {
                walk_expression(&kw.value, f);
            }
        }
        Expression::Compare { left, right, .. } | Expression::BinOp { left, right, .. } => {
            walk_expression(left, f);
            walk_expression(right, f);
        }
        Expression::BoolOp { values, .. } => {
            for v in values {
                walk_expression(v, f);
            }
        }
        Expression::List { elts } | Expression::Tuple { elts } => {
            for e in elts {
                walk_expression(e, f);
            }
        }
        Expression::Dict { entries } => {
            for (k, v) in entries {
                walk_expression(k, f);
                walk_expression(v, f);
            }
        }
        Expression::Subscript { value, index } => {
            walk_expression(value, f);
            walk_expression(index, f);
        }
    }
}

/// Nested statement sequences owned directly by `stmt`.
pub fn child_blocks(stmt: &Statement) -> Vec<&[Statement]> {
    match stmt {
        Statement::If { body, orelse, .. } => vec![body.as_slice(), orelse.as_slice()],
        Statement::While { body, .. }
        | Statement::For { body, .. }
        | Statement::With { body, .. }
        | Statement::Block { body } => vec![body.as_slice()],
        Statement::Try {
            body,
            handlers,
            orelse,
            finalbody,
        } => {
            let mut blocks: Vec<&[Statement]> = vec![body.as_slice()];
            blocks.extend(handlers.iter().map(|h| h.body.as_slice()));
            blocks.push(orelse.as_slice());
            blocks.push(finalbody.as_slice());
            blocks
        }
        Statement::Assign { .. }
        | Statement::AnnAssign { .. }
        | Statement::AugAssign { .. }
        | Statement::Expr { .. }
        | Statement::Return { .. }
        | Statement::Raise { .. }
        | Statement::Pass
        | Statement::Break
        | Statement::Continue
        | Statement::Opaque { .. } => Vec::new(),
    }
}

/// Expressions held directly by `stmt`, excluding nested statements.
fn own_expressions(stmt: &Statement) -> Vec<&Expression> {
    match stmt {
        Statement::Assign { targets, value } => {
            let mut exprs: Vec<&Expression> = targets.iter().collect();
            exprs.push(value);
            exprs
        }
        Statement::AnnAssign { target, value, .. } => {
            let mut exprs = vec![target];
            exprs.extend(value.iter());
            exprs
        }
        Statement::AugAssign { target, value, .. } => vec![target, value],
        Statement::Expr { value } => vec![value],
        Statement::Return { value } | Statement::Raise { exc: value } => {
            value.iter().collect()
        }
        Statement::If { test, .. } | Statement::While { test, .. } => vec![test],
        Statement::For { target, iter, .. } => vec![target, iter],
        Statement::With { items, .. } => items
            .iter()
            .flat_map(|item| std::iter::once(&item.context).chain(item.binding.iter()))
            .collect(),
        Statement::Try { .. }
        | Statement::Pass
        | Statement::Break
        | Statement::Continue
        | Statement::Block { .. }
        | Statement::Opaque { .. } => Vec::new(),
    }
}
