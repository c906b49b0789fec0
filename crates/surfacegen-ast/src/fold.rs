//! Owning tree rewrites.
//!
//! A [`Fold`] consumes a node and returns its replacement. Statement folds
//! return `Ok(None)` to drop the statement from its enclosing block, so a
//! single pass can keep, replace, or remove nodes. The default methods call
//! the `walk_*` functions, which rebuild a node from its folded children;
//! implementors override only the node kinds they care about and call the
//! matching `walk_*` function to continue the descent.
//!
//! Every statement and expression kind is matched exhaustively here, so a
//! new node kind fails to compile until the walk handles it.

use crate::expr::{Expression, Keyword};
use crate::stmt::{ExceptHandler, Statement, WithItem};

pub trait Fold {
    type Error;

    fn fold_block(&mut self, body: Vec<Statement>) -> Result<Vec<Statement>, Self::Error> {
        walk_block(self, body)
    }

    fn fold_statement(&mut self, stmt: Statement) -> Result<Option<Statement>, Self::Error> {
        walk_statement(self, stmt).map(Some)
    }

    fn fold_expression(&mut self, expr: Expression) -> Result<Expression, Self::Error> {
        walk_expression(self, expr)
    }
}

/// Fold each statement of a block in order, omitting dropped statements.
pub fn walk_block<F: Fold + ?Sized>(
    folder: &mut F,
    body: Vec<Statement>,
) -> Result<Vec<Statement>, F::Error> {
    let mut out = Vec::with_capacity(body.len());
    for stmt in body {
        if let Some(stmt) = folder.fold_statement(stmt)? {
            out.push(stmt);
        }
    }
    Ok(out)
}

/// Rebuild a statement from its folded children.
pub fn walk_statement<F: Fold + ?Sized>(
    folder: &mut F,
    stmt: Statement,
) -> Result<Statement, F::Error> {
    let stmt = match stmt {
        Statement::Assign { targets, value } => Statement::Assign {
            targets: fold_all(folder, targets)?,
            value: folder.fold_expression(value)?,
        },
        Statement::AnnAssign {
            target,
            annotation,
            value,
        } => Statement::AnnAssign {
            target: folder.fold_expression(target)?,
            annotation,
            value: fold_opt(folder, value)?,
        },
        Statement::AugAssign { target, op, value } => Statement::AugAssign {
            target: folder.fold_expression(target)?,
            op,
            value: folder.fold_expression(value)?,
        },
        Statement::Expr { value } => Statement::Expr {
            value: folder.fold_expression(value)?,
        },
        Statement::Return { value } => Statement::Return {
            value: fold_opt(folder, value)?,
        },
        Statement::If { test, body, orelse } => Statement::If {
            test: folder.fold_expression(test)?,
            body: folder.fold_block(body)?,
            orelse: folder.fold_block(orelse)?,
        },
        Statement::While { test, body } => Statement::While {
            test: folder.fold_expression(test)?,
            body: folder.fold_block(body)?,
        },
        Statement::For { target, iter, body } => Statement::For {
            target: folder.fold_expression(target)?,
            iter: folder.fold_expression(iter)?,
            body: folder.fold_block(body)?,
        },
        Statement::With { items, body } => {
            let mut folded = Vec::with_capacity(items.len());
            for item in items {
                folded.push(WithItem {
                    context: folder.fold_expression(item.context)?,
                    binding: fold_opt(folder, item.binding)?,
                });
            }
            Statement::With {
                items: folded,
                body: folder.fold_block(body)?,
            }
        }
        Statement::Try {
            body,
            handlers,
            orelse,
            finalbody,
        } => {
            let body = folder.fold_block(body)?;
            let mut folded = Vec::with_capacity(handlers.len());
            for handler in handlers {
                folded.push(ExceptHandler {
                    kind: handler.kind,
                    name: handler.name,
                    body: folder.fold_block(handler.body)?,
                });
            }
            Statement::Try {
                body,
                handlers: folded,
                orelse: folder.fold_block(orelse)?,
                finalbody: folder.fold_block(finalbody)?,
            }
        }
        Statement::Raise { exc } => Statement::Raise {
            exc: fold_opt(folder, exc)?,
        },
        leaf @ (Statement::Pass
        | Statement::Break
        | Statement::Continue
        | Statement::Opaque { .. }) => leaf,
        Statement::Block { body } => Statement::Block {
            body: folder.fold_block(body)?,
        },
    };
    Ok(stmt)
}

/// Rebuild an expression from its folded children.
pub fn walk_expression<F: Fold + ?Sized>(
    folder: &mut F,
    expr: Expression,
) -> Result<Expression, F::Error> {
    let expr = match expr {
        leaf @ (Expression::Name { .. }
        | Expression::Constant { .. }
        | Expression::Opaque { .. }) => leaf,
        Expression::Attribute { value, attr } => Expression::Attribute {
            value: fold_boxed(folder, value)?,
            attr,
        },
        Expression::Call {
            func,
            args,
            keywords,
        } => {
            let func = fold_boxed(folder, func)?;
            let args = fold_all(folder, args)?;
            let mut folded = Vec::with_capacity(keywords.len());
            for kw in keywords {
                folded.push(Keyword {
                    arg: kw.arg,
                    value: folder.fold_expression(kw.value)?,
                });
            }
            Expression::Call {
                func,
                args,
                keywords: folded,
            }
        }
        Expression::Await { value } => Expression::Await {
            value: fold_boxed(folder, value)?,
        },
        Expression::Compare { left, op, right } => Expression::Compare {
            left: fold_boxed(folder, left)?,
            op,
            right: fold_boxed(folder, right)?,
        },
        Expression::BoolOp { op, values } => Expression::BoolOp {
            op,
            values: fold_all(folder, values)?,
        },
        Expression::Not { operand } => Expression::Not {
            operand: fold_boxed(folder, operand)?,
        },
        Expression::BinOp { left, op, right } => Expression::BinOp {
            left: fold_boxed(folder, left)?,
            op,
            right: fold_boxed(folder, right)?,
        },
        Expression::UnaryOp { op, operand } => Expression::UnaryOp {
            op,
            operand: fold_boxed(folder, operand)?,
        },
        Expression::List { elts } => Expression::List {
            elts: fold_all(folder, elts)?,
        },
        Expression::Tuple { elts } => Expression::Tuple {
            elts: fold_all(folder, elts)?,
        },
        Expression::Dict { entries } => {
            let mut folded = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                folded.push((folder.fold_expression(key)?, folder.fold_expression(value)?));
            }
            Expression::Dict { entries: folded }
        }
        Expression::Subscript { value, index } => Expression::Subscript {
            value: fold_boxed(folder, value)?,
            index: fold_boxed(folder, index)?,
        },
        Expression::Starred { value } => Expression::Starred {
            value: fold_boxed(folder, value)?,
        },
    };
    Ok(expr)
}

fn fold_boxed<F: Fold + ?Sized>(
    folder: &mut F,
    expr: Box<Expression>,
) -> Result<Box<Expression>, F::Error> {
    folder.fold_expression(*expr).map(Box::new)
}

fn fold_opt<F: Fold + ?Sized>(
    folder: &mut F,
    expr: Option<Expression>,
) -> Result<Option<Expression>, F::Error> {
    expr.map(|e| folder.fold_expression(e)).transpose()
}

fn fold_all<F: Fold + ?Sized>(
    folder: &mut F,
    exprs: Vec<Expression>,
) -> Result<Vec<Expression>, F::Error> {
    exprs.into_iter().map(|e| folder.fold_expression(e)).collect()
}
