//! Indented text rendering of trees.
//!
//! Produces source-like text for logs, diagnostics, and test assertions.
//! This is not a faithful source printer: operator precedence is not
//! parenthesised and string escapes follow Rust's `Debug` rules.

use std::fmt::{self, Display, Formatter, Write};

use crate::class::{ClassDefinition, MethodDefinition, ParamKind, Parameter};
use crate::expr::{Constant, Expression, Keyword};
use crate::stmt::Statement;

const INDENT: &str = "    ";

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}={}", arg, self.value),
            None => write!(f, "**{}", self.value),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { id } => write!(f, "{}", id),
            Self::Constant { value } => write!(f, "{}", value),
            Self::Attribute { value, attr } => write!(f, "{}.{}", value, attr),
            Self::Call {
                func,
                args,
                keywords,
            } => {
                write!(f, "{}(", func)?;
                let mut first = true;
                for arg in args {
                    separate(f, &mut first)?;
                    write!(f, "{}", arg)?;
                }
                for kw in keywords {
                    separate(f, &mut first)?;
                    write!(f, "{}", kw)?;
                }
                write!(f, ")")
            }
            Self::Await { value } => write!(f, "await {}", value),
            Self::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Self::BoolOp { op, values } => {
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op)?;
                    }
                    write!(f, "{}", v)?;
                }
                Ok(())
            }
            Self::Not { operand } => write!(f, "not {}", operand),
            Self::BinOp { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Self::UnaryOp { op, operand } => write!(f, "{}{}", op, operand),
            Self::List { elts } => {
                write!(f, "[")?;
                write_joined(f, elts)?;
                write!(f, "]")
            }
            Self::Tuple { elts } => {
                write!(f, "(")?;
                write_joined(f, elts)?;
                if elts.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Self::Dict { entries } => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Self::Subscript { value, index } => write!(f, "{}[{}]", value, index),
            Self::Starred { value } => write!(f, "*{}", value),
            Self::Opaque { source } => f.write_str(source),
        }
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParamKind::VarPositional => write!(f, "*")?,
            ParamKind::VarKeyword => write!(f, "**")?,
            ParamKind::Positional | ParamKind::KeywordOnly => {}
        }
        write!(f, "{}", self.name)?;
        if let Some(ann) = &self.annotation {
            write!(f, ": {}", ann)?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_statement(&mut out, self, 0)?;
        f.write_str(out.trim_end_matches('\n'))
    }
}

impl Display for MethodDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_method(&mut out, self, 0)?;
        f.write_str(out.trim_end_matches('\n'))
    }
}

impl Display for ClassDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write!(out, "class {}", self.name)?;
        if !self.bases.is_empty() {
            write!(out, "({})", self.bases.join(", "))?;
        }
        writeln!(out, ":")?;
        if self.methods.is_empty() {
            writeln!(out, "{}pass", INDENT)?;
        }
        for (i, method) in self.methods.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            write_method(&mut out, method, 1)?;
        }
        f.write_str(out.trim_end_matches('\n'))
    }
}

fn write_method(out: &mut String, method: &MethodDefinition, depth: usize) -> fmt::Result {
    pad(out, depth)?;
    if method.is_async {
        write!(out, "async ")?;
    }
    write!(out, "def {}(", method.name)?;
    let mut first = true;
    let mut star_emitted = false;
    for param in &method.params {
        if param.kind == ParamKind::VarPositional {
            star_emitted = true;
        }
        if param.kind == ParamKind::KeywordOnly && !star_emitted {
            separate_into(out, &mut first)?;
            write!(out, "*")?;
            star_emitted = true;
        }
        separate_into(out, &mut first)?;
        write!(out, "{}", param)?;
    }
    write!(out, ")")?;
    if let Some(ret) = &method.returns {
        write!(out, " -> {}", ret)?;
    }
    writeln!(out, ":")?;
    write_block(out, &method.body, depth + 1)
}

fn write_block(out: &mut String, body: &[Statement], depth: usize) -> fmt::Result {
    if body.is_empty() {
        pad(out, depth)?;
        return writeln!(out, "pass");
    }
    for stmt in body {
        write_statement(out, stmt, depth)?;
    }
    Ok(())
}

fn write_statement(out: &mut String, stmt: &Statement, depth: usize) -> fmt::Result {
    match stmt {
        Statement::Assign { targets, value } => {
            pad(out, depth)?;
            for target in targets {
                write!(out, "{} = ", target)?;
            }
            writeln!(out, "{}", value)
        }
        Statement::AnnAssign {
            target,
            annotation,
            value,
        } => {
            pad(out, depth)?;
            write!(out, "{}: {}", target, annotation)?;
            if let Some(v) = value {
                write!(out, " = {}", v)?;
            }
            writeln!(out)
        }
        Statement::AugAssign { target, op, value } => {
            pad(out, depth)?;
            writeln!(out, "{} {}= {}", target, op, value)
        }
        Statement::Expr { value } => {
            pad(out, depth)?;
            writeln!(out, "{}", value)
        }
        Statement::Return { value } => {
            pad(out, depth)?;
            match value {
                Some(v) => writeln!(out, "return {}", v),
                None => writeln!(out, "return"),
            }
        }
        Statement::If { test, body, orelse } => {
            pad(out, depth)?;
            writeln!(out, "if {}:", test)?;
            write_block(out, body, depth + 1)?;
            if !orelse.is_empty() {
                pad(out, depth)?;
                writeln!(out, "else:")?;
                write_block(out, orelse, depth + 1)?;
            }
            Ok(())
        }
        Statement::While { test, body } => {
            pad(out, depth)?;
            writeln!(out, "while {}:", test)?;
            write_block(out, body, depth + 1)
        }
        Statement::For { target, iter, body } => {
            pad(out, depth)?;
            writeln!(out, "for {} in {}:", target, iter)?;
            write_block(out, body, depth + 1)
        }
        Statement::With { items, body } => {
            pad(out, depth)?;
            write!(out, "with ")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write!(out, "{}", item.context)?;
                if let Some(binding) = &item.binding {
                    write!(out, " as {}", binding)?;
                }
            }
            writeln!(out, ":")?;
            write_block(out, body, depth + 1)
        }
        Statement::Try {
            body,
            handlers,
            orelse,
            finalbody,
        } => {
            pad(out, depth)?;
            writeln!(out, "try:")?;
            write_block(out, body, depth + 1)?;
            for handler in handlers {
                pad(out, depth)?;
                match (&handler.kind, &handler.name) {
                    (Some(kind), Some(name)) => writeln!(out, "except {} as {}:", kind, name)?,
                    (Some(kind), None) => writeln!(out, "except {}:", kind)?,
                    (None, _) => writeln!(out, "except:")?,
                }
                write_block(out, &handler.body, depth + 1)?;
            }
            if !orelse.is_empty() {
                pad(out, depth)?;
                writeln!(out, "else:")?;
                write_block(out, orelse, depth + 1)?;
            }
            if !finalbody.is_empty() {
                pad(out, depth)?;
                writeln!(out, "finally:")?;
                write_block(out, finalbody, depth + 1)?;
            }
            Ok(())
        }
        Statement::Raise { exc } => {
            pad(out, depth)?;
            match exc {
                Some(e) => writeln!(out, "raise {}", e),
                None => writeln!(out, "raise"),
            }
        }
        Statement::Pass => {
            pad(out, depth)?;
            writeln!(out, "pass")
        }
        Statement::Break => {
            pad(out, depth)?;
            writeln!(out, "break")
        }
        Statement::Continue => {
            pad(out, depth)?;
            writeln!(out, "continue")
        }
        Statement::Block { body } => write_block(out, body, depth),
        // Multi-line source is re-indented line by line.
        Statement::Opaque { source } => {
            for line in source.lines() {
                pad(out, depth)?;
                writeln!(out, "{}", line)?;
            }
            Ok(())
        }
    }
}

fn pad(out: &mut String, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn separate(f: &mut Formatter<'_>, first: &mut bool) -> fmt::Result {
    if !std::mem::replace(first, false) {
        write!(f, ", ")?;
    }
    Ok(())
}

fn separate_into(out: &mut String, first: &mut bool) -> fmt::Result {
    if !std::mem::replace(first, false) {
        out.write_str(", ")?;
    }
    Ok(())
}

fn write_joined(f: &mut Formatter<'_>, elts: &[Expression]) -> fmt::Result {
    for (i, e) in elts.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", e)?;
    }
    Ok(())
}
