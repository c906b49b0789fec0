//! Shutdown-contract simulator.
//!
//! Executes a generated shutdown method against a [`SimulatedClient`]
//! whose channel and HTTP client have scripted close outcomes, and reports
//! what the method did: which resources closed, which warnings fired,
//! whether the closed flag ended up set, and whether any error escaped.
//!
//! Only the constructs a shutdown body needs are executed: guards, `try`
//! with typed handlers, awaited `close`/`aclose` calls on the two
//! resources, `hasattr`, `show_warning`, identity comparisons, and
//! assignment of the closed flag. Anything else is a
//! [`TransformError::SimulationFailed`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use surfacegen_ast::{
    BoolOpKind, CompareOp, Constant, ExceptHandler, Expression, Keyword, MethodDefinition,
    Statement,
};
use tracing::debug;

use crate::error::{TransformError, TransformResult};
use crate::overrides::shutdown::{
    ANY_ERROR, ATTRIBUTE_ERROR, CHANNEL_ATTR, CLOSED_FLAG, GRACE_PARAM, HTTP_ATTR, WARNING_FN,
};

// ── Simulated Client ─────────────────────────────────────────────────

/// Scripted result of closing a resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseOutcome {
    Succeed,
    /// Close raises an error of the given kind.
    Raise(String),
}

impl CloseOutcome {
    pub fn raise(kind: impl Into<String>) -> Self {
        Self::Raise(kind.into())
    }
}

/// State of the RPC channel attribute on the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelState {
    /// The attribute was never bound.
    Absent,
    /// Bound to `None`.
    Unset,
    Open(CloseOutcome),
}

/// A client instance the shutdown method runs against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedClient {
    pub channel: ChannelState,
    pub http: CloseOutcome,
}

impl SimulatedClient {
    /// Channel and HTTP client both open and closing cleanly.
    pub fn healthy() -> Self {
        Self {
            channel: ChannelState::Open(CloseOutcome::Succeed),
            http: CloseOutcome::Succeed,
        }
    }

    pub fn with_channel(mut self, channel: ChannelState) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_http(mut self, http: CloseOutcome) -> Self {
        self.http = http;
        self
    }
}

impl Default for SimulatedClient {
    fn default() -> Self {
        Self::healthy()
    }
}

// ── Report ───────────────────────────────────────────────────────────

/// What one simulated shutdown did.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Final value of the closed flag.
    pub closed: bool,
    /// Warning messages, in emission order.
    pub warnings: Vec<String>,
    pub channel_closed: bool,
    pub http_closed: bool,
    /// Grace period the channel close received, when it was attempted.
    pub channel_grace: Option<f64>,
    /// Kind of the error that propagated out of the method, if any.
    pub escaped: Option<String>,
}

impl SimulationReport {
    /// The method completed without letting any error out and left the
    /// client marked closed.
    pub fn is_fail_soft(&self) -> bool {
        self.closed && self.escaped.is_none()
    }
}

// ── Simulator ────────────────────────────────────────────────────────

/// Runs shutdown methods against simulated clients.
pub struct ShutdownSimulator {
    client: SimulatedClient,
}

impl ShutdownSimulator {
    pub fn new(client: SimulatedClient) -> Self {
        Self { client }
    }

    /// Execute `method` with the given grace period.
    pub fn run(
        &self,
        method: &MethodDefinition,
        grace: Option<f64>,
    ) -> TransformResult<SimulationReport> {
        let mut locals = BTreeMap::new();
        for param in &method.params {
            let value = match param.name.as_str() {
                "self" => Value::Client,
                GRACE_PARAM => grace.map_or(Value::None, Value::Float),
                _ => Value::None,
            };
            locals.insert(param.name.clone(), value);
        }

        let mut machine = Machine {
            client: &self.client,
            locals,
            report: SimulationReport::default(),
        };
        match machine.exec_block(&method.body) {
            Ok(()) => {}
            Err(Interrupt::Raised(kind)) => machine.report.escaped = Some(kind),
            Err(Interrupt::Return) => {}
            Err(Interrupt::Fault(e)) => return Err(e),
        }

        debug!(
            method = %method.name,
            closed = machine.report.closed,
            warnings = machine.report.warnings.len(),
            escaped = ?machine.report.escaped,
            "Simulated shutdown"
        );
        Ok(machine.report)
    }
}

// ── Interpreter ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum Resource {
    Channel,
    Http,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Channel => write!(f, "{}", CHANNEL_ATTR),
            Self::Http => write!(f, "{}", HTTP_ATTR),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Client,
    /// A free name with no local binding, e.g. a builtin or a class.
    Global(String),
    Resource(Resource),
    /// `resource.close` before the call.
    BoundClose(Resource),
    /// Result of calling a close method; does nothing until awaited.
    Pending { resource: Resource, grace: Option<f64> },
}

impl Value {
    fn truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
            _ => true,
        }
    }
}

enum Interrupt {
    Raised(String),
    Return,
    Fault(TransformError),
}

type Exec<T> = Result<T, Interrupt>;

fn unsupported<T>(what: impl std::fmt::Display) -> Exec<T> {
    Err(Interrupt::Fault(TransformError::SimulationFailed(format!(
        "unsupported construct: {}",
        what
    ))))
}

struct Machine<'c> {
    client: &'c SimulatedClient,
    locals: BTreeMap<String, Value>,
    report: SimulationReport,
}

impl Machine<'_> {
    fn exec_block(&mut self, body: &[Statement]) -> Exec<()> {
        for stmt in body {
            self.exec(stmt)?;
        }
        Ok(())
    }

    fn exec(&mut self, stmt: &Statement) -> Exec<()> {
        match stmt {
            Statement::Pass => Ok(()),
            Statement::Block { body } => self.exec_block(body),
            Statement::Expr { value } => self.eval(value).map(|_| ()),
            Statement::Return { value } => {
                if let Some(value) = value {
                    self.eval(value)?;
                }
                Err(Interrupt::Return)
            }
            Statement::If { test, body, orelse } => {
                if self.eval(test)?.truthy() {
                    self.exec_block(body)
                } else {
                    self.exec_block(orelse)
                }
            }
            Statement::Assign { targets, value } => {
                let value = self.eval(value)?;
                for target in targets {
                    self.assign(target, value.clone())?;
                }
                Ok(())
            }
            Statement::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                let outcome = match self.exec_block(body) {
                    Ok(()) => self.exec_block(orelse),
                    Err(Interrupt::Raised(kind)) => match matching_handler(handlers, &kind) {
                        Some(handler) => self.exec_block(&handler.body),
                        None => Err(Interrupt::Raised(kind)),
                    },
                    Err(other) => Err(other),
                };
                self.exec_block(finalbody)?;
                outcome
            }
            Statement::Raise { exc } => match exc {
                Some(Expression::Name { id }) => Err(Interrupt::Raised(id.clone())),
                Some(call @ Expression::Call { .. }) => match call.call_target_name() {
                    Some(kind) => Err(Interrupt::Raised(kind.to_string())),
                    None => unsupported("raise of a computed error"),
                },
                _ => unsupported("bare or computed raise"),
            },
            other => unsupported(format!("statement '{}'", other.kind_name())),
        }
    }

    fn assign(&mut self, target: &Expression, value: Value) -> Exec<()> {
        match target {
            Expression::Name { id } => {
                self.locals.insert(id.clone(), value);
                Ok(())
            }
            Expression::Attribute { value: object, attr } => {
                if self.eval(object)? != Value::Client {
                    return unsupported(format!("assignment to '.{}' on a non-client", attr));
                }
                if attr != CLOSED_FLAG {
                    return unsupported(format!("assignment to client attribute '{}'", attr));
                }
                self.report.closed = value.truthy();
                Ok(())
            }
            other => unsupported(format!("assignment target '{}'", other.kind_name())),
        }
    }

    fn eval(&mut self, expr: &Expression) -> Exec<Value> {
        match expr {
            Expression::Constant { value } => Ok(match value {
                Constant::None => Value::None,
                Constant::Bool(b) => Value::Bool(*b),
                Constant::Int(i) => Value::Int(*i),
                Constant::Float(x) => Value::Float(*x),
                Constant::Str(s) => Value::Str(s.clone()),
            }),
            Expression::Name { id } => Ok(self
                .locals
                .get(id)
                .cloned()
                .unwrap_or_else(|| Value::Global(id.clone()))),
            Expression::Attribute { value, attr } => {
                let object = self.eval(value)?;
                self.attribute(object, attr)
            }
            Expression::Call {
                func,
                args,
                keywords,
            } => self.call(func, args, keywords),
            Expression::Await { value } => match self.eval(value)? {
                Value::Pending { resource, grace } => self.close(resource, grace),
                other => unsupported(format!("await of {:?}", other)),
            },
            Expression::Compare { left, op, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                match op {
                    CompareOp::Is | CompareOp::Eq => Ok(Value::Bool(left == right)),
                    CompareOp::IsNot | CompareOp::NotEq => Ok(Value::Bool(left != right)),
                    other => unsupported(format!("comparison '{}'", other)),
                }
            }
            Expression::BoolOp { op, values } => {
                let mut last = Value::Bool(matches!(op, BoolOpKind::And));
                for value in values {
                    last = self.eval(value)?;
                    let stop = match op {
                        BoolOpKind::And => !last.truthy(),
                        BoolOpKind::Or => last.truthy(),
                    };
                    if stop {
                        break;
                    }
                }
                Ok(last)
            }
            Expression::Not { operand } => Ok(Value::Bool(!self.eval(operand)?.truthy())),
            other => unsupported(format!("expression '{}'", other.kind_name())),
        }
    }

    fn attribute(&self, object: Value, attr: &str) -> Exec<Value> {
        match (object, attr) {
            (Value::Client, CHANNEL_ATTR) => match &self.client.channel {
                ChannelState::Absent => Err(Interrupt::Raised(ATTRIBUTE_ERROR.to_string())),
                ChannelState::Unset => Ok(Value::None),
                ChannelState::Open(_) => Ok(Value::Resource(Resource::Channel)),
            },
            (Value::Client, HTTP_ATTR) => Ok(Value::Resource(Resource::Http)),
            (Value::Client, CLOSED_FLAG) => Ok(Value::Bool(self.report.closed)),
            (Value::Resource(resource), "close" | "aclose") => Ok(Value::BoundClose(resource)),
            (Value::Client, _) | (Value::Resource(_), _) => {
                Err(Interrupt::Raised(ATTRIBUTE_ERROR.to_string()))
            }
            (other, attr) => unsupported(format!("attribute '{}' of {:?}", attr, other)),
        }
    }

    fn call(
        &mut self,
        func: &Expression,
        args: &[Expression],
        keywords: &[Keyword],
    ) -> Exec<Value> {
        let callee = self.eval(func)?;
        let mut positional = Vec::with_capacity(args.len());
        for arg in args {
            positional.push(self.eval(arg)?);
        }
        let mut named = BTreeMap::new();
        for keyword in keywords {
            let Some(arg) = &keyword.arg else {
                return unsupported("keyword splat");
            };
            named.insert(arg.as_str(), self.eval(&keyword.value)?);
        }

        match callee {
            Value::Global(name) if name == "hasattr" => match positional.as_slice() {
                [Value::Client, Value::Str(attr)] => Ok(Value::Bool(self.has_attribute(attr))),
                _ => unsupported("hasattr on a non-client"),
            },
            Value::Global(name) if name == WARNING_FN => {
                let message = match named.get("message").or(positional.first()) {
                    Some(Value::Str(message)) => message.clone(),
                    _ => return unsupported("warning without a message"),
                };
                debug!(message = %message, "Shutdown warning");
                self.report.warnings.push(message);
                Ok(Value::None)
            }
            Value::BoundClose(resource) => {
                let grace = match named.get("grace") {
                    None | Some(Value::None) => None,
                    Some(Value::Float(x)) => Some(*x),
                    Some(Value::Int(i)) => Some(*i as f64),
                    Some(other) => return unsupported(format!("grace value {:?}", other)),
                };
                Ok(Value::Pending { resource, grace })
            }
            other => unsupported(format!("call of {:?}", other)),
        }
    }

    fn has_attribute(&self, attr: &str) -> bool {
        match attr {
            CHANNEL_ATTR => self.client.channel != ChannelState::Absent,
            HTTP_ATTR | CLOSED_FLAG => true,
            _ => false,
        }
    }

    fn close(&mut self, resource: Resource, grace: Option<f64>) -> Exec<Value> {
        let client = self.client;
        let outcome = match resource {
            Resource::Channel => {
                self.report.channel_grace = grace;
                match &client.channel {
                    ChannelState::Open(outcome) => outcome,
                    _ => return Err(Interrupt::Raised(ATTRIBUTE_ERROR.to_string())),
                }
            }
            Resource::Http => &client.http,
        };
        match outcome {
            CloseOutcome::Succeed => {
                match resource {
                    Resource::Channel => self.report.channel_closed = true,
                    Resource::Http => self.report.http_closed = true,
                }
                debug!(resource = %resource, "Closed resource");
                Ok(Value::None)
            }
            CloseOutcome::Raise(kind) => {
                debug!(resource = %resource, error = %kind, "Close raised");
                Err(Interrupt::Raised(kind.clone()))
            }
        }
    }
}

/// First handler catching `kind`. An untyped handler or one for the
/// catch-all kind matches every error.
fn matching_handler<'h>(handlers: &'h [ExceptHandler], kind: &str) -> Option<&'h ExceptHandler> {
    handlers.iter().find(|h| match h.kind.as_deref() {
        None | Some(ANY_ERROR) => true,
        Some(k) => k == kind,
    })
}
