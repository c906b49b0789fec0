//! Shutdown override: a fixed, fail-soft `close` for the non-blocking
//! client.
//!
//! The generated body is never derived from the blocking `close`. It
//! releases the RPC channel and the HTTP client independently, turns every
//! close failure into a warning, and always ends by setting the closed
//! flag:
//!
//! ```text
//! async def close(self, grpc_grace: Optional[float] = None, **kwargs: Any) -> None:
//!     if hasattr(self, "_grpc_channel") and self._grpc_channel is not None:
//!         try:
//!             await self._grpc_channel.close(grace=grpc_grace)
//!         except AttributeError:
//!             show_warning(message=..., category=UserWarning, stacklevel=5)
//!         except RuntimeError:
//!             pass
//!     try:
//!         await self.http.aclose()
//!     except Exception:
//!         show_warning(message=..., category=UserWarning, stacklevel=5)
//!     self._closed = True
//! ```

use surfacegen_ast::{
    CompareOp, ExceptHandler, Expression, Keyword, MethodDefinition, ParamKind, Parameter,
    Statement,
};

use crate::classify::SHUTDOWN;

/// Attribute holding the non-blocking RPC channel.
pub const CHANNEL_ATTR: &str = "_grpc_channel";
/// Attribute holding the HTTP transport client.
pub const HTTP_ATTR: &str = "http";
/// Attribute recording that the client has been shut down.
pub const CLOSED_FLAG: &str = "_closed";
/// Grace-period parameter passed through to the channel close.
pub const GRACE_PARAM: &str = "grpc_grace";
/// Function used to emit non-fatal warnings.
pub const WARNING_FN: &str = "show_warning";

/// Error kind raised when the channel object has lost its close method.
pub const ATTRIBUTE_ERROR: &str = "AttributeError";
/// Error kind raised when the channel was already torn down.
pub const RUNTIME_ERROR: &str = "RuntimeError";
/// Catch-all error kind.
pub const ANY_ERROR: &str = "Exception";

pub const CHANNEL_WARNING: &str =
    "Unable to close grpc_channel. Connection was interrupted on the server side";
pub const HTTP_WARNING: &str =
    "Unable to close http connection. Connection was interrupted on the server side";

/// Build the replacement shutdown method.
pub fn shutdown_template() -> MethodDefinition {
    MethodDefinition::new(SHUTDOWN)
        .with_param(
            Parameter::new(GRACE_PARAM)
                .annotated("Optional[float]")
                .with_default(Expression::none()),
        )
        .with_param(
            Parameter::new("kwargs")
                .with_kind(ParamKind::VarKeyword)
                .annotated("Any"),
        )
        .with_returns("None")
        .with_body(vec![
            close_channel(),
            close_http(),
            Statement::assign(Expression::self_attr(CLOSED_FLAG), Expression::bool(true)),
        ])
        .suspending()
}

fn close_channel() -> Statement {
    let present = Expression::and(vec![
        Expression::name("hasattr").call(vec![
            Expression::name("self"),
            Expression::string(CHANNEL_ATTR),
        ]),
        Expression::self_attr(CHANNEL_ATTR).compare(CompareOp::IsNot, Expression::none()),
    ]);
    let close = Expression::self_attr(CHANNEL_ATTR)
        .attr("close")
        .call_with(vec![], vec![Keyword::new("grace", Expression::name(GRACE_PARAM))])
        .awaited();

    Statement::if_then(
        present,
        vec![Statement::try_except(
            vec![Statement::expr(close)],
            vec![
                ExceptHandler::new(ATTRIBUTE_ERROR, vec![warn(CHANNEL_WARNING)]),
                ExceptHandler::new(RUNTIME_ERROR, vec![Statement::Pass]),
            ],
        )],
    )
}

fn close_http() -> Statement {
    let close = Expression::self_attr(HTTP_ATTR)
        .attr("aclose")
        .call(vec![])
        .awaited();
    Statement::try_except(
        vec![Statement::expr(close)],
        vec![ExceptHandler::new(ANY_ERROR, vec![warn(HTTP_WARNING)])],
    )
}

fn warn(message: &str) -> Statement {
    Statement::expr(Expression::name(WARNING_FN).call_with(
        vec![],
        vec![
            Keyword::new("message", Expression::string(message)),
            Keyword::new("category", Expression::name("UserWarning")),
            Keyword::new("stacklevel", Expression::int(5)),
        ],
    ))
}
