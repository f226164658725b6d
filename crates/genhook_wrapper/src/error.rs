//! Tagged failures of a wrapped event.
//!
//! A [`WrapError`] records which step of an event invocation failed, the
//! event, and the underlying cause. [`WrapError::payload`] renders it as the
//! structured log payload the event wrapper reports through the context's
//! logger.

use core::any::Any;
use core::fmt;

use genhook_context::registry::{HandlerError, HookPhase};
use genhook_context::EventName;
use serde::Serialize;
use serde_json::Value;

use crate::pipe::PipeError;

/// The step of an event invocation that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WrapErrorKind {
    /// A before handler failed.
    BeforePlugin {
        /// Registration name of the failing handler.
        handler: String,
    },
    /// The default implementation failed.
    DefaultBehavior,
    /// An after handler failed.
    AfterPlugin {
        /// Registration name of the failing handler.
        handler: String,
    },
    /// Anything else: registry lookups, panics.
    Unexpected,
}

impl fmt::Display for WrapErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapErrorKind::BeforePlugin { handler } => {
                write!(f, "before plugin '{handler}' failed")
            }
            WrapErrorKind::DefaultBehavior => write!(f, "default behavior failed"),
            WrapErrorKind::AfterPlugin { handler } => write!(f, "after plugin '{handler}' failed"),
            WrapErrorKind::Unexpected => write!(f, "unexpected failure"),
        }
    }
}

/// Failure of one event invocation.
#[derive(Debug, thiserror::Error)]
#[error("failed to execute plugin event {event}: {kind}")]
pub struct WrapError {
    event: EventName,
    kind: WrapErrorKind,
    #[source]
    cause: HandlerError,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    event: EventName,
    #[serde(flatten)]
    kind: &'a WrapErrorKind,
    error_message: String,
    causes: Vec<String>,
}

impl WrapError {
    /// Creates an error for the given event, step and cause.
    #[must_use]
    pub fn new(event: EventName, kind: WrapErrorKind, cause: HandlerError) -> Self {
        Self { event, kind, cause }
    }

    pub(crate) fn from_pipe(event: EventName, phase: HookPhase, error: PipeError) -> Self {
        let PipeError { handler, cause } = error;
        let kind = match phase {
            HookPhase::Before => WrapErrorKind::BeforePlugin { handler },
            HookPhase::After => WrapErrorKind::AfterPlugin { handler },
        };
        Self::new(event, kind, cause)
    }

    pub(crate) fn from_panic(event: EventName, payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        Self::new(event, WrapErrorKind::Unexpected, Box::new(Panicked(message)))
    }

    /// The event whose invocation failed.
    #[must_use]
    pub fn event(&self) -> EventName {
        self.event
    }

    /// The step that failed.
    #[must_use]
    pub fn kind(&self) -> &WrapErrorKind {
        &self.kind
    }

    /// The underlying cause.
    #[must_use]
    pub fn cause(&self) -> &(dyn core::error::Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// Renders the structured log payload for this failure.
    ///
    /// ```json
    /// {
    ///   "event": "CreateEntityModule",
    ///   "kind": "before_plugin",
    ///   "handler": "acme::rename",
    ///   "errorMessage": "entity name is empty",
    ///   "causes": []
    /// }
    /// ```
    #[must_use]
    pub fn payload(&self) -> Value {
        let mut causes = Vec::new();
        let mut source = self.cause.source();
        while let Some(err) = source {
            causes.push(err.to_string());
            source = err.source();
        }

        let payload = Payload {
            event: self.event,
            kind: &self.kind,
            error_message: self.cause.to_string(),
            causes,
        };
        serde_json::to_value(payload).unwrap_or(Value::Null)
    }
}

/// A panic caught inside a wrapped event.
#[derive(Debug, thiserror::Error)]
#[error("panicked: {0}")]
struct Panicked(String);
