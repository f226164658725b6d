//! Pipeline composers for before and after handlers.
//!
//! Both composers fold an ordered handler list left to right: each handler
//! receives the previous handler's output, the first one receives the seed.
//! An empty list returns the seed unchanged. No handler is skipped or
//! reordered, and the first failure stops the fold.
//!
//! ```text
//! before:  params ──▶ h1 ──▶ h2 ──▶ … ──▶ hn ──▶ params'
//! after:   modules ─▶ h1 ──▶ h2 ──▶ … ──▶ hn ──▶ modules'
//!                      ▲      ▲             ▲
//!                      └──────┴── original args ┘
//! ```

use std::sync::Arc;

use genhook_context::registry::{AfterHandler, BeforeHandler, HandlerError};
use genhook_context::{GenerationContext, Modules};

/// A handler failure inside a composed pipeline.
#[derive(Debug, thiserror::Error)]
#[error("handler '{handler}' failed: {cause}")]
pub struct PipeError {
    /// Registration name of the failing handler.
    pub handler: String,
    /// What the handler returned.
    #[source]
    pub cause: HandlerError,
}

// ─────────────────────────────────────────────────────────────────────────────
// BeforePipe
// ─────────────────────────────────────────────────────────────────────────────

/// Composes before handlers into a single parameter transformation.
#[must_use]
pub fn before_events_pipe<P>(handlers: &[BeforeHandler<P>]) -> BeforePipe<'_, P> {
    BeforePipe { handlers }
}

/// Before handlers composed by [`before_events_pipe`].
pub struct BeforePipe<'h, P> {
    handlers: &'h [BeforeHandler<P>],
}

impl<P: Send + 'static> BeforePipe<'_, P> {
    /// Runs every handler in order, seeded with `params`.
    ///
    /// # Errors
    ///
    /// Returns the first handler failure.
    pub async fn run(&self, ctx: &GenerationContext, params: P) -> Result<P, PipeError> {
        let mut params = params;
        for handler in self.handlers {
            params = handler
                .invoke(ctx.clone(), params)
                .await
                .map_err(|cause| PipeError {
                    handler: handler.name().to_owned(),
                    cause,
                })?;
        }
        Ok(params)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AfterPipe
// ─────────────────────────────────────────────────────────────────────────────

/// Composes after handlers into a single module transformation.
#[must_use]
pub fn after_events_pipe<P>(handlers: &[AfterHandler<P>]) -> AfterPipe<'_, P> {
    AfterPipe { handlers }
}

/// After handlers composed by [`after_events_pipe`].
pub struct AfterPipe<'h, P> {
    handlers: &'h [AfterHandler<P>],
}

impl<P: Send + Sync + 'static> AfterPipe<'_, P> {
    /// Runs every handler in order, seeded with `modules`.
    ///
    /// Each handler also receives `args`, the event's original parameters.
    ///
    /// # Errors
    ///
    /// Returns the first handler failure.
    pub async fn run(
        &self,
        ctx: &GenerationContext,
        args: &Arc<P>,
        modules: Modules,
    ) -> Result<Modules, PipeError> {
        let mut modules = modules;
        for handler in self.handlers {
            modules = handler
                .invoke(ctx.clone(), Arc::clone(args), modules)
                .await
                .map_err(|cause| PipeError {
                    handler: handler.name().to_owned(),
                    cause,
                })?;
        }
        Ok(modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genhook_context::registry::{HandlerResult, PluginRegistry};
    use genhook_context::ModuleArtifact;
    use std::sync::Mutex;

    fn context() -> GenerationContext {
        GenerationContext::new(PluginRegistry::new())
    }

    fn push(tag: &'static str) -> BeforeHandler<Vec<&'static str>> {
        BeforeHandler::from_sync(tag, move |_ctx, mut trail: Vec<&'static str>| {
            trail.push(tag);
            Ok(trail)
        })
    }

    #[tokio::test]
    async fn empty_before_pipe_returns_seed() {
        let handlers: Vec<BeforeHandler<u32>> = Vec::new();
        let result = before_events_pipe(&handlers).run(&context(), 7).await.unwrap();
        assert_eq!(result, 7);
    }

    #[tokio::test]
    async fn before_pipe_feeds_each_output_forward() {
        let handlers = vec![push("first"), push("second"), push("third")];
        let trail = before_events_pipe(&handlers)
            .run(&context(), vec!["seed"])
            .await
            .unwrap();
        assert_eq!(trail, vec!["seed", "first", "second", "third"]);
    }

    #[tokio::test]
    async fn before_pipe_mixes_sync_and_async_handlers() {
        let handlers = vec![
            BeforeHandler::from_sync("add", |_ctx, n: i64| Ok(n + 3)),
            BeforeHandler::new("mul", |_ctx, n: i64| async move {
                tokio::task::yield_now().await;
                Ok::<_, HandlerError>(n * 10)
            }),
            BeforeHandler::from_sync("sub", |_ctx, n: i64| Ok(n - 1)),
        ];

        let result = before_events_pipe(&handlers).run(&context(), 1).await.unwrap();
        assert_eq!(result, 39);
    }

    #[tokio::test]
    async fn before_pipe_stops_at_first_failure() {
        let reached = Arc::new(Mutex::new(Vec::new()));
        let after_failure = Arc::clone(&reached);

        let handlers = vec![
            push("ok"),
            BeforeHandler::from_sync("broken", |_ctx, _trail: Vec<&'static str>| {
                Err("broken handler".into())
            }),
            BeforeHandler::from_sync("unreached", move |_ctx, trail: Vec<&'static str>| {
                after_failure.lock().unwrap().push("unreached");
                Ok(trail)
            }),
        ];

        let err = before_events_pipe(&handlers)
            .run(&context(), Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.handler, "broken");
        assert_eq!(err.cause.to_string(), "broken handler");
        assert!(reached.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn after_pipe_receives_original_args() {
        fn tag(
            _ctx: &GenerationContext,
            args: &String,
            mut modules: Modules,
        ) -> HandlerResult<Modules> {
            let n = modules.len();
            modules.push(ModuleArtifact::new(format!("{args}/{n}"), ""));
            Ok(modules)
        }

        let handlers = vec![
            AfterHandler::from_sync("one", tag),
            AfterHandler::from_sync("two", tag),
        ];
        let args = Arc::new(String::from("user"));
        let seed = vec![ModuleArtifact::new("user/0", "")];

        let modules = after_events_pipe(&handlers)
            .run(&context(), &args, seed)
            .await
            .unwrap();

        let paths: Vec<_> = modules.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["user/0", "user/1", "user/2"]);
    }

    #[tokio::test]
    async fn empty_after_pipe_returns_seed() {
        let handlers: Vec<AfterHandler<()>> = Vec::new();
        let seed = vec![ModuleArtifact::new("a", "x")];
        let modules = after_events_pipe(&handlers)
            .run(&context(), &Arc::new(()), seed.clone())
            .await
            .unwrap();
        assert_eq!(modules, seed);
    }
}
