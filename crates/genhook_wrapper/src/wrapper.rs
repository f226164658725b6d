//! The event wrapper.
//!
//! Every customizable step of a generation run goes through [`wrap_event`]:
//!
//! 1. with no handlers for the event, run the default implementation and
//!    return its modules as they are
//! 2. otherwise begin an invocation with a cleared skip default behavior
//!    flag and run the before pipe over the parameters
//! 3. run the default implementation on the transformed parameters, unless
//!    a before handler raised the skip flag
//! 4. run the after pipe over the modules, each handler seeing the original
//!    parameters
//! 5. append the final modules to the context and return them
//!
//! Handlers receive the invocation's own handle (see
//! [`GenerationContext::begin_invocation`]), so any handler may wrap nested
//! events on it.
//!
//! [`wrap_event`] never fails: any error or panic is logged through the
//! context's logger and the invocation yields no modules.
//! [`try_wrap_event`] runs the same steps and returns the failure instead.

use std::sync::Arc;

use futures::FutureExt;
use genhook_context::registry::HookPhase;
use genhook_context::{EventName, GenerationContext, Modules};

use crate::error::{WrapError, WrapErrorKind};
use crate::invoker::{DefaultBehavior, default_behavior};
use crate::pipe::{after_events_pipe, before_events_pipe};

/// Runs one event: before handlers, default implementation, after handlers.
///
/// Returns the event's final modules, or an empty sequence if any step
/// failed. Failures are reported through [`GenerationContext::logger`] with
/// the message `failed to execute plugin event <event>` and the payload of
/// [`WrapError::payload`].
///
/// # Example
///
/// ```
/// use genhook_context::prelude::*;
/// use genhook_wrapper::invoker::from_sync;
/// use genhook_wrapper::wrap_event;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut registry = PluginRegistry::new();
/// registry
///     .register_after_sync(EventName::CreateSeed, "banner", |_ctx, _args: &String, mut modules| {
///         for module in &mut modules {
///             module.content.insert_str(0, "// generated\n");
///         }
///         Ok(modules)
///     })
///     .unwrap();
///
/// let ctx = GenerationContext::new(registry);
/// let modules = wrap_event(
///     &ctx,
///     EventName::CreateSeed,
///     from_sync(|entity: String| Ok(vec![ModuleArtifact::new("scripts/seed.ts", format!("seed({entity});"))])),
///     "User".to_owned(),
/// )
/// .await;
///
/// assert_eq!(modules[0].content, "// generated\nseed(User);");
/// assert_eq!(ctx.module_count(), 1);
/// # });
/// ```
pub async fn wrap_event<P, D>(
    ctx: &GenerationContext,
    event: EventName,
    default_fn: D,
    args: P,
) -> Modules
where
    P: Clone + Send + Sync + 'static,
    D: DefaultBehavior<P>,
{
    let outcome = core::panic::AssertUnwindSafe(try_wrap_event(ctx, event, default_fn, args))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(WrapError::from_panic(event, panic)));

    match outcome {
        Ok(modules) => modules,
        Err(error) => {
            ctx.logger()
                .error(&format!("failed to execute plugin event {event}"), &error.payload());
            Vec::new()
        }
    }
}

/// Runs one event like [`wrap_event`], returning failures to the caller.
///
/// On failure nothing is appended to the context. Panics are not caught.
///
/// # Errors
///
/// Returns a [`WrapError`] tagged with the step that failed.
pub async fn try_wrap_event<P, D>(
    ctx: &GenerationContext,
    event: EventName,
    default_fn: D,
    args: P,
) -> Result<Modules, WrapError>
where
    P: Clone + Send + Sync + 'static,
    D: DefaultBehavior<P>,
{
    let hooks = match ctx.registry().hooks::<P>(event) {
        Ok(Some(hooks)) => hooks,
        Ok(None) => {
            tracing::trace!(%event, "no plugins for event, running default behavior");
            return default_fn
                .invoke(args)
                .await
                .map_err(|cause| WrapError::new(event, WrapErrorKind::DefaultBehavior, cause));
        }
        Err(err) => {
            return Err(WrapError::new(event, WrapErrorKind::Unexpected, Box::new(err)));
        }
    };

    tracing::debug!(
        %event,
        before = hooks.before().len(),
        after = hooks.after().len(),
        "executing plugin event"
    );

    let scope = ctx.begin_invocation();
    let original = Arc::new(args.clone());

    let params = before_events_pipe(hooks.before())
        .run(scope.context(), args)
        .await
        .map_err(|err| WrapError::from_pipe(event, HookPhase::Before, err))?;

    let modules = default_behavior(&scope, default_fn, params)
        .await
        .map_err(|cause| WrapError::new(event, WrapErrorKind::DefaultBehavior, cause))?;

    let modules = after_events_pipe(hooks.after())
        .run(scope.context(), &original, modules)
        .await
        .map_err(|err| WrapError::from_pipe(event, HookPhase::After, err))?;

    ctx.append_modules(&modules);
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::from_sync;
    use genhook_context::logger::MemoryLogger;
    use genhook_context::registry::{HandlerError, PluginRegistry};
    use genhook_context::ModuleArtifact;

    fn render(entity: String) -> Result<Modules, HandlerError> {
        Ok(vec![ModuleArtifact::new(
            format!("{entity}.module.ts"),
            format!("export class {entity}Module {{}}"),
        )])
    }

    #[tokio::test]
    async fn fast_path_returns_default_output_untouched() {
        let ctx = GenerationContext::new(PluginRegistry::new());

        let modules = wrap_event(&ctx, EventName::CreateEntityModule, from_sync(render), "User".to_owned()).await;

        assert_eq!(modules, render("User".to_owned()).unwrap());
        assert_eq!(ctx.module_count(), 0);
    }

    #[tokio::test]
    async fn fast_path_ignores_stale_skip_flag() {
        let ctx = GenerationContext::new(PluginRegistry::new());
        ctx.set_skip_default_behavior(true);

        let modules = wrap_event(&ctx, EventName::CreateEntityModule, from_sync(render), "User".to_owned()).await;

        assert_eq!(modules.len(), 1);
    }

    #[tokio::test]
    async fn hooked_path_ignores_flag_of_the_caller_handle() {
        let mut registry = PluginRegistry::new();
        registry
            .register_after_sync(EventName::CreateEntityModule, "noop", |_ctx, _entity: &String, modules| {
                Ok(modules)
            })
            .unwrap();
        let ctx = GenerationContext::new(registry);
        ctx.set_skip_default_behavior(true);

        let modules = wrap_event(&ctx, EventName::CreateEntityModule, from_sync(render), "User".to_owned()).await;

        assert_eq!(modules, render("User".to_owned()).unwrap());
        // The invocation used its own flag; the caller's is left as it was.
        assert!(ctx.skip_default_behavior());
    }

    #[tokio::test]
    async fn hooked_event_appends_to_context() {
        let mut registry = PluginRegistry::new();
        registry
            .register_before_sync(EventName::CreateEntityModule, "upper", |_ctx, entity: String| {
                Ok(entity.to_uppercase())
            })
            .unwrap();
        let ctx = GenerationContext::new(registry);

        let modules = wrap_event(&ctx, EventName::CreateEntityModule, from_sync(render), "user".to_owned()).await;

        assert_eq!(modules[0].path, "USER.module.ts");
        assert_eq!(ctx.modules(), modules);
    }

    #[tokio::test]
    async fn try_wrap_event_tags_the_failing_step() {
        let mut registry = PluginRegistry::new();
        registry
            .register_after_sync(EventName::CreateEntityModule, "strict", |_ctx, _args: &String, _modules| {
                Err("rejected".into())
            })
            .unwrap();
        let ctx = GenerationContext::new(registry);

        let err = try_wrap_event(&ctx, EventName::CreateEntityModule, from_sync(render), "User".to_owned())
            .await
            .unwrap_err();

        assert_eq!(err.event(), EventName::CreateEntityModule);
        assert_eq!(
            err.kind(),
            &WrapErrorKind::AfterPlugin {
                handler: "strict".to_owned()
            }
        );
        assert_eq!(ctx.module_count(), 0);
    }

    #[tokio::test]
    async fn mismatched_params_are_unexpected() {
        let mut registry = PluginRegistry::new();
        registry
            .register_before_sync(EventName::CreateEntityModule, "typed", |_ctx, n: u32| Ok(n))
            .unwrap();
        let ctx = GenerationContext::new(registry);

        let err = try_wrap_event(&ctx, EventName::CreateEntityModule, from_sync(render), "User".to_owned())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &WrapErrorKind::Unexpected);
    }

    #[tokio::test]
    async fn fast_path_failure_is_logged() {
        let logger = Arc::new(MemoryLogger::new());
        let ctx = GenerationContext::builder()
            .with_logger(Arc::clone(&logger))
            .build();

        let modules = wrap_event(
            &ctx,
            EventName::CreateSwagger,
            from_sync(|_: ()| Err("swagger template missing".into())),
            (),
        )
        .await;

        assert!(modules.is_empty());
        let errors = logger.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "failed to execute plugin event CreateSwagger");
        assert_eq!(errors[0].payload["kind"], "default_behavior");
    }
}
