//! Default implementations and the invoker that honors the skip flag.

use core::future::Future;

use futures::future;
use genhook_context::context::InvocationScope;
use genhook_context::registry::HandlerResult;
use genhook_context::Modules;

/// The generator's own implementation of an event.
///
/// Implemented for every `FnOnce(P) -> impl Future<Output = HandlerResult<Modules>>`.
/// Synchronous implementations are adapted with [`from_sync`].
pub trait DefaultBehavior<P>: Send {
    /// Produces the event's modules from its (possibly transformed) parameters.
    fn invoke(self, params: P) -> impl Future<Output = HandlerResult<Modules>> + Send;
}

impl<P, F, Fut> DefaultBehavior<P> for F
where
    F: FnOnce(P) -> Fut + Send,
    Fut: Future<Output = HandlerResult<Modules>> + Send,
{
    fn invoke(self, params: P) -> impl Future<Output = HandlerResult<Modules>> + Send {
        self(params)
    }
}

/// Adapts a synchronous default implementation, lifting its result into a
/// resolved future.
///
/// # Example
///
/// ```
/// use genhook_context::ModuleArtifact;
/// use genhook_wrapper::invoker::from_sync;
///
/// let default = from_sync(|entity: String| {
///     Ok(vec![ModuleArtifact::new(format!("{entity}.module.ts"), "")])
/// });
/// # let _ = default;
/// ```
pub fn from_sync<P, F>(default_fn: F) -> impl DefaultBehavior<P>
where
    F: FnOnce(P) -> HandlerResult<Modules> + Send,
{
    move |params: P| future::ready(default_fn(params))
}

/// Runs the default implementation unless a before handler asked to skip it.
///
/// Reads the flag of the invocation `scope`; a skipped default yields no
/// modules.
///
/// # Errors
///
/// Returns whatever the default implementation returns.
pub async fn default_behavior<P, D>(
    scope: &InvocationScope,
    default_fn: D,
    params: P,
) -> HandlerResult<Modules>
where
    D: DefaultBehavior<P>,
{
    if scope.skip_default_behavior() {
        return Ok(Vec::new());
    }
    default_fn.invoke(params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicBool, Ordering};
    use genhook_context::registry::{HandlerError, PluginRegistry};
    use genhook_context::{GenerationContext, ModuleArtifact};

    fn single(path: &str) -> Modules {
        vec![ModuleArtifact::new(path, "")]
    }

    #[tokio::test]
    async fn runs_default_when_flag_is_clear() {
        let ctx = GenerationContext::new(PluginRegistry::new());
        let scope = ctx.begin_invocation();

        let modules = default_behavior(&scope, from_sync(|path: String| Ok(single(&path))), "a.ts".to_owned())
            .await
            .unwrap();
        assert_eq!(modules, single("a.ts"));
    }

    #[tokio::test]
    async fn skipped_default_is_never_called() {
        let ctx = GenerationContext::new(PluginRegistry::new());
        let scope = ctx.begin_invocation();
        scope.context().set_skip_default_behavior(true);

        let called = AtomicBool::new(false);
        let modules = default_behavior(
            &scope,
            from_sync(|_: ()| {
                called.store(true, Ordering::SeqCst);
                Ok(single("never.ts"))
            }),
            (),
        )
        .await
        .unwrap();

        assert!(modules.is_empty());
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn async_default_failure_is_returned() {
        let ctx = GenerationContext::new(PluginRegistry::new());
        let scope = ctx.begin_invocation();

        let err = default_behavior(
            &scope,
            |name: String| async move {
                Err::<Modules, HandlerError>(format!("cannot render {name}").into())
            },
            "Order".to_owned(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "cannot render Order");
    }

    #[tokio::test]
    async fn flag_raised_on_another_handle_is_ignored() {
        let ctx = GenerationContext::new(PluginRegistry::new());
        let scope = ctx.begin_invocation();
        ctx.set_skip_default_behavior(true);

        let modules = default_behavior(&scope, from_sync(|path: String| Ok(single(&path))), "b.ts".to_owned())
            .await
            .unwrap();
        assert_eq!(modules, single("b.ts"));
    }
}
