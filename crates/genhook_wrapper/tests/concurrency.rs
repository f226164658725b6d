//! Concurrent invocations on one context.
//!
//! A skip requested by one invocation's before handler must neither leak into
//! nor be cleared by another invocation running at the same time.


use std::time::Duration;

use genhook_context::event::EventName;
use genhook_context::registry::{HandlerError, PluginRegistry};
use genhook_context::GenerationContext;
use genhook_wrapper::invoker::from_sync;
use genhook_wrapper::wrap_event;
use test_utils::{CallLog, CountParams, artifact, context_with, recording_default};

const SKIPPED: EventName = EventName::CreateServerDockerCompose;
const PRODUCED: EventName = EventName::CreateServerDotEnv;

/// Registers a slow skipping handler on `SKIPPED` and a slow pass-through
/// handler on `PRODUCED`.
fn racing_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry
        .register_before(SKIPPED, "skip_slowly", |ctx: GenerationContext, params: CountParams| async move {
            ctx.set_skip_default_behavior(true);
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok::<_, HandlerError>(params)
        })
        .unwrap()
        .register_before(PRODUCED, "pass_slowly", |_ctx, params: CountParams| async move {
            tokio::time::sleep(Duration::from_millis(2)).await;
            Ok::<_, HandlerError>(params)
        })
        .unwrap();
    registry
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn skip_flag_does_not_leak_between_concurrent_events() {
    let (ctx, logger) = context_with(racing_registry());
    let skipped_calls = CallLog::new();
    let produced_calls = CallLog::new();

    for round in 0..20 {
        let (skipped, produced) = tokio::join!(
            wrap_event(
                &ctx,
                SKIPPED,
                from_sync(recording_default(&skipped_calls, vec![artifact("docker-compose.yml", "")])),
                CountParams::new(round),
            ),
            wrap_event(
                &ctx,
                PRODUCED,
                from_sync(recording_default(&produced_calls, vec![artifact(".env", "")])),
                CountParams::new(round),
            ),
        );

        assert!(skipped.is_empty(), "round {round}: skipped event produced output");
        assert_eq!(produced, vec![artifact(".env", "")], "round {round}");
    }

    assert_eq!(skipped_calls.count(), 0);
    assert_eq!(produced_calls.count(), 20);
    assert_eq!(ctx.module_count(), 20);
    assert!(logger.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn spawned_invocations_share_one_context() {
    let (ctx, _logger) = context_with(racing_registry());
    let produced_calls = CallLog::new();

    let mut tasks = Vec::new();
    for round in 0..8 {
        let ctx = ctx.clone();
        let event = if round % 2 == 0 { SKIPPED } else { PRODUCED };
        let default = recording_default(&produced_calls, vec![artifact("out.ts", "")]);
        tasks.push(tokio::spawn(async move {
            wrap_event(&ctx, event, from_sync(default), CountParams::new(round)).await
        }));
    }

    let mut produced = 0;
    for task in tasks {
        produced += task.await.unwrap().len();
    }

    assert_eq!(produced, 4);
    assert_eq!(produced_calls.count(), 4);
    assert_eq!(ctx.module_count(), 4);
}
