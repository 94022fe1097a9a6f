//! Property tests for the emission ordering contract.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use relay_events::{Emitter, EventKey, FnSink, Listener, ListenerError};

/// How a generated listener behaves.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    SyncOk,
    SyncErr,
    AsyncOk,
    AsyncErr,
}

impl Outcome {
    fn succeeds(self) -> bool {
        matches!(self, Outcome::SyncOk | Outcome::AsyncOk)
    }
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::SyncOk),
        Just(Outcome::SyncErr),
        Just(Outcome::AsyncOk),
        Just(Outcome::AsyncErr),
    ]
}

fn listener(idx: usize, outcome: Outcome) -> Listener<(), (), usize> {
    match outcome {
        Outcome::SyncOk => Listener::from_fn(move |_, _| Ok(idx)),
        Outcome::SyncErr => Listener::from_fn(move |_, _| Err(anyhow::anyhow!("listener {idx}"))),
        Outcome::AsyncOk => Listener::from_async(move |_, _| async move {
            tokio::task::yield_now().await;
            Ok(idx)
        }),
        Outcome::AsyncErr => Listener::from_async(move |_, _| async move {
            tokio::task::yield_now().await;
            Err(anyhow::anyhow!("listener {idx}"))
        }),
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Property: results hold exactly the successful listeners, in
    /// registration order, and every failure is reported once.
    #[test]
    fn results_follow_registration_order_of_successes(
        outcomes in prop::collection::vec(outcome(), 0..12)
    ) {
        let failures = Arc::new(AtomicUsize::new(0));
        let sink = {
            let failures = Arc::clone(&failures);
            FnSink(move |_: &EventKey, _: &ListenerError| {
                failures.fetch_add(1, Ordering::SeqCst);
            })
        };
        let emitter: Emitter<(), (), usize> = Emitter::builder().sink(sink).build();
        for (idx, outcome) in outcomes.iter().enumerate() {
            emitter.on("evt", listener(idx, *outcome));
        }

        let results = block_on(emitter.emit("evt", Vec::new()));

        let expected: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.succeeds())
            .map(|(idx, _)| idx)
            .collect();
        prop_assert_eq!(results, expected);
        prop_assert_eq!(
            failures.load(Ordering::SeqCst),
            outcomes.iter().filter(|o| !o.succeeds()).count()
        );
    }

    /// Property: registering one handle many times yields one invocation.
    #[test]
    fn repeated_registration_is_idempotent(repeats in 1usize..8) {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle: Listener<(), (), ()> = {
            let calls = Arc::clone(&calls);
            Listener::from_fn(move |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        };
        let emitter: Emitter<(), (), ()> = Emitter::new();
        for _ in 0..repeats {
            emitter.on("evt", handle.clone());
        }

        let results = block_on(emitter.emit("evt", Vec::new()));

        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// Property: removing one listener leaves the others and other keys intact.
    #[test]
    fn off_removes_exactly_one_listener(count in 1usize..8, victim in 0usize..8) {
        let victim = victim % count;
        let emitter: Emitter<(), (), usize> = Emitter::new();
        let handles: Vec<_> = (0..count).map(|idx| listener(idx, Outcome::SyncOk)).collect();
        for handle in &handles {
            emitter.on("a", handle.clone()).on("b", handle.clone());
        }

        emitter.off("a", Some(&handles[victim]));

        let a = block_on(emitter.emit("a", Vec::new()));
        let b = block_on(emitter.emit("b", Vec::new()));
        let expected: Vec<usize> = (0..count).filter(|idx| *idx != victim).collect();
        prop_assert_eq!(a, expected);
        prop_assert_eq!(b, (0..count).collect::<Vec<_>>());
    }
}
