use crate::State;

mod dedup_test;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct TestState(pub u64);

impl State for TestState {}

/// Lets spawned producer and timer tasks run to their next await point.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
