//! Shared, replaying state hub.
//!
//! A [`SharedStateHub`] turns a cold producer (a factory of source streams) into
//! one hot stream served to any number of [`Subscription`]s:
//!
//! - the producer runs while at least one subscription exists, and for a grace
//!   period after the last one is released;
//! - every subscriber gets the last delivered value immediately on subscribe, then
//!   each subsequent value exactly once, in emission order;
//! - when the grace period elapses with no subscribers the producer is cancelled
//!   and the hub falls back to its seed value.
//!
//! All bookkeeping lives behind one mutex, so subscribe, release, delivery and the
//! grace timer are totally ordered. Each producer run and grace timer carries a
//! generation number; completions from a run or timer that is no longer current
//! are dropped.

use crate::{HubConfig, HubError, SourceError, State};
use futures::stream::BoxStream;
use futures::StreamExt;
use futures_core::stream::Stream;
use futures_signals::signal::{Mutable, MutableSignalCloned};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// A boxed upstream stream. An `Err` item terminates the producer.
pub type SourceStream<T> = BoxStream<'static, Result<T, SourceError>>;

type ProducerFactory<S> = Arc<dyn Fn() -> SourceStream<S> + Send + Sync>;
type Delivery<S> = Result<S, HubError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Lifecycle of a hub as observed through [`SharedStateHub::status_signal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubStatus {
    /// No producer; the next subscribe starts one.
    Idle,
    /// Producer running with at least one subscriber.
    Active,
    /// Producer running with no subscribers, grace timer pending.
    Lingering,
    /// Producer finished normally; the last value is kept.
    Completed,
    /// Producer terminated abnormally; waits for an explicit restart.
    Crashed(HubError),
    /// Torn down by its owner.
    Closed,
}

impl HubStatus {
    pub fn is_crashed(&self) -> bool {
        matches!(self, HubStatus::Crashed(_))
    }
}

/// Point-in-time view of the hub bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct HubState<S> {
    pub last_value: S,
    pub subscriber_count: usize,
    pub producer_active: bool,
    pub grace_timer_active: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStats {
    pub producer_starts: u64,
    pub producer_cancels: u64,
}

enum Phase {
    Idle,
    Running {
        token: CancellationToken,
        generation: u64,
    },
    Completed,
    Crashed(HubError),
    Closed,
}

struct GraceTimer {
    token: CancellationToken,
    generation: u64,
}

struct HubCore<S> {
    last_value: S,
    subscribers: BTreeMap<SubscriptionId, UnboundedSender<Delivery<S>>>,
    next_id: u64,
    generation: u64,
    phase: Phase,
    grace: Option<GraceTimer>,
    stats: HubStats,
}

impl<S> HubCore<S> {
    fn is_running(&self, generation: u64) -> bool {
        matches!(self.phase, Phase::Running { generation: current, .. } if current == generation)
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn status(&self) -> HubStatus {
        match &self.phase {
            Phase::Idle => HubStatus::Idle,
            Phase::Running { .. } if self.grace.is_some() => HubStatus::Lingering,
            Phase::Running { .. } => HubStatus::Active,
            Phase::Completed => HubStatus::Completed,
            Phase::Crashed(error) => HubStatus::Crashed(error.clone()),
            Phase::Closed => HubStatus::Closed,
        }
    }

    fn cancel_grace_timer(&mut self) {
        if let Some(timer) = self.grace.take() {
            timer.token.cancel();
            debug!(generation = timer.generation, "grace timer cancelled");
        }
    }
}

struct HubInner<S: State> {
    seed: S,
    config: HubConfig,
    factory: ProducerFactory<S>,
    scope: CancellationToken,
    status: Mutable<HubStatus>,
    core: Mutex<HubCore<S>>,
}

impl<S: State> HubInner<S> {
    fn lock(&self) -> MutexGuard<'_, HubCore<S>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish_status(&self, core: &HubCore<S>) {
        self.status.set_neq(core.status());
    }

    fn subscribe(self: &Arc<Self>) -> Result<(Subscription<S>, S), HubError> {
        let mut core = self.lock();
        match &core.phase {
            Phase::Closed => return Err(HubError::Closed),
            Phase::Crashed(error) => return Err(error.clone()),
            _ => {}
        }

        core.cancel_grace_timer();

        if matches!(core.phase, Phase::Idle) {
            if let Err(error) = self.start_producer(&mut core) {
                self.publish_status(&core);
                return Err(error);
            }
        }

        let id = SubscriptionId(core.next_id);
        core.next_id += 1;
        let (sender, receiver) = unbounded_channel();
        core.subscribers.insert(id, sender);

        let initial = core.last_value.clone();
        self.publish_status(&core);
        debug!(
            subscription = id.as_u64(),
            subscribers = core.subscribers.len(),
            "subscribed"
        );

        let subscription = Subscription {
            id,
            receiver,
            hub: Arc::clone(self),
        };
        Ok((subscription, initial))
    }

    fn unsubscribe(self: &Arc<Self>, id: SubscriptionId) {
        let mut core = self.lock();
        if core.subscribers.remove(&id).is_none() {
            return;
        }
        debug!(
            subscription = id.as_u64(),
            subscribers = core.subscribers.len(),
            "unsubscribed"
        );

        if core.subscribers.is_empty()
            && matches!(core.phase, Phase::Running { .. } | Phase::Completed)
        {
            self.start_grace_timer(&mut core);
        }
        self.publish_status(&core);
    }

    /// Opens the upstream stream and spawns the producer. A panicking factory
    /// crashes the hub before any subscriber or producer is registered.
    fn start_producer(self: &Arc<Self>, core: &mut HubCore<S>) -> Result<(), HubError> {
        let stream = match panic::catch_unwind(AssertUnwindSafe(|| (self.factory)())) {
            Ok(stream) => stream,
            Err(payload) => {
                let error = HubError::ProducerPanicked(panic_message(payload.as_ref()));
                warn!(%error, "producer factory panicked, tearing hub down");
                core.phase = Phase::Crashed(error.clone());
                return Err(error);
            }
        };

        let generation = core.next_generation();
        let token = self.scope.child_token();
        core.phase = Phase::Running {
            token: token.clone(),
            generation,
        };
        core.stats.producer_starts += 1;
        debug!(generation, "starting producer");

        let producer = tokio::spawn(Arc::clone(self).produce(stream, token, generation));

        let hub = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(error) = producer.await {
                if error.is_panic() {
                    hub.crash(generation, HubError::ProducerPanicked(error.to_string()));
                }
            }
        });
        Ok(())
    }

    async fn produce(
        self: Arc<Self>,
        mut stream: SourceStream<S>,
        token: CancellationToken,
        generation: u64,
    ) {
        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    trace!(generation, "producer cancelled");
                    return;
                }
                next = stream.next() => next,
            };
            match next {
                Some(Ok(value)) => self.deliver(generation, value),
                Some(Err(error)) => {
                    self.crash(generation, error.into());
                    return;
                }
                None => {
                    self.complete(generation);
                    return;
                }
            }
        }
    }

    fn deliver(&self, generation: u64, value: S) {
        let mut core = self.lock();
        if !core.is_running(generation) {
            trace!(generation, "dropping value from a stale producer");
            return;
        }
        for sender in core.subscribers.values() {
            let _ = sender.send(Ok(value.clone()));
        }
        trace!(
            generation,
            subscribers = core.subscribers.len(),
            "value delivered"
        );
        core.last_value = value;
    }

    fn complete(&self, generation: u64) {
        let mut core = self.lock();
        if !core.is_running(generation) {
            return;
        }
        core.phase = Phase::Completed;
        debug!(generation, "producer completed");
        self.publish_status(&core);
    }

    fn crash(&self, generation: u64, error: HubError) {
        let mut core = self.lock();
        if !core.is_running(generation) {
            return;
        }
        warn!(generation, %error, "producer terminated abnormally, tearing hub down");

        let previous = std::mem::replace(&mut core.phase, Phase::Crashed(error.clone()));
        if let Phase::Running { token, .. } = previous {
            token.cancel();
        }
        core.cancel_grace_timer();
        for sender in core.subscribers.values() {
            let _ = sender.send(Err(error.clone()));
        }
        core.subscribers.clear();
        self.publish_status(&core);
    }

    fn start_grace_timer(self: &Arc<Self>, core: &mut HubCore<S>) {
        core.cancel_grace_timer();
        let generation = core.next_generation();
        let token = self.scope.child_token();
        core.grace = Some(GraceTimer {
            token: token.clone(),
            generation,
        });

        let grace_period = self.config.grace_period;
        debug!(generation, ?grace_period, "last subscriber left, grace timer started");

        let hub = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(grace_period) => hub.grace_elapsed(generation),
            }
        });
    }

    fn grace_elapsed(&self, generation: u64) {
        let mut core = self.lock();
        match &core.grace {
            Some(timer) if timer.generation == generation => {}
            _ => return,
        }
        core.grace = None;
        if !core.subscribers.is_empty() {
            return;
        }

        if let Phase::Running { token, .. } = std::mem::replace(&mut core.phase, Phase::Idle) {
            token.cancel();
            core.stats.producer_cancels += 1;
        }
        core.last_value = self.seed.clone();
        debug!(generation, "grace period elapsed, hub idle");
        self.publish_status(&core);
    }

    fn restart(&self) -> bool {
        let mut core = self.lock();
        if !matches!(core.phase, Phase::Crashed(_)) {
            return false;
        }
        core.phase = Phase::Idle;
        core.last_value = self.seed.clone();
        debug!("hub restarted after crash");
        self.publish_status(&core);
        true
    }

    fn close(&self) {
        let mut core = self.lock();
        if matches!(core.phase, Phase::Closed) {
            return;
        }
        self.scope.cancel();
        if let Phase::Running { .. } = std::mem::replace(&mut core.phase, Phase::Closed) {
            core.stats.producer_cancels += 1;
        }
        core.grace = None;
        core.subscribers.clear();
        debug!("hub closed");
        self.publish_status(&core);
    }
}

/// Multicast cache with a subscriber-counted producer.
///
/// The hub is owned by the scope that created it; dropping the owner tears the
/// hub down. Subscribing starts producer and timer tasks, so it must happen
/// within a Tokio runtime.
pub struct SharedStateHub<S: State> {
    inner: Arc<HubInner<S>>,
}

impl<S: State> SharedStateHub<S> {
    /// Creates an idle hub. `factory` is called once per producer start and must
    /// return a fresh stream each time.
    pub fn new<F>(seed: S, config: HubConfig, factory: F) -> Self
    where
        F: Fn() -> SourceStream<S> + Send + Sync + 'static,
    {
        let core = HubCore {
            last_value: seed.clone(),
            subscribers: BTreeMap::new(),
            next_id: 0,
            generation: 0,
            phase: Phase::Idle,
            grace: None,
            stats: HubStats::default(),
        };
        SharedStateHub {
            inner: Arc::new(HubInner {
                seed,
                config,
                factory: Arc::new(factory),
                scope: CancellationToken::new(),
                status: Mutable::new(HubStatus::Idle),
                core: Mutex::new(core),
            }),
        }
    }

    /// Registers an observer and returns it together with the current value.
    ///
    /// Cancels a pending grace timer and starts the producer if the hub is idle.
    /// Fails on a crashed hub until [`restart`](Self::restart) is called, and on a
    /// closed hub.
    pub fn subscribe(&self) -> Result<(Subscription<S>, S), HubError> {
        self.inner.subscribe()
    }

    pub fn unsubscribe(&self, subscription: Subscription<S>) {
        subscription.unsubscribe();
    }

    pub fn last_value(&self) -> S {
        self.inner.lock().last_value.clone()
    }

    pub fn snapshot(&self) -> HubState<S> {
        let core = self.inner.lock();
        HubState {
            last_value: core.last_value.clone(),
            subscriber_count: core.subscribers.len(),
            producer_active: matches!(core.phase, Phase::Running { .. }),
            grace_timer_active: core.grace.is_some(),
        }
    }

    pub fn stats(&self) -> HubStats {
        self.inner.lock().stats
    }

    pub fn config(&self) -> HubConfig {
        self.inner.config
    }

    pub fn status(&self) -> HubStatus {
        self.inner.status.get_cloned()
    }

    pub fn status_signal(&self) -> MutableSignalCloned<HubStatus> {
        self.inner.status.signal_cloned()
    }

    /// Returns a crashed hub to idle at its seed value. Returns false if the hub
    /// was not crashed.
    pub fn restart(&self) -> bool {
        self.inner.restart()
    }

    /// Cancels the producer and timers and ends all subscriptions.
    pub fn close(&self) {
        self.inner.close();
    }
}

impl<S: State> Drop for SharedStateHub<S> {
    fn drop(&mut self) {
        self.inner.close();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "producer factory panicked".to_string()
    }
}

/// One observer of a [`SharedStateHub`].
///
/// Yields every value the hub delivers after subscribing. A producer crash is
/// delivered as one `Err` before the subscription ends; hub teardown ends it
/// without an error. Dropping the subscription releases it.
pub struct Subscription<S: State> {
    id: SubscriptionId,
    receiver: UnboundedReceiver<Delivery<S>>,
    hub: Arc<HubInner<S>>,
}

impl<S: State> Subscription<S> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next delivered value. `None` once the hub stopped serving
    /// this subscription.
    pub async fn changed(&mut self) -> Option<Result<S, HubError>> {
        self.receiver.recv().await
    }

    /// Returns a value that was already delivered without waiting.
    ///
    /// `Err(TryRecvError::Empty)` means nothing is pending yet;
    /// `Err(TryRecvError::Disconnected)` means the hub stopped serving this
    /// subscription and everything delivered was consumed.
    pub fn try_changed(&mut self) -> Result<Result<S, HubError>, TryRecvError> {
        self.receiver.try_recv()
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<S: State> Stream for Subscription<S> {
    type Item = Result<S, HubError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl<S: State> Drop for Subscription<S> {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
