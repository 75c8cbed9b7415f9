use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use futures::StreamExt;
use kube::api::Api;
use kube::runtime::watcher;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Bound on the handler dispatch queue.
const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Time the watch side waits for queue space before dropping an event.
const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// A delete notification, tagged with how the delete was observed.
#[derive(Clone, Debug)]
pub enum Deleted<K> {
    /// The delete was seen live on the watch stream.
    Observed(K),
    /// The object vanished while the watch was re-synchronizing. This is its
    /// last known state; intermediate changes may have been missed.
    FinalStateUnknown(K),
}

impl<K> Deleted<K> {
    /// The deleted object, however the delete was observed.
    pub fn into_inner(self) -> K {
        match self {
            Deleted::Observed(obj) | Deleted::FinalStateUnknown(obj) => obj,
        }
    }
}

#[derive(Debug)]
enum InformerEvent<K> {
    Added(K),
    Updated { old: K, new: K },
    Deleted(Deleted<K>),
}

struct Handlers<K> {
    on_add: Box<dyn FnMut(K) + Send>,
    on_update: Box<dyn FnMut(K, K) + Send>,
    on_delete: Box<dyn FnMut(Deleted<K>) + Send>,
}

impl<K> Default for Handlers<K> {
    fn default() -> Self {
        Self {
            on_add: Box::new(|_| {}),
            on_update: Box::new(|_, _| {}),
            on_delete: Box::new(|_| {}),
        }
    }
}

/// Configures a change subscription for one (kind, namespace) pair.
///
/// Handler slots default to no-ops; each setter keeps only the last value.
/// [`Self::inform`] consumes the builder, so a running subscription can no
/// longer be reconfigured.
pub struct InformerBuilder<K> {
    api: Api<K>,
    namespace: String,
    handlers: Handlers<K>,
    queue_capacity: usize,
    dispatch_timeout: Duration,
}

impl<K> InformerBuilder<K>
where
    K: Resource + Clone + DeserializeOwned + Debug + Send + 'static,
    K::DynamicType: Default + Eq + Hash + Clone,
{
    pub(crate) fn new(api: Api<K>, namespace: &str) -> Self {
        Self {
            api,
            namespace: namespace.to_owned(),
            handlers: Handlers::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    /// Replaces the add handler.
    pub fn on_add(mut self, handler: impl FnMut(K) + Send + 'static) -> Self {
        self.handlers.on_add = Box::new(handler);
        self
    }

    /// Replaces the update handler; invoked with (old, new).
    pub fn on_update(mut self, handler: impl FnMut(K, K) + Send + 'static) -> Self {
        self.handlers.on_update = Box::new(handler);
        self
    }

    /// Replaces the delete handler.
    pub fn on_delete(mut self, handler: impl FnMut(Deleted<K>) + Send + 'static) -> Self {
        self.handlers.on_delete = Box::new(handler);
        self
    }

    /// Bounds the queue between the watch stream and the handlers.
    /// Clamped to at least 1.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// How long delivery may wait on a full queue before the event is dropped
    /// with a warning.
    pub fn dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    /// Starts the subscription and returns its handle.
    ///
    /// Must be called inside a tokio runtime. The subscription runs until the
    /// returned [`Informer`] is dropped; handlers are invoked sequentially on
    /// a dedicated dispatch task, in watch-stream order. A slow handler delays
    /// later events on this subscription only, never the watch connection.
    pub fn inform(self) -> Informer {
        let kind = K::kind(&K::DynamicType::default()).into_owned();
        info!(
            "Starting {} informer in namespace '{}'",
            kind, self.namespace
        );

        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let dispatch = tokio::spawn(dispatch_events(rx, self.handlers));
        let watch = tokio::spawn(run_watch(self.api, tx, self.dispatch_timeout, kind));

        Informer { watch, dispatch }
    }
}

/// Handle to a running subscription.
///
/// Dropping the handle aborts the watch and dispatch tasks, releasing the
/// underlying watch connection.
#[must_use = "the subscription stops when this handle is dropped"]
pub struct Informer {
    watch: JoinHandle<()>,
    dispatch: JoinHandle<()>,
}

impl Informer {
    /// Stops the subscription. Equivalent to dropping the handle.
    pub fn stop(self) {}

    /// Whether the subscription is still running.
    pub fn is_running(&self) -> bool {
        !self.watch.is_finished()
    }
}

impl Drop for Informer {
    fn drop(&mut self) {
        self.watch.abort();
        self.dispatch.abort();
    }
}

async fn run_watch<K>(
    api: Api<K>,
    tx: mpsc::Sender<InformerEvent<K>>,
    dispatch_timeout: Duration,
    kind: String,
) where
    K: Resource + Clone + DeserializeOwned + Debug + Send + 'static,
    K::DynamicType: Default,
{
    let mut tracker = EventTracker::new();
    let mut stream = watcher(api, watcher::Config::default()).boxed();

    while let Some(item) = stream.next().await {
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                // the watcher backs off and reconnects on its own
                error!("{} watch error: {:?}", kind, err);
                continue;
            }
        };

        for derived in tracker.track(event) {
            match tx.send_timeout(derived, dispatch_timeout).await {
                Ok(()) => {}
                Err(SendTimeoutError::Timeout(dropped)) => {
                    warn!(
                        "{} informer queue full for {:?}, dropping {:?}",
                        kind, dispatch_timeout, dropped
                    );
                }
                Err(SendTimeoutError::Closed(_)) => return,
            }
        }
    }

    debug!("{} watch stream ended", kind);
}

async fn dispatch_events<K>(mut rx: mpsc::Receiver<InformerEvent<K>>, mut handlers: Handlers<K>) {
    while let Some(event) = rx.recv().await {
        match event {
            InformerEvent::Added(obj) => (handlers.on_add)(obj),
            InformerEvent::Updated { old, new } => (handlers.on_update)(old, new),
            InformerEvent::Deleted(deleted) => (handlers.on_delete)(deleted),
        }
    }
}

/// Folds raw watcher events into add/update/delete notifications by tracking
/// the last seen state of every object.
///
/// Keyed by name; a subscription is scoped to a single namespace, where names
/// are unique.
struct EventTracker<K> {
    cache: HashMap<String, K>,
    /// Names re-announced since the current resync began; `None` outside a
    /// resync.
    resync_seen: Option<HashSet<String>>,
}

impl<K> EventTracker<K>
where
    K: Resource + Clone,
{
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            resync_seen: None,
        }
    }

    fn track(&mut self, event: watcher::Event<K>) -> Vec<InformerEvent<K>> {
        let mut out = Vec::new();

        match event {
            watcher::Event::Apply(obj) => self.upsert(obj, &mut out),
            watcher::Event::Delete(obj) => {
                self.cache.remove(&obj.name_any());
                out.push(InformerEvent::Deleted(Deleted::Observed(obj)));
            }
            watcher::Event::Init => {
                self.resync_seen = Some(HashSet::new());
            }
            watcher::Event::InitApply(obj) => {
                if let Some(seen) = self.resync_seen.as_mut() {
                    seen.insert(obj.name_any());
                }
                self.upsert(obj, &mut out);
            }
            watcher::Event::InitDone => {
                // objects that did not reappear were deleted while the watch
                // was down; their final state is unknown
                if let Some(seen) = self.resync_seen.take() {
                    let vanished: Vec<String> = self
                        .cache
                        .keys()
                        .filter(|name| !seen.contains(*name))
                        .cloned()
                        .collect();
                    for name in vanished {
                        if let Some(last_known) = self.cache.remove(&name) {
                            out.push(InformerEvent::Deleted(Deleted::FinalStateUnknown(
                                last_known,
                            )));
                        }
                    }
                }
            }
        }

        out
    }

    fn upsert(&mut self, obj: K, out: &mut Vec<InformerEvent<K>>) {
        match self.cache.insert(obj.name_any(), obj.clone()) {
            Some(old) => out.push(InformerEvent::Updated { old, new: obj }),
            None => out.push(InformerEvent::Added(obj)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::crds::{CraftServer, CraftServerSpec, ServerTemplateSpec};

    fn server(name: &str) -> CraftServer {
        server_with_image(name, "craftfleet/server:latest")
    }

    fn server_with_image(name: &str, image: &str) -> CraftServer {
        CraftServer::new(
            name,
            CraftServerSpec {
                template: ServerTemplateSpec {
                    image: image.into(),
                    max_players: None,
                    properties: Default::default(),
                },
            },
        )
    }

    fn label(event: &InformerEvent<CraftServer>) -> String {
        match event {
            InformerEvent::Added(obj) => format!("add:{}", obj.name_any()),
            InformerEvent::Updated { new, .. } => format!("update:{}", new.name_any()),
            InformerEvent::Deleted(Deleted::Observed(obj)) => {
                format!("delete:{}", obj.name_any())
            }
            InformerEvent::Deleted(Deleted::FinalStateUnknown(obj)) => {
                format!("delete-unknown:{}", obj.name_any())
            }
        }
    }

    fn labels(events: &[InformerEvent<CraftServer>]) -> Vec<String> {
        events.iter().map(label).collect()
    }

    #[test]
    fn apply_is_add_then_update() {
        let mut tracker = EventTracker::new();

        let first = tracker.track(watcher::Event::Apply(server("alpha")));
        assert_eq!(labels(&first), ["add:alpha"]);

        let second = tracker.track(watcher::Event::Apply(server("alpha")));
        assert_eq!(labels(&second), ["update:alpha"]);
    }

    #[test]
    fn update_carries_the_previous_object() {
        let mut tracker = EventTracker::new();
        tracker.track(watcher::Event::Apply(server_with_image("alpha", "craft:1")));

        let events = tracker.track(watcher::Event::Apply(server_with_image("alpha", "craft:2")));
        match events.as_slice() {
            [InformerEvent::Updated { old, new }] => {
                assert_eq!(old.spec.template.image, "craft:1");
                assert_eq!(new.spec.template.image, "craft:2");
            }
            other => panic!("expected a single update, got {other:?}"),
        }
    }

    #[test]
    fn live_delete_is_observed() {
        let mut tracker = EventTracker::new();
        tracker.track(watcher::Event::Apply(server("alpha")));

        let events = tracker.track(watcher::Event::Delete(server("alpha")));
        assert_eq!(labels(&events), ["delete:alpha"]);

        // a later re-add starts from scratch
        let events = tracker.track(watcher::Event::Apply(server("alpha")));
        assert_eq!(labels(&events), ["add:alpha"]);
    }

    #[test]
    fn resync_reports_vanished_objects_with_last_known_state() {
        let mut tracker = EventTracker::new();
        tracker.track(watcher::Event::Apply(server_with_image("alpha", "craft:1")));
        tracker.track(watcher::Event::Apply(server("beta")));

        tracker.track(watcher::Event::Init);
        let during = tracker.track(watcher::Event::InitApply(server("beta")));
        assert_eq!(labels(&during), ["update:beta"]);

        let done = tracker.track(watcher::Event::InitDone);
        match done.as_slice() {
            [InformerEvent::Deleted(Deleted::FinalStateUnknown(lost))] => {
                assert_eq!(lost.name_any(), "alpha");
                assert_eq!(lost.spec.template.image, "craft:1");
            }
            other => panic!("expected one uncertain delete, got {other:?}"),
        }

        // the survivor is still tracked
        let events = tracker.track(watcher::Event::Apply(server("beta")));
        assert_eq!(labels(&events), ["update:beta"]);
    }

    #[test]
    fn initial_sync_announces_every_object_once() {
        let mut tracker = EventTracker::new();

        tracker.track(watcher::Event::Init);
        let a = tracker.track(watcher::Event::InitApply(server("alpha")));
        let b = tracker.track(watcher::Event::InitApply(server("beta")));
        let done = tracker.track(watcher::Event::InitDone);

        assert_eq!(labels(&a), ["add:alpha"]);
        assert_eq!(labels(&b), ["add:beta"]);
        assert!(done.is_empty());
    }

    #[tokio::test]
    async fn dispatch_invokes_handlers_in_order() {
        let _ = tracing_subscriber::fmt::try_init();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut handlers: Handlers<CraftServer> = Handlers::default();
        let adds = seen.clone();
        handlers.on_add = Box::new(move |obj| adds.lock().unwrap().push(format!("add:{}", obj.name_any())));
        let updates = seen.clone();
        handlers.on_update =
            Box::new(move |_, new| updates.lock().unwrap().push(format!("update:{}", new.name_any())));
        let deletes = seen.clone();
        handlers.on_delete = Box::new(move |deleted| {
            deletes
                .lock()
                .unwrap()
                .push(format!("delete:{}", deleted.into_inner().name_any()))
        });

        let (tx, rx) = mpsc::channel(8);
        let dispatcher = tokio::spawn(dispatch_events(rx, handlers));

        tx.send(InformerEvent::Added(server("alpha"))).await.unwrap();
        tx.send(InformerEvent::Updated {
            old: server("alpha"),
            new: server("alpha"),
        })
        .await
        .unwrap();
        tx.send(InformerEvent::Deleted(Deleted::Observed(server("alpha"))))
            .await
            .unwrap();
        drop(tx);
        dispatcher.await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            ["add:alpha", "update:alpha", "delete:alpha"]
        );
    }

    #[tokio::test]
    async fn later_handler_registration_replaces_earlier() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut handlers: Handlers<CraftServer> = Handlers::default();
        let first = seen.clone();
        handlers.on_add = Box::new(move |_| first.lock().unwrap().push("first"));
        let second = seen.clone();
        handlers.on_add = Box::new(move |_| second.lock().unwrap().push("second"));

        let (tx, rx) = mpsc::channel(1);
        let dispatcher = tokio::spawn(dispatch_events(rx, handlers));
        tx.send(InformerEvent::Added(server("alpha"))).await.unwrap();
        drop(tx);
        dispatcher.await.unwrap();

        assert_eq!(*seen.lock().unwrap(), ["second"]);
    }

    #[tokio::test]
    async fn unset_handlers_are_no_ops() {
        let (tx, rx) = mpsc::channel(4);
        let dispatcher = tokio::spawn(dispatch_events(rx, Handlers::<CraftServer>::default()));

        tx.send(InformerEvent::Added(server("alpha"))).await.unwrap();
        tx.send(InformerEvent::Deleted(Deleted::FinalStateUnknown(server(
            "alpha",
        ))))
        .await
        .unwrap();
        drop(tx);

        // completing without panicking is the contract
        dispatcher.await.unwrap();
    }
}
