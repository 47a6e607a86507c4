use std::sync::{mpsc, Arc};
use std::thread;

use hearth_logging::{hearth_error, hearth_info};

use crate::{
    policy, CacheRegistry, FetchError, FetchSettings, Fetcher, NetworkFetcher, RequestId,
    WorkerLifecycle, WorkerPhase, WorkerRequest, WorkerResponse,
};

enum WorkerCommand {
    Dispatch {
        request_id: RequestId,
        request: WorkerRequest,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    PhaseChanged(WorkerPhase),
    /// Emitted once the worker is active; reports the opened cache so hosts
    /// can observe that it stays empty.
    Activated {
        cache_name: String,
        cached_entries: usize,
    },
    FetchCompleted {
        request_id: RequestId,
        result: Result<WorkerResponse, FetchError>,
    },
}

/// The worker's isolated context: its own thread, its own event queue.
///
/// Pages communicate with it only through the dispatch/event channels; there
/// is no shared mutable memory.
#[derive(Debug)]
pub struct WorkerHost {
    cmd_tx: mpsc::Sender<WorkerCommand>,
    event_rx: mpsc::Receiver<WorkerEvent>,
}

impl WorkerHost {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let fetcher: Arc<dyn Fetcher> = Arc::new(NetworkFetcher::new(settings)?);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    hearth_error!("worker runtime failed to start: {}", err);
                    return;
                }
            };

            let mut lifecycle = WorkerLifecycle::new();
            let mut caches = CacheRegistry::new();

            // Registration triggers install; skipping the waiting period
            // makes activation immediate.
            lifecycle.on_install();
            let _ = event_tx.send(WorkerEvent::PhaseChanged(lifecycle.phase()));
            lifecycle.on_activate(&mut caches);
            let _ = event_tx.send(WorkerEvent::PhaseChanged(lifecycle.phase()));
            if let Some(store) = caches.get(crate::OFFLINE_CACHE_NAME) {
                let _ = event_tx.send(WorkerEvent::Activated {
                    cache_name: store.name().to_string(),
                    cached_entries: store.len(),
                });
            }

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    WorkerCommand::Dispatch {
                        request_id,
                        request,
                    } => {
                        let fetcher = fetcher.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = policy::respond(fetcher.as_ref(), &request).await;
                            let _ = event_tx.send(WorkerEvent::FetchCompleted {
                                request_id,
                                result,
                            });
                        });
                    }
                }
            }
            hearth_info!("worker host shutting down");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    /// Hands a fetch event to the worker. The answer arrives as a
    /// [`WorkerEvent::FetchCompleted`] with the same request id.
    pub fn dispatch(&self, request_id: RequestId, request: WorkerRequest) {
        let _ = self.cmd_tx.send(WorkerCommand::Dispatch {
            request_id,
            request,
        });
    }

    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.event_rx.try_recv().ok()
    }
}
