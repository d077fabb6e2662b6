//! # Screen Controller
//!
//! Runs a [`Screen`] on its own task and carries out the effects it asks for.
//!
//! ## Controller Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Screen Controller                                │
//! │                                                                         │
//! │   ScreenHandle ──── Command ────┐                                       │
//! │   (request_scan, view, ...)     │                                       │
//! │                                 ▼                                       │
//! │                      ┌─────────────────────┐                            │
//! │   DecodeSink ──────► │  select! loop       │ ──► ScreenEventEmitter     │
//! │   call results ────► │  Screen::handle()   │     (views, notices)       │
//! │                      └──────────┬──────────┘                            │
//! │                                 │ effects                               │
//! │          ┌──────────────────────┼───────────────────────┐               │
//! │          ▼                      ▼                       ▼               │
//! │   spawned call task      scanner.activate()      emitter.notice()       │
//! │   (timeout + child              /deactivate()                           │
//! │    cancellation token)                                                  │
//! │          │                                                              │
//! │          └──── result / timeout event ──► back into the loop            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every state change happens on the controller task, one event at a time.
//! Collaborator calls never block the loop: each runs on a spawned task and
//! reports back through the internal event channel.
//!
//! ## Shutdown
//! Cancelling the screen cancels the outstanding call, feeds `Aborted` into
//! the machine (which closes the scanner if it was open) and publishes the
//! final view.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use scanprint_core::{Effect, Event, Notice, Screen, ScreenResult, ScreenView};

use crate::config::ScreenConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::services::{Capability, DecodeSink, PermissionProvider, PrinterService, ScannerService};

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Receives everything the host has to render (implemented by the UI layer).
pub trait ScreenEventEmitter: Send + Sync {
    /// Emits the screen after every applied event.
    fn emit_view(&self, view: &ScreenView);

    /// Emits a message to show the user.
    fn emit_notice(&self, notice: &Notice);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl ScreenEventEmitter for NoOpEmitter {
    fn emit_view(&self, _view: &ScreenView) {}
    fn emit_notice(&self, _notice: &Notice) {}
}

// =============================================================================
// Commands
// =============================================================================

enum Command {
    Dispatch {
        event: Event,
        reply: oneshot::Sender<ScreenResult<()>>,
    },
    View(oneshot::Sender<ScreenView>),
}

// =============================================================================
// Scan-Print Screen
// =============================================================================

/// A configured screen, ready to be spawned.
pub struct ScanPrintScreen {
    config: Arc<ScreenConfig>,
    permission: Arc<dyn PermissionProvider>,
    scanner: Arc<dyn ScannerService>,
    printer: Arc<dyn PrinterService>,
    emitter: Arc<dyn ScreenEventEmitter>,
}

impl ScanPrintScreen {
    /// Starts building a screen with the given config.
    pub fn builder(config: ScreenConfig) -> ScanPrintScreenBuilder {
        ScanPrintScreenBuilder::new(config)
    }

    /// Spawns the controller task. Must be called inside a tokio runtime.
    ///
    /// The returned `JoinHandle` resolves once the screen has torn down,
    /// either after [`ScreenHandle::shutdown`] or when every handle is dropped.
    pub fn spawn(self) -> (ScreenHandle, JoinHandle<()>) {
        let capacity = self.config.runtime.channel_capacity;
        let (command_tx, command_rx) = mpsc::channel(capacity);
        let (event_tx, event_rx) = mpsc::channel(capacity);
        let shutdown = CancellationToken::new();

        let screen = match self.config.printer.handle() {
            Some(printer) => {
                info!(printer = %printer.url, "Using preselected printer");
                Screen::with_printer(printer)
            }
            None => Screen::new(),
        };

        let controller = Controller {
            screen,
            config: self.config,
            permission: self.permission,
            scanner: self.scanner,
            printer: self.printer,
            emitter: self.emitter,
            events_tx: event_tx,
            shutdown: shutdown.clone(),
        };

        let task = tokio::spawn(controller.run(command_rx, event_rx));
        let handle = ScreenHandle {
            commands: command_tx,
            shutdown,
        };

        (handle, task)
    }
}

// =============================================================================
// Controller Task
// =============================================================================

struct Controller {
    screen: Screen,
    config: Arc<ScreenConfig>,
    permission: Arc<dyn PermissionProvider>,
    scanner: Arc<dyn ScannerService>,
    printer: Arc<dyn PrinterService>,
    emitter: Arc<dyn ScreenEventEmitter>,

    /// Feeds collaborator results and decodes back into the loop.
    events_tx: mpsc::Sender<Event>,

    /// Parent of every call's cancellation token.
    shutdown: CancellationToken,
}

impl Controller {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut events: mpsc::Receiver<Event>,
    ) {
        info!("Scan-print screen started");
        self.publish_view();

        let shutdown = self.shutdown.clone();
        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Screen received shutdown signal");
                    break;
                }

                Some(event) = events.recv() => {
                    // Rejections only come from user actions, which arrive as commands.
                    let _ = self.apply(event);
                }

                command = commands.recv() => {
                    let Some(command) = command else {
                        info!("All screen handles dropped, stopping");
                        break;
                    };
                    self.on_command(command);
                }
            }
        }

        self.teardown();
        info!("Scan-print screen stopped");
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::Dispatch { event, reply } => {
                let result = self.apply(event);
                let _ = reply.send(result);
            }
            Command::View(reply) => {
                let _ = reply.send(ScreenView::from(&self.screen));
            }
        }
    }

    /// Applies one event to the machine and runs the resulting effects.
    fn apply(&mut self, event: Event) -> ScreenResult<()> {
        let name = event.name();

        match self.screen.handle(event) {
            Ok(effects) => {
                debug!(
                    event = name,
                    state = %self.screen.state(),
                    effects = effects.len(),
                    "Event applied"
                );
                for effect in effects {
                    self.execute(effect);
                }
                self.publish_view();
                Ok(())
            }
            Err(err) => {
                warn!(event = name, state = %self.screen.state(), error = %err, "Action rejected");
                self.emitter.emit_notice(&Notice::from(&err));
                Err(err)
            }
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::RequestPermission => {
                let provider = Arc::clone(&self.permission);
                let limit = self.config.timeouts.permission();
                self.spawn_call(
                    "permission",
                    limit,
                    async move {
                        let status = provider.request(Capability::Camera).await;
                        Event::PermissionResolved {
                            granted: status.is_granted(),
                        }
                    },
                    |_| Event::PermissionResolved { granted: false },
                );
            }

            Effect::OpenScanner { session } => {
                debug!(%session, "Activating scanner");
                self.scanner
                    .activate(DecodeSink::new(session, self.events_tx.clone()));
            }

            Effect::CloseScanner => {
                debug!("Deactivating scanner");
                self.scanner.deactivate();
            }

            Effect::SelectPrinter => {
                let printer = Arc::clone(&self.printer);
                let limit = self.config.timeouts.printer_selection();
                self.spawn_call(
                    "printer_selection",
                    limit,
                    async move {
                        match printer.select_printer().await {
                            Ok(Some(handle)) => Event::PrinterSelected(handle),
                            Ok(None) => Event::PrinterSelectionCancelled { reason: None },
                            Err(e) => Event::PrinterSelectionCancelled {
                                reason: Some(e.to_string()),
                            },
                        }
                    },
                    |limit| Event::PrinterSelectionCancelled {
                        reason: Some(timed_out(limit)),
                    },
                );
            }

            Effect::Print(job) => {
                info!(job_id = %job.id, printer = %job.printer.url, "Sending label to printer");
                let printer = Arc::clone(&self.printer);
                let limit = self.config.timeouts.print();
                self.spawn_call(
                    "print",
                    limit,
                    async move {
                        match printer.print(&job).await {
                            Ok(()) => {
                                debug!(job_id = %job.id, "Printer accepted job");
                                Event::PrintCompleted
                            }
                            Err(e) => Event::PrintFailed {
                                reason: e.to_string(),
                            },
                        }
                    },
                    |limit| Event::PrintFailed {
                        reason: timed_out(limit),
                    },
                );
            }

            Effect::Notify(notice) => {
                if notice.is_error() {
                    warn!(message = %notice.message, "Notice");
                } else {
                    info!(message = %notice.message, "Notice");
                }
                self.emitter.emit_notice(&notice);
            }
        }
    }

    /// Runs `call` on its own task, bounded by `limit` and the shutdown token,
    /// and feeds its event (or `on_timeout`'s) back into the loop.
    fn spawn_call<F, T>(&self, call: &'static str, limit: Option<Duration>, fut: F, on_timeout: T)
    where
        F: Future<Output = Event> + Send + 'static,
        T: FnOnce(Duration) -> Event + Send + 'static,
    {
        let token = self.shutdown.child_token();
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!(call, "Collaborator call cancelled");
                    return;
                }
                outcome = within(limit, fut) => outcome,
            };

            let event = match outcome {
                Ok(event) => event,
                Err(limit) => {
                    warn!(call, secs = limit.as_secs(), "Collaborator call timed out");
                    on_timeout(limit)
                }
            };

            if events.send(event).await.is_err() {
                debug!(call, "Screen stopped before the result arrived");
            }
        });
    }

    fn teardown(&mut self) {
        self.shutdown.cancel();
        let _ = self.apply(Event::Aborted);
    }

    fn publish_view(&self) {
        self.emitter.emit_view(&ScreenView::from(&self.screen));
    }
}

async fn within<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, Duration> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| limit),
        None => Ok(fut.await),
    }
}

fn timed_out(limit: Duration) -> String {
    format!("timed out after {}s", limit.as_secs())
}

// =============================================================================
// Screen Handle (for external control)
// =============================================================================

/// Handle for driving a running screen from the host UI.
#[derive(Clone)]
pub struct ScreenHandle {
    commands: mpsc::Sender<Command>,
    shutdown: CancellationToken,
}

impl ScreenHandle {
    /// "Start Scan" / "Scan Again".
    pub async fn request_scan(&self) -> RuntimeResult<()> {
        self.dispatch(Event::ScanRequested).await
    }

    /// Scanner modal dismissed.
    pub async fn close_modal(&self) -> RuntimeResult<()> {
        self.dispatch(Event::ModalClosed).await
    }

    /// "Print".
    pub async fn request_print(&self) -> RuntimeResult<()> {
        self.dispatch(Event::PrintRequested).await
    }

    /// Current snapshot of the screen.
    pub async fn view(&self) -> RuntimeResult<ScreenView> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::View(reply_tx))
            .await
            .map_err(|_| RuntimeError::ShuttingDown)?;
        reply_rx.await.map_err(|_| RuntimeError::ShuttingDown)
    }

    /// Signals the screen to tear down. Await the `JoinHandle` from
    /// [`ScanPrintScreen::spawn`] to wait for it.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Returns true while the controller task accepts commands.
    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled() && !self.commands.is_closed()
    }

    async fn dispatch(&self, event: Event) -> RuntimeResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Dispatch {
                event,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::ShuttingDown)?;

        let result = reply_rx.await.map_err(|_| RuntimeError::ShuttingDown)?;
        Ok(result?)
    }
}

// =============================================================================
// Builder Pattern
// =============================================================================

/// Builder for creating a [`ScanPrintScreen`].
pub struct ScanPrintScreenBuilder {
    config: ScreenConfig,
    permission: Option<Arc<dyn PermissionProvider>>,
    scanner: Option<Arc<dyn ScannerService>>,
    printer: Option<Arc<dyn PrinterService>>,
    emitter: Option<Arc<dyn ScreenEventEmitter>>,
}

impl ScanPrintScreenBuilder {
    pub fn new(config: ScreenConfig) -> Self {
        ScanPrintScreenBuilder {
            config,
            permission: None,
            scanner: None,
            printer: None,
            emitter: None,
        }
    }

    pub fn with_permission_provider(mut self, provider: Arc<dyn PermissionProvider>) -> Self {
        self.permission = Some(provider);
        self
    }

    pub fn with_scanner(mut self, scanner: Arc<dyn ScannerService>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    pub fn with_printer(mut self, printer: Arc<dyn PrinterService>) -> Self {
        self.printer = Some(printer);
        self
    }

    /// Sets the event emitter. Defaults to [`NoOpEmitter`].
    pub fn with_emitter(mut self, emitter: Arc<dyn ScreenEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Validates the config and builds the screen.
    pub fn build(self) -> RuntimeResult<ScanPrintScreen> {
        self.config.validate()?;

        let permission = self
            .permission
            .ok_or(RuntimeError::MissingCollaborator("permission provider"))?;
        let scanner = self
            .scanner
            .ok_or(RuntimeError::MissingCollaborator("scanner"))?;
        let printer = self
            .printer
            .ok_or(RuntimeError::MissingCollaborator("printer"))?;
        let emitter = self.emitter.unwrap_or_else(|| Arc::new(NoOpEmitter));

        Ok(ScanPrintScreen {
            config: Arc::new(self.config),
            permission,
            scanner,
            printer,
            emitter,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
