use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use hearth_core::{
    update, DisplayMode, Msg, NotificationKind, ShellConfig, ShellState, ShellViewModel,
};
use hearth_logging::{hearth_info, hearth_warn};
use hearth_worker::FetchSettings;

use super::bus::{publish_notification, EventBus, APP_INSTALLED};
use super::effects::EffectRunner;
use super::install::{self, InstallGateway};
use super::logging::{self, LogDestination};
use super::prompt::{InstallProspect, PromptOutcome, PromptSlot};
use super::storage::{self, LocalStore};
use super::surfaces::{BannerSurface, ToastSurface};
use super::{wall_clock, Clock};

/// Stand-in for the browser-supplied capability when the host is driven
/// from a terminal instead of a real platform.
struct ScriptedProspect {
    accept: bool,
}

impl InstallProspect for ScriptedProspect {
    fn suppress_native_banner(&self) {
        hearth_info!("native install banner suppressed");
    }

    fn prompt(self: Box<Self>) -> PromptOutcome {
        if self.accept {
            PromptOutcome::Accepted
        } else {
            PromptOutcome::Dismissed
        }
    }
}

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::Both);

    let config = environment_config();
    hearth_info!(
        "starting shell (user agent {:?}, display mode {:?})",
        config.user_agent,
        config.display_mode
    );

    let data_dir = std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join(".hearth");
    let store = LocalStore::new(data_dir);

    let bus = Arc::new(EventBus::new());
    let slot = Arc::new(PromptSlot::new());
    let clock = wall_clock();
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();

    let runner = EffectRunner::new(msg_tx.clone(), slot.clone(), store.clone(), clock.clone());

    // Registration failure leaves the app running as a plain page.
    let _worker = install::register_background_worker(FetchSettings::default());

    let mut state = ShellState::new(config);
    if let Some(at_ms) = storage::load_dismissal(&store) {
        state = dispatch(state, Msg::DismissalRestored { at_ms }, &runner);
    }

    // Page-lifetime listener, independent of any surface.
    let installed_tx = msg_tx.clone();
    let _installed_sub = bus.subscribe(APP_INSTALLED, move |_| {
        let _ = installed_tx.send(Msg::AppInstalled);
    });

    let _banner = BannerSurface::mount(bus.clone(), slot.clone(), msg_tx.clone(), clock.clone());
    let _toast = ToastSurface::mount(bus.clone(), msg_tx.clone(), clock.clone());

    let gateway = Arc::new(InstallGateway::new(bus.clone(), slot, msg_tx.clone()));
    let running = Arc::new(AtomicBool::new(true));
    spawn_command_reader(
        gateway,
        bus.clone(),
        msg_tx.clone(),
        clock,
        running.clone(),
    );

    publish_notification(&bus, "Welcome to Hearth", NotificationKind::Info, None);

    while running.load(Ordering::SeqCst) {
        match msg_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(msg) => state = dispatch(state, msg, &runner),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    hearth_info!("shell shut down");
    Ok(())
}

fn dispatch(state: ShellState, msg: Msg, runner: &EffectRunner) -> ShellState {
    let (mut state, effects) = update(state, msg);
    runner.run(effects);
    if state.consume_dirty() {
        render(&state.view());
    }
    state
}

fn render(view: &ShellViewModel) {
    match &view.banner {
        Some(banner) if banner.manual_instructions => {
            hearth_info!("banner: install via the share menu's add-to-home-screen")
        }
        Some(_) => hearth_info!("banner: install prompt visible"),
        None => hearth_info!("banner: hidden"),
    }
    for toast in &view.notifications {
        hearth_info!(
            "toast {:?} [{:?}] {} ({} ms)",
            toast.id,
            toast.kind,
            toast.message,
            toast.duration_ms
        );
    }
}

fn environment_config() -> ShellConfig {
    let user_agent = std::env::var("HEARTH_USER_AGENT").unwrap_or_default();
    // Anything other than an explicit standalone claim means a browser tab.
    let display_mode = match std::env::var("HEARTH_DISPLAY_MODE").as_deref() {
        Ok("standalone") => DisplayMode::Standalone,
        _ => DisplayMode::Browser,
    };
    ShellConfig {
        user_agent,
        display_mode,
        ..ShellConfig::default()
    }
}

/// Reads simulated platform events from stdin until EOF or `quit`.
fn spawn_command_reader(
    gateway: Arc<InstallGateway>,
    bus: Arc<EventBus>,
    msg_tx: mpsc::Sender<Msg>,
    now_ms: Clock,
    running: Arc<AtomicBool>,
) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            if !handle_command(line.trim(), &gateway, &bus, &msg_tx, &now_ms) {
                break;
            }
        }
        running.store(false, Ordering::SeqCst);
    });
}

fn handle_command(
    line: &str,
    gateway: &InstallGateway,
    bus: &EventBus,
    msg_tx: &mpsc::Sender<Msg>,
    now_ms: &Clock,
) -> bool {
    match line {
        "" => {}
        "quit" => return false,
        "eligible" => {
            gateway.capture_deferred_install(Box::new(ScriptedProspect { accept: true }));
        }
        "eligible-declining" => {
            gateway.capture_deferred_install(Box::new(ScriptedProspect { accept: false }));
        }
        "install" => gateway.request_install(),
        "installed" => gateway.notify_app_installed(),
        "dismiss" => {
            let _ = msg_tx.send(Msg::BannerDismissed { now_ms: now_ms() });
        }
        other => {
            if let Some(message) = other.strip_prefix("toast ") {
                publish_notification(bus, message, NotificationKind::Info, None);
            } else {
                hearth_warn!("unknown command {:?}", other);
            }
        }
    }
    true
}
