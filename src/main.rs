use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use walletbar::app::App;
use walletbar::config;
use walletbar::core::{Action, NotifyLevel};
use walletbar::infrastructure::ethereum::ProviderConfig;
use walletbar::infrastructure::runtime::{RuntimeBridge, RuntimeCommand};
use walletbar::ui;

const DEFAULT_WALLET_ENDPOINT: &str = "127.0.0.1:1248";

#[derive(Debug, Parser)]
#[command(
    name = "walletbar",
    version,
    about = "walletbar: connect a desktop Ethereum wallet from the terminal"
)]
struct Args {
    /// HTTP JSON-RPC wallet endpoint (e.g. http://127.0.0.1:1248)
    #[arg(long)]
    rpc: Option<String>,

    /// WebSocket wallet endpoint (e.g. ws://127.0.0.1:1248)
    #[arg(long)]
    ws: Option<String>,

    /// IPC path of the wallet. Unix only.
    #[arg(long)]
    ipc: Option<PathBuf>,

    /// Write logs here instead of the data directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(err) = init_logging(args.log_file.clone()) {
        eprintln!("logging disabled: {err:#}");
    }

    let config = config::load();
    let endpoints = endpoints_from_args_and_config(&args, &config)?;
    tracing::info!(
        endpoints = ?endpoints.iter().map(ProviderConfig::display).collect::<Vec<_>>(),
        "starting walletbar"
    );

    let runtime = RuntimeBridge::new(endpoints, config.poll_interval())?;
    let app = App::from_config(&config);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %format!("{err:#}"), "walletbar exited with error");
        eprintln!("{err:?}");
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the TUI
fn init_logging(log_file: Option<PathBuf>) -> Result<()> {
    let path = log_file
        .or_else(config::log_path)
        .context("no location for the log file")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    let filter = EnvFilter::try_from_env("WALLETBAR_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        app.sync_context();
        terminal.draw(|f| ui::draw(f, &mut app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick(Instant::now());
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime);
    }
}

/// Forward pending requests to the worker and apply what came back
fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        tracing::debug!(?event, "runtime event");
        app.apply_runtime_event(event, Instant::now());
    }

    if app.take_reload_request() {
        send_command(app, runtime, RuntimeCommand::Reload);
    }
    if app.take_disconnect_request() {
        send_command(app, runtime, RuntimeCommand::Disconnect);
    }
    if let Some(id) = app.take_connect_request() {
        send_command(app, runtime, RuntimeCommand::Connect { id });
    }
    if let Some(url) = app.take_install_request() {
        open_install_page(app, &url);
    }
    if let Some(text) = app.take_copy_request() {
        copy_to_clipboard(app, text);
    }
}

fn send_command(app: &mut App, runtime: &RuntimeBridge, command: RuntimeCommand) {
    if let Err(err) = runtime.send(command) {
        tracing::error!(error = %err, "wallet worker unavailable");
        app.set_status(format!("Wallet worker unavailable: {err}"), NotifyLevel::Error);
    }
}

fn open_install_page(app: &mut App, url: &str) {
    match open::that_detached(url) {
        Ok(()) => {
            tracing::info!(url, "opened install page");
            app.set_status(format!("Opened {url}"), NotifyLevel::Info);
        }
        Err(err) => {
            tracing::warn!(url, error = %err, "could not open browser");
            app.set_status(format!("Install MetaMask from {url}"), NotifyLevel::Warn);
        }
    }
}

fn copy_to_clipboard(app: &mut App, text: String) {
    use arboard::Clipboard;

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(&text).is_ok() {
                let shown = walletbar::domain::wallet::format_address(&text);
                app.ctx.set_clipboard(text);
                app.set_status(format!("Copied: {shown}"), NotifyLevel::Info);
            } else {
                app.set_status("Failed to copy to clipboard", NotifyLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Clipboard not available", NotifyLevel::Error);
        }
    }
}

/// Clicks outside the modal never dismiss it
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }
    if app.wallet.modal().show {
        return;
    }
    let Some(size) = terminal_rect() else {
        return;
    };
    let areas = ui::layout::areas(size);
    let connection = app.wallet.connection();
    let wallet_area = ui::navbar::wallet_area(areas.header, &connection.error);
    if !ui::layout::rect_contains(wallet_area, mouse.column, mouse.row) {
        return;
    }
    if !connection.is_connected && !connection.is_connecting {
        app.dispatch(Action::OpenWalletModal);
    }
}

fn terminal_rect() -> Option<Rect> {
    let (width, height) = crossterm::terminal::size().ok()?;
    Some(Rect {
        x: 0,
        y: 0,
        width,
        height,
    })
}

fn endpoints_from_args_and_config(
    args: &Args,
    config: &config::Config,
) -> Result<Vec<ProviderConfig>> {
    use std::collections::BTreeSet;

    fn push_endpoint(
        endpoints: &mut Vec<ProviderConfig>,
        seen: &mut BTreeSet<String>,
        endpoint: ProviderConfig,
    ) {
        if seen.insert(endpoint.display().to_lowercase()) {
            endpoints.push(endpoint);
        }
    }

    let mut endpoints = Vec::new();
    let mut seen = BTreeSet::<String>::new();

    // CLI arguments take precedence
    if let Some(ipc) = args.ipc.clone() {
        #[cfg(unix)]
        {
            push_endpoint(&mut endpoints, &mut seen, ProviderConfig::Ipc(ipc));
        }
        #[cfg(not(unix))]
        {
            let _ = ipc;
            return Err(anyhow::anyhow!("IPC is not supported on this platform"));
        }
    } else if let Some(ws) = non_empty(args.ws.as_deref()) {
        push_endpoint(&mut endpoints, &mut seen, ProviderConfig::WebSocket(ws.to_string()));
    } else if let Some(rpc) = non_empty(args.rpc.as_deref()) {
        push_endpoint(
            &mut endpoints,
            &mut seen,
            ProviderConfig::Http(normalize_http_endpoint(rpc)),
        );
    }

    for entry in &config.endpoints {
        if let Some(rpc) = non_empty(entry.rpc.as_deref()) {
            push_endpoint(
                &mut endpoints,
                &mut seen,
                ProviderConfig::Http(normalize_http_endpoint(rpc)),
            );
        } else if let Some(ws) = non_empty(entry.ws.as_deref()) {
            push_endpoint(&mut endpoints, &mut seen, ProviderConfig::WebSocket(ws.to_string()));
        } else if let Some(ipc) = non_empty(entry.ipc.as_deref()) {
            #[cfg(unix)]
            {
                if let Some(path) = expand_path(ipc) {
                    push_endpoint(&mut endpoints, &mut seen, ProviderConfig::Ipc(path));
                }
            }
            #[cfg(not(unix))]
            {
                tracing::warn!(ipc, "IPC endpoints are not supported on this platform");
            }
        } else {
            tracing::warn!(name = ?entry.name, "endpoint entry has no rpc, ws or ipc");
        }
    }

    if endpoints.is_empty() {
        push_endpoint(
            &mut endpoints,
            &mut seen,
            ProviderConfig::Http(normalize_http_endpoint(DEFAULT_WALLET_ENDPOINT)),
        );
    }

    Ok(endpoints)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn normalize_http_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(unix)]
fn expand_path(path: &str) -> Option<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        return std::env::var_os("HOME").map(|home| PathBuf::from(home).join(rest));
    }
    Some(PathBuf::from(path))
}
