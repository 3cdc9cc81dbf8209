//! Draw the whole screen into a test backend and look for the visible text

use std::time::Instant;

use ratatui::backend::TestBackend;
use ratatui::Terminal;

use walletbar::app::App;
use walletbar::core::Action;
use walletbar::domain::wallet::{AccountInfo, ConnectError};
use walletbar::infrastructure::ethereum::ProviderInfo;
use walletbar::infrastructure::runtime::RuntimeEvent;
use walletbar::ui;

const ADDR: &str = "0x1234567890abcdef1234567890abcdef12345678";

fn screen(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
    terminal.draw(|f| ui::draw(f, app)).expect("draw");
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer.get(x, y).symbol());
        }
        text.push('\n');
    }
    text
}

fn with_wallet(app: &mut App) {
    app.apply_runtime_event(
        RuntimeEvent::ProviderDetected {
            info: Some(ProviderInfo {
                endpoint: "http://127.0.0.1:1248".to_string(),
                client_version: "Frame/v0.6.9".to_string(),
            }),
        },
        Instant::now(),
    );
    app.status = None;
}

fn connected_account() -> AccountInfo {
    AccountInfo {
        address: ADDR.to_string(),
        balance: "1.5000".to_string(),
        chain_id: "0x89".to_string(),
    }
}

#[test]
fn test_disconnected_navbar() {
    let mut app = App::new();
    with_wallet(&mut app);
    let text = screen(&mut app);

    assert!(text.contains("Connect Wallet"));
    assert!(text.contains("Marketplace"));
    assert!(text.contains("About Us"));
    assert!(text.contains("Developers"));
    assert!(text.contains("Frame/v0.6.9"));
    assert!(!text.contains("Disconnect"));
}

#[test]
fn test_connected_navbar() {
    let mut app = App::new();
    with_wallet(&mut app);
    app.apply_runtime_event(
        RuntimeEvent::Restored {
            account: connected_account(),
        },
        Instant::now(),
    );
    let text = screen(&mut app);

    assert!(text.contains("0x1234...5678"));
    assert!(text.contains("1.5000 ETH"));
    assert!(text.contains("Polygon Mainnet"));
    assert!(text.contains("[d] Disconnect"));
    assert!(!text.contains("Connect Wallet"));
}

#[test]
fn test_select_step_offers_install_without_wallet() {
    let mut app = App::new();
    app.apply_runtime_event(RuntimeEvent::ProviderDetected { info: None }, Instant::now());
    app.status = None;
    app.dispatch(Action::OpenWalletModal);
    let text = screen(&mut app);

    assert!(text.contains("Connect Wallet"));
    assert!(text.contains("Install MetaMask"));
    assert!(text.contains("Other Wallets"));
    assert!(text.contains("Coming soon..."));
    assert!(text.contains("No wallet detected"));
}

#[test]
fn test_select_step_offers_metamask_with_wallet() {
    let mut app = App::new();
    with_wallet(&mut app);
    app.dispatch(Action::OpenWalletModal);
    let text = screen(&mut app);

    assert!(text.contains("Connect with MetaMask wallet"));
    assert!(!text.contains("Install MetaMask"));
}

#[test]
fn test_connecting_step() {
    let mut app = App::new();
    with_wallet(&mut app);
    app.dispatch(Action::OpenWalletModal);
    app.dispatch(Action::ConnectMetaMask);
    let text = screen(&mut app);

    assert!(text.contains("Connecting to MetaMask"));
    assert!(text.contains("Open MetaMask"));
    assert!(text.contains("Approve Connection"));
    assert!(text.contains("Complete"));
}

#[test]
fn test_success_step() {
    let mut app = App::new();
    with_wallet(&mut app);
    app.dispatch(Action::OpenWalletModal);
    app.dispatch(Action::ConnectMetaMask);
    app.apply_runtime_event(
        RuntimeEvent::ConnectFinished {
            id: 1,
            result: Ok(connected_account()),
        },
        Instant::now(),
    );
    let text = screen(&mut app);

    assert!(text.contains("Successfully Connected!"));
    assert!(text.contains("This modal will close automatically..."));
    assert!(text.contains("1.5000 ETH"));
}

#[test]
fn test_error_step_and_banner() {
    let mut app = App::new();
    with_wallet(&mut app);
    app.dispatch(Action::OpenWalletModal);
    app.dispatch(Action::ConnectMetaMask);
    app.apply_runtime_event(
        RuntimeEvent::ConnectFinished {
            id: 1,
            result: Err(ConnectError::RequestAlreadyPending),
        },
        Instant::now(),
    );
    let text = screen(&mut app);

    assert!(text.contains("Connection Failed"));
    assert!(text.contains("[r] Refresh Page"));
    assert!(text.contains("[t] Try Again"));
    assert!(text.contains("already processing"));
}

#[test]
fn test_hidden_modal_draws_nothing() {
    let mut app = App::new();
    with_wallet(&mut app);
    let text = screen(&mut app);
    assert!(!text.contains("Choose how you want to connect"));
}
