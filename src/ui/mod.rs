use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod modal;
pub mod navbar;
pub mod widgets;

use crate::app::App;
use crate::core::NotifyLevel;

pub fn draw(f: &mut Frame, app: &mut App) {
    let areas = layout::areas(f.size());
    let connection = app.wallet.connection();

    let navbar_props = navbar::NavbarProps {
        error: &connection.error,
        is_connected: connection.is_connected,
        is_connecting: connection.is_connecting,
        formatted_address: app.wallet.formatted_address(),
        balance: &connection.balance,
        network_name: &connection.network_name,
        active_link: app.active_link,
        connected_since: app.connected_since(),
    };
    navbar::render(f, areas.header, &navbar_props);

    draw_body(f, areas.main, app);
    draw_status_line(f, areas.status_line, app);
    draw_hint_line(f, areas.hint_line, app);

    let modal_state = app.wallet.modal();
    let connection = app.wallet.connection();
    let modal_props = modal::ModalProps {
        show: modal_state.show,
        step: modal_state.step,
        metamask_installed: app.is_metamask_installed(),
        error: &connection.error,
        formatted_address: app.wallet.formatted_address(),
        balance: &connection.balance,
        network_name: &connection.network_name,
        selected_tile: app.modal.selected(),
        spinner_tick: app.spinner_tick,
    };
    modal::render(f, areas.modal, &modal_props);
}

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let title = navbar::LINKS
        .get(app.active_link)
        .copied()
        .unwrap_or(navbar::LINKS[0]);
    let blurb = match app.active_link {
        0 => "Browse listings. Connect a wallet to buy or sell.",
        1 => "A terminal storefront that talks to your desktop wallet.",
        _ => "Point walletbar at any EIP-1193 JSON-RPC wallet with --rpc, --ws or --ipc.",
    };
    let page = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(blurb, Style::default().fg(Color::Gray))),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")));
    f.render_widget(page, chunks[0]);

    let connection = app.wallet.connection();
    let label = Style::default().fg(Color::DarkGray);
    let dash = |value: &str| {
        if value.is_empty() {
            "--".to_string()
        } else {
            value.to_string()
        }
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("State    ", label),
            Span::raw(if connection.is_connected {
                "connected"
            } else if connection.is_connecting {
                "connecting"
            } else {
                "disconnected"
            }),
        ]),
        Line::from(vec![
            Span::styled("Account  ", label),
            Span::raw(dash(&connection.account)),
        ]),
        Line::from(vec![
            Span::styled("Balance  ", label),
            Span::raw(if connection.balance.is_empty() {
                "--".to_string()
            } else {
                format!("{} ETH", connection.balance)
            }),
        ]),
        Line::from(vec![
            Span::styled("Chain    ", label),
            Span::raw(dash(&connection.chain_id)),
        ]),
        Line::from(vec![
            Span::styled("Network  ", label),
            Span::raw(dash(&connection.network_name)),
        ]),
    ];
    let details = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Wallet "));
    f.render_widget(details, chunks[1]);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let content = if let Some((text, level)) = app.status_text() {
        let color = match level {
            NotifyLevel::Info => Color::LightGreen,
            NotifyLevel::Warn => Color::LightYellow,
            NotifyLevel::Error => Color::LightRed,
        };
        Line::from(vec![
            Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
            Span::styled(text, Style::default().fg(color)),
        ])
    } else if app.detecting {
        Line::from(Span::styled(
            "Detecting wallet…",
            Style::default().fg(Color::DarkGray),
        ))
    } else if let Some(info) = app.provider.as_ref() {
        Line::from(vec![
            Span::styled("Wallet ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{}  ", info.endpoint)),
            Span::styled("Client ", Style::default().fg(Color::DarkGray)),
            Span::raw(info.client_version.clone()),
        ])
    } else {
        Line::from(Span::styled(
            "No wallet detected",
            Style::default().fg(Color::LightYellow),
        ))
    };
    f.render_widget(Paragraph::new(content), area);
}

fn draw_hint_line(f: &mut Frame, area: Rect, app: &App) {
    let hints = if app.wallet.modal().show {
        "↑/↓ select  Enter choose  x close  q quit"
    } else if app.wallet.connection().is_connected {
        "1-3 pages  y copy address  d disconnect  r reload  q quit"
    } else {
        "1-3 pages  c connect wallet  r reload  q quit"
    };
    f.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        area,
    );
}
