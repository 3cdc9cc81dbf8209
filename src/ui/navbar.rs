//! Navigation bar: brand, links, error banner and wallet summary

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::{Action, Context, Module, NotifyLevel};

pub const LINKS: [&str; 3] = ["Marketplace", "About Us", "Developers"];

const BRAND_WIDTH: u16 = 14;
const WALLET_WIDTH: u16 = 30;
const MAX_BANNER_WIDTH: u16 = 48;

/// Everything the navbar shows, taken straight from wallet state
#[derive(Debug, Clone)]
pub struct NavbarProps<'a> {
    pub error: &'a str,
    pub is_connected: bool,
    pub is_connecting: bool,
    pub formatted_address: String,
    pub balance: &'a str,
    pub network_name: &'a str,
    pub active_link: usize,
    /// Local time the current account was adopted
    pub connected_since: Option<String>,
}

struct NavbarAreas {
    brand: Rect,
    links: Rect,
    banner: Rect,
    wallet: Rect,
}

fn split(area: Rect, error: &str) -> NavbarAreas {
    let banner_width = if error.is_empty() {
        0
    } else {
        (error.chars().count() as u16 / 2 + 4).clamp(20, MAX_BANNER_WIDTH)
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BRAND_WIDTH),
            Constraint::Min(10),
            Constraint::Length(banner_width),
            Constraint::Length(WALLET_WIDTH),
        ])
        .split(area);
    NavbarAreas {
        brand: chunks[0],
        links: chunks[1],
        banner: chunks[2],
        wallet: chunks[3],
    }
}

/// Screen area of the connect/disconnect control, for mouse hits
pub fn wallet_area(area: Rect, error: &str) -> Rect {
    split(area, error).wallet
}

pub fn render(f: &mut Frame, area: Rect, props: &NavbarProps) {
    let areas = split(area, props.error);

    let brand = Paragraph::new(Line::from(Span::styled(
        "◆ walletbar",
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::TOP | Borders::BOTTOM | Borders::LEFT));
    f.render_widget(brand, areas.brand);

    let mut link_spans = Vec::new();
    for (idx, link) in LINKS.iter().enumerate() {
        let style = if idx == props.active_link {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        link_spans.push(Span::styled(format!("{} {}", idx + 1, link), style));
        link_spans.push(Span::raw("   "));
    }
    let links = Paragraph::new(Line::from(link_spans))
        .block(Block::default().borders(Borders::TOP | Borders::BOTTOM));
    f.render_widget(links, areas.links);

    if !props.error.is_empty() {
        let banner = Paragraph::new(Text::from(props.error.to_string()))
            .style(Style::default().fg(Color::White).bg(Color::Red))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(banner, areas.banner);
    }

    let wallet_lines = if props.is_connected {
        vec![
            Line::from(Span::styled(
                props.formatted_address.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} ETH", props.balance),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                props.network_name.to_string(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(vec![
                Span::styled("[d] Disconnect", Style::default().fg(Color::LightRed)),
                Span::styled(
                    props
                        .connected_since
                        .as_deref()
                        .map(|since| format!("  {since}"))
                        .unwrap_or_default(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        ]
    } else {
        let style = if props.is_connecting {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD)
        };
        vec![
            Line::from(""),
            Line::from(Span::styled(" Connect Wallet ", style)),
        ]
    };
    let wallet = Paragraph::new(Text::from(wallet_lines))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::TOP | Borders::BOTTOM | Borders::RIGHT));
    f.render_widget(wallet, areas.wallet);
}

/// Key handling while the wallet modal is hidden
#[derive(Debug, Default)]
pub struct Navbar;

impl Module for Navbar {
    fn handle_key(&mut self, key: KeyEvent, ctx: &Context) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('c') | KeyCode::Enter => {
                if ctx.is_connected {
                    Action::None
                } else if ctx.is_connecting {
                    Action::Notify("Connection in progress".to_string(), NotifyLevel::Warn)
                } else {
                    Action::OpenWalletModal
                }
            }
            KeyCode::Char('d') if ctx.is_connected => Action::Disconnect,
            KeyCode::Char('y') if ctx.is_connected => Action::Copy(ctx.account.clone()),
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char(ch @ '1'..='3') => Action::SelectLink((ch as u8 - b'1') as usize),
            _ => Action::None,
        }
    }
}
