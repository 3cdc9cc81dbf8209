//! Wallet connection modal
//!
//! Rendering is a pure function of `ModalProps`. The dialog cannot be
//! dismissed with Esc or by clicking outside it; `x` closes it explicitly.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::{Action, Context, Module, NotifyLevel};
use crate::domain::wallet::ModalStep;
use crate::ui::widgets::Spinner;

/// Tile index of the MetaMask connect/install option
pub const TILE_METAMASK: usize = 0;
/// Tile index of the "other wallets" placeholder
pub const TILE_OTHER: usize = 1;

#[derive(Debug, Clone)]
pub struct ModalProps<'a> {
    pub show: bool,
    pub step: ModalStep,
    pub metamask_installed: bool,
    pub error: &'a str,
    pub formatted_address: String,
    pub balance: &'a str,
    pub network_name: &'a str,
    pub selected_tile: usize,
    pub spinner_tick: usize,
}

pub fn render(f: &mut Frame, area: Rect, props: &ModalProps) {
    if !props.show {
        return;
    }
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue))
        .title(" Wallet ")
        .title_alignment(Alignment::Left)
        .title(
            ratatui::widgets::block::Title::from(Span::styled(
                " x close ",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Right),
        );
    let inner = block.inner(area);
    f.render_widget(block, area);

    match props.step {
        ModalStep::Select => render_select(f, inner, props),
        ModalStep::Connecting => render_connecting(f, inner, props),
        ModalStep::Success => render_success(f, inner, props),
        ModalStep::Error => render_error(f, inner, props),
    }
}

fn heading(title: &str, style: Style) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        style.add_modifier(Modifier::BOLD),
    ))
}

fn render_select(f: &mut Frame, area: Rect, props: &ModalProps) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let header = Paragraph::new(Text::from(vec![
        heading(ModalStep::Select.title(), Style::default().fg(Color::White)),
        Line::from(Span::styled(
            "Choose how you want to connect",
            Style::default().fg(Color::DarkGray),
        )),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let (name, hint, arrow) = if props.metamask_installed {
        ("🦊 MetaMask", "Connect with MetaMask wallet", "→")
    } else {
        ("🦊 Install MetaMask", "Install MetaMask extension first", "⬇")
    };
    render_tile(
        f,
        chunks[1],
        name,
        hint,
        arrow,
        props.selected_tile == TILE_METAMASK,
        false,
    );
    render_tile(
        f,
        chunks[2],
        "🔮 Other Wallets",
        "Coming soon...",
        "🚧",
        props.selected_tile == TILE_OTHER,
        true,
    );
}

fn render_tile(
    f: &mut Frame,
    area: Rect,
    name: &str,
    hint: &str,
    arrow: &str,
    selected: bool,
    disabled: bool,
) {
    let border_style = match (selected, disabled) {
        (_, true) => Style::default().fg(Color::DarkGray),
        (true, false) => Style::default().fg(Color::LightCyan),
        (false, false) => Style::default().fg(Color::Gray),
    };
    let text_style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(name.to_string(), text_style.add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(arrow.to_string(), text_style),
        ]),
        Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let tile = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(tile, area);
}

fn render_connecting(f: &mut Frame, area: Rect, props: &ModalProps) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        Spinner::new(props.spinner_tick).label("Loading..."),
        chunks[0],
    );

    let intro = Paragraph::new(Text::from(vec![
        heading(ModalStep::Connecting.title(), Style::default().fg(Color::White)),
        Line::from(Span::styled(
            "Please approve the connection in your MetaMask extension",
            Style::default().fg(Color::DarkGray),
        )),
    ]))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(intro, chunks[1]);

    let steps = [
        ("1", "Open MetaMask", true),
        ("2", "Approve Connection", true),
        ("3", "Complete", false),
    ];
    let lines: Vec<Line> = steps
        .iter()
        .map(|(number, label, active)| {
            let style = if *active {
                Style::default().fg(Color::LightBlue)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(format!("({number}) "), style.add_modifier(Modifier::BOLD)),
                Span::styled(label.to_string(), style),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        chunks[2],
    );
}

fn render_success(f: &mut Frame, area: Rect, props: &ModalProps) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);
    let lines = vec![
        Line::from("✅"),
        Line::from(""),
        heading(ModalStep::Success.title(), Style::default().fg(Color::Green)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Wallet:  ", label),
            Span::styled(props.formatted_address.clone(), value),
        ]),
        Line::from(vec![
            Span::styled("Balance: ", label),
            Span::styled(format!("{} ETH", props.balance), value),
        ]),
        Line::from(vec![
            Span::styled("Network: ", label),
            Span::styled(props.network_name.to_string(), value),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "This modal will close automatically...",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        area,
    );
}

fn render_error(f: &mut Frame, area: Rect, props: &ModalProps) {
    let lines = vec![
        Line::from("❌"),
        Line::from(""),
        heading(ModalStep::Error.title(), Style::default().fg(Color::Red)),
        Line::from(""),
        Line::from(Span::styled(
            props.error.to_string(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[r] Refresh Page", Style::default().fg(Color::LightBlue)),
            Span::raw("    "),
            Span::styled(
                "[t] Try Again",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

/// Key handling while the modal is shown
#[derive(Debug, Default)]
pub struct WalletModal {
    selected: usize,
}

impl WalletModal {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn reset(&mut self) {
        self.selected = TILE_METAMASK;
    }
}

impl Module for WalletModal {
    fn handle_key(&mut self, key: KeyEvent, ctx: &Context) -> Action {
        match key.code {
            KeyCode::Char('x') => return Action::CloseWalletModal,
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Esc => {
                return Action::Notify(
                    "Press x to close the wallet dialog".to_string(),
                    NotifyLevel::Info,
                )
            }
            _ => {}
        }

        match ctx.modal_step {
            ModalStep::Select => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.selected = TILE_METAMASK;
                    Action::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.selected = TILE_OTHER;
                    Action::None
                }
                KeyCode::Enter if self.selected == TILE_METAMASK => {
                    if ctx.wallet_installed {
                        Action::ConnectMetaMask
                    } else {
                        Action::InstallMetaMask
                    }
                }
                KeyCode::Enter => {
                    Action::Notify("More wallets coming soon".to_string(), NotifyLevel::Info)
                }
                _ => Action::None,
            },
            ModalStep::Error => match key.code {
                KeyCode::Char('r') => Action::Reload,
                KeyCode::Char('t') | KeyCode::Enter => Action::Retry,
                _ => Action::None,
            },
            ModalStep::Connecting | ModalStep::Success => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctx(step: ModalStep, installed: bool) -> Context {
        Context {
            wallet_installed: installed,
            modal_step: step,
            ..Context::default()
        }
    }

    #[test]
    fn test_escape_does_not_close() {
        let mut modal = WalletModal::default();
        let action = modal.handle_key(press(KeyCode::Esc), &ctx(ModalStep::Select, true));
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Info)));
    }

    #[test]
    fn test_select_tile_actions() {
        let mut modal = WalletModal::default();
        assert_eq!(
            modal.handle_key(press(KeyCode::Enter), &ctx(ModalStep::Select, true)),
            Action::ConnectMetaMask
        );
        assert_eq!(
            modal.handle_key(press(KeyCode::Enter), &ctx(ModalStep::Select, false)),
            Action::InstallMetaMask
        );

        modal.handle_key(press(KeyCode::Down), &ctx(ModalStep::Select, true));
        assert_eq!(modal.selected(), TILE_OTHER);
        assert!(matches!(
            modal.handle_key(press(KeyCode::Enter), &ctx(ModalStep::Select, true)),
            Action::Notify(..)
        ));
    }

    #[test]
    fn test_error_step_actions() {
        let mut modal = WalletModal::default();
        let error = ctx(ModalStep::Error, true);
        assert_eq!(modal.handle_key(press(KeyCode::Char('r')), &error), Action::Reload);
        assert_eq!(modal.handle_key(press(KeyCode::Char('t')), &error), Action::Retry);
        assert_eq!(
            modal.handle_key(press(KeyCode::Char('x')), &error),
            Action::CloseWalletModal
        );
    }

    #[test]
    fn test_connecting_ignores_keys() {
        let mut modal = WalletModal::default();
        let connecting = ctx(ModalStep::Connecting, true);
        assert_eq!(modal.handle_key(press(KeyCode::Enter), &connecting), Action::None);
        assert_eq!(modal.handle_key(press(KeyCode::Char('r')), &connecting), Action::None);
    }
}
