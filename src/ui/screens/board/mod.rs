use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};
use crate::app::App;
use crate::ui::components::UiComponent;
use crate::ui::style::BOARD_BG;

pub mod card_grid;

const HELP_TEXT: &str = "m: Audio CLACK • a: Ambient • r: Aggiorna • d: Chiudi errore • q: Esci";

pub fn render_board(app: &App, area: Rect, buf: &mut Buffer) {
    Block::default().style(Style::default().bg(BOARD_BG)).render(area, buf);

    let banner_height = if app.board.error_banner().is_some() { 3 } else { 0 };

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(banner_height),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, main_layout[0], buf);

    if app.board.cards().is_empty() {
        let text = if app.board.has_rendered() {
            "Nessun titolo nel feed."
        } else {
            "In attesa dei dati…"
        };
        UiComponent::empty_message(text).render(main_layout[1], buf);
    } else {
        card_grid::render_card_grid(app.board.cards(), main_layout[1], buf);
    }

    if let Some(message) = app.board.error_banner() {
        UiComponent::error_banner(message).render(main_layout[2], buf);
    }

    UiComponent::help(HELP_TEXT).render(main_layout[3], buf);
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let updated = match app.board.last_updated() {
        Some(at) => format!("agg. {}", at.format("%H:%M:%S")),
        None => "—".to_string(),
    };

    let mut spans = vec![
        UiComponent::toggle(app.audio.label(), app.audio.is_enabled()),
        Span::raw(" "),
        UiComponent::toggle(app.ambient.label(), app.ambient.is_playing()),
        Span::raw("  "),
        Span::styled(updated, Style::default().fg(Color::Gray)),
    ];
    if let Some(hint) = app.audio.hint() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(hint, Style::default().fg(Color::Yellow).italic()));
    }

    Paragraph::new(Line::from(spans))
        .block(
            Block::bordered()
                .title(" FLAPBOARD ")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded)
        )
        .alignment(Alignment::Center)
        .render(area, buf);
}
