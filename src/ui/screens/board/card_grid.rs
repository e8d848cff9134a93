use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};
use crate::board::Card;
use crate::ui::style::{change_color, tile_style};

const CARD_WIDTH: u16 = 34;
const CARD_HEIGHT: u16 = 5;

/// Cards flow left to right, top to bottom. Whatever does not fit is cut.
pub fn render_card_grid(cards: &[Card], area: Rect, buf: &mut Buffer) {
    let per_row = (area.width / CARD_WIDTH).max(1) as usize;
    let rows = (area.height / CARD_HEIGHT) as usize;

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); rows])
        .split(area);

    for (row, chunk) in cards.chunks(per_row).take(rows).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, per_row as u32); per_row])
            .split(row_areas[row]);

        for (card, cell) in chunk.iter().zip(cells.iter()) {
            render_card(card, *cell, buf);
        }
    }
}

fn render_card(card: &Card, area: Rect, buf: &mut Buffer) {
    let change = Span::styled(
        card.change.text.clone(),
        Style::default().fg(change_color(card.change.direction)).add_modifier(Modifier::BOLD),
    );

    let mut tiles = Vec::with_capacity(card.tiles.len() * 2);
    for tile in &card.tiles {
        tiles.push(Span::styled(format!(" {} ", tile.glyph), tile_style(tile)));
        tiles.push(Span::raw(" "));
    }
    tiles.pop();

    let lines = vec![
        Line::from(vec![change]),
        Line::from(""),
        Line::from(tiles),
    ];

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .title(Span::styled(card.name.clone(), Style::default().add_modifier(Modifier::BOLD)))
                .border_type(BorderType::Rounded)
        )
        .render(area, buf);
}
