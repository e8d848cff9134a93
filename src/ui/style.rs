use ratatui::style::{Color, Modifier, Style};

use crate::board::{ChangeDirection, Tile};

pub const BOARD_BG: Color = Color::Rgb(18, 18, 20);
pub const TILE_BG: Color = Color::Rgb(34, 34, 38);
pub const TILE_FG: Color = Color::Rgb(245, 240, 225);
pub const ROLLING_FG: Color = Color::Rgb(255, 196, 0);

pub fn change_color(direction: ChangeDirection) -> Color {
    match direction {
        ChangeDirection::Up => Color::Green,
        ChangeDirection::Down => Color::Red,
        ChangeDirection::Flat => Color::Gray,
    }
}

pub fn tile_style(tile: &Tile) -> Style {
    let fg = if tile.is_rolling() { ROLLING_FG } else { TILE_FG };
    Style::default().fg(fg).bg(TILE_BG).add_modifier(Modifier::BOLD)
}

/// Pressed toggles read inverted.
pub fn toggle_style(pressed: bool) -> Style {
    if pressed {
        Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
    }
}
