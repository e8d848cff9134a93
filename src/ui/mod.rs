pub mod components;
pub mod screens;
pub mod style;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::Widget,
};
use crate::app::App;
use crate::ui::screens::board::render_board;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_board(self, area, buf);
    }
}
