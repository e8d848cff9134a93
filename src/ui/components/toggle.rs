use ratatui::text::Span;

use super::UiComponent;
use crate::ui::style::toggle_style;

impl UiComponent {
    /// A button-like label; `pressed` mirrors the toggle state.
    pub fn toggle(label: &str, pressed: bool) -> Span<'static> {
        Span::styled(format!(" {} ", label), toggle_style(pressed))
    }
}
