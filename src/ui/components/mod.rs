mod empty_message;
mod error_banner;
mod help;
mod toggle;

/// Namespace for small reusable widgets.
pub struct UiComponent;
