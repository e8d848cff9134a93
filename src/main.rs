use clap::Parser;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use flapboard::app::App;
use flapboard::config::{Cli, Config};
use flapboard::util;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    let _log_guard = util::log::init(&config.log_dir)?;

    let terminal = ratatui::init();
    let _ = crossterm::execute!(std::io::stdout(), EnableFocusChange);
    let result = match App::new(&config) {
        Ok(app) => app.run(terminal).await,
        Err(e) => Err(e),
    };
    let _ = crossterm::execute!(std::io::stdout(), DisableFocusChange);
    ratatui::restore();
    result
}
