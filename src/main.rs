use anyhow::Result;

mod app;
mod client;
mod config;
mod handler;
mod tui;
mod ui;

use app::App;
use client::QueryClient;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|_| Config::new());
    let client = QueryClient::new(config.endpoint());
    let mut app = App::new(client);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut tui::EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event);
        }

        // Settle the exchange once the spawned request has finished. Ticks
        // arrive continuously, so this runs within one tick of completion.
        app.poll_query_task().await;
    }

    Ok(())
}
