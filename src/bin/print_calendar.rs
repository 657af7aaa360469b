//! Print a month of the event calendar to the terminal.
//!
//! Usage: `print_calendar [YYYY-MM]` (defaults to the current month).

use eventboard::calendar::{parse_month_param, CalendarViewState};
use eventboard::cosmic::{CosmicHandle, EventStore};
use eventboard::error::other_error;
use eventboard::startup;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;
    let config = startup::load_config().await?;
    let today = config.today();

    let state = match std::env::args().nth(1) {
        Some(raw) => {
            let month = parse_month_param(&raw)
                .ok_or_else(|| other_error(&format!("Expected a month as YYYY-MM, got '{}'", raw)))?;
            CalendarViewState::for_month(month, None)
        }
        None => CalendarViewState::new(today),
    };

    let store = CosmicHandle::new(Arc::clone(&config));
    let events = store.get_events(config.events_limit, 0).await?;
    info!("Fetched {} events", events.len());

    print!("{}", state.to_text(today, &events, config.week_start));

    store.shutdown().await?;
    Ok(())
}
