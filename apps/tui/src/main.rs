//! docboard TUI — interactive freshness dashboard.
//!
//! Shows aggregate metrics, an overdue-only toggle, the record table with
//! overdue rows highlighted, and the source-editing link, built with
//! `ratatui` + `crossterm`.

mod app;
mod widgets;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = tokio::runtime::Runtime::new()?;
    app::run(&runtime)
}
