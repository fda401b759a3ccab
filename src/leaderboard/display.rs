//! Terminal rendering of leaderboard snapshots.
//!
//! Rendering only ever sees copies produced by `Leaderboard::snapshot`.

use crate::types::LeaderboardEntry;
use chrono::{TimeZone, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};
use crossterm::{cursor::MoveTo, execute, terminal::{Clear, ClearType}};
use std::io::{self, Write};

/// Build the leaderboard table.
pub fn render_table(entries: &[LeaderboardEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "#",
        "Symbol",
        "Name",
        "Market cap (USD)",
        "Net buy (SOL)",
        "Last trade",
        "Mint",
    ]);

    for (rank, entry) in entries.iter().enumerate() {
        let volume_color = if entry.net_buy_volume >= 0.0 {
            Color::Green
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&entry.symbol),
            Cell::new(&entry.name),
            Cell::new(format!("{:.0}", entry.market_cap)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:+.3}", entry.net_buy_volume))
                .fg(volume_color)
                .set_alignment(CellAlignment::Right),
            Cell::new(format_timestamp(entry.last_updated)),
            Cell::new(&entry.mint),
        ]);
    }
    table
}

/// Clear the terminal and draw the table in its place.
pub fn redraw(entries: &[LeaderboardEntry]) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    writeln!(stdout, "{}", render_table(entries))?;
    stdout.flush()
}

fn format_timestamp(seconds: i64) -> String {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}
