//! Terminal rendering of chart figures

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use dash_stock::Figure;
use dash_stock::chart::{FORECAST_TRACE, HISTORICAL_TRACE, Trace};

/// Table of the last `rows` historical closes plus the first and last
/// forecast points
///
/// Figures without traces have nothing to tabulate and yield `None`.
pub fn figure_table(figure: &Figure, rows: usize) -> Option<Table> {
    if figure.data.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Series", "Date", "Price"]);

    if let Some(historical) = figure.trace(HISTORICAL_TRACE) {
        let skip = historical.x.len().saturating_sub(rows);
        for (date, price) in points(historical).skip(skip) {
            table.add_row(vec!["history".to_string(), date, price]);
        }
    }

    if let Some(forecasted) = figure.trace(FORECAST_TRACE) {
        let last = forecasted.x.len().saturating_sub(1);
        for (i, (date, price)) in points(forecasted).enumerate() {
            if i == 0 || i == last {
                table.add_row(vec!["forecast".to_string(), date, price]);
            }
        }
    }

    Some(table)
}

fn points(trace: &Trace) -> impl Iterator<Item = (String, String)> + '_ {
    trace
        .x
        .iter()
        .zip(&trace.y)
        .map(|(date, price)| (date.to_string(), format!("{price:.2}")))
}

/// Text printed for a figure: its title, then its table when it has one
pub fn figure_text(figure: &Figure, rows: usize) -> String {
    let title = figure.title().unwrap_or("(no chart: select a ticker first)");
    match figure_table(figure, rows) {
        Some(table) => format!("{title}\n{table}"),
        None => title.to_string(),
    }
}
