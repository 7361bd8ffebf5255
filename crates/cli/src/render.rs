use stockcast_core::chart;
use stockcast_core::controller::{Controller, Panel};
use stockcast_core::domain::catalog::{self, CatalogEntry};
use stockcast_core::domain::prediction::{PredictionResult, Trend};
use stockcast_core::domain::recent::RecentSymbols;

pub fn panel(controller: &Controller, width: usize) -> Vec<String> {
    match controller.panel() {
        Panel::Empty => Vec::new(),
        Panel::Loading => vec!["Loading...".to_string()],
        Panel::Error(message) => vec![message.to_string()],
        Panel::Result(result) => prediction(result, controller, width),
    }
}

fn prediction(result: &PredictionResult, controller: &Controller, width: usize) -> Vec<String> {
    let mut out = vec![format!(
        "{} ({}) at {}",
        title(result.symbol()),
        controller.date_range().display_name(),
        result
            .received_at()
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    )];

    out.push(String::new());
    out.push(format!("{}-Day Predicted Prices", result.predicted_prices().len()));
    out.push(
        result
            .forecast_cards()
            .iter()
            .map(|card| format!("[{}: {}]", card.label, card.price))
            .collect::<Vec<_>>()
            .join(" "),
    );

    let sentiment = result.sentiment();
    if !sentiment.is_empty() {
        let marker = match sentiment.trend() {
            Trend::Bullish => "+",
            Trend::Bearish => "-",
            Trend::Neutral => "=",
        };
        out.push(format!("({marker}) {}", sentiment.label()));
    }

    if let Some(spec) = controller.chart() {
        out.push(String::new());
        out.push("Price Trend:".to_string());
        out.extend(chart::render_text(&spec, width));
    }
    out
}

/// `Name (SYM)` for catalog tickers, the bare symbol otherwise.
fn title(symbol: &str) -> String {
    match catalog::find_by_symbol(symbol) {
        Some(entry) => format!("{} ({})", entry.name, entry.symbol),
        None => symbol.to_string(),
    }
}

pub fn suggestions(entries: &[CatalogEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| format!("{} ({})", e.name, e.symbol))
        .collect()
}

pub fn popular(entries: &[CatalogEntry]) -> Vec<String> {
    vec![
        "Popular Stocks:".to_string(),
        entries
            .iter()
            .map(|e| e.symbol)
            .collect::<Vec<_>>()
            .join("  "),
    ]
}

pub fn recent(recent: &RecentSymbols) -> Vec<String> {
    if recent.is_empty() {
        return Vec::new();
    }
    vec![
        "Recently Viewed:".to_string(),
        recent.iter().collect::<Vec<_>>().join("  "),
    ]
}
