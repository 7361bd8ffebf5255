use crate::render;
use anyhow::{bail, Context};
use std::io::Write;
use stockcast_core::controller::{Completion, Controller, Effect};
use stockcast_core::domain::query::DateRange;
use tokio::io::{AsyncBufReadExt, BufReader};

const CHART_WIDTH: usize = 40;

const HELP: &str = "\
commands:
  type <text>     set the symbol field (shows suggestions)
  pick <n|SYM>    choose suggestion n, or a symbol directly
  recent [n]      list recent symbols, or choose recent symbol n
  popular         list popular symbols
  range <r>       set date range: 7d, 30d, 60d, 90d
  predict         submit the current symbol
  reset           clear symbol, result and error
  help            show this text
  quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Type(String),
    Pick(Pick),
    Recent(Option<usize>),
    Popular,
    Range(DateRange),
    Predict,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pick {
    Index(usize),
    Symbol(String),
}

fn parse_command(line: &str) -> anyhow::Result<ShellCommand> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let cmd = match head.to_ascii_lowercase().as_str() {
        "type" | "t" => ShellCommand::Type(rest.to_string()),
        "pick" | "p" => {
            if rest.is_empty() {
                bail!("pick needs a suggestion number or a symbol");
            }
            match rest.parse::<usize>() {
                Ok(n) => ShellCommand::Pick(Pick::Index(n)),
                Err(_) => ShellCommand::Pick(Pick::Symbol(rest.to_string())),
            }
        }
        "recent" => {
            if rest.is_empty() {
                ShellCommand::Recent(None)
            } else {
                let n = rest
                    .parse::<usize>()
                    .with_context(|| format!("not a recent entry number: {rest}"))?;
                ShellCommand::Recent(Some(n))
            }
        }
        "popular" => ShellCommand::Popular,
        "range" | "r" => ShellCommand::Range(rest.parse()?),
        "predict" | "go" => ShellCommand::Predict,
        "reset" => ShellCommand::Reset,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        "" => bail!("empty command"),
        other => bail!("unknown command {other:?}; try help"),
    };
    Ok(cmd)
}

pub async fn run(controller: &mut Controller) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    print_lines(&render::popular(controller.popular()));
    print_lines(&render::recent(controller.recent()));

    loop {
        print!("{} [{}]> ", controller.symbol(), controller.date_range());
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match cmd {
            ShellCommand::Type(text) => {
                controller.input(&text);
                let suggestions = render::suggestions(controller.suggestions());
                for (idx, row) in suggestions.iter().enumerate() {
                    println!("  {}. {row}", idx + 1);
                }
            }
            ShellCommand::Pick(Pick::Index(n)) => {
                let Some(entry) = n.checked_sub(1).and_then(|i| controller.suggestions().get(i))
                else {
                    println!("no suggestion {n}");
                    continue;
                };
                let symbol = entry.symbol;
                controller.select(symbol);
            }
            ShellCommand::Pick(Pick::Symbol(symbol)) => controller.select(&symbol),
            ShellCommand::Recent(None) => print_lines(&render::recent(controller.recent())),
            ShellCommand::Recent(Some(n)) => {
                let Some(symbol) = n
                    .checked_sub(1)
                    .and_then(|i| controller.recent().as_slice().get(i))
                    .cloned()
                else {
                    println!("no recent entry {n}");
                    continue;
                };
                controller.select(&symbol);
            }
            ShellCommand::Popular => print_lines(&render::popular(controller.popular())),
            ShellCommand::Range(range) => controller.set_date_range(range),
            ShellCommand::Predict => predict(controller).await,
            ShellCommand::Reset => {
                controller.reset();
                println!("cleared");
            }
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
        }
    }
    Ok(())
}

/// Submits the current symbol and waits for the response before the next line is read,
/// so a shell submission is never superseded while in flight.
async fn predict(controller: &mut Controller) {
    let pending = match controller.begin_submit() {
        Ok(pending) => pending,
        Err(err) => {
            println!("{err}");
            return;
        }
    };
    let token = pending.token();
    tracing::debug!(token, symbol = pending.query().symbol(), "awaiting prediction");
    print_lines(&render::panel(controller, CHART_WIDTH));

    let client = controller.client();
    let outcome = pending.fetch(client.as_ref()).await;
    let completion = controller.finish_submit(pending, outcome);
    crate::report_failure(&completion);

    match completion {
        Completion::Succeeded { effects } => print_lines(&success_lines(controller, &effects)),
        Completion::Failed(_) => print_lines(&render::panel(controller, CHART_WIDTH)),
        Completion::Stale => tracing::debug!(token, "prediction superseded"),
    }
}

/// The result panel ends with the chart. `ScrollToChart` puts the panel last so the chart
/// is the bottom of the output; otherwise the recent list follows the panel.
fn success_lines(controller: &Controller, effects: &[Effect]) -> Vec<String> {
    let panel = render::panel(controller, CHART_WIDTH);
    let recent = render::recent(controller.recent());
    if effects.contains(&Effect::ScrollToChart) {
        recent.into_iter().chain(panel).collect()
    } else {
        panel.into_iter().chain(recent).collect()
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use stockcast_core::client::HttpPredictionClient;
    use stockcast_core::storage::MemoryStore;

    fn answered_controller() -> Controller {
        let client = HttpPredictionClient::new("http://127.0.0.1:9/predict", Duration::from_secs(1))
            .unwrap();
        let mut controller = Controller::new(MemoryStore::new(), Arc::new(client));
        controller.input("aapl");

        let pending = controller.begin_submit().unwrap();
        let response = serde_json::from_value(json!({
            "historical_price": [[100.0], [101.0]],
            "predicted_price": [102.0, 103.0]
        }))
        .unwrap();
        let completion = controller.finish_submit(pending, Ok(response));
        assert!(matches!(completion, Completion::Succeeded { .. }));
        controller
    }

    #[test]
    fn scroll_to_chart_leaves_the_chart_at_the_bottom() {
        let controller = answered_controller();

        let lines = success_lines(&controller, &[Effect::ScrollToChart]);
        assert_eq!(lines[0], "Recently Viewed:");
        assert!(lines.last().unwrap().starts_with("Future 2 "));

        let lines = success_lines(&controller, &[]);
        assert!(lines[0].starts_with("Apple (AAPL)"));
        assert_eq!(lines.last().unwrap(), "AAPL");
    }

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(
            parse_command("type  meta ").unwrap(),
            ShellCommand::Type("meta".to_string())
        );
        assert_eq!(
            parse_command("pick 2").unwrap(),
            ShellCommand::Pick(Pick::Index(2))
        );
        assert_eq!(
            parse_command("pick nflx").unwrap(),
            ShellCommand::Pick(Pick::Symbol("nflx".to_string()))
        );
        assert_eq!(parse_command("recent").unwrap(), ShellCommand::Recent(None));
        assert_eq!(parse_command("recent 1").unwrap(), ShellCommand::Recent(Some(1)));
        assert_eq!(
            parse_command("range 90d").unwrap(),
            ShellCommand::Range(DateRange::Days90)
        );
        assert_eq!(parse_command("GO").unwrap(), ShellCommand::Predict);
        assert_eq!(parse_command("q").unwrap(), ShellCommand::Quit);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("pick").is_err());
        assert!(parse_command("range 14d").is_err());
        assert!(parse_command("recent x").is_err());
        assert!(parse_command("launch").is_err());
    }
}
