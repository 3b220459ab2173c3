//! Interactive console: chat with the assistant and run safety checks.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::chat::ChatEvent;
use crate::models::error::Result;
use crate::models::report::WaterSafetyReport;
use crate::state::HmpiModule;

/// Readings used by `/check` (the sample location data of the safety view)
pub const SAMPLE_MEASUREMENTS: &[(&str, f64)] = &[
    ("Lead", 0.8),
    ("Mercury", 0.3),
    ("Cadmium", 1.2),
    ("Arsenic", 0.6),
];

/// A parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Check(String),
    Quit,
    Chat(String),
    Empty,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ConsoleCommand::Empty;
        }
        if line == "/quit" || line == "/exit" {
            return ConsoleCommand::Quit;
        }
        if let Some(rest) = line.strip_prefix("/check") {
            // "/checkpoint" is chat text, not a command
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return ConsoleCommand::Check(rest.trim().to_string());
            }
        }
        ConsoleCommand::Chat(line.to_string())
    }
}

/// Multi-line rendering of a report for the terminal
pub fn format_report(report: &WaterSafetyReport) -> String {
    let mut lines = vec![
        format!("Location:   {}", report.location()),
        format!(
            "Status:     {} ({})",
            report.category(),
            report.category().description()
        ),
        format!(
            "HMPI index: {:.2} (driven by {})",
            report.overall_index(),
            report.driving_metal()
        ),
        format!("Confidence: {:.0}%", report.confidence()),
    ];

    for (reading, status) in report.readings().iter().zip(report.metal_statuses()) {
        lines.push(format!(
            "  {:<10} {:>6.3} / {:<6.3} mg/L  {:>5.0}%  {}",
            reading.metal_name,
            reading.value,
            reading.limit,
            status.ratio * 100.0,
            status.category
        ));
    }

    lines.join("\n")
}

/// Read commands from stdin until `/quit` or end of input
pub async fn run_console(module: HmpiModule) -> Result<()> {
    let (session, event_rx) = module.start_chat();
    let printer = tokio::spawn(print_assistant_messages(event_rx));

    for message in session.messages() {
        println!("assistant> {}", message.content);
    }
    println!("Commands: /check <location>, /quit. Anything else is sent to the assistant.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Failed to read from stdin: {}", e);
                break;
            }
        };

        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Empty => {}
            ConsoleCommand::Quit => break,
            ConsoleCommand::Check(location) => {
                match module.check_water_safety(&location, SAMPLE_MEASUREMENTS) {
                    Ok(report) => println!("{}", format_report(&report)),
                    Err(e) => println!("error: {} ({})", e, e.recovery_suggestion()),
                }
            }
            ConsoleCommand::Chat(text) => {
                if let Err(e) = session.send(&text).await {
                    println!("error: {} ({})", e, e.recovery_suggestion());
                }
            }
        }
    }

    session.close().await;
    drop(session);
    if let Err(e) = printer.await {
        tracing::warn!("Event printer task failed: {}", e);
    }
    Ok(())
}

async fn print_assistant_messages(mut event_rx: mpsc::Receiver<ChatEvent>) {
    while let Some(event) = event_rx.recv().await {
        if let ChatEvent::MessageAppended { message, .. } = event {
            if message.is_from_assistant {
                println!("assistant> {}", message.content);
            }
        }
    }
}
