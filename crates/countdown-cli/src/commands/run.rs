use clap::Args;
use countdown_core::{Command, Config, Controller, ControllerSettings, Event, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::terminal::{TerminalBell, TerminalView};

const HELP: &str = "commands: start | pause | reset | preset <label|secs> | min <n> | sec <n> | dismiss [id] | status | quit";

#[derive(Args)]
pub struct RunArgs {
    /// Minutes field (0-99, clamped)
    #[arg(short, long)]
    minutes: Option<String>,
    /// Seconds field (0-59, clamped)
    #[arg(short, long)]
    seconds: Option<String>,
    /// Preset label or number of seconds to load
    #[arg(short, long)]
    preset: Option<String>,
    /// Start immediately
    #[arg(long)]
    start: bool,
    /// Exit once the countdown expires
    #[arg(long)]
    exit_on_expire: bool,
    /// Do not ring the terminal bell on expiry
    #[arg(long)]
    no_chime: bool,
    /// Print frames and events as JSON lines
    #[arg(long)]
    json: bool,
}

/// Parse one line typed on stdin.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "start" | "s" => Command::Start,
        "pause" | "resume" | "p" => Command::Pause,
        "reset" | "r" => Command::Reset,
        "dismiss" | "d" if rest.is_empty() => Command::Dismiss(None),
        "dismiss" | "d" => match rest.parse() {
            Ok(id) => Command::Dismiss(Some(id)),
            Err(_) => return Err(format!("invalid toast id: {rest}")),
        },
        "status" => Command::Status,
        "quit" | "exit" | "q" => Command::Quit,
        "preset" if !rest.is_empty() => Command::Preset(rest.to_string()),
        "min" | "minutes" => Command::SetMinutes(rest.to_string()),
        "sec" | "seconds" => Command::SetSeconds(rest.to_string()),
        _ => return Err(HELP.to_string()),
    };
    Ok(command)
}

/// One-line text form of a status snapshot.
fn snapshot_line(event: &Event) -> Option<String> {
    match event {
        Event::StateSnapshot {
            phase,
            initial_secs,
            remaining_secs,
            display,
            ..
        } => Some(format!(
            "status: [{display}] {} ({remaining_secs}s of {initial_secs}s left)",
            format!("{phase:?}").to_lowercase()
        )),
        _ => None,
    }
}

fn initial_commands(args: &RunArgs) -> Vec<Command> {
    let mut initial = Vec::new();
    if let Some(minutes) = &args.minutes {
        initial.push(Command::SetMinutes(minutes.clone()));
    }
    if let Some(seconds) = &args.seconds {
        initial.push(Command::SetSeconds(seconds.clone()));
    }
    if let Some(preset) = &args.preset {
        initial.push(Command::Preset(preset.clone()));
    }
    if args.start {
        initial.push(Command::Start);
    }
    initial
}

async fn read_stdin(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match parse_command(&line) {
                Ok(command) => {
                    if tx.send(command).await.is_err() {
                        break;
                    }
                }
                Err(help) => eprintln!("{help}"),
            },
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("stdin read failed: {e}");
                break;
            }
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut settings = ControllerSettings::from(&config);
    if args.no_chime {
        settings.chime = false;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async move {
        let (tx, rx) = mpsc::channel(32);
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();

        for command in initial_commands(&args) {
            tx.send(command).await?;
        }
        if !args.json {
            eprintln!("{HELP}");
        }

        let view = TerminalView::new(args.json);
        let controller = Controller::new(view, TerminalBell, settings);
        let session = Session::new(controller)
            .exit_on_expire(args.exit_on_expire)
            .with_event_sink(events_tx);

        let reader = tokio::spawn(read_stdin(tx));
        let json = args.json;
        let printer = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                if json {
                    match serde_json::to_string(&event) {
                        Ok(line) => println!("{line}"),
                        Err(e) => tracing::warn!("cannot serialize event: {e}"),
                    }
                } else if let Some(line) = snapshot_line(&event) {
                    println!("{line}");
                }
            }
        });

        let controller = session.run(rx).await;
        reader.abort();
        // The session owned the only event sender, so the printer drains and stops.
        let _ = printer.await;

        tracing::debug!(
            phase = ?controller.engine().phase(),
            remaining_secs = controller.engine().remaining_secs(),
            "countdown session ended"
        );
        Ok::<(), Box<dyn std::error::Error>>(())
    });

    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_background();
    result
}
