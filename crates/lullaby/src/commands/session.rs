//! Interactive session: one store for the whole session, driven by
//! line-oriented commands on stdin.
//!
//! State changes are printed from the store subscription, so updates made
//! by the background refresh show up alongside the user's own actions.

use tokio::sync::mpsc;

use lullaby_core::{Command as CoreCommand, Controller, ControllerConfig, LedId};

use crate::cli::{self, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::status;

const HELP: &str = "\
commands:
  toggle <led>    flip an LED
  start           start white noise
  stop            stop white noise
  volume <0..1>   change the volume
  refresh         re-read LED status
  status          show the full state
  help            show this help
  quit            leave the session";

/// One parsed line of session input.
#[derive(Debug, PartialEq)]
enum Input {
    Run(CoreCommand),
    Status,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for '{verb}'"));
    }

    let input = match (verb.to_ascii_lowercase().as_str(), arg) {
        ("toggle" | "t", Some(id)) => Input::Run(CoreCommand::ToggleLed { id: LedId::new(id) }),
        ("toggle" | "t", None) => return Err("usage: toggle <led>".into()),
        ("start", None) => Input::Run(CoreCommand::StartWhiteNoise),
        ("stop", None) => Input::Run(CoreCommand::StopWhiteNoise),
        ("volume" | "vol", Some(raw)) => Input::Run(CoreCommand::SetVolume {
            volume: cli::parse_volume(raw)?,
        }),
        ("volume" | "vol", None) => return Err("usage: volume <0..1>".into()),
        ("refresh", None) => Input::Run(CoreCommand::RefreshLeds),
        ("status" | "s", None) => Input::Status,
        ("help" | "?", None) => Input::Help,
        ("quit" | "exit" | "q", None) => Input::Quit,
        (
            known @ ("start" | "stop" | "refresh" | "status" | "s" | "help" | "?" | "quit" | "exit"
            | "q"),
            Some(_),
        ) => return Err(format!("'{known}' takes no arguments")),
        (other, _) => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(input))
}

pub async fn handle(config: ControllerConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let controller = Controller::new(config);
    let result = run(&controller, global).await;
    controller.disconnect().await;
    result
}

async fn run(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    if let Err(e) = controller.connect().await {
        if !controller.is_connected().await {
            return Err(e.into());
        }
        // The page keeps working with default LED state
        eprintln!("warning: could not load LED status: {e}");
    }

    let color = output::should_color(&global.color);
    let mut updates = controller.subscribe();
    output::print_output(&status::summary_line(updates.current(), color), global.quiet);

    let mut lines = spawn_stdin_reader();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            biased;

            _ = &mut ctrl_c => break,

            Some(state) = updates.changed() => {
                output::print_output(&status::summary_line(&state, color), global.quiet);
            }

            line = lines.recv() => {
                let Some(line) = line else { break };
                let line = line?;
                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Help)) => eprintln!("{HELP}"),
                    Ok(Some(Input::Status)) => {
                        let out = status::render_state(&global.output, &controller.snapshot(), color);
                        output::print_output(&out, global.quiet);
                    }
                    Ok(Some(Input::Run(cmd))) => match controller.execute(cmd).await {
                        Ok(result) => output::print_output(&result.to_string(), global.quiet),
                        Err(e) => eprintln!("error: {e}"),
                    },
                    Err(msg) => eprintln!("error: {msg}"),
                }
            }
        }
    }

    Ok(())
}

/// Read stdin lines on a plain thread.
///
/// A blocking stdin read cannot be cancelled, so it must not live on the
/// runtime's blocking pool or shutdown would wait for the next Enter.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
