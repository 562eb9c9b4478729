//! Interactive loop: reads commands from stdin and settles move outcomes as
//! they arrive. Everything that mutates the board happens here.

pub mod command;

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::api_client::AtsClient;
use crate::board::{BoardSession, Dispatch, IgnoreReason, Notification};
use crate::render::{render_board, render_detail};
use command::Command;

/// What the user is told when a drop is ignored. Same-slot drops are silent.
pub fn ignored_notice(reason: IgnoreReason, application_id: i64) -> Option<Notification> {
    match reason {
        IgnoreReason::SamePosition => None,
        IgnoreReason::Cancelled => Some(Notification::info("Move cancelled", "No drop target.")),
        IgnoreReason::UnknownApplication => Some(Notification::error(
            "Error",
            format!("Application {application_id} is not on the board."),
        )),
        IgnoreReason::MoveInFlight => Some(Notification::info(
            "Move in progress",
            format!("Application {application_id} is still being saved; try again once it settles."),
        )),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn handle(command: Command, session: &mut BoardSession, client: &AtsClient) {
    match command {
        Command::Move { .. } | Command::Drag { .. } => {
            let event = match command.to_drop_event(session.board()) {
                Ok(event) => event,
                Err(e) => {
                    println!("{e}");
                    return;
                }
            };
            match session.dispatch(event) {
                Dispatch::Sent(_) => print!("{}", render_board(session.board())),
                Dispatch::Ignored(reason) => {
                    if let Some(notice) = ignored_notice(reason, event.application_id) {
                        println!("{notice}");
                    }
                }
            }
        }
        Command::Show { id } => match client.get_application(id).await {
            Ok(detail) => print!("{}", render_detail(&detail)),
            Err(e) => println!("{}", Notification::error("Error", e.to_string())),
        },
        Command::Board => print!("{}", render_board(session.board())),
        Command::Refresh => match session.reload(client).await {
            Ok(count) => {
                println!("{}", Notification::info("Board refreshed", format!("{count} applications.")));
                print!("{}", render_board(session.board()));
            }
            Err(e) => {
                error!("Board refresh failed: {e}");
                println!("{}", Notification::error("Error", format!("Failed to refresh board: {e}")));
            }
        },
        Command::Quit => {}
    }
}

/// Runs until `quit` or end of input, then waits for outstanding moves so
/// their results are reported.
pub async fn run(mut session: BoardSession, client: AtsClient) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{}", render_board(session.board()));
    println!("Type 'help' for commands.");
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => handle(command, &mut session, &client).await,
                    Ok(None) => {}
                    Err(e) => print!("{}", e.render()),
                }
                prompt();
            }
            Some(outcome) = session.next_outcome() => {
                let (_, notification) = session.settle(outcome);
                println!();
                println!("{notification}");
                print!("{}", render_board(session.board()));
                prompt();
            }
        }
    }

    let pending = session.board().in_flight_count();
    if pending > 0 {
        info!("Waiting for {pending} outstanding move(s)");
        while session.board().in_flight_count() > 0 {
            match session.settle_next().await {
                Some((_, notification)) => println!("{notification}"),
                None => break,
            }
        }
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::notification::Level;

    #[test]
    fn test_ignored_notices() {
        assert!(ignored_notice(IgnoreReason::SamePosition, 1).is_none());
        assert_eq!(
            ignored_notice(IgnoreReason::Cancelled, 1).unwrap().level,
            Level::Info
        );
        let in_flight = ignored_notice(IgnoreReason::MoveInFlight, 8).unwrap();
        assert!(in_flight.description.contains("Application 8"));
        assert_eq!(
            ignored_notice(IgnoreReason::UnknownApplication, 8).unwrap().level,
            Level::Error
        );
    }
}
