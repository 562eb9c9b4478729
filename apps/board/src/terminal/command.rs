use clap::{Parser, Subcommand};

use crate::board::{Board, DropEvent, Slot};
use crate::errors::BoardError;
use crate::models::application::Stage;

/// One line typed at the prompt, parsed as if it were a command line.
#[derive(Debug, Parser)]
#[command(name = "board", about = "Pipeline board commands", disable_version_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

/// Target column of a drag. `-` means the card was dropped outside every
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget(pub Option<Stage>);

fn parse_drop_target(raw: &str) -> Result<DropTarget, String> {
    if raw == "-" {
        return Ok(DropTarget(None));
    }
    raw.parse::<Stage>()
        .map(|stage| DropTarget(Some(stage)))
        .map_err(|e| e.to_string())
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| format!("'{raw}' is not an application id"))
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Move a card to a stage column
    #[command(visible_alias = "mv")]
    Move {
        /// Application id
        #[arg(value_parser = parse_id)]
        id: i64,
        /// Destination stage
        #[arg(value_enum, ignore_case = true)]
        stage: Stage,
        /// Position inside the destination column (default: last)
        index: Option<usize>,
    },
    /// Raw drag gesture; a target of '-' cancels the drag
    Drag {
        /// Source stage
        #[arg(value_enum, ignore_case = true)]
        from_stage: Stage,
        /// Index of the card inside the source column
        from_index: usize,
        /// Target stage, or '-'
        #[arg(value_parser = parse_drop_target, allow_hyphen_values = true)]
        to_stage: DropTarget,
        /// Position inside the target column (default: 0)
        to_index: Option<usize>,
    },
    /// Show application details
    #[command(visible_alias = "view")]
    Show {
        /// Application id
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Redraw the board
    #[command(visible_alias = "ls")]
    Board,
    /// Reload the board from the server
    #[command(visible_alias = "reload")]
    Refresh,
    /// Exit
    #[command(visible_aliases = ["exit", "q"])]
    Quit,
}

fn invalid(msg: impl Into<String>) -> BoardError {
    BoardError::Command(msg.into())
}

/// Clamps a requested drop index to the positions the column can take:
/// one past the end for another column, the last card for the card's own.
fn clamp_index(board: &Board, source: Slot, stage: Stage, index: usize) -> usize {
    let len = board
        .columns()
        .into_iter()
        .find(|c| c.stage == stage)
        .map(|c| c.len())
        .unwrap_or(0);
    let max = if stage == source.stage {
        len.saturating_sub(1)
    } else {
        len
    };
    index.min(max)
}

impl Command {
    /// Parses a line. Blank lines yield `Ok(None)`; `help` comes back as a
    /// `DisplayHelp` error carrying the generated text.
    pub fn parse(line: &str) -> Result<Option<Command>, clap::Error> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let args = std::iter::once("board".to_string())
            .chain(std::iter::once(verb.to_ascii_lowercase()))
            .chain(words.map(str::to_string));

        CommandLine::try_parse_from(args).map(|cli| Some(cli.command))
    }

    /// Resolves `Move`/`Drag` against the current board into a gesture.
    pub fn to_drop_event(&self, board: &Board) -> Result<DropEvent, BoardError> {
        match *self {
            Command::Move { id, stage, index } => {
                let source = board
                    .locate(id)
                    .ok_or_else(|| invalid(format!("application {id} is not on the board")))?;
                let index = match index {
                    Some(index) => clamp_index(board, source, stage, index),
                    // Default: stay put within the same column, else go last.
                    None if stage == source.stage => source.index,
                    None => clamp_index(board, source, stage, usize::MAX),
                };
                Ok(DropEvent {
                    application_id: id,
                    source,
                    destination: Some(Slot { stage, index }),
                })
            }
            Command::Drag {
                from_stage,
                from_index,
                to_stage,
                to_index,
            } => {
                let source = Slot {
                    stage: from_stage,
                    index: from_index,
                };
                let card = board
                    .columns()
                    .into_iter()
                    .find(|c| c.stage == from_stage)
                    .and_then(|c| c.cards.get(from_index).map(|card| card.id))
                    .ok_or_else(|| invalid(format!("no card at {from_stage} index {from_index}")))?;
                let destination = to_stage.0.map(|stage| Slot {
                    stage,
                    index: clamp_index(board, source, stage, to_index.unwrap_or(0)),
                });
                Ok(DropEvent {
                    application_id: card,
                    source,
                    destination,
                })
            }
            _ => Err(invalid("not a move")),
        }
    }
}
