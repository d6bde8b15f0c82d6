use std::io::{self, Write};
use std::time::Instant;

use anyhow::{bail, Context};

use tictactoe::{ControllerState, GameConfig, GameEvent, Mark, Mode, Outcome, TurnController};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = GameConfig::from_env();
    let mut game = TurnController::new_game(config);

    loop {
        report(&mut game);

        match game.state() {
            ControllerState::AwaitingOpponentMove => {
                let ticket = game.scheduled().context("computer turn without a scheduled move")?;
                std::thread::sleep(ticket.due().saturating_duration_since(Instant::now()));
                game.poll(Instant::now());
            }
            ControllerState::AwaitingHumanMove => {
                print!("{} turn (row col, r to reset, q to quit): ", game.turn_label());
                io::stdout().flush()?;
                let command = match read_command() {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{:#}", err);
                        continue;
                    }
                };
                match command {
                    Command::Quit => break,
                    Command::Reset => game.reset(),
                    Command::Move(index) => {
                        let result = game.request_move(index);
                        if let Some(rejection) = result.rejection {
                            println!("Nope: {}", rejection);
                        }
                    }
                }
            }
            ControllerState::Terminal(_) => {
                print!("Play again? (y/n): ");
                io::stdout().flush()?;
                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                if input.trim().eq_ignore_ascii_case("y") {
                    game.reset();
                } else {
                    break;
                }
            }
        }
    }

    Ok(())
}

enum Command {
    Move(usize),
    Reset,
    Quit,
}

fn read_command() -> anyhow::Result<Command> {
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(Command::Quit);
    }
    let mut parts = input.split_whitespace();
    match parts.next() {
        Some("q") | None => Ok(Command::Quit),
        Some("r") => Ok(Command::Reset),
        Some(row) => {
            let row: usize = row.parse().context("row must be a number")?;
            let col: usize = parts.next().context("missing column")?.parse()?;
            if row >= 3 || col >= 3 {
                bail!("row and column must be between 0 and 2");
            }
            Ok(Command::Move(row * 3 + col))
        }
    }
}

fn report(game: &mut TurnController) {
    let solo = game.config().mode == Mode::Solo;
    for event in game.drain_events() {
        match event {
            GameEvent::GameStarted { first } => println!("Game started. {} goes first.", first),
            GameEvent::MoveApplied { board, .. } => println!("{}", board),
            GameEvent::OpponentThinking { .. } => println!("Computer is thinking..."),
            GameEvent::TurnChanged { .. } => {}
            GameEvent::GameEnded { outcome } => match outcome {
                Outcome::Won(mark) if solo && mark == Mark::B => println!("Computer wins!"),
                Outcome::Won(mark) => println!("{} wins!", mark),
                Outcome::Drawn => println!("It's a tie."),
            },
        }
    }
}
