// Simple command-line application to play chess
//
// Reads UCI moves (like `e2e4` or `e7e8n`) from stdin. Besides moves, the following commands
// are accepted: `offer`, `accept`, `decline`, `claim <kind>` (kind is one of `threefold`,
// `fifty`, `perpetual`), `status`, `fen` and `quit`.

use arbiter::{Color, DrawKind, Game, GameState};
use std::io::{self, BufRead, Write};

fn parse_claim(s: &str) -> Option<DrawKind> {
    match s {
        "threefold" => Some(DrawKind::ThreefoldRepetition),
        "fifty" => Some(DrawKind::FiftyMoveRule),
        "perpetual" => Some(DrawKind::PerpetualCheck),
        _ => None,
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt::init();

    let mut stdin = io::stdin().lock();
    let mut game = Game::new_initial();

    loop {
        if let Some(outcome) = game.outcome() {
            println!("Game finished: {}", outcome);
            if let Some(cond) = game.draws().result() {
                println!("{}", cond);
            }
            let moves: Vec<String> = game.moves().iter().map(ToString::to_string).collect();
            println!("Moves: {}", moves.join(" "));
            break;
        }

        let board = game.board();
        let side = board.side();
        let name = match side {
            Color::White => "White",
            Color::Black => "Black",
        };
        if game.state() == GameState::Check {
            println!("Check!");
        }
        for cond in game.draws().claimable() {
            println!("Available: {}", cond);
        }
        if let Some(offer) = game.draws().offer() {
            println!("{} offers a draw", offer.by);
        }
        print!("{} move ({}): ", name, board.fullmove_number());
        io::stdout().flush()?;

        let mut s = String::new();
        if stdin.read_line(&mut s)? == 0 {
            break;
        }
        let mut tokens = s.split_ascii_whitespace();
        let cmd = match tokens.next() {
            Some(cmd) => cmd,
            None => continue,
        };

        match cmd {
            "quit" => break,
            "fen" => match game.board().to_fen() {
                Ok(fen) => println!("{}", fen),
                Err(e) => println!("Invalid position: {}", e),
            },
            "status" => println!("{:#?}", game.draw_status()),
            "offer" => {
                if !game.offer_draw(side) {
                    println!("Cannot offer a draw now");
                }
            }
            "accept" => {
                if game.accept_draw(side).is_none() {
                    println!("No draw offer to accept");
                }
            }
            "decline" => {
                if !game.decline_draw(side) {
                    println!("No draw offer to decline");
                }
            }
            "claim" => match tokens.next().and_then(parse_claim) {
                Some(kind) => {
                    if game.claim_draw(kind).is_none() {
                        println!("Cannot claim a draw by {}", kind);
                    }
                }
                None => println!("Usage: claim threefold|fifty|perpetual"),
            },
            mv => {
                if let Err(e) = game.push_uci(mv) {
                    println!("Bad move: {}", e);
                }
            }
        }
        println!();
    }

    Ok(())
}
