#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// `position startpos [moves ...]` or `position fen <fen> [moves ...]`.
    SetPosition {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// `moves [<square>]`.
    Moves {
        square: Option<String>,
    },
    /// `move <move>`.
    Move(String),
    Status,
    /// `d`: dumps the position.
    Display,
    Perft {
        depth: u8,
    },
    Quit,
    Unknown(String),
}

fn parse_setposition(input: &str, parts: &[&str]) -> Command {
    let moves_index = parts.iter().position(|&x| x == "moves");
    let fen = match parts.get(1) {
        Some(&"startpos") if moves_index.map_or(parts.len() == 2, |index| index == 2) => None,
        Some(&"fen") => Some(parts[2..moves_index.unwrap_or(parts.len())].join(" ")),
        _ => return Command::Unknown(input.to_string()),
    };
    let moves = moves_index.map_or_else(Vec::new, |index| {
        parts[index + 1..].iter().map(|s| (*s).to_string()).collect()
    });
    Command::SetPosition { fen, moves }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim();
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["position", ..] => parse_setposition(input, &parts),
            ["moves"] => Self::Moves { square: None },
            ["moves", square] => Self::Moves {
                square: Some((*square).to_string()),
            },
            ["move", next_move] => Self::Move((*next_move).to_string()),
            ["status"] => Self::Status,
            ["d"] => Self::Display,
            ["perft", depth] => match depth.parse() {
                Ok(depth) => Self::Perft { depth },
                Err(_) => Self::Unknown(input.to_string()),
            },
            ["quit"] => Self::Quit,
            _ => Self::Unknown(input.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_position() {
        assert_eq!(
            Command::parse("position startpos"),
            Command::SetPosition {
                fen: None,
                moves: vec![]
            }
        );
        assert_eq!(
            Command::parse("position startpos moves e2e4 e7e5"),
            Command::SetPosition {
                fen: None,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()]
            }
        );
        assert_eq!(
            Command::parse("position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 moves e2e4 e7e5"),
            Command::SetPosition {
                fen: Some("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string()),
                moves: vec!["e2e4".to_string(), "e7e5".to_string()]
            }
        );
        assert_eq!(
            Command::parse("position fen 4k3/8/8/8/8/8/8/4K3 b -\n"),
            Command::SetPosition {
                fen: Some("4k3/8/8/8/8/8/8/4K3 b -".to_string()),
                moves: vec![]
            }
        );
        assert_eq!(
            Command::parse("position startpos e2e4"),
            Command::Unknown("position startpos e2e4".to_string())
        );
        assert_eq!(
            Command::parse("position"),
            Command::Unknown("position".to_string())
        );
    }

    #[test]
    fn parse_moves() {
        assert_eq!(Command::parse("moves"), Command::Moves { square: None });
        assert_eq!(
            Command::parse("moves e2"),
            Command::Moves {
                square: Some("e2".to_string())
            }
        );
        assert_eq!(
            Command::parse("move e7e8q"),
            Command::Move("e7e8q".to_string())
        );
        assert_eq!(Command::parse("move"), Command::Unknown("move".to_string()));
    }

    #[test]
    fn parse_perft() {
        assert_eq!(Command::parse("perft 3"), Command::Perft { depth: 3 });
        assert_eq!(
            Command::parse("perft -1"),
            Command::Unknown("perft -1".to_string())
        );
        assert_eq!(Command::parse("perft"), Command::Unknown("perft".to_string()));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(Command::parse("status"), Command::Status);
        assert_eq!(Command::parse("d\n"), Command::Display);
        assert_eq!(Command::parse("quit"), Command::Quit);
    }

    #[test]
    fn unknown() {
        assert_eq!(
            Command::parse("unknown command"),
            Command::Unknown("unknown command".to_string())
        );
    }
}
