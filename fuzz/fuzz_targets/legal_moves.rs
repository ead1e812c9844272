#![no_main]
use libfuzzer_sys::fuzz_target;
use tabiya::chess::attacks::is_in_check;
use tabiya::chess::moves::apply_move;
use tabiya::chess::position::Position;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = Position::from_fen(input) else {
        return;
    };
    let player = position.side_to_move();
    for next_move in position.legal_moves() {
        let result = apply_move(position.board(), next_move.from(), next_move.to())
            .expect("legal moves start on occupied squares");
        assert!(
            !is_in_check(&result.board, player),
            "{position}: {next_move} leaves the king in check"
        );
    }
});
