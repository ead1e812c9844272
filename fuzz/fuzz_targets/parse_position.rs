#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use tabiya::chess::position::Position;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = Position::try_from(input) else {
        return;
    };
    // Printed position is parsed back into the same one.
    let fen = position.to_string();
    let reparsed = Position::from_fen(&fen).expect("printed positions are valid");
    assert_eq!(reparsed.to_string(), fen);
});
