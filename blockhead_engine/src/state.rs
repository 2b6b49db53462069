/// BlockHead Engine: Board Construction
///
/// Column layout only. Blocks are placed by the draw transition.

use crate::domain::{Board, BoardConstants, Mode, Number, NumberRole};

/// Create an empty board for `mode`: every column present, no blocks.
pub fn create_empty_board(constants: &BoardConstants, mode: Mode) -> Board {
    Board {
        mode,
        constants: *constants,
        first: Number::new(NumberRole::First, constants.column_count),
        second: Number::new(NumberRole::Second, constants.column_count),
        answer: Number::new(NumberRole::Answer, constants.answer_width(mode)),
        carry_count: 0,
        next_block_id: 1,
        answer_text: None,
    }
}
