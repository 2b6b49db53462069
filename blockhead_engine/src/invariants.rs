/// BlockHead Engine: Invariant Checks
///
/// Hard-fail validation. `validate_invariants` panics on the first
/// failure; `try_validate_invariants` reports it instead.

use std::collections::BTreeSet;

use crate::domain::{Board, Mode, NumberRole};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every invariant check. Panics on the first failure.
pub fn validate_invariants(board: &Board) {
    if let Err(message) = try_validate_invariants(board) {
        panic!("{}", message);
    }
}

/// Non-panicking variant of `validate_invariants`.
/// Returns `Err(message)` on the first failure, `Ok(())` if all pass.
pub fn try_validate_invariants(board: &Board) -> Result<(), String> {
    check_column_layout(board)?;
    check_block_ownership(board)?;
    check_block_values(board)?;
    check_movable_blocks(board)?;
    check_carry_controls(board)?;
    check_borrow_controls(board)?;
    check_exclusive_controls(board)?;
    check_completion_gate(board)?;
    Ok(())
}

fn violation(name: &str, detail: String) -> String {
    format!("Invariant violation: [INVARIANT:{}] {}", name, detail)
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

/// Widths follow the mode; every column knows its own address.
fn check_column_layout(board: &Board) -> Result<(), String> {
    let expected = [
        (NumberRole::First, board.constants.column_count),
        (NumberRole::Second, board.constants.column_count),
        (NumberRole::Answer, board.constants.answer_width(board.mode)),
    ];
    for (role, width) in expected {
        let number = board.number(role);
        if number.role != role || number.width() != width {
            return Err(violation(
                "column_layout",
                format!(
                    "{} has {} columns, expected {}",
                    role.as_str(),
                    number.width(),
                    width
                ),
            ));
        }
        for (index, column) in number.columns.iter().enumerate() {
            if column.position != index || column.number != role {
                return Err(violation(
                    "column_layout",
                    format!(
                        "column at {}[{}] claims to be {}",
                        role.as_str(),
                        index,
                        column.column_ref()
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Each block sits in exactly one column, and knows which one.
fn check_block_ownership(board: &Board) -> Result<(), String> {
    let mut seen = BTreeSet::new();
    for number in board.numbers() {
        for column in &number.columns {
            for block in &column.blocks {
                if block.owner != column.column_ref() {
                    return Err(violation(
                        "block_ownership",
                        format!(
                            "block {} held by {} but owned by {}",
                            block.id,
                            column.column_ref(),
                            block.owner
                        ),
                    ));
                }
                if !seen.insert(block.id) {
                    return Err(violation(
                        "block_ownership",
                        format!("block {} appears twice", block.id),
                    ));
                }
                if block.id.0 >= board.next_block_id {
                    return Err(violation(
                        "block_ownership",
                        format!("block {} was never allocated", block.id),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// No zero-valued blocks; operand columns hold a single digit.
fn check_block_values(board: &Board) -> Result<(), String> {
    if let Some(block) = board.blocks().find(|b| b.value == 0) {
        return Err(violation(
            "block_values",
            format!("block {} in {} has value 0", block.id, block.owner),
        ));
    }
    for number in [&board.first, &board.second] {
        for column in &number.columns {
            if column.total() >= board.constants.base {
                return Err(violation(
                    "block_values",
                    format!(
                        "operand column {} holds {} (base {})",
                        column.column_ref(),
                        column.total(),
                        board.constants.base
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Only unplayed operand blocks move. SUBTRACT keeps the minuend in the answer.
fn check_movable_blocks(board: &Board) -> Result<(), String> {
    for block in board.blocks() {
        let should_move = match (board.mode, block.owner.number) {
            (_, NumberRole::Answer) => false,
            (Mode::Add, _) => true,
            (Mode::Subtract, NumberRole::Second) => true,
            (Mode::Subtract, NumberRole::First) => {
                return Err(violation(
                    "movable_blocks",
                    format!("block {} sits in the minuend while subtracting", block.id),
                ));
            }
        };
        if block.movable != should_move {
            return Err(violation(
                "movable_blocks",
                format!(
                    "block {} in {} has movable={}",
                    block.id, block.owner, block.movable
                ),
            ));
        }
    }
    Ok(())
}

/// ADD: carry control iff total >= BASE; carry_count matches.
/// SUBTRACT: no carry controls at all.
fn check_carry_controls(board: &Board) -> Result<(), String> {
    for number in [&board.first, &board.second] {
        if number.columns.iter().any(|c| c.has_carry_control) {
            return Err(violation(
                "carry_controls",
                format!("operand {} shows a carry control", number.role.as_str()),
            ));
        }
    }
    for column in &board.answer.columns {
        let expected = board.mode == Mode::Add && column.total() >= board.constants.base;
        if column.has_carry_control != expected {
            return Err(violation(
                "carry_controls",
                format!(
                    "{} total {} has carry control={}",
                    column.column_ref(),
                    column.total(),
                    column.has_carry_control
                ),
            ));
        }
    }
    if board.carry_count as usize != board.carry_controls() {
        return Err(violation(
            "carry_count",
            format!(
                "carry_count={} but {} carry controls are shown",
                board.carry_count,
                board.carry_controls()
            ),
        ));
    }
    Ok(())
}

/// SUBTRACT: answer[p] lends iff answer[p-1] < second[p-1]. Never in ADD,
/// never on the ones column.
fn check_borrow_controls(board: &Board) -> Result<(), String> {
    for number in [&board.first, &board.second] {
        if number.columns.iter().any(|c| c.has_borrow_control) {
            return Err(violation(
                "borrow_controls",
                format!("operand {} shows a borrow control", number.role.as_str()),
            ));
        }
    }
    for column in &board.answer.columns {
        let expected = board.mode == Mode::Subtract
            && column.position > 0
            && match (
                board.answer.column_to_right(column.position),
                board.second.column(column.position - 1),
            ) {
                (Some(have), Some(take)) => have.total() < take.total(),
                _ => false,
            };
        if column.has_borrow_control != expected {
            return Err(violation(
                "borrow_controls",
                format!(
                    "{} has borrow control={}, expected {}",
                    column.column_ref(),
                    column.has_borrow_control,
                    expected
                ),
            ));
        }
    }
    Ok(())
}

fn check_exclusive_controls(board: &Board) -> Result<(), String> {
    for column in &board.answer.columns {
        if column.has_carry_control && column.has_borrow_control {
            return Err(violation(
                "exclusive_controls",
                format!("{} shows both carry and borrow controls", column.column_ref()),
            ));
        }
    }
    Ok(())
}

/// A played-out subtrahend leaves nothing to borrow for, and a
/// surfaced answer matches the board.
fn check_completion_gate(board: &Board) -> Result<(), String> {
    if board.mode == Mode::Subtract && board.second.is_exhausted() && board.pending_borrows() > 0 {
        return Err(violation(
            "completion_gate",
            format!(
                "subtrahend exhausted with {} borrow controls pending",
                board.pending_borrows()
            ),
        ));
    }
    if let Some(shown) = &board.answer_text {
        if board.calc_answer().as_ref() != Some(shown) {
            return Err(violation(
                "completion_gate",
                format!("answer {:?} shown but the board is not complete", shown),
            ));
        }
    }
    Ok(())
}
