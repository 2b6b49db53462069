/// BlockHead Engine: Centralized Transition Logic
///
/// ALL board-mutation logic lives here.
/// Handlers mutate a clone of the board; the dispatcher hands the clone
/// back only when the command succeeded and was accepted.
/// All math is unsigned integer in the configured base.

use log::{debug, info};

use crate::arithmetic::{digits_value, parse_operand};
use crate::domain::{
    Block, BlockId, Board, BoardConstants, Column, ColumnRef, Mode, NumberRole, Outcome,
    TransitionResult,
};
use crate::error::{EngineError, Result};
use crate::events::{BoardEvent, Command, CommandEnvelope};
use crate::state::create_empty_board;

// ---------------------------------------------------------------------------
// Public dispatcher
// ---------------------------------------------------------------------------

/// Apply `envelope` to `board` and return `(next_board, result)`.
///
/// `board` is never mutated. `None` means no problem is drawn.
/// A rejected drop returns an identical copy of the input board.
pub fn apply_command(
    constants: &BoardConstants,
    board: Option<&Board>,
    envelope: &CommandEnvelope,
) -> Result<(Option<Board>, TransitionResult)> {
    let sequence = envelope.sequence;

    match &envelope.command {
        Command::New => Ok((None, TransitionResult::accepted(sequence))),
        Command::DrawBlocks {
            first,
            second,
            mode,
        } => {
            if board.is_some() {
                return Err(EngineError::ProblemAlreadyDrawn);
            }
            let (drawn, result) = apply_draw_blocks(constants, first, second, *mode, sequence)?;
            Ok((Some(drawn), result))
        }
        Command::PlaceBlock {
            block,
            source,
            target,
        } => mutate(board, sequence, |b, r| {
            apply_place_block(b, *block, *source, *target, r)
        }),
        Command::Carry { column } => mutate(board, sequence, |b, r| apply_carry(b, *column, r)),
        Command::Borrow { column } => mutate(board, sequence, |b, r| apply_borrow(b, *column, r)),
    }
}

fn mutate<F>(
    board: Option<&Board>,
    sequence: u64,
    handler: F,
) -> Result<(Option<Board>, TransitionResult)>
where
    F: FnOnce(&mut Board, &mut TransitionResult) -> Result<()>,
{
    let current = board.ok_or(EngineError::NoProblem)?;
    let mut next = current.clone();
    let mut result = TransitionResult::accepted(sequence);

    handler(&mut next, &mut result)?;

    if result.outcome == Outcome::Rejected {
        return Ok((Some(current.clone()), result));
    }

    settle_answer(&mut next, &mut result);
    Ok((Some(next), result))
}

// ---------------------------------------------------------------------------
// Individual transition handlers (private)
// ---------------------------------------------------------------------------

fn apply_draw_blocks(
    constants: &BoardConstants,
    first: &str,
    second: &str,
    mode: Mode,
    sequence: u64,
) -> Result<(Board, TransitionResult)> {
    constants.validate()?;
    let base = constants.base;
    let width = constants.column_count;

    let first_digits = parse_operand(first, base, width)?;
    let second_digits = parse_operand(second, base, width)?;

    if mode == Mode::Subtract
        && digits_value(&first_digits, base) < digits_value(&second_digits, base)
    {
        return Err(EngineError::SubtrahendExceedsMinuend {
            first: first.to_string(),
            second: second.to_string(),
        });
    }

    let mut board = create_empty_board(constants, mode);
    let mut result = TransitionResult::accepted(sequence);

    // SUBTRACT: the minuend is laid straight into the answer, fixed in place.
    let (minuend_role, minuend_movable) = match mode {
        Mode::Add => (NumberRole::First, true),
        Mode::Subtract => (NumberRole::Answer, false),
    };
    lay_digits(&mut board, minuend_role, &first_digits, minuend_movable, &mut result)?;
    lay_digits(&mut board, NumberRole::Second, &second_digits, true, &mut result)?;

    refresh_borrow_controls(&mut board, &mut result);
    settle_answer(&mut board, &mut result);

    info!(
        "drew {} problem {:?} / {:?} (base {}, {} columns)",
        mode, first, second, base, width
    );
    Ok((board, result))
}

fn apply_place_block(
    board: &mut Board,
    block_id: BlockId,
    source: ColumnRef,
    target: ColumnRef,
    result: &mut TransitionResult,
) -> Result<()> {
    let column = board
        .column(source)
        .ok_or(EngineError::NoSuchColumn(source))?;
    let block = column.block(block_id).ok_or(EngineError::BlockNotFound {
        block: block_id,
        column: source,
    })?;
    let target_total = board
        .column(target)
        .map(Column::total)
        .ok_or(EngineError::NoSuchColumn(target))?;

    if !block.movable {
        reject(result, format!("block {} cannot be moved", block_id));
        return Ok(());
    }
    if target != source.matching_answer() {
        reject(result, format!("{} is not the answer column for {}", target, source));
        return Ok(());
    }

    match board.mode {
        Mode::Add => play_into_answer(board, block_id, source, target, result),
        Mode::Subtract => {
            if block.value > target_total {
                let reason = format!(
                    "cannot take {} from {} without borrowing",
                    block.value, target_total
                );
                reject(result, reason);
                return Ok(());
            }
            subtract_from_answer(board, block_id, source, target, result)
        }
    }
}

fn apply_carry(board: &mut Board, position: usize, result: &mut TransitionResult) -> Result<()> {
    if board.mode != Mode::Add {
        return Err(EngineError::WrongMode {
            command: "carry",
            mode: board.mode,
        });
    }
    let at = ColumnRef::answer(position);
    let column = board
        .answer
        .column(position)
        .ok_or(EngineError::NoSuchColumn(at))?;
    if !column.has_carry_control {
        return Err(EngineError::NoCarryControl(position));
    }
    if board.answer.column_to_left(position).is_none() {
        return Err(EngineError::CarryOverflow(position));
    }

    let base = board.constants.base;

    if let Some(column) = board.answer.column_mut(position) {
        column.has_carry_control = false;
    }
    board.carry_count = board.carry_count.saturating_sub(1);
    result
        .events
        .push(BoardEvent::CarryControlRemoved { column: position });

    // T units split into BASE (travels left as a single unit) and T - BASE.
    let total = clear_column(board, at, result)?;
    let excess = total.saturating_sub(base);
    if excess > 0 {
        spawn_block(board, at, excess, false, result)?;
    } else {
        note_total(board, at, result);
    }
    spawn_block(board, ColumnRef::answer(position + 1), 1, false, result)?;

    debug!(
        "carried {} units out of answer[{}], {} left behind",
        base, position, excess
    );
    Ok(())
}

fn apply_borrow(board: &mut Board, position: usize, result: &mut TransitionResult) -> Result<()> {
    if board.mode != Mode::Subtract {
        return Err(EngineError::WrongMode {
            command: "borrow",
            mode: board.mode,
        });
    }
    let column = board
        .answer
        .column(position)
        .ok_or(EngineError::NoSuchColumn(ColumnRef::answer(position)))?;
    if !column.has_borrow_control {
        return Err(EngineError::NoBorrowControl(position));
    }

    lend_unit(board, position, result)?;
    refresh_borrow_controls(board, result);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers (private)
// ---------------------------------------------------------------------------

fn reject(result: &mut TransitionResult, reason: String) {
    debug!("drop rejected: {}", reason);
    result.outcome = Outcome::Rejected;
    result.reason = reason;
}

fn lay_digits(
    board: &mut Board,
    role: NumberRole,
    digits: &[u32],
    movable: bool,
    result: &mut TransitionResult,
) -> Result<()> {
    for (position, &digit) in digits.iter().enumerate() {
        if digit > 0 {
            spawn_block(board, ColumnRef::new(role, position), digit, movable, result)?;
        }
    }
    Ok(())
}

/// ADD: the operand block changes owner; nothing is copied.
fn play_into_answer(
    board: &mut Board,
    block_id: BlockId,
    source: ColumnRef,
    target: ColumnRef,
    result: &mut TransitionResult,
) -> Result<()> {
    let mut block = take_block(board, source, block_id, result)?;
    block.owner = target;
    block.movable = false;
    result.events.push(BoardEvent::BlockMoved {
        block: block_id,
        from: source,
        to: target,
    });
    push_block(board, block, result)
}

/// SUBTRACT: the subtrahend block is consumed and the target column
/// collapses into a single block holding the difference.
fn subtract_from_answer(
    board: &mut Board,
    block_id: BlockId,
    source: ColumnRef,
    target: ColumnRef,
    result: &mut TransitionResult,
) -> Result<()> {
    let block = take_block(board, source, block_id, result)?;
    result.events.push(BoardEvent::BlockMoved {
        block: block_id,
        from: source,
        to: target,
    });
    result.events.push(BoardEvent::BlockRemoved {
        block: block_id,
        column: target,
    });

    let available = clear_column(board, target, result)?;
    let remaining = available - block.value;
    if remaining > 0 {
        spawn_block(board, target, remaining, false, result)?;
    } else {
        note_total(board, target, result);
    }

    debug!(
        "subtracted {} from {}: {} -> {}",
        block.value, target, available, remaining
    );
    refresh_borrow_controls(board, result);
    Ok(())
}

/// Take one unit from answer column `position` and hand BASE units to
/// its right neighbour. An empty lender first borrows from its own left
/// neighbour; the chain stops at the most significant column.
fn lend_unit(board: &mut Board, position: usize, result: &mut TransitionResult) -> Result<()> {
    let receiver = position
        .checked_sub(1)
        .ok_or(EngineError::NoBorrowControl(position))?;
    let total = board
        .answer
        .column(position)
        .map(Column::total)
        .ok_or(EngineError::BorrowExhausted(position))?;

    if total == 0 {
        if position + 1 >= board.answer.width() {
            return Err(EngineError::BorrowExhausted(position));
        }
        lend_unit(board, position + 1, result)?;
    }

    let at = ColumnRef::answer(position);
    let top = board
        .answer
        .column_mut(position)
        .and_then(|c| c.blocks.pop())
        .ok_or(EngineError::BorrowExhausted(position))?;
    result.events.push(BoardEvent::BlockRemoved {
        block: top.id,
        column: at,
    });

    if top.value > 1 {
        spawn_block(board, at, top.value - 1, false, result)?;
    } else {
        note_total(board, at, result);
    }

    let base = board.constants.base;
    spawn_block(board, ColumnRef::answer(receiver), base, false, result)?;

    debug!("answer[{}] lent one unit to answer[{}]", position, receiver);
    Ok(())
}

fn spawn_block(
    board: &mut Board,
    at: ColumnRef,
    value: u32,
    movable: bool,
    result: &mut TransitionResult,
) -> Result<BlockId> {
    let id = BlockId(board.next_block_id);
    board.next_block_id += 1;

    result.events.push(BoardEvent::BlockCreated {
        block: id,
        column: at,
        value,
    });
    push_block(
        board,
        Block {
            id,
            value,
            owner: at,
            origin: at,
            movable,
        },
        result,
    )?;
    Ok(id)
}

/// Stack `block` on top of its owner column.
fn push_block(board: &mut Board, block: Block, result: &mut TransitionResult) -> Result<()> {
    let at = block.owner;
    let column = board
        .column_mut(at)
        .ok_or(EngineError::NoSuchColumn(at))?;
    column.blocks.push(block);
    let total = column.total();
    result
        .events
        .push(BoardEvent::ColumnTotalChanged { column: at, total });

    if board.mode == Mode::Add && at.number.is_answer() {
        sync_carry_control(board, at.position, result);
    }
    Ok(())
}

fn take_block(
    board: &mut Board,
    at: ColumnRef,
    block_id: BlockId,
    result: &mut TransitionResult,
) -> Result<Block> {
    let not_found = EngineError::BlockNotFound {
        block: block_id,
        column: at,
    };
    let column = board.column_mut(at).ok_or(not_found.clone())?;
    let index = column
        .blocks
        .iter()
        .position(|b| b.id == block_id)
        .ok_or(not_found)?;
    let block = column.blocks.remove(index);
    let total = column.total();
    result
        .events
        .push(BoardEvent::ColumnTotalChanged { column: at, total });
    Ok(block)
}

/// Remove every block from `at`; returns the total it held.
fn clear_column(board: &mut Board, at: ColumnRef, result: &mut TransitionResult) -> Result<u32> {
    let column = board
        .column_mut(at)
        .ok_or(EngineError::NoSuchColumn(at))?;
    let removed = std::mem::take(&mut column.blocks);
    let total = removed.iter().map(|b| b.value).sum();
    for block in removed {
        result.events.push(BoardEvent::BlockRemoved {
            block: block.id,
            column: at,
        });
    }
    Ok(total)
}

fn note_total(board: &Board, at: ColumnRef, result: &mut TransitionResult) {
    if let Some(column) = board.column(at) {
        result.events.push(BoardEvent::ColumnTotalChanged {
            column: at,
            total: column.total(),
        });
    }
}

/// ADD: show a carry control once an answer column reaches BASE.
fn sync_carry_control(board: &mut Board, position: usize, result: &mut TransitionResult) {
    let base = board.constants.base;
    let Some(column) = board.answer.column_mut(position) else {
        return;
    };
    if column.total() >= base && !column.has_carry_control {
        column.has_carry_control = true;
        board.carry_count += 1;
        result
            .events
            .push(BoardEvent::CarryControlShown { column: position });
    }
}

/// SUBTRACT: answer column `p` shows a borrow control iff the column to
/// its right holds less than the subtrahend digit beneath it.
/// Recomputed from scratch; idempotent.
fn refresh_borrow_controls(board: &mut Board, result: &mut TransitionResult) {
    if board.mode != Mode::Subtract {
        return;
    }
    for position in 1..board.answer.width() {
        let needed = match (
            board.answer.column(position - 1),
            board.second.column(position - 1),
        ) {
            (Some(have), Some(take)) => have.total() < take.total(),
            _ => false,
        };
        if let Some(column) = board.answer.column_mut(position) {
            if column.has_borrow_control != needed {
                column.has_borrow_control = needed;
                result.events.push(if needed {
                    BoardEvent::BorrowControlShown { column: position }
                } else {
                    BoardEvent::BorrowControlRemoved { column: position }
                });
            }
        }
    }
}

/// Surface the answer once per completion.
fn settle_answer(board: &mut Board, result: &mut TransitionResult) {
    let answer = board.calc_answer();
    if let Some(text) = &answer {
        if board.answer_text.as_deref() != Some(text.as_str()) {
            info!("answer ready: {}", text);
            board.answer_text = Some(text.clone());
            result.events.push(BoardEvent::AnswerReady {
                answer: text.clone(),
            });
        }
    }
    result.answer = answer;
}
