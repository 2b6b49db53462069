//! End-to-end behaviour of the carry/borrow engine: worked examples
//! from the classroom plus exhaustive sweeps over small boards.

use blockhead_engine::arithmetic::format_value;
use blockhead_engine::domain::{Board, BoardConstants, ColumnRef, Mode, NumberRole, Outcome};
use blockhead_engine::engine::BlockEngine;
use blockhead_engine::error::EngineError;
use blockhead_engine::events::BoardEvent;

// ─────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────

fn engine(base: u32, column_count: usize) -> BlockEngine {
    BlockEngine::new(BoardConstants { base, column_count }).expect("valid constants")
}

fn board(engine: &BlockEngine) -> &Board {
    engine.board().expect("problem drawn")
}

/// Columns at or above BASE must each carry an unresolved control.
fn assert_carry_count(engine: &BlockEngine) {
    let b = board(engine);
    let over = b
        .answer
        .columns
        .iter()
        .filter(|c| c.total() >= b.constants.base)
        .count();
    assert_eq!(b.carry_count as usize, over, "carry_count out of step");
}

fn play_all(engine: &mut BlockEngine) {
    for (source, block) in board(engine).movable_blocks() {
        let result = engine
            .place_block(block, source, source.matching_answer())
            .unwrap();
        assert!(result.is_accepted(), "{}", result.reason);
        assert_carry_count(engine);
    }
}

fn resolve_carries(engine: &mut BlockEngine) {
    loop {
        let pending = board(engine)
            .answer
            .columns
            .iter()
            .find(|c| c.has_carry_control)
            .map(|c| c.position);
        match pending {
            Some(position) => {
                engine.carry(position).unwrap();
                assert_carry_count(engine);
            }
            None => break,
        }
    }
}

/// Standard algorithm: ones first, borrow whenever the column is short.
fn solve_subtraction(engine: &mut BlockEngine) {
    let width = engine.constants().column_count;
    for position in 0..width {
        let Some(block) = board(engine).second.columns[position].top_block().cloned() else {
            continue;
        };
        while board(engine).answer.columns[position].total() < block.value {
            assert!(board(engine).answer.columns[position + 1].has_borrow_control);
            engine.borrow(position + 1).unwrap();
        }
        let result = engine
            .place_block(
                block.id,
                ColumnRef::new(NumberRole::Second, position),
                ColumnRef::answer(position),
            )
            .unwrap();
        assert!(result.is_accepted(), "{}", result.reason);
    }
}

// ─────────────────────────────────────────────────────────────
// Worked examples
// ─────────────────────────────────────────────────────────────

#[test]
fn addition_058_plus_007_carries_once() {
    let mut e = engine(10, 3);
    e.draw_blocks("058", "007", Mode::Add).unwrap();

    let ones_a = board(&e).first.columns[0].blocks[0].id;
    let tens_a = board(&e).first.columns[1].blocks[0].id;
    let ones_b = board(&e).second.columns[0].blocks[0].id;

    e.place_block(ones_a, ColumnRef::new(NumberRole::First, 0), ColumnRef::answer(0))
        .unwrap();
    let r = e
        .place_block(ones_b, ColumnRef::new(NumberRole::Second, 0), ColumnRef::answer(0))
        .unwrap();
    assert_eq!(board(&e).answer.columns[0].total(), 15);
    assert!(board(&e).answer.columns[0].has_carry_control);
    assert!(r.events.contains(&BoardEvent::CarryControlShown { column: 0 }));
    assert_eq!(e.carry_count(), 1);

    e.place_block(tens_a, ColumnRef::new(NumberRole::First, 1), ColumnRef::answer(1))
        .unwrap();
    assert_eq!(e.calc_answer(), None, "carry still pending");

    let r = e.carry(0).unwrap();
    assert_eq!(board(&e).answer.columns[0].total(), 5);
    assert_eq!(board(&e).answer.columns[1].total(), 6);
    assert!(!board(&e).answer.columns[1].has_carry_control);
    assert_eq!(e.carry_count(), 0);
    assert!(r.events.contains(&BoardEvent::CarryControlRemoved { column: 0 }));
    assert!(r.events.contains(&BoardEvent::AnswerReady {
        answer: "65".to_string()
    }));
    assert_eq!(r.answer.as_deref(), Some("65"));
    assert_eq!(e.calc_answer().as_deref(), Some("65"));
}

#[test]
fn subtraction_200_minus_001_borrows_through_empty_tens() {
    let mut e = engine(10, 3);
    e.draw_blocks("200", "001", Mode::Subtract).unwrap();
    let unit = board(&e).second.columns[0].blocks[0].id;
    let source = ColumnRef::new(NumberRole::Second, 0);

    // Nothing to subtract from yet.
    let r = e.place_block(unit, source, ColumnRef::answer(0)).unwrap();
    assert_eq!(r.outcome, Outcome::Rejected);

    let r = e.borrow(1).unwrap();
    assert_eq!(board(&e).answer.totals(), vec![10, 9, 1]);
    assert!(r.events.contains(&BoardEvent::BorrowControlRemoved { column: 1 }));
    assert_eq!(board(&e).pending_borrows(), 0);

    let r = e.place_block(unit, source, ColumnRef::answer(0)).unwrap();
    assert!(r.is_accepted());
    assert!(board(&e).second.is_exhausted());
    assert_eq!(board(&e).answer.totals(), vec![9, 9, 1]);
    assert_eq!(r.answer.as_deref(), Some("199"));
}

#[test]
fn borrow_cascade_from_hundreds_terminates() {
    let mut e = engine(10, 3);
    e.draw_blocks("100", "001", Mode::Subtract).unwrap();
    e.borrow(1).unwrap();
    assert_eq!(board(&e).answer.totals(), vec![10, 9, 0]);
    solve_subtraction(&mut e);
    assert_eq!(e.calc_answer().as_deref(), Some("99"));
}

#[test]
fn borrow_leaves_remainder_block_behind() {
    let mut e = engine(10, 2);
    e.draw_blocks("83", "05", Mode::Subtract).unwrap();
    assert!(board(&e).answer.columns[1].has_borrow_control);
    let r = e.borrow(1).unwrap();
    assert_eq!(board(&e).answer.totals(), vec![13, 7]);
    // ones keeps its 3 and gains a fresh BASE block on top
    let ones: Vec<u32> = board(&e).answer.columns[0].blocks.iter().map(|b| b.value).collect();
    assert_eq!(ones, vec![3, 10]);
    assert!(r.events.iter().any(|ev| matches!(
        ev,
        BoardEvent::BlockCreated { value: 10, column, .. } if *column == ColumnRef::answer(0)
    )));
    solve_subtraction(&mut e);
    assert_eq!(e.calc_answer().as_deref(), Some("78"));
}

#[test]
fn subtraction_consumes_block_and_empties_origin() {
    let mut e = engine(10, 3);
    e.draw_blocks("987", "654", Mode::Subtract).unwrap();
    let id = board(&e).second.columns[2].blocks[0].id;
    let r = e
        .place_block(id, ColumnRef::new(NumberRole::Second, 2), ColumnRef::answer(2))
        .unwrap();
    assert!(r.is_accepted());
    assert!(board(&e).second.columns[2].is_empty());
    assert!(board(&e).find_block(id).is_none(), "subtracted block is destroyed");
    assert_eq!(board(&e).answer.columns[2].total(), 3);
    assert_eq!(board(&e).answer.columns[2].blocks.len(), 1);
    assert_eq!(e.calc_answer(), None);
}

#[test]
fn subtracting_equal_digit_empties_answer_column() {
    let mut e = engine(10, 1);
    e.draw_blocks("4", "4", Mode::Subtract).unwrap();
    let id = board(&e).second.columns[0].blocks[0].id;
    let r = e
        .place_block(id, ColumnRef::new(NumberRole::Second, 0), ColumnRef::answer(0))
        .unwrap();
    assert!(board(&e).answer.columns[0].blocks.is_empty());
    assert_eq!(r.answer.as_deref(), Some("0"));
}

#[test]
fn chained_carry_reaches_overflow_column() {
    let mut e = engine(10, 3);
    e.draw_blocks("999", "001", Mode::Add).unwrap();
    play_all(&mut e);
    assert_eq!(e.carry_count(), 1);

    e.carry(0).unwrap();
    assert!(board(&e).answer.columns[1].has_carry_control, "tens now at 10");
    e.carry(1).unwrap();
    e.carry(2).unwrap();
    assert_eq!(board(&e).answer.totals(), vec![0, 0, 0, 1]);
    assert_eq!(e.calc_answer().as_deref(), Some("1000"));
}

#[test]
fn carry_of_exact_base_leaves_column_empty() {
    let mut e = engine(10, 1);
    e.draw_blocks("6", "4", Mode::Add).unwrap();
    play_all(&mut e);
    e.carry(0).unwrap();
    assert!(board(&e).answer.columns[0].blocks.is_empty());
    assert_eq!(e.calc_answer().as_deref(), Some("10"));
}

// ─────────────────────────────────────────────────────────────
// Rejection and invalid state
// ─────────────────────────────────────────────────────────────

#[test]
fn rejected_drops_change_nothing() {
    let mut e = engine(10, 3);
    e.draw_blocks("305", "406", Mode::Add).unwrap();
    let before = board(&e).clone();
    let id = before.first.columns[0].blocks[0].id;
    let source = ColumnRef::new(NumberRole::First, 0);

    for target in [
        ColumnRef::answer(1),
        ColumnRef::answer(3),
        ColumnRef::new(NumberRole::Second, 0),
        ColumnRef::new(NumberRole::First, 0),
    ] {
        let r = e.place_block(id, source, target).unwrap();
        assert_eq!(r.outcome, Outcome::Rejected, "{}", target);
        assert!(r.events.is_empty());
        assert_eq!(board(&e), &before);
    }
}

#[test]
fn played_block_cannot_move_again() {
    let mut e = engine(10, 3);
    e.draw_blocks("005", "000", Mode::Add).unwrap();
    let id = board(&e).first.columns[0].blocks[0].id;
    e.place_block(id, ColumnRef::new(NumberRole::First, 0), ColumnRef::answer(0))
        .unwrap();
    let before = board(&e).clone();
    let r = e
        .place_block(id, ColumnRef::answer(0), ColumnRef::answer(0))
        .unwrap();
    assert_eq!(r.outcome, Outcome::Rejected);
    assert_eq!(board(&e), &before);
}

#[test]
fn minuend_blocks_cannot_be_dragged() {
    let mut e = engine(10, 3);
    e.draw_blocks("555", "111", Mode::Subtract).unwrap();
    let id = board(&e).answer.columns[0].blocks[0].id;
    let r = e
        .place_block(id, ColumnRef::answer(0), ColumnRef::answer(0))
        .unwrap();
    assert_eq!(r.outcome, Outcome::Rejected);
}

#[test]
fn invalid_state_errors_leave_board_alone() {
    let mut e = engine(10, 3);
    e.draw_blocks("123", "012", Mode::Subtract).unwrap();
    assert_eq!(board(&e).pending_borrows(), 0);
    let before = board(&e).clone();

    assert_eq!(e.borrow(2).unwrap_err(), EngineError::NoBorrowControl(2));
    assert_eq!(e.borrow(0).unwrap_err(), EngineError::NoBorrowControl(0));
    assert!(e.carry(0).unwrap_err().is_invalid_state());
    assert!(matches!(e.borrow(7), Err(EngineError::NoSuchColumn(_))));
    assert_eq!(board(&e), &before);
    assert_eq!(e.last_sequence(), 1);
}

// ─────────────────────────────────────────────────────────────
// Completion
// ─────────────────────────────────────────────────────────────

#[test]
fn zero_plus_zero_answers_zero() {
    let mut e = engine(10, 3);
    let r = e.draw_blocks("000", "000", Mode::Add).unwrap();
    assert_eq!(e.calc_answer().as_deref(), Some("0"));
    assert!(r.events.contains(&BoardEvent::AnswerReady {
        answer: "0".to_string()
    }));
}

#[test]
fn answer_ready_fires_once() {
    let mut e = engine(10, 2);
    e.draw_blocks("12", "", Mode::Add).unwrap();
    play_all(&mut e);
    assert_eq!(e.history().len(), 3);
    assert_eq!(e.calc_answer().as_deref(), Some("12"));

    // A rejected drop afterwards must not re-announce the answer.
    let r = e
        .place_block(
            board(&e).answer.columns[0].blocks[0].id,
            ColumnRef::answer(0),
            ColumnRef::answer(0),
        )
        .unwrap();
    assert!(!r
        .events
        .iter()
        .any(|ev| matches!(ev, BoardEvent::AnswerReady { .. })));
    assert_eq!(board(&e).answer_text.as_deref(), Some("12"));
}

#[test]
fn answer_waits_for_every_operand_block() {
    let mut e = engine(10, 2);
    e.draw_blocks("21", "13", Mode::Add).unwrap();
    let moves = board(&e).movable_blocks();
    let (last_source, last_block) = moves[moves.len() - 1];
    for &(source, block) in &moves[..moves.len() - 1] {
        let r = e.place_block(block, source, source.matching_answer()).unwrap();
        assert_eq!(r.answer, None);
    }
    let r = e
        .place_block(last_block, last_source, last_source.matching_answer())
        .unwrap();
    assert_eq!(r.answer.as_deref(), Some("34"));
}

// ─────────────────────────────────────────────────────────────
// Exhaustive sweeps
// ─────────────────────────────────────────────────────────────

fn sweep_addition(base: u32, column_count: usize) {
    let limit = (base as u64).pow(column_count as u32);
    for a in 0..limit {
        for b in 0..limit {
            let mut e = engine(base, column_count);
            e.draw_blocks(
                &format_value(a, base, column_count),
                &format_value(b, base, column_count),
                Mode::Add,
            )
            .unwrap();
            play_all(&mut e);
            resolve_carries(&mut e);
            assert_eq!(
                e.calc_answer(),
                Some(format_value(a + b, base, 1)),
                "base {}: {} + {}",
                base,
                a,
                b
            );
        }
    }
}

fn sweep_subtraction(base: u32, column_count: usize) {
    let limit = (base as u64).pow(column_count as u32);
    for a in 0..limit {
        for b in 0..=a {
            let mut e = engine(base, column_count);
            e.draw_blocks(
                &format_value(a, base, column_count),
                &format_value(b, base, column_count),
                Mode::Subtract,
            )
            .unwrap();
            solve_subtraction(&mut e);
            assert_eq!(
                e.calc_answer(),
                Some(format_value(a - b, base, 1)),
                "base {}: {} - {}",
                base,
                a,
                b
            );
            assert_eq!(board(&e).pending_borrows(), 0);
        }
    }
}

#[test]
fn every_two_digit_decimal_sum_round_trips() {
    sweep_addition(10, 2);
}

#[test]
fn every_three_digit_base_four_sum_round_trips() {
    sweep_addition(4, 3);
}

#[test]
fn binary_sums_round_trip() {
    sweep_addition(2, 4);
}

#[test]
fn every_two_digit_decimal_difference_round_trips() {
    sweep_subtraction(10, 2);
}

#[test]
fn every_three_digit_base_four_difference_round_trips() {
    sweep_subtraction(4, 3);
}

#[test]
fn three_digit_decimal_differences_from_round_minuends() {
    for a in [100u64, 200, 301, 500, 999] {
        for b in [0u64, 1, 9, 10, 99, 100] {
            if b > a {
                continue;
            }
            let mut e = engine(10, 3);
            e.draw_blocks(&format_value(a, 10, 3), &format_value(b, 10, 3), Mode::Subtract)
                .unwrap();
            solve_subtraction(&mut e);
            assert_eq!(e.calc_answer(), Some((a - b).to_string()), "{} - {}", a, b);
        }
    }
}
