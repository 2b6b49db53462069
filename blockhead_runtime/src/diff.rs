//! Board diff: what changed between two boards.
//!
//! A presentation layer animates from this instead of re-deriving
//! the arithmetic. All numeric fields are integers.

use std::collections::BTreeMap;

use blockhead_engine::domain::{BlockId, Board, ColumnRef};

/// Total of one column before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDelta {
    pub column: ColumnRef,
    pub before: u32,
    pub after: u32,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMove {
    pub block: BlockId,
    pub from: ColumnRef,
    pub to: ColumnRef,
}

/// Structured board comparison. Only changed columns are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardDiff {
    pub columns: Vec<ColumnDelta>,
    pub added_blocks: Vec<BlockId>,
    pub removed_blocks: Vec<BlockId>,
    pub moved_blocks: Vec<BlockMove>,
    pub carry_count_delta: i64,
    pub answer_before: Option<String>,
    pub answer_after: Option<String>,
}

impl BoardDiff {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
            && self.added_blocks.is_empty()
            && self.removed_blocks.is_empty()
            && self.moved_blocks.is_empty()
            && self.carry_count_delta == 0
            && self.answer_before == self.answer_after
    }

    pub fn answer_changed(&self) -> bool {
        self.answer_before != self.answer_after
    }
}

pub fn compare_boards(before: &Board, after: &Board) -> BoardDiff {
    let mut columns = Vec::new();
    for number in after.numbers() {
        for column in &number.columns {
            let at = column.column_ref();
            let old = before.column(at).map_or(0, |c| c.total());
            let new = column.total();
            if old != new {
                columns.push(ColumnDelta {
                    column: at,
                    before: old,
                    after: new,
                    delta: new as i64 - old as i64,
                });
            }
        }
    }

    let owners_before = owners(before);
    let owners_after = owners(after);

    let added_blocks = owners_after
        .keys()
        .filter(|id| !owners_before.contains_key(*id))
        .copied()
        .collect();
    let removed_blocks = owners_before
        .keys()
        .filter(|id| !owners_after.contains_key(*id))
        .copied()
        .collect();
    let moved_blocks = owners_before
        .iter()
        .filter_map(|(id, from)| {
            owners_after
                .get(id)
                .filter(|to| *to != from)
                .map(|to| BlockMove {
                    block: *id,
                    from: *from,
                    to: *to,
                })
        })
        .collect();

    BoardDiff {
        columns,
        added_blocks,
        removed_blocks,
        moved_blocks,
        carry_count_delta: after.carry_count as i64 - before.carry_count as i64,
        answer_before: before.calc_answer(),
        answer_after: after.calc_answer(),
    }
}

fn owners(board: &Board) -> BTreeMap<BlockId, ColumnRef> {
    board.blocks().map(|b| (b.id, b.owner)).collect()
}
