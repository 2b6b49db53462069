/// BlockHead Engine: Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 hashing.
/// Two boards reached through the same command history produce
/// byte-identical output.
///
/// Rules:
///   - Numbers in fixed order: first, second, answer
///   - Columns least-significant first, blocks in stacking order
///   - Column refs rendered as `role[position]`
///   - UTF-8 JSON, no whitespace, no float

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::{Block, Board, Column, Number};
use crate::ENGINE_VERSION;

/// Canonical serialization of a Board to UTF-8 JSON bytes.
pub fn canonical_serialize(board: &Board) -> Vec<u8> {
    build_canonical_value(board).to_string().into_bytes()
}

/// SHA-256 of canonical serialization. Lowercase hex string.
pub fn canonical_hash(board: &Board) -> String {
    let digest = Sha256::digest(canonical_serialize(board));
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Field order: engine_version, mode, base, column_count,
///              carry_count, numbers, answer
fn build_canonical_value(board: &Board) -> Value {
    let mut root = Map::new();
    root.insert(
        "engine_version".to_string(),
        Value::Number(ENGINE_VERSION.into()),
    );
    root.insert(
        "mode".to_string(),
        Value::String(board.mode.as_str().to_string()),
    );
    root.insert(
        "base".to_string(),
        Value::Number(board.constants.base.into()),
    );
    root.insert(
        "column_count".to_string(),
        Value::Number((board.constants.column_count as u64).into()),
    );
    root.insert(
        "carry_count".to_string(),
        Value::Number(board.carry_count.into()),
    );
    root.insert(
        "numbers".to_string(),
        Value::Array(board.numbers().into_iter().map(number_value).collect()),
    );
    root.insert(
        "answer".to_string(),
        board
            .answer_text
            .as_ref()
            .map(|a| Value::String(a.clone()))
            .unwrap_or(Value::Null),
    );
    Value::Object(root)
}

fn number_value(number: &Number) -> Value {
    let mut map = Map::new();
    map.insert(
        "role".to_string(),
        Value::String(number.role.as_str().to_string()),
    );
    map.insert(
        "columns".to_string(),
        Value::Array(number.columns.iter().map(column_value).collect()),
    );
    Value::Object(map)
}

fn column_value(column: &Column) -> Value {
    let mut map = Map::new();
    map.insert(
        "position".to_string(),
        Value::Number((column.position as u64).into()),
    );
    map.insert("total".to_string(), Value::Number(column.total().into()));
    map.insert("carry".to_string(), Value::Bool(column.has_carry_control));
    map.insert("borrow".to_string(), Value::Bool(column.has_borrow_control));
    map.insert(
        "blocks".to_string(),
        Value::Array(column.blocks.iter().map(block_value).collect()),
    );
    Value::Object(map)
}

fn block_value(block: &Block) -> Value {
    let mut map = Map::new();
    map.insert("id".to_string(), Value::Number(block.id.0.into()));
    map.insert("value".to_string(), Value::Number(block.value.into()));
    map.insert("origin".to_string(), Value::String(block.origin.to_string()));
    map.insert("movable".to_string(), Value::Bool(block.movable));
    Value::Object(map)
}
