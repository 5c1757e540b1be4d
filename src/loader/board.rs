//! Parse `dashboard.json`: the operational board (weather, tasks, orders…).

use std::path::Path;

use crate::loader::error::{read_optional, LoadError};
use crate::loader::seed;
use crate::model::Board;

pub const FILE_NAME: &str = "dashboard.json";

/// Load the board. Without a `dashboard.json` the built-in demo board is used.
pub fn parse_board(data_dir: &Path) -> Result<Board, LoadError> {
    let path = data_dir.join(FILE_NAME);
    match read_optional(&path)? {
        Some(content) => parse_board_json(&content, &path),
        None => {
            tracing::debug!(path = %path.display(), "no dashboard file, using demo board");
            Ok(seed::board())
        }
    }
}

pub fn parse_board_json(content: &str, path: &Path) -> Result<Board, LoadError> {
    serde_json::from_str(content).map_err(|e| LoadError::invalid(path, e))
}
