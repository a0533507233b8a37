use anyhow::{Context, Result};
use regex::Regex;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Read the known board types from a hardware header, see [parse_board_types]
pub fn load_board_types(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed opening board list {}", path.display()))?;
    parse_board_types(BufReader::new(file))
        .with_context(|| format!("Failed reading board list {}", path.display()))
}

/// Collect the first `defined(SYMBOL)` of every line, sorted
pub fn parse_board_types<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let re = Regex::new(r"defined\((\w*)\)")?;
    let mut boards = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(caps) = re.captures(&line) {
            boards.push(caps[1].to_owned());
        }
    }
    boards.sort();
    log::debug!("Found {} board type(s)", boards.len());
    Ok(boards)
}
