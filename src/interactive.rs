//! Asking the operator for whatever is needed to flash a board
use anyhow::Result;
use std::io::{BufRead, Write};

use crate::{
    board::{self, BoardDraft, Resolution, ResolvedBoard},
    console::Console,
    device::Device,
};

/// Used when the operator leaves the IP prompt empty, the address of a device in AP mode
pub const DEFAULT_IP: &str = "192.168.4.1";

/// Pick a board from the printed table and fill in what its advertisement left out.
///
/// Empty input at the first prompt starts from scratch, for a device that was not discovered.
/// `load_board_types` is only called if the board type has to be chosen.
/// Any invalid answer aborts with `None`.
pub fn input_board<R, W, F>(
    console: &mut Console<R, W>,
    devices: &[Device],
    load_board_types: F,
) -> Result<Option<ResolvedBoard>>
where
    R: BufRead,
    W: Write,
    F: FnOnce() -> Result<Vec<String>>,
{
    let Some(answer) =
        console.ask("Choose the board you want to flash (empty if none of these): ")?
    else {
        return Ok(None);
    };
    let answer = answer.trim();
    let mut draft = if answer.is_empty() {
        BoardDraft::default()
    } else {
        match answer
            .parse::<usize>()
            .ok()
            .and_then(|idx| board::board_by_index(devices, idx))
        {
            Some(draft) => draft,
            None => {
                writeln!(console, "Board number must be between 1 and {}\n", devices.len())?;
                return Ok(None);
            }
        }
    };
    log::debug!("Missing before prompting: {:?}", draft.missing());

    if draft.board.is_none() {
        match choose_board_type(console, &load_board_types()?)? {
            Some(board) => draft.board = Some(board),
            None => return Ok(None),
        }
    }

    if draft.size_mb.is_none() {
        match input_size(console)? {
            Some(size) => draft.size_mb = Some(size),
            None => return Ok(None),
        }
    }

    if draft.ip.is_none() {
        match console.ask(&format!("IP of the device to flash (empty for {DEFAULT_IP}): "))? {
            Some(ip) if !ip.trim().is_empty() => draft.ip = Some(ip.trim().to_owned()),
            Some(_) => draft.ip = Some(DEFAULT_IP.to_owned()),
            None => {
                writeln!(console, "Wrong IP")?;
                return Ok(None);
            }
        }
    }

    match draft.resolve() {
        Resolution::Resolved(board) => Ok(Some(board)),
        Resolution::NeedsInput { missing, .. } => {
            log::error!("Board still incomplete after prompting: {missing:?}");
            Ok(None)
        }
    }
}

/// List `boards` (1-based) and ask for one of them
pub fn choose_board_type<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    boards: &[String],
) -> Result<Option<String>> {
    writeln!(console)?;
    for (idx, name) in boards.iter().enumerate() {
        writeln!(console, "{:3}\t{name}", idx + 1)?;
    }
    writeln!(console)?;

    let choice = console
        .ask("Choose the board type you want to flash: ")?
        .and_then(|a| a.trim().parse::<usize>().ok())
        .filter(|&idx| idx >= 1)
        .and_then(|idx| boards.get(idx - 1));
    match choice {
        Some(board) => Ok(Some(board.clone())),
        None => {
            writeln!(console, "Board number must be between 1 and {}\n", boards.len())?;
            Ok(None)
        }
    }
}

/// Ask for the memory size in MiB
fn input_size<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Option<u32>> {
    let size = console
        .ask("Board memory size (1 for 1M, 4 for 4M): ")?
        .and_then(|a| a.trim().parse::<u32>().ok())
        .filter(|&size| size > 0);
    if size.is_none() {
        writeln!(console, "Wrong memory size")?;
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::tests::{device, with_sizes};
    use anyhow::bail;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use testresult::TestResult;

    fn devices() -> Vec<Device> {
        vec![
            with_sizes(device("ESPURNA-AA11", "192.168.1.20", "NODEMCU_LOLIN"), "4096", "4096"),
            with_sizes(device("ESPURNA-BB22", "192.168.1.21", ""), "4096", "1024"),
        ]
    }

    fn boards() -> Result<Vec<String>> {
        Ok(vec!["ITEAD_SONOFF_BASIC".into(), "NODEMCU_LOLIN".into()])
    }

    fn no_boards() -> Result<Vec<String>> {
        bail!("board list should not be needed")
    }

    fn run(input: &str, devices: &[Device]) -> Result<(Option<ResolvedBoard>, String)> {
        let mut console = Console::new(Cursor::new(input.to_owned()), Vec::new());
        let board = input_board(&mut console, devices, boards)?;
        Ok((board, String::from_utf8(console.into_output())?))
    }

    #[test]
    fn test_complete_device_needs_no_more_prompts() -> TestResult {
        let mut console = Console::new(Cursor::new("1\n"), Vec::new());
        let board = input_board(&mut console, &devices(), no_boards)?;
        assert_eq!(
            board,
            Some(ResolvedBoard {
                hostname: Some("ESPURNA-AA11".into()),
                board: "NODEMCU_LOLIN".into(),
                ip: "192.168.1.20".into(),
                size_mb: 4,
            })
        );
        let output = String::from_utf8(console.into_output())?;
        assert!(!output.contains("board type"));
        Ok(())
    }

    #[test]
    fn test_incomplete_device_prompts_for_missing() -> TestResult {
        let (board, output) = run("2\n1\n4\n", &devices())?;
        assert_eq!(
            board,
            Some(ResolvedBoard {
                hostname: Some("ESPURNA-BB22".into()),
                board: "ITEAD_SONOFF_BASIC".into(),
                ip: "192.168.1.21".into(),
                size_mb: 4,
            })
        );
        assert!(output.contains("  1\tITEAD_SONOFF_BASIC\n  2\tNODEMCU_LOLIN\n"));
        assert!(output.contains("Board memory size"));
        assert!(!output.contains("IP of the device"));
        Ok(())
    }

    #[test]
    fn test_manual_entry_uses_default_ip() -> TestResult {
        let (board, _) = run("\n2\n1\n\n", &devices())?;
        assert_eq!(
            board,
            Some(ResolvedBoard {
                hostname: None,
                board: "NODEMCU_LOLIN".into(),
                ip: DEFAULT_IP.into(),
                size_mb: 1,
            })
        );
        let (board, _) = run("\n2\n1\n10.0.0.7\n", &devices())?;
        assert_eq!(board.map(|b| b.ip), Some("10.0.0.7".to_owned()));
        Ok(())
    }

    #[test]
    fn test_invalid_index_aborts() -> TestResult {
        for input in ["abc\n", "0\n", "3\n", "-1\n"] {
            let (board, output) = run(input, &devices())?;
            assert_eq!(board, None, "input {input:?}");
            assert!(output.contains("Board number must be between 1 and 2"));
        }
        Ok(())
    }

    #[test]
    fn test_invalid_board_type_aborts() -> TestResult {
        for input in ["2\nfoo\n", "2\n0\n", "2\n3\n", "2\n"] {
            let (board, output) = run(input, &devices())?;
            assert_eq!(board, None, "input {input:?}");
            assert!(output.contains("Board number must be between 1 and 2"));
        }
        Ok(())
    }

    #[test]
    fn test_invalid_size_aborts() -> TestResult {
        for input in ["2\n1\nfour\n", "2\n1\n0\n", "2\n1\n"] {
            let (board, output) = run(input, &devices())?;
            assert_eq!(board, None, "input {input:?}");
            assert!(output.contains("Wrong memory size"));
        }
        Ok(())
    }

    #[test]
    fn test_closed_input_aborts() -> TestResult {
        let (board, _) = run("", &devices())?;
        assert_eq!(board, None);
        let (board, output) = run("\n2\n1\n", &devices())?;
        assert_eq!(board, None);
        assert!(output.contains("Wrong IP"));
        Ok(())
    }

    #[test]
    fn test_board_list_error_propagates() {
        let mut console = Console::new(Cursor::new("2\n"), Vec::new());
        assert!(input_board(&mut console, &devices(), no_boards).is_err());
    }
}
