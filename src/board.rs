//! Turning discovered devices into flashable boards
use std::fmt;

use crate::device::{self, Device};

pub mod catalog;

/// Board details gathered so far, anything unknown is `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardDraft {
    pub hostname: Option<String>,
    pub board: Option<String>,
    pub ip: Option<String>,
    pub size_mb: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Board,
    Size,
    Ip,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Board => write!(f, "board"),
            MissingField::Size => write!(f, "size"),
            MissingField::Ip => write!(f, "ip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(variant_size_differences)]
pub enum Resolution {
    Resolved(ResolvedBoard),
    /// `missing` is ordered the way the operator is asked for the values
    NeedsInput {
        draft: BoardDraft,
        missing: Vec<MissingField>,
    },
}

/// A board with everything needed to build and flash it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBoard {
    pub hostname: Option<String>,
    pub board: String,
    pub ip: String,
    pub size_mb: u32,
}

/// A board queued for flashing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashTarget {
    pub board: ResolvedBoard,
    pub auth: String,
    pub flags: String,
}

impl BoardDraft {
    fn non_empty(s: &str) -> Option<String> {
        (!s.is_empty()).then(|| s.to_owned())
    }

    /// Draft from a device picked out of the table, the size is only trusted
    /// when the flash size matches the SDK partition size
    pub fn from_listed_device(device: &Device) -> Self {
        Self {
            hostname: Some(device.hostname.clone()),
            board: Self::non_empty(&device.board),
            ip: Self::non_empty(&device.ip),
            size_mb: device.mem_size_mb(),
        }
    }

    /// Draft from a device named on the command line, sized by its SDK partition
    pub fn from_named_device(device: &Device) -> Self {
        Self {
            hostname: Some(device.hostname.clone()),
            board: Self::non_empty(&device.board),
            ip: Self::non_empty(&device.ip),
            size_mb: device.sdk_size_mb(),
        }
    }

    pub fn missing(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if self.board.is_none() {
            missing.push(MissingField::Board);
        }
        if self.size_mb.is_none() {
            missing.push(MissingField::Size);
        }
        if self.ip.is_none() {
            missing.push(MissingField::Ip);
        }
        missing
    }

    pub fn resolve(self) -> Resolution {
        match self {
            BoardDraft {
                hostname,
                board: Some(board),
                ip: Some(ip),
                size_mb: Some(size_mb),
            } if size_mb > 0 => Resolution::Resolved(ResolvedBoard {
                hostname,
                board,
                ip,
                size_mb,
            }),
            draft => {
                let missing = draft.missing();
                Resolution::NeedsInput { draft, missing }
            }
        }
    }
}

impl ResolvedBoard {
    pub fn into_target(self, auth: String, flags: String) -> FlashTarget {
        FlashTarget {
            board: self,
            auth,
            flags,
        }
    }
}

impl FlashTarget {
    /// Hostname if known, otherwise the IP
    pub fn host(&self) -> &str {
        self.board.hostname.as_deref().unwrap_or(&self.board.ip)
    }
}

/// Draft for the 1-based `index` into the printed table, `None` if out of range
pub fn board_by_index(devices: &[Device], index: usize) -> Option<BoardDraft> {
    if index == 0 {
        return None;
    }
    devices
        .get(index - 1)
        .map(BoardDraft::from_listed_device)
}

/// Board for the device named `hostname` (case-insensitive).
///
/// `None` if no device matches, or if the first match lacks a board type, an IP or an SDK size.
pub fn board_by_hostname(devices: &[Device], hostname: &str) -> Option<ResolvedBoard> {
    let device = device::find_by_hostname(devices, hostname)?;
    match BoardDraft::from_named_device(device).resolve() {
        Resolution::Resolved(board) => Some(board),
        Resolution::NeedsInput { missing, .. } => {
            log::warn!(
                "Cannot flash {} without prompting, missing: {}",
                device.hostname,
                missing
                    .iter()
                    .map(MissingField::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            None
        }
    }
}
