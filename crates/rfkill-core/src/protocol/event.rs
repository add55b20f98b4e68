//! rfkill event record and its enumerated fields.
//!
//! The layout mirrors `struct rfkill_event` from the kernel UAPI header
//! `include/uapi/linux/rfkill.h`.  The same record is used in both
//! directions: the kernel emits it to report devices being added, removed,
//! or changing state, and user space writes it to request a state change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::protocol::codec::ProtocolError;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Size of one event record on the wire, in bytes.
///
/// `idx`(4) + `type`(1) + `op`(1) + `soft`(1) + `hard`(1).
pub const EVENT_SIZE: usize = 8;

// ── Switch kind ───────────────────────────────────────────────────────────────

/// Radio type of an rfkill switch (`RFKILL_TYPE_*`).
///
/// Values the kernel may add in the future are kept as [`Kind::Unknown`] so
/// that a record always survives a decode/encode cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    /// Every switch type; only meaningful for `change-all` commands.
    All,
    Wlan,
    Bluetooth,
    Uwb,
    Wimax,
    Wwan,
    Gps,
    Fm,
    Nfc,
    /// A type byte this library does not know about.
    Unknown(u8),
}

impl From<u8> for Kind {
    fn from(value: u8) -> Self {
        match value {
            0 => Kind::All,
            1 => Kind::Wlan,
            2 => Kind::Bluetooth,
            3 => Kind::Uwb,
            4 => Kind::Wimax,
            5 => Kind::Wwan,
            6 => Kind::Gps,
            7 => Kind::Fm,
            8 => Kind::Nfc,
            other => Kind::Unknown(other),
        }
    }
}

impl From<Kind> for u8 {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::All => 0,
            Kind::Wlan => 1,
            Kind::Bluetooth => 2,
            Kind::Uwb => 3,
            Kind::Wimax => 4,
            Kind::Wwan => 5,
            Kind::Gps => 6,
            Kind::Fm => 7,
            Kind::Nfc => 8,
            Kind::Unknown(raw) => raw,
        }
    }
}

impl Kind {
    /// The short lowercase name used by the `rfkill` command line tool.
    ///
    /// Unknown kinds have no name and return an empty string.
    pub fn name(self) -> &'static str {
        match self {
            Kind::All => "all",
            Kind::Wlan => "wifi",
            Kind::Bluetooth => "bluetooth",
            Kind::Uwb => "uwb",
            Kind::Wimax => "wimax",
            Kind::Wwan => "wwan",
            Kind::Gps => "gps",
            Kind::Fm => "fm",
            Kind::Nfc => "nfc",
            Kind::Unknown(_) => "",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Kind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Kind::All),
            "wifi" | "wlan" => Ok(Kind::Wlan),
            "bluetooth" => Ok(Kind::Bluetooth),
            "uwb" | "ultrawideband" => Ok(Kind::Uwb),
            "wimax" => Ok(Kind::Wimax),
            "wwan" => Ok(Kind::Wwan),
            "gps" => Ok(Kind::Gps),
            "fm" => Ok(Kind::Fm),
            "nfc" => Ok(Kind::Nfc),
            _ => Err(ProtocolError::UnknownName(s.to_string())),
        }
    }
}

// ── Operation ─────────────────────────────────────────────────────────────────

/// Why a record was emitted (kernel → user) or what is requested (user → kernel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// A device was added.
    Add,
    /// A device was removed.
    Delete,
    /// A single device's state changed, or a change is requested for one index.
    Change,
    /// User space changes every device of one kind.
    ChangeAll,
    /// An operation byte this library does not know about.
    Unknown(u8),
}

impl From<u8> for Operation {
    fn from(value: u8) -> Self {
        match value {
            0 => Operation::Add,
            1 => Operation::Delete,
            2 => Operation::Change,
            3 => Operation::ChangeAll,
            other => Operation::Unknown(other),
        }
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Add => 0,
            Operation::Delete => 1,
            Operation::Change => 2,
            Operation::ChangeAll => 3,
            Operation::Unknown(raw) => raw,
        }
    }
}

impl Operation {
    /// Lowercase name of the operation; empty for unknown values.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Delete => "delete",
            Operation::Change => "change",
            Operation::ChangeAll => "change-all",
            Operation::Unknown(_) => "",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Operation {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(Operation::Add),
            "delete" | "del" => Ok(Operation::Delete),
            "change" => Ok(Operation::Change),
            "change-all" | "changeall" => Ok(Operation::ChangeAll),
            _ => Err(ProtocolError::UnknownName(s.to_string())),
        }
    }
}

// ── Event record ──────────────────────────────────────────────────────────────

/// One rfkill event record.
///
/// `soft` and `hard` are kept as raw bytes: the kernel only ever writes 0 or
/// 1, but the codec transcodes whatever it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Device index, stable for as long as the kernel knows the device.
    pub index: u32,
    /// Radio type of the switch.
    pub kind: Kind,
    /// Why the record was emitted or what is requested.
    pub operation: Operation,
    /// Software block state.
    pub soft: u8,
    /// Hardware block state.  Ignored by the kernel when written.
    pub hard: u8,
}

impl Event {
    /// Builds a `change` request that soft-blocks or unblocks one device.
    ///
    /// All other fields are zero, as the kernel expects for this command.
    pub fn change(index: u32, blocked: bool) -> Self {
        Self {
            index,
            kind: Kind::All,
            operation: Operation::Change,
            soft: u8::from(blocked),
            hard: 0,
        }
    }

    /// Builds a `change-all` request for every device of `kind`.
    pub fn change_all(kind: Kind, blocked: bool) -> Self {
        Self {
            index: 0,
            kind,
            operation: Operation::ChangeAll,
            soft: u8::from(blocked),
            hard: 0,
        }
    }

    pub fn is_soft_blocked(&self) -> bool {
        self.soft != 0
    }

    pub fn is_hard_blocked(&self) -> bool {
        self.hard != 0
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} soft={} hard={}",
            self.index, self.operation, self.kind, self.soft, self.hard
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_u8_covers_every_known_value() {
        let expected = [
            Kind::All,
            Kind::Wlan,
            Kind::Bluetooth,
            Kind::Uwb,
            Kind::Wimax,
            Kind::Wwan,
            Kind::Gps,
            Kind::Fm,
            Kind::Nfc,
        ];
        for (raw, kind) in expected.iter().enumerate() {
            assert_eq!(Kind::from(raw as u8), *kind);
            assert_eq!(u8::from(*kind), raw as u8);
        }
    }

    #[test]
    fn test_kind_unknown_value_is_preserved() {
        let kind = Kind::from(0xEE);
        assert_eq!(kind, Kind::Unknown(0xEE));
        assert_eq!(u8::from(kind), 0xEE);
        assert_eq!(kind.to_string(), "");
    }

    #[test]
    fn test_kind_names_match_rfkill_tool() {
        assert_eq!(Kind::Wlan.to_string(), "wifi");
        assert_eq!(Kind::Bluetooth.to_string(), "bluetooth");
        assert_eq!(Kind::Nfc.to_string(), "nfc");
    }

    #[test]
    fn test_kind_parses_names_and_aliases() {
        assert_eq!("wifi".parse::<Kind>(), Ok(Kind::Wlan));
        assert_eq!("WLAN".parse::<Kind>(), Ok(Kind::Wlan));
        assert_eq!("gps".parse::<Kind>(), Ok(Kind::Gps));
        assert_eq!(
            "toaster".parse::<Kind>(),
            Err(ProtocolError::UnknownName("toaster".to_string()))
        );
    }

    #[test]
    fn test_operation_from_u8_round_trips() {
        for raw in 0..=u8::MAX {
            assert_eq!(u8::from(Operation::from(raw)), raw);
        }
    }

    #[test]
    fn test_operation_display_and_parse_agree() {
        for op in [
            Operation::Add,
            Operation::Delete,
            Operation::Change,
            Operation::ChangeAll,
        ] {
            assert_eq!(op.to_string().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn test_event_change_request_has_zeroed_fields() {
        let ev = Event::change(3, true);
        assert_eq!(ev.index, 3);
        assert_eq!(ev.kind, Kind::All);
        assert_eq!(ev.operation, Operation::Change);
        assert_eq!(ev.soft, 1);
        assert_eq!(ev.hard, 0);

        assert_eq!(Event::change(3, false).soft, 0);
    }

    #[test]
    fn test_event_change_all_request_targets_kind() {
        let ev = Event::change_all(Kind::Bluetooth, false);
        assert_eq!(ev.index, 0);
        assert_eq!(ev.kind, Kind::Bluetooth);
        assert_eq!(ev.operation, Operation::ChangeAll);
        assert_eq!(ev.soft, 0);
    }

    #[test]
    fn test_event_block_helpers_treat_any_nonzero_as_blocked() {
        let ev = Event {
            index: 0,
            kind: Kind::Wlan,
            operation: Operation::Add,
            soft: 2,
            hard: 0,
        };
        assert!(ev.is_soft_blocked());
        assert!(!ev.is_hard_blocked());
    }

    #[test]
    fn test_event_serializes_kind_in_kebab_case() {
        let ev = Event {
            index: 1,
            kind: Kind::Wlan,
            operation: Operation::ChangeAll,
            soft: 0,
            hard: 1,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"wlan\""), "got {json}");
        assert!(json.contains("\"change-all\""), "got {json}");
    }
}
