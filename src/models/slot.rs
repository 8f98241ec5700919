//! Slot categories.
//!
//! Every (date, person) cell of a roster holds at most one slot: one of
//! the three shift categories or one of the three leave categories.
//!
//! | Code | Variant | Meaning |
//! |------|---------|---------|
//! | P | `Shift::Morning` | Morning shift |
//! | S | `Shift::Afternoon` | Afternoon shift |
//! | M | `Shift::Night` | Night shift |
//! | L | `Leave::Regular` | Requested or mandatory leave |
//! | LT | `Leave::Extra` | Extra leave |
//! | CT | `Leave::Annual` | Annual leave |

use serde::{Deserialize, Serialize};
use std::fmt;

/// A shift category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shift {
    /// Morning (P).
    #[serde(rename = "P")]
    Morning,
    /// Afternoon (S).
    #[serde(rename = "S")]
    Afternoon,
    /// Night (M).
    #[serde(rename = "M")]
    Night,
}

/// A leave category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Leave {
    /// Requested or mandatory leave (L).
    #[serde(rename = "L")]
    Regular,
    /// Extra leave (LT).
    #[serde(rename = "LT")]
    Extra,
    /// Annual leave (CT).
    #[serde(rename = "CT")]
    Annual,
}

/// The single value occupying a (date, person) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot {
    Shift(Shift),
    Leave(Leave),
}

impl Shift {
    /// Shifts in fill priority order (P, S, M).
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Night];

    /// Short code used on the wire and in sheets.
    pub fn code(self) -> &'static str {
        match self {
            Shift::Morning => "P",
            Shift::Afternoon => "S",
            Shift::Night => "M",
        }
    }

    /// Whether `next` may be worked on the day after `self`.
    ///
    /// Night is followed only by Night; Afternoon by Afternoon or Night;
    /// Morning by anything.
    pub fn allows_next(self, next: Shift) -> bool {
        match self {
            Shift::Night => next == Shift::Night,
            Shift::Afternoon => matches!(next, Shift::Afternoon | Shift::Night),
            Shift::Morning => true,
        }
    }
}

impl Leave {
    /// Leave categories in placement order (L, LT, CT).
    pub const ALL: [Leave; 3] = [Leave::Regular, Leave::Extra, Leave::Annual];

    /// Short code used in sheets.
    pub fn code(self) -> &'static str {
        match self {
            Leave::Regular => "L",
            Leave::Extra => "LT",
            Leave::Annual => "CT",
        }
    }

    /// Extra and annual leave are pre-booked and never overwritten.
    #[inline]
    pub fn is_protected(self) -> bool {
        matches!(self, Leave::Extra | Leave::Annual)
    }
}

impl Slot {
    /// Regular leave, the slot written for mandatory rest.
    pub const REST: Slot = Slot::Leave(Leave::Regular);

    /// Returns the shift if this slot is a shift category.
    #[inline]
    pub fn shift(self) -> Option<Shift> {
        match self {
            Slot::Shift(s) => Some(s),
            Slot::Leave(_) => None,
        }
    }

    /// Returns the leave if this slot is a leave category.
    #[inline]
    pub fn leave(self) -> Option<Leave> {
        match self {
            Slot::Leave(l) => Some(l),
            Slot::Shift(_) => None,
        }
    }

    #[inline]
    pub fn is_shift(self) -> bool {
        matches!(self, Slot::Shift(_))
    }

    #[inline]
    pub fn is_night(self) -> bool {
        self == Slot::Shift(Shift::Night)
    }

    pub fn code(self) -> &'static str {
        match self {
            Slot::Shift(s) => s.code(),
            Slot::Leave(l) => l.code(),
        }
    }
}

impl From<Shift> for Slot {
    fn from(shift: Shift) -> Self {
        Slot::Shift(shift)
    }
}

impl From<Leave> for Slot {
    fn from(leave: Leave) -> Self {
        Slot::Leave(leave)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for Leave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_rules() {
        assert!(Shift::Night.allows_next(Shift::Night));
        assert!(!Shift::Night.allows_next(Shift::Morning));
        assert!(!Shift::Night.allows_next(Shift::Afternoon));

        assert!(Shift::Afternoon.allows_next(Shift::Afternoon));
        assert!(Shift::Afternoon.allows_next(Shift::Night));
        assert!(!Shift::Afternoon.allows_next(Shift::Morning));

        for next in Shift::ALL {
            assert!(Shift::Morning.allows_next(next));
        }
    }

    #[test]
    fn test_slot_accessors() {
        let night = Slot::from(Shift::Night);
        assert!(night.is_shift());
        assert!(night.is_night());
        assert_eq!(night.shift(), Some(Shift::Night));
        assert_eq!(night.leave(), None);

        let annual = Slot::from(Leave::Annual);
        assert!(!annual.is_shift());
        assert_eq!(annual.leave(), Some(Leave::Annual));
        assert!(Leave::Annual.is_protected());
        assert!(!Leave::Regular.is_protected());
    }

    #[test]
    fn test_codes() {
        let codes: Vec<&str> = Shift::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, vec!["P", "S", "M"]);
        let codes: Vec<&str> = Leave::ALL.iter().map(|l| l.code()).collect();
        assert_eq!(codes, vec!["L", "LT", "CT"]);
        assert_eq!(Slot::REST.to_string(), "L");
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(serde_json::to_string(&Shift::Afternoon).unwrap(), "\"S\"");
        let slot: Slot = serde_json::from_str("\"CT\"").unwrap();
        assert_eq!(slot, Slot::Leave(Leave::Annual));
    }
}
