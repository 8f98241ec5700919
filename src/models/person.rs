//! Personnel model.
//!
//! A person is the entity rostered onto shifts. Each person carries a
//! role and the day numbers (1..=31) of their pre-booked leave.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Leave;

/// Stable numeric personnel identifier.
pub type PersonId = u32;

/// Personnel role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May work any shift on any day.
    Shift,
    /// May work only the Morning shift, and only on regular weekdays.
    NonShift,
}

/// A member of staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier.
    pub id: PersonId,
    /// Display name.
    pub name: String,
    /// Role restricting which shifts may be assigned.
    pub role: Role,
    /// Days of requested regular leave (L).
    #[serde(default)]
    pub requested_leaves: BTreeSet<u32>,
    /// Days of extra leave (LT).
    #[serde(default)]
    pub extra_leaves: BTreeSet<u32>,
    /// Days of annual leave (CT).
    #[serde(default)]
    pub annual_leaves: BTreeSet<u32>,
}

impl Person {
    /// Creates a person with no leave requests.
    pub fn new(id: PersonId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            requested_leaves: BTreeSet::new(),
            extra_leaves: BTreeSet::new(),
            annual_leaves: BTreeSet::new(),
        }
    }

    /// Creates a `shift`-role person.
    pub fn shift(id: PersonId, name: impl Into<String>) -> Self {
        Self::new(id, name, Role::Shift)
    }

    /// Creates a `non_shift`-role person.
    pub fn non_shift(id: PersonId, name: impl Into<String>) -> Self {
        Self::new(id, name, Role::NonShift)
    }

    /// Adds requested regular leave days.
    pub fn with_requested_leaves(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.requested_leaves.extend(days);
        self
    }

    /// Adds extra leave days.
    pub fn with_extra_leaves(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.extra_leaves.extend(days);
        self
    }

    /// Adds annual leave days.
    pub fn with_annual_leaves(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.annual_leaves.extend(days);
        self
    }

    #[inline]
    pub fn is_shift_role(&self) -> bool {
        self.role == Role::Shift
    }

    /// Day set for a leave category.
    pub fn leave_days(&self, leave: Leave) -> &BTreeSet<u32> {
        match leave {
            Leave::Regular => &self.requested_leaves,
            Leave::Extra => &self.extra_leaves,
            Leave::Annual => &self.annual_leaves,
        }
    }

    /// Pre-booked leave for a day, checked in L, LT, CT order.
    pub fn booked_leave_on(&self, day: u32) -> Option<Leave> {
        Leave::ALL
            .into_iter()
            .find(|&leave| self.leave_days(leave).contains(&day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_builder() {
        let p = Person::shift(1, "Andi")
            .with_requested_leaves([5])
            .with_extra_leaves([6, 7])
            .with_annual_leaves([29]);

        assert_eq!(p.id, 1);
        assert_eq!(p.name, "Andi");
        assert!(p.is_shift_role());
        assert!(p.requested_leaves.contains(&5));
        assert_eq!(p.extra_leaves.len(), 2);
        assert!(p.annual_leaves.contains(&29));
    }

    #[test]
    fn test_booked_leave_precedence() {
        let p = Person::shift(1, "A")
            .with_requested_leaves([3])
            .with_extra_leaves([3, 4])
            .with_annual_leaves([4, 5]);

        assert_eq!(p.booked_leave_on(3), Some(Leave::Regular));
        assert_eq!(p.booked_leave_on(4), Some(Leave::Extra));
        assert_eq!(p.booked_leave_on(5), Some(Leave::Annual));
        assert_eq!(p.booked_leave_on(6), None);
    }

    #[test]
    fn test_role_serde() {
        let json = r#"{"id":10,"name":"Fani","role":"non_shift","requested_leaves":[1,2]}"#;
        let p: Person = serde_json::from_str(json).unwrap();
        assert_eq!(p.role, Role::NonShift);
        assert!(!p.is_shift_role());
        assert!(p.extra_leaves.is_empty());
        assert_eq!(p.requested_leaves.len(), 2);
    }
}
