//! Spreadsheet-shaped export.
//!
//! Lays a [`PublicSchedule`] out as a person × day sheet. Each cell shows
//! the person's shift code if they are on a shift list that day, else the
//! code of their pre-booked leave (L, then LT, then CT), else nothing.
//!
//! Sheet layout:
//!
//! | Row | Content |
//! |-----|---------|
//! | 1 | `NO`, `NAMA`, day numbers |
//! | 2 | blank, blank, weekday abbreviations |
//! | … | `shift` personnel, numbered from 1 |
//! | … | `NON SHIFT` separator (only if there are `non_shift` personnel) |
//! | … | `non_shift` personnel, unnumbered, `P` or blank |
//!
//! Rendering to an actual workbook is left to the caller; [`RosterSheet::to_rows`]
//! gives the array-of-rows form spreadsheet writers consume.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Month, Person, PublicSchedule, Role, Shift};

/// Label of the row separating `non_shift` personnel.
pub const NON_SHIFT_LABEL: &str = "NON SHIFT";

/// Code shown for a person on a date, if any.
pub fn cell_code(
    schedule: &PublicSchedule,
    person: &Person,
    date: NaiveDate,
) -> Option<&'static str> {
    if let Some(shift) = schedule.shift_of(date, person.id) {
        return Some(shift.code());
    }
    person.booked_leave_on(date.day()).map(|leave| leave.code())
}

/// One person (or separator) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    /// Running number; `None` for `non_shift` rows and the separator.
    pub number: Option<usize>,
    pub name: String,
    /// One cell per day of the month.
    pub cells: Vec<String>,
}

/// A month's roster laid out for a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterSheet {
    /// Suggested workbook file name, e.g. `Schedule_2025_09.xlsx`.
    pub file_name: String,
    pub day_numbers: Vec<u32>,
    /// `Mon`, `Tue`, …
    pub weekdays: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl RosterSheet {
    /// Builds the sheet for `month`.
    pub fn build(month: Month, schedule: &PublicSchedule, people: &[Person]) -> Self {
        let dates: Vec<NaiveDate> = month.dates().collect();
        let mut rows = Vec::with_capacity(people.len() + 1);

        let shift_staff = people.iter().filter(|p| p.role == Role::Shift);
        for (index, person) in shift_staff.enumerate() {
            rows.push(SheetRow {
                number: Some(index + 1),
                name: person.name.clone(),
                cells: dates
                    .iter()
                    .map(|&date| {
                        cell_code(schedule, person, date)
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect(),
            });
        }

        let non_shift: Vec<&Person> = people.iter().filter(|p| p.role == Role::NonShift).collect();
        if !non_shift.is_empty() {
            rows.push(SheetRow {
                number: None,
                name: NON_SHIFT_LABEL.to_string(),
                cells: vec![String::new(); dates.len()],
            });
            for person in non_shift {
                rows.push(SheetRow {
                    number: None,
                    name: person.name.clone(),
                    cells: dates
                        .iter()
                        .map(|&date| {
                            let on_morning = schedule
                                .get(date)
                                .is_some_and(|day| day.get(Shift::Morning).contains(&person.id));
                            if on_morning {
                                Shift::Morning.code().to_string()
                            } else {
                                String::new()
                            }
                        })
                        .collect(),
                });
            }
        }

        Self {
            file_name: format!("Schedule_{}_{:02}.xlsx", month.year(), month.month()),
            day_numbers: dates.iter().map(|d| d.day()).collect(),
            weekdays: dates.iter().map(|d| d.format("%a").to_string()).collect(),
            rows,
        }
    }

    /// Whole sheet as rows of strings, header rows included.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut header = vec!["NO".to_string(), "NAMA".to_string()];
        header.extend(self.day_numbers.iter().map(u32::to_string));
        let mut weekday_row = vec![String::new(), String::new()];
        weekday_row.extend(self.weekdays.iter().cloned());

        let mut out = vec![header, weekday_row];
        for row in &self.rows {
            let mut line = vec![
                row.number.map(|n| n.to_string()).unwrap_or_default(),
                row.name.clone(),
            ];
            line.extend(row.cells.iter().cloned());
            out.push(line);
        }
        out
    }
}
