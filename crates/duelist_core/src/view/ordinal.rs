//! Human-readable due date labels such as `21st January`.

use chrono::Datelike;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English ordinal suffix for a day of month.
///
/// 11, 12 and 13 take `th` even though they end in 1, 2 and 3.
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Formats a date as `<day><suffix> <Month>`.
pub fn format_ordinal_date<D: Datelike>(date: &D) -> String {
    let day = date.day();
    // month0() is always 0..=11.
    let month = MONTH_NAMES[date.month0() as usize];
    format!("{day}{} {month}", ordinal_suffix(day))
}
