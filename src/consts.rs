use std::time::Duration;

/// Maximum valid year (inclusive)
pub const MAX_YEAR: i32 = 9999;

/// Minimum valid year (inclusive)
pub const MIN_YEAR: i32 = 1;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Date component separator (day.month.year field format)
pub const DATE_SEPARATOR: char = '.';

/// Input length at which the sanitizer appends a separator after the day
pub const AUTO_DOT_AFTER_DAY: usize = 2;
/// Input length at which the sanitizer appends a separator after the month
pub const AUTO_DOT_AFTER_MONTH: usize = 5;

/// Length cap for the date input field ("DD.MM.YYYY")
pub const DATE_INPUT_MAX_LEN: usize = 10;

/// Placeholder shown in empty date inputs
pub const DATE_PLACEHOLDER: &str = "dd.mm.rrrr";

/// Month display names (index 0 is unused, months are 1-indexed)
pub const MONTH_NAMES: [&str; 13] = [
    "",
    "Leden",
    "Únor",
    "Březen",
    "Duben",
    "Květen",
    "Červen",
    "Červenec",
    "Srpen",
    "Září",
    "Říjen",
    "Listopad",
    "Prosinec",
];

/// Weekday column headers, Monday first
pub const DAY_NAMES_SHORT: [&str; 7] = ["Po", "Út", "St", "Čt", "Pá", "So", "Ne"];

/// Default adult count when the form opens
pub const DEFAULT_ADULTS: u8 = 2;
/// Default child count when the form opens
pub const DEFAULT_CHILDREN: u8 = 0;

/// How long the submission acknowledgment stays on screen before the
/// form auto-closes
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

/// Accepted email shape: local part, '@', domain, '.', tld, where each
/// part is a run of non-whitespace, non-'@' characters
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
