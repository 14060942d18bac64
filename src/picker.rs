use crate::consts::{
    AUTO_DOT_AFTER_DAY, AUTO_DOT_AFTER_MONTH, DATE_INPUT_MAX_LEN, DATE_SEPARATOR, DAY_NAMES_SHORT,
};
use crate::types::YearMonth;
use crate::CalendarDate;

/// Opaque token identifying one outside-pointer watch registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

impl WatchId {
    /// Creates a token. Minted by `PointerWatch` implementations.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw token value
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Dismiss-on-outside-click capability a hosting environment lends to a
/// picker. A field holds a watch only while its dropdown is open, so any
/// number of pickers can coexist without a process-wide pointer listener
/// and without leaking registrations.
pub trait PointerWatch {
    /// Start delivering pointer-down events that land outside the caller's
    /// region. Returns the token that identifies this registration.
    fn watch(&mut self) -> WatchId;

    /// Stop delivering events for `id`.
    fn unwatch(&mut self, id: WatchId);
}

/// Cleans up raw keystrokes toward the "DD.MM.YYYY" shape: everything that
/// is not a digit or a dot is stripped, the result is capped at the field
/// length, and a dot is appended after a bare day segment (2 chars, no dot
/// yet) or a bare day.month segment (5 chars, one dot). A typing aid only;
/// the output is not guaranteed to parse.
pub fn sanitize_input(raw: &str) -> String {
    let mut val: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == DATE_SEPARATOR)
        .collect();
    val.truncate(DATE_INPUT_MAX_LEN);

    if val.len() == AUTO_DOT_AFTER_DAY && !val.contains(DATE_SEPARATOR) {
        val.push(DATE_SEPARATOR);
    } else if val.len() == AUTO_DOT_AFTER_MONTH
        && val.matches(DATE_SEPARATOR).count() == 1
    {
        val.push(DATE_SEPARATOR);
    }
    val
}

/// One cell of a rendered month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    /// Blank slot aligning the 1st of the month to its weekday column
    Padding,
    /// An actual day of the month
    Day {
        date: CalendarDate,
        is_today: bool,
        is_selected: bool,
        is_disabled: bool,
    },
}

/// A month laid out for display: leading padding cells (Monday-first week)
/// followed by one cell per day.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    month: YearMonth,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Returns the month this grid displays
    pub const fn month(&self) -> YearMonth {
        self.month
    }

    /// Returns the cells, padding first
    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// Header line, e.g. "Červen 2025"
    pub fn title(&self) -> String {
        self.month.to_string()
    }

    /// Weekday column headers, Monday first
    pub const fn day_names() -> [&'static str; 7] {
        DAY_NAMES_SHORT
    }
}

/// Lays out `month` as a grid of day cells. `selected` marks the cell the
/// current field value falls on, `min` disables every earlier day, `today`
/// marks the current date; all comparisons are whole-day.
pub fn month_grid(
    month: YearMonth,
    selected: Option<CalendarDate>,
    min: Option<CalendarDate>,
    today: CalendarDate,
) -> MonthGrid {
    let padding = month.first_day().weekday().days_from_monday();
    let mut cells = Vec::with_capacity(usize::from(padding) + usize::from(month.days()));

    for _ in 0..padding {
        cells.push(DayCell::Padding);
    }
    for day in 1..=month.days() {
        let date = CalendarDate::from_parts(month.year(), month.month(), day);
        cells.push(DayCell::Day {
            date,
            is_today: date == today,
            is_selected: selected == Some(date),
            is_disabled: min.is_some_and(|m| date < m),
        });
    }

    MonthGrid { month, cells }
}

/// One date input paired with its dropdown calendar.
///
/// The stored text is authoritative; the parsed date is always derived from
/// it on demand. The visible month starts at `today`'s month and is moved
/// only by explicit navigation; selecting a day leaves it alone.
#[derive(Debug)]
pub struct DateField {
    text: String,
    visible_month: YearMonth,
    min: Option<CalendarDate>,
    open: bool,
    watch: Option<WatchId>,
}

impl DateField {
    /// A fresh field: empty text, dropdown closed, calendar showing
    /// `today`'s month, no minimum date.
    pub fn new(today: CalendarDate) -> Self {
        Self {
            text: String::new(),
            visible_month: today.year_month(),
            min: None,
            open: false,
            watch: None,
        }
    }

    /// A fresh field that disables every day before `min`
    pub fn with_min(today: CalendarDate, min: CalendarDate) -> Self {
        Self {
            min: Some(min),
            ..Self::new(today)
        }
    }

    /// Returns the current (possibly incomplete) field text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The field text as a date, if it currently parses
    pub fn parsed(&self) -> Option<CalendarDate> {
        CalendarDate::parse_text(&self.text)
    }

    /// Returns the month the dropdown displays
    pub const fn visible_month(&self) -> YearMonth {
        self.visible_month
    }

    /// Returns the minimum selectable date, if any
    pub const fn min(&self) -> Option<CalendarDate> {
        self.min
    }

    /// Replaces the minimum selectable date
    pub fn set_min(&mut self, min: CalendarDate) {
        self.min = Some(min);
    }

    /// Whether the dropdown calendar is showing
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Raw keystroke text from the input; stored sanitized
    pub fn input(&mut self, raw: &str) {
        self.text = sanitize_input(raw);
    }

    /// Opens the dropdown (input focus or calendar button) and acquires an
    /// outside-pointer watch from the host
    pub fn open_calendar(&mut self, host: &mut impl PointerWatch) {
        if !self.open {
            self.open = true;
            self.watch = Some(host.watch());
        }
    }

    /// Calendar-button toggle
    pub fn toggle_calendar(&mut self, host: &mut impl PointerWatch) {
        if self.open {
            self.close_calendar(host);
        } else {
            self.open_calendar(host);
        }
    }

    /// Closes the dropdown and releases the watch
    pub fn close_calendar(&mut self, host: &mut impl PointerWatch) {
        if let Some(id) = self.watch.take() {
            host.unwatch(id);
        }
        self.open = false;
    }

    /// Host callback for a pointer-down outside the field's region, the
    /// only implicit close trigger
    pub fn outside_pointer_down(&mut self, host: &mut impl PointerWatch) {
        self.close_calendar(host);
    }

    /// Moves the visible month by `delta` months
    pub fn navigate(&mut self, delta: i32) {
        self.visible_month = self.visible_month.shift(delta);
    }

    /// Day-cell click. Ignored while the dropdown is closed and for
    /// disabled days (before the minimum); otherwise the field text becomes
    /// the formatted date and the dropdown closes. The visible month is not
    /// re-anchored to the selection.
    pub fn select_day(&mut self, date: CalendarDate, host: &mut impl PointerWatch) {
        if !self.open {
            return;
        }
        if self.min.is_some_and(|m| date < m) {
            return;
        }
        self.text = date.to_string();
        self.close_calendar(host);
    }

    /// Grid for the currently visible month
    pub fn grid(&self, today: CalendarDate) -> MonthGrid {
        month_grid(self.visible_month, self.parsed(), self.min, today)
    }
}
