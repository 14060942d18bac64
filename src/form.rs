use std::sync::OnceLock;

use log::{debug, info};
use regex::Regex;
use serde::Serialize;

use crate::consts::{DEFAULT_ADULTS, DEFAULT_CHILDREN, EMAIL_PATTERN};
use crate::picker::{DateField, PointerWatch};
use crate::prelude::*;
use crate::CalendarDate;

/// Accommodation options offered by the site, in display order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize)]
pub enum Accommodation {
    #[default]
    #[display(fmt = "Stanová louka")]
    #[serde(rename = "Stanová louka")]
    TentMeadow,
    #[display(fmt = "Karavan + přípojka")]
    #[serde(rename = "Karavan + přípojka")]
    CaravanPitch,
    #[display(fmt = "Chata standard")]
    #[serde(rename = "Chata standard")]
    CabinStandard,
    #[display(fmt = "Chata LUX (WC)")]
    #[serde(rename = "Chata LUX (WC)")]
    CabinLux,
}

impl Accommodation {
    /// All options in the order the site lists them
    pub const ALL: [Self; 4] = [
        Self::TentMeadow,
        Self::CaravanPitch,
        Self::CabinStandard,
        Self::CabinLux,
    ];
}

/// A rejected submission. Each variant carries the exact message shown in
/// the form's error banner; the derived order is the order the rules run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Vyberte prosím datum příjezdu.")]
    MissingArrival,

    #[error("Vyberte prosím datum odjezdu.")]
    MissingDeparture,

    #[error("Vyplňte prosím jméno a příjmení.")]
    MissingName,

    #[error("Vyplňte prosím e-mailovou adresu.")]
    MissingEmail,

    #[error("Zadejte platnou e-mailovou adresu (např. jmeno@email.cz).")]
    InvalidEmail,

    #[error("Datum příjezdu není ve správném formátu.")]
    ArrivalFormat,

    #[error("Datum odjezdu není ve správném formátu.")]
    DepartureFormat,

    #[error("Datum odjezdu musí být po datu příjezdu.")]
    DepartureNotAfterArrival,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

/// Form values captured at submission time. Lives for a single attempt:
/// validated, handed to the sink on success, discarded afterwards. The
/// serialized field names match the site's form controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationDraft {
    #[serde(rename = "checkin")]
    pub arrival: String,
    #[serde(rename = "checkout")]
    pub departure: String,
    #[serde(rename = "type")]
    pub accommodation: Accommodation,
    pub adults: u8,
    pub children: u8,
    pub name: String,
    pub email: String,
    pub note: String,
}

impl Default for ReservationDraft {
    fn default() -> Self {
        Self {
            arrival: String::new(),
            departure: String::new(),
            accommodation: Accommodation::default(),
            adults: DEFAULT_ADULTS,
            children: DEFAULT_CHILDREN,
            name: String::new(),
            email: String::new(),
            note: String::new(),
        }
    }
}

impl ReservationDraft {
    /// Validates the draft, first failure wins. The rule order is a
    /// behavioral contract: it decides which single message the visitor
    /// sees when several fields are wrong at once.
    ///
    /// # Errors
    /// Returns the `ValidationError` for the first rule the draft violates.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.arrival.trim().is_empty() {
            return Err(ValidationError::MissingArrival);
        }
        if self.departure.trim().is_empty() {
            return Err(ValidationError::MissingDeparture);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !email_regex().is_match(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }

        let arrival =
            CalendarDate::parse_text(&self.arrival).ok_or(ValidationError::ArrivalFormat)?;
        let departure =
            CalendarDate::parse_text(&self.departure).ok_or(ValidationError::DepartureFormat)?;

        if departure <= arrival {
            return Err(ValidationError::DepartureNotAfterArrival);
        }

        Ok(())
    }
}

/// Receiver for accepted drafts: the collaborator that would forward them
/// to a reservation backend.
pub trait SubmissionSink {
    fn accept(&mut self, draft: &ReservationDraft);
}

/// Placeholder sink: logs the accepted draft and sends it nowhere
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn accept(&mut self, draft: &ReservationDraft) {
        info!("reservation inquiry accepted: {draft:?}");
    }
}

/// Which of the form's two date fields an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRole {
    Arrival,
    Departure,
}

/// Banner shown above the form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Persistent until the next submission attempt
    Error(ValidationError),
    /// Transient; the host schedules a `SUCCESS_DISPLAY` timer that closes
    /// the form through [`ReservationForm::dismiss_elapsed`]
    Success,
}

/// Token handed out when a submission is accepted. The host schedules the
/// success-display timer and passes the token back when it fires; manual
/// close and reopen invalidate outstanding tokens, so a late timer can
/// never act on a form it no longer owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DismissHandle(u64);

/// The reservation inquiry form: two date fields, contact fields, and the
/// open/notice state machine. Visibility is driven from outside (the
/// parent opens the form and relays close requests) while the form owns
/// everything that happens between.
#[derive(Debug)]
pub struct ReservationForm {
    open: bool,
    arrival: DateField,
    departure: DateField,
    accommodation: Accommodation,
    adults: u8,
    children: u8,
    name: String,
    email: String,
    note: String,
    notice: Option<Notice>,
    pending_dismiss: Option<u64>,
    generation: u64,
}

impl ReservationForm {
    /// A closed form. `today` seeds the date fields until the next `open`.
    pub fn new(today: CalendarDate) -> Self {
        Self {
            open: false,
            arrival: DateField::with_min(today, today),
            departure: DateField::with_min(today, today),
            accommodation: Accommodation::default(),
            adults: DEFAULT_ADULTS,
            children: DEFAULT_CHILDREN,
            name: String::new(),
            email: String::new(),
            note: String::new(),
            notice: None,
            pending_dismiss: None,
            generation: 0,
        }
    }

    /// Whether the form is currently shown
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the current banner, if any
    pub const fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Read access to a date field
    pub const fn date_field(&self, role: DateRole) -> &DateField {
        match role {
            DateRole::Arrival => &self.arrival,
            DateRole::Departure => &self.departure,
        }
    }

    fn date_field_mut(&mut self, role: DateRole) -> &mut DateField {
        match role {
            DateRole::Arrival => &mut self.arrival,
            DateRole::Departure => &mut self.departure,
        }
    }

    /// Opens the form with every field reset to its default: empty dates
    /// showing `today`'s month, arrival selectable from `today`, two
    /// adults, no children, the first accommodation option, empty contact
    /// fields, no banner. Call only on a closed form.
    pub fn open(&mut self, today: CalendarDate) {
        debug_assert!(!self.open);
        self.arrival = DateField::with_min(today, today);
        self.departure = DateField::with_min(today, today);
        self.accommodation = Accommodation::default();
        self.adults = DEFAULT_ADULTS;
        self.children = DEFAULT_CHILDREN;
        self.name.clear();
        self.email.clear();
        self.note.clear();
        self.notice = None;
        self.pending_dismiss = None;
        self.open = true;
        debug!("reservation form opened");
    }

    /// Manual close (close button or backdrop click). Cancels any pending
    /// auto-dismiss and releases open calendar watches.
    pub fn close(&mut self, host: &mut impl PointerWatch) {
        self.arrival.close_calendar(host);
        self.departure.close_calendar(host);
        self.notice = None;
        self.pending_dismiss = None;
        self.open = false;
        debug!("reservation form closed");
    }

    /// Keystrokes into a date field. An arrival edit recomputes the
    /// departure minimum.
    pub fn date_input(&mut self, role: DateRole, raw: &str, today: CalendarDate) {
        self.date_field_mut(role).input(raw);
        if role == DateRole::Arrival {
            self.refresh_departure_min(today);
        }
    }

    /// Day-cell click in a field's dropdown. An arrival selection
    /// recomputes the departure minimum.
    pub fn select_day(
        &mut self,
        role: DateRole,
        date: CalendarDate,
        today: CalendarDate,
        host: &mut impl PointerWatch,
    ) {
        self.date_field_mut(role).select_day(date, host);
        if role == DateRole::Arrival {
            self.refresh_departure_min(today);
        }
    }

    /// Opens a field's dropdown (input focus)
    pub fn open_calendar(&mut self, role: DateRole, host: &mut impl PointerWatch) {
        self.date_field_mut(role).open_calendar(host);
    }

    /// Calendar-button toggle on a field
    pub fn toggle_calendar(&mut self, role: DateRole, host: &mut impl PointerWatch) {
        self.date_field_mut(role).toggle_calendar(host);
    }

    /// Pointer-down outside a field's region
    pub fn outside_pointer_down(&mut self, role: DateRole, host: &mut impl PointerWatch) {
        self.date_field_mut(role).outside_pointer_down(host);
    }

    /// Month navigation in a field's dropdown
    pub fn navigate(&mut self, role: DateRole, delta: i32) {
        self.date_field_mut(role).navigate(delta);
    }

    // The departure minimum tracks the arrival value: the day after a
    // parseable arrival, `today` otherwise.
    fn refresh_departure_min(&mut self, today: CalendarDate) {
        let min = self.arrival.parsed().map_or(today, CalendarDate::next_day);
        self.departure.set_min(min);
    }

    pub fn set_accommodation(&mut self, accommodation: Accommodation) {
        self.accommodation = accommodation;
    }

    pub fn set_adults(&mut self, adults: u8) {
        self.adults = adults;
    }

    pub fn set_children(&mut self, children: u8) {
        self.children = children;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Snapshot of the current field values
    pub fn draft(&self) -> ReservationDraft {
        ReservationDraft {
            arrival: self.arrival.text().to_owned(),
            departure: self.departure.text().to_owned(),
            accommodation: self.accommodation,
            adults: self.adults,
            children: self.children,
            name: self.name.clone(),
            email: self.email.clone(),
            note: self.note.clone(),
        }
    }

    /// Submission attempt. The draft is validated synchronously; the new
    /// outcome supersedes whatever banner was showing, and any outstanding
    /// dismiss token is invalidated either way.
    ///
    /// On acceptance the draft goes to `sink` and the returned handle is
    /// the host's cue to schedule the `SUCCESS_DISPLAY` timer.
    ///
    /// # Errors
    /// Returns the first violated validation rule; the same value is
    /// available as `Notice::Error` until the next attempt.
    pub fn submit(
        &mut self,
        sink: &mut impl SubmissionSink,
    ) -> Result<DismissHandle, ValidationError> {
        debug_assert!(self.open);
        self.pending_dismiss = None;

        let draft = self.draft();
        match draft.validate() {
            Err(err) => {
                debug!("reservation inquiry rejected: {err}");
                self.notice = Some(Notice::Error(err));
                Err(err)
            }
            Ok(()) => {
                sink.accept(&draft);
                self.generation += 1;
                self.pending_dismiss = Some(self.generation);
                self.notice = Some(Notice::Success);
                Ok(DismissHandle(self.generation))
            }
        }
    }

    /// The success-display timer fired. Acts only if `handle` is still the
    /// live token: clears the banner and closes the form. Stale tokens
    /// (manual close or reopen happened in between) are ignored.
    pub fn dismiss_elapsed(&mut self, handle: DismissHandle, host: &mut impl PointerWatch) {
        if self.pending_dismiss == Some(handle.0) {
            self.close(host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::WatchId;
    use crate::DateRole::{Arrival, Departure};

    fn date(year: i32, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).unwrap()
    }

    fn today() -> CalendarDate {
        date(2025, 6, 10)
    }

    #[derive(Debug, Default)]
    struct MockHost {
        next: u64,
        active: Vec<WatchId>,
    }

    impl PointerWatch for MockHost {
        fn watch(&mut self) -> WatchId {
            self.next += 1;
            let id = WatchId::new(self.next);
            self.active.push(id);
            id
        }

        fn unwatch(&mut self, id: WatchId) {
            self.active.retain(|w| *w != id);
        }
    }

    #[derive(Debug, Default)]
    struct RecordingSink {
        accepted: Vec<ReservationDraft>,
    }

    impl SubmissionSink for RecordingSink {
        fn accept(&mut self, draft: &ReservationDraft) {
            self.accepted.push(draft.clone());
        }
    }

    fn valid_draft() -> ReservationDraft {
        ReservationDraft {
            arrival: "01.07.2025".to_owned(),
            departure: "05.07.2025".to_owned(),
            name: "Jan Novák".to_owned(),
            email: "jan@example.cz".to_owned(),
            ..ReservationDraft::default()
        }
    }

    fn open_valid_form() -> ReservationForm {
        let mut form = ReservationForm::new(today());
        form.open(today());
        form.date_input(Arrival, "01.07.2025", today());
        form.date_input(Departure, "05.07.2025", today());
        form.set_name("Jan Novák");
        form.set_email("jan@example.cz");
        form
    }

    #[test]
    fn test_validate_rule_order() {
        struct TestCase {
            mutate: fn(&mut ReservationDraft),
            expected: ValidationError,
            description: &'static str,
        }

        let cases = [
            TestCase {
                mutate: |d| {
                    d.arrival.clear();
                    d.departure.clear();
                    d.name.clear();
                    d.email.clear();
                },
                expected: ValidationError::MissingArrival,
                description: "everything empty reports the arrival date first",
            },
            TestCase {
                mutate: |d| {
                    d.departure.clear();
                    d.name.clear();
                },
                expected: ValidationError::MissingDeparture,
                description: "departure before name",
            },
            TestCase {
                mutate: |d| {
                    d.name.clear();
                    d.email.clear();
                },
                expected: ValidationError::MissingName,
                description: "dates present and well-formed, name fires next",
            },
            TestCase {
                mutate: |d| d.email.clear(),
                expected: ValidationError::MissingEmail,
                description: "email emptiness before email shape",
            },
            TestCase {
                mutate: |d| {
                    d.email = "not-an-email".to_owned();
                    d.arrival = "99.99".to_owned();
                },
                expected: ValidationError::InvalidEmail,
                description: "email shape before date formats",
            },
            TestCase {
                mutate: |d| {
                    d.arrival = "99.99".to_owned();
                    d.departure = "xx.06.2025".to_owned();
                },
                expected: ValidationError::ArrivalFormat,
                description: "arrival format before departure format",
            },
            TestCase {
                mutate: |d| d.departure = "xx.06.2025".to_owned(),
                expected: ValidationError::DepartureFormat,
                description: "departure format before date order",
            },
            TestCase {
                mutate: |d| {
                    d.arrival = "10.06.2025".to_owned();
                    d.departure = "09.06.2025".to_owned();
                },
                expected: ValidationError::DepartureNotAfterArrival,
                description: "order violation is a distinct error, not a format error",
            },
        ];

        for case in &cases {
            let mut draft = valid_draft();
            (case.mutate)(&mut draft);
            assert_eq!(
                draft.validate(),
                Err(case.expected),
                "{}",
                case.description
            );
        }
    }

    #[test]
    fn test_validate_accepts_valid_draft() {
        assert_eq!(valid_draft().validate(), Ok(()));
    }

    #[test]
    fn test_validate_whitespace_only_counts_as_empty() {
        let mut draft = valid_draft();
        draft.name = "   ".to_owned();
        assert_eq!(draft.validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_validate_email_shapes() {
        struct TestCase {
            email: &'static str,
            valid: bool,
        }

        let cases = [
            TestCase {
                email: "jan@example.cz",
                valid: true,
            },
            TestCase {
                email: "jan.novak@mail.example.cz",
                valid: true,
            },
            TestCase {
                email: "jan@example",
                valid: false,
            },
            TestCase {
                email: "jan@@example.cz",
                valid: false,
            },
            TestCase {
                email: "jan novak@example.cz",
                valid: false,
            },
            TestCase {
                email: " jan@example.cz",
                valid: false,
            },
        ];

        for case in &cases {
            let mut draft = valid_draft();
            draft.email = case.email.to_owned();
            let result = draft.validate();
            if case.valid {
                assert_eq!(result, Ok(()), "{:?} should pass", case.email);
            } else {
                assert_eq!(
                    result,
                    Err(ValidationError::InvalidEmail),
                    "{:?} should fail",
                    case.email
                );
            }
        }
    }

    #[test]
    fn test_validate_equal_dates_rejected() {
        let mut draft = valid_draft();
        draft.departure = draft.arrival.clone();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::DepartureNotAfterArrival)
        );
    }

    // "31.06.2025" resolves to July 1st, so it collides with a literal
    // "01.07.2025" departure: the comparison runs on resolved dates.
    #[test]
    fn test_validate_compares_resolved_dates() {
        let mut draft = valid_draft();
        draft.arrival = "31.06.2025".to_owned();
        draft.departure = "01.07.2025".to_owned();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::DepartureNotAfterArrival)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingArrival.to_string(),
            "Vyberte prosím datum příjezdu."
        );
        assert_eq!(
            ValidationError::DepartureNotAfterArrival.to_string(),
            "Datum odjezdu musí být po datu příjezdu."
        );
    }

    #[test]
    fn test_draft_serializes_with_form_field_names() {
        let json = serde_json::to_value(valid_draft()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "checkin", "checkout", "type", "adults", "children", "name", "email", "note",
        ] {
            assert!(obj.contains_key(key), "missing field {key}");
        }
        assert_eq!(json["type"], "Stanová louka");
        assert_eq!(json["adults"], 2);
    }

    #[test]
    fn test_open_resets_fields() {
        let mut host = MockHost::default();
        let mut form = open_valid_form();
        form.set_adults(5);
        form.set_note("Máme psa.");

        form.close(&mut host);
        form.open(today());

        let draft = form.draft();
        assert_eq!(draft, ReservationDraft::default());
        assert_eq!(form.notice(), None);
        assert_eq!(
            form.date_field(Arrival).min(),
            Some(today()),
            "arrival is selectable from today on"
        );
    }

    #[test]
    fn test_departure_min_tracks_arrival_edits() {
        let mut form = ReservationForm::new(today());
        form.open(today());

        form.date_input(Arrival, "10.06.2025", today());
        assert_eq!(form.date_field(Departure).min(), Some(date(2025, 6, 11)));

        // partial arrival text falls back to today
        form.date_input(Arrival, "10.06", today());
        assert_eq!(form.date_field(Departure).min(), Some(today()));
    }

    #[test]
    fn test_departure_min_tracks_arrival_selection() {
        let mut host = MockHost::default();
        let mut form = ReservationForm::new(today());
        form.open(today());

        form.open_calendar(Arrival, &mut host);
        form.select_day(Arrival, date(2025, 6, 20), today(), &mut host);

        assert_eq!(form.date_field(Arrival).text(), "20.06.2025");
        assert_eq!(form.date_field(Departure).min(), Some(date(2025, 6, 21)));
    }

    #[test]
    fn test_submit_success_flow() {
        let mut host = MockHost::default();
        let mut sink = RecordingSink::default();
        let mut form = open_valid_form();

        let handle = form.submit(&mut sink).unwrap();
        assert_eq!(form.notice(), Some(Notice::Success));
        assert_eq!(sink.accepted.len(), 1);
        assert_eq!(sink.accepted[0].arrival, "01.07.2025");

        form.dismiss_elapsed(handle, &mut host);
        assert!(!form.is_open());
        assert_eq!(form.notice(), None);
    }

    #[test]
    fn test_submit_failure_shows_persistent_error() {
        let mut sink = RecordingSink::default();
        let mut form = ReservationForm::new(today());
        form.open(today());

        let result = form.submit(&mut sink);
        assert_eq!(result, Err(ValidationError::MissingArrival));
        assert_eq!(
            form.notice(),
            Some(Notice::Error(ValidationError::MissingArrival))
        );
        assert!(form.is_open());
        assert!(sink.accepted.is_empty());
    }

    #[test]
    fn test_new_attempt_supersedes_previous_outcome() {
        let mut sink = RecordingSink::default();
        let mut form = open_valid_form();

        let _ = form.submit(&mut sink).unwrap();
        assert_eq!(form.notice(), Some(Notice::Success));

        form.set_email("broken");
        let result = form.submit(&mut sink);
        assert_eq!(result, Err(ValidationError::InvalidEmail));
        assert_eq!(
            form.notice(),
            Some(Notice::Error(ValidationError::InvalidEmail))
        );
    }

    #[test]
    fn test_manual_close_invalidates_dismiss_handle() {
        let mut host = MockHost::default();
        let mut sink = RecordingSink::default();
        let mut form = open_valid_form();

        let handle = form.submit(&mut sink).unwrap();
        form.close(&mut host);
        form.open(today());

        // late timer must not close the reopened form
        form.dismiss_elapsed(handle, &mut host);
        assert!(form.is_open());
    }

    #[test]
    fn test_error_attempt_invalidates_earlier_success_timer() {
        let mut host = MockHost::default();
        let mut sink = RecordingSink::default();
        let mut form = open_valid_form();

        let handle = form.submit(&mut sink).unwrap();

        form.set_email("broken");
        let _ = form.submit(&mut sink);

        form.dismiss_elapsed(handle, &mut host);
        assert!(
            form.is_open(),
            "the superseded success timer must not close the form"
        );
        assert_eq!(
            form.notice(),
            Some(Notice::Error(ValidationError::InvalidEmail))
        );
    }

    #[test]
    fn test_second_success_issues_fresh_handle() {
        let mut host = MockHost::default();
        let mut sink = RecordingSink::default();
        let mut form = open_valid_form();

        let first = form.submit(&mut sink).unwrap();
        let second = form.submit(&mut sink).unwrap();
        assert_ne!(first, second);

        form.dismiss_elapsed(first, &mut host);
        assert!(form.is_open(), "only the latest handle may dismiss");

        form.dismiss_elapsed(second, &mut host);
        assert!(!form.is_open());
    }

    #[test]
    fn test_close_releases_open_calendar_watches() {
        let mut host = MockHost::default();
        let mut form = ReservationForm::new(today());
        form.open(today());

        form.open_calendar(Arrival, &mut host);
        form.open_calendar(Departure, &mut host);
        assert_eq!(host.active.len(), 2);

        form.close(&mut host);
        assert!(host.active.is_empty());
    }

    #[test]
    fn test_outside_pointer_down_closes_only_that_dropdown() {
        let mut host = MockHost::default();
        let mut form = ReservationForm::new(today());
        form.open(today());

        form.open_calendar(Arrival, &mut host);
        form.open_calendar(Departure, &mut host);
        form.outside_pointer_down(Arrival, &mut host);

        assert!(!form.date_field(Arrival).is_open());
        assert!(form.date_field(Departure).is_open());
        assert_eq!(host.active.len(), 1);
    }

    #[test]
    fn test_accommodation_defaults_and_labels() {
        assert_eq!(Accommodation::default(), Accommodation::ALL[0]);
        assert_eq!(Accommodation::TentMeadow.to_string(), "Stanová louka");
        assert_eq!(Accommodation::CabinLux.to_string(), "Chata LUX (WC)");
    }
}
