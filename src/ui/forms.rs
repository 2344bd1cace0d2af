use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Reservation, ReservationFields};

/// The six entry fields shared by the booking and edit screens, in the order
/// they are rendered and traversed with Tab.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum FormField {
    #[default]
    Name,
    FlightNumber,
    Departure,
    Destination,
    Date,
    SeatNumber,
}

/// Render/traversal order of the form. Validation walks the same order so the
/// first empty field is always the topmost one on screen.
pub(crate) const FIELD_ORDER: [FormField; 6] = [
    FormField::Name,
    FormField::FlightNumber,
    FormField::Departure,
    FormField::Destination,
    FormField::Date,
    FormField::SeatNumber,
];

impl FormField {
    /// Label shown next to the entry and named in validation errors.
    pub(crate) fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::FlightNumber => "Flight Number",
            FormField::Departure => "Departure",
            FormField::Destination => "Destination",
            FormField::Date => "Date",
            FormField::SeatNumber => "Seat Number",
        }
    }

    /// Grayed-out hint rendered while the field is empty.
    pub(crate) fn placeholder(self) -> &'static str {
        match self {
            FormField::Name => "Passenger full name",
            FormField::FlightNumber => "e.g., AA1234",
            FormField::Departure => "Departure city",
            FormField::Destination => "Destination city",
            FormField::Date => "YYYY-MM-DD format",
            FormField::SeatNumber => "e.g., 12A",
        }
    }
}

/// Form state backing both the booking and edit screens: the raw entry text
/// per field, which field currently has focus, and the last validation error.
#[derive(Default, Clone)]
pub(crate) struct ReservationForm {
    pub(crate) name: String,
    pub(crate) flight_number: String,
    pub(crate) departure: String,
    pub(crate) destination: String,
    pub(crate) date: String,
    pub(crate) seat_number: String,
    pub(crate) active: FormField,
    pub(crate) error: Option<String>,
}

impl ReservationForm {
    /// Populate the form from an existing reservation when entering edit mode.
    pub(crate) fn from_reservation(reservation: &Reservation) -> Self {
        Self {
            name: reservation.fields.name.clone(),
            flight_number: reservation.fields.flight_number.clone(),
            departure: reservation.fields.departure.clone(),
            destination: reservation.fields.destination.clone(),
            date: reservation.fields.date.clone(),
            seat_number: reservation.fields.seat_number.clone(),
            active: FormField::Name,
            error: None,
        }
    }

    fn value(&self, field: FormField) -> &String {
        match field {
            FormField::Name => &self.name,
            FormField::FlightNumber => &self.flight_number,
            FormField::Departure => &self.departure,
            FormField::Destination => &self.destination,
            FormField::Date => &self.date,
            FormField::SeatNumber => &self.seat_number,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::FlightNumber => &mut self.flight_number,
            FormField::Departure => &mut self.departure,
            FormField::Destination => &mut self.destination,
            FormField::Date => &mut self.date,
            FormField::SeatNumber => &mut self.seat_number,
        }
    }

    fn position(field: FormField) -> usize {
        FIELD_ORDER.iter().position(|f| *f == field).unwrap_or(0)
    }

    /// Move focus to the next field, wrapping from the last back to the first.
    pub(crate) fn next_field(&mut self) {
        let idx = Self::position(self.active);
        self.active = FIELD_ORDER[(idx + 1) % FIELD_ORDER.len()];
    }

    /// Move focus to the previous field, wrapping from the first to the last.
    pub(crate) fn prev_field(&mut self) {
        let idx = Self::position(self.active);
        self.active = FIELD_ORDER[(idx + FIELD_ORDER.len() - 1) % FIELD_ORDER.len()];
    }

    /// Append a character to the active field, rejecting control input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Reset every entry and the focus, keeping the form on screen. Mirrors
    /// the "Clear Form" action on the booking screen.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validate and trim the inputs, returning values ready for persistence.
    /// The first empty field in render order blocks submission; focus jumps to
    /// it so the user can type the fix immediately.
    pub(crate) fn parse_inputs(&mut self) -> Result<ReservationFields> {
        for field in FIELD_ORDER {
            if self.value(field).trim().is_empty() {
                self.active = field;
                return Err(anyhow!("Please fill the {} field.", field.label()));
            }
        }
        Ok(ReservationFields {
            name: self.name.trim().to_string(),
            flight_number: self.flight_number.trim().to_string(),
            departure: self.departure.trim().to_string(),
            destination: self.destination.trim().to_string(),
            date: self.date.trim().to_string(),
            seat_number: self.seat_number.trim().to_string(),
        })
    }

    /// Render a styled line for the form widget.
    pub(crate) fn build_line(&self, field: FormField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            format!("<{}>", field.placeholder())
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field. Used to place the
    /// cursor at the end of the active entry.
    pub(crate) fn value_len(&self, field: FormField) -> usize {
        self.value(field).chars().count()
    }
}

/// State for the delete confirmation dialog. Carries enough of the doomed
/// reservation to describe it without holding a store reference.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) summary: String,
    pub(crate) route: String,
}

impl ConfirmDelete {
    /// Build the confirmation state from the reservation being considered.
    pub(crate) fn from(reservation: &Reservation) -> Self {
        Self {
            id: reservation.id,
            summary: reservation.summary(),
            route: reservation.route(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ReservationForm {
        ReservationForm {
            name: "Jane Doe".into(),
            flight_number: "AA1234".into(),
            departure: "NYC".into(),
            destination: "LAX".into(),
            date: "2024-06-01".into(),
            seat_number: "12A".into(),
            ..ReservationForm::default()
        }
    }

    #[test]
    fn parse_accepts_complete_form_and_trims() {
        let mut form = filled_form();
        form.name = "  Jane Doe  ".into();

        let fields = form.parse_inputs().unwrap();
        assert_eq!(fields.name, "Jane Doe");
        assert_eq!(fields.seat_number, "12A");
    }

    #[test]
    fn first_empty_field_blocks_and_takes_focus() {
        let mut form = filled_form();
        form.departure = "   ".into();
        form.date.clear();

        let err = form.parse_inputs().unwrap_err();
        assert!(err.to_string().contains("Departure"));
        assert_eq!(form.active, FormField::Departure);
    }

    #[test]
    fn whitespace_only_entry_counts_as_empty() {
        let mut form = filled_form();
        form.seat_number = "\t ".into();

        let err = form.parse_inputs().unwrap_err();
        assert!(err.to_string().contains("Seat Number"));
    }

    #[test]
    fn field_cycling_wraps_both_directions() {
        let mut form = ReservationForm::default();
        assert_eq!(form.active, FormField::Name);

        form.prev_field();
        assert_eq!(form.active, FormField::SeatNumber);
        form.next_field();
        assert_eq!(form.active, FormField::Name);
        for _ in 0..FIELD_ORDER.len() {
            form.next_field();
        }
        assert_eq!(form.active, FormField::Name);
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut form = ReservationForm::default();
        assert!(!form.push_char('\u{7}'));
        assert!(form.push_char('J'));
        assert_eq!(form.name, "J");
    }
}
