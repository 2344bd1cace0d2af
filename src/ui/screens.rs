use crate::models::Reservation;

/// Entries on the home menu, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum HomeAction {
    BookFlight,
    ViewReservations,
    Exit,
}

pub(crate) const HOME_ACTIONS: [HomeAction; 3] = [
    HomeAction::BookFlight,
    HomeAction::ViewReservations,
    HomeAction::Exit,
];

impl HomeAction {
    pub(crate) fn label(self) -> &'static str {
        match self {
            HomeAction::BookFlight => "Book Flight",
            HomeAction::ViewReservations => "View Reservations",
            HomeAction::Exit => "Exit",
        }
    }
}

/// Selection state for the home menu.
pub(crate) struct HomeScreen {
    pub(crate) selected: usize,
}

impl HomeScreen {
    pub(crate) fn new() -> Self {
        Self { selected: 0 }
    }

    pub(crate) fn current_action(&self) -> HomeAction {
        HOME_ACTIONS[self.selected]
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = HOME_ACTIONS.len() as isize;
        let next = (self.selected as isize + offset).rem_euclid(len);
        self.selected = next as usize;
    }
}

/// All state required to render and interact with the reservations table:
/// the rows as last loaded from the store plus the highlighted index.
pub(crate) struct ListScreen {
    pub(crate) reservations: Vec<Reservation>,
    pub(crate) selected: usize,
}

impl ListScreen {
    pub(crate) fn new(reservations: Vec<Reservation>) -> Self {
        let mut screen = Self {
            reservations,
            selected: 0,
        };
        screen.ensure_in_bounds();
        screen
    }

    /// The reservation under the cursor, if any row exists.
    pub(crate) fn current(&self) -> Option<&Reservation> {
        self.reservations.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.reservations.is_empty() {
            return;
        }
        let len = self.reservations.len() as isize;
        let next = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = next as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.reservations.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.reservations.is_empty() {
            self.selected = self.reservations.len() - 1;
        }
    }

    /// Replace the rows after a reload, keeping the cursor near its old spot.
    pub(crate) fn set_reservations(&mut self, reservations: Vec<Reservation>) {
        self.reservations = reservations;
        self.ensure_in_bounds();
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        if self.reservations.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.reservations.len() {
            self.selected = self.reservations.len() - 1;
        }
    }

    /// Footer summary: total count, or a hint when the table is empty.
    pub(crate) fn count_message(&self) -> String {
        if self.reservations.is_empty() {
            "No reservations found. Press 'n' to book a new flight.".to_string()
        } else {
            format!("Total reservations: {}", self.reservations.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReservationFields;

    fn reservation(id: i64) -> Reservation {
        Reservation {
            id,
            fields: ReservationFields {
                name: format!("Passenger {id}"),
                flight_number: "AA1234".into(),
                departure: "NYC".into(),
                destination: "LAX".into(),
                date: "2024-06-01".into(),
                seat_number: "12A".into(),
            },
        }
    }

    #[test]
    fn selection_clamps_to_row_range() {
        let mut screen = ListScreen::new(vec![reservation(3), reservation(2), reservation(1)]);

        screen.move_selection(-5);
        assert_eq!(screen.selected, 0);
        screen.move_selection(10);
        assert_eq!(screen.selected, 2);
        screen.select_first();
        assert_eq!(screen.current().map(|r| r.id), Some(3));
    }

    #[test]
    fn empty_list_has_no_current_row() {
        let mut screen = ListScreen::new(Vec::new());
        screen.move_selection(1);
        assert!(screen.current().is_none());
        assert!(screen.count_message().contains("No reservations"));
    }

    #[test]
    fn reload_keeps_cursor_in_bounds() {
        let mut screen = ListScreen::new(vec![reservation(3), reservation(2), reservation(1)]);
        screen.select_last();

        screen.set_reservations(vec![reservation(3)]);
        assert_eq!(screen.selected, 0);
        assert_eq!(screen.count_message(), "Total reservations: 1");
    }

    #[test]
    fn home_menu_wraps_around() {
        let mut home = HomeScreen::new();
        home.move_selection(-1);
        assert_eq!(home.current_action(), HomeAction::Exit);
        home.move_selection(1);
        assert_eq!(home.current_action(), HomeAction::BookFlight);
    }
}
