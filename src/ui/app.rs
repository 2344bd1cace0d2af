use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::db::{ReservationStore, StoreError};

use super::forms::{ConfirmDelete, ReservationForm, FIELD_ORDER};
use super::helpers::{centered_rect, surface_error};
use super::screens::{HomeAction, HomeScreen, ListScreen, HOME_ACTIONS};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// High-level navigation states. Keeping this explicit makes it easy to reason
/// about which rendering path runs and what keyboard shortcuts should do.
/// Exactly one screen exists at a time; switching screens rebuilds the target
/// from current store data instead of unhiding a stale page.
enum Screen {
    Home(HomeScreen),
    Booking(ReservationForm),
    List(ListScreen),
    Edit { id: i64, form: ReservationForm },
}

/// Modal dialogs layered over the current screen. While a dialog is up, the
/// screen underneath receives no keys.
enum Mode {
    Normal,
    ConfirmDelete(ConfirmDelete),
    /// Shown right after a successful booking: offer to jump to the list.
    BookingSaved,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Owns the injected store
/// and the explicit navigation state; draw methods render from this state
/// without mutating it.
pub struct App {
    store: Box<dyn ReservationStore>,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: Box<dyn ReservationStore>) -> Self {
        Self {
            store,
            screen: Screen::Home(HomeScreen::new()),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Dispatch one key press. Returns `true` when the application should
    /// exit. The current mode is taken out of `self` first so handlers can
    /// consume it and decide what mode comes next.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::BookingSaved => self.handle_booking_saved(code)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Home(ref mut home) => {
                let mut action = None;
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Up => home.move_selection(-1),
                    KeyCode::Down => home.move_selection(1),
                    KeyCode::Enter => action = Some(home.current_action()),
                    KeyCode::Char('b') | KeyCode::Char('B') => action = Some(HomeAction::BookFlight),
                    KeyCode::Char('v') | KeyCode::Char('V') => {
                        action = Some(HomeAction::ViewReservations)
                    }
                    _ => {}
                }

                match action {
                    Some(HomeAction::BookFlight) => self.open_booking(),
                    Some(HomeAction::ViewReservations) => self.open_reservations(),
                    Some(HomeAction::Exit) => *exit = true,
                    None => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Booking(ref mut form) => {
                let mut back_home = false;
                match code {
                    KeyCode::Esc => back_home = true,
                    KeyCode::Tab | KeyCode::Down => form.next_field(),
                    KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Enter => return self.submit_booking(),
                    KeyCode::Char(ch) => {
                        if form.push_char(ch) {
                            form.error = None;
                        }
                    }
                    _ => {}
                }

                if back_home {
                    self.clear_status();
                    self.open_home();
                }
                Ok(Mode::Normal)
            }
            Screen::List(ref mut list) => {
                let mut edit_id = None;
                let mut delete_target = None;
                let mut no_selection_warning = None;
                let mut back_home = false;
                let mut book_new = false;
                let mut refresh = false;

                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc => back_home = true,
                    KeyCode::Up => list.move_selection(-1),
                    KeyCode::Down => list.move_selection(1),
                    KeyCode::PageUp => list.move_selection(-5),
                    KeyCode::PageDown => list.move_selection(5),
                    KeyCode::Home => list.select_first(),
                    KeyCode::End => list.select_last(),
                    KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                        match list.current() {
                            Some(reservation) => edit_id = Some(reservation.id),
                            None => no_selection_warning = Some("Please select a reservation to edit."),
                        }
                    }
                    KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('-') => {
                        match list.current() {
                            Some(reservation) => {
                                delete_target = Some(ConfirmDelete::from(reservation))
                            }
                            None => {
                                no_selection_warning = Some("Please select a reservation to delete.")
                            }
                        }
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('+') => {
                        book_new = true
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => refresh = true,
                    _ => {}
                }

                if back_home {
                    self.clear_status();
                    self.open_home();
                } else if book_new {
                    self.open_booking();
                } else if refresh {
                    self.refresh_reservations();
                } else if let Some(id) = edit_id {
                    self.open_edit(id);
                } else if let Some(confirm) = delete_target {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(confirm));
                } else if let Some(warning) = no_selection_warning {
                    self.set_status(warning, StatusKind::Error);
                }
                Ok(Mode::Normal)
            }
            Screen::Edit { id, ref mut form } => {
                let mut cancel = false;
                match code {
                    KeyCode::Esc => cancel = true,
                    KeyCode::Tab | KeyCode::Down => form.next_field(),
                    KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Enter => return self.submit_edit(id),
                    KeyCode::Char(ch) => {
                        if form.push_char(ch) {
                            form.error = None;
                        }
                    }
                    _ => {}
                }

                if cancel {
                    self.set_status("Edit cancelled.", StatusKind::Info);
                    self.open_reservations();
                }
                Ok(Mode::Normal)
            }
        }
    }

    /// Ctrl-D opens the delete confirmation from the edit screen, where every
    /// printable key belongs to the form fields.
    pub(crate) fn handle_ctrl_d(&mut self) -> Result<()> {
        if !matches!(self.mode, Mode::Normal) {
            return Ok(());
        }

        if let Screen::Edit { id, .. } = self.screen {
            match self.store.get(id) {
                Ok(Some(reservation)) => {
                    self.clear_status();
                    self.mode = Mode::ConfirmDelete(ConfirmDelete::from(&reservation));
                }
                Ok(None) => {
                    self.set_status(
                        format!("Reservation #{id} not found. It may have been deleted."),
                        StatusKind::Error,
                    );
                    self.open_reservations();
                }
                Err(err) => {
                    let message = surface_error(&err);
                    self.set_status(message, StatusKind::Error);
                }
            }
        }
        Ok(())
    }

    /// Validate the booking form and create the reservation. On success the
    /// form clears for the next entry and a prompt offers to show the list.
    fn submit_booking(&mut self) -> Result<Mode> {
        let parsed = {
            let Screen::Booking(form) = &mut self.screen else {
                return Ok(Mode::Normal);
            };
            match form.parse_inputs() {
                Ok(fields) => Ok(fields),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    Err(message)
                }
            }
        };

        match parsed {
            Ok(fields) => match self.store.create(&fields) {
                Ok(_) => {
                    if let Screen::Booking(form) = &mut self.screen {
                        form.clear();
                    }
                    self.set_status("Flight booked successfully.", StatusKind::Info);
                    Ok(Mode::BookingSaved)
                }
                Err(err) => {
                    let message = surface_error(&err);
                    if let Screen::Booking(form) = &mut self.screen {
                        form.error = Some(message.clone());
                    }
                    self.set_status(message, StatusKind::Error);
                    Ok(Mode::Normal)
                }
            },
            Err(message) => {
                self.set_status(message, StatusKind::Error);
                Ok(Mode::Normal)
            }
        }
    }

    /// Validate the edit form and overwrite the stored reservation. A stale id
    /// sends the user back to the reloaded list; other faults keep the form
    /// open so nothing typed is lost.
    fn submit_edit(&mut self, id: i64) -> Result<Mode> {
        let parsed = {
            let Screen::Edit { form, .. } = &mut self.screen else {
                return Ok(Mode::Normal);
            };
            match form.parse_inputs() {
                Ok(fields) => Ok(fields),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    Err(message)
                }
            }
        };

        match parsed {
            Ok(fields) => match self.store.update(id, &fields) {
                Ok(_) => {
                    self.set_status("Reservation updated successfully.", StatusKind::Info);
                    self.open_reservations();
                    Ok(Mode::Normal)
                }
                Err(err) => {
                    let message = surface_error(&err);
                    if err.downcast_ref::<StoreError>().is_some() {
                        self.set_status(message, StatusKind::Error);
                        self.open_reservations();
                    } else {
                        if let Screen::Edit { form, .. } = &mut self.screen {
                            form.error = Some(message.clone());
                        }
                        self.set_status(message, StatusKind::Error);
                    }
                    Ok(Mode::Normal)
                }
            },
            Err(message) => {
                self.set_status(message, StatusKind::Error);
                Ok(Mode::Normal)
            }
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.store.delete(confirm.id) {
                    Ok(existed) => {
                        if existed {
                            self.set_status("Reservation deleted successfully.", StatusKind::Info);
                        } else {
                            self.set_status("Reservation was already gone.", StatusKind::Info);
                        }
                        self.open_reservations();
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn handle_booking_saved(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.open_reservations();
                Ok(Mode::Normal)
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Ok(Mode::Normal),
            _ => Ok(Mode::BookingSaved),
        }
    }

    fn open_home(&mut self) {
        self.screen = Screen::Home(HomeScreen::new());
    }

    fn open_booking(&mut self) {
        self.clear_status();
        self.screen = Screen::Booking(ReservationForm::default());
    }

    /// Switch to the list screen, always reloading from the store so changes
    /// made on other screens are reflected.
    fn open_reservations(&mut self) {
        match self.store.list_all() {
            Ok(reservations) => {
                self.screen = Screen::List(ListScreen::new(reservations));
            }
            Err(err) => {
                let message = surface_error(&err);
                self.set_status(
                    format!("Failed to load reservations: {message}"),
                    StatusKind::Error,
                );
                self.screen = Screen::List(ListScreen::new(Vec::new()));
            }
        }
    }

    /// Reload the list in place, keeping the cursor near its old position.
    fn refresh_reservations(&mut self) {
        let result = self.store.list_all();
        match result {
            Ok(reservations) => {
                if let Screen::List(list) = &mut self.screen {
                    list.set_reservations(reservations);
                }
                self.set_status("Reservations reloaded.", StatusKind::Info);
            }
            Err(err) => {
                let message = surface_error(&err);
                self.set_status(
                    format!("Failed to load reservations: {message}"),
                    StatusKind::Error,
                );
            }
        }
    }

    /// Load the reservation into a pre-filled form and switch to the edit
    /// screen. A missing id keeps the user on the (reloaded) list.
    fn open_edit(&mut self, id: i64) {
        match self.store.get(id) {
            Ok(Some(reservation)) => {
                self.clear_status();
                self.screen = Screen::Edit {
                    id,
                    form: ReservationForm::from_reservation(&reservation),
                };
            }
            Ok(None) => {
                self.set_status(
                    format!("Reservation #{id} not found. It may have been deleted."),
                    StatusKind::Error,
                );
                self.open_reservations();
            }
            Err(err) => {
                let message = surface_error(&err);
                self.set_status(
                    format!("Failed to load reservation: {message}"),
                    StatusKind::Error,
                );
            }
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Home(home) => self.draw_home(frame, content_area, home),
            Screen::Booking(form) => {
                self.draw_reservation_form(frame, content_area, "Book New Flight", form)
            }
            Screen::List(list) => self.draw_list(frame, content_area, list),
            Screen::Edit { id, form } => {
                let title = format!("Edit Reservation #{id}");
                self.draw_reservation_form(frame, content_area, &title, form)
            }
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::BookingSaved => self.draw_booking_saved(frame, area),
            Mode::Normal => {}
        }
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect, home: &HomeScreen) {
        let mut lines = vec![
            Line::from(Span::styled(
                "Flight Reservation System",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Welcome to the Flight Reservation Management System",
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(""),
        ];

        for (idx, action) in HOME_ACTIONS.iter().enumerate() {
            let selected = idx == home.selected;
            let label = if selected {
                format!("> {} <", action.label())
            } else {
                action.label().to_string()
            };
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(label, style)));
            lines.push(Line::from(""));
        }

        let block = Block::default().borders(Borders::ALL);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_reservation_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        form: &ReservationForm,
    ) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines: Vec<Line<'static>> =
            FIELD_ORDER.iter().map(|field| form.build_line(*field)).collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save - Tab to switch fields - Esc to go back",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if let Some(row) = FIELD_ORDER.iter().position(|f| *f == form.active) {
            let prefix = format!("{}: ", form.active.label());
            let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
            let cursor_y = inner.y + row as u16;
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect, list: &ListScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        if list.reservations.is_empty() {
            let message = Paragraph::new("No reservations yet. Press 'n' to book a flight.")
                .block(
                    Block::default()
                        .title("All Reservations")
                        .borders(Borders::ALL),
                )
                .alignment(Alignment::Center);
            frame.render_widget(message, chunks[0]);
        } else {
            let header = Row::new(vec!["ID", "Name", "Flight", "From", "To", "Date", "Seat"])
                .style(Style::default().add_modifier(Modifier::BOLD));

            let rows: Vec<Row> = list
                .reservations
                .iter()
                .map(|reservation| {
                    Row::new(vec![
                        Cell::from(reservation.id.to_string()),
                        Cell::from(reservation.fields.name.clone()),
                        Cell::from(reservation.fields.flight_number.clone()),
                        Cell::from(reservation.fields.departure.clone()),
                        Cell::from(reservation.fields.destination.clone()),
                        Cell::from(reservation.fields.date.clone()),
                        Cell::from(reservation.fields.seat_number.clone()),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Length(6),
                Constraint::Min(16),
                Constraint::Length(10),
                Constraint::Min(12),
                Constraint::Min(12),
                Constraint::Length(12),
                Constraint::Length(6),
            ];

            let table = Table::new(rows, widths)
                .header(header)
                .block(
                    Block::default()
                        .title("All Reservations")
                        .borders(Borders::ALL),
                )
                .row_highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");

            let mut state = TableState::default();
            state.select(list.current().map(|_| list.selected));
            frame.render_stateful_widget(table, chunks[0], &mut state);
        }

        let count = Paragraph::new(list.count_message()).style(Style::default().fg(Color::Gray));
        frame.render_widget(count, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::ConfirmDelete(_)) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::BookingSaved) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" View Reservations   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Keep Booking"),
            ]),
            (Screen::Home(_), _) => Line::from(vec![
                Span::styled("[Up/Down]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Select   "),
                Span::styled("[B]", key_style),
                Span::raw(" Book   "),
                Span::styled("[V]", key_style),
                Span::raw(" View   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Booking(_), _) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Book Flight   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back to Home"),
            ]),
            (Screen::List(_), _) => Line::from(vec![
                Span::styled("[Up/Down]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter/E]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[D]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N]", key_style),
                Span::raw(" New   "),
                Span::styled("[R]", key_style),
                Span::raw(" Refresh   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Home"),
            ]),
            (Screen::Edit { .. }, _) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Ctrl+D]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back to List"),
            ]),
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete reservation #{}: {}?",
                confirm.id, confirm.summary
            )),
            Line::from(confirm.route.clone()),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_booking_saved(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Success").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Flight booked successfully!"),
            Line::from("Would you like to view all reservations?"),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to view the list or N / Esc to keep booking.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::models::{Reservation, ReservationFields};

    /// `Vec`-backed stand-in for the SQLite store, matching the trait contract
    /// closely enough to drive the app through synthetic key events.
    #[derive(Default)]
    struct MemoryStore {
        rows: RefCell<Vec<Reservation>>,
        next_id: Cell<i64>,
    }

    impl MemoryStore {
        fn with_rows(rows: Vec<Reservation>) -> Self {
            let next = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            Self {
                rows: RefCell::new(rows),
                next_id: Cell::new(next),
            }
        }

        fn remove_behind_the_scenes(&self, id: i64) {
            self.rows.borrow_mut().retain(|r| r.id != id);
        }
    }

    impl ReservationStore for MemoryStore {
        fn create(&self, fields: &ReservationFields) -> Result<i64> {
            let id = self.next_id.get().max(1);
            self.next_id.set(id + 1);
            self.rows.borrow_mut().push(Reservation {
                id,
                fields: fields.clone(),
            });
            Ok(id)
        }

        fn list_all(&self) -> Result<Vec<Reservation>> {
            let mut rows = self.rows.borrow().clone();
            rows.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(rows)
        }

        fn get(&self, id: i64) -> Result<Option<Reservation>> {
            Ok(self.rows.borrow().iter().find(|r| r.id == id).cloned())
        }

        fn update(&self, id: i64, fields: &ReservationFields) -> Result<()> {
            let mut rows = self.rows.borrow_mut();
            match rows.iter_mut().find(|r| r.id == id) {
                Some(row) => {
                    row.fields = fields.clone();
                    Ok(())
                }
                None => Err(StoreError::NotFound(id).into()),
            }
        }

        fn delete(&self, id: i64) -> Result<bool> {
            let mut rows = self.rows.borrow_mut();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            Ok(rows.len() < before)
        }
    }

    impl ReservationStore for std::rc::Rc<MemoryStore> {
        fn create(&self, fields: &ReservationFields) -> Result<i64> {
            self.as_ref().create(fields)
        }
        fn list_all(&self) -> Result<Vec<Reservation>> {
            self.as_ref().list_all()
        }
        fn get(&self, id: i64) -> Result<Option<Reservation>> {
            self.as_ref().get(id)
        }
        fn update(&self, id: i64, fields: &ReservationFields) -> Result<()> {
            self.as_ref().update(id, fields)
        }
        fn delete(&self, id: i64) -> Result<bool> {
            self.as_ref().delete(id)
        }
    }

    fn reservation(id: i64, seat: &str) -> Reservation {
        Reservation {
            id,
            fields: ReservationFields {
                name: format!("Passenger {id}"),
                flight_number: "AA1234".into(),
                departure: "NYC".into(),
                destination: "LAX".into(),
                date: "2024-06-01".into(),
                seat_number: seat.into(),
            },
        }
    }

    fn app_with(rows: Vec<Reservation>) -> (App, std::rc::Rc<MemoryStore>) {
        let store = std::rc::Rc::new(MemoryStore::with_rows(rows));
        (App::new(Box::new(std::rc::Rc::clone(&store))), store)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code).expect("key handling should not fail")
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn status_text(app: &App) -> String {
        app.status
            .as_ref()
            .map(|s| s.text.clone())
            .unwrap_or_default()
    }

    fn open_booking_screen(app: &mut App) {
        press(app, KeyCode::Char('b'));
        assert!(matches!(app.screen, Screen::Booking(_)));
    }

    fn open_list_screen(app: &mut App) {
        press(app, KeyCode::Char('v'));
        assert!(matches!(app.screen, Screen::List(_)));
    }

    #[test]
    fn starts_on_home_and_quits_on_q() {
        let (mut app, _store) = app_with(Vec::new());
        assert!(matches!(app.screen, Screen::Home(_)));
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn home_menu_enter_activates_selection() {
        let (mut app, _store) = app_with(Vec::new());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.screen, Screen::List(_)));
    }

    #[test]
    fn blank_booking_submission_never_reaches_store() {
        let (mut app, store) = app_with(Vec::new());
        open_booking_screen(&mut app);

        press(&mut app, KeyCode::Enter);

        assert!(store.rows.borrow().is_empty());
        assert!(status_text(&app).contains("Name"));
        assert!(matches!(app.screen, Screen::Booking(_)));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn partially_filled_booking_is_rejected_before_store() {
        let (mut app, store) = app_with(Vec::new());
        open_booking_screen(&mut app);

        type_str(&mut app, "Jane Doe");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "AA1234");
        press(&mut app, KeyCode::Enter);

        assert!(store.rows.borrow().is_empty());
        assert!(status_text(&app).contains("Departure"));
    }

    #[test]
    fn complete_booking_creates_and_prompts_for_list() {
        let (mut app, store) = app_with(Vec::new());
        open_booking_screen(&mut app);

        for entry in ["Jane Doe", "AA1234", "NYC", "LAX", "2024-06-01", "12A"] {
            type_str(&mut app, entry);
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(store.rows.borrow().len(), 1);
        assert_eq!(store.rows.borrow()[0].fields.name, "Jane Doe");
        assert!(matches!(app.mode, Mode::BookingSaved));

        press(&mut app, KeyCode::Char('y'));
        assert!(matches!(app.mode, Mode::Normal));
        match &app.screen {
            Screen::List(list) => assert_eq!(list.reservations.len(), 1),
            _ => panic!("expected list screen after accepting the prompt"),
        }
    }

    #[test]
    fn declining_the_prompt_leaves_a_cleared_booking_form() {
        let (mut app, _store) = app_with(Vec::new());
        open_booking_screen(&mut app);

        for entry in ["Jane Doe", "AA1234", "NYC", "LAX", "2024-06-01", "12A"] {
            type_str(&mut app, entry);
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));

        match &app.screen {
            Screen::Booking(form) => assert!(form.name.is_empty()),
            _ => panic!("expected to stay on the booking screen"),
        }
    }

    #[test]
    fn list_actions_without_selection_warn_and_do_nothing() {
        let (mut app, store) = app_with(Vec::new());
        open_list_screen(&mut app);

        press(&mut app, KeyCode::Char('e'));
        assert!(status_text(&app).contains("select"));
        assert!(matches!(app.screen, Screen::List(_)));

        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.mode, Mode::Normal));
        assert!(store.rows.borrow().is_empty());
    }

    #[test]
    fn delete_requires_confirmation() {
        let (mut app, store) = app_with(vec![reservation(1, "12A"), reservation(2, "14C")]);
        open_list_screen(&mut app);

        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(store.rows.borrow().len(), 2);
        assert!(status_text(&app).contains("cancelled"));

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(store.rows.borrow().len(), 1);
        match &app.screen {
            Screen::List(list) => assert_eq!(list.reservations.len(), 1),
            _ => panic!("expected to stay on the list after deleting"),
        }
    }

    #[test]
    fn editing_a_vanished_reservation_stays_on_list() {
        let (mut app, store) = app_with(vec![reservation(1, "12A")]);
        open_list_screen(&mut app);

        store.remove_behind_the_scenes(1);
        press(&mut app, KeyCode::Char('e'));

        assert!(status_text(&app).contains("not found"));
        match &app.screen {
            Screen::List(list) => assert!(list.reservations.is_empty()),
            _ => panic!("expected the reloaded list screen"),
        }
    }

    #[test]
    fn edit_flow_updates_seat_and_returns_to_list() {
        let (mut app, store) = app_with(vec![reservation(1, "12A")]);
        open_list_screen(&mut app);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.screen, Screen::Edit { id: 1, .. }));

        // Jump backwards from Name to Seat Number, replace the value.
        press(&mut app, KeyCode::BackTab);
        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "14C");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.screen, Screen::List(_)));
        assert_eq!(store.rows.borrow()[0].fields.seat_number, "14C");
        assert_eq!(store.rows.borrow()[0].fields.name, "Passenger 1");
    }

    #[test]
    fn edit_of_stale_id_surfaces_not_found_and_returns_to_list() {
        let (mut app, store) = app_with(vec![reservation(1, "12A")]);
        open_list_screen(&mut app);
        press(&mut app, KeyCode::Enter);

        store.remove_behind_the_scenes(1);
        press(&mut app, KeyCode::Enter);

        assert!(status_text(&app).contains("not found"));
        assert!(matches!(app.screen, Screen::List(_)));
    }

    #[test]
    fn ctrl_d_on_edit_screen_confirms_and_deletes() {
        let (mut app, store) = app_with(vec![reservation(1, "12A")]);
        open_list_screen(&mut app);
        press(&mut app, KeyCode::Enter);

        app.handle_ctrl_d().unwrap();
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));

        press(&mut app, KeyCode::Char('y'));
        assert!(store.rows.borrow().is_empty());
        assert!(matches!(app.screen, Screen::List(_)));
    }

    #[test]
    fn escape_from_edit_cancels_back_to_list() {
        let (mut app, store) = app_with(vec![reservation(1, "12A")]);
        open_list_screen(&mut app);
        press(&mut app, KeyCode::Enter);

        type_str(&mut app, "unsaved");
        press(&mut app, KeyCode::Esc);

        assert!(matches!(app.screen, Screen::List(_)));
        assert_eq!(store.rows.borrow()[0].fields.name, "Passenger 1");
    }

    #[test]
    fn list_reload_reflects_outside_changes() {
        let (mut app, store) = app_with(vec![reservation(1, "12A")]);
        open_list_screen(&mut app);

        store
            .create(&reservation(0, "9F").fields)
            .expect("create should succeed");
        press(&mut app, KeyCode::Char('r'));

        match &app.screen {
            Screen::List(list) => {
                assert_eq!(list.reservations.len(), 2);
                // Most recent id first.
                assert!(list.reservations[0].id > list.reservations[1].id);
            }
            _ => panic!("expected to remain on the list screen"),
        }
    }
}
