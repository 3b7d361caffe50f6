//! The interactive numbered menu.
//!
//! [`Menu`] reads choices and field values line by line and writes prompts,
//! tables and status text. It is generic over its streams so a whole session
//! can be driven from a string.

use std::io::{self, BufRead, Write};

use tracing::debug;

use eventdesk_core::format::{NO_EVENTS, NO_EVENTS_ON_DATE, NO_MATCHES};
use eventdesk_core::{
    Event, EventDate, EventDraft, EventId, EventPatch, EventStore, NotificationSink, OutputFormat,
    OutputFormatter, Recipients, ReminderMessage, ScheduleError,
};

use crate::config::AdminSettings;
use crate::session::Role;

/// How the session starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginMode {
    /// Ask whether to log in as admin.
    #[default]
    Ask,
    /// Show the login prompt right away.
    Immediate,
}

/// Prints reminders instead of sending them.
struct ConsoleSink<'a, W> {
    out: &'a mut W,
    written: io::Result<()>,
}

impl<W: Write> NotificationSink for ConsoleSink<'_, W> {
    fn dispatch(&mut self, recipient_count: usize, message: &ReminderMessage) {
        self.written = write!(
            self.out,
            "[SIMULATED EMAIL SEND] To {recipient_count} recipients.\nSubject: {}\n\n{}",
            message.subject, message.body
        );
    }
}

/// One interactive session over an event store.
pub struct Menu<R, W> {
    input: R,
    output: W,
    store: EventStore,
    admin: AdminSettings,
    role: Role,
    recipients: Recipients,
    today: EventDate,
    format: OutputFormat,
    formatter: OutputFormatter,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, store: EventStore, admin: AdminSettings, today: EventDate) -> Self {
        Self {
            input,
            output,
            store,
            admin,
            role: Role::Viewer,
            recipients: Recipients::default(),
            today,
            format: OutputFormat::Table,
            formatter: OutputFormatter::with_defaults(),
        }
    }

    /// Builder: print listings in `format`.
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn recipients(&self) -> &Recipients {
        &self.recipients
    }

    /// Consumes the menu, returning its output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `0` is chosen or input ends.
    pub fn run(&mut self, login: LoginMode) -> io::Result<()> {
        match login {
            LoginMode::Immediate => self.login()?,
            LoginMode::Ask => {
                let answer = self.prompt("Login as admin? (y/N): ")?;
                if matches!(answer.trim(), "y" | "Y") {
                    self.login()?;
                }
            }
        }

        loop {
            self.write_menu()?;
            let Some(choice) = self.read_line()? else {
                break;
            };
            let choice = choice.trim();
            if choice == "0" {
                break;
            }
            self.dispatch(choice)?;
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    fn login(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n== Admin Login ==")?;
        let username = self.prompt("Username: ")?;
        let password = self.prompt("Password: ")?;
        self.role = self.admin.authenticate(&username, &password);
        if self.role.is_admin() {
            writeln!(self.output, "Logged in as admin.")
        } else {
            writeln!(self.output, "Invalid credentials. Continuing as viewer.")
        }
    }

    fn write_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n====== Event Manager ======")?;
        writeln!(self.output, "1) List all events")?;
        writeln!(self.output, "2) Day view (pick date)")?;
        writeln!(self.output, "3) Today's events")?;
        writeln!(self.output, "4) Search events")?;
        if self.role.is_admin() {
            writeln!(self.output, "5) Add event (admin)")?;
            writeln!(self.output, "6) Edit event by ID (admin)")?;
            writeln!(self.output, "7) Delete event by ID (admin)")?;
            writeln!(self.output, "8) Delete event by name (admin)")?;
            writeln!(self.output, "9) Load attendees (paste emails) (admin)")?;
            writeln!(self.output, "10) Send reminders (admin)")?;
            writeln!(self.output, "11) Statistics (admin)")?;
            writeln!(self.output, "12) Export snapshot CSV (admin)")?;
            writeln!(self.output, "13) Import snapshot CSV (admin)")?;
        }
        write!(self.output, "0) Exit\nSelect: ")?;
        self.output.flush()
    }

    fn dispatch(&mut self, choice: &str) -> io::Result<()> {
        debug!(choice, role = ?self.role, "Menu choice");
        let admin = self.role.is_admin();
        match choice {
            "1" => self.list_all(),
            "2" => self.day_view(),
            "3" => self.todays_events(),
            "4" => self.search(),
            "5" if admin => self.add_event(),
            "6" if admin => self.edit_event(),
            "7" if admin => self.delete_by_id(),
            "8" if admin => self.delete_by_name(),
            "9" if admin => self.load_attendees(),
            "10" if admin => self.send_reminders(),
            "11" if admin => self.statistics(),
            "12" if admin => self.export_snapshot(),
            "13" if admin => self.import_snapshot(),
            _ => writeln!(
                self.output,
                "Invalid choice. Try 0-{}.",
                self.role.max_option()
            ),
        }
    }

    fn list_all(&mut self) -> io::Result<()> {
        let events = self.store.list_all();
        write_listing(&mut self.output, &self.formatter, self.format, &events, NO_EVENTS)
    }

    fn day_view(&mut self) -> io::Result<()> {
        let Some(date) = self.prompt_date("Enter date (DD-MM-YYYY): ")? else {
            return Ok(());
        };
        let events = self.store.day_view(date);
        write_listing(&mut self.output, &self.formatter, self.format, &events, NO_EVENTS_ON_DATE)
    }

    fn todays_events(&mut self) -> io::Result<()> {
        let events = self.store.todays_events(self.today);
        write_listing(&mut self.output, &self.formatter, self.format, &events, NO_EVENTS_ON_DATE)
    }

    fn search(&mut self) -> io::Result<()> {
        let keyword = self.prompt("Keyword (name/type): ")?;
        let events = self.store.search(&keyword);
        write_listing(&mut self.output, &self.formatter, self.format, &events, NO_MATCHES)
    }

    fn add_event(&mut self) -> io::Result<()> {
        let name = self.prompt("Name: ")?;
        let date = self.prompt("Date (DD-MM-YYYY): ")?;
        let time = self.prompt("Time (HH:MM 24h): ")?;
        let kind = self.prompt("Type: ")?;
        let location = self.prompt("Location (optional): ")?;

        match self
            .store
            .add_event(EventDraft::new(name, date, time, kind).with_location(location))
        {
            Ok(id) => writeln!(self.output, "Event added with ID: {id}"),
            Err(err) => self.report(&err),
        }
    }

    fn edit_event(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_id("ID to edit: ")? else {
            return Ok(());
        };
        let Some(current) = self.store.get(id).cloned() else {
            return self.report(&ScheduleError::NotFound { id });
        };

        writeln!(self.output, "Editing Event (leave blank to keep current)")?;
        let patch = EventPatch {
            name: Some(self.prompt(&format!("Name [{}]: ", current.name))?),
            date: Some(self.prompt(&format!("Date [{}]: ", current.date))?),
            time: Some(self.prompt(&format!("Time [{}]: ", current.time))?),
            kind: Some(self.prompt(&format!("Type [{}]: ", current.kind))?),
            location: Some(self.prompt(&format!("Location [{}]: ", current.location))?),
        };
        if patch.is_empty() {
            return writeln!(self.output, "No changes.");
        }

        match self.store.edit_event(id, &patch) {
            Ok(_) => writeln!(self.output, "Event updated."),
            Err(err) => self.report(&err),
        }
    }

    fn delete_by_id(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_id("ID to delete: ")? else {
            return Ok(());
        };
        if self.store.delete_by_id(id) {
            writeln!(self.output, "Deleted.")
        } else {
            writeln!(self.output, "No event with that ID.")
        }
    }

    fn delete_by_name(&mut self) -> io::Result<()> {
        let name = self.prompt("Name to delete: ")?;
        match self.store.delete_by_name(&name) {
            0 => writeln!(self.output, "No event with that name."),
            1 => writeln!(self.output, "Deleted 1 event."),
            n => writeln!(self.output, "Deleted {n} events."),
        }
    }

    fn load_attendees(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Paste emails (comma/space/newline separated). End with a blank line."
        )?;
        let text = self.read_block()?;
        self.recipients = Recipients::parse(&text);
        writeln!(self.output, "Loaded {} attendee emails.", self.recipients.len())
    }

    fn send_reminders(&mut self) -> io::Result<()> {
        let Some(date) = self.prompt_date("Send reminders for date (DD-MM-YYYY): ")? else {
            return Ok(());
        };

        let mut sink = ConsoleSink {
            out: &mut self.output,
            written: Ok(()),
        };
        let sent = self
            .store
            .send_reminder_for_date(date, &self.recipients, &mut sink);
        sink.written?;

        match sent {
            Ok(_) => writeln!(self.output, "(Reminders are simulated; no email was sent.)"),
            Err(err) => self.report(&err),
        }
    }

    fn statistics(&mut self) -> io::Result<()> {
        let stats = self.store.statistics();
        match self.format {
            OutputFormat::Table => write!(self.output, "{}", self.formatter.format_statistics(&stats)),
            OutputFormat::Json => writeln!(self.output, "{}", serde_json::to_string_pretty(&stats)?),
        }
    }

    fn export_snapshot(&mut self) -> io::Result<()> {
        write!(self.output, "{}", self.store.export_csv())?;
        writeln!(
            self.output,
            "(Copy the above lines to save. Import with the menu option.)"
        )
    }

    fn import_snapshot(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Paste CSV lines (header optional). End with a blank line."
        )?;
        let text = self.read_block()?;
        match self.store.import_csv(&text) {
            Ok(summary) => {
                writeln!(
                    self.output,
                    "Imported {} events. Next ID: {}",
                    summary.imported, summary.next_id
                )?;
                if !summary.skipped.is_empty() {
                    writeln!(self.output, "Skipped {} invalid lines.", summary.skipped.len())?;
                }
                Ok(())
            }
            Err(err) => self.report(&err),
        }
    }

    /// Prints a rejection, followed by free slots for conflicts.
    fn report(&mut self, err: &ScheduleError) -> io::Result<()> {
        writeln!(self.output, "{err}")?;
        if let Some(suggestions) = err.suggestions() {
            write!(self.output, "{}", self.formatter.format_suggestions(suggestions))?;
        }
        Ok(())
    }

    /// Reads a date, printing the validation error when it is malformed.
    fn prompt_date(&mut self, label: &str) -> io::Result<Option<EventDate>> {
        let text = self.prompt(label)?;
        match EventDate::parse(text.trim()) {
            Ok(date) => Ok(Some(date)),
            Err(err) => {
                writeln!(self.output, "{err}")?;
                Ok(None)
            }
        }
    }

    /// Reads an all-digit id.
    fn prompt_id(&mut self, label: &str) -> io::Result<Option<EventId>> {
        let text = self.prompt(label)?;
        let text = text.trim();
        let id = if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            text.parse::<EventId>().ok()
        } else {
            None
        };
        if id.is_none() {
            writeln!(self.output, "Invalid ID.")?;
        }
        Ok(id)
    }

    /// Writes `label` and reads one line; end of input reads as empty.
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    /// Reads lines up to a blank line or end of input.
    fn read_block(&mut self) -> io::Result<String> {
        let mut block = String::new();
        while let Some(line) = self.read_line()? {
            if line.is_empty() {
                break;
            }
            block.push_str(&line);
            block.push('\n');
        }
        Ok(block)
    }

    /// Reads one line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

fn write_listing<W: Write>(
    out: &mut W,
    formatter: &OutputFormatter,
    format: OutputFormat,
    events: &[&Event],
    empty_text: &str,
) -> io::Result<()> {
    match format {
        OutputFormat::Table => write!(out, "{}", formatter.format_listing(events, empty_text)),
        OutputFormat::Json => writeln!(out, "{}", formatter.format_json(events).to_pretty_json()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn today() -> EventDate {
        EventDate::parse("01-01-2030").unwrap()
    }

    fn seeded_store() -> EventStore {
        let mut store = EventStore::new();
        store
            .add_event(EventDraft::new("Kickoff", "01-01-2030", "09:00", "Meeting").with_location("Hall A"))
            .unwrap();
        store
            .add_event(EventDraft::new("Keynote", "02-01-2030", "10:00", "Talk"))
            .unwrap();
        store
    }

    type TestMenu = Menu<Cursor<String>, Vec<u8>>;

    /// Runs a full session and returns the menu and everything it printed.
    fn session(store: EventStore, login: LoginMode, input: impl Into<String>) -> (TestMenu, String) {
        let mut menu = Menu::new(
            Cursor::new(input.into()),
            Vec::new(),
            store,
            AdminSettings::default(),
            today(),
        );
        menu.run(login).unwrap();
        let output = String::from_utf8(menu.output.clone()).unwrap();
        (menu, output)
    }

    const ADMIN_LOGIN: &str = "y\nadmin\nadmin123\n";

    mod viewer {
        use super::*;

        #[test]
        fn lists_and_exits() {
            let (_, out) = session(seeded_store(), LoginMode::Ask, "n\n1\n0\n");
            assert!(out.starts_with("Login as admin? (y/N): "));
            assert!(out.contains("1    Kickoff"));
            assert!(out.contains("2    Keynote"));
            assert!(!out.contains("5) Add event"));
            assert!(out.ends_with("Goodbye!\n"));
        }

        #[test]
        fn admin_options_are_rejected() {
            let (menu, out) = session(seeded_store(), LoginMode::Ask, "\n7\n0\n");
            assert!(out.contains("Invalid choice. Try 0-4."));
            assert_eq!(menu.store().len(), 2);
        }

        #[test]
        fn end_of_input_ends_session() {
            let (_, out) = session(seeded_store(), LoginMode::Ask, "\n3\n");
            assert!(out.contains("1    Kickoff"));
            assert!(!out.contains("Keynote"));
            assert!(out.ends_with("Goodbye!\n"));
        }

        #[test]
        fn day_view_and_search() {
            let (_, out) = session(
                seeded_store(),
                LoginMode::Ask,
                "\n2\n02-01-2030\n2\n31-02-2030\n4\nmeet\n4\nparty\n0\n",
            );
            assert!(out.contains("3) Today's events"));
            assert!(out.contains("2    Keynote"));
            assert!(out.contains("Invalid date '31-02-2030'. Use DD-MM-YYYY."));
            assert!(out.contains("1    Kickoff"));
            assert!(out.contains("No matches."));
        }

        #[test]
        fn empty_store() {
            let (_, out) = session(EventStore::new(), LoginMode::Ask, "\n1\n3\n0\n");
            assert!(out.contains("No events.\n"));
            assert!(out.contains("No events on this date.\n"));
        }

        #[test]
        fn json_listing() {
            let mut menu = Menu::new(
                "\n1\n0\n".as_bytes(),
                Vec::new(),
                seeded_store(),
                AdminSettings::default(),
                today(),
            )
            .with_output_format(OutputFormat::Json);
            menu.run(LoginMode::Ask).unwrap();
            let out = String::from_utf8(menu.into_output()).unwrap();
            assert!(out.contains("\"count\": 2"));
            assert!(out.contains("\"type\": \"Meeting\""));
        }
    }

    mod login {
        use super::*;

        #[test]
        fn admin_login() {
            let (menu, out) = session(seeded_store(), LoginMode::Ask, format!("{ADMIN_LOGIN}0\n"));
            assert_eq!(menu.role(), Role::Admin);
            assert!(out.contains("Logged in as admin."));
            assert!(out.contains("13) Import snapshot CSV (admin)"));
        }

        #[test]
        fn immediate_login_skips_question() {
            let (menu, out) = session(seeded_store(), LoginMode::Immediate, "ACMadmin\nadmin123\n0\n");
            assert_eq!(menu.role(), Role::Admin);
            assert!(!out.contains("Login as admin?"));
            assert!(out.contains("== Admin Login =="));
        }

        #[test]
        fn bad_password_continues_as_viewer() {
            let (menu, out) = session(seeded_store(), LoginMode::Ask, "y\nadmin\nwrong\n0\n");
            assert_eq!(menu.role(), Role::Viewer);
            assert!(out.contains("Invalid credentials. Continuing as viewer."));
        }
    }

    mod admin {
        use super::*;

        fn admin_session(store: EventStore, commands: &str) -> (TestMenu, String) {
            session(store, LoginMode::Ask, format!("{ADMIN_LOGIN}{commands}0\n"))
        }

        #[test]
        fn add_then_conflict_shows_suggestions() {
            let (menu, out) = admin_session(
                EventStore::new(),
                "5\nKickoff\n01-01-2030\n09:00\nMeeting\nHall A\n\
                 5\nStandup\n01-01-2030\n09:30\nMeeting\n\n",
            );
            assert!(out.contains("Event added with ID: 1"));
            assert!(out.contains("Conflict with Event ID 1 (Kickoff) at 09:00."));
            assert!(out.contains("Suggested available slots on 01-01-2030:\n  - 08:00 to 09:00\n  - 10:00 to 11:00"));
            assert_eq!(menu.store().len(), 1);
        }

        #[test]
        fn add_rejects_invalid_fields() {
            let (menu, out) = admin_session(
                EventStore::new(),
                "5\nKickoff\n29-02-2031\n09:00\nMeeting\n\n5\n  \n01-01-2030\n09:00\nMeeting\n\n",
            );
            assert!(out.contains("Invalid date '29-02-2031'. Use DD-MM-YYYY."));
            assert!(out.contains("Event name must not be empty."));
            assert!(menu.store().is_empty());
        }

        #[test]
        fn edit_keeps_blank_fields() {
            let (menu, out) = admin_session(seeded_store(), "6\n1\n\n\n11:00\n\nRoom 2\n");
            assert!(out.contains("Name [Kickoff]: "));
            assert!(out.contains("Event updated."));
            let edited = menu.store().get(1).unwrap();
            assert_eq!(edited.name, "Kickoff");
            assert_eq!(edited.time.to_string(), "11:00");
            assert_eq!(edited.location, "Room 2");
        }

        #[test]
        fn edit_errors() {
            let (menu, out) = admin_session(
                seeded_store(),
                "6\nabc\n6\n99\n6\n2\n\n01-01-2030\n09:30\n\n\n6\n1\n\n\n\n\n\n",
            );
            assert!(out.contains("Invalid ID."));
            assert!(out.contains("Event not found (ID 99)."));
            assert!(out.contains("Conflict with Event ID 1 (Kickoff) at 09:00."));
            assert!(out.contains("No changes."));
            assert_eq!(menu.store().get(2).unwrap().time.to_string(), "10:00");
        }

        #[test]
        fn deletes() {
            let mut store = seeded_store();
            store
                .add_event(EventDraft::new("KICKOFF", "03-01-2030", "09:00", "Meeting"))
                .unwrap();
            let (menu, out) = admin_session(store, "7\n2\n7\n2\n8\nkickoff\n8\nnothing\n");
            assert!(out.contains("Deleted.\n"));
            assert!(out.contains("No event with that ID."));
            assert!(out.contains("Deleted 2 events."));
            assert!(out.contains("No event with that name."));
            assert!(menu.store().is_empty());
        }

        #[test]
        fn reminders() {
            let (menu, out) = admin_session(
                seeded_store(),
                "10\n01-01-2030\n9\nana@example.com, bo@example.org\nnot-an-email\n\n10\n03-01-2030\n10\n01-01-2030\n",
            );
            assert!(out.contains("No attendee emails loaded. Choose 'Load attendees' first."));
            assert!(out.contains("Loaded 2 attendee emails."));
            assert!(out.contains("No events on 03-01-2030."));
            assert!(out.contains(
                "[SIMULATED EMAIL SEND] To 2 recipients.\n\
                 Subject: Reminder: Events on 01-01-2030\n\n\
                 Upcoming events on 01-01-2030:\n\n\
                 - 09:00 | Kickoff (Meeting) @ Hall A\n"
            ));
            assert_eq!(menu.recipients().len(), 2);
        }

        #[test]
        fn statistics() {
            let (_, out) = admin_session(seeded_store(), "11\n");
            assert!(out.contains("Total events: 2\nBy type:\n  Meeting: 1\n  Talk: 1\n"));
        }

        #[test]
        fn export_and_import() {
            let (menu, out) = admin_session(
                seeded_store(),
                "12\n13\nid,name,date,time,type,location\n7,Retro,05-01-2030,15:00,Meeting,\nbad,row\n\n\
                 13\nnothing valid,here\n\n",
            );
            assert!(out.contains("id,name,date,time,type,location\n1,Kickoff,01-01-2030,09:00,Meeting,Hall A\n"));
            assert!(out.contains("Imported 1 events. Next ID: 8"));
            assert!(out.contains("Skipped 1 invalid lines."));
            assert!(out.contains("Nothing imported."));
            assert_eq!(menu.store().len(), 1);
            assert_eq!(menu.store().next_id(), 8);
        }
    }
}
