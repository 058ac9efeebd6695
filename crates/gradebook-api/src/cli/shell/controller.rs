//! The interactive terminal client.
//!
//! A login loop followed by a role menu loop. Every domain call goes through
//! the `Gradebook` facade; this module only reads input, checks the session
//! and renders results.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, Stdin, Stdout};

use gradebook_core::service::auth::Session;
use gradebook_types::academic::{ProfileUpdate, TeachingClass};
use gradebook_types::error::{AuthError, GradeError};
use gradebook_types::grade::{ScoreComponent, ScoreSheet, SortDirection, SortKey};

use super::input::Terminal;
use super::menu::{Command, Menu};
use super::view;
use super::Controller;
use crate::state::ConcreteGradebook;

/// What the menu loop does after a command.
enum Flow {
    Continue,
    /// Back to the login prompt.
    Logout,
    /// End the program.
    Exit,
}

pub struct TerminalController<R, W> {
    gradebook: Arc<ConcreteGradebook>,
    term: Terminal<R, W>,
}

impl TerminalController<BufReader<Stdin>, Stdout> {
    pub fn stdio(gradebook: Arc<ConcreteGradebook>) -> Self {
        Self::new(gradebook, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Controller for TerminalController<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn run(mut self) -> Result<()> {
        self.term.say(view::banner()).await?;

        while let Some(session) = self.login().await? {
            tracing::debug!(user_id = %session.user_id, role = %session.role, "terminal session started");
            if let Flow::Exit = self.menu_loop(&session).await? {
                break;
            }
        }

        self.term.say(view::note("Goodbye.")).await?;
        Ok(())
    }
}

impl<R, W> TerminalController<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(gradebook: Arc<ConcreteGradebook>, reader: R, writer: W) -> Self {
        Self {
            gradebook,
            term: Terminal::new(reader, writer),
        }
    }

    /// Prompt until a login succeeds. `None` at end of input.
    async fn login(&mut self) -> Result<Option<Session>> {
        loop {
            let Some(user_id) = self.term.ask("User id: ").await? else {
                return Ok(None);
            };
            if user_id.is_empty() {
                continue;
            }
            let Some(password) = self.term.ask("Password: ").await? else {
                return Ok(None);
            };

            match self.gradebook.auth().login(&user_id, &password).await {
                Ok(session) => {
                    let name = self.gradebook.profiles().personal_info(&user_id).await?.name;
                    self.term.say(view::welcome(&session, &name)).await?;
                    return Ok(Some(session));
                }
                Err(e @ (AuthError::UnknownUser(_) | AuthError::WrongPassword)) => {
                    self.term.say(view::error(e)).await?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn menu_loop(&mut self, session: &Session) -> Result<Flow> {
        let menu = Menu::for_role(session.role);
        self.term.say(menu.render()).await?;

        loop {
            let Some(input) = self.term.ask("> ").await? else {
                return Ok(Flow::Exit);
            };
            if input.is_empty() {
                continue;
            }
            let Some(command) = menu.parse(&input) else {
                self.term
                    .say(view::error(format!("invalid choice: '{input}'")))
                    .await?;
                continue;
            };

            if command.needs_session() && self.gradebook.auth().validate(&session.token).is_none() {
                self.term.say(view::error(AuthError::SessionExpired)).await?;
                return Ok(Flow::Logout);
            }

            match self.dispatch(command, session, &menu).await? {
                Flow::Continue => {}
                flow => return Ok(flow),
            }
        }
    }

    async fn dispatch(&mut self, command: Command, session: &Session, menu: &Menu) -> Result<Flow> {
        let user_id = session.user_id.as_str();
        match command {
            Command::ShowMenu => self.term.say(menu.render()).await?,
            Command::ClearScreen => {
                self.term.clear().await?;
                self.term.say(menu.render()).await?;
            }
            Command::ShowPersonalInfo => {
                let profile = self.gradebook.profiles().personal_info(user_id).await?;
                self.term.say(view::profile(&profile)).await?;
            }
            Command::UpdatePersonalInfo => return self.update_personal_info(user_id).await,
            Command::ViewGrades => {
                let rows = self.gradebook.grades().transcript(user_id).await?;
                if rows.is_empty() {
                    self.term.say(view::note("No grades recorded yet.")).await?;
                } else {
                    self.term.say(view::transcript(&rows)).await?;
                }
            }
            Command::ViewCourses => {
                let listings = self.gradebook.enrollment().selected_classes(user_id).await?;
                if listings.is_empty() {
                    self.term.say(view::note("No courses selected yet.")).await?;
                } else {
                    self.term.say(view::classes(&listings, false)).await?;
                }
            }
            Command::SelectCourse => return self.select_course(user_id).await,
            Command::ShowGradeTable => return self.show_grade_table().await,
            Command::ShowGradeDistribution => {
                let Some(class) = self.ask_class().await? else {
                    return Ok(Flow::Exit);
                };
                let distribution = self.gradebook.grades().distribution(&class.tcid).await?;
                self.term
                    .say(format!("\n  {} ({})", class.name, class.tcid))
                    .await?;
                self.term.say(view::distribution(&distribution)).await?;
            }
            Command::InputGrades => return self.input_grades(session).await,
            Command::ListUsers => {
                let profiles = self.gradebook.profiles().list_accounts().await?;
                self.term.say(view::accounts(&profiles)).await?;
            }
            Command::Logout => {
                self.gradebook.auth().logout(&session.token);
                self.term.say(view::note("Logged out.")).await?;
                return Ok(Flow::Logout);
            }
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    async fn update_personal_info(&mut self, user_id: &str) -> Result<Flow> {
        self.term
            .say(view::note("Leave a field blank to keep its current value."))
            .await?;

        let mut answers = Vec::with_capacity(4);
        for prompt in ["Name: ", "Gender: ", "Age: ", "New password: "] {
            let Some(answer) = self.term.ask(prompt).await? else {
                return Ok(Flow::Exit);
            };
            answers.push(Some(answer).filter(|a| !a.is_empty()));
        }
        let mut answers = answers.into_iter();
        let update = ProfileUpdate {
            name: answers.next().flatten(),
            gender: answers.next().flatten(),
            age: answers.next().flatten(),
            password: answers.next().flatten(),
        };

        let outcome = self
            .gradebook
            .profiles()
            .update_personal_info(user_id, update)
            .await?;
        self.term.say(view::outcome(&outcome)).await?;
        Ok(Flow::Continue)
    }

    async fn select_course(&mut self, sid: &str) -> Result<Flow> {
        let available = self.gradebook.enrollment().available_classes(sid).await?;
        if available.is_empty() {
            self.term.say(view::note("No classes available to select.")).await?;
            return Ok(Flow::Continue);
        }
        self.term.say(view::classes(&available, true)).await?;

        let Some(choice) = self.term.ask("Select a row (q to cancel): ").await? else {
            return Ok(Flow::Exit);
        };
        if choice.eq_ignore_ascii_case("q") {
            self.term.say(view::note("Cancelled.")).await?;
            return Ok(Flow::Continue);
        }

        let listing = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| available.get(i));
        let Some(listing) = listing else {
            self.term
                .say(view::error(format!(
                    "'{choice}' is not a row between 1 and {}",
                    available.len()
                )))
                .await?;
            return Ok(Flow::Continue);
        };

        let outcome = self.gradebook.enrollment().select(sid, &listing.tcid).await?;
        self.term.say(view::outcome(&outcome)).await?;
        Ok(Flow::Continue)
    }

    async fn show_grade_table(&mut self) -> Result<Flow> {
        let Some(class) = self.ask_class().await? else {
            return Ok(Flow::Exit);
        };

        let keys = SortKey::ALL
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let Some(key) = self
            .ask_parsed::<SortKey>(&format!("Sort by ({keys}): "))
            .await?
        else {
            return Ok(Flow::Exit);
        };
        let Some(direction) = self.ask_parsed::<SortDirection>("Order (asc/desc): ").await? else {
            return Ok(Flow::Exit);
        };

        let rows = self
            .gradebook
            .grades()
            .sorted_grade_table(&class.tcid, key, direction)
            .await?;
        let order = match direction {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        };
        self.term
            .say(format!("\n  {} ({}), by {key} {order}", class.name, class.tcid))
            .await?;
        self.term.say(view::grade_table(&rows)).await?;
        Ok(Flow::Continue)
    }

    /// Enter scores student by student. Blank keeps the current value, `q`
    /// abandons the rest of the class. Students already entered stay saved.
    async fn input_grades(&mut self, session: &Session) -> Result<Flow> {
        let Some(class) = self.ask_class().await? else {
            return Ok(Flow::Exit);
        };
        let grades = self.gradebook.grades();
        if !grades
            .can_grade(&session.user_id, session.role, &class.tcid)
            .await?
        {
            self.term
                .say(view::error(AuthError::Forbidden(format!(
                    "{} does not teach {}",
                    session.user_id, class.tcid
                ))))
                .await?;
            return Ok(Flow::Continue);
        }

        let rows = grades.grade_table(&class.tcid).await?;
        self.term
            .say(view::note("Blank keeps the current value, q aborts."))
            .await?;

        let mut saved = 0;
        for row in rows {
            self.term.say(format!("\n  {} {}", row.sid, row.name)).await?;
            let current = row.scores.unwrap_or_default();
            let mut sheet = ScoreSheet::default();

            for component in ScoreComponent::ALL {
                let prompt = format!(
                    "    {} [{}]: ",
                    component.label(),
                    view::score(current.get(component))
                );
                let value = loop {
                    let Some(input) = self.term.ask(&prompt).await? else {
                        return Ok(Flow::Exit);
                    };
                    if input.eq_ignore_ascii_case("q") {
                        self.term
                            .say(view::note(format!("Grade entry aborted after {saved} students.")))
                            .await?;
                        return Ok(Flow::Continue);
                    }
                    if input.is_empty() {
                        break None;
                    }
                    match component.parse_score(&input) {
                        Ok(value) => break Some(value),
                        Err(e) => self.term.say(view::error(e)).await?,
                    }
                };
                sheet.set(component, value);
            }

            if sheet == ScoreSheet::default() {
                self.term.say(view::note("unchanged")).await?;
                continue;
            }
            let record = grades.record_scores(&row.sid, &class.cid, sheet).await?;
            saved += 1;
            self.term
                .say(format!("    Total: {}", view::score(Some(record.total))))
                .await?;
        }

        self.term
            .say(view::note(format!("Saved grades for {saved} students.")))
            .await?;
        Ok(Flow::Continue)
    }

    /// Prompt for a teaching class id until one exists. `None` at end of input.
    async fn ask_class(&mut self) -> Result<Option<TeachingClass>> {
        loop {
            let Some(tcid) = self.term.ask("Teaching class id: ").await? else {
                return Ok(None);
            };
            match self.gradebook.grades().class(&tcid).await {
                Ok(class) => return Ok(Some(class)),
                Err(e @ GradeError::ClassNotFound(_)) => self.term.say(view::error(e)).await?,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Prompt until the input parses. `None` at end of input.
    async fn ask_parsed<T>(&mut self, prompt: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr<Err = String>,
    {
        loop {
            let Some(input) = self.term.ask(prompt).await? else {
                return Ok(None);
            };
            match input.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(e) => self.term.say(view::error(e)).await?,
            }
        }
    }
}
