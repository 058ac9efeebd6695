//! Role menus: which commands a logged-in user can run and how typed input
//! maps to them.

use std::fmt::Write;

use console::style;

use gradebook_types::academic::Role;

/// A terminal command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ShowMenu,
    ClearScreen,
    ShowPersonalInfo,
    UpdatePersonalInfo,
    ViewGrades,
    ViewCourses,
    SelectCourse,
    ShowGradeTable,
    ShowGradeDistribution,
    InputGrades,
    ListUsers,
    Logout,
    Exit,
}

impl Command {
    /// Key typed to run the command.
    pub fn key(self) -> &'static str {
        match self {
            Command::ShowMenu => "show_menu",
            Command::ClearScreen => "clear_screen",
            Command::ShowPersonalInfo => "show_personal_info",
            Command::UpdatePersonalInfo => "update_personal_info",
            Command::ViewGrades => "view_grades",
            Command::ViewCourses => "view_courses",
            Command::SelectCourse => "select_course",
            Command::ShowGradeTable => "show_grade_table",
            Command::ShowGradeDistribution => "show_grade_distribution",
            Command::InputGrades => "input_grades",
            Command::ListUsers => "list_users",
            Command::Logout => "logout",
            Command::Exit => "exit",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::ShowMenu => "show this menu",
            Command::ClearScreen => "clear the screen",
            Command::ShowPersonalInfo => "show personal information",
            Command::UpdatePersonalInfo => "update personal information",
            Command::ViewGrades => "view my grades",
            Command::ViewCourses => "view my courses",
            Command::SelectCourse => "select a course",
            Command::ShowGradeTable => "show a class grade table",
            Command::ShowGradeDistribution => "show a class grade distribution",
            Command::InputGrades => "enter grades for a class",
            Command::ListUsers => "list all users",
            Command::Logout => "log out",
            Command::Exit => "exit",
        }
    }

    /// Whether the session token must be valid before running.
    pub fn needs_session(self) -> bool {
        !matches!(
            self,
            Command::ShowMenu | Command::ClearScreen | Command::Logout | Command::Exit
        )
    }
}

const COMMON_HEAD: [Command; 4] = [
    Command::ShowMenu,
    Command::ClearScreen,
    Command::ShowPersonalInfo,
    Command::UpdatePersonalInfo,
];

const COMMON_TAIL: [Command; 2] = [Command::Logout, Command::Exit];

/// Numbered command list for one role.
#[derive(Debug, Clone)]
pub struct Menu {
    role: Role,
    entries: Vec<Command>,
}

impl Menu {
    pub fn for_role(role: Role) -> Self {
        let own: &[Command] = match role {
            Role::Student => &[Command::ViewGrades, Command::ViewCourses, Command::SelectCourse],
            Role::Teacher => &[
                Command::ShowGradeTable,
                Command::ShowGradeDistribution,
                Command::InputGrades,
            ],
            Role::Admin => &[Command::ListUsers],
        };

        let entries = COMMON_HEAD
            .iter()
            .chain(own)
            .chain(COMMON_TAIL.iter())
            .copied()
            .collect();
        Self { role, entries }
    }

    pub fn entries(&self) -> &[Command] {
        &self.entries
    }

    /// Resolve a 1-based entry number or a command key.
    pub fn parse(&self, input: &str) -> Option<Command> {
        let input = input.trim();
        if let Ok(n) = input.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| self.entries.get(i)).copied();
        }
        let key = input.to_lowercase();
        self.entries.iter().copied().find(|c| c.key() == key)
    }

    pub fn render(&self) -> String {
        let mut out = format!("\n  {} menu\n", style(self.role).bold());
        for (i, command) in self.entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {:<24} {}",
                i + 1,
                command.key(),
                style(command.description()).dim()
            );
        }
        out
    }
}
