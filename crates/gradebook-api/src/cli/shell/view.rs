//! Rendering of tables, charts and messages for the terminal client.

use comfy_table::{presets, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

use gradebook_core::service::auth::Session;
use gradebook_types::academic::{ClassListing, Profile, Role};
use gradebook_types::grade::{Distribution, GradeRow, ScoreComponent, TranscriptRow};
use gradebook_types::outcome::Outcome;

const BAR_WIDTH: usize = 40;

pub fn banner() -> String {
    format!(
        "\n  {} v{}\n  {}\n",
        style("Gradebook").bold().cyan(),
        env!("CARGO_PKG_VERSION"),
        style("Log in with your user id. Ctrl+D quits.").dim()
    )
}

pub fn welcome(session: &Session, name: &str) -> String {
    format!(
        "  {} Welcome, {} ({})",
        style("✓").green(),
        style(name).bold(),
        session.role
    )
}

pub fn outcome(outcome: &Outcome) -> String {
    if outcome.succeeded() {
        format!("  {} {}", style("✓").green(), outcome.detail())
    } else {
        format!("  {} {}", style("✗").red(), outcome.detail())
    }
}

pub fn error(message: impl std::fmt::Display) -> String {
    format!("  {} {}", style("✗").red(), message)
}

pub fn note(message: impl std::fmt::Display) -> String {
    format!("  {}", style(message).dim())
}

/// `-` for a score that has not been entered.
pub fn score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.iter().map(|h| Cell::new(h).fg(Color::White)));
    table
}

fn score_headers(first: [&'static str; 2]) -> Vec<&'static str> {
    first
        .into_iter()
        .chain(ScoreComponent::ALL.iter().map(|c| c.label()))
        .chain(["Total"])
        .collect()
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn profile(profile: &Profile) -> String {
    let mut table = table(&["User ID", "Role", "Name", "Gender", "Age"]);
    table.add_row(vec![
        Cell::new(&profile.user_id),
        Cell::new(profile.role),
        Cell::new(&profile.name),
        Cell::new(&profile.gender),
        Cell::new(profile.age.map_or_else(|| "-".to_string(), |a| a.to_string())),
    ]);
    table.to_string()
}

pub fn accounts(profiles: &[Profile]) -> String {
    let mut table = table(&["User ID", "Role", "Name"]);
    for p in profiles {
        let role = match p.role {
            Role::Admin => Cell::new(p.role).fg(Color::Magenta),
            Role::Teacher => Cell::new(p.role).fg(Color::Cyan),
            Role::Student => Cell::new(p.role),
        };
        table.add_row(vec![Cell::new(&p.user_id), role, Cell::new(&p.name)]);
    }
    table.to_string()
}

/// Class listings, numbered from 1 when offered for selection.
pub fn classes(listings: &[ClassListing], numbered: bool) -> String {
    let mut headers = vec!["Class", "Course", "Class name", "Teacher"];
    if numbered {
        headers.insert(0, "#");
    }
    let mut table = table(&headers);
    for (i, l) in listings.iter().enumerate() {
        let mut row = Vec::with_capacity(headers.len());
        if numbered {
            row.push(right((i + 1).to_string()));
        }
        row.extend([
            Cell::new(&l.tcid),
            Cell::new(&l.course_name),
            Cell::new(&l.class_name),
            Cell::new(&l.teacher_name),
        ]);
        table.add_row(row);
    }
    table.to_string()
}

pub fn transcript(rows: &[TranscriptRow]) -> String {
    let mut table = table(&score_headers(["Course", "Name"]));
    for r in rows {
        let mut cells = vec![Cell::new(&r.cid), Cell::new(&r.course_name)];
        cells.extend(ScoreComponent::ALL.iter().map(|c| right(score(r.scores.get(*c)))));
        cells.push(right(score(Some(r.total))));
        table.add_row(cells);
    }
    table.to_string()
}

pub fn grade_table(rows: &[GradeRow]) -> String {
    let mut table = table(&score_headers(["Student", "Name"]));
    for r in rows {
        let mut cells = vec![Cell::new(&r.sid), Cell::new(&r.name)];
        cells.extend(
            ScoreComponent::ALL
                .iter()
                .map(|c| right(score(r.scores.and_then(|s| s.get(*c))))),
        );
        let total = match r.total {
            Some(t) if t < 60.0 => right(score(Some(t))).fg(Color::Red),
            other => right(score(other)),
        };
        cells.push(total);
        table.add_row(cells);
    }
    table.to_string()
}

/// Horizontal bar chart of band counts, scaled to the largest band.
pub fn distribution(distribution: &Distribution) -> String {
    let widest = distribution.iter().map(|(_, n)| n).max().unwrap_or(0);
    let mut out = String::new();
    for (band, count) in distribution.iter() {
        let len = if widest == 0 { 0 } else { count * BAR_WIDTH / widest };
        out.push_str(&format!(
            "  {:<20} {:>3} {}\n",
            band.label(),
            count,
            style("█".repeat(len)).cyan()
        ));
    }
    out.push_str(&format!("  {:<20} {:>3}", "students", distribution.total()));
    out
}
