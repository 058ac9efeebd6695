//! `gradebook seed`: load the demo data set.

use anyhow::Result;
use console::style;

use crate::state::AppState;

pub async fn seed(state: &AppState, password: &str, json: bool) -> Result<()> {
    let outcome = state.gradebook.seed_demo_data(password).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!();
    if outcome.succeeded() {
        println!("  {} {}", style("✓").green().bold(), outcome.detail());
        println!(
            "  {}",
            style(format!(
                "Log in with `gradebook shell` as admin, teacher1..5 or student1..20 (password: {password})"
            ))
            .dim()
        );
    } else {
        println!("  {} {}", style("!").yellow().bold(), outcome.detail());
    }
    println!();
    Ok(())
}
