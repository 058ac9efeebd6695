//! `gradebook discover`: list the instances a peer would find.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use gradebook_core::discovery::DiscoveryRegistry;
use gradebook_types::discovery::ServiceInstance;

/// Look up healthy instances of `name` and print them.
pub async fn discover<R: DiscoveryRegistry>(registry: &R, name: &str, json: bool) -> Result<()> {
    let instances = registry.lookup(name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&instances)?);
        return Ok(());
    }

    if instances.is_empty() {
        println!();
        println!(
            "  No healthy instances of {} registered.",
            style(name).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", instances_table(&instances));
    println!(
        "  {} instance{}",
        instances.len(),
        if instances.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

fn instances_table(instances: &[ServiceInstance]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("URL").fg(Color::White),
        Cell::new("Components").fg(Color::White),
    ]);
    for instance in instances {
        table.add_row(vec![
            Cell::new(&instance.id),
            Cell::new(instance.base_url()).fg(Color::Cyan),
            Cell::new(instance.tags.join(", ")),
        ]);
    }
    table
}
