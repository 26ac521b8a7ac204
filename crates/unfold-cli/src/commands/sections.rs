use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use unfold_core::markup;
use unfold_engine::links::activate_links;
use unfold_engine::macros::{Macro, find_macros};

pub fn run(path: &Path) -> Result<(), String> {
    let story = super::load_story(path)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Section", "Chars", "Macros", "Includes", "Links", ""]);

    for (id, source) in &story.sections {
        let macros = find_macros(source);
        let mut includes: Vec<String> = macros
            .iter()
            .filter_map(|(_, payload)| Macro::parse(payload).ok())
            .filter(|m| matches!(m, Macro::Section(_)))
            .map(|m| m.name().to_string())
            .collect();
        includes.dedup();
        let tree = markup::parse(source);
        let links = activate_links(&tree, tree.root()).len();
        let marker = if *id == story.start { "start" } else { "" };
        table.add_row(vec![
            id.clone(),
            source.chars().count().to_string(),
            macros.len().to_string(),
            includes.join(", "),
            links.to_string(),
            marker.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} section{} in '{}'",
        story.sections.len(),
        super::plural(story.sections.len()),
        story.title
    );

    Ok(())
}
