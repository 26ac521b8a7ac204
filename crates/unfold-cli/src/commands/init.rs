use std::fs;
use std::path::Path;

use unfold_core::Story;

/// The sample story written by `init`.
fn sample_story() -> Story {
    Story::new("The Lighthouse", "shore")
        .with_variable("keeper", serde_json::Value::from("Old Maren"))
        .with_section(
            "shore",
            concat!(
                "<p>The wind is up. The lighthouse stands at the end of the causeway, ",
                r#"<a id="_inline-1" data-replace-with="@gulls">and above it</a>.</p>"#,
                r#"<p><a data-goto-section="door">Walk to the door</a></p>"#,
            ),
        )
        .with_section("gulls", "gulls wheel through {$keeper}'s light")
        .with_section(
            "door",
            concat!(
                "{@stamp}<p>The door is unlocked.</p>",
                r#"<p><a data-goto-section="lamp">Climb the stairs</a> or "#,
                r#"<a data-goto-section="shore">go back</a>.</p>"#,
            ),
        )
        .with_section("stamp", "<p><em>Move {#turn}, {#today}.</em></p>")
        .with_section(
            "lamp",
            concat!(
                "<p>The lamp turns without a hand on it. {$keeper} is not here.</p>",
                r#"<p><a data-goto-section="shore">Start again</a></p>"#,
            ),
        )
}

pub fn run(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Err(format!("file '{}' already exists", path.display()));
    }

    let json = sample_story()
        .to_json()
        .map_err(|e| format!("cannot serialize story: {e}"))?;
    fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;

    println!("Created story '{}'", path.display());
    println!();
    println!("Get started:");
    println!("  unfold check {}     # Expand every section", path.display());
    println!("  unfold play {}      # Read it", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_valid() {
        let story = sample_story();
        assert!(story.validate().is_ok());
        let back = Story::from_json(&story.to_json().unwrap()).unwrap();
        assert_eq!(back.start, "shore");
        assert_eq!(back.sections.len(), 5);
    }
}
