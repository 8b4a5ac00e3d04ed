use comfy_table::{ContentArrangement, Table};

use ct_story::Ending;

pub fn run() -> Result<(), String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Ending", "When", "Mood", "Cue"]);

    for (i, ending) in Ending::ALL.iter().enumerate() {
        let cue = match (ending.cue(), ending.closing_vision()) {
            (Some(cue), _) => cue.to_string(),
            (None, Some(_)) => "vision".to_string(),
            (None, None) => "—".to_string(),
        };
        table.add_row(vec![
            (i + 1).to_string(),
            ending.title().to_string(),
            ending.rule().to_string(),
            ending.mood().to_string(),
            cue,
        ]);
    }

    println!("{table}");
    println!();
    println!("  Rules are checked in order; the first match wins.");

    Ok(())
}
