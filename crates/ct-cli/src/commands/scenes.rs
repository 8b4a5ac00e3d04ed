use comfy_table::{ContentArrangement, Table};

use ct_story::{SceneGraph, SceneId};

pub fn run(scene: Option<&str>) -> Result<(), String> {
    let graph = SceneGraph::builtin();
    match scene {
        Some(name) => show(&graph, name),
        None => list(&graph),
    }
}

fn list(graph: &SceneGraph) -> Result<(), String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Scene", "Speaker", "Mood", "Choices", "Leads to"]);

    for scene in graph.scenes() {
        let next = if graph.is_terminal(scene.id) {
            "ending".to_string()
        } else {
            graph
                .successors(scene.id)
                .iter()
                .map(SceneId::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![
            scene.id.to_string(),
            scene.speaker.clone(),
            scene.mood.to_string(),
            scene.choices.len().to_string(),
            next,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} scenes", graph.len());

    Ok(())
}

fn show(graph: &SceneGraph, name: &str) -> Result<(), String> {
    let id = name.parse::<SceneId>().map_err(|e| e.to_string())?;
    let scene = graph.scene(id).map_err(|e| e.to_string())?;

    println!("  {} ({}, {})", scene.id, scene.speaker, scene.mood);
    println!();
    println!("  {}", scene.narration);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Choice", "Effect", "Leads to", "Vision"]);

    for (i, choice) in scene.choices.iter().enumerate() {
        let vision = match &choice.vision {
            Some(v) if v.advance_after_ms > 0 => {
                format!("{} ({} ms, advance after {} ms)", v.text, v.duration_ms, v.advance_after_ms)
            }
            Some(v) => format!("{} ({} ms)", v.text, v.duration_ms),
            None => "—".to_string(),
        };
        table.add_row(vec![
            (i + 1).to_string(),
            choice.label.clone(),
            choice.delta.to_string(),
            choice.target.to_string(),
            vision,
        ]);
    }

    println!("{table}");
    Ok(())
}
