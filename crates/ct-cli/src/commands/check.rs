use ct_story::SceneGraph;

pub fn run() -> Result<(), String> {
    let graph = SceneGraph::builtin();
    let problems = graph.validate();

    if problems.is_empty() {
        println!("  All checks passed.");
        println!(
            "  {} scenes, {} paths, longest path {} scenes",
            graph.len(),
            graph.paths().len(),
            graph.longest_path()
        );
        return Ok(());
    }

    for problem in &problems {
        eprintln!("  {problem}");
    }
    Err(format!(
        "{} problem{} found",
        problems.len(),
        if problems.len() == 1 { "" } else { "s" }
    ))
}
