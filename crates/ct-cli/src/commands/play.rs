use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use colored::{ColoredString, Colorize};
use tracing::debug;

use super::summary::Format;

use ct_story::{
    Audio, Cue, Ending, FileStore, Mood, PlayerState, Presenter, ResumePolicy, Scene, SceneGraph,
    SessionConfig, SessionController, Step,
};

/// Options for `ct play`.
pub struct PlayArgs {
    pub save: PathBuf,
    pub resume: bool,
    pub resume_policy: ResumePolicy,
    pub fast: bool,
    pub typewriter: bool,
    pub export: Option<PathBuf>,
    pub format: Format,
}

/// Milliseconds per character for the typewriter effect. Higher focus types faster.
pub fn typewriter_interval_ms(focus: i32) -> u64 {
    let interval = 20 - i64::from(focus).div_euclid(10);
    interval.max(12).unsigned_abs()
}

/// Split a vision into the wait before the advance and the rest of the overlay.
fn vision_pauses(after_ms: u64, duration_ms: u64) -> (u64, u64) {
    (after_ms, duration_ms.saturating_sub(after_ms))
}

fn pause(ms: u64, fast: bool) {
    if !fast && ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

fn mood_tag(mood: Mood) -> ColoredString {
    let tag = format!("[{mood}]");
    let tag = tag.as_str();
    match mood {
        Mood::Calm => tag.blue(),
        Mood::Tense => tag.yellow(),
        Mood::Hopeful => tag.green(),
        Mood::Dark => tag.red(),
        Mood::Vision => tag.magenta(),
    }
}

/// Prints the story to stdout.
struct Terminal {
    typewriter: bool,
    fast: bool,
    muted: bool,
    mood: Mood,
    focus: i32,
    hud: String,
}

impl Terminal {
    fn new(typewriter: bool, fast: bool) -> Self {
        let state = PlayerState::new();
        Self {
            typewriter,
            fast,
            muted: false,
            mood: Mood::Calm,
            focus: state.focus,
            hud: state.hud_line(),
        }
    }

    fn type_out(&self, text: &str) {
        if !self.typewriter || self.fast {
            println!("{text}");
            return;
        }
        let interval = typewriter_interval_ms(self.focus);
        let mut stdout = io::stdout();
        for c in text.chars() {
            print!("{c}");
            // A failed flush only affects pacing.
            let _ = stdout.flush();
            pause(interval, false);
        }
        println!();
    }
}

impl Presenter for Terminal {
    fn render(&mut self, scene: &Scene) {
        if self.muted {
            return;
        }
        println!();
        println!("{} {}", mood_tag(self.mood), scene.speaker.bold());
        println!("{}", self.hud.dimmed());
        println!();
        self.type_out(&scene.narration);
        println!();
        for (i, label) in scene.labels().iter().enumerate() {
            println!("  {}. {label}", i + 1);
        }
        println!();
    }

    fn show_vision(&mut self, text: &str, duration_ms: u64) {
        debug!(duration_ms, "vision shown");
        if self.muted {
            return;
        }
        println!();
        println!("  {}", text.italic().magenta());
    }

    fn update_hud(&mut self, state: &PlayerState) {
        self.focus = state.focus;
        self.hud = state.hud_line();
    }

    fn set_mood(&mut self, mood: Mood) {
        debug!(%mood, "mood changed");
        self.mood = mood;
    }

    fn show_ending(&mut self, ending: Ending, state: &PlayerState) {
        if self.muted {
            return;
        }
        println!();
        println!("{} {}", mood_tag(self.mood), ending.title().bold());
        println!();
        self.type_out(ending.description());
        println!();
        println!("{}", state.hud_line().dimmed());
        println!();
    }
}

/// The terminal has no speakers; cues go to the debug log.
struct LogAudio;

impl Audio for LogAudio {
    fn play_cue(&mut self, cue: Cue) {
        debug!(%cue, "cue");
    }
}

type Session = SessionController<Terminal, LogAudio>;

pub fn run(args: PlayArgs) -> Result<(), String> {
    let config = SessionConfig::new().with_resume_policy(args.resume_policy);
    let mut terminal = Terminal::new(args.typewriter, args.fast);
    terminal.muted = args.resume;
    let mut store = FileStore::new(args.save.clone());

    let mut session = SessionController::start(SceneGraph::builtin(), config, terminal, LogAudio)
        .map_err(|e| format!("failed to start session: {e}"))?;

    println!("  {} Choosing Tomorrow", "Starting".bold());
    println!("  Type a choice number, or 'help' for commands.");

    if args.resume {
        session.presenter_mut().muted = false;
        let scene = session
            .restore(&store)
            .map_err(|e| format!("cannot resume: {e}"))?;
        println!("  Resumed at {scene}.");
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "q" => break,
            "help" | "?" => print_help(),
            "hud" | "stats" => println!("{}\n", session.current_state().hud_line()),
            "save" => match session.save(&mut store) {
                Ok(()) => println!("  Game saved to {}.\n", store.path().display()),
                Err(e) => println!("{}\n", format!("save failed: {e}").yellow()),
            },
            "load" => match session.restore(&store) {
                Ok(scene) => println!("  Loaded save. Resumed at {scene}.\n"),
                Err(e) => println!("{}\n", format!("load failed: {e}").yellow()),
            },
            "reset" => session.reset().map_err(|e| e.to_string())?,
            other => match other.parse::<usize>() {
                Ok(0) => println!("{}\n", "choices are numbered from 1".yellow()),
                Ok(number) => {
                    if let Err(e) = take_turn(&mut session, number - 1, &args) {
                        println!("{}\n", e.yellow());
                    }
                }
                Err(_) => println!(
                    "{}\n",
                    format!("unknown command: {other} (type 'help')").yellow()
                ),
            },
        }
    }

    Ok(())
}

fn take_turn(session: &mut Session, index: usize, args: &PlayArgs) -> Result<(), String> {
    let mut step = session.choose(index).map_err(|e| e.to_string())?;

    if let Step::Interstitial(scheduled) = &step {
        // The next scene appears after `after_ms`; the overlay keeps running
        // until its own duration is up.
        let (before, rest) = vision_pauses(scheduled.after_ms, scheduled.duration_ms);
        pause(before, args.fast);
        step = session.advance().map_err(|e| e.to_string())?;
        pause(rest, args.fast);
        session.finish_vision();
    }

    if let Step::Ending(ending) = step {
        if let Some(vision) = ending.closing_vision() {
            pause(vision.duration_ms, args.fast);
            session.finish_vision();
        }
        if let Some(path) = &args.export {
            let content = super::summary::render(&session.summary(), args.format)?;
            std::fs::write(path, content)
                .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
            println!("  Summary exported to {}", path.display());
        }
        println!("  Type 'reset' to play again or 'quit' to leave.\n");
    }

    Ok(())
}

fn print_help() {
    println!("  1, 2, 3   pick a choice");
    println!("  hud       show attributes");
    println!("  save      save progress");
    println!("  load      load the last save");
    println!("  reset     start over");
    println!("  quit      leave the game");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typewriter_speeds_up_with_focus() {
        assert_eq!(typewriter_interval_ms(55), 15);
        assert_eq!(typewriter_interval_ms(0), 20);
        assert_eq!(typewriter_interval_ms(9), 20);
        assert_eq!(typewriter_interval_ms(80), 12);
        assert_eq!(typewriter_interval_ms(500), 12);
    }

    #[test]
    fn vision_advances_before_overlay_ends() {
        assert_eq!(vision_pauses(900, 2200), (900, 1300));
        assert_eq!(vision_pauses(0, 1800), (0, 1800));
        assert_eq!(vision_pauses(3000, 2200), (3000, 0));
    }

    #[test]
    fn typewriter_slows_down_with_negative_focus() {
        assert_eq!(typewriter_interval_ms(-1), 21);
        assert_eq!(typewriter_interval_ms(-30), 23);
    }
}
