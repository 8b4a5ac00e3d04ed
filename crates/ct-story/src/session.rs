//! Session orchestration.
//!
//! [`SessionController`] owns the one [`PlayerState`] of a run and walks the
//! [`SceneGraph`]. It never sleeps: a choice with a vision returns a
//! [`ScheduledAdvance`] and the caller decides when to call
//! [`SessionController::advance`].

use tracing::{debug, info, warn};

use crate::collab::{Audio, Cue, Presenter};
use crate::config::{ResumePolicy, SessionConfig};
use crate::ending::{Ending, PathTag, resolve};
use crate::error::{StoryError, StoryResult};
use crate::graph::SceneGraph;
use crate::persist::{SaveStore, Snapshot};
use crate::player::PlayerState;
use crate::scene::{Mood, Scene, SceneId, Target};
use crate::summary::Summary;

/// A transition waiting on a vision interstitial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAdvance {
    /// Scene the choice was made in.
    pub from: SceneId,
    /// Vision text on screen.
    pub text: String,
    /// How long the vision overlay stays up.
    pub duration_ms: u64,
    /// Delay before [`SessionController::advance`] should be called, counted
    /// from the start of the overlay.
    pub after_ms: u64,
    /// Where the advance leads.
    pub target: Target,
}

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// A scene is waiting for a choice.
    Choosing(SceneId),
    /// A vision is showing; the transition has not happened yet.
    Interstitial(ScheduledAdvance),
    /// The story is over.
    Ended(Ending),
}

/// Outcome of [`SessionController::choose`] or [`SessionController::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Entered a new scene.
    Scene(SceneId),
    /// A vision is showing; call `advance` after `after_ms`.
    Interstitial(ScheduledAdvance),
    /// Reached an ending.
    Ending(Ending),
}

/// Drives one play-through.
pub struct SessionController<P, A> {
    graph: SceneGraph,
    config: SessionConfig,
    state: PlayerState,
    phase: Phase,
    presenter: P,
    audio: A,
}

impl<P: Presenter, A: Audio> SessionController<P, A> {
    /// Begin a new session at the graph's entry scene.
    pub fn start(
        graph: SceneGraph,
        config: SessionConfig,
        presenter: P,
        audio: A,
    ) -> StoryResult<Self> {
        let entry = graph.entry();
        let mut session = Self {
            graph,
            config,
            state: PlayerState::new(),
            phase: Phase::Choosing(entry),
            presenter,
            audio,
        };
        session.enter_scene(entry)?;
        info!(scene = %entry, "session started");
        Ok(session)
    }

    /// Pick the choice at zero-based `index` in the current scene.
    ///
    /// An out-of-range index fails with [`StoryError::InvalidChoice`] and
    /// changes nothing.
    pub fn choose(&mut self, index: usize) -> StoryResult<Step> {
        let id = match self.phase {
            Phase::Choosing(id) => id,
            _ => return Err(StoryError::NoActiveScene),
        };
        let choice = self.graph.select(id, index)?.clone();

        self.audio.play_cue(Cue::Click);
        self.state.apply_delta(&choice.delta);
        self.state.record_choice(id, choice.label.as_str());
        self.presenter.update_hud(&self.state);
        debug!(scene = %id, choice = %choice.label, delta = %choice.delta, "choice made");

        match choice.vision {
            Some(vision) => {
                self.open_vision(&vision.text, vision.duration_ms);
                let scheduled = ScheduledAdvance {
                    from: id,
                    text: vision.text,
                    duration_ms: vision.duration_ms,
                    after_ms: vision.advance_after_ms,
                    target: choice.target,
                };
                debug!(next = %scheduled.target, after_ms = scheduled.after_ms, "advance scheduled");
                self.phase = Phase::Interstitial(scheduled.clone());
                Ok(Step::Interstitial(scheduled))
            }
            None => self.transition(choice.target),
        }
    }

    /// Complete a transition scheduled by a vision.
    pub fn advance(&mut self) -> StoryResult<Step> {
        let target = match &self.phase {
            Phase::Interstitial(scheduled) => scheduled.target,
            _ => return Err(StoryError::NoPendingAdvance),
        };
        self.transition(target)
    }

    /// Called when a vision overlay expires. Presentation only.
    pub fn finish_vision(&mut self) {
        self.audio.play_cue(Cue::SuspenseStop);
        self.presenter.set_mood(Mood::Dark);
    }

    /// The scene waiting for a choice, if any.
    pub fn current_scene(&self) -> Option<&Scene> {
        match self.phase {
            Phase::Choosing(id) => self.graph.get(id),
            _ => None,
        }
    }

    /// The player's attributes and history.
    pub fn current_state(&self) -> &PlayerState {
        &self.state
    }

    /// Where the session is.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The ending, once reached.
    pub fn ending(&self) -> Option<Ending> {
        match self.phase {
            Phase::Ended(ending) => Some(ending),
            _ => None,
        }
    }

    /// The scene graph being played.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The presenter, mutably.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The audio sink.
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Summary of the run so far.
    pub fn summary(&self) -> Summary {
        Summary::from_state(&self.state, self.ending())
    }

    /// Write a snapshot of the session to `store`.
    ///
    /// During an interstitial the snapshot records the scene being advanced
    /// to. A finished session has nothing to resume and is rejected.
    pub fn save<S: SaveStore + ?Sized>(&self, store: &mut S) -> StoryResult<()> {
        let scene = match &self.phase {
            Phase::Choosing(id) => *id,
            Phase::Interstitial(ScheduledAdvance {
                target: Target::Scene(id),
                ..
            }) => *id,
            Phase::Interstitial(_) | Phase::Ended(_) => return Err(StoryError::NoActiveScene),
        };
        let blob = Snapshot::new(self.state.clone(), Some(scene)).to_blob()?;
        if let Err(e) = store.write(&blob) {
            warn!(error = %e, "save failed");
            return Err(e);
        }
        info!(scene = %scene, choices = self.state.history.len(), "session saved");
        Ok(())
    }

    /// Replace the session state with the snapshot in `store` and resume.
    ///
    /// On failure the session is left exactly as it was.
    pub fn restore<S: SaveStore + ?Sized>(&mut self, store: &S) -> StoryResult<SceneId> {
        let snapshot = match store.read().and_then(|blob| Snapshot::from_blob(&blob)) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "restore failed");
                return Err(e);
            }
        };
        let resume = self.resume_scene(&snapshot);
        self.state = snapshot.state;
        info!(scene = %resume, policy = %self.config.resume_policy, "session restored");
        self.enter_scene(resume)?;
        Ok(resume)
    }

    /// Start over with fresh attributes at the entry scene.
    pub fn reset(&mut self) -> StoryResult<()> {
        self.state = PlayerState::new();
        let entry = self.graph.entry();
        self.enter_scene(entry)?;
        info!("session reset");
        Ok(())
    }

    fn resume_scene(&self, snapshot: &Snapshot) -> SceneId {
        let entry = self.graph.entry();
        if self.config.resume_policy == ResumePolicy::Start {
            return entry;
        }
        let known = |id: &SceneId| self.graph.get(*id).is_some();
        snapshot
            .scene
            .filter(known)
            .or_else(|| {
                let last = snapshot.state.last_choice()?;
                match self.graph.target_of(last.scene, &last.choice)? {
                    Target::Scene(id) => Some(id),
                    Target::Ending(_) => None,
                }
            })
            .filter(known)
            .unwrap_or(entry)
    }

    fn transition(&mut self, target: Target) -> StoryResult<Step> {
        match target {
            Target::Scene(id) => {
                self.enter_scene(id)?;
                Ok(Step::Scene(id))
            }
            Target::Ending(path) => Ok(Step::Ending(self.enter_ending(path))),
        }
    }

    fn enter_scene(&mut self, id: SceneId) -> StoryResult<()> {
        let scene = self.graph.scene(id)?;
        self.presenter.set_mood(scene.mood);
        self.presenter.update_hud(&self.state);
        self.presenter.render(scene);
        self.phase = Phase::Choosing(id);
        debug!(scene = %id, mood = %scene.mood, "entered scene");
        Ok(())
    }

    fn enter_ending(&mut self, path: PathTag) -> Ending {
        let ending = resolve(path, &self.state);
        self.presenter.set_mood(ending.mood());
        if let Some(cue) = ending.cue() {
            self.audio.play_cue(cue);
        }
        if let Some(vision) = ending.closing_vision() {
            self.open_vision(&vision.text, vision.duration_ms);
        }
        self.presenter.show_ending(ending, &self.state);
        self.phase = Phase::Ended(ending);
        info!(
            ending = %ending,
            %path,
            stress = self.state.stress,
            kindness = self.state.kindness,
            focus = self.state.focus,
            courage = self.state.courage,
            "ending reached"
        );
        ending
    }

    fn open_vision(&mut self, text: &str, duration_ms: u64) {
        self.presenter.show_vision(text, duration_ms);
        self.presenter.set_mood(Mood::Vision);
        self.audio.play_cue(Cue::SuspenseStart);
        self.audio.play_cue(Cue::VisionHit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use crate::player::StateDelta;
    use crate::scene::Choice;

    #[derive(Debug, Default)]
    struct Screen {
        rendered: Vec<SceneId>,
        visions: Vec<String>,
        moods: Vec<Mood>,
        huds: usize,
        endings: Vec<Ending>,
    }

    impl Presenter for Screen {
        fn render(&mut self, scene: &Scene) {
            self.rendered.push(scene.id);
        }
        fn show_vision(&mut self, text: &str, _duration_ms: u64) {
            self.visions.push(text.to_string());
        }
        fn update_hud(&mut self, _state: &PlayerState) {
            self.huds += 1;
        }
        fn set_mood(&mut self, mood: Mood) {
            self.moods.push(mood);
        }
        fn show_ending(&mut self, ending: Ending, _state: &PlayerState) {
            self.endings.push(ending);
        }
    }

    #[derive(Debug, Default)]
    struct Speaker {
        cues: Vec<Cue>,
    }

    impl Audio for Speaker {
        fn play_cue(&mut self, cue: Cue) {
            self.cues.push(cue);
        }
    }

    type Session = SessionController<Screen, Speaker>;

    fn session() -> Session {
        session_with(SessionConfig::default())
    }

    fn session_with(config: SessionConfig) -> Session {
        SessionController::start(
            SceneGraph::builtin(),
            config,
            Screen::default(),
            Speaker::default(),
        )
        .unwrap()
    }

    /// Make each choice in turn, completing any interstitial immediately.
    fn play(session: &mut Session, choices: &[usize]) -> Step {
        let mut last = None;
        for &index in choices {
            let mut step = session.choose(index).unwrap();
            if let Step::Interstitial(_) = step {
                session.finish_vision();
                step = session.advance().unwrap();
            }
            last = Some(step);
        }
        last.unwrap()
    }

    #[test]
    fn start_renders_entry_scene() {
        let s = session();
        assert_eq!(s.phase(), &Phase::Choosing(SceneId::Wake));
        assert_eq!(s.current_scene().map(|sc| sc.id), Some(SceneId::Wake));
        assert_eq!(s.presenter().rendered, vec![SceneId::Wake]);
        assert_eq!(s.presenter().moods, vec![Mood::Calm]);
        assert_eq!(s.presenter().huds, 1);
        assert_eq!(s.current_state(), &PlayerState::new());
    }

    #[test]
    fn invalid_choice_changes_nothing() {
        let mut s = session();
        let err = s.choose(5).unwrap_err();
        assert!(matches!(
            err,
            StoryError::InvalidChoice {
                index: 5,
                available: 3
            }
        ));
        assert_eq!(s.current_state(), &PlayerState::new());
        assert_eq!(s.phase(), &Phase::Choosing(SceneId::Wake));
        assert!(s.audio().cues.is_empty());
    }

    #[test]
    fn plain_choice_advances_immediately() {
        let mut s = session();
        let step = s.choose(1).unwrap();
        assert_eq!(step, Step::Scene(SceneId::Cafeteria));
        let state = s.current_state();
        assert_eq!((state.stress, state.kindness, state.focus), (17, 41, 59));
        assert_eq!(state.history[0].choice, "Grab a quick bite and go");
        assert_eq!(s.audio().cues, vec![Cue::Click]);
        assert_eq!(s.presenter().rendered, vec![SceneId::Wake, SceneId::Cafeteria]);
    }

    #[test]
    fn vision_is_a_two_phase_transition() {
        let mut s = session();
        let step = s.choose(2).unwrap();
        let Step::Interstitial(scheduled) = step else {
            panic!("expected an interstitial");
        };
        assert_eq!(scheduled.from, SceneId::Wake);
        assert_eq!(scheduled.after_ms, 900);
        assert_eq!(scheduled.duration_ms, 2200);
        assert_eq!(scheduled.target, Target::Scene(SceneId::Street));

        // Delta and history are applied before the interstitial.
        assert_eq!(s.current_state().courage, 28);
        assert_eq!(s.current_state().history.len(), 1);
        let before = s.current_state().clone();
        assert!(s.current_scene().is_none());
        assert_eq!(s.presenter().moods.last(), Some(&Mood::Vision));
        assert_eq!(
            s.audio().cues,
            vec![Cue::Click, Cue::SuspenseStart, Cue::VisionHit]
        );

        assert!(matches!(s.choose(0), Err(StoryError::NoActiveScene)));

        assert_eq!(s.advance().unwrap(), Step::Scene(SceneId::Street));
        assert!(matches!(s.advance(), Err(StoryError::NoPendingAdvance)));
        assert_eq!(s.current_state(), &before);

        s.finish_vision();
        assert_eq!(s.audio().cues.last(), Some(&Cue::SuspenseStop));
        assert_eq!(s.presenter().moods.last(), Some(&Mood::Dark));
        assert_eq!(s.current_state(), &before);
    }

    #[test]
    fn advance_without_vision_fails() {
        let mut s = session();
        assert!(matches!(s.advance(), Err(StoryError::NoPendingAdvance)));
    }

    #[test]
    fn playthrough_to_redemption() {
        let mut s = session();
        let step = play(&mut s, &[1, 0, 2, 0, 1, 1, 0, 0]);
        assert_eq!(step, Step::Ending(Ending::Redemption));
        assert_eq!(s.ending(), Some(Ending::Redemption));

        let state = s.current_state();
        assert_eq!(
            (state.stress, state.kindness, state.focus, state.courage),
            (21, 45, 55, 40)
        );
        assert_eq!(state.history.len(), 8);
        assert_eq!(state.history[7].scene, SceneId::FinalTest);

        assert_eq!(s.presenter().endings, vec![Ending::Redemption]);
        assert_eq!(s.presenter().moods.last(), Some(&Mood::Hopeful));
        assert_eq!(s.audio().cues.last(), Some(&Cue::Chime));
        assert!(s.current_scene().is_none());
        assert!(matches!(s.choose(0), Err(StoryError::NoActiveScene)));
    }

    #[test]
    fn shortcuts_at_the_end_isolate() {
        let mut s = session();
        let step = play(&mut s, &[0, 1, 2, 1, 2, 0, 1, 1]);
        assert_eq!(step, Step::Ending(Ending::Isolation));
        assert_eq!(s.audio().cues.last(), Some(&Cue::VisionHit));
        assert_eq!(s.presenter().moods.last(), Some(&Mood::Dark));

        // Visions along the way only add their choices' deltas.
        let state = s.current_state();
        assert_eq!(
            (state.stress, state.kindness, state.focus, state.courage),
            (40, 31, 70, 32)
        );
        assert_eq!(state.history.len(), 8);
    }

    #[test]
    fn skipping_mia_goes_straight_to_the_exam_hall() {
        let mut s = session();
        let step = play(&mut s, &[0, 2]);
        assert_eq!(step, Step::Scene(SceneId::ExamEntrance));
        assert!(!s.presenter().rendered.contains(&SceneId::MiaMeet));
    }

    #[test]
    fn burnout_shows_closing_vision() {
        let scene = Scene::new(SceneId::FinalTest, "Proctor", Mood::Tense, "Last chance.")
            .with_choice(Choice::ending(
                "Push through",
                StateDelta::new().stress(40).focus(-40).courage(-25),
                PathTag::Honest,
            ))
            .with_choice(Choice::ending("Leave", StateDelta::new(), PathTag::Reflect));
        let graph = SceneGraph::from_scenes(SceneId::FinalTest, vec![scene]);
        let mut s = SessionController::start(
            graph,
            SessionConfig::default(),
            Screen::default(),
            Speaker::default(),
        )
        .unwrap();

        assert_eq!(s.choose(0).unwrap(), Step::Ending(Ending::Burnout));
        assert_eq!(
            s.audio().cues,
            vec![Cue::Click, Cue::SuspenseStart, Cue::VisionHit]
        );
        let moods = &s.presenter().moods;
        assert_eq!(&moods[moods.len() - 2..], &[Mood::Dark, Mood::Vision]);
        assert!(s.presenter().visions[0].starts_with("Your vision fades into a blur"));
        assert_eq!(s.presenter().endings, vec![Ending::Burnout]);
    }

    #[test]
    fn save_and_restore_at_recorded_scene() {
        let mut s = session();
        play(&mut s, &[1]);
        let mut store = MemoryStore::new();
        s.save(&mut store).unwrap();

        let mut fresh = session();
        assert_eq!(fresh.restore(&store).unwrap(), SceneId::Cafeteria);
        assert_eq!(fresh.current_state(), s.current_state());
        assert_eq!(fresh.phase(), &Phase::Choosing(SceneId::Cafeteria));
        assert_eq!(fresh.presenter().rendered.last(), Some(&SceneId::Cafeteria));
    }

    #[test]
    fn restore_with_start_policy_replays_from_wake() {
        let mut s = session();
        play(&mut s, &[1, 0]);
        let mut store = MemoryStore::new();
        s.save(&mut store).unwrap();

        let mut fresh = session_with(SessionConfig::new().with_resume_policy(ResumePolicy::Start));
        assert_eq!(fresh.restore(&store).unwrap(), SceneId::Wake);
        assert_eq!(fresh.current_state().history.len(), 2);
        assert_eq!(fresh.current_state().kindness, 47);
    }

    #[test]
    fn save_during_interstitial_records_destination() {
        let mut s = session();
        s.choose(2).unwrap();
        let mut store = MemoryStore::new();
        s.save(&mut store).unwrap();

        let snapshot = Snapshot::from_blob(store.blob().unwrap()).unwrap();
        assert_eq!(snapshot.scene, Some(SceneId::Street));
    }

    #[test]
    fn save_after_ending_is_rejected() {
        let mut s = session();
        play(&mut s, &[1, 0, 2, 0, 1, 1, 0, 0]);
        let mut store = MemoryStore::new();
        assert!(matches!(s.save(&mut store), Err(StoryError::NoActiveScene)));
        assert!(store.blob().is_none());
    }

    #[test]
    fn corrupt_save_leaves_session_untouched() {
        let mut s = session();
        play(&mut s, &[1]);
        let before = s.current_state().clone();

        let store = MemoryStore::with_blob("not json at all");
        assert!(matches!(s.restore(&store), Err(StoryError::Persistence(_))));
        assert!(matches!(
            s.restore(&MemoryStore::new()),
            Err(StoryError::Persistence(_))
        ));
        assert_eq!(s.current_state(), &before);
        assert_eq!(s.phase(), &Phase::Choosing(SceneId::Cafeteria));
    }

    #[test]
    fn restore_falls_back_to_last_choice_target() {
        let blob = r#"{
            "stress": 19, "kindness": 32, "focus": 47, "courage": 30,
            "history": [
                {"scene": "wake", "choice": "Rush out without breakfast"},
                {"scene": "street", "choice": "Ignore Mia and head to exam"}
            ]
        }"#;
        let mut s = session();
        assert_eq!(
            s.restore(&MemoryStore::with_blob(blob)).unwrap(),
            SceneId::ExamEntrance
        );
    }

    #[test]
    fn restore_skips_recorded_scene_missing_from_graph() {
        let scenes = crate::script::scenes()
            .into_iter()
            .filter(|sc| sc.id != SceneId::MiaMeet)
            .collect();
        let graph = SceneGraph::from_scenes(SceneId::Wake, scenes);
        let mut s = SessionController::start(
            graph,
            SessionConfig::default(),
            Screen::default(),
            Speaker::default(),
        )
        .unwrap();

        let blob = r#"{
            "stress": 19, "kindness": 32, "focus": 47, "courage": 30,
            "scene": "miaMeet",
            "history": [
                {"scene": "wake", "choice": "Rush out without breakfast"},
                {"scene": "street", "choice": "Ignore Mia and head to exam"}
            ]
        }"#;
        assert_eq!(
            s.restore(&MemoryStore::with_blob(blob)).unwrap(),
            SceneId::ExamEntrance
        );
        assert_eq!(s.phase(), &Phase::Choosing(SceneId::ExamEntrance));
    }

    #[test]
    fn restore_without_history_starts_at_entry() {
        let blob = r#"{"stress": 1, "kindness": 2, "focus": 3, "courage": 4, "history": []}"#;
        let mut s = session();
        play(&mut s, &[1]);
        assert_eq!(s.restore(&MemoryStore::with_blob(blob)).unwrap(), SceneId::Wake);
        assert_eq!(s.current_state().courage, 4);
    }

    #[test]
    fn reset_starts_over() {
        let mut s = session();
        play(&mut s, &[1, 0, 2, 0, 1, 1, 0, 0]);
        s.reset().unwrap();
        assert_eq!(s.phase(), &Phase::Choosing(SceneId::Wake));
        assert_eq!(s.current_state(), &PlayerState::new());
        assert!(s.ending().is_none());
    }

    #[test]
    fn summary_reflects_run() {
        let mut s = session();
        play(&mut s, &[0, 1, 2, 1, 2, 0, 1, 1]);
        let summary = s.summary();
        assert_eq!(summary.ending, Some(Ending::Isolation));
        assert_eq!(summary.history.len(), 8);
    }
}
