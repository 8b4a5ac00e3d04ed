//! The scene graph and its validation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{StoryError, StoryResult};
use crate::scene::{Choice, Scene, SceneId, Target};
use crate::script;

/// Fewest choices a scene may offer.
pub const MIN_CHOICES: usize = 2;
/// Most choices a scene may offer.
pub const MAX_CHOICES: usize = 3;
/// Longest allowed run of scenes from the entry to an ending.
pub const MAX_PATH_LEN: usize = 9;

/// A structural problem found by [`SceneGraph::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphProblem {
    /// The entry scene is not in the table.
    MissingEntry(SceneId),
    /// A scene offers too few or too many choices.
    ChoiceCount {
        /// Offending scene.
        scene: SceneId,
        /// Number of choices it has.
        count: usize,
    },
    /// A choice points at a scene that is not in the table.
    DanglingTarget {
        /// Scene holding the choice.
        scene: SceneId,
        /// Missing target.
        target: SceneId,
    },
    /// A scene can be revisited.
    Cycle(SceneId),
    /// No ending can be reached from a scene.
    DeadEnd(SceneId),
    /// A scene cannot be reached from the entry.
    Unreachable(SceneId),
    /// Some path from the entry is longer than allowed.
    TooLong(usize),
}

impl fmt::Display for GraphProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEntry(id) => write!(f, "entry scene '{id}' is not defined"),
            Self::ChoiceCount { scene, count } => write!(
                f,
                "scene '{scene}' has {count} choices (expected {MIN_CHOICES}-{MAX_CHOICES})"
            ),
            Self::DanglingTarget { scene, target } => {
                write!(f, "scene '{scene}' leads to undefined scene '{target}'")
            }
            Self::Cycle(id) => write!(f, "scene '{id}' is part of a cycle"),
            Self::DeadEnd(id) => write!(f, "no ending is reachable from '{id}'"),
            Self::Unreachable(id) => write!(f, "scene '{id}' is unreachable"),
            Self::TooLong(len) => {
                write!(f, "longest path visits {len} scenes (max {MAX_PATH_LEN})")
            }
        }
    }
}

/// The fixed table of scenes and the transitions between them.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    entry: SceneId,
    scenes: BTreeMap<SceneId, Scene>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SceneGraph {
    /// The story as shipped, entering at `wake`.
    pub fn builtin() -> Self {
        Self::from_scenes(SceneId::Wake, script::scenes())
    }

    /// Build a graph from an arbitrary scene list. Later duplicates replace
    /// earlier ones.
    pub fn from_scenes(entry: SceneId, scenes: Vec<Scene>) -> Self {
        Self {
            entry,
            scenes: scenes.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    /// The scene a new session starts in.
    pub fn entry(&self) -> SceneId {
        self.entry
    }

    /// Look up a scene.
    pub fn get(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(&id)
    }

    /// Look up a scene, failing if it is not defined.
    pub fn scene(&self, id: SceneId) -> StoryResult<&Scene> {
        self.get(id)
            .ok_or_else(|| StoryError::UnknownScene(id.to_string()))
    }

    /// All scenes, in id order.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the graph has no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Narration and choices for a scene.
    pub fn present(&self, id: SceneId) -> StoryResult<(&str, &[Choice])> {
        let scene = self.scene(id)?;
        Ok((scene.narration.as_str(), scene.choices.as_slice()))
    }

    /// The choice at `index` (zero-based) in a scene.
    pub fn select(&self, id: SceneId, index: usize) -> StoryResult<&Choice> {
        let scene = self.scene(id)?;
        scene.choices.get(index).ok_or(StoryError::InvalidChoice {
            index,
            available: scene.choices.len(),
        })
    }

    /// Where a recorded choice led.
    pub fn target_of(&self, id: SceneId, label: &str) -> Option<Target> {
        self.get(id)?
            .choices
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.target)
    }

    /// Distinct scenes reachable in one step from `id`.
    pub fn successors(&self, id: SceneId) -> Vec<SceneId> {
        let mut next = BTreeSet::new();
        if let Some(scene) = self.get(id) {
            for choice in &scene.choices {
                if let Target::Scene(target) = choice.target {
                    next.insert(target);
                }
            }
        }
        next.into_iter().collect()
    }

    /// Whether any choice in `id` ends the story.
    pub fn is_terminal(&self, id: SceneId) -> bool {
        self.get(id).is_some_and(|s| {
            s.choices
                .iter()
                .any(|c| matches!(c.target, Target::Ending(_)))
        })
    }

    /// Every distinct scene sequence from the entry to an ending scene.
    ///
    /// Stops descending at revisits, so a cyclic graph still terminates.
    pub fn paths(&self) -> Vec<Vec<SceneId>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        if self.get(self.entry).is_some() {
            self.walk(self.entry, &mut current, &mut out);
        }
        out
    }

    fn walk(&self, id: SceneId, current: &mut Vec<SceneId>, out: &mut Vec<Vec<SceneId>>) {
        if current.contains(&id) {
            return;
        }
        current.push(id);
        if self.is_terminal(id) {
            out.push(current.clone());
        }
        for next in self.successors(id) {
            if self.get(next).is_some() {
                self.walk(next, current, out);
            }
        }
        current.pop();
    }

    /// Number of scenes on the longest path from the entry to an ending.
    pub fn longest_path(&self) -> usize {
        self.paths().iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check the structural rules every story must satisfy.
    pub fn validate(&self) -> Vec<GraphProblem> {
        let mut problems = Vec::new();

        if self.get(self.entry).is_none() {
            problems.push(GraphProblem::MissingEntry(self.entry));
            return problems;
        }

        for scene in self.scenes() {
            let count = scene.choices.len();
            if !(MIN_CHOICES..=MAX_CHOICES).contains(&count) {
                problems.push(GraphProblem::ChoiceCount {
                    scene: scene.id,
                    count,
                });
            }
            let dangling = scene.choices.iter().filter_map(|c| match c.target {
                Target::Scene(target) if self.get(target).is_none() => Some(target),
                _ => None,
            });
            for target in dangling {
                problems.push(GraphProblem::DanglingTarget {
                    scene: scene.id,
                    target,
                });
            }
        }

        for id in self.cyclic_scenes() {
            problems.push(GraphProblem::Cycle(id));
        }

        let can_end = self.scenes_reaching_an_ending();
        for scene in self.scenes() {
            if !can_end.contains(&scene.id) {
                problems.push(GraphProblem::DeadEnd(scene.id));
            }
        }

        let reachable = self.reachable_from_entry();
        for scene in self.scenes() {
            if !reachable.contains(&scene.id) {
                problems.push(GraphProblem::Unreachable(scene.id));
            }
        }

        let longest = self.longest_path();
        if longest > MAX_PATH_LEN {
            problems.push(GraphProblem::TooLong(longest));
        }

        problems
    }

    fn reachable_from_entry(&self) -> BTreeSet<SceneId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![self.entry];
        while let Some(id) = stack.pop() {
            if self.get(id).is_none() || !seen.insert(id) {
                continue;
            }
            stack.extend(self.successors(id));
        }
        seen
    }

    fn scenes_reaching_an_ending(&self) -> BTreeSet<SceneId> {
        let mut can_end: BTreeSet<SceneId> = self
            .scenes()
            .filter(|s| self.is_terminal(s.id))
            .map(|s| s.id)
            .collect();
        loop {
            let before = can_end.len();
            for scene in self.scenes() {
                if self
                    .successors(scene.id)
                    .iter()
                    .any(|next| can_end.contains(next))
                {
                    can_end.insert(scene.id);
                }
            }
            if can_end.len() == before {
                return can_end;
            }
        }
    }

    fn cyclic_scenes(&self) -> BTreeSet<SceneId> {
        // A scene is on a cycle when it can reach itself.
        self.scenes()
            .map(|s| s.id)
            .filter(|&id| {
                let mut seen = BTreeSet::new();
                let mut stack = self.successors(id);
                while let Some(next) = stack.pop() {
                    if next == id {
                        return true;
                    }
                    if seen.insert(next) {
                        stack.extend(self.successors(next));
                    }
                }
                false
            })
            .collect()
    }
}
