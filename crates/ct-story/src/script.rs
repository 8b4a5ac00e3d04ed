//! The built-in scene table.
//!
//! Nine scenes from waking up late to the final test. Two early branches
//! (street or cafeteria, then meeting Mia or skipping her) rejoin before the
//! exam, and the three choices at the final test carry the path tags the
//! ending resolver reads.

use crate::ending::PathTag;
use crate::player::StateDelta;
use crate::scene::{Choice, Mood, Scene, SceneId, Vision};

/// Delay before the scene advance for choices whose vision overlaps the
/// next scene's arrival.
const DELAYED_ADVANCE_MS: u64 = 900;

/// Build every scene, in story order.
pub fn scenes() -> Vec<Scene> {
    vec![
        wake(),
        street(),
        cafeteria(),
        mia_meet(),
        exam_entrance(),
        exam(),
        after_exam(),
        study_group(),
        final_test(),
    ]
}

fn wake() -> Scene {
    Scene::new(
        SceneId::Wake,
        "Narrator",
        Mood::Calm,
        "You jolt awake — sunlight cuts through your blinds. Today is the midterm you didn't \
         finish preparing for. Your phone vibrates with a message from Mia: 'You coming? I'm lost.'",
    )
    .with_portrait("liam_tired")
    .with_choice(Choice::new(
        "Rush out without breakfast",
        StateDelta::new().stress(6).focus(-8),
        SceneId::Street,
    ))
    .with_choice(Choice::new(
        "Grab a quick bite and go",
        StateDelta::new().stress(2).focus(4).kindness(1),
        SceneId::Cafeteria,
    ))
    .with_choice(
        Choice::new(
            "Message Mia to wait",
            StateDelta::new().courage(-2).focus(-2),
            SceneId::Street,
        )
        .with_vision(
            Vision::new(
                "A flash — you remember leaving a textbook behind once. A small regret lingers.",
                2200,
            )
            .with_advance_after(DELAYED_ADVANCE_MS),
        ),
    )
}

fn street() -> Scene {
    Scene::new(
        SceneId::Street,
        "Narrator",
        Mood::Tense,
        "You run through busy streets, heart pounding. You see Mia in the distance, waving \
         frantically. But a stranger bumps into you — a quick choice decides your morning.",
    )
    .with_portrait("liam_neutral")
    .with_choice(Choice::new(
        "Stop to help the stranger (slow down)",
        StateDelta::new().kindness(2).stress(-3),
        SceneId::MiaMeet,
    ))
    .with_choice(Choice::new(
        "Dash to Mia (don't delay)",
        StateDelta::new().stress(3).focus(3),
        SceneId::MiaMeet,
    ))
    .with_choice(
        Choice::new(
            "Ignore Mia and head to exam",
            StateDelta::new().kindness(-8).stress(4),
            SceneId::ExamEntrance,
        )
        .with_vision(
            Vision::new(
                "You see a ghost of your future: classmates you left behind.",
                2400,
            )
            .with_advance_after(DELAYED_ADVANCE_MS),
        ),
    )
}

fn cafeteria() -> Scene {
    Scene::new(
        SceneId::Cafeteria,
        "Barista",
        Mood::Calm,
        "You grab a sandwich. A barista smiles — 'Good luck!' — and Mia texts: \
         'I found the room but the reviewer is gone.'",
    )
    .with_portrait("liam_neutral")
    .with_choice(Choice::new(
        "Offer Mia your reviewer",
        StateDelta::new().kindness(6).focus(-10).stress(1),
        SceneId::MiaMeet,
    ))
    .with_choice(Choice::new(
        "Say good luck and go",
        StateDelta::new().kindness(-2).stress(1),
        SceneId::MiaMeet,
    ))
}

fn mia_meet() -> Scene {
    Scene::new(
        SceneId::MiaMeet,
        "Mia",
        Mood::Calm,
        "Mia hugs you quickly: 'Thanks for coming. I'm a mess.' She glances at her bag — \
         a review sheet is missing.",
    )
    .with_portrait("mia_smile")
    .with_choice(
        Choice::new(
            "Search with Mia",
            StateDelta::new().kindness(3).focus(-4),
            SceneId::ExamEntrance,
        )
        .with_vision(Vision::new(
            "Your fingers skim an old note — a memory of studying late with Mia.",
            2000,
        )),
    )
    .with_choice(
        Choice::new(
            "Give Mia your notes",
            StateDelta::new().kindness(8).focus(-12).stress(1),
            SceneId::ExamEntrance,
        )
        .with_vision(Vision::new("Mia smiles like sunrise. You feel warmth.", 1800)),
    )
    .with_choice(Choice::new(
        "Ignore and leave for exam",
        StateDelta::new().kindness(-6).courage(2).stress(4),
        SceneId::ExamEntrance,
    ))
}

fn exam_entrance() -> Scene {
    Scene::new(
        SceneId::ExamEntrance,
        "Proctor",
        Mood::Tense,
        "In the exam hall, the proctor warns: 'Any dishonest behavior will be noticed.' \
         You spot Mia's reviewer peeking out. The room hums with pressure.",
    )
    .with_portrait("liam_tired")
    .with_choice(Choice::new(
        "Cover the reviewer (protect Mia)",
        StateDelta::new().kindness(3).courage(2),
        SceneId::Exam,
    ))
    .with_choice(
        Choice::new(
            "Use it quietly (cheat)",
            StateDelta::new().focus(8).stress(5).kindness(-2),
            SceneId::Exam,
        )
        .with_vision(Vision::new(
            "A dark vision: the paper burns, and you can't forget the look on Mia's face.",
            2600,
        )),
    )
    .with_choice(
        Choice::new(
            "Report to proctor (risky honesty)",
            StateDelta::new().courage(8).kindness(-1).stress(3),
            SceneId::Exam,
        )
        .with_vision(Vision::new("A white vision: you stand alone but steady.", 1900)),
    )
}

fn exam() -> Scene {
    Scene::new(
        SceneId::Exam,
        "Narrator",
        Mood::Dark,
        "Pens scratch. Your heart races. You must answer a tricky question in three ways: \
         trust memory, guess, or sneak a peek.",
    )
    .with_portrait("liam_tired")
    .with_choice(
        Choice::new(
            "Trust your memory (honest)",
            StateDelta::new().focus(4).stress(-2).kindness(1),
            SceneId::AfterExam,
        )
        .with_vision(Vision::new(
            "A clear flash — the right formula reveals itself.",
            1400,
        )),
    )
    .with_choice(Choice::new(
        "Guess nervously",
        StateDelta::new().focus(-3).stress(2),
        SceneId::AfterExam,
    ))
    .with_choice(
        Choice::new(
            "Cheat one line",
            StateDelta::new().focus(8).stress(6).kindness(-3),
            SceneId::AfterExam,
        )
        .with_vision(Vision::new(
            "A guilt-spark: faces blur and the classroom grows distant.",
            2400,
        )),
    )
}

fn after_exam() -> Scene {
    Scene::new(
        SceneId::AfterExam,
        "Friend",
        Mood::Hopeful,
        "You step out. The sun is lower. Mia waits outside, trembling. \
         Your choices echo louder now.",
    )
    .with_portrait("liam_neutral")
    .with_choice(
        Choice::new(
            "Comfort Mia",
            StateDelta::new().kindness(4).courage(2),
            SceneId::StudyGroup,
        )
        .with_vision(Vision::new(
            "You dream of a future where you both support each other.",
            2100,
        )),
    )
    .with_choice(Choice::new(
        "Walk away to clear mind",
        StateDelta::new().stress(-3).focus(2),
        SceneId::StudyGroup,
    ))
    .with_choice(Choice::new(
        "Challenge yourself: tutor Mia later",
        StateDelta::new().courage(5).kindness(2).focus(-3),
        SceneId::StudyGroup,
    ))
}

fn study_group() -> Scene {
    Scene::new(
        SceneId::StudyGroup,
        "Narrator",
        Mood::Calm,
        "A few days later, you meet classmates for a study session. The choices you made \
         weigh on conversations — revealing or hiding your path.",
    )
    .with_portrait("liam_strong")
    .with_choice(Choice::new(
        "Openly share how you prepared",
        StateDelta::new().courage(3).kindness(1).focus(2),
        SceneId::FinalTest,
    ))
    .with_choice(Choice::new(
        "Keep quiet about your choices",
        StateDelta::new().courage(-2).stress(2),
        SceneId::FinalTest,
    ))
    .with_choice(
        Choice::new(
            "Confess a mistake and try to make amends",
            StateDelta::new().courage(6).kindness(4).stress(-2),
            SceneId::FinalTest,
        )
        .with_vision(Vision::new(
            "A healing vision: broken things mending slowly.",
            2200,
        )),
    )
}

fn final_test() -> Scene {
    Scene::new(
        SceneId::FinalTest,
        "Proctor",
        Mood::Tense,
        "Final test day arrives — this one matters more. The choices you made earlier \
         influence how others see you and how you see yourself.",
    )
    .with_portrait("liam_neutral")
    .with_choice(Choice::ending(
        "Give honest answers (be brave)",
        StateDelta::new().focus(5).courage(3),
        PathTag::Honest,
    ))
    .with_choice(Choice::ending(
        "Rely on shortcuts (old habit)",
        StateDelta::new().focus(4).stress(-1).kindness(-2),
        PathTag::CheatAgain,
    ))
    .with_choice(Choice::ending(
        "Step out and walk away (reflect)",
        StateDelta::new().courage(-1).stress(-2),
        PathTag::Reflect,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Target;

    #[test]
    fn one_scene_per_id_in_story_order() {
        let ids: Vec<SceneId> = scenes().iter().map(|s| s.id).collect();
        assert_eq!(ids, SceneId::ALL.to_vec());
    }

    #[test]
    fn only_final_test_leads_to_endings() {
        for scene in scenes() {
            let endings = scene
                .choices
                .iter()
                .filter(|c| matches!(c.target, Target::Ending(_)))
                .count();
            if scene.id == SceneId::FinalTest {
                assert_eq!(endings, scene.choices.len());
            } else {
                assert_eq!(endings, 0, "{} leads to an ending", scene.id);
            }
        }
    }

    #[test]
    fn delayed_advances_match_the_timed_transitions() {
        let all = scenes();
        let delayed: Vec<&str> = all
            .iter()
            .flat_map(|s| s.choices.iter())
            .filter(|c| c.vision.as_ref().is_some_and(|v| v.advance_after_ms > 0))
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(
            delayed,
            vec!["Message Mia to wait", "Ignore Mia and head to exam"]
        );
    }

    #[test]
    fn street_can_skip_mia() {
        let street = street();
        assert_eq!(street.choices[2].target, Target::Scene(SceneId::ExamEntrance));
    }
}
