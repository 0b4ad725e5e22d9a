//! Random narrative events and their resolution.

use rand::Rng;
use troupe::{TroupeError, World};

/// A narrative event: something that happens plus the ways to handle it.
#[derive(Debug, PartialEq, Eq)]
pub struct Event {
    pub description: &'static str,
    pub options: &'static [&'static str],
}

impl Event {
    /// The text broadcast to the party when this event fires.
    pub fn broadcast_message(&self) -> String {
        format!(
            "An event occurs: {} Please discuss the following solutions: {}",
            self.description,
            self.options.join(", ")
        )
    }

    /// The console banner: heading, description, numbered options.
    pub fn banner(&self) -> String {
        let mut out = String::from("\n==== Random Event ====\n\n");
        out.push_str(&format!("Event: {}\n\n", self.description));
        out.push_str("Options:\n");
        for (idx, option) in self.options.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", idx + 1, option));
        }
        out
    }
}

pub static EVENTS: [Event; 4] = [
    Event {
        description: "A rickety rope bridge blocks the way. Decide who will repair it or how to get across.",
        options: &[
            "Thorin uses his strength to try to secure the bridge.",
            "Shade sneaks across and scouts for another route.",
            "Elena uses divine magic to reinforce the bridge.",
        ],
    },
    Event {
        description: "A band of goblins lies in ambush ahead. You must decide whether to fight or sneak past.",
        options: &[
            "Charge in and fight the goblins head-on.",
            "Shade slips ahead to take out the goblin leader and thin their numbers.",
            "Try to negotiate so the goblins let you pass.",
        ],
    },
    Event {
        description: "A magical mechanism in the dungeon suddenly activates and scatters the party. You need to regroup.",
        options: &[
            "Everyone finds a safe spot and tries to regroup.",
            "Use Elena's divine sense to locate the others.",
            "Shade uses his agility to search for everyone else.",
        ],
    },
    Event {
        description: "You discover a treasure, but it seems to carry some kind of curse.",
        options: &[
            "Thorin tries to resist the curse with a warrior's will.",
            "Elena performs a holy purification ritual.",
            "Seal the treasure away and keep moving.",
        ],
    },
];

/// Pick one of the catalog events uniformly at random.
pub fn random_event<R: Rng>(rng: &mut R) -> &'static Event {
    &EVENTS[rng.gen_range(0..EVENTS.len())]
}

/// Announce `event`, let the party discuss it, and advance the world.
pub async fn event_resolution(
    event: &Event,
    world: &mut World,
    steps: usize,
) -> Result<(), TroupeError> {
    print!("{}", event.banner());
    world.broadcast(&event.broadcast_message());
    world.run(steps).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;
    use troupe::{Persona, ScriptedModel};

    #[test]
    fn test_random_event_is_from_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let event = random_event(&mut rng);
            assert!(EVENTS.iter().any(|e| std::ptr::eq(e, event)));
        }
    }

    #[test]
    fn test_random_event_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0usize; 4];
        for _ in 0..20_000 {
            let event = random_event(&mut rng);
            let idx = EVENTS.iter().position(|e| e == event).unwrap();
            counts[idx] += 1;
        }
        for count in counts {
            assert!((4_500..=5_500).contains(&count), "skewed counts: {counts:?}");
        }
    }

    #[test]
    fn test_catalog_shape() {
        for event in &EVENTS {
            assert!(!event.description.is_empty());
            assert!((2..=3).contains(&event.options.len()));
        }
    }

    #[test]
    fn test_broadcast_message_contains_everything() {
        let event = &EVENTS[3];
        let message = event.broadcast_message();

        assert!(message.contains(event.description));
        assert!(message.contains(&event.options.join(", ")));
        assert!(message.ends_with("Seal the treasure away and keep moving."));
    }

    #[test]
    fn test_banner_numbers_options_from_one() {
        let banner = EVENTS[1].banner();

        assert!(banner.contains("==== Random Event ===="));
        assert!(banner.contains(&format!("Event: {}", EVENTS[1].description)));
        assert!(banner.contains("1. Charge in and fight the goblins head-on.\n"));
        assert!(banner.contains("3. Try to negotiate so the goblins let you pass.\n"));
        assert!(!banner.contains("0. "));
    }

    #[tokio::test]
    async fn test_event_resolution_broadcasts_and_runs() {
        let model = Arc::new(ScriptedModel::default());
        let mut world = World::new("Dungeon", vec![Persona::new("Thorin")], model.clone());

        event_resolution(&EVENTS[0], &mut world, 4).await.unwrap();

        assert_eq!(world.broadcasts(), &[EVENTS[0].broadcast_message()]);
        assert_eq!(world.step(), 4);
        assert_eq!(model.calls(), 4);
    }
}
