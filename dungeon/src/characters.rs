//! The adventuring party.

use serde_json::json;
use troupe::Persona;

/// Everything needed to set up one D&D character as a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSheet<'a> {
    pub name: &'a str,
    pub race: &'a str,
    pub class: &'a str,
    pub traits: &'a [&'a str],
    pub skills: &'a [&'a str],
    /// `(peer name, how this character sees them)` pairs.
    pub relationships: &'a [(&'a str, &'a str)],
    pub background: &'a str,
    pub goals: &'a str,
}

/// Build a persona from a character sheet. List order is preserved.
pub fn create_dnd_character(sheet: &CharacterSheet<'_>) -> Persona {
    let mut character = Persona::new(sheet.name);
    character.define("race", sheet.race);
    character.define("class", sheet.class);
    character.define("background", sheet.background);
    character.define("goals", sheet.goals);
    character.define_several(
        "personality_traits",
        sheet.traits.iter().map(|t| json!({ "trait": t })),
    );
    character.define_several("skills", sheet.skills.iter().map(|s| json!({ "skill": s })));
    character.define_several(
        "relationships",
        sheet
            .relationships
            .iter()
            .map(|(name, description)| json!({ "name": name, "description": description })),
    );
    character
}

pub const THORIN: CharacterSheet<'static> = CharacterSheet {
    name: "Thorin",
    race: "Dwarf",
    class: "Warrior",
    traits: &["Brave", "Stubborn", "Loyal"],
    skills: &["Masterful axework", "Sturdy defense", "Rallying the party"],
    relationships: &[
        ("Elena", "His teammate, a kind-hearted cleric."),
        ("Shade", "A rogue he does not fully trust but respects."),
    ],
    background: "A miner from the northern mountains who became a warrior defending his home.",
    goals: "Find the legendary Dragon Gem and win glory for his homeland.",
};

pub const ELENA: CharacterSheet<'static> = CharacterSheet {
    name: "Elena",
    race: "Elf",
    class: "Cleric",
    traits: &["Wise", "Merciful", "Devout"],
    skills: &["Healing magic", "Divine smite", "Detect evil"],
    relationships: &[
        ("Thorin", "Her teammate, a steadfast warrior."),
        ("Shade", "A cunning ally with real potential."),
    ],
    background: "A temple scholar who joined the adventure after a divine revelation.",
    goals: "Destroy the ancient evil hidden in the dungeon.",
};

pub const SHADE: CharacterSheet<'static> = CharacterSheet {
    name: "Shade",
    race: "Halfling",
    class: "Rogue",
    traits: &["Cunning", "Quick-witted", "Independent"],
    skills: &["Stealth", "Lockpicking", "Sneak attack"],
    relationships: &[
        ("Thorin", "A teammate he sometimes clashes with, though they respect each other."),
        ("Elena", "A cleric he is a little suspicious of but willing to trust."),
    ],
    background: "A former thief forced into adventuring after a botched heist.",
    goals: "Gather enough wealth to buy back his family's lost estate.",
};

/// The three adventurers, in turn order.
pub const PARTY: [CharacterSheet<'static>; 3] = [THORIN, ELENA, SHADE];
