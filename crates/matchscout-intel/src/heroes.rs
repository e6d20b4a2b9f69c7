// Hero catalogue: the single race-to-hero table used by every rule.

use crate::model::Race;

/// A catalogued hero. `race` is `None` for tavern (neutral) heroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub race: Option<Race>,
    /// Badge title used when this is the player's main hero.
    pub badge_title: &'static str,
}

const fn hero(
    id: &'static str,
    name: &'static str,
    race: Option<Race>,
    badge_title: &'static str,
) -> HeroInfo {
    HeroInfo {
        id,
        name,
        race,
        badge_title,
    }
}

/// Upstream hero ids. `bansheeranger` (the Dark Ranger) is filed under Night
/// Elf to keep the main-hero badge available to Night Elf players who hire
/// it; every other tavern hero is neutral and only counts for Random.
pub const CATALOGUE: &[HeroInfo] = &[
    hero("archmage", "Archmage", Some(Race::Human), "🧙 Master of Magic"),
    hero("mountainking", "Mountain King", Some(Race::Human), "⛵ Mountain Ship"),
    hero("paladin", "Paladin", Some(Race::Human), "⚔️ Knight of Light"),
    hero("bloodmage", "Blood Mage", Some(Race::Human), "🩸 Blood Mage"),
    hero("blademaster", "Blademaster", Some(Race::Orc), "🥷 Bamboo Master"),
    hero("farseer", "Far Seer", Some(Race::Orc), "👁️ Far Seer"),
    hero("taurenchieftain", "Tauren Chieftain", Some(Race::Orc), "🐂 Chieftain of the Tribe"),
    hero("shadowhunter", "Shadow Hunter", Some(Race::Orc), "🏹 Shadow Hunter"),
    hero("demonhunter", "Demon Hunter", Some(Race::NightElf), "🦸 I Am the Demon Hunter"),
    hero("keeperofthegrove", "Keeper of the Grove", Some(Race::NightElf), "🌳 Keeper of the Grove"),
    hero("moonpriestess", "Priestess of the Moon", Some(Race::NightElf), "🌙 Moon Priestess"),
    hero("warden", "Warden", Some(Race::NightElf), "🦉 Warden"),
    hero("bansheeranger", "Dark Ranger", Some(Race::NightElf), "👻 Banshee Ranger"),
    hero("deathknight", "Death Knight", Some(Race::Undead), "💀 Coil and You're Dead"),
    hero("dreadlord", "Dreadlord", Some(Race::Undead), "👹 Dreadlord"),
    hero("lich", "Lich", Some(Race::Undead), "❄️ Lich King"),
    hero("cryptlord", "Crypt Lord", Some(Race::Undead), "🕷️ Lord of the Crypts"),
    hero("alchemist", "Goblin Alchemist", None, "⚗️ Alchemist"),
    hero("avatarofflame", "Firelord", None, "🔥 Firelord"),
    hero("beastmaster", "Beastmaster", None, "🐻 Beastmaster"),
    hero("pandarenbrewmaster", "Pandaren Brewmaster", None, "🍺 Brewmaster"),
    hero("pitlord", "Pit Lord", None, "😈 Pit Lord"),
    hero("seawitch", "Naga Sea Witch", None, "🐍 Sea Witch"),
    hero("tinker", "Goblin Tinker", None, "🔧 Tinker"),
];

pub fn lookup(hero_id: &str) -> Option<&'static HeroInfo> {
    CATALOGUE.iter().find(|h| h.id == hero_id)
}

/// Whether `hero_id` is a legal main-hero candidate for a player of `race`.
///
/// Random players may field anything, including heroes missing from the
/// catalogue. Other races are restricted to their own catalogued heroes.
pub fn allowed_for(race: Race, hero_id: &str) -> bool {
    if race == Race::Random {
        return true;
    }
    lookup(hero_id).is_some_and(|h| h.race == Some(race))
}
