//! Three-word room names, e.g. `brave-quiet-otter`

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "amber", "ancient", "bold", "brave", "bright", "calm", "clever", "cosmic", "crimson", "daring",
    "dusty", "eager", "fancy", "fierce", "gentle", "gilded", "grim", "hidden", "hollow", "humble",
    "icy", "jolly", "lucky", "misty", "mossy", "noble", "odd", "quiet", "rusty", "silent",
    "silver", "sly", "stormy", "swift", "tidy", "velvet", "wandering", "wild", "wise", "zesty",
];

const NOUNS: &[&str] = &[
    "badger", "bard", "beacon", "cavern", "cleric", "comet", "crow", "dagger", "dragon", "dungeon",
    "falcon", "fox", "goblin", "golem", "griffin", "harbor", "hydra", "keep", "knight", "lantern",
    "mimic", "moon", "otter", "owl", "phoenix", "raven", "rogue", "scroll", "serpent", "sphinx",
    "tavern", "tower", "troll", "unicorn", "wizard", "wolf", "wyvern", "yeti", "zephyr", "kraken",
];

/// Draw a random `adjective-adjective-noun` name
pub fn generate_room_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    // Lists are non-empty constants so `choose` always yields a word
    let first = ADJECTIVES.choose(rng).copied().unwrap_or("lucky");
    let second = ADJECTIVES.choose(rng).copied().unwrap_or("brave");
    let noun = NOUNS.choose(rng).copied().unwrap_or("dragon");
    format!("{}-{}-{}", first, second, noun)
}

/// Plain three-word draws before falling back to numbered names
const PLAIN_ATTEMPTS: usize = 64;
/// Numbered draws before giving up
const NUMBERED_ATTEMPTS: usize = 64;

/// Draw names until one is not already taken.
///
/// Once plain names keep colliding, a numeric suffix is added
/// (`brave-quiet-otter-4821`). `None` when every attempt collided.
pub fn generate_unique_room_name<R, F>(rng: &mut R, is_taken: F) -> Option<String>
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    for _ in 0..PLAIN_ATTEMPTS {
        let name = generate_room_name(rng);
        if !is_taken(&name) {
            return Some(name);
        }
    }

    for _ in 0..NUMBERED_ATTEMPTS {
        let name = format!("{}-{}", generate_room_name(rng), rng.gen_range(0..10_000u32));
        if !is_taken(&name) {
            return Some(name);
        }
    }

    None
}
