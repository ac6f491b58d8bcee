use rand::Rng;
use rand::seq::SliceRandom;

use super::classifier::MoodTag;

pub const PRODUCT_PLACEHOLDER: &str = "{product}";

const RAINY_HOT: &[&str] = &[
    "Sticky rain outside? Cool off with {product}.",
    "Warm drizzle calls for an icy {product}.",
    "Let the storm pass while you enjoy {product}.",
];

const RAINY: &[&str] = &[
    "Rainy day, cozy table: {product} is waiting for you.",
    "Nothing beats the rain like a warm {product}.",
    "Stay dry and treat yourself to {product}.",
];

const LATE_NIGHT: &[&str] = &[
    "Still awake? {product} keeps the night going.",
    "Midnight craving solved: {product}.",
];

const MORNING: &[&str] = &[
    "Start the day right with {product}.",
    "Good morning! {product} pairs perfectly with sunrise.",
    "Fuel up early with {product}.",
];

const SUNSET: &[&str] = &[
    "Golden hour tastes better with {product}.",
    "Watch the sunset with {product} in hand.",
    "End the afternoon on a high note: {product}.",
];

const NIGHT_PARTY: &[&str] = &[
    "The night is young. Share {product} with your crew.",
    "Party mode on: {product} is tonight's favorite.",
    "Toast the evening with {product}.",
];

const HOT_DAY: &[&str] = &[
    "It's scorching out there. Refresh yourself with {product}.",
    "Beat the heat with an ice-cold {product}.",
    "Sun's blazing, {product} is chilling.",
];

const PLEASANT_DAY: &[&str] = &[
    "Perfect weather for {product}.",
    "A beautiful day deserves {product}.",
    "Take a break and enjoy {product} in the sunshine.",
];

const COLD_DAY: &[&str] = &[
    "Chilly out? Warm up with {product}.",
    "Cool breeze, warm heart: {product}.",
    "Bundle up and order {product}.",
];

const STANDARD: &[&str] = &[
    "Today's pick: {product}.",
    "You can't go wrong with {product}.",
    "Try our {product}, a house favorite.",
];

/// Ordered templates for a mood. Every list is non-empty.
pub fn templates(mood: MoodTag) -> &'static [&'static str] {
    match mood {
        MoodTag::RainyHot => RAINY_HOT,
        MoodTag::Rainy => RAINY,
        MoodTag::LateNight => LATE_NIGHT,
        MoodTag::Morning => MORNING,
        MoodTag::Sunset => SUNSET,
        MoodTag::NightParty => NIGHT_PARTY,
        MoodTag::HotDay => HOT_DAY,
        MoodTag::PleasantDay => PLEASANT_DAY,
        MoodTag::ColdDay => COLD_DAY,
        MoodTag::Standard => STANDARD,
    }
}

pub fn select_phrase(mood: MoodTag) -> &'static str {
    select_phrase_with(mood, &mut rand::thread_rng())
}

pub fn select_phrase_with<R: Rng + ?Sized>(mood: MoodTag, rng: &mut R) -> &'static str {
    let bank = templates(mood);
    bank.choose(rng)
        .or_else(|| STANDARD.first())
        .copied()
        .unwrap_or("{product}")
}

/// Substitute the product's display name verbatim. Escaping for HTML is the
/// caller's job.
pub fn render(template: &str, product_name: &str) -> String {
    template.replacen(PRODUCT_PLACEHOLDER, product_name, 1)
}
