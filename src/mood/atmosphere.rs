use serde::Serialize;
use utoipa::ToSchema;

use super::classifier::MoodTag;

/// Visual treatment the storefront applies around the hero banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Atmosphere {
    #[schema(value_type = String)]
    pub theme: &'static str,
    #[schema(value_type = String)]
    pub accent: &'static str,
    pub effect: Effect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    None,
    Rain,
    SunRays,
    Stars,
    Fog,
    Confetti,
}

pub fn atmosphere(mood: MoodTag) -> Atmosphere {
    let (theme, accent, effect) = match mood {
        MoodTag::RainyHot => ("tropical-storm", "#1fa2a8", Effect::Rain),
        MoodTag::Rainy => ("rainy", "#5b7c99", Effect::Rain),
        MoodTag::LateNight => ("midnight", "#3b2f63", Effect::Stars),
        MoodTag::Morning => ("sunrise", "#f6b352", Effect::None),
        MoodTag::Sunset => ("golden-hour", "#f2734b", Effect::SunRays),
        MoodTag::NightParty => ("neon", "#d63aff", Effect::Confetti),
        MoodTag::HotDay => ("heatwave", "#ff8c00", Effect::SunRays),
        MoodTag::PleasantDay => ("breezy", "#6cc24a", Effect::None),
        MoodTag::ColdDay => ("chill", "#8fb8de", Effect::Fog),
        MoodTag::Standard => ("default", "#e85d75", Effect::None),
    };
    Atmosphere {
        theme,
        accent,
        effect,
    }
}
