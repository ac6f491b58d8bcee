use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Marketing-copy category derived from the local time and the weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MoodTag {
    RainyHot,
    Rainy,
    LateNight,
    Morning,
    Sunset,
    NightParty,
    HotDay,
    PleasantDay,
    ColdDay,
    /// Never produced by [`classify`]; the bank used for unrecognized tags.
    Standard,
}

pub const HOT_THRESHOLD: f64 = 28.0;
pub const PLEASANT_THRESHOLD: f64 = 24.0;

const SUNSET_START: u32 = 17 * 60;
const SUNSET_END: u32 = 20 * 60;

/// Classify the moment into exactly one mood. Rules are evaluated top to
/// bottom and the first match wins.
pub fn classify(hour: u32, minute: u32, temperature: f64, is_raining: bool) -> MoodTag {
    if is_raining {
        return if temperature >= HOT_THRESHOLD {
            MoodTag::RainyHot
        } else {
            MoodTag::Rainy
        };
    }

    let minutes_of_day = hour.saturating_mul(60).saturating_add(minute);

    if hour < 5 {
        MoodTag::LateNight
    } else if hour < 8 {
        MoodTag::Morning
    } else if (SUNSET_START..SUNSET_END).contains(&minutes_of_day) {
        MoodTag::Sunset
    } else if hour >= 20 {
        MoodTag::NightParty
    } else if temperature >= HOT_THRESHOLD {
        MoodTag::HotDay
    } else if temperature >= PLEASANT_THRESHOLD {
        MoodTag::PleasantDay
    } else {
        // NaN readings land here too
        MoodTag::ColdDay
    }
}

impl MoodTag {
    pub const ALL: [MoodTag; 10] = [
        MoodTag::RainyHot,
        MoodTag::Rainy,
        MoodTag::LateNight,
        MoodTag::Morning,
        MoodTag::Sunset,
        MoodTag::NightParty,
        MoodTag::HotDay,
        MoodTag::PleasantDay,
        MoodTag::ColdDay,
        MoodTag::Standard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodTag::RainyHot => "rainy_hot",
            MoodTag::Rainy => "rainy",
            MoodTag::LateNight => "late_night",
            MoodTag::Morning => "morning",
            MoodTag::Sunset => "sunset",
            MoodTag::NightParty => "night_party",
            MoodTag::HotDay => "hot_day",
            MoodTag::PleasantDay => "pleasant_day",
            MoodTag::ColdDay => "cold_day",
            MoodTag::Standard => "standard",
        }
    }

    /// Lenient parse: anything unrecognized maps to [`MoodTag::Standard`].
    pub fn parse(tag: &str) -> MoodTag {
        let tag = tag.trim();
        MoodTag::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(tag))
            .unwrap_or(MoodTag::Standard)
    }
}

impl fmt::Display for MoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_dominates_every_hour() {
        for hour in 0..24 {
            for temperature in [-5.0, 10.0, 24.0, 27.0, 28.0, 40.0] {
                let mood = classify(hour, 30, temperature, true);
                let expected = if temperature >= 28.0 {
                    MoodTag::RainyHot
                } else {
                    MoodTag::Rainy
                };
                assert_eq!(mood, expected, "hour={hour} temp={temperature}");
            }
        }
    }

    #[test]
    fn every_minute_resolves_to_a_produced_tag() {
        for hour in 0..24 {
            for minute in 0..60 {
                for raining in [false, true] {
                    let mood = classify(hour, minute, 22.5, raining);
                    assert_ne!(mood, MoodTag::Standard);
                }
            }
        }
    }

    #[test]
    fn sunset_window_edges() {
        assert_eq!(classify(16, 59, 30.0, false), MoodTag::HotDay);
        assert_eq!(classify(17, 0, 30.0, false), MoodTag::Sunset);
        assert_eq!(classify(19, 59, 10.0, false), MoodTag::Sunset);
        assert_eq!(classify(20, 0, 10.0, false), MoodTag::NightParty);
    }

    #[test]
    fn early_hours() {
        assert_eq!(classify(0, 0, 30.0, false), MoodTag::LateNight);
        assert_eq!(classify(4, 59, 30.0, false), MoodTag::LateNight);
        assert_eq!(classify(5, 0, 30.0, false), MoodTag::Morning);
        assert_eq!(classify(7, 59, 30.0, false), MoodTag::Morning);
        assert_eq!(classify(8, 0, 30.0, false), MoodTag::HotDay);
    }

    #[test]
    fn daytime_temperature_edges() {
        assert_eq!(classify(12, 0, 28.0, false), MoodTag::HotDay);
        assert_eq!(classify(12, 0, 27.99, false), MoodTag::PleasantDay);
        assert_eq!(classify(12, 0, 24.0, false), MoodTag::PleasantDay);
        assert_eq!(classify(12, 0, 23.99, false), MoodTag::ColdDay);
    }

    #[test]
    fn rainy_temperature_edges() {
        assert_eq!(classify(12, 0, 28.0, true), MoodTag::RainyHot);
        assert_eq!(classify(12, 0, 27.0, true), MoodTag::Rainy);
    }

    #[test]
    fn out_of_range_clock_values_do_not_overflow() {
        assert_eq!(classify(u32::MAX, u32::MAX, 20.0, false), MoodTag::NightParty);
        assert_eq!(classify(19, u32::MAX, 20.0, false), MoodTag::ColdDay);
    }

    #[test]
    fn parse_falls_back_to_standard() {
        assert_eq!(MoodTag::parse("sunset"), MoodTag::Sunset);
        assert_eq!(MoodTag::parse(" HOT_DAY "), MoodTag::HotDay);
        assert_eq!(MoodTag::parse("thunder_dome"), MoodTag::Standard);
        assert_eq!(MoodTag::parse(""), MoodTag::Standard);
    }
}
