use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::Product;

const MIN_TOKEN_LEN: usize = 4;

/// Lower-case and strip diacritics so "Piña Colada" and "pina colada" compare equal.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

fn tokens(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= MIN_TOKEN_LEN)
        .collect()
}

fn haystack(product: &Product) -> String {
    let description = product.description.as_deref().unwrap_or_default();
    normalize(&format!(
        "{} {} {}",
        product.name, description, product.category
    ))
}

/// Resolve free text (usually an AI answer) to one of `candidates`.
///
/// An exact normalized-name match always wins. Otherwise every candidate is
/// scored by how many input words longer than three characters appear in its
/// name, description or category; the strictly highest score wins and ties
/// keep the earliest candidate. Returns `None` when nothing scores.
pub fn best_match<'a>(text: &str, candidates: &'a [Product]) -> Option<&'a Product> {
    if candidates.is_empty() {
        return None;
    }

    let needle = normalize(text);
    let trimmed = needle.trim();

    if let Some(exact) = candidates
        .iter()
        .find(|product| normalize(&product.name).trim() == trimmed)
    {
        return Some(exact);
    }

    let words = tokens(trimmed);
    if words.is_empty() {
        return None;
    }

    let mut best: Option<(&Product, usize)> = None;
    for product in candidates {
        let hay = haystack(product);
        let score = words.iter().filter(|word| hay.contains(**word)).count();
        if score == 0 {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((product, score)),
        }
    }

    best.map(|(product, _)| product)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::Availability;

    fn product(name: &str, description: &str, category: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some(description.to_string()),
            price: 4500,
            category: category.to_string(),
            active: true,
            availability: Availability::Available,
            featured: false,
            image_url: None,
            trivia: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn normalize_strips_accents_and_case() {
        assert_eq!(normalize("Piña Colada CAFÉ"), "pina colada cafe");
    }

    #[test]
    fn exact_name_beats_keyword_score() {
        let menu = vec![
            product(
                "Tropical Storm",
                "mango mango passion fruit chamoy mango smoothie",
                "Smoothies",
            ),
            product("Mango Smoothie", "plain", "Drinks"),
        ];
        let found = best_match("mango smoothie", &menu).expect("match");
        assert_eq!(found.name, "Mango Smoothie");
    }

    #[test]
    fn exact_match_ignores_accents() {
        let menu = vec![
            product("Limonada", "lemon", "Drinks"),
            product("Piña Loca", "pineapple", "Drinks"),
        ];
        let found = best_match("  PINA loca ", &menu).expect("match");
        assert_eq!(found.name, "Piña Loca");
    }

    #[test]
    fn keyword_scoring_picks_highest() {
        let menu = vec![
            product("Choco Frappe", "chocolate blended with milk", "Frappes"),
            product("Berry Blast", "strawberry blueberry yogurt smoothie", "Smoothies"),
        ];
        let found = best_match(
            "I recommend a refreshing strawberry smoothie with yogurt",
            &menu,
        )
        .expect("match");
        assert_eq!(found.name, "Berry Blast");
    }

    #[test]
    fn ties_keep_the_earliest_candidate() {
        let menu = vec![
            product("Iced Latte", "coffee", "Coffee"),
            product("Cold Brew", "coffee", "Coffee"),
        ];
        let found = best_match("some coffee please", &menu).expect("match");
        assert_eq!(found.name, "Iced Latte");
    }

    #[test]
    fn short_words_do_not_score() {
        let menu = vec![product("Tea", "hot tea", "Tea")];
        assert!(best_match("a tea for me", &menu).is_none());
    }

    #[test]
    fn empty_candidates_never_match() {
        assert!(best_match("mango smoothie", &[]).is_none());
        assert!(best_match("", &[]).is_none());
    }
}
