use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use validator::Validate;

use crate::{
    dto::recommend::{HeroBanner, RecommendationSource, ShakerRequest, ShakerResponse},
    error::{AppError, AppResult},
    integrations::ai::{MenuEntry, Pairing},
    models::{Product, WeatherContext},
    mood::{self, MoodTag},
    response::ApiResponse,
    services::product_service::orderable_products,
    state::AppState,
};

const NO_PRODUCT_NAME: &str = "our house specials";

/// Random featured product among `products`, or any of them when none is
/// featured. Sold-out and inactive products are never picked.
pub fn pick_featured<'a, R: Rng + ?Sized>(products: &'a [Product], rng: &mut R) -> Option<&'a Product> {
    let orderable: Vec<&Product> = products.iter().filter(|p| p.is_orderable()).collect();
    let featured: Vec<&Product> = orderable.iter().copied().filter(|p| p.featured).collect();

    if featured.is_empty() {
        orderable.choose(rng).copied()
    } else {
        featured.choose(rng).copied()
    }
}

pub fn build_banner<R: Rng + ?Sized>(
    weather: WeatherContext,
    products: &[Product],
    rng: &mut R,
) -> HeroBanner {
    let mood = mood::classify(
        weather.hour,
        weather.minute,
        weather.temperature,
        weather.is_raining,
    );
    let product = pick_featured(products, rng).cloned();
    let template = mood::phrases::select_phrase_with(mood, rng);
    let name = product.as_ref().map_or(NO_PRODUCT_NAME, |p| p.name.as_str());

    HeroBanner {
        phrase: mood::render(template, name),
        atmosphere: mood::atmosphere(mood),
        mood,
        product,
        weather,
    }
}

pub async fn hero_banner(state: &AppState, now: DateTime<Utc>) -> AppResult<ApiResponse<HeroBanner>> {
    let weather = state.weather.current(now).await;
    let products = orderable_products(&state.orm).await?;
    let banner = build_banner(weather, &products, &mut rand::thread_rng());
    tracing::debug!(mood = %banner.mood, "hero banner built");
    Ok(ApiResponse::success("Hero", banner, None))
}

/// Resolve an AI pairing (or its absence) to a menu product.
///
/// Order: identifier returned by the AI, then the matcher over the suggested
/// name, the AI's reasoning and finally the cravings themselves, then a random
/// featured pick.
pub fn resolve_pairing<'a, R: Rng + ?Sized>(
    pairing: Option<&Pairing>,
    cravings: &[String],
    products: &'a [Product],
    rng: &mut R,
) -> Option<(&'a Product, RecommendationSource)> {
    if let Some(pairing) = pairing {
        if let Some(found) = pairing
            .product_id
            .and_then(|id| products.iter().find(|p| p.id == id))
        {
            return Some((found, RecommendationSource::Ai));
        }

        let texts = [pairing.product_name.as_deref(), pairing.reason.as_deref()];
        if let Some(found) = texts
            .into_iter()
            .flatten()
            .find_map(|text| mood::best_match(text, products))
        {
            return Some((found, RecommendationSource::Matched));
        }
    }

    if let Some(found) = mood::best_match(&cravings.join(" "), products) {
        return Some((found, RecommendationSource::Matched));
    }

    pick_featured(products, rng).map(|p| (p, RecommendationSource::Fallback))
}

pub async fn shake(state: &AppState, payload: ShakerRequest) -> AppResult<ApiResponse<ShakerResponse>> {
    payload.validate()?;
    let products = orderable_products(&state.orm).await?;
    if products.is_empty() {
        return Err(AppError::NotFound);
    }

    let menu: Vec<MenuEntry> = products
        .iter()
        .map(|p| MenuEntry {
            id: p.id,
            name: p.name.clone(),
            category: p.category.clone(),
        })
        .collect();

    let pairing = match state.ai.pair_flavor(&payload.cravings, &menu).await {
        Ok(pairing) => Some(pairing),
        Err(err) => {
            tracing::warn!(error = %err, "flavor pairing failed, using local matcher");
            None
        }
    };

    let (product, source) = resolve_pairing(
        pairing.as_ref(),
        &payload.cravings,
        &products,
        &mut rand::thread_rng(),
    )
    .ok_or(AppError::NotFound)?;

    let reason = match source {
        RecommendationSource::Fallback => None,
        _ => pairing.and_then(|p| p.reason),
    };

    Ok(ApiResponse::success(
        "Shaken",
        ShakerResponse {
            product: product.clone(),
            reason,
            source,
        },
        None,
    ))
}

/// Mood for an explicit tag string; used for previews.
pub fn mood_preview(tag: &str) -> (MoodTag, &'static str) {
    let mood = MoodTag::parse(tag);
    (mood, mood::select_phrase(mood))
}
