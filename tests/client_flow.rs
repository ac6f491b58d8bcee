use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::{FixedOffset, TimeZone, Utc};
use menu_shaker_api::{
    client::{
        ClientError, InventoryStore, LocalStore, MenuApiClient, MenuSearch, MenuStore, NoticeLevel, ReviewThrottle,
        VisitTracker,
    },
    config::{AiConfig, WeatherConfig},
    dto::{
        products::SetFlagRequest,
        reviews::CreateReviewRequest,
        visits::{DeviceTraits, VisitRecorded},
    },
    integrations::{
        ai::{AiClient, AiError, MenuEntry},
        weather::WeatherClient,
    },
    models::{Availability, Product, Review},
    mood::{MoodTag, classify},
    response::ApiResponse,
};
use serde_json::{Value, json};
use uuid::Uuid;

#[derive(Default)]
struct Storefront {
    products: Mutex<Vec<Product>>,
    down: AtomicBool,
    reject_writes: AtomicBool,
    image_hits: AtomicUsize,
    visit_hits: AtomicUsize,
    review_hits: AtomicUsize,
    menu_hits: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

type Shared = Arc<Storefront>;

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn sample(name: &str, featured: bool) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: name.into(),
        description: Some(format!("{name} of the house")),
        price: 4500,
        category: "Drinks".into(),
        active: true,
        availability: Availability::Available,
        featured,
        image_url: None,
        trivia: None,
        created_at: Utc::now(),
    }
}

async fn menu(State(shop): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Response {
    if shop.down.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
    }
    shop.menu_hits.fetch_add(1, Ordering::SeqCst);
    let q = params.get("q").map(|q| q.to_lowercase());
    *shop.last_query.lock().unwrap() = q.clone();
    let products: Vec<Product> = shop
        .products
        .lock()
        .unwrap()
        .iter()
        .filter(|p| q.as_ref().is_none_or(|q| p.name.to_lowercase().contains(q.as_str())))
        .cloned()
        .collect();
    Json(ApiResponse::success("Menu", products, None)).into_response()
}

async fn set_featured(
    State(shop): State<Shared>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetFlagRequest>,
) -> Response {
    if shop.reject_writes.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Database error", "data": null, "meta": null })),
        )
            .into_response();
    }
    let mut products = shop.products.lock().unwrap();
    match products.iter_mut().find(|p| p.id == id) {
        Some(product) => {
            product.featured = body.value;
            Json(ApiResponse::success("Featured updated", product.clone(), None)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn image(State(shop): State<Shared>) -> Response {
    shop.image_hits.fetch_add(1, Ordering::SeqCst);
    ([(header::CONTENT_TYPE, "image/png")], b"png-bytes".to_vec()).into_response()
}

async fn review(
    State(shop): State<Shared>,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateReviewRequest>,
) -> Json<ApiResponse<Review>> {
    shop.review_hits.fetch_add(1, Ordering::SeqCst);
    Json(ApiResponse::success(
        "Thanks for your review",
        Review {
            id: Uuid::new_v4(),
            product_id: id,
            author_name: body.author_name,
            comment: body.comment,
            rating: body.rating,
            created_at: Utc::now(),
        },
        None,
    ))
}

async fn visit(State(shop): State<Shared>, Json(body): Json<Value>) -> Json<ApiResponse<VisitRecorded>> {
    shop.visit_hits.fetch_add(1, Ordering::SeqCst);
    let client_id = body["client_id"]
        .as_str()
        .and_then(|raw| raw.parse().ok());
    Json(ApiResponse::success(
        "Visit recorded",
        VisitRecorded {
            client_id: client_id.unwrap_or_else(Uuid::new_v4),
            visit_id: Uuid::new_v4(),
            new_client: client_id.is_none(),
        },
        None,
    ))
}

async fn storefront(products: Vec<Product>) -> (Shared, String) {
    let shop: Shared = Arc::new(Storefront {
        products: Mutex::new(products),
        ..Default::default()
    });
    let router = Router::new()
        .route("/api/menu", get(menu))
        .route("/api/admin/products/{id}/featured", patch(set_featured))
        .route("/api/menu/{id}/reviews", post(review))
        .route("/api/visits", post(visit))
        .route("/storage/products/{file}", get(image))
        .with_state(shop.clone());
    let base = spawn(router).await;
    (shop, base)
}

#[tokio::test]
async fn failed_featured_toggle_is_rolled_back() {
    let mango = sample("Mango Tango", false);
    let (shop, base) = storefront(vec![mango.clone(), sample("Horchata", true)]).await;
    let api = MenuApiClient::new(&base).unwrap();

    let mut inventory = InventoryStore::new();
    inventory.set_products(api.menu(None, None).await.unwrap());
    let before = inventory.items().to_vec();

    shop.reject_writes.store(true, Ordering::SeqCst);
    let result = inventory
        .toggle_featured(mango.id, |id, change| api.apply_flag(id, change))
        .await;
    assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
    assert_eq!(inventory.items(), before.as_slice());
    let notices = inventory.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);

    shop.reject_writes.store(false, Ordering::SeqCst);
    inventory
        .toggle_featured(mango.id, |id, change| api.apply_flag(id, change))
        .await
        .unwrap();
    assert!(inventory.get(mango.id).unwrap().featured);
    assert_eq!(inventory.take_notices()[0].level, NoticeLevel::Info);
    let remote = shop.products.lock().unwrap().clone();
    assert!(remote.iter().any(|p| p.id == mango.id && p.featured));
}

#[tokio::test]
async fn menu_falls_back_to_cache_when_server_is_down() {
    let (shop, base) = storefront(vec![sample("Mango Tango", true)]).await;
    let api = MenuApiClient::new(&base).unwrap();

    let fresh = api.menu(None, None).await.unwrap();
    shop.down.store(true, Ordering::SeqCst);
    let cached = api.menu(None, None).await.unwrap();
    assert_eq!(fresh, cached);

    // A client that never saw the menu has nothing to fall back on.
    let cold = MenuApiClient::new(&base).unwrap();
    assert!(matches!(cold.menu(None, None).await, Err(ClientError::Offline)));
}

#[tokio::test]
async fn images_are_fetched_once() {
    let (shop, base) = storefront(Vec::new()).await;
    let api = MenuApiClient::new(&base).unwrap();

    let first = api.image("/storage/products/abc.png?v=1").await.unwrap();
    let second = api.image("/storage/products/abc.png?v=1").await.unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(second.body, b"png-bytes");
    assert_eq!(second.content_type.as_deref(), Some("image/png"));
    assert_eq!(shop.image_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn review_throttle_and_visit_cooldown_skip_the_network() {
    let (shop, base) = storefront(Vec::new()).await;
    let api = MenuApiClient::new(&base).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut store = LocalStore::open(dir.path().join("local.json")).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 18, 30, 0).unwrap();

    let product_id = Uuid::new_v4();
    let review = CreateReviewRequest {
        author_name: "Ana".into(),
        comment: "So fresh".into(),
        rating: 5,
    };
    let throttle = ReviewThrottle::default();
    let created = api
        .submit_review(&mut store, &throttle, product_id, &review, now)
        .await
        .unwrap();
    assert_eq!(created.product_id, product_id);

    let again = api
        .submit_review(&mut store, &throttle, product_id, &review, now + chrono::Duration::hours(1))
        .await;
    assert!(matches!(again, Err(ClientError::Throttled { .. })));
    assert_eq!(shop.review_hits.load(Ordering::SeqCst), 1);

    let tracker = VisitTracker::default();
    let device = DeviceTraits {
        user_agent: "Mozilla/5.0".into(),
        locale: "es-MX".into(),
        screen_width: 390,
        screen_height: 844,
        color_depth: 24,
        timezone_offset: 360,
    };
    let recorded = api
        .record_visit(&mut store, &tracker, device.clone(), now)
        .await
        .unwrap()
        .expect("first visit is sent");
    assert!(recorded.new_client);
    let skipped = api
        .record_visit(&mut store, &tracker, device.clone(), now + chrono::Duration::minutes(5))
        .await
        .unwrap();
    assert!(skipped.is_none());
    let later = api
        .record_visit(&mut store, &tracker, device, now + chrono::Duration::hours(2))
        .await
        .unwrap()
        .expect("cooldown elapsed");
    assert_eq!(later.client_id, recorded.client_id);
    assert_eq!(shop.visit_hits.load(Ordering::SeqCst), 2);
}

async fn ai_endpoint(Json(body): Json<Value>) -> Json<Value> {
    if body["token"] != "shared-token" {
        return Json(json!({ "success": false, "error": "bad token" }));
    }
    match body["action"].as_str() {
        Some("generate_trivia") => Json(json!({
            "success": true,
            "data": { "trivia": format!("  {} dates back to 1920.  ", body["product_name"].as_str().unwrap_or("?")) }
        })),
        Some("pair_flavor") => Json(json!({
            "success": true,
            "data": {
                "product_id": body["menu"][0]["id"],
                "reason": "sweet cravings"
            }
        })),
        _ => Json(json!({ "success": true })),
    }
}

#[tokio::test]
async fn ai_client_speaks_the_script_protocol() {
    let base = spawn(Router::new().route("/", post(ai_endpoint))).await;
    let client = |token: &str| {
        AiClient::new(
            &AiConfig {
                endpoint_url: format!("{base}/"),
                token: token.into(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    };

    let ai = client("shared-token");
    let trivia = ai.generate_trivia("Horchata", "rice drink").await.unwrap();
    assert_eq!(trivia, "Horchata dates back to 1920.");

    let menu = vec![MenuEntry {
        id: Uuid::new_v4(),
        name: "Horchata".into(),
        category: "Drinks".into(),
    }];
    let pairing = ai.pair_flavor(&["sweet".to_string()], &menu).await.unwrap();
    assert_eq!(pairing.product_id, Some(menu[0].id));
    assert_eq!(pairing.reason.as_deref(), Some("sweet cravings"));

    let rejected = client("wrong").generate_trivia("Horchata", "").await;
    assert!(matches!(rejected, Err(AiError::Rejected(msg)) if msg == "bad token"));
}

#[tokio::test]
async fn weather_reading_drives_the_mood() {
    let router = Router::new().route(
        "/",
        get(|| async {
            Json(json!({ "current_weather": { "temperature": 29.5, "weathercode": 63 } }))
        }),
    );
    let base = spawn(router).await;
    let weather = WeatherClient::new(
        &WeatherConfig {
            url: format!("{base}/"),
            latitude: 19.43,
            longitude: -99.13,
            utc_offset: FixedOffset::west_opt(6 * 3600).unwrap(),
        },
        Duration::from_secs(5),
    )
    .unwrap();

    // 18:00 UTC is noon at UTC-6.
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
    let context = weather.current(now).await;
    assert_eq!((context.hour, context.minute), (12, 0));
    assert!(context.is_raining);
    assert_eq!(
        classify(context.hour, context.minute, context.temperature, context.is_raining),
        MoodTag::RainyHot
    );
}

#[tokio::test]
async fn typing_burst_runs_one_search() {
    let (shop, base) = storefront(vec![sample("Mango Tango", true), sample("Horchata", false)]).await;
    let api = Arc::new(MenuApiClient::new(&base).unwrap());
    let store = Arc::new(tokio::sync::Mutex::new(MenuStore::new()));
    store.lock().await.set_products(api.menu(None, None).await.unwrap());
    shop.menu_hits.store(0, Ordering::SeqCst);

    let search = MenuSearch::spawn(api, store.clone(), Duration::from_millis(50));
    for text in ["m", "ma", "man", "mang", "mango"] {
        assert!(search.input(text));
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(shop.menu_hits.load(Ordering::SeqCst), 1);
    assert_eq!(shop.last_query.lock().unwrap().as_deref(), Some("mango"));
    {
        let store = store.lock().await;
        assert_eq!(store.query(), "mango");
        let names: Vec<_> = store.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mango Tango"]);
    }

    // a failed search keeps the last list but still applies the query locally
    shop.down.store(true, Ordering::SeqCst);
    search.input("horchata");
    search.close().await;
    let store = store.lock().await;
    assert_eq!(store.query(), "horchata");
    assert!(store.visible().is_empty());
}
