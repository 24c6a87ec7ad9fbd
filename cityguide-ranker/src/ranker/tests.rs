//! Unit coverage for the ranking orchestrator.
#![expect(
    clippy::float_arithmetic,
    reason = "tests compare floating-point scores"
)]

use std::fmt;

use cityguide_core::{
    FetchWindow, MemoryPlaceRepository, PageRequest, PlaceFilter, PlaceRepository, Query,
    RawPlace, RequestValidationError, ResultLimit,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::{fixture, rstest};

use super::Ranker;
use crate::{RankError, RankerConfig, Ranking};

fn raw(id: &str, name: &str, category: &str, lat: f64, lng: f64) -> RawPlace {
    RawPlace::default()
        .with("id", id)
        .with("name", name)
        .with("category", category)
        .with("lat", lat)
        .with("lng", lng)
}

#[fixture]
fn city() -> MemoryPlaceRepository {
    let mut repository = MemoryPlaceRepository::with_places([
        raw("b", "Park Street", "food", 22.552, 88.352).with("sentiment_tags", "food, nightlife"),
        raw("a", "Victoria Memorial", "monument", 22.545, 88.342)
            .with("sentiment_tags", r#"["heritage","museum"]"#)
            .with("description", "Marble hall near the Maidan"),
        raw("c", "Howrah Bridge", "landmark", 22.585, 88.347)
            .with("history", "Opened in 1943 over the Hooghly"),
        raw("d", "Indian Museum", "museum", 22.558, 88.351),
    ]);
    repository.insert_images("a", ["https://img/vm-1.jpg", "https://img/vm-2.jpg"]);
    repository
}

fn names<'a>(items: impl IntoIterator<Item = &'a cityguide_core::Place>) -> Vec<&'a str> {
    items.into_iter().map(|place| place.name.as_str()).collect()
}

#[rstest]
fn search_returns_only_matching_places(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let results = ranker.search_places(&Query::text("victoria"));
    assert_eq!(names(results.iter().map(|r| &r.place)), vec!["Victoria Memorial"]);
    assert!(results.iter().all(|r| r.distance_km.is_none()));
}

#[rstest]
fn search_orders_by_score_then_name(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    // "Indian Museum" matches the name (40) and category (25); the memorial
    // matches through its tags (30).
    let results = ranker.search_places(&Query::text("museum"));
    assert_eq!(
        names(results.iter().map(|r| &r.place)),
        vec!["Indian Museum", "Victoria Memorial"]
    );
    assert!((results[0].score - 65.0).abs() < 1e-9);
}

#[rstest]
fn search_ties_break_by_name() {
    let ranker = Ranker::new(MemoryPlaceRepository::with_places([
        raw("1", "Prinsep Ghat", "river", 22.56, 88.33),
        raw("2", "Babu Ghat", "river", 22.56, 88.34),
    ]));
    let results = ranker.search_places(&Query::text("ghat"));
    assert_eq!(
        names(results.iter().map(|r| &r.place)),
        vec!["Babu Ghat", "Prinsep Ghat"]
    );
    assert!((results[0].score - results[1].score).abs() < f64::EPSILON);
}

#[rstest]
fn blank_search_returns_name_order(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let results = ranker.search_places(&Query::text("").with_limit(ResultLimit::new(2)));
    assert_eq!(
        names(results.iter().map(|r| &r.place)),
        vec!["Howrah Bridge", "Indian Museum"]
    );
    assert!(results.iter().all(|r| r.score.abs() < f64::EPSILON));
}

#[rstest]
fn search_honours_category_filter(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let results = ranker.search_places(&Query::text("museum").with_category("monument"));
    assert_eq!(names(results.iter().map(|r| &r.place)), vec!["Victoria Memorial"]);
}

#[rstest]
fn search_attaches_relation_images(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let results = ranker.search_places(&Query::text("victoria"));
    let place = &results[0].place;
    assert_eq!(place.images.len(), 2);
    assert_eq!(place.primary_image(), Some("https://img/vm-1.jpg"));
}

#[rstest]
fn recommend_prefers_nearest(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let query = Query::default()
        .near(22.545, 88.342)
        .with_limit(ResultLimit::new(1));
    let results = ranker.recommend_places(&query).expect("valid request");
    assert_eq!(names(results.iter().map(|r| &r.place)), vec!["Victoria Memorial"]);
    assert_eq!(results[0].distance_km, Some(0.0));
}

#[rstest]
fn recommend_adds_tag_bonus(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let query = Query::default().near(22.552, 88.352).with_tags(["food"]);
    let results = ranker.recommend_places(&query).expect("valid request");
    let first = &results[0];
    assert_eq!(first.place.name, "Park Street");
    assert!((first.score - 1.3).abs() < 1e-9);
    assert!(results.iter().all(|r| r.distance_km.is_some()));
}

#[rstest]
fn recommend_keeps_far_places_rankable(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    // Over 1000 km away every proximity score is zero; only tags separate.
    let query = Query::default().near(13.0, 80.0).with_tags(["heritage"]);
    let results = ranker.recommend_places(&query).expect("valid request");
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].place.name, "Victoria Memorial");
    assert_eq!(
        names(results.iter().skip(1).map(|r| &r.place)),
        vec!["Howrah Bridge", "Indian Museum", "Park Street"]
    );
}

#[rstest]
fn recommend_requires_coordinate(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let err = ranker
        .recommend_places(&Query::default())
        .expect_err("coordinate required");
    assert_eq!(
        err,
        RankError::InvalidRequest(RequestValidationError::MissingCoordinate)
    );
}

#[rstest]
fn listing_pages_in_name_order(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let query = Query::default().with_page(PageRequest::new(2, ResultLimit::new(3)));
    let page = ranker.list_places(&query);
    assert_eq!(names(&page.items), vec!["Victoria Memorial"]);
    assert_eq!((page.page, page.page_size, page.total), (2, 3, 4));
}

#[rstest]
fn listing_filters_by_tag_text(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let page = ranker.list_places(&Query::default().with_category("nightlife"));
    assert_eq!(names(&page.items), vec!["Park Street"]);
    assert_eq!(page.total, 1);
}

#[rstest]
fn rank_selects_mode_from_query(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    assert!(matches!(
        ranker.rank(&Query::default()),
        Ok(Ranking::Listing(_))
    ));
    assert!(matches!(
        ranker.rank(&Query::text("bridge")),
        Ok(Ranking::Ranked(results)) if results.len() == 1
    ));
    assert!(matches!(
        ranker.rank(&Query::default().near(95.0, 0.0)),
        Err(RankError::InvalidRequest(
            RequestValidationError::InvalidCoordinate { .. }
        ))
    ));
}

#[rstest]
fn chat_context_matches_keywords(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let context =
        ranker.select_chat_context_with_rng("Tell me about Howrah Bridge timings", &mut rng);
    assert_eq!(names(&context), vec!["Howrah Bridge"]);
}

#[rstest]
fn chat_context_searches_history(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let context = ranker.select_chat_context_with_rng("hooghly crossings", &mut rng);
    assert_eq!(names(&context), vec!["Howrah Bridge"]);
}

#[rstest]
fn chat_context_falls_back_to_sample(city: MemoryPlaceRepository) {
    let config = RankerConfig {
        chat_fallback_sample: 2,
        ..RankerConfig::default()
    };
    let ranker = Ranker::with_config(city, config);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let context = ranker.select_chat_context_with_rng("zzz qqq", &mut rng);
    assert_eq!(context.len(), 2);
    assert_ne!(context[0].id, context[1].id);
}

#[rstest]
fn chat_sample_is_deterministic_for_a_seed(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let first = ranker.select_chat_context_with_rng("xyz", &mut ChaCha8Rng::seed_from_u64(42));
    let second = ranker.select_chat_context_with_rng("xyz", &mut ChaCha8Rng::seed_from_u64(42));
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[rstest]
fn chat_context_caps_matches() {
    let places = (0..20).map(|index| {
        raw(
            &format!("{index:02}"),
            &format!("Ghat {index:02}"),
            "river",
            22.5,
            88.3,
        )
    });
    let ranker = Ranker::new(MemoryPlaceRepository::with_places(places));
    let context = ranker.select_chat_context_with_rng("ghat walks", &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(context.len(), 8);
    assert_eq!(context[0].name, "Ghat 00");
}

fn numbered(prefix: &str, count: usize) -> impl Iterator<Item = RawPlace> + '_ {
    (0..count).map(move |index| {
        raw(
            &format!("{prefix}-{index:04}"),
            &format!("{prefix} {index:04}"),
            "river",
            22.5,
            88.3,
        )
    })
}

#[rstest]
fn chat_context_finds_matches_beyond_the_first_window() {
    let places = numbered("Alpha", 800).chain(std::iter::once(raw(
        "howrah",
        "Howrah Bridge",
        "landmark",
        22.585,
        88.347,
    )));
    let ranker = Ranker::new(MemoryPlaceRepository::with_places(places));
    let context = ranker.select_chat_context_with_rng(
        "Tell me about Howrah Bridge timings",
        &mut ChaCha8Rng::seed_from_u64(3),
    );
    assert_eq!(names(&context), vec!["Howrah Bridge"]);
}

#[rstest]
fn chat_scan_pages_through_small_windows() {
    let config = RankerConfig {
        chat_scan_window: 3,
        ..RankerConfig::default()
    };
    let ranker = Ranker::with_config(
        MemoryPlaceRepository::with_places(numbered("Ghat", 20)),
        config,
    );
    let context = ranker.select_chat_context_with_rng("ghat walks", &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(context.len(), 8);
    assert_eq!(context[0].name, "Ghat 0000");
    assert_eq!(context[7].name, "Ghat 0007");
}

#[rstest]
fn chat_fallback_samples_the_whole_corpus() {
    let config = RankerConfig {
        chat_scan_window: 2,
        chat_fallback_sample: 30,
        ..RankerConfig::default()
    };
    let ranker = Ranker::with_config(
        MemoryPlaceRepository::with_places(numbered("Ghat", 20)),
        config,
    );
    let context = ranker.select_chat_context_with_rng("zzz qqq", &mut ChaCha8Rng::seed_from_u64(5));
    let mut ids: Vec<_> = context.iter().map(|place| place.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[rstest]
fn recommend_pool_is_capped_in_name_order() {
    // The nearest place sorts last by name and falls outside a pool of two.
    let repository = MemoryPlaceRepository::with_places([
        raw("1", "Alipore", "zoo", 22.53, 88.33),
        raw("2", "Ballygunge", "market", 22.52, 88.36),
        raw("3", "Zoo Gate", "zoo", 22.545, 88.342),
    ]);
    let config = RankerConfig {
        recommend_pool: 2,
        ..RankerConfig::default()
    };
    let ranker = Ranker::with_config(repository, config);
    let results = ranker
        .recommend_places(&Query::default().near(22.545, 88.342))
        .expect("valid request");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.place.name != "Zoo Gate"));
}

/// Repository whose reads always fail.
struct Unavailable;

#[derive(Debug)]
struct Outage;

impl fmt::Display for Outage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("repository unavailable")
    }
}

impl std::error::Error for Outage {}

impl PlaceRepository for Unavailable {
    type Error = Outage;

    fn fetch_by_filter(
        &self,
        _filter: &PlaceFilter,
        _window: FetchWindow,
    ) -> Result<Vec<RawPlace>, Self::Error> {
        Err(Outage)
    }

    fn fetch_images(&self, _place_id: &str) -> Result<Vec<String>, Self::Error> {
        Err(Outage)
    }

    fn count_by_filter(&self, _filter: &PlaceFilter) -> Result<usize, Self::Error> {
        Err(Outage)
    }
}

#[rstest]
fn repository_failures_yield_empty_results() {
    let ranker = Ranker::new(Unavailable);
    assert!(ranker.search_places(&Query::text("bridge")).is_empty());
    assert!(
        ranker
            .recommend_places(&Query::default().near(22.5, 88.3))
            .expect("valid request")
            .is_empty()
    );
    let page = ranker.list_places(&Query::default());
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert!(ranker.select_chat_context("bridge").is_empty());
}

#[rstest]
fn ranked_places_serialise_flat(city: MemoryPlaceRepository) {
    let ranker = Ranker::new(city);
    let searched = ranker.search_places(&Query::text("victoria"));
    let json = serde_json::to_value(&searched[0]).expect("serialise");
    assert_eq!(json["name"], "Victoria Memorial");
    assert_eq!(json["coordinate"]["lat"], 22.545);
    assert!(json.get("score").is_some());
    assert!(json.get("distance_km").is_none());

    let recommended = ranker
        .recommend_places(&Query::default().near(22.545, 88.342))
        .expect("valid request");
    let json = serde_json::to_value(&recommended[0]).expect("serialise");
    assert_eq!(json["distance_km"], 0.0);
}
