//! Behavioural tests for the ranker over a SQLite repository.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use cityguide_core::test_support::write_sqlite_database;
use cityguide_core::{Place, Query, RawPlace, ResultLimit, SqlitePlaceRepository};
use cityguide_ranker::{PlacePage, RankError, RankedPlace, Ranker};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

/// Shared state for ranking scenarios.
struct RankingWorld {
    temp_dir: TempDir,
    places: RefCell<Vec<RawPlace>>,
    results: RefCell<Vec<RankedPlace>>,
    page: RefCell<Option<PlacePage>>,
    context: RefCell<Vec<Place>>,
    error: RefCell<Option<RankError>>,
}

impl RankingWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            places: RefCell::new(Vec::new()),
            results: RefCell::new(Vec::new()),
            page: RefCell::new(None),
            context: RefCell::new(Vec::new()),
            error: RefCell::new(None),
        }
    }

    fn database_path(&self) -> PathBuf {
        self.temp_dir.path().join("places.db")
    }

    fn persist(&self) {
        let path = self.database_path();
        if path.exists() {
            std::fs::remove_file(&path).expect("replace database");
        }
        write_sqlite_database(&path, &self.places.borrow(), &HashMap::new())
            .expect("persist database");
    }

    fn ranker(&self) -> Ranker<SqlitePlaceRepository> {
        let repository =
            SqlitePlaceRepository::open(self.database_path()).expect("open repository");
        Ranker::new(repository)
    }

    fn recommend(&self, query: &Query) {
        match self.ranker().recommend_places(query) {
            Ok(results) => {
                self.results.replace(results);
            }
            Err(err) => {
                self.error.replace(Some(err));
            }
        }
    }
}

#[fixture]
fn world() -> RankingWorld {
    RankingWorld::new()
}

fn stored(id: &str, name: &str, category: &str, lat: f64, lng: f64) -> RawPlace {
    RawPlace::default()
        .with("id", id)
        .with("name", name)
        .with("category", category)
        .with("lat", lat)
        .with("lng", lng)
}

#[given("a SQLite database with Victoria Memorial and Park Street")]
fn given_database(world: &RankingWorld) {
    world.places.replace(vec![
        stored("a", "Victoria Memorial", "monument", 22.545, 88.342),
        stored("b", "Park Street", "food", 22.552, 88.352)
            .with("sentiment_tags", r#"["food","nightlife"]"#),
    ]);
    world.persist();
}

#[given("the database also holds Howrah Bridge")]
fn given_bridge(world: &RankingWorld) {
    world
        .places
        .borrow_mut()
        .push(stored("c", "Howrah Bridge", "landmark", 22.585, 88.347));
    world.persist();
}

#[when("I search for \"victoria\"")]
fn when_search(world: &RankingWorld) {
    let results = world.ranker().search_places(&Query::text("victoria"));
    world.results.replace(results);
}

#[when("I ask for one recommendation at Victoria Memorial")]
fn when_recommend_here(world: &RankingWorld) {
    let query = Query::default()
        .near(22.545, 88.342)
        .with_limit(ResultLimit::new(1));
    world.recommend(&query);
}

#[when("I ask for food recommendations at Park Street")]
fn when_recommend_food(world: &RankingWorld) {
    world.recommend(&Query::default().near(22.552, 88.352).with_tags(["food"]));
}

#[when("I ask for recommendations without a coordinate")]
fn when_recommend_nowhere(world: &RankingWorld) {
    world.recommend(&Query::default().with_tags(["food"]));
}

#[when("I list the first page")]
fn when_list(world: &RankingWorld) {
    let page = world.ranker().list_places(&Query::default());
    world.page.replace(Some(page));
}

#[when("I select chat context for \"Tell me about Howrah Bridge timings\"")]
fn when_chat(world: &RankingWorld) {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let context = world
        .ranker()
        .select_chat_context_with_rng("Tell me about Howrah Bridge timings", &mut rng);
    world.context.replace(context);
}

#[then("the results are Victoria Memorial")]
fn then_memorial_only(world: &RankingWorld) {
    let results = world.results.borrow();
    let names: Vec<_> = results.iter().map(|r| r.place.name.as_str()).collect();
    assert_eq!(names, vec!["Victoria Memorial"]);
}

#[then("the first result is 0 km away")]
fn then_zero_distance(world: &RankingWorld) {
    let results = world.results.borrow();
    let first = results.first().expect("a result");
    let distance = first.distance_km.expect("distance attached");
    assert!(distance.abs() < 0.005, "distance was {distance}");
}

#[then("the first result is Park Street with score 1.3")]
#[expect(clippy::float_arithmetic, reason = "approximate score comparison")]
fn then_park_street(world: &RankingWorld) {
    let results = world.results.borrow();
    let first = results.first().expect("a result");
    assert_eq!(first.place.name, "Park Street");
    assert!((first.score - 1.3).abs() < 1e-9, "score was {}", first.score);
}

#[then("the request is rejected as invalid")]
fn then_rejected(world: &RankingWorld) {
    assert!(matches!(
        *world.error.borrow(),
        Some(RankError::InvalidRequest(_))
    ));
    assert!(world.results.borrow().is_empty());
}

#[then("the page holds Park Street then Victoria Memorial out of 2")]
fn then_page(world: &RankingWorld) {
    let page = world.page.borrow();
    let page = page.as_ref().expect("a page");
    let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Park Street", "Victoria Memorial"]);
    assert_eq!(page.total, 2);
    assert_eq!(page.page, 1);
}

#[then("the chat context includes Howrah Bridge")]
fn then_chat(world: &RankingWorld) {
    assert!(
        world
            .context
            .borrow()
            .iter()
            .any(|place| place.name == "Howrah Bridge")
    );
}

#[scenario(path = "tests/features/ranking.feature", index = 0)]
fn search_by_name(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 1)]
fn recommend_here(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 2)]
fn recommend_with_tags(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 3)]
fn recommend_without_coordinate(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 4)]
fn listing(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 5)]
fn chat_context(world: RankingWorld) {
    let _ = world;
}
