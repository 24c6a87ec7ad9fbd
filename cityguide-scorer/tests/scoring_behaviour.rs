//! Behavioural coverage for the scoring signals.

use std::cell::{Cell, RefCell};

use cityguide_core::{Place, Query, Scorer};
use cityguide_scorer::{GeoProximityScorer, TagAffinityScorer, TextRelevanceScorer};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const PARK_STREET: Coord<f64> = Coord {
    x: 88.352,
    y: 22.552,
};

#[fixture]
fn place() -> RefCell<Option<Place>> {
    RefCell::new(None)
}

#[fixture]
fn result() -> Cell<f64> {
    Cell::new(f64::NAN)
}

fn score_with(place: &RefCell<Option<Place>>, result: &Cell<f64>, scorer: &dyn Scorer, query: &Query) {
    let borrowed = place.borrow();
    let Some(candidate) = borrowed.as_ref() else {
        panic!("a place should be defined before scoring");
    };
    result.set(scorer.score(candidate, query));
}

#[given("the monument Victoria Memorial")]
fn given_monument(#[from(place)] place: &RefCell<Option<Place>>) {
    place.replace(Some(Place::new(
        "1",
        "Victoria Memorial",
        "monument",
        Coord {
            x: 88.342,
            y: 22.545,
        },
    )));
}

#[given("the food street Park Street")]
fn given_street(#[from(place)] place: &RefCell<Option<Place>>) {
    place.replace(Some(Place::new("2", "Park Street", "food", PARK_STREET)));
}

#[given("the food street Park Street tagged food and nightlife")]
fn given_tagged_street(#[from(place)] place: &RefCell<Option<Place>>) {
    place.replace(Some(
        Place::new("2", "Park Street", "food", PARK_STREET).with_tags(["food", "nightlife"]),
    ));
}

fn score_text(text: &str, place: &RefCell<Option<Place>>, result: &Cell<f64>) {
    score_with(place, result, &TextRelevanceScorer::default(), &Query::text(text));
}

#[when("I score it for the text victoria memorial")]
fn when_full_name(#[from(place)] place: &RefCell<Option<Place>>, #[from(result)] result: &Cell<f64>) {
    score_text("victoria memorial", place, result);
}

#[when("I score it for the text memorial")]
fn when_partial_name(
    #[from(place)] place: &RefCell<Option<Place>>,
    #[from(result)] result: &Cell<f64>,
) {
    score_text("memorial", place, result);
}

#[when("I score its proximity from its own coordinate")]
fn when_proximity_here(
    #[from(place)] place: &RefCell<Option<Place>>,
    #[from(result)] result: &Cell<f64>,
) {
    let query = Query::default().near(PARK_STREET.y, PARK_STREET.x);
    score_with(place, result, &GeoProximityScorer::default(), &query);
}

#[when("I score its proximity from 50 km north")]
fn when_proximity_far(
    #[from(place)] place: &RefCell<Option<Place>>,
    #[from(result)] result: &Cell<f64>,
) {
    // Half a degree of latitude is roughly 55 km.
    let query = Query::default().near(23.052, PARK_STREET.x);
    score_with(place, result, &GeoProximityScorer::default(), &query);
}

#[when("I score it for the tags food, nightlife and museum")]
fn when_tags(#[from(place)] place: &RefCell<Option<Place>>, #[from(result)] result: &Cell<f64>) {
    let query = Query::default().with_tags(["food", "nightlife", "museum"]);
    score_with(place, result, &TagAffinityScorer::default(), &query);
}

#[then("the score is {expected:f64}")]
#[expect(clippy::float_arithmetic, reason = "approximate score comparison")]
fn then_score(expected: f64, #[from(result)] result: &Cell<f64>) {
    let actual = result.get();
    assert!(
        (actual - expected).abs() <= 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[scenario(path = "tests/features/scoring.feature", index = 0)]
fn exact_name(place: RefCell<Option<Place>>, result: Cell<f64>) {
    let _ = (place, result);
}

#[scenario(path = "tests/features/scoring.feature", index = 1)]
fn substring_name(place: RefCell<Option<Place>>, result: Cell<f64>) {
    let _ = (place, result);
}

#[scenario(path = "tests/features/scoring.feature", index = 2)]
fn proximity_here(place: RefCell<Option<Place>>, result: Cell<f64>) {
    let _ = (place, result);
}

#[scenario(path = "tests/features/scoring.feature", index = 3)]
fn proximity_far(place: RefCell<Option<Place>>, result: Cell<f64>) {
    let _ = (place, result);
}

#[scenario(path = "tests/features/scoring.feature", index = 4)]
fn tag_bonus(place: RefCell<Option<Place>>, result: Cell<f64>) {
    let _ = (place, result);
}
