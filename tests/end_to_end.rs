mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use route_planner::csv::CsvTable;
use route_planner::render::CardBody;
use route_planner::{
    DatasetLoader, FsTransport, HttpTransport, LoadState, PageConfig, PageController,
    RouteError, SelectionTuple, SubmitOutcome, find_match,
};

use common::{SALINA_CSV, serve_once, site_with};

fn fs_page(site: &tempfile::TempDir, config: PageConfig) -> PageController {
    let loader = DatasetLoader::new(Arc::new(FsTransport::new(site.path())));
    PageController::new(config, loader).expect("preset config is valid")
}

#[test]
fn salina_turda_selection_renders_bullets() {
    let site = site_with(&[("salina_turda_route_recommendations.csv", SALINA_CSV)]);
    let mut page = fs_page(&site, PageConfig::salina_turda());
    assert_eq!(page.load_blocking(), &LoadState::Loaded);

    assert_eq!(page.domains().values("category").unwrap(), ["family", "solo"]);
    assert_eq!(
        page.domains().values("daytime").unwrap(),
        ["evening", "morning"]
    );

    let tuple = SelectionTuple::new()
        .with("category", "solo")
        .with("daytime", "evening");
    let SubmitOutcome::Card(card) = page.submit(&tuple) else {
        panic!("expected a rendered card");
    };
    assert_eq!(card.heading, "solo • evening");
    assert_eq!(card.items(), ["Night tour", "Photography spot"]);
    assert!(card.to_html().contains("<li>Night tour</li><li>Photography spot</li>"));
}

#[test]
fn salina_turda_scenario_matches_renders_and_exports() {
    let csv = "category,daytime,recommendation\n\
family,morning,Visit salt mine|See underground lake\n\
solo,evening,Night tour|Photography spot\n";
    let site = site_with(&[("salina_turda_route_recommendations.csv", csv)]);
    let mut page = fs_page(&site, PageConfig::salina_turda());
    assert_eq!(page.load_blocking(), &LoadState::Loaded);

    let found = page.submit(
        &SelectionTuple::new()
            .with("category", "solo")
            .with("daytime", "evening"),
    );
    assert_eq!(
        found.card().expect("card").items(),
        ["Night tour", "Photography spot"]
    );

    let missing = page.submit(
        &SelectionTuple::new()
            .with("category", "family")
            .with("daytime", "evening"),
    );
    assert_eq!(
        missing,
        SubmitOutcome::NoMatch("No recommendation for this combination.".to_string())
    );

    let Some(route_planner::LoadedContent::Records(dataset)) = page.content() else {
        panic!("csv page loads records");
    };
    let exported = CsvTable::parse(&dataset.to_csv("recommendation"));
    assert_eq!(exported, CsvTable::parse(csv));
}

#[test]
fn byte_order_mark_does_not_hide_the_header() {
    let csv = format!("\u{feff}{SALINA_CSV}");
    let site = site_with(&[("salina_turda_route_recommendations.csv", csv.as_str())]);
    let mut page = fs_page(&site, PageConfig::salina_turda());
    page.load_blocking();
    assert_eq!(page.content().map(|content| content.len()), Some(3));

    let tuple = SelectionTuple::new()
        .with("category", "solo")
        .with("daytime", "evening");
    assert!(page.submit(&tuple).card().is_some());
}

#[test]
fn matching_is_deterministic_and_first_wins() {
    let csv = "category,daytime,recommendation\nsolo,evening,First\nsolo,evening,Second\n";
    let site = site_with(&[("salina_turda_route_recommendations.csv", csv)]);
    let mut page = fs_page(&site, PageConfig::salina_turda());
    page.load_blocking();
    let Some(route_planner::LoadedContent::Records(dataset)) = page.content() else {
        panic!("csv page loads records");
    };
    let tuple = SelectionTuple::new()
        .with("category", "solo")
        .with("daytime", "evening");
    let first = find_match(dataset, &tuple).found().unwrap();
    let again = find_match(dataset, &tuple).found().unwrap();
    assert_eq!(first, again);
    assert_eq!(first.payload, route_planner::Payload::Text("First".to_string()));
}

#[test]
fn timisoara_csv_uses_aliases_and_paragraphs() {
    let csv = "tripType,interest,food,budget,recommendation\n\
Full day,Art,Local,Low,\"Museum of Art\nCafe on Union Square\"\n\
Half day,History,Street,Medium,Fortress walk\n";
    let site = site_with(&[("timisoara_route_recommendations.csv", csv)]);
    let mut page = fs_page(&site, PageConfig::timisoara_csv());
    page.load_blocking();

    assert_eq!(
        page.selectors(),
        vec!["trip_type", "interests", "food", "budget"]
    );
    let tuple = SelectionTuple::new()
        .with("trip_type", "Full day")
        .with("interests", "Art")
        .with("food", "Local")
        .with("budget", "Low");
    let card = page.submit(&tuple).card().cloned().expect("card");
    assert_eq!(card.heading, "Art • Local • Low route");
    assert_eq!(card.icons, vec!["/assets/images/logo/art_route.png"]);
    let html = card.to_html();
    assert!(html.contains("<p>Museum of Art<br>Cafe on Union Square</p>"));
    assert!(html.contains("<img src=\"/assets/images/logo/art_route.png\""));
}

#[test]
fn timisoara_json_flattens_nested_plans() {
    let json = r#"{
        "full_day": {
            "history": {
                "local_specialties": {
                    "low": {
                        "title": "Old town day",
                        "summary": "Squares and bastions",
                        "schedule": [
                            {"time": "09:00", "title": "Union Square", "description": "Baroque facades"},
                            {"time": "12:30", "title": "Lunch", "description": "Sarmale"}
                        ]
                    }
                }
            }
        },
        "evening": {
            "nightlife": {
                "try_everything": {
                    "high": {
                        "title": "Night out",
                        "summary": "Bars",
                        "schedule": []
                    }
                }
            }
        }
    }"#;
    let site = site_with(&[("timisoara_route_recommendations.json", json)]);
    let mut page = fs_page(&site, PageConfig::timisoara_json());
    page.load_blocking();

    assert_eq!(
        page.domains().values("trip_type").unwrap(),
        ["evening", "full_day"]
    );
    let tuple = SelectionTuple::new()
        .with("trip_type", "full_day")
        .with("interest", "history")
        .with("food", "local_specialties")
        .with("budget", "low");
    let card = page.submit(&tuple).card().cloned().expect("card");
    assert_eq!(card.heading, "History • Local Specialties • Low");
    assert_eq!(card.icons, vec!["🕒", "🏰", "🍲", "💸"]);
    let CardBody::Schedule { title, entries, .. } = &card.body else {
        panic!("plan payload renders a schedule");
    };
    assert_eq!(title, "Old town day");
    assert_eq!(entries.len(), 2);
    assert!(card.to_text().contains("12:30 — Lunch"));
}

#[test]
fn alba_iulia_merges_dimension_advice() {
    let json = r#"{
        "Interests": {
            "History": {"alba_iulia_recommendations": ["Citadel", "Union Museum"]},
            "Food": {"alba_iulia_recommendations": ["Local bistro"]}
        },
        "Tour Duration": {
            "Half day": {"alba_iulia_recommendations": ["Citadel", "Coffee break"]}
        }
    }"#;
    let site = site_with(&[("alba_lulia_route_recommendations.json", json)]);
    let mut page = fs_page(&site, PageConfig::alba_iulia());
    page.load_blocking();

    assert_eq!(page.selectors(), vec!["Interests", "Tour Duration"]);
    assert_eq!(
        page.domains().values("Interests").unwrap(),
        ["History", "Food"]
    );

    let incomplete = page.submit(&SelectionTuple::new().with("Interests", "History"));
    assert!(matches!(incomplete, SubmitOutcome::Incomplete { .. }));

    let tuple = SelectionTuple::new()
        .with("Interests", "History")
        .with("Tour Duration", "Half day");
    let card = page.submit(&tuple).card().cloned().expect("card");
    assert_eq!(card.heading, "Your Alba Iulia Route");
    assert_eq!(card.items(), ["Citadel", "Union Museum", "Coffee break"]);
}

#[test]
fn http_load_in_background() {
    let (base, server) = serve_once(200, SALINA_CSV);
    let loader = DatasetLoader::new(Arc::new(HttpTransport::with_base_url(base)));
    let mut page = PageController::new(PageConfig::salina_turda(), loader).unwrap();
    page.start();

    let mut state = page.poll().clone();
    for _ in 0..500 {
        if state.is_resolved() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
        state = page.poll().clone();
    }
    assert_eq!(state, LoadState::Loaded);
    let request = server.join().unwrap();
    assert!(request.starts_with(
        "GET /assets/recommendations/salina_turda_route_recommendations.csv HTTP/1.1"
    ));
    assert_eq!(page.domains().len(), 2);
}

#[test]
fn http_error_status_fails_the_page() {
    let (base, server) = serve_once(404, "not found");
    let loader = DatasetLoader::new(Arc::new(HttpTransport::with_base_url(base)));
    let err = loader.load(&PageConfig::salina_turda()).unwrap_err();
    assert!(matches!(err, RouteError::HttpStatus { status: 404, .. }));
    server.join().unwrap();

    let (base, server) = serve_once(500, "boom");
    let loader = DatasetLoader::new(Arc::new(HttpTransport::with_base_url(base)));
    let mut page = PageController::new(PageConfig::salina_turda(), loader).unwrap();
    assert!(matches!(page.load_blocking(), LoadState::Failed(_)));
    assert_eq!(
        page.submit(&SelectionTuple::new()),
        SubmitOutcome::LoadFailed("Error loading route data.".to_string())
    );
    server.join().unwrap();
}

#[test]
fn malformed_json_is_a_parse_failure() {
    let site = site_with(&[("timisoara_route_recommendations.json", "{ not json")]);
    let loader = DatasetLoader::new(Arc::new(FsTransport::new(site.path())));
    let err = loader.load(&PageConfig::timisoara_json()).unwrap_err();
    assert!(matches!(err, RouteError::Parse { .. }));
}

#[test]
fn discovered_datasets_are_sorted_asset_paths() {
    let site = site_with(&[
        ("timisoara_route_recommendations.json", "{}"),
        ("salina_turda_route_recommendations.csv", SALINA_CSV),
    ]);
    let found = FsTransport::new(site.path()).discover_datasets();
    assert_eq!(
        found,
        vec![
            "/assets/recommendations/salina_turda_route_recommendations.csv",
            "/assets/recommendations/timisoara_route_recommendations.json",
        ]
    );
}
