use std::path::Path;

use lectern::document::Document;
use lectern::i18n::LocalizationStore;
use lectern::models::FontSize;
use lectern::state::{PreferenceStore, State};
use lectern::viewer::{Startup, Viewer};
use tempfile::TempDir;

fn open(db: &Path) -> Viewer<State> {
    Viewer::new(
        Document::bundled().unwrap(),
        LocalizationStore::bundled().unwrap(),
        State::open(db).unwrap(),
        "voxSacra",
    )
    .unwrap()
}

#[test]
fn test_choice_survives_restart() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("prefs").join("states.db");

    let mut viewer = open(&db);
    assert_eq!(viewer.start(), Startup::FirstRun);
    assert!(viewer.chrome().language.is_open());
    assert_eq!(viewer.document().lang(), "en");
    viewer.choose_first_run_language("ko");
    assert!(!viewer.chrome().language.is_open());
    drop(viewer);

    let mut viewer = open(&db);
    assert_eq!(viewer.start(), Startup::Restored("ko".to_string()));
    assert!(!viewer.chrome().language.is_open());
    assert_eq!(viewer.document().label(), "말씀과 성가");
    assert_eq!(viewer.active_language_button(), Some("ko"));
}

#[test]
fn test_unknown_choice_stores_resolved_code() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("states.db");

    let mut viewer = open(&db);
    viewer.start();
    assert_eq!(viewer.choose_first_run_language("de"), "en");
    let state = viewer.into_persistence();
    assert_eq!(state.load("voxSacraLanguage").unwrap().as_deref(), Some("en"));
    assert!(state.stored_at("voxSacraLanguage").unwrap().is_some());
}

#[test]
fn test_font_size_is_never_stored() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("states.db");

    let mut viewer = open(&db);
    viewer.start();
    viewer.set_font_size(FontSize::Large);
    assert_eq!(viewer.document().font_size(), FontSize::Large);
    drop(viewer);

    let mut viewer = open(&db);
    assert_eq!(viewer.start(), Startup::FirstRun);
    assert_eq!(viewer.document().font_size(), FontSize::Medium);
}

#[test]
fn test_reset_brings_back_first_run() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("states.db");

    let mut viewer = open(&db);
    viewer.start();
    viewer.set_language("ko");
    viewer.reset_language().unwrap();
    drop(viewer);

    let mut viewer = open(&db);
    assert_eq!(viewer.start(), Startup::FirstRun);
    assert_eq!(viewer.document().lang(), "en");
}
