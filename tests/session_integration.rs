use pairshow::combination::Combination;
use pairshow::config::Configuration;
use pairshow::events::Command;
use pairshow::scan::{Gallery, Library};
use pairshow::selection::Category;
use pairshow::session::Session;
use pairshow::tasks::controller;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn cfg(json: &str) -> Configuration {
    Configuration::from_json_str(json).unwrap().validated().unwrap()
}

fn library() -> Library {
    Library {
        videos: vec!["a.mp4".into(), "b.mp4".into()],
        galleries: vec![
            Gallery {
                name: "G1".into(),
                images: vec![PathBuf::from("/g/G1/1.jpg"), PathBuf::from("/g/G1/2.jpg")],
            },
            Gallery {
                name: "G2".into(),
                images: Vec::new(),
            },
        ],
    }
}

fn tagged_cfg() -> Configuration {
    cfg(r#"{
        "vidPath": "/v",
        "namPath": "/g",
        "tags": ["x", "y"],
        "videoRelations": { "a.mp4": { "galleries": ["G1"], "tags": ["x"] } }
    }"#)
}

fn pairs(session: &Session) -> BTreeSet<Combination> {
    session.sequence().as_slice().iter().cloned().collect()
}

#[test]
fn load_selects_everything_and_no_tags() {
    let session = Session::new(&tagged_cfg(), library(), Some(7));
    assert_eq!(session.selection().videos().len(), 2);
    assert_eq!(session.selection().galleries().len(), 2);
    assert!(session.selection().tags().is_empty());
    assert_eq!(
        pairs(&session),
        [("a.mp4", "G1"), ("b.mp4", "G1"), ("b.mp4", "G2")]
            .into_iter()
            .map(|(v, g)| Combination::new(v, g))
            .collect::<BTreeSet<_>>()
    );
    assert_eq!(session.sequence().position(), Some(0));
}

#[test]
fn selection_edits_regenerate_before_returning() {
    let mut session = Session::new(&tagged_cfg(), library(), Some(7));
    let before = session.snapshot().generation;

    assert!(session.select(Category::Tag, "x"));
    assert_eq!(pairs(&session), BTreeSet::from([Combination::new("a.mp4", "G1")]));
    assert_eq!(session.snapshot().generation, before + 1);
    assert_eq!(session.snapshot().combination, Some(Combination::new("a.mp4", "G1")));

    // b.mp4 has no relation entry, hence no tags: excluded by any tag filter.
    assert!(session.deselect(Category::Video, "a.mp4"));
    assert!(session.sequence().is_empty());
    assert_eq!(session.current(), None);
    assert_eq!(session.current_image(), None);
    assert!(!session.timer().is_active());
}

#[test]
fn unknown_names_and_no_op_edits_do_not_regenerate() {
    let mut session = Session::new(&tagged_cfg(), library(), Some(7));
    let generation = session.snapshot().generation;
    assert!(!session.select(Category::Tag, "undeclared"));
    assert!(!session.select(Category::Video, "a.mp4"));
    assert!(!session.deselect(Category::Gallery, "G9"));
    assert_eq!(session.snapshot().generation, generation);
}

#[test]
fn replace_all_and_none() {
    let mut session = Session::new(&tagged_cfg(), library(), Some(7));
    assert!(session.replace(Category::Gallery, &["G2", "nope"]));
    assert_eq!(
        session.selection().galleries(),
        &BTreeSet::from(["G2".to_string()])
    );
    assert_eq!(pairs(&session), BTreeSet::from([Combination::new("b.mp4", "G2")]));

    assert!(session.select_none(Category::Video));
    assert!(session.sequence().is_empty());
    assert!(session.select_all(Category::Video));
    assert!(session.select_all(Category::Gallery));
    assert_eq!(session.sequence().len(), 3);
}

#[test]
fn navigation_resets_the_slideshow() {
    let mut session = Session::new(&tagged_cfg(), library(), Some(7));
    for _ in 0..3 {
        session.tick();
    }
    session.next();
    let snap = session.snapshot();
    assert_eq!(snap.position, Some(1));
    match snap.combination.as_ref().map(|c| c.gallery.as_str()) {
        Some("G1") => {
            assert_eq!(snap.image_position, Some(0));
            assert_eq!(snap.image, Some(PathBuf::from("/g/G1/1.jpg")));
        }
        Some("G2") => {
            assert_eq!(snap.image_position, None);
            assert_eq!(snap.image, None);
        }
        other => panic!("unexpected gallery {other:?}"),
    }
    assert!(session.timer().is_active());
}

#[test]
fn full_cycle_visits_every_pair_once() {
    let mut session = Session::new(&tagged_cfg(), library(), None);
    let total = session.sequence().len();
    let mut seen = BTreeSet::new();
    for _ in 0..total {
        seen.insert(session.current().cloned().unwrap());
        session.next();
    }
    assert_eq!(seen, pairs(&session));
    assert_eq!(session.sequence().position(), Some(0));
}

#[test]
fn playback_flags_toggle() {
    let mut session = Session::new(&tagged_cfg(), library(), Some(1));
    assert!(session.toggle_overlay());
    assert!(session.toggle_playback());
    assert!(!session.toggle_overlay());
    let flags = session.snapshot().playback;
    assert!(!flags.overlay_visible);
    assert!(flags.playing);
}

#[test]
fn simulate_walks_the_cursor() {
    let plan = controller::simulate(&tagged_cfg(), library(), 5, Some(3));
    assert_eq!(plan.len(), 5);
    assert_eq!(plan[0], plan[3], "three pairings cycle");
    let empty = controller::simulate(&tagged_cfg(), Library::default(), 5, Some(3));
    assert!(empty.is_empty());
}

#[tokio::test(start_paused = true)]
async fn controller_applies_commands_and_rotates_images() {
    let json = r#"{
        "vidPath": "/v",
        "namPath": "/g",
        "videoRelations": { "a.mp4": { "galleries": ["G1"] }, "b.mp4": { "galleries": ["G1"] } },
        "slideshowInterval": "2s"
    }"#;
    let session = Session::new(&cfg(json), library(), Some(11));
    let mut snapshots = session.subscribe();
    let (tx, rx) = mpsc::channel::<Command>(8);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller::run(
        PathBuf::from("/unused.json"),
        session,
        rx,
        cancel.clone(),
    ));

    // One period later the gallery rotates to its second image.
    tokio::time::sleep(Duration::from_millis(2100)).await;
    let snap = snapshots.borrow_and_update().clone();
    assert_eq!(snap.image_position, Some(1));

    tx.send(Command::Next).await.unwrap();
    snapshots.changed().await.unwrap();
    let snap = snapshots.borrow_and_update().clone();
    assert_eq!(snap.position, Some(1));
    assert_eq!(snap.image_position, Some(0), "moving the cursor resets rotation");

    tx.send(Command::Deselect(Category::Gallery, "G1".into()))
        .await
        .unwrap();
    snapshots.changed().await.unwrap();
    let snap = snapshots.borrow_and_update().clone();
    assert_eq!(snap.combination, None);
    assert_eq!(snap.total, 0);

    tx.send(Command::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
    assert!(cancel.is_cancelled());
}

#[tokio::test]
async fn reload_rebuilds_from_disk_and_survives_bad_config() {
    let tmp = tempdir().unwrap();
    let vid = tmp.path().join("videos");
    let nam = tmp.path().join("galleries");
    fs::create_dir_all(&vid).unwrap();
    fs::create_dir_all(nam.join("G1")).unwrap();
    fs::write(vid.join("a.mp4"), b"x").unwrap();
    let path = tmp.path().join("config.json");
    let write_cfg = || {
        let json = format!(
            r#"{{ "vidPath": {:?}, "namPath": {:?} }}"#,
            vid.to_str().unwrap(),
            nam.to_str().unwrap()
        );
        fs::write(&path, json).unwrap();
    };
    write_cfg();

    let cfg = Configuration::from_json_file(&path).unwrap();
    let mut session = Session::new(&cfg, Library::discover(&cfg), Some(5));
    assert_eq!(session.sequence().len(), 1);
    session.select_none(Category::Gallery);

    fs::write(vid.join("b.mp4"), b"x").unwrap();
    controller::reload(&path, &mut session);
    assert_eq!(session.sequence().len(), 2, "selection reset and new video found");

    fs::write(&path, "{ broken").unwrap();
    controller::reload(&path, &mut session);
    assert_eq!(session.sequence().len(), 2, "bad config keeps the current model");

    write_cfg();
    fs::remove_file(vid.join("b.mp4")).unwrap();
    controller::reload(&path, &mut session);
    assert_eq!(session.sequence().len(), 1);
}
