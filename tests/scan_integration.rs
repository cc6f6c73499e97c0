use pairshow::config::Configuration;
use pairshow::scan::{Library, is_supported_image, list_galleries, list_images, list_videos};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn config(vid: &Path, nam: &Path) -> Configuration {
    let json = format!(
        r#"{{ "vidPath": {:?}, "namPath": {:?} }}"#,
        vid.to_str().unwrap(),
        nam.to_str().unwrap()
    );
    Configuration::from_json_str(&json).unwrap()
}

#[test]
fn videos_are_non_hidden_plain_files() {
    let tmp = tempdir().unwrap();
    let vid = tmp.path();
    fs::write(vid.join("b.mp4"), b"x").unwrap();
    fs::write(vid.join("a.mkv"), b"x").unwrap();
    fs::write(vid.join(".hidden.mp4"), b"x").unwrap();
    fs::create_dir(vid.join("subdir")).unwrap();

    let videos = list_videos(vid).unwrap();
    assert_eq!(videos, vec!["a.mkv".to_string(), "b.mp4".to_string()]);
}

#[test]
fn galleries_are_non_hidden_directories_with_images() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("G1").join("nested")).unwrap();
    fs::create_dir(root.join("G2")).unwrap();
    fs::create_dir(root.join(".cache")).unwrap();
    fs::write(root.join("loose.jpg"), b"x").unwrap();
    fs::write(root.join("G1").join("b.PNG"), b"x").unwrap();
    fs::write(root.join("G1").join("a.jpeg"), b"x").unwrap();
    fs::write(root.join("G1").join("notes.txt"), b"x").unwrap();
    fs::write(root.join("G1").join(".thumb.jpg"), b"x").unwrap();
    fs::write(root.join("G1").join("nested").join("deep.jpg"), b"x").unwrap();

    assert_eq!(
        list_galleries(root).unwrap(),
        vec!["G1".to_string(), "G2".to_string()]
    );
    let images = list_images(&root.join("G1")).unwrap();
    assert_eq!(
        images,
        vec![root.join("G1").join("a.jpeg"), root.join("G1").join("b.PNG")]
    );
    assert!(list_images(&root.join("G2")).unwrap().is_empty());
}

#[test]
fn supported_extensions() {
    for ok in ["a.png", "a.jpg", "a.JPEG", "a.bmp", "a.gif"] {
        assert!(is_supported_image(Path::new(ok)), "{ok}");
    }
    for bad in ["a.webp", "a.tiff", "jpg", "a.mp4"] {
        assert!(!is_supported_image(Path::new(bad)), "{bad}");
    }
}

#[test]
fn missing_directories_degrade_to_empty_library() {
    let tmp = tempdir().unwrap();
    let cfg = config(&tmp.path().join("nope"), &tmp.path().join("also-nope"));
    assert!(list_videos(&cfg.vid_path).is_err());
    let library = Library::discover(&cfg);
    assert_eq!(library, Library::default());
}

#[test]
fn discover_collects_videos_galleries_and_images() {
    let tmp = tempdir().unwrap();
    let vid = tmp.path().join("videos");
    let nam = tmp.path().join("galleries");
    fs::create_dir_all(&vid).unwrap();
    fs::create_dir_all(nam.join("G1")).unwrap();
    fs::create_dir_all(nam.join("G2")).unwrap();
    fs::write(vid.join("a.mp4"), b"x").unwrap();
    fs::write(nam.join("G1").join("1.jpg"), b"x").unwrap();

    let library = Library::discover(&config(&vid, &nam));
    assert_eq!(library.videos, vec!["a.mp4".to_string()]);
    assert_eq!(library.gallery_names(), vec!["G1".to_string(), "G2".to_string()]);
    assert_eq!(library.images_for("G1"), &[nam.join("G1").join("1.jpg")]);
    assert!(library.images_for("G2").is_empty());
    assert!(library.images_for("unknown").is_empty());
}
