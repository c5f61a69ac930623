use super::*;

fn face(weight: u16) -> FontFace {
    FontFace {
        family: "Test".to_string(),
        weight,
        index: 0,
        data: Blob::from(Vec::new()),
    }
}

#[test]
fn nearest_weight_prefers_heavier_on_tie() {
    let lib = FontLibrary::from_faces("Test", vec![face(300), face(500), face(700)]);
    assert_eq!(lib.face_for_weight(300), Some(0));
    assert_eq!(lib.face_for_weight(400), Some(1));
    assert_eq!(lib.face_for_weight(600), Some(2));
    assert_eq!(lib.face_for_weight(900), Some(2));
    assert_eq!(lib.face_for_weight(100), Some(0));
}

#[test]
fn empty_library_has_no_face() {
    let lib = FontLibrary::empty("Inter");
    assert!(lib.is_empty());
    assert_eq!(lib.face_for_weight(400), None);
    assert_eq!(lib.family(), "Inter");
}

#[test]
fn disabled_config_loads_nothing() {
    let lib = FontLibrary::load(&FontConfig::disabled(), Path::new(".")).unwrap();
    assert!(lib.is_empty());
}

#[test]
fn missing_font_file_is_config_error() {
    let cfg = FontConfig {
        files: vec!["definitely/not/here.ttf".into()],
        ..FontConfig::disabled()
    };
    let err = FontLibrary::load(&cfg, Path::new(".")).unwrap_err();
    assert!(matches!(err, OgError::Config(_)), "{err}");
    assert!(err.to_string().contains("here.ttf"));
}

#[test]
fn engine_falls_back_without_faces() {
    let mut engine = TextEngine::for_library(&FontLibrary::empty("Inter"));
    assert!(!engine.is_shaped());
    assert!(engine.font_book_mut().is_none());
    assert_eq!(engine.family(), "Inter");

    let font = FontSpec::new(FontSpec::BOLD, 10.0);
    assert!((engine.measure("abcd", font) - 24.0).abs() < 1e-9);
}

fn bundled() -> FontLibrary {
    let cfg = FontConfig {
        bundled: true,
        ..FontConfig::disabled()
    };
    FontLibrary::load(&cfg, Path::new(".")).unwrap()
}

#[test]
fn bundled_faces_cover_regular_and_bold() {
    let lib = bundled();
    let weights: Vec<u16> = lib.faces().iter().map(|f| f.weight).collect();
    assert_eq!(weights, vec![400, 700]);
    assert!(lib.faces().iter().all(|f| f.family == BUNDLED_FONT_FAMILY));
    assert_eq!(lib.face_for_weight(FontSpec::LIGHT), Some(0));
    assert_eq!(lib.face_for_weight(FontSpec::BOLD), Some(1));
}

#[test]
fn shaped_glyphs_advance_along_the_line() {
    let lib = bundled();
    let mut book = FontBook::new(&lib).unwrap();
    let font = FontSpec::new(FontSpec::BOLD, 60.0);
    let line = book.shape_line("WWWW WWWW", font).unwrap();

    assert_eq!(line.glyphs.len(), 9);
    assert!(line.glyphs.windows(2).all(|w| w[1].x > w[0].x));
    assert!(line.glyphs[0].x.abs() < 1.0);
    let last = line.glyphs.last().unwrap();
    assert!(last.x > line.width * 0.8 && last.x < line.width);

    // Baseline sits inside the line, below the cap height.
    assert!(line.glyphs.iter().all(|g| g.y > 30.0 && g.y < 72.0));
    assert!((f64::from(line.width) - book.measure("WWWW WWWW", font)).abs() < 1e-3);
}

#[test]
fn shaped_width_grows_with_text_and_weight() {
    let mut engine = TextEngine::for_library(&bundled());
    assert!(engine.is_shaped());
    let regular = FontSpec::new(FontSpec::REGULAR, 36.0);
    let bold = FontSpec::new(FontSpec::BOLD, 36.0);
    let short = engine.measure("Title", regular);
    assert!(short > 0.0);
    assert!(engine.measure("Title Title", regular) > short);
    assert!(engine.measure("Title", bold) > short);
    assert_eq!(engine.measure("", regular), 0.0);
}
