use super::*;

#[test]
fn empty_and_absent_fields_take_defaults() {
    let req = ImageRequestInput {
        title: Some(String::new()),
        description: None,
        social: Some(String::new()),
        site_name: None,
        image_url: Some(String::new()),
    }
    .into_request();

    assert_eq!(req.title(), DEFAULT_TITLE);
    assert_eq!(req.description(), DEFAULT_DESCRIPTION);
    assert_eq!(req.social(), DEFAULT_SOCIAL);
    assert_eq!(req.site_name(), DEFAULT_SITE_NAME);
    assert!(req.avatar().is_none());
    assert_eq!(req, ImageRequest::default());
}

#[test]
fn provided_fields_are_kept_verbatim() {
    let req = ImageRequest::new("  Hello  ", "World", "@me", "me.dev");
    assert_eq!(req.title(), "  Hello  ");
    assert_eq!(req.description(), "World");
    assert_eq!(req.social(), "@me");
    assert_eq!(req.site_name(), "me.dev");
}

#[test]
fn query_string_is_decoded() {
    let req = ImageRequest::from_query(
        "?title=OG%20Image%20Generator&description=Create+cards&siteName=og.dev&imageUrl=https%3A%2F%2Fx.test%2Fa.png&utm=1",
    );
    assert_eq!(req.title(), "OG Image Generator");
    assert_eq!(req.description(), "Create cards");
    assert_eq!(req.social(), DEFAULT_SOCIAL);
    assert_eq!(req.site_name(), "og.dev");
    assert_eq!(
        req.avatar(),
        Some(&AvatarSource::Url("https://x.test/a.png".to_string()))
    );

    let empty = ImageRequest::from_query("title=&imageUrl=");
    assert_eq!(empty, ImageRequest::default());
}

#[test]
fn batch_json_accepts_camel_and_snake_case() {
    let items: Vec<ImageRequestInput> = serde_json::from_str(
        r#"[
            { "title": "A", "siteName": "a.dev", "imageUrl": "x.png" },
            { "site_name": "b.dev", "image_url": "" }
        ]"#,
    )
    .unwrap();
    let a = items[0].clone().into_request();
    assert_eq!(a.site_name(), "a.dev");
    assert_eq!(a.avatar(), Some(&AvatarSource::Url("x.png".to_string())));
    let b = ImageRequest::from(items[1].clone());
    assert_eq!(b.title(), DEFAULT_TITLE);
    assert_eq!(b.site_name(), "b.dev");
    assert!(b.avatar().is_none());
}

#[test]
fn with_avatar_drops_empty_sources() {
    let req = ImageRequest::default().with_avatar(Some(AvatarSource::Bytes(vec![])));
    assert!(req.avatar().is_none());
    let req = ImageRequest::default().with_avatar(Some(AvatarSource::Bytes(vec![1, 2])));
    assert!(matches!(req.avatar(), Some(AvatarSource::Bytes(b)) if b.len() == 2));
}

#[test]
fn slugify_matches_download_names() {
    assert_eq!(slugify("Hello, World!"), "hello-world");
    assert_eq!(slugify("--Rust  & OG--"), "rust-og");
    assert_eq!(slugify("Ünïcode"), "n-code");
    assert_eq!(ImageRequest::default().slug(), "title");
    assert_eq!(slugify("!!!"), "");
}
