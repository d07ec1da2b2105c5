//! End-to-end flows over the content store

use folio::blog::{self, NewPost, PostUpdate};
use folio::content::SanitizationPolicy;
use folio::errors::ContentError;
use folio::media::{self, ImageSource};
use folio::project::{self, NewProject};
use folio::sitemap::build_sitemap;
use folio::test_helpers::{create_test_pool, sample_png};

fn post(title: &str, content: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: content.to_string(),
        image: None,
    }
}

#[tokio::test]
async fn test_post_lifecycle() {
    let pool = create_test_pool().await.unwrap();
    let policy = SanitizationPolicy::default();

    let created = blog::create_post(
        &pool,
        &policy,
        post(
            "Launching Folio",
            r#"<h1>Launch</h1><p style="color:red; position:fixed" onmouseover="x()">Hi</p><script>alert(1)</script>"#,
        ),
    )
    .await
    .unwrap();
    assert_eq!(created.slug, "launching-folio");
    assert_eq!(created.content, r#"<h1>Launch</h1><p style="color:red">Hi</p>"#);

    let fetched = blog::get_post_by_slug(&pool, "launching-folio")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, created.id);

    // Editing the body keeps the permalink.
    let edited = blog::update_post(
        &pool,
        &policy,
        &created.id,
        PostUpdate {
            content: Some("<p>Edited</p>".to_string()),
            ..PostUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.slug, "launching-folio");
    assert_eq!(edited.content, "<p>Edited</p>");

    // Renaming moves it.
    let renamed = blog::update_post(
        &pool,
        &policy,
        &created.id,
        PostUpdate {
            title: Some("Folio Has Launched".to_string()),
            ..PostUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.slug, "folio-has-launched");
    assert!(
        blog::get_post_by_slug(&pool, "launching-folio")
            .await
            .unwrap()
            .is_none()
    );

    blog::delete_post(&pool, &created.id).await.unwrap();
    assert!(blog::get_post_by_id(&pool, &created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_namespaces_are_independent() {
    let pool = create_test_pool().await.unwrap();
    let policy = SanitizationPolicy::default();

    let post = blog::create_post(&pool, &policy, post("Shared Name", ""))
        .await
        .unwrap();
    let project = project::create_project(
        &pool,
        &policy,
        NewProject {
            title: "Shared Name".to_string(),
            description: "Same title as a post".to_string(),
            content: String::new(),
            skills_used: None,
            demo_link: None,
            case_study_link: None,
            image: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(post.slug, "shared-name");
    assert_eq!(project.slug, "shared-name");
}

#[tokio::test]
async fn test_many_posts_with_one_title_get_distinct_slugs() {
    let pool = create_test_pool().await.unwrap();
    let policy = SanitizationPolicy::default();

    let mut slugs = Vec::new();
    for _ in 0..12 {
        let created = blog::create_post(&pool, &policy, post("Weekly Notes", ""))
            .await
            .unwrap();
        slugs.push(created.slug);
    }

    let mut unique = slugs.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), slugs.len());
    assert_eq!(slugs[0], "weekly-notes");
    assert_eq!(slugs[11], "weekly-notes-11");
}

#[tokio::test]
async fn test_unusable_title_is_rejected() {
    let pool = create_test_pool().await.unwrap();
    let err = blog::create_post(&pool, &SanitizationPolicy::default(), post("¿?¡!", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::InvalidTitle));
    assert!(err.is_user_error());
}

#[tokio::test]
async fn test_post_cover_image_is_resized_and_served() {
    let pool = create_test_pool().await.unwrap();
    let policy = SanitizationPolicy::default();

    let attachment =
        media::prepare_attachment("cover.png", sample_png(1600, 1200), "image/png", Some((800, 600)))
            .await
            .unwrap();

    let created = blog::create_post(
        &pool,
        &policy,
        NewPost {
            image: Some(attachment),
            ..post("With Cover", "")
        },
    )
    .await
    .unwrap();
    assert!(created.has_image);
    assert_eq!(created.image_filename, "cover.png");

    match media::get_post_image(&pool, &created.id).await.unwrap() {
        ImageSource::Stored(image) => {
            assert_eq!(image.mimetype, "image/png");
            let decoded = image::load_from_memory(&image.data).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (800, 600));
        }
        ImageSource::Static(name) => panic!("expected stored image, got {name}"),
    }

    // Updating without a new image keeps the old one.
    blog::update_post(
        &pool,
        &policy,
        &created.id,
        PostUpdate {
            title: Some("With Cover Renamed".to_string()),
            ..PostUpdate::default()
        },
    )
    .await
    .unwrap();
    assert!(matches!(
        media::get_post_image(&pool, &created.id).await.unwrap(),
        ImageSource::Stored(_)
    ));

    let plain = blog::create_post(&pool, &policy, post("No Cover", ""))
        .await
        .unwrap();
    assert_eq!(
        media::get_post_image(&pool, &plain.id).await.unwrap(),
        ImageSource::Static("default_blog.jpg".to_string())
    );
}

#[tokio::test]
async fn test_sitemap_lists_posts_and_projects() {
    let pool = create_test_pool().await.unwrap();
    let policy = SanitizationPolicy::default();

    blog::create_post(&pool, &policy, post("First Post", ""))
        .await
        .unwrap();
    project::create_project(
        &pool,
        &policy,
        NewProject {
            title: "Tool & Co".to_string(),
            description: "A tool".to_string(),
            content: String::new(),
            skills_used: Some("Rust".to_string()),
            demo_link: None,
            case_study_link: None,
            image: None,
        },
    )
    .await
    .unwrap();

    let xml = build_sitemap(&pool, "https://me.example").await.unwrap();
    assert!(xml.contains("<loc>https://me.example/blog/first-post</loc>"));
    assert!(xml.contains("<loc>https://me.example/portfolio/project/tool-co</loc>"));
    assert!(xml.contains("<changefreq>monthly</changefreq>"));
    assert_eq!(xml.matches("<lastmod>").count(), 2);
}
