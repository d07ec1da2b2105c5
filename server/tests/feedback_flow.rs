//! Guest feedback against stored content

use folio::blog::{self, NewPost};
use folio::content::SanitizationPolicy;
use folio::dashboard::dashboard;
use folio::feedback::{FeedbackInput, FeedbackTarget, feedback_summary, submit_feedback};
use folio::test_helpers::create_test_pool;

fn guest(name: &str) -> FeedbackInput {
    FeedbackInput {
        guest_name: name.to_string(),
        guest_email: format!("{}@example.com", name.to_lowercase()),
        ..FeedbackInput::default()
    }
}

#[tokio::test]
async fn test_feedback_on_post() {
    let pool = create_test_pool().await.unwrap();
    let created = blog::create_post(
        &pool,
        &SanitizationPolicy::default(),
        NewPost {
            title: "Open for comments".to_string(),
            content: "<p>Say hi</p>".to_string(),
            image: None,
        },
    )
    .await
    .unwrap();
    let target = FeedbackTarget::Post(created.id.clone());

    submit_feedback(
        &pool,
        &target,
        FeedbackInput {
            like: true,
            content: Some("<a href=\"http://spam.example\">Hello</a> there".to_string()),
            rating: Some(4),
            ..guest("Ada")
        },
    )
    .await
    .unwrap();
    submit_feedback(
        &pool,
        &target,
        FeedbackInput {
            rating: Some(1),
            ..guest("Bob")
        },
    )
    .await
    .unwrap();

    let summary = feedback_summary(&pool, &target).await.unwrap();
    assert_eq!(summary.likes, 1);
    assert_eq!(summary.ratings, 2);
    assert_eq!(summary.average_rating, Some(2.5));
    assert_eq!(summary.comments.len(), 1);
    assert_eq!(summary.comments[0].content, "Hello there");

    let stats = dashboard(&pool).await.unwrap();
    assert_eq!((stats.comments, stats.ratings, stats.likes), (1, 2, 1));

    blog::delete_post(&pool, &created.id).await.unwrap();
    let stats = dashboard(&pool).await.unwrap();
    assert_eq!((stats.comments, stats.ratings, stats.likes), (0, 0, 0));
}
