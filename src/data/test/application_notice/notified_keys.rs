use super::*;
use test_utils::factory::application_notice::ApplicationNoticeFactory;

/// Tests filtering submission keys down to the announced ones.
///
/// Verifies that only keys with a stored notice are returned.
///
/// Expected: Ok(set with the announced key only)
#[tokio::test]
async fn returns_only_announced_keys() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_notices()
        .build()
        .await
        .unwrap();
    let db = test.db();

    ApplicationNoticeFactory::new(db)
        .application_key("first#a")
        .build()
        .await?;
    ApplicationNoticeFactory::new(db)
        .application_key("other#c")
        .build()
        .await?;

    let repo = ApplicationNoticeRepository::new(db);
    let keys = repo
        .notified_keys(&["first#a".to_string(), "second#b".to_string()])
        .await?;

    assert_eq!(keys.len(), 1);
    assert!(keys.contains("first#a"));

    Ok(())
}

/// Tests querying with no keys.
///
/// Expected: Ok(empty set)
#[tokio::test]
async fn returns_empty_set_for_no_keys() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_notices()
        .build()
        .await
        .unwrap();
    let db = test.db();

    test_utils::factory::create_application_notice(db).await?;

    let repo = ApplicationNoticeRepository::new(db);
    let keys = repo.notified_keys(&[]).await?;

    assert!(keys.is_empty());

    Ok(())
}
