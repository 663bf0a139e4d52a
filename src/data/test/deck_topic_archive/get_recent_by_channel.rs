use super::*;
use test_utils::factory::deck_topic_archive::DeckTopicArchiveFactory;

/// Tests listing archived topics of a channel.
///
/// Verifies that records come back newest first, limited in count, and that
/// records of other channels are excluded.
///
/// Expected: Ok(Vec) with the two newest topics of the channel
#[tokio::test]
async fn returns_newest_topics_of_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_archives()
        .build()
        .await
        .unwrap();
    let db = test.db();

    for topic in ["first", "second", "third"] {
        DeckTopicArchiveFactory::new(db)
            .channel_id("42")
            .topic(topic)
            .build()
            .await?;
    }
    DeckTopicArchiveFactory::new(db)
        .channel_id("43")
        .topic("other deck")
        .build()
        .await?;

    let repo = DeckTopicArchiveRepository::new(db);
    let archives = repo.get_recent_by_channel(42, 2).await?;

    let topics: Vec<&str> = archives.iter().map(|archive| archive.topic.as_str()).collect();
    assert_eq!(topics, vec!["third", "second"]);

    Ok(())
}

/// Tests listing a channel without archives.
///
/// Expected: Ok(empty Vec)
#[tokio::test]
async fn returns_empty_for_unknown_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_archives()
        .build()
        .await
        .unwrap();
    let db = test.db();

    test_utils::factory::create_deck_topic_archive(db).await?;

    let repo = DeckTopicArchiveRepository::new(db);
    let archives = repo.get_recent_by_channel(999, 5).await?;

    assert!(archives.is_empty());

    Ok(())
}
