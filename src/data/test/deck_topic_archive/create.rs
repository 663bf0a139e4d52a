use super::*;

/// Tests archiving a deck topic.
///
/// Verifies that the raw topic is stored unchanged, including newlines and
/// the legacy zero-width prefix.
///
/// Expected: Ok(DeckTopicArchive)
#[tokio::test]
async fn stores_raw_topic() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_archives()
        .build()
        .await
        .unwrap();
    let db = test.db();

    let raw = "\u{200b}:lock:\nid: a1c2\n매니저: <@1>\n\n보드게임 데크";
    let repo = DeckTopicArchiveRepository::new(db);
    let archive = repo
        .create(CreateDeckTopicArchiveParam {
            deck_id: "a1c2".to_string(),
            channel_id: 42,
            topic: raw.to_string(),
        })
        .await?;

    assert_eq!(archive.deck_id, "a1c2");
    assert_eq!(archive.channel_id, "42");
    assert_eq!(archive.topic, raw);

    Ok(())
}
