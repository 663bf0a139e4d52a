use super::*;

/// Tests recording an announced application.
///
/// Verifies that the repository stores the key, the discord tag and the
/// announcement message ids.
///
/// Expected: Ok(ApplicationNotice)
#[tokio::test]
async fn creates_notice() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_notices()
        .build()
        .await
        .unwrap();
    let db = test.db();

    let repo = ApplicationNoticeRepository::new(db);
    let notice = repo
        .create(CreateApplicationNoticeParam {
            application_key: "2026. 3. 1#kenken".to_string(),
            discord_id: "kenken".to_string(),
            channel_id: 111,
            message_id: 222,
        })
        .await?;

    assert_eq!(notice.application_key, "2026. 3. 1#kenken");
    assert_eq!(notice.discord_id, "kenken");
    assert_eq!(notice.channel_id, "111");
    assert_eq!(notice.message_id, "222");

    Ok(())
}

/// Tests announcing the same application twice.
///
/// Verifies that the unique index on the application key rejects a second
/// notice for the same submission.
///
/// Expected: Err(DbErr)
#[tokio::test]
async fn rejects_duplicate_key() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_notices()
        .build()
        .await
        .unwrap();
    let db = test.db();

    let repo = ApplicationNoticeRepository::new(db);
    let param = CreateApplicationNoticeParam {
        application_key: "2026. 3. 1#kenken".to_string(),
        discord_id: "kenken".to_string(),
        channel_id: 111,
        message_id: 222,
    };
    repo.create(param.clone()).await?;

    let result = repo.create(param).await;
    assert!(result.is_err());

    Ok(())
}
