use std::collections::HashSet;
use std::sync::Arc;

use dioxus_logger::tracing;
use serenity::all::CreateMessage;
use serenity::http::Http;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::data::application_notice::ApplicationNoticeRepository;
use crate::error::AppError;
use crate::literal::format;
use crate::model::application::{Application, ApplicationSheet, DISCORD_ID};
use crate::model::application_notice::CreateApplicationNoticeParam;
use crate::service::shtelo::ShteloService;
use crate::state::BotState;

/// Every ten minutes, on the minute.
const SCHEDULE: &str = "0 */10 * * * *";

/// Starts the application notification scheduler
///
/// This scheduler runs every ten minutes, reads the application sheet and
/// announces submissions nobody has handled yet to the partner channel. Each
/// submission is announced once; announced keys are kept in the database.
///
/// # Arguments
/// - `state`: Shared bot state with the Google client and database
/// - `discord_http`: Discord HTTP client for posting announcements
pub async fn start_scheduler(state: Arc<BotState>, discord_http: Arc<Http>) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_state = state.clone();
    let job_http = discord_http.clone();

    let job = Job::new_async(SCHEDULE, move |_uuid, _lock| {
        let state = job_state.clone();
        let http = job_http.clone();

        Box::pin(async move {
            if let Err(e) = process_application_notifications(&state, http).await {
                tracing::error!("Error processing application notifications: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Application notification scheduler started");

    Ok(())
}

/// Pending applications whose key is not in `notified`.
pub fn unannounced<'a>(sheet: &'a ApplicationSheet, notified: &HashSet<String>) -> Vec<&'a Application> {
    sheet
        .pending()
        .filter(|application| !notified.contains(&application.key()))
        .collect()
}

/// Announces new pending applications
async fn process_application_notifications(
    state: &BotState,
    discord_http: Arc<Http>,
) -> Result<(), AppError> {
    let sheet = ShteloService::new(state).applications().await?;
    let keys: Vec<String> = sheet.pending().map(Application::key).collect();
    if keys.is_empty() {
        return Ok(());
    }

    let repo = ApplicationNoticeRepository::new(&state.db);
    let notified = repo.notified_keys(&keys).await?;
    let fresh = unannounced(&sheet, &notified);
    if fresh.is_empty() {
        return Ok(());
    }

    let literals = state.literals();
    let channel = state.config.partner_channel_id;
    for application in fresh {
        let content = format(
            literals.section("application_notice").get("new"),
            &[&application.number],
        );
        let message = channel
            .send_message(
                &discord_http,
                CreateMessage::new()
                    .content(content)
                    .embeds(application.embed(&literals).to_embeds()),
            )
            .await?;

        repo.create(CreateApplicationNoticeParam {
            application_key: application.key(),
            discord_id: application.cell(DISCORD_ID).to_string(),
            channel_id: channel.get(),
            message_id: message.id.get(),
        })
        .await?;
        tracing::info!("Announced application {}", application.number);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn skips_announced_and_handled_applications() {
        let mut handled = row(&["2026. 3. 3", "c@shtelo.org", "handled#0003"]);
        handled.resize(13, String::new());
        handled.push("기각됨".to_string());
        let sheet = ApplicationSheet::from_rows(vec![
            row(&["타임스탬프", "이메일", "디스코드 아이디"]),
            row(&["2026. 3. 1", "a@shtelo.org", "old#0001"]),
            row(&["2026. 3. 2", "b@shtelo.org", "new#0002"]),
            handled,
        ]);
        let notified: HashSet<String> = ["2026. 3. 1#old#0001".to_string()].into_iter().collect();

        let fresh = unannounced(&sheet, &notified);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].cell(DISCORD_ID), "new#0002");
    }
}
