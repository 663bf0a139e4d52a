//! Community administration backed by Google Sheets and Docs.

use std::time::Duration;

use dioxus_logger::tracing;
use serenity::all::{Context, UserId};

use crate::config::Config;
use crate::error::google::GoogleError;
use crate::model::application::{state_range, ApplicationSheet, ApplicationState};
use crate::state::BotState;
use crate::util::codeblock::{wrap_codeblock, MESSAGE_MAX_LENGTH};
use crate::util::fresh::Fresh;

pub const REGULATION_MAX_AGE: Duration = Duration::from_secs(3600);

/// Whether `user` holds the partner role in the community guild.
///
/// Lookup failures count as not being a partner.
pub async fn is_partner(ctx: &Context, config: &Config, user: UserId) -> bool {
    match config.shtelo_guild_id.member(ctx, user).await {
        Ok(member) => member.roles.contains(&config.partner_role_id),
        Err(e) => {
            tracing::debug!("Partner lookup for {} failed: {}", user, e);
            false
        }
    }
}

/// Paragraph blocks whose heading is exactly `keyword`, or failing that, which
/// mention it anywhere. The leading block (document title) is never searched.
pub fn search_paragraphs<'a>(paragraphs: &'a [String], keyword: &str) -> Vec<&'a str> {
    let body = paragraphs.get(1..).unwrap_or_default();
    let heading = format!("# {}\n", keyword);
    let by_heading: Vec<&str> = body
        .iter()
        .filter(|paragraph| paragraph.contains(&heading))
        .map(String::as_str)
        .collect();
    if !by_heading.is_empty() {
        return by_heading;
    }
    body.iter()
        .filter(|paragraph| paragraph.contains(keyword))
        .map(String::as_str)
        .collect()
}

/// Row of the roster sheet describing a member, matched on any cell.
pub fn find_roster_row<'a>(rows: &'a [Vec<String>], candidates: &[String]) -> Option<&'a Vec<String>> {
    rows.iter().skip(1).find(|row| {
        row.iter()
            .any(|cell| candidates.iter().any(|candidate| cell.trim() == candidate))
    })
}

pub struct ShteloService<'a> {
    state: &'a BotState,
}

impl<'a> ShteloService<'a> {
    pub fn new(state: &'a BotState) -> Self {
        Self { state }
    }

    pub async fn applications(&self) -> Result<ApplicationSheet, GoogleError> {
        let google = &self.state.config.google;
        let rows = self
            .state
            .google
            .sheet_read(&google.application_sheet_id, &google.application_read_range)
            .await?;
        Ok(ApplicationSheet::from_rows(rows))
    }

    /// Writes the state cell of application `number`.
    pub async fn set_application_state(
        &self,
        number: usize,
        application_state: ApplicationState,
    ) -> Result<(), GoogleError> {
        let google = &self.state.config.google;
        let range = state_range(&google.application_read_range, number);
        self.state
            .google
            .sheet_write(
                &google.application_sheet_id,
                &range,
                &[vec![application_state.as_cell().to_string()]],
            )
            .await?;
        tracing::info!("Application {} marked {}", number, application_state.as_cell());
        Ok(())
    }

    /// Header row and the row matching one of `candidates`.
    pub async fn roster_entry(
        &self,
        candidates: &[String],
    ) -> Result<Option<(Vec<String>, Vec<String>)>, GoogleError> {
        let google = &self.state.config.google;
        let (Some(sheet_id), Some(range)) = (&google.roster_sheet_id, &google.roster_read_range)
        else {
            return Err(GoogleError::NotConfigured("roster"));
        };
        let rows = self.state.google.sheet_read(sheet_id, range).await?;
        let keys = rows.first().cloned().unwrap_or_default();
        Ok(find_roster_row(&rows, candidates).map(|row| (keys, row.clone())))
    }

    /// Regulation split into code blocks, cached for an hour.
    pub async fn regulation(&self) -> Result<Vec<String>, GoogleError> {
        let mut cached = self.state.regulation.lock().await;
        if let Some(paragraphs) = cached.as_ref().and_then(Fresh::get) {
            return Ok(paragraphs.clone());
        }
        let paragraphs = self.fetch_regulation().await?;
        *cached = Some(Fresh::new(paragraphs.clone(), REGULATION_MAX_AGE));
        Ok(paragraphs)
    }

    /// Regulation read straight from the document, refreshing the cache.
    pub async fn fetch_regulation(&self) -> Result<Vec<String>, GoogleError> {
        let document = self
            .state
            .google
            .doc_read(&self.state.config.google.regulation_doc_id)
            .await?;
        Ok(wrap_codeblock(&document.render(), MESSAGE_MAX_LENGTH, true))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn paragraphs() -> Vec<String> {
        vec![
            "```md\n# 슈텔로 회칙\n```".to_string(),
            "```md\n\n## 제1조\n# 목적\n이 회칙은 슈텔로의 운영을 위해\n```".to_string(),
            "```md\n\n## 제2조\n# 회원\n회원은 목적에 동의한 사람\n```".to_string(),
        ]
    }

    #[test]
    fn heading_match_wins() {
        let paragraphs = paragraphs();
        let found = search_paragraphs(&paragraphs, "목적");
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("제1조"));
    }

    #[test]
    fn falls_back_to_substring() {
        let paragraphs = paragraphs();
        let found = search_paragraphs(&paragraphs, "동의");
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("제2조"));
    }

    #[test]
    fn title_block_is_not_searched() {
        let paragraphs = paragraphs();
        assert!(search_paragraphs(&paragraphs, "슈텔로 회칙").is_empty());
        assert!(search_paragraphs(&[], "목적").is_empty());
    }

    #[test]
    fn roster_matches_any_cell_below_header() {
        let rows = vec![
            vec!["닉네임".to_string(), "디스코드".to_string()],
            vec!["켄켄".to_string(), "kenken".to_string()],
            vec!["슈텔로".to_string(), " shtelo ".to_string()],
        ];

        let found = find_roster_row(&rows, &["shtelo".to_string()]).unwrap();
        assert_eq!(found[0], "슈텔로");
        assert!(find_roster_row(&rows, &["닉네임".to_string()]).is_none());
        assert!(find_roster_row(&rows, &["nobody".to_string()]).is_none());
    }
}
