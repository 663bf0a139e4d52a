//! Membership applications read from the application spreadsheet.
//!
//! The sheet is a form-response sheet: the first row holds the question texts
//! and every following row one submission, addressed by column position.

use crate::literal::{self, Literals};
use crate::model::embed::{ChainedEmbed, SHTELO_YELLOW};

pub const TIMESTAMP: usize = 0;
pub const EMAIL: usize = 1;
pub const DISCORD_ID: usize = 2;
pub const SUBACCOUNT: usize = 3;
pub const NICKNAME: usize = 4;
pub const INVITER: usize = 5;
pub const KNOWLEDGE: usize = 6;
pub const TWITTER_ID: usize = 7;
pub const STATE: usize = 13;
pub const REMARKS: usize = 14;
/// Width every row is padded to, even when the header row is shorter.
const MIN_WIDTH: usize = REMARKS + 1;
/// Spreadsheet column letter of [`STATE`].
const STATE_COLUMN: &str = "N";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationState {
    Received,
    Approved,
    Rejected,
}

impl ApplicationState {
    /// Value written in the state column.
    pub fn as_cell(self) -> &'static str {
        match self {
            ApplicationState::Received => "접수됨",
            ApplicationState::Approved => "승인됨",
            ApplicationState::Rejected => "기각됨",
        }
    }

    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim() {
            "접수됨" => Some(ApplicationState::Received),
            "승인됨" => Some(ApplicationState::Approved),
            "기각됨" => Some(ApplicationState::Rejected),
            _ => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            ApplicationState::Received => "received",
            ApplicationState::Approved => "approved",
            ApplicationState::Rejected => "rejected",
        }
    }
}

/// One submission row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// Position among the submissions, starting at 1.
    pub number: usize,
    cells: Vec<String>,
}

impl Application {
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Raw text of the state column. Empty while nobody has looked at it.
    pub fn state_cell(&self) -> &str {
        self.cell(STATE)
    }

    pub fn state(&self) -> Option<ApplicationState> {
        ApplicationState::from_cell(self.state_cell())
    }

    /// Not handled yet by anyone.
    pub fn is_pending(&self) -> bool {
        self.state_cell().trim().is_empty()
    }

    /// Identifies a submission across polls.
    pub fn key(&self) -> String {
        format!("{}#{}", self.cell(TIMESTAMP), self.cell(DISCORD_ID))
    }

    /// Summary embed with the well-known fields.
    pub fn embed(&self, literals: &Literals) -> ChainedEmbed {
        let section = literals.section("application_embed");
        let mut embed = ChainedEmbed::new(self.title(literals))
            .colour(SHTELO_YELLOW)
            .description(literal::format(
                section.get("description"),
                &[&self.cell(TIMESTAMP), &self.cell(EMAIL)],
            ));

        if self.cell(SUBACCOUNT) != section.get("false") {
            embed.add_field(
                section.get("subaccount"),
                literal::format(section.get("mainaccount"), &[&self.cell(SUBACCOUNT)]),
                false,
            );
        }
        if !self.cell(NICKNAME).is_empty() {
            embed.add_field(section.get("nickname"), format!("**{}**", self.cell(NICKNAME)), false);
        }
        for (column, key) in [(DISCORD_ID, "discord_id"), (TWITTER_ID, "twitter_id"), (INVITER, "inviter")] {
            if !self.cell(column).is_empty() {
                embed.add_field(section.get(key), format!("`{}`", self.cell(column)), true);
            }
        }
        for (column, key) in [(KNOWLEDGE, "knowledge"), (REMARKS, "remarks")] {
            if !self.cell(column).is_empty() {
                embed.add_field(section.get(key), format!("```\n{}\n```", self.cell(column)), false);
            }
        }
        embed
    }

    /// Embed listing every non-empty answer under its question text.
    pub fn raw_embed(&self, keys: &[String], literals: &Literals) -> ChainedEmbed {
        let section = literals.section("application_raw_embed");
        let mut embed = ChainedEmbed::new(self.title(literals))
            .colour(SHTELO_YELLOW)
            .description(section.get("description"));
        for (key, value) in keys.iter().zip(&self.cells) {
            if !value.is_empty() {
                embed.add_field(key.as_str(), format!("```\n{}\n```", value), false);
            }
        }
        embed
    }

    fn title(&self, literals: &Literals) -> String {
        let section = literals.section("application_embed");
        let mut title = literal::format(
            section.get("title"),
            &[&self.number, &self.cell(DISCORD_ID)],
        );
        if let Some(state) = self.state() {
            title.push_str(literals.section("application_state").get(state.key()));
        }
        title
    }
}

/// Header row and submissions of the application sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationSheet {
    pub keys: Vec<String>,
    pub applications: Vec<Application>,
}

impl ApplicationSheet {
    /// Builds the sheet from raw rows, padding every row to the header width.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let keys = rows.remove(0);
        let width = keys.len().max(MIN_WIDTH);
        let applications = rows
            .into_iter()
            .enumerate()
            .map(|(index, mut cells)| {
                cells.resize(width.max(cells.len()), String::new());
                Application {
                    number: index + 1,
                    cells,
                }
            })
            .collect();
        Self { keys, applications }
    }

    pub fn pending(&self) -> impl Iterator<Item = &Application> {
        self.applications.iter().filter(|application| application.is_pending())
    }

    pub fn get(&self, number: usize) -> Option<&Application> {
        number
            .checked_sub(1)
            .and_then(|index| self.applications.get(index))
    }
}

/// A1 notation of the state cell of application `number` in the sheet read with
/// `read_range`, e.g. `"설문지 응답 시트1!N5"`.
pub fn state_range(read_range: &str, number: usize) -> String {
    // Row 1 is the header, so application 1 lives on row 2.
    let row = number + 1;
    match read_range.split_once('!') {
        Some((sheet, _)) => format!("{}!{}{}", sheet, STATE_COLUMN, row),
        None => format!("{}{}", STATE_COLUMN, row),
    }
}
