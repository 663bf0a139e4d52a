//! Embeds that continue into follow-up embeds when Discord's limits are hit.
//!
//! Discord caps an embed at 25 fields and 6000 characters in total. A
//! `ChainedEmbed` keeps appending fields to its last page and opens a new page
//! carrying the same title when the next field would not fit. The footer is only
//! rendered on the final page.

use serenity::all::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};

use crate::util::codeblock::split_by_length;

pub const EMBED_MAX_LENGTH: usize = 6000;
pub const EMBED_MAX_FIELDS: usize = 25;
pub const DESCRIPTION_MAX_LENGTH: usize = 4096;
pub const FIELD_NAME_MAX_LENGTH: usize = 256;
pub const FIELD_VALUE_MAX_LENGTH: usize = 1024;

pub const KENKEN_CYAN: u32 = 0x82C3C3;
pub const SHTELO_YELLOW: u32 = 0xFDDE59;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    /// Creates a field, truncating name and value to Discord's per-field limits.
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: truncate(name.into(), FIELD_NAME_MAX_LENGTH),
            value: truncate(value.into(), FIELD_VALUE_MAX_LENGTH),
            inline,
        }
    }

    fn length(&self) -> usize {
        self.name.chars().count() + self.value.chars().count()
    }
}

/// One Discord embed worth of content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedPage {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub author: Option<(String, Option<String>)>,
}

impl EmbedPage {
    fn length(&self) -> usize {
        let text = |value: &Option<String>| value.as_ref().map_or(0, |v| v.chars().count());
        text(&self.title)
            + text(&self.description)
            + self.author.as_ref().map_or(0, |(name, _)| name.chars().count())
            + self.fields.iter().map(EmbedField::length).sum::<usize>()
    }

    fn continuation(title: Option<String>) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainedEmbed {
    colour: u32,
    footer: Option<String>,
    pages: Vec<EmbedPage>,
}

impl ChainedEmbed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            colour: KENKEN_CYAN,
            footer: None,
            pages: vec![EmbedPage {
                title: Some(title.into()),
                ..Default::default()
            }],
        }
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = colour;
        self
    }

    /// Sets the description of the first page.
    ///
    /// Descriptions over Discord's limit continue, line by line, in the
    /// description of follow-up pages.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        let title = self.title();
        let mut chunks = chunk_lines(&description, DESCRIPTION_MAX_LENGTH).into_iter();

        if let (Some(first), Some(chunk)) = (self.pages.first_mut(), chunks.next()) {
            first.description = Some(chunk);
        }
        for chunk in chunks {
            let mut page = EmbedPage::continuation(title.clone());
            page.description = Some(chunk);
            self.pages.push(page);
        }
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        if let Some(first) = self.pages.first_mut() {
            first.thumbnail = Some(url.into());
        }
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        if let Some(first) = self.pages.first_mut() {
            first.image = Some(url.into());
        }
        self
    }

    pub fn author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        if let Some(first) = self.pages.first_mut() {
            first.author = Some((name.into(), icon_url));
        }
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.set_footer(text);
        self
    }

    pub fn set_footer(&mut self, text: impl Into<String>) {
        self.footer = Some(text.into());
    }

    /// Builder form of [`ChainedEmbed::add_field`].
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.add_field(name, value, inline);
        self
    }

    /// Appends a field, opening a new page when the last one is full.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) {
        let field = EmbedField::new(name, value, inline);
        let budget = EMBED_MAX_LENGTH - self.footer_length();

        if let Some(last) = self.pages.last_mut() {
            if last.fields.len() < EMBED_MAX_FIELDS && last.length() + field.length() <= budget {
                last.fields.push(field);
                return;
            }
        }

        let mut page = EmbedPage::continuation(self.title());
        page.fields.push(field);
        self.pages.push(page);
    }

    /// Removes every field, dropping continuation pages left empty.
    pub fn clear_fields(&mut self) {
        for page in self.pages.iter_mut() {
            page.fields.clear();
        }
        let mut index = 0;
        self.pages.retain(|page| {
            index += 1;
            index == 1 || page.description.is_some()
        });
    }

    pub fn pages(&self) -> &[EmbedPage] {
        &self.pages
    }

    /// Renders every page, attaching the footer to the last one.
    pub fn to_embeds(&self) -> Vec<CreateEmbed> {
        let last = self.pages.len().saturating_sub(1);
        self.pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let mut embed = CreateEmbed::new().colour(self.colour);
                if let Some(title) = &page.title {
                    embed = embed.title(title);
                }
                if let Some(description) = &page.description {
                    embed = embed.description(description);
                }
                if let Some(thumbnail) = &page.thumbnail {
                    embed = embed.thumbnail(thumbnail);
                }
                if let Some(image) = &page.image {
                    embed = embed.image(image);
                }
                if let Some((name, icon_url)) = &page.author {
                    let mut author = CreateEmbedAuthor::new(name);
                    if let Some(icon_url) = icon_url {
                        author = author.icon_url(icon_url);
                    }
                    embed = embed.author(author);
                }
                for field in &page.fields {
                    embed = embed.field(&field.name, &field.value, field.inline);
                }
                if index == last {
                    if let Some(footer) = &self.footer {
                        embed = embed.footer(CreateEmbedFooter::new(footer));
                    }
                }
                embed
            })
            .collect()
    }

    fn title(&self) -> Option<String> {
        self.pages.first().and_then(|page| page.title.clone())
    }

    fn footer_length(&self) -> usize {
        self.footer.as_ref().map_or(0, |footer| footer.chars().count())
    }
}

fn truncate(value: String, max: usize) -> String {
    if value.chars().count() <= max {
        return value;
    }
    let mut truncated: String = value.chars().take(max.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Groups lines into chunks of at most `max` characters.
fn chunk_lines(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_length = 0;

    for line in text.split('\n') {
        for piece in split_by_length(line, max) {
            let piece_length = piece.chars().count();
            let separator = usize::from(!current.is_empty());
            if current_length + separator + piece_length > max && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_length = 0;
            }
            if !current.is_empty() {
                current.push('\n');
                current_length += 1;
            }
            current.push_str(&piece);
            current_length += piece_length;
        }
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
