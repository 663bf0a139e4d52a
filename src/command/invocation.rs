use std::sync::Arc;

use serenity::all::{
    ChannelId, Context, CreateMessage, GuildId, Member, Message, ReactionType, User,
};

use crate::command::args::Args;
use crate::command::argument;
use crate::error::command::CommandError;
use crate::literal::Literals;
use crate::model::embed::ChainedEmbed;
use crate::state::BotState;

/// Everything a command handler gets to work with.
pub struct Invocation {
    pub ctx: Context,
    pub message: Message,
    pub state: Arc<BotState>,
    pub args: Args,
    pub qualified_name: String,
    /// Prefix the command was invoked with, ours or a foreign one from `PASS`.
    pub prefix: String,
}

impl Invocation {
    pub fn literals(&self) -> Arc<Literals> {
        self.state.literals()
    }

    /// Owned copy of a literal string.
    pub fn text(&self, section: &str, key: &str) -> String {
        self.literals().section(section).get(key).to_string()
    }

    pub fn author(&self) -> &User {
        &self.message.author
    }

    pub fn channel_id(&self) -> ChannelId {
        self.message.channel_id
    }

    pub fn guild_id(&self) -> Result<GuildId, CommandError> {
        self.message
            .guild_id
            .ok_or(CommandError::CheckFailure("guild_only"))
    }

    pub async fn send(&self, content: impl Into<String>) -> Result<Message, CommandError> {
        let message = self
            .message
            .channel_id
            .say(&self.ctx.http, content.into())
            .await?;
        Ok(message)
    }

    /// Sends every page of the embed as its own message.
    pub async fn send_embed(&self, embed: &ChainedEmbed) -> Result<Vec<Message>, CommandError> {
        let mut sent = Vec::new();
        for page in embed.to_embeds() {
            let message = self
                .message
                .channel_id
                .send_message(&self.ctx.http, CreateMessage::new().embed(page))
                .await?;
            sent.push(message);
        }
        Ok(sent)
    }

    /// Sends the embed to the author by DM.
    pub async fn send_embed_dm(&self, embed: &ChainedEmbed) -> Result<(), CommandError> {
        let channel = self.message.author.create_dm_channel(&self.ctx).await?;
        for page in embed.to_embeds() {
            channel
                .send_message(&self.ctx.http, CreateMessage::new().embed(page))
                .await?;
        }
        Ok(())
    }

    pub async fn dm(&self, user: &User, content: impl Into<String>) -> Result<(), CommandError> {
        user.direct_message(&self.ctx, CreateMessage::new().content(content.into()))
            .await?;
        Ok(())
    }

    pub async fn react(&self, emoji: &str) -> Result<(), CommandError> {
        self.message
            .react(&self.ctx.http, ReactionType::Unicode(emoji.to_string()))
            .await?;
        Ok(())
    }

    /// Member argument at `index`, looked up in the community guild.
    pub async fn member_arg(&self, index: usize, name: &'static str) -> Result<Member, CommandError> {
        let query = self.args.required(index, name)?;
        argument::member(&self.ctx, self.state.config.shtelo_guild_id, query).await
    }

    /// Puts the shared deck-editing cooldown of `category` on.
    pub fn consume_deck_cooldown(&self, category: ChannelId) -> Result<(), CommandError> {
        self.state
            .deck_cooldown
            .acquire(&category)
            .map_err(CommandError::Cooldown)
    }
}
