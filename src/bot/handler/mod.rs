use std::sync::Arc;

use serenity::all::{
    Context, EventHandler, GuildChannel, Message, MessageUpdateEvent, Reaction, Ready,
};
use serenity::async_trait;

use crate::state::BotState;

pub mod channel;
pub mod message;
pub mod message_update;
pub mod reaction;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub state: Arc<BotState>,
}

impl Handler {
    pub fn new(state: Arc<BotState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.state, ctx, ready).await;
    }

    /// Called when a message is sent in a channel or DM
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(&self.state, ctx, message).await;
    }

    /// Called when a message is edited
    async fn message_update(
        &self,
        ctx: Context,
        old: Option<Message>,
        new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        message_update::handle_message_update(&self.state, ctx, old, new, event).await;
    }

    /// Called when a reaction is added to a message
    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        reaction::handle_reaction_add(ctx, reaction).await;
    }

    /// Called when a channel is updated in a guild
    async fn channel_update(&self, ctx: Context, old: Option<GuildChannel>, new: GuildChannel) {
        channel::handle_channel_update(&self.state, ctx, old, new).await;
    }
}
