//! Deck lifecycle on top of the Discord guild.
//!
//! A deck is a private category with a role of the same name. Its state lives in
//! the topic of its default text channel, so the registry is rebuilt from the
//! guild's channels and never persisted elsewhere. Previous topics are archived
//! in the database once a rewrite has gone through.

use std::collections::HashMap;
use std::future::Future;

use dioxus_logger::tracing;
use rand::rng;
use serenity::all::{
    ChannelId, ChannelType, Context, CreateChannel, EditChannel, EditRole, GuildChannel, Member,
    PermissionOverwrite, PermissionOverwriteType, Permissions, Role, RoleId, UserId,
};
use tokio::sync::{watch, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::data::deck_topic_archive::DeckTopicArchiveRepository;
use crate::error::deck::DeckError;
use crate::error::AppError;
use crate::model::deck::registry::DeckRegistry;
use crate::model::deck::topic::{DeckRecord, TopicFormat};
use crate::model::deck::Deck;
use crate::model::deck_topic_archive::CreateDeckTopicArchiveParam;
use crate::state::BotState;

const MEMBER_PAGE_SIZE: u64 = 1000;

/// The deck registry with a readiness flag for the first load.
pub struct DeckStore {
    registry: RwLock<DeckRegistry>,
    /// Held for the whole read-modify-save of an edit.
    edits: Mutex<()>,
    ready: watch::Sender<bool>,
}

impl Default for DeckStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckStore {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(DeckRegistry::new()),
            edits: Mutex::new(()),
            ready: watch::Sender::new(false),
        }
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Resolves once the registry has been loaded at least once.
    pub async fn wait_until_ready(&self) {
        let mut ready = self.ready.subscribe();
        // The sender lives as long as the store, so this never errors.
        let _ = ready.wait_for(|ready| *ready).await;
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, DeckRegistry> {
        self.registry.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, DeckRegistry> {
        self.registry.write().await
    }

    /// Replaces the whole registry and marks the store ready.
    pub async fn replace(&self, registry: DeckRegistry) {
        *self.registry.write().await = registry;
        self.ready.send_replace(true);
    }

    /// Waits for the running edit, then runs `fetch` before the next one starts.
    pub async fn between_edits<T>(&self, fetch: impl Future<Output = T>) -> T {
        let _edit = self.edits.lock().await;
        fetch.await
    }

    /// Applies `change` to the registered deck of a category and commits it
    /// once `persist` succeeds.
    ///
    /// Edits run one at a time, each on the deck as the previous edit left it.
    /// Nothing is committed when `change` or `persist` fails.
    ///
    /// # Returns
    /// - `Ok(Some((Deck, T)))` - The committed deck and the output of `change`
    /// - `Ok(None)` - No deck is registered for the category
    pub async fn update<T, E, F, P, Fut>(
        &self,
        category_id: ChannelId,
        change: F,
        persist: P,
    ) -> Result<Option<(Deck, T)>, E>
    where
        F: FnOnce(&mut Deck) -> Result<T, E>,
        P: FnOnce(Deck) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let _edit = self.edits.lock().await;
        let current = self.registry.read().await.by_category(category_id).cloned();
        let Some(mut deck) = current else {
            return Ok(None);
        };

        let output = change(&mut deck)?;
        persist(deck.clone()).await?;
        self.registry.write().await.insert(deck.clone());
        Ok(Some((deck, output)))
    }
}

/// The previous topic worth archiving before `encoded` replaces it.
pub fn replaced_topic(previous: Option<String>, encoded: &str) -> Option<String> {
    previous.filter(|topic| !topic.is_empty() && topic != encoded)
}

/// Builds decks from the channels and roles of a guild.
///
/// A deck is a text channel, outside the recycle bin, whose parent category
/// exists and whose topic decodes. The first such channel of a category wins.
///
/// # Returns
/// - The decks found
/// - The ids of decks whose topic is still in the legacy layout
pub fn collect_decks<'a>(
    channels: impl IntoIterator<Item = &'a GuildChannel>,
    roles: &HashMap<RoleId, Role>,
    recycle_bin: ChannelId,
) -> (Vec<Deck>, Vec<String>) {
    let mut channels: Vec<&GuildChannel> = channels.into_iter().collect();
    channels.sort_by_key(|channel| (channel.position, channel.id));
    let categories: HashMap<ChannelId, &GuildChannel> = channels
        .iter()
        .filter(|channel| channel.kind == ChannelType::Category)
        .map(|channel| (channel.id, *channel))
        .collect();

    let mut decks: Vec<Deck> = Vec::new();
    let mut legacy = Vec::new();
    for channel in channels.iter().filter(|channel| channel.kind == ChannelType::Text) {
        let Some(parent_id) = channel.parent_id else {
            continue;
        };
        if parent_id == recycle_bin || decks.iter().any(|deck| deck.category_id == parent_id) {
            continue;
        }
        let (Some(category), Some(topic)) = (categories.get(&parent_id), channel.topic.as_deref())
        else {
            continue;
        };
        let (record, format) = match DeckRecord::decode(topic) {
            Ok(decoded) => decoded,
            Err(DeckError::NotDeckTopic) => continue,
            Err(e) => {
                tracing::warn!("Skipping malformed deck topic in channel {}: {}", channel.id, e);
                continue;
            }
        };
        if format == TopicFormat::Legacy {
            legacy.push(record.id.clone());
        }
        let role_id = roles
            .values()
            .find(|role| role.name == category.name)
            .map(|role| role.id);
        decks.push(Deck::from_record(
            record,
            category.name.clone(),
            parent_id,
            channel.id,
            role_id,
        ));
    }
    (decks, legacy)
}

/// Name a channel gets when moved to the recycle bin.
pub fn recycled_name(deck_name: &str, channel_name: &str) -> String {
    format!("{}__{}", deck_name, channel_name)
}

/// Overwrites for a deck category: hidden from everyone, visible to the role.
pub fn deck_overwrites(everyone: RoleId, role: RoleId) -> Vec<PermissionOverwrite> {
    vec![
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(everyone),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(role),
        },
    ]
}

pub struct DeckService<'a> {
    ctx: &'a Context,
    state: &'a BotState,
}

impl<'a> DeckService<'a> {
    pub fn new(ctx: &'a Context, state: &'a BotState) -> Self {
        Self { ctx, state }
    }

    /// Rebuilds the registry from the guild and marks it ready.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of decks found
    /// - `Err(AppError)` - Failed to fetch channels or roles
    pub async fn fetch_decks(&self) -> Result<usize, AppError> {
        self.state.decks.between_edits(self.load_decks()).await
    }

    /// Re-reads one deck from its default channel.
    ///
    /// # Returns
    /// - `Ok(Some(Deck))` - The refreshed deck
    /// - `Ok(None)` - The channel no longer holds a deck topic; the deck is dropped
    pub async fn fetch_deck(&self, deck: &Deck) -> Result<Option<Deck>, AppError> {
        self.state.decks.between_edits(self.load_deck(deck)).await
    }

    async fn load_decks(&self) -> Result<usize, AppError> {
        let guild_id = self.state.config.shtelo_guild_id;
        let channels = guild_id.channels(&self.ctx.http).await?;
        let roles = guild_id.roles(&self.ctx.http).await?;

        let (decks, legacy) = collect_decks(
            channels.values(),
            &roles,
            self.state.config.recycle_bin_category_id,
        );
        if !legacy.is_empty() {
            tracing::info!("Decks with legacy topics: {}", legacy.join(", "));
        }

        let count = decks.len();
        self.state
            .decks
            .replace(DeckRegistry::from_decks(decks))
            .await;
        tracing::info!("Loaded {} decks", count);
        Ok(count)
    }

    async fn load_deck(&self, deck: &Deck) -> Result<Option<Deck>, AppError> {
        let channel = self.default_channel(deck).await?;
        let decoded = channel
            .topic
            .as_deref()
            .map(DeckRecord::decode)
            .transpose();

        let mut registry = self.state.decks.write().await;
        match decoded {
            Ok(Some((record, _))) => {
                let fresh = Deck::from_record(
                    record,
                    deck.name.clone(),
                    deck.category_id,
                    deck.default_channel_id,
                    deck.role_id,
                );
                registry.insert(fresh.clone());
                Ok(Some(fresh))
            }
            Ok(None) | Err(DeckError::NotDeckTopic) => {
                registry.remove(deck.category_id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Changes a registered deck and writes it to its channel topic.
    ///
    /// `change` runs on the current registered copy, never on `deck` itself, so
    /// edits made while the caller was waiting are kept.
    ///
    /// # Returns
    /// - `Ok((Deck, T))` - The saved deck and the output of `change`
    /// - `Err(E)` - `change` refused, the deck is gone, or the topic could not be written
    pub async fn update_deck<T, E>(
        &self,
        deck: &Deck,
        change: impl FnOnce(&mut Deck) -> Result<T, E>,
    ) -> Result<(Deck, T), E>
    where
        E: From<AppError>,
    {
        self.state
            .decks
            .update(deck.category_id, change, |fresh| async move {
                self.write_topic(&fresh).await.map_err(E::from)
            })
            .await?
            .ok_or_else(|| E::from(AppError::NotFound(format!("Deck {}", deck.id))))
    }

    /// Writes the deck to its channel topic, then archives the topic it replaced.
    async fn write_topic(&self, deck: &Deck) -> Result<(), AppError> {
        let encoded = deck.record().encode()?;
        let channel = self.default_channel(deck).await?;
        let previous = replaced_topic(channel.topic, &encoded);

        deck.default_channel_id
            .edit(&self.ctx.http, EditChannel::new().topic(encoded))
            .await?;
        tracing::debug!("Saved deck {} ({})", deck.name, deck.id);

        if let Some(previous) = previous {
            let archived = DeckTopicArchiveRepository::new(&self.state.db)
                .create(CreateDeckTopicArchiveParam {
                    deck_id: deck.id.clone(),
                    channel_id: deck.default_channel_id.get(),
                    topic: previous,
                })
                .await;
            if let Err(e) = archived {
                tracing::error!("Failed to archive previous topic of deck {}: {}", deck.id, e);
            }
        }
        Ok(())
    }

    /// Creates role, category and default channel of a new deck.
    ///
    /// The manager gets both the deck role and the manager role.
    pub async fn add_deck(&self, name: &str, manager: UserId) -> Result<Deck, AppError> {
        let guild_id = self.state.config.shtelo_guild_id;
        let id = {
            let registry = self.state.decks.read().await;
            registry.generate_new_id(&mut rng())
        };

        let role = guild_id
            .create_role(self.ctx, EditRole::new().name(name).mentionable(true))
            .await?;
        let overwrites = deck_overwrites(guild_id.everyone_role(), role.id);
        let category = guild_id
            .create_channel(
                self.ctx,
                CreateChannel::new(name)
                    .kind(ChannelType::Category)
                    .permissions(overwrites.clone()),
            )
            .await?;
        let channel = guild_id
            .create_channel(
                self.ctx,
                CreateChannel::new(name)
                    .kind(ChannelType::Text)
                    .category(category.id)
                    .permissions(overwrites),
            )
            .await?;

        self.grant(manager, role.id).await?;
        self.grant(manager, self.state.config.manager_role_id).await?;

        let deck = Deck::from_record(
            DeckRecord {
                id,
                flags: Default::default(),
                manager,
                pending: Vec::new(),
                topic: String::new(),
            },
            name.to_string(),
            category.id,
            channel.id,
            Some(role.id),
        );
        self.write_topic(&deck).await?;
        self.state.decks.write().await.insert(deck.clone());
        tracing::info!("Created deck {} ({}) for {}", deck.name, deck.id, manager);
        Ok(deck)
    }

    /// Closes a deck: channels go to the recycle bin, role and category are deleted.
    pub async fn remove_deck(&self, deck: &Deck) -> Result<(), AppError> {
        let guild_id = self.state.config.shtelo_guild_id;
        let channels = guild_id.channels(&self.ctx.http).await?;

        let mut children: Vec<&GuildChannel> = channels
            .values()
            .filter(|channel| channel.parent_id == Some(deck.category_id))
            .collect();
        children.sort_by_key(|channel| channel.position);
        for channel in children {
            self.remove_channel(channel, &deck.name).await?;
        }

        if let Some(role_id) = deck.role_id {
            guild_id.delete_role(&self.ctx.http, role_id).await?;
        }

        let manages_other = self
            .state
            .decks
            .read()
            .await
            .manages_other_deck(deck.manager, deck.category_id);
        if !manages_other {
            self.revoke(deck.manager, self.state.config.manager_role_id)
                .await?;
        }

        deck.category_id.delete(&self.ctx.http).await?;
        self.state.decks.write().await.remove(deck.category_id);
        tracing::info!("Removed deck {} ({})", deck.name, deck.id);
        Ok(())
    }

    /// Moves a channel into the recycle bin, syncing its permissions.
    pub async fn remove_channel(&self, channel: &GuildChannel, deck_name: &str) -> Result<(), AppError> {
        let recycle_bin = self.state.config.recycle_bin_category_id;
        let overwrites = recycle_bin
            .to_channel(self.ctx)
            .await?
            .guild()
            .map(|bin| bin.permission_overwrites)
            .unwrap_or_default();

        channel
            .id
            .edit(
                &self.ctx.http,
                EditChannel::new()
                    .name(recycled_name(deck_name, &channel.name))
                    .category(Some(recycle_bin))
                    .permissions(overwrites),
            )
            .await?;
        Ok(())
    }

    /// Members holding the deck role.
    pub async fn members(&self, deck: &Deck) -> Result<Vec<Member>, AppError> {
        let Some(role_id) = deck.role_id else {
            return Err(DeckError::RoleNotFound(deck.name.clone()).into());
        };
        let guild_id = self.state.config.shtelo_guild_id;

        let mut holders = Vec::new();
        let mut after = None;
        loop {
            let page = guild_id
                .members(&self.ctx.http, Some(MEMBER_PAGE_SIZE), after)
                .await?;
            let full = page.len() as u64 == MEMBER_PAGE_SIZE;
            after = page.last().map(|member| member.user.id);
            holders.extend(page.into_iter().filter(|member| member.roles.contains(&role_id)));
            if !full {
                break;
            }
        }
        Ok(holders)
    }

    pub async fn is_member(&self, deck: &Deck, user: UserId) -> Result<bool, AppError> {
        let Some(role_id) = deck.role_id else {
            return Ok(false);
        };
        let member = self
            .state
            .config
            .shtelo_guild_id
            .member(self.ctx, user)
            .await?;
        Ok(member.roles.contains(&role_id))
    }

    pub async fn add_member(&self, deck: &Deck, user: UserId) -> Result<(), AppError> {
        let role_id = deck
            .role_id
            .ok_or_else(|| DeckError::RoleNotFound(deck.name.clone()))?;
        self.grant(user, role_id).await
    }

    pub async fn remove_member(&self, deck: &Deck, user: UserId) -> Result<(), AppError> {
        let role_id = deck
            .role_id
            .ok_or_else(|| DeckError::RoleNotFound(deck.name.clone()))?;
        self.revoke(user, role_id).await
    }

    /// Renames the deck's category and role.
    ///
    /// The name is not part of the topic, so only the registry is updated.
    pub async fn rename(&self, deck: &Deck, name: &str) -> Result<Deck, AppError> {
        deck.category_id
            .edit(&self.ctx.http, EditChannel::new().name(name))
            .await?;
        if let Some(role_id) = deck.role_id {
            self.state
                .config
                .shtelo_guild_id
                .edit_role(self.ctx, role_id, EditRole::new().name(name))
                .await?;
        }
        let renamed = self
            .state
            .decks
            .update(
                deck.category_id,
                |deck| {
                    deck.name = name.to_string();
                    Ok::<(), AppError>(())
                },
                |_| async { Ok(()) },
            )
            .await?;
        renamed
            .map(|(deck, ())| deck)
            .ok_or_else(|| AppError::NotFound(format!("Deck {}", deck.id)))
    }

    async fn default_channel(&self, deck: &Deck) -> Result<GuildChannel, AppError> {
        deck.default_channel_id
            .to_channel(self.ctx)
            .await?
            .guild()
            .ok_or_else(|| AppError::NotFound(format!("Default channel of deck {}", deck.id)))
    }

    async fn grant(&self, user: UserId, role_id: RoleId) -> Result<(), AppError> {
        self.ctx
            .http
            .add_member_role(self.state.config.shtelo_guild_id, user, role_id, None)
            .await?;
        Ok(())
    }

    async fn revoke(&self, user: UserId, role_id: RoleId) -> Result<(), AppError> {
        self.ctx
            .http
            .remove_member_role(self.state.config.shtelo_guild_id, user, role_id, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_utils::serenity::{create_deck_role, create_test_channel, ChannelKind};

    const RECYCLE_BIN: u64 = 90;

    fn roles(list: &[Role]) -> HashMap<RoleId, Role> {
        list.iter().map(|role| (role.id, role.clone())).collect()
    }

    #[test]
    fn collects_decks_from_categorised_channels() {
        let channels = vec![
            create_test_channel(10, "보드게임", ChannelKind::Category, None, None),
            create_test_channel(
                11,
                "보드게임",
                ChannelKind::Text,
                Some(10),
                Some("*id: a1c2\n매니저: <@1>\n\n주말 보드게임"),
            ),
            create_test_channel(12, "잡담", ChannelKind::Text, Some(10), Some("그냥 잡담")),
            create_test_channel(20, "일반", ChannelKind::Category, None, None),
            create_test_channel(21, "일반", ChannelKind::Text, Some(20), Some("공지")),
        ];
        let roles = roles(&[create_deck_role(30, "보드게임")]);

        let (decks, legacy) = collect_decks(&channels, &roles, ChannelId::new(RECYCLE_BIN));

        assert_eq!(decks.len(), 1);
        let deck = &decks[0];
        assert_eq!(deck.id, "a1c2");
        assert_eq!(deck.name, "보드게임");
        assert_eq!(deck.category_id, ChannelId::new(10));
        assert_eq!(deck.default_channel_id, ChannelId::new(11));
        assert_eq!(deck.role_id, Some(RoleId::new(30)));
        assert_eq!(deck.topic(), "주말 보드게임");
        assert!(legacy.is_empty());
    }

    #[test]
    fn skips_recycle_bin_and_uncategorised_channels() {
        let topic = "*id: a1c2\n매니저: <@1>";
        let channels = vec![
            create_test_channel(RECYCLE_BIN, "휴지통", ChannelKind::Category, None, None),
            create_test_channel(91, "옛날__채널", ChannelKind::Text, Some(RECYCLE_BIN), Some(topic)),
            create_test_channel(92, "떠돌이", ChannelKind::Text, None, Some(topic)),
        ];

        let (decks, _) = collect_decks(&channels, &HashMap::new(), ChannelId::new(RECYCLE_BIN));
        assert!(decks.is_empty());
    }

    #[test]
    fn reports_legacy_topics_and_missing_roles() {
        let channels = vec![
            create_test_channel(10, "독서", ChannelKind::Category, None, None),
            create_test_channel(
                11,
                "독서",
                ChannelKind::Text,
                Some(10),
                Some("\u{200b}id: cccc\n매니저: <@1>"),
            ),
        ];

        let (decks, legacy) = collect_decks(&channels, &HashMap::new(), ChannelId::new(RECYCLE_BIN));
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].role_id, None);
        assert_eq!(legacy, vec!["cccc".to_string()]);
    }

    #[test]
    fn recycled_names_keep_deck_prefix() {
        assert_eq!(recycled_name("보드게임", "잡담"), "보드게임__잡담");
    }

    #[test]
    fn category_is_hidden_from_everyone() {
        let overwrites = deck_overwrites(RoleId::new(1), RoleId::new(2));
        assert_eq!(overwrites[0].deny, Permissions::VIEW_CHANNEL);
        assert_eq!(overwrites[1].allow, Permissions::VIEW_CHANNEL);
    }

    fn registered_store_deck() -> Deck {
        Deck::from_record(
            DeckRecord {
                id: "a1c2".to_string(),
                flags: Default::default(),
                manager: UserId::new(1),
                pending: Vec::new(),
                topic: "주말 보드게임".to_string(),
            },
            "보드게임".to_string(),
            ChannelId::new(10),
            ChannelId::new(11),
            Some(RoleId::new(30)),
        )
    }

    async fn registered_store() -> DeckStore {
        let store = DeckStore::new();
        store
            .replace(DeckRegistry::from_decks([registered_store_deck()]))
            .await;
        store
    }

    #[test]
    fn only_changed_topics_are_archived() {
        let encoded = "*id: a1c2\n매니저: <@1>";
        assert_eq!(
            replaced_topic(Some("공지".to_string()), encoded),
            Some("공지".to_string())
        );
        assert_eq!(replaced_topic(Some(encoded.to_string()), encoded), None);
        assert_eq!(replaced_topic(Some(String::new()), encoded), None);
        assert_eq!(replaced_topic(None, encoded), None);
    }

    #[tokio::test]
    async fn concurrent_edits_keep_every_application() {
        let store = registered_store().await;
        let category = ChannelId::new(10);
        // Both members looked at the deck before either application was saved.
        let snapshot = store.read().await.by_category(category).cloned().unwrap();
        assert!(snapshot.pending.is_empty());

        let persist = |_: Deck| async {
            tokio::task::yield_now().await;
            Ok::<(), AppError>(())
        };
        let (first, second) = tokio::join!(
            store.update(
                snapshot.category_id,
                |deck| Ok::<_, AppError>(deck.apply(UserId::new(2))),
                persist,
            ),
            store.update(
                snapshot.category_id,
                |deck| Ok::<_, AppError>(deck.apply(UserId::new(3))),
                persist,
            ),
        );
        assert!(first.unwrap().unwrap().1);
        assert!(second.unwrap().unwrap().1);

        let registry = store.read().await;
        let pending = &registry.by_category(category).unwrap().pending;
        assert_eq!(pending.len(), 2);
        assert!(pending.contains(&UserId::new(2)));
        assert!(pending.contains(&UserId::new(3)));
    }

    #[tokio::test]
    async fn accept_during_application_is_not_undone() {
        let store = registered_store().await;
        let category = ChannelId::new(10);
        store
            .update(
                category,
                |deck| Ok::<_, AppError>(deck.apply(UserId::new(2))),
                |_| async { Ok(()) },
            )
            .await
            .unwrap();

        let (accepted, applied) = tokio::join!(
            store.update(
                category,
                |deck| Ok::<_, AppError>(deck.take_pending(&[UserId::new(2)])),
                |_| async {
                    tokio::task::yield_now().await;
                    Ok(())
                },
            ),
            store.update(
                category,
                |deck| Ok::<_, AppError>(deck.apply(UserId::new(3))),
                |_| async { Ok(()) },
            ),
        );
        assert_eq!(accepted.unwrap().unwrap().1, vec![UserId::new(2)]);
        assert!(applied.unwrap().unwrap().1);

        let registry = store.read().await;
        assert_eq!(registry.by_category(category).unwrap().pending, vec![UserId::new(3)]);
    }

    #[tokio::test]
    async fn failed_edits_are_not_committed() {
        let store = registered_store().await;
        let category = ChannelId::new(10);

        let failed = store
            .update(
                category,
                |deck| Ok::<_, AppError>(deck.apply(UserId::new(2))),
                |_| async { Err(AppError::InternalError("topic edit failed".to_string())) },
            )
            .await;
        assert!(failed.is_err());

        let refused = store
            .update(
                category,
                |deck| {
                    deck.set_topic("바뀐 주제");
                    Err::<(), _>(AppError::InternalError("refused".to_string()))
                },
                |_| async { Ok(()) },
            )
            .await;
        assert!(refused.is_err());

        let registry = store.read().await;
        let deck = registry.by_category(category).unwrap();
        assert!(deck.pending.is_empty());
        assert_eq!(deck.topic(), "주말 보드게임");
    }

    #[tokio::test]
    async fn reloads_wait_for_running_edits() {
        let store = registered_store().await;
        let category = ChannelId::new(10);

        let (edited, seen) = tokio::join!(
            store.update(
                category,
                |deck| Ok::<_, AppError>(deck.apply(UserId::new(2))),
                |_| async {
                    for _ in 0..3 {
                        tokio::task::yield_now().await;
                    }
                    Ok(())
                },
            ),
            store.between_edits(async {
                store
                    .read()
                    .await
                    .by_category(category)
                    .map(|deck| deck.pending.clone())
            }),
        );
        assert!(edited.unwrap().unwrap().1);
        assert_eq!(seen, Some(vec![UserId::new(2)]));
    }

    #[tokio::test]
    async fn updating_unregistered_deck_yields_nothing() {
        let store = registered_store().await;
        let result = store
            .update(
                ChannelId::new(99),
                |deck| Ok::<_, AppError>(deck.apply(UserId::new(2))),
                |_| async { Ok(()) },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn store_becomes_ready_after_first_load() {
        let store = DeckStore::new();
        assert!(!store.is_ready());

        store.replace(DeckRegistry::new()).await;
        store.wait_until_ready().await;
        assert!(store.is_ready());
    }
}
