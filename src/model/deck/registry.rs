use std::collections::HashMap;

use rand::seq::IndexedRandom;
use rand::Rng;
use serenity::all::{ChannelId, UserId};

use crate::model::deck::{Deck, ID_LENGTH, VALID_ID_CHARS};

/// In-memory index of the known decks, keyed by category channel.
#[derive(Debug, Clone, Default)]
pub struct DeckRegistry {
    decks: HashMap<ChannelId, Deck>,
}

impl DeckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_decks(decks: impl IntoIterator<Item = Deck>) -> Self {
        Self {
            decks: decks
                .into_iter()
                .map(|deck| (deck.category_id, deck))
                .collect(),
        }
    }

    /// Inserts or replaces the deck living in `deck.category_id`.
    pub fn insert(&mut self, deck: Deck) -> Option<Deck> {
        self.decks.insert(deck.category_id, deck)
    }

    pub fn remove(&mut self, category_id: ChannelId) -> Option<Deck> {
        self.decks.remove(&category_id)
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn by_category(&self, category_id: ChannelId) -> Option<&Deck> {
        self.decks.get(&category_id)
    }

    /// Finds the deck a channel belongs to.
    ///
    /// # Arguments
    /// - `channel_id` - The channel itself, matched when it is a deck category
    /// - `parent_id` - The channel's category, if any
    pub fn by_channel(&self, channel_id: ChannelId, parent_id: Option<ChannelId>) -> Option<&Deck> {
        self.by_category(channel_id)
            .or_else(|| parent_id.and_then(|parent| self.by_category(parent)))
    }

    pub fn by_id(&self, id: &str) -> Option<&Deck> {
        self.decks.values().find(|deck| deck.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Deck> {
        self.decks.values().find(|deck| deck.name == name)
    }

    pub fn find_by_topic(&self, keyword: &str) -> Vec<&Deck> {
        let mut decks: Vec<&Deck> = self
            .decks
            .values()
            .filter(|deck| deck.topic().contains(keyword))
            .collect();
        decks.sort_by(|a, b| a.name.cmp(&b.name));
        decks
    }

    /// All decks ordered by name.
    pub fn sorted(&self) -> Vec<&Deck> {
        let mut decks: Vec<&Deck> = self.decks.values().collect();
        decks.sort_by(|a, b| a.name.cmp(&b.name));
        decks
    }

    /// Whether `manager` runs a deck other than the one in `except_category`.
    pub fn manages_other_deck(&self, manager: UserId, except_category: ChannelId) -> bool {
        self.decks
            .values()
            .any(|deck| deck.manager == manager && deck.category_id != except_category)
    }

    /// Draws random ids until one is not used by any deck.
    pub fn generate_new_id<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let alphabet: Vec<char> = VALID_ID_CHARS.chars().collect();
        loop {
            let id: String = (0..ID_LENGTH)
                .filter_map(|_| alphabet.choose(rng).copied())
                .collect();
            if self.by_id(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::deck::{is_valid_id, topic::DeckRecord, DeckFlags};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deck(id: &str, name: &str, category: u64, manager: u64, topic: &str) -> Deck {
        Deck::from_record(
            DeckRecord {
                id: id.to_string(),
                flags: DeckFlags::default(),
                manager: UserId::new(manager),
                pending: Vec::new(),
                topic: topic.to_string(),
            },
            name.to_string(),
            ChannelId::new(category),
            ChannelId::new(category + 1),
            None,
        )
    }

    fn registry() -> DeckRegistry {
        DeckRegistry::from_decks([
            deck("aaaa", "보드게임", 10, 1, "주말 보드게임"),
            deck("cccc", "독서", 20, 1, "한 달에 한 권"),
            deck("dddd", "게임 개발", 30, 2, "게임을 만듭니다"),
        ])
    }

    #[test]
    fn looks_up_by_channel_id_and_name() {
        let registry = registry();

        assert_eq!(registry.by_category(ChannelId::new(10)).unwrap().id, "aaaa");
        assert_eq!(
            registry
                .by_channel(ChannelId::new(99), Some(ChannelId::new(20)))
                .unwrap()
                .name,
            "독서"
        );
        assert_eq!(
            registry.by_channel(ChannelId::new(30), None).unwrap().id,
            "dddd"
        );
        assert!(registry.by_channel(ChannelId::new(99), None).is_none());
        assert_eq!(registry.by_id("cccc").unwrap().name, "독서");
        assert_eq!(registry.by_name("게임 개발").unwrap().id, "dddd");
        assert!(registry.by_id("zzzz").is_none());
    }

    #[test]
    fn finds_by_topic_keyword() {
        let registry = registry();
        let found: Vec<&str> = registry
            .find_by_topic("게임")
            .into_iter()
            .map(|deck| deck.id.as_str())
            .collect();
        assert_eq!(found, vec!["dddd", "aaaa"]);
    }

    #[test]
    fn manager_of_several_decks() {
        let registry = registry();
        assert!(registry.manages_other_deck(UserId::new(1), ChannelId::new(10)));
        assert!(!registry.manages_other_deck(UserId::new(2), ChannelId::new(30)));
    }

    #[test]
    fn generated_ids_are_valid_and_unused() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let id = registry.generate_new_id(&mut rng);
            assert!(is_valid_id(&id));
            assert!(registry.by_id(&id).is_none());
        }
    }

    #[test]
    fn insert_replaces_same_category() {
        let mut registry = registry();
        let replaced = registry.insert(deck("eeee", "보드게임", 10, 3, ""));
        assert_eq!(replaced.unwrap().id, "aaaa");
        assert_eq!(registry.len(), 3);
        assert!(registry.remove(ChannelId::new(10)).is_some());
        assert_eq!(registry.len(), 2);
    }
}
