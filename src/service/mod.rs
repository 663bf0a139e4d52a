pub mod chatter;
pub mod deck;
pub mod game;
pub mod google;
pub mod interface;
pub mod protocol;
pub mod shtelo;
