//! 类型模块：服务返回的 JSON 记录的强类型映射。
//!
//! # Types Module
//!
//! Strongly-typed records for the service's JSON payloads. Every record ignores unknown
//! fields and treats most fields as optional, since the service omits or nulls them
//! freely. Derived values (a turn's text, a legacy chat's target username, ...) are
//! resolved once while decoding.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`account`] | The current account, personas and account updates |
//! | [`character`] | Characters, listings, search hits, voices |
//! | [`chat1`] | Legacy history-based chat records |
//! | [`chat2`] | Turn protocol records: turns, candidates, chats |
//! | [`media`] | Image references and CDN URLs |
//! | [`post`] | Community posts, comments and topics |
//! | [`recent`] | Recent chats and rooms |
//! | [`user`] | Public user profiles |
//! | [`timestamp`] | Lenient timestamp decoding |

pub mod account;
pub mod character;
pub mod chat1;
pub mod chat2;
pub mod media;
pub mod post;
pub mod recent;
pub mod timestamp;
pub mod user;

pub use account::{AccountUpdate, Guest, Me, Persona, PersonaShort, Profile};
pub use character::{
    Categories, Character, CharacterShort, CharacterUpdate, NewCharacter, SearchResult, Voice,
};
pub use chat1::{
    Chat, HistoryMessage, HistoryPage, HistorySummary, Message, Migration, Rating, RoomCharacter,
};
pub use chat2::{
    Author, Candidate, ChatData, ChatType, ChatVisibility, Editor, Turn, TurnHistory, TurnKey,
};
pub use media::{HasAvatar, Image, ImageKind};
pub use post::{Comment, Post, PostKind, PostThread, Topic};
pub use recent::{RecentChat, RecentRoom, RoomParticipant};
pub use user::PublicUser;
