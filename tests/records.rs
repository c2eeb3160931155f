//! Typed records decoded from response fixtures.

use characterai::types::{
    Chat, ChatData, ChatType, ChatVisibility, HasAvatar, HistoryPage, PostThread, RecentRoom,
    TurnHistory,
};
use serde_json::json;

#[test]
fn legacy_history_page_keeps_order_and_renames() {
    let page: HistoryPage = serde_json::from_value(json!({
        "messages": [
            {"id": 1, "uuid": "m1", "text": "hi", "src__name": "Me", "src__is_human": true},
            {"id": 2, "uuid": "m2", "text": "hello", "src__name": "Bot",
             "src__character__avatar_file_name": "bot.png", "unexpected": [1, 2]}
        ],
        "next_page": 2,
        "has_more": true
    }))
    .unwrap();

    assert!(page.has_more);
    assert_eq!(page.next_page, Some(2));
    let texts: Vec<&str> = page.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["hi", "hello"]);
    assert_eq!(page.messages[0].src_is_human, Some(true));
    assert_eq!(page.messages[1].src_name.as_deref(), Some("Bot"));
    assert_eq!(
        page.messages[1].src_avatar_file_name.as_deref(),
        Some("bot.png")
    );
}

#[test]
fn chat_target_is_the_first_non_human_participant() {
    let chat: Chat = serde_json::from_value(json!({
        "external_id": "abc",
        "participants": [
            {"is_human": false, "user": {"username": "bot1"}},
            {"is_human": true, "user": {"username": "me"}}
        ]
    }))
    .unwrap();
    assert_eq!(chat.tgt.as_deref(), Some("bot1"));
}

#[test]
fn turn_history_and_chat_listing() {
    let history: TurnHistory = serde_json::from_value(json!({
        "turns": [{
            "turn_key": {"chat_id": "c1", "turn_id": "t2"},
            "author": {"author_id": "char-1", "name": "Bot"},
            "candidates": [{"candidate_id": "x", "raw_content": "latest", "is_final": true}],
            "create_time": "2024-05-01 10:00:00"
        }],
        "meta": {"next_token": "tok-2"}
    }))
    .unwrap();
    assert_eq!(history.turns[0].text(), "latest");
    assert!(history.turns[0].create_time.is_some());
    assert_eq!(history.meta.next_token.as_deref(), Some("tok-2"));

    let chat: ChatData = serde_json::from_value(json!({
        "chat_id": "c1",
        "type": "TYPE_ROOM",
        "visibility": "VISIBILITY_SOMETHING_NEW",
        "create_time": "not a date"
    }))
    .unwrap();
    assert_eq!(chat.chat_type, ChatType::Room);
    assert_eq!(chat.visibility, ChatVisibility::Unknown);
    assert!(chat.create_time.is_none());
    assert!(chat.preview_turns.is_empty());
}

#[test]
fn rooms_and_posts() {
    let room: RecentRoom = serde_json::from_value(json!({
        "external_id": "r1",
        "title": "Party",
        "participants": [{"name": "One", "avatar_file_name": "one.png"}, {"name": "Two"}]
    }))
    .unwrap();
    assert_eq!(room.participants.len(), 2);
    assert!(room.participants[0].avatar().is_some());
    assert!(room.participants[1].avatar().is_none());

    let thread: PostThread = serde_json::from_value(json!({
        "post": {"external_id": "p1", "post_title": "Hello", "poster__username": "alice", "is_locked": false},
        "comments": [{"uuid": "c-1", "text": "nice", "src__user__username": "bob"}]
    }))
    .unwrap();
    assert_eq!(thread.post.title.as_deref(), Some("Hello"));
    assert_eq!(thread.post.poster_username.as_deref(), Some("alice"));
    assert_eq!(thread.post.extra["is_locked"], false);
    assert_eq!(thread.comments[0].author_username.as_deref(), Some("bob"));
}
