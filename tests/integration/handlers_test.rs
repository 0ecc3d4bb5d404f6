//! Handler flows against a mocked Telegram API and a real database

use std::time::Duration;
use serde_json::json;
use serial_test::serial;
use teloxide::types::{ChatId, Message};
use PartnerChat::config::RedisConfig;
use PartnerChat::handlers::callbacks::menu;
use PartnerChat::handlers::commands::{admin, start};
use PartnerChat::handlers::{handle_message, replies};
use PartnerChat::models::region::Region;
use PartnerChat::models::user::User;
use PartnerChat::state::{ConversationContext, StateStorage};
use crate::helpers::{test_services, TelegramMockServer, TestDatabase, ADMIN_ID};

fn private_message(telegram_id: i64, first_name: &str, language_code: &str, text: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": 1,
        "date": 1640995200,
        "chat": { "id": telegram_id, "type": "private", "first_name": first_name },
        "from": {
            "id": telegram_id,
            "is_bot": false,
            "first_name": first_name,
            "language_code": language_code
        },
        "text": text
    }))
    .expect("valid message json")
}

async fn redis_storage() -> Option<StateStorage> {
    let config = RedisConfig {
        url: std::env::var("TEST_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
        prefix: "partnerchat-test:".to_string(),
        ttl_seconds: 300,
    };

    let storage = tokio::time::timeout(Duration::from_secs(2), StateStorage::new(config))
        .await
        .ok()?
        .ok()?;
    storage.test_connection().await.ok()?;
    Some(storage)
}

fn chat(user: &User) -> ChatId {
    ChatId(user.telegram_id)
}

#[tokio::test]
#[serial]
async fn test_start_registers_and_shows_menu() {
    let Some(db) = TestDatabase::new().await else { return };
    let telegram = TelegramMockServer::new().await;
    let services = test_services(&db);

    let msg = private_message(501, "Ann", "pt-BR", "/start");
    start::handle_start(telegram.bot(), &msg, &services).await.unwrap();

    let user = services.user_service.get_by_telegram_id(501).await.unwrap().unwrap();
    assert_eq!(user.region, "SouthAmerica");

    let sent = telegram.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, 501);
    assert_eq!(sent[0].text, "Welcome Ann!\nRegion: SouthAmerica\nUse buttons below.");
    assert!(sent[0].has_keyboard);
}

#[tokio::test]
#[serial]
async fn test_find_waits_then_notifies_both_partners() {
    let Some(db) = TestDatabase::new().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();
    let services = test_services(&db);

    let alice = db.create_user(11, Region::Europe, false).await;
    let bob = db.create_user(12, Region::Europe, false).await;

    menu::find_partner(&bot, chat(&alice), &alice, &services).await.unwrap();
    menu::find_partner(&bot, chat(&bob), &bob, &services).await.unwrap();

    assert_eq!(
        telegram.texts_to(11).await,
        vec![replies::WAITING_FOR_PARTNER, replies::PARTNER_FOUND]
    );
    assert_eq!(telegram.texts_to(12).await, vec![replies::PARTNER_FOUND]);

    let bob = db.reload(&bob).await;
    menu::find_partner(&bot, chat(&bob), &bob, &services).await.unwrap();
    assert_eq!(telegram.texts_to(12).await.last().map(String::as_str), Some(replies::ALREADY_CONNECTED));
}

#[tokio::test]
#[serial]
async fn test_unreachable_partner_rolls_back_match() {
    let Some(db) = TestDatabase::new().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();
    let services = test_services(&db);

    let alice = db.create_user(21, Region::Asia, false).await;
    let bob = db.create_user(22, Region::Asia, false).await;

    menu::find_partner(&bot, chat(&alice), &alice, &services).await.unwrap();
    telegram.block_chat(21).await;
    menu::find_partner(&bot, chat(&bob), &bob, &services).await.unwrap();

    assert_eq!(
        telegram.texts_to(22).await,
        vec![replies::PARTNER_FOUND, replies::PARTNER_UNREACHABLE]
    );

    let alice = db.reload(&alice).await;
    let bob = db.reload(&bob).await;
    assert_eq!(alice.partner_id, None);
    assert_eq!(bob.partner_id, None);
    assert!(!alice.searching);
}

#[tokio::test]
#[serial]
async fn test_stop_notifies_partner() {
    let Some(db) = TestDatabase::new().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();
    let services = test_services(&db);

    let alice = db.create_user(31, Region::Europe, false).await;
    let bob = db.create_user(32, Region::Europe, false).await;

    menu::stop_chat(&bot, chat(&alice), &alice, &services).await.unwrap();
    assert_eq!(telegram.texts_to(31).await, vec![replies::NOT_IN_CHAT]);

    menu::find_partner(&bot, chat(&alice), &alice, &services).await.unwrap();
    menu::find_partner(&bot, chat(&bob), &bob, &services).await.unwrap();
    let bob = db.reload(&bob).await;

    menu::stop_chat(&bot, chat(&bob), &bob, &services).await.unwrap();

    assert_eq!(telegram.texts_to(31).await.last().map(String::as_str), Some(replies::PARTNER_LEFT));
    let sent = telegram.sent_messages().await;
    let last = sent.last().unwrap();
    assert_eq!(last.chat_id, 32);
    assert_eq!(last.text, replies::LEFT_CHAT);
    assert!(last.has_keyboard);
}

#[tokio::test]
#[serial]
async fn test_stop_ignores_partner_delivery_failure() {
    let Some(db) = TestDatabase::new().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();
    let services = test_services(&db);

    let alice = db.create_user(41, Region::Europe, false).await;
    let bob = db.create_user(42, Region::Europe, false).await;
    menu::find_partner(&bot, chat(&alice), &alice, &services).await.unwrap();
    menu::find_partner(&bot, chat(&bob), &bob, &services).await.unwrap();

    telegram.block_chat(41).await;
    let bob = db.reload(&bob).await;
    menu::stop_chat(&bot, chat(&bob), &bob, &services).await.unwrap();

    assert_eq!(db.reload(&bob).await.partner_id, None);
    assert_eq!(telegram.texts_to(42).await.last().map(String::as_str), Some(replies::LEFT_CHAT));
}

#[tokio::test]
#[serial]
async fn test_next_skips_partner_and_searches_again() {
    let Some(db) = TestDatabase::new().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();
    let services = test_services(&db);

    let alice = db.create_user(51, Region::Africa, false).await;
    let bob = db.create_user(52, Region::Africa, false).await;
    let carol = db.create_user(53, Region::Africa, false).await;

    menu::find_partner(&bot, chat(&alice), &alice, &services).await.unwrap();
    menu::find_partner(&bot, chat(&bob), &bob, &services).await.unwrap();
    menu::find_partner(&bot, chat(&carol), &carol, &services).await.unwrap();

    let bob = db.reload(&bob).await;
    menu::next_partner(&bot, chat(&bob), &bob, &services).await.unwrap();

    assert_eq!(telegram.texts_to(51).await.last().map(String::as_str), Some(replies::PARTNER_SKIPPED));
    assert_eq!(
        telegram.texts_to(52).await,
        vec![replies::PARTNER_FOUND, replies::SEARCHING_NEW_PARTNER, replies::PARTNER_FOUND]
    );
    assert_eq!(db.reload(&bob).await.partner_id, Some(carol.id));
    assert_eq!(db.reload(&alice).await.partner_id, None);
}

#[tokio::test]
#[serial]
async fn test_region_request_requires_premium() {
    let Some(db) = TestDatabase::new().await else { return };
    let Some(storage) = redis_storage().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();

    let regular = db.create_user(61, Region::Europe, false).await;
    menu::request_region(&bot, chat(&regular), &regular, &storage).await.unwrap();
    assert_eq!(telegram.texts_to(61).await, vec![replies::PREMIUM_ONLY]);
    assert!(!storage.context_exists(61).await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_premium_region_conversation() {
    let Some(db) = TestDatabase::new().await else { return };
    let Some(storage) = redis_storage().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();
    let services = test_services(&db);

    let premium = db.create_user(62, Region::Europe, true).await;
    menu::request_region(&bot, chat(&premium), &premium, &storage).await.unwrap();
    assert!(storage.context_exists(62).await.unwrap());

    handle_message(bot.clone(), private_message(62, "Pat", "en", "Narnia"), &services, &storage).await.unwrap();
    assert!(storage.context_exists(62).await.unwrap());

    handle_message(bot.clone(), private_message(62, "Pat", "en", "Oceania"), &services, &storage).await.unwrap();
    assert!(!storage.context_exists(62).await.unwrap());
    assert_eq!(db.reload(&premium).await.region, "Oceania");

    let texts = telegram.texts_to(62).await;
    assert_eq!(texts[0], replies::region_prompt());
    assert_eq!(texts[1], replies::invalid_region());
    assert_eq!(texts[2], replies::region_updated("Oceania"));
}

#[tokio::test]
#[serial]
async fn test_stale_region_context_is_dropped_for_regular_user() {
    let Some(db) = TestDatabase::new().await else { return };
    let Some(storage) = redis_storage().await else { return };
    let telegram = TelegramMockServer::new().await;
    let services = test_services(&db);

    db.create_user(63, Region::Europe, false).await;
    storage.save_context(&ConversationContext::region_selection(63)).await.unwrap();

    handle_message(telegram.bot(), private_message(63, "Lee", "en", "Asia"), &services, &storage).await.unwrap();

    assert!(!storage.context_exists(63).await.unwrap());
    assert_eq!(telegram.texts_to(63).await, vec![replies::USE_BUTTONS]);
}

#[tokio::test]
#[serial]
async fn test_text_is_relayed_with_rate_limit() {
    let Some(db) = TestDatabase::new().await else { return };
    let Some(storage) = redis_storage().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();
    let services = test_services(&db);

    let alice = db.create_user(71, Region::Europe, false).await;
    let bob = db.create_user(72, Region::Europe, false).await;
    storage.delete_context(71).await.unwrap();
    menu::find_partner(&bot, chat(&alice), &alice, &services).await.unwrap();
    menu::find_partner(&bot, chat(&bob), &bob, &services).await.unwrap();

    // Quota in test settings is two messages
    for text in ["hi", "how are you?", "hello?"] {
        handle_message(bot.clone(), private_message(71, "Al", "en", text), &services, &storage).await.unwrap();
    }

    let to_bob = telegram.texts_to(72).await;
    assert_eq!(to_bob[to_bob.len() - 2..].to_vec(), vec!["hi", "how are you?"]);
    assert_eq!(telegram.texts_to(71).await.last().map(String::as_str), Some(replies::SLOW_DOWN));
}

#[tokio::test]
#[serial]
async fn test_unpaired_text_points_to_menu() {
    let Some(db) = TestDatabase::new().await else { return };
    let Some(storage) = redis_storage().await else { return };
    let telegram = TelegramMockServer::new().await;
    let services = test_services(&db);

    storage.delete_context(81).await.unwrap();
    handle_message(telegram.bot(), private_message(81, "Sam", "de", "hello"), &services, &storage).await.unwrap();

    let sent = telegram.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, replies::USE_BUTTONS);
    assert!(sent[0].has_keyboard);
}

#[tokio::test]
#[serial]
async fn test_admin_commands() {
    let Some(db) = TestDatabase::new().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();
    let services = test_services(&db);
    let admin_chat = ChatId(ADMIN_ID);

    db.create_user(91, Region::Europe, false).await;

    admin::handle_premium(bot.clone(), ChatId(91), 91, "91", &services).await.unwrap();
    assert_eq!(telegram.texts_to(91).await, vec![replies::ADMINS_ONLY]);

    admin::handle_premium(bot.clone(), admin_chat, ADMIN_ID, "91 on", &services).await.unwrap();
    admin::handle_premium(bot.clone(), admin_chat, ADMIN_ID, "92", &services).await.unwrap();
    admin::handle_premium(bot.clone(), admin_chat, ADMIN_ID, "oops", &services).await.unwrap();
    admin::handle_stats(bot.clone(), admin_chat, ADMIN_ID, &services).await.unwrap();

    let texts = telegram.texts_to(ADMIN_ID).await;
    assert_eq!(texts[0], replies::premium_changed(91, true));
    assert_eq!(texts[1], replies::USER_NOT_FOUND);
    assert_eq!(texts[2], replies::PREMIUM_USAGE);
    assert!(texts[3].contains("Premium: 1"));

    let user = services.user_service.get_by_telegram_id(91).await.unwrap().unwrap();
    assert!(user.premium);
}

#[tokio::test]
#[serial]
async fn test_unknown_commands_are_not_relayed() {
    let Some(db) = TestDatabase::new().await else { return };
    let Some(storage) = redis_storage().await else { return };
    let telegram = TelegramMockServer::new().await;
    let bot = telegram.bot();
    let services = test_services(&db);

    let alice = db.create_user(73, Region::Europe, false).await;
    let bob = db.create_user(74, Region::Europe, false).await;
    menu::find_partner(&bot, chat(&alice), &alice, &services).await.unwrap();
    menu::find_partner(&bot, chat(&bob), &bob, &services).await.unwrap();
    let before = telegram.sent_messages().await.len();

    for text in ["/foo", "/start@otherbot"] {
        handle_message(bot.clone(), private_message(73, "Al", "en", text), &services, &storage).await.unwrap();
    }

    assert_eq!(telegram.sent_messages().await.len(), before);
    assert_eq!(telegram.texts_to(74).await, vec![replies::PARTNER_FOUND]);
}
