//! MatchmakingService and UserService flows

use assert_matches::assert_matches;
use serial_test::serial;
use PartnerChat::database::UnpairOutcome;
use PartnerChat::models::region::Region;
use PartnerChat::services::{FindOutcome, RelayTarget};
use PartnerChat::PartnerChatError;
use crate::helpers::{test_services, TestDatabase};

#[tokio::test]
#[serial]
async fn test_find_then_match_then_leave() {
    let Some(db) = TestDatabase::new().await else { return };
    let services = test_services(&db);
    let matchmaking = &services.matchmaking_service;

    let alice = db.create_user(1, Region::Asia, false).await;
    let bob = db.create_user(2, Region::Asia, false).await;

    assert_matches!(matchmaking.find_partner(&alice).await.unwrap(), FindOutcome::Waiting);
    assert_matches!(
        matchmaking.find_partner(&bob).await.unwrap(),
        FindOutcome::Matched { ref partner, .. } if partner.id == alice.id
    );

    let bob = db.reload(&bob).await;
    assert_matches!(matchmaking.find_partner(&bob).await.unwrap(), FindOutcome::AlreadyConnected);

    assert_matches!(
        matchmaking.leave(&bob).await.unwrap(),
        UnpairOutcome::Left { partner: Some(ref p) } if p.id == alice.id
    );
}

#[tokio::test]
#[serial]
async fn test_relay_target_resolution() {
    let Some(db) = TestDatabase::new().await else { return };
    let services = test_services(&db);
    let matchmaking = &services.matchmaking_service;

    let alice = db.create_user(1, Region::Europe, false).await;
    let bob = db.create_user(2, Region::Europe, false).await;

    assert_matches!(matchmaking.relay_target(&alice).await.unwrap(), RelayTarget::NotPaired);

    matchmaking.find_partner(&alice).await.unwrap();
    matchmaking.find_partner(&bob).await.unwrap();

    let alice = db.reload(&alice).await;
    assert_matches!(
        matchmaking.relay_target(&alice).await.unwrap(),
        RelayTarget::Partner(ref p) if p.id == bob.id
    );

    // Partner row deleted behind the user's back
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(bob.id)
        .execute(&db.pool)
        .await
        .unwrap();
    let mut stale = alice.clone();
    stale.partner_id = Some(bob.id);
    assert_matches!(matchmaking.relay_target(&stale).await.unwrap(), RelayTarget::Missing);
}

#[tokio::test]
#[serial]
async fn test_rollback_match_removes_unreachable_partner_from_pool() {
    let Some(db) = TestDatabase::new().await else { return };
    let services = test_services(&db);
    let matchmaking = &services.matchmaking_service;

    let alice = db.create_user(1, Region::Europe, false).await;
    let bob = db.create_user(2, Region::Europe, false).await;
    let carol = db.create_user(3, Region::Europe, false).await;

    matchmaking.find_partner(&alice).await.unwrap();
    let FindOutcome::Matched { me, partner } = matchmaking.find_partner(&bob).await.unwrap() else {
        panic!("expected a match");
    };
    matchmaking.rollback_match(&me, &partner).await.unwrap();

    // Alice is out of the pool, so Carol waits instead of matching her
    assert_matches!(matchmaking.find_partner(&carol).await.unwrap(), FindOutcome::Waiting);
    assert_eq!(db.reload(&bob).await.partner_id, None);
}

#[tokio::test]
#[serial]
async fn test_update_region_validates_name() {
    let Some(db) = TestDatabase::new().await else { return };
    let services = test_services(&db);
    let alice = db.create_user(1, Region::Europe, true).await;

    assert_matches!(
        services.user_service.update_region(&alice, "Atlantis").await,
        Err(PartnerChatError::InvalidInput(_))
    );
    assert_matches!(
        services.user_service.update_region(&alice, "asia").await,
        Err(PartnerChatError::InvalidInput(_))
    );

    let updated = services.user_service.update_region(&alice, " Oceania ").await.unwrap();
    assert_eq!(updated.region, "Oceania");
}

#[tokio::test]
#[serial]
async fn test_set_premium_requires_known_user() {
    let Some(db) = TestDatabase::new().await else { return };
    let services = test_services(&db);
    db.create_user(55, Region::Europe, false).await;

    let user = services.user_service.set_premium(55, true, 1000).await.unwrap();
    assert!(user.premium);

    assert_matches!(
        services.user_service.set_premium(56, true, 1000).await,
        Err(PartnerChatError::UserNotFound { user_id: 56 })
    );
}
