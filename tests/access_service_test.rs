use std::sync::Arc;

use tiergate::model::AdminActor;
use tiergate::model::ContentItemModel;
use tiergate::model::SubscriberStatus;
use tiergate::model::SubscriptionTier;
use tiergate::service::Services;

mod common;

macro_rules! access_test {
    ($name:ident, |$services:ident, $root:ident| $body:block) => {
        #[tokio::test]
        async fn $name() {
            let (db, db_path) = common::setup_db().await;
            let $services = Services::new(db.clone());
            let $root = AdminActor::root("admin");

            $body

            common::teardown_db(db_path).await;
        }
    };
}

async fn seed_item(
    services: &Services,
    root: &AdminActor,
    title: &str,
    minimum_tier: SubscriptionTier,
    is_active: bool,
) -> i64 {
    let item = ContentItemModel {
        title: title.to_string(),
        description: format!("{title} description"),
        minimum_tier,
        is_active,
        ..Default::default()
    };
    services
        .content
        .create(root, &item)
        .await
        .expect("Failed to create content item")
}

/// Catalog from the canonical scenario: one Bronze item, one Gold item,
/// and an inactive Silver item.
async fn seed_scenario_catalog(services: &Services, root: &AdminActor) -> (i64, i64, i64) {
    let a = seed_item(services, root, "a", SubscriptionTier::Bronze, true).await;
    let b = seed_item(services, root, "b", SubscriptionTier::Gold, true).await;
    let c = seed_item(services, root, "c", SubscriptionTier::Silver, false).await;
    (a, b, c)
}

access_test!(test_visible_content_filters_by_tier_and_active, |services,
                                                               root| {
    let (a, _b, _c) = seed_scenario_catalog(&services, &root).await;

    services
        .subscribers
        .create(
            &root,
            "silver@x.com",
            "silver",
            SubscriptionTier::Silver,
            SubscriberStatus::Active,
        )
        .await
        .unwrap();
    services.permissions.grant(&root, "silver@x.com").await.unwrap();

    let visible = services.access.visible_content("silver@x.com").await.unwrap();
    let ids: Vec<i64> = visible.iter().map(|item| item.id).collect();
    // b excluded by tier, c excluded by is_active
    assert_eq!(ids, vec![a]);
});

access_test!(test_visible_content_for_top_tier, |services, root| {
    let (a, b, _c) = seed_scenario_catalog(&services, &root).await;

    services
        .subscribers
        .create(
            &root,
            "diamond@x.com",
            "diamond",
            SubscriptionTier::Diamond,
            SubscriberStatus::Active,
        )
        .await
        .unwrap();
    services.permissions.grant(&root, "diamond@x.com").await.unwrap();

    let visible = services.access.visible_content("diamond@x.com").await.unwrap();
    let ids: Vec<i64> = visible.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![a, b]);
});

access_test!(test_no_permission_sees_nothing, |services, root| {
    seed_scenario_catalog(&services, &root).await;

    // Diamond subscriber, but never allow-listed
    services
        .subscribers
        .create(
            &root,
            "outsider@x.com",
            "outsider",
            SubscriptionTier::Diamond,
            SubscriberStatus::Active,
        )
        .await
        .unwrap();

    let visible = services.access.visible_content("outsider@x.com").await.unwrap();
    assert!(visible.is_empty());
});

access_test!(test_revoked_permission_sees_nothing, |services, root| {
    seed_scenario_catalog(&services, &root).await;

    services.permissions.grant(&root, "was@x.com").await.unwrap();
    services.permissions.revoke(&root, "was@x.com").await.unwrap();

    assert!(!services.access.has_permission("was@x.com").await.unwrap());
    let visible = services.access.visible_content("was@x.com").await.unwrap();
    assert!(visible.is_empty());
});

access_test!(test_permission_without_subscriber_gets_bronze, |services,
                                                              root| {
    let (a, _b, _c) = seed_scenario_catalog(&services, &root).await;

    // Allow-listed but never registered: fallback tier applies
    services.permissions.grant(&root, "ghost@x.com").await.unwrap();

    assert_eq!(
        services.access.resolve_tier("ghost@x.com").await.unwrap(),
        SubscriptionTier::Bronze
    );
    let visible = services.access.visible_content("ghost@x.com").await.unwrap();
    let ids: Vec<i64> = visible.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![a]);
});

access_test!(test_visibility_is_monotonic_in_tier, |services, root| {
    seed_scenario_catalog(&services, &root).await;

    services.permissions.grant(&root, "user@x.com").await.unwrap();
    services
        .subscribers
        .create(
            &root,
            "user@x.com",
            "user",
            SubscriptionTier::Bronze,
            SubscriberStatus::Active,
        )
        .await
        .unwrap();

    let mut previous: Vec<i64> = Vec::new();
    for rank in 1..=5 {
        let tier = SubscriptionTier::try_from(rank).unwrap();
        let roster = services.subscribers.list(&root).await.unwrap();
        let id = roster
            .iter()
            .find(|s| s.email == "user@x.com")
            .unwrap()
            .id;
        assert!(services.subscribers.set_tier(&root, id, tier).await.unwrap());

        let visible = services.access.visible_content("user@x.com").await.unwrap();
        let ids: Vec<i64> = visible.iter().map(|item| item.id).collect();
        assert!(
            previous.iter().all(|id| ids.contains(id)),
            "tier {rank} lost items visible at lower tiers"
        );
        previous = ids;
    }
});

access_test!(test_can_access_tier, |services, root| {
    services
        .subscribers
        .create(
            &root,
            "gold@x.com",
            "gold",
            SubscriptionTier::Gold,
            SubscriberStatus::Active,
        )
        .await
        .unwrap();
    services.permissions.grant(&root, "gold@x.com").await.unwrap();

    let access = &services.access;
    assert!(access.can_access_tier("gold@x.com", SubscriptionTier::Bronze).await.unwrap());
    assert!(access.can_access_tier("gold@x.com", SubscriptionTier::Gold).await.unwrap());
    assert!(!access.can_access_tier("gold@x.com", SubscriptionTier::Platinum).await.unwrap());

    // Same tier, no permission
    services
        .subscribers
        .create(
            &root,
            "nogrant@x.com",
            "nogrant",
            SubscriptionTier::Gold,
            SubscriberStatus::Active,
        )
        .await
        .unwrap();
    assert!(!access.can_access_tier("nogrant@x.com", SubscriptionTier::Bronze).await.unwrap());
});

access_test!(test_catalog_order_is_insertion_order, |services, root| {
    let z = seed_item(&services, &root, "zeta", SubscriptionTier::Bronze, true).await;
    let a = seed_item(&services, &root, "alpha", SubscriptionTier::Bronze, true).await;
    let m = seed_item(&services, &root, "mid", SubscriptionTier::Bronze, true).await;

    services.permissions.grant(&root, "user@x.com").await.unwrap();

    let visible = services.access.visible_content("user@x.com").await.unwrap();
    let ids: Vec<i64> = visible.iter().map(|item| item.id).collect();
    // No re-sorting by title or tier
    assert_eq!(ids, vec![z, a, m]);
});
