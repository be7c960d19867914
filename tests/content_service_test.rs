use tiergate::model::AdminActor;
use tiergate::model::Capability;
use tiergate::model::CapabilitySet;
use tiergate::model::ContentDetails;
use tiergate::model::ContentItemModel;
use tiergate::model::ContentQueryOptBuilder;
use tiergate::model::ContentType;
use tiergate::model::SubscriptionTier;
use tiergate::service::Services;
use tiergate::service::error::ServiceError;

mod common;

macro_rules! content_test {
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

fn item(title: &str, content_type: ContentType, tier: SubscriptionTier) -> ContentItemModel {
    ContentItemModel {
        title: title.to_string(),
        description: format!("{title} description"),
        content_type,
        minimum_tier: tier,
        is_active: true,
        ..Default::default()
    }
}

content_test!(test_create_and_get, |services, root| {
    let mut download = item("Loader v3", ContentType::Download, SubscriptionTier::Gold);
    download.details = sqlx::types::Json(ContentDetails {
        download_url: Some("https://cdn.example.com/loader-v3.zip".to_string()),
        ..Default::default()
    });

    let id = services.content.create(&root, &download).await.unwrap();
    let fetched = services.content.get(id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Loader v3");
    assert_eq!(fetched.content_type, ContentType::Download);
    assert_eq!(fetched.minimum_tier, SubscriptionTier::Gold);
    assert_eq!(
        fetched.details.download_url.as_deref(),
        Some("https://cdn.example.com/loader-v3.zip")
    );
});

content_test!(test_update_overwrites_fields, |services, root| {
    let id = services
        .content
        .create(&root, &item("Giveaway", ContentType::Giveaway, SubscriptionTier::Bronze))
        .await
        .unwrap();

    let mut fetched = services.content.get(id).await.unwrap().unwrap();
    fetched.minimum_tier = SubscriptionTier::Diamond;
    fetched.is_active = false;
    services.content.update(&root, &fetched).await.unwrap();

    let updated = services.content.get(id).await.unwrap().unwrap();
    assert_eq!(updated.minimum_tier, SubscriptionTier::Diamond);
    assert!(!updated.is_active);
});

content_test!(test_remove, |services, root| {
    let id = services
        .content
        .create(&root, &item("Old update", ContentType::Update, SubscriptionTier::Bronze))
        .await
        .unwrap();

    assert!(services.content.remove(&root, id).await.unwrap());
    assert!(!services.content.remove(&root, id).await.unwrap());
    assert!(services.content.get(id).await.unwrap().is_none());
});

content_test!(test_list_with_filters, |services, root| {
    let d1 = services
        .content
        .create(&root, &item("dl-1", ContentType::Download, SubscriptionTier::Bronze))
        .await
        .unwrap();
    let d2 = services
        .content
        .create(&root, &item("dl-2", ContentType::Download, SubscriptionTier::Diamond))
        .await
        .unwrap();
    let g1 = services
        .content
        .create(&root, &item("ga-1", ContentType::Giveaway, SubscriptionTier::Silver))
        .await
        .unwrap();

    let mut inactive = item("dl-3", ContentType::Download, SubscriptionTier::Bronze);
    inactive.is_active = false;
    let d3 = services.content.create(&root, &inactive).await.unwrap();

    // By type
    let downloads = services
        .content
        .list(
            &root,
            &ContentQueryOptBuilder::default()
                .content_type(Some(ContentType::Download))
                .build()
                .unwrap(),
        )
        .await
        .unwrap();
    let ids: Vec<i64> = downloads.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![d1, d2, d3]);

    // Active only, capped at Silver
    let low_tier = services
        .content
        .list(
            &root,
            &ContentQueryOptBuilder::default()
                .active_only(true)
                .max_tier(Some(SubscriptionTier::Silver))
                .build()
                .unwrap(),
        )
        .await
        .unwrap();
    let ids: Vec<i64> = low_tier.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![d1, g1]);

    // Limit
    let first_two = services
        .content
        .list(
            &root,
            &ContentQueryOptBuilder::default()
                .limit(Some(2))
                .build()
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first_two.len(), 2);
});

content_test!(test_mutations_require_capability, |services, root| {
    let perms_only = AdminActor::new(
        "perms-only",
        CapabilitySet::of([Capability::ManagePermissions]),
    );

    let res = services
        .content
        .create(&perms_only, &item("x", ContentType::Download, SubscriptionTier::Bronze))
        .await;
    assert!(matches!(res, Err(ServiceError::Forbidden { .. })));

    let res = services.content.remove(&perms_only, 1).await;
    assert!(matches!(res, Err(ServiceError::Forbidden { .. })));

    // Read path without a gate
    let id = services
        .content
        .create(&root, &item("x", ContentType::Download, SubscriptionTier::Bronze))
        .await
        .unwrap();
    assert!(services.content.get(id).await.unwrap().is_some());
});
