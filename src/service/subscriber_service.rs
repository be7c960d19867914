//! Subscriber roster management.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::model::AdminActor;
use crate::model::Capability;
use crate::model::SubscriberModel;
use crate::model::SubscriberStatus;
use crate::model::SubscriptionTier;
use crate::repository::Repository;
use crate::repository::table::Table;
use crate::service::error::ServiceError;

/// Result of a registration or admin create.
#[derive(Debug, Clone)]
pub enum RegisterOutcome {
    Registered(SubscriberModel),
    /// A subscriber with this email already exists; carried unchanged.
    AlreadyRegistered(SubscriberModel),
}

/// Service for managing the subscriber roster.
pub struct SubscriberService {
    db: Arc<Repository>,
}

impl SubscriberService {
    /// Creates a new subscriber service.
    pub fn new(db: Arc<Repository>) -> Self {
        Self { db }
    }

    fn authorize(&self, actor: &AdminActor) -> Result<(), ServiceError> {
        if !actor.capabilities.allows(Capability::ManageSubscribers) {
            return Err(ServiceError::Forbidden {
                actor: actor.name.clone(),
                capability: Capability::ManageSubscribers,
            });
        }
        Ok(())
    }

    async fn insert_subscriber(
        &self,
        email: &str,
        nickname: &str,
        tier: SubscriptionTier,
        status: SubscriberStatus,
    ) -> Result<RegisterOutcome, ServiceError> {
        if let Some(existing) = self.db.subscriber.select_by_email(email).await? {
            return Ok(RegisterOutcome::AlreadyRegistered(existing));
        }

        let mut model = SubscriberModel {
            email: email.to_string(),
            nickname: nickname.to_string(),
            tier,
            status,
            subscribed_at: Utc::now(),
            last_login: None,
            ..Default::default()
        };
        model.id = self.db.subscriber.insert(&model).await?;
        info!("Registered subscriber {email} at tier {}", tier.display_name());
        Ok(RegisterOutcome::Registered(model))
    }

    /// Customer-facing self-registration: Bronze tier, pending status.
    ///
    /// # Performance
    /// * DB calls: 1 when already registered, 2 otherwise
    pub async fn register(
        &self,
        email: &str,
        nickname: &str,
    ) -> Result<RegisterOutcome, ServiceError> {
        self.insert_subscriber(
            email,
            nickname,
            SubscriptionTier::Bronze,
            SubscriberStatus::Pending,
        )
        .await
    }

    /// Admin creation with explicit tier and status.
    ///
    /// # Performance
    /// * DB calls: 1 when already registered, 2 otherwise
    pub async fn create(
        &self,
        actor: &AdminActor,
        email: &str,
        nickname: &str,
        tier: SubscriptionTier,
        status: SubscriberStatus,
    ) -> Result<RegisterOutcome, ServiceError> {
        self.authorize(actor)?;
        self.insert_subscriber(email, nickname, tier, status).await
    }

    /// Overwrites a subscriber's tier. Any tier to any tier; there is no
    /// transition state machine. Returns false when the id is unknown.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn set_tier(
        &self,
        actor: &AdminActor,
        id: i64,
        tier: SubscriptionTier,
    ) -> Result<bool, ServiceError> {
        self.authorize(actor)?;
        Ok(self.db.subscriber.update_tier(id, tier).await?)
    }

    /// Overwrites a subscriber's status. Returns false when the id is unknown.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn set_status(
        &self,
        actor: &AdminActor,
        id: i64,
        status: SubscriberStatus,
    ) -> Result<bool, ServiceError> {
        self.authorize(actor)?;
        Ok(self.db.subscriber.update_status(id, status).await?)
    }

    /// Deletes a subscriber record. Returns false when the id is unknown.
    ///
    /// # Performance
    /// * DB calls: 2
    pub async fn remove(&self, actor: &AdminActor, id: i64) -> Result<bool, ServiceError> {
        self.authorize(actor)?;
        if self.db.subscriber.select(&id).await?.is_none() {
            return Ok(false);
        }
        self.db.subscriber.delete(&id).await?;
        Ok(true)
    }

    /// Stamps the subscriber's last login. Called from the sign-in path;
    /// a no-op returning false for emails with no subscriber record.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn record_login(&self, email: &str) -> Result<bool, ServiceError> {
        Ok(self
            .db
            .subscriber
            .update_last_login(email, Utc::now())
            .await?)
    }

    /// The full roster for the dashboard.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn list(&self, actor: &AdminActor) -> Result<Vec<SubscriberModel>, ServiceError> {
        self.authorize(actor)?;
        Ok(self.db.subscriber.select_all().await?)
    }
}
