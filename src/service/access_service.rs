//! Access evaluation for the subscriber area.
//!
//! Pure read/filter over the permission allow-list, the subscriber roster,
//! and the content catalog. Row absence maps to documented defaults
//! (no permission / fallback tier); store failures propagate so callers
//! deny access instead of defaulting. Never fails open.

use std::sync::Arc;

use crate::model::ContentItemModel;
use crate::model::SubscriptionTier;
use crate::repository::AccessStore;
use crate::service::error::ServiceError;

/// Evaluates what an authenticated user may see in the subscriber area.
pub struct AccessService {
    store: Arc<dyn AccessStore>,
    fallback_tier: SubscriptionTier,
}

impl AccessService {
    /// Creates an evaluator with the Bronze fallback tier for emails that
    /// hold a permission but never registered as subscribers.
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self::with_fallback_tier(store, SubscriptionTier::Bronze)
    }

    /// Creates an evaluator with an explicit fallback tier.
    pub fn with_fallback_tier(store: Arc<dyn AccessStore>, fallback_tier: SubscriptionTier) -> Self {
        Self {
            store,
            fallback_tier,
        }
    }

    /// True iff an active permission record exists for the email.
    /// No record means no permission.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn has_permission(&self, email: &str) -> Result<bool, ServiceError> {
        let permission = self.store.permission_by_email(email).await?;
        Ok(permission.is_some_and(|p| p.is_active()))
    }

    /// The email's subscription tier, or the fallback tier when no
    /// subscriber record exists.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn resolve_tier(&self, email: &str) -> Result<SubscriptionTier, ServiceError> {
        let subscriber = self.store.subscriber_by_email(email).await?;
        Ok(subscriber.map_or(self.fallback_tier, |s| s.tier))
    }

    /// Every active catalog entry the email's tier qualifies for, in
    /// catalog order. Empty without an active permission; the tier and
    /// catalog lookups are skipped in that case.
    ///
    /// # Performance
    /// * DB calls: 1 when permission is missing, 3 otherwise
    pub async fn visible_content(&self, email: &str) -> Result<Vec<ContentItemModel>, ServiceError> {
        if !self.has_permission(email).await? {
            return Ok(Vec::new());
        }

        let tier = self.resolve_tier(email).await?;
        let mut items = self.store.active_content().await?;
        items.retain(|item| item.minimum_tier <= tier);
        Ok(items)
    }

    /// True iff the email holds an active permission and a tier at or
    /// above `required`.
    ///
    /// # Performance
    /// * DB calls: 1 when permission is missing, 2 otherwise
    pub async fn can_access_tier(
        &self,
        email: &str,
        required: SubscriptionTier,
    ) -> Result<bool, ServiceError> {
        if !self.has_permission(email).await? {
            return Ok(false);
        }
        Ok(self.resolve_tier(email).await? >= required)
    }
}
