//! Content catalog management for the admin dashboard.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::model::AdminActor;
use crate::model::Capability;
use crate::model::ContentItemModel;
use crate::model::ContentQueryOpt;
use crate::repository::Repository;
use crate::repository::table::Table;
use crate::service::error::ServiceError;

/// Service for managing subscriber-area catalog entries.
pub struct ContentService {
    db: Arc<Repository>,
}

impl ContentService {
    /// Creates a new content service.
    pub fn new(db: Arc<Repository>) -> Self {
        Self { db }
    }

    fn authorize(&self, actor: &AdminActor) -> Result<(), ServiceError> {
        if !actor.capabilities.allows(Capability::ManageContent) {
            return Err(ServiceError::Forbidden {
                actor: actor.name.clone(),
                capability: Capability::ManageContent,
            });
        }
        Ok(())
    }

    /// Creates a catalog entry and returns its id. The creation timestamp
    /// is assigned here, not taken from the caller.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn create(
        &self,
        actor: &AdminActor,
        item: &ContentItemModel,
    ) -> Result<i64, ServiceError> {
        self.authorize(actor)?;
        let model = ContentItemModel {
            created_at: Utc::now(),
            ..item.clone()
        };
        let id = self.db.content.insert(&model).await?;
        info!(
            "Created content item {id} \"{}\" (minimum tier {})",
            model.title,
            model.minimum_tier.display_name()
        );
        Ok(id)
    }

    /// Overwrites an existing catalog entry.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn update(
        &self,
        actor: &AdminActor,
        item: &ContentItemModel,
    ) -> Result<(), ServiceError> {
        self.authorize(actor)?;
        self.db.content.update(item).await?;
        Ok(())
    }

    /// Deletes a catalog entry. Returns false when the id is unknown.
    ///
    /// # Performance
    /// * DB calls: 2
    pub async fn remove(&self, actor: &AdminActor, id: i64) -> Result<bool, ServiceError> {
        self.authorize(actor)?;
        if self.db.content.select(&id).await?.is_none() {
            return Ok(false);
        }
        self.db.content.delete(&id).await?;
        info!("Deleted content item {id}");
        Ok(true)
    }

    /// Fetches a single catalog entry.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn get(&self, id: i64) -> Result<Option<ContentItemModel>, ServiceError> {
        Ok(self.db.content.select(&id).await?)
    }

    /// Filtered catalog listing for the dashboard.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn list(
        &self,
        actor: &AdminActor,
        opt: &ContentQueryOpt,
    ) -> Result<Vec<ContentItemModel>, ServiceError> {
        self.authorize(actor)?;
        Ok(self.db.content.select_with_opt(opt).await?)
    }
}
