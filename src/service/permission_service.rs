//! Permission allow-list management for the admin dashboard.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::model::AdminActor;
use crate::model::Capability;
use crate::model::PermissionModel;
use crate::model::PermissionState;
use crate::repository::Repository;
use crate::repository::table::Table;
use crate::service::error::ServiceError;

/// Result of a grant action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
    /// A new permission record was created.
    Granted,
    /// An existing revoked record was reactivated in place.
    Reactivated,
    /// An active record already existed; nothing changed.
    AlreadyGranted,
}

/// Result of a revoke action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevokeOutcome {
    Revoked,
    /// The record was already revoked; nothing changed.
    AlreadyRevoked,
    /// No record exists for the email.
    NotFound,
}

/// Service for granting and revoking subscriber-area permissions.
pub struct PermissionService {
    db: Arc<Repository>,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(db: Arc<Repository>) -> Self {
        Self { db }
    }

    fn authorize(&self, actor: &AdminActor) -> Result<(), ServiceError> {
        if !actor.capabilities.allows(Capability::ManagePermissions) {
            return Err(ServiceError::Forbidden {
                actor: actor.name.clone(),
                capability: Capability::ManagePermissions,
            });
        }
        Ok(())
    }

    /// Grants subscriber-area entry to an email.
    ///
    /// At most one permission record exists per email: a grant over a
    /// revoked record reactivates that record (same id, fresh grant
    /// timestamp and grantor) instead of inserting a second one. Granting
    /// an already active permission changes nothing.
    ///
    /// # Performance
    /// * DB calls: 1 when already granted, 2 otherwise
    pub async fn grant(
        &self,
        actor: &AdminActor,
        email: &str,
    ) -> Result<GrantOutcome, ServiceError> {
        self.authorize(actor)?;

        match self.db.permission.select_by_email(email).await? {
            None => {
                let model = PermissionModel {
                    email: email.to_string(),
                    granted_at: Utc::now(),
                    granted_by: actor.name.clone(),
                    state: PermissionState::Active,
                    ..Default::default()
                };
                self.db.permission.insert(&model).await?;
                info!("Granted subscriber-area permission to {email}");
                Ok(GrantOutcome::Granted)
            }
            Some(existing) if existing.is_active() => Ok(GrantOutcome::AlreadyGranted),
            Some(existing) => {
                let reactivated = PermissionModel {
                    granted_at: Utc::now(),
                    granted_by: actor.name.clone(),
                    state: PermissionState::Active,
                    ..existing
                };
                self.db.permission.update(&reactivated).await?;
                info!("Reactivated subscriber-area permission for {email}");
                Ok(GrantOutcome::Reactivated)
            }
        }
    }

    /// Revokes an email's permission. Soft delete: the record is kept with
    /// state `Revoked` so a later grant restores it. Idempotent.
    ///
    /// # Performance
    /// * DB calls: 1 when nothing to revoke, 2 otherwise
    pub async fn revoke(
        &self,
        actor: &AdminActor,
        email: &str,
    ) -> Result<RevokeOutcome, ServiceError> {
        self.authorize(actor)?;

        match self.db.permission.select_by_email(email).await? {
            None => Ok(RevokeOutcome::NotFound),
            Some(existing) if !existing.is_active() => Ok(RevokeOutcome::AlreadyRevoked),
            Some(existing) => {
                self.db
                    .permission
                    .update_state(existing.id, PermissionState::Revoked)
                    .await?;
                info!("Revoked subscriber-area permission for {email}");
                Ok(RevokeOutcome::Revoked)
            }
        }
    }

    /// All permission records, active and revoked, for the dashboard.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn list(&self, actor: &AdminActor) -> Result<Vec<PermissionModel>, ServiceError> {
        self.authorize(actor)?;
        Ok(self.db.permission.select_all().await?)
    }
}
