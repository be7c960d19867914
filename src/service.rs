//! Business logic services for the subscriber area and admin dashboard.

use std::sync::Arc;

use crate::repository::Repository;
use crate::service::access_service::AccessService;
use crate::service::content_service::ContentService;
use crate::service::permission_service::PermissionService;
use crate::service::subscriber_service::SubscriberService;

pub mod access_service;
pub mod content_service;
pub mod error;
pub mod permission_service;
pub mod subscriber_service;

/// Container for all application services.
pub struct Services {
    pub access: Arc<AccessService>,
    pub permissions: Arc<PermissionService>,
    pub subscribers: Arc<SubscriberService>,
    pub content: Arc<ContentService>,
}

impl Services {
    /// Creates and initializes all services.
    pub fn new(db: Arc<Repository>) -> Self {
        Self {
            access: Arc::new(AccessService::new(db.clone())),
            permissions: Arc::new(PermissionService::new(db.clone())),
            subscribers: Arc::new(SubscriberService::new(db.clone())),
            content: Arc::new(ContentService::new(db)),
        }
    }
}
