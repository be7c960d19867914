//! Repository module with SQLite storage and SQLx.

use std::str::FromStr;

use log::debug;
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::model::ContentItemModel;
use crate::model::PermissionModel;
use crate::model::SubscriberModel;
use crate::repository::error::DatabaseError;
use crate::repository::table::ContentTable;
use crate::repository::table::PermissionTable;
use crate::repository::table::SubscriberTable;
use crate::repository::table::TableBase;

pub mod error;
pub mod table;

/// Read contract consumed by the access evaluator.
///
/// Row absence is `Ok(None)` / an empty vec; an `Err` means the backing
/// store itself failed and callers must deny access rather than default.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AccessStore: Send + Sync {
    async fn subscriber_by_email(
        &self,
        email: &str,
    ) -> Result<Option<SubscriberModel>, DatabaseError>;

    async fn permission_by_email(
        &self,
        email: &str,
    ) -> Result<Option<PermissionModel>, DatabaseError>;

    /// Active catalog entries in insertion order.
    async fn active_content(&self) -> Result<Vec<ContentItemModel>, DatabaseError>;
}

/// Main repository struct containing all table handlers.
pub struct Repository {
    pub subscriber: SubscriberTable,
    pub permission: PermissionTable,
    pub content: ContentTable,
}

impl Repository {
    /// Creates a new database connection and initializes table handlers.
    pub async fn new(db_url: &str, db_path: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(db_path);
        if !path.exists() {
            debug!("Database path {db_path} does not exist. Creating...");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, "")?;
            info!("Created {db_path}");
        }

        debug!("Connecting to db...");
        let opts = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;
        info!("Connected to db.");

        let subscriber = SubscriberTable::new(pool.clone());
        let permission = PermissionTable::new(pool.clone());
        let content = ContentTable::new(pool);

        Ok(Self {
            subscriber,
            permission,
            content,
        })
    }

    /// Creates all tables if they don't exist.
    pub async fn init(&self) -> Result<(), DatabaseError> {
        self.subscriber.create_table().await?;
        self.permission.create_table().await?;
        self.content.create_table().await?;
        Ok(())
    }

    /// Drops all tables. Use with caution!
    pub async fn drop_all_tables(&self) -> Result<(), DatabaseError> {
        self.subscriber.drop_table().await?;
        self.permission.drop_table().await?;
        self.content.drop_table().await?;
        Ok(())
    }

    /// Deletes all data from all tables. Use with caution!
    pub async fn delete_all_tables(&self) -> Result<(), DatabaseError> {
        self.subscriber.delete_all().await?;
        self.permission.delete_all().await?;
        self.content.delete_all().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AccessStore for Repository {
    async fn subscriber_by_email(
        &self,
        email: &str,
    ) -> Result<Option<SubscriberModel>, DatabaseError> {
        self.subscriber.select_by_email(email).await
    }

    async fn permission_by_email(
        &self,
        email: &str,
    ) -> Result<Option<PermissionModel>, DatabaseError> {
        self.permission.select_by_email(email).await
    }

    async fn active_content(&self) -> Result<Vec<ContentItemModel>, DatabaseError> {
        self.content.select_active().await
    }
}
