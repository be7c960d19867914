//! Database table operations and implementations.

use chrono::DateTime;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::model::ContentItemModel;
use crate::model::ContentQueryOpt;
use crate::model::PermissionModel;
use crate::model::PermissionState;
use crate::model::SubscriberModel;
use crate::model::SubscriberStatus;
use crate::model::SubscriptionTier;
use crate::repository::error::DatabaseError;

/// Base table struct providing database pool access.
#[derive(Clone)]
pub struct BaseTable {
    pub pool: SqlitePool,
}

impl BaseTable {
    /// Creates a new base table with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Base trait for table operations.
#[async_trait::async_trait]
pub trait TableBase {
    /// Creates the table if it doesn't exist.
    async fn create_table(&self) -> Result<(), DatabaseError>;
    /// Drops the table.
    async fn drop_table(&self) -> Result<(), DatabaseError>;
    /// Deletes all rows from the table.
    async fn delete_all(&self) -> Result<(), DatabaseError>;
}

/// Trait for tables with CRUD operations.
#[async_trait::async_trait]
pub trait Table<T, ID>: TableBase {
    async fn select_all(&self) -> Result<Vec<T>, DatabaseError>;
    async fn insert(&self, model: &T) -> Result<ID, DatabaseError>;
    async fn select(&self, id: &ID) -> Result<Option<T>, DatabaseError>;
    async fn update(&self, model: &T) -> Result<(), DatabaseError>;
    async fn delete(&self, id: &ID) -> Result<(), DatabaseError>;
}

const SUBSCRIBER_COLUMNS: &str =
    "id, email, nickname, tier, status, subscribed_at, last_login";

/// Table handler for subscriber records.
pub struct SubscriberTable {
    base: BaseTable,
}

impl SubscriberTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    pub async fn select_by_email(
        &self,
        email: &str,
    ) -> Result<Option<SubscriberModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(ret)
    }

    /// Overwrites the tier field. Returns false when the id is unknown.
    pub async fn update_tier(
        &self,
        id: i64,
        tier: SubscriptionTier,
    ) -> Result<bool, DatabaseError> {
        let res = sqlx::query("UPDATE subscribers SET tier = ? WHERE id = ?")
            .bind(tier.rank())
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Overwrites the status field. Returns false when the id is unknown.
    pub async fn update_status(
        &self,
        id: i64,
        status: SubscriberStatus,
    ) -> Result<bool, DatabaseError> {
        let res = sqlx::query("UPDATE subscribers SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Stamps the last login time. Returns false when the email is unknown.
    pub async fn update_last_login(
        &self,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let res = sqlx::query("UPDATE subscribers SET last_login = ? WHERE email = ?")
            .bind(at)
            .bind(email)
            .execute(&self.base.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl TableBase for SubscriberTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscribers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                nickname TEXT NOT NULL,
                tier INTEGER NOT NULL DEFAULT 1,
                status TEXT NOT NULL DEFAULT 'pending',
                subscribed_at TEXT NOT NULL,
                last_login TEXT
            )
            "#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS subscribers")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM subscribers")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Table<SubscriberModel, i64> for SubscriberTable {
    async fn select_all(&self) -> Result<Vec<SubscriberModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers ORDER BY id"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn insert(&self, model: &SubscriberModel) -> Result<i64, DatabaseError> {
        let res = sqlx::query(
            r#"
            INSERT INTO subscribers (email, nickname, tier, status, subscribed_at, last_login)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&model.email)
        .bind(&model.nickname)
        .bind(model.tier.rank())
        .bind(model.status)
        .bind(model.subscribed_at)
        .bind(model.last_login)
        .execute(&self.base.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    async fn select(&self, id: &i64) -> Result<Option<SubscriberModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn update(&self, model: &SubscriberModel) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE subscribers
            SET email = ?, nickname = ?, tier = ?, status = ?, subscribed_at = ?, last_login = ?
            WHERE id = ?
            "#,
        )
        .bind(&model.email)
        .bind(&model.nickname)
        .bind(model.tier.rank())
        .bind(model.status)
        .bind(model.subscribed_at)
        .bind(model.last_login)
        .bind(model.id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM subscribers WHERE id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}

const PERMISSION_COLUMNS: &str = "id, email, granted_at, granted_by, state";

/// Table handler for subscriber-area permission records.
pub struct PermissionTable {
    base: BaseTable,
}

impl PermissionTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    pub async fn select_by_email(
        &self,
        email: &str,
    ) -> Result<Option<PermissionModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, PermissionModel>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(ret)
    }

    /// Flips the state of an existing record. Returns false when the id is unknown.
    pub async fn update_state(
        &self,
        id: i64,
        state: PermissionState,
    ) -> Result<bool, DatabaseError> {
        let res = sqlx::query("UPDATE permissions SET state = ? WHERE id = ?")
            .bind(state)
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl TableBase for PermissionTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS permissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                granted_at TEXT NOT NULL,
                granted_by TEXT NOT NULL,
                state TEXT NOT NULL DEFAULT 'active'
            )
            "#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS permissions")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM permissions")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Table<PermissionModel, i64> for PermissionTable {
    async fn select_all(&self) -> Result<Vec<PermissionModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, PermissionModel>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions ORDER BY id"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn insert(&self, model: &PermissionModel) -> Result<i64, DatabaseError> {
        let res = sqlx::query(
            "INSERT INTO permissions (email, granted_at, granted_by, state) VALUES (?, ?, ?, ?)",
        )
        .bind(&model.email)
        .bind(model.granted_at)
        .bind(&model.granted_by)
        .bind(model.state)
        .execute(&self.base.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    async fn select(&self, id: &i64) -> Result<Option<PermissionModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, PermissionModel>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn update(&self, model: &PermissionModel) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE permissions
            SET email = ?, granted_at = ?, granted_by = ?, state = ?
            WHERE id = ?
            "#,
        )
        .bind(&model.email)
        .bind(model.granted_at)
        .bind(&model.granted_by)
        .bind(model.state)
        .bind(model.id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM permissions WHERE id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}

const CONTENT_COLUMNS: &str =
    "id, title, description, content_type, minimum_tier, is_active, created_at, details";

/// Table handler for subscriber-area catalog entries.
pub struct ContentTable {
    base: BaseTable,
}

impl ContentTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    /// All active items in insertion order.
    pub async fn select_active(&self) -> Result<Vec<ContentItemModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, ContentItemModel>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_items WHERE is_active = 1 ORDER BY id"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    /// Filtered listing for the admin dashboard.
    pub async fn select_with_opt(
        &self,
        opt: &ContentQueryOpt,
    ) -> Result<Vec<ContentItemModel>, DatabaseError> {
        let mut sql = format!("SELECT {CONTENT_COLUMNS} FROM content_items");
        let mut clauses: Vec<&str> = Vec::new();
        if opt.active_only {
            clauses.push("is_active = 1");
        }
        if opt.content_type.is_some() {
            clauses.push("content_type = ?");
        }
        if opt.max_tier.is_some() {
            clauses.push("minimum_tier <= ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");
        if opt.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query = sqlx::query_as::<_, ContentItemModel>(&sql);
        if let Some(content_type) = opt.content_type {
            query = query.bind(content_type);
        }
        if let Some(max_tier) = opt.max_tier {
            query = query.bind(max_tier.rank());
        }
        if let Some(limit) = opt.limit {
            query = query.bind(limit);
        }

        let ret = query.fetch_all(&self.base.pool).await?;
        Ok(ret)
    }
}

#[async_trait::async_trait]
impl TableBase for ContentTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS content_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                content_type TEXT NOT NULL,
                minimum_tier INTEGER NOT NULL DEFAULT 1,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                details TEXT NOT NULL DEFAULT '{}'
            )
            "#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS content_items")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM content_items")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Table<ContentItemModel, i64> for ContentTable {
    async fn select_all(&self) -> Result<Vec<ContentItemModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, ContentItemModel>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_items ORDER BY id"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn insert(&self, model: &ContentItemModel) -> Result<i64, DatabaseError> {
        let res = sqlx::query(
            r#"
            INSERT INTO content_items
                (title, description, content_type, minimum_tier, is_active, created_at, details)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&model.title)
        .bind(&model.description)
        .bind(model.content_type)
        .bind(model.minimum_tier.rank())
        .bind(model.is_active)
        .bind(model.created_at)
        .bind(&model.details)
        .execute(&self.base.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    async fn select(&self, id: &i64) -> Result<Option<ContentItemModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, ContentItemModel>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_items WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn update(&self, model: &ContentItemModel) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE content_items
            SET title = ?, description = ?, content_type = ?, minimum_tier = ?,
                is_active = ?, created_at = ?, details = ?
            WHERE id = ?
            "#,
        )
        .bind(&model.title)
        .bind(&model.description)
        .bind(model.content_type)
        .bind(model.minimum_tier.rank())
        .bind(model.is_active)
        .bind(model.created_at)
        .bind(&model.details)
        .bind(model.id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM content_items WHERE id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}
