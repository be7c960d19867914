use std::collections::HashSet;

use chrono::DateTime;
use chrono::Utc;
use derive_builder::Builder;
use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;

use crate::error::AppError;

/// Membership tier for the subscriber area.
///
/// Tiers form a total order (Bronze lowest, Diamond highest); content
/// visibility compares a subscriber's tier against an item's minimum tier.
/// Stored in the database as the integer rank 1..=5.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Bronze = 1,
    Silver = 2,
    Gold = 3,
    Platinum = 4,
    Diamond = 5,
}

impl SubscriptionTier {
    /// Integer rank, 1 (Bronze) through 5 (Diamond).
    pub fn rank(self) -> i64 {
        self as i64
    }

    /// Display name shown on the storefront.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Diamond => "Diamond",
        }
    }

    /// Badge color hex code. Presentation only, never behavioral.
    pub fn color(self) -> &'static str {
        match self {
            Self::Bronze => "#cd7f32",
            Self::Silver => "#c0c0c0",
            Self::Gold => "#ffd700",
            Self::Platinum => "#e5e4e2",
            Self::Diamond => "#b9f2ff",
        }
    }
}

impl TryFrom<i64> for SubscriptionTier {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Bronze),
            2 => Ok(Self::Silver),
            3 => Ok(Self::Gold),
            4 => Ok(Self::Platinum),
            5 => Ok(Self::Diamond),
            _ => Err(AppError::InvalidTier { value }),
        }
    }
}

/// Account status of a subscriber.
///
/// Informational for the admin dashboard; does not affect content visibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, Default, PartialEq, Eq)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    Active,
    Inactive,
    #[default]
    Pending,
}

impl TryFrom<&str> for SubscriberStatus {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            _ => Err(AppError::InvalidStatus {
                value: value.to_string(),
            }),
        }
    }
}

/// A storefront customer enrolled in the subscriber area.
///
/// One record per email. Tier and status are overwritten freely by admin
/// actions; there are no transition constraints.
#[derive(FromRow, Serialize, Default, Clone, Debug)]
pub struct SubscriberModel {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    #[sqlx(try_from = "i64")]
    pub tier: SubscriptionTier,
    #[serde(default)]
    pub status: SubscriberStatus,
    #[serde(default)]
    pub subscribed_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// Lifecycle state of a permission record.
///
/// Revocation is a soft delete: the row is kept and flipped to `Revoked`,
/// and a later grant reactivates the same row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, Default, PartialEq, Eq)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    #[default]
    Active,
    Revoked,
}

/// Allow-list entry granting an email entry to the subscriber area.
///
/// Independent of [`SubscriberModel`]: an email may hold a permission
/// without a subscriber record and vice versa. At most one record per email.
#[derive(FromRow, Serialize, Default, Clone, Debug)]
pub struct PermissionModel {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub granted_at: DateTime<Utc>,
    /// Name of the admin principal that issued the grant.
    #[serde(default)]
    pub granted_by: String,
    #[serde(default)]
    pub state: PermissionState,
}

impl PermissionModel {
    pub fn is_active(&self) -> bool {
        self.state == PermissionState::Active
    }
}

/// Kind of catalog entry offered in the subscriber area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, Default, PartialEq, Eq)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Download,
    Update,
    Giveaway,
    Service,
    Product,
}

impl TryFrom<&str> for ContentType {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "download" => Ok(Self::Download),
            "update" => Ok(Self::Update),
            "giveaway" => Ok(Self::Giveaway),
            "service" => Ok(Self::Service),
            "product" => Ok(Self::Product),
            _ => Err(AppError::InvalidContentType {
                value: value.to_string(),
            }),
        }
    }
}

/// Type-specific payload attached to a content item.
///
/// Stored as a JSON column; only the fields relevant to the item's
/// [`ContentType`] are populated.
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct ContentDetails {
    /// File location for downloads and updates.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Linked shop product for service/product entries.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Closing time for giveaways.
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

/// A catalog entry in the subscriber area.
///
/// Visibility is governed solely by `is_active` and `minimum_tier`;
/// everything else is presentation.
#[derive(FromRow, Serialize, Default, Clone, Debug)]
pub struct ContentItemModel {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_type: ContentType,
    /// Lowest tier allowed to see this item.
    #[serde(default)]
    #[sqlx(try_from = "i64")]
    pub minimum_tier: SubscriptionTier,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    pub details: sqlx::types::Json<ContentDetails>,
}

/// A right an admin principal may hold over the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageSubscribers,
    ManagePermissions,
    ManageContent,
}

/// Set of capabilities held by an admin principal.
///
/// `All` is the distinguished full-access principal; it passes every
/// capability check without enumerating rights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilitySet {
    All,
    Of(HashSet<Capability>),
}

impl CapabilitySet {
    pub fn all() -> Self {
        Self::All
    }

    pub fn of(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self::Of(capabilities.into_iter().collect())
    }

    pub fn none() -> Self {
        Self::Of(HashSet::new())
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match self {
            Self::All => true,
            Self::Of(set) => set.contains(&capability),
        }
    }
}

/// An authenticated admin principal performing dashboard actions.
#[derive(Debug, Clone)]
pub struct AdminActor {
    pub name: String,
    pub capabilities: CapabilitySet,
}

impl AdminActor {
    pub fn new(name: &str, capabilities: CapabilitySet) -> Self {
        Self {
            name: name.to_string(),
            capabilities,
        }
    }

    /// Principal holding every capability.
    pub fn root(name: &str) -> Self {
        Self::new(name, CapabilitySet::all())
    }
}

/// Filter options for catalog listings in the admin dashboard.
#[derive(Builder, Clone, Debug)]
#[builder(pattern = "immutable")]
pub struct ContentQueryOpt {
    #[builder(default)]
    pub content_type: Option<ContentType>,
    #[builder(default)]
    pub active_only: bool,
    #[builder(default)]
    pub max_tier: Option<SubscriptionTier>,
    #[builder(default)]
    pub limit: Option<u32>,
}
