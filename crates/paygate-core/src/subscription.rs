//! Read-only views of provider subscription objects.
//!
//! These types deserialize only the fields the gateway inspects. Responses
//! relayed to callers keep the provider's full JSON; a view is parsed from a
//! copy whenever a handler needs to look inside.

use serde::{Deserialize, Serialize};

use crate::ids::{PlanId, SubscriptionId, SubscriptionItemId};

/// Lifecycle state of a provider subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// First payment has not succeeded yet.
    Incomplete,

    /// First payment never succeeded and the subscription lapsed.
    IncompleteExpired,

    /// In a trial period.
    Trialing,

    /// Paid and renewing.
    Active,

    /// Renewal payment failed; the provider is retrying.
    PastDue,

    /// Terminated.
    Canceled,

    /// Retries exhausted, left open but unpaid.
    Unpaid,

    /// A state this gateway does not know about.
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Get the provider's tag for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Trialing => "trialing",
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the subscription currently grants service.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Active | Self::Trialing | Self::PastDue)
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider subscription, reduced to the fields the gateway reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    /// Subscription ID.
    pub id: SubscriptionId,
    /// Lifecycle status.
    pub status: SubscriptionStatus,
    /// Whether the subscription stops renewing at the end of the period.
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// Line items.
    #[serde(default)]
    pub items: ItemList,
}

impl Subscription {
    /// Parse a view from a provider JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or malformed.
    pub fn from_value(value: &serde_json::Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    /// The first line item, if any.
    #[must_use]
    pub fn first_item(&self) -> Option<&SubscriptionItem> {
        self.items.data.first()
    }
}

/// The provider's list wrapper around subscription items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemList {
    /// Items in the list.
    #[serde(default)]
    pub data: Vec<SubscriptionItem>,
}

/// A subscription line item.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    /// Item ID.
    pub id: SubscriptionItemId,
    /// Plan attached to this item.
    #[serde(default)]
    pub plan: Option<PlanRef>,
}

/// Reference to the plan attached to an item.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRef {
    /// Plan ID.
    pub id: PlanId,
}
