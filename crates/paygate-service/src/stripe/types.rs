//! Stripe API request parameters and error types.
//!
//! Stripe takes form-encoded bodies with bracket notation for nested fields
//! (`items[0][plan]=...`). Each parameter type renders itself into that shape
//! with `to_form`.

use serde::Deserialize;

use paygate_core::{CustomerId, PaymentMethodId, PlanId, SubscriptionItemId};

/// Expansion requested when creating a subscription, so the client can
/// confirm the first payment without another round trip.
pub const LATEST_INVOICE_PAYMENT_INTENT: &str = "latest_invoice.payment_intent";

/// Form body as ordered key/value pairs.
pub type FormParams = Vec<(String, String)>;

/// Parameters for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerParams {
    /// Payment method to attach and use as the invoice default.
    pub payment_method: PaymentMethodId,
    /// Customer email.
    pub email: String,
}

impl CustomerParams {
    /// Render as Stripe form parameters.
    #[must_use]
    pub fn to_form(&self) -> FormParams {
        vec![
            ("payment_method".into(), self.payment_method.to_string()),
            ("email".into(), self.email.clone()),
            (
                "invoice_settings[default_payment_method]".into(),
                self.payment_method.to_string(),
            ),
        ]
    }
}

/// Parameters for creating a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionParams {
    /// Customer to subscribe.
    pub customer: CustomerId,
    /// Plan for the single line item.
    pub plan: PlanId,
    /// Fields to expand in the response.
    pub expand: Vec<String>,
}

impl SubscriptionParams {
    /// Subscribe `customer` to `plan`, expanding the latest invoice's payment intent.
    #[must_use]
    pub fn new(customer: CustomerId, plan: PlanId) -> Self {
        Self {
            customer,
            plan,
            expand: vec![LATEST_INVOICE_PAYMENT_INTENT.to_string()],
        }
    }

    /// Render as Stripe form parameters.
    #[must_use]
    pub fn to_form(&self) -> FormParams {
        let mut params = vec![
            ("customer".into(), self.customer.to_string()),
            ("items[0][plan]".into(), self.plan.to_string()),
        ];
        params.extend(
            self.expand
                .iter()
                .map(|field| ("expand[]".to_string(), field.clone())),
        );
        params
    }
}

/// A line item resubmitted on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    /// Existing item ID.
    pub id: SubscriptionItemId,
    /// Plan to keep on that item.
    pub plan: PlanId,
}

/// Parameters for updating a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    /// New value of the cancel-at-period-end flag, if changing.
    pub cancel_at_period_end: Option<bool>,
    /// Items to resubmit.
    pub items: Vec<ItemUpdate>,
}

impl SubscriptionUpdate {
    /// Stop renewing at the end of the current period.
    #[must_use]
    pub fn cancel_at_period_end() -> Self {
        Self {
            cancel_at_period_end: Some(true),
            items: Vec::new(),
        }
    }

    /// Clear a pending cancellation, resubmitting the current item and plan.
    ///
    /// Stripe requires the item/plan pairing alongside the flag when undoing
    /// a cancellation; the plan must be the one already attached.
    #[must_use]
    pub fn reactivate(item: SubscriptionItemId, plan: PlanId) -> Self {
        Self {
            cancel_at_period_end: Some(false),
            items: vec![ItemUpdate { id: item, plan }],
        }
    }

    /// Render as Stripe form parameters.
    #[must_use]
    pub fn to_form(&self) -> FormParams {
        let mut params = FormParams::new();
        if let Some(flag) = self.cancel_at_period_end {
            params.push(("cancel_at_period_end".into(), flag.to_string()));
        }
        for (i, item) in self.items.iter().enumerate() {
            params.push((format!("items[{i}][id]"), item.id.to_string()));
            params.push((format!("items[{i}][plan]"), item.plan.to_string()));
        }
        params
    }
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Parameter that caused the error.
    #[serde(default)]
    pub param: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(form: &'a FormParams, key: &str) -> Vec<&'a str> {
        form.iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn customer_form_sets_default_payment_method() {
        let params = CustomerParams {
            payment_method: "pm_card_visa".parse().unwrap(),
            email: "jenny@example.com".into(),
        };
        let form = params.to_form();

        assert_eq!(value(&form, "payment_method"), ["pm_card_visa"]);
        assert_eq!(value(&form, "email"), ["jenny@example.com"]);
        assert_eq!(
            value(&form, "invoice_settings[default_payment_method]"),
            ["pm_card_visa"]
        );
    }

    #[test]
    fn subscription_form_has_single_plan_item_and_expansion() {
        let params = SubscriptionParams::new("cus_1".parse().unwrap(), "plan_daily".parse().unwrap());
        let form = params.to_form();

        assert_eq!(value(&form, "customer"), ["cus_1"]);
        assert_eq!(value(&form, "items[0][plan]"), ["plan_daily"]);
        assert!(value(&form, "items[1][plan]").is_empty());
        assert_eq!(value(&form, "expand[]"), [LATEST_INVOICE_PAYMENT_INTENT]);
    }

    #[test]
    fn cancel_form_only_sets_flag() {
        let form = SubscriptionUpdate::cancel_at_period_end().to_form();
        assert_eq!(form, vec![("cancel_at_period_end".to_string(), "true".to_string())]);
    }

    #[test]
    fn reactivate_form_resubmits_item_and_plan() {
        let update = SubscriptionUpdate::reactivate("si_1".parse().unwrap(), "plan_p".parse().unwrap());
        let form = update.to_form();

        assert_eq!(value(&form, "cancel_at_period_end"), ["false"]);
        assert_eq!(value(&form, "items[0][id]"), ["si_1"]);
        assert_eq!(value(&form, "items[0][plan]"), ["plan_p"]);
    }

    #[test]
    fn error_detail_tolerates_missing_message() {
        let parsed: StripeErrorResponse =
            serde_json::from_str(r#"{"error":{"type":"api_error"}}"#).unwrap();
        assert_eq!(parsed.error.error_type, "api_error");
        assert!(parsed.error.message.is_empty());
    }
}
