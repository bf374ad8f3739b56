//! Studios (tenants).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::BusinessId;

string_enum!(
    /// How the studio collects payments. Recorded only; nothing is charged.
    PaymentProvider, "payment_provider" {
        Stripe => "stripe",
        Square => "square",
        Paypal => "paypal",
        Manual => "manual",
    }
);

impl Default for PaymentProvider {
    fn default() -> Self {
        Self::Manual
    }
}

/// A studio and its branding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub payment_provider: PaymentProvider,
    /// Free-form studio settings.
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    /// Create a business with default branding.
    pub fn new(name: &str, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Required { field: "name" });
        }
        Ok(Self {
            id: BusinessId::new(),
            name: name.to_string(),
            logo_url: None,
            primary_color: "#4f46e5".to_string(),
            secondary_color: "#818cf8".to_string(),
            payment_provider: PaymentProvider::Manual,
            settings: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_business_trims_name() {
        let b = Business::new("  Prisma Dance  ", Utc::now()).unwrap();
        assert_eq!(b.name, "Prisma Dance");
        assert_eq!(b.payment_provider, PaymentProvider::Manual);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            Business::new("   ", Utc::now()),
            Err(DomainError::Required { field: "name" })
        );
    }
}
