//! Domain models and data structures
//!
//! Wire types for the provider's payment API plus the normalization rules
//! that complete a caller's partial request before it is sent.

use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{MomoError, Result};

pub const DEFAULT_TRANSACTION_TYPE: &str = "PAYMENT";
pub const DEFAULT_PAYMENT_METHOD_NAME: &str = "Default PaymentMethodName";
pub const DEFAULT_PAYMENT_METHOD_DESCRIPTION: &str = "Default PaymentMethodDescription";
pub const DEFAULT_PAYMENT_METHOD_TYPE: &str = "Mobile Money";
pub const DEFAULT_INFO_NAME: &str = "DefaultInfoName";
pub const DEFAULT_INFO_DESCRIPTION: &str = "DefaultInfoDescription";

/// Monetary amount in a currency unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub units: String,
}

impl Money {
    pub fn new(amount: Decimal, units: impl Into<String>) -> Self {
        Self {
            amount,
            units: units.into(),
        }
    }

    /// Zero with no unit: what the caller sends when the field does not apply
    pub fn is_unset(&self) -> bool {
        self.amount.is_zero() && self.units.is_empty()
    }

    /// Sum two amounts of the same unit. An unset `other` adds nothing.
    pub fn try_add(&self, other: &Money) -> Result<Money> {
        if other.is_unset() {
            return Ok(self.clone());
        }
        if self.units != other.units {
            return Err(MomoError::Validation(format!(
                "cannot add {} to {}: currency units differ",
                other.units, self.units
            )));
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| MomoError::Validation("amount overflow".to_string()))?;
        Ok(Money::new(amount, self.units.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payer {
    pub payer_id_type: String,
    pub payer_id: String,
    pub payer_note: String,
    pub payer_name: String,
    pub payer_email: String,
    pub payer_ref: String,
    pub payer_surname: String,
    pub include_payer_charges: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payee {
    pub amount: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
    pub payee_id_type: String,
    pub payee_id: String,
    pub payee_note: String,
    pub payee_name: String,
}

/// Instrument-specific detail of a payment method.
///
/// Exactly one kind is present; serialized as a single-key object such as
/// `{"bankCard":{}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethodDetails {
    BankCard {},
    TokenizedCard {},
    BankAccountDebit {},
    BankAccountTransfer {},
    Account {},
    LoyaltyAccount {},
    Bucket {},
    Voucher {},
    DigitalWallet {},
    Invoice {},
}

/// Payment method as sent by callers. A method without a name counts as
/// unset and is replaced during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentMethod {
    pub name: String,
    pub description: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(
        deserialize_with = "details_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<PaymentMethodDetails>,
}

/// `null` and `{}` both mean "no instrument detail"
fn details_or_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<PaymentMethodDetails>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Map<String, Value>>::deserialize(deserializer)? {
        Some(fields) if !fields.is_empty() => serde_json::from_value(Value::Object(fields))
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl PaymentMethod {
    /// Mobile-money method valid for one calendar month from `now`
    pub fn default_at(now: DateTime<Utc>) -> Result<Self> {
        let valid_to = now
            .checked_add_months(Months::new(1))
            .ok_or_else(|| MomoError::Validation("payment method validity overflows".into()))?;
        Ok(Self {
            name: DEFAULT_PAYMENT_METHOD_NAME.to_string(),
            description: DEFAULT_PAYMENT_METHOD_DESCRIPTION.to_string(),
            valid_from: now,
            valid_to,
            kind: DEFAULT_PAYMENT_METHOD_TYPE.to_string(),
            details: None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalInformation {
    pub name: String,
    pub description: String,
}

impl AdditionalInformation {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Payment request as built by the caller; optional fields may be left empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentRequest {
    pub correlator_id: String,
    pub payment_date: String,
    pub name: String,
    pub calling_system: String,
    pub transaction_type: String,
    pub target_system: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
    pub quote_id: String,
    pub channel: String,
    pub description: String,
    pub authorization_code: Option<String>,
    pub fee_bearer: String,
    pub amount: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
    pub payer: Payer,
    pub payee: Vec<Payee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub status: String,
    pub status_date: String,
    pub additional_information: Vec<AdditionalInformation>,
    pub segment: String,
}

impl PaymentRequest {
    /// Fill provider-required defaults and derive `total_amount`.
    ///
    /// Caller-supplied values are kept, except `total_amount` which is always
    /// recomputed as `amount + tax_amount`. Applying this twice yields the
    /// same request.
    pub fn normalize(mut self, default_callback_url: &str, now: DateTime<Utc>) -> Result<Self> {
        if self.correlator_id.is_empty() {
            self.correlator_id = generate_correlator_id();
        }

        if self.callback_url.is_empty() {
            self.callback_url = default_callback_url.to_string();
        }

        if self.transaction_type.is_empty() {
            self.transaction_type = DEFAULT_TRANSACTION_TYPE.to_string();
        }

        let has_method = matches!(&self.payment_method, Some(method) if !method.name.is_empty());
        if !has_method {
            self.payment_method = Some(PaymentMethod::default_at(now)?);
        }

        if self.additional_information.is_empty() {
            self.additional_information = vec![AdditionalInformation::new(
                DEFAULT_INFO_NAME,
                DEFAULT_INFO_DESCRIPTION,
            )];
        }

        self.total_amount = self.amount.try_add(&self.tax_amount)?;

        Ok(self)
    }
}

pub fn generate_correlator_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaData {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoyaltyInformation {
    pub generated_amount: Money,
    pub consumed_amount: Money,
    pub new_balance: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentResponseData {
    pub approval_id: String,
    pub transaction_fee: Money,
    pub discount: Money,
    pub new_balance: Money,
    pub payer_note: String,
    pub status: String,
    pub correlator_id: String,
    pub status_date: String,
    pub additional_information: AdditionalInformation,
    pub meta_data: Vec<MetaData>,
    pub loyalty_information: LoyaltyInformation,
    pub external_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
}

/// Provider reply, decoded for both accepted and rejected submissions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentResponse {
    pub status_code: String,
    pub provider_transaction_id: String,
    pub status_message: String,
    pub support_message: String,
    pub sequence_no: i64,
    pub fulfillment_status: String,
    pub data: PaymentResponseData,
    #[serde(rename = "_links")]
    pub links: Links,
}
