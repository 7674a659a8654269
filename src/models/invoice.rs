//! Invoice metadata uploaded alongside a document from a third-party
//! system.
//!
//! Unlike the master-data entities, invoice validation stops at the first
//! violated rule instead of aggregating; callers fix one complete invoice
//! at a time rather than a batch.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;
use crate::types::{AccountNumber, Bic, CountryCode, Currency, Iban, VatId};

/// Side of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingType {
    Debit,
    Credit,
}

/// Whether an accounting-item amount is net or total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AmountType {
    Net,
    Total,
}

/// A single accounting line item of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountingItem {
    pub title: String,
    pub general_ledger_account_number: AccountNumber,
    pub booking_type: BookingType,
    pub amount_type: AmountType,
    pub amount: f64,
    #[serde(rename = "valueAddedTax", skip_serializing_if = "Option::is_none")]
    pub value_added_tax_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_added_tax_percentage_amount: Option<f64>,
}

/// An invoice produced by a third-party system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Identifier of the system that produced the invoice and confirms
    /// its values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
    #[serde(rename = "partnerVatId", skip_serializing_if = "Option::is_none")]
    pub partner_vat_id: Option<VatId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_comp_reg_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_country: Option<CountryCode>,
    /// Vendor or client number identifying the partner company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_memo: Option<bool>,

    /// Net amount (without VAT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<f64>,
    /// Total/gross amount (including VAT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,

    /// Single VAT percentage of the invoice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_percent: Option<f64>,
    /// Multiple VAT percentages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vat_percentages: Vec<f64>,
    /// One VAT amount per VAT percentage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vat_amounts: Vec<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_until: Option<NaiveDate>,

    /// Cost-center allocations: cost-center number to amount.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cost_centers: BTreeMap<String, f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_rate_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub goods_services: Option<String>,

    /// First day of the delivery window; requires `delivered_until`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_from: Option<NaiveDate>,
    /// Last day of the delivery window; equal to `delivered_from` for
    /// single-day deliveries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_until: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delivery_note_numbers: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<Iban>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bic: Option<Bic>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounting_items: Vec<AccountingItem>,
}

impl Invoice {
    /// Checks the full cross-field rule set, returning the first violated
    /// rule. Delivery-note numbers are trimmed in place with empty entries
    /// removed.
    pub fn validate(&mut self) -> Result<(), FieldError> {
        if let Some(vat_id) = &self.partner_vat_id {
            vat_id
                .validate()
                .map_err(|e| FieldError::new("partnerVatId", e.to_string()))?;
        }
        if let Some(country) = &self.partner_country {
            country
                .normalized()
                .map_err(|e| FieldError::new("partnerCountry", e.to_string()))?;
        }
        if let Some(net) = self.net {
            if net < 0.0 {
                return Err(FieldError::new("net", "amount must not be negative"));
            }
        }
        if let Some(total) = self.total {
            if total < 0.0 {
                return Err(FieldError::new("total", "amount must not be negative"));
            }
        }
        if let (Some(net), Some(total)) = (self.net, self.total) {
            if total < net {
                return Err(FieldError::new(
                    "total",
                    format!("total {total} must not be smaller than net {net}"),
                ));
            }
        }
        if let Some(percent) = self.vat_percent {
            if !(0.0..=100.0).contains(&percent) {
                return Err(FieldError::new(
                    "vatPercent",
                    format!("{percent} not in range of [0..100]"),
                ));
            }
        }
        for (i, percent) in self.vat_percentages.iter().enumerate() {
            if !(0.0..=100.0).contains(percent) {
                return Err(FieldError::new(
                    format!("vatPercentages[{i}]"),
                    format!("{percent} not in range of [0..100]"),
                ));
            }
        }
        for (i, amount) in self.vat_amounts.iter().enumerate() {
            if *amount < 0.0 {
                return Err(FieldError::new(
                    format!("vatAmounts[{i}]"),
                    "amount must not be negative",
                ));
            }
        }
        if let Some(percent) = self.discount_percent {
            if !(0.0..=100.0).contains(&percent) {
                return Err(FieldError::new(
                    "discountPercent",
                    format!("{percent} not in range of [0..100]"),
                ));
            }
        }
        if let Some(currency) = &self.currency {
            currency
                .validate()
                .map_err(|e| FieldError::new("currency", e.to_string()))?;
        }
        if let Some(rate) = self.conversion_rate {
            if rate <= 0.0 {
                return Err(FieldError::new(
                    "conversionRate",
                    format!("must be greater than zero, but is {rate}"),
                ));
            }
        }
        if self.delivered_from.is_some() && self.delivered_until.is_none() {
            return Err(FieldError::new(
                "deliveredUntil",
                "deliveredFrom date needs deliveredUntil date to be provided too",
            ));
        }
        if let (Some(from), Some(until)) = (self.delivered_from, self.delivered_until) {
            if from > until {
                return Err(FieldError::new(
                    "deliveredFrom",
                    format!("{from} must not be after deliveredUntil date {until}"),
                ));
            }
        }
        self.delivery_note_numbers = self
            .delivery_note_numbers
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if let Some(iban) = &self.iban {
            iban.validate()
                .map_err(|e| FieldError::new("iban", e.to_string()))?;
        }
        if let Some(bic) = &self.bic {
            bic.validate()
                .map_err(|e| FieldError::new("bic", e.to_string()))?;
        }
        if !self.cost_centers.is_empty() {
            let mut sum = 0.0;
            for (number, amount) in &self.cost_centers {
                if number.is_empty() {
                    return Err(FieldError::new("costCenters", "empty cost-center number"));
                }
                if *amount <= 0.0 {
                    return Err(FieldError::new(
                        "costCenters",
                        format!("cost center {number:?} amount {amount} must be positive"),
                    ));
                }
                sum += amount;
            }
            if let Some(net) = self.net {
                let net = match self.conversion_rate {
                    Some(rate) => net * rate,
                    None => net,
                };
                if sum > net {
                    return Err(FieldError::new(
                        "costCenters",
                        format!("sum of cost-center amounts {sum} greater than invoice net {net}"),
                    ));
                }
            }
        }
        for (i, item) in self.accounting_items.iter().enumerate() {
            if item.title.trim().is_empty() {
                return Err(FieldError::new(
                    format!("accountingItems[{i}].title"),
                    "must not be empty",
                ));
            }
            item.general_ledger_account_number.validate().map_err(|e| {
                FieldError::new(
                    format!("accountingItems[{i}].generalLedgerAccountNumber"),
                    e.to_string(),
                )
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_invoice_is_valid() {
        assert!(Invoice::default().validate().is_ok());
    }

    #[test]
    fn test_total_must_not_be_smaller_than_net() {
        let mut inv = Invoice {
            net: Some(100.0),
            total: Some(99.0),
            ..Invoice::default()
        };
        let err = inv.validate().unwrap_err();
        assert_eq!(err.field, "total");

        inv.total = Some(120.0);
        assert!(inv.validate().is_ok());

        inv.total = None;
        assert!(inv.validate().is_ok());
    }

    #[test]
    fn test_delivered_from_requires_until() {
        let mut inv = Invoice {
            delivered_from: Some(date(2024, 3, 1)),
            ..Invoice::default()
        };
        let err = inv.validate().unwrap_err();
        assert!(err.to_string().contains("deliveredUntil"));

        // Swapped presence must not trigger this rule.
        let mut inv = Invoice {
            delivered_until: Some(date(2024, 3, 1)),
            ..Invoice::default()
        };
        assert!(inv.validate().is_ok());
    }

    #[test]
    fn test_delivery_window_ordering() {
        let mut inv = Invoice {
            delivered_from: Some(date(2024, 3, 2)),
            delivered_until: Some(date(2024, 3, 1)),
            ..Invoice::default()
        };
        assert!(inv.validate().is_err());

        inv.delivered_until = Some(date(2024, 3, 2));
        assert!(inv.validate().is_ok());
    }

    #[test]
    fn test_percentage_boundaries() {
        for (percent, ok) in [(0.0, true), (100.0, true), (-0.1, false), (100.1, false)] {
            let mut inv = Invoice {
                vat_percent: Some(percent),
                ..Invoice::default()
            };
            assert_eq!(inv.validate().is_ok(), ok, "vat {percent}");

            let mut inv = Invoice {
                discount_percent: Some(percent),
                ..Invoice::default()
            };
            assert_eq!(inv.validate().is_ok(), ok, "discount {percent}");
        }
    }

    #[test]
    fn test_delivery_note_numbers_trimmed() {
        let mut inv = Invoice {
            delivery_note_numbers: vec![
                " LS-1 ".to_string(),
                "  ".to_string(),
                "LS-2".to_string(),
            ],
            ..Invoice::default()
        };
        assert!(inv.validate().is_ok());
        assert_eq!(inv.delivery_note_numbers, vec!["LS-1", "LS-2"]);
    }

    #[test]
    fn test_cost_center_sum_against_converted_net() {
        let mut inv = Invoice {
            net: Some(100.0),
            conversion_rate: Some(1.1),
            cost_centers: BTreeMap::from([
                ("CC1".to_string(), 60.0),
                ("CC2".to_string(), 45.0),
            ]),
            ..Invoice::default()
        };
        // 105 <= 110 after conversion.
        assert!(inv.validate().is_ok());

        inv.conversion_rate = None;
        let err = inv.validate().unwrap_err();
        assert!(err.to_string().contains("cost-center"));
    }

    #[test]
    fn test_cost_center_amount_must_be_positive() {
        let mut inv = Invoice {
            cost_centers: BTreeMap::from([("CC1".to_string(), 0.0)]),
            ..Invoice::default()
        };
        assert!(inv.validate().is_err());
    }

    #[test]
    fn test_short_circuit_reports_first_rule_only() {
        let mut inv = Invoice {
            net: Some(-1.0),
            vat_percent: Some(200.0),
            ..Invoice::default()
        };
        let err = inv.validate().unwrap_err();
        assert_eq!(err.field, "net");
    }

    #[test]
    fn test_invoice_wire_names_are_camel_case() {
        let inv = Invoice {
            invoice_number: Some("R-1001".to_string()),
            partner_vat_id: Some(VatId::new("ATU13585627")),
            iban: Some(Iban::new("AT611904300234573201")),
            ..Invoice::default()
        };
        let json = serde_json::to_value(&inv).unwrap();
        assert!(json.get("invoiceNumber").is_some());
        assert!(json.get("partnerVatId").is_some());
        assert!(json.get("iban").is_some());
    }

    #[test]
    fn test_accounting_item_enums() {
        let item = AccountingItem {
            title: "Consulting".to_string(),
            general_ledger_account_number: AccountNumber::new("7700"),
            booking_type: BookingType::Debit,
            amount_type: AmountType::Net,
            amount: 100.0,
            value_added_tax_id: None,
            value_added_tax_percentage_amount: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["bookingType"], "DEBIT");
        assert_eq!(json["amountType"], "NET");
    }
}
