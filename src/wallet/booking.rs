//! Booking events: the operational records implicit wallet entries are
//! derived from.
//!
//! The reconciler only reads the per-item state machine
//! (`Pending -> Delivered -> Settled`, or `Pending -> ReturnToSender`); item
//! transitions happen in the dispatch workflow outside the engine. Derived
//! entries are recomputed from the current booking state on every read and
//! are never persisted.

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::Currency;

/// Delivery status of a single parcel item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemDeliveryStatus {
    Pending,
    Delivered,
    ReturnToSender,
}

/// Settlement status of a delivered item's COD cash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemSettlementStatus {
    Unsettled,
    Settled,
}

/// Status of the booking as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// A single parcel item within a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingItem {
    pub id: String,
    pub description: String,
    /// Cash-on-delivery amount collected from the recipient
    pub cod_amount: BigDecimal,
    /// Currency of the COD amount; missing falls back to the default at
    /// derivation time
    pub cod_currency: Option<Currency>,
    pub delivery_status: ItemDeliveryStatus,
    pub settlement_status: ItemSettlementStatus,
}

impl BookingItem {
    pub fn new(id: impl Into<String>, cod_amount: BigDecimal, cod_currency: Currency) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            cod_amount,
            cod_currency: Some(cod_currency),
            delivery_status: ItemDeliveryStatus::Pending,
            settlement_status: ItemSettlementStatus::Unsettled,
        }
    }

    /// Mark the item delivered
    pub fn delivered(mut self) -> Self {
        self.delivery_status = ItemDeliveryStatus::Delivered;
        self
    }

    /// Mark the item returned to sender
    pub fn returned(mut self) -> Self {
        self.delivery_status = ItemDeliveryStatus::ReturnToSender;
        self
    }

    /// Mark the item's COD as settled
    pub fn settled(mut self) -> Self {
        self.settlement_status = ItemSettlementStatus::Settled;
        self
    }

    pub fn is_delivered(&self) -> bool {
        self.delivery_status == ItemDeliveryStatus::Delivered
    }

    /// Processed items (delivered or returned) count toward commission
    pub fn is_processed(&self) -> bool {
        matches!(
            self.delivery_status,
            ItemDeliveryStatus::Delivered | ItemDeliveryStatus::ReturnToSender
        )
    }

    /// The item's currency bucket, lenient on a missing field
    pub fn bucket(&self) -> Currency {
        self.cod_currency.unwrap_or_default()
    }
}

/// A parcel booking with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEvent {
    pub id: String,
    /// The customer who booked the delivery
    pub sender_id: String,
    /// The driver assigned to it, if any
    pub driver_id: Option<String>,
    pub status: BookingStatus,
    /// The booking's recorded currency; fee and commission conversion only
    /// applies when this is set and differs from an item bucket
    pub currency: Option<Currency>,
    /// Total delivery fee charged to the sender, in the booking currency
    pub delivery_fee: BigDecimal,
    /// Delivery zone, used for commission rule selection
    pub zone: Option<String>,
    pub date: NaiveDateTime,
    pub items: Vec<BookingItem>,
}

impl BookingEvent {
    pub fn new(
        id: impl Into<String>,
        sender_id: impl Into<String>,
        date: NaiveDateTime,
        delivery_fee: BigDecimal,
    ) -> Self {
        Self {
            id: id.into(),
            sender_id: sender_id.into(),
            driver_id: None,
            status: BookingStatus::Pending,
            currency: None,
            delivery_fee,
            zone: None,
            date,
            items: Vec::new(),
        }
    }

    /// Assign a driver
    pub fn driver(mut self, driver_id: impl Into<String>) -> Self {
        self.driver_id = Some(driver_id.into());
        self
    }

    /// Set the booking status
    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the booking currency
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Set the delivery zone
    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Add an item
    pub fn item(mut self, item: BookingItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn delivered_items(&self) -> impl Iterator<Item = &BookingItem> {
        self.items.iter().filter(|i| i.is_delivered())
    }

    pub fn processed_items(&self) -> impl Iterator<Item = &BookingItem> {
        self.items.iter().filter(|i| i.is_processed())
    }

    /// Distinct item currency buckets, in first-seen order
    pub fn item_currencies(&self) -> Vec<Currency> {
        let mut buckets = Vec::new();
        for item in &self.items {
            let bucket = item.bucket();
            if !buckets.contains(&bucket) {
                buckets.push(bucket);
            }
        }
        buckets
    }

    /// Whether the booking's items span more than one currency
    pub fn is_currency_mixed(&self) -> bool {
        self.item_currencies().len() > 1
    }
}
