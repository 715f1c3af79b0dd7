// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    /// USD per one unit.
    pub exchange_rate: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    Unverified,
    Pending,
    Verified,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Unverified => "unverified",
            KycStatus::Pending => "pending",
            KycStatus::Verified => "verified",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unverified" => Some(KycStatus::Unverified),
            "pending" => Some(KycStatus::Pending),
            "verified" => Some(KycStatus::Verified),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub kyc_status: KycStatus,
    pub is_admin: bool,
    /// currency id -> receive address; empty string means not yet generated.
    pub wallet_addresses: BTreeMap<String, String>,
    /// currency id -> balance; absent currencies read as zero.
    pub balances: BTreeMap<String, Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Approved,
    Rejected,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Approved => "approved",
            TxStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TxStatus::Pending),
            "approved" => Some(TxStatus::Approved),
            "rejected" => Some(TxStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub from_user_id: Option<i64>,
    pub to_user_id: Option<i64>,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: TxStatus,
    pub created_at: DateTime<Utc>,
    pub description: Option<String>,
    /// Present iff status is Rejected.
    pub rejection_reason: Option<String>,
    /// Informational only; never applied to the ledger.
    pub fee: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Transaction,
    Admin,
    Kyc,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Transaction => "transaction",
            NotificationKind::Admin => "admin",
            NotificationKind::Kyc => "kyc",
            NotificationKind::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "transaction" => Some(NotificationKind::Transaction),
            "admin" => Some(NotificationKind::Admin),
            "kyc" => Some(NotificationKind::Kyc),
            "system" => Some(NotificationKind::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub transaction_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycRecord {
    pub user_id: i64,
    pub full_name: String,
    pub date_of_birth: String,
    pub address: String,
    pub id_type: String,
    pub id_number: String,
    pub id_front_image: String,
    pub id_back_image: String,
    pub selfie_image: String,
    pub submitted_at: DateTime<Utc>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(TicketStatus::Open),
            "in_progress" => Some(TicketStatus::InProgress),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketMessage {
    pub id: i64,
    pub ticket_id: i64,
    /// "user" or "admin".
    pub sender: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: i64,
    pub user_id: i64,
    pub subject: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<TicketMessage>,
}
