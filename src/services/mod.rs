// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Wallet core services. State transitions return the mutated entity plus a
//! list of [`WalletEvent`]s; callers drain the events through
//! [`notifications::dispatch`] after the transition has committed.

use rust_decimal::Decimal;

pub mod currencies;
pub mod kyc;
pub mod ledger;
pub mod notifications;
pub mod support;
pub mod transactions;
pub mod users;

/// A user-visible side effect produced by a state transition.
///
/// Events are data only; emitting them never blocks or rolls back the
/// transition that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletEvent {
    TransactionPending {
        user_id: i64,
        transaction_id: i64,
        amount: Decimal,
        currency: String,
    },
    TransactionApproved {
        user_id: i64,
        transaction_id: i64,
        amount: Decimal,
        currency: String,
    },
    TransactionReceived {
        user_id: i64,
        transaction_id: i64,
        amount: Decimal,
        currency: String,
    },
    TransactionRejected {
        user_id: i64,
        transaction_id: i64,
        amount: Decimal,
        currency: String,
        reason: String,
    },
    KycSubmitted {
        user_id: i64,
    },
    KycApproved {
        user_id: i64,
    },
    KycRejected {
        user_id: i64,
        reason: String,
    },
}
