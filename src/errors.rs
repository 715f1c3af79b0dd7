// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed errors for the wallet core.
//!
//! Core operations fail fast with one of these kinds; side effects
//! (notification emission) are logged instead and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("amount must be a positive number")]
    InvalidAmount,

    #[error("sender must complete KYC verification before sending funds")]
    KycRequired,

    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance {
        available: rust_decimal::Decimal,
        required: rust_decimal::Decimal,
    },

    #[error("a rejection reason is required")]
    MissingReason,

    #[error("exchange rate must be positive")]
    InvalidRate,

    #[error("email already in use")]
    EmailInUse,

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, WalletError>;
