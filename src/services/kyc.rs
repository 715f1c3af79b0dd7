// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Identity-verification workflow.
//!
//! Per-user states: `unverified` -> `pending` (submit) -> `verified`
//! (approve, terminal) or back to `unverified` (reject, re-submittable).
//! This is the sole gate checked by transaction creation.

use crate::errors::{Result, WalletError};
use crate::models::{KycStatus, User};
use crate::services::WalletEvent;
use crate::store;
use rusqlite::{Connection, params};

/// Identity data supplied on submission. Stored wholesale; a resubmission
/// after rejection overwrites the previous record.
#[derive(Debug, Clone)]
pub struct KycSubmission {
    pub full_name: String,
    pub date_of_birth: String,
    pub address: String,
    pub id_type: String,
    pub id_number: String,
    pub id_front_image: String,
    pub id_back_image: String,
    pub selfie_image: String,
}

pub fn submit(
    conn: &Connection,
    user_id: i64,
    data: &KycSubmission,
) -> Result<(User, Vec<WalletEvent>)> {
    let user = store::get_user(conn, user_id)?;
    match user.kyc_status {
        KycStatus::Unverified => {}
        KycStatus::Pending => {
            return Err(WalletError::InvalidState("KYC submission already pending"));
        }
        KycStatus::Verified => {
            return Err(WalletError::InvalidState("KYC already verified"));
        }
    }

    conn.execute(
        "INSERT INTO kyc_records(user_id, full_name, date_of_birth, address, id_type, \
         id_number, id_front_image, id_back_image, selfie_image, submitted_at, rejection_reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, NULL)
         ON CONFLICT(user_id) DO UPDATE SET
           full_name=excluded.full_name,
           date_of_birth=excluded.date_of_birth,
           address=excluded.address,
           id_type=excluded.id_type,
           id_number=excluded.id_number,
           id_front_image=excluded.id_front_image,
           id_back_image=excluded.id_back_image,
           selfie_image=excluded.selfie_image,
           submitted_at=excluded.submitted_at,
           rejection_reason=NULL",
        params![
            user_id,
            data.full_name,
            data.date_of_birth,
            data.address,
            data.id_type,
            data.id_number,
            data.id_front_image,
            data.id_back_image,
            data.selfie_image,
            store::ts(&store::now()),
        ],
    )?;
    store::set_kyc_status(conn, user_id, KycStatus::Pending)?;

    let user = store::get_user(conn, user_id)?;
    Ok((user, vec![WalletEvent::KycSubmitted { user_id }]))
}

pub fn approve(conn: &Connection, user_id: i64) -> Result<(User, Vec<WalletEvent>)> {
    let user = store::get_user(conn, user_id)?;
    if user.kyc_status != KycStatus::Pending {
        return Err(WalletError::InvalidState("user KYC is not pending"));
    }
    store::set_kyc_status(conn, user_id, KycStatus::Verified)?;

    let user = store::get_user(conn, user_id)?;
    Ok((user, vec![WalletEvent::KycApproved { user_id }]))
}

pub fn reject(conn: &Connection, user_id: i64, reason: &str) -> Result<(User, Vec<WalletEvent>)> {
    if reason.trim().is_empty() {
        return Err(WalletError::MissingReason);
    }
    let user = store::get_user(conn, user_id)?;
    if user.kyc_status != KycStatus::Pending {
        return Err(WalletError::InvalidState("user KYC is not pending"));
    }
    conn.execute(
        "UPDATE kyc_records SET rejection_reason=?1 WHERE user_id=?2",
        params![reason, user_id],
    )?;
    store::set_kyc_status(conn, user_id, KycStatus::Unverified)?;

    let user = store::get_user(conn, user_id)?;
    let events = vec![WalletEvent::KycRejected {
        user_id,
        reason: reason.to_string(),
    }];
    Ok((user, events))
}
