//! Application implementation with JWT-based sessions.
//!
//! This module provides the concrete implementation of the Application trait,
//! tying the SQLite repository to HS256-signed bearer tokens and
//! time-prefixed identifiers.

use headers::{Authorization, authorization::Bearer};
use jwt_simple::{
    claims::{Claims, JWTClaims},
    prelude::{Duration, HS256Key, MACLike},
};
use pengajuan_core::{
    models::{DateTime, FileId, OfficeId, Role, Session, SubmissionId},
    ports::Application,
};
use pengajuan_sqlite::Db;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SUBMISSION_TAG: u64 = 0x8;
const FILE_TAG: u64 = 0x9;

/// Main application implementation combining all system components.
///
/// The session of a request is read from the claims of its bearer token:
/// `sub` is the user id, the rest comes from [`CustomJWTClaims`].
#[derive(Clone)]
pub struct DemoApp {
    /// Database connection for persistent storage
    pub db: Db,
    /// HMAC key for JWT token verification
    pub key: HS256Key,
}

impl DemoApp {
    /// Extract and verify JWT claims from the authorization header.
    fn claims(&self, context: &Authorization<Bearer>) -> Option<JWTClaims<CustomJWTClaims>> {
        let token = context.0.token();
        self.key.verify_token::<CustomJWTClaims>(token, None).ok()
    }
}

impl Application for DemoApp {
    type Context = Authorization<Bearer>;
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.db
    }

    fn now(&self) -> DateTime {
        time::OffsetDateTime::now_utc().into()
    }

    fn generate_submission_id(&self) -> SubmissionId {
        time_prefixed_id(time::OffsetDateTime::now_utc(), SUBMISSION_TAG).into()
    }

    fn generate_file_id(&self) -> FileId {
        time_prefixed_id(time::OffsetDateTime::now_utc(), FILE_TAG).into()
    }

    async fn session(&self, context: &Self::Context) -> Option<Session> {
        let claims = self.claims(context)?;
        Some(Session {
            user_id: claims.subject?.parse().ok()?,
            name: claims.custom.name,
            role: claims.custom.role,
            office_id: claims.custom.office_id,
        })
    }
}

/// Sign a bearer token carrying the session, valid for the given number of
/// hours.
pub fn mint_token(key: &HS256Key, session: &Session, hours: u64) -> anyhow::Result<String> {
    let custom = CustomJWTClaims {
        role: session.role,
        office_id: session.office_id,
        name: session.name.clone(),
    };
    let claims = Claims::with_custom_claims(custom, Duration::from_hours(hours))
        .with_subject(session.user_id);
    Ok(key.authenticate(claims)?)
}

/// A v8 uuid whose high bits are the unix time, so ids sort by creation.
///
/// The timestamp is partitioned into (48, 12, 4) bits around the version and
/// variant fields; `tag` must be one of `0x8..=0xb` so that it also carries
/// the RFC 4122 variant.
fn time_prefixed_id(now: time::OffsetDateTime, tag: u64) -> Uuid {
    let rng56 = rand::rng().next_u64() >> 8; // 56 random bits

    let now = now.unix_timestamp() as u64;
    let now48 = 0xffff_ffff_ffff_0000 & now;
    let now12 = (0xfff0 & now) >> 4;
    let now04 = (0x000f & now) << 56;

    let hi = 0x0000_0000_0000_8000 | now48 | now12;
    let lo = (tag << 60) | now04 | rng56;
    Uuid::from_u64_pair(hi, lo)
}

/// Custom claims structure for JWT tokens.
///
/// Contains application-specific claims beyond standard JWT claims.
#[derive(Serialize, Deserialize)]
pub struct CustomJWTClaims {
    /// The role the token holder acts in
    pub role: Role,
    /// The office of an office operator
    #[serde(default)]
    pub office_id: Option<OfficeId>,
    /// Display name
    #[serde(default)]
    pub name: String,
}
