//! User repository implementation
//!
//! Pairing state lives on the `users` rows themselves. Every operation that
//! touches `partner_id` runs in a single transaction and updates both sides,
//! so `a.partner_id = b.id` implies `b.partner_id = a.id`.

use std::time::Instant;
use sqlx::PgPool;
use crate::models::user::{User, CreateUserRequest, UserStats};
use crate::models::region::{Region, infer_region};
use crate::utils::errors::PartnerChatError;
use crate::utils::logging::log_database_operation;

const USER_COLUMNS: &str =
    "id, telegram_id, region, premium, searching, partner_id, created_at, updated_at";

/// Result of trying to pair a user with someone from the waiting pool
#[derive(Debug, Clone)]
pub enum PairAttempt {
    /// The user already has a partner; nothing changed
    AlreadyPaired(User),
    /// Both rows now point at each other
    Paired { me: User, partner: User },
    /// No candidate was available; the user joined the waiting pool
    Queued(User),
}

/// Result of leaving the current chat
#[derive(Debug, Clone)]
pub enum UnpairOutcome {
    NotPaired,
    /// `partner` is set only when the partner's link pointed back at the user
    /// and was cleared as well
    Left { partner: Option<User> },
}

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, PartnerChatError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (telegram_id, region, premium)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(request.telegram_id)
        .bind(request.region.as_str())
        .bind(request.premium)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, PartnerChatError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by Telegram ID
    pub async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, PartnerChatError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE telegram_id = $1"
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Fetch the user for a Telegram account, registering it on first contact.
    ///
    /// Concurrent first contacts for the same account resolve to one row.
    pub async fn get_or_create(&self, telegram_id: i64, language_code: Option<&str>) -> Result<User, PartnerChatError> {
        if let Some(user) = self.find_by_telegram_id(telegram_id).await? {
            return Ok(user);
        }

        let region = infer_region(language_code);
        sqlx::query(
            r#"
            INSERT INTO users (telegram_id, region)
            VALUES ($1, $2)
            ON CONFLICT (telegram_id) DO NOTHING
            "#
        )
        .bind(telegram_id)
        .bind(region.as_str())
        .execute(&self.pool)
        .await?;

        self.find_by_telegram_id(telegram_id)
            .await?
            .ok_or(PartnerChatError::UserNotFound { user_id: telegram_id })
    }

    /// Change the user's matching region
    pub async fn set_region(&self, id: i64, region: Region) -> Result<User, PartnerChatError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET region = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(region.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Grant or revoke premium
    pub async fn set_premium(&self, id: i64, premium: bool) -> Result<User, PartnerChatError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET premium = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(premium)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Pair the user with the longest-waiting searcher of the same region, or
    /// put the user into the waiting pool when nobody is available.
    pub async fn pair_with_waiting(&self, user_id: i64) -> Result<PairAttempt, PartnerChatError> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let region: Option<String> = sqlx::query_scalar("SELECT region FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let region = region.ok_or(PartnerChatError::UserNotFound { user_id })?;

        // Serializes matching within a region so two simultaneous searchers
        // cannot both skip each other and end up queued.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext('partnerchat.match.' || $1))")
            .bind(&region)
            .execute(&mut *tx)
            .await?;

        let me = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if me.is_paired() {
            tx.commit().await?;
            return Ok(PairAttempt::AlreadyPaired(me));
        }

        let candidate = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE searching = TRUE
              AND partner_id IS NULL
              AND region = $2
              AND id <> $1
            ORDER BY updated_at ASC, id ASC
            LIMIT 1
            FOR UPDATE SKIP LOCKED
            "#
        ))
        .bind(me.id)
        .bind(&me.region)
        .fetch_optional(&mut *tx)
        .await?;

        let link = format!(
            r#"
            UPDATE users
            SET partner_id = $2, searching = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let attempt = match candidate {
            Some(candidate) => {
                let me = sqlx::query_as::<_, User>(&link)
                    .bind(me.id)
                    .bind(candidate.id)
                    .fetch_one(&mut *tx)
                    .await?;
                let partner = sqlx::query_as::<_, User>(&link)
                    .bind(candidate.id)
                    .bind(me.id)
                    .fetch_one(&mut *tx)
                    .await?;
                PairAttempt::Paired { me, partner }
            }
            None => {
                let me = sqlx::query_as::<_, User>(&format!(
                    r#"
                    UPDATE users
                    SET searching = TRUE,
                        updated_at = CASE WHEN searching THEN updated_at ELSE NOW() END
                    WHERE id = $1
                    RETURNING {USER_COLUMNS}
                    "#
                ))
                .bind(me.id)
                .fetch_one(&mut *tx)
                .await?;
                PairAttempt::Queued(me)
            }
        };

        tx.commit().await?;
        log_database_operation("pair_with_waiting", u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX));

        Ok(attempt)
    }

    /// Leave the current chat and the waiting pool.
    ///
    /// The partner's link is cleared only when it points back at the user.
    pub async fn unpair(&self, user_id: i64) -> Result<UnpairOutcome, PartnerChatError> {
        let mut tx = self.pool.begin().await?;

        // Lock both rows in id order so two partners leaving at once cannot deadlock.
        let locked = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE id = $1 OR id = (SELECT partner_id FROM users WHERE id = $1)
            ORDER BY id
            FOR UPDATE
            "#
        ))
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let me = locked
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or(PartnerChatError::UserNotFound { user_id })?;

        let partner_id = match me.partner_id {
            Some(partner_id) => partner_id,
            None => {
                if me.searching {
                    sqlx::query("UPDATE users SET searching = FALSE, updated_at = NOW() WHERE id = $1")
                        .bind(me.id)
                        .execute(&mut *tx)
                        .await?;
                }
                tx.commit().await?;
                return Ok(UnpairOutcome::NotPaired);
            }
        };

        sqlx::query(
            "UPDATE users SET partner_id = NULL, searching = FALSE, updated_at = NOW() WHERE id = $1"
        )
        .bind(me.id)
        .execute(&mut *tx)
        .await?;

        let linked_back = locked
            .iter()
            .any(|user| user.id == partner_id && user.partner_id == Some(me.id));

        let partner = if linked_back {
            let partner = sqlx::query_as::<_, User>(&format!(
                r#"
                UPDATE users
                SET partner_id = NULL, updated_at = NOW()
                WHERE id = $1
                RETURNING {USER_COLUMNS}
                "#
            ))
            .bind(partner_id)
            .fetch_one(&mut *tx)
            .await?;
            Some(partner)
        } else {
            None
        };

        tx.commit().await?;
        Ok(UnpairOutcome::Left { partner })
    }

    /// Undo a fresh pairing after the partner could not be notified.
    ///
    /// The unreachable partner also leaves the waiting pool.
    pub async fn unlink_pair(&self, user_id: i64, unreachable_id: i64) -> Result<u64, PartnerChatError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET partner_id = NULL,
                searching = CASE WHEN id = $2 THEN FALSE ELSE searching END,
                updated_at = NOW()
            WHERE (id = $1 AND partner_id = $2) OR (id = $2 AND partner_id = $1)
            "#
        )
        .bind(user_id)
        .bind(unreachable_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Aggregate counters for admins
    pub async fn stats(&self) -> Result<UserStats, PartnerChatError> {
        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE premium) AS premium,
                   COUNT(*) FILTER (WHERE partner_id IS NOT NULL) AS paired,
                   COUNT(*) FILTER (WHERE searching) AS searching
            FROM users
            "#
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
