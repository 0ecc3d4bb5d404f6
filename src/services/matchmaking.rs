//! Matchmaking service
//!
//! Pairs users with a partner from their region and answers "who should this
//! message go to". Telegram I/O stays in the handlers; this service only
//! changes and reads pairing state.

use tracing::{info, debug, warn};
use crate::database::repositories::{UserRepository, PairAttempt, UnpairOutcome};
use crate::models::user::User;
use crate::utils::errors::Result;
use crate::utils::logging::log_match_event;

/// Result of pressing "Find Partner"
#[derive(Debug, Clone)]
pub enum FindOutcome {
    AlreadyConnected,
    Matched { me: User, partner: User },
    /// Added to the waiting pool of the user's region
    Waiting,
}

/// Where a plain text message from a user should be relayed
#[derive(Debug, Clone)]
pub enum RelayTarget {
    NotPaired,
    /// The stored partner row no longer exists
    Missing,
    Partner(User),
}

#[derive(Debug, Clone)]
pub struct MatchmakingService {
    user_repository: UserRepository,
}

impl MatchmakingService {
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Pair the user with the longest-waiting user of the same region
    pub async fn find_partner(&self, user: &User) -> Result<FindOutcome> {
        debug!(telegram_id = user.telegram_id, region = %user.region, "Looking for a partner");

        let outcome = match self.user_repository.pair_with_waiting(user.id).await? {
            PairAttempt::AlreadyPaired(_) => FindOutcome::AlreadyConnected,
            PairAttempt::Paired { me, partner } => {
                log_match_event("matched", me.id, Some(partner.id), &me.region);
                FindOutcome::Matched { me, partner }
            }
            PairAttempt::Queued(me) => {
                log_match_event("queued", me.id, None, &me.region);
                FindOutcome::Waiting
            }
        };

        Ok(outcome)
    }

    /// Leave the current chat; also cancels a pending search
    pub async fn leave(&self, user: &User) -> Result<UnpairOutcome> {
        let outcome = self.user_repository.unpair(user.id).await?;

        if let UnpairOutcome::Left { partner } = &outcome {
            log_match_event("left", user.id, partner.as_ref().map(|p| p.id), &user.region);
            if partner.is_none() {
                warn!(user_id = user.id, partner_id = ?user.partner_id, "Partner link was not symmetric");
            }
        }

        Ok(outcome)
    }

    /// Undo a pairing whose partner could not be told about it
    pub async fn rollback_match(&self, me: &User, unreachable: &User) -> Result<()> {
        let cleared = self.user_repository.unlink_pair(me.id, unreachable.id).await?;
        info!(user_id = me.id, partner_id = unreachable.id, cleared = cleared, "Rolled back match with unreachable partner");
        log_match_event("rolled_back", me.id, Some(unreachable.id), &me.region);

        Ok(())
    }

    /// Resolve the partner a message from `user` should be forwarded to
    pub async fn relay_target(&self, user: &User) -> Result<RelayTarget> {
        let Some(partner_id) = user.partner_id else {
            return Ok(RelayTarget::NotPaired);
        };

        match self.user_repository.find_by_id(partner_id).await? {
            Some(partner) => Ok(RelayTarget::Partner(partner)),
            None => {
                warn!(user_id = user.id, partner_id = partner_id, "Partner row missing");
                Ok(RelayTarget::Missing)
            }
        }
    }
}
