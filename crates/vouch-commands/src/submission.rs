//! Handling of `/vouch` submissions.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};
use vouch_common::{
    text_len, ActorProfile, GuildId, Result, Vouch, VouchError, MAX_PRODUCT_CHANNEL_LEN,
    MAX_REASON_LEN, MAX_STARS, MIN_STARS,
};
use vouch_embeds::{format_vouch, VouchEmbed};
use vouch_store::VouchStore;

use crate::messages;

/// A vouch as entered by the user, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VouchSubmission {
    /// The submitting user.
    pub actor: ActorProfile,
    /// Star rating.
    pub stars: u8,
    /// Product channel label.
    pub product_channel: String,
    /// Free-text reason.
    pub reason: String,
    /// Optional proof.
    pub proof: Option<String>,
}

impl VouchSubmission {
    /// Checks the input limits.
    ///
    /// The returned [`VouchError::Validation`] carries the reply text and the
    /// name of the offending command option.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_STARS..=MAX_STARS).contains(&self.stars) {
            return Err(VouchError::validation_field(
                messages::STARS_OUT_OF_RANGE,
                "stars",
            ));
        }

        if text_len(&self.reason) > MAX_REASON_LEN {
            return Err(VouchError::validation_field(
                messages::REASON_TOO_LONG,
                "reason",
            ));
        }

        if text_len(&self.product_channel) > MAX_PRODUCT_CHANNEL_LEN {
            return Err(VouchError::validation_field(
                messages::PRODUCT_CHANNEL_TOO_LONG,
                "product-channel",
            ));
        }

        Ok(())
    }
}

/// A stored vouch and its rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedVouch {
    /// Position of the vouch in its guild's ledger, starting at 1.
    pub ordinal: usize,
    /// The stored record.
    pub vouch: Vouch,
    /// The embed to reply with.
    pub embed: VouchEmbed,
}

/// Validates, stores and renders submissions.
#[derive(Debug, Clone)]
pub struct SubmissionHandler {
    store: Arc<VouchStore>,
}

impl SubmissionHandler {
    /// Creates a handler writing to `store`.
    pub fn new(store: Arc<VouchStore>) -> Self {
        Self { store }
    }

    /// Submits `submission` for `guild`, stamped with the current time.
    pub async fn submit(&self, guild: GuildId, submission: VouchSubmission) -> Result<SubmittedVouch> {
        self.submit_at(guild, submission, Utc::now()).await
    }

    /// Submits `submission` for `guild`, stamped with `now`.
    ///
    /// Invalid input is rejected before the store is touched.
    #[instrument(
        skip(self, submission, now),
        fields(guild_id = %guild, user_id = %submission.actor.id)
    )]
    pub async fn submit_at(
        &self,
        guild: GuildId,
        submission: VouchSubmission,
        now: DateTime<Utc>,
    ) -> Result<SubmittedVouch> {
        submission.validate()?;

        let VouchSubmission {
            actor,
            stars,
            product_channel,
            reason,
            proof,
        } = submission;

        let vouch = Vouch::new(&actor, stars, product_channel, reason, proof, now);
        let ordinal = self.store.append(guild, vouch.clone()).await?;
        let embed = format_vouch(&actor, &vouch, ordinal);

        info!(ordinal, stars, "Vouch recorded");
        Ok(SubmittedVouch {
            ordinal,
            vouch,
            embed,
        })
    }
}
