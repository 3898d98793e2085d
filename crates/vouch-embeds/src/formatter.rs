//! Vouch to embed formatting.

use crate::payload::{EmbedField, VouchEmbed};
use crate::stars::render_stars;
use vouch_common::{ActorProfile, Vouch};

/// Sidebar colour of every vouch embed.
pub const VOUCH_COLOUR: u32 = 0x5865_F2;

/// Field names, in display order.
pub mod fields {
    /// Submitter mention and tag.
    pub const USER: &str = "User";
    /// Star rating.
    pub const RATING: &str = "Rating";
    /// Product channel label.
    pub const PRODUCT_CHANNEL: &str = "Product Channel";
    /// Free-text reason.
    pub const REASON: &str = "Reason";
    /// Optional proof.
    pub const PROOF: &str = "Proof";
}

/// Renders `vouch` by `actor` as the `ordinal`-th vouch of its guild.
///
/// The output depends only on the arguments. The embed timestamp is the
/// vouch's own creation time, so a restored vouch shows when it was written
/// rather than when it was re-posted.
#[must_use]
pub fn format_vouch(actor: &ActorProfile, vouch: &Vouch, ordinal: usize) -> VouchEmbed {
    let mut embed_fields = vec![
        EmbedField::new(
            fields::USER,
            format!("{} ({})", actor.mention(), actor.tag),
            true,
        ),
        EmbedField::new(fields::RATING, render_stars(vouch.stars), true),
        EmbedField::new(fields::PRODUCT_CHANNEL, vouch.product_channel.as_str(), false),
        EmbedField::new(fields::REASON, vouch.reason.as_str(), false),
    ];

    if let Some(proof) = vouch.proof.as_deref().filter(|p| !p.is_empty()) {
        embed_fields.push(EmbedField::new(fields::PROOF, proof, false));
    }

    VouchEmbed {
        title: format!("{ordinal} New Vouch"),
        colour: VOUCH_COLOUR,
        thumbnail: actor.avatar_url.clone(),
        fields: embed_fields,
        footer: format!("User ID: {}", actor.id),
        timestamp: vouch.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_common::test_utils::{discord_fixtures, vouch_fixtures};

    #[test]
    fn test_layout() {
        let actor = discord_fixtures::test_actor(42);
        let vouch = vouch_fixtures::sample_vouch(&actor, 1);
        let embed = format_vouch(&actor, &vouch, 7);

        assert_eq!(embed.title, "7 New Vouch");
        assert_eq!(embed.colour, 0x5865F2);
        assert_eq!(embed.footer, "User ID: 42");
        assert_eq!(embed.thumbnail, actor.avatar_url);
        assert_eq!(embed.timestamp, vouch.timestamp);

        let names: Vec<_> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["User", "Rating", "Product Channel", "Reason"]);

        let user = embed.field(fields::USER).unwrap();
        assert_eq!(user.value, "<@42> (user42)");
        assert!(user.inline);
        assert!(embed.field(fields::RATING).unwrap().inline);
        assert!(!embed.field(fields::REASON).unwrap().inline);
    }

    #[test]
    fn test_proof_field_only_when_present() {
        let actor = discord_fixtures::test_actor(1);
        let mut vouch = vouch_fixtures::sample_vouch(&actor, 1);
        vouch.proof = Some("https://imgur.com/a/xyz".to_string());

        let embed = format_vouch(&actor, &vouch, 1);
        let proof = embed.fields.last().unwrap();
        assert_eq!(proof.name, "Proof");
        assert_eq!(proof.value, "https://imgur.com/a/xyz");
        assert!(!proof.inline);

        vouch.proof = Some(String::new());
        assert!(format_vouch(&actor, &vouch, 1).field(fields::PROOF).is_none());
    }

    #[test]
    fn test_uses_current_profile_not_snapshot() {
        let actor = discord_fixtures::test_actor(9);
        let vouch = vouch_fixtures::sample_vouch(&actor, 1);
        let renamed = ActorProfile::new(actor.id, "renamed", None);

        let embed = format_vouch(&renamed, &vouch, 1);
        assert_eq!(embed.field(fields::USER).unwrap().value, "<@9> (renamed)");
        assert_eq!(embed.thumbnail, None);
    }
}
