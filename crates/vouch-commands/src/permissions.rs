//! Role and channel checks for vouch commands.

use std::fmt;
use tracing::debug;
use vouch_common::{ChannelId, Result, RoleId, UserId, VouchError};
use vouch_config::DiscordConfig;

use crate::messages;

/// What a command needs from its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Submitting a vouch: the vouch role, in the vouch channel.
    Submit,
    /// Re-posting a guild's vouches: the owner role.
    Restore,
}

impl Permission {
    /// Get the permission name as a string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::Restore => "Restore",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission checks against the configured channel and roles.
///
/// Checks are pure: the caller passes the invoking channel and the member's
/// role ids, so nothing here talks to Discord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VouchPermissions {
    vouch_channel: ChannelId,
    vouch_role: RoleId,
    owner_role: RoleId,
}

impl VouchPermissions {
    /// Creates a checker from explicit ids.
    #[must_use]
    pub const fn new(vouch_channel: ChannelId, vouch_role: RoleId, owner_role: RoleId) -> Self {
        Self {
            vouch_channel,
            vouch_role,
            owner_role,
        }
    }

    /// Creates a checker from configuration.
    #[must_use]
    pub const fn from_config(config: &DiscordConfig) -> Self {
        Self::new(
            config.vouch_channel_id,
            config.vouch_role_id,
            config.owner_role_id,
        )
    }

    /// The channel `/vouch` is restricted to.
    #[must_use]
    pub const fn vouch_channel(&self) -> ChannelId {
        self.vouch_channel
    }

    /// Checks a `/vouch` invocation. The channel is checked before the role.
    pub fn check_submit(&self, user: UserId, channel: ChannelId, roles: &[RoleId]) -> Result<()> {
        if channel != self.vouch_channel {
            debug!(%user, %channel, "Vouch attempted outside the vouch channel");
            return Err(VouchError::auth(messages::WRONG_CHANNEL));
        }
        self.require_role(Permission::Submit, user, roles)
    }

    /// Checks a `/restore-vouches` invocation.
    pub fn check_restore(&self, user: UserId, roles: &[RoleId]) -> Result<()> {
        self.require_role(Permission::Restore, user, roles)
    }

    fn require_role(&self, permission: Permission, user: UserId, roles: &[RoleId]) -> Result<()> {
        let required = match permission {
            Permission::Submit => self.vouch_role,
            Permission::Restore => self.owner_role,
        };

        if roles.contains(&required) {
            Ok(())
        } else {
            debug!(%user, %permission, role = %required, "Missing required role");
            Err(VouchError::auth(messages::NO_PERMISSION))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> VouchPermissions {
        VouchPermissions::new(ChannelId(10), RoleId(20), RoleId(30))
    }

    #[test]
    fn test_submit_requires_channel_then_role() {
        let perms = checker();
        let user = UserId(1);

        assert!(perms.check_submit(user, ChannelId(10), &[RoleId(20)]).is_ok());

        let err = perms
            .check_submit(user, ChannelId(11), &[RoleId(20)])
            .unwrap_err();
        assert_eq!(err.user_message().as_deref(), Some(messages::WRONG_CHANNEL));

        // Wrong channel wins over the missing role.
        let err = perms.check_submit(user, ChannelId(11), &[]).unwrap_err();
        assert_eq!(err.user_message().as_deref(), Some(messages::WRONG_CHANNEL));

        let err = perms
            .check_submit(user, ChannelId(10), &[RoleId(30)])
            .unwrap_err();
        assert_eq!(err.user_message().as_deref(), Some(messages::NO_PERMISSION));
    }

    #[test]
    fn test_restore_requires_owner_role() {
        let perms = checker();
        let user = UserId(1);

        assert!(perms.check_restore(user, &[RoleId(5), RoleId(30)]).is_ok());
        assert!(matches!(
            perms.check_restore(user, &[RoleId(20)]),
            Err(VouchError::Auth { .. })
        ));
    }

    #[test]
    fn test_permission_names() {
        assert_eq!(Permission::Submit.to_string(), "Submit");
        assert_eq!(Permission::Restore.as_str(), "Restore");
    }
}
