use anyhow::{bail, Result};
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::models::User;

/// The signed-in profile. Passed explicitly to everything that reads or writes user data.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) user: User,
}

impl Session {
    /// Resume the profile recorded in the config, if any.
    pub(crate) fn resume(config: &Config, db: &Database) -> Result<Option<Self>> {
        let Some(email) = config.settings.current_user.as_deref() else {
            return Ok(None);
        };
        Ok(db.get_user_by_email(email)?.map(|user| Self { user }))
    }

    /// Like [`Session::resume`] but a missing session is an error.
    pub(crate) fn require(config: &Config, db: &Database) -> Result<Self> {
        match Self::resume(config, db)? {
            Some(session) => Ok(session),
            None => bail!("Not signed in. Run `spendwise login <email>` first"),
        }
    }

    pub(crate) fn sign_in(email: &str, config: &mut Config, db: &Database) -> Result<Self> {
        let user = db.find_or_create_user(email)?;
        config.settings.current_user = Some(user.email.clone());
        config.save()?;
        info!(user_id = user.id, "signed in");
        Ok(Self { user })
    }

    pub(crate) fn sign_out(config: &mut Config) -> Result<Option<String>> {
        let previous = config.settings.current_user.take();
        config.save()?;
        if previous.is_some() {
            info!("signed out");
        }
        Ok(previous)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
