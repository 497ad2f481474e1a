//! Registered profiles and the current login.
//!
//! [`ProfileDirectory`] is the [`Directory`] the rest of the system resolves
//! keys against. The logged-in participant is held as an owned key, not a
//! reference into the profile map.

use std::collections::BTreeMap;

use kinship_types::{Directory, Identity, IdentityKey, Profile};

use crate::error::CoreError;

/// Every registered profile, plus who is logged in.
#[derive(Debug, Clone, Default)]
pub struct ProfileDirectory {
    profiles: BTreeMap<IdentityKey, Profile>,
    current: Option<IdentityKey>,
}

impl ProfileDirectory {
    /// Create an empty directory.
    pub const fn new() -> Self {
        Self {
            profiles: BTreeMap::new(),
            current: None,
        }
    }

    /// Build a directory from loaded profiles. Later duplicates of an email
    /// replace earlier ones.
    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.email.clone(), p))
                .collect(),
            current: None,
        }
    }

    /// Add a new profile.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadyRegistered`] if the email is taken and
    /// [`CoreError::MultilineField`] if a text field contains a line break.
    pub fn register(&mut self, profile: Profile) -> Result<Identity, CoreError> {
        for (field, value) in [
            ("name", &profile.name),
            ("address", &profile.address),
            ("password", &profile.password),
        ] {
            if value.contains(['\n', '\r']) {
                return Err(CoreError::MultilineField { field });
            }
        }
        if self.profiles.contains_key(&profile.email) {
            return Err(CoreError::AlreadyRegistered(profile.email));
        }

        let identity = profile.identity();
        tracing::info!(key = %identity.key, "profile registered");
        self.profiles.insert(profile.email.clone(), profile);
        Ok(identity)
    }

    /// Check `password` for `key` without changing who is logged in.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCredentials`] for an unknown key or a wrong
    /// password.
    pub fn authenticate(&self, key: &IdentityKey, password: &str) -> Result<Identity, CoreError> {
        self.profiles
            .get(key)
            .filter(|p| p.password == password)
            .map(Profile::identity)
            .ok_or(CoreError::InvalidCredentials)
    }

    /// Log in as `key` if `password` matches. Replaces any previous login.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCredentials`] for an unknown key or a wrong
    /// password.
    pub fn login(&mut self, key: &IdentityKey, password: &str) -> Result<Identity, CoreError> {
        let identity = self.authenticate(key, password)?;
        self.current = Some(key.clone());
        tracing::info!(%key, "logged in");
        Ok(identity)
    }

    /// End the current session, returning who was logged in.
    pub fn logout(&mut self) -> Option<IdentityKey> {
        let previous = self.current.take();
        if let Some(key) = &previous {
            tracing::info!(%key, "logged out");
        }
        previous
    }

    /// Key of the logged-in participant.
    pub const fn current_key(&self) -> Option<&IdentityKey> {
        self.current.as_ref()
    }

    /// The registration record for `key`.
    pub fn profile(&self, key: &IdentityKey) -> Option<&Profile> {
        self.profiles.get(key)
    }

    /// Every profile, ordered by key.
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether nobody has registered yet.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Directory for ProfileDirectory {
    fn resolve(&self, key: &IdentityKey) -> Option<Identity> {
        self.profiles.get(key).map(Profile::identity)
    }

    fn current_identity(&self) -> Option<Identity> {
        self.current.as_ref().and_then(|key| self.resolve(key))
    }
}
