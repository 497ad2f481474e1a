//! Registration records.
//!
//! A [`Profile`] is what a participant fills in when they sign up. The
//! directory keeps one profile per [`IdentityKey`]; everything else in the
//! system sees only the derived [`Identity`].

use chrono::NaiveDate;

use crate::error::TypesError;
use crate::identity::{Identity, IdentityKey};

/// `chrono` format string for dates of birth (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A registered participant's record.
#[derive(Clone, PartialEq, Eq)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Postal address, free text.
    pub address: String,
    /// Registration email, doubling as the identity key.
    pub email: IdentityKey,
    /// Password, stored and compared as plain text.
    pub password: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
}

impl Profile {
    /// The identity this profile registers.
    pub fn identity(&self) -> Identity {
        Identity::new(self.email.clone(), self.name.clone())
    }

    /// Parse a `YYYY-MM-DD` date of birth.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidDate`] if the input is not a valid
    /// calendar date in that format.
    pub fn parse_date_of_birth(raw: &str) -> Result<NaiveDate, TypesError> {
        let trimmed = raw.trim();
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_parse| TypesError::InvalidDate {
            value: trimmed.to_owned(),
        })
    }

    /// Render the date of birth in `YYYY-MM-DD` form.
    pub fn date_of_birth_string(&self) -> String {
        self.date_of_birth.format(DATE_FORMAT).to_string()
    }
}

impl core::fmt::Debug for Profile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("date_of_birth", &self.date_of_birth)
            .finish()
    }
}
