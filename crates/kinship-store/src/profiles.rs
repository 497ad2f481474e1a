//! Registration records.
//!
//! Five lines per profile, in this order: name, address, email, password,
//! date of birth (`YYYY-MM-DD`).

use std::path::{Path, PathBuf};

use kinship_types::{IdentityKey, Profile};

use crate::error::StoreError;
use crate::fs;

/// Lines per profile record.
const RECORD_LINES: usize = 5;

/// What happened while loading the profile file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileLoadReport {
    /// No file existed; the directory starts empty.
    pub missing: bool,
    /// Profiles restored.
    pub profiles: usize,
    /// Records dropped for an invalid email or date of birth.
    pub skipped_invalid: usize,
    /// Trailing lines that did not form a complete record.
    pub truncated_lines: usize,
}

/// The registration records file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFile {
    path: PathBuf,
}

impl ProfileFile {
    /// Bind to the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file's location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file from `profiles`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be replaced.
    pub fn save<'a, I>(&self, profiles: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = &'a Profile>,
    {
        let mut out = String::new();
        let mut count = 0usize;
        for profile in profiles {
            for field in [
                profile.name.as_str(),
                profile.address.as_str(),
                profile.email.as_str(),
                profile.password.as_str(),
            ] {
                out.push_str(field);
                out.push('\n');
            }
            out.push_str(&profile.date_of_birth_string());
            out.push('\n');
            count = count.saturating_add(1);
        }
        fs::write_atomic(&self.path, &out)?;
        tracing::debug!(path = %self.path.display(), profiles = count, "profiles saved");
        Ok(())
    }

    /// Load every complete, valid record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<(Vec<Profile>, ProfileLoadReport), StoreError> {
        let Some(text) = fs::read_optional(&self.path)? else {
            tracing::info!(path = %self.path.display(), "no existing user data found, starting fresh");
            let report = ProfileLoadReport {
                missing: true,
                ..ProfileLoadReport::default()
            };
            return Ok((Vec::new(), report));
        };

        let lines: Vec<&str> = text.lines().collect();
        let mut report = ProfileLoadReport::default();
        let mut profiles = Vec::new();

        for chunk in lines.chunks(RECORD_LINES) {
            let [name, address, email, password, dob] = chunk else {
                report.truncated_lines = chunk.len();
                tracing::warn!(
                    path = %self.path.display(),
                    lines = chunk.len(),
                    "incomplete trailing profile record, ignoring"
                );
                continue;
            };

            let parsed = IdentityKey::parse(email).and_then(|email| {
                Profile::parse_date_of_birth(dob).map(|date_of_birth| Profile {
                    name: (*name).to_owned(),
                    address: (*address).to_owned(),
                    email,
                    password: (*password).to_owned(),
                    date_of_birth,
                })
            });

            match parsed {
                Ok(profile) => {
                    profiles.push(profile);
                    report.profiles = report.profiles.saturating_add(1);
                }
                Err(err) => {
                    report.skipped_invalid = report.skipped_invalid.saturating_add(1);
                    tracing::warn!(email = *email, error = %err, "invalid profile record, skipping");
                }
            }
        }

        tracing::info!(
            path = %self.path.display(),
            profiles = report.profiles,
            skipped_invalid = report.skipped_invalid,
            "profiles loaded"
        );
        Ok((profiles, report))
    }
}
