//! The session object tying the stores together.
//!
//! A [`Network`] owns the profile directory, the friendship graph, the
//! per-identity timelines and the data layout. Every operation that acts "as
//! me" reads the current key from the directory and fails with
//! [`CoreError::NotLoggedIn`] when there is none.
//!
//! # Persistence
//!
//! Profiles and the friendship graph are loaded in [`Network::open`].
//! Life-event logs are loaded on first use per identity. Each mutation marks
//! the artifact it touched; in [`PersistenceMode::Eager`] that artifact is
//! rewritten immediately, in [`PersistenceMode::OnShutdown`] it waits for
//! [`Network::flush`].

use std::collections::{BTreeMap, BTreeSet};

use kinship_graph::{DuplicatePolicy, FriendGraph};
use kinship_store::DataLayout;
use kinship_timeline::TimelineStore;
use kinship_types::{Directory, Identity, IdentityKey, LifeEvent, Profile};
use serde::Serialize;

use crate::config::{NetworkConfig, PersistenceMode};
use crate::directory::ProfileDirectory;
use crate::error::CoreError;

/// A snapshot file with unsaved changes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Artifact {
    Profiles,
    Adjacency,
    EventLog(IdentityKey),
}

/// Aggregate numbers about the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    /// Registered identities.
    pub identities: usize,
    /// Distinct friendships.
    pub friendships: usize,
    /// Friend-list length per registered identity.
    pub degrees: BTreeMap<IdentityKey, usize>,
}

/// One running session over a data directory.
#[derive(Debug)]
pub struct Network {
    directory: ProfileDirectory,
    graph: FriendGraph,
    timelines: TimelineStore,
    layout: DataLayout,
    mode: PersistenceMode,
    dirty: BTreeSet<Artifact>,
}

impl Network {
    /// Open the data directory named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if an existing snapshot cannot be read.
    pub fn open(config: &NetworkConfig) -> Result<Self, CoreError> {
        Self::open_at(
            DataLayout::new(&config.storage.data_dir),
            config.graph.duplicate_policy,
            config.persistence.mode,
        )
    }

    /// Open `layout` with explicit graph and persistence settings.
    ///
    /// Missing snapshots start empty.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if an existing snapshot cannot be read.
    pub fn open_at(
        layout: DataLayout,
        policy: DuplicatePolicy,
        mode: PersistenceMode,
    ) -> Result<Self, CoreError> {
        let (profiles, _) = layout.profiles().load()?;
        let directory = ProfileDirectory::from_profiles(profiles);
        let (graph, _) = layout.adjacency().load(&directory, policy)?;

        tracing::info!(
            data_dir = %layout.root().display(),
            identities = directory.len(),
            friendships = graph.friendship_count(),
            ?mode,
            "network opened"
        );

        Ok(Self {
            directory,
            graph,
            timelines: TimelineStore::new(),
            layout,
            mode,
            dirty: BTreeSet::new(),
        })
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// The profile directory.
    pub const fn directory(&self) -> &ProfileDirectory {
        &self.directory
    }

    /// The friendship graph.
    pub const fn graph(&self) -> &FriendGraph {
        &self.graph
    }

    /// Timelines loaded so far.
    pub const fn timelines(&self) -> &TimelineStore {
        &self.timelines
    }

    /// Where snapshots are written.
    pub const fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// The write policy in force.
    pub const fn mode(&self) -> PersistenceMode {
        self.mode
    }

    /// The logged-in participant, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.directory.current_identity()
    }

    /// Whether changes are waiting for [`Network::flush`].
    pub fn has_unsaved_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    // -------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------

    /// Register a new participant.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadyRegistered`] or
    /// [`CoreError::MultilineField`] on bad input, [`CoreError::Store`] if the
    /// eager save fails.
    pub fn register(&mut self, profile: Profile) -> Result<Identity, CoreError> {
        let identity = self.directory.register(profile)?;
        self.touch(Artifact::Profiles)?;
        Ok(identity)
    }

    /// Log in with an email and password.
    ///
    /// The participant becomes a known vertex of the graph, so a friendless
    /// login sees an empty friend list rather than [`CoreError::NotFound`].
    ///
    /// Nothing changes unless the login succeeds, including the read of
    /// the participant's life-event log.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCredentials`] for an unknown or malformed
    /// email or a wrong password, [`CoreError::Store`] if the life-event log
    /// cannot be read.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Identity, CoreError> {
        let key = IdentityKey::parse(email).map_err(|_invalid| CoreError::InvalidCredentials)?;
        self.directory.authenticate(&key, password)?;
        self.ensure_timeline(&key)?;
        let identity = self.directory.login(&key, password)?;
        self.graph.ensure_vertex(&key);
        Ok(identity)
    }

    /// End the session, returning who was logged in.
    pub fn logout(&mut self) -> Option<Identity> {
        let key = self.directory.logout()?;
        Some(self.identity_of(key))
    }

    // -------------------------------------------------------------------
    // Friendships
    // -------------------------------------------------------------------

    /// Befriend the participant registered as `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`], [`CoreError::Invalid`] for a
    /// malformed key, or [`CoreError::NotFound`] if nobody registered
    /// `target`.
    pub fn add_friend(&mut self, target: &str) -> Result<Identity, CoreError> {
        let me = self.current()?;
        let friend = self.registered(target)?;
        if self.graph.add_edge(&me, &friend.key) {
            tracing::info!(%me, friend = %friend.key, "friendship added");
            self.touch(Artifact::Adjacency)?;
        }
        Ok(friend)
    }

    /// My friends, in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`] or [`CoreError::NotFound`].
    pub fn friends(&self) -> Result<Vec<Identity>, CoreError> {
        let me = self.current()?;
        let neighbors = self.graph.neighbors(&me)?;
        Ok(self.identities(neighbors))
    }

    /// Friends of my friends who are neither me nor my friends, ordered by
    /// key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`] or [`CoreError::NotFound`].
    pub fn two_hop(&self) -> Result<Vec<Identity>, CoreError> {
        let me = self.current()?;
        let set = self.graph.two_hop(&me)?;
        Ok(self.identities(&set))
    }

    /// My connected component in breadth-first order, starting with me.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`] or [`CoreError::NotFound`].
    pub fn bfs_order(&self) -> Result<Vec<Identity>, CoreError> {
        let me = self.current()?;
        let order = self.graph.bfs(&me)?;
        Ok(self.identities(order))
    }

    /// My connected component in depth-first pre-order, starting with me.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`] or [`CoreError::NotFound`].
    pub fn dfs_order(&self) -> Result<Vec<Identity>, CoreError> {
        let me = self.current()?;
        let order = self.graph.dfs(&me)?;
        Ok(self.identities(order))
    }

    /// A shortest chain of friendships from me to `target`, both ends
    /// included, or `None` if we are not connected.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`], [`CoreError::Invalid`] or
    /// [`CoreError::NotFound`].
    pub fn path_to(&self, target: &str) -> Result<Option<Vec<Identity>>, CoreError> {
        let me = self.current()?;
        let target = self.registered(target)?;
        if !self.graph.contains(&target.key) {
            // Registered but never befriended or logged in.
            return Ok(None);
        }
        let path = self.graph.path_between(&me, &target.key)?;
        Ok(path.map(|keys| self.identities(&keys)))
    }

    // -------------------------------------------------------------------
    // Life events
    // -------------------------------------------------------------------

    /// Record `text` as my most recent life event.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`], [`CoreError::Invalid`] for blank
    /// or multi-line text, or [`CoreError::Store`].
    pub fn push_event(&mut self, text: &str) -> Result<(), CoreError> {
        let me = self.current()?;
        let event = LifeEvent::new(text)?;
        self.ensure_timeline(&me)?;
        self.timelines.push(&me, event);
        self.touch(Artifact::EventLog(me))
    }

    /// Remove and return my most recent life event.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`], [`CoreError::EmptyLog`] or
    /// [`CoreError::Store`].
    pub fn pop_event(&mut self) -> Result<LifeEvent, CoreError> {
        let me = self.current()?;
        self.ensure_timeline(&me)?;
        let event = self.timelines.pop(&me)?;
        self.touch(Artifact::EventLog(me))?;
        Ok(event)
    }

    /// My most recent life event, or `None` if I have none.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`] or [`CoreError::Store`].
    pub fn recent_event(&mut self) -> Result<Option<&LifeEvent>, CoreError> {
        let me = self.current()?;
        self.ensure_timeline(&me)?;
        Ok(self.timelines.peek(&me))
    }

    /// All my life events, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotLoggedIn`] or [`CoreError::Store`].
    pub fn all_events(&mut self) -> Result<&[LifeEvent], CoreError> {
        let me = self.current()?;
        self.ensure_timeline(&me)?;
        Ok(self.timelines.list_all(&me))
    }

    /// All life events of `target`, oldest first, loading them on demand.
    ///
    /// Does not need a login.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Invalid`], [`CoreError::NotFound`] or
    /// [`CoreError::Store`].
    pub fn all_events_of(&mut self, target: &str) -> Result<&[LifeEvent], CoreError> {
        let target = self.registered(target)?.key;
        self.ensure_timeline(&target)?;
        Ok(self.timelines.list_all(&target))
    }

    // -------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------

    /// Write every artifact with unsaved changes.
    ///
    /// A failure does not stop the remaining writes. Artifacts that fail to
    /// save stay pending for the next flush.
    ///
    /// # Errors
    ///
    /// Returns the first [`CoreError::Store`] encountered.
    pub fn flush(&mut self) -> Result<(), CoreError> {
        let pending = std::mem::take(&mut self.dirty);
        let count = pending.len();
        let mut first_err = None;
        for artifact in pending {
            if let Err(err) = self.save(&artifact) {
                tracing::error!(?artifact, error = %err, "snapshot write failed");
                self.dirty.insert(artifact);
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        if let Some(err) = first_err {
            return Err(err);
        }
        if count > 0 {
            tracing::info!(artifacts = count, "pending changes flushed");
        }
        Ok(())
    }

    /// Counts for the whole network.
    pub fn stats(&self) -> NetworkStats {
        let degrees = self
            .directory
            .profiles()
            .map(|p| (p.email.clone(), self.graph.degree(&p.email).unwrap_or(0)))
            .collect();
        NetworkStats {
            identities: self.directory.len(),
            friendships: self.graph.friendship_count(),
            degrees,
        }
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn current(&self) -> Result<IdentityKey, CoreError> {
        self.directory
            .current_key()
            .cloned()
            .ok_or(CoreError::NotLoggedIn)
    }

    /// Parse `raw` and resolve it against the directory.
    fn registered(&self, raw: &str) -> Result<Identity, CoreError> {
        let key = IdentityKey::parse(raw)?;
        self.directory.resolve(&key).ok_or(CoreError::NotFound(key))
    }

    fn identity_of(&self, key: IdentityKey) -> Identity {
        match self.directory.profile(&key) {
            Some(profile) => profile.identity(),
            None => Identity::from_key(key),
        }
    }

    fn identities<'a, I>(&self, keys: I) -> Vec<Identity>
    where
        I: IntoIterator<Item = &'a IdentityKey>,
    {
        keys.into_iter()
            .map(|key| self.identity_of(key.clone()))
            .collect()
    }

    fn ensure_timeline(&mut self, key: &IdentityKey) -> Result<(), CoreError> {
        if self.timelines.is_loaded(key) {
            return Ok(());
        }
        let (log, report) = self.layout.event_log(key).load()?;
        tracing::debug!(%key, events = report.events, missing = report.missing, "timeline loaded");
        self.timelines.insert_log(key.clone(), log);
        Ok(())
    }

    fn touch(&mut self, artifact: Artifact) -> Result<(), CoreError> {
        match self.mode {
            PersistenceMode::Eager => {
                if let Err(err) = self.save(&artifact) {
                    self.dirty.insert(artifact);
                    return Err(err);
                }
                Ok(())
            }
            PersistenceMode::OnShutdown => {
                self.dirty.insert(artifact);
                Ok(())
            }
        }
    }

    fn save(&self, artifact: &Artifact) -> Result<(), CoreError> {
        match artifact {
            Artifact::Profiles => self.layout.profiles().save(self.directory.profiles())?,
            Artifact::Adjacency => self.layout.adjacency().save(&self.graph)?,
            Artifact::EventLog(key) => {
                if let Some(log) = self.timelines.log(key) {
                    self.layout.event_log(key).save(log)?;
                }
            }
        }
        Ok(())
    }
}
