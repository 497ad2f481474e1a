//! The interactive menu loop.
//!
//! [`Shell`] reads one line per prompt from any [`BufRead`] and writes to any
//! [`Write`], so tests drive it with byte slices. End of input behaves like
//! choosing "Exit". Leaving the shell flushes pending snapshots.

use std::io::{BufRead, Write};

use kinship_core::{CoreError, Network};
use kinship_types::{Identity, IdentityKey, LifeEvent, Profile};

use crate::error::CliError;

const RULE: &str = "***************************************";

/// Whether the loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Line-oriented console over a [`Network`].
pub struct Shell<'n, R, W> {
    network: &'n mut Network,
    input: R,
    output: W,
}

impl<'n, R: BufRead, W: Write> Shell<'n, R, W> {
    /// Bind a shell to `network` and a pair of streams.
    pub const fn new(network: &'n mut Network, input: R, output: W) -> Self {
        Self {
            network,
            input,
            output,
        }
    }

    /// Run menus until the user exits or input ends, then flush.
    ///
    /// Pending snapshots are flushed even when the session ends on an error.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] if the streams fail and [`CliError::Core`]
    /// if a snapshot cannot be read or written. A session error wins over a
    /// flush error.
    pub fn run(&mut self) -> Result<(), CliError> {
        let session = self.menu_loop();
        let flushed = self.network.flush();
        match (session, flushed) {
            (Err(err), Err(flush_err)) => {
                tracing::error!(error = %flush_err, "flush after failed session also failed");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
            (Ok(()), Err(flush_err)) => Err(flush_err.into()),
            (Ok(()), Ok(())) => {
                writeln!(self.output, "Goodbye!")?;
                Ok(())
            }
        }
    }

    fn menu_loop(&mut self) -> Result<(), CliError> {
        loop {
            let flow = match self.network.current_identity() {
                Some(me) => self.member_menu(&me)?,
                None => self.guest_menu()?,
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    // -------------------------------------------------------------------
    // Menus
    // -------------------------------------------------------------------

    fn guest_menu(&mut self) -> Result<Flow, CliError> {
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "|1. Register\n|2. Login\n|3. Exit")?;
        writeln!(self.output, "{RULE}")?;
        let Some(choice) = self.ask("Enter your choice")? else {
            return Ok(Flow::Exit);
        };
        match choice.trim() {
            "1" => self.register(),
            "2" => self.login(),
            "3" => Ok(Flow::Exit),
            _ => self.invalid_choice(),
        }
    }

    fn member_menu(&mut self, me: &Identity) -> Result<Flow, CliError> {
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "Welcome {me}")?;
        writeln!(
            self.output,
            " 1. Add friend\n \
             2. Show my friends\n \
             3. Show friends of my friends\n \
             4. Network in breadth-first order\n \
             5. Network in depth-first order\n \
             6. Degrees of separation\n \
             7. Add life event\n \
             8. Delete most recent life event\n \
             9. Show most recent life event\n\
             10. Show all my life events\n\
             11. Show another user's life events\n\
             12. Logout\n\
             13. Exit"
        )?;
        writeln!(self.output, "{RULE}")?;
        let Some(choice) = self.ask("Enter your choice")? else {
            return Ok(Flow::Exit);
        };
        match choice.trim() {
            "1" => self.add_friend(),
            "2" => self.show_friends(),
            "3" => self.show_two_hop(),
            "4" => self.show_bfs(),
            "5" => self.show_dfs(),
            "6" => self.show_path(),
            "7" => self.push_event(),
            "8" => self.pop_event(),
            "9" => self.recent_event(),
            "10" => self.all_events(),
            "11" => self.events_of_other(),
            "12" => {
                if let Some(previous) = self.network.logout() {
                    writeln!(self.output, "Goodbye, {previous}.")?;
                }
                Ok(Flow::Continue)
            }
            "13" => Ok(Flow::Exit),
            _ => self.invalid_choice(),
        }
    }

    // -------------------------------------------------------------------
    // Guest commands
    // -------------------------------------------------------------------

    fn register(&mut self) -> Result<Flow, CliError> {
        writeln!(self.output, "Great! Sign up now:")?;
        let Some(name) = self.ask("Enter name")? else {
            return Ok(Flow::Exit);
        };
        let Some(address) = self.ask("Enter address")? else {
            return Ok(Flow::Exit);
        };
        let Some(email) = self.ask("Enter email")? else {
            return Ok(Flow::Exit);
        };
        let Some(password) = self.ask("Enter password")? else {
            return Ok(Flow::Exit);
        };
        let Some(dob) = self.ask("Enter DOB (YYYY-MM-DD)")? else {
            return Ok(Flow::Exit);
        };

        let parsed = IdentityKey::parse(&email).and_then(|email| {
            Profile::parse_date_of_birth(&dob).map(|date_of_birth| Profile {
                name: name.trim().to_owned(),
                address: address.trim().to_owned(),
                email,
                password,
                date_of_birth,
            })
        });
        let profile = match parsed {
            Ok(profile) => profile,
            Err(err) => {
                writeln!(self.output, "Registration failed: {err}")?;
                return Ok(Flow::Continue);
            }
        };

        match self.network.register(profile) {
            Ok(_) => writeln!(self.output, "Registration successful!")?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    fn login(&mut self) -> Result<Flow, CliError> {
        writeln!(self.output, "Great! Log in now:")?;
        let Some(email) = self.ask("Enter email")? else {
            return Ok(Flow::Exit);
        };
        let Some(password) = self.ask("Enter password")? else {
            return Ok(Flow::Exit);
        };
        match self.network.login(&email, &password) {
            Ok(me) => writeln!(self.output, "Login successful! Welcome, {me}")?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    // -------------------------------------------------------------------
    // Friendships
    // -------------------------------------------------------------------

    fn add_friend(&mut self) -> Result<Flow, CliError> {
        let Some(target) = self.ask("Enter friend's email")? else {
            return Ok(Flow::Exit);
        };
        match self.network.add_friend(&target) {
            Ok(friend) => writeln!(self.output, "Friend added successfully: {friend}")?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    fn show_friends(&mut self) -> Result<Flow, CliError> {
        let result = self.network.friends();
        self.show_list(result, "Your friends", "You have no friends yet.")
    }

    fn show_two_hop(&mut self) -> Result<Flow, CliError> {
        let result = self.network.two_hop();
        self.show_list(result, "Friends of your friends", "No friends of friends found.")
    }

    fn show_bfs(&mut self) -> Result<Flow, CliError> {
        let result = self.network.bfs_order();
        self.show_list(result, "Breadth-first order", "Nobody reachable.")
    }

    fn show_dfs(&mut self) -> Result<Flow, CliError> {
        let result = self.network.dfs_order();
        self.show_list(result, "Depth-first order", "Nobody reachable.")
    }

    fn show_path(&mut self) -> Result<Flow, CliError> {
        let Some(target) = self.ask("Enter the other user's email")? else {
            return Ok(Flow::Exit);
        };
        match self.network.path_to(&target) {
            Ok(Some(path)) => {
                let degrees = path.len().saturating_sub(1);
                writeln!(
                    self.output,
                    "Degrees of separation: {degrees} ({})",
                    join(&path, " -> ")
                )?;
            }
            Ok(None) => writeln!(self.output, "You are not connected to {}.", target.trim())?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    // -------------------------------------------------------------------
    // Life events
    // -------------------------------------------------------------------

    fn push_event(&mut self) -> Result<Flow, CliError> {
        let Some(text) = self.ask("Describe the life event")? else {
            return Ok(Flow::Exit);
        };
        match self.network.push_event(&text) {
            Ok(()) => writeln!(self.output, "Life event added.")?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    fn pop_event(&mut self) -> Result<Flow, CliError> {
        match self.network.pop_event() {
            Ok(event) => writeln!(self.output, "Deleted life event: {event}")?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    fn recent_event(&mut self) -> Result<Flow, CliError> {
        match self.network.recent_event().map(Option::<&LifeEvent>::cloned) {
            Ok(Some(event)) => writeln!(self.output, "Most recent life event: {event}")?,
            Ok(None) => writeln!(self.output, "No life events recorded.")?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    fn all_events(&mut self) -> Result<Flow, CliError> {
        let result = self.network.all_events().map(<[LifeEvent]>::to_vec);
        self.show_events(result)
    }

    fn events_of_other(&mut self) -> Result<Flow, CliError> {
        let Some(target) = self.ask("Enter the other user's email")? else {
            return Ok(Flow::Exit);
        };
        let result = self.network.all_events_of(&target).map(<[LifeEvent]>::to_vec);
        self.show_events(result)
    }

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    /// Prompt and read one line. `None` at end of input.
    fn ask(&mut self, label: &str) -> Result<Option<String>, CliError> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn invalid_choice(&mut self) -> Result<Flow, CliError> {
        writeln!(self.output, "Invalid choice. Try again.")?;
        Ok(Flow::Continue)
    }

    /// Print an expected failure; propagate persistence failures.
    fn report(&mut self, err: CoreError) -> Result<(), CliError> {
        if matches!(err, CoreError::Store(_)) {
            return Err(err.into());
        }
        tracing::debug!(error = %err, "command rejected");
        writeln!(self.output, "{err}")?;
        Ok(())
    }

    fn show_list(
        &mut self,
        result: Result<Vec<Identity>, CoreError>,
        heading: &str,
        empty: &str,
    ) -> Result<Flow, CliError> {
        match result {
            Ok(list) if list.is_empty() => writeln!(self.output, "{empty}")?,
            Ok(list) => writeln!(self.output, "{heading}: {}", join(&list, ", "))?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    fn show_events(&mut self, result: Result<Vec<LifeEvent>, CoreError>) -> Result<Flow, CliError> {
        match result {
            Ok(events) if events.is_empty() => writeln!(self.output, "No life events recorded.")?,
            Ok(events) => {
                writeln!(self.output, "Life events, oldest first:")?;
                for (idx, event) in events.iter().enumerate() {
                    writeln!(self.output, "  {}. {event}", idx.saturating_add(1))?;
                }
            }
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }
}

fn join(identities: &[Identity], sep: &str) -> String {
    identities
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kinship_core::{NetworkConfig, PersistenceMode};

    use super::*;

    fn network(dir: &tempfile::TempDir, mode: PersistenceMode) -> Network {
        let mut config = NetworkConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.persistence.mode = mode;
        Network::open(&config).unwrap()
    }

    fn run(net: &mut Network, script: &str) -> String {
        let mut out = Vec::new();
        Shell::new(net, script.as_bytes(), &mut out).run().unwrap();
        String::from_utf8(out).unwrap()
    }

    const REGISTER_ALL: &str = "\
1\nAlice\n1 Main St\nalice@x.org\npw\n1990-01-01\n\
1\nBob\n2 Main St\nbob@x.org\npw\n1991-02-02\n\
1\nCarol\n3 Main St\ncarol@x.org\npw\n1992-03-03\n";

    #[test]
    fn register_login_and_befriend() {
        let dir = tempfile::tempdir().unwrap();
        let mut net = network(&dir, PersistenceMode::Eager);
        let script = format!(
            "{REGISTER_ALL}\
             2\nbob@x.org\npw\n1\ncarol@x.org\n12\n\
             2\nalice@x.org\npw\n1\nbob@x.org\n2\n3\n4\n5\n6\ncarol@x.org\n13\n"
        );
        let out = run(&mut net, &script);

        assert_eq!(out.matches("Registration successful!").count(), 3);
        assert!(out.contains("Login successful! Welcome, Alice"));
        assert!(out.contains("Friend added successfully: Bob"));
        assert!(out.contains("Your friends: Bob\n"));
        assert!(out.contains("Friends of your friends: Carol\n"));
        assert!(out.contains("Breadth-first order: Alice, Bob, Carol\n"));
        assert!(out.contains("Depth-first order: Alice, Bob, Carol\n"));
        assert!(out.contains("Degrees of separation: 2 (Alice -> Bob -> Carol)"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn life_events_follow_stack_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut net = network(&dir, PersistenceMode::Eager);
        let script = format!(
            "{REGISTER_ALL}\
             2\nalice@x.org\npw\n\
             8\n9\n\
             7\ngraduated\n7\nmoved\n9\n8\n9\n10\n11\ncarol@x.org\n13\n"
        );
        let out = run(&mut net, &script);

        assert!(out.contains("no life events recorded for alice@x.org"));
        assert!(out.contains("Most recent life event: moved"));
        assert!(out.contains("Deleted life event: moved"));
        assert!(out.contains("Most recent life event: graduated"));
        assert!(out.contains("  1. graduated\n"));
        assert!(!out.contains("  2. "));
        assert!(out.contains("No life events recorded."));
    }

    #[test]
    fn rejected_input_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut net = network(&dir, PersistenceMode::Eager);
        let script = format!(
            "9\n\
             {REGISTER_ALL}\
             1\nDup\nX\nalice@x.org\npw\n2000-01-01\n\
             1\nBad\nX\nbad@x.org\npw\nnot-a-date\n\
             2\nalice@x.org\nwrong\n\
             2\nalice@x.org\npw\n1\nghost@x.org\n42\n3\n"
        );
        let out = run(&mut net, &script);

        assert!(out.contains("Invalid choice. Try again."));
        assert!(out.contains("email already registered: alice@x.org"));
        assert!(out.contains("Registration failed: invalid date of birth"));
        assert!(out.contains("invalid email or password"));
        assert!(out.contains("user not found: ghost@x.org"));
        assert!(out.contains("No friends of friends found."));
    }

    #[test]
    fn end_of_input_exits_and_flushes() {
        let dir = tempfile::tempdir().unwrap();
        let mut net = network(&dir, PersistenceMode::OnShutdown);
        let out = run(&mut net, "1\nAlice\n1 Main St\nalice@x.org\npw\n1990-01-01\n");

        assert!(out.ends_with("Goodbye!\n"));
        assert!(!net.has_unsaved_changes());
        assert!(dir.path().join("users.txt").exists());
    }

    #[test]
    fn unreadable_log_still_flushes_other_changes() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut net = network(&dir, PersistenceMode::Eager);
            run(&mut net, "1\nCarol\n3 Main St\ncarol@x.org\npw\n1992-03-03\n");
        }
        std::fs::create_dir(dir.path().join("life_events_carol@x.org.txt")).unwrap();

        let mut net = network(&dir, PersistenceMode::OnShutdown);
        let script = "1\nBob\n2 Main St\nbob@x.org\npw\n1991-02-02\n2\ncarol@x.org\npw\n";
        let mut out = Vec::new();
        let result = Shell::new(&mut net, script.as_bytes(), &mut out).run();

        assert!(matches!(result, Err(CliError::Core {
            source: CoreError::Store(_)
        })));
        assert!(net.current_identity().is_none());
        assert!(!net.has_unsaved_changes());
        let users = std::fs::read_to_string(dir.path().join("users.txt")).unwrap();
        assert!(users.contains("bob@x.org"));
        assert!(users.contains("carol@x.org"));
    }

    #[test]
    fn logout_returns_to_guest_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut net = network(&dir, PersistenceMode::Eager);
        let script = format!("{REGISTER_ALL}2\nbob@x.org\npw\n12\n3\n");
        let out = run(&mut net, &script);

        assert!(out.contains("Goodbye, Bob."));
        assert!(net.current_identity().is_none());
        assert!(out.trim_end().ends_with("Goodbye!"));
    }
}
