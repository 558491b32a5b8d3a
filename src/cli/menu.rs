//! Interactive session menus
//!
//! The top menu signs users in and up. A signed-in user gets a ledger menu
//! whose actions depend on their role. The user file is loaded when the
//! session starts and saved when it ends; the transaction file is loaded on
//! sign in and saved on sign out.

use std::io::{BufRead, Write};

use tracing::{error, warn};

use super::prompt::{parse_choice, Console};
use crate::display::format_register;
use crate::error::{TallyError, TallyResult};
use crate::models::Role;
use crate::services::{AuthService, LedgerService};
use crate::storage::Storage;

/// Ledger menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Modify,
    Delete,
    Search,
    Sort,
    Display,
}

impl Action {
    /// Menu entries offered to a role, in menu order
    pub fn for_role(role: Role) -> &'static [Action] {
        match role {
            Role::Standard => &[
                Action::Add,
                Action::Modify,
                Action::Delete,
                Action::Sort,
                Action::Display,
            ],
            Role::Admin => &[
                Action::Add,
                Action::Modify,
                Action::Delete,
                Action::Search,
                Action::Sort,
                Action::Display,
            ],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Add => "add transaction",
            Action::Modify => "modify transaction",
            Action::Delete => "delete transaction",
            Action::Search => "search transactions",
            Action::Sort => "sort transactions",
            Action::Display => "display transactions",
        }
    }
}

/// One interactive session over a storage and a console
pub struct Menu<'s, R, W> {
    storage: &'s mut Storage,
    console: Console<R, W>,
}

impl<'s, R: BufRead, W: Write> Menu<'s, R, W> {
    pub fn new(storage: &'s mut Storage, console: Console<R, W>) -> Self {
        Self { storage, console }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Run the top menu until the user exits or input ends
    pub fn run(&mut self) -> TallyResult<()> {
        if let Err(e) = self.storage.load_users() {
            self.report("Failed to load users", &e)?;
        }

        loop {
            self.console.say("")?;
            self.console.say("1. Sign in")?;
            self.console.say("2. Sign up")?;
            self.console.say("0. Exit")?;

            let Some(option) = self.console.read_line("")? else {
                break;
            };
            match option.trim() {
                "1" => self.sign_in()?,
                "2" => self.sign_up()?,
                "0" => break,
                _ => {}
            }
        }

        if let Err(e) = self.storage.save_users() {
            self.report("Failed to save users", &e)?;
        }
        Ok(())
    }

    fn sign_in(&mut self) -> TallyResult<()> {
        let Some(username) = self.console.read_line("Enter username: ")? else {
            return Ok(());
        };
        let Some(password) = self.console.read_password("Enter password: ")? else {
            return Ok(());
        };

        let role = match AuthService::new(self.storage).sign_in(username.trim(), &password) {
            Ok(role) => role,
            Err(TallyError::AuthenticationFailed) => {
                return self.console.say("Sign in failed.");
            }
            Err(e) => return Err(e),
        };

        // Saving after a failed load would drop other users' records
        match self.storage.load_transactions() {
            Ok(summary) if summary.skipped > 0 => {
                warn!(skipped = summary.skipped, "Ignored malformed transaction lines");
            }
            Ok(_) => {}
            Err(e) => return self.report("Failed to load transactions", &e),
        }

        self.run_ledger(role)?;

        if let Err(e) = self.storage.save_transactions() {
            self.report("Failed to save transactions", &e)?;
        }
        Ok(())
    }

    fn sign_up(&mut self) -> TallyResult<()> {
        let Some(username) = self.console.read_line("Enter username: ")? else {
            return Ok(());
        };
        let Some(password) = self.console.read_password("Enter password: ")? else {
            return Ok(());
        };
        let Some(admin) = self.console.read_line("Admin?(y/n): ")? else {
            return Ok(());
        };
        let admin = admin.trim().eq_ignore_ascii_case("y");

        match AuthService::new(self.storage).sign_up(username.trim(), &password, admin) {
            Ok(()) => Ok(()),
            Err(TallyError::Duplicate { .. }) => self.console.say("The username already exists."),
            Err(TallyError::Validation(message)) => self.console.say(message),
            Err(e) => Err(e),
        }
    }

    fn run_ledger(&mut self, role: Role) -> TallyResult<()> {
        let actions = Action::for_role(role);

        loop {
            self.console.say("")?;
            for (i, action) in actions.iter().enumerate() {
                self.console.say(format!("{}. {}", i + 1, action.label()))?;
            }
            self.console.say("0. exit")?;

            let Some(option) = self.console.read_line("")? else {
                return Ok(());
            };
            if option.trim() == "0" {
                return Ok(());
            }
            let Some(choice) = parse_choice(&option, actions.len()) else {
                continue;
            };

            match actions[choice - 1] {
                Action::Add => self.add()?,
                Action::Modify => self.modify()?,
                Action::Delete => self.delete()?,
                Action::Search => self.search()?,
                Action::Sort => self.sort()?,
                Action::Display => self.display()?,
            }
        }
    }

    fn add(&mut self) -> TallyResult<()> {
        let Some(txn) = self.console.read_transaction()? else {
            return Ok(());
        };
        LedgerService::new(self.storage).add(txn)
    }

    fn modify(&mut self) -> TallyResult<()> {
        let Some(index) = self.select_transaction()? else {
            return Ok(());
        };
        let Some(txn) = self.console.read_transaction()? else {
            return Ok(());
        };
        match LedgerService::new(self.storage).modify(index, txn) {
            Ok(_) => Ok(()),
            Err(e) if e.is_index() => self.console.say(e),
            Err(e) => Err(e),
        }
    }

    fn delete(&mut self) -> TallyResult<()> {
        let Some(index) = self.select_transaction()? else {
            return Ok(());
        };
        match LedgerService::new(self.storage).delete(index) {
            Ok(_) => Ok(()),
            Err(e) if e.is_index() => self.console.say(e),
            Err(e) => Err(e),
        }
    }

    fn search(&mut self) -> TallyResult<()> {
        let Some(keyword) = self.console.read_line("Enter keyword: ")? else {
            return Ok(());
        };
        let register = format_register(LedgerService::new(self.storage).search(&keyword));
        self.console.write(&register)
    }

    fn sort(&mut self) -> TallyResult<()> {
        let sorted = LedgerService::new(self.storage).sort_by_date_descending();
        if let Err(e) = sorted {
            return self.report("Cannot sort transactions", &e);
        }
        self.display()
    }

    fn display(&mut self) -> TallyResult<()> {
        let register = format_register(LedgerService::new(self.storage).list());
        self.console.write(&register)
    }

    /// Show the register and read a 1-based selection; returns the 0-based index
    fn select_transaction(&mut self) -> TallyResult<Option<usize>> {
        let count = self.storage.transactions.len();
        if count == 0 {
            self.console.say("No transactions now.")?;
            return Ok(None);
        }

        self.display()?;
        Ok(self
            .console
            .read_choice("Your selection: ", count)?
            .map(|choice| choice - 1))
    }

    fn report(&mut self, context: &str, err: &TallyError) -> TallyResult<()> {
        error!("{}: {}", context, err);
        self.console.say(format!("{}: {}", context, err))
    }
}
