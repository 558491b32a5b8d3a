//! Line-oriented console prompts
//!
//! Every prompt returns `Ok(None)` once input is exhausted so callers can
//! unwind to the menu, where end of input means exit.

use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

use crate::crypto::SecureString;
use crate::error::{TallyError, TallyResult};
use crate::models::{is_valid_entry_date, Transaction, TransactionType};

/// Prompt reader/writer pair
pub struct Console<R, W> {
    input: R,
    output: W,
    hide_passwords: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console on the process stdin/stdout; passwords are hidden when stdin
    /// is a terminal
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let hide_passwords = stdin.is_terminal();
        Self {
            input: stdin.lock(),
            output: io::stdout(),
            hide_passwords,
        }
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Console over arbitrary streams; passwords are read as plain lines
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            hide_passwords: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write one line of output
    pub fn say(&mut self, text: impl std::fmt::Display) -> TallyResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Write text without a trailing newline
    pub fn write(&mut self, text: &str) -> TallyResult<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    /// Show `prompt` and read one line without its terminator
    pub fn read_line(&mut self, prompt: &str) -> TallyResult<Option<String>> {
        self.write(prompt)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| TallyError::Io(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Read a password, hidden when attached to a terminal
    pub fn read_password(&mut self, prompt: &str) -> TallyResult<Option<SecureString>> {
        if self.hide_passwords {
            self.output.flush()?;
            return match rpassword::prompt_password(prompt) {
                Ok(password) => Ok(Some(SecureString::new(password))),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
                Err(e) => Err(TallyError::Io(format!("Failed to read password: {}", e))),
            };
        }
        Ok(self.read_line(prompt)?.map(SecureString::new))
    }

    /// Re-prompt until the answer is a number in `1..=max`
    pub fn read_choice(&mut self, prompt: &str, max: usize) -> TallyResult<Option<usize>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            if let Some(choice) = parse_choice(&line, max) {
                return Ok(Some(choice));
            }
        }
    }

    /// Re-prompt until the date passes the entry rule
    pub fn read_date(&mut self) -> TallyResult<Option<String>> {
        loop {
            let Some(line) = self.read_line("Enter date(DD/MM/YYYY): ")? else {
                return Ok(None);
            };
            if is_valid_entry_date(&line) {
                return Ok(Some(line));
            }
        }
    }

    /// Re-prompt until the description fits in one transaction field
    pub fn read_description(&mut self) -> TallyResult<Option<String>> {
        loop {
            let Some(line) = self.read_line("Enter description: ")? else {
                return Ok(None);
            };
            if !line.contains(',') {
                return Ok(Some(line));
            }
            self.say("Description cannot contain commas.")?;
        }
    }

    pub fn read_amount(&mut self) -> TallyResult<Option<f64>> {
        loop {
            let Some(line) = self.read_line("Enter amount: ")? else {
                return Ok(None);
            };
            if let Some(amount) = validate_amount(&line) {
                return Ok(Some(amount));
            }
        }
    }

    /// Walk through type, date, category, description and amount
    ///
    /// The owner is left empty; the store stamps it on insert.
    pub fn read_transaction(&mut self) -> TallyResult<Option<Transaction>> {
        let Some(type_choice) = self.read_choice("Enter type(1-Income, 2-Expense): ", 2)? else {
            return Ok(None);
        };
        let transaction_type = if type_choice == 1 {
            TransactionType::Income
        } else {
            TransactionType::Expense
        };

        let Some(date) = self.read_date()? else {
            return Ok(None);
        };

        let categories = transaction_type.categories();
        let Some(category_choice) =
            self.read_choice(&category_prompt(transaction_type), categories.len())?
        else {
            return Ok(None);
        };
        let category = categories[category_choice - 1];

        let Some(description) = self.read_description()? else {
            return Ok(None);
        };
        let Some(amount) = self.read_amount()? else {
            return Ok(None);
        };

        Ok(Some(Transaction::new(
            "",
            transaction_type,
            date,
            category,
            description,
            amount,
        )))
    }
}

/// Parse a menu or list choice in `1..=max`
pub fn parse_choice(text: &str, max: usize) -> Option<usize> {
    text.trim()
        .parse::<usize>()
        .ok()
        .filter(|choice| (1..=max).contains(choice))
}

/// Parse an amount; the whole text must be a finite number
pub fn validate_amount(text: &str) -> Option<f64> {
    text.trim_start()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

fn category_prompt(transaction_type: TransactionType) -> String {
    let options = transaction_type
        .categories()
        .iter()
        .enumerate()
        .map(|(i, category)| format!("{}-{}", i + 1, category.name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Enter category({}): ", options)
}
