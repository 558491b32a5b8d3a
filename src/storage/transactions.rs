//! Transaction store
//!
//! Holds the active user's transactions ("mine") and everyone else's
//! ("others") in two record lists. Both partitions come from one
//! comma-delimited file and are written back to it together, mine first.
//!
//! Line layout (no header, no quoting):
//!
//! ```text
//! username,type,date,category,description,amount    multi-user
//! type,date,category,description,amount             single-user
//! ```
//!
//! `type` and `category` are enum ordinals. A description containing a comma
//! is written as-is and will not read back as the same record.

use std::io::{Read, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::file_io::{open_for_read, write_atomic, write_direct};
use crate::collections::RecordList;
use crate::error::TallyResult;
use crate::models::{Category, Transaction, TransactionType};

/// Field layout of a transaction line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordLayout {
    /// `username,type,date,category,description,amount`
    #[default]
    MultiUser,
    /// `type,date,category,description,amount`; every line belongs to the active user
    SingleUser,
}

impl RecordLayout {
    /// Number of fields a line must yield
    pub fn field_count(self) -> usize {
        match self {
            Self::MultiUser => 6,
            Self::SingleUser => 5,
        }
    }
}

/// Outcome of loading a transaction file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Records routed to the active user's partition
    pub mine: usize,
    /// Records belonging to other users
    pub others: usize,
    /// Lines dropped because they did not parse
    pub skipped: usize,
}

/// In-memory transactions partitioned by owner
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    active_user: String,
    layout: RecordLayout,
    mine: RecordList<Transaction>,
    others: RecordList<Transaction>,
}

impl TransactionStore {
    /// Create an empty multi-user store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store reading and writing the given layout
    pub fn with_layout(layout: RecordLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Set the partition key; call before `load`
    pub fn set_active_user(&mut self, username: impl Into<String>) {
        self.active_user = username.into();
    }

    pub fn active_user(&self) -> &str {
        &self.active_user
    }

    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// The active user's transactions
    pub fn mine(&self) -> &RecordList<Transaction> {
        &self.mine
    }

    /// Transactions owned by other users, kept only to be written back
    pub fn others(&self) -> &RecordList<Transaction> {
        &self.others
    }

    /// Number of transactions in the active user's partition
    pub fn len(&self) -> usize {
        self.mine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mine.is_empty()
    }

    /// Replace both partitions with the records read from `source`
    ///
    /// Lines that lack a field, or whose type, category or amount do not
    /// parse, are skipped and counted in the summary; they never fail the
    /// load. Only an I/O failure of `source` is an error.
    pub fn load<R: Read>(&mut self, source: R) -> TallyResult<LoadSummary> {
        self.mine.clear();
        self.others.clear();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(source);

        let mut summary = LoadSummary::default();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    debug!("Skipping unreadable transaction line: {}", e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let Some(txn) = self.parse_record(&record) else {
                debug!(
                    line = record.position().map(|p| p.line()),
                    "Skipping malformed transaction line"
                );
                summary.skipped += 1;
                continue;
            };

            if txn.username == self.active_user {
                self.mine.push_back(txn);
                summary.mine += 1;
            } else {
                self.others.push_back(txn);
                summary.others += 1;
            }
        }

        Ok(summary)
    }

    /// Load from a file; a file that cannot be opened is an I/O error
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> TallyResult<LoadSummary> {
        let path = path.as_ref();
        let reader = open_for_read(path)?;
        let summary = self.load(reader)?;
        info!(
            mine = summary.mine,
            others = summary.others,
            skipped = summary.skipped,
            "Loaded transactions from {}",
            path.display()
        );
        Ok(summary)
    }

    /// Write every record, the active user's first, one line each
    pub fn save<W: Write>(&self, sink: W) -> TallyResult<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(sink);

        for txn in self.mine.iter().chain(self.others.iter()) {
            writer.write_record(self.format_record(txn))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Rewrite the whole file, via temp-file-and-rename when `atomic`
    pub fn save_file<P: AsRef<Path>>(&self, path: P, atomic: bool) -> TallyResult<()> {
        let path = path.as_ref();
        let write = |w: &mut std::io::BufWriter<std::fs::File>| self.save(w);
        if atomic {
            write_atomic(path, write)?;
        } else {
            write_direct(path, write)?;
        }
        info!(
            count = self.mine.len() + self.others.len(),
            "Saved transactions to {}",
            path.display()
        );
        Ok(())
    }

    /// Append a transaction owned by the active user
    pub fn add(&mut self, mut txn: Transaction) {
        txn.username.clone_from(&self.active_user);
        self.mine.push_back(txn);
    }

    /// Get the transaction at `index`
    pub fn get(&self, index: usize) -> TallyResult<&Transaction> {
        self.mine.get(index)
    }

    /// Replace the transaction at `index`, returning the old one
    pub fn modify(&mut self, index: usize, mut txn: Transaction) -> TallyResult<Transaction> {
        txn.username.clone_from(&self.active_user);
        self.mine.set(index, txn)
    }

    /// Remove the transaction at `index`
    pub fn delete(&mut self, index: usize) -> TallyResult<Transaction> {
        self.mine.remove(index)
    }

    /// Transactions whose date text or category name contains `keyword`,
    /// ignoring case, paired with their 1-based position among the matches
    pub fn search<'a>(
        &'a self,
        keyword: &str,
    ) -> impl Iterator<Item = (usize, &'a Transaction)> + 'a {
        let needle = keyword.to_lowercase();
        self.mine
            .iter()
            .filter(move |txn| txn.matches_keyword(&needle))
            .enumerate()
            .map(|(i, txn)| (i + 1, txn))
    }

    /// Every transaction of the active user with its 1-based position
    pub fn list(&self) -> impl Iterator<Item = (usize, &Transaction)> + '_ {
        self.mine.iter().enumerate().map(|(i, txn)| (i + 1, txn))
    }

    /// Selection sort of the active user's transactions, most recent first
    ///
    /// Each pass picks the first record holding the maximum date key in the
    /// unsorted tail and relinks it in front of that tail, so records with
    /// equal dates keep their relative order. All keys are derived before any
    /// record moves: a malformed date fails the call and leaves the order
    /// unchanged.
    pub fn sort_by_date_descending(&mut self) -> TallyResult<()> {
        let mut keys = self
            .mine
            .iter()
            .map(Transaction::date_key)
            .collect::<TallyResult<Vec<_>>>()?;

        for i in 0..keys.len() {
            let mut max = i;
            for j in i..keys.len() {
                if keys[j] > keys[max] {
                    max = j;
                }
            }
            if max != i {
                let record = self.mine.remove(max)?;
                self.mine.insert(i, record)?;
                keys[i..=max].rotate_right(1);
            }
        }

        Ok(())
    }

    fn parse_record(&self, record: &StringRecord) -> Option<Transaction> {
        if record.len() < self.layout.field_count() {
            return None;
        }

        let (username, rest) = match self.layout {
            RecordLayout::MultiUser => (record.get(0)?.to_string(), 1),
            RecordLayout::SingleUser => (self.active_user.clone(), 0),
        };

        let transaction_type = record
            .get(rest)?
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(TransactionType::from_ordinal)?;
        let date = record.get(rest + 1)?.to_string();
        let category = record
            .get(rest + 2)?
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Category::from_ordinal)?;
        let description = record.get(rest + 3)?.to_string();
        let amount = record.get(rest + 4)?.trim().parse::<f64>().ok()?;

        Some(Transaction {
            username,
            transaction_type,
            date,
            category,
            description,
            amount,
        })
    }

    fn format_record(&self, txn: &Transaction) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.layout.field_count());
        if self.layout == RecordLayout::MultiUser {
            fields.push(txn.username.clone());
        }
        fields.push(txn.transaction_type.ordinal().to_string());
        fields.push(txn.date.clone());
        fields.push(txn.category.ordinal().to_string());
        fields.push(txn.description.clone());
        fields.push(txn.amount.to_string());
        fields
    }
}
