//! User credential store
//!
//! Users are persisted as a binary stream of records, each laid out as
//!
//! ```text
//! u64 LE  username length
//! bytes   username (UTF-8)
//! u64 LE  digest length
//! bytes   password digest (UTF-8 hex)
//! u8      admin flag (0 or 1)
//! ```
//!
//! The stream ends at a clean end-of-file between records.

use std::io::{self, Read, Write};
use std::path::Path;

use tracing::info;

use super::file_io::{open_for_read, write_atomic, write_direct};
use crate::collections::RecordList;
use crate::crypto::hash_password;
use crate::error::{TallyError, TallyResult};
use crate::models::{Role, User};

/// Upper bound on a stored text field
const MAX_FIELD_LEN: u64 = 64 * 1024;

/// Registered users in sign-up order
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: RecordList<User>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a username is registered
    pub fn exists(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.username() == username)
    }

    /// Check a username and password pair
    ///
    /// Returns `None` both for an unknown username and for a wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        let digest = hash_password(password);
        self.users
            .iter()
            .find(|u| u.username() == username && u.password_digest() == digest)
            .map(User::role)
    }

    /// Append a user; callers check `exists` first
    pub fn add(&mut self, user: User) {
        self.users.push_back(user);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    /// Replace the store contents with the records read from `source`
    pub fn load<R: Read>(&mut self, mut source: R) -> TallyResult<usize> {
        let mut users = RecordList::new();
        while let Some(user) = read_user(&mut source)? {
            users.push_back(user);
        }
        self.users = users;
        Ok(self.users.len())
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> TallyResult<usize> {
        let path = path.as_ref();
        let count = self.load(open_for_read(path)?)?;
        info!(count, "Loaded users from {}", path.display());
        Ok(count)
    }

    /// Write every user in order
    pub fn save<W: Write>(&self, mut sink: W) -> TallyResult<()> {
        for user in self.users.iter() {
            write_field(&mut sink, user.username())?;
            write_field(&mut sink, user.password_digest())?;
            sink.write_all(&[u8::from(user.is_admin())])?;
        }
        sink.flush()?;
        Ok(())
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P, atomic: bool) -> TallyResult<()> {
        let path = path.as_ref();
        let write = |w: &mut std::io::BufWriter<std::fs::File>| self.save(w);
        if atomic {
            write_atomic(path, write)?;
        } else {
            write_direct(path, write)?;
        }
        info!(count = self.users.len(), "Saved users to {}", path.display());
        Ok(())
    }
}

fn write_field<W: Write>(sink: &mut W, text: &str) -> TallyResult<()> {
    sink.write_all(&(text.len() as u64).to_le_bytes())?;
    sink.write_all(text.as_bytes())?;
    Ok(())
}

/// Read one record, or `None` at a clean end of stream
fn read_user<R: Read>(source: &mut R) -> TallyResult<Option<User>> {
    let mut len_buf = [0u8; 8];
    if !fill_or_eof(source, &mut len_buf)? {
        return Ok(None);
    }
    let username = read_text(source, u64::from_le_bytes(len_buf), "username")?;

    read_exact(source, &mut len_buf, "digest length")?;
    let digest = read_text(source, u64::from_le_bytes(len_buf), "digest")?;

    let mut flag = [0u8; 1];
    read_exact(source, &mut flag, "admin flag")?;
    let admin = match flag[0] {
        0 => false,
        1 => true,
        other => {
            return Err(TallyError::Storage(format!(
                "Invalid admin flag {} for user '{}'",
                other, username
            )))
        }
    };

    Ok(Some(User::from_digest(username, digest, admin)))
}

/// Fill `buf` completely, or report a clean EOF before the first byte
fn fill_or_eof<R: Read>(source: &mut R, buf: &mut [u8]) -> TallyResult<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(TallyError::Storage(
                    "Truncated user record: incomplete username length".into(),
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

fn read_exact<R: Read>(source: &mut R, buf: &mut [u8], what: &str) -> TallyResult<()> {
    source.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            TallyError::Storage(format!("Truncated user record: incomplete {}", what))
        } else {
            e.into()
        }
    })
}

fn read_text<R: Read>(source: &mut R, len: u64, what: &str) -> TallyResult<String> {
    if len > MAX_FIELD_LEN {
        return Err(TallyError::Storage(format!(
            "Stored {} length {} exceeds {} bytes",
            what, len, MAX_FIELD_LEN
        )));
    }
    let mut bytes = vec![0u8; len as usize];
    read_exact(source, &mut bytes, what)?;
    String::from_utf8(bytes)
        .map_err(|_| TallyError::Storage(format!("Stored {} is not valid UTF-8", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_store() -> UserStore {
        let mut store = UserStore::new();
        store.add(User::new("alice", "secret", false));
        store.add(User::new("root", "toor", true));
        store
    }

    fn encoded(store: &UserStore) -> Vec<u8> {
        let mut out = Vec::new();
        store.save(&mut out).unwrap();
        out
    }

    #[test]
    fn test_exists() {
        let store = sample_store();
        assert!(store.exists("alice"));
        assert!(store.exists("root"));
        assert!(!store.exists("Alice"));
        assert!(!store.exists(""));
    }

    #[test]
    fn test_authenticate() {
        let store = sample_store();
        assert_eq!(store.authenticate("alice", "secret"), Some(Role::Standard));
        assert_eq!(store.authenticate("root", "toor"), Some(Role::Admin));
    }

    #[test]
    fn test_wrong_password_and_unknown_user_fail_alike() {
        let store = sample_store();
        let wrong_password = store.authenticate("alice", "nope");
        let unknown_user = store.authenticate("mallory", "secret");
        assert_eq!(wrong_password, None);
        assert_eq!(wrong_password, unknown_user);
    }

    #[test]
    fn test_authenticate_on_empty_store() {
        let store = UserStore::new();
        assert_eq!(store.authenticate("alice", "secret"), None);
    }

    #[test]
    fn test_record_layout() {
        let mut store = UserStore::new();
        store.add(User::from_digest("al", "ab12", true));

        let bytes = encoded(&store);
        let mut expected = Vec::new();
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(b"al");
        expected.extend_from_slice(&4u64.to_le_bytes());
        expected.extend_from_slice(b"ab12");
        expected.push(1);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = sample_store();
        let mut loaded = UserStore::new();
        let count = loaded.load(encoded(&store).as_slice()).unwrap();

        assert_eq!(count, 2);
        let users: Vec<_> = loaded.iter().cloned().collect();
        let original: Vec<_> = store.iter().cloned().collect();
        assert_eq!(users, original);
        assert_eq!(loaded.authenticate("root", "toor"), Some(Role::Admin));
    }

    #[test]
    fn test_load_empty_stream() {
        let mut store = sample_store();
        assert_eq!(store.load(&[][..]).unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_truncated_record_is_storage_error() {
        let bytes = encoded(&sample_store());
        for cut in [3, 8, 12, bytes.len() - 1] {
            let mut store = UserStore::new();
            let err = store.load(&bytes[..cut]).unwrap_err();
            assert!(matches!(err, TallyError::Storage(_)), "cut at {}", cut);
        }
    }

    #[test]
    fn test_failed_load_keeps_previous_users() {
        let mut store = sample_store();
        let bytes = encoded(&store);
        assert!(store.load(&bytes[..bytes.len() - 1]).is_err());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_oversized_length_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        let err = UserStore::new().load(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, TallyError::Storage(_)));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u64.to_le_bytes());
        bytes.extend_from_slice(&[0xff, 0xfe]);
        let err = UserStore::new().load(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, TallyError::Storage(_)));
    }

    #[test]
    fn test_invalid_admin_flag_is_rejected() {
        let mut store = UserStore::new();
        store.add(User::from_digest("a", "b", false));
        let mut bytes = encoded(&store);
        *bytes.last_mut().unwrap() = 7;

        let err = UserStore::new().load(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, TallyError::Storage(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("users.dat");

        sample_store().save_file(&path, true).unwrap();

        let mut loaded = UserStore::new();
        assert_eq!(loaded.load_file(&path).unwrap(), 2);
        assert!(loaded.exists("alice"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = UserStore::new()
            .load_file(temp_dir.path().join("users.dat"))
            .unwrap_err();
        assert!(err.is_io());
    }
}
