//! Account store: registration and login against a user table.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info, instrument, trace, warn};

use crate::entities::{NewUser, User};
use crate::error::{ModelError, Result};
use crate::table::CsvTable;

/// Header of the account store file.
pub const ACCOUNT_COLUMNS: [&str; 4] = ["username", "name", "dob", "password"];

/// Storage backend for registered users.
///
/// Implementations scan linearly; the expected number of users is small.
pub trait AccountRepository {
    /// Returns whether a user with `username` is already registered.
    fn exists(&self, username: &str) -> Result<bool>;

    /// Appends a new user, failing with `DuplicateUser` if the username is taken.
    fn register(&mut self, new_user: NewUser) -> Result<User>;

    /// Returns the first user whose username and password both match exactly.
    fn authenticate(&self, username: &str, password: &str) -> Result<User>;
}

fn ensure_username(new_user: &NewUser) -> Result<()> {
    if new_user.username.is_empty() {
        return Err(ModelError::InvalidInput("username must not be empty".to_string()));
    }
    Ok(())
}

/// Account store backed by a CSV file with header `username,name,dob,password`.
///
/// The file is opened and closed on every operation.
#[derive(Debug, Clone)]
pub struct CsvAccountStore {
    path: PathBuf,
}

impl CsvAccountStore {
    /// Uses an existing store file without touching it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the store file at `path`, creating it with only the header when missing.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Creating account store at {}", path.display());
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }

            let mut header = DataFrame::new(
                ACCOUNT_COLUMNS
                    .iter()
                    .map(|column| Column::new((*column).into(), Vec::<String>::new()))
                    .collect(),
            )?;
            let mut file = fs::File::create(path)?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut header)?;
        } else {
            debug!("Using existing account store at {}", path.display());
        }

        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_users(&self) -> Result<Vec<User>> {
        let table = CsvTable::read("users", &self.path)?;
        table.require_columns(&ACCOUNT_COLUMNS)?;

        let usernames = table.text_column("username")?;
        let names = table.text_column("name")?;
        let dates_of_birth = table.text_column("dob")?;
        let passwords = table.text_column("password")?;

        let users: Vec<User> = usernames
            .into_iter()
            .zip(names)
            .zip(dates_of_birth)
            .zip(passwords)
            .map(|(((username, name), date_of_birth), password)| User {
                username,
                name,
                date_of_birth,
                password,
            })
            .collect();

        trace!("Scanned {} users", users.len());
        Ok(users)
    }

    fn append(&self, user: &User) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ModelError::DataSourceNotFound(self.path.clone()),
                _ => ModelError::Io(e),
            })?;

        let mut row = df!(
            "username" => [user.username.as_str()],
            "name" => [user.name.as_str()],
            "dob" => [user.date_of_birth.as_str()],
            "password" => [user.password.as_str()]
        )?;
        CsvWriter::new(&mut file)
            .include_header(false)
            .finish(&mut row)?;
        Ok(())
    }
}

impl AccountRepository for CsvAccountStore {
    fn exists(&self, username: &str) -> Result<bool> {
        Ok(self
            .read_users()?
            .iter()
            .any(|user| user.username == username))
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    fn register(&mut self, new_user: NewUser) -> Result<User> {
        ensure_username(&new_user)?;
        if self.exists(&new_user.username)? {
            warn!("Registration rejected, username already exists");
            return Err(ModelError::DuplicateUser(new_user.username));
        }

        let user = User::from(new_user);
        self.append(&user)?;
        info!("Registered user");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        match self
            .read_users()?
            .into_iter()
            .find(|user| user.username == username && user.password == password)
        {
            Some(user) => {
                info!("User authenticated");
                Ok(user)
            }
            None => {
                warn!("Authentication failed");
                Err(ModelError::AuthenticationFailed)
            }
        }
    }
}

/// Account store kept in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    users: Vec<User>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }
}

impl AccountRepository for InMemoryAccountStore {
    fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.users.iter().any(|user| user.username == username))
    }

    fn register(&mut self, new_user: NewUser) -> Result<User> {
        ensure_username(&new_user)?;
        if self.exists(&new_user.username)? {
            return Err(ModelError::DuplicateUser(new_user.username));
        }
        let user = User::from(new_user);
        self.users.push(user.clone());
        Ok(user)
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        self.users
            .iter()
            .find(|user| user.username == username && user.password == password)
            .cloned()
            .ok_or(ModelError::AuthenticationFailed)
    }
}
