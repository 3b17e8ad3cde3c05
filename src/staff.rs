//! Staff directory and authentication.
//!
//! Staff accounts live wholesale in the `staffUsers` slot. Passwords are
//! stored only as bcrypt hashes; authentication failures are reported with
//! one generic message so a caller cannot probe which usernames exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::activity::{self, tags, ActivitySource};
use crate::db::DbState;
use crate::error::ValidationErrors;
use crate::store;

const GENERIC_AUTH_FAILURE: &str = "Invalid username or password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageTables,
    ManagePool,
    ViewAnalytics,
    ViewActivityLog,
    ManageStaff,
    ManageBackups,
}

/// Whether `role` may perform `permission`. Admin may do everything;
/// staff handle day-to-day floor operations only.
pub fn has_permission(role: Role, permission: Permission) -> bool {
    match role {
        Role::Admin => true,
        Role::Staff => matches!(
            permission,
            Permission::ManageTables | Permission::ManagePool | Permission::ViewAnalytics
        ),
    }
}

/// A stored staff account, hash included. Never returned to callers;
/// use [`StaffProfile`] for anything that leaves this module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub avatar: String,
}

/// A staff account with the credential stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub avatar: String,
}

impl From<&StaffUser> for StaffProfile {
    fn from(user: &StaffUser) -> Self {
        StaffProfile {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            is_active: user.is_active,
            avatar: user.avatar.clone(),
        }
    }
}

/// The signed-in user, persisted under `currentUser` so a restart resumes
/// the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(flatten)]
    pub profile: StaffProfile,
    pub login_time: DateTime<Utc>,
}

fn hash_password(password: &str) -> Result<String, String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| format!("hash password: {e}"))
}

fn seed_user(id: i64, username: &str, password: &str, name: &str, role: Role, avatar: &str)
    -> Result<StaffUser, String>
{
    Ok(StaffUser {
        id,
        username: username.to_string(),
        password_hash: hash_password(password)?,
        name: name.to_string(),
        role,
        is_active: true,
        avatar: avatar.to_string(),
    })
}

fn default_users() -> Result<Vec<StaffUser>, String> {
    Ok(vec![
        seed_user(1, "anna", "staff123", "Anna Santos", Role::Staff, "👩‍💼")?,
        seed_user(2, "jake", "staff123", "Jake Ramirez", Role::Staff, "👨‍💼")?,
        seed_user(3, "kim", "staff123", "Kim Dela Cruz", Role::Staff, "👩‍💼")?,
        seed_user(4, "admin", "admin123", "Manager", Role::Admin, "👨‍💻")?,
    ])
}

/// Load the directory, seeding the default accounts on first run.
pub fn load_staff_users(db: &DbState) -> Result<Vec<StaffUser>, String> {
    if let Some(users) = store::read_slot_opt::<Vec<StaffUser>>(db, store::STAFF_USERS_KEY)? {
        return Ok(users);
    }
    info!("seeding default staff accounts");
    let users = default_users()?;
    save_staff_users(db, &users)?;
    Ok(users)
}

fn save_staff_users(db: &DbState, users: &[StaffUser]) -> Result<(), String> {
    store::write_slot(db, store::STAFF_USERS_KEY, &users)
}

/// The directory with credentials stripped, for listing screens.
pub fn list_profiles(db: &DbState) -> Result<Vec<StaffProfile>, String> {
    Ok(load_staff_users(db)?.iter().map(StaffProfile::from).collect())
}

pub fn get_by_id(db: &DbState, id: i64) -> Result<Option<StaffProfile>, String> {
    Ok(load_staff_users(db)?
        .iter()
        .find(|u| u.id == id)
        .map(StaffProfile::from))
}

pub fn get_by_name(db: &DbState, name: &str) -> Result<Option<StaffProfile>, String> {
    Ok(load_staff_users(db)?
        .iter()
        .find(|u| u.name == name)
        .map(StaffProfile::from))
}

/// Verify credentials against the directory. Only active accounts can sign
/// in. Unknown username, wrong password, and deactivated account all fail
/// with the same message.
pub fn authenticate(db: &DbState, username: &str, password: &str) -> Result<StaffProfile, String> {
    let users = load_staff_users(db)?;
    let user = users
        .iter()
        .find(|u| u.username == username && u.is_active)
        .ok_or_else(|| {
            warn!(username, "sign-in attempt for unknown or inactive account");
            GENERIC_AUTH_FAILURE.to_string()
        })?;
    let valid = bcrypt::verify(password, &user.password_hash)
        .map_err(|e| format!("verify password: {e}"))?;
    if !valid {
        warn!(username, "sign-in attempt with wrong password");
        return Err(GENERIC_AUTH_FAILURE.to_string());
    }
    Ok(StaffProfile::from(user))
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("{0}")]
    Storage(String),
}

fn validate_registration(input: &RegisterInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let username = input.username.trim();
    if username.len() < 3 {
        errors.add("username", "Username must be at least 3 characters");
    } else if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        errors.add(
            "username",
            "Username may only contain letters, numbers and underscores",
        );
    }
    if input.password.len() < 6 {
        errors.add("password", "Password must be at least 6 characters");
    }
    if input.password != input.confirm_password {
        errors.add("confirmPassword", "Passwords do not match");
    }
    if input.name.trim().len() < 2 {
        errors.add("name", "Name must be at least 2 characters");
    }
    errors.into_result()
}

/// Create a new staff account. Usernames must be unique across the whole
/// directory, active or not. Ids are assigned as `max + 1`.
pub fn register(db: &DbState, input: &RegisterInput) -> Result<StaffProfile, RegisterError> {
    validate_registration(input)?;

    let mut users = load_staff_users(db).map_err(RegisterError::Storage)?;
    let username = input.username.trim();
    if users.iter().any(|u| u.username == username) {
        return Err(RegisterError::DuplicateUsername);
    }
    let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
    let user = StaffUser {
        id,
        username: username.to_string(),
        password_hash: hash_password(&input.password).map_err(RegisterError::Storage)?,
        name: input.name.trim().to_string(),
        role: input.role,
        is_active: true,
        avatar: "👤".to_string(),
    };
    let profile = StaffProfile::from(&user);
    users.push(user);
    save_staff_users(db, &users).map_err(RegisterError::Storage)?;
    info!(username, id, "staff account registered");
    Ok(profile)
}

/// Admin edit of one account's display name, role, or active flag.
pub fn update_staff(
    db: &DbState,
    id: i64,
    name: Option<&str>,
    role: Option<Role>,
    is_active: Option<bool>,
) -> Result<StaffProfile, String> {
    let mut users = load_staff_users(db)?;
    let user = users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| format!("Staff member not found: {id}"))?;
    if let Some(name) = name {
        user.name = name.trim().to_string();
    }
    if let Some(role) = role {
        user.role = role;
    }
    if let Some(is_active) = is_active {
        user.is_active = is_active;
    }
    let profile = StaffProfile::from(&*user);
    save_staff_users(db, &users)?;
    Ok(profile)
}

/// Remove an account from the directory.
pub fn delete_staff(db: &DbState, id: i64) -> Result<(), String> {
    let mut users = load_staff_users(db)?;
    let before = users.len();
    users.retain(|u| u.id != id);
    if users.len() == before {
        return Err(format!("Staff member not found: {id}"));
    }
    save_staff_users(db, &users)
}

// ---------------------------------------------------------------------------
// Sign-in session slot
// ---------------------------------------------------------------------------

/// Authenticate and persist the signed-in user under `currentUser`.
pub fn login(
    db: &DbState,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<CurrentUser, String> {
    let profile = authenticate(db, username, password)?;
    let current = CurrentUser {
        profile,
        login_time: now,
    };
    store::write_slot(db, store::CURRENT_USER_KEY, &current)?;
    activity::log_activity(
        db,
        ActivitySource::Staff,
        tags::LOGIN,
        Some((current.profile.id, &current.profile.name)),
        Value::Null,
        now,
    )?;
    info!(username, "staff signed in");
    Ok(current)
}

/// Clear the signed-in user. A no-op when nobody is signed in.
pub fn logout(db: &DbState, now: DateTime<Utc>) -> Result<(), String> {
    if let Some(current) = current_user(db)? {
        activity::log_activity(
            db,
            ActivitySource::Staff,
            tags::LOGOUT,
            Some((current.profile.id, &current.profile.name)),
            json!({ "loginTime": current.login_time }),
            now,
        )?;
        info!(username = %current.profile.username, "staff signed out");
    }
    store::remove_slot(db, store::CURRENT_USER_KEY)
}

pub fn current_user(db: &DbState) -> Result<Option<CurrentUser>, String> {
    store::read_slot_opt(db, store::CURRENT_USER_KEY)
}
