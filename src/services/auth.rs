use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::repositories::user as user_repo;
use crate::state::AppState;
use crate::validation::auth::{LoginRequest, RegisterRequest};

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 1;

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the hashed password in PHC string format.
pub fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    Ok(password_hash)
}

/// Verifies a password against a stored hash.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The PHC hash string to verify against.
///
/// # Returns
///
/// A `Result` containing `true` if the password is valid, `false` otherwise.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    Ok(result)
}

/// Hashes a password on the blocking pool so Argon2 never stalls the
/// async runtime.
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

/// Registers a new user.
///
/// Enforces email uniqueness before touching the password hasher; the
/// stored credential is only ever the salted hash.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `req` - The validated registration payload.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn register_user(state: &AppState, req: RegisterRequest) -> Result<User> {
    tracing::debug!("🔐 Registering user: {}", req.email);

    if user_repo::email_taken(&state.db, &req.email, None).await? {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password_blocking(req.password).await?;

    let user = user_repo::create_user(
        &state.db,
        Uuid::new_v4(),
        &req.name,
        &req.email,
        &password_hash,
    )
    .await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user by email and password.
///
/// Returns the same error for an unknown email and a wrong password so the
/// response never reveals whether an account exists.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `req` - The validated login payload.
///
/// # Returns
///
/// A `Result` containing the authenticated `User`.
pub async fn authenticate_user(state: &AppState, req: LoginRequest) -> Result<User> {
    tracing::debug!("🔐 Authenticating user: {}", req.email);

    let user = user_repo::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

    let password = req.password;
    let stored_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

    if !valid {
        return Err(AppError::Authentication(
            "Invalid email or password".to_string(),
        ));
    }

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok(user)
}
