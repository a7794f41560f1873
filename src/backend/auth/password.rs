//! Password hashing (bcrypt)

use bcrypt::BcryptError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Spend the same bcrypt work as a real check when there is no stored hash
///
/// Unknown usernames take as long to reject as wrong passwords.
pub fn verify_without_account(password: &str, cost: u32) -> Result<bool, BcryptError> {
    hash_password(password, cost).map(|_| false)
}

/// Constant-time check of `password` against a stored bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, hash)
}
