//! Password hashing via bcrypt.

use super::HashingError;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Lowest cost bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest cost bcrypt accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

/// bcrypt only reads this many bytes of input; longer passwords are refused.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Salted one-way password hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordHasher {
    /// Create a hasher with an explicit cost (bcrypt accepts 4..=31).
    pub fn new(cost: u32) -> Result<Self, HashingError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(HashingError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password. The salt and cost are embedded in the returned string.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        if plaintext.is_empty() {
            return Err(HashingError::EmptyPassword);
        }
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(HashingError::PasswordTooLong);
        }
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Verify a password against a bcrypt hash. A mismatch is `Ok(false)`.
    ///
    /// Passwords longer than `MAX_PASSWORD_BYTES` never match: `hash` refuses
    /// them, so no stored hash can have been produced from one.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, HashingError> {
        let matches =
            bcrypt::verify(plaintext, hashed).map_err(|_| HashingError::MalformedHash)?;
        Ok(matches && plaintext.len() <= MAX_PASSWORD_BYTES)
    }

    /// `hash` on tokio's blocking pool.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, HashingError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
    }

    /// `verify` on tokio's blocking pool.
    pub async fn verify_blocking(
        &self,
        plaintext: String,
        hashed: String,
    ) -> Result<bool, HashingError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hashed)).await?
    }
}
