use sha2::{Digest, Sha256};

/// Expected HTTP Basic credentials for inbound callers.
#[derive(Clone)]
pub struct BasicCredentials {
    username_digest: [u8; 32],
    password_digest: [u8; 32],
}

impl BasicCredentials {
    /// Creates the expected credential pair.
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username_digest: digest(username),
            password_digest: digest(password),
        }
    }

    /// Returns whether the presented pair matches.
    ///
    /// Both fields are always compared, and each comparison runs over
    /// fixed-length digests without early exit.
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_matches = constant_time_eq(&self.username_digest, &digest(username));
        let password_matches = constant_time_eq(&self.password_digest, &digest(password));
        username_matches & password_matches
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("BasicCredentials")
            .finish_non_exhaustive()
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.finalize().into()
}

fn constant_time_eq(left: &[u8; 32], right: &[u8; 32]) -> bool {
    left.iter()
        .zip(right.iter())
        .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
        == 0
}
