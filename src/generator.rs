//! Short token generation for the URL shortener
//!
//! Generators are pure: they never look at storage. Uniqueness is enforced by
//! [`crate::links::LinkStore`], which regenerates on collision.

use rand::{distr::Alphanumeric, Rng};

/// Default number of characters in a generated token
pub const DEFAULT_TOKEN_LENGTH: usize = 7;

/// Produces short URL-safe tokens
pub trait TokenGenerator: Send + Sync + 'static {
    fn generate(&self) -> String;
}

/// Random tokens drawn from `[A-Za-z0-9]`
///
/// With 62 symbols per position a 7-character token has roughly 3.5e12
/// possible values.
#[derive(Debug, Clone)]
pub struct RandomTokenGenerator {
    length: usize,
}

impl RandomTokenGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl Default for RandomTokenGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LENGTH)
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}
