//! ID generation utilities.
//!
//! Identifiers are short random strings over `[A-Za-z0-9]`, drawn from the operating system's
//! CSPRNG. Uniqueness is not guaranteed here; the store-backed allocator checks and retries.

use std::fmt;
use std::sync::Arc;

use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};

/// Default identifier length.
pub const DEFAULT_ID_LENGTH: usize = 10;

/// A source of candidate identifiers.
pub trait IdSource: Send + Sync + fmt::Debug {
    /// Draw one candidate identifier.
    fn draw(&self) -> String;
}

/// Uniform random alphanumeric identifiers from the OS random source.
#[derive(Debug, Clone, Copy)]
pub struct RandomIdSource {
    length: usize,
}

impl RandomIdSource {
    /// Create a source producing identifiers of `length` characters.
    #[must_use]
    pub const fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomIdSource {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

impl IdSource for RandomIdSource {
    fn draw(&self) -> String {
        // Alphanumeric samples by rejection, so each of the 62 characters is equally likely.
        OsRng
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// ID generator for entities.
#[derive(Clone)]
pub struct IdGenerator {
    source: Arc<dyn IdSource>,
}

impl IdGenerator {
    /// Create a new ID generator producing 10-character identifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_length(DEFAULT_ID_LENGTH)
    }

    /// Create a generator producing identifiers of the given length.
    #[must_use]
    pub fn with_length(length: usize) -> Self {
        Self::from_source(Arc::new(RandomIdSource::new(length)))
    }

    /// Create a generator backed by a custom source.
    #[must_use]
    pub fn from_source(source: Arc<dyn IdSource>) -> Self {
        Self { source }
    }

    /// Generate a new candidate ID.
    #[must_use]
    pub fn generate(&self) -> String {
        self.source.draw()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("source", &self.source)
            .finish()
    }
}
