//! Trait implemented by text-generation backends.

use crate::error::Result;
use crate::role::RoleId;

/// A text-generation backend for the pit-crew roles.
///
/// Each call is one stateless exchange: the backend receives a role and a
/// fully rendered prompt and returns plain text. No multi-turn memory is
/// retained across lap boundaries. Calls are issued one at a time from a
/// single thread, so implementations may block.
pub trait RoleGenerator {
    /// Generates commentary for `role` given the rendered `prompt`.
    ///
    /// # Errors
    /// Returns [`crate::Error::GeneratorFailure`] when the backend cannot
    /// produce a reply. Callers are expected to substitute fallback text
    /// rather than abort the surrounding discussion.
    fn generate(&self, role: RoleId, prompt: &str) -> Result<String>;
}

impl<T: RoleGenerator + ?Sized> RoleGenerator for Box<T> {
    fn generate(&self, role: RoleId, prompt: &str) -> Result<String> {
        (**self).generate(role, prompt)
    }
}

impl<T: RoleGenerator + ?Sized> RoleGenerator for &T {
    fn generate(&self, role: RoleId, prompt: &str) -> Result<String> {
        (**self).generate(role, prompt)
    }
}
