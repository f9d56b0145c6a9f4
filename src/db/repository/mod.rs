//! Repository trait definitions and error types.
//!
//! The traits here are the narrow query interface between the resource API
//! and the storage backend. Handlers never see SQL or driver types; they see
//! rows, row counts, and [`RepositoryError`].

pub mod error;
pub mod films;
pub mod reviews;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use films::FilmRepository;
pub use reviews::ReviewRepository;

/// Combined repository covering both resource types.
///
/// Blanket-implemented for anything that implements both traits, so a
/// backend only has to implement [`FilmRepository`] and
/// [`ReviewRepository`].
pub trait FullRepository: FilmRepository + ReviewRepository {}

impl<T: FilmRepository + ReviewRepository> FullRepository for T {}
