//! Access scope management.
//!
//! Searchable roots are granted by the user through a [`DirectoryPicker`],
//! persisted as opaque tokens in a [`BlobStore`], and turned into live,
//! scoped access by a [`CapabilityProvider`] for the duration of a search.

mod capability;
mod error;
mod manager;
mod picker;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use capability::{CapabilityProvider, PathCapability, ResolvedToken, ScopeToken};
pub use error::ScopeError;
pub use manager::{AccessScopeManager, GRANTS_KEY};
pub use picker::{ArgsPicker, DirectoryPicker, NoPicker, PickerPrompt, StdinPicker};
pub use store::BlobStore;

#[cfg(test)]
pub(crate) use picker::MockDirectoryPicker;
