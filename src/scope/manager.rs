//! Grant set and scoped-access lifecycle.

use std::ffi::OsStr;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::capability::{CapabilityProvider, ScopeToken};
use super::error::ScopeError;
use super::picker::{DirectoryPicker, PickerPrompt};
use super::store::BlobStore;

/// Store key holding the ordered grant tokens.
pub const GRANTS_KEY: &str = "granted_roots";

/// Tracks which roots may be searched and which currently hold access.
///
/// Every root returned by a resolve or grant call holds scoped access until
/// [`release_all`](Self::release_all) runs or the manager is dropped.
pub struct AccessScopeManager {
    store: Box<dyn BlobStore>,
    capability: Box<dyn CapabilityProvider>,
    picker: Box<dyn DirectoryPicker>,
    live: Vec<PathBuf>,
}

impl AccessScopeManager {
    pub fn new(
        store: Box<dyn BlobStore>,
        capability: Box<dyn CapabilityProvider>,
        picker: Box<dyn DirectoryPicker>,
    ) -> Self {
        Self {
            store,
            capability,
            picker,
            live: Vec::new(),
        }
    }

    /// Roots currently holding scoped access.
    #[cfg(test)]
    pub(crate) fn live_roots(&self) -> &[PathBuf] {
        &self.live
    }

    /// Resolve every persisted token and start access on each root.
    ///
    /// Stale tokens are re-encoded and written back. Tokens that no longer
    /// resolve, or whose root cannot be opened, are skipped.
    pub fn resolve_granted_roots(&mut self) -> Vec<PathBuf> {
        self.release_all();

        let mut tokens = self.load_tokens();
        let mut refreshed = false;
        let mut live = Vec::with_capacity(tokens.len());

        for token in tokens.iter_mut() {
            let Some(resolved) = self.capability.resolve(token) else {
                debug!("skipping unresolvable grant token");
                continue;
            };

            if resolved.stale {
                match self.capability.encode(&resolved.root) {
                    Ok(fresh) => {
                        info!(root = %resolved.root.display(), "refreshed stale grant token");
                        *token = fresh;
                        refreshed = true;
                    }
                    Err(e) => {
                        warn!(root = %resolved.root.display(), error = %e, "could not refresh stale grant token");
                    }
                }
            }

            if self.capability.start_access(&resolved.root) {
                live.push(resolved.root);
            } else {
                warn!(root = %resolved.root.display(), "could not start scoped access");
            }
        }

        if refreshed {
            if let Err(e) = self.save_tokens(&tokens) {
                warn!(error = %e, "failed to persist refreshed grant tokens");
            }
        }

        self.live = live.clone();
        live
    }

    /// Replace the whole grant set with the user's selection.
    pub fn request_new_grant(&mut self, prompt: &PickerPrompt) -> Result<Vec<PathBuf>, ScopeError> {
        let dirs = self.pick(prompt)?;
        let tokens = dirs
            .iter()
            .map(|dir| self.capability.encode(dir))
            .collect::<Result<Vec<_>, _>>()?;

        self.save_tokens(&tokens)?;
        info!(count = tokens.len(), "replaced grant set");

        Ok(self.restart_access(&tokens))
    }

    /// Append the user's selection to the grant set, skipping tokens already
    /// present.
    pub fn add_to_grant(&mut self, prompt: &PickerPrompt) -> Result<Vec<PathBuf>, ScopeError> {
        let dirs = self.pick(prompt)?;
        let mut tokens = self.load_tokens();
        let before = tokens.len();

        for dir in &dirs {
            let token = self.capability.encode(dir)?;
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }

        self.save_tokens(&tokens)?;
        info!(added = tokens.len() - before, total = tokens.len(), "extended grant set");

        Ok(self.restart_access(&tokens))
    }

    /// Stop all access and forget every grant.
    pub fn revoke_all(&mut self) -> Result<(), ScopeError> {
        self.release_all();
        self.store.remove(GRANTS_KEY)?;
        info!("revoked all grants");
        Ok(())
    }

    /// Drop the grant whose root's last path component is `name`.
    ///
    /// Does nothing when no grant matches.
    pub fn revoke(&mut self, name: &str) -> Result<(), ScopeError> {
        let mut tokens = self.load_tokens();
        let before = tokens.len();

        tokens.retain(|token| {
            let matches = self
                .capability
                .resolve(token)
                .is_some_and(|r| r.root.file_name() == Some(OsStr::new(name)));
            !matches
        });

        if tokens.len() == before {
            debug!(name, "no grant matched");
            return Ok(());
        }

        self.save_tokens(&tokens)?;
        info!(name, removed = before - tokens.len(), "revoked grant");
        self.restart_access(&tokens);
        Ok(())
    }

    /// Existing roots, or a fresh grant request when there are none.
    pub fn resolve_or_request(&mut self) -> Result<Vec<PathBuf>, ScopeError> {
        let roots = self.resolve_granted_roots();
        if !roots.is_empty() {
            return Ok(roots);
        }
        debug!("no usable grants, requesting new ones");
        self.request_new_grant(&PickerPrompt::grant())
    }

    /// Stop access on every live root. Persisted grants are untouched.
    pub fn release_all(&mut self) {
        if self.live.is_empty() {
            return;
        }
        for root in self.live.drain(..) {
            self.capability.stop_access(&root);
        }
        debug!("released scoped access");
    }

    /// Folder names of all resolvable grants, without starting access.
    pub fn granted_folder_names(&self) -> Vec<String> {
        self.load_tokens()
            .iter()
            .filter_map(|token| self.capability.resolve(token))
            .filter_map(|r| r.root.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect()
    }

    fn pick(&self, prompt: &PickerPrompt) -> Result<Vec<PathBuf>, ScopeError> {
        let dirs = self.picker.pick(prompt)?;
        if dirs.is_empty() {
            return Err(ScopeError::UserCancelled);
        }
        Ok(dirs)
    }

    fn restart_access(&mut self, tokens: &[ScopeToken]) -> Vec<PathBuf> {
        self.release_all();

        let live: Vec<PathBuf> = tokens
            .iter()
            .filter_map(|token| self.capability.resolve(token))
            .filter(|r| self.capability.start_access(&r.root))
            .map(|r| r.root)
            .collect();

        self.live = live.clone();
        live
    }

    fn load_tokens(&self) -> Vec<ScopeToken> {
        match self.store.get(GRANTS_KEY) {
            Ok(blobs) => blobs.into_iter().map(ScopeToken::from_bytes).collect(),
            Err(e) => {
                warn!(error = %e, "failed to load grants");
                Vec::new()
            }
        }
    }

    fn save_tokens(&self, tokens: &[ScopeToken]) -> Result<(), ScopeError> {
        let blobs: Vec<Vec<u8>> = tokens.iter().map(|t| t.as_bytes().to_vec()).collect();
        self.store.set(GRANTS_KEY, &blobs)
    }
}

impl Drop for AccessScopeManager {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::scope::capability::PathCapability;
    use crate::scope::picker::MockDirectoryPicker;
    use crate::scope::testing::{MemoryBlobStore, RecordingCapability};
    use tempfile::{TempDir, tempdir};

    fn make_dirs(names: &[&str]) -> (TempDir, Vec<PathBuf>) {
        let tmp = tempdir().unwrap();
        let base = fs::canonicalize(tmp.path()).unwrap();
        let dirs = names
            .iter()
            .map(|n| {
                let d = base.join(n);
                fs::create_dir(&d).unwrap();
                d
            })
            .collect();
        (tmp, dirs)
    }

    fn picker_returning(dirs: Vec<PathBuf>) -> MockDirectoryPicker {
        let mut picker = MockDirectoryPicker::new();
        picker.expect_pick().returning(move |_| Ok(dirs.clone()));
        picker
    }

    fn manager(
        store: &MemoryBlobStore,
        cap: &RecordingCapability,
        picker: MockDirectoryPicker,
    ) -> AccessScopeManager {
        AccessScopeManager::new(Box::new(store.clone()), Box::new(cap.clone()), Box::new(picker))
    }

    #[test]
    fn test_request_then_resolve_round_trip() {
        let (_tmp, dirs) = make_dirs(&["Documents", "Downloads", "Music"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        let mut mgr = manager(&store, &cap, picker_returning(dirs.clone()));
        let granted = mgr.request_new_grant(&PickerPrompt::grant()).unwrap();
        assert_eq!(granted, dirs);
        assert_eq!(cap.open_roots(), dirs);

        mgr.release_all();
        assert!(cap.open_roots().is_empty());

        let resolved = mgr.resolve_granted_roots();
        assert_eq!(resolved, dirs);
        assert_eq!(mgr.live_roots(), dirs.as_slice());
        assert_eq!(cap.open_roots().len(), 3);
    }

    #[test]
    fn test_request_replaces_existing_grants() {
        let (_tmp, dirs) = make_dirs(&["Old", "New"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        manager(&store, &cap, picker_returning(vec![dirs[0].clone()]))
            .request_new_grant(&PickerPrompt::grant())
            .unwrap();

        let mut mgr = manager(&store, &cap, picker_returning(vec![dirs[1].clone()]));
        mgr.request_new_grant(&PickerPrompt::grant()).unwrap();

        assert_eq!(mgr.granted_folder_names(), vec!["New".to_string()]);
    }

    #[test]
    fn test_request_cancelled() {
        let mut picker = MockDirectoryPicker::new();
        picker
            .expect_pick()
            .returning(|_| Err(ScopeError::UserCancelled));

        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();
        let mut mgr = manager(&store, &cap, picker);

        let err = mgr.request_new_grant(&PickerPrompt::grant()).unwrap_err();
        assert!(matches!(err, ScopeError::UserCancelled));
        assert!(store.get(GRANTS_KEY).unwrap().is_empty());
    }

    #[test]
    fn test_empty_selection_is_cancel() {
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();
        let mut mgr = manager(&store, &cap, picker_returning(Vec::new()));

        let err = mgr.add_to_grant(&PickerPrompt::add()).unwrap_err();
        assert!(matches!(err, ScopeError::UserCancelled));
    }

    #[test]
    fn test_add_deduplicates() {
        let (_tmp, dirs) = make_dirs(&["A", "B"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        manager(&store, &cap, picker_returning(vec![dirs[0].clone()]))
            .request_new_grant(&PickerPrompt::grant())
            .unwrap();

        let mut mgr = manager(&store, &cap, picker_returning(dirs.clone()));
        let live = mgr.add_to_grant(&PickerPrompt::add()).unwrap();

        assert_eq!(live, dirs);
        assert_eq!(store.get(GRANTS_KEY).unwrap().len(), 2);
    }

    #[test]
    fn test_revoke_by_name() {
        let (_tmp, dirs) = make_dirs(&["Keep", "Drop"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        let mut mgr = manager(&store, &cap, picker_returning(dirs.clone()));
        mgr.request_new_grant(&PickerPrompt::grant()).unwrap();

        mgr.revoke("Drop").unwrap();
        assert_eq!(mgr.live_roots(), &[dirs[0].clone()]);
        assert_eq!(cap.open_roots(), vec![dirs[0].clone()]);
        assert_eq!(mgr.granted_folder_names(), vec!["Keep".to_string()]);
    }

    #[test]
    fn test_revoke_unknown_name_is_noop() {
        let (_tmp, dirs) = make_dirs(&["Keep"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        let mut mgr = manager(&store, &cap, picker_returning(dirs.clone()));
        mgr.request_new_grant(&PickerPrompt::grant()).unwrap();
        let starts = cap.start_count();

        mgr.revoke("Nope").unwrap();
        assert_eq!(cap.start_count(), starts);
        assert_eq!(mgr.live_roots(), dirs.as_slice());
    }

    #[test]
    fn test_revoke_all() {
        let (_tmp, dirs) = make_dirs(&["A", "B"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        let mut mgr = manager(&store, &cap, picker_returning(dirs));
        mgr.request_new_grant(&PickerPrompt::grant()).unwrap();
        mgr.revoke_all().unwrap();

        assert!(mgr.live_roots().is_empty());
        assert!(cap.open_roots().is_empty());
        assert!(store.get(GRANTS_KEY).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_drops_vanished_roots() {
        let (_tmp, dirs) = make_dirs(&["Stays", "Goes"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        let mut mgr = manager(&store, &cap, picker_returning(dirs.clone()));
        mgr.request_new_grant(&PickerPrompt::grant()).unwrap();
        mgr.release_all();

        fs::remove_dir(&dirs[1]).unwrap();
        assert_eq!(mgr.resolve_granted_roots(), vec![dirs[0].clone()]);
        // The unresolvable token stays persisted.
        assert_eq!(store.get(GRANTS_KEY).unwrap().len(), 2);
    }

    #[test]
    fn test_resolve_refreshes_stale_token() {
        let (_tmp, dirs) = make_dirs(&["Photos", "inner"]);
        let store = MemoryBlobStore::default();
        let indirect = dirs[1].join("..").join("Photos");
        let stale = serde_json::to_vec(&serde_json::json!({ "path": indirect })).unwrap();
        store.set(GRANTS_KEY, &[stale.clone()]).unwrap();

        let cap = RecordingCapability::default();
        let mut mgr = manager(&store, &cap, MockDirectoryPicker::new());

        assert_eq!(mgr.resolve_granted_roots(), vec![dirs[0].clone()]);

        let stored = store.get(GRANTS_KEY).unwrap();
        assert_ne!(stored[0], stale);
        let fresh = PathCapability
            .resolve(&ScopeToken::from_bytes(stored[0].clone()))
            .unwrap();
        assert!(!fresh.stale);
    }

    #[test]
    fn test_resolve_or_request_uses_existing() {
        let (_tmp, dirs) = make_dirs(&["A"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        manager(&store, &cap, picker_returning(dirs.clone()))
            .request_new_grant(&PickerPrompt::grant())
            .unwrap();

        let mut picker = MockDirectoryPicker::new();
        picker.expect_pick().never();
        let mut mgr = manager(&store, &cap, picker);

        assert_eq!(mgr.resolve_or_request().unwrap(), dirs);
    }

    #[test]
    fn test_resolve_or_request_prompts_when_empty() {
        let (_tmp, dirs) = make_dirs(&["Fresh"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        let mut picker = MockDirectoryPicker::new();
        let chosen = dirs.clone();
        picker
            .expect_pick()
            .withf(|prompt| *prompt == PickerPrompt::grant())
            .times(1)
            .returning(move |_| Ok(chosen.clone()));

        let mut mgr = manager(&store, &cap, picker);
        assert_eq!(mgr.resolve_or_request().unwrap(), dirs);
    }

    #[test]
    fn test_drop_releases_access() {
        let (_tmp, dirs) = make_dirs(&["A"]);
        let store = MemoryBlobStore::default();
        let cap = RecordingCapability::default();

        let mut mgr = manager(&store, &cap, picker_returning(dirs));
        mgr.request_new_grant(&PickerPrompt::grant()).unwrap();
        assert_eq!(cap.open_roots().len(), 1);

        drop(mgr);
        assert!(cap.open_roots().is_empty());
    }
}
