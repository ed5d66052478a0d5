use std::sync::RwLock;

/// Owner of the visible current path
///
/// In a browser this is the address bar and history; the router only needs
/// to read the current path and to replace it when a redirect rewrites it.
pub trait LocationProvider: Send + Sync {
    /// Current path
    fn get(&self) -> String;

    /// Replaces the current path
    fn set(&self, path: &str);
}

/// In-memory location, used when no browser is around (tests, CLI)
///
/// Every path written through [`LocationProvider::set`] is kept, in order,
/// so callers can see which rewrites a dispatch performed. That history is
/// never trimmed: use one instance per short-lived router (a CLI run, a
/// test) rather than behind a long-lived one.
///
/// # Examples
///
/// ```
/// use rackd_router::{LocationProvider, MemoryLocation};
///
/// let location = MemoryLocation::new("/racks/65000/");
/// location.set("/racks/65000/nodes");
///
/// assert_eq!(location.get(), "/racks/65000/nodes");
/// assert_eq!(location.entries(), vec!["/racks/65000/nodes"]);
/// ```
#[derive(Debug)]
pub struct MemoryLocation {
    state: RwLock<State>,
}

#[derive(Debug)]
struct State {
    current: String,
    entries: Vec<String>,
}

impl MemoryLocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(State {
                current: path.into(),
                entries: Vec::new(),
            }),
        }
    }

    /// Paths written through `set`, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.read(|state| state.entries.clone())
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        // Poisoned locks still hold consistent state
        let guard = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl LocationProvider for MemoryLocation {
    fn get(&self) -> String {
        self.read(|state| state.current.clone())
    }

    fn set(&self, path: &str) {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        guard.current = path.to_string();
        guard.entries.push(path.to_string());
    }
}
