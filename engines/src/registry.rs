//! Engine registry for automatic front-end discovery.
//!
//! Each engine self-registers via [`inventory::submit!`] with an
//! [`EngineEntry`] holding its name and a factory function. The shell looks an
//! engine up by name the first time a session starts, without any central list.

use zpaceway_core::engine::Engine;

/// Describes one engine implementation the shell can start sessions on.
pub struct EngineEntry {
    /// Name used to select this engine (e.g., "testcard").
    pub name: &'static str,
    /// One-line description for `--list-engines`.
    pub description: &'static str,
    /// Factory: construct a fresh, unloaded engine instance.
    pub create: fn() -> Box<dyn Engine>,
}

impl EngineEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        create: fn() -> Box<dyn Engine>,
    ) -> Self {
        Self {
            name,
            description,
            create,
        }
    }
}

inventory::collect!(EngineEntry);

/// Return all registered engines, sorted by name.
pub fn all() -> Vec<&'static EngineEntry> {
    let mut entries: Vec<_> = inventory::iter::<EngineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up an engine by name.
pub fn find(name: &str) -> Option<&'static EngineEntry> {
    inventory::iter::<EngineEntry>
        .into_iter()
        .find(|e| e.name == name)
}
