pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub const KEY_LAST_SYMBOL: &str = "lastSymbol";
pub const KEY_RECENT_SYMBOLS: &str = "recentSymbols";

/// String key-value persistence in the shape of browser local storage.
///
/// Reads never fail; implementations report unreadable backing data as missing.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}
