use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for board item IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// An interned identifier for cards and connectors.
/// 4 bytes, Copy, Eq, Hash in O(1); resolves back to a readable string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Spur);

impl ItemId {
    /// Intern a string as an ItemId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ItemId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// A fresh card ID (`card_0`, `card_1`, ...).
    pub fn card() -> Self {
        Self::with_prefix("card")
    }

    /// A fresh connector ID (`link_0`, `link_1`, ...).
    pub fn connector() -> Self {
        Self::with_prefix("link")
    }

    /// Generate a unique ID with a kind prefix. Never collides with a
    /// previously generated ID in this process.
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            // An explicitly interned string may already own this name.
            if INTERNER.get(&candidate).is_none() {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ItemId::intern(&s))
    }
}
