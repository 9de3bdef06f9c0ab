use std::{borrow::Borrow, fmt, sync::Arc};

/// Stable key for an area (e.g. an MSOA code such as "E02000001").
/// Keeps the original identifier text but avoids repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId(Arc<str>);

impl AreaId {
    pub fn new(id: impl Into<Arc<str>>) -> Self { Self(id.into()) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl Borrow<str> for AreaId {
    fn borrow(&self) -> &str { &self.0 }
}

impl From<&str> for AreaId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for AreaId {
    fn from(id: String) -> Self { Self::new(id) }
}
