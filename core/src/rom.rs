use std::fmt;
use std::rc::Rc;

/// Immutable raw ROM bytes as read from the user's file.
///
/// Cheap to clone; clones share the same buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct RomImage {
    name: Rc<str>,
    bytes: Rc<[u8]>,
}

impl RomImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: Rc::from(name.into()),
            bytes: Rc::from(bytes),
        }
    }

    /// File name the image was read from (display only).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for RomImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RomImage")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
