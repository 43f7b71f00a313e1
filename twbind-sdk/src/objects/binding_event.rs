//! The envelope the sidecar wraps around every input-binding message.

use bytes::Bytes;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Source-defined attributes attached to a binding event.
///
/// Ordered so that renderings of the same event are stable.
pub type Metadata = BTreeMap<String, String>;

/// A single inbound message delivered by the host runtime.
///
/// `data` is opaque: for the tweets binding it is usually tweet JSON, but
/// nothing here assumes so.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingEvent {
    pub metadata: Metadata,
    pub data: Bytes,
}

impl BindingEvent {
    pub fn new(metadata: Metadata, data: impl Into<Bytes>) -> Self {
        Self {
            metadata,
            data: data.into(),
        }
    }

    /// Add one metadata entry, replacing any previous value for `key`.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The payload as text, with invalid UTF-8 replaced.
    pub fn data_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_metadata_replaces_value() {
        let event = BindingEvent::default()
            .with_metadata("source", "firehose")
            .with_metadata("source", "replay");
        assert_eq!(event.metadata.len(), 1);
        assert_eq!(event.metadata["source"], "replay");
    }

    #[test]
    fn test_data_lossy_replaces_invalid_utf8() {
        let event = BindingEvent::new(Metadata::new(), vec![b'o', b'k', 0xff]);
        assert_eq!(event.data_lossy(), "ok\u{fffd}");
    }
}
