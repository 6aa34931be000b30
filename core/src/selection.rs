use tracing::debug;

use crate::api::Bundle;

/// Why the purchase dialog went away. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Explicit,
    Overlay,
    Escape,
    Submitted,
}

/// Purchase dialog state: closed, or open for exactly one bundle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    Closed,
    Open(Bundle),
}

impl Selection {
    /// Open the dialog for `bundle`. Opening while open replaces the bundle.
    pub fn open(&mut self, bundle: Bundle) {
        debug!(bundle_id = %bundle.id, "purchase dialog opened");
        *self = Selection::Open(bundle);
    }

    /// Close the dialog and forget the bundle.
    pub fn close(&mut self, reason: CloseReason) {
        if self.is_open() {
            debug!(?reason, "purchase dialog closed");
        }
        *self = Selection::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Selection::Open(_))
    }

    pub fn bundle(&self) -> Option<&Bundle> {
        match self {
            Selection::Open(b) => Some(b),
            Selection::Closed => None,
        }
    }
}
