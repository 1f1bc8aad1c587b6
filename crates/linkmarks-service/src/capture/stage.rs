//! Link-creation stage tracking.

use std::fmt;

/// Where a link-creation attempt currently is.
///
/// Progression runs from `Started` through `Capturing`, `Encoding`,
/// `Uploading` and `Committing` to `Done`; a failure aborts from
/// whichever stage it hit. There are no automatic retries; each failure
/// is terminal for the request and retry is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    /// Request accepted, blob key generated.
    Started,
    /// Rendering the page in the headless browser.
    Capturing,
    /// Re-encoding the raw capture into a thumbnail.
    Encoding,
    /// Uploading the thumbnail to the blob store.
    Uploading,
    /// Appending the link to the tree document.
    Committing,
    /// Link recorded with its durable locator.
    Done,
}

impl fmt::Display for CaptureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::Capturing => write!(f, "capturing"),
            Self::Encoding => write!(f, "encoding"),
            Self::Uploading => write!(f, "uploading"),
            Self::Committing => write!(f, "committing"),
            Self::Done => write!(f, "done"),
        }
    }
}
