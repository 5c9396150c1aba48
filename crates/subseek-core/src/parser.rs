//! Caption parser interface.
//!
//! Subtitle formats are parsed outside the core. A parser turns one file
//! into an ordered sequence of captions, or reports
//! [`Error::Parse`](crate::Error::Parse) for that file.

use std::path::Path;

use crate::error::Result;
use crate::models::NewCaption;

pub trait CaptionParser: Send + Sync {
    /// Parse `path` into captions, in file order.
    fn parse(&self, path: &Path) -> Result<Vec<NewCaption>>;

    /// Lowercase file extensions (without the dot) this parser understands.
    fn extensions(&self) -> &[&'static str];
}
