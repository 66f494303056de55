//! Grammar extensions that ship with the parser, addressable by name.

pub mod capture;

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::parser::plugin::Plugin;

/// Every name [`lookup`] accepts.
pub const NAMES: &[&str] = &[capture::NAME];

/// Instantiate the built-in plugin registered as `name`.
pub fn lookup(name: &str) -> Result<Rc<dyn Plugin>> {
    match name {
        capture::NAME => Ok(Rc::new(capture::CapturePlugin)),
        other => Err(Error::UnknownPlugin(other.to_string())),
    }
}
