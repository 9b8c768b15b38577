//! Generation settings read from a TOML file.
//!
//! Every key is optional; missing keys keep the library defaults.

use std::fs;
use std::io;
use std::path::Path;

use map_core::Config;

pub fn load(path: &Path) -> io::Result<Config> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> io::Result<Config> {
    toml::from_str(content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
