//! Error handling stuff
use displaydoc::Display;
use std::io;
use thiserror::Error;

/// Error type for enumerating backlight devices.
///
/// Discovery is all-or-nothing, one bad device fails the whole call.
#[derive(Debug, Display, Error)]
pub enum DiscoveryError {
    /// IO Failed
    Io(#[from] io::Error),

    /// No backlight devices found
    NoDevices,

    /// Couldn't read max brightness of `{name}`: {source}
    ReadMax { name: String, source: io::Error },

    /// Device `{name}` reports a max brightness of zero
    ZeroMax { name: String },

    /// More than one device named `{name}`
    DuplicateName { name: String },
}

/// Error type for picking a device out of a collection
#[derive(Debug, Display, Error)]
pub enum SelectionError {
    /// Index {index} is out of range, only {len} devices exist
    IndexOutOfRange { index: usize, len: usize },

    /// Invalid device name pattern: {0}
    Pattern(#[from] regex::Error),

    /// No device name matches `{0}`
    NoMatch(String),

    /// Pattern `{0}` matches more than one device
    Ambiguous(String),
}

/// Error type for reading and writing brightness values
#[derive(Debug, Display, Error)]
pub enum BrightnessError {
    /// IO Failed
    Io(#[from] io::Error),

    /// Requested brightness {value} is over the max {max}
    OverMax { value: u32, max: u32 },

    /// Refusing to set brightness to zero
    Zero,

    /// Requested brightness {value} is under the minimum {floor}
    UnderFloor { value: u32, floor: u32 },
}
