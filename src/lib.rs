//! High level bindings to the Linux backlight interface
//!
//! # Implementation details
//!
//! Backlight devices are exposed through files under
//! `/sys/class/backlight`, one directory per device, so this library
//! requires sysfs to exist.
//!
//! Brightness values are opaque integers in a driver-defined scale, from
//! `0` to the per-device `max_brightness`. `0` usually means "off", which
//! is why writes refuse it unless explicitly forced.
//!
//! The kernel documents the class in [sysfs-class-backlight][1], on a
//! best effort basis like most of sysfs.
//!
//! [1]: https://www.kernel.org/doc/Documentation/ABI/stable/sysfs-class-backlight

pub mod device;
pub mod error;
pub mod sysfs;
