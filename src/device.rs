//! Backlight device handles and the bounded brightness operations
//!
//! A [`Device`] wraps one platform [`Backend`] and enforces the value
//! policy: writes are bounded by the device maximum, and unforced writes
//! keep the display readable by refusing zero and values under a tenth of
//! the maximum.
//!
//! Use [`crate::sysfs::discover`] to get a [`Devices`] collection, pick
//! one device out of it, then adjust.
use crate::error::{BrightnessError, DiscoveryError, SelectionError};
use regex::Regex;
use std::{fmt, io, slice, vec};

pub type Result<T, E = BrightnessError> = std::result::Result<T, E>;

/// One physical backlight, as exposed by a platform backend.
///
/// Implementations store two scalar values per device, current and
/// maximum, and are expected to keep single-value updates atomic. No
/// locking happens above this trait; the last writer wins.
pub trait Backend {
    /// Device name. Stable, used as the sort and dedup key.
    fn name(&self) -> &str;

    /// Read the current brightness.
    fn read_current(&self) -> io::Result<u32>;

    /// Read the maximum brightness.
    fn read_max(&self) -> io::Result<u32>;

    /// Write the current brightness.
    fn write_current(&self, value: u32) -> io::Result<()>;
}

/// A validated backlight device.
///
/// The maximum is read once at construction and cached, it never changes
/// for a given device. The current value is re-read on every call, it can
/// change under us through hardware keys or other processes.
pub struct Device {
    backend: Box<dyn Backend>,
    max: u32,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name())
            .field("max", &self.max)
            .finish()
    }
}

// Public
impl Device {
    /// Wrap `backend`, eagerly reading and validating its maximum.
    ///
    /// # Errors
    ///
    /// - If the maximum can't be read
    /// - If the device reports a maximum of zero
    pub fn new(backend: Box<dyn Backend>) -> Result<Self, DiscoveryError> {
        let max = backend
            .read_max()
            .map_err(|source| DiscoveryError::ReadMax {
                name: backend.name().into(),
                source,
            })?;
        if max == 0 {
            return Err(DiscoveryError::ZeroMax {
                name: backend.name().into(),
            });
        }
        Ok(Self { backend, max })
    }

    /// Device name
    pub fn name(&self) -> &str {
        self.backend.name()
    }

    /// Current brightness, always re-read from the backend.
    ///
    /// # Errors
    ///
    /// - If the backend read does
    pub fn current(&self) -> Result<u32> {
        Ok(self.backend.read_current()?)
    }

    /// Maximum brightness. Cached, never zero.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Half of the maximum, except `1` for a device with `max == 1`,
    /// where halving would turn the display off.
    pub fn mid(&self) -> u32 {
        if self.max == 1 {
            1
        } else {
            self.max / 2
        }
    }

    /// One adjustment step, a tenth of the maximum.
    ///
    /// Devices with fewer than ten levels step by `1`. This doubles as
    /// the floor that unforced [`Device::set`] won't go under.
    pub fn min_step(&self) -> u32 {
        if self.max >= 10 {
            self.max / 10
        } else {
            1
        }
    }

    /// Write `value` to the backend.
    ///
    /// Values over the maximum are always rejected. Unless `force` is
    /// set, zero is rejected, and devices with more than ten levels also
    /// reject values under a tenth of the maximum, so a slip of the
    /// finger can't blank the display.
    ///
    /// # Errors
    ///
    /// - If `value` is out of bounds
    /// - If the backend write does
    pub fn set(&self, value: u32, force: bool) -> Result<()> {
        if value > self.max {
            return Err(BrightnessError::OverMax {
                value,
                max: self.max,
            });
        }
        if !force {
            if value == 0 {
                return Err(BrightnessError::Zero);
            }
            if self.max > 10 && value < self.max / 10 {
                return Err(BrightnessError::UnderFloor {
                    value,
                    floor: self.max / 10,
                });
            }
        }
        Ok(self.backend.write_current(value)?)
    }

    /// Set brightness to the maximum.
    ///
    /// # Errors
    ///
    /// - If the backend write does
    pub fn set_max(&self) -> Result<()> {
        self.set(self.max, true)
    }

    /// Set brightness to [`Device::mid`].
    ///
    /// # Errors
    ///
    /// - If the backend write does
    pub fn set_mid(&self) -> Result<()> {
        self.set(self.mid(), true)
    }

    /// Set brightness to [`Device::min_step`], the dimmest level that
    /// still counts as on.
    ///
    /// # Errors
    ///
    /// - If the backend write does
    pub fn set_min(&self) -> Result<()> {
        self.set(self.min_step(), true)
    }

    /// Raise brightness by one step, clamped at the maximum.
    ///
    /// Already at the maximum, this writes the maximum again.
    ///
    /// # Errors
    ///
    /// - If reading the current value or writing the new one does
    pub fn step_up(&self) -> Result<()> {
        let current = self.current()?;
        let want = current.saturating_add(self.min_step()).min(self.max);
        self.set(want, true)
    }

    /// Lower brightness by one step, but never under the floor.
    ///
    /// At or under the floor ([`Device::min_step`], or `1` for devices
    /// with fewer than ten levels) this is a no-op reporting success, so
    /// repeated calls converge there instead of failing.
    ///
    /// # Errors
    ///
    /// - If reading the current value or writing the new one does
    pub fn step_down(&self) -> Result<()> {
        let current = self.current()?;
        if self.max < 10 {
            if current <= 1 {
                return Ok(());
            }
            return self.set(current - 1, true);
        }
        let floor = self.max / 10;
        if current <= floor {
            return Ok(());
        }
        self.set((current - floor).max(floor), true)
    }
}

/// All discovered backlight devices, sorted by name.
///
/// Never empty, a discovery that finds nothing is an error instead. The
/// selection methods consume the collection; re-discover to select again.
#[derive(Debug)]
pub struct Devices(Vec<Device>);

// Public
impl Devices {
    /// Validate `devices` into a collection.
    ///
    /// Sorts by name, insertion order doesn't matter.
    ///
    /// # Errors
    ///
    /// - If `devices` is empty
    /// - If two devices share a name
    pub fn new(mut devices: Vec<Device>) -> Result<Self, DiscoveryError> {
        if devices.is_empty() {
            return Err(DiscoveryError::NoDevices);
        }
        devices.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        for pair in devices.windows(2) {
            if pair[0].name() == pair[1].name() {
                return Err(DiscoveryError::DuplicateName {
                    name: pair[0].name().into(),
                });
            }
        }
        Ok(Self(devices))
    }

    /// Number of devices. At least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`, by construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the devices in name order.
    pub fn iter(&self) -> slice::Iter<'_, Device> {
        self.0.iter()
    }

    /// Take the device at `index` in name order.
    ///
    /// # Errors
    ///
    /// - If `index` is out of range
    pub fn select(mut self, index: usize) -> Result<Device, SelectionError> {
        if index >= self.0.len() {
            return Err(SelectionError::IndexOutOfRange {
                index,
                len: self.0.len(),
            });
        }
        Ok(self.0.remove(index))
    }

    /// Take the single device whose name matches `pattern`.
    ///
    /// The policy is strict: exactly one device must match. A pattern
    /// matching several devices is ambiguous, narrow it down instead of
    /// having this function guess.
    ///
    /// # Errors
    ///
    /// - If `pattern` is not a valid regular expression
    /// - If no name matches, or more than one does
    pub fn select_pattern(mut self, pattern: &str) -> Result<Device, SelectionError> {
        let re = Regex::new(pattern)?;
        let matched: Vec<usize> = self
            .0
            .iter()
            .enumerate()
            .filter(|(_, d)| re.is_match(d.name()))
            .map(|(i, _)| i)
            .collect();
        match matched[..] {
            [] => Err(SelectionError::NoMatch(pattern.into())),
            [i] => Ok(self.0.remove(i)),
            _ => Err(SelectionError::Ambiguous(pattern.into())),
        }
    }

    /// Take the first device in name order, the default when the caller
    /// doesn't say which one.
    pub fn into_first(mut self) -> Device {
        self.0.remove(0)
    }
}

impl IntoIterator for Devices {
    type Item = Device;
    type IntoIter = vec::IntoIter<Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Devices {
    type Item = &'a Device;
    type IntoIter = slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
