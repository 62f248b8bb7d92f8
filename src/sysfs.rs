//! The sysfs backlight class, `/sys/class/backlight`.
//!
//! Each backlight device is one directory under the class root, holding
//! two attribute files: `brightness`, the current value, and
//! `max_brightness`, the driver-defined ceiling. Both are unsigned
//! decimal text. The class is documented in [sysfs-class-backlight][1].
//!
//! Entries under the class root are symlinks into `/sys/devices`;
//! discovery resolves them before use, and a link that doesn't resolve
//! fails the whole call.
//!
//! # Stability
//!
//! This is a 'Stable' sysfs interface, see the [ABI README][2], so it
//! should be safe to rely on for years at a time.
//!
//! [1]: https://www.kernel.org/doc/Documentation/ABI/stable/sysfs-class-backlight
//! [2]: https://www.kernel.org/doc/Documentation/ABI/README
use crate::{
    device::{Backend, Device, Devices},
    error::DiscoveryError,
};
use std::{
    fs,
    io::{self, prelude::*},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

pub type Result<T, E = DiscoveryError> = std::result::Result<T, E>;

/// Technically Linux requires sysfs to be at `/sys`, calling it a system
/// configuration error otherwise.
///
/// Keep it in one place anyway, so it's easy to change.
const CLASS_PATH: &str = "/sys/class/backlight";

/// Current brightness attribute
const BRIGHTNESS: &str = "brightness";

/// Maximum brightness attribute
const MAX_BRIGHTNESS: &str = "max_brightness";

/// Read a whitespace-padded unsigned decimal attribute file.
fn read_attr(path: &Path) -> io::Result<u32> {
    fs::read_to_string(path)?
        .trim()
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// One backlight device directory.
///
/// Opens the attribute file fresh on every operation, nothing is held
/// between calls.
#[derive(Debug, Clone)]
pub struct Backlight {
    /// Class entry name, e.g. `intel_backlight`
    name: String,

    /// Resolved device directory
    path: PathBuf,
}

impl Backlight {
    fn new(name: String, path: PathBuf) -> Self {
        Self { name, path }
    }
}

impl Backend for Backlight {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_current(&self) -> io::Result<u32> {
        read_attr(&self.path.join(BRIGHTNESS))
    }

    fn read_max(&self) -> io::Result<u32> {
        read_attr(&self.path.join(MAX_BRIGHTNESS))
    }

    fn write_current(&self, value: u32) -> io::Result<()> {
        let mut f = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.path.join(BRIGHTNESS))?;
        f.write_all(value.to_string().as_bytes())
    }
}

/// Get all backlight devices, validated and sorted by name.
///
/// # Errors
///
/// - If the class directory can't be read, or a symlinked entry doesn't
///   resolve
/// - If any device's maximum can't be read, or is zero
/// - If two entries share a name
/// - If there are no devices at all
pub fn discover() -> Result<Devices> {
    discover_in(Path::new(CLASS_PATH))
}

/// Like [`discover`], against an arbitrary class directory.
pub fn discover_in(root: &Path) -> Result<Devices> {
    let mut devices = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|e| DiscoveryError::Io(e.into()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path().canonicalize()?;
        devices.push(Device::new(Box::new(Backlight::new(name, path)))?);
    }
    Devices::new(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrightnessError;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn make_device(root: &Path, name: &str, current: &str, max: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(BRIGHTNESS), current).unwrap();
        fs::write(dir.join(MAX_BRIGHTNESS), max).unwrap();
        dir
    }

    #[test]
    fn read_and_write_attrs() {
        let root = TempDir::new().unwrap();
        let dir = make_device(root.path(), "panel", "80\n", "100\n");
        let backlight = Backlight::new("panel".into(), dir.clone());
        assert_eq!(backlight.read_current().unwrap(), 80);
        assert_eq!(backlight.read_max().unwrap(), 100);

        backlight.write_current(90).unwrap();
        assert_eq!(fs::read_to_string(dir.join(BRIGHTNESS)).unwrap(), "90");
        assert_eq!(backlight.read_current().unwrap(), 90);
    }

    #[test]
    fn attrs_must_be_decimal() {
        let root = TempDir::new().unwrap();
        let dir = make_device(root.path(), "panel", "80", "not a number");
        let backlight = Backlight::new("panel".into(), dir);
        let err = backlight.read_max().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn discover_sorts_by_name() {
        let root = TempDir::new().unwrap();
        make_device(root.path(), "beta", "50", "100");
        make_device(root.path(), "alpha", "3", "9");
        let devices = discover_in(root.path()).unwrap();
        let names: Vec<&str> = devices.iter().map(|d| d.name()).collect();
        assert_eq!(names, ["alpha", "beta"]);
        assert_eq!(devices.iter().next().unwrap().max(), 9);
    }

    #[test]
    fn discover_follows_symlinks() {
        let root = TempDir::new().unwrap();
        let class = root.path().join("class");
        fs::create_dir(&class).unwrap();
        let real = make_device(root.path(), "real", "50", "100");
        symlink(&real, class.join("panel")).unwrap();

        let devices = discover_in(&class).unwrap();
        assert_eq!(devices.len(), 1);
        let device = devices.into_first();
        // the class entry keeps its own name, writes land in the target
        assert_eq!(device.name(), "panel");
        device.set_max().unwrap();
        assert_eq!(fs::read_to_string(real.join(BRIGHTNESS)).unwrap(), "100");
    }

    #[test]
    fn discover_skips_plain_files() {
        let root = TempDir::new().unwrap();
        make_device(root.path(), "panel", "50", "100");
        fs::write(root.path().join("README"), "not a device").unwrap();
        assert_eq!(discover_in(root.path()).unwrap().len(), 1);
    }

    #[test]
    fn discover_missing_root() {
        let root = TempDir::new().unwrap();
        let gone = root.path().join("gone");
        assert!(matches!(discover_in(&gone), Err(DiscoveryError::Io(_))));
    }

    #[test]
    fn discover_empty_root() {
        let root = TempDir::new().unwrap();
        assert!(matches!(
            discover_in(root.path()),
            Err(DiscoveryError::NoDevices)
        ));
    }

    #[test]
    fn discover_dangling_symlink() {
        let root = TempDir::new().unwrap();
        make_device(root.path(), "panel", "50", "100");
        symlink(root.path().join("gone"), root.path().join("dangling")).unwrap();
        assert!(matches!(
            discover_in(root.path()),
            Err(DiscoveryError::Io(_))
        ));
    }

    #[test]
    fn discover_missing_max() {
        let root = TempDir::new().unwrap();
        let dir = make_device(root.path(), "panel", "50", "100");
        fs::remove_file(dir.join(MAX_BRIGHTNESS)).unwrap();
        assert!(matches!(
            discover_in(root.path()),
            Err(DiscoveryError::ReadMax { .. })
        ));
    }

    #[test]
    fn discover_zero_max() {
        let root = TempDir::new().unwrap();
        make_device(root.path(), "panel", "0", "0");
        assert!(matches!(
            discover_in(root.path()),
            Err(DiscoveryError::ZeroMax { .. })
        ));
    }

    #[test]
    fn rejected_write_leaves_the_file_alone() {
        let root = TempDir::new().unwrap();
        make_device(root.path(), "panel", "50", "100");
        let device = discover_in(root.path()).unwrap().into_first();
        assert!(matches!(
            device.set(101, true),
            Err(BrightnessError::OverMax { .. })
        ));
        assert_eq!(
            fs::read_to_string(root.path().join("panel").join(BRIGHTNESS)).unwrap(),
            "50"
        );
    }
}
