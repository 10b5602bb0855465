//! Pin and device-path assignments for a Raspberry Pi class board.
//!
//! Single source of truth for the defaults; every one of them can be
//! overridden from the command line or the configuration file.

// ---------------------------------------------------------------------------
// Fan
// ---------------------------------------------------------------------------

/// Digital output driving the fan transistor (BCM numbering).
/// Physical header pin 11.
pub const FAN_GPIO: u32 = 17;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// SoC thermal zone, reported in millidegrees Celsius.
pub const CPU_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

// ---------------------------------------------------------------------------
// sysfs GPIO
// ---------------------------------------------------------------------------

/// Root of the legacy sysfs GPIO interface.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";
