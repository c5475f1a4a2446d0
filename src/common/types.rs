// src/common/types.rs

use core::fmt;

/// Value of a tag or index byte that has not been assigned by the configurator.
pub const UNASSIGNED: u8 = 0xFF;

/// Integer part the controller shows for a temperature/humidity state with no data.
pub const NO_TEMPERATURE_DATA: i8 = -128;

/// Luminosity value the controller shows when a light sensor has no data.
pub const NO_LUMINOSITY_DATA: u32 = u32::MAX;

// --- Sensor categories (wire tag in Slot::sensor_type) ---

/// A sensor kind with its own dense index space in the controller.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum SensorCategory {
    Temperature = 1,
    Humidity = 2,
    Luminosity = 3,
    SoilMoisture = 4,
}

impl SensorCategory {
    /// All categories, in persisted-record order.
    pub const ALL: [SensorCategory; 4] = [
        SensorCategory::Temperature,
        SensorCategory::Humidity,
        SensorCategory::Luminosity,
        SensorCategory::SoilMoisture,
    ];

    /// Tries to convert a wire tag into a category.
    ///
    /// `0` ("no sensor"), `5` (pH, never registered by this controller), the
    /// unassigned sentinel and every other value yield `None`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(SensorCategory::Temperature),
            2 => Some(SensorCategory::Humidity),
            3 => Some(SensorCategory::Luminosity),
            4 => Some(SensorCategory::SoilMoisture),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Position of this category in the registry tables and the persisted record.
    #[inline]
    pub const fn slot(self) -> usize {
        (self as u8 - 1) as usize
    }

    /// Name of the host module that owns the states of this category.
    pub const fn host_module_name(self) -> &'static str {
        match self {
            SensorCategory::Temperature => "STATE",
            SensorCategory::Humidity => "HUMIDITY",
            SensorCategory::Luminosity => "LIGHT",
            SensorCategory::SoilMoisture => "SOIL",
        }
    }

    /// State kind whose count gives the number of hardcoded sensors.
    pub const fn primary_kind(self) -> StateKind {
        match self {
            SensorCategory::Temperature => StateKind::Temperature,
            SensorCategory::Humidity => StateKind::Humidity,
            SensorCategory::Luminosity => StateKind::Luminosity,
            SensorCategory::SoilMoisture => StateKind::SoilMoisture,
        }
    }

    /// State kinds allocated for each registered sensor of this category.
    ///
    /// A humidity sensor also reports temperature, so it gets two states.
    pub const fn state_kinds(self) -> &'static [StateKind] {
        match self {
            SensorCategory::Temperature => &[StateKind::Temperature],
            SensorCategory::Humidity => &[StateKind::Temperature, StateKind::Humidity],
            SensorCategory::Luminosity => &[StateKind::Luminosity],
            SensorCategory::SoilMoisture => &[StateKind::SoilMoisture],
        }
    }
}

impl fmt::Display for SensorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorCategory::Temperature => "temperature",
            SensorCategory::Humidity => "humidity",
            SensorCategory::Luminosity => "luminosity",
            SensorCategory::SoilMoisture => "soil moisture",
        };
        f.write_str(name)
    }
}

// --- Host state kinds ---

/// Kinds of state objects the host framework keeps per module.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StateKind {
    Temperature,
    Humidity,
    Luminosity,
    SoilMoisture,
    WaterFlowInstant,
    WaterFlowIncremental,
    PH,
    Unknown,
}

// --- Readings pushed into host states ---

/// Temperature as integer part plus hundredths.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Temperature {
    pub whole: i8,
    pub fraction: u8,
}

impl Temperature {
    pub const NO_DATA: Temperature = Temperature::new(NO_TEMPERATURE_DATA, 0);

    pub const fn new(whole: i8, fraction: u8) -> Self {
        Temperature { whole, fraction }
    }

    /// False for the "no data" value.
    #[inline]
    pub const fn has_data(&self) -> bool {
        self.whole != NO_TEMPERATURE_DATA
    }
}

/// Relative humidity or soil moisture as integer part plus hundredths.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Humidity {
    pub whole: i8,
    pub fraction: u8,
}

impl Humidity {
    pub const NO_DATA: Humidity = Humidity::new(NO_TEMPERATURE_DATA, 0);

    pub const fn new(whole: i8, fraction: u8) -> Self {
        Humidity { whole, fraction }
    }

    #[inline]
    pub const fn has_data(&self) -> bool {
        self.whole != NO_TEMPERATURE_DATA
    }
}

/// A decoded value ready to be pushed into a host state object.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reading {
    Temperature(Temperature),
    /// Used for both humidity and soil moisture states.
    Humidity(Humidity),
    /// Lux.
    Luminosity(u32),
}

impl Reading {
    /// False when the reading carries the "no data" value of its kind, as
    /// pushed for offline modules or reported by a module still warming up.
    pub const fn has_data(&self) -> bool {
        match self {
            Reading::Temperature(t) => t.has_data(),
            Reading::Humidity(h) => h.has_data(),
            Reading::Luminosity(lux) => *lux != NO_LUMINOSITY_DATA,
        }
    }
}
