//! Configuration register layout and its field encodings
use bitfield_struct::bitfield;

/// Definition of the 16-bit configuration register.
///
/// Fields are listed from the least significant bit upwards.
/// | Bits  | Field              |
/// |-------|--------------------|
/// | 15    | OS                 |
/// | 14:12 | MUX                |
/// | 11:9  | PGA                |
/// | 8     | MODE               |
/// | 7:5   | DR                 |
/// | 4     | COMP_MODE          |
/// | 3     | COMP_POL           |
/// | 2     | COMP_LAT           |
/// | 1:0   | COMP_QUE           |
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Comparator queue, see [`ComparatorQueue`]
    #[bits(2)]
    pub comp_queue: u8,
    /// Set to hold the ALERT/RDY pin asserted until the conversion
    /// register is read.
    pub comp_latch: bool,
    /// Set for an active high ALERT/RDY pin, cleared for active low.
    pub comp_active_high: bool,
    /// Set for a window comparator, cleared for a traditional comparator
    /// with hysteresis.
    pub comp_window: bool,
    /// Data rate, see [`DataRate`]
    #[bits(3)]
    pub data_rate: u8,
    /// Set for power-down single-shot mode, cleared for continuous
    /// conversion.
    pub single_shot: bool,
    /// Programmable gain amplifier, see [`Gain`]
    #[bits(3)]
    pub pga: u8,
    /// Input multiplexer, see [`Mux`]
    #[bits(3)]
    pub mux: u8,
    /// Write: start a single conversion.
    /// Read: set when the device is not performing a conversion.
    pub os: bool,
}

/// Programmable gain amplifier setting.
///
/// Each setting selects one symmetric full-scale range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Gain {
    /// ±6.144V
    TwoThirds = 0b000,
    /// ±4.096V
    One = 0b001,
    /// ±2.048V
    Two = 0b010,
    /// ±1.024V
    Four = 0b011,
    /// ±0.512V
    Eight = 0b100,
    /// ±0.256V
    Sixteen = 0b101,
}

impl Gain {
    /// Full-scale range in volts
    pub const fn full_scale_range(self) -> f32 {
        match self {
            Gain::TwoThirds => 6.144,
            Gain::One => 4.096,
            Gain::Two => 2.048,
            Gain::Four => 1.024,
            Gain::Eight => 0.512,
            Gain::Sixteen => 0.256,
        }
    }
}

impl From<u8> for Gain {
    /// Decode a PGA field. The two reserved codes select ±0.256V on the
    /// device.
    fn from(value: u8) -> Self {
        match value & 0b111 {
            0b000 => Self::TwoThirds,
            0b001 => Self::One,
            0b010 => Self::Two,
            0b011 => Self::Four,
            0b100 => Self::Eight,
            _ => Self::Sixteen,
        }
    }
}

/// Encoded 3-bit data rate field.
///
/// The sample rate a code selects depends on the chip, so construct it from
/// [`Ads1015Rate`] or [`Ads1115Rate`] and look the rate up through
/// [`DeviceProfile::samples_per_second`](crate::DeviceProfile::samples_per_second).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataRate(u8);

impl DataRate {
    /// Wrap a raw DR field, higher bits are discarded
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111)
    }
    /// The raw DR field
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// ADS1015 sample rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Ads1015Rate {
    /// 128 samples per second
    Sps128 = 0b000,
    /// 250 samples per second
    Sps250 = 0b001,
    /// 490 samples per second
    Sps490 = 0b010,
    /// 920 samples per second
    Sps920 = 0b011,
    /// 1600 samples per second (default)
    Sps1600 = 0b100,
    /// 2400 samples per second
    Sps2400 = 0b101,
    /// 3300 samples per second
    Sps3300 = 0b110,
}

impl From<Ads1015Rate> for DataRate {
    fn from(rate: Ads1015Rate) -> Self {
        DataRate::from_bits(rate as u8)
    }
}

/// ADS1115 sample rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Ads1115Rate {
    /// 8 samples per second
    Sps8 = 0b000,
    /// 16 samples per second
    Sps16 = 0b001,
    /// 32 samples per second
    Sps32 = 0b010,
    /// 64 samples per second
    Sps64 = 0b011,
    /// 128 samples per second (default)
    Sps128 = 0b100,
    /// 250 samples per second
    Sps250 = 0b101,
    /// 475 samples per second
    Sps475 = 0b110,
    /// 860 samples per second
    Sps860 = 0b111,
}

impl From<Ads1115Rate> for DataRate {
    fn from(rate: Ads1115Rate) -> Self {
        DataRate::from_bits(rate as u8)
    }
}

/// Input multiplexer setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mux {
    /// P = AIN0, N = AIN1
    Diff01 = 0b000,
    /// P = AIN0, N = AIN3
    Diff03 = 0b001,
    /// P = AIN1, N = AIN3
    Diff13 = 0b010,
    /// P = AIN2, N = AIN3
    Diff23 = 0b011,
    /// AIN0 against GND
    Single0 = 0b100,
    /// AIN1 against GND
    Single1 = 0b101,
    /// AIN2 against GND
    Single2 = 0b110,
    /// AIN3 against GND
    Single3 = 0b111,
}

impl Mux {
    /// Single-ended input for `channel`, `None` if the channel is not 0-3
    pub const fn single_ended(channel: u8) -> Option<Self> {
        match channel {
            0 => Some(Mux::Single0),
            1 => Some(Mux::Single1),
            2 => Some(Mux::Single2),
            3 => Some(Mux::Single3),
            _ => None,
        }
    }
}

/// Differential input pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DifferentialPair {
    /// P = AIN0, N = AIN1
    Pair01,
    /// P = AIN0, N = AIN3
    Pair03,
    /// P = AIN1, N = AIN3
    Pair13,
    /// P = AIN2, N = AIN3
    Pair23,
}

impl From<DifferentialPair> for Mux {
    fn from(pair: DifferentialPair) -> Self {
        match pair {
            DifferentialPair::Pair01 => Mux::Diff01,
            DifferentialPair::Pair03 => Mux::Diff03,
            DifferentialPair::Pair13 => Mux::Diff13,
            DifferentialPair::Pair23 => Mux::Diff23,
        }
    }
}

/// Number of conversions exceeding the threshold before ALERT/RDY asserts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ComparatorQueue {
    /// Assert after one conversion
    One = 0b00,
    /// Assert after two conversions
    Two = 0b01,
    /// Assert after four conversions
    Four = 0b10,
    /// Comparator disabled, ALERT/RDY high impedance (device default)
    Disabled = 0b11,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_positions() {
        assert_eq!(u16::from(Config::new().with_os(true)), 0x8000);
        assert_eq!(u16::from(Config::new().with_mux(Mux::Single3 as u8)), 0x7000);
        assert_eq!(u16::from(Config::new().with_pga(Gain::Sixteen as u8)), 0x0A00);
        assert_eq!(u16::from(Config::new().with_single_shot(true)), 0x0100);
        assert_eq!(
            u16::from(Config::new().with_data_rate(Ads1115Rate::Sps860 as u8)),
            0x00E0
        );
        assert_eq!(u16::from(Config::new().with_comp_window(true)), 0x0010);
        assert_eq!(u16::from(Config::new().with_comp_active_high(true)), 0x0008);
        assert_eq!(u16::from(Config::new().with_comp_latch(true)), 0x0004);
        assert_eq!(
            u16::from(Config::new().with_comp_queue(ComparatorQueue::Disabled as u8)),
            0x0003
        );
    }

    #[test]
    fn device_reset_value_decodes() {
        // Power-on value of the configuration register
        let cfg = Config::from(0x8583);
        assert!(cfg.os());
        assert_eq!(cfg.mux(), Mux::Diff01 as u8);
        assert_eq!(Gain::from(cfg.pga()), Gain::Two);
        assert!(cfg.single_shot());
        assert_eq!(
            DataRate::from_bits(cfg.data_rate()),
            DataRate::from(Ads1115Rate::Sps128)
        );
        assert_eq!(cfg.comp_queue(), ComparatorQueue::Disabled as u8);
    }

    #[test]
    fn reserved_pga_codes_select_smallest_range() {
        assert_eq!(Gain::from(0b110), Gain::Sixteen);
        assert_eq!(Gain::from(0b111), Gain::Sixteen);
    }

    #[test]
    fn single_ended_channel_guard() {
        assert_eq!(Mux::single_ended(0), Some(Mux::Single0));
        assert_eq!(Mux::single_ended(3), Some(Mux::Single3));
        assert_eq!(Mux::single_ended(4), None);
        assert_eq!(Mux::single_ended(255), None);
    }

    #[test]
    fn full_scale_table() {
        assert_eq!(Gain::TwoThirds.full_scale_range(), 6.144);
        assert_eq!(Gain::Two.full_scale_range(), 2.048);
        assert_eq!(Gain::Sixteen.full_scale_range(), 0.256);
    }
}
