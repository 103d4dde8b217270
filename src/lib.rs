//! Driver for the Texas Instruments ADS1015 (12-bit) and ADS1115 (16-bit)
//! I2C analog to digital converters.
//!
//! Both chips share one register map and differ only in resolution and
//! available sample rates, so a single driver type serves both, selected by
//! a [`DeviceProfile`] at construction.
//!
//! ```
//! # use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
//! # let i2c = Mock::new(&[
//! #     Transaction::write(0x48, vec![0x03, 0x80, 0x00]),
//! #     Transaction::write(0x48, vec![0x02, 0x00, 0x00]),
//! #     Transaction::write(0x48, vec![0x01, 0xC3, 0x80]),
//! #     Transaction::write_read(0x48, vec![0x01], vec![0x80, 0x00]),
//! #     Transaction::write_read(0x48, vec![0x00], vec![0x40, 0x00]),
//! # ]);
//! use ads1x15::{Ads1x15, Gain};
//!
//! let mut adc = Ads1x15::new_ads1015(i2c);
//! adc.set_gain(Gain::One);
//! let count = adc.read_single_ended(0).unwrap();
//! assert_eq!(count, 1024);
//! assert_eq!(adc.compute_volts(count), 2.048);
//! # adc.destroy().done();
//! ```
//!
//! # Features
//!
//! - **`defmt`**: [`defmt::Format`] implementations on all public types and
//!   trace logging of every register access.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![no_std]

pub mod asynchronous;
pub mod blocking;
mod common;
mod config;
pub mod conversion;

pub use blocking::Ads1x15;
pub use config::{
    Ads1015Rate, Ads1115Rate, ComparatorQueue, Config, DataRate, DifferentialPair, Gain, Mux,
};

/// Default 7-bit I2C address, ADDR pin tied to GND
pub const DEFAULT_ADDRESS: u8 = 0x48;

/// Errors for this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C communication error
    I2c(E),
    /// The conversion did not complete within the requested timeout
    Timeout,
}

/// Register address space of the device. Every register is 16 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Last conversion result
    Conversion = 0x00,
    /// Configuration, see [`Config`]
    Config = 0x01,
    /// Comparator low threshold
    LoThresh = 0x02,
    /// Comparator high threshold
    HiThresh = 0x03,
}

/// I2C address selected by the ADDR pin strapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// ADDR tied to GND (default)
    #[default]
    Gnd,
    /// ADDR tied to VDD
    Vdd,
    /// ADDR tied to SDA
    Sda,
    /// ADDR tied to SCL
    Scl,
    /// Any other address, only the low 7 bits are used
    Custom(u8),
}

impl From<Address> for u8 {
    fn from(address: Address) -> Self {
        match address {
            Address::Gnd => DEFAULT_ADDRESS,
            Address::Vdd => 0x49,
            Address::Sda => 0x4A,
            Address::Scl => 0x4B,
            Address::Custom(addr) => addr & 0x7F,
        }
    }
}

/// Immutable parameters of one chip variant.
///
/// Only the [`DeviceProfile::ADS1015`] and [`DeviceProfile::ADS1115`]
/// profiles exist, so the shift is always below 16 and no sample rate is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceProfile {
    resolution_shift: u8,
    default_rate: DataRate,
    sample_rates: [u16; 8],
}

impl DeviceProfile {
    /// ADS1015: 12-bit results, 1600 SPS default
    pub const ADS1015: Self = Self {
        resolution_shift: 4,
        default_rate: DataRate::from_bits(Ads1015Rate::Sps1600 as u8),
        sample_rates: [128, 250, 490, 920, 1600, 2400, 3300, 3300],
    };

    /// ADS1115: 16-bit results, 128 SPS default
    pub const ADS1115: Self = Self {
        resolution_shift: 0,
        default_rate: DataRate::from_bits(Ads1115Rate::Sps128 as u8),
        sample_rates: [8, 16, 32, 64, 128, 250, 475, 860],
    };

    /// Number of unused low bits in the 16-bit result and threshold registers
    pub const fn resolution_shift(&self) -> u8 {
        self.resolution_shift
    }

    /// Data rate selected at construction
    pub const fn default_rate(&self) -> DataRate {
        self.default_rate
    }

    /// Sample rate selected by `rate` on this chip
    pub const fn samples_per_second(&self, rate: DataRate) -> u16 {
        self.sample_rates[rate.bits() as usize]
    }

    /// Largest count a conversion can report
    pub const fn max_count(&self) -> i16 {
        i16::MAX >> self.resolution_shift
    }

    /// Smallest count a conversion can report
    pub const fn min_count(&self) -> i16 {
        i16::MIN >> self.resolution_shift
    }
}
