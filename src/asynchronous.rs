//! Async driver
//!
//! Same register protocol as [`crate::blocking`], on top of
//! `embedded-hal-async`. The unbounded [`Ads1x15::read_single_ended`] polls
//! without yielding to a timer; prefer the `_timeout` variants on executors
//! that share the core.
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::common::{encode, RegisterWrite, Settings};
use crate::config::{Config, DataRate, DifferentialPair, Gain, Mux};
use crate::conversion::{decode, to_count, to_volts};
use crate::{Address, DeviceProfile, Error, Register};

/// ADS1015/ADS1115 on an async I2C bus
pub struct Ads1x15<I2C> {
    i2c: I2C,
    settings: Settings,
}

impl<I2C, E> Ads1x15<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Create a new driver for the chip described by `profile`
    pub fn new(i2c: I2C, address: Address, profile: DeviceProfile) -> Self {
        Self {
            i2c,
            settings: Settings::new(address.into(), profile),
        }
    }

    /// Create a new ADS1015 (12-bit) driver at the default address
    pub fn new_ads1015(i2c: I2C) -> Self {
        Self::new(i2c, Address::default(), DeviceProfile::ADS1015)
    }

    /// Create a new ADS1115 (16-bit) driver at the default address
    pub fn new_ads1115(i2c: I2C) -> Self {
        Self::new(i2c, Address::default(), DeviceProfile::ADS1115)
    }

    /// Destroy the driver and return the I2C bus
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Change the I2C address used for all further accesses
    pub fn set_address(&mut self, address: Address) {
        self.settings.address = address.into();
    }

    /// Current 7-bit I2C address
    pub fn address(&self) -> u8 {
        self.settings.address
    }

    /// Chip profile chosen at construction
    pub fn profile(&self) -> DeviceProfile {
        self.settings.profile
    }

    /// Set the programmable gain amplifier used by the next reading
    pub fn set_gain(&mut self, gain: Gain) {
        self.settings.gain = gain;
    }

    /// Current gain
    pub fn gain(&self) -> Gain {
        self.settings.gain
    }

    /// Set the data rate used by the next reading
    pub fn set_data_rate(&mut self, rate: impl Into<DataRate>) {
        self.settings.rate = rate.into();
    }

    /// Current data rate
    pub fn data_rate(&self) -> DataRate {
        self.settings.rate
    }

    /// Duration of one conversion at the current data rate
    pub fn conversion_time_us(&self) -> u32 {
        self.settings.conversion_time_us()
    }

    /// Read a single-ended channel, waiting until the conversion is done.
    ///
    /// Channels outside 0-3 return 0 without touching the bus.
    pub async fn read_single_ended(&mut self, channel: u8) -> Result<i16, Error<E>> {
        let Some(mux) = Mux::single_ended(channel) else {
            return Ok(0);
        };
        self.read(mux).await
    }

    /// Read a differential pair, waiting until the conversion is done
    pub async fn read_differential(&mut self, pair: DifferentialPair) -> Result<i16, Error<E>> {
        self.read(pair.into()).await
    }

    /// Like [`Self::read_single_ended`], giving up with [`Error::Timeout`]
    /// once `timeout_us` has passed.
    pub async fn read_single_ended_timeout<D: DelayNs>(
        &mut self,
        channel: u8,
        delay: &mut D,
        timeout_us: u32,
    ) -> Result<i16, Error<E>> {
        let Some(mux) = Mux::single_ended(channel) else {
            return Ok(0);
        };
        self.start_reading(mux, false).await?;
        self.wait_for_conversion(delay, timeout_us).await?;
        self.last_conversion_result().await
    }

    /// Like [`Self::read_differential`], giving up with [`Error::Timeout`]
    /// once `timeout_us` has passed.
    pub async fn read_differential_timeout<D: DelayNs>(
        &mut self,
        pair: DifferentialPair,
        delay: &mut D,
        timeout_us: u32,
    ) -> Result<i16, Error<E>> {
        self.start_reading(pair.into(), false).await?;
        self.wait_for_conversion(delay, timeout_us).await?;
        self.last_conversion_result().await
    }

    /// Start a single-ended reading without waiting for it.
    ///
    /// Channels outside 0-3 are ignored.
    pub async fn start_single_ended_reading(
        &mut self,
        channel: u8,
        continuous: bool,
    ) -> Result<(), Error<E>> {
        match Mux::single_ended(channel) {
            Some(mux) => self.start_reading(mux, continuous).await,
            None => Ok(()),
        }
    }

    /// Start a differential reading without waiting for it
    pub async fn start_differential_reading(
        &mut self,
        pair: DifferentialPair,
        continuous: bool,
    ) -> Result<(), Error<E>> {
        self.start_reading(pair.into(), continuous).await
    }

    /// Arm a latching comparator on a single-ended channel, see
    /// [`crate::blocking::Ads1x15::start_comparator_single_ended`]
    pub async fn start_comparator_single_ended(
        &mut self,
        channel: u8,
        threshold: i16,
    ) -> Result<(), Error<E>> {
        let Some(mux) = Mux::single_ended(channel) else {
            return Ok(());
        };
        let writes = self.settings.arm_comparator(mux, threshold);
        self.write_all(&writes).await
    }

    /// Check whether the device finished its conversion
    pub async fn conversion_complete(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_config().await?.os())
    }

    /// Poll until the current conversion finishes or `timeout_us` passes
    pub async fn wait_for_conversion<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_us: u32,
    ) -> Result<(), Error<E>> {
        let step = self.settings.poll_interval_us();
        let mut waited: u32 = 0;
        loop {
            if self.conversion_complete().await? {
                return Ok(());
            }
            if waited >= timeout_us {
                return Err(Error::Timeout);
            }
            delay.delay_us(step).await;
            waited = waited.saturating_add(step);
        }
    }

    /// Read the last conversion result in counts
    pub async fn last_conversion_result(&mut self) -> Result<i16, Error<E>> {
        let raw = self.read_register(Register::Conversion).await?;
        Ok(decode(raw, self.settings.profile.resolution_shift()))
    }

    /// Read back the configuration register
    pub async fn read_config(&mut self) -> Result<Config, Error<E>> {
        self.read_register(Register::Config).await.map(Config::from)
    }

    /// Convert a count into volts at the current gain
    pub fn compute_volts(&self, count: i16) -> f32 {
        to_volts(count, self.settings.gain, self.settings.profile.resolution_shift())
    }

    /// Convert volts into a count at the current gain
    pub fn compute_count(&self, volts: f32) -> i16 {
        to_count(volts, self.settings.gain, self.settings.profile.resolution_shift())
    }

    async fn read(&mut self, mux: Mux) -> Result<i16, Error<E>> {
        self.start_reading(mux, false).await?;
        while !self.conversion_complete().await? {}
        self.last_conversion_result().await
    }

    async fn start_reading(&mut self, mux: Mux, continuous: bool) -> Result<(), Error<E>> {
        let writes = self.settings.start_reading(mux, continuous);
        self.write_all(&writes).await
    }

    async fn write_all(&mut self, writes: &[RegisterWrite]) -> Result<(), Error<E>> {
        for &write in writes {
            #[cfg(feature = "defmt")]
            defmt::trace!("write {} = {=u16:#x}", write.0, write.1);
            self.i2c
                .write(self.settings.address, &encode(write))
                .await
                .map_err(Error::I2c)?;
        }
        Ok(())
    }

    async fn read_register(&mut self, reg: Register) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.settings.address, &[reg as u8], &mut buf)
            .await
            .map_err(Error::I2c)?;
        let value = u16::from_be_bytes(buf);
        #[cfg(feature = "defmt")]
        defmt::trace!("read {} = {=u16:#x}", reg, value);
        Ok(value)
    }
}
