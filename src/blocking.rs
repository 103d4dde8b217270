//! Blocking driver
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::common::{encode, RegisterWrite, Settings};
use crate::config::{Config, DataRate, DifferentialPair, Gain, Mux};
use crate::conversion::{decode, to_count, to_volts};
use crate::{Address, DeviceProfile, Error, Register};

/// ADS1015/ADS1115 on a blocking I2C bus
pub struct Ads1x15<I2C> {
    i2c: I2C,
    settings: Settings,
}

impl<I2C, E> Ads1x15<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Create a new driver for the chip described by `profile`.
    ///
    /// No bus traffic happens until the first reading is requested. Gain
    /// starts at ±6.144V and the data rate at the profile default.
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

    /// Read a single-ended channel, blocking until the conversion is done.
    ///
    /// Channels outside 0-3 return 0 without touching the bus.
    /// > The status bit is polled without a bound, a device that never
    /// > finishes hangs this call. See [`Self::read_single_ended_timeout`].
    pub fn read_single_ended(&mut self, channel: u8) -> Result<i16, Error<E>> {
        let Some(mux) = Mux::single_ended(channel) else {
            return Ok(0);
        };
        self.read(mux)
    }

    /// Read a differential pair, blocking until the conversion is done
    pub fn read_differential(&mut self, pair: DifferentialPair) -> Result<i16, Error<E>> {
        self.read(pair.into())
    }

    /// Like [`Self::read_single_ended`], giving up with [`Error::Timeout`]
    /// once `timeout_us` has passed.
    pub fn read_single_ended_timeout<D: DelayNs>(
        &mut self,
        channel: u8,
        delay: &mut D,
        timeout_us: u32,
    ) -> Result<i16, Error<E>> {
        let Some(mux) = Mux::single_ended(channel) else {
            return Ok(0);
        };
        self.start_reading(mux, false)?;
        self.wait_for_conversion(delay, timeout_us)?;
        self.last_conversion_result()
    }

    /// Like [`Self::read_differential`], giving up with [`Error::Timeout`]
    /// once `timeout_us` has passed.
    pub fn read_differential_timeout<D: DelayNs>(
        &mut self,
        pair: DifferentialPair,
        delay: &mut D,
        timeout_us: u32,
    ) -> Result<i16, Error<E>> {
        self.start_reading(pair.into(), false)?;
        self.wait_for_conversion(delay, timeout_us)?;
        self.last_conversion_result()
    }

    /// Start a single-ended reading without waiting for it.
    ///
    /// Channels outside 0-3 are ignored.
    pub fn start_single_ended_reading(
        &mut self,
        channel: u8,
        continuous: bool,
    ) -> Result<(), Error<E>> {
        match Mux::single_ended(channel) {
            Some(mux) => self.start_reading(mux, continuous),
            None => Ok(()),
        }
    }

    /// Start a differential reading without waiting for it
    pub fn start_differential_reading(
        &mut self,
        pair: DifferentialPair,
        continuous: bool,
    ) -> Result<(), Error<E>> {
        self.start_reading(pair.into(), continuous)
    }

    /// Arm a latching comparator on a single-ended channel.
    ///
    /// The device converts continuously and pulls ALERT/RDY low once a
    /// conversion exceeds `threshold` (in counts). The threshold is clamped
    /// to the chip's range. Channels outside 0-3 are ignored.
    pub fn start_comparator_single_ended(
        &mut self,
        channel: u8,
        threshold: i16,
    ) -> Result<(), Error<E>> {
        let Some(mux) = Mux::single_ended(channel) else {
            return Ok(());
        };
        let writes = self.settings.arm_comparator(mux, threshold);
        self.write_all(&writes)
    }

    /// Check whether the device finished its conversion
    pub fn conversion_complete(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_config()?.os())
    }

    /// Poll until the current conversion finishes or `timeout_us` passes.
    ///
    /// Sleeps a quarter of a conversion period between polls. A timeout of
    /// zero polls once.
    pub fn wait_for_conversion<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_us: u32,
    ) -> Result<(), Error<E>> {
        let step = self.settings.poll_interval_us();
        let mut waited: u32 = 0;
        loop {
            if self.conversion_complete()? {
                return Ok(());
            }
            if waited >= timeout_us {
                return Err(Error::Timeout);
            }
            delay.delay_us(step);
            waited = waited.saturating_add(step);
        }
    }

    /// Read the last conversion result in counts
    pub fn last_conversion_result(&mut self) -> Result<i16, Error<E>> {
        let raw = self.read_register(Register::Conversion)?;
        Ok(decode(raw, self.settings.profile.resolution_shift()))
    }

    /// Read back the configuration register
    pub fn read_config(&mut self) -> Result<Config, Error<E>> {
        self.read_register(Register::Config).map(Config::from)
    }

    /// Convert a count into volts at the current gain
    pub fn compute_volts(&self, count: i16) -> f32 {
        to_volts(count, self.settings.gain, self.settings.profile.resolution_shift())
    }

    /// Convert volts into a count at the current gain, saturating at the
    /// `i16` limits
    pub fn compute_count(&self, volts: f32) -> i16 {
        to_count(volts, self.settings.gain, self.settings.profile.resolution_shift())
    }

    fn read(&mut self, mux: Mux) -> Result<i16, Error<E>> {
        self.start_reading(mux, false)?;
        while !self.conversion_complete()? {}
        self.last_conversion_result()
    }

    fn start_reading(&mut self, mux: Mux, continuous: bool) -> Result<(), Error<E>> {
        let writes = self.settings.start_reading(mux, continuous);
        self.write_all(&writes)
    }

    fn write_all(&mut self, writes: &[RegisterWrite]) -> Result<(), Error<E>> {
        for &write in writes {
            self.write_register(write)?;
        }
        Ok(())
    }

    fn write_register(&mut self, write: RegisterWrite) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("write {} = {=u16:#x}", write.0, write.1);
        self.i2c
            .write(self.settings.address, &encode(write))
            .map_err(Error::I2c)
    }

    fn read_register(&mut self, reg: Register) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.settings.address, &[reg as u8], &mut buf)
            .map_err(Error::I2c)?;
        let value = u16::from_be_bytes(buf);
        #[cfg(feature = "defmt")]
        defmt::trace!("read {} = {=u16:#x}", reg, value);
        Ok(value)
    }
}
