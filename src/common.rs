use crate::config::{ComparatorQueue, Config, DataRate, Gain, Mux};
use crate::conversion::threshold_register;
use crate::{DeviceProfile, Register};

/// A single 16-bit register write
pub(crate) type RegisterWrite = (Register, u16);

/// HI_THRESH MSB set and LO_THRESH MSB clear turn ALERT/RDY into a
/// conversion ready output.
const RDY_HI_THRESH: u16 = 0x8000;
const RDY_LO_THRESH: u16 = 0x0000;
/// Chip default, the latched comparator only deasserts on a latch clear.
const COMPARATOR_LO_THRESH: u16 = 0x8000;

/// Runtime state shared by the blocking and async drivers
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settings {
    pub(crate) profile: DeviceProfile,
    pub(crate) address: u8,
    pub(crate) gain: Gain,
    pub(crate) rate: DataRate,
}

impl Settings {
    pub(crate) fn new(address: u8, profile: DeviceProfile) -> Self {
        Self {
            profile,
            address,
            gain: Gain::TwoThirds,
            rate: profile.default_rate(),
        }
    }

    /// Configuration word that starts a conversion on `mux`
    pub(crate) fn reading_config(&self, mux: Mux, continuous: bool) -> Config {
        Config::new()
            // any queue setting but Disabled keeps ALERT/RDY in ready mode
            .with_comp_queue(ComparatorQueue::One as u8)
            .with_comp_latch(false)
            .with_comp_active_high(false)
            .with_comp_window(false)
            .with_single_shot(!continuous)
            .with_pga(self.gain as u8)
            .with_data_rate(self.rate.bits())
            .with_mux(mux as u8)
            .with_os(true)
    }

    /// Configuration word for a latching, active low, traditional comparator
    /// converting continuously on `mux`
    pub(crate) fn comparator_config(&self, mux: Mux) -> Config {
        Config::new()
            .with_comp_queue(ComparatorQueue::One as u8)
            .with_comp_latch(true)
            .with_comp_active_high(false)
            .with_comp_window(false)
            .with_single_shot(false)
            .with_pga(self.gain as u8)
            .with_data_rate(self.rate.bits())
            .with_mux(mux as u8)
    }

    /// Register writes that start a reading, in bus order
    pub(crate) fn start_reading(&self, mux: Mux, continuous: bool) -> [RegisterWrite; 3] {
        [
            (Register::HiThresh, RDY_HI_THRESH),
            (Register::LoThresh, RDY_LO_THRESH),
            (
                Register::Config,
                self.reading_config(mux, continuous).into(),
            ),
        ]
    }

    /// Register writes that arm the comparator, in bus order.
    ///
    /// The thresholds must be written before the configuration.
    pub(crate) fn arm_comparator(&self, mux: Mux, threshold: i16) -> [RegisterWrite; 3] {
        [
            (Register::LoThresh, COMPARATOR_LO_THRESH),
            (
                Register::HiThresh,
                threshold_register(threshold, self.profile.resolution_shift()),
            ),
            (Register::Config, self.comparator_config(mux).into()),
        ]
    }

    /// One conversion period in microseconds, rounded up
    pub(crate) fn conversion_time_us(&self) -> u32 {
        let sps = self.profile.samples_per_second(self.rate) as u32;
        1_000_000u32.div_ceil(sps)
    }

    /// Sleep between two status polls
    pub(crate) fn poll_interval_us(&self) -> u32 {
        (self.conversion_time_us() / 4).max(1)
    }
}

/// Serialize a register write as it goes on the bus
pub(crate) fn encode((reg, value): RegisterWrite) -> [u8; 3] {
    [reg as u8, (value >> 8) as u8, value as u8]
}
