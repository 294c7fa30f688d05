use crate::BenchError;
use serde::Deserialize;

/// Timing configuration for a bench run.
///
/// The defaults reproduce the reference startup trace: a 1 MHz device
/// clock driving a 2400 bit/s DALI line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Device clock frequency in Hz. One full clock period is two
    /// half-cycle steps of the model.
    pub clock_hz: u64,
    /// DALI line bit rate in bits per second.
    pub bit_rate: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            clock_hz: 1_000_000,
            bit_rate: 2400,
        }
    }
}

impl BenchConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, BenchError> {
        toml::from_str(text).map_err(|e| BenchError::Config(e.to_string()))
    }

    /// Clock cycles per protocol bit period.
    ///
    /// A zero or out-of-range bit rate is a configuration error, not a
    /// runtime fault: the quotient must be at least one for the bench to
    /// be able to express a bit period at all.
    pub fn bit_time(&self) -> Result<u32, BenchError> {
        if self.bit_rate == 0 {
            return Err(BenchError::Config("bit_rate must be non-zero".into()));
        }
        let quotient = self.clock_hz / u64::from(self.bit_rate);
        if quotient == 0 {
            return Err(BenchError::Config(format!(
                "bit rate {} exceeds the clock frequency {}",
                self.bit_rate, self.clock_hz
            )));
        }
        u32::try_from(quotient)
            .map_err(|_| BenchError::Config("bit period does not fit in a cycle counter".into()))
    }
}
