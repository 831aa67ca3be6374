use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("adc channel {0} unavailable")]
    AdcUnavailable(u8),
}
