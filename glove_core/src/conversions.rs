//! `From` implementations bridging `glove_config` types to `glove_core` types.

use crate::config::TimingCfg;

impl From<&glove_config::Timing> for TimingCfg {
    fn from(t: &glove_config::Timing) -> Self {
        Self {
            loop_hz: t.loop_hz,
            tick_hz: t.tick_hz,
            pulse_ms: t.pulse_ms,
            stabilize_iters: t.stabilize_iters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_timing_maps_field_for_field() {
        let file = glove_config::Timing {
            loop_hz: 50,
            tick_hz: 244,
            pulse_ms: 250,
            stabilize_iters: 10,
        };
        let cfg = TimingCfg::from(&file);
        assert_eq!(cfg.loop_hz, 50);
        assert_eq!(cfg.tick_hz, 244);
        assert_eq!(cfg.pulse_ms, 250);
        assert_eq!(cfg.stabilize_iters, 10);
    }
}
