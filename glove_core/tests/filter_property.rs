use glove_core::SignalFilter;
use glove_core::filter::ADC_MAX;
use glove_traits::Potentiometer;
use proptest::prelude::*;

proptest! {
    /// No input sequence can push the displayed value past 10 bits.
    #[test]
    fn output_never_leaves_ten_bits(raws in proptest::collection::vec(any::<u16>(), 1..200)) {
        let mut filter = SignalFilter::new();
        for raw in raws {
            filter.update_pot(Potentiometer::Ring1, raw);
            prop_assert!(filter.pot(Potentiometer::Ring1) <= ADC_MAX);
        }
    }

    /// Repeated updates with the same raw value keep moving the output
    /// toward it: the display-resolution distance never grows by more
    /// than the one count of fixed-point quantization, and after enough
    /// steps the output settles within one count of the input.
    #[test]
    fn updates_contract_toward_the_target(
        seed in proptest::collection::vec(0u16..=0x03FF, 0..50),
        raw in 0u16..=0x03FF,
    ) {
        let mut filter = SignalFilter::new();
        for s in seed {
            filter.update_pot(Potentiometer::Index2, s);
        }
        let mut dist = i32::from(filter.pot(Potentiometer::Index2)).abs_diff(i32::from(raw));
        for _ in 0..200 {
            filter.update_pot(Potentiometer::Index2, raw);
            let now = i32::from(filter.pot(Potentiometer::Index2)).abs_diff(i32::from(raw));
            prop_assert!(now <= dist + 1, "distance grew from {dist} to {now}");
            dist = now;
        }
        prop_assert!(dist <= 1, "settled {dist} counts away from the input");
    }
}
