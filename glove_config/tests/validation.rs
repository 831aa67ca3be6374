use glove_config::load_toml;
use rstest::rstest;

#[test]
fn rejects_zero_loop_hz() {
    let toml = r#"
[timing]
loop_hz = 0
tick_hz = 122
pulse_ms = 500
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject loop_hz=0");
    assert!(format!("{err}").contains("timing.loop_hz must be > 0"));
}

#[rstest]
#[case(0, "default_level must be in [1, 5]")]
#[case(6, "default_level must be in [1, 5]")]
fn rejects_out_of_range_default_level(#[case] level: u8, #[case] msg: &str) {
    let toml = format!("[session]\ndefault_level = {level}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject level");
    assert!(format!("{err}").contains(msg));
}

#[test]
fn rejects_sim_wave_leaving_ten_bits() {
    let toml = r#"
[sim]
midpoint = 900
amplitude = 200
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("peak exceeds 10-bit range");
    assert!(format!("{err}").contains("sim.midpoint + sim.amplitude"));
}

#[test]
fn accepts_full_config() {
    let toml = r#"
[logging]
file = "glove.log"
level = "debug"

[timing]
loop_hz = 100
tick_hz = 122
pulse_ms = 500
stabilize_iters = 255

[session]
default_level = 3

[sim]
flex_period_ms = 2000
amplitude = 150
midpoint = 500
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("config validates");
    assert_eq!(cfg.session.default_level, 3);
    assert_eq!(cfg.logging.file.as_deref(), Some("glove.log"));
}

#[test]
fn unknown_keys_are_tolerated() {
    // Forward compatibility: extra sections parse without error.
    let toml = r#"
[timing]
loop_hz = 100

[future_section]
knob = 1
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("config validates");
}
