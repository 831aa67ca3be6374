//! Session execution: hardware assembly, host-side wiring and the
//! operator-facing summary.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel as xch;
use eyre::{Result, WrapErr, bail};
use tracing::{error, info};

use glove_core::protocol::{OP_SET_RESISTANCE, OP_START, OP_STOP};
use glove_core::{GloveCore, ResistanceLevel, TelemetryDecoder, TelemetryFrame, TimingCfg};
use glove_hardware::wire::{SerialWire, TickTimer};
use glove_hardware::{SimulatedAdc, SimulatedMotorDriver};

use crate::cli::JSON_MODE;

fn sim_adc(cfg: &glove_config::Config, timing: &TimingCfg) -> SimulatedAdc {
    // One wave step per control cycle; convert the configured period
    // from milliseconds to cycles.
    let period = (cfg.sim.flex_period_ms * u64::from(timing.loop_hz) / 1000).max(2);
    SimulatedAdc::new(
        cfg.sim.midpoint,
        cfg.sim.amplitude,
        u32::try_from(period).unwrap_or(u32::MAX),
    )
}

pub fn run_session(
    cfg: &glove_config::Config,
    secs: u64,
    level: Option<u8>,
    stats: bool,
    shutdown: &Arc<AtomicBool>,
) -> Result<()> {
    let requested = level.unwrap_or(cfg.session.default_level);
    let level = ResistanceLevel::try_from(requested)
        .map_err(|v| eyre::eyre!("resistance level {v} out of range (1..=5)"))?;

    let timing = TimingCfg::from(&cfg.timing);
    let driver = SimulatedMotorDriver::new();
    let view = driver.view();
    let mut core = GloveCore::builder()
        .with_adc(sim_adc(cfg, &timing))
        .with_motors(driver)
        .with_timing(timing)
        .build()
        .wrap_err("failed to assemble control core")?;

    let (to_host, host_rx) = xch::unbounded();
    let (host_tx, from_host) = xch::unbounded();
    let _wire = SerialWire::spawn(
        core.transport(),
        to_host,
        from_host,
        Duration::from_micros(500),
    );
    let _timer = TickTimer::spawn(core.tick_handle(), timing.tick_hz);

    info!(level = level.as_u8(), duty = level.duty(), secs, "starting session");
    for byte in [OP_SET_RESISTANCE, level.as_u8(), OP_START] {
        host_tx
            .send(byte)
            .wrap_err("serial wire went away before the session started")?;
    }

    let started = Instant::now();
    let deadline = started + Duration::from_secs(secs);
    let mut decoder = TelemetryDecoder::new();
    let mut readings: u64 = 0;
    let mut faulted = None;
    let mut last_stat = started;

    while !shutdown.load(Ordering::Acquire) && Instant::now() < deadline {
        core.step()?;
        while let Ok(byte) = host_rx.try_recv() {
            match decoder.push(byte) {
                Some(TelemetryFrame::Reading { .. }) => readings += 1,
                Some(TelemetryFrame::MotorFault(motor)) => {
                    error!(motor = motor.index(), "device reported a motor fault");
                    faulted = Some(motor);
                }
                None => {}
            }
        }
        if faulted.is_some() {
            break;
        }
        if stats && last_stat.elapsed() >= Duration::from_secs(1) {
            info!(readings, "telemetry so far");
            last_stat = Instant::now();
        }
    }

    // Stop the exercise and let the device process it.
    let _ = host_tx.send(OP_STOP);
    core.step()?;
    shutdown.store(true, Ordering::Release);

    let elapsed = started.elapsed();
    if *JSON_MODE.get().unwrap_or(&false) {
        let summary = serde_json::json!({
            "event": "session_summary",
            "level": level.as_u8(),
            "elapsed_ms": elapsed.as_millis() as u64,
            "readings": readings,
            "fault": faulted.map(|m| m.index()),
            "motors_enabled": view.enabled(),
        });
        println!("{summary}");
    } else {
        println!(
            "session complete: level {} | {} telemetry readings in {:.1}s",
            level.as_u8(),
            readings,
            elapsed.as_secs_f32()
        );
    }
    if let Some(motor) = faulted {
        bail!("session aborted by motor fault on channel {}", motor.index());
    }
    Ok(())
}

/// Assemble the simulated stack and run a handful of cycles.
pub fn self_check(cfg: &glove_config::Config) -> Result<()> {
    let timing = TimingCfg::from(&cfg.timing);
    let driver = SimulatedMotorDriver::new();
    let view = driver.view();
    let mut core = GloveCore::builder()
        .with_adc(sim_adc(cfg, &timing))
        .with_motors(driver)
        .with_timing(TimingCfg {
            stabilize_iters: 0,
            ..timing
        })
        .build()
        .wrap_err("failed to assemble control core")?;

    for _ in 0..5 {
        core.step()?;
    }
    if !view.enabled() {
        bail!("driver stage did not enable");
    }
    info!("self-check passed");
    println!("ok");
    Ok(())
}
