#![allow(dead_code)]

use std::sync::Once;

use danci_adaptive::{ResponseObservation, ResponseSimulator};
use tracing_subscriber::{fmt, EnvFilter};

static TRACING: Once = Once::new();

/// Route library logs through the test harness; `RUST_LOG=danci_adaptive=debug` to see them
pub fn init_tracing() {
    TRACING.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

pub fn obs(difficulty: f64, correct: bool) -> ResponseObservation {
    ResponseObservation::new(difficulty, correct, 2000)
}

pub fn simulated_window(theta: f64, seed: u64, count: usize) -> Vec<ResponseObservation> {
    ResponseSimulator::new(theta, seed).session(count, -3.0, 3.0)
}
