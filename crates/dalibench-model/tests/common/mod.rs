#![allow(dead_code)]

use dalibench::{Bench, BenchConfig, DaliLink, MemoryLink, SETUP_BYTES};
use dalibench_model::ControlGear;

/// 10 cycles per bit keeps scripted waveforms short.
pub fn fast_config() -> BenchConfig {
    BenchConfig::from_toml("clock_hz = 24000\nbit_rate = 2400\n").unwrap()
}

/// A bench whose model has been reset and served its full startup
/// configuration fetch, ready to answer queries.
pub fn provisioned_bench() -> Bench<ControlGear> {
    let config = fast_config();
    let gear = ControlGear::new(config.bit_time().unwrap());
    let mut bench = Bench::new(gear, &config).unwrap();
    let dali = DaliLink::bind(&bench).unwrap();
    let memory = MemoryLink::bind(&bench).unwrap();

    bench.pulse_reset();
    dali.idle(&mut bench);
    bench.cycle_clock();
    for addr in 0..SETUP_BYTES {
        memory.write_address(&mut bench, addr).unwrap();
    }
    bench.wait_bit_time();
    bench
}
