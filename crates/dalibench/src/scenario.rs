use crate::{Bench, BenchError, DaliLink, Device, MemoryLink};

/// Number of configuration bytes the device fetches from the FRAM at
/// startup.
pub const SETUP_BYTES: u16 = 25;

/// One scripted command/response pair of the acceptance scenario.
#[derive(Debug, Clone, Copy)]
pub struct QueryVector {
    pub name: &'static str,
    pub command: u16,
    pub response: u8,
}

const fn vector(name: &'static str, command: u16, response: u8) -> QueryVector {
    QueryVector {
        name,
        command,
        response,
    }
}

/// The fixed query script. Every expected byte is a fixture of the
/// reference configuration image the provisioning phase installs
/// (byte `addr + 5` at each FRAM address), preserved verbatim.
pub const STARTUP_QUERIES: &[QueryVector] = &[
    vector("Query Max Level", 0b1111_1111_1010_0001, 5),
    vector("Query Min Level", 0b1111_1111_1010_0010, 6),
    vector("Query Power-On Level", 0b1111_1111_1010_0011, 8),
    vector("Query System Failure Level", 0b1111_1111_1010_0100, 7),
    vector("Query Fade Time/Rate", 0b1111_1111_1010_0101, 0x9a),
    vector("Query Scene 0 Level", 0b1111_1111_1011_0000, 0x0b),
    vector("Query Scene 1 Level", 0b1111_1111_1011_0001, 0x0c),
    vector("Query Scene 2 Level", 0b1111_1111_1011_0010, 0x0d),
    vector("Query Scene 3 Level", 0b1111_1111_1011_0011, 0x0e),
    vector("Query Scene 4 Level", 0b1111_1111_1011_0100, 0x0f),
    vector("Query Scene 5 Level", 0b1111_1111_1011_0101, 0x10),
    vector("Query Scene 6 Level", 0b1111_1111_1011_0110, 0x11),
    vector("Query Scene 7 Level", 0b1111_1111_1011_0111, 0x12),
    vector("Query Scene 8 Level", 0b1111_1111_1011_1000, 0x13),
    vector("Query Scene 9 Level", 0b1111_1111_1011_1001, 0x14),
    vector("Query Scene 10 Level", 0b1111_1111_1011_1010, 0x15),
    vector("Query Scene 11 Level", 0b1111_1111_1011_1011, 0x16),
    vector("Query Scene 12 Level", 0b1111_1111_1011_1100, 0x17),
    vector("Query Scene 13 Level", 0b1111_1111_1011_1101, 0x18),
    vector("Query Scene 14 Level", 0b1111_1111_1011_1110, 0x19),
    vector("Query Scene 15 Level", 0b1111_1111_1011_1111, 0x1a),
    vector("Query Groups 0-7", 0b1111_1111_1100_0000, 0x1b),
    vector("Query Groups 8-15", 0b1111_1111_1100_0001, 0x1c),
    vector("Query Short Address", 0b1011_1011_0000_0000, 0x1d),
];

/// Run the complete startup acceptance scenario.
///
/// Power-up and reset, serve the 25 FRAM configuration fetches, then
/// issue every scripted query and assert its exact response byte. The
/// scenario is one atomic conformance check: the first violation anywhere
/// aborts it, with no partial-pass notion.
pub fn run_startup<D: Device>(bench: &mut Bench<D>) -> Result<(), BenchError> {
    let dali = DaliLink::bind(bench)?;
    let memory = MemoryLink::bind(bench)?;

    log::info!("scenario: power-up reset");
    bench.pulse_reset();
    dali.idle(bench);
    bench.cycle_clock();

    log::info!("scenario: provisioning {SETUP_BYTES} configuration bytes");
    for addr in 0..SETUP_BYTES {
        memory.write_address(bench, addr)?;
        bench.flush_trace()?;
    }
    bench.wait_bit_time();

    log::info!("scenario: issuing {} queries", STARTUP_QUERIES.len());
    for query in STARTUP_QUERIES {
        dali.send_command(bench, query.command);
        let response = dali.recv_response(bench)?;
        if response != query.response {
            return Err(bench.violation(
                query.name,
                u64::from(query.response),
                u64::from(response),
            ));
        }
        bench.flush_trace()?;
    }
    bench.wait_bit_time();
    bench.flush_trace()?;

    log::info!("scenario: conformance check passed");
    Ok(())
}
