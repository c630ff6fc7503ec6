#![no_main]
use libfuzzer_sys::fuzz_target;
use pitune_config::LogFormat;

fuzz_target!(|data: &[u8]| {
    // Any accepted log must analyze and replay without panicking.
    if let Ok(series) = pitune_core::read_series(data, &LogFormat::default()) {
        let analysis = pitune_core::analyze(&series);
        let sim = pitune_core::replay_plant(&analysis.suggestion, &series);
        assert_eq!(sim.len(), series.len());
        let trace = pitune_core::controller_trace(
            &analysis.suggestion,
            &series,
            &pitune_core::TraceCfg::default(),
        );
        assert_eq!(trace.len(), series.len());
    }
});
