// Quick release mode performance comparison
//
// Run with: cargo test --release ac_stream_perf -- --ignored

#[cfg(test)]
mod perf_tests {
    use crate::{AcPatternSet, ConsumeOptions, MatchContext};
    use std::time::Instant;

    #[test]
    #[ignore] // Run with: cargo test --release ac_stream_perf -- --ignored
    fn ac_stream_perf() {
        let mut set = AcPatternSet::<()>::new();
        for i in 0..1000 {
            let pattern = format!("pattern_{i:04}");
            set.add_pattern(pattern.as_bytes(), None, None).unwrap();
        }
        let automaton = set.compile();

        let haystack: Vec<u8> = b"no hits here, only filler bytes / pattern_0042 tail"
            .iter()
            .cycle()
            .take(64 * 1024)
            .copied()
            .collect();

        // Warmup
        let mut ctx = MatchContext::new();
        for _ in 0..100 {
            automaton.consume(&mut ctx, &haystack, &ConsumeOptions::all_matches());
            ctx.reset();
        }

        // Benchmark
        let iterations = 1_000u32;
        let start = Instant::now();
        for _ in 0..iterations {
            automaton.consume(&mut ctx, &haystack, &ConsumeOptions::all_matches());
            ctx.reset();
        }
        let duration = start.elapsed();
        let total_bytes = haystack.len() as u64 * iterations as u64;
        let mib_per_sec = (total_bytes as f64 / duration.as_secs_f64()) / (1024.0 * 1024.0);

        println!("\n=== Release Mode ac-stream Performance ===");
        println!("Patterns: {}", automaton.pattern_count());
        println!("States: {}", automaton.state_count());
        println!("Total scanned: {} MiB", total_bytes / (1024 * 1024));
        println!("Total time: {duration:?}");
        println!("Throughput: {mib_per_sec:.2} MiB/sec");

        // Well under any useful speed if the accelerator is broken
        assert!(
            mib_per_sec > 10.0,
            "throughput collapsed: {mib_per_sec:.2} MiB/sec"
        );
    }
}
