//! # Evidence-Chain Benchmarks
//!
//! | Path | Operation |
//! |------|-----------|
//! | ec-01 | Sign / verify an emission reading |
//! | ec-03 | Issue an FIR (allocation + linkage commit) |
//! | ec-03 | Issue FIRs from contending threads |

use case_runtime::{EvidenceRuntime, RuntimeConfig};
use chrono::{Duration, Utc};
use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use ec_02_sequence_allocator::AllocatorConfig;
use ec_03_chain_linker::FirRequest;
use ec_04_otp_gateway::RecordingMailer;
use shared_types::{
    AccusedId, Challan, ChallanId, ChallanStatus, EmissionReading, GasReadings, OfficerId,
    ReadingId, Station, StationId, SystemTimeSource, VehicleId, Violation, ViolationId,
};
use std::sync::Arc;

struct Bench {
    runtime: EvidenceRuntime,
    station: StationId,
    violation: ViolationId,
}

fn bench_runtime() -> Bench {
    let mut config = RuntimeConfig::default().with_signing_secret("bench", &[0x5A; 32]);
    config.allocator = AllocatorConfig::without_backoff(16);
    let runtime = EvidenceRuntime::new(&config, Arc::new(RecordingMailer::new()), SystemTimeSource)
        .expect("bench config is valid");

    let station = Station {
        id: StationId::new(),
        code: "B1".into(),
        name: "Bench Station".into(),
    };
    let violation = Violation {
        id: ViolationId::new(),
        code: "NP-7".into(),
        description: "Modified exhaust".into(),
        cognizable: true,
    };
    let bench = Bench {
        station: station.id,
        violation: violation.id,
        runtime,
    };
    bench
        .runtime
        .seed_station(station)
        .expect("bench station code is free");
    bench.runtime.seed_violation(violation);
    bench
}

fn reading(i: u32) -> EmissionReading {
    EmissionReading {
        id: ReadingId::new(),
        device_id: format!("DEV-{i:04}"),
        gases: GasReadings {
            co_ppm: 400.0 + f64::from(i),
            co2_percent: 13.0,
            hc_ppm: 150.0,
            nox_ppm: 90.0,
        },
        sound_level_db: 95.0,
        captured_at: Utc::now(),
        classification: "modified_exhaust".into(),
        signature: None,
    }
}

fn challan(bench: &Bench) -> ChallanId {
    let issued_at = Utc::now();
    bench
        .runtime
        .file_challan(Challan {
            id: ChallanId::new(),
            officer_id: OfficerId::new(),
            accused_id: AccusedId::new(),
            vehicle_id: VehicleId::new(),
            violation_id: bench.violation,
            emission_reading_id: None,
            issued_at,
            due_at: issued_at + Duration::days(30),
            status: ChallanStatus::Unpaid,
            signature: None,
        })
        .expect("challan signs")
        .id
}

fn fir_request(bench: &Bench, challan: ChallanId) -> FirRequest {
    FirRequest {
        challan_id: challan,
        station_id: bench.station,
        informant_id: OfficerId::new(),
        description: "bench".into(),
    }
}

// ============================================================================
// EC-01: Signatures
// ============================================================================

fn bench_signatures(c: &mut Criterion) {
    let bench = bench_runtime();
    let mut group = c.benchmark_group("ec-01-signatures");

    let sample = reading(0);
    let signature = bench.runtime.sign_emission_reading(&sample).expect("signs");

    group.bench_function("sign_emission_reading", |b| {
        b.iter(|| black_box(bench.runtime.sign_emission_reading(black_box(&sample))))
    });
    group.bench_function("verify_signature", |b| {
        b.iter(|| black_box(bench.runtime.verify_signature(black_box(&sample), &signature)))
    });

    for size in [10u32, 100, 1000] {
        let readings: Vec<_> = (0..size).map(reading).collect();
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("sign_batch", size), &readings, |b, rs| {
            b.iter(|| {
                for r in rs {
                    black_box(bench.runtime.sign_emission_reading(r).ok());
                }
            })
        });
    }

    group.finish();
}

// ============================================================================
// EC-03: FIR Issuance
// ============================================================================

fn bench_fir_issuance(c: &mut Criterion) {
    let bench = bench_runtime();
    let mut group = c.benchmark_group("ec-03-fir-issuance");

    group.bench_function("issue_fir", |b| {
        b.iter_batched(
            || fir_request(&bench, challan(&bench)),
            |request| black_box(bench.runtime.issue_fir(request)),
            BatchSize::SmallInput,
        )
    });

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements(threads as u64));
        group.bench_with_input(
            BenchmarkId::new("issue_fir_contended", threads),
            &threads,
            |b, &threads| {
                b.iter_batched(
                    || {
                        (0..threads)
                            .map(|_| fir_request(&bench, challan(&bench)))
                            .collect::<Vec<_>>()
                    },
                    |requests| {
                        std::thread::scope(|s| {
                            let runtime = &bench.runtime;
                            for request in requests {
                                s.spawn(move || black_box(runtime.issue_fir(request)));
                            }
                        })
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_signatures, bench_fir_issuance);
criterion_main!(benches);
