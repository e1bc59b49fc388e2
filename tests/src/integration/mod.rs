//! # Integration Scenarios
//!
//! Every scenario runs against a fully wired [`EvidenceRuntime`] with a
//! manual clock and a recording mailer.

#[cfg(test)]
mod chain_flows;
#[cfg(test)]
mod integrity_flows;
#[cfg(test)]
mod otp_flows;

#[cfg(test)]
pub(crate) mod fixture {
    use case_runtime::{EvidenceRuntime, RuntimeConfig};
    use chrono::{Duration, TimeZone, Utc};
    use ec_02_sequence_allocator::AllocatorConfig;
    use ec_03_chain_linker::{CaseRequest, FirRequest};
    use ec_04_otp_gateway::RecordingMailer;
    use shared_types::{
        Accused, AccusedId, Challan, ChallanId, ChallanStatus, Court, CourtId, EmissionReading,
        FirId, GasReadings, Judge, JudgeId, ManualClock, OfficerId, ReadingId, Station,
        StationId, TimeSource, Timestamp, Vehicle, VehicleId, Violation, ViolationId,
    };
    use std::sync::Arc;

    pub const VEHICLE: &str = "LEA-1234";
    pub const CNIC: &str = "35202-1234567-1";
    pub const EMAIL: &str = "owner@example.com";
    pub const SECRET: [u8; 32] = [0x6B; 32];

    pub type Runtime = EvidenceRuntime<Arc<ManualClock>>;

    pub fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap()
    }

    pub struct Fixture {
        pub runtime: Runtime,
        pub mailer: Arc<RecordingMailer>,
        pub clock: Arc<ManualClock>,
        pub station_s1: StationId,
        pub station_s2: StationId,
        pub judge: JudgeId,
        pub cognizable: ViolationId,
        pub minor: ViolationId,
        pub owner: Accused,
        pub vehicle: Vehicle,
    }

    pub fn config() -> RuntimeConfig {
        let mut config = RuntimeConfig::default().with_signing_secret("k1", &SECRET);
        config.allocator = AllocatorConfig::without_backoff(16);
        config
    }

    pub fn fixture() -> Fixture {
        fixture_with(config())
    }

    pub fn fixture_with(config: RuntimeConfig) -> Fixture {
        let mailer = Arc::new(RecordingMailer::new());
        let clock = Arc::new(ManualClock::new(start()));
        let runtime = EvidenceRuntime::new(&config, mailer.clone(), Arc::clone(&clock))
            .expect("fixture config is valid");

        let s1 = Station {
            id: StationId::new(),
            code: "S1".into(),
            name: "Gulberg Police Station".into(),
        };
        let s2 = Station {
            id: StationId::new(),
            code: "S2".into(),
            name: "Model Town Police Station".into(),
        };
        let court = Court {
            id: CourtId::new(),
            code: "LHR3".into(),
            name: "Environmental Magistrate Lahore".into(),
        };
        let judge = Judge {
            id: JudgeId::new(),
            court_id: court.id,
            name: "N. Farooq".into(),
        };
        let cognizable = Violation {
            id: ViolationId::new(),
            code: "NP-7".into(),
            description: "Modified exhaust above 100 dB".into(),
            cognizable: true,
        };
        let minor = Violation {
            id: ViolationId::new(),
            code: "NP-1".into(),
            description: "Unnecessary horn use".into(),
            cognizable: false,
        };
        let owner = Accused {
            id: AccusedId::new(),
            name: "Registered Owner".into(),
            cnic: CNIC.into(),
            email: EMAIL.into(),
        };
        let vehicle = Vehicle {
            id: VehicleId::new(),
            registration_no: VEHICLE.into(),
            owner_id: owner.id,
        };

        let fixture = Fixture {
            runtime,
            mailer,
            clock,
            station_s1: s1.id,
            station_s2: s2.id,
            judge: judge.id,
            cognizable: cognizable.id,
            minor: minor.id,
            owner: owner.clone(),
            vehicle: vehicle.clone(),
        };
        fixture.runtime.seed_station(s1).expect("S1 is free");
        fixture.runtime.seed_station(s2).expect("S2 is free");
        fixture.runtime.seed_court(court).expect("LHR3 is free");
        fixture.runtime.seed_judge(judge);
        fixture.runtime.seed_violation(cognizable);
        fixture.runtime.seed_violation(minor);
        fixture.runtime.register_vehicle(owner, vehicle);
        fixture
    }

    impl Fixture {
        pub fn reading(&self) -> EmissionReading {
            EmissionReading {
                id: ReadingId::new(),
                device_id: "DEV-LHR-0042".into(),
                gases: GasReadings {
                    co_ppm: 412.5,
                    co2_percent: 13.2,
                    hc_ppm: 180.0,
                    nox_ppm: 96.4,
                },
                sound_level_db: 104.3,
                captured_at: self.clock.now(),
                classification: "modified_exhaust".into(),
                signature: None,
            }
        }

        /// An unsigned challan against the fixture vehicle, not yet filed.
        pub fn unfiled_challan(
            &self,
            violation: ViolationId,
            reading: Option<ReadingId>,
        ) -> Challan {
            let issued_at = self.clock.now();
            Challan {
                id: ChallanId::new(),
                officer_id: OfficerId::new(),
                accused_id: self.owner.id,
                vehicle_id: self.vehicle.id,
                violation_id: violation,
                emission_reading_id: reading,
                issued_at,
                due_at: issued_at + Duration::days(30),
                status: ChallanStatus::Unpaid,
                signature: None,
            }
        }

        /// Capture a fresh reading and file a signed challan citing it.
        pub fn challan(&self, violation: ViolationId) -> ChallanId {
            let reading = self
                .runtime
                .capture_reading(self.reading())
                .expect("reading is well-formed");
            self.runtime
                .file_challan(self.unfiled_challan(violation, Some(reading.id)))
                .expect("challan is well-formed")
                .id
        }

        pub fn fir_request(&self, challan: ChallanId, station: StationId) -> FirRequest {
            FirRequest {
                challan_id: challan,
                station_id: station,
                informant_id: OfficerId::new(),
                description: "Exhaust at 104 dB on Main Boulevard".into(),
            }
        }

        pub fn case_request(&self, fir: FirId) -> CaseRequest {
            CaseRequest {
                fir_id: fir,
                judge_id: self.judge,
                case_type: "environmental".into(),
                hearing_date: self.clock.now() + Duration::days(21),
            }
        }

        /// The last code mailed to the fixture owner.
        pub fn mailed_code(&self) -> String {
            self.mailer
                .last_code_for(EMAIL)
                .expect("a code was mailed")
                .expose()
                .to_string()
        }
    }
}
