//! # Evidence Runtime
//!
//! Owns the four services and the shared store, and exposes the public
//! operations plus the lifecycle and seeding calls around them.
//!
//! ## Initialization Order
//!
//! ```text
//! RuntimeConfig ──→ KeyRing ──→ SignatureService  (flags → store)
//!               ──→ LinkerConfig ──→ ChainLinker  (store, clock)
//!               ──→ OtpConfig ──→ OtpGateway      (store, otp store, mailer, clock)
//! ```

use crate::config::{ConfigError, RuntimeConfig};
use crate::errors::IngestError;
use crate::mailer::LoggingMailer;
use crate::store::InMemoryEvidenceStore;
use ec_01_signature_engine::{IntegrityReport, SignatureEngineApi, SignatureError, SignatureService};
use ec_03_chain_linker::{
    CaseRequest, ChainError, ChainLinker, ChainLinkerApi, ChainLinkerDependencies, FirRequest,
};
use ec_04_otp_gateway::{
    AccessGrant, CaseStatusProjection, InMemoryOtpStore, Mailer, OtpConfirmation, OtpError,
    OtpGateway, OtpGatewayApi, OtpGatewayDependencies,
};
use shared_types::{
    Accused, Case, CaseId, CaseStatus, Challan, ChallanId, ChallanStatus, Court, EmissionReading,
    Fir, FirId, Judge, ReadingId, SignatureValue, Station, SystemTimeSource, TimeSource,
    Timestamp, Vehicle, Violation,
};
use std::sync::Arc;
use tracing::info;

pub type RuntimeOtpGateway<T> = OtpGateway<
    InMemoryEvidenceStore,
    Arc<InMemoryOtpStore>,
    Arc<dyn Mailer>,
    InMemoryEvidenceStore,
    T,
>;

/// The wired subsystem.
pub struct EvidenceRuntime<T: TimeSource + Clone = SystemTimeSource> {
    store: InMemoryEvidenceStore,
    otp_store: Arc<InMemoryOtpStore>,
    signatures: SignatureService<InMemoryEvidenceStore>,
    linker: ChainLinker<InMemoryEvidenceStore, T>,
    otp: RuntimeOtpGateway<T>,
}

impl EvidenceRuntime<SystemTimeSource> {
    /// Wall clock, logging mailer.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, ConfigError> {
        Self::new(config, Arc::new(LoggingMailer::new()), SystemTimeSource)
    }
}

impl<T: TimeSource + Clone + 'static> EvidenceRuntime<T> {
    pub fn new(
        config: &RuntimeConfig,
        mailer: Arc<dyn Mailer>,
        time_source: T,
    ) -> Result<Self, ConfigError> {
        let keys = config.signing.key_ring()?;
        let store = InMemoryEvidenceStore::with_clock(Arc::new(time_source.clone()));
        let otp_store = Arc::new(InMemoryOtpStore::new());

        let signatures = SignatureService::new(keys, store.clone());
        let linker = ChainLinker::new(
            ChainLinkerDependencies {
                store: store.clone(),
                time_source: time_source.clone(),
            },
            config.linker_config(),
        );
        let otp = OtpGateway::new(
            OtpGatewayDependencies {
                owners: store.clone(),
                store: Arc::clone(&otp_store),
                mailer,
                cases: store.clone(),
                time_source,
            },
            config.otp.clone(),
        );

        info!(
            signing_key = %config.signing.key_id,
            max_attempts = config.allocator.effective_max_attempts(),
            otp_ttl_secs = config.otp.code_ttl_secs,
            "Evidence runtime ready"
        );
        Ok(Self {
            store,
            otp_store,
            signatures,
            linker,
            otp,
        })
    }
}

impl<T: TimeSource + Clone> EvidenceRuntime<T> {
    pub fn store(&self) -> &InMemoryEvidenceStore {
        &self.store
    }

    pub fn otp_store(&self) -> &InMemoryOtpStore {
        &self.otp_store
    }

    // =========================================================================
    // EVIDENCE CHAIN
    // =========================================================================

    pub fn issue_fir(&self, request: FirRequest) -> Result<Fir, ChainError> {
        self.linker.issue_fir(request)
    }

    pub fn issue_case(&self, request: CaseRequest) -> Result<Case, ChainError> {
        self.linker.issue_case(request)
    }

    pub fn update_challan_status(
        &self,
        challan: ChallanId,
        status: ChallanStatus,
    ) -> Result<Challan, ChainError> {
        self.linker.update_challan_status(challan, status)
    }

    pub fn file_investigation_report(&self, fir: FirId, report: &str) -> Result<Fir, ChainError> {
        self.linker.file_investigation_report(fir, report)
    }

    pub fn close_fir(&self, fir: FirId) -> Result<Fir, ChainError> {
        self.linker.close_fir(fir)
    }

    pub fn update_case_status(
        &self,
        case: CaseId,
        status: CaseStatus,
        hearing_date: Option<Timestamp>,
    ) -> Result<Case, ChainError> {
        self.linker.update_case_status(case, status, hearing_date)
    }

    pub fn record_verdict(
        &self,
        case: CaseId,
        verdict: &str,
        outcome: CaseStatus,
    ) -> Result<Case, ChainError> {
        self.linker.record_verdict(case, verdict, outcome)
    }

    // =========================================================================
    // SIGNATURES
    // =========================================================================

    pub fn sign_emission_reading(
        &self,
        reading: &EmissionReading,
    ) -> Result<SignatureValue, SignatureError> {
        self.signatures.sign_emission_reading(reading)
    }

    pub fn verify_signature(&self, reading: &EmissionReading, signature: &SignatureValue) -> bool {
        self.signatures.verify_emission_reading(reading, signature)
    }

    /// Sign a device capture and store it. A stored reading is never replaced.
    pub fn capture_reading(
        &self,
        mut reading: EmissionReading,
    ) -> Result<EmissionReading, IngestError> {
        reading.signature = Some(self.signatures.sign_emission_reading(&reading)?);
        Ok(self.linker.record_reading(reading)?)
    }

    /// Sign a new challan and store it.
    ///
    /// The cited reading must be stored and not yet cited; an existing
    /// challan id is rejected rather than re-signed.
    pub fn file_challan(&self, mut challan: Challan) -> Result<Challan, IngestError> {
        challan.signature = Some(self.signatures.sign_challan(&challan)?);
        Ok(self.linker.file_challan(challan)?)
    }

    /// `None` if no such reading is stored.
    pub fn check_reading_integrity(&self, reading: ReadingId) -> Option<IntegrityReport> {
        self.store
            .reading(reading)
            .map(|r| self.signatures.check_reading_integrity(&r))
    }

    pub fn check_challan_integrity(&self, challan: ChallanId) -> Option<IntegrityReport> {
        self.store
            .chain()
            .challan(challan)
            .map(|c| self.signatures.check_challan_integrity(&c))
    }

    // =========================================================================
    // PUBLIC STATUS CHANNEL
    // =========================================================================

    pub async fn request_status_otp(
        &self,
        vehicle_no: &str,
        cnic: &str,
        email: &str,
    ) -> Result<OtpConfirmation, OtpError> {
        self.otp.request_status_otp(vehicle_no, cnic, email).await
    }

    pub async fn verify_status_otp(
        &self,
        vehicle_no: &str,
        cnic: &str,
        code: &str,
    ) -> Result<AccessGrant, OtpError> {
        self.otp.verify_status_otp(vehicle_no, cnic, code).await
    }

    pub async fn get_case_status(&self, token: &str) -> Result<CaseStatusProjection, OtpError> {
        self.otp.get_case_status(token).await
    }

    // =========================================================================
    // REFERENCE DATA
    // =========================================================================

    /// Fails if another station already uses the code.
    pub fn seed_station(&self, station: Station) -> Result<(), ChainError> {
        self.store.chain().seed_station(station)
    }

    pub fn seed_court(&self, court: Court) -> Result<(), ChainError> {
        self.store.chain().seed_court(court)
    }

    pub fn seed_judge(&self, judge: Judge) {
        self.store.chain().seed_judge(judge);
    }

    pub fn seed_violation(&self, violation: Violation) {
        self.store.chain().seed_violation(violation);
    }

    pub fn register_vehicle(&self, owner: Accused, vehicle: Vehicle) {
        self.store.register_vehicle(owner, vehicle);
    }
}
