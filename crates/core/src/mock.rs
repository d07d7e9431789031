//! Canned backend behaviour for mock mode.
//!
//! Two independent simulations live here:
//!
//! - [`status`] is the gateway's stateless backend stand-in. Whether a job
//!   is finished depends only on the last character of its id, so polling
//!   the same id always returns the same answer.
//! - [`simulated_update`] drives the client-side demo, where a job is
//!   queued for [`SIMULATED_QUEUED_FOR`], running for
//!   [`SIMULATED_RUNNING_FOR`], then done with mode-specific text.
//!
//! The two do not agree with each other (the gateway never reports
//! `running`, the client never stays queued forever). Both behaviours are
//! kept as they are.

use std::time::Duration;

use rand::Rng;

use crate::job::AudioFile;
use crate::mode::RewriteMode;
use crate::status::{JobResult, JobUpdate};

/// Prefix of every id minted by [`generate_job_id`].
pub const MOCK_JOB_PREFIX: &str = "mock-";

/// Length of the random part of a mock job id.
const MOCK_ID_SUFFIX_LEN: usize = 12;

/// Raw text of the gateway demo result.
pub const DEMO_RAW: &str = "[DEV] Stub råtranskripsjon";

/// Rewritten text of the gateway demo result.
pub const DEMO_CLEAN: &str = "[DEV] Stub renskrevet tekst";

/// How long a simulated client job stays `queued`.
pub const SIMULATED_QUEUED_FOR: Duration = Duration::from_millis(800);

/// How long a simulated client job stays `running` after leaving the queue.
pub const SIMULATED_RUNNING_FOR: Duration = Duration::from_millis(1200);

/// File name of the audio clip preloaded in mock mode.
pub const MOCK_SAMPLE_FILE_NAME: &str = "demo-meeting.mp3";

/// Minimal ID3 header used as the preloaded clip's content.
pub const MOCK_SAMPLE_BYTES: [u8; 10] = [0x49, 0x44, 0x33, 0x03, 0x00, 0x00, 0x00, 0x00, 0x0f, 0x76];

/// Mint a fresh synthetic job id: [`MOCK_JOB_PREFIX`] plus a random
/// lowercase alphanumeric suffix.
pub fn generate_job_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(MOCK_ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{MOCK_JOB_PREFIX}{suffix}")
}

/// The fixed result returned for finished mock jobs.
pub fn demo_result() -> JobResult {
    JobResult {
        raw: DEMO_RAW.to_string(),
        clean: Some(DEMO_CLEAN.to_string()),
    }
}

/// Gateway mock status for `job_id`.
///
/// Ids ending in `a` or `0` are done with [`demo_result`]; every other id
/// is queued.
pub fn status(job_id: &str) -> JobUpdate {
    if job_id.ends_with('a') || job_id.ends_with('0') {
        JobUpdate::Done(demo_result())
    } else {
        JobUpdate::Queued
    }
}

/// Canned transcription and rewrite for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCopy {
    pub raw: &'static str,
    pub clean: &'static str,
}

/// Demo text shown by the client-side simulation for `mode`.
pub fn sample_copy(mode: RewriteMode) -> SampleCopy {
    match mode {
        RewriteMode::Summary => SampleCopy {
            raw: "Dette er et eksempel på transkripsjonen fra et kundemøte der vi planlegger utrulling av NB-transcribe.",
            clean: "Sammendrag:\n- Vi demonstrerte NB-transcribe i et kundemøte.\n- Kunden ønsker mock-modus for porteføljen sin.\n- Neste steg er å produsere demo og dokumentasjon.",
        },
        RewriteMode::Email => SampleCopy {
            raw: "Hei, dette er et opptak fra kundemøtet vårt om transkripsjonstjenesten.",
            clean: "Hei team,\n\nTakk for et godt møte i dag! Her er en kort oppsummering og neste steg for NB-transcribe-demoen. Jeg setter opp mock-modus i frontend og eksponerer den via Vercel slik at dere kan teste selv. Gi beskjed om dere ønsker tilgang til self-hosted backenden.\n\nMvh\nNicolai",
        },
        RewriteMode::Document => SampleCopy {
            raw: "Dette er en lenger tekst fra transkripsjonen.",
            clean: "I dette dokumentet beskriver vi hvordan NB-transcribe settes opp i containere styrt av Portainer. Tjenesten ligger bak Cloudflare Tunnel og blir kontinuerlig oppdatert gjennom Watchtower og GitHub Actions.",
        },
        RewriteMode::TalkingPoints => SampleCopy {
            raw: "Her er noen momenter vi diskuterte under callen.",
            clean: "Talepunkter:\n1. Presentasjon av NB-transcribe sin pipeline.\n2. Oppsett med Docker Compose, Portainer og automatiske oppdateringer.\n3. Sikker eksponering via Cloudflare Tunnel.\n4. Mock-modus for porteføljevisning.",
        },
        RewriteMode::Polish => SampleCopy {
            raw: "Original tekst: vi self-hoster appen og bruker egen maskin for GPU.",
            clean: "Renskrevet versjon: Vi driver NB-transcribe på egen maskin med GPU, pakket i containere som styres via Portainer og eksponeres trygt gjennom Cloudflare Tunnel.",
        },
        RewriteMode::Workflow => SampleCopy {
            raw: "Rå transkripsjon for arbeidsflyt.",
            clean: "Arbeidsflyt:\n1. Lydopptak lastes opp til mock-frontenden.\n2. I produksjon sendes jobben til backenden via Cloudflare Tunnel.\n3. Watchtower og GitHub Actions sørger for automatiske oppdateringer av containere.\n\nLLM-prompt forslag:\n- 'Skriv et sammendrag av møtet og fremhev hvordan infrastrukturen er automatisert.'",
        },
    }
}

/// Client-side simulated status of a job submitted `elapsed` ago.
pub fn simulated_update(elapsed: Duration, mode: RewriteMode, rewrite: bool) -> JobUpdate {
    if elapsed < SIMULATED_QUEUED_FOR {
        return JobUpdate::Queued;
    }
    if elapsed < SIMULATED_QUEUED_FOR + SIMULATED_RUNNING_FOR {
        return JobUpdate::Running;
    }

    let copy = sample_copy(mode);
    JobUpdate::Done(JobResult {
        raw: copy.raw.to_string(),
        clean: rewrite.then(|| copy.clean.to_string()),
    })
}

/// The audio clip the upload form is pre-filled with in mock mode.
pub fn sample_upload() -> AudioFile {
    AudioFile::new(MOCK_SAMPLE_FILE_NAME, "audio/mpeg", MOCK_SAMPLE_BYTES.to_vec())
}
