//! Decoding and ingestion of the UN/LOCODE CSV release.
//!
//! Responsibilities:
//! - Decode raw CSV rows into typed countries, subdivisions and locations.
//! - Rebuild a [`LocodeDatabase`](unlocode_core::LocodeDatabase) from a
//!   directory of release files in one transaction.
//!
//! Boundaries:
//! - Domain types and storage live in `unlocode-core`.
//! - Filesystem access goes through `unlocode-fs`.

pub mod decode;
pub mod ingest;

pub use decode::{DecodeError, DecodedRow, FileKind, RecordDecoder, SkipReason, SourceEncoding};
pub use ingest::{
    IngestError, IngestReport, LoaderOptions, classify_file, ingest_dir, rebuild_from_dir,
};
