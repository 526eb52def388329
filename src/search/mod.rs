//! Search Module
//!
//! Literature lookup against PubMed via the NCBI E-utilities:
//! - ESearch (primary) - free-text query to PubMed IDs
//! - EFetch - batched article metadata for those IDs
//!
//! Lookups are total: when PubMed cannot deliver, callers get the simulated
//! record or a diagnostic instead of an error.

pub mod efetch;
pub mod pubmed;
pub mod records;

pub use pubmed::{LiteratureError, PubMedClient};
pub use records::{ArticleRecord, DiagnosticRecord, LookupOutcome};
