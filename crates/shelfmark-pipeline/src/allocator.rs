//! Code discovery and minting.
//!
//! A file that already carries a valid `----XXXXX` suffix keeps its code
//! (legacy identity is preserved); anything else gets the next code minted
//! from the registry counter. Minting only reserves the code in the ledger;
//! the counter itself advances when the orchestrator commits the code with
//! its document, so a crash between mint and commit reissues the index.

use shelfmark_domain::code::{extract_code_from_filename, index_to_code};
use shelfmark_store::{Registry, StoreError};

use crate::error::PipelineError;

/// A code obtained for a document, tagged with how it was obtained.
///
/// The distinction matters at commit time: minted codes advance the
/// registry counter, discovered codes never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocatedCode {
    /// Valid code found in the filename and preserved
    Discovered(String),
    /// Fresh code minted from the registry counter
    Minted(String),
}

impl AllocatedCode {
    /// The code text.
    pub fn as_str(&self) -> &str {
        match self {
            AllocatedCode::Discovered(c) | AllocatedCode::Minted(c) => c,
        }
    }

    /// True for codes minted from the counter.
    pub fn is_minted(&self) -> bool {
        matches!(self, AllocatedCode::Minted(_))
    }
}

/// Obtain a code for the given filename: discover a valid legacy suffix,
/// or mint the next code from the counter.
///
/// A code-shaped but invalid suffix (wrong length, contains `W`, lowercase)
/// is treated as absent and a fresh code is minted.
pub fn obtain_code(registry: &mut Registry, filename: &str) -> Result<AllocatedCode, PipelineError> {
    if let Some(code) = extract_code_from_filename(filename) {
        tracing::debug!(code, filename, "preserving discovered code");
        if !registry.code_exists(&code)? {
            registry.allocate_code(&code)?;
        }
        return Ok(AllocatedCode::Discovered(code));
    }
    mint(registry)
}

/// Mint the next code from the counter and reserve it in the ledger.
///
/// A collision means the ledger already holds the code at the current
/// index (a stale reservation from an interrupted run); the index is
/// burned and minting retried exactly once before the collision is fatal.
fn mint(registry: &mut Registry) -> Result<AllocatedCode, PipelineError> {
    match try_mint(registry) {
        Ok(code) => Ok(AllocatedCode::Minted(code)),
        Err(PipelineError::CodeCollision(stale)) => {
            tracing::warn!(code = stale, "stale code at counter index, burning and retrying");
            registry.increment_code_index()?;
            try_mint(registry).map(AllocatedCode::Minted)
        }
        Err(e) => Err(e),
    }
}

fn try_mint(registry: &mut Registry) -> Result<String, PipelineError> {
    let index = registry.peek_code_index()?;
    let code = index_to_code(index)?;
    match registry.allocate_code(&code) {
        Ok(()) => Ok(code),
        Err(StoreError::CodeCollision(c)) => Err(PipelineError::CodeCollision(c)),
        Err(e) => Err(e.into()),
    }
}
