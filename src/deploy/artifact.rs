//! Hardhat build artifacts.
//!
//! # Responsibilities
//! - Locate `<root>/contracts/<Name>.sol/<Name>.json` (or search for it)
//! - Parse the ABI and creation bytecode
//! - ABI-encode constructor arguments against the constructor signature
//! - Refuse artifacts built by a different compiler version

use std::fs;
use std::path::{Path, PathBuf};

use alloy::dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while reading or using an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no artifact for contract '{contract}' under {root}")]
    NotFound { contract: String, root: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("contract '{0}' has no creation bytecode (abstract contract or interface?)")]
    EmptyBytecode(String),

    #[error("constructor of '{contract}' takes {expected} argument(s), got {actual}")]
    ArgumentCount {
        contract: String,
        expected: usize,
        actual: usize,
    },

    #[error("constructor argument #{index} of '{contract}' ({ty}): {reason}")]
    InvalidArgument {
        contract: String,
        index: usize,
        ty: String,
        reason: String,
    },

    #[error("artifacts for '{contract}' were built with solc {found}, expected {expected}; recompile")]
    CompilerMismatch {
        contract: String,
        expected: String,
        found: String,
    },
}

/// A compiled contract ready to be bound to constructor arguments.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: String,
    abi: JsonAbi,
    bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameOnly {
    contract_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    solc_version: String,
}

impl ContractArtifact {
    /// Parse an artifact file.
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = read_json(path)?;
        if raw.bytecode.is_empty() {
            return Err(ArtifactError::EmptyBytecode(raw.contract_name));
        }
        Ok(Self {
            contract_name: raw.contract_name,
            abi: raw.abi,
            bytecode: raw.bytecode,
        })
    }

    /// ABI-encode `args` against the constructor inputs.
    ///
    /// Each argument is given as text and coerced to the declared Solidity
    /// type, so `"0xf2d2…"` becomes an `address` and `"USDT"` a `string`.
    pub fn encode_constructor_args(&self, args: &[String]) -> Result<Vec<u8>, ArtifactError> {
        let inputs = self
            .abi
            .constructor()
            .map(|c| c.inputs.as_slice())
            .unwrap_or_default();

        if inputs.len() != args.len() {
            return Err(ArtifactError::ArgumentCount {
                contract: self.contract_name.clone(),
                expected: inputs.len(),
                actual: args.len(),
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for (index, (param, arg)) in inputs.iter().zip(args).enumerate() {
            let invalid = |reason: String| ArtifactError::InvalidArgument {
                contract: self.contract_name.clone(),
                index,
                ty: param.ty.clone(),
                reason,
            };
            let ty: DynSolType = param.resolve().map_err(|e| invalid(e.to_string()))?;
            let value = ty.coerce_str(arg).map_err(|e| invalid(e.to_string()))?;
            values.push(value);
        }

        if values.is_empty() {
            return Ok(Vec::new());
        }
        Ok(DynSolValue::Tuple(values).abi_encode_params())
    }

    /// Creation code: bytecode followed by the encoded constructor arguments.
    pub fn creation_code(&self, args: &[String]) -> Result<Bytes, ArtifactError> {
        let encoded = self.encode_constructor_args(args)?;
        let mut code = Vec::with_capacity(self.bytecode.len() + encoded.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(&encoded);
        Ok(Bytes::from(code))
    }
}

/// Read-only view over a Hardhat `artifacts/` directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load a contract's artifact and check it against `compiler_version`.
    pub fn load(&self, contract: &str, compiler_version: &str) -> Result<ContractArtifact, ArtifactError> {
        let path = self.locate(contract)?;
        check_compiler_version(&path, contract, compiler_version)?;

        let artifact = ContractArtifact::from_file(&path)?;
        tracing::debug!(
            contract = %contract,
            path = %path.display(),
            bytecode_len = artifact.bytecode.len(),
            "Artifact loaded"
        );
        Ok(artifact)
    }

    /// Find the artifact file for `contract`.
    pub fn locate(&self, contract: &str) -> Result<PathBuf, ArtifactError> {
        let contracts_dir = self.root.join("contracts");
        let conventional = contracts_dir
            .join(format!("{}.sol", contract))
            .join(format!("{}.json", contract));
        if conventional.is_file() {
            return Ok(conventional);
        }

        search(&contracts_dir, contract)?.ok_or_else(|| ArtifactError::NotFound {
            contract: contract.to_string(),
            root: self.root.clone(),
        })
    }
}

/// Depth-first search for `<contract>.json` whose `contractName` matches.
fn search(dir: &Path, contract: &str) -> Result<Option<PathBuf>, ArtifactError> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let file_name = format!("{}.json", contract);
    let entries = fs::read_dir(dir).map_err(|source| ArtifactError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            if let Some(found) = search(&path, contract)? {
                return Ok(Some(found));
            }
        } else if path.file_name().is_some_and(|n| n == file_name.as_str()) {
            match read_json::<NameOnly>(&path) {
                Ok(n) if n.contract_name == contract => return Ok(Some(path)),
                Ok(_) => {}
                Err(e) => tracing::debug!(error = %e, "Skipping unreadable artifact"),
            }
        }
    }
    Ok(None)
}

/// Compare the solc version recorded in the artifact's build info.
///
/// Missing debug files only produce a warning: artifacts copied without
/// their build info are still deployable.
fn check_compiler_version(
    artifact_path: &Path,
    contract: &str,
    expected: &str,
) -> Result<(), ArtifactError> {
    let dbg_path = artifact_path.with_extension("dbg.json");
    if !dbg_path.is_file() {
        tracing::warn!(
            contract = %contract,
            "No debug file next to artifact, skipping compiler version check"
        );
        return Ok(());
    }

    let dbg: DebugFile = read_json(&dbg_path)?;
    let build_info_path = match dbg_path.parent() {
        Some(dir) => dir.join(&dbg.build_info),
        None => dbg.build_info,
    };
    let info: BuildInfo = read_json(&build_info_path)?;

    // Hardhat records the long form, e.g. "0.8.20+commit.a1b79de6".
    let found = info.solc_version.split('+').next().unwrap_or_default();
    if found != expected {
        return Err(ArtifactError::CompilerMismatch {
            contract: contract.to_string(),
            expected: expected.to_string(),
            found: info.solc_version,
        });
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
