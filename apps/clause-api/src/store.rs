//! Contract persistence
//!
//! Clauses are stored per `(session, contract)`; each analysis is stored per
//! `(session, contract, clause)` and overwritten on re-analysis. Summaries are
//! never stored.

use async_trait::async_trait;
use shared_types::{Analysis, Clause};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Contract not found: {0}")]
    UnknownContract(String),
}

#[async_trait]
pub trait ContractStore: Send + Sync {
    async fn save_clauses(
        &self,
        session_id: &str,
        contract_id: &str,
        clauses: &[Clause],
    ) -> Result<(), StoreError>;

    async fn load_clauses(
        &self,
        session_id: &str,
        contract_id: &str,
    ) -> Result<Option<Vec<Clause>>, StoreError>;

    /// Store under `analysis.clause_id`, replacing any previous analysis
    async fn save_analysis(
        &self,
        session_id: &str,
        contract_id: &str,
        analysis: &Analysis,
    ) -> Result<(), StoreError>;

    async fn load_analysis(
        &self,
        session_id: &str,
        contract_id: &str,
        clause_id: &str,
    ) -> Result<Option<Analysis>, StoreError>;

    /// Every stored analysis of a contract, in clause order
    async fn load_analyses(
        &self,
        session_id: &str,
        contract_id: &str,
    ) -> Result<Vec<Analysis>, StoreError>;
}

#[derive(Debug, Default)]
struct ContractEntry {
    clauses: Vec<Clause>,
    analyses: HashMap<String, Analysis>,
}

type ContractKey = (String, String);

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    contracts: RwLock<HashMap<ContractKey, ContractEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key(session_id: &str, contract_id: &str) -> ContractKey {
    (session_id.to_string(), contract_id.to_string())
}

#[async_trait]
impl ContractStore for InMemoryStore {
    async fn save_clauses(
        &self,
        session_id: &str,
        contract_id: &str,
        clauses: &[Clause],
    ) -> Result<(), StoreError> {
        let mut contracts = self.contracts.write().await;
        contracts.insert(
            key(session_id, contract_id),
            ContractEntry {
                clauses: clauses.to_vec(),
                analyses: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn load_clauses(
        &self,
        session_id: &str,
        contract_id: &str,
    ) -> Result<Option<Vec<Clause>>, StoreError> {
        let contracts = self.contracts.read().await;
        Ok(contracts
            .get(&key(session_id, contract_id))
            .map(|entry| entry.clauses.clone()))
    }

    async fn save_analysis(
        &self,
        session_id: &str,
        contract_id: &str,
        analysis: &Analysis,
    ) -> Result<(), StoreError> {
        let mut contracts = self.contracts.write().await;
        let entry = contracts
            .get_mut(&key(session_id, contract_id))
            .ok_or_else(|| StoreError::UnknownContract(contract_id.to_string()))?;

        // Last write wins
        entry
            .analyses
            .insert(analysis.clause_id.clone(), analysis.clone());
        Ok(())
    }

    async fn load_analysis(
        &self,
        session_id: &str,
        contract_id: &str,
        clause_id: &str,
    ) -> Result<Option<Analysis>, StoreError> {
        let contracts = self.contracts.read().await;
        Ok(contracts
            .get(&key(session_id, contract_id))
            .and_then(|entry| entry.analyses.get(clause_id).cloned()))
    }

    async fn load_analyses(
        &self,
        session_id: &str,
        contract_id: &str,
    ) -> Result<Vec<Analysis>, StoreError> {
        let contracts = self.contracts.read().await;
        let Some(entry) = contracts.get(&key(session_id, contract_id)) else {
            return Ok(Vec::new());
        };

        Ok(entry
            .clauses
            .iter()
            .filter_map(|clause| entry.analyses.get(&clause.id).cloned())
            .collect())
    }
}
