use super::backend::Registry;
use super::bindings::DocumentRegistry;
use crate::network::RpcAgent;
use async_trait::async_trait;
use docverify_types::{DocumentRecord, DocverifyError, DocverifyResult, Fingerprint, ReceiptHandle};
use ethers::{
    contract::ContractError,
    providers::{JsonRpcError, Middleware, MiddlewareError},
    types::{Address, U64},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Registry backed by the deployed contract. Reads use the agent's provider,
/// writes go through a signer bound to whatever chain the agent is on.
pub struct ContractRegistry {
    agent: Arc<RpcAgent>,
    address: Address,
    confirmations: usize,
}

impl ContractRegistry {
    pub fn new(agent: Arc<RpcAgent>, address: Address, confirmations: usize) -> Self {
        Self {
            agent,
            address,
            confirmations: confirmations.max(1),
        }
    }

    pub fn parse_address(address: &str) -> DocverifyResult<Address> {
        address
            .trim()
            .parse::<Address>()
            .map_err(|e| DocverifyError::Config(format!("Invalid registry address {}: {}", address, e)))
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

#[derive(Clone, Copy)]
enum Call {
    Add,
    Verify,
    Details,
}

/// EIP-1193 "user rejected request".
const USER_REJECTED: i64 = 4001;
/// Geth's code for a call that hit `revert` without returning data.
const EXECUTION_REVERTED: i64 = 3;

fn rpc_response<M: Middleware>(e: &ContractError<M>) -> Option<&JsonRpcError> {
    match e {
        ContractError::MiddlewareError { e } => e.as_error_response(),
        ContractError::ProviderError { e } => MiddlewareError::as_error_response(e),
        _ => None,
    }
}

fn classify<M: Middleware>(call: Call, e: ContractError<M>) -> DocverifyError {
    let message = e.to_string();

    if matches!(e, ContractError::DecodingError(_) | ContractError::DetokenizationError(_)) {
        return DocverifyError::MalformedRecord(message);
    }

    let response = rpc_response(&e);
    let reverted = e.is_revert()
        || response.map_or(false, |r| {
            r.code == EXECUTION_REVERTED || r.message.to_lowercase().contains("execution reverted")
        });
    let declined = response.map_or(false, |r| r.code == USER_REJECTED);

    match call {
        Call::Add if reverted || declined => DocverifyError::RejectedByRegistry(message),
        Call::Details if reverted => DocverifyError::NotFound(message),
        Call::Verify if reverted => DocverifyError::RejectedByRegistry(message),
        _ => DocverifyError::NetworkFailure(message),
    }
}

#[async_trait]
impl Registry for ContractRegistry {
    async fn add_document_hash(&self, fingerprint: &Fingerprint, record: &DocumentRecord) -> DocverifyResult<ReceiptHandle> {
        let signer = self.agent.signer()?;
        let contract = DocumentRegistry::new(self.address, signer);
        let r = record.clone();

        let call = contract.add_document_hash(
            *fingerprint.as_bytes(),
            r.full_name,
            r.dob,
            r.gender,
            r.address,
            r.phone,
            r.email,
            r.aadhaar,
            r.pan,
            r.passport,
            r.driving_license,
            r.voter_id,
        );

        let pending = call.send().await.map_err(|e| classify(Call::Add, e))?;
        let tx_hash = pending.tx_hash();
        info!("Registration for {} submitted: {:?}", fingerprint.short(), tx_hash);

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .map_err(|e| DocverifyError::NetworkFailure(format!("awaiting receipt: {}", e)))?
            .ok_or_else(|| DocverifyError::NetworkFailure(format!("transaction {:?} dropped", tx_hash)))?;

        if receipt.status == Some(U64::zero()) {
            return Err(DocverifyError::RejectedByRegistry(format!(
                "transaction {:?} reverted",
                tx_hash
            )));
        }

        Ok(ReceiptHandle::new(
            *fingerprint,
            format!("{:?}", receipt.transaction_hash),
            receipt.block_number.map(|b| b.as_u64()),
        ))
    }

    async fn verify_document(&self, fingerprint: &Fingerprint) -> DocverifyResult<bool> {
        let contract = DocumentRegistry::new(self.address, self.agent.provider());
        let registered = contract
            .verify_document(*fingerprint.as_bytes())
            .call()
            .await
            .map_err(|e| classify(Call::Verify, e))?;

        debug!("verifyDocument({}) = {}", fingerprint.short(), registered);
        Ok(registered)
    }

    async fn get_student_details(&self, fingerprint: &Fingerprint) -> DocverifyResult<DocumentRecord> {
        let contract = DocumentRegistry::new(self.address, self.agent.provider());
        let fields = contract
            .get_student_details(*fingerprint.as_bytes())
            .call()
            .await
            .map_err(|e| classify(Call::Details, e))?;

        Ok(DocumentRecord::from_tuple(fields))
    }
}
