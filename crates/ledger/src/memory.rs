//! In-memory ledger double.
//!
//! A stand-in for a development node plus the exercise's deployed contracts:
//! per-account balances and nonces, contract creation with real address
//! derivation, two token flavors, and the escrow's four authorization
//! branches backed by genuine signature recovery.
//!
//! Contract behavior mirrors the deployed exercise contracts. The strict
//! token reverts on insufficient balance or allowance; the legacy token
//! returns `false` and moves nothing; the escrow does not check transfer
//! return values. Sender authentication on plain transactions is the node's
//! concern in this model, so `from` is trusted; the signature branches are
//! where authorization is actually verified.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use sha3::{Digest, Keccak256};
use tracing::debug;

use swaplab_signer::{recover, Signature};
use swaplab_types::abi;
use swaplab_types::calls::{erc20, escrow};
use swaplab_types::{SwapInfo, SwapOrder, SwapPhase};

use crate::client::{CallRequest, LedgerClient, PendingTx, Receipt, TxRequest};
use crate::error::LedgerError;

/// Which contract a synthetic creation payload instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    /// Escrow with constructor `(string secret, bytes32 secretHash)`.
    Escrow,
    /// Standard token: reverts on insufficient balance or allowance.
    Token,
    /// Legacy token: returns `false` instead of reverting.
    LegacyToken,
}

const ESCROW_MARKER: &[u8] = b"swaplab-code:escrow/";
const TOKEN_MARKER: &[u8] = b"swaplab-code:token/";
const LEGACY_MARKER: &[u8] = b"swaplab-code:legacy-token/";

/// Supply minted to the deploying account when a token is created.
const TOKEN_SUPPLY: u64 = 1_000_000_000;

#[derive(Debug, Clone, Default)]
struct AccountState {
    balance: U256,
    nonce: u64,
}

#[derive(Debug, Clone)]
struct TokenState {
    strict: bool,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

#[derive(Debug, Clone)]
struct EscrowState {
    secret_hash: B256,
    swaps: HashMap<B256, StoredSwap>,
}

#[derive(Debug, Clone)]
struct StoredSwap {
    order: SwapOrder,
    phase: SwapPhase,
}

#[derive(Debug, Clone)]
enum Contract {
    Token(TokenState),
    Escrow(EscrowState),
}

#[derive(Debug, Clone)]
enum TxOutcome {
    Mined(Receipt),
    Reverted,
}

#[derive(Debug, Default)]
struct LedgerState {
    accounts: HashMap<Address, AccountState>,
    contracts: HashMap<Address, Contract>,
    outcomes: HashMap<B256, TxOutcome>,
    /// Every accepted `(sender, nonce)` pair, in submission order.
    nonce_log: Vec<(Address, u64)>,
    wait_delays: HashMap<B256, Duration>,
    /// Hashes in the order their waits resolved.
    wait_log: Vec<B256>,
    block_number: u64,
}

/// The double itself. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creation payload that instantiates `kind`, ready for constructor
    /// arguments to be appended.
    pub fn artifact(kind: ContractKind) -> Vec<u8> {
        match kind {
            ContractKind::Escrow => ESCROW_MARKER.to_vec(),
            ContractKind::Token => TOKEN_MARKER.to_vec(),
            ContractKind::LegacyToken => LEGACY_MARKER.to_vec(),
        }
    }

    /// Credit `amount` of native currency to `address`.
    pub fn fund(&self, address: Address, amount: U256) {
        let mut state = self.state.lock().unwrap();
        state.accounts.entry(address).or_default().balance += amount;
    }

    /// Pin an account's next nonce, for scenarios that start mid-history.
    pub fn set_nonce(&self, address: Address, nonce: u64) {
        let mut state = self.state.lock().unwrap();
        state.accounts.entry(address).or_default().nonce = nonce;
    }

    pub fn balance(&self, address: Address) -> U256 {
        let state = self.state.lock().unwrap();
        state
            .accounts
            .get(&address)
            .map(|account| account.balance)
            .unwrap_or_default()
    }

    /// Nonces accepted from `from`, in submission order.
    pub fn recorded_nonces(&self, from: Address) -> Vec<u64> {
        let state = self.state.lock().unwrap();
        state
            .nonce_log
            .iter()
            .filter(|(sender, _)| *sender == from)
            .map(|(_, nonce)| *nonce)
            .collect()
    }

    /// Make `wait` for this hash sleep before resolving, to exercise
    /// out-of-order confirmation.
    pub fn delay_wait(&self, hash: B256, delay: Duration) {
        let mut state = self.state.lock().unwrap();
        state.wait_delays.insert(hash, delay);
    }

    /// Hashes in the order their waits resolved.
    pub fn wait_completions(&self) -> Vec<B256> {
        self.state.lock().unwrap().wait_log.clone()
    }

    /// Forget a submitted transaction, as if it fell out of the pool.
    pub fn drop_transaction(&self, hash: B256) {
        let mut state = self.state.lock().unwrap();
        state.outcomes.remove(&hash);
    }

    /// Phase of the swap keyed by `side_a` at `escrow_address`, if any.
    pub fn swap_phase(&self, escrow_address: Address, side_a: &SwapInfo) -> Option<SwapPhase> {
        let state = self.state.lock().unwrap();
        match state.contracts.get(&escrow_address)? {
            Contract::Escrow(state) => state.swaps.get(&swap_key(side_a)).map(|s| s.phase),
            Contract::Token(_) => None,
        }
    }

    fn execute(&self, tx: TxRequest) -> Result<PendingTx, LedgerError> {
        let mut state = self.state.lock().unwrap();

        let account = state.accounts.entry(tx.from).or_default();
        let expected = account.nonce;
        let nonce = tx.nonce.unwrap_or(expected);
        if nonce != expected {
            return Err(LedgerError::Rpc(format!(
                "invalid nonce for {}: expected {expected}, got {nonce}",
                tx.from
            )));
        }
        if account.balance < tx.value {
            return Err(LedgerError::Rpc(format!(
                "insufficient funds: {} holds {}, sends {}",
                tx.from, account.balance, tx.value
            )));
        }
        account.nonce += 1;
        state.nonce_log.push((tx.from, nonce));
        state.block_number += 1;
        let block_number = state.block_number;

        let hash = tx_hash(&tx, nonce);

        // Run against scratch copies so a revert leaves only the consumed
        // nonce behind.
        let mut accounts = state.accounts.clone();
        let mut contracts = state.contracts.clone();
        if let Some(sender) = accounts.get_mut(&tx.from) {
            sender.balance -= tx.value;
        }

        match apply(&mut accounts, &mut contracts, &tx, nonce) {
            Ok(created) => {
                state.accounts = accounts;
                state.contracts = contracts;
                let receipt = Receipt {
                    transaction_hash: hash,
                    block_number,
                    contract_address: created,
                    gas_used: 21_000 + 16 * tx.data.len() as u64,
                };
                state.outcomes.insert(hash, TxOutcome::Mined(receipt));
            }
            Err(reason) => {
                debug!(%hash, reason, "transaction reverted");
                state.outcomes.insert(hash, TxOutcome::Reverted);
            }
        }

        Ok(PendingTx { hash })
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn get_transaction_count(&self, address: Address) -> Result<u64, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .get(&address)
            .map(|account| account.nonce)
            .unwrap_or_default())
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<PendingTx, LedgerError> {
        self.execute(tx)
    }

    async fn call(&self, request: CallRequest) -> Result<Vec<u8>, LedgerError> {
        let state = self.state.lock().unwrap();
        let contract = state
            .contracts
            .get(&request.to)
            .ok_or_else(|| LedgerError::Rpc(format!("call to non-contract {}", request.to)))?;

        match contract {
            Contract::Token(token) => match erc20::TokenCall::decode(&request.data) {
                Some(erc20::TokenCall::BalanceOf { owner }) => {
                    let balance = token.balances.get(&owner).copied().unwrap_or_default();
                    Ok(abi::u256_word(balance).to_vec())
                }
                _ => Err(LedgerError::Rpc("unsupported token query".into())),
            },
            Contract::Escrow(escrow_state) => match escrow::EscrowCall::decode(&request.data) {
                Some(escrow::EscrowCall::SecretKeyHash) => {
                    Ok(escrow_state.secret_hash.as_slice().to_vec())
                }
                _ => Err(LedgerError::Rpc("unsupported escrow query".into())),
            },
        }
    }

    async fn wait(&self, pending: &PendingTx) -> Result<Receipt, LedgerError> {
        let delay = {
            let state = self.state.lock().unwrap();
            state.wait_delays.get(&pending.hash).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        state.wait_log.push(pending.hash);
        match state.outcomes.get(&pending.hash) {
            Some(TxOutcome::Mined(receipt)) => Ok(receipt.clone()),
            Some(TxOutcome::Reverted) => Err(LedgerError::TransactionReverted {
                hash: pending.hash,
            }),
            None => Err(LedgerError::TransactionDropped {
                hash: pending.hash,
            }),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EXECUTION
// ════════════════════════════════════════════════════════════════════════════

type Accounts = HashMap<Address, AccountState>;
type Contracts = HashMap<Address, Contract>;

fn apply(
    accounts: &mut Accounts,
    contracts: &mut Contracts,
    tx: &TxRequest,
    nonce: u64,
) -> Result<Option<Address>, String> {
    match tx.to {
        None => deploy(accounts, contracts, tx, nonce).map(Some),
        Some(to) => {
            accounts.entry(to).or_default().balance += tx.value;
            if contracts.contains_key(&to) {
                dispatch(contracts, to, tx.from, &tx.data)?;
            }
            Ok(None)
        }
    }
}

fn deploy(
    accounts: &mut Accounts,
    contracts: &mut Contracts,
    tx: &TxRequest,
    nonce: u64,
) -> Result<Address, String> {
    let (kind, ctor_args) = parse_artifact(&tx.data).ok_or("unknown creation bytecode")?;
    let address = create_address(tx.from, nonce);

    let contract = match kind {
        ContractKind::Escrow => {
            // The cleartext secret rides in the payload; only its hash is kept.
            let (_secret, secret_hash) = escrow::decode_constructor_args(ctor_args)
                .ok_or("bad escrow constructor arguments")?;
            Contract::Escrow(EscrowState {
                secret_hash,
                swaps: HashMap::new(),
            })
        }
        ContractKind::Token | ContractKind::LegacyToken => {
            let mut balances = HashMap::new();
            balances.insert(tx.from, U256::from(TOKEN_SUPPLY));
            Contract::Token(TokenState {
                strict: kind == ContractKind::Token,
                balances,
                allowances: HashMap::new(),
            })
        }
    };

    contracts.insert(address, contract);
    accounts.entry(address).or_default().balance += tx.value;
    Ok(address)
}

fn parse_artifact(data: &[u8]) -> Option<(ContractKind, &[u8])> {
    for (marker, kind) in [
        (ESCROW_MARKER, ContractKind::Escrow),
        (TOKEN_MARKER, ContractKind::Token),
        (LEGACY_MARKER, ContractKind::LegacyToken),
    ] {
        if let Some(args) = data.strip_prefix(marker) {
            return Some((kind, args));
        }
    }
    None
}

fn dispatch(
    contracts: &mut Contracts,
    to: Address,
    sender: Address,
    data: &[u8],
) -> Result<(), String> {
    match contracts.get(&to) {
        Some(Contract::Token(_)) => {
            let call = erc20::TokenCall::decode(data).ok_or("unknown token call")?;
            dispatch_token(contracts, to, sender, call)
        }
        Some(Contract::Escrow(_)) => {
            let call = escrow::EscrowCall::decode(data).ok_or("unknown escrow call")?;
            dispatch_escrow(contracts, to, sender, call)
        }
        None => Err(format!("{to} is not a contract")),
    }
}

fn dispatch_token(
    contracts: &mut Contracts,
    token: Address,
    sender: Address,
    call: erc20::TokenCall,
) -> Result<(), String> {
    match call {
        erc20::TokenCall::Transfer { to, amount } => {
            // A plain sender has no way to act on the returned flag, so a
            // legacy `false` still mines successfully.
            let _ = token_move(contracts, token, sender, to, amount, None)?;
            Ok(())
        }
        erc20::TokenCall::Approve { spender, amount } => {
            let state = token_state_mut(contracts, token)?;
            state.allowances.insert((sender, spender), amount);
            Ok(())
        }
        erc20::TokenCall::TransferFrom { from, to, amount } => {
            let _ = token_move(contracts, token, from, to, amount, Some(sender))?;
            Ok(())
        }
        erc20::TokenCall::BalanceOf { .. } => Ok(()),
    }
}

fn dispatch_escrow(
    contracts: &mut Contracts,
    escrow_address: Address,
    sender: Address,
    call: escrow::EscrowCall,
) -> Result<(), String> {
    match call {
        escrow::EscrowCall::Initiate(order) => {
            if sender != order.side_a.party {
                return Err("initiate: sender is not side A".into());
            }
            initiate(contracts, escrow_address, order)
        }
        escrow::EscrowCall::InitiateWithSig(order, sig) => {
            let signer = recover_signer(order.digest(), &sig)?;
            if signer != order.side_a.party {
                return Err("initiate: signature does not recover to side A".into());
            }
            initiate(contracts, escrow_address, order)
        }
        escrow::EscrowCall::Complete(side_a) => {
            let order = lookup_initiated(contracts, escrow_address, &side_a)?;
            if sender != order.side_b.party {
                return Err("complete: sender is not side B".into());
            }
            complete(contracts, escrow_address, order)
        }
        escrow::EscrowCall::CompleteBySig(side_a, sig) => {
            let order = lookup_initiated(contracts, escrow_address, &side_a)?;
            let signer = recover_signer(order.digest(), &sig)?;
            if signer != order.side_b.party {
                return Err("complete: signature does not recover to side B".into());
            }
            complete(contracts, escrow_address, order)
        }
        escrow::EscrowCall::SecretKeyHash => Ok(()),
    }
}

fn initiate(
    contracts: &mut Contracts,
    escrow_address: Address,
    order: SwapOrder,
) -> Result<(), String> {
    let key = swap_key(&order.side_a);
    {
        let state = escrow_state(contracts, escrow_address)?;
        if let Some(existing) = state.swaps.get(&key) {
            if existing.phase == SwapPhase::Initiated {
                return Err("swap already initiated".into());
            }
        }
    }

    // Escrow pulls side A's offer into itself. The transfer's returned flag
    // is not checked, matching the deployed contract.
    let _ = token_move(
        contracts,
        order.side_a.token,
        order.side_a.party,
        escrow_address,
        order.side_a.token_amount,
        Some(escrow_address),
    )?;

    let state = escrow_state_mut(contracts, escrow_address)?;
    state.swaps.insert(
        key,
        StoredSwap {
            order,
            phase: SwapPhase::Initiated,
        },
    );
    Ok(())
}

fn complete(
    contracts: &mut Contracts,
    escrow_address: Address,
    order: SwapOrder,
) -> Result<(), String> {
    // Side B pays side A directly, then the escrow releases its held funds
    // to side B. Returned flags are, again, not checked.
    let _ = token_move(
        contracts,
        order.side_b.token,
        order.side_b.party,
        order.side_a.party,
        order.side_b.token_amount,
        Some(escrow_address),
    )?;
    let _ = token_move(
        contracts,
        order.side_a.token,
        escrow_address,
        order.side_b.party,
        order.side_a.token_amount,
        None,
    )?;

    let state = escrow_state_mut(contracts, escrow_address)?;
    let stored = state
        .swaps
        .get_mut(&swap_key(&order.side_a))
        .ok_or("swap vanished mid-completion")?;
    stored.phase = SwapPhase::Completed;
    Ok(())
}

fn lookup_initiated(
    contracts: &Contracts,
    escrow_address: Address,
    side_a: &SwapInfo,
) -> Result<SwapOrder, String> {
    let state = match contracts.get(&escrow_address) {
        Some(Contract::Escrow(state)) => state,
        _ => return Err(format!("{escrow_address} is not an escrow")),
    };
    let stored = state
        .swaps
        .get(&swap_key(side_a))
        .ok_or("complete: no such swap")?;
    if stored.phase != SwapPhase::Initiated {
        return Err("complete: swap is not in the initiated phase".into());
    }
    Ok(stored.order)
}

/// Move tokens, honoring the flavor's failure mode. `Ok(false)` is the
/// legacy token's silent no-op; strict tokens revert instead.
fn token_move(
    contracts: &mut Contracts,
    token: Address,
    from: Address,
    to: Address,
    amount: U256,
    spender: Option<Address>,
) -> Result<bool, String> {
    let state = token_state_mut(contracts, token)?;

    let balance = state.balances.get(&from).copied().unwrap_or_default();
    if balance < amount {
        if state.strict {
            return Err(format!("token {token}: balance of {from} below {amount}"));
        }
        return Ok(false);
    }

    if let Some(spender) = spender {
        if spender != from {
            let key = (from, spender);
            let allowance = state.allowances.get(&key).copied().unwrap_or_default();
            if allowance < amount {
                if state.strict {
                    return Err(format!("token {token}: allowance for {spender} exceeded"));
                }
                return Ok(false);
            }
            if allowance != U256::MAX {
                state.allowances.insert(key, allowance - amount);
            }
        }
    }

    state.balances.insert(from, balance - amount);
    *state.balances.entry(to).or_default() += amount;
    Ok(true)
}

fn token_state_mut<'a>(
    contracts: &'a mut Contracts,
    token: Address,
) -> Result<&'a mut TokenState, String> {
    match contracts.get_mut(&token) {
        Some(Contract::Token(state)) => Ok(state),
        _ => Err(format!("{token} is not a token")),
    }
}

fn escrow_state<'a>(
    contracts: &'a Contracts,
    escrow_address: Address,
) -> Result<&'a EscrowState, String> {
    match contracts.get(&escrow_address) {
        Some(Contract::Escrow(state)) => Ok(state),
        _ => Err(format!("{escrow_address} is not an escrow")),
    }
}

fn escrow_state_mut<'a>(
    contracts: &'a mut Contracts,
    escrow_address: Address,
) -> Result<&'a mut EscrowState, String> {
    match contracts.get_mut(&escrow_address) {
        Some(Contract::Escrow(state)) => Ok(state),
        _ => Err(format!("{escrow_address} is not an escrow")),
    }
}

fn recover_signer(digest: B256, sig: &[u8]) -> Result<Address, String> {
    let signature = Signature::from_bytes(sig).map_err(|e| e.to_string())?;
    recover(digest, &signature).map_err(|e| e.to_string())
}

/// Swaps are keyed by the hash of side A's three encoded fields.
fn swap_key(side: &SwapInfo) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(abi::address_word(side.party));
    hasher.update(abi::address_word(side.token));
    hasher.update(abi::u256_word(side.token_amount));
    let hash: [u8; 32] = hasher.finalize().into();
    B256::from(hash)
}

/// Deterministic creation address: `keccak(rlp([sender, nonce]))[12..]`.
fn create_address(sender: Address, nonce: u64) -> Address {
    let mut nonce_bytes = nonce.to_be_bytes().to_vec();
    while nonce_bytes.first() == Some(&0) {
        nonce_bytes.remove(0);
    }

    let mut payload = Vec::with_capacity(23 + nonce_bytes.len());
    payload.push(0x80 + 20);
    payload.extend_from_slice(sender.as_slice());
    match nonce_bytes.as_slice() {
        [] => payload.push(0x80),
        [byte] if *byte < 0x80 => payload.push(*byte),
        bytes => {
            payload.push(0x80 + bytes.len() as u8);
            payload.extend_from_slice(bytes);
        }
    }

    let mut rlp = Vec::with_capacity(payload.len() + 1);
    rlp.push(0xc0 + payload.len() as u8);
    rlp.extend_from_slice(&payload);

    let mut hasher = Keccak256::new();
    hasher.update(&rlp);
    let hash: [u8; 32] = hasher.finalize().into();
    Address::from_slice(&hash[12..])
}

fn tx_hash(tx: &TxRequest, nonce: u64) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(tx.from.as_slice());
    hasher.update(nonce.to_be_bytes());
    match tx.to {
        Some(to) => {
            hasher.update([1u8]);
            hasher.update(to.as_slice());
        }
        None => hasher.update([0u8]),
    }
    hasher.update(abi::u256_word(tx.value));
    hasher.update(&tx.data);
    let hash: [u8; 32] = hasher.finalize().into();
    B256::from(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::confirm_one;
    use std::str::FromStr;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[tokio::test]
    async fn native_transfer_moves_value_and_consumes_nonce() {
        let ledger = MemoryLedger::new();
        ledger.fund(addr(1), U256::from(1_000u64));

        let tx = TxRequest::to(addr(1), addr(2)).value(U256::from(400u64));
        let pending = ledger.send_transaction(tx).await.unwrap();
        confirm_one(&ledger, &pending).await.unwrap();

        assert_eq!(ledger.balance(addr(1)), U256::from(600u64));
        assert_eq!(ledger.balance(addr(2)), U256::from(400u64));
        assert_eq!(ledger.get_transaction_count(addr(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn submission_rejects_wrong_nonce_and_insufficient_funds() {
        let ledger = MemoryLedger::new();
        ledger.fund(addr(1), U256::from(10u64));

        let wrong_nonce = TxRequest::to(addr(1), addr(2)).nonce(5);
        assert!(matches!(
            ledger.send_transaction(wrong_nonce).await,
            Err(LedgerError::Rpc(_))
        ));

        let too_much = TxRequest::to(addr(1), addr(2)).value(U256::from(11u64));
        assert!(matches!(
            ledger.send_transaction(too_much).await,
            Err(LedgerError::Rpc(_))
        ));

        // Neither attempt consumed a nonce.
        assert_eq!(ledger.get_transaction_count(addr(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deploy_mints_supply_and_reports_creation_address() {
        let ledger = MemoryLedger::new();
        let deployer = addr(7);

        let tx = TxRequest::deploy(deployer, MemoryLedger::artifact(ContractKind::Token));
        let pending = ledger.send_transaction(tx).await.unwrap();
        let receipt = confirm_one(&ledger, &pending).await.unwrap();

        let token = receipt.contract_address.expect("creation address");
        assert_eq!(token, create_address(deployer, 0));

        let balance = ledger
            .call(CallRequest::new(token, erc20::balance_of(deployer)))
            .await
            .unwrap();
        assert_eq!(
            abi::word_to_u256(&balance),
            Some(U256::from(TOKEN_SUPPLY))
        );
    }

    #[tokio::test]
    async fn strict_transfer_reverts_after_consuming_the_nonce() {
        let ledger = MemoryLedger::new();
        let deployer = addr(7);
        let tx = TxRequest::deploy(deployer, MemoryLedger::artifact(ContractKind::Token));
        let receipt = confirm_one(&ledger, &ledger.send_transaction(tx).await.unwrap())
            .await
            .unwrap();
        let token = receipt.contract_address.unwrap();

        // addr(9) holds nothing; a strict transfer must revert.
        let doomed = TxRequest::to(addr(9), token).data(erc20::transfer(addr(1), U256::from(5u64)));
        let pending = ledger.send_transaction(doomed).await.unwrap();
        assert!(matches!(
            confirm_one(&ledger, &pending).await,
            Err(LedgerError::TransactionReverted { .. })
        ));
        assert_eq!(ledger.get_transaction_count(addr(9)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn legacy_transfer_of_missing_funds_mines_and_moves_nothing() {
        let ledger = MemoryLedger::new();
        let deployer = addr(7);
        let tx = TxRequest::deploy(deployer, MemoryLedger::artifact(ContractKind::LegacyToken));
        let receipt = confirm_one(&ledger, &ledger.send_transaction(tx).await.unwrap())
            .await
            .unwrap();
        let token = receipt.contract_address.unwrap();

        let hopeless = TxRequest::to(addr(9), token).data(erc20::transfer(addr(1), U256::from(5u64)));
        let pending = ledger.send_transaction(hopeless).await.unwrap();
        confirm_one(&ledger, &pending).await.unwrap();

        let balance = ledger
            .call(CallRequest::new(token, erc20::balance_of(addr(1))))
            .await
            .unwrap();
        assert_eq!(abi::word_to_u256(&balance), Some(U256::ZERO));
    }

    #[tokio::test]
    async fn escrow_stores_only_the_secret_hash() {
        let ledger = MemoryLedger::new();
        let deployer = addr(7);
        let secret_hash = B256::repeat_byte(0x44);

        let mut code = MemoryLedger::artifact(ContractKind::Escrow);
        code.extend_from_slice(&escrow::constructor_args("hunter2", secret_hash));
        let receipt = confirm_one(
            &ledger,
            &ledger
                .send_transaction(TxRequest::deploy(deployer, code))
                .await
                .unwrap(),
        )
        .await
        .unwrap();
        let escrow_address = receipt.contract_address.unwrap();

        let stored = ledger
            .call(CallRequest::new(escrow_address, escrow::get_secret_key_hash()))
            .await
            .unwrap();
        assert_eq!(stored, secret_hash.as_slice());
    }

    #[tokio::test]
    async fn dropped_transactions_surface_from_wait() {
        let ledger = MemoryLedger::new();
        ledger.fund(addr(1), U256::from(10u64));
        let pending = ledger
            .send_transaction(TxRequest::to(addr(1), addr(2)).value(U256::from(1u64)))
            .await
            .unwrap();

        ledger.drop_transaction(pending.hash);
        assert!(matches!(
            ledger.wait(&pending).await,
            Err(LedgerError::TransactionDropped { .. })
        ));
    }

    #[test]
    fn creation_addresses_match_known_vectors() {
        let sender = Address::from_str("0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0").unwrap();
        assert_eq!(
            create_address(sender, 0),
            Address::from_str("0xcd234a471b72ba2f1ccf0a70fcaba648a5eecd8d").unwrap()
        );
        assert_eq!(
            create_address(sender, 1),
            Address::from_str("0x343c43a37d37dff08ae8c4a11544c718abb4fcf8").unwrap()
        );
    }

    #[test]
    fn tx_hashes_are_unique_per_sender_and_nonce() {
        let tx = TxRequest::to(addr(1), addr(2)).value(U256::from(5u64));
        assert_ne!(tx_hash(&tx, 0), tx_hash(&tx, 1));
        let other_sender = TxRequest::to(addr(3), addr(2)).value(U256::from(5u64));
        assert_ne!(tx_hash(&tx, 0), tx_hash(&other_sender, 0));
    }
}
