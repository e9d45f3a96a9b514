//! The chain facade: the single entry point for domain requests.
//!
//! Every request follows the same shape:
//!
//!   Request → validate → (ClaimVerifier, for claims) → Payload → Ledger::append → side effects
//!
//! The facade owns the policy and claim registries and the organization
//! registry. The ledger, verifier and token ledger are injected as trait
//! objects so each can be replaced in tests.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use carechain_contracts::{
    block::{ClaimEntry, DataSharingEntry, HashBlock, Payload, PolicyEntry, RewardEntry},
    config::ChainConfig,
    error::{CareChainError, CareChainResult},
    query::{
        ArchiveRecord, ChainAnalytics, ChainSnapshot, ClaimOutcome, PatientRecord, PolicyOutcome,
    },
    records::{Claim, ClaimStatus, Organization, Policy},
    request::{IssuePolicyRequest, ShareDataRequest, SubmitClaimRequest},
    verify::{ClaimAssessment, RejectionReason},
};

use crate::traits::{ClaimVerifier, Ledger, TokenLedger};

/// Permission a sender needs for `share_data_between_orgs`.
pub const PERMISSION_SHARE: &str = "data:share";
/// Permission a recipient needs for `share_data_between_orgs`.
pub const PERMISSION_RECEIVE: &str = "data:receive";

/// Policies and claims accepted so far, keyed by id.
#[derive(Default)]
struct Registry {
    policies: HashMap<String, Policy>,
    claims: HashMap<String, Claim>,
    archive: Vec<ArchiveRecord>,
}

/// Orchestrates ledger writes for policies, claims, rewards and data sharing.
///
/// Construct one facade per chain. All methods take `&self`; the facade can
/// be shared across threads behind an `Arc`.
pub struct ChainFacade {
    ledger: Box<dyn Ledger>,
    verifier: Box<dyn ClaimVerifier>,
    tokens: Box<dyn TokenLedger>,
    organizations: HashMap<String, Organization>,
    config: ChainConfig,
    registry: Mutex<Registry>,
}

impl ChainFacade {
    /// Wire the components together and load the organization registry.
    ///
    /// Fails with `ConfigError` if `config` is invalid or two organizations
    /// share an id.
    pub fn new(
        ledger: Box<dyn Ledger>,
        verifier: Box<dyn ClaimVerifier>,
        tokens: Box<dyn TokenLedger>,
        organizations: Vec<Organization>,
        config: ChainConfig,
    ) -> CareChainResult<Self> {
        config.validate()?;

        let mut registry = HashMap::with_capacity(organizations.len());
        for org in organizations {
            if registry.contains_key(&org.id) {
                return Err(CareChainError::ConfigError {
                    reason: format!("organization '{}' is registered twice", org.id),
                });
            }
            registry.insert(org.id.clone(), org);
        }

        debug!(
            organizations = registry.len(),
            difficulty = config.difficulty,
            "chain facade initialized"
        );

        Ok(Self {
            ledger,
            verifier,
            tokens,
            organizations: registry,
            config,
            registry: Mutex::new(Registry::default()),
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// Register a new policy and append a POLICY block.
    ///
    /// A zero coverage or premium, or an id that is already registered,
    /// returns `PolicyOutcome::Refused` and writes nothing.
    pub fn issue_policy(&self, request: IssuePolicyRequest) -> CareChainResult<PolicyOutcome> {
        let refusal = if request.coverage == 0 {
            Some("coverage must be positive")
        } else if request.premium == 0 {
            Some("premium must be positive")
        } else {
            None
        };

        let mut registry = self.lock_registry()?;
        let refusal = refusal.or_else(|| {
            registry
                .policies
                .contains_key(&request.policy_id)
                .then_some("policy id already registered")
        });
        if let Some(reason) = refusal {
            warn!(policy_id = %request.policy_id, reason, "policy refused; nothing committed");
            return Ok(PolicyOutcome::Refused {
                policy_id: request.policy_id,
                reason: reason.to_string(),
            });
        }

        let policy_hash = policy_digest(
            &request.policy_id,
            &request.patient_id,
            request.coverage,
            request.premium,
        );

        let policy = Policy {
            policy_id: request.policy_id,
            patient_id: request.patient_id,
            insurance_company: request.insurance_company,
            coverage: request.coverage,
            premium: request.premium,
            conditions: request.conditions,
            is_active: true,
            created_at: Utc::now(),
            policy_hash,
        };

        let block = self.ledger.append(Payload::Policy(PolicyEntry {
            policy_id: policy.policy_id.clone(),
            patient_id: policy.patient_id.clone(),
            insurance_company: policy.insurance_company.clone(),
            coverage: policy.coverage,
            premium: policy.premium,
            conditions: policy.conditions.clone(),
            is_active: policy.is_active,
            created_at: policy.created_at,
            policy_hash: policy.policy_hash.clone(),
        }))?;

        info!(
            policy_id = %policy.policy_id,
            patient_id = %policy.patient_id,
            block_index = block.index,
            "policy issued"
        );

        registry.policies.insert(policy.policy_id.clone(), policy.clone());
        Ok(PolicyOutcome::Issued {
            policy,
            block_index: block.index,
        })
    }

    /// Verify a claim and, if it reaches scoring, commit it.
    ///
    /// Hard rejections (zero cost, duplicate id, unknown or inactive policy,
    /// cost above coverage, missing documents) return
    /// `ClaimOutcome::Rejected` and write nothing. Every other claim is
    /// appended as a CLAIM block; approved claims also trigger a loyalty
    /// reward.
    ///
    /// Once the CLAIM block is appended the claim stays committed. A failed
    /// reward is logged and reported as `reward_block_index: None`.
    pub fn submit_claim(&self, request: SubmitClaimRequest) -> CareChainResult<ClaimOutcome> {
        let mut registry = self.lock_registry()?;

        let mut claim = Claim {
            claim_id: request.claim_id,
            policy_id: request.policy_id,
            patient_id: request.patient_id,
            hospital_id: request.hospital_id,
            diagnosis: request.diagnosis,
            treatment_cost: request.treatment_cost,
            documents: request.documents,
            status: ClaimStatus::Pending,
            rejection_reason: None,
            submitted_at: Utc::now(),
            verification_score: 0,
        };

        let assessment = if claim.treatment_cost == 0 {
            ClaimAssessment::hard_reject(RejectionReason::NonPositiveCost)
        } else if registry.claims.contains_key(&claim.claim_id) {
            ClaimAssessment::hard_reject(RejectionReason::DuplicateClaim)
        } else {
            self.verifier
                .evaluate(&claim, registry.policies.get(&claim.policy_id))
        };

        claim.status = assessment.status;
        claim.verification_score = assessment.score;
        claim.rejection_reason = assessment.rejection.as_ref().map(ToString::to_string);

        if assessment.is_hard_rejection() {
            warn!(
                claim_id = %claim.claim_id,
                policy_id = %claim.policy_id,
                reason = claim.rejection_reason.as_deref().unwrap_or_default(),
                "claim rejected before scoring; nothing committed"
            );
            return Ok(ClaimOutcome::Rejected { claim });
        }

        let block = self.ledger.append(Payload::Claim(ClaimEntry {
            claim_id: claim.claim_id.clone(),
            policy_id: claim.policy_id.clone(),
            patient_id: claim.patient_id.clone(),
            hospital_id: claim.hospital_id.clone(),
            diagnosis: claim.diagnosis.clone(),
            treatment_cost: claim.treatment_cost,
            documents: claim.documents.clone(),
            status: claim.status,
            rejection_reason: claim.rejection_reason.clone(),
            submitted_at: claim.submitted_at,
            verification_score: claim.verification_score,
        }))?;

        info!(
            claim_id = %claim.claim_id,
            status = %claim.status,
            score = claim.verification_score,
            block_index = block.index,
            "claim committed"
        );

        registry.claims.insert(claim.claim_id.clone(), claim.clone());
        drop(registry);

        let reward_block_index = if claim.status == ClaimStatus::Approved {
            match self.reward_loyalty_tokens(
                &claim.patient_id,
                self.config.approval_reward,
                Some(&claim.claim_id),
            ) {
                Ok(reward) => Some(reward.index),
                Err(e) => {
                    warn!(
                        claim_id = %claim.claim_id,
                        error = %e,
                        "claim committed but loyalty reward failed"
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(ClaimOutcome::Committed {
            claim,
            block_index: block.index,
            reward_block_index,
        })
    }

    /// Append a REWARD block, then mint `amount` tokens to `patient_id`.
    ///
    /// Supply headroom is checked before anything is written, so a failed
    /// append mints nothing and an appended grant is always minted.
    pub fn reward_loyalty_tokens(
        &self,
        patient_id: &str,
        amount: u64,
        claim_id: Option<&str>,
    ) -> CareChainResult<HashBlock> {
        if self.tokens.total_supply().checked_add(amount).is_none() {
            return Err(CareChainError::TokenError {
                reason: format!(
                    "rewarding {} {} to '{}' overflows the supply",
                    amount,
                    self.tokens.symbol(),
                    patient_id
                ),
            });
        }

        let block = self.ledger.append(Payload::Reward(RewardEntry {
            patient_id: patient_id.to_string(),
            amount,
            token_symbol: self.tokens.symbol().to_string(),
            claim_id: claim_id.map(str::to_string),
        }))?;

        self.tokens.mint(patient_id, amount)?;

        info!(
            patient_id = %patient_id,
            amount,
            symbol = %self.tokens.symbol(),
            block_index = block.index,
            "loyalty tokens rewarded"
        );

        Ok(block)
    }

    /// Record an authorized data transfer between two registered organizations.
    ///
    /// Returns `Ok(false)` and appends nothing if either organization is
    /// unknown, the sender lacks `data:share`, or the recipient lacks
    /// `data:receive`.
    pub fn share_data_between_orgs(&self, request: ShareDataRequest) -> CareChainResult<bool> {
        let checks = [
            (&request.from_org, PERMISSION_SHARE),
            (&request.to_org, PERMISSION_RECEIVE),
        ];
        for (org_id, permission) in checks {
            let refusal = match self.organizations.get(org_id) {
                None => "organization not registered",
                Some(org) if !org.has_permission(permission) => "missing permission",
                Some(_) => continue,
            };
            warn!(
                org_id = %org_id,
                permission,
                data_type = %request.data_type,
                "data sharing refused: {}",
                refusal
            );
            return Ok(false);
        }

        let share_id = Uuid::new_v4();
        let block = self.ledger.append(Payload::DataSharing(DataSharingEntry {
            share_id,
            from_org: request.from_org,
            to_org: request.to_org,
            data_type: request.data_type,
            data_hash: request.data_hash,
            patient_id: request.patient_id,
            authorized: true,
        }))?;

        info!(%share_id, block_index = block.index, "data sharing recorded");
        Ok(true)
    }

    /// Copy a committed high-value claim to the off-chain archive.
    ///
    /// Returns `None` when the claim was never committed or its cost does not
    /// exceed `large_claim_threshold`. Archiving the same claim twice returns
    /// the existing record.
    pub fn archive_large_claim(&self, claim: &Claim) -> CareChainResult<Option<ArchiveRecord>> {
        if claim.treatment_cost <= self.config.large_claim_threshold {
            return Ok(None);
        }

        let mut registry = self.lock_registry()?;
        let Some(committed) = registry.claims.get(&claim.claim_id).cloned() else {
            debug!(claim_id = %claim.claim_id, "archive skipped: claim not committed");
            return Ok(None);
        };
        if let Some(existing) = registry.archive.iter().find(|r| r.claim_id == committed.claim_id) {
            return Ok(Some(existing.clone()));
        }

        let record = ArchiveRecord {
            claim_id: committed.claim_id,
            patient_id: committed.patient_id,
            amount: committed.treatment_cost,
            status: committed.status,
            anchor_hash: self.ledger.tip().hash,
            archived_at: Utc::now(),
        };

        info!(
            claim_id = %record.claim_id,
            amount = record.amount,
            anchor = %record.anchor_hash,
            "large claim archived"
        );

        registry.archive.push(record.clone());
        Ok(Some(record))
    }

    /// Move tokens between two addresses. `Ok(false)` on insufficient balance.
    pub fn transfer_tokens(&self, from: &str, to: &str, amount: u64) -> CareChainResult<bool> {
        let moved = self.tokens.transfer(from, to, amount)?;
        if !moved {
            debug!(from = %from, to = %to, amount, "token transfer refused: insufficient balance");
        }
        Ok(moved)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Everything the ledger holds about `patient_id`, plus their token balance.
    pub fn get_patient_record(&self, patient_id: &str) -> PatientRecord {
        let mut record = PatientRecord {
            patient_id: patient_id.to_string(),
            policies: Vec::new(),
            claims: Vec::new(),
            rewards: Vec::new(),
            token_balance: self.tokens.balance_of(patient_id),
        };

        for block in self.ledger.blocks() {
            if block.payload.patient_id() != Some(patient_id) {
                continue;
            }
            match block.payload {
                Payload::Policy(entry) => record.policies.push(entry),
                Payload::Claim(entry) => record.claims.push(entry),
                Payload::Reward(entry) => record.rewards.push(entry),
                Payload::Genesis { .. } | Payload::DataSharing(_) => {}
            }
        }

        record
    }

    /// Aggregate counters over the whole chain.
    pub fn get_chain_analytics(&self) -> ChainAnalytics {
        let blocks = self.ledger.blocks();

        let mut total_policies = 0;
        let mut total_claims = 0;
        let mut approved_claims = 0;
        let mut total_rewards_issued: u64 = 0;

        for block in &blocks {
            match &block.payload {
                Payload::Policy(_) => total_policies += 1,
                Payload::Claim(entry) => {
                    total_claims += 1;
                    if entry.status == ClaimStatus::Approved {
                        approved_claims += 1;
                    }
                }
                Payload::Reward(entry) => {
                    total_rewards_issued = total_rewards_issued.saturating_add(entry.amount);
                }
                Payload::Genesis { .. } | Payload::DataSharing(_) => {}
            }
        }

        let approval_rate = if total_claims == 0 {
            0.0
        } else {
            approved_claims as f64 / total_claims as f64 * 100.0
        };

        ChainAnalytics {
            total_blocks: blocks.len(),
            total_policies,
            total_claims,
            approved_claims,
            approval_rate,
            total_rewards_issued,
            is_chain_valid: self.ledger.verify(),
        }
    }

    pub fn is_chain_valid(&self) -> bool {
        self.ledger.verify()
    }

    pub fn first_invalid_block(&self) -> Option<u64> {
        self.ledger.first_invalid_block()
    }

    pub fn export_chain(&self) -> ChainSnapshot {
        self.ledger.export()
    }

    pub fn block_count(&self) -> usize {
        self.ledger.block_count()
    }

    pub fn get_policy(&self, policy_id: &str) -> Option<Policy> {
        self.read_registry().policies.get(policy_id).cloned()
    }

    pub fn get_claim(&self, claim_id: &str) -> Option<Claim> {
        self.read_registry().claims.get(claim_id).cloned()
    }

    /// Archived large claims in archive order.
    pub fn archived_claims(&self) -> Vec<ArchiveRecord> {
        self.read_registry().archive.clone()
    }

    pub fn organization(&self, org_id: &str) -> Option<&Organization> {
        self.organizations.get(org_id)
    }

    /// All registered organizations, sorted by id.
    pub fn organizations(&self) -> Vec<&Organization> {
        let mut orgs: Vec<&Organization> = self.organizations.values().collect();
        orgs.sort_by(|a, b| a.id.cmp(&b.id));
        orgs
    }

    pub fn token_balance(&self, address: &str) -> u64 {
        self.tokens.balance_of(address)
    }

    pub fn token_supply(&self) -> u64 {
        self.tokens.total_supply()
    }

    pub fn token_name(&self) -> &str {
        self.tokens.name()
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn lock_registry(&self) -> CareChainResult<MutexGuard<'_, Registry>> {
        self.registry.lock().map_err(|e| CareChainError::LedgerWriteFailed {
            reason: format!("registry lock poisoned: {}", e),
        })
    }

    fn read_registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Hex SHA-256 over (policy_id, patient_id, coverage, premium).
fn policy_digest(policy_id: &str, patient_id: &str, coverage: u64, premium: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(policy_id.as_bytes());
    hasher.update(patient_id.as_bytes());
    hasher.update(coverage.to_le_bytes());
    hasher.update(premium.to_le_bytes());
    hex::encode(hasher.finalize())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{
        collections::{BTreeSet, HashMap},
        sync::{Arc, Mutex},
    };

    use chrono::Utc;

    use carechain_contracts::{
        block::{HashBlock, Payload, PayloadKind},
        config::ChainConfig,
        error::{CareChainError, CareChainResult},
        query::{ChainSnapshot, ClaimOutcome, PolicyOutcome},
        records::{Claim, ClaimDocument, ClaimStatus, Organization, Policy},
        request::{IssuePolicyRequest, ShareDataRequest, SubmitClaimRequest},
        verify::{ClaimAssessment, RejectionReason},
    };

    use crate::{
        cancel::CancellationToken,
        traits::{ClaimVerifier, Ledger, TokenLedger},
    };

    use super::ChainFacade;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// A ledger that stores blocks without hashing; hashes are just indexes.
    /// Appends of the `fail_on` kind fail with `LedgerWriteFailed`.
    struct MockLedger {
        blocks: Arc<Mutex<Vec<HashBlock>>>,
        fail_on: Option<PayloadKind>,
    }

    impl MockLedger {
        fn new() -> Self {
            let genesis = HashBlock {
                hash: "h0".to_string(),
                ..HashBlock::genesis("genesis")
            };
            Self { blocks: Arc::new(Mutex::new(vec![genesis])), fail_on: None }
        }

        fn failing_on(kind: PayloadKind) -> Self {
            Self { fail_on: Some(kind), ..Self::new() }
        }
    }

    impl Ledger for MockLedger {
        fn append(&self, payload: Payload) -> CareChainResult<HashBlock> {
            self.append_with_cancel(payload, &CancellationToken::new())
        }

        fn append_with_cancel(
            &self,
            payload: Payload,
            _cancel: &CancellationToken,
        ) -> CareChainResult<HashBlock> {
            if self.fail_on == Some(payload.kind()) {
                return Err(CareChainError::LedgerWriteFailed { reason: "boom".to_string() });
            }
            let mut blocks = self.blocks.lock().unwrap();
            let tip = blocks.last().unwrap().clone();
            let index = tip.index + 1;
            let block = HashBlock {
                hash: format!("h{index}"),
                ..HashBlock::unsealed(index, Utc::now(), payload, tip.hash)
            };
            blocks.push(block.clone());
            Ok(block)
        }

        fn verify(&self) -> bool {
            true
        }

        fn first_invalid_block(&self) -> Option<u64> {
            None
        }

        fn blocks(&self) -> Vec<HashBlock> {
            self.blocks.lock().unwrap().clone()
        }

        fn tip(&self) -> HashBlock {
            self.blocks.lock().unwrap().last().unwrap().clone()
        }

        fn block_count(&self) -> usize {
            self.blocks.lock().unwrap().len()
        }

        fn export(&self) -> ChainSnapshot {
            let blocks = self.blocks();
            let tip_hash = blocks.last().map(|b| b.hash.clone()).unwrap_or_default();
            ChainSnapshot { blocks, exported_at: Utc::now(), tip_hash }
        }
    }

    /// A verifier that returns a fixed assessment, or a hard reject when the
    /// policy is missing.
    struct MockVerifier {
        assessment: ClaimAssessment,
    }

    impl ClaimVerifier for MockVerifier {
        fn evaluate(&self, _claim: &Claim, policy: Option<&Policy>) -> ClaimAssessment {
            match policy {
                None => ClaimAssessment::hard_reject(RejectionReason::InvalidPolicy),
                Some(_) => self.assessment.clone(),
            }
        }
    }

    struct MockTokens {
        balances: Arc<Mutex<HashMap<String, u64>>>,
    }

    impl MockTokens {
        fn new() -> Self {
            Self { balances: Arc::new(Mutex::new(HashMap::new())) }
        }
    }

    impl TokenLedger for MockTokens {
        fn mint(&self, address: &str, amount: u64) -> CareChainResult<()> {
            *self.balances.lock().unwrap().entry(address.to_string()).or_default() += amount;
            Ok(())
        }

        fn transfer(&self, from: &str, to: &str, amount: u64) -> CareChainResult<bool> {
            let mut balances = self.balances.lock().unwrap();
            let available = balances.get(from).copied().unwrap_or(0);
            if available < amount {
                return Ok(false);
            }
            balances.insert(from.to_string(), available - amount);
            *balances.entry(to.to_string()).or_default() += amount;
            Ok(true)
        }

        fn balance_of(&self, address: &str) -> u64 {
            self.balances.lock().unwrap().get(address).copied().unwrap_or(0)
        }

        fn total_supply(&self) -> u64 {
            self.balances.lock().unwrap().values().sum()
        }

        fn name(&self) -> &str {
            "CareCoin"
        }

        fn symbol(&self) -> &str {
            "CARE"
        }
    }

    fn org(id: &str, permissions: &[&str]) -> Organization {
        Organization {
            id: id.to_string(),
            name: format!("{id} name"),
            org_type: "hospital".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect::<BTreeSet<_>>(),
            public_key: format!("pk-{id}"),
        }
    }

    fn registry() -> Vec<Organization> {
        vec![
            org("HOSP001", &["data:share", "data:receive"]),
            org("INS001", &["data:receive"]),
        ]
    }

    fn approved() -> ClaimAssessment {
        ClaimAssessment { status: ClaimStatus::Approved, score: 100, rejection: None }
    }

    fn make_facade(assessment: ClaimAssessment) -> (ChainFacade, Arc<Mutex<Vec<HashBlock>>>) {
        facade_on(MockLedger::new(), assessment)
    }

    fn facade_on(
        ledger: MockLedger,
        assessment: ClaimAssessment,
    ) -> (ChainFacade, Arc<Mutex<Vec<HashBlock>>>) {
        let blocks = ledger.blocks.clone();
        let facade = ChainFacade::new(
            Box::new(ledger),
            Box::new(MockVerifier { assessment }),
            Box::new(MockTokens::new()),
            registry(),
            ChainConfig::default(),
        )
        .unwrap();
        (facade, blocks)
    }

    fn share(from: &str, to: &str) -> ShareDataRequest {
        ShareDataRequest {
            from_org: from.to_string(),
            to_org: to.to_string(),
            data_type: "lab_results".to_string(),
            data_hash: "abc".to_string(),
            patient_id: Some("PAT001".to_string()),
        }
    }

    fn policy_request(policy_id: &str, patient_id: &str) -> IssuePolicyRequest {
        IssuePolicyRequest {
            policy_id: policy_id.to_string(),
            patient_id: patient_id.to_string(),
            insurance_company: "INS001".to_string(),
            coverage: 75_000,
            premium: 500,
            conditions: vec!["diabetes".to_string()],
        }
    }

    fn claim_request(claim_id: &str, policy_id: &str, patient_id: &str) -> SubmitClaimRequest {
        SubmitClaimRequest {
            claim_id: claim_id.to_string(),
            policy_id: policy_id.to_string(),
            patient_id: patient_id.to_string(),
            hospital_id: "HOSP001".to_string(),
            diagnosis: "fracture".to_string(),
            treatment_cost: 15_000,
            documents: vec![ClaimDocument::new("medical_report", "d1")],
        }
    }

    // ── Policies ─────────────────────────────────────────────────────────────

    #[test]
    fn test_issue_policy_appends_block() {
        let (facade, blocks) = make_facade(approved());

        let outcome = facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();
        let hash = outcome.policy_hash().unwrap().to_string();

        assert_eq!(hash.len(), 64, "policy hash must be hex SHA-256");
        let blocks = blocks.lock().unwrap();
        assert_eq!(blocks.len(), 2);
        match &blocks[1].payload {
            Payload::Policy(entry) => {
                assert_eq!(entry.policy_id, "POL001");
                assert_eq!(entry.policy_hash, hash);
                assert!(entry.is_active);
            }
            other => panic!("expected POLICY payload, got {:?}", other),
        }

        let policy = facade.get_policy("POL001").unwrap();
        assert!(policy.is_active);
        match &blocks[1].payload {
            Payload::Policy(entry) => assert_eq!(entry.created_at, policy.created_at),
            other => panic!("expected POLICY payload, got {:?}", other),
        }
    }

    #[test]
    fn test_policy_hash_is_content_derived() {
        let (a, _) = make_facade(approved());
        let (b, _) = make_facade(approved());
        let first = a.issue_policy(policy_request("POL001", "PAT001")).unwrap();
        let second = b.issue_policy(policy_request("POL001", "PAT001")).unwrap();
        assert_eq!(first.policy_hash(), second.policy_hash());
    }

    #[test]
    fn test_duplicate_policy_refused() {
        let (facade, blocks) = make_facade(approved());
        assert!(facade.issue_policy(policy_request("POL001", "PAT001")).unwrap().is_issued());

        match facade.issue_policy(policy_request("POL001", "PAT002")).unwrap() {
            PolicyOutcome::Refused { policy_id, reason } => {
                assert_eq!(policy_id, "POL001");
                assert_eq!(reason, "policy id already registered");
            }
            other => panic!("expected Refused, got {:?}", other),
        }
        assert_eq!(blocks.lock().unwrap().len(), 2, "no block for the duplicate");
        assert_eq!(facade.get_policy("POL001").unwrap().patient_id, "PAT001");
    }

    #[test]
    fn test_zero_coverage_refused_without_block() {
        let (facade, blocks) = make_facade(approved());
        let mut request = policy_request("POL001", "PAT001");
        request.coverage = 0;

        let outcome = facade.issue_policy(request).unwrap();
        assert!(!outcome.is_issued());
        assert_eq!(outcome.policy_hash(), None);
        assert_eq!(blocks.lock().unwrap().len(), 1);
        assert!(facade.get_policy("POL001").is_none());
    }

    // ── Claims ───────────────────────────────────────────────────────────────

    #[test]
    fn test_hard_rejection_commits_nothing() {
        let (facade, blocks) = make_facade(approved());

        let outcome = facade.submit_claim(claim_request("CLM001", "NOPE", "PAT001")).unwrap();

        match &outcome {
            ClaimOutcome::Rejected { claim } => {
                assert_eq!(claim.status, ClaimStatus::Rejected);
                assert_eq!(claim.rejection_reason.as_deref(), Some("Invalid or inactive policy"));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
        assert!(outcome.committed().is_none());
        assert_eq!(blocks.lock().unwrap().len(), 1, "only genesis");
        assert!(facade.get_claim("CLM001").is_none());
    }

    #[test]
    fn test_approved_claim_triggers_reward() {
        let (facade, blocks) = make_facade(approved());
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();

        let outcome = facade.submit_claim(claim_request("CLM001", "POL001", "PAT001")).unwrap();

        match outcome {
            ClaimOutcome::Committed { claim, block_index, reward_block_index } => {
                assert_eq!(claim.status, ClaimStatus::Approved);
                assert_eq!(claim.verification_score, 100);
                assert_eq!(block_index, 2);
                assert_eq!(reward_block_index, Some(3));
            }
            other => panic!("expected Committed, got {:?}", other),
        }

        let kinds: Vec<PayloadKind> =
            blocks.lock().unwrap().iter().map(|b| b.payload.kind()).collect();
        assert_eq!(
            kinds,
            vec![PayloadKind::Genesis, PayloadKind::Policy, PayloadKind::Claim, PayloadKind::Reward]
        );
        assert_eq!(facade.token_balance("PAT001"), 100);
        assert_eq!(facade.get_claim("CLM001").unwrap().status, ClaimStatus::Approved);
    }

    #[test]
    fn test_manual_review_commits_without_reward() {
        let (facade, blocks) = make_facade(ClaimAssessment {
            status: ClaimStatus::ManualReview,
            score: 70,
            rejection: None,
        });
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();

        let outcome = facade.submit_claim(claim_request("CLM001", "POL001", "PAT001")).unwrap();

        match outcome {
            ClaimOutcome::Committed { claim, reward_block_index, .. } => {
                assert_eq!(claim.status, ClaimStatus::ManualReview);
                assert!(reward_block_index.is_none());
            }
            other => panic!("expected Committed, got {:?}", other),
        }
        assert_eq!(blocks.lock().unwrap().len(), 3);
        assert_eq!(facade.token_balance("PAT001"), 0);
    }

    #[test]
    fn test_score_rejection_is_committed() {
        let (facade, blocks) = make_facade(ClaimAssessment {
            status: ClaimStatus::Rejected,
            score: 40,
            rejection: Some(RejectionReason::FailedAutomatedVerification),
        });
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();

        let outcome = facade.submit_claim(claim_request("CLM001", "POL001", "PAT001")).unwrap();

        assert!(outcome.is_committed());
        assert_eq!(
            outcome.claim().rejection_reason.as_deref(),
            Some("Failed automated verification")
        );

        let blocks = blocks.lock().unwrap();
        assert_eq!(blocks.len(), 3);
        match &blocks[2].payload {
            Payload::Claim(entry) => {
                assert_eq!(entry.status, ClaimStatus::Rejected);
                assert_eq!(
                    entry.rejection_reason.as_deref(),
                    Some("Failed automated verification")
                );
                assert_eq!(entry.submitted_at, outcome.claim().submitted_at);
            }
            other => panic!("expected CLAIM payload, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_claim_rejected_without_block() {
        let (facade, blocks) = make_facade(approved());
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();
        facade.submit_claim(claim_request("CLM001", "POL001", "PAT001")).unwrap();
        let before = blocks.lock().unwrap().len();

        let outcome = facade.submit_claim(claim_request("CLM001", "POL001", "PAT001")).unwrap();
        assert!(!outcome.is_committed());
        assert_eq!(
            outcome.claim().rejection_reason.as_deref(),
            Some("Claim id already submitted")
        );
        assert_eq!(blocks.lock().unwrap().len(), before);
        assert_eq!(facade.token_balance("PAT001"), 100, "no second reward");
    }

    #[test]
    fn test_zero_cost_claim_rejected_without_block() {
        let (facade, blocks) = make_facade(approved());
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();
        let mut request = claim_request("CLM001", "POL001", "PAT001");
        request.treatment_cost = 0;

        let outcome = facade.submit_claim(request).unwrap();
        assert!(!outcome.is_committed());
        assert_eq!(
            outcome.claim().rejection_reason.as_deref(),
            Some("Treatment cost must be positive")
        );
        assert_eq!(blocks.lock().unwrap().len(), 2);
    }

    /// A reward that cannot be written leaves the claim committed, mints
    /// nothing, and a resubmission is rejected as a duplicate.
    #[test]
    fn test_failed_reward_keeps_claim_committed() {
        let (facade, blocks) = facade_on(MockLedger::failing_on(PayloadKind::Reward), approved());
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();

        let outcome = facade.submit_claim(claim_request("CLM001", "POL001", "PAT001")).unwrap();
        match &outcome {
            ClaimOutcome::Committed { claim, block_index, reward_block_index } => {
                assert_eq!(claim.status, ClaimStatus::Approved);
                assert_eq!(*block_index, 2);
                assert!(reward_block_index.is_none());
            }
            other => panic!("expected Committed, got {:?}", other),
        }

        assert_eq!(blocks.lock().unwrap().len(), 3, "genesis, policy, claim");
        assert_eq!(facade.token_balance("PAT001"), 0);
        assert_eq!(facade.token_supply(), 0);
        assert!(facade.get_claim("CLM001").is_some());

        let retry = facade.submit_claim(claim_request("CLM001", "POL001", "PAT001")).unwrap();
        assert!(!retry.is_committed());
    }

    #[test]
    fn test_reward_append_failure_mints_nothing() {
        let (facade, _) = facade_on(MockLedger::failing_on(PayloadKind::Reward), approved());

        assert!(matches!(
            facade.reward_loyalty_tokens("PAT001", 50, None),
            Err(CareChainError::LedgerWriteFailed { .. })
        ));
        assert_eq!(facade.token_balance("PAT001"), 0);
    }

    #[test]
    fn test_reward_overflow_writes_nothing() {
        let (facade, blocks) = make_facade(approved());
        facade.reward_loyalty_tokens("PAT001", u64::MAX, None).unwrap();

        assert!(matches!(
            facade.reward_loyalty_tokens("PAT002", 1, None),
            Err(CareChainError::TokenError { .. })
        ));
        assert_eq!(blocks.lock().unwrap().len(), 2, "only the first REWARD block");
        assert_eq!(facade.token_balance("PAT002"), 0);
    }

    // ── Data sharing ─────────────────────────────────────────────────────────

    #[test]
    fn test_share_data_unknown_org_refused() {
        let (facade, blocks) = make_facade(approved());

        assert!(!facade.share_data_between_orgs(share("HOSP001", "UNKNOWN")).unwrap());
        assert_eq!(blocks.lock().unwrap().len(), 1);
    }

    /// INS001 may receive but not share; a sender without `data:share` is
    /// refused like an unknown organization.
    #[test]
    fn test_share_data_requires_permissions() {
        let (facade, blocks) = make_facade(approved());

        assert!(!facade.share_data_between_orgs(share("INS001", "HOSP001")).unwrap());
        assert_eq!(blocks.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_share_data_between_registered_orgs() {
        let (facade, blocks) = make_facade(approved());

        let shared = facade.share_data_between_orgs(share("HOSP001", "INS001")).unwrap();

        assert!(shared);
        let blocks = blocks.lock().unwrap();
        match &blocks[1].payload {
            Payload::DataSharing(entry) => assert!(entry.authorized),
            other => panic!("expected DATA_SHARING payload, got {:?}", other),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    #[test]
    fn test_patient_record_filters_by_patient() {
        let (facade, _) = make_facade(approved());
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();
        facade.issue_policy(policy_request("POL002", "PAT002")).unwrap();
        facade.submit_claim(claim_request("CLM001", "POL001", "PAT001")).unwrap();

        let record = facade.get_patient_record("PAT001");
        assert_eq!(record.policies.len(), 1);
        assert_eq!(record.claims.len(), 1);
        assert_eq!(record.rewards.len(), 1);
        assert_eq!(record.token_balance, 100);

        let other = facade.get_patient_record("PAT002");
        assert_eq!(other.policies.len(), 1);
        assert!(other.claims.is_empty());
        assert_eq!(other.token_balance, 0);
    }

    #[test]
    fn test_chain_analytics_counts() {
        let (facade, _) = make_facade(approved());
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();
        facade.submit_claim(claim_request("CLM001", "POL001", "PAT001")).unwrap();
        facade.submit_claim(claim_request("CLM002", "MISSING", "PAT001")).unwrap();

        let analytics = facade.get_chain_analytics();
        assert_eq!(analytics.total_blocks, 4);
        assert_eq!(analytics.total_policies, 1);
        assert_eq!(analytics.total_claims, 1, "hard rejections are not on the chain");
        assert_eq!(analytics.approved_claims, 1);
        assert_eq!(analytics.approval_rate_display(), "100.00%");
        assert_eq!(analytics.total_rewards_issued, 100);
        assert!(analytics.is_chain_valid);
    }

    #[test]
    fn test_analytics_on_empty_chain() {
        let (facade, _) = make_facade(approved());
        let analytics = facade.get_chain_analytics();
        assert_eq!(analytics.total_blocks, 1);
        assert_eq!(analytics.approval_rate, 0.0);
    }

    // ── Construction ─────────────────────────────────────────────────────────

    #[test]
    fn test_duplicate_organization_is_config_error() {
        let result = ChainFacade::new(
            Box::new(MockLedger::new()),
            Box::new(MockVerifier { assessment: approved() }),
            Box::new(MockTokens::new()),
            vec![org("HOSP001", &[]), org("HOSP001", &[])],
            ChainConfig::default(),
        );
        assert!(matches!(result, Err(CareChainError::ConfigError { .. })));
    }

    #[test]
    fn test_transfer_tokens_respects_balance() {
        let (facade, _) = make_facade(approved());
        facade.reward_loyalty_tokens("PAT001", 50, None).unwrap();

        assert!(!facade.transfer_tokens("PAT001", "PAT002", 80).unwrap());
        assert!(facade.transfer_tokens("PAT001", "PAT002", 30).unwrap());
        assert_eq!(facade.token_balance("PAT001"), 20);
        assert_eq!(facade.token_balance("PAT002"), 30);
    }

    // ── Archive ──────────────────────────────────────────────────────────────

    #[test]
    fn test_large_committed_claim_archived_against_tip() {
        let (facade, blocks) = make_facade(approved());
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();

        let mut request = claim_request("CLM001", "POL001", "PAT001");
        request.treatment_cost = 60_000;
        let claim = facade.submit_claim(request).unwrap().committed().unwrap();

        let record = facade.archive_large_claim(&claim).unwrap().unwrap();
        assert_eq!(record.amount, 60_000);
        assert_eq!(record.status, ClaimStatus::Approved);
        assert_eq!(record.anchor_hash, blocks.lock().unwrap().last().unwrap().hash);

        let again = facade.archive_large_claim(&claim).unwrap().unwrap();
        assert_eq!(again, record);
        assert_eq!(facade.archived_claims().len(), 1);
    }

    #[test]
    fn test_small_or_uncommitted_claims_not_archived() {
        let (facade, _) = make_facade(approved());
        facade.issue_policy(policy_request("POL001", "PAT001")).unwrap();

        let small = facade
            .submit_claim(claim_request("CLM001", "POL001", "PAT001"))
            .unwrap();
        assert_eq!(facade.archive_large_claim(small.claim()).unwrap(), None);

        let mut request = claim_request("CLM002", "MISSING", "PAT001");
        request.treatment_cost = 60_000;
        let rejected = facade.submit_claim(request).unwrap();
        assert!(!rejected.is_committed());
        assert_eq!(facade.archive_large_claim(rejected.claim()).unwrap(), None);

        assert!(facade.archived_claims().is_empty());
    }
}
