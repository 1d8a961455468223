//! Concrete component types and the container that owns them.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use rg_01_challenge::ChallengeService;
use rg_02_risk_scoring::RiskScorer;
use rg_03_referral_validation::{ReferralIntake, ReferralValidator, ValidatorWorker};
use rg_04_engagement_verification::{
    ChannelEngagementVerifier, HistoryScanClient, InMemoryChatMembers, InMemoryHistory,
    SubscriptionChecker, TaskVerifier,
};

use crate::adapters::{BotDatabase, LoggingLedger, LoggingNotifier, SharedClock};
use crate::container::config::RuntimeConfig;

pub type ConcreteChallengeService = ChallengeService<BotDatabase, BotDatabase, SharedClock>;
pub type ConcreteRiskScorer = RiskScorer<BotDatabase, SharedClock>;
pub type ConcreteReferralValidator =
    ReferralValidator<BotDatabase, ConcreteRiskScorer, LoggingLedger, LoggingNotifier, SharedClock>;
pub type ConcreteReferralIntake = ReferralIntake<BotDatabase, SharedClock>;
pub type ConcreteValidatorWorker =
    ValidatorWorker<ConcreteReferralValidator, BotDatabase, SharedClock>;
pub type ConcreteScanClient = HistoryScanClient<InMemoryHistory, SharedClock>;
pub type ConcreteEngagementVerifier = ChannelEngagementVerifier<InMemoryHistory, SharedClock>;
pub type ConcreteSubscriptionChecker = SubscriptionChecker<InMemoryChatMembers>;
pub type ConcreteTaskVerifier =
    TaskVerifier<ConcreteEngagementVerifier, ConcreteSubscriptionChecker>;

/// Every component, wired to in-memory adapters.
pub struct GuardContainer {
    pub config: RuntimeConfig,
    pub clock: Arc<SharedClock>,

    // Adapters
    pub database: Arc<BotDatabase>,
    pub ledger: Arc<LoggingLedger>,
    pub notifier: Arc<LoggingNotifier>,
    /// Shares state with the transport owned by `scan_client`.
    pub history: InMemoryHistory,
    pub members: Arc<InMemoryChatMembers>,

    // Components
    pub challenge: Arc<ConcreteChallengeService>,
    pub risk: Arc<ConcreteRiskScorer>,
    pub intake: Arc<ConcreteReferralIntake>,
    pub validator: Arc<ConcreteReferralValidator>,
    pub scan_client: Arc<ConcreteScanClient>,
    pub engagement: Arc<ConcreteEngagementVerifier>,
    pub subscriptions: Arc<ConcreteSubscriptionChecker>,
    pub tasks: Arc<ConcreteTaskVerifier>,
}

impl GuardContainer {
    /// Container on the system clock.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_clock(config, SharedClock::system())
    }

    pub fn with_clock(config: RuntimeConfig, clock: SharedClock) -> Self {
        info!("Wiring components");
        let clock = Arc::new(clock);

        let database = Arc::new(BotDatabase::new());
        let ledger = Arc::new(LoggingLedger::new());
        let notifier = Arc::new(LoggingNotifier::new());
        let history = InMemoryHistory::new();
        let members = Arc::new(InMemoryChatMembers::new());

        let challenge = Arc::new(ChallengeService::new(
            config.challenge(),
            Arc::clone(&database),
            Arc::clone(&database),
            Arc::clone(&clock),
        ));
        let risk = Arc::new(RiskScorer::new(Arc::clone(&database), Arc::clone(&clock)));
        let intake = Arc::new(ReferralIntake::new(
            config.validator.thresholds.clone(),
            Arc::clone(&database),
            Arc::clone(&clock),
        ));
        let validator = Arc::new(ReferralValidator::new(
            config.validator.clone(),
            Arc::clone(&database),
            Arc::clone(&risk),
            Arc::clone(&ledger),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        ));

        let scan_client = Arc::new(HistoryScanClient::new(
            config.scan_client.clone(),
            history.clone(),
            config.scan_credentials.clone(),
            Arc::clone(&clock),
        ));
        let engagement = Arc::new(ChannelEngagementVerifier::new(
            config.verifier.clone(),
            Arc::clone(&scan_client),
        ));
        let subscriptions = Arc::new(SubscriptionChecker::new(
            &config.verifier,
            Arc::clone(&members),
        ));
        let tasks = Arc::new(TaskVerifier::new(
            Arc::clone(&engagement),
            Arc::clone(&subscriptions),
        ));

        Self {
            config,
            clock,
            database,
            ledger,
            notifier,
            history,
            members,
            challenge,
            risk,
            intake,
            validator,
            scan_client,
            engagement,
            subscriptions,
            tasks,
        }
    }

    /// A validator loop bound to `shutdown`.
    pub fn worker(&self, shutdown: watch::Receiver<bool>) -> ConcreteValidatorWorker {
        ValidatorWorker::new(
            self.config.validator.clone(),
            Arc::clone(&self.validator),
            Arc::clone(&self.database),
            Arc::clone(&self.clock),
            shutdown,
        )
    }
}
