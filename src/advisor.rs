//! Request-level orchestration: deterministic core pipeline plus optional
//! narration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::core::{self, AnalysisResult, FinancialInput, SimulationRequest, apply_changes, assess};
use crate::error::InputError;
use crate::narrator::{AdvisoryContext, ChatNarrator, Narrator, narrate_with_fallback};

#[derive(Clone)]
pub struct AdvisorService {
    narrator: Option<Arc<dyn Narrator>>,
    timeout: Duration,
    narrate_simulations: bool,
}

impl AdvisorService {
    pub fn new(
        narrator: Option<Arc<dyn Narrator>>,
        timeout: Duration,
        narrate_simulations: bool,
    ) -> Self {
        Self {
            narrator,
            timeout,
            narrate_simulations,
        }
    }

    /// Rule-based advice only; never makes a network call.
    pub fn offline() -> Self {
        Self::new(None, AppConfig::default().narrator_timeout, false)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let narrator: Option<Arc<dyn Narrator>> = match &config.narrator {
            Some(narrator_config) => {
                info!(
                    base_url = %narrator_config.base_url,
                    model = %narrator_config.model,
                    timeout_secs = config.narrator_timeout.as_secs(),
                    "chat narrator enabled"
                );
                Some(Arc::new(ChatNarrator::new(narrator_config)))
            }
            None => {
                info!("no narrator API key configured; serving rule-based advice only");
                None
            }
        };
        Self::new(narrator, config.narrator_timeout, config.narrate_simulations)
    }

    pub fn is_online(&self) -> bool {
        self.narrator.is_some()
    }

    pub async fn analyze(&self, input: &FinancialInput) -> Result<AnalysisResult, InputError> {
        let assessment = assess(input)?;
        debug!(
            score = assessment.score,
            zone = %assessment.risk_zone,
            directives = assessment.directives.len(),
            "assessment complete"
        );

        let advice = match &self.narrator {
            Some(narrator) => {
                let context = AdvisoryContext::new(input, &assessment);
                narrate_with_fallback(narrator.as_ref(), &context, self.timeout).await
            }
            None => assessment.narrative(),
        };
        Ok(assessment.into_result(advice))
    }

    /// Scores the hypothetical input. Narration is skipped unless
    /// `narrate_simulations` is set, keeping what-if replies fast.
    pub async fn simulate(&self, request: &SimulationRequest) -> Result<AnalysisResult, InputError> {
        let derived = apply_changes(&request.current_data, &request.changes)?;
        if self.narrate_simulations {
            self.analyze(&derived).await
        } else {
            core::analyze(&derived)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SimulationChangeSet, sample_input};
    use crate::error::NarrativeError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNarrator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Narrator for CountingNarrator {
        async fn narrate(&self, context: &AdvisoryContext) -> Result<String, NarrativeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("Aapka zone {} hai.", context.risk_zone))
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn service_with(narrate_simulations: bool) -> (AdvisorService, Arc<CountingNarrator>) {
        let narrator = Arc::new(CountingNarrator {
            calls: AtomicUsize::new(0),
        });
        let service = AdvisorService::new(
            Some(narrator.clone() as Arc<dyn Narrator>),
            Duration::from_secs(1),
            narrate_simulations,
        );
        (service, narrator)
    }

    #[tokio::test]
    async fn offline_service_matches_core_analyze() {
        let service = AdvisorService::offline();
        assert!(!service.is_online());
        let result = service.analyze(&sample_input()).await.expect("valid input");
        assert_eq!(result, core::analyze(&sample_input()).expect("valid input"));
    }

    #[tokio::test]
    async fn narrator_text_replaces_only_the_advice() {
        let (service, narrator) = service_with(false);
        let result = service.analyze(&sample_input()).await.expect("valid input");
        let baseline = core::analyze(&sample_input()).expect("valid input");

        assert_eq!(narrator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.score, baseline.score);
        assert_eq!(result.risk_zone, baseline.risk_zone);
        assert_eq!(result.ratios, baseline.ratios);
        assert_eq!(result.projection, baseline.projection);
        assert_eq!(result.ai_advice, format!("Aapka zone {} hai.", baseline.risk_zone));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_narrator() {
        let (service, narrator) = service_with(true);
        let mut input = sample_input();
        input.monthly_income = 0.0;

        assert_eq!(service.analyze(&input).await, Err(InputError::ZeroIncome));
        assert_eq!(narrator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn simulations_skip_narration_by_default() {
        let (service, narrator) = service_with(false);
        let request = SimulationRequest {
            current_data: sample_input(),
            changes: SimulationChangeSet {
                new_emi: Some(0.0),
                ..Default::default()
            },
        };

        let result = service.simulate(&request).await.expect("valid simulation");
        assert_eq!(narrator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            result,
            core::simulate(&request.current_data, &request.changes).expect("valid simulation")
        );
    }

    #[tokio::test]
    async fn simulations_can_opt_into_narration() {
        let (service, narrator) = service_with(true);
        let request = SimulationRequest {
            current_data: sample_input(),
            changes: SimulationChangeSet::default(),
        };

        let result = service.simulate(&request).await.expect("valid simulation");
        assert_eq!(narrator.calls.load(Ordering::SeqCst), 1);
        assert!(result.ai_advice.starts_with("Aapka zone"));
    }

    #[test]
    fn config_without_key_builds_offline_service() {
        let service = AdvisorService::from_config(&AppConfig::default());
        assert!(!service.is_online());
    }
}
