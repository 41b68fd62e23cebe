//! Advisory prose generation.
//!
//! The rule engine decides *what* to say; a `Narrator` decides how to say
//! it. `ChatNarrator` asks an OpenAI-compatible chat API, `TemplateNarrator`
//! joins the rule directives. `narrate_with_fallback` bounds the collaborator
//! with a timeout and falls back to the template on any failure, so scoring
//! never waits on or fails because of prose.

mod chat;

pub use chat::ChatNarrator;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::advice::render_narrative;
use crate::core::{Assessment, Directive, FinancialInput, Projection, Ratios, RiskZone};
use crate::error::NarrativeError;

/// Structured facts handed to a narrator.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryContext {
    pub input: FinancialInput,
    pub score: u8,
    pub risk_zone: RiskZone,
    pub ratios: Ratios,
    pub projection: Projection,
    pub directives: Vec<Directive>,
}

impl AdvisoryContext {
    pub fn new(input: &FinancialInput, assessment: &Assessment) -> Self {
        Self {
            input: input.clone(),
            score: assessment.score,
            risk_zone: assessment.risk_zone,
            ratios: assessment.ratios,
            projection: assessment.projection,
            directives: assessment.directives.clone(),
        }
    }

    /// Rule-based narrative; what the service returns when no narrator answers.
    pub fn template_narrative(&self) -> String {
        render_narrative(&self.directives)
    }
}

#[async_trait]
pub trait Narrator: Send + Sync {
    async fn narrate(&self, context: &AdvisoryContext) -> Result<String, NarrativeError>;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}

/// Deterministic narrator built purely from rule directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

#[async_trait]
impl Narrator for TemplateNarrator {
    async fn narrate(&self, context: &AdvisoryContext) -> Result<String, NarrativeError> {
        Ok(context.template_narrative())
    }

    fn name(&self) -> &str {
        "template"
    }
}

pub async fn narrate_with_fallback(
    narrator: &dyn Narrator,
    context: &AdvisoryContext,
    timeout: Duration,
) -> String {
    let outcome = match tokio::time::timeout(timeout, narrator.narrate(context)).await {
        Ok(Ok(text)) if text.trim().is_empty() => Err(NarrativeError::EmptyReply),
        Ok(result) => result,
        Err(_) => Err(NarrativeError::Timeout(timeout)),
    };

    match outcome {
        Ok(text) => {
            debug!(narrator = narrator.name(), chars = text.len(), "narrative generated");
            text
        }
        Err(e) => {
            warn!(
                narrator = narrator.name(),
                error = %e,
                "narrator unavailable; using rule-based narrative"
            );
            context.template_narrative()
        }
    }
}
