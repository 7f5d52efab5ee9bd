//! LLM-backed interpretation of well log statistics
//!
//! The core formats a deterministic, self-contained prompt from the
//! statistics output; the completion function behind [`CompletionClient`] is
//! an opaque collaborator with no retry policy here.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::json;

use crate::errors::{LlmError, LlmResult};
use crate::services::analysis_service::{AnalysisReport, AnalysisService};
use crate::services::well_service::WellService;

pub const SYSTEM_PROMPT: &str = "You are an expert petrophysicist. Provide clear, concise \
well log interpretations based on the statistics given.";

pub const COMPLETION_MODEL: &str = "llama-3.3-70b-versatile";

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Anomalies listed verbatim in the prompt; the rest is summarised.
const PROMPT_ANOMALY_LIMIT: usize = 20;

/// Opaque synchronous text-completion seam.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> LlmResult<String>;
}

/// Chat-completion client for the Groq OpenAI-compatible endpoint.
#[derive(Debug)]
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>) -> LlmResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: GROQ_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> LlmResult<String> {
        let body = json!({
            "model": COMPLETION_MODEL,
            "temperature": 0.3,
            "max_tokens": 1024,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LlmError::Provider(response.status().as_u16()));
        }

        let payload: serde_json::Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "No response from model.".to_string());
        Ok(content)
    }
}

/// Build the user prompt from the analysis report.
///
/// Deterministic and self-contained: the same report always renders the
/// same prompt.
pub fn build_prompt(
    well_name: &str,
    curve_names: &[String],
    depth_min: f64,
    depth_max: f64,
    report: &AnalysisReport,
) -> String {
    let insights_text = report
        .insights
        .iter()
        .map(|ins| {
            format!(
                "- {}: {} (min={}, max={}, mean={}, std={}, n={})",
                ins.curve,
                ins.interpretation,
                ins.statistics.min,
                ins.statistics.max,
                ins.statistics.mean,
                ins.statistics.std,
                ins.statistics.count
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut anomalies_text = String::new();
    if !report.anomalies.is_empty() {
        anomalies_text.push_str("\nAnomalies (values beyond 2 standard deviations):\n");
        anomalies_text.push_str(
            &report
                .anomalies
                .iter()
                .take(PROMPT_ANOMALY_LIMIT)
                .map(|a| {
                    format!(
                        "- Depth {:.2}, {}: value={:.4}, mean={:.4} ({})",
                        a.depth,
                        a.curve_name,
                        a.value,
                        a.mean,
                        match a.deviation {
                            crate::services::analysis_service::Deviation::High => "high",
                            crate::services::analysis_service::Deviation::Low => "low",
                        }
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        );
        if report.anomalies.len() > PROMPT_ANOMALY_LIMIT {
            anomalies_text.push_str(&format!(
                "\n... and {} more.",
                report.anomalies.len() - PROMPT_ANOMALY_LIMIT
            ));
        }
    }

    format!(
        "You are an expert petrophysicist and well log analyst. Based on the following \
well log statistics, provide a concise geological and petrophysical interpretation for \
the interval.\n\n\
Well: {well_name}\n\
Depth range: {depth_min} to {depth_max}\n\
Curves: {curves}\n\n\
Summary statistics:\n{summary}\n\n\
Per-curve insights:\n{insights_text}\n{anomalies_text}\n\n\
Write 2-4 short paragraphs: (1) overall lithology and formation character, (2) key \
curve meanings and what they suggest (e.g. GR for shale/sand, density for porosity), \
(3) any notable anomalies or zones of interest. Use clear, professional language. Do \
not repeat raw numbers excessively.",
        curves = curve_names.join(", "),
        summary = report.summary,
    )
}

/// Statistics plus the model's natural-language reading of them.
#[derive(Debug, Clone, Serialize)]
pub struct Interpretation {
    pub statistics: AnalysisReport,
    pub interpretation: String,
}

pub struct LlmService {
    wells: WellService,
    analysis: AnalysisService,
    client: Arc<dyn CompletionClient>,
}

impl LlmService {
    pub fn new(db: DatabaseConnection, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            wells: WellService::new(db.clone()),
            analysis: AnalysisService::new(db),
            client,
        }
    }

    /// Run the statistics engine for the window, then ask the completion
    /// client for an interpretation of the report.
    pub async fn interpret(
        &self,
        well_id: i32,
        curve_names: &[String],
        depth_min: f64,
        depth_max: f64,
    ) -> LlmResult<Interpretation> {
        let well = self.wells.get(well_id).await?;
        let statistics = self
            .analysis
            .analyze(well_id, curve_names, depth_min, depth_max)
            .await?;
        let prompt = build_prompt(&well.name, curve_names, depth_min, depth_max, &statistics);
        let interpretation = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        Ok(Interpretation {
            statistics,
            interpretation,
        })
    }
}
