// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Offline decision-matrix extraction from conversational phrasing.
//!
//! Recognises "we can A, B or C" (options), "it is important to consider cost, risk" (criteria),
//! "I give B a 4/5 for cost" / "B scores 3 on risk" (scores) and "cost matters most" (priority).
//! Facts accumulate per call, so options, criteria and scores may arrive in separate utterances;
//! every utterance that adds a fact re-emits the whole matrix once both axes are known.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use regex::Regex;
use tokio::sync::Mutex;

use crate::model::{
    Change, Color, Criterion, DecisionMatrixSpec, IndexConvention, MatrixOption, ScoreCell,
};

use super::{ChangeStream, GenerationError, GenerationRequest, GenerationService};

const PALETTE: [Color; 5] = [Color::Blue, Color::Green, Color::Red, Color::Yellow, Color::Violet];
const PRIORITY_WEIGHT: f64 = 2.0;
const DEFAULT_MAX: f64 = 5.0;

static SENTENCE_SPLIT: LazyLock<Regex> = LazyLock::new(|| compile(r"[.!?]+(?:\s+|$)|\n"));
static LIST_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\s*(?:[,;|&/]|\band\b|\bor\b)\s*"));
static OPTIONS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:we can|we could|options? are|choices? are|alternatives? are)\s+(.+)")
});
static CRITERIA: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b(?:it is important to consider|it's important to consider|criteria are|factors? to consider(?: are)?|we should evaluate)\s+(.+)",
    )
});
static GIVE_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\bi (?:give|rate) (.+?) an? (\d+(?:\.\d+)?)(?:\s*/\s*(\d+(?:\.\d+)?))?(?:\s+score)?\s+(?:for|on) (.+)",
    )
});
static GETS_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)^(.+?) (?:gets|scores) (\d+(?:\.\d+)?)(?:\s*/\s*(\d+(?:\.\d+)?))?\s+(?:for|on) (.+)",
    )
});
static PRIORITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^(.+?)\s+(?:matters|is) (?:the )?most(?: important)?$"));

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Patterns are literals covered by the tests below.
        Err(err) => panic!("invalid built-in pattern {pattern:?}: {err}"),
    }
}

fn split_list(text: &str) -> Vec<String> {
    LIST_SPLIT
        .split(text)
        .map(|item| item.trim().trim_matches(|c: char| c == '"' || c == '\''))
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn strip_article(text: &str) -> &str {
    let lower = text.to_lowercase();
    for article in ["the ", "option ", "a "] {
        if lower.starts_with(article) && text.len() > article.len() {
            return text[article.len()..].trim();
        }
    }
    text.trim()
}

#[derive(Debug, Clone, PartialEq)]
struct RawScore {
    option: String,
    criterion: String,
    value: f64,
    max: Option<f64>,
}

/// Facts gathered so far for one call.
#[derive(Debug, Clone, Default, PartialEq)]
struct MatrixDraft {
    options: Vec<String>,
    criteria: Vec<String>,
    scores: Vec<RawScore>,
    priorities: Vec<String>,
}

/// Case-insensitive containment in either direction.
fn loosely_matches(candidate: &str, name: &str) -> bool {
    let candidate = candidate.to_lowercase();
    let name = name.to_lowercase();
    !name.is_empty() && (candidate.contains(&name) || name.contains(&candidate))
}

impl MatrixDraft {
    /// Folds one sentence in; returns whether anything was learned.
    fn absorb(&mut self, sentence: &str) -> bool {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return false;
        }
        if let Some(caps) = GIVE_SCORE.captures(sentence).or_else(|| GETS_SCORE.captures(sentence))
        {
            let value = caps.get(2).and_then(|m| m.as_str().parse().ok());
            if let (Some(option), Some(value), Some(criterion)) = (caps.get(1), value, caps.get(4)) {
                self.scores.push(RawScore {
                    option: strip_article(option.as_str()).to_owned(),
                    criterion: criterion.as_str().trim().to_owned(),
                    value,
                    max: caps.get(3).and_then(|m| m.as_str().parse().ok()),
                });
                return true;
            }
        }
        if let Some(caps) = CRITERIA.captures(sentence) {
            let criteria = caps.get(1).map(|m| split_list(m.as_str())).unwrap_or_default();
            if !criteria.is_empty() {
                self.criteria = criteria;
                return true;
            }
        }
        if let Some(caps) = OPTIONS.captures(sentence) {
            let options = caps.get(1).map(|m| split_list(m.as_str())).unwrap_or_default();
            if !options.is_empty() {
                self.options = options;
                return true;
            }
        }
        if let Some(caps) = PRIORITY.captures(sentence) {
            if let Some(name) = caps.get(1) {
                self.priorities.push(name.as_str().trim().to_owned());
                return true;
            }
        }
        false
    }

    fn to_change(&self) -> Option<Change> {
        if self.options.is_empty() || self.criteria.is_empty() {
            return None;
        }
        let options: Vec<MatrixOption> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, title)| MatrixOption {
                id: format!("option-{}", i + 1),
                title: title.clone(),
                description: None,
                color: Some(PALETTE[i % PALETTE.len()]),
            })
            .collect();
        let criteria: Vec<Criterion> = self
            .criteria
            .iter()
            .enumerate()
            .map(|(j, title)| {
                let prioritised = self.priorities.iter().any(|p| loosely_matches(title, p));
                Criterion {
                    id: format!("criterion-{}", j + 1),
                    title: title.clone(),
                    description: None,
                    weight: Some(if prioritised { PRIORITY_WEIGHT } else { 1.0 }),
                }
            })
            .collect();

        let score_cells = self
            .scores
            .iter()
            .filter_map(|raw| {
                let option = options.iter().find(|o| loosely_matches(&o.title, &raw.option))?;
                let criterion =
                    criteria.iter().find(|c| loosely_matches(&c.title, &raw.criterion))?;
                Some(ScoreCell {
                    option_id: Some(option.id.clone()),
                    option_title: None,
                    criterion_id: Some(criterion.id.clone()),
                    criterion_title: None,
                    value: raw.value,
                    max: Some(raw.max.unwrap_or(DEFAULT_MAX)),
                })
            })
            .collect();

        let notes = criteria
            .iter()
            .filter(|c| c.weight == Some(PRIORITY_WEIGHT))
            .map(|c| format!("{} matters most", c.title))
            .collect();

        Some(Change::CreateDecisionMatrix(DecisionMatrixSpec {
            description: format!(
                "Decision matrix with {} options and {} criteria",
                options.len(),
                criteria.len()
            ),
            options,
            criteria,
            score_cells,
            scores: None,
            index_convention: Some(IndexConvention::RowsAreOptions),
            advantages: Default::default(),
            disadvantages: Default::default(),
            notes,
            start_position: None,
            metadata: Default::default(),
        }))
    }
}

/// Calls whose drafts are kept; the least recently heard call is dropped beyond this.
const DEFAULT_DRAFT_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct Drafts {
    tick: u64,
    by_call: HashMap<String, (u64, MatrixDraft)>,
}

impl Drafts {
    fn touch(&mut self, call_id: &str) -> &mut MatrixDraft {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.by_call.entry(call_id.to_owned()).or_default();
        entry.0 = tick;
        &mut entry.1
    }

    fn evict_beyond(&mut self, capacity: usize) {
        while self.by_call.len() > capacity {
            let Some(oldest) =
                self.by_call.iter().min_by_key(|(_, (tick, _))| *tick).map(|(call, _)| call.clone())
            else {
                return;
            };
            self.by_call.remove(&oldest);
            tracing::debug!(call = %oldest, "idle decision draft dropped");
        }
    }
}

/// Regex-driven local generation service, used when no endpoint is configured.
#[derive(Debug)]
pub struct HeuristicGenerationService {
    drafts: Mutex<Drafts>,
    capacity: usize,
}

impl Default for HeuristicGenerationService {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_DRAFT_CAPACITY)
    }
}

impl HeuristicGenerationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps drafts for at most `capacity` calls (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self { drafts: Mutex::new(Drafts::default()), capacity: capacity.max(1) }
    }
}

#[async_trait]
impl GenerationService for HeuristicGenerationService {
    async fn generate(&self, request: GenerationRequest) -> Result<ChangeStream, GenerationError> {
        let mut drafts = self.drafts.lock().await;
        let draft = drafts.touch(&request.utterance.call_id);
        let mut learned = false;
        for sentence in SENTENCE_SPLIT.split(&request.utterance.content) {
            learned |= draft.absorb(sentence);
        }
        let change = if learned { draft.to_change() } else { None };
        drafts.evict_beyond(self.capacity);
        tracing::debug!(
            artifact = %request.artifact_id,
            learned,
            emitted = change.is_some(),
            "heuristic extraction"
        );
        Ok(stream::iter(change.into_iter().map(Ok)).boxed())
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::{split_list, HeuristicGenerationService, MatrixDraft};
    use crate::canvas::summarize;
    use crate::generate::{GenerationRequest, GenerationService};
    use crate::model::{Change, SessionIdentity, Utterance};
    use crate::reconcile::reconcile_spec;

    fn request(call: &str, at: i64, content: &str) -> GenerationRequest {
        let utterance = Utterance {
            call_id: call.into(),
            user: None,
            content: content.into(),
            start: 0.0,
            end: 1.0,
            duration: 1.0,
            emitted_at: at,
        };
        GenerationRequest {
            artifact_id: utterance.artifact_id().expect("id"),
            prompt: content.into(),
            utterance,
            canvas: summarize(&[], &[]),
            session: SessionIdentity::generate(None),
        }
    }

    async fn run(service: &HeuristicGenerationService, req: GenerationRequest) -> Vec<Change> {
        let stream = service.generate(req).await.expect("stream");
        stream.map(|item| item.expect("change")).collect().await
    }

    #[test]
    fn lists_split_on_separators_and_conjunctions() {
        assert_eq!(split_list("Option A, Option B or Option C"), vec!["Option A", "Option B", "Option C"]);
        assert_eq!(split_list("cost/risk and velocity"), vec!["cost", "risk", "velocity"]);
    }

    #[test]
    fn draft_reads_scores_with_and_without_denominator() {
        let mut draft = MatrixDraft::default();
        assert!(draft.absorb("I give Option B a 4/5 for cost"));
        assert!(draft.absorb("Option A scores 3 on risk"));
        assert!(!draft.absorb("lunch was great"));
        assert_eq!(draft.scores.len(), 2);
        assert_eq!(draft.scores[0].option, "B");
        assert_eq!(draft.scores[0].max, Some(5.0));
        assert_eq!(draft.scores[1].criterion, "risk");
    }

    #[tokio::test]
    async fn builds_matrix_from_one_utterance() {
        let service = HeuristicGenerationService::new();
        let changes = run(
            &service,
            request(
                "call",
                1,
                "We can Option A, Option B, Option C. It is important to consider cost, risk, velocity. I give Option B a 4 for cost. Cost matters most.",
            ),
        )
        .await;
        assert_eq!(changes.len(), 1);
        let Change::CreateDecisionMatrix(spec) = &changes[0] else {
            panic!("expected decision matrix, got {:?}", changes[0]);
        };
        assert_eq!(spec.options.len(), 3);
        assert_eq!(spec.criteria[0].weight, Some(2.0));
        assert_eq!(spec.notes, vec!["cost matters most".to_owned()]);

        let matrix = reconcile_spec(spec);
        assert_eq!(matrix.get(1, 0), Some(4.0));
        assert_eq!(matrix.get(0, 0), Some(0.0));
    }

    #[tokio::test]
    async fn facts_accumulate_across_utterances_of_a_call() {
        let service = HeuristicGenerationService::new();
        assert!(run(&service, request("call", 1, "We can rewrite or refactor")).await.is_empty());
        let changes =
            run(&service, request("call", 2, "It is important to consider speed and safety")).await;
        assert_eq!(changes.len(), 1);

        let changes = run(&service, request("call", 3, "refactor gets 5 for safety")).await;
        let Change::CreateDecisionMatrix(spec) = &changes[0] else {
            panic!("expected decision matrix");
        };
        assert_eq!(reconcile_spec(spec).get(1, 1), Some(5.0));

        assert!(run(&service, request("other", 4, "refactor gets 5 for safety")).await.is_empty());
    }

    #[tokio::test]
    async fn least_recently_heard_call_is_forgotten() {
        let service = HeuristicGenerationService::with_capacity(2);
        run(&service, request("a", 1, "We can rewrite or refactor")).await;
        run(&service, request("b", 2, "We can rewrite or refactor")).await;
        run(&service, request("a", 3, "It is important to consider speed")).await;
        run(&service, request("c", 4, "We can rewrite or refactor")).await;

        {
            let drafts = service.drafts.lock().await;
            let mut calls: Vec<&str> = drafts.by_call.keys().map(String::as_str).collect();
            calls.sort_unstable();
            assert_eq!(calls, vec!["a", "c"]);
        }

        assert_eq!(run(&service, request("a", 5, "rewrite gets 4 for speed")).await.len(), 1);
        // `b` starts over: criteria alone no longer complete a matrix.
        assert!(run(&service, request("b", 6, "It is important to consider speed")).await.is_empty());
    }

    #[tokio::test]
    async fn small_talk_emits_nothing() {
        let service = HeuristicGenerationService::new();
        assert!(run(&service, request("call", 1, "good morning everyone")).await.is_empty());
    }
}
