//! Final debate report

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;

use arena_llm::ConfigError;

use crate::evaluation::{Evaluation, MAX_CRITERION_SCORE};

const STRENGTHS: &[&str] = &["Arguments analysés sur plusieurs critères"];
const WEAKNESSES: &[&str] = &["Structure", "Preuves", "Clarté"];
const ADVICE: &[&str] = &[
    "Formuler une idée claire par argument",
    "Justifier chaque affirmation par un exemple",
    "Structurer les réponses (idée → justification → exemple)",
];

/// Outcome of a scored debate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FinalReport {
    /// The debate ended before any argument was evaluated
    NoArguments,
    /// Evaluations exist but carry no numeric score
    NotExploitable,
    /// Global score out of 100, rounded to two decimals
    Scored { score: f64 },
}

impl FinalReport {
    /// Average of every criterion score across all evaluations, as a
    /// percentage of the maximum
    pub fn compute(evaluations: &[Evaluation]) -> Self {
        if evaluations.is_empty() {
            return FinalReport::NoArguments;
        }

        let (total, count) = evaluations
            .iter()
            .flat_map(|e| e.scores.values())
            .fold((0.0_f64, 0usize), |(total, count), v| (total + v, count + 1));

        if count == 0 {
            return FinalReport::NotExploitable;
        }

        Self::from_score(total / (count as f64 * MAX_CRITERION_SCORE) * 100.0)
    }

    pub fn from_score(score: f64) -> Self {
        FinalReport::Scored {
            score: round2(score.clamp(0.0, 100.0)),
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            FinalReport::Scored { score } => Some(*score),
            _ => None,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, items: &[&str]) -> fmt::Result {
    writeln!(f, "{}", title)?;
    for item in items {
        writeln!(f, "- {}", item)?;
    }
    Ok(())
}

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalReport::NoArguments => write!(
                f,
                "⚠️ Aucun argument n’a été fourni.\n\
                 Veuillez proposer au moins un argument avant de demander le score."
            ),
            FinalReport::NotExploitable => write!(
                f,
                "⚠️ Les arguments fournis n’étaient pas suffisamment exploitables \
                 pour établir une évaluation chiffrée.\n\
                 Merci de formuler des arguments plus clairs et structurés."
            ),
            FinalReport::Scored { score } => {
                writeln!(f, "🎯 *Score final du débat : {:.2}/100*", score)?;
                writeln!(f)?;
                write_section(f, "✅ *Points forts*", STRENGTHS)?;
                writeln!(f)?;
                write_section(f, "❌ *Points à améliorer*", WEAKNESSES)?;
                writeln!(f)?;
                write_section(f, "📘 *Conseils*", ADVICE)
            }
        }
    }
}

/// Supplies the score of a demonstration report
pub trait ScoreSource: Send + Sync + fmt::Debug {
    fn draw(&self) -> f64;
}

/// Uniform draw over a range, [70, 100] by default
#[derive(Debug, Clone)]
pub struct RandomScoreSource {
    range: RangeInclusive<f64>,
}

impl RandomScoreSource {
    pub fn new(range: RangeInclusive<f64>) -> Self {
        Self { range }
    }
}

impl Default for RandomScoreSource {
    fn default() -> Self {
        Self::new(70.0..=100.0)
    }
}

impl ScoreSource for RandomScoreSource {
    fn draw(&self) -> f64 {
        rand::rng().random_range(self.range.clone())
    }
}

/// Always the same score
#[derive(Debug, Clone, Copy)]
pub struct FixedScoreSource(pub f64);

impl ScoreSource for FixedScoreSource {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// How the final score is obtained. A deployment uses exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    /// Averaged from the stored evaluations
    #[default]
    Computed,
    /// Drawn from a [`ScoreSource`]; stored evaluations are ignored
    Demo,
}

impl FromStr for ScoringStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "computed" => Ok(Self::Computed),
            "demo" | "random" => Ok(Self::Demo),
            other => Err(ConfigError::Invalid(format!(
                "unknown scoring strategy '{}'",
                other
            ))),
        }
    }
}

/// Produces final reports according to the configured strategy
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    strategy: ScoringStrategy,
    source: Arc<dyn ScoreSource>,
}

impl ReportGenerator {
    pub fn new(strategy: ScoringStrategy) -> Self {
        Self {
            strategy,
            source: Arc::new(RandomScoreSource::default()),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn ScoreSource>) -> Self {
        self.source = source;
        self
    }

    pub fn generate(&self, evaluations: &[Evaluation]) -> FinalReport {
        match self.strategy {
            ScoringStrategy::Computed => FinalReport::compute(evaluations),
            ScoringStrategy::Demo => FinalReport::from_score(self.source.draw()),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(ScoringStrategy::Computed)
    }
}
