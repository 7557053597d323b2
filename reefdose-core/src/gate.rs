//! Decides whether enough is known to compute, and what to ask otherwise.

use crate::potency::{self, Unusable};
use reefdose_schemas::{
    dosing::CurrentDose, parameter::Parameter, product::Product, tank::Tank,
};
use serde::Serialize;
use std::fmt;

/// A prompt for one missing fact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FollowUpQuestion {
    TankVolume,
    CurrentDailyDose {
        parameter: Parameter,
    },
    PotencyTest {
        product_id: String,
        product_name: String,
        parameter: Parameter,
        reason: Unusable,
    },
}

impl fmt::Display for FollowUpQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowUpQuestion::TankVolume => f.write_str("What is your tank volume?"),
            FollowUpQuestion::CurrentDailyDose { parameter } => write!(
                f,
                "How many ml/day are you currently dosing for {}?",
                parameter
            ),
            FollowUpQuestion::PotencyTest { product_name, .. } => write!(
                f,
                "Please provide a potency test for '{}': how many ml raised the level by how much, in how many liters?",
                product_name
            ),
        }
    }
}

/// The two terminal states of the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    Ready,
    Blocked(Vec<FollowUpQuestion>),
}

impl Readiness {
    pub fn from_questions(questions: Vec<FollowUpQuestion>) -> Self {
        if questions.is_empty() {
            Readiness::Ready
        } else {
            Readiness::Blocked(questions)
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

/// Runs every check and accumulates one question per missing fact, in the
/// order: tank volume, daily doses, potency tests. No check short-circuits
/// another.
pub fn check_readiness(
    tank: &Tank,
    current_doses: &[CurrentDose],
    preferred_products: &[Product],
    sustaining_parameters: &[Parameter],
) -> Vec<FollowUpQuestion> {
    let mut questions = Vec::new();

    if tank.usable_volume().is_none() {
        questions.push(FollowUpQuestion::TankVolume);
    }

    let mut asked: Vec<Parameter> = Vec::new();
    for &parameter in sustaining_parameters {
        if asked.contains(&parameter) {
            continue;
        }
        asked.push(parameter);
        if declared_daily_dose(current_doses, parameter).is_none() {
            questions.push(FollowUpQuestion::CurrentDailyDose { parameter });
        }
    }

    for product in preferred_products {
        if let Err(reason) = potency::check_usable(&product.potency) {
            questions.push(FollowUpQuestion::PotencyTest {
                product_id: product.product_id.clone(),
                product_name: product.product_name.clone(),
                parameter: product.parameter,
                reason,
            });
        }
    }

    if questions.is_empty() {
        tracing::info!("all required inputs present");
    } else {
        tracing::info!(missing = questions.len(), "inputs missing, asking follow-up questions");
    }
    questions
}

/// The valid ml/day declared for a parameter. A later declaration wins.
pub fn declared_daily_dose(current_doses: &[CurrentDose], parameter: Parameter) -> Option<f64> {
    current_doses
        .iter()
        .rev()
        .find(|d| d.parameter == parameter && d.is_valid())
        .map(|d| d.ml_per_day)
}
