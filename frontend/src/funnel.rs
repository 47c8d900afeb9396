//! The eligibility funnel: two yes/no questions, then either the affiliate CTA or a rejection.
//!
//! `Funnel` is plain data. Inputs return the side effects they cause and the page runs them,
//! so the transition table can be exercised without a browser.

use log::{info, warn};

use crate::attribution::AffiliateLink;
use crate::config::REDIRECT_DELAY_MS;
use crate::tracking::{Collectors, TrackingEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    State,
    Age,
    Eligible,
    Ineligible,
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Eligible | Step::Ineligible)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    /// "Are you located in any of these states?"
    InExcludedState(bool),
    /// "Are you 18 years or older?"
    IsAdult(bool),
    CtaActivated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Track(TrackingEvent),
    Redirect { url: String, delay_ms: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Funnel {
    step: Step,
    link: AffiliateLink,
    redirecting: bool,
}

impl Funnel {
    pub fn new(link: AffiliateLink) -> Self {
        Self { step: Step::State, link, redirecting: false }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn link(&self) -> &AffiliateLink {
        &self.link
    }

    pub fn handle(&mut self, answer: Answer) -> Vec<Effect> {
        match (self.step, answer) {
            (Step::State, Answer::InExcludedState(true)) => {
                self.step = Step::Ineligible;
                Vec::new()
            }
            (Step::State, Answer::InExcludedState(false)) => {
                self.step = Step::Age;
                vec![
                    Effect::Track(TrackingEvent::ViewContent),
                    Effect::Track(TrackingEvent::SubmitForm),
                ]
            }
            (Step::Age, Answer::IsAdult(is_adult)) => {
                self.step = if is_adult { Step::Eligible } else { Step::Ineligible };
                Vec::new()
            }
            (Step::Eligible, Answer::CtaActivated) if !self.redirecting => {
                self.redirecting = true;
                vec![
                    Effect::Track(TrackingEvent::ClickButton),
                    Effect::Redirect { url: self.link.to_string(), delay_ms: REDIRECT_DELAY_MS },
                ]
            }
            (Step::Eligible, Answer::CtaActivated) => Vec::new(),
            (step, answer) => {
                warn!("Ignoring {:?} while on {:?}", answer, step);
                Vec::new()
            }
        }
    }
}

/// Records tracking effects in order and hands back the redirect, if any, for the caller to schedule.
pub fn dispatch(effects: Vec<Effect>, collectors: &Collectors) -> Option<(String, u32)> {
    let mut redirect = None;
    for effect in effects {
        match effect {
            Effect::Track(event) => collectors.record(event),
            Effect::Redirect { url, delay_ms } => {
                info!("Redirecting to affiliate link in {}ms", delay_ms);
                redirect = Some((url, delay_ms));
            }
        }
    }
    redirect
}
