use yew::prelude::*;
use web_sys::{window, MouseEvent};
use gloo_timers::callback::Timeout;
use log::{error, info};

use crate::attribution::{AffiliateLink, AttributionContext};
use crate::config::EXCLUDED_STATES;
use crate::funnel::{dispatch, Answer, Funnel, Step};
use crate::tracking::Collectors;

#[derive(Properties, PartialEq)]
pub struct QuizProps {
    #[prop_or_default]
    pub collectors: Collectors,
}

fn navigate(url: &str) {
    match window() {
        Some(window) => {
            if let Err(e) = window.location().set_href(url) {
                error!("Failed to navigate to affiliate link: {:?}", e);
            }
        }
        None => error!("No window to navigate from"),
    }
}

/// Modified or non-primary clicks are left to the browser so they still open a new tab.
fn is_plain_click(button: i16, ctrl: bool, meta: bool, shift: bool) -> bool {
    button == 0 && !ctrl && !meta && !shift
}

#[function_component(Quiz)]
pub fn quiz(props: &QuizProps) -> Html {
    // Attribution is read once on mount; the link never changes after that.
    let funnel = use_mut_ref(|| {
        let context = AttributionContext::from_window();
        info!("Click attribution source: {}", context.source());
        Funnel::new(AffiliateLink::from_context(&context))
    });
    let rerender = use_force_update();

    let handle = {
        let funnel = funnel.clone();
        let collectors = props.collectors.clone();
        move |answer: Answer| {
            let effects = {
                let mut funnel = funnel.borrow_mut();
                let before = funnel.step();
                let effects = funnel.handle(answer);
                if funnel.step() != before && funnel.step().is_terminal() {
                    info!("Funnel finished on {:?}", funnel.step());
                }
                effects
            };
            rerender.force_update();
            if let Some((url, delay_ms)) = dispatch(effects, &collectors) {
                Timeout::new(delay_ms, move || navigate(&url)).forget();
            }
        }
    };

    let on_state_answer = {
        let handle = handle.clone();
        Callback::from(move |in_excluded: bool| handle(Answer::InExcludedState(in_excluded)))
    };

    let on_age_answer = {
        let handle = handle.clone();
        Callback::from(move |is_adult: bool| handle(Answer::IsAdult(is_adult)))
    };

    let on_cta = Callback::from(move |e: MouseEvent| {
        if !is_plain_click(e.button(), e.ctrl_key(), e.meta_key(), e.shift_key()) {
            return;
        }
        e.prevent_default();
        handle(Answer::CtaActivated);
    });

    let (step, href) = {
        let funnel = funnel.borrow();
        (funnel.step(), funnel.link().as_str().to_string())
    };

    html! {
        <div class="quiz-page">
            <div class="quiz-content">
                <div class="quiz-header fade-up">
                    <h1>{"Backspin "}<span class="text-gradient">{"Games"}</span></h1>
                    <p>{"Play. Compete. Get Paid."}</p>
                </div>

                <div class="quiz-card" key={format!("{:?}", step)}>
                    {
                        match step {
                            Step::State => html! { <StateStep on_answer={on_state_answer} /> },
                            Step::Age => html! { <AgeStep on_answer={on_age_answer} /> },
                            Step::Eligible => html! { <EligibleStep href={href} onclick={on_cta} /> },
                            Step::Ineligible => html! { <IneligibleStep /> },
                        }
                    }
                </div>

                {
                    if step == Step::State {
                        html! {
                            <div class="selling-points fade-up">
                                <SellingPoint icon="⚡" text="Instant Withdrawals via PayPal & More" />
                                <SellingPoint icon="🛡" text="100% Skill-Based. Zero Bots. Every match is fair." />
                                <SellingPoint icon="$" text="Win Real Cash, Not Just Points." />
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
            <style>
                {r#"
                .quiz-page {
                    min-height: 100vh;
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    background: radial-gradient(circle at top, #1f1f3a 0%, #0d0d14 70%);
                    color: #ffffff;
                    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
                }
                .quiz-content {
                    width: 100%;
                    max-width: 32rem;
                    padding: 3rem 1.5rem;
                }
                .quiz-header {
                    text-align: center;
                    margin-bottom: 2.5rem;
                }
                .quiz-header h1 {
                    font-size: 3rem;
                    font-weight: 700;
                    margin: 0 0 0.5rem 0;
                }
                .quiz-header p {
                    color: #9a9ab0;
                    font-size: 1.1rem;
                }
                .text-gradient {
                    background: linear-gradient(45deg, #7EB2FF, #b26bff);
                    -webkit-background-clip: text;
                    -webkit-text-fill-color: transparent;
                }
                .quiz-card {
                    background: rgba(255, 255, 255, 0.06);
                    backdrop-filter: blur(10px);
                    border: 1px solid rgba(126, 178, 255, 0.15);
                    border-radius: 1.25rem;
                    padding: 2rem;
                    box-shadow: 0 0 40px rgba(126, 178, 255, 0.15);
                    animation: scaleIn 0.35s ease-out;
                }
                .quiz-step {
                    display: flex;
                    flex-direction: column;
                    gap: 1.5rem;
                    text-align: center;
                }
                .step-counter {
                    font-size: 0.75rem;
                    text-transform: uppercase;
                    letter-spacing: 0.2em;
                    color: #9a9ab0;
                    margin: 0 0 0.5rem 0;
                }
                .quiz-step h2 {
                    font-size: 1.5rem;
                    font-weight: 600;
                    margin: 0;
                }
                .quiz-step p {
                    color: #9a9ab0;
                }
                .state-chips {
                    display: flex;
                    flex-wrap: wrap;
                    gap: 0.5rem;
                    justify-content: center;
                }
                .state-chip {
                    padding: 0.4rem 0.75rem;
                    border-radius: 999px;
                    font-size: 0.875rem;
                    background: rgba(255, 255, 255, 0.1);
                }
                .quiz-buttons {
                    display: flex;
                    gap: 0.75rem;
                }
                .quiz-button {
                    flex: 1;
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    gap: 0.5rem;
                    padding: 1rem 1.5rem;
                    border: none;
                    border-radius: 0.75rem;
                    font-weight: 600;
                    font-size: 1rem;
                    cursor: pointer;
                    transition: all 0.2s ease;
                }
                .quiz-button.primary, .cta-button {
                    background: #7EB2FF;
                    color: #0d0d14;
                    box-shadow: 0 0 20px rgba(126, 178, 255, 0.4);
                }
                .quiz-button.primary:hover, .cta-button:hover {
                    filter: brightness(1.1);
                }
                .quiz-button.secondary {
                    background: rgba(255, 255, 255, 0.1);
                    color: #ffffff;
                }
                .quiz-button.secondary:hover {
                    background: rgba(255, 255, 255, 0.15);
                }
                .cta-button {
                    display: inline-flex;
                    justify-content: center;
                    width: 100%;
                    padding: 1rem 1.5rem;
                    border-radius: 0.75rem;
                    font-weight: 600;
                    font-size: 1.125rem;
                    text-decoration: none;
                    box-sizing: border-box;
                }
                .result-icon {
                    width: 4rem;
                    height: 4rem;
                    border-radius: 50%;
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    margin: 0 auto;
                    font-size: 2rem;
                }
                .result-icon.success {
                    background: rgba(46, 204, 113, 0.2);
                    color: #2ecc71;
                }
                .result-icon.failure {
                    background: rgba(231, 76, 60, 0.2);
                    color: #e74c3c;
                }
                .selling-points {
                    margin-top: 2.5rem;
                    display: flex;
                    flex-direction: column;
                    gap: 1rem;
                    color: #9a9ab0;
                    animation-delay: 0.3s;
                }
                .selling-point {
                    display: flex;
                    align-items: center;
                    gap: 0.75rem;
                    font-size: 0.875rem;
                }
                .selling-point-icon {
                    color: #b26bff;
                    width: 1.25rem;
                    text-align: center;
                }
                .fade-up {
                    animation: fadeUp 0.5s ease-out both;
                }
                @keyframes fadeUp {
                    from { opacity: 0; transform: translateY(20px); }
                    to { opacity: 1; transform: translateY(0); }
                }
                @keyframes scaleIn {
                    from { opacity: 0; transform: scale(0.96); }
                    to { opacity: 1; transform: scale(1); }
                }
                "#}
            </style>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AnswerProps {
    pub on_answer: Callback<bool>,
}

#[function_component(StateStep)]
fn state_step(props: &AnswerProps) -> Html {
    let answer = |value: bool| {
        let on_answer = props.on_answer.clone();
        Callback::from(move |_: MouseEvent| on_answer.emit(value))
    };

    html! {
        <div class="quiz-step">
            <div>
                <p class="step-counter">{"Step 1 of 2"}</p>
                <h2>{"Are you located in any of these states?"}</h2>
            </div>
            <div class="state-chips">
                { for EXCLUDED_STATES.iter().map(|state| html! {
                    <span key={*state} class="state-chip">{*state}</span>
                }) }
            </div>
            <div class="quiz-buttons">
                <QuizButton variant={ButtonVariant::Secondary} onclick={answer(true)}>
                    {"✕ Yes, I am"}
                </QuizButton>
                <QuizButton variant={ButtonVariant::Primary} onclick={answer(false)}>
                    {"✓ No, I'm not"}
                </QuizButton>
            </div>
        </div>
    }
}

#[function_component(AgeStep)]
fn age_step(props: &AnswerProps) -> Html {
    let answer = |value: bool| {
        let on_answer = props.on_answer.clone();
        Callback::from(move |_: MouseEvent| on_answer.emit(value))
    };

    html! {
        <div class="quiz-step">
            <div>
                <p class="step-counter">{"Step 2 of 2"}</p>
                <h2>{"Are you 18 years or older?"}</h2>
            </div>
            <div class="quiz-buttons">
                <QuizButton variant={ButtonVariant::Secondary} onclick={answer(false)}>
                    {"✕ No"}
                </QuizButton>
                <QuizButton variant={ButtonVariant::Primary} onclick={answer(true)}>
                    {"✓ Yes, I am"}
                </QuizButton>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EligibleProps {
    pub href: String,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(EligibleStep)]
fn eligible_step(props: &EligibleProps) -> Html {
    html! {
        <div class="quiz-step">
            <div class="result-icon success">{"✓"}</div>
            <div>
                <h2>{"You're Eligible! 🎉"}</h2>
                <p>{"You qualify to play and win real cash on Backspin Games."}</p>
            </div>
            <a href={props.href.clone()} class="cta-button" onclick={props.onclick.clone()}>
                {"Start Playing Now →"}
            </a>
        </div>
    }
}

#[function_component(IneligibleStep)]
fn ineligible_step() -> Html {
    html! {
        <div class="quiz-step">
            <div class="result-icon failure">{"✕"}</div>
            <div>
                <h2>{"Sorry, You're Not Eligible"}</h2>
                <p>{"Unfortunately, Backspin Games isn't available in your area or for your age group at this time."}</p>
            </div>
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum ButtonVariant {
    Primary,
    Secondary,
}

#[derive(Properties, PartialEq)]
pub struct QuizButtonProps {
    pub variant: ButtonVariant,
    pub onclick: Callback<MouseEvent>,
    pub children: Children,
}

#[function_component(QuizButton)]
fn quiz_button(props: &QuizButtonProps) -> Html {
    let variant = match props.variant {
        ButtonVariant::Primary => "primary",
        ButtonVariant::Secondary => "secondary",
    };

    html! {
        <button class={classes!("quiz-button", variant)} onclick={props.onclick.clone()}>
            { for props.children.iter() }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct SellingPointProps {
    pub icon: &'static str,
    pub text: &'static str,
}

#[function_component(SellingPoint)]
fn selling_point(props: &SellingPointProps) -> Html {
    html! {
        <div class="selling-point">
            <span class="selling-point-icon">{props.icon}</span>
            <span>{props.text}</span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unmodified_primary_clicks_are_intercepted() {
        assert!(is_plain_click(0, false, false, false));
        assert!(!is_plain_click(0, true, false, false));
        assert!(!is_plain_click(0, false, true, false));
        assert!(!is_plain_click(0, false, false, true));
        assert!(!is_plain_click(1, false, false, false));
    }
}
