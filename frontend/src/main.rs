use yew::prelude::*;
use yew_router::prelude::*;
use log::info;

mod config;
mod attribution;
mod tracking;
mod funnel;
mod pages {
    pub mod quiz;
}

use pages::quiz::Quiz;
use tracking::Collectors;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Quiz,
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[derive(Properties, PartialEq)]
pub struct RouterProps {
    pub collectors: Collectors,
}

// Every path lands on the quiz, so ad links with stray paths still convert.
#[function_component(FunnelRouter)]
fn funnel_router(props: &RouterProps) -> Html {
    let collectors = props.collectors.clone();
    let switch = move |routes: Route| {
        match routes {
            Route::Quiz => info!("Rendering Quiz page"),
            Route::NotFound => info!("Unknown path, rendering Quiz page"),
        }
        html! { <Quiz collectors={collectors.clone()} /> }
    };

    html! {
        <Switch<Route> render={switch} />
    }
}

#[function_component]
fn App() -> Html {
    let collectors = use_memo(|_| Collectors::vendor_pixels(), ());

    html! {
        <BrowserRouter>
            <FunnelRouter collectors={(*collectors).clone()} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting quiz funnel");
    yew::Renderer::<App>::new().render();
}
