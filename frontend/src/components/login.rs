use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

/// Landing page for visitors without a session.
///
/// The sign-in flow lives in the backend (`/auth/request-code`); until it is
/// wired up this page only points to the first onboarding step.
#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col text-center">
                <h1 class="text-3xl font-bold">"Login"</h1>
                <p class="text-base-content/70">
                    "Request a sign-in code to continue."
                </p>
                <Link to=AppRoute::OnboardingIncome class="btn btn-primary">
                    "Start onboarding"
                </Link>
            </div>
        </div>
    }
}
