use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

#[component]
fn OnboardingStep(
    step: u8,
    title: &'static str,
    next: AppRoute,
    next_label: &'static str,
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-2xl bg-base-100">
                <div class="card-body">
                    <span class="badge badge-outline">{format!("Step {step} of 2")}</span>
                    <h1 class="card-title text-2xl">{title}</h1>
                    <div class="card-actions justify-end mt-6">
                        <Link to=next class="btn btn-primary">{next_label}</Link>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn OnboardingIncomePage() -> impl IntoView {
    view! {
        <OnboardingStep
            step=1
            title="Monthly income"
            next=AppRoute::OnboardingExpenses
            next_label="Continue"
        />
    }
}

#[component]
pub fn OnboardingExpensesPage() -> impl IntoView {
    view! {
        <OnboardingStep
            step=2
            title="Fixed expenses"
            next=AppRoute::Dashboard
            next_label="Go to dashboard"
        />
    }
}
