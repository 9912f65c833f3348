use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();

    // The router watches the session and moves us to Login after this.
    let on_sign_out = move |_| auth.sign_out();

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow-sm">
                <div class="flex-1">
                    <span class="text-xl font-bold px-2">"Dashboard"</span>
                </div>
                <div class="flex-none gap-2">
                    <Link to=AppRoute::OnboardingIncome class="btn btn-ghost btn-sm">
                        "Edit onboarding"
                    </Link>
                    <button class="btn btn-outline btn-sm" on:click=on_sign_out>
                        "Sign out"
                    </button>
                </div>
            </div>
        </div>
    }
}
