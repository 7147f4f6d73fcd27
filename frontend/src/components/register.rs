use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_navigate};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let user = username.get_untracked();
        let mail = email.get_untracked();
        let pass = password.get_untracked();
        if user.trim().is_empty() || mail.trim().is_empty() || pass.is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let gateway = auth.gateway();
        spawn_local(async move {
            let result = gateway.sign_up(user.trim(), mail.trim(), &pass).await;
            set_is_submitting.set(false);
            match result {
                Ok(()) => navigate(AppRoute::Login),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <section class="auth">
            <h1>"Create an account"</h1>
            <form on:submit=on_submit>
                {move || error_msg.get().map(|msg| view! { <p role="alert">{msg}</p> })}
                <label for="username">"Username"</label>
                <input
                    id="username"
                    type="text"
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                    prop:value=username
                    required
                />
                <label for="email">"Email"</label>
                <input
                    id="email"
                    type="email"
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    prop:value=email
                    required
                />
                <label for="password">"Password"</label>
                <input
                    id="password"
                    type="password"
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    prop:value=password
                    required
                />
                <button type="submit" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() { "Registering..." } else { "Register" }}
                </button>
            </form>
            <p>
                "Already registered? "
                <Link to=AppRoute::Login>"Sign in"</Link>
            </p>
        </section>
    }
}
