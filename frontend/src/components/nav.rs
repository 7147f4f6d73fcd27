use crate::api::use_catalog;
use crate::auth::{logout, use_auth};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use movielist_shared::UserProfile;

/// 顶部导航，仅在已登录时显示
#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let gateway = StoredValue::new(use_catalog());
    let is_authenticated = auth.is_authenticated_signal();
    let (profile, set_profile) = signal(Option::<UserProfile>::None);

    // 登录状态变化时刷新用户资料，失败时退回令牌中的用户名
    Effect::new(move |_| {
        if !is_authenticated.get() {
            set_profile.set(None);
            return;
        }
        let gateway = gateway.get_value();
        spawn_local(async move {
            if let Ok(me) = gateway.current_profile().await {
                set_profile.set(Some(me));
            }
        });
    });

    let display_name = move || {
        profile
            .with(|p| p.as_ref().map(|p| p.username.clone()))
            .filter(|name| !name.is_empty())
            .or_else(|| auth.identity.with(|s| s.as_ref().map(|s| s.username.clone())))
    };
    let email = move || profile.with(|p| p.as_ref().and_then(|p| p.email.clone()));

    // 注销后的跳转由路由服务的认证状态监听处理
    let on_logout = move |_: leptos::ev::MouseEvent| logout(&auth);

    view! {
        <Show when=move || is_authenticated.get()>
            <nav class="navbar">
                <Link to=AppRoute::Wishlist>"Wishlist"</Link>
                <Link to=AppRoute::Watched>"Watched"</Link>
                <Link to=AppRoute::AllMovies>"All"</Link>
                <Link to=AppRoute::Discover>"Discover"</Link>
                <span class="user" title=email>{display_name}</span>
                <button on:click=on_logout>"Logout"</button>
            </nav>
        </Show>
    }
}
