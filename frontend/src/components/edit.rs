use crate::api::use_catalog;
use crate::views::edit::MovieDraft;
use crate::web::route::AppRoute;
use crate::web::router::use_navigate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use movielist_shared::{Movie, MovieStatus};

/// 编辑页：整条记录替换
#[component]
pub fn EditPage(id: i64) -> impl IntoView {
    let gateway = StoredValue::new(use_catalog());
    let navigate = use_navigate();

    let original = RwSignal::new(Option::<Movie>::None);
    let draft = RwSignal::new(MovieDraft::default());
    let (is_saving, set_is_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local(async move {
        let gateway = gateway.get_value();
        match gateway.get(id).await {
            Ok(movie) => {
                draft.set(MovieDraft::from_movie(&movie));
                original.set(Some(movie));
            }
            Err(e) => set_error_msg.set(Some(e.to_string())),
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(base) = original.get_untracked() else {
            return;
        };
        let movie = match draft.with_untracked(|d| d.apply_to(&base)) {
            Ok(movie) => movie,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_saving.set(true);
        set_error_msg.set(None);
        let gateway = gateway.get_value();
        spawn_local(async move {
            let result = gateway.update(id, &movie).await;
            set_is_saving.set(false);
            match result {
                Ok(_) => navigate(AppRoute::Detail(id)),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <section>
            <h1>"Edit movie"</h1>
            {move || error_msg.get().map(|msg| view! { <pre role="alert">{msg}</pre> })}
            <Show
                when=move || original.with(Option::is_some)
                fallback=|| view! { <p>"Loading..."</p> }
            >
                <form on:submit=on_submit>
                    <label>"Title"
                        <input
                            prop:value=move || draft.with(|d| d.title.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                draft.update(|d| d.title = v);
                            }
                        />
                    </label>
                    <label>"Release year"
                        <input
                            inputmode="numeric"
                            prop:value=move || draft.with(|d| d.release_year.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                draft.update(|d| d.release_year = v);
                            }
                        />
                    </label>
                    <label>"Genre"
                        <input
                            prop:value=move || draft.with(|d| d.genre.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                draft.update(|d| d.genre = v);
                            }
                        />
                    </label>
                    <label>"Runtime (min)"
                        <input
                            inputmode="numeric"
                            prop:value=move || draft.with(|d| d.runtime.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                draft.update(|d| d.runtime = v);
                            }
                        />
                    </label>
                    <label>"Status"
                        <select on:change=move |ev| {
                            let watched = event_target_value(&ev) == MovieStatus::Watched.as_str();
                            let status = if watched {
                                MovieStatus::Watched
                            } else {
                                MovieStatus::Wishlist
                            };
                            draft.update(|d| d.status = status);
                        }>
                            <option
                                value=MovieStatus::Wishlist.as_str()
                                selected=move || draft.with(|d| d.status == MovieStatus::Wishlist)
                            >
                                "Wishlist"
                            </option>
                            <option
                                value=MovieStatus::Watched.as_str()
                                selected=move || draft.with(|d| d.status == MovieStatus::Watched)
                            >
                                "Watched"
                            </option>
                        </select>
                    </label>
                    <label>"Rating (1-10)"
                        <input
                            inputmode="numeric"
                            prop:value=move || draft.with(|d| d.rating.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                draft.update(|d| d.rating = v);
                            }
                        />
                    </label>
                    <label>"Review"
                        <textarea
                            prop:value=move || draft.with(|d| d.review.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                draft.update(|d| d.review = v);
                            }
                        ></textarea>
                    </label>
                    <button type="submit" disabled=move || is_saving.get()>
                        {move || if is_saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </form>
            </Show>
        </section>
    }
}
