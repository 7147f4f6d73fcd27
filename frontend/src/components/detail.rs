use crate::api::use_catalog;
use crate::views::detail::{self, DetailState};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use movielist_shared::Movie;

/// 电影详情页：基本信息、点赞与评论
#[component]
pub fn DetailPage(id: i64) -> impl IntoView {
    let gateway = StoredValue::new(use_catalog());
    let state = RwSignal::new(DetailState::default());
    let (draft, set_draft) = signal(String::new());

    state.update(DetailState::begin_load);
    spawn_local(async move {
        let gateway = gateway.get_value();
        let (movie, comments) = detail::load(&gateway, id).await;
        state.update(|s| s.finish_load(movie, comments));
    });

    let on_like = move |_: leptos::ev::MouseEvent| {
        let Some(movie) = state.with_untracked(|s| s.movie.clone()) else {
            return;
        };
        let gateway = gateway.get_value();
        spawn_local(async move {
            let outcome = if movie.user_liked {
                gateway.unlike(id).await
            } else {
                gateway.like(id).await
            };
            if outcome.is_ok() {
                state.update(|s| s.set_movie(movie.with_like(!movie.user_liked)));
            }
        });
    };

    let on_comment = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let content = draft.get_untracked().trim().to_string();
        if content.is_empty() {
            return;
        }
        let gateway = gateway.get_value();
        spawn_local(async move {
            if let Ok(comment) = gateway.add_comment(id, &content).await {
                state.update(|s| s.push_comment(comment));
                set_draft.set(String::new());
            }
        });
    };

    view! {
        <section>
            <Show when=move || !state.with(|s| s.loading) fallback=|| view! { <p>"Loading..."</p> }>
                {move || {
                    state
                        .with(|s| s.error.clone())
                        .map(|msg| view! { <pre role="alert">{msg}</pre> })
                }}
                {move || state.with(|s| s.movie.clone()).map(|movie| movie_summary(movie, on_like))}

                <h2>"Comments"</h2>
                <ul class="comments">
                    {move || state.with(|s| {
                        s.comments
                            .iter()
                            .map(|c| {
                                let author = c
                                    .username
                                    .clone()
                                    .unwrap_or_else(|| "anonymous".to_string());
                                view! { <li><strong>{author}</strong>": "{c.content.clone()}</li> }
                            })
                            .collect_view()
                    })}
                </ul>
                <form on:submit=on_comment>
                    <textarea
                        prop:value=draft
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                    ></textarea>
                    <button type="submit">"Add comment"</button>
                </form>
            </Show>
        </section>
    }
}

fn movie_summary(
    movie: Movie,
    on_like: impl Fn(leptos::ev::MouseEvent) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let id = movie.id;
    let year = movie.release_year.map(|y| format!(" ({})", y)).unwrap_or_default();
    let rating = movie
        .rating
        .map(|r| format!("Rating: {}/10", r))
        .unwrap_or_else(|| "Not rated".to_string());
    let like_label = if movie.user_liked { "Unlike" } else { "Like" };
    let stats = format!(
        "Added by {} · {} likes · {} comments",
        movie.username, movie.likes_count, movie.comments_count
    );

    view! {
        <article>
            {(!movie.poster_url.is_empty())
                .then(|| view! { <img src=movie.poster_url.clone() alt=movie.title.clone() /> })}
            <h1>{movie.title.clone()}{year}</h1>
            <p>{movie.genre.clone()}" · "{movie.runtime}" min · "{movie.status.to_string()}</p>
            <p>{rating}</p>
            {movie.review.clone().map(|review| view! { <blockquote>{review}</blockquote> })}
            <p>{stats}</p>
            <button on:click=on_like>{like_label}</button>
            <Link to=AppRoute::Edit(id)>"Edit"</Link>
        </article>
    }
}
