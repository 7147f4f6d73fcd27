use crate::api::use_catalog;
use crate::views::movie_list::{self, ListActions, ListScope, MovieList};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use movielist_shared::{Movie, MovieStatus};

#[derive(Debug, Clone, Copy)]
enum CardAction {
    Delete,
    MarkWatched,
    MoveToWishlist,
    ToggleLike,
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// 想看 / 已看 / 全部列表页
#[component]
pub fn MovieListPage(scope: ListScope) -> impl IntoView {
    let gateway = use_catalog();
    let list = RwSignal::new(MovieList::empty(scope));
    let (loading, set_loading) = signal(true);

    spawn_local(async move {
        // 失败已由网关记录，列表保持为空
        if let Ok(loaded) = movie_list::load(&gateway, scope).await {
            list.set(loaded);
        }
        set_loading.set(false);
    });

    view! {
        <section>
            <h1>{scope.title()}</h1>
            <Show when=move || !loading.get() fallback=|| view! { <p>"Loading..."</p> }>
                <Show
                    when=move || list.with(|l| !l.is_empty())
                    fallback=|| view! { <p>"No movies here yet."</p> }
                >
                    <MovieCards list=list />
                </Show>
            </Show>
        </section>
    }
}

/// 电影卡片列表
///
/// 动作成功后就地修补 `list`，失败时不回滚也不提示。
#[component]
pub fn MovieCards(list: RwSignal<MovieList>) -> impl IntoView {
    let gateway = StoredValue::new(use_catalog());

    let run = move |action: CardAction, id: i64| {
        if matches!(action, CardAction::Delete)
            && !confirm("Are you sure you want to delete this movie?")
        {
            return;
        }
        let snapshot = list.get_untracked();
        let gateway = gateway.get_value();
        spawn_local(async move {
            let actions = ListActions::new(&gateway);
            let outcome = match action {
                CardAction::Delete => actions.delete(&snapshot, id).await,
                CardAction::MarkWatched => actions.mark_watched(&snapshot, id).await,
                CardAction::MoveToWishlist => actions.move_to_wishlist(&snapshot, id).await,
                CardAction::ToggleLike => actions.toggle_like(&snapshot, id).await,
            };
            if let Ok(Some(change)) = outcome {
                list.update(|l| l.apply(change));
            }
        });
    };

    view! {
        <ul class="movies">
            {move || {
                list.with(|l| {
                    l.movies()
                        .iter()
                        .map(|movie| movie_card(movie.clone(), run))
                        .collect_view()
                })
            }}
        </ul>
    }
}

fn movie_card(
    movie: Movie,
    run: impl Fn(CardAction, i64) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let id = movie.id;
    let year = movie.release_year.map(|y| format!(" ({})", y)).unwrap_or_default();
    let stats = format!("{} likes · {} comments", movie.likes_count, movie.comments_count);
    let like_label = if movie.user_liked { "Unlike" } else { "Like" };

    let status_button = match movie.status {
        MovieStatus::Wishlist => view! {
            <button on:click=move |_| run(CardAction::MarkWatched, id)>"Mark as watched"</button>
        }
        .into_any(),
        MovieStatus::Watched => view! {
            <button on:click=move |_| run(CardAction::MoveToWishlist, id)>
                "Back to wishlist"
            </button>
        }
        .into_any(),
    };

    view! {
        <li class="movie-card">
            {(!movie.poster_url.is_empty())
                .then(|| view! { <img src=movie.poster_url.clone() alt=movie.title.clone() /> })}
            <Link to=AppRoute::Detail(id)>{movie.title.clone()}{year}</Link>
            <p>{movie.genre.clone()}</p>
            <p>{stats}</p>
            <button on:click=move |_| run(CardAction::ToggleLike, id)>{like_label}</button>
            {status_button}
            <Link to=AppRoute::Edit(id)>"Edit"</Link>
            <button on:click=move |_| run(CardAction::Delete, id)>"Delete"</button>
        </li>
    }
}
