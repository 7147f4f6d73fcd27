use crate::api::{BrowserCatalogGateway, use_catalog};
use crate::error::CatalogError;
use crate::views::discover::{self, CatalogPreview, DiscoverState};
use crate::views::movie_list::{ListActions, ListScope, MovieList};
use leptos::prelude::*;
use leptos::task::spawn_local;
use movielist_shared::{CatalogPage, CatalogResult};

/// 发现页顶部可切换的外部榜单
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listing {
    Trending,
    Popular,
    TopRated,
    Upcoming,
}

impl Listing {
    const ALL: [Listing; 4] = [Self::Trending, Self::Popular, Self::TopRated, Self::Upcoming];

    fn label(&self) -> &'static str {
        match self {
            Self::Trending => "Trending",
            Self::Popular => "Popular",
            Self::TopRated => "Top rated",
            Self::Upcoming => "Upcoming",
        }
    }

    async fn fetch(&self, gateway: &BrowserCatalogGateway) -> Result<CatalogPage, CatalogError> {
        match self {
            Self::Trending => gateway.trending().await,
            Self::Popular => gateway.popular().await,
            Self::TopRated => gateway.top_rated().await,
            Self::Upcoming => gateway.upcoming().await,
        }
    }
}

#[component]
pub fn DiscoverPage() -> impl IntoView {
    let gateway = StoredValue::new(use_catalog());
    let state = RwSignal::new(DiscoverState::default());
    let (listing, set_listing) = signal(Listing::Trending);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (preview, set_preview) = signal(Option::<CatalogPreview>::None);
    let searching = Memo::new(move |_| state.with(DiscoverState::is_searching));

    let load_listing = move |which: Listing| {
        set_listing.set(which);
        let Some(ticket) = state.try_update(DiscoverState::begin_trending) else {
            return;
        };
        let gateway = gateway.get_value();
        spawn_local(async move {
            let outcome = which.fetch(&gateway).await;
            state.update(|s| {
                s.finish_trending(ticket, outcome);
            });
        });
    };

    load_listing(Listing::Trending);

    let on_search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(ticket) = state.try_update(DiscoverState::begin_search).flatten() else {
            return;
        };
        let gateway = gateway.get_value();
        spawn_local(async move {
            let outcome = gateway.search(ticket.query()).await;
            state.update(|s| {
                s.finish_search(&ticket, outcome);
            });
        });
    };

    let show_preview = move |tmdb_id: i64| {
        let gateway = gateway.get_value();
        spawn_local(async move {
            // 失败已由网关记录
            if let Ok(loaded) = discover::load_preview(&gateway, tmdb_id).await {
                set_preview.set(Some(loaded));
            }
        });
    };

    let add_to_wishlist = move |result: CatalogResult| {
        let gateway = gateway.get_value();
        spawn_local(async move {
            let discover = MovieList::empty(ListScope::Discover);
            if ListActions::new(&gateway)
                .add_from_catalog(&discover, &result)
                .await
                .is_ok()
            {
                set_notice.set(Some("Movie added to wishlist!".to_string()));
            }
        });
    };

    let card = move |result: CatalogResult| catalog_card(result, add_to_wishlist, show_preview);

    view! {
        <section>
            <h1>"Discover"</h1>

            <form on:submit=on_search>
                <input
                    type="search"
                    placeholder="Search movies..."
                    prop:value=move || state.with(|s| s.query.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.query = value);
                    }
                />
                <button type="submit" disabled=move || state.with(|s| s.search_loading)>
                    "Search"
                </button>
                <button type="button" on:click=move |_| state.update(DiscoverState::clear_search)>
                    "Clear"
                </button>
            </form>

            {move || notice.get().map(|msg| view! { <p role="status">{msg}</p> })}
            {move || state.with(|s| s.error.clone()).map(|msg| view! { <p role="alert">{msg}</p> })}
            {move || {
                preview
                    .get()
                    .map(|p| preview_panel(p, move || set_preview.set(None), add_to_wishlist))
            }}

            {move || {
                if searching.get() {
                    view! {
                        <h2>"Search results"</h2>
                        <Show
                            when=move || !state.with(|s| s.search_loading)
                            fallback=|| view! { <p>"Searching..."</p> }
                        >
                            {move || state.with(|s| {
                                s.results.is_empty().then(|| {
                                    let query = s.searched_query().unwrap_or_default().to_string();
                                    view! { <p>{format!("No movies found for \"{}\".", query)}</p> }
                                })
                            })}
                            <ul class="catalog">
                                {move || state.with(|s| {
                                    s.results
                                        .iter()
                                        .map(|r| card(r.clone()))
                                        .collect_view()
                                })}
                            </ul>
                        </Show>
                    }
                    .into_any()
                } else {
                    view! {
                        <nav>
                            {Listing::ALL
                                .into_iter()
                                .map(|which| view! {
                                    <button
                                        disabled={move || listing.get() == which}
                                        on:click=move |_| load_listing(which)
                                    >
                                        {which.label()}
                                    </button>
                                })
                                .collect_view()}
                        </nav>
                        <Show
                            when=move || !state.with(|s| s.loading)
                            fallback=|| view! { <p>"Loading..."</p> }
                        >
                            <ul class="catalog">
                                {move || state.with(|s| {
                                    s.trending
                                        .iter()
                                        .map(|r| card(r.clone()))
                                        .collect_view()
                                })}
                            </ul>
                        </Show>
                    }
                    .into_any()
                }
            }}
        </section>
    }
}

fn catalog_card(
    result: CatalogResult,
    add: impl Fn(CatalogResult) + Copy + Send + Sync + 'static,
    show: impl Fn(i64) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let title = result.title.clone().unwrap_or_default();
    let year = result.release_year().map(|y| format!(" ({})", y)).unwrap_or_default();
    let poster = result.poster_url();
    let overview = result.overview.clone().unwrap_or_default();
    let tmdb_id = result.id;

    view! {
        <li class="catalog-card">
            {(!poster.is_empty()).then(|| view! { <img src=poster.clone() alt=title.clone() /> })}
            <h3>{title.clone()}{year}</h3>
            <p>{overview}</p>
            {tmdb_id.map(|id| view! { <button on:click=move |_| show(id)>"Details"</button> })}
            <button on:click=move |_| add(result.clone())>"Add to wishlist"</button>
        </li>
    }
}

/// 外部条目详情与相似推荐
fn preview_panel(
    preview: CatalogPreview,
    close: impl Fn() + Copy + Send + Sync + 'static,
    add: impl Fn(CatalogResult) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let CatalogPreview { movie, similar } = preview;
    let year = movie.release_year.map(|y| format!(" ({})", y)).unwrap_or_default();
    let facts = format!("{} · {} min", movie.genre, movie.runtime);

    view! {
        <aside class="preview">
            <button on:click=move |_| close()>"Close"</button>
            {(!movie.poster_url.is_empty())
                .then(|| view! { <img src=movie.poster_url.clone() alt=movie.title.clone() /> })}
            <h2>{movie.title.clone()}{year}</h2>
            <p>{facts}</p>
            {(!similar.is_empty()).then(|| view! { <h3>"You might also like"</h3> })}
            <ul class="catalog">
                {similar
                    .into_iter()
                    .map(|r| {
                        let title = r.title.clone().unwrap_or_default();
                        view! {
                            <li>
                                {title}
                                <button on:click=move |_| add(r.clone())>"Add to wishlist"</button>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </aside>
    }
}
