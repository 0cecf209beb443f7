/// New tab page: folder columns, drag-and-drop and the quick search overlay

use crate::bookmark_data::{BookmarkItem, FolderState, SearchableBookmark, folder_emoji, is_expanded};
use crate::browser::{LoadedFolders, get_all_folders, navigate, run_action};
use crate::dashboard::Dashboard;
use crate::drag::DropSpot;
use crate::quick_search::{KeyOutcome, OpenTarget, SearchSession, is_typing_key, open_target};
use crate::search::SearchEngine;
use crate::settings::{AppSettings, LinkOpen, SettingsAction, reduce};
use crate::storage::{APP_SETTINGS_KEY, ChromeStorage, FOLDER_STATE_KEY, load_config, save_config, store_config};
use crate::ui::components::{DropZone, FolderCard, HighlightedText, Spinner};
use crate::ui::settings_panel::SettingsPanel;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

#[derive(Clone, PartialEq, Default)]
struct Page {
    loading: bool,
    /// Every folder from the browser, hidden ones included
    folders: LoadedFolders,
    settings: AppSettings,
    dashboard: Dashboard,
    search_engine: Option<SearchEngine>,
    bookmarks: Vec<SearchableBookmark>,
    /// Bumped whenever the folder state should be written out
    folder_revision: u32,
    settings_revision: u32,
}

enum PageAction {
    Loaded {
        folders: LoadedFolders,
        folder_state: FolderState,
        settings: AppSettings,
    },
    FoldersFetched(LoadedFolders),
    Toggle(String),
    CycleEmoji(String),
    DragStart(usize, usize),
    DragOver(DropSpot),
    DragLeave,
    Drop(DropSpot),
    DragEnd,
    Settings(SettingsAction),
}

impl Page {
    fn relayout(&mut self, folders: LoadedFolders, folder_state: FolderState) {
        self.dashboard = Dashboard::load(&folders, folder_state, &self.settings);
        self.folders = folders;
        self.reindex();
    }

    fn reindex(&mut self) {
        let engine = SearchEngine::new(self.settings.search_config());
        self.bookmarks = engine.flatten(&self.dashboard.folders());
        self.search_engine = Some(engine);
    }
}

impl Reducible for Page {
    type Action = PageAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let lock_layout = self.settings.lock_layout;
        let mut page = (*self).clone();

        match action {
            PageAction::Loaded { folders, folder_state, settings } => {
                page.settings = settings;
                page.relayout(folders, folder_state);
                page.loading = false;
            }
            PageAction::FoldersFetched(folders) => {
                let folder_state = page.dashboard.folder_state().clone();
                page.relayout(folders, folder_state);
            }
            PageAction::Toggle(folder_id) => {
                page.dashboard.toggle_folder(&folder_id);
                page.folder_revision += 1;
            }
            PageAction::CycleEmoji(folder_id) => {
                page.dashboard.cycle_emoji(&folder_id);
                page.folder_revision += 1;
            }
            PageAction::DragStart(column, index) => {
                if !page.dashboard.begin_drag(column, index, lock_layout) {
                    return self;
                }
            }
            PageAction::DragOver(spot) => {
                page.dashboard.hover(spot, lock_layout);
                if page.dashboard.drag_state() == self.dashboard.drag_state() {
                    return self;
                }
            }
            PageAction::DragLeave => page.dashboard.leave(),
            PageAction::Drop(spot) => {
                if page.dashboard.drop_on(spot, lock_layout).is_some() {
                    page.folder_revision += 1;
                    page.reindex();
                }
            }
            PageAction::DragEnd => page.dashboard.cancel_drag(),
            PageAction::Settings(action) => match reduce(&page.settings, action) {
                Ok(settings) => {
                    page.settings = settings;
                    page.settings_revision += 1;
                    let (folders, folder_state) = (page.folders.clone(), page.dashboard.folder_state().clone());
                    page.relayout(folders, folder_state);
                }
                Err(e) => {
                    log::warn!("rejected settings change: {}", e);
                    return self;
                }
            },
        }

        page.into()
    }
}

fn launch(target: OpenTarget) {
    match target {
        OpenTarget::Navigate { url, new_tab } => navigate(&url, new_tab),
        OpenTarget::Run { action, new_tab } => spawn_local(async move {
            if let Err(e) = run_action(&action, new_tab).await {
                log::error!("bookmark action failed: {}", e);
            }
        }),
    }
}

fn open_bookmark(bookmark: &BookmarkItem, link_open: LinkOpen) {
    let new_tab = link_open == LinkOpen::NewTab;
    launch(match &bookmark.action {
        Some(action) => OpenTarget::Run {
            action: action.clone(),
            new_tab,
        },
        None => OpenTarget::Navigate {
            url: bookmark.url.clone(),
            new_tab,
        },
    });
}

fn typing_in_field(e: &KeyboardEvent) -> bool {
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
}

#[function_component(NewTab)]
pub fn new_tab() -> Html {
    let page = use_reducer(|| Page {
        loading: true,
        ..Page::default()
    });
    let session = use_state(SearchSession::default);
    let show_settings = use_state(|| false);
    let search_input = use_node_ref();

    // Load settings, folder state and folders on mount
    {
        let dispatcher = page.dispatcher();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let settings: AppSettings = load_config(&ChromeStorage, APP_SETTINGS_KEY, AppSettings::default()).await;
                let folder_state: FolderState = load_config(&ChromeStorage, FOLDER_STATE_KEY, FolderState::new()).await;
                let folders = get_all_folders(&settings.folder_options()).await;
                log::info!("loaded {} folders", folders.folders.len());

                dispatcher.dispatch(PageAction::Loaded {
                    folders,
                    folder_state,
                    settings,
                });
            });
            || ()
        });
    }

    // Persist folder state after toggles and moves; not awaited by the handlers
    {
        let folder_state = page.dashboard.folder_state().clone();
        use_effect_with(page.folder_revision, move |revision| {
            if *revision > 0 {
                spawn_local(async move {
                    if let Err(e) = save_config(&ChromeStorage, FOLDER_STATE_KEY, &folder_state).await {
                        log::error!("failed to save folder state: {}", e);
                    }
                });
            }
            || ()
        });
    }

    // Persist settings (a reset clears them), then refetch folders since the synthetic ones may have changed
    {
        let settings = page.settings.clone();
        let dispatcher = page.dispatcher();
        use_effect_with(page.settings_revision, move |revision| {
            if *revision > 0 {
                spawn_local(async move {
                    if let Err(e) = store_config(&ChromeStorage, APP_SETTINGS_KEY, &settings, &AppSettings::default()).await {
                        log::error!("failed to save settings: {}", e);
                    }
                    let folders = get_all_folders(&settings.folder_options()).await;
                    dispatcher.dispatch(PageAction::FoldersFetched(folders));
                });
            }
            || ()
        });
    }

    // Page-wide keyboard handling, re-registered whenever the session changes
    {
        let session = session.clone();
        let search_input = search_input.clone();
        let link_open = page.settings.link_open;
        use_effect_with(((*session).clone(), link_open), move |(snapshot, link_open)| {
            let snapshot = snapshot.clone();
            let link_open = *link_open;

            let listener = Closure::<dyn Fn(KeyboardEvent)>::new(move |e: KeyboardEvent| {
                if !snapshot.is_active {
                    if typing_in_field(&e) || !is_typing_key(&e.key(), e.ctrl_key(), e.meta_key(), e.alt_key()) {
                        return;
                    }
                    let mut next = snapshot.clone();
                    next.activate();
                    session.set(next);
                    // Focus now so the key press lands in the search field
                    if let Some(input) = search_input.cast::<HtmlInputElement>() {
                        let _ = input.focus();
                    }
                    return;
                }

                let mut next = snapshot.clone();
                match next.handle_key(&e.key()) {
                    KeyOutcome::Ignored => return,
                    KeyOutcome::Handled | KeyOutcome::Closed => {}
                    KeyOutcome::Open(result) => launch(open_target(&result, link_open)),
                }
                e.prevent_default();
                session.set(next);
            });

            let document = web_sys::window().and_then(|w| w.document());
            if let Some(document) = &document {
                if let Err(e) = document.add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref()) {
                    log::error!("could not listen for keys: {:?}", e);
                }
            }

            move || {
                if let Some(document) = document {
                    let _ = document.remove_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
                }
                drop(listener);
            }
        });
    }

    let on_query = {
        let session = session.clone();
        let page = page.clone();
        Callback::from(move |e: InputEvent| {
            let Some(input) = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
                return;
            };
            let Some(engine) = &page.search_engine else {
                return;
            };
            let mut next = (*session).clone();
            next.is_active = true;
            next.update_query(engine, &page.bookmarks, &input.value());
            session.set(next);
        })
    };

    let on_result_click = {
        let session = session.clone();
        let link_open = page.settings.link_open;
        move |index: usize| {
            let session = session.clone();
            Callback::from(move |e: MouseEvent| {
                e.prevent_default();
                if let Some(result) = session.results.get(index) {
                    launch(open_target(result, link_open));
                }
                session.set(SearchSession::default());
            })
        }
    };

    let on_drag_start = {
        let dispatcher = page.dispatcher();
        Callback::from(move |(column, index): (usize, usize)| dispatcher.dispatch(PageAction::DragStart(column, index)))
    };

    let on_drag_end = {
        let dispatcher = page.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(PageAction::DragEnd))
    };
    let on_hover = {
        let dispatcher = page.dispatcher();
        Callback::from(move |spot: DropSpot| dispatcher.dispatch(PageAction::DragOver(spot)))
    };
    let on_leave = {
        let dispatcher = page.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(PageAction::DragLeave))
    };
    let on_drop = {
        let dispatcher = page.dispatcher();
        Callback::from(move |spot: DropSpot| dispatcher.dispatch(PageAction::Drop(spot)))
    };
    let on_toggle = {
        let dispatcher = page.dispatcher();
        Callback::from(move |folder_id: String| dispatcher.dispatch(PageAction::Toggle(folder_id)))
    };
    let on_emoji = {
        let dispatcher = page.dispatcher();
        Callback::from(move |folder_id: String| dispatcher.dispatch(PageAction::CycleEmoji(folder_id)))
    };
    let on_open = {
        let link_open = page.settings.link_open;
        Callback::from(move |bookmark: BookmarkItem| open_bookmark(&bookmark, link_open))
    };
    let on_settings_action = {
        let dispatcher = page.dispatcher();
        Callback::from(move |action: SettingsAction| dispatcher.dispatch(PageAction::Settings(action)))
    };
    let on_settings_toggle = {
        let show_settings = show_settings.clone();
        Callback::from(move |_: MouseEvent| show_settings.set(!*show_settings))
    };
    let on_settings_close = {
        let show_settings = show_settings.clone();
        Callback::from(move |_: ()| show_settings.set(false))
    };

    let drop_zone = |spot: DropSpot| {
        html! {
            <DropZone
                {spot}
                active={page.dashboard.drag_state().shows_indicator(&spot)}
                on_hover={on_hover.clone()}
                on_leave={on_leave.clone()}
                on_drop={on_drop.clone()}
            />
        }
    };

    let settings = &page.settings;
    let mut style = format!(
        "font-family: {}; font-size: {}px; --background-opacity: {};",
        settings.font_family,
        settings.font_size,
        f64::from(settings.background_opacity) / 100.0
    );
    if !settings.background_image.is_empty() {
        style.push_str(&format!(" background-image: url(\"{}\");", settings.background_image));
    }
    let columns = page.dashboard.columns();
    let folder_state = page.dashboard.folder_state();
    let draggable = !settings.lock_layout;

    html! {
        <div class={classes!("newtab", format!("theme-{:?}", settings.theme).to_lowercase())} {style}>
            <button class="settings-toggle" onclick={on_settings_toggle}>{"⚙"}</button>

            if *show_settings {
                <SettingsPanel
                    settings={settings.clone()}
                    folders={page.folders.folders.clone()}
                    on_action={on_settings_action}
                    on_close={on_settings_close}
                />
            }

            <div class={classes!("quick-search", session.is_active.then_some("active"))}>
                <input
                    ref={search_input}
                    type="text"
                    class="quick-search-input"
                    placeholder="Search bookmarks"
                    value={session.query.clone()}
                    oninput={on_query}
                />
                <ol class="quick-search-results">
                    {for session.results.iter().enumerate().map(|(index, result)| html! {
                        <li
                            class={classes!("quick-search-result", (index == session.selected_index).then_some("selected"))}
                            key={result.id.clone()}
                            onclick={on_result_click(index)}
                        >
                            <span class="result-shortcut">{index + 1}</span>
                            <HighlightedText text={result.title.clone()} query={session.query.clone()} />
                            if let Some(folder_title) = &result.folder_title {
                                <span class="result-folder">{folder_title}</span>
                            }
                        </li>
                    })}
                </ol>
            </div>

            if page.loading {
                <Spinner message={Some("Loading bookmarks...".to_string())} />
            } else if columns.is_empty() {
                <p class="empty-message">{"No bookmark folders found"}</p>
            } else {
                <div class="columns">
                    {for columns.iter().enumerate().map(|(column_index, column)| html! {
                        <>
                            {drop_zone(DropSpot::new_column(column_index))}
                            <div class="column">
                                {drop_zone(DropSpot::in_column(column_index, 0))}
                                {for column.iter().enumerate().map(|(index, folder)| html! {
                                    <>
                                        <FolderCard
                                            folder={folder.clone()}
                                            column={column_index}
                                            {index}
                                            expanded={is_expanded(folder_state, &folder.id)}
                                            emoji={folder_emoji(folder_state, &folder.id).to_string()}
                                            {draggable}
                                            on_toggle={on_toggle.clone()}
                                            on_emoji={on_emoji.clone()}
                                            on_drag_start={on_drag_start.clone()}
                                            on_drag_end={on_drag_end.clone()}
                                            on_open={on_open.clone()}
                                        />
                                        {drop_zone(DropSpot::in_column(column_index, index + 1))}
                                    </>
                                })}
                            </div>
                        </>
                    })}
                    {drop_zone(DropSpot::new_column(columns.len()))}
                </div>
            }
        </div>
    }
}
