/// Reusable UI components

use crate::bookmark_data::{BookmarkItem, FolderItem};
use crate::browser::page_favicon;
use crate::drag::DropSpot;
use crate::highlight::{Segment, highlight_segments, truncate_text};
use yew::prelude::*;

const MAX_TITLE_CHARS: usize = 60;

#[derive(Properties, PartialEq)]
pub struct HighlightedTextProps {
    pub text: AttrValue,
    #[prop_or_default]
    pub query: AttrValue,
}

/// Text with the part matching `query` wrapped in `<em>`
#[function_component(HighlightedText)]
pub fn highlighted_text(props: &HighlightedTextProps) -> Html {
    let segments = highlight_segments(&props.text, &props.query);

    html! {
        <span class="highlighted">
            {for segments.into_iter().map(|segment| match segment {
                Segment::Plain(text) => html! { {text} },
                Segment::Marked(text) => html! { <em>{text}</em> },
            })}
        </span>
    }
}

#[derive(Properties, PartialEq)]
pub struct SpinnerProps {
    #[prop_or_default]
    pub message: Option<String>,
}

#[function_component(Spinner)]
pub fn spinner(props: &SpinnerProps) -> Html {
    html! {
        <div class="loading-container">
            <div class="loading-spinner"></div>
            if let Some(msg) = &props.message {
                <p class="loading-message">{msg}</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct DropZoneProps {
    pub spot: DropSpot,
    pub active: bool,
    pub on_hover: Callback<DropSpot>,
    pub on_leave: Callback<()>,
    pub on_drop: Callback<DropSpot>,
}

/// Strip between folders (or beside columns) that accepts a dragged folder
#[function_component(DropZone)]
pub fn drop_zone(props: &DropZoneProps) -> Html {
    let spot = props.spot;

    let ondragover = {
        let on_hover = props.on_hover.clone();
        Callback::from(move |e: DragEvent| {
            // Required for the browser to allow a drop here
            e.prevent_default();
            on_hover.emit(spot);
        })
    };

    let ondragleave = {
        let on_leave = props.on_leave.clone();
        Callback::from(move |_: DragEvent| on_leave.emit(()))
    };

    let ondrop = {
        let on_drop = props.on_drop.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            on_drop.emit(spot);
        })
    };

    let class = classes!("drop-zone", props.active.then_some("drop-zone-active"));

    html! {
        <div {class} {ondragover} {ondragleave} {ondrop}></div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FolderCardProps {
    pub folder: FolderItem,
    pub column: usize,
    pub index: usize,
    pub expanded: bool,
    pub emoji: AttrValue,
    pub draggable: bool,
    pub on_toggle: Callback<String>,
    pub on_emoji: Callback<String>,
    pub on_drag_start: Callback<(usize, usize)>,
    pub on_drag_end: Callback<()>,
    pub on_open: Callback<BookmarkItem>,
}

#[function_component(FolderCard)]
pub fn folder_card(props: &FolderCardProps) -> Html {
    let on_header_click = {
        let on_toggle = props.on_toggle.clone();
        let folder_id = props.folder.id.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(folder_id.clone()))
    };

    let on_emoji_click = {
        let on_emoji = props.on_emoji.clone();
        let folder_id = props.folder.id.clone();
        Callback::from(move |e: MouseEvent| {
            // Keep the header from toggling too
            e.stop_propagation();
            on_emoji.emit(folder_id.clone());
        })
    };

    let ondragstart = {
        let on_drag_start = props.on_drag_start.clone();
        let (column, index) = (props.column, props.index);
        let folder_id = props.folder.id.clone();
        Callback::from(move |e: DragEvent| {
            if let Some(transfer) = e.data_transfer() {
                let _ = transfer.set_data("text/plain", &folder_id);
            }
            on_drag_start.emit((column, index));
        })
    };

    let ondragend = {
        let on_drag_end = props.on_drag_end.clone();
        Callback::from(move |_: DragEvent| on_drag_end.emit(()))
    };

    html! {
        <div class="folder-card" draggable={props.draggable.to_string()} {ondragstart} {ondragend}>
            <div class="folder-header" onclick={on_header_click}>
                <span class="folder-emoji" title="change emoji" onclick={on_emoji_click}>{props.emoji.clone()}</span>
                <span class="folder-title">{&props.folder.title}</span>
                <span class="folder-count">{props.folder.children.len()}</span>
            </div>

            if props.expanded {
                <ul class="bookmark-list">
                    {for props.folder.children.iter().map(|bookmark| {
                        let on_open = props.on_open.clone();
                        let item = bookmark.clone();
                        let onclick = Callback::from(move |e: MouseEvent| {
                            e.prevent_default();
                            on_open.emit(item.clone());
                        });

                        html! {
                            <li class="bookmark-item" key={bookmark.id.clone()}>
                                <a href={bookmark.url.clone()} title={bookmark.title.clone()} {onclick}>
                                    if let Some(icon) = page_favicon(&bookmark.url) {
                                        <img class="favicon" src={icon} alt="" />
                                    }
                                    <span>{truncate_text(&bookmark.title, MAX_TITLE_CHARS)}</span>
                                </a>
                            </li>
                        }
                    })}
                </ul>
            }
        </div>
    }
}
