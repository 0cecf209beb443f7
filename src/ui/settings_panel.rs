/// Settings panel generated from the settings schema

use crate::bookmark_data::FolderItem;
use crate::settings::{AppSettings, SettingConfig, SettingControl, SettingKey, SettingValue, SettingsAction, settings_schema};
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SettingsPanelProps {
    pub settings: AppSettings,
    /// Choices for the folder multi-selects
    pub folders: Vec<FolderItem>,
    pub on_action: Callback<SettingsAction>,
    pub on_close: Callback<()>,
}

fn input_value(e: &Event) -> Option<String> {
    e.target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}

fn update(on_action: &Callback<SettingsAction>, key: SettingKey, value: SettingValue) {
    on_action.emit(SettingsAction::Update(key, value));
}

fn render_control(config: &SettingConfig, props: &SettingsPanelProps) -> Html {
    let key = config.key;
    let value = props.settings.get(key);
    let on_action = props.on_action.clone();

    match (&config.control, value) {
        (SettingControl::Toggle, SettingValue::Bool(checked)) => {
            let onchange = Callback::from(move |_: Event| update(&on_action, key, SettingValue::Bool(!checked)));
            html! { <input type="checkbox" {checked} {onchange} /> }
        }
        (SettingControl::Select { options }, SettingValue::Text(current)) => {
            let onchange = Callback::from(move |e: Event| {
                if let Some(select) = e.target().and_then(|t| t.dyn_into::<HtmlSelectElement>().ok()) {
                    update(&on_action, key, SettingValue::Text(select.value()));
                }
            });
            html! {
                <select {onchange}>
                    {for options.iter().map(|option| html! {
                        <option value={option.value} selected={option.value == current}>{option.label}</option>
                    })}
                </select>
            }
        }
        (SettingControl::Slider { min, max, step, show_value }, SettingValue::Number(current)) => {
            let onchange = Callback::from(move |e: Event| {
                match input_value(&e).and_then(|v| v.parse::<u32>().ok()) {
                    Some(n) => update(&on_action, key, SettingValue::Number(n)),
                    None => log::warn!("ignoring non-numeric value for {:?}", key),
                }
            });
            html! {
                <>
                    <input
                        type="range"
                        min={min.to_string()}
                        max={max.to_string()}
                        step={step.to_string()}
                        value={current.to_string()}
                        {onchange}
                    />
                    if *show_value {
                        <span class="setting-value">{current}</span>
                    }
                </>
            }
        }
        (SettingControl::Input { placeholder }, SettingValue::Text(current)) => {
            let onchange = Callback::from(move |e: Event| {
                if let Some(text) = input_value(&e) {
                    update(&on_action, key, SettingValue::Text(text));
                }
            });
            html! { <input type="text" placeholder={*placeholder} value={current} {onchange} /> }
        }
        (SettingControl::MultiSelect, SettingValue::List(selected)) => {
            html! {
                <div class="setting-multi">
                    {for props.folders.iter().map(|folder| {
                        let checked = selected.contains(&folder.id);
                        let folder_id = folder.id.clone();
                        let selected = selected.clone();
                        let on_action = on_action.clone();
                        let onchange = Callback::from(move |_: Event| {
                            let next: Vec<String> = if checked {
                                selected.iter().filter(|id| **id != folder_id).cloned().collect()
                            } else {
                                selected.iter().cloned().chain(std::iter::once(folder_id.clone())).collect()
                            };
                            update(&on_action, key, SettingValue::List(next));
                        });
                        html! {
                            <label class="setting-choice" key={folder.id.clone()}>
                                <input type="checkbox" {checked} {onchange} />
                                {&folder.title}
                            </label>
                        }
                    })}
                </div>
            }
        }
        (control, value) => {
            log::warn!("setting {:?} has value {:?} that does not fit {:?}", key, value, control);
            html! {}
        }
    }
}

#[function_component(SettingsPanel)]
pub fn settings_panel(props: &SettingsPanelProps) -> Html {
    let on_reset = {
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| on_action.emit(SettingsAction::Reset))
    };

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="settings-panel">
            <div class="settings-header">
                <h2>{"Settings"}</h2>
                <button class="settings-close" onclick={on_close}>{"×"}</button>
            </div>

            {for settings_schema().iter().map(|config| html! {
                <div class="setting-row">
                    <span class="setting-label">{config.label}</span>
                    {render_control(config, props)}
                </div>
            })}

            <button class="settings-reset" onclick={on_reset}>{"Reset to defaults"}</button>
        </div>
    }
}
