//! Main module for the sort visualizer using Yew.
//! Wires the controls and the bar chart to the visualizer hook.

use sort_visualizer::config::{ARRAY_CONTAINER_ID, HEADER_ID, MAX_SPEED};
use yew::prelude::*;

mod components;
mod hooks;

use components::{render_bars, AlgorithmButtons, SizeSlider, SpeedSlider, VolumeToggle};
use hooks::use_visualizer;

#[function_component]
pub fn App() -> Html {
    let vis = use_visualizer();

    let on_new_array = {
        let on_new_array = vis.on_new_array.clone();
        Callback::from(move |_: MouseEvent| on_new_array.emit(()))
    };

    html! {
        <div class="app">
            <header id={HEADER_ID} class="controls">
                <button class="new-array" onclick={on_new_array}>{ "New Array" }</button>
                <SizeSlider size={vis.size} oninput={vis.on_size_input.clone()} />
                <SpeedSlider
                    speed={vis.speed}
                    max={MAX_SPEED}
                    oninput={vis.on_speed_input.clone()}
                />
                <VolumeToggle muted={vis.muted} ontoggle={vis.on_toggle_volume.clone()} />
                <AlgorithmButtons active={vis.active} onsort={vis.on_sort.clone()} />
                if let Some(err) = &vis.error {
                    <div class="current-error compact">
                        { err }
                    </div>
                }
            </header>

            <div
                id={ARRAY_CONTAINER_ID}
                class="array-container"
                style={format!("height: {}px;", vis.ceiling)}
            >
                { render_bars(&vis.entries, vis.ceiling) }
            </div>
        </div>
    }
}

/// Entry point: installs logging and renders the App component.
fn main() {
    // Set the panic hook to log detailed errors to the console
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    yew::Renderer::<App>::new().render();
}
