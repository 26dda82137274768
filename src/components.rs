//! Pure Yew view components for the visualizer UI.
//!
//! This module contains stateless components that render based on props,
//! making them easy to test and reuse.

use sort_visualizer::config::{MAX_SIZE, MIN_SIZE};
use sort_visualizer::{Algorithm, Entry};
use yew::prelude::*;

/// Renders the bars, one per entry, scaled to the available height.
///
/// Highlighted entries get the `active` class so the stylesheet can
/// colour them.
pub fn render_bars(entries: &[Entry], ceiling: u32) -> Html {
    if entries.is_empty() {
        return html! {
            <div class="bars empty">
                <p class="no-bars-message">{ "Nothing to sort" }</p>
            </div>
        };
    }

    let width = 100.0 / entries.len() as f64;

    html! {
        <div class="bars">
            { entries.iter().enumerate().map(|(idx, entry)| {
                render_bar(entry, idx, width, ceiling)
            }).collect::<Html>() }
        </div>
    }
}

fn render_bar(entry: &Entry, idx: usize, width: f64, ceiling: u32) -> Html {
    let height = entry.value.min(ceiling);
    let class = classes!("bar", entry.highlighted.then_some("active"));

    html! {
        <div
            key={idx}
            {class}
            title={entry.value.to_string()}
            style={format!("width: {:.4}%; height: {}px;", width, height)}
        />
    }
}

/// Slider component for the number of bars.
#[derive(Properties, PartialEq)]
pub struct SizeSliderProps {
    pub size: usize,
    pub oninput: Callback<InputEvent>,
}

#[function_component(SizeSlider)]
pub fn size_slider(props: &SizeSliderProps) -> Html {
    html! {
        <div class="form-group">
            <label for="size">{ "Size:" }</label>
            <div class="slider-with-value">
                <input type="range"
                    id="size"
                    min={MIN_SIZE.to_string()}
                    max={MAX_SIZE.to_string()}
                    value={props.size.to_string()}
                    oninput={props.oninput.clone()}
                />
                <span class="slider-value">{ props.size }</span>
            </div>
        </div>
    }
}

/// Slider component for the animation speed, showing the resulting delay.
#[derive(Properties, PartialEq)]
pub struct SpeedSliderProps {
    pub speed: u32,
    pub max: u32,
    pub oninput: Callback<InputEvent>,
}

#[function_component(SpeedSlider)]
pub fn speed_slider(props: &SpeedSliderProps) -> Html {
    let delay = props.max.saturating_sub(props.speed);
    html! {
        <div class="form-group">
            <label for="speed">{ "Speed:" }</label>
            <div class="slider-with-value">
                <input type="range"
                    id="speed"
                    min="0"
                    max={props.max.to_string()}
                    value={props.speed.to_string()}
                    oninput={props.oninput.clone()}
                />
                <span class="slider-value">{ format!("{} ms/step", delay) }</span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct VolumeToggleProps {
    pub muted: bool,
    pub ontoggle: Callback<()>,
}

#[function_component(VolumeToggle)]
pub fn volume_toggle(props: &VolumeToggleProps) -> Html {
    let onclick = {
        let ontoggle = props.ontoggle.clone();
        Callback::from(move |_: MouseEvent| ontoggle.emit(()))
    };
    html! {
        <button class={classes!("volume", (!props.muted).then_some("on"))} {onclick}>
            { if props.muted { "Sound: off" } else { "Sound: on" } }
        </button>
    }
}

/// One button per algorithm; the running one is marked.
#[derive(Properties, PartialEq)]
pub struct AlgorithmButtonsProps {
    pub active: Option<Algorithm>,
    pub onsort: Callback<Algorithm>,
}

#[function_component(AlgorithmButtons)]
pub fn algorithm_buttons(props: &AlgorithmButtonsProps) -> Html {
    html! {
        <div class="algorithm-buttons">
            { Algorithm::ALL.into_iter().map(|algorithm| {
                let onsort = props.onsort.clone();
                let onclick = Callback::from(move |_: MouseEvent| onsort.emit(algorithm));
                let running = props.active == Some(algorithm);
                html! {
                    <button
                        key={algorithm.key()}
                        class={classes!("sort-button", running.then_some("running"))}
                        {onclick}
                    >
                        { algorithm.label() }
                    </button>
                }
            }).collect::<Html>() }
        </div>
    }
}
