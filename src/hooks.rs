//! Controller hook: owns the sequence and run state, and turns UI events
//! into sort runs.

use log::{debug, error, info};
use sort_visualizer::clock::{Generation, TimerClock};
use sort_visualizer::config::*;
use sort_visualizer::utils::{ceiling_from_viewport, validate_size, validate_speed};
use sort_visualizer::{
    run, Algorithm, Entry, Outcome, RunConfig, SortRun, ToneEmitter, ValueSequence, WebTone,
};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Measured drawing area. `measured_at` changes on every resize so that a
/// resize reseeds even when the height stays the same.
#[derive(Clone, Copy, PartialEq)]
struct Viewport {
    ceiling: u32,
    measured_at: f64,
}

fn measure_viewport() -> Viewport {
    let window = gloo_utils::window();
    let window_height = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(FALLBACK_CEILING as f64);
    let header_height = gloo_utils::document()
        .get_element_by_id(HEADER_ID)
        .map(|header| header.client_height() as f64)
        .unwrap_or(0.0);

    Viewport {
        ceiling: ceiling_from_viewport(window_height, header_height),
        measured_at: js_sys::Date::now(),
    }
}

/// Stop any active run and replace the sequence with a freshly seeded one.
fn reseed(
    sequence: &UseStateHandle<ValueSequence>,
    generation: &Generation,
    tone: &Rc<dyn ToneEmitter>,
    redraw: &UseForceUpdateHandle,
    size: usize,
    ceiling: u32,
) -> ValueSequence {
    generation.advance();
    tone.emit(0.0);

    let fresh = ValueSequence::create(size, ceiling, &mut rand::rng());
    let redraw = redraw.clone();
    fresh.subscribe(Rc::new(move |_: &[Entry]| redraw.force_update()));
    sequence.set(fresh.clone());
    fresh
}

/// State and callbacks driving the visualizer UI.
#[derive(Clone)]
pub struct Visualizer {
    /// Snapshot of the bars for this render.
    pub entries: Vec<Entry>,
    pub ceiling: u32,
    pub size: usize,
    pub speed: u32,
    pub muted: bool,
    /// Algorithm currently animating, if any.
    pub active: Option<Algorithm>,
    pub error: Option<String>,
    pub on_size_input: Callback<InputEvent>,
    pub on_speed_input: Callback<InputEvent>,
    pub on_toggle_volume: Callback<()>,
    pub on_new_array: Callback<()>,
    pub on_sort: Callback<Algorithm>,
}

/// Owns the sequence, the run generation and the run configuration, and
/// turns UI events into sort runs.
#[hook]
pub fn use_visualizer() -> Visualizer {
    let config = use_state(RunConfig::default);
    let generation = use_state(Generation::new);
    let tone = use_state(|| Rc::new(WebTone::default()) as Rc<dyn ToneEmitter>);
    let sequence = use_state(|| ValueSequence::from_values(&[]));
    let viewport = use_state(|| Viewport {
        ceiling: FALLBACK_CEILING,
        measured_at: 0.0,
    });
    let size = use_state(|| DEFAULT_SIZE);
    let speed = use_state(|| config.speed());
    let muted = use_state(|| config.is_muted());
    let active = use_state(|| None::<Algorithm>);
    let error = use_state(|| None::<String>);
    let redraw = use_force_update();

    // Measure on mount and on every window resize
    {
        let viewport = viewport.clone();
        use_effect_with((), move |_| {
            viewport.set(measure_viewport());

            let on_resize = Closure::<dyn Fn()>::new(move || viewport.set(measure_viewport()));
            let window = gloo_utils::window();
            if let Err(err) = window
                .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            {
                error!("Could not listen for resize: {:?}", err);
            }

            move || {
                if let Err(err) = gloo_utils::window().remove_event_listener_with_callback(
                    "resize",
                    on_resize.as_ref().unchecked_ref(),
                ) {
                    debug!("Resize listener already gone: {:?}", err);
                }
            }
        });
    }

    // Size change or resize: new sequence, cancel whatever is running
    {
        let sequence = sequence.clone();
        let generation = (*generation).clone();
        let tone = (*tone).clone();
        let redraw = redraw.clone();
        let active = active.clone();
        use_effect_with((*size, *viewport), move |&(size, viewport)| {
            reseed(&sequence, &generation, &tone, &redraw, size, viewport.ceiling);
            active.set(None);
            || ()
        });
    }

    let on_size_input = {
        let size = size.clone();
        let error = error.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match validate_size(&input.value()) {
                Ok(value) => {
                    error.set(None);
                    size.set(value);
                }
                Err(msg) => error.set(Some(msg)),
            }
        })
    };

    let on_speed_input = {
        let config = (*config).clone();
        let speed = speed.clone();
        let error = error.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match validate_speed(&input.value()) {
                Ok(value) => {
                    // Picked up by the running sort at its next delay
                    config.set_speed(value);
                    speed.set(value);
                    error.set(None);
                }
                Err(msg) => error.set(Some(msg)),
            }
        })
    };

    let on_toggle_volume = {
        let config = (*config).clone();
        let muted = muted.clone();
        let tone = (*tone).clone();
        Callback::from(move |_: ()| {
            let now_muted = config.toggle_muted();
            if now_muted {
                tone.emit(0.0);
            }
            muted.set(now_muted);
        })
    };

    let on_new_array = {
        let sequence = sequence.clone();
        let generation = (*generation).clone();
        let tone = (*tone).clone();
        let redraw = redraw.clone();
        let active = active.clone();
        let size = *size;
        let ceiling = viewport.ceiling;
        Callback::from(move |_: ()| {
            reseed(&sequence, &generation, &tone, &redraw, size, ceiling);
            active.set(None);
        })
    };

    let on_sort = {
        let sequence = sequence.clone();
        let generation = (*generation).clone();
        let config = (*config).clone();
        let tone = (*tone).clone();
        let redraw = redraw.clone();
        let active = active.clone();
        let error = error.clone();
        let size = *size;
        let ceiling = viewport.ceiling;
        Callback::from(move |algorithm: Algorithm| {
            // A run in flight may have left a half-finished swap behind, so
            // the new run gets a new sequence rather than sharing that one
            let target = if active.is_some() {
                reseed(&sequence, &generation, &tone, &redraw, size, ceiling)
            } else {
                (*sequence).clone()
            };

            let guard = generation.advance();
            let ctx = SortRun::new(
                target,
                Rc::new(TimerClock),
                config.clone(),
                tone.clone(),
                guard,
            );

            active.set(Some(algorithm));
            error.set(None);

            let active = active.clone();
            let error = error.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match run(algorithm, &ctx).await {
                    Ok(report) if report.outcome == Outcome::Completed => {
                        info!("{} sorted {} values", algorithm, ctx.sequence().len());
                        active.set(None);
                    }
                    // The newer run owns the UI state now
                    Ok(_) => {}
                    Err(err) => {
                        error!("{} aborted: {}", algorithm, err);
                        error.set(Some(err.to_string()));
                        active.set(None);
                    }
                }
            });
        })
    };

    Visualizer {
        entries: sequence.snapshot(),
        ceiling: viewport.ceiling,
        size: *size,
        speed: *speed,
        muted: *muted,
        active: *active,
        error: (*error).clone(),
        on_size_input,
        on_speed_input,
        on_toggle_volume,
        on_new_array,
        on_sort,
    }
}
