use std::cell::RefCell;
use std::rc::Rc;

use leptos::callback::{Callable, UnsyncCallback};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::network::{Network, NetworkEvent, NetworkHandle};
use super::render;
use super::state::ForceGraphState;
use super::types::{GraphData, PhysicsSettings};

/// Runs every event the canvas queued since the last dispatch.
fn dispatch(network: &NetworkHandle, on_event: &UnsyncCallback<NetworkEvent>) {
	let events = network.with_mut(|s| s.take_events()).unwrap_or_default();
	for event in events {
		on_event.run(event);
	}
}

/// Pointer position relative to the canvas element.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Force-directed canvas. Interaction is reported through `on_event`; the
/// owner gets a [`NetworkHandle`] through `on_ready` once the canvas exists.
#[component]
pub fn NetworkCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] physics: Signal<bool>,
	#[prop(into)] on_event: UnsyncCallback<NetworkEvent>,
	#[prop(optional)] on_ready: Option<UnsyncCallback<NetworkHandle>>,
	#[prop(optional)] settings: PhysicsSettings,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let network = NetworkHandle::default();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (network_init, animate_init, resize_cb_init, on_event_init) = (
		network.clone(),
		animate.clone(),
		resize_cb.clone(),
		on_event.clone(),
	);

	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if network_init.is_mounted() {
			network_init.with_mut(|s| s.set_data(&data));
			dispatch(&network_init, &on_event_init);
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("2d canvas context unavailable");
			return;
		};
		network_init.install(ForceGraphState::new(
			&data,
			w,
			h,
			settings.clone(),
			physics.get_untracked(),
		));
		if let Some(ref on_ready) = on_ready {
			on_ready.run(network_init.clone());
		}
		dispatch(&network_init, &on_event_init);

		if fullscreen {
			let (network_resize, canvas_resize) = (network_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				network_resize.with_mut(|s| s.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (network_anim, animate_inner, on_event_anim) = (
			network_init.clone(),
			animate_init.clone(),
			on_event_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			network_anim.with_mut(|s| {
				s.tick(0.016);
				render::render(s, &ctx);
			});
			dispatch(&network_anim, &on_event_anim);
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let network_physics = network.clone();
	Effect::new(move |_| {
		let enabled = physics.get();
		network_physics.with_mut(|s| s.set_physics(enabled));
	});

	let set_cursor = move |cursor: &str| {
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let (network_md, on_event_md) = (network.clone(), on_event.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		network_md.with_mut(|s| s.pointer_down(x, y));
		dispatch(&network_md, &on_event_md);
	};

	let (network_mm, on_event_mm) = (network.clone(), on_event.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(cursor) = network_mm.with_mut(|s| {
			s.pointer_move(x, y);
			s.cursor()
		}) {
			set_cursor(cursor);
		}
		dispatch(&network_mm, &on_event_mm);
	};

	let (network_mu, on_event_mu) = (network.clone(), on_event.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		network_mu.with_mut(|s| s.pointer_up(x, y));
		dispatch(&network_mu, &on_event_mu);
	};

	let (network_ml, on_event_ml) = (network.clone(), on_event.clone());
	let on_mouseleave = move |_: MouseEvent| {
		network_ml.with_mut(|s| s.pointer_leave());
		set_cursor("grab");
		dispatch(&network_ml, &on_event_ml);
	};

	let (network_cm, on_event_cm) = (network.clone(), on_event.clone());
	let on_contextmenu = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if network_cm.with_mut(|s| s.context(x, y)) == Some(true) {
			ev.prevent_default();
		}
		dispatch(&network_cm, &on_event_cm);
	};

	let network_wh = network.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		network_wh.with_mut(|s| s.wheel(x, y, ev.delta_y()));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:contextmenu=on_contextmenu
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
