use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, LINE_HEIGHT, LOOP_RADIUS, NodeBox};
use super::style::{ArrowGlyph, VisualState};

const BACKGROUND: &str = "#ffffff";
const ARROW_SIZE: f64 = 10.0;
const CORNER_RADIUS: f64 = 6.0;
const LOOP_DASH: [f64; 2] = [4.0, 3.0];

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let boxes = state.node_boxes();
	ctx.set_text_align("center");
	ctx.set_text_baseline("bottom");
	ctx.set_font("12px sans-serif");

	for (i, edge) in state.edges().iter().enumerate() {
		let (Some(a), Some(b), Some(style)) = (
			boxes.get(&edge.from),
			boxes.get(&edge.to),
			state.edge_style(i),
		) else {
			continue;
		};
		let width = if style.arrow.is_highlighted() { 2.0 } else { 1.0 };
		ctx.set_stroke_style_str(&style.color);
		ctx.set_fill_style_str(&style.color);
		ctx.set_line_width(width);

		if edge.from == edge.to {
			let (cx, cy) = a.loop_center();
			// self references are dashed
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(LOOP_DASH[0]),
				&JsValue::from_f64(LOOP_DASH[1]),
			));
			ctx.begin_path();
			let _ = ctx.arc(cx, cy, LOOP_RADIUS, 0.0, 2.0 * PI);
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
			if let Some(label) = &edge.label {
				let _ = ctx.fill_text(label, cx, cy - LOOP_RADIUS - 2.0);
			}
			continue;
		}

		let (dx, dy) = (b.x - a.x, b.y - a.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (sx, sy) = a.boundary(ux, uy);
		let (tip_x, tip_y) = b.boundary(-ux, -uy);
		let (end_x, end_y) = if style.arrow_strikethrough {
			(tip_x, tip_y)
		} else {
			(tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE)
		};

		ctx.begin_path();
		ctx.move_to(sx, sy);
		ctx.line_to(end_x, end_y);
		ctx.stroke();
		draw_arrow(ctx, style.arrow, (tip_x, tip_y), (ux, uy));

		if let Some(label) = &edge.label {
			let (mx, my) = ((sx + tip_x) / 2.0, (sy + tip_y) / 2.0);
			let _ = ctx.fill_text(label, mx, my - 3.0);
		}
	}
}

fn draw_arrow(
	ctx: &CanvasRenderingContext2d,
	glyph: ArrowGlyph,
	(tip_x, tip_y): (f64, f64),
	(ux, uy): (f64, f64),
) {
	let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	match glyph {
		ArrowGlyph::OneToOne | ArrowGlyph::OneToOneHover => {
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
		// crow's foot: three prongs opening onto the target
		ArrowGlyph::OneToMany | ArrowGlyph::OneToManyHover => {
			ctx.begin_path();
			ctx.move_to(back_x, back_y);
			ctx.line_to(tip_x + px, tip_y + py);
			ctx.move_to(back_x, back_y);
			ctx.line_to(tip_x, tip_y);
			ctx.move_to(back_x, back_y);
			ctx.line_to(tip_x - px, tip_y - py);
			ctx.stroke();
		}
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, b: &NodeBox) {
	let (left, top) = (b.x - b.half_width, b.y - b.half_height);
	let (right, bottom) = (b.x + b.half_width, b.y + b.half_height);
	let r = CORNER_RADIUS.min(b.half_width).min(b.half_height);
	ctx.begin_path();
	ctx.move_to(left + r, top);
	let _ = ctx.arc_to(right, top, right, bottom, r);
	let _ = ctx.arc_to(right, bottom, left, bottom, r);
	let _ = ctx.arc_to(left, bottom, left, top, r);
	let _ = ctx.arc_to(left, top, right, top, r);
	ctx.close_path();
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let boxes = state.node_boxes();
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let Some(b) = boxes.get(&idx) else {
			return;
		};
		let info = &node.data.user_data;
		let style = state.node_style(idx, info);

		if state.visual_state(idx) == VisualState::SelectedHovering {
			let glow = b.half_width.max(b.half_height) * 1.6;
			if let Ok(gradient) =
				ctx.create_radial_gradient(b.x, b.y, b.half_height, b.x, b.y, glow)
			{
				let _ = gradient.add_color_stop(0.0, "rgba(91, 105, 175, 0.25)");
				let _ = gradient.add_color_stop(1.0, "rgba(91, 105, 175, 0)");
				ctx.begin_path();
				let _ = ctx.arc(b.x, b.y, glow, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		rounded_rect(ctx, b);
		ctx.set_fill_style_str(&style.fill);
		ctx.fill();
		if style.border_width > 0.0 {
			ctx.set_stroke_style_str(&style.border_color);
			ctx.set_line_width(style.border_width / k.max(0.5));
			ctx.stroke();
		}

		if let Some(label) = &info.label {
			let lines: Vec<&str> = label.lines().collect();
			let first_y = b.y - (lines.len().saturating_sub(1) as f64) * LINE_HEIGHT / 2.0;
			ctx.set_fill_style_str("#333333");
			for (i, line) in lines.iter().enumerate() {
				let font = if i == 0 {
					"bold 14px sans-serif"
				} else {
					"12px monospace"
				};
				ctx.set_font(font);
				let _ = ctx.fill_text(line, b.x, first_y + i as f64 * LINE_HEIGHT);
			}
		}
	});
}
