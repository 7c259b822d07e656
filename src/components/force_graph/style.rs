//! Per-element visual states and the styles they resolve to.

/// Interaction state of a node at render time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualState {
	Default,
	Selected,
	Hovering,
	SelectedHovering,
}

impl VisualState {
	pub fn from_flags(selected: bool, hovering: bool) -> Self {
		match (selected, hovering) {
			(true, true) => Self::SelectedHovering,
			(true, false) => Self::Selected,
			(false, true) => Self::Hovering,
			(false, false) => Self::Default,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStyle {
	pub fill: String,
	pub border_color: String,
	pub border_width: f64,
}

/// Overrides applied to a node while it is selected and/or hovered.
#[derive(Clone, Debug, PartialEq)]
pub struct ChosenNodeStyle {
	pub hover_fill: String,
	pub select_border: String,
	pub select_border_width: f64,
}

impl ChosenNodeStyle {
	pub fn apply(&self, base: &NodeStyle, state: VisualState) -> NodeStyle {
		match state {
			VisualState::Default => base.clone(),
			VisualState::Selected => NodeStyle {
				fill: base.fill.clone(),
				border_color: self.select_border.clone(),
				border_width: self.select_border_width,
			},
			VisualState::Hovering => NodeStyle {
				fill: self.hover_fill.clone(),
				border_color: base.border_color.clone(),
				border_width: 0.0,
			},
			VisualState::SelectedHovering => NodeStyle {
				fill: self.hover_fill.clone(),
				border_color: self.select_border.clone(),
				border_width: self.select_border_width,
			},
		}
	}
}

/// Arrow head drawn at the `to` end of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowGlyph {
	OneToOne,
	OneToOneHover,
	OneToMany,
	OneToManyHover,
}

impl ArrowGlyph {
	pub fn is_highlighted(self) -> bool {
		matches!(self, Self::OneToOneHover | Self::OneToManyHover)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub color: String,
	pub arrow: ArrowGlyph,
	pub arrow_strikethrough: bool,
}

/// Overrides applied to an edge (and its label) while hovered.
#[derive(Clone, Debug, PartialEq)]
pub struct ChosenEdgeStyle {
	pub hover_color: String,
}

impl ChosenEdgeStyle {
	pub fn apply(&self, base: &EdgeStyle, hovering: bool) -> EdgeStyle {
		if !hovering {
			return base.clone();
		}
		// cardinality is read back from the strikethrough flag
		let arrow = if base.arrow_strikethrough {
			ArrowGlyph::OneToOneHover
		} else {
			ArrowGlyph::OneToManyHover
		};
		EdgeStyle {
			color: self.hover_color.clone(),
			arrow,
			arrow_strikethrough: base.arrow_strikethrough,
		}
	}
}
