use leptos::callback::{Callable, Callback, UnsyncCallback};
use leptos::prelude::*;

use super::config::{EntityMetadataMap, GraphConfig};
use super::schema::EntityType;
use super::sync::{ContextMenu, GraphOwner, GraphSync, MenuAction, RelationshipInfo, ViewInputs};
use super::test_adapter::GraphTestAdapter;
use crate::components::force_graph::{
	GraphData, Network, NetworkCanvas, NetworkEvent, NetworkHandle,
};

/// Modeling-page state shared through Leptos context.
#[derive(Clone, Copy)]
pub struct ModelingContext {
	pub selected_entity: RwSignal<Option<String>>,
}

impl ModelingContext {
	pub fn new() -> Self {
		Self {
			selected_entity: RwSignal::new(None),
		}
	}

	/// Mirrors the selected entity onto the canvas. A selection naming an
	/// entity outside `entity_types` is dropped from the context.
	pub fn mirror_selection<N, O>(
		&self,
		sync: &mut GraphSync,
		entity_types: &[EntityType],
		net: &mut N,
		owner: &O,
	) where
		N: Network + ?Sized,
		O: GraphOwner + ?Sized,
	{
		let Some(name) = self.selected_entity.get_untracked() else {
			return;
		};
		if !sync.sync_selection(&name, entity_types, net, owner) {
			self.selected_entity.set(None);
		}
	}
}

impl Default for ModelingContext {
	fn default() -> Self {
		Self::new()
	}
}

/// Host callbacks, the only way the graph reaches the rest of the page.
#[derive(Clone, Copy)]
pub struct GraphCallbacks {
	pub select_entity: Callback<String>,
	pub save_entity_coords: Callback<(String, f64, f64)>,
	pub edit_relationship: Callback<RelationshipInfo>,
	pub toggle_relationship_modal: Callback<bool>,
}

impl GraphOwner for GraphCallbacks {
	fn select_entity(&self, entity_name: &str) {
		self.select_entity.run(entity_name.to_string());
	}

	fn save_entity_coords(&self, entity_name: &str, x: f64, y: f64) {
		self.save_entity_coords.run((entity_name.to_string(), x, y));
	}

	fn edit_relationship(&self, info: RelationshipInfo) {
		self.edit_relationship.run(info);
	}

	fn toggle_relationship_modal(&self, visible: bool) {
		self.toggle_relationship_modal.run(visible);
	}
}

/// Entity-relationship graph of the modeling page.
#[component]
pub fn GraphVis(
	#[prop(into)] entity_types: Signal<Vec<EntityType>>,
	callbacks: GraphCallbacks,
	#[prop(into, optional)] filtered_entity_types: Signal<Vec<String>>,
	/// Entity to focus whenever `is_entity_selected` turns true.
	#[prop(into, optional)]
	entity_selected: Signal<Option<String>>,
	#[prop(into, optional)] is_entity_selected: Signal<bool>,
	#[prop(into, optional)] metadata: Signal<EntityMetadataMap>,
	#[prop(optional)] config: GraphConfig,
	#[prop(optional)] on_test_adapter: Option<UnsyncCallback<GraphTestAdapter>>,
) -> impl IntoView {
	let modeling = use_context::<ModelingContext>().unwrap_or_default();
	let settings = config.physics.clone();
	let sync = StoredValue::new_local(GraphSync::new(config));
	let network = StoredValue::new_local(None::<NetworkHandle>);
	let network_ready = RwSignal::new(false);
	let graph_data = RwSignal::new(GraphData::default());
	let physics = RwSignal::new(true);
	let context_menu = RwSignal::new(None::<ContextMenu>);

	// view model
	Effect::new(move |_| {
		let types = entity_types.get();
		let filtered = filtered_entity_types.get();
		let metadata = metadata.get();
		let selected = modeling.selected_entity.get();
		let focused = entity_selected.get();
		let inputs = ViewInputs {
			entity_types: &types,
			metadata: &metadata,
			filtered: &filtered,
			selected_entity: selected.as_deref(),
			entity_selected: focused.as_deref(),
		};
		let Some((data, physics_enabled)) =
			sync.try_update_value(|s| (s.update(&inputs), s.physics_enabled()))
		else {
			return;
		};
		physics.set(physics_enabled);
		graph_data.set(data);
		context_menu.set(None);
	});

	let on_event = UnsyncCallback::new(move |event: NetworkEvent| {
		let Some(handle) = network.get_value() else {
			return;
		};
		let types = entity_types.get_untracked();
		let filtered = filtered_entity_types.get_untracked();
		let metadata = metadata.get_untracked();
		let selected = modeling.selected_entity.get_untracked();
		let focused = entity_selected.get_untracked();
		let inputs = ViewInputs {
			entity_types: &types,
			metadata: &metadata,
			filtered: &filtered,
			selected_entity: selected.as_deref(),
			entity_selected: focused.as_deref(),
		};
		sync.update_value(|s| {
			handle.with_mut(|net| s.handle_event(event, &inputs, net, &callbacks));
			if context_menu.with_untracked(|m| m.as_ref() != s.context_menu()) {
				context_menu.set(s.context_menu().cloned());
			}
			if physics.get_untracked() != s.physics_enabled() {
				physics.set(s.physics_enabled());
			}
		});
	});

	let on_ready = UnsyncCallback::new(move |handle: NetworkHandle| {
		if let Some(adapter) = &on_test_adapter {
			adapter.run(GraphTestAdapter::new(handle.clone()));
		}
		network.set_value(Some(handle));
		network_ready.set(true);
	});

	// selection made elsewhere on the page, e.g. a freshly created entity
	Effect::new(move |_| {
		modeling.selected_entity.track();
		if !network_ready.get() {
			return;
		}
		let Some(handle) = network.get_value() else {
			return;
		};
		let types = entity_types.get_untracked();
		sync.update_value(|s| {
			handle.with_mut(|net| modeling.mirror_selection(s, &types, net, &callbacks));
		});
	});

	Effect::new(move |_| {
		let requested = is_entity_selected.get();
		if !network_ready.get() {
			return;
		}
		let Some(handle) = network.get_value() else {
			return;
		};
		let name = entity_selected.get_untracked();
		sync.with_value(|s| {
			handle.with_mut(|net| s.focus_requested(requested, name.as_deref(), net));
		});
	});

	let on_menu = move |action: MenuAction| {
		if let Some(handle) = network.get_value() {
			sync.update_value(|s| {
				handle.with_mut(|net| s.menu_click(action, net));
			});
		}
		context_menu.set(None);
	};

	view! {
		<div id="graphVis" class="graph-vis">
			<NetworkCanvas
				data=graph_data
				physics=physics
				on_event=on_event
				on_ready=on_ready
				settings=settings
			/>
			{move || {
				context_menu
					.get()
					.map(|menu| {
						view! {
							<ul
								id="contextMenu"
								class="graph-context-menu"
								role="menu"
								style=format!("top: {}px; left: {}px;", menu.top, menu.left)
							>
								<li
									role="menuitem"
									data-testid=format!("centerOnEntityType-{}", menu.node)
									on:click=move |_| on_menu(MenuAction::CenterOnEntityType)
								>
									"Center on entity type"
								</li>
							</ul>
						}
					})
			}}
		</div>
	}
}
