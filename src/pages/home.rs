use leptos::callback::{Callback, UnsyncCallback};
use leptos::ev::KeyboardEvent;
use leptos::prelude::*;
use log::{debug, info};

use crate::components::graph_view::{
	EntityMetadataMap, EntityType, GraphCallbacks, GraphConfig, GraphTestAdapter, GraphVis,
	ModelingContext, RelationshipInfo,
};
use crate::components::tag::HcTag;

const SAMPLE_MODEL: &str = r#"[
	{
		"entityName": "Customer",
		"model": {
			"definitions": {
				"Customer": {
					"properties": {
						"customerId": {"datatype": "integer"},
						"name": {"datatype": "string"},
						"orders": {
							"datatype": "array",
							"items": {
								"relatedEntityType": "http://example.org/Order-0.0.1/Order",
								"joinPropertyName": "orderId"
							}
						}
					}
				}
			},
			"hubCentral": {"modeling": {"graphX": -180, "graphY": -60}}
		}
	},
	{
		"entityName": "Order",
		"model": {
			"definitions": {
				"Order": {
					"properties": {
						"orderId": {"datatype": "integer"},
						"customer": {
							"relatedEntityType": "http://example.org/Customer-0.0.1/Customer",
							"joinPropertyName": "customerId"
						},
						"lines": {
							"datatype": "array",
							"items": {
								"relatedEntityType": "http://example.org/Product-0.0.1/Product",
								"joinPropertyName": "sku"
							}
						}
					}
				}
			}
		}
	},
	{
		"entityName": "Product",
		"model": {
			"definitions": {
				"Product": {"properties": {"sku": {"datatype": "string"}}}
			}
		}
	},
	{
		"entityName": "Person",
		"model": {
			"definitions": {
				"Person": {
					"properties": {
						"manager": {
							"relatedEntityType": "http://example.org/Person-0.0.1/Person",
							"joinPropertyName": "personId"
						}
					}
				}
			}
		}
	}
]"#;

const SAMPLE_METADATA: &str = r##"{
	"Customer": {"color": "#ecf7fd", "instances": 1200},
	"Order": {"color": "#e8f7e8", "instances": 5400},
	"Product": {"color": "#fcefe2", "instances": 310}
}"##;

const SAMPLE_CONFIG: &str = r##"{
	"selectColor": "#5b69af",
	"physics": {"restTicks": 20}
}"##;

struct Sample {
	entity_types: Vec<EntityType>,
	metadata: EntityMetadataMap,
	config: GraphConfig,
}

fn load_sample() -> Result<Sample, serde_json::Error> {
	Ok(Sample {
		entity_types: EntityType::list_from_json(SAMPLE_MODEL)?,
		metadata: serde_json::from_str(SAMPLE_METADATA)?,
		config: GraphConfig::from_json(SAMPLE_CONFIG)?,
	})
}

/// Modeling page hosting the entity graph.
#[component]
fn ModelingPage(
	entity_types: Vec<EntityType>,
	metadata: EntityMetadataMap,
	config: GraphConfig,
) -> impl IntoView {
	let modeling = ModelingContext::new();
	provide_context(modeling);

	let entity_types = RwSignal::new(entity_types);
	let metadata = RwSignal::new(metadata);
	let filtered = RwSignal::new(Vec::<String>::new());
	let relationship = RwSignal::new(None::<RelationshipInfo>);
	let modal_visible = RwSignal::new(false);
	let focus_target = RwSignal::new(None::<String>);
	let focus_requested = RwSignal::new(false);

	let callbacks = GraphCallbacks {
		select_entity: Callback::new(move |name: String| {
			info!("selected entity {name}");
			modeling.selected_entity.set(Some(name));
		}),
		save_entity_coords: Callback::new(move |(name, x, y): (String, f64, f64)| {
			debug!("persisting {name} at ({x}, {y})");
			entity_types.update(|types| {
				if let Some(entity) = types.iter_mut().find(|e| e.entity_name == name) {
					entity.set_coordinates(x, y);
				}
			});
		}),
		edit_relationship: Callback::new(move |info: RelationshipInfo| {
			relationship.set(Some(info));
		}),
		toggle_relationship_modal: Callback::new(move |visible: bool| {
			modal_visible.set(visible);
		}),
	};

	let on_test_adapter = UnsyncCallback::new(|adapter: GraphTestAdapter| {
		debug!(
			"test adapter ready, {} nodes placed",
			adapter.get_node_positions(None).len()
		);
	});

	let on_filter_key = move |ev: KeyboardEvent| {
		if ev.key() != "Enter" {
			return;
		}
		let value = event_target_value(&ev).trim().to_string();
		let known = entity_types.with(|types| types.iter().any(|e| e.entity_name == value));
		if !known {
			return;
		}
		filtered.update(|f| {
			if !f.contains(&value) {
				f.push(value.clone());
			}
		});
		focus_target.set(Some(value));
		focus_requested.set(true);
	};

	view! {
		<div class="modeling-page">
			<div class="graph-toolbar">
				<input
					class="entity-filter"
					placeholder="Filter entity types, press Enter"
					on:keydown=on_filter_key
					on:input=move |_| focus_requested.set(false)
				/>
				<div class="filter-tags">
					<For
						each=move || filtered.get()
						key=|name| name.clone()
						children=move |name: String| {
							let removed = name.clone();
							view! {
								<HcTag
									label=name
									color="blue"
									aria_label="entity-filter-tag"
									on_close=Callback::new(move |_| {
										filtered.update(|f| f.retain(|n| n != &removed));
									})
								/>
							}
						}
					/>
				</div>
			</div>
			<GraphVis
				entity_types=entity_types
				callbacks=callbacks
				filtered_entity_types=filtered
				entity_selected=focus_target
				is_entity_selected=focus_requested
				metadata=metadata
				config=config
				on_test_adapter=on_test_adapter
			/>
			<Show when=move || modal_visible.get()>
				{move || {
					relationship
						.get()
						.map(|info| {
							view! {
								<div class="relationship-panel" role="dialog">
									<h2>"Edit Relationship"</h2>
									<p>
										<HcTag
											label=info.source_node_name.clone()
											style=format!("background: {};", info.source_node_color)
											closable=false
										/>
										<span class="relationship-name">
											{info.relationship_name.clone()}
										</span>
										<HcTag
											label=info.target_node_name.clone()
											style=format!("background: {};", info.target_node_color)
											closable=false
										/>
									</p>
									<p class="join-property">
										"Join property: "
										{info.join_property_name.clone().unwrap_or_default()}
									</p>
									<button on:click=move |_| modal_visible.set(false)>"Close"</button>
								</div>
							}
						})
				}}
			</Show>
		</div>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{load_sample()
				.map(|sample| {
					view! {
						<ModelingPage
							entity_types=sample.entity_types
							metadata=sample.metadata
							config=sample.config
						/>
					}
				})}
		</ErrorBoundary>
	}
}
