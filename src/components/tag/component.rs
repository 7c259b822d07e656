use leptos::callback::{Callable, Callback};
use leptos::prelude::*;

use super::color::tag_class;

/// Whether a tag is closable when the caller does not say.
pub const CLOSABLE_BY_DEFAULT: bool = true;

/// Click handler of the dismiss control; closable tags only.
pub fn dismiss_handler(
	closable: bool,
	on_close: Option<Callback<()>>,
) -> Option<impl Fn() + Copy + 'static> {
	closable.then_some(move || {
		if let Some(on_close) = on_close {
			on_close.run(());
		}
	})
}

/// Inline label with an optional dismiss control. Dismissing only calls
/// `on_close`; removing the tag is up to the caller.
#[component]
pub fn HcTag(
	#[prop(into)] label: String,
	#[prop(optional, into)] aria_label: Option<String>,
	#[prop(optional, into)] class: Option<String>,
	#[prop(optional, into)] style: Option<String>,
	#[prop(optional, into)] color: Option<String>,
	#[prop(optional)] dashed: bool,
	#[prop(default = CLOSABLE_BY_DEFAULT)] closable: bool,
	/// Hidden tags keep their place in the layout.
	#[prop(default = true)]
	visible: bool,
	#[prop(optional, into)] on_close: Option<Callback<()>>,
) -> impl IntoView {
	let class_name = tag_class(color.as_deref(), dashed, visible, class.as_deref());

	view! {
		<span aria-label=aria_label data-testid="tag-component" class=class_name style=style>
			{label}
			{dismiss_handler(closable, on_close)
				.map(|dismiss| {
					view! {
						<span
							class="span-icon"
							role="button"
							aria-label="close"
							data-testid="iconClose-tagComponent"
							on:click=move |_| dismiss()
						>
							"×"
						</span>
					}
				})}
		</span>
	}
}
